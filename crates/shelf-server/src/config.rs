use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shelf_store::DiffLimits;

use crate::error::{ServerError, ServerResult};

/// Server settings, loadable from a TOML file. Missing keys take defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Holds the `prompts/` and `recycle_bin/` directories.
    pub data_dir: PathBuf,
    /// Front-end assets served for any path outside `/api`.
    pub static_dir: Option<PathBuf>,
    pub max_body_bytes: usize,
    pub limits: DiffLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            data_dir: PathBuf::from("data"),
            static_dir: None,
            max_body_bytes: 10 * 1024 * 1024,
            limits: DiffLimits::default(),
        }
    }
}

impl ServerConfig {
    /// Read a TOML config file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.data_dir, PathBuf::from("data"));
        assert_eq!(c.max_body_bytes, 10 * 1024 * 1024);
        assert_eq!(c.limits, DiffLimits::default());
        assert!(c.static_dir.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml(
            r#"
            bind_addr = "0.0.0.0:8080"
            static_dir = "www"

            [limits]
            max_lines = 200
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.static_dir, Some(PathBuf::from("www")));
        assert_eq!(c.limits.max_lines, 200);
        assert_eq!(c.limits.max_chars, 4000);
        assert_eq!(c.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        assert!(matches!(
            ServerConfig::from_toml("bind_addr = 3"),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        assert!(matches!(
            ServerConfig::load(Path::new("/nonexistent/promptshelf.toml")),
            Err(ServerError::Io(_))
        ));
    }
}
