//! HTTP server for promptshelf.
//!
//! Exposes the prompt library (CRUD, autosave, version history, recycle bin)
//! and the diff engine as a JSON API under `/api`, and optionally serves the
//! front-end from a static directory.

pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::PromptServer;
