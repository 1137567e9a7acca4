use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::json;
use shelf_diff::{
    diff_chars, diff_lines, escape_html, similarity, summarize, to_html, CharDiff, DiffKind,
    DiffScript,
};
use shelf_server::{PromptServer, ServerConfig};
use shelf_store::{FsPromptStore, Library, Prompt};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    if format == OutputFormat::Html && !matches!(cli.command, Command::Diff(_)) {
        bail!("--format html is only supported by `diff`");
    }
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Diff(args) => cmd_diff(args, format),
        Command::Similarity(args) => cmd_similarity(args, format),
        Command::Inline(args) => cmd_inline(args, format),
        Command::List(args) => cmd_list(args, format),
        Command::Log(args) => cmd_log(args, format),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if args.static_dir.is_some() {
        config.static_dir = args.static_dir;
    }

    println!(
        "{} promptshelf on {} (data: {})",
        "▶".green().bold(),
        format!("http://{}", config.bind_addr).bold(),
        config.data_dir.display()
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(PromptServer::new(config).serve())?;
    Ok(())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let old = read_text(&args.old)?;
    let new = read_text(&args.new)?;
    let script = diff_lines(&old, &new);
    let score = similarity(&old, &new);

    match format {
        OutputFormat::Text => print!("{}", render_diff(&script, score)),
        OutputFormat::Json => {
            let out = json!({
                "items": &script,
                "summary": summarize(&script),
                "similarity": score,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Html => println!("{}", to_html(&script, escape_html)),
    }
    Ok(())
}

fn cmd_similarity(args: SimilarityArgs, format: OutputFormat) -> anyhow::Result<()> {
    let score = similarity(&read_text(&args.old)?, &read_text(&args.new)?);
    match format {
        OutputFormat::Json => println!("{}", json!({ "similarity": score })),
        _ => println!("{score}%"),
    }
    Ok(())
}

fn cmd_inline(args: InlineArgs, format: OutputFormat) -> anyhow::Result<()> {
    let runs = diff_chars(&args.old_line, &args.new_line);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&runs)?),
        _ => print!("{}", render_inline(&runs)),
    }
    Ok(())
}

fn open_library(data_dir: &Path) -> anyhow::Result<Library<FsPromptStore>> {
    let store = FsPromptStore::open(data_dir)
        .with_context(|| format!("cannot open data directory {}", data_dir.display()))?;
    Ok(Library::new(store))
}

fn cmd_list(args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let prompts = open_library(&args.data_dir)?.list()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&prompts)?),
        _ if prompts.is_empty() => println!("No prompts."),
        _ => print!("{}", render_list(&prompts)),
    }
    Ok(())
}

fn cmd_log(args: LogArgs, format: OutputFormat) -> anyhow::Result<()> {
    let prompt = open_library(&args.data_dir)?.get(&args.id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&prompt.history)?),
        _ => print!("{}", render_log(&prompt)),
    }
    Ok(())
}

// ---- Rendering ----

fn render_diff(script: &DiffScript, score: u8) -> String {
    let mut out = String::new();
    for item in script {
        let line = format!("{:>4} {}", item.line_number, item.content);
        let line = match item.kind {
            DiffKind::Added => format!("{} {}", "+".green(), line.green()),
            DiffKind::Removed => format!("{} {}", "-".red(), line.red()),
            DiffKind::Unchanged => format!("  {line}"),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&format!(
        "\n{}  {}\n",
        summarize(script).bold(),
        format!("{score}% similar").cyan()
    ));
    out
}

fn render_inline(runs: &[CharDiff]) -> String {
    let mut old = String::new();
    let mut new = String::new();
    for run in runs {
        match run.kind {
            DiffKind::Unchanged => {
                old.push_str(&run.text);
                new.push_str(&run.text);
            }
            DiffKind::Removed => old.push_str(&run.text.red().strikethrough().to_string()),
            DiffKind::Added => new.push_str(&run.text.green().underline().to_string()),
        }
    }
    format!("{} {old}\n{} {new}\n", "-".red(), "+".green())
}

fn render_list(prompts: &[Prompt]) -> String {
    let mut out = String::new();
    for prompt in prompts {
        out.push_str(&format!(
            "{}  {}  {} versions  updated {}\n",
            prompt.id.yellow(),
            prompt.title.bold(),
            prompt.history.len() + 1,
            prompt.updated_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
        ));
    }
    out
}

fn render_log(prompt: &Prompt) -> String {
    let mut out = format!("{} {}\n", prompt.title.bold(), prompt.id.dimmed());
    out.push_str(&format!(
        "  {}  {}  ({})\n",
        "current".green().bold(),
        prompt.updated_at.format("%Y-%m-%d %H:%M:%S"),
        "working copy".dimmed()
    ));
    for entry in prompt.history.iter().rev() {
        out.push_str(&format!(
            "  {}  {}  {}\n",
            format!("v{:<6}", entry.version).yellow(),
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.changes
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_store::{NewPrompt, PromptPatch};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn diff_rendering_marks_lines() {
        plain();
        let script = diff_lines("a\nb\nc", "a\nx\nc");
        let out = render_diff(&script, 67);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "     1 a");
        assert_eq!(lines[1], "-    2 b");
        assert_eq!(lines[2], "+    2 x");
        assert!(out.contains("+1 lines, -1 lines  67% similar"));
    }

    #[test]
    fn inline_rendering_splits_sides() {
        plain();
        let out = render_inline(&diff_chars("cat", "cut"));
        assert_eq!(out, "- cat\n+ cut\n");
    }

    #[test]
    fn log_lists_newest_first() {
        plain();
        let dir = tempfile::tempdir().unwrap();
        let lib = open_library(dir.path()).unwrap();
        let prompt = lib
            .create(NewPrompt {
                title: Some("Greeting".into()),
                content: Some("hi".into()),
                tags: None,
            })
            .unwrap();
        for content in ["hi\nthere", "hello\nthere"] {
            lib.update(
                &prompt.id,
                PromptPatch {
                    content: Some(content.into()),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let out = render_log(&lib.get(&prompt.id).unwrap());
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Greeting"));
        assert!(lines[1].contains("current"));
        assert!(lines[2].contains("v1"));
        assert!(lines[2].ends_with("+1 lines, -1 lines"));
        assert!(lines[3].ends_with("+1 lines"));
    }

    #[test]
    fn list_counts_versions() {
        plain();
        let mut prompt = Prompt::new("p1", "Greeting", "hi", vec![]);
        prompt.history.push(shelf_store::HistoryEntry {
            version: 0,
            content: String::new(),
            timestamp: prompt.updated_at,
            changes: String::new(),
        });
        let out = render_list(&[prompt]);
        assert!(out.starts_with("p1  Greeting  2 versions"));
    }

    #[test]
    fn html_format_is_diff_only() {
        let cli = <Cli as clap::Parser>::try_parse_from([
            "shelf", "--format", "html", "similarity", "a", "b",
        ])
        .unwrap();
        assert!(run_command(cli).is_err());
    }
}
