use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use markpad::app::App;
use markpad::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};

/// Buffer shown when no file is given.
const SAMPLE_DOCUMENT: &str = "\
# Welcome to markpad

Type on the left, see rendered markdown on the right.

## Formatting

Select text and press **Ctrl+B** for bold, *Ctrl+I* for italic, or
`Alt+C` for inline code. Alt+1 through Alt+6 set heading levels.

- Alt+U turns lines into a bullet list
- Alt+O numbers them instead
- Alt+Q quotes them

> Press F1 for the full list of shortcuts.

```
Alt+F wraps the selection in a code fence.
```

Press Ctrl+Y to copy, Ctrl+P to toggle this preview, Ctrl+Q to quit.
";

#[derive(Parser)]
#[command(
    name = "markpad",
    version,
    about = "Terminal markdown editor with live preview",
    long_about = None
)]
struct Cli {
    /// Markdown file to open; starts with a sample document when omitted
    file: Option<PathBuf>,

    /// Hide the preview pane
    #[arg(long)]
    no_preview: bool,

    /// Editor pane width as a percentage (10-90)
    #[arg(long, value_name = "PERCENT")]
    split: Option<u16>,

    /// Save the given flags as defaults and exit
    #[arg(long)]
    save: bool,

    /// Remove saved defaults and exit
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let cli_flags = ConfigFlags {
        no_preview: cli.no_preview,
        split: cli.split.filter(|p| (10..=90).contains(p)),
    };

    let global_path = global_config_path();
    let local_path = local_override_path();

    if cli.clear {
        clear_config_flags(&global_path)?;
        clear_config_flags(&local_path)?;
        println!("Cleared saved defaults");
        return Ok(());
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
        println!("Saved defaults to {}", global_path.display());
        return Ok(());
    }

    // The local rc overrides the global config; CLI flags win over both.
    let file_flags =
        load_config_flags(&global_path)?.union(&load_config_flags(&local_path)?);
    let flags = file_flags.union(&cli_flags);

    let (text, file_name) = match &cli.file {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());
            (text, name)
        }
        None => (SAMPLE_DOCUMENT.to_string(), None),
    };

    App::new(text)
        .with_file_name(file_name)
        .with_preview_visible(!flags.no_preview)
        .with_split_percent(flags.split.unwrap_or(50))
        .with_config_paths(global_path, local_path)
        .run()
        .context("Application error")
}
