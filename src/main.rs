use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use listquill::config::Config;
use listquill::document::tree::Document;
use listquill::editor::state::EditorState;
use listquill::file::loader::{load_document, load_from_stdin};
use listquill::file::saver::serialize_document;

/// ListQuill - nested list formats for a structured rich-text document tree
#[derive(Parser)]
#[command(name = "listquill")]
#[command(version)]
#[command(about = "Restructure nested lists in markup documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Print a document as normalized markup
    Show {
        /// Markup file to read ("-" for stdin)
        file: String,

        /// Print the structural outline as JSON instead of markup
        #[arg(long)]
        json: bool,
    },

    /// Apply editing commands to a document
    Apply {
        /// Markup file to read ("-" for stdin)
        file: String,

        /// Command to run, e.g. "indent 0.1" (repeatable, applied in order)
        #[arg(short, long = "command", required = true)]
        commands: Vec<String>,

        /// Write the result to this file instead of stdout
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Overwrite the input file
        #[arg(short, long)]
        in_place: bool,
    },
}

fn init_tracing(config: &Config) -> Result<()> {
    let directive = config
        .log_filter
        .parse::<Directive>()
        .with_context(|| format!("Invalid log_filter '{}'", config.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn load(file: &str) -> Result<Document> {
    if file == "-" {
        load_from_stdin()
    } else {
        load_document(file).with_context(|| format!("Failed to load {file}"))
    }
}

fn print(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();
    init_tracing(&config)?;

    match cli.command {
        CliCommand::Show { file, json } => {
            let doc = load(&file)?;
            if json {
                let outline = serde_json::to_string_pretty(&doc.outline())?;
                print(&format!("{outline}\n"))?;
            } else {
                print(&serialize_document(&doc, config.indent_size))?;
            }
        }
        CliCommand::Apply {
            file,
            commands,
            output,
            in_place,
        } => {
            if in_place && file == "-" {
                anyhow::bail!("--in-place needs a file, not stdin");
            }
            let doc = load(&file)?;
            let mut state = EditorState::new(doc, config.clone());
            for line in &commands {
                state.apply_str(line)?;
            }
            info!(count = commands.len(), "applied commands");

            let target = match (output, in_place) {
                (Some(path), _) => Some(path),
                (None, true) => Some(PathBuf::from(&file)),
                (None, false) => None,
            };
            match target {
                Some(path) => save(&mut state, &path)?,
                None => print(&serialize_document(state.document(), config.indent_size))?,
            }
        }
    }
    Ok(())
}

fn save(state: &mut EditorState, path: &Path) -> Result<()> {
    state
        .save(Some(path))
        .with_context(|| format!("Failed to save {}", path.display()))
}
