use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;
mod settings;

#[derive(Parser)]
#[command(name = "brant", author, version, about = "Drive the brant rendering engine from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a complete markdown document to HTML
    Render {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,

        /// Print the HTML without syntax highlighting
        #[arg(long)]
        raw: bool,
    },
    /// Replay a file through the stream accumulator as synthetic chunks
    Stream {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,

        /// Characters per synthetic chunk
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Pause between chunks, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Print the classification verdict for a completed message as JSON
    Classify {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Feed a message chunk by chunk, interactively
    Session,
    /// Create or update the settings file
    Configure,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Render { file, raw } => commands::render::handle_render(file, raw),
        Command::Stream {
            file,
            chunk_size,
            delay_ms,
        } => commands::stream::handle_stream(file, chunk_size, delay_ms).await,
        Command::Classify { file } => commands::classify::handle_classify(file),
        Command::Session => commands::session::handle_session().await,
        Command::Configure => commands::configure::handle_configure(),
    }
}
