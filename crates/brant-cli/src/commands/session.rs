use anyhow::Result;
use console::style;
use rustyline::error::ReadlineError;

use brant::dispatch::ViewRegistry;
use brant::models::message::ChunkPayload;
use brant::stream::StreamAccumulator;

use crate::output::{print_html, show_final};
use crate::settings::{load_settings, ThemeChoice};

const PROMPT: &str = "\x1b[1m\x1b[38;5;30m(brant)> \x1b[0m";

/// Interactive loop: each line becomes a chunk, the live render is shown
/// after every append, and `/done` resolves the accumulated message.
pub async fn handle_session() -> Result<()> {
    let settings = load_settings()?;
    let mut theme = settings.theme;
    let registry = ViewRegistry::with_defaults();
    let mut accumulator = StreamAccumulator::new();
    let mut editor = rustyline::DefaultEditor::new()?;

    println!(
        "{}",
        style("Type text to stream it into a message. /? for commands.").dim()
    );

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line);

        if line.eq_ignore_ascii_case("/exit") || line.eq_ignore_ascii_case("/quit") {
            break;
        } else if line.eq_ignore_ascii_case("/t") {
            theme = match theme {
                ThemeChoice::Light => {
                    println!("Switching to Dark theme");
                    ThemeChoice::Dark
                }
                ThemeChoice::Dark => {
                    println!("Switching to Light theme");
                    ThemeChoice::Light
                }
            };
        } else if line.eq_ignore_ascii_case("/?") || line.eq_ignore_ascii_case("/help") {
            println!("Commands:");
            println!("/done - Resolve the accumulated message");
            println!("/new - Discard the accumulated message and start over");
            println!("/t - Toggle Light/Dark theme");
            println!("/? | /help - Display this help message");
            println!("/exit | /quit - Exit the session");
        } else if line.eq_ignore_ascii_case("/new") {
            accumulator = StreamAccumulator::new();
            println!("{}", style("Started a new message").dim());
        } else if line.eq_ignore_ascii_case("/done") {
            match accumulator.complete() {
                Ok(message) => {
                    show_final(&message, theme, &registry);
                    accumulator = StreamAccumulator::new();
                }
                Err(e) => println!("{}", style(e).dim()),
            }
        } else {
            match accumulator.append(ChunkPayload::text(format!("{line}\n"))) {
                Ok(snapshot) => print_html(&snapshot.html(), theme),
                Err(e) => println!("{}", style(format!("{} (use /new)", e)).dim()),
            }
        }
    }
    Ok(())
}
