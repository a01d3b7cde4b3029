use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use console::style;
use futures::{stream, StreamExt};

use brant::dispatch::ViewRegistry;
use brant::models::message::ChunkPayload;
use brant::stream::{drive, StreamChunkSource, StreamEvent};

use crate::commands::read_input;
use crate::output::show_final;
use crate::settings::load_settings;

/// Replays a local file through the accumulator as synthetic chunks, the
/// way a transport would deliver them.
pub async fn handle_stream(
    file: Option<PathBuf>,
    chunk_size: Option<usize>,
    delay_ms: Option<u64>,
) -> Result<()> {
    let settings = load_settings()?;
    let chunk_size = chunk_size.unwrap_or(settings.chunk_size).max(1);
    let delay = Duration::from_millis(delay_ms.unwrap_or(settings.delay_ms));
    let text = read_input(file)?;

    let chunks = chop(&text, chunk_size);
    let total = chunks.len();
    let source = StreamChunkSource::new(stream::iter(chunks.into_iter().map(Ok)));
    let registry = ViewRegistry::with_defaults();

    let mut seen = 0;
    let mut events = drive(source);
    while let Some(event) = events.next().await {
        match event? {
            StreamEvent::Render(snapshot) => {
                seen += 1;
                eprint!(
                    "\r{}",
                    style(format!(
                        "chunk {seen}/{total} · {} blocks",
                        snapshot.document.blocks.len()
                    ))
                    .dim()
                );
                io::stderr().flush().expect("Failed to flush stderr");
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            StreamEvent::Resolved(message) => {
                eprintln!();
                show_final(&message, settings.theme, &registry);
            }
        }
    }
    Ok(())
}

fn chop(text: &str, size: usize) -> Vec<ChunkPayload> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|chunk| ChunkPayload::text(chunk.iter().collect::<String>()))
        .collect()
}
