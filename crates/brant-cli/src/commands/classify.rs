use std::path::PathBuf;

use anyhow::Result;

use brant::classify::classify;

use crate::commands::read_input;

/// Prints the engine's verdict for a complete message. Why a candidate
/// envelope was rejected is only ever visible at debug log level.
pub fn handle_classify(file: Option<PathBuf>) -> Result<()> {
    let text = read_input(file)?;
    let content = classify(&text);
    println!("{}", serde_json::to_string_pretty(&content)?);
    Ok(())
}
