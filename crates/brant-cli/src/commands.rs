pub mod classify;
pub mod configure;
pub mod render;
pub mod session;
pub mod stream;

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Reads the input document from a file, or stdin when no file is given.
pub fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("could not read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("could not read stdin")?;
            Ok(text)
        }
    }
}
