use std::path::PathBuf;

use anyhow::Result;

use brant::render;

use crate::commands::read_input;
use crate::output::{print_html, TerminalPreview};
use crate::settings::load_settings;

pub fn handle_render(file: Option<PathBuf>, raw: bool) -> Result<()> {
    let settings = load_settings()?;
    let text = read_input(file)?;
    let document = render::parse(&text);
    let html = render::html::document_to_html(&document);
    if raw {
        println!("{html}");
    } else {
        print_html(&html, settings.theme);
        render::offer_previews(
            &document,
            &TerminalPreview {
                theme: settings.theme,
            },
        );
    }
    Ok(())
}
