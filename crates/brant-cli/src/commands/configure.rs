use anyhow::Result;
use console::style;

use crate::settings::{load_settings, save_settings, Settings, ThemeChoice};

pub fn handle_configure() -> Result<()> {
    cliclack::intro(style(" configure-brant ").on_cyan().black())?;

    // A corrupt settings file should not block reconfiguring it
    let existing = load_settings().unwrap_or_default();

    let theme = cliclack::select("Which terminal theme should renders use?")
        .initial_value(existing.theme)
        .items(&[
            (ThemeChoice::Dark, "Dark", "zenburn syntax theme"),
            (ThemeChoice::Light, "Light", "GitHub syntax theme"),
        ])
        .interact()?;

    let chunk_default = existing.chunk_size.to_string();
    let chunk_size: usize = cliclack::input("Default chunk size for `brant stream` (characters):")
        .default_input(&chunk_default)
        .interact()?;

    let delay_default = existing.delay_ms.to_string();
    let delay_ms: u64 = cliclack::input("Default delay between chunks (milliseconds):")
        .default_input(&delay_default)
        .interact()?;

    let settings = Settings {
        theme,
        chunk_size: chunk_size.max(1),
        delay_ms,
    };
    let path = save_settings(&settings)?;
    cliclack::outro(format!("Settings saved to: {:?}", path))?;

    Ok(())
}
