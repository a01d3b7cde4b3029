use bat::WrappingMode;
use console::style;

use brant::dispatch::ViewRegistry;
use brant::models::message::{Message, MessageContent};
use brant::render::{self, PreviewSurface};

use crate::settings::ThemeChoice;

pub fn bat_theme(theme: ThemeChoice) -> &'static str {
    match theme {
        ThemeChoice::Light => "GitHub",
        ThemeChoice::Dark => "zenburn",
    }
}

pub fn print_html(html: &str, theme: ThemeChoice) {
    bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(html.as_bytes()))
        .theme(bat_theme(theme))
        .language("html")
        .wrapping_mode(WrappingMode::Character)
        .print()
        .unwrap();
    println!();
}

/// Pretty-prints HTML fence bodies to the terminal: an isolated surface
/// with no scripting context at all.
pub struct TerminalPreview {
    pub theme: ThemeChoice,
}

impl PreviewSurface for TerminalPreview {
    fn present(&self, code: &str, _language: &str) {
        println!("{}", style("── html preview ─────────────────").dim());
        print_html(code, self.theme);
    }
}

/// Shows a resolved message: the typed view for rich content, the markdown
/// render (plus any fence previews) for prose.
pub fn show_final(message: &Message, theme: ThemeChoice, registry: &ViewRegistry) {
    match &message.content {
        MessageContent::Rich { content } => {
            println!(
                "{}",
                style(format!("resolved as rich content: {}", content.kind())).green()
            );
            print_html(&registry.render(content), theme);
        }
        MessageContent::PlainText { text } => {
            println!("{}", style("resolved as plain text").dim());
            let document = render::parse(text);
            print_html(&render::html::document_to_html(&document), theme);
            render::offer_previews(&document, &TerminalPreview { theme });
        }
    }
    if !message.sources.is_empty() {
        println!("{}", style("sources:").dim());
        for source in &message.sources {
            println!("  {} <{}>", source.title, style(&source.uri).dim());
        }
    }
}
