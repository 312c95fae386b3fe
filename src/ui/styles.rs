//! Style definitions for shell output.

use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::style::{Attribute, Color, ContentStyle, Stylize};

use crate::usecases::contracts::PresentationSink;

static DARK_MODE: AtomicBool = AtomicBool::new(false);

/// Process-wide dark mode flag, driven by the theme store.
#[derive(Debug, Default)]
pub struct GlobalDarkMode;

impl GlobalDarkMode {
    pub fn is_dark() -> bool {
        DARK_MODE.load(Ordering::Relaxed)
    }
}

impl PresentationSink for GlobalDarkMode {
    fn apply_dark_mode(&self, dark: bool) {
        DARK_MODE.store(dark, Ordering::Relaxed);
        tracing::debug!(dark, "presentation theme applied");
    }
}

/// Semantic role of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Body,
    Muted,
    UserSender,
    AssistantSender,
    Typing,
    Notice,
}

/// One line of shell output with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLine {
    pub tone: Tone,
    pub text: String,
}

impl ViewLine {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

pub fn style_for(tone: Tone, dark: bool) -> ContentStyle {
    let (text, muted) = if dark {
        (Color::White, Color::Grey)
    } else {
        (Color::Black, Color::DarkGrey)
    };
    let style = ContentStyle::new();

    match tone {
        Tone::Heading => style.with(text).attribute(Attribute::Bold),
        Tone::Body => style.with(text),
        Tone::Muted => style.with(muted),
        Tone::UserSender => style.with(Color::Blue).attribute(Attribute::Bold),
        Tone::AssistantSender => style.with(Color::Magenta).attribute(Attribute::Bold),
        Tone::Typing => style.with(muted).attribute(Attribute::Italic),
        Tone::Notice => style.with(Color::Yellow),
    }
}

/// Renders `line` with the escape codes of its tone.
pub fn paint(line: &ViewLine, dark: bool) -> String {
    if line.text.is_empty() {
        return String::new();
    }
    style_for(line.tone, dark).apply(line.text.as_str()).to_string()
}
