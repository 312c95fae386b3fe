use crate::infra::contracts::Clipboard;

const CLIPBOARD_UNAVAILABLE: &str = "CLIPBOARD_UNAVAILABLE";

/// System clipboard backed by `arboard`. A fresh handle is opened per copy so
/// a missing display server only affects the copy that needed it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy_text(&self, text: &str) -> bool {
        let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));

        match result {
            Ok(()) => {
                tracing::debug!(chars = text.chars().count(), "text copied to clipboard");
                true
            }
            Err(error) => {
                tracing::warn!(
                    code = CLIPBOARD_UNAVAILABLE,
                    error = %error,
                    "failed to copy text to clipboard"
                );
                false
            }
        }
    }
}
