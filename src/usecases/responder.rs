use rand::seq::SliceRandom;

pub const GREETING_REPLY: &str = "Hello! I'm Gemini, your AI assistant. How can I help you today?";
pub const WELLBEING_REPLY: &str =
    "I'm doing great, thank you for asking! I'm here and ready to help with whatever you need.";

pub const CANNED_RESPONSES: [&str; 8] = [
    "That's an interesting question! Let me think about that for a moment.",
    "I understand what you're asking. Here's my perspective on that topic.",
    "Great point! I'd like to elaborate on that idea.",
    "Thanks for sharing that with me. I have some thoughts on this.",
    "That's a fascinating topic. Let me provide you with some insights.",
    "I appreciate you bringing this up. Here's what I think about it.",
    "Excellent question! This is something I've been thinking about too.",
    "I see where you're coming from. Let me offer a different perspective.",
];

/// Produces the assistant's reply to a user message.
pub trait Responder: Send + Sync {
    fn respond(&self, message: &str) -> String;
}

/// Keyword rules first, then a random canned line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedResponder;

impl Responder for CannedResponder {
    fn respond(&self, message: &str) -> String {
        let lowered = message.to_lowercase();

        if has_word(&lowered, "hello") || has_word(&lowered, "hi") {
            return GREETING_REPLY.to_owned();
        }
        if lowered.contains("how are you") {
            return WELLBEING_REPLY.to_owned();
        }

        CANNED_RESPONSES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(CANNED_RESPONSES[0])
            .to_owned()
    }
}

fn has_word(text: &str, word: &str) -> bool {
    text.split(|ch: char| !ch.is_alphanumeric())
        .any(|token| token == word)
}
