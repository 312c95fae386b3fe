use crate::domain::{
    chat::Chatroom,
    chat_state::ChatState,
    format::{format_date, format_time},
    message::{Message, Sender},
    shell_state::{ShellState, ShellView},
};

use super::styles::{Tone, ViewLine};

const PREVIEW_MAX_CHARS: usize = 48;
const TYPING_LINE: &str = "Gemini is typing...";

/// Starter prompts offered while there are no chatrooms.
const QUICK_STARTS: [(&str, &str); 4] = [
    ("Creative Writing", "Help me write a short story"),
    ("Learn & Explore", "Explain a complex topic simply"),
    ("Brainstorm Ideas", "Generate creative solutions"),
    ("Problem Solving", "Work through challenges together"),
];

const HELP_LINES: [(&str, &str); 13] = [
    ("<text>", "send a message (opens a new chatroom if none is open)"),
    ("/new <title>", "create a chatroom and open it"),
    ("/rooms", "show the chatroom list"),
    ("/open <n|id>", "open a chatroom by list position or id"),
    ("/close", "leave the open chatroom"),
    ("/delete <n|id>", "delete a chatroom"),
    ("/search [text]", "filter chatrooms by title, empty to clear"),
    ("/more", "show older messages"),
    ("/image <path>", "attach an image to the next message"),
    ("/copy <n>", "copy message n to the clipboard"),
    ("/theme", "toggle dark mode"),
    ("/logout", "sign out and clear chat history"),
    ("/quit", "leave rchat"),
];

pub fn render(state: &ShellState, chat: &ChatState) -> Vec<ViewLine> {
    let mut lines = match state.view() {
        ShellView::Rooms => render_rooms(chat),
        ShellView::Conversation => match open_room(chat) {
            Some(room) => render_conversation(state, chat, room),
            None => render_rooms(chat),
        },
        ShellView::Help => render_help(),
    };

    if !state.notices().is_empty() {
        lines.push(ViewLine::new(Tone::Body, ""));
        lines.extend(
            state
                .notices()
                .iter()
                .map(|notice| ViewLine::new(Tone::Notice, format!("» {notice}"))),
        );
    }

    lines
}

fn open_room(chat: &ChatState) -> Option<&Chatroom> {
    chat.current_chatroom().and_then(|id| chat.chatroom(id))
}

fn render_rooms(chat: &ChatState) -> Vec<ViewLine> {
    let rooms = chat.filtered_chatrooms();
    let query = chat.search_query().trim();

    let heading = if query.is_empty() {
        format!("Chatrooms ({})", rooms.len())
    } else {
        format!("Chatrooms matching \"{query}\" ({})", rooms.len())
    };
    let mut lines = vec![ViewLine::new(Tone::Heading, heading)];

    if chat.chatrooms().is_empty() {
        lines.push(ViewLine::new(
            Tone::Muted,
            "No chatrooms yet. Type a message to start one, or try:",
        ));
        lines.extend(
            QUICK_STARTS
                .iter()
                .map(|(title, hint)| ViewLine::new(Tone::Body, format!("  • {title}: {hint}"))),
        );
    } else if rooms.is_empty() {
        lines.push(ViewLine::new(
            Tone::Muted,
            "No chatrooms match. Use /search to clear the filter.",
        ));
    }

    for (position, room) in rooms.iter().enumerate() {
        lines.push(ViewLine::new(
            Tone::Body,
            format!(
                "{:>3}. {}  ({}, {})",
                position + 1,
                room.title,
                message_count_label(room.message_count),
                format_date(room.created_at)
            ),
        ));
        if let Some(last) = &room.last_message {
            lines.push(ViewLine::new(
                Tone::Muted,
                format!(
                    "     {}: {}",
                    last.sender.display_name(),
                    truncate(&last.display_content(), PREVIEW_MAX_CHARS)
                ),
            ));
        }
    }

    lines.push(ViewLine::new(Tone::Body, ""));
    lines.push(ViewLine::new(
        Tone::Muted,
        "/new <title>  /open <n>  /search <text>  /help",
    ));
    lines
}

fn render_conversation(state: &ShellState, chat: &ChatState, room: &Chatroom) -> Vec<ViewLine> {
    let messages = chat.recent_messages(&room.id, state.visible_pages());
    let hidden = chat.messages(&room.id).len() - messages.len();

    let mut lines = vec![ViewLine::new(Tone::Heading, format!("── {} ──", room.title))];

    if hidden > 0 {
        lines.push(ViewLine::new(
            Tone::Muted,
            format!("  {hidden} older messages hidden, /more to load"),
        ));
    }
    if messages.is_empty() {
        lines.push(ViewLine::new(
            Tone::Muted,
            "No messages yet. Say hello to Gemini.",
        ));
    }

    let mut current_day: Option<String> = None;
    for (index, message) in messages.iter().enumerate() {
        let day = format_date(message.timestamp);
        if current_day.as_deref() != Some(day.as_str()) {
            lines.push(ViewLine::new(Tone::Muted, format!("  ─ {day} ─")));
            current_day = Some(day);
        }
        push_message(&mut lines, index + 1, message);
    }

    if chat.is_typing() {
        lines.push(ViewLine::new(Tone::Typing, TYPING_LINE));
    }

    lines.push(ViewLine::new(Tone::Body, ""));
    if state.pending_image().is_some() {
        lines.push(ViewLine::new(
            Tone::Notice,
            "An image is attached to your next message",
        ));
    }
    lines.push(ViewLine::new(
        Tone::Muted,
        "Type a message  /image <path>  /copy <n>  /more  /close  /help",
    ));
    lines
}

fn push_message(lines: &mut Vec<ViewLine>, number: usize, message: &Message) {
    let tone = match message.sender {
        Sender::User => Tone::UserSender,
        Sender::Ai => Tone::AssistantSender,
    };
    lines.push(ViewLine::new(
        tone,
        format!(
            "[{number}] {} · {}",
            message.sender.display_name(),
            format_time(message.timestamp)
        ),
    ));

    if message.has_image() {
        lines.push(ViewLine::new(Tone::Muted, "    [Image]"));
    }
    lines.extend(
        message
            .content
            .lines()
            .map(|line| ViewLine::new(Tone::Body, format!("    {line}"))),
    );
}

fn render_help() -> Vec<ViewLine> {
    let mut lines = vec![ViewLine::new(Tone::Heading, "Commands")];
    lines.extend(
        HELP_LINES
            .iter()
            .map(|(usage, about)| ViewLine::new(Tone::Body, format!("  {usage:<16} {about}"))),
    );
    lines.push(ViewLine::new(Tone::Body, ""));
    lines.push(ViewLine::new(Tone::Muted, "/rooms to go back"));
    lines
}

fn message_count_label(count: usize) -> String {
    match count {
        1 => "1 message".to_owned(),
        count => format!("{count} messages"),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let head: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{head}...")
}
