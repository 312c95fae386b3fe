use std::path::Path;

use anyhow::Result;

use crate::{
    domain::{
        events::{AppEvent, ShellCommand},
        format::chatroom_title_from,
        message::NewMessage,
        shell_state::{ShellState, ShellView},
        validation,
    },
    infra::{contracts::Clipboard, inline_image},
    usecases::{auth_store::AuthStore, chat_store::ChatStore, theme_store::ThemeStore},
};

use super::contracts::ShellOrchestrator;

pub struct DefaultShellOrchestrator<'a, C>
where
    C: Clipboard,
{
    state: ShellState,
    chat: &'a ChatStore,
    auth: &'a AuthStore,
    theme: &'a ThemeStore,
    clipboard: C,
}

impl<'a, C> DefaultShellOrchestrator<'a, C>
where
    C: Clipboard,
{
    pub fn new(chat: &'a ChatStore, auth: &'a AuthStore, theme: &'a ThemeStore, clipboard: C) -> Self {
        let mut state = ShellState::default();
        if chat.current_chatroom().is_some() {
            state.show(ShellView::Conversation);
        }
        state.observe_revision(chat.revision());

        Self {
            state,
            chat,
            auth,
            theme,
            clipboard,
        }
    }

    fn handle_command(&mut self, command: ShellCommand) {
        match command {
            ShellCommand::NewRoom(title) => self.create_room(&title),
            ShellCommand::ListRooms => self.state.show(ShellView::Rooms),
            ShellCommand::Open(target) => self.open_room(&target),
            ShellCommand::Close => {
                self.chat.set_current_chatroom(None);
                self.state.show(ShellView::Rooms);
            }
            ShellCommand::Delete(target) => self.delete_room(&target),
            ShellCommand::Search(query) => {
                self.chat.set_search_query(query);
                self.state.show(ShellView::Rooms);
            }
            ShellCommand::OlderMessages => self.show_older(),
            ShellCommand::Attach(path) => self.attach(&path),
            ShellCommand::Copy(index) => self.copy(index),
            ShellCommand::ToggleTheme => {
                let dark = self.theme.toggle_theme();
                self.state
                    .notify(if dark { "Dark mode on" } else { "Dark mode off" });
            }
            ShellCommand::Logout => {
                self.auth.logout();
                self.state.notify("Signed out. Run `rchat login` to sign in again.");
                self.state.stop();
            }
            ShellCommand::Help => self.state.show(ShellView::Help),
            ShellCommand::Send(text) => self.send(&text),
            ShellCommand::Unknown(line) => {
                self.state
                    .notify(format!("Unknown command: {line}. Type /help for the list."));
            }
        }
    }

    /// Resolves a 1-based position in the current room list or a room id.
    fn resolve_room(&self, target: &str) -> Option<String> {
        let rooms = self.chat.filtered_chatrooms();

        if let Ok(position) = target.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|index| rooms.get(index))
                .map(|room| room.id.clone());
        }

        self.chat
            .chatrooms()
            .into_iter()
            .find(|room| room.id == target)
            .map(|room| room.id)
    }

    fn create_room(&mut self, title: &str) {
        match self.chat.create_chatroom(title) {
            Ok(id) => {
                self.enter_room(id);
                self.state.notify(format!("Created chatroom \"{}\"", title.trim()));
            }
            Err(error) => self.state.notify(error.to_string()),
        }
    }

    fn open_room(&mut self, target: &str) {
        match self.resolve_room(target) {
            Some(id) => self.enter_room(id),
            None => self.state.notify(format!("No chatroom matches \"{target}\"")),
        }
    }

    fn enter_room(&mut self, id: String) {
        self.chat.set_current_chatroom(Some(id));
        self.state.reset_pages();
        self.state.show(ShellView::Conversation);
    }

    fn delete_room(&mut self, target: &str) {
        let Some(id) = self.resolve_room(target) else {
            self.state.notify(format!("No chatroom matches \"{target}\""));
            return;
        };

        if self.chat.delete_chatroom(&id) {
            self.state.notify("Chatroom deleted");
        }
        if self.state.view() == ShellView::Conversation && self.chat.current_chatroom().is_none() {
            self.state.show(ShellView::Rooms);
        } else {
            self.state.request_redraw();
        }
    }

    fn show_older(&mut self) {
        let Some(room) = self.open_room_id() else {
            self.state.notify("Open a chatroom first");
            return;
        };

        let next_page = self.state.visible_pages() + 1;
        if self.chat.load_messages(&room, next_page).is_empty() {
            self.state.notify("No older messages");
        } else {
            self.state.show_older_page();
        }
    }

    fn attach(&mut self, path: &Path) {
        match inline_image::load_data_url(path) {
            Ok(image) => {
                self.state.attach_image(image);
                self.state.notify(format!(
                    "Image {} attached to your next message",
                    path.display()
                ));
            }
            Err(error) => self.state.notify(error.to_string()),
        }
    }

    fn copy(&mut self, index: usize) {
        let Some(room) = self.open_room_id() else {
            self.state.notify("Open a chatroom first");
            return;
        };

        let pages = self.state.visible_pages();
        let messages = self.chat.read(|chat| chat.recent_messages(&room, pages));
        let Some(message) = index.checked_sub(1).and_then(|i| messages.get(i)) else {
            self.state.notify(format!("No message #{index} on screen"));
            return;
        };

        if self.clipboard.copy_text(&message.content) {
            self.state.notify("Message copied to clipboard");
        } else {
            self.state.notify("Failed to copy message");
        }
    }

    /// Sends to the open room, creating one titled after the text when none is open.
    fn send(&mut self, text: &str) {
        let room = match self.open_room_id() {
            Some(room) => room,
            None => {
                // A rejected first message must not leave an empty room behind.
                if let Err(error) = validation::validate_message(text) {
                    self.state.notify(error.to_string());
                    return;
                }
                match self.chat.create_chatroom(&chatroom_title_from(text)) {
                    Ok(id) => {
                        self.enter_room(id.clone());
                        id
                    }
                    Err(error) => {
                        self.state.notify(error.to_string());
                        return;
                    }
                }
            }
        };

        let image = self.state.take_pending_image();
        let draft = NewMessage::user(text).with_image(image.clone());

        match self.chat.add_message(&room, draft) {
            Ok(_) => {
                self.state.reset_pages();
                self.state.request_redraw();
            }
            Err(error) => {
                if let Some(image) = image {
                    self.state.attach_image(image);
                }
                self.state.notify(error.to_string());
            }
        }
    }

    /// The selected room, if it still exists.
    fn open_room_id(&self) -> Option<String> {
        self.chat
            .current_chatroom()
            .filter(|id| self.chat.read(|chat| chat.contains(id)))
    }
}

impl<C> ShellOrchestrator for DefaultShellOrchestrator<'_, C>
where
    C: Clipboard,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => {
                if self.state.observe_revision(self.chat.revision()) {
                    self.state.request_redraw();
                }
            }
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::Command(command) => {
                self.handle_command(command);
                self.state.observe_revision(self.chat.revision());
            }
        }

        Ok(())
    }
}
