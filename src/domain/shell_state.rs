/// Which screen the shell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellView {
    #[default]
    Rooms,
    Conversation,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    view: ShellView,
    visible_pages: usize,
    pending_image: Option<String>,
    seen_revision: u64,
    notices: Vec<String>,
    needs_redraw: bool,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: true,
            view: ShellView::default(),
            visible_pages: 1,
            pending_image: None,
            seen_revision: 0,
            notices: Vec::new(),
            needs_redraw: true,
        }
    }
}

impl ShellState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn view(&self) -> ShellView {
        self.view
    }

    /// Switches screens. Entering a conversation starts at its newest page.
    pub fn show(&mut self, view: ShellView) {
        if view == ShellView::Conversation && self.view != ShellView::Conversation {
            self.visible_pages = 1;
        }
        self.view = view;
        self.needs_redraw = true;
    }

    /// Number of history pages currently shown for the open room.
    pub fn visible_pages(&self) -> usize {
        self.visible_pages
    }

    pub fn show_older_page(&mut self) {
        self.visible_pages = self.visible_pages.saturating_add(1);
        self.needs_redraw = true;
    }

    pub fn reset_pages(&mut self) {
        self.visible_pages = 1;
    }

    pub fn pending_image(&self) -> Option<&str> {
        self.pending_image.as_deref()
    }

    pub fn attach_image(&mut self, image: String) {
        self.pending_image = Some(image);
    }

    pub fn take_pending_image(&mut self) -> Option<String> {
        self.pending_image.take()
    }

    /// Records `revision` and returns whether it differs from the last one seen.
    pub fn observe_revision(&mut self, revision: u64) -> bool {
        let changed = revision != self.seen_revision;
        self.seen_revision = revision;
        changed
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn notify(&mut self, notice: impl Into<String>) {
        self.notices.push(notice.into());
        self.needs_redraw = true;
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Clears notices and the redraw flag once a frame has been written.
    pub fn mark_drawn(&mut self) {
        self.notices.clear();
        self.needs_redraw = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn older_pages_accumulate_until_reset() {
        let mut state = ShellState::default();
        state.show_older_page();
        state.show_older_page();

        assert_eq!(state.visible_pages(), 3);

        state.reset_pages();
        assert_eq!(state.visible_pages(), 1);
    }

    #[test]
    fn entering_a_conversation_starts_at_newest_page() {
        let mut state = ShellState::default();
        state.show(ShellView::Conversation);
        state.show_older_page();

        state.show(ShellView::Conversation);
        assert_eq!(state.visible_pages(), 2);

        state.show(ShellView::Rooms);
        state.show(ShellView::Conversation);
        assert_eq!(state.visible_pages(), 1);
    }

    #[test]
    fn pending_image_is_consumed_once() {
        let mut state = ShellState::default();
        state.attach_image("data:image/png;base64,AA==".to_owned());

        assert!(state.take_pending_image().is_some());
        assert!(state.take_pending_image().is_none());
    }

    #[test]
    fn revision_changes_are_reported_once() {
        let mut state = ShellState::default();

        assert!(state.observe_revision(1));
        assert!(!state.observe_revision(1));
        assert!(state.observe_revision(2));
    }

    #[test]
    fn drawing_clears_notices() {
        let mut state = ShellState::default();
        state.mark_drawn();
        assert!(!state.needs_redraw());

        state.notify("Chatroom created");
        assert!(state.needs_redraw());
        assert_eq!(state.notices(), ["Chatroom created".to_owned()]);

        state.mark_drawn();
        assert!(state.notices().is_empty());
        assert!(!state.needs_redraw());
    }
}
