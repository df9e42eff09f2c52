use ratatui::widgets::{ListItem, ListState, ScrollbarState};

/// A bounded list of items, newest first, with list and scrollbar state
/// kept in step.
pub struct ScrollableList {
    max_items: usize,
    pub list_items: Vec<ListItem<'static>>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
}

impl ScrollableList {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            list_items: Vec::new(),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::default(),
        }
    }

    /// Add an item at the bottom of a bottom-to-top list, dropping the
    /// oldest item once full.
    pub fn push(&mut self, item: ListItem<'static>) {
        self.list_items.insert(0, item);
        self.list_items.truncate(self.max_items);
        self.scroll_state = self.scroll_state.content_length(self.list_items.len());
        self.jump_to_last();
    }

    /// Oldest item.
    pub fn jump_to_first(&mut self) {
        let idx = self.list_items.len().saturating_sub(1);
        self.select(idx);
    }

    /// Newest item.
    pub fn jump_to_last(&mut self) {
        self.select(0);
    }

    pub fn move_up(&mut self) {
        let idx = self.list_state.selected().unwrap_or(0).saturating_add(1);
        self.select(idx.min(self.list_items.len().saturating_sub(1)));
    }

    pub fn move_down(&mut self) {
        let idx = self.list_state.selected().unwrap_or(0).saturating_sub(1);
        self.select(idx);
    }

    fn select(&mut self, idx: usize) {
        self.list_state.select(Some(idx));
        self.scroll_state = self
            .scroll_state
            .position(self.list_items.len().saturating_sub(1).saturating_sub(idx));
    }
}

/// Single-line text input with a character cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub value: String,
    /// Cursor position in characters.
    pub char_idx: usize,
}

impl UserInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_idx(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.char_idx)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn input(&mut self, c: char) {
        let idx = self.byte_idx();
        self.value.insert(idx, c);
        self.char_idx += 1;
    }

    pub fn backspace(&mut self) {
        if self.char_idx > 0 {
            self.char_idx -= 1;
            let idx = self.byte_idx();
            self.value.remove(idx);
        }
    }

    pub fn delete(&mut self) {
        if self.char_idx < self.char_count() {
            let idx = self.byte_idx();
            self.value.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.char_idx = self.char_idx.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.char_idx = (self.char_idx + 1).min(self.char_count());
    }

    pub fn jump_to_first(&mut self) {
        self.char_idx = 0;
    }

    pub fn jump_to_last(&mut self) {
        self.char_idx = self.char_count();
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.jump_to_last();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> UserInput {
        let mut input = UserInput::new();
        text.chars().for_each(|c| input.input(c));
        input
    }

    #[test]
    fn test_input_inserts_at_cursor() {
        let mut input = typed("ac");
        input.move_left();
        input.input('b');
        assert_eq!(input.value, "abc");
        assert_eq!(input.char_idx, 2);
    }

    #[test]
    fn test_backspace_and_delete_handle_multibyte_chars() {
        let mut input = typed("crédito");
        input.jump_to_first();
        input.move_right();
        input.move_right();
        input.move_right();
        input.backspace();
        assert_eq!(input.value, "crdito");

        input.delete();
        assert_eq!(input.value, "crito");
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut input = typed("ab");
        input.move_right();
        assert_eq!(input.char_idx, 2);
        input.jump_to_first();
        input.move_left();
        assert_eq!(input.char_idx, 0);
        input.backspace();
        assert_eq!(input.value, "ab");
    }

    #[test]
    fn test_set_moves_cursor_to_end() {
        let mut input = typed("admin");
        input.jump_to_first();
        input.set("Crédito");
        assert_eq!(input.char_idx, 7);
    }

    #[test]
    fn test_scrollable_list_is_bounded() {
        let mut list = ScrollableList::new(2);
        for line in ["one", "two", "three"] {
            list.push(ListItem::new(line));
        }
        assert_eq!(list.list_items.len(), 2);
        assert_eq!(list.list_state.selected(), Some(0));

        list.move_up();
        list.move_up();
        assert_eq!(list.list_state.selected(), Some(1));
        list.jump_to_last();
        assert_eq!(list.list_state.selected(), Some(0));
    }
}
