//! Transient text input opened by the text tool.

use crate::input::Key;
use kurbo::Point;

/// Result of handling a key in the text entry.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEntryResult {
    /// Key was consumed; the buffer may have changed.
    Handled,
    /// User confirmed non-empty content.
    Commit(String),
    /// User dismissed the entry.
    Cancel,
    /// Key is not for the text entry (pass to other handlers).
    NotHandled,
}

/// A pending text entry anchored at the click point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextEntry {
    anchor: Point,
    buffer: String,
}

impl TextEntry {
    pub fn new(anchor: Point) -> Self {
        Self {
            anchor,
            buffer: String::new(),
        }
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Text typed so far.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn insert(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Handle a key press.
    ///
    /// Enter only commits when the trimmed content is non-empty; otherwise the
    /// entry stays open. Escape cancels regardless of content.
    pub fn handle_key(&mut self, key: &Key) -> TextEntryResult {
        match key {
            Key::Character(text) => {
                self.insert(text);
                TextEntryResult::Handled
            }
            Key::Backspace => {
                self.buffer.pop();
                TextEntryResult::Handled
            }
            Key::Enter => {
                if self.buffer.trim().is_empty() {
                    TextEntryResult::Handled
                } else {
                    TextEntryResult::Commit(self.buffer.clone())
                }
            }
            Key::Escape => TextEntryResult::Cancel,
            Key::Delete => TextEntryResult::NotHandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(entry: &mut TextEntry, s: &str) {
        for c in s.chars() {
            assert_eq!(entry.handle_key(&Key::Character(c.to_string())), TextEntryResult::Handled);
        }
    }

    #[test]
    fn test_type_and_commit() {
        let mut entry = TextEntry::new(Point::new(100.0, 100.0));
        type_str(&mut entry, "Hi");
        assert_eq!(entry.text(), "Hi");
        assert_eq!(entry.handle_key(&Key::Enter), TextEntryResult::Commit("Hi".to_string()));
    }

    #[test]
    fn test_backspace() {
        let mut entry = TextEntry::new(Point::ZERO);
        type_str(&mut entry, "héllo");
        entry.handle_key(&Key::Backspace);
        entry.handle_key(&Key::Backspace);
        assert_eq!(entry.text(), "hél");

        let mut empty = TextEntry::new(Point::ZERO);
        assert_eq!(empty.handle_key(&Key::Backspace), TextEntryResult::Handled);
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_enter_on_blank_keeps_open() {
        let mut entry = TextEntry::new(Point::ZERO);
        assert_eq!(entry.handle_key(&Key::Enter), TextEntryResult::Handled);
        type_str(&mut entry, "   ");
        assert_eq!(entry.handle_key(&Key::Enter), TextEntryResult::Handled);
    }

    #[test]
    fn test_escape_cancels_with_content() {
        let mut entry = TextEntry::new(Point::ZERO);
        type_str(&mut entry, "draft");
        assert_eq!(entry.handle_key(&Key::Escape), TextEntryResult::Cancel);
    }

    #[test]
    fn test_delete_not_handled() {
        let mut entry = TextEntry::new(Point::ZERO);
        assert_eq!(entry.handle_key(&Key::Delete), TextEntryResult::NotHandled);
    }
}
