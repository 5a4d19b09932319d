//! Single-line input buffer behind the chat input box.
//!
//! The cursor counts grapheme clusters, so accented input typed as a base
//! letter plus a combining mark moves and deletes as one unit.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::utils::input::sanitize_text_input;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditorState {
    text: String,
    cursor: usize,
}

impl LineEditorState {
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.graphemes(true).count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in grapheme clusters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Display columns to the left of the cursor.
    pub fn cursor_column(&self) -> usize {
        self.text
            .graphemes(true)
            .take(self.cursor)
            .map(UnicodeWidthStr::width)
            .sum()
    }

    fn byte_offset(&self, grapheme_index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }

    fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    fn insert_str(&mut self, piece: &str) {
        let at = self.byte_offset(self.cursor);
        self.text.insert_str(at, piece);
        self.cursor = self.text[..at + piece.len()].graphemes(true).count();
    }

    fn remove_range(&mut self, from: usize, to: usize) {
        let start = self.byte_offset(from);
        let end = self.byte_offset(to);
        self.text.replace_range(start..end, "");
        self.cursor = from;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditAction {
    Insert(char),
    Paste(String),
    Backspace,
    Delete,
    MoveLeft,
    MoveRight,
    MoveStart,
    MoveEnd,
    DeleteToEnd,
    DeleteWord,
    ClearAll,
}

/// Editing keys only; Enter and Esc belong to the chat loop.
pub fn map_key_event_to_action(key: &KeyEvent) -> Option<LineEditAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Backspace => Some(LineEditAction::Backspace),
        KeyCode::Delete => Some(LineEditAction::Delete),
        KeyCode::Left => Some(LineEditAction::MoveLeft),
        KeyCode::Right => Some(LineEditAction::MoveRight),
        KeyCode::Home => Some(LineEditAction::MoveStart),
        KeyCode::End => Some(LineEditAction::MoveEnd),
        KeyCode::Char('a') if ctrl => Some(LineEditAction::MoveStart),
        KeyCode::Char('e') if ctrl => Some(LineEditAction::MoveEnd),
        KeyCode::Char('k') if ctrl => Some(LineEditAction::DeleteToEnd),
        KeyCode::Char('w') if ctrl => Some(LineEditAction::DeleteWord),
        KeyCode::Char('u') if ctrl => Some(LineEditAction::ClearAll),
        KeyCode::Char(c) if !ctrl => Some(LineEditAction::Insert(c)),
        _ => None,
    }
}

/// Apply `action`, returning whether the buffer or cursor changed.
pub fn apply_line_edit_action(state: &mut LineEditorState, action: LineEditAction) -> bool {
    match action {
        LineEditAction::Insert(c) => {
            if c.is_control() {
                return false;
            }
            let mut buf = [0u8; 4];
            state.insert_str(c.encode_utf8(&mut buf));
            true
        }
        LineEditAction::Paste(text) => {
            let flattened = sanitize_text_input(&text).replace('\n', " ");
            if flattened.is_empty() {
                return false;
            }
            state.insert_str(&flattened);
            true
        }
        LineEditAction::Backspace => {
            if state.cursor == 0 {
                return false;
            }
            state.remove_range(state.cursor - 1, state.cursor);
            true
        }
        LineEditAction::Delete => {
            if state.cursor >= state.len() {
                return false;
            }
            state.remove_range(state.cursor, state.cursor + 1);
            true
        }
        LineEditAction::MoveLeft => {
            if state.cursor == 0 {
                return false;
            }
            state.cursor -= 1;
            true
        }
        LineEditAction::MoveRight => {
            if state.cursor >= state.len() {
                return false;
            }
            state.cursor += 1;
            true
        }
        LineEditAction::MoveStart => {
            let moved = state.cursor != 0;
            state.cursor = 0;
            moved
        }
        LineEditAction::MoveEnd => {
            let end = state.len();
            let moved = state.cursor != end;
            state.cursor = end;
            moved
        }
        LineEditAction::DeleteToEnd => {
            let at = state.byte_offset(state.cursor);
            if at >= state.text.len() {
                return false;
            }
            state.text.truncate(at);
            true
        }
        LineEditAction::DeleteWord => {
            if state.cursor == 0 {
                return false;
            }
            let graphemes: Vec<&str> = state.text.graphemes(true).collect();
            let mut idx = state.cursor.min(graphemes.len());
            while idx > 0 && graphemes[idx - 1].trim().is_empty() {
                idx -= 1;
            }
            while idx > 0 && !graphemes[idx - 1].trim().is_empty() {
                idx -= 1;
            }
            state.remove_range(idx, state.cursor);
            true
        }
        LineEditAction::ClearAll => {
            if state.text.is_empty() {
                return false;
            }
            state.clear();
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_move_cursor() {
        let mut state = LineEditorState::default();
        assert!(apply_line_edit_action(&mut state, LineEditAction::Insert('a')));
        apply_line_edit_action(&mut state, LineEditAction::MoveLeft);
        apply_line_edit_action(&mut state, LineEditAction::Insert('b'));
        assert_eq!(state.text(), "ba");
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn combining_marks_are_one_cursor_step() {
        let mut state = LineEditorState::with_text("Jose\u{301}");
        assert_eq!(state.cursor(), 4);
        assert!(apply_line_edit_action(&mut state, LineEditAction::Backspace));
        assert_eq!(state.text(), "Jos");
    }

    #[test]
    fn cursor_column_uses_display_width() {
        let mut state = LineEditorState::with_text("ñandú");
        apply_line_edit_action(&mut state, LineEditAction::MoveLeft);
        assert_eq!(state.cursor_column(), 4);
    }

    #[test]
    fn ctrl_k_deletes_to_end() {
        let mut state = LineEditorState::with_text("me enojo mucho");
        for _ in 0..6 {
            apply_line_edit_action(&mut state, LineEditAction::MoveLeft);
        }
        assert!(apply_line_edit_action(&mut state, LineEditAction::DeleteToEnd));
        assert_eq!(state.text(), "me enojo");
    }

    #[test]
    fn delete_word_skips_trailing_spaces() {
        let mut state = LineEditorState::with_text("me quedo  ");
        assert!(apply_line_edit_action(&mut state, LineEditAction::DeleteWord));
        assert_eq!(state.text(), "me ");
        assert_eq!(state.cursor(), 3);
    }

    #[test]
    fn paste_is_flattened_to_one_line() {
        let mut state = LineEditorState::default();
        apply_line_edit_action(&mut state, LineEditAction::Paste("uno\r\ndos\tfin".into()));
        assert_eq!(state.text(), "uno  dos    fin");
    }

    #[test]
    fn editing_keys_map_without_enter() {
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        let plain_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(map_key_event_to_action(&ctrl_a), Some(LineEditAction::MoveStart));
        assert_eq!(map_key_event_to_action(&plain_a), Some(LineEditAction::Insert('a')));
        assert_eq!(map_key_event_to_action(&enter), None);
    }
}
