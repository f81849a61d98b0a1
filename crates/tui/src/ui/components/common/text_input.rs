//! Reusable UTF-8 safe text input state with cursor management.
//!
//! Backs the hex text half of every linked color pair and the URL/HTML
//! extraction source fields.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    /// Creates a field holding `text` with the cursor at the end.
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        let input = text.into();
        let cursor = input.len();
        Self { input, cursor }
    }

    // ----- Getters -----
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    // ----- Setters -----

    /// Replaces the text. The cursor stays where it was when the text is
    /// unchanged, otherwise it moves to the end.
    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        let next = s.into();
        if next != self.input {
            self.cursor = next.len();
            self.input = next;
        }
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.input.len());
        while !self.input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    // ----- Editing primitives (UTF-8 safe) -----

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_len = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        self.cursor = self.cursor.saturating_sub(prev_len);
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert pasted text at the cursor.
    pub fn insert_str(&mut self, text: &str) {
        self.input.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        let start = self.cursor - prev;
        self.input.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            let end = self.cursor + next.len_utf8();
            self.input.drain(self.cursor..end);
        }
    }

    /// The slice of text that fits in `width` cells with the cursor kept in
    /// view, plus the cursor column within that slice.
    pub fn visible_window(&self, width: usize) -> (String, usize) {
        let cursor_chars = self.input[..self.cursor].chars().count();
        if width == 0 {
            return (String::new(), 0);
        }
        let start = (cursor_chars + 1).saturating_sub(width);
        let window: String = self.input.chars().skip(start).take(width).collect();
        (window, cursor_chars - start)
    }

    /// Applies a plain editing key. Returns `true` when the text changed.
    ///
    /// Cursor-only keys are handled too but report `false`; keys the field
    /// does not understand are ignored.
    pub fn apply_key(&mut self, key: KeyEvent) -> bool {
        let before = self.input.len();
        match key.code {
            KeyCode::Char(c) if !c.is_control() && (key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                self.input.len() != before
            }
            KeyCode::Delete => {
                self.delete();
                self.input.len() != before
            }
            KeyCode::Left => {
                self.move_left();
                false
            }
            KeyCode::Right => {
                self.move_right();
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.input.len();
                false
            }
            _ => false,
        }
    }
}
