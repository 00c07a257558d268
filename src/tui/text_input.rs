use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Single-line text buffer with a grapheme-aware cursor (byte offset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the contents and put the cursor at the end. No-op if the text
    /// is unchanged, so the cursor survives round trips through the editor.
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.cursor = self.text.len();
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_str(&mut self, s: &str) {
        // single line: newlines from a paste become spaces
        let clean = s.replace(['\n', '\r'], " ");
        self.text.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) -> bool {
        match prev_boundary(&self.text, self.cursor) {
            Some(start) => {
                self.text.replace_range(start..self.cursor, "");
                self.cursor = start;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self) -> bool {
        match next_boundary(&self.text, self.cursor) {
            Some(end) => {
                self.text.replace_range(self.cursor..end, "");
                true
            }
            None => false,
        }
    }

    pub fn left(&mut self) {
        if let Some(start) = prev_boundary(&self.text, self.cursor) {
            self.cursor = start;
        }
    }

    pub fn right(&mut self) {
        if let Some(end) = next_boundary(&self.text, self.cursor) {
            self.cursor = end;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Terminal cells before the cursor
    pub fn cursor_column(&self) -> usize {
        UnicodeWidthStr::width(&self.text[..self.cursor])
    }
}

fn next_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset >= s.len() {
        return None;
    }
    let step = s[offset..]
        .grapheme_indices(true)
        .nth(1)
        .map_or(s.len() - offset, |(i, _)| i);
    Some(offset + step)
}

fn prev_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return None;
    }
    s[..offset].grapheme_indices(true).last().map(|(i, _)| i)
}
