/// Single-line text with a byte-offset cursor that always sits on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn set<T: Into<String>>(&mut self, value: T) {
        self.text = value.into();
        self.cursor = self.text.len();
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.text.drain(idx..self.cursor);
            self.cursor = idx;
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            let end = self.cursor + ch.len_utf8();
            self.text.drain(self.cursor..end);
        }
    }

    pub fn move_left(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_the_cursor() {
        let mut buffer = TextBuffer::new();
        for ch in "tsk".chars() {
            buffer.insert_char(ch);
        }
        buffer.move_left();
        buffer.move_left();
        buffer.insert_char('a');
        assert_eq!(buffer.as_str(), "task");
        assert_eq!(buffer.cursor_column(), 2);

        buffer.move_end();
        buffer.backspace();
        assert_eq!(buffer.as_str(), "tas");
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut buffer = TextBuffer::new();
        buffer.set("né");
        buffer.backspace();
        assert_eq!(buffer.as_str(), "n");

        buffer.set("é!");
        buffer.move_home();
        buffer.delete_char();
        assert_eq!(buffer.as_str(), "!");
    }

    #[test]
    fn ignores_control_characters() {
        let mut buffer = TextBuffer::new();
        buffer.insert_char('\n');
        buffer.insert_char('\t');
        assert_eq!(buffer.as_str(), "");
    }
}
