//! Structural bytes of the JSON output

use super::JsonEncoder;

impl JsonEncoder {
    pub(crate) fn append_begin_marker(&mut self) {
        self.buffer.push(b'{');
    }

    pub(crate) fn append_end_marker(&mut self) {
        self.buffer.push(b'}');
    }

    pub(crate) fn append_line_break(&mut self) {
        self.buffer.push(b'\n');
    }

    pub(crate) fn append_array_start(&mut self) {
        self.buffer.push(b'[');
    }

    pub(crate) fn append_array_end(&mut self) {
        self.buffer.push(b']');
    }

    /// Writes `"key":`, preceded by a comma unless it opens the object.
    pub(crate) fn append_key(&mut self, key: &str) {
        self.append_element_separator();
        self.buffer.push(b'"');
        self.safe_add_str(key);
        self.buffer.extend_from_slice(b"\":");
    }

    /// Inserts a comma unless the previous byte already separates values.
    pub(crate) fn append_element_separator(&mut self) {
        match self.buffer.last() {
            None => {}
            Some(b'{' | b'[' | b':' | b',') => {}
            Some(byte) if byte.is_ascii_whitespace() => {}
            Some(_) => self.buffer.push(b','),
        }
    }
}
