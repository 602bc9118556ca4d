use crate::message::Message;
use std::fmt;

impl Message {
    /// Every field as `Name: Value\r\n`, grouped by name in first-seen order.
    /// Folded values already carry their `\r\n` + 8 spaces joins. Values are
    /// written as stored, so a line break inside an `add_header` value is emitted as is.
    pub fn render_headers(&self) -> String {
        let mut out = String::new();
        for field in self.headers() {
            out.push_str(&field.name);
            out.push_str(": ");
            out.push_str(&field.value);
            out.push_str("\r\n");
        }
        out
    }

    /// Headers, a blank line when any header exists, then the raw body lines.
    pub fn render(&self) -> String {
        let mut out = self.render_headers();
        if !out.is_empty() {
            out.push_str("\r\n");
        }
        for line in &self.body {
            out.push_str(line);
        }
        out
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
