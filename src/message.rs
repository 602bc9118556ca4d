use crate::error::{MessageError, Result};
use indexmap::IndexMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Joins the parts of a folded header value: CRLF followed by 8 spaces.
pub const FOLD: &str = "\r\n        ";

/// One header field. `name` keeps the casing it was written with, `value` is
/// unfolded and trimmed, with continuation parts joined by [`FOLD`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeaderField {
    pub name: String,
    pub value: String,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> HeaderField {
        HeaderField {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Splits a folded value back into the fragments it was built from.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.value.split(FOLD)
    }
}

/// Position of a stored field: index of its name group, then index inside the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldHandle {
    group: usize,
    pos: usize,
}

/// A parsed message: headers grouped under their lowercased name, plus raw body lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    pub(crate) headers: IndexMap<String, Vec<HeaderField>>,
    pub(crate) body: Vec<String>,
}

impl Message {
    pub fn new() -> Message {
        Message::default()
    }

    /// Value of the last field named `name`, compared case-insensitively.
    pub fn get_header(&self, name: &str) -> Result<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|fields| fields.last())
            .map(|field| field.value.as_str())
            .ok_or_else(|| MessageError::NotFound(name.to_string()))
    }

    /// Every field named `name`, in the order they were added.
    pub fn get_headers(&self, name: &str) -> Result<&[HeaderField]> {
        self.headers
            .get(&name.to_lowercase())
            .map(|fields| fields.as_slice())
            .ok_or_else(|| MessageError::NotFound(name.to_string()))
    }

    pub fn contains_header(&self, name: &str) -> bool {
        self.headers.contains_key(&name.to_lowercase())
    }

    /// Name and value are trimmed the way the parser trims them. The value must
    /// not contain line breaks; use [`Message::add_multi_header`] for folded values.
    pub fn add_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) {
        self.push_field(HeaderField::new(name.as_ref().trim(), value.as_ref().trim()));
    }

    /// Adds a folded field; trimmed fragments are joined with [`FOLD`].
    pub fn add_multi_header<I, S>(&mut self, name: impl AsRef<str>, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut value = String::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i != 0 {
                value.push_str(FOLD);
            }
            value.push_str(line.as_ref().trim());
        }
        self.push_field(HeaderField::new(name.as_ref().trim(), value));
    }

    /// Body lines joined with single spaces. Line terminators are kept inside
    /// each line, so this is only meant for display or search.
    pub fn get_body(&self) -> Result<String> {
        if self.body.is_empty() {
            return Err(MessageError::NotFound(String::from("body")));
        }
        Ok(self.body.join(" "))
    }

    /// Raw body lines, each with the terminator it was read with.
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// All fields, grouped by name in first-seen order.
    pub fn headers(&self) -> impl Iterator<Item = &HeaderField> {
        self.headers.values().flatten()
    }

    /// Lowercased names of the stored groups.
    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(String::as_str)
    }

    /// Number of stored fields, counting repeats.
    pub fn field_count(&self) -> usize {
        self.headers.values().map(Vec::len).sum()
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    /// True when there are neither header fields nor body lines.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.body.is_empty()
    }

    pub(crate) fn push_field(&mut self, field: HeaderField) -> FieldHandle {
        let entry = self.headers.entry(field.name.to_lowercase());
        let group = entry.index();
        let fields = entry.or_default();
        fields.push(field);
        FieldHandle {
            group,
            pos: fields.len() - 1,
        }
    }

    pub(crate) fn field_mut(&mut self, handle: FieldHandle) -> Option<&mut HeaderField> {
        self.headers
            .get_index_mut(handle.group)
            .and_then(|(_, fields)| fields.get_mut(handle.pos))
    }

    pub(crate) fn push_body_line(&mut self, line: &str) {
        self.body.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_header_is_case_insensitive() {
        let mut msg = Message::new();
        msg.add_header("Content-Type", "text/plain");
        assert_eq!(msg.get_header("content-type").unwrap(), "text/plain");
        assert_eq!(msg.get_header("CONTENT-TYPE").unwrap(), "text/plain");
        assert!(msg.contains_header("Content-type"));
        let fields = msg.get_headers("content-TYPE").unwrap();
        assert_eq!(fields[0].name(), "Content-Type");
    }

    #[test]
    fn test_last_header_wins() {
        let mut msg = Message::new();
        msg.add_header("Received", "from a");
        msg.add_header("received", "from b");
        msg.add_header("RECEIVED", "from c");
        assert_eq!(msg.get_header("Received").unwrap(), "from c");
        let values: Vec<&str> = msg
            .get_headers("received")
            .unwrap()
            .iter()
            .map(HeaderField::value)
            .collect();
        assert_eq!(values, vec!["from a", "from b", "from c"]);
        let names: Vec<&str> = msg.headers().map(HeaderField::name).collect();
        assert_eq!(names, vec!["Received", "received", "RECEIVED"]);
        assert_eq!(msg.field_count(), 3);
    }

    #[test]
    fn test_missing_header() {
        let msg = Message::new();
        assert!(msg.get_header("Subject").unwrap_err().is_not_found());
        assert!(msg.get_headers("Subject").unwrap_err().is_not_found());
        assert!(msg.is_empty());
        assert_eq!(msg.field_count(), 0);
        assert!(!msg.has_body());
    }

    #[test]
    fn test_add_multi_header() {
        let mut msg = Message::new();
        msg.add_multi_header("Example", ["line 0", "line 1", "line 2"]);
        assert_eq!(
            msg.get_header("example").unwrap(),
            "line 0\r\n        line 1\r\n        line 2"
        );
        let field = &msg.get_headers("Example").unwrap()[0];
        assert_eq!(field.lines().collect::<Vec<_>>(), vec!["line 0", "line 1", "line 2"]);

        msg.add_multi_header("Single", vec![String::from("only")]);
        assert_eq!(msg.get_header("single").unwrap(), "only");
        msg.add_multi_header("Empty", Vec::<String>::new());
        assert_eq!(msg.get_header("empty").unwrap(), "");
    }

    #[test]
    fn test_added_values_are_trimmed() {
        let mut msg = Message::new();
        msg.add_header(" X-Pad ", "  padded  ");
        msg.add_multi_header("Folded", [" a ", "\tb\t"]);
        let field = &msg.get_headers("x-pad").unwrap()[0];
        assert_eq!(field.name(), "X-Pad");
        assert_eq!(field.value(), "padded");
        assert_eq!(msg.get_header("folded").unwrap(), "a\r\n        b");
        assert_eq!(crate::parser::parse_str(&msg.render()).unwrap(), msg);
    }

    #[test]
    fn test_get_body() {
        let mut msg = Message::new();
        assert!(msg.get_body().unwrap_err().is_not_found());
        msg.push_body_line("body line one\n");
        msg.push_body_line("body line two\n");
        assert!(msg.has_body());
        assert_eq!(msg.field_count(), 0);
        assert_eq!(msg.get_body().unwrap(), "body line one\n body line two\n");
        assert_eq!(msg.body(), &["body line one\n", "body line two\n"]);
    }

    #[test]
    fn test_field_handle_targets_pushed_field() {
        let mut msg = Message::new();
        msg.add_header("A", "1");
        let handle = msg.push_field(HeaderField::new("B", "2"));
        msg.add_header("a", "3");
        msg.field_mut(handle).unwrap().value.push_str("!");
        assert_eq!(msg.get_header("b").unwrap(), "2!");
        assert_eq!(msg.get_header("a").unwrap(), "3");
        assert_eq!(msg.header_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
