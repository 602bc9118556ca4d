use crate::error::{MessageError, ParseErrorReason, Result};
use crate::message::{FieldHandle, HeaderField, Message, FOLD};
use nom::{
    bytes::complete::take_till1,
    character::complete::char,
    combinator::{rest, verify},
    sequence::separated_pair,
    IResult,
};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace, warn};

/// Characters skipped at the very start of a message, one whole line at a time.
const LEADING_JUNK: &[char] = &['\r', '\n', '\t', '\u{0b}', '\u{0c}', '\u{08}', '\u{07}', ' '];

/// Junk stripped from the front of the first real line. Space and tab stay so
/// an indented first line is still seen as a continuation.
const LEADING_CONTROL: &[char] = &['\r', '\u{0b}', '\u{0c}', '\u{08}', '\u{07}'];

/// `name: value` with a name that is not only whitespace. Returns the untrimmed parts.
pub fn field_line(s: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        verify(take_till1(|c: char| c == ':'), |name: &str| {
            !name.trim().is_empty()
        }),
        char(':'),
        rest,
    )(s)
}

fn is_body_separator(line: &str) -> bool {
    line == "\n" || line == "\r\n"
}

fn is_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

fn is_junk_line(line: &str) -> bool {
    line.chars().all(|c| LEADING_JUNK.contains(&c))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Blank lines before the first real line are dropped.
    Leading,
    /// `open` is the field the next continuation line extends.
    Headers { open: Option<FieldHandle> },
    Body,
}

/// Single-pass line scanner building a [`Message`].
#[derive(Debug)]
struct LineParser {
    message: Message,
    state: State,
    line_no: usize,
}

impl LineParser {
    fn new() -> LineParser {
        LineParser {
            message: Message::new(),
            state: State::Leading,
            line_no: 0,
        }
    }

    /// Consumes one line, terminator included.
    fn feed(&mut self, line: &str) -> Result<()> {
        let mut line = line;
        if self.state == State::Leading {
            if is_junk_line(line) {
                return Ok(());
            }
            line = line.trim_start_matches(LEADING_CONTROL);
            self.state = State::Headers { open: None };
        }
        self.line_no += 1;
        match self.state {
            State::Headers { open } => self.header_line(line, open),
            _ => {
                self.message.push_body_line(line);
                Ok(())
            }
        }
    }

    fn header_line(&mut self, line: &str, open: Option<FieldHandle>) -> Result<()> {
        let line_no = self.line_no;

        if is_body_separator(line) {
            debug!(line = line_no, "reached body separator");
            self.state = State::Body;
            return Ok(());
        }

        if is_continuation(line) {
            trace!(line = line_no, "continuation line");
            return match open.and_then(|handle| self.message.field_mut(handle)) {
                Some(field) => {
                    field.value.push_str(FOLD);
                    field.value.push_str(line.trim());
                    Ok(())
                }
                None => Err(parse_error(line_no, ParseErrorReason::NoMatchForContinuation)),
            };
        }

        match field_line(line) {
            Ok((_, (name, value))) => {
                let name = name.trim();
                trace!(line = line_no, name, "field line");
                let handle = self.message.push_field(HeaderField::new(name, value.trim()));
                self.state = State::Headers { open: Some(handle) };
                Ok(())
            }
            Err(_) => Err(parse_error(line_no, ParseErrorReason::CannotParseField)),
        }
    }

    fn finish(self) -> Message {
        debug!(
            fields = self.message.field_count(),
            body_lines = self.message.body().len(),
            "parsed message"
        );
        self.message
    }
}

fn parse_error(line: usize, reason: ParseErrorReason) -> MessageError {
    debug!(line, %reason, "rejecting message");
    MessageError::Parse { line, reason }
}

fn decode_line(bytes: &[u8], line_no: usize) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(e) => {
            warn!(line = line_no, error = %e, "line is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(bytes)
        }
    }
}

/// Parses a message from any byte stream. Read failures abort the parse.
pub fn parse_reader<R: Read>(reader: R) -> Result<Message> {
    let mut reader = BufReader::new(reader);
    let mut parser = LineParser::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = decode_line(&buf, parser.line_no + 1);
        parser.feed(&line)?;
    }
    Ok(parser.finish())
}

pub fn parse_str(text: &str) -> Result<Message> {
    let mut parser = LineParser::new();
    for line in text.split_inclusive('\n') {
        parser.feed(line)?;
    }
    Ok(parser.finish())
}

/// Opens `path` and parses its content; open failures surface as [`MessageError::Io`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Message> {
    let file = File::open(path)?;
    parse_reader(file)
}

impl Message {
    pub fn parse(text: &str) -> Result<Message> {
        parse_str(text)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Message> {
        parse_reader(reader)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Message> {
        parse_file(path)
    }
}

impl FromStr for Message {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Message> {
        parse_str(s)
    }
}
