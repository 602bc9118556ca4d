//! # RFC 2822 message parsing and re-serialization
//!
//! Reads a message as an ordered block of `Name: value` header fields (with
//! folded continuation lines) followed by a blank line and a free-form body.
//! Header values are kept as opaque trimmed text; folded values are unfolded
//! into a single string joined by [`FOLD`] (`\r\n` plus 8 spaces).
//!
//! ### Example
//! ```rust
//! use rfc2822::Message;
//! fn main() -> rfc2822::Result<()> {
//!     let text = "Header0: Value0\nHeader1: Value1\n Value1\n\nbody line one\nbody line two\n";
//!     let mut msg = Message::parse(text)?;
//!     assert_eq!(msg.get_header("header1")?, "Value1\r\n        Value1");
//!     assert_eq!(msg.body(), &["body line one\n", "body line two\n"]);
//!
//!     msg.add_multi_header("Example", ["line 0", "line 1"]);
//!     let again = Message::parse(&msg.render())?;
//!     assert_eq!(again.get_header("example")?, "line 0\r\n        line 1");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod message;
pub mod parser;
mod render;

pub use error::{MessageError, ParseErrorReason, Result};
pub use message::{HeaderField, Message, FOLD};
pub use parser::{parse_file, parse_reader, parse_str};
