//! Tokens - the structural input of the document assembler.
//!
//! The tokenizer flattens markup into five token kinds. Structure is
//! represented by open/close pairs; attributes arrive as a name token
//! optionally followed by a value token.
//!
//! `<item a=1 d/>` emits:
//! ```text
//! OpenTag("item")
//! AttributeName("a")
//! AttributeValue("1")
//! AttributeName("d")
//! CloseTag("item")
//! ```
//!
//! Comments, declarations and processing instructions never produce tokens.
//! CDATA sections produce a single `Text` token with their verbatim content.

use std::fmt;

/// A single structural token.
///
/// The lifetime `'a` refers to the tokenizer's internal buffers; tokens are
/// only valid for the duration of the callback that receives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Element start: `<name`
    OpenTag(&'a str),

    /// Element end: `</name>` or the `/>` of a self-closing tag.
    CloseTag(&'a str),

    /// Character content between tags, or the body of a CDATA section.
    Text(&'a str),

    /// Attribute key. May or may not be followed by an `AttributeValue`.
    AttributeName(&'a str),

    /// Attribute value for the most recent `AttributeName`.
    AttributeValue(&'a str),
}

impl<'a> Token<'a> {
    /// The token's string payload.
    pub fn value(&self) -> &'a str {
        match *self {
            Token::OpenTag(s)
            | Token::CloseTag(s)
            | Token::Text(s)
            | Token::AttributeName(s)
            | Token::AttributeValue(s) => s,
        }
    }

    /// Short name of the token kind, used in log records.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::OpenTag(_) => "open-tag",
            Token::CloseTag(_) => "close-tag",
            Token::Text(_) => "text",
            Token::AttributeName(_) => "attribute-name",
            Token::AttributeValue(_) => "attribute-value",
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind_name(), self.value())
    }
}
