//! Chunk-resumable markup tokenizer.
//!
//! The lexer is a character-level state machine; all state lives in the
//! struct, so input may be split anywhere (down to single characters) without
//! changing the emitted token sequence. Tokens are delivered through a
//! callback and borrow the lexer's buffers for the duration of the call.
//!
//! Lenient by construction: nothing is validated, nothing is rejected.
//! Comments, declarations (`<!DOCTYPE ...>`) and processing instructions
//! (`<?xml ...?>`) are skipped; CDATA bodies become a single `Text` token.
//! Entities are passed through undecoded.

use memchr::memchr;

use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Character data between tags.
    Data,
    /// Just after `<` (or `</`).
    TagOpen,
    TagName,
    /// Waiting for `>` to close a closing or self-closing tag.
    TagEnd,
    AttrNameStart,
    AttrName,
    /// Whitespace after an attribute name; `=` may still follow.
    AttrNameEnd,
    AttrValueStart,
    AttrValue,
    /// After `<!`, classifying comment / CDATA / declaration.
    Bang,
    Comment { dashes: u8 },
    CData,
    Declaration { depth: u32 },
    Instruction { question: bool },
}

/// Streaming tokenizer.
#[derive(Debug)]
pub struct Lexer {
    state: State,
    /// Character data or CDATA body.
    text: String,
    tag: String,
    attr: String,
    value: String,
    /// Characters seen after `<!`.
    markup: String,
    closing: bool,
    quote: Option<char>,
}

const COMMENT_OPEN: &str = "--";
const CDATA_OPEN: &str = "[CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Capacity the text buffer keeps after `discard_text`.
const DISCARDED_TEXT_CAPACITY: usize = 256;

fn emit<F>(on_token: &mut F, token: Token<'_>)
where
    F: FnMut(Token<'_>),
{
    log::trace!(target: "xml_reader::lexer", "emit token: {token}");
    on_token(token);
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            state: State::Data,
            text: String::new(),
            tag: String::new(),
            attr: String::new(),
            value: String::new(),
            markup: String::new(),
            closing: false,
            quote: None,
        }
    }

    /// Return to the initial state, dropping any partial token.
    pub fn reset(&mut self) {
        self.state = State::Data;
        self.text.clear();
        self.tag.clear();
        self.attr.clear();
        self.value.clear();
        self.markup.clear();
        self.closing = false;
        self.quote = None;
    }

    /// True when no tag, comment or CDATA section is partially consumed.
    pub fn is_between_tags(&self) -> bool {
        self.state == State::Data
    }

    /// Character data buffered since the last tag, not yet emitted.
    pub fn pending_text(&self) -> &str {
        match self.state {
            State::Data => &self.text,
            _ => "",
        }
    }

    /// Drop character data buffered since the last tag.
    ///
    /// Only affects text between tags; a partially read tag or CDATA section
    /// is kept.
    pub fn discard_text(&mut self) {
        if self.state == State::Data {
            self.text.clear();
            self.text.shrink_to(DISCARDED_TEXT_CAPACITY);
        }
    }

    /// Feed a chunk of input, calling `on_token` for every completed token.
    pub fn feed<F>(&mut self, chunk: &str, mut on_token: F)
    where
        F: FnMut(Token<'_>),
    {
        let mut rest = chunk;
        while !rest.is_empty() {
            if self.state == State::Data {
                // `<` is ASCII, so the split is always on a char boundary
                match memchr(b'<', rest.as_bytes()) {
                    Some(pos) => {
                        self.text.push_str(&rest[..pos]);
                        rest = &rest[pos + 1..];
                        self.begin_tag(&mut on_token);
                    }
                    None => {
                        self.text.push_str(rest);
                        return;
                    }
                }
                continue;
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                self.step(c, &mut on_token);
            }
            rest = chars.as_str();
        }
    }

    fn begin_tag<F>(&mut self, on_token: &mut F)
    where
        F: FnMut(Token<'_>),
    {
        if !self.text.trim().is_empty() {
            emit(on_token, Token::Text(&self.text));
        }
        self.text.clear();
        self.tag.clear();
        self.closing = false;
        self.state = State::TagOpen;
    }

    fn step<F>(&mut self, c: char, on_token: &mut F)
    where
        F: FnMut(Token<'_>),
    {
        match self.state {
            State::Data => {
                if c == '<' {
                    self.begin_tag(on_token);
                } else {
                    self.text.push(c);
                }
            }

            State::TagOpen => match c {
                '/' => self.closing = true,
                '!' if !self.closing => {
                    self.markup.clear();
                    self.state = State::Bang;
                }
                '?' if !self.closing => self.state = State::Instruction { question: false },
                '>' => self.state = State::Data,
                c if c.is_whitespace() => {}
                c => {
                    self.tag.push(c);
                    self.state = State::TagName;
                }
            },

            State::TagName => match c {
                '>' => {
                    if self.closing {
                        emit(on_token, Token::CloseTag(&self.tag));
                    } else {
                        emit(on_token, Token::OpenTag(&self.tag));
                    }
                    self.state = State::Data;
                }
                '/' => {
                    if !self.closing {
                        emit(on_token, Token::OpenTag(&self.tag));
                    }
                    self.state = State::TagEnd;
                }
                c if c.is_whitespace() => {
                    if self.closing {
                        self.state = State::TagEnd;
                    } else {
                        emit(on_token, Token::OpenTag(&self.tag));
                        self.state = State::AttrNameStart;
                    }
                }
                c => self.tag.push(c),
            },

            State::TagEnd => {
                if c == '>' {
                    emit(on_token, Token::CloseTag(&self.tag));
                    self.state = State::Data;
                }
            }

            State::AttrNameStart => match c {
                '>' => self.state = State::Data,
                '/' => self.state = State::TagEnd,
                c if c.is_whitespace() => {}
                c => {
                    self.attr.clear();
                    self.attr.push(c);
                    self.state = State::AttrName;
                }
            },

            State::AttrName => match c {
                '=' => {
                    emit(on_token, Token::AttributeName(&self.attr));
                    self.state = State::AttrValueStart;
                }
                '>' => {
                    emit(on_token, Token::AttributeName(&self.attr));
                    self.state = State::Data;
                }
                '/' => {
                    emit(on_token, Token::AttributeName(&self.attr));
                    self.state = State::TagEnd;
                }
                c if c.is_whitespace() => self.state = State::AttrNameEnd,
                c => self.attr.push(c),
            },

            State::AttrNameEnd => match c {
                '=' => {
                    emit(on_token, Token::AttributeName(&self.attr));
                    self.state = State::AttrValueStart;
                }
                '>' => {
                    emit(on_token, Token::AttributeName(&self.attr));
                    self.state = State::Data;
                }
                '/' => {
                    emit(on_token, Token::AttributeName(&self.attr));
                    self.state = State::TagEnd;
                }
                c if c.is_whitespace() => {}
                c => {
                    // previous attribute had no value
                    emit(on_token, Token::AttributeName(&self.attr));
                    self.attr.clear();
                    self.attr.push(c);
                    self.state = State::AttrName;
                }
            },

            State::AttrValueStart => match c {
                '"' | '\'' => {
                    self.value.clear();
                    self.quote = Some(c);
                    self.state = State::AttrValue;
                }
                '>' => {
                    emit(on_token, Token::AttributeValue(""));
                    self.state = State::Data;
                }
                '/' => {
                    emit(on_token, Token::AttributeValue(""));
                    self.state = State::TagEnd;
                }
                c if c.is_whitespace() => {}
                c => {
                    self.value.clear();
                    self.value.push(c);
                    self.quote = None;
                    self.state = State::AttrValue;
                }
            },

            State::AttrValue => match self.quote {
                Some(quote) if c == quote => {
                    emit(on_token, Token::AttributeValue(&self.value));
                    self.state = State::AttrNameStart;
                }
                Some(_) => self.value.push(c),
                None => match c {
                    '>' => {
                        emit(on_token, Token::AttributeValue(&self.value));
                        self.state = State::Data;
                    }
                    '/' => {
                        emit(on_token, Token::AttributeValue(&self.value));
                        self.state = State::TagEnd;
                    }
                    c if c.is_whitespace() => {
                        emit(on_token, Token::AttributeValue(&self.value));
                        self.state = State::AttrNameStart;
                    }
                    c => self.value.push(c),
                },
            },

            State::Bang => {
                self.markup.push(c);
                if self.markup == COMMENT_OPEN {
                    self.state = State::Comment { dashes: 0 };
                } else if self.markup == CDATA_OPEN {
                    self.text.clear();
                    self.state = State::CData;
                } else if COMMENT_OPEN.starts_with(self.markup.as_str())
                    || CDATA_OPEN.starts_with(self.markup.as_str())
                {
                    // still ambiguous
                } else if c == '>' {
                    self.state = State::Data;
                } else {
                    let opened = self.markup.matches('[').count();
                    let closed = self.markup.matches(']').count();
                    self.state = State::Declaration {
                        depth: opened.saturating_sub(closed) as u32,
                    };
                }
            }

            State::Comment { dashes } => match c {
                '-' => self.state = State::Comment { dashes: dashes.saturating_add(1) },
                '>' if dashes >= 2 => self.state = State::Data,
                _ => self.state = State::Comment { dashes: 0 },
            },

            State::CData => {
                self.text.push(c);
                if self.text.ends_with(CDATA_CLOSE) {
                    let len = self.text.len() - CDATA_CLOSE.len();
                    self.text.truncate(len);
                    emit(on_token, Token::Text(&self.text));
                    self.text.clear();
                    self.state = State::Data;
                }
            }

            State::Declaration { depth } => match c {
                '[' => self.state = State::Declaration { depth: depth + 1 },
                ']' => self.state = State::Declaration { depth: depth.saturating_sub(1) },
                '>' if depth == 0 => self.state = State::Data,
                _ => {}
            },

            State::Instruction { question } => match c {
                '>' if question => self.state = State::Data,
                '?' => self.state = State::Instruction { question: true },
                _ => self.state = State::Instruction { question: false },
            },
        }
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}
