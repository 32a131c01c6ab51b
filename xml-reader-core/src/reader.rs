//! Reader facade: tokenizer, assembler and router behind one object.
//!
//! ```
//! use xml_reader_core::{Reader, ReaderConfig};
//!
//! let mut titles = Vec::new();
//! {
//!     let mut reader = Reader::new(ReaderConfig::default().streaming());
//!     reader.on_tag("title", |node| titles.push(node.all_text()));
//!     for chunk in ["<feed><entry><title>a</ti", "tle></entry><entry><title>b</title></entry></feed>"] {
//!         reader.parse(chunk);
//!     }
//! }
//! assert_eq!(titles, ["a", "b"]);
//! ```

use std::fmt;

use crate::assembler::{Assembler, Phase};
use crate::config::ReaderConfig;
use crate::lexer::Lexer;
use crate::router::{Notification, Router, Subscription};
use crate::tree::{Document, NodeRef};

/// Incremental XML reader.
///
/// Feed chunks with [`Reader::parse`]; subscribed handlers run synchronously
/// inside that call, in post-order. Handlers get borrowed [`NodeRef`] views
/// that are only valid during the call.
#[derive(Debug)]
pub struct Reader<'h> {
    config: ReaderConfig,
    lexer: Lexer,
    assembler: Assembler,
    router: Router<'h>,
}

impl<'h> Reader<'h> {
    pub fn new(config: ReaderConfig) -> Self {
        let assembler = Assembler::new(&config);
        let router = Router::new(config.tag_prefix.clone(), config.done_event.clone());
        Self {
            config,
            lexer: Lexer::new(),
            assembler,
            router,
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Feed one chunk of raw input. Chunk boundaries never change the result.
    ///
    /// Input after the document completed is skipped until [`Reader::reset`].
    pub fn parse(&mut self, chunk: &str) {
        let Self {
            lexer,
            assembler,
            router,
            ..
        } = self;
        if assembler.phase() == Phase::Done {
            return;
        }
        lexer.feed(chunk, |token| {
            assembler.consume(token, |notification| router.dispatch(&notification));
        });
        // text before the root or after completion never reaches the tree
        if assembler.phase() != Phase::Building {
            lexer.discard_text();
        }
    }

    /// Prepare for the next document. Subscriptions are kept.
    pub fn reset(&mut self) {
        self.lexer.reset();
        self.assembler.reset();
    }

    pub fn phase(&self) -> Phase {
        self.assembler.phase()
    }

    /// Take the completed document (available once per document).
    ///
    /// In streaming mode the root's children have already been discarded.
    pub fn take_document(&mut self) -> Option<Document> {
        self.assembler.take_document()
    }

    /// Subscribe to a raw event name (`tag_prefix + name`, or the done event).
    pub fn on<F>(&mut self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: FnMut(NodeRef<'_>) + 'h,
    {
        self.router.on(event, handler)
    }

    /// Subscribe to completions of elements named `tag`.
    pub fn on_tag<F>(&mut self, tag: &str, handler: F) -> Subscription
    where
        F: FnMut(NodeRef<'_>) + 'h,
    {
        self.router.on_tag(tag, handler)
    }

    /// Subscribe to document completion.
    pub fn on_done<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(NodeRef<'_>) + 'h,
    {
        self.router.on_done(handler)
    }

    /// Subscribe to every element completion.
    pub fn on_element<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&str, NodeRef<'_>) + 'h,
    {
        self.router.on_element(handler)
    }

    /// Subscribe to every notification.
    pub fn on_notification<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&Notification<'_>) + 'h,
    {
        self.router.on_notification(handler)
    }

    pub fn off(&mut self, subscription: Subscription) -> bool {
        self.router.off(subscription)
    }

    fn incomplete(&self) -> ParseError {
        match self.assembler.current_name() {
            Some(innermost) => ParseError::Unclosed {
                open: self.assembler.depth(),
                innermost: innermost.to_string(),
            },
            None => ParseError::Empty,
        }
    }
}

impl Default for Reader<'_> {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}

/// Error returned by [`parse_sync`] when the input does not complete a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No root element was opened.
    Empty,
    /// The root element never closed.
    Unclosed { open: usize, innermost: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "no root element"),
            ParseError::Unclosed { open, innermost } => {
                write!(f, "{} unclosed element(s), innermost <{}>", open, innermost)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a complete input in one call and return the document.
///
/// Streaming is always disabled here; other options apply as given.
pub fn parse_sync(input: &str, config: ReaderConfig) -> Result<Document, ParseError> {
    let mut reader = Reader::new(ReaderConfig {
        stream: false,
        ..config
    });
    reader.parse(input);
    match reader.take_document() {
        Some(doc) => Ok(doc),
        None => Err(reader.incomplete()),
    }
}
