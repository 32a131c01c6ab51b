//! XML Reader Core
//!
//! Incrementally assembles a navigable tree from markup chunks and emits a
//! notification for every completed element. Use it in batch mode to get the
//! whole document, or in streaming mode to process long runs of sibling
//! records in bounded memory.
//!
//! # Architecture
//!
//! - **token.rs** - The five structural token kinds
//! - **lexer.rs** - Chunk-resumable tokenizer producing tokens
//! - **tree.rs** - Arena document, node handles and read views
//! - **assembler.rs** - Token-to-tree state machine and streaming pruner
//! - **router.rs** - Notification routing to named handlers
//! - **config.rs** - Reader options
//! - **reader.rs** - Facade and one-shot `parse_sync`

pub mod assembler;
pub mod config;
pub mod lexer;
pub mod reader;
pub mod router;
pub mod token;
pub mod tree;

pub use assembler::{Assembler, Phase};
pub use config::{ReaderConfig, DEFAULT_DONE_EVENT, DEFAULT_TAG_PREFIX};
pub use lexer::Lexer;
pub use reader::{parse_sync, ParseError, Reader};
pub use router::{Notification, Router, Subscription};
pub use token::Token;
pub use tree::{Attributes, Document, NodeId, NodeKind, NodeRef, NodeType};
