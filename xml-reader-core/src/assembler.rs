//! Token-to-tree assembler.
//!
//! Consumes tokens one at a time, grows the document arena, and publishes a
//! notification each time an element is sealed by its matching close tag.
//! Notifications are therefore post-order: every descendant is published
//! before its ancestor, and the document notification comes last.
//!
//! A close tag that does not match the innermost open element is dropped
//! without any other effect. A document whose root never closes simply never
//! completes.
//!
//! In streaming mode, sealing a direct child of the root discards everything
//! the root currently holds; the sealed child is detached, published, then
//! released. Memory stays proportional to the deepest open path.

use crate::config::ReaderConfig;
use crate::router::Notification;
use crate::token::Token;
use crate::tree::{Attributes, Document, NodeId, NodeKind, NodeRef};

/// Lifecycle of one document inside the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the root element.
    Idle,
    /// Root open, tokens mutate the tree.
    Building,
    /// Root sealed; tokens are ignored until `reset`.
    Done,
}

/// Builds a document tree from tokens.
#[derive(Debug)]
pub struct Assembler {
    stream: bool,
    parent_nodes: bool,
    top_level_only: bool,
    phase: Phase,
    document: Option<Document>,
    /// Stack of open element IDs; the last one is the current element.
    open: Vec<NodeId>,
    /// Attribute key waiting for its value.
    pending_attribute: Option<String>,
    /// Finished document, held until the caller takes it.
    completed: Option<Document>,
}

impl Assembler {
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            stream: config.stream,
            parent_nodes: config.parent_nodes,
            top_level_only: config.emit_top_level_only,
            phase: Phase::Idle,
            document: None,
            open: Vec::new(),
            pending_attribute: None,
            completed: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// The document under construction, if the root has been opened.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Name of the innermost open element.
    pub fn current_name(&self) -> Option<&str> {
        let doc = self.document.as_ref()?;
        let current = *self.open.last()?;
        doc.get(current).map(|node| node.name())
    }

    /// Take the completed document. Available once, after the root closed.
    pub fn take_document(&mut self) -> Option<Document> {
        self.completed.take()
    }

    /// Return to `Idle`, dropping the current and any completed document.
    pub fn reset(&mut self) {
        log::debug!(target: "xml_reader::assembler", "reset from {:?}", self.phase);
        self.phase = Phase::Idle;
        self.document = None;
        self.open.clear();
        self.pending_attribute = None;
        self.completed = None;
    }

    /// Apply one token, publishing any resulting notifications.
    pub fn consume<F>(&mut self, token: Token<'_>, mut publish: F)
    where
        F: FnMut(Notification<'_>),
    {
        match token {
            Token::OpenTag(name) => self.open_element(name),
            Token::AttributeName(key) => self.attribute_name(key),
            Token::AttributeValue(value) => self.attribute_value(value),
            Token::Text(value) => self.text(value),
            Token::CloseTag(name) => self.close_element(name, &mut publish),
        }
    }

    fn open_element(&mut self, name: &str) {
        match self.phase {
            Phase::Idle => {
                let doc = Document::with_root(name);
                self.open.push(doc.root().id());
                self.document = Some(doc);
                self.pending_attribute = None;
                self.phase = Phase::Building;
            }
            Phase::Building => {
                let (Some(doc), Some(&current)) = (self.document.as_mut(), self.open.last()) else {
                    return;
                };
                let kind = NodeKind::Element {
                    name: name.to_owned(),
                    attributes: Attributes::new(),
                };
                let id = doc.append(current, kind, true);
                self.open.push(id);
                self.pending_attribute = None;
            }
            Phase::Done => {}
        }
    }

    fn attribute_name(&mut self, key: &str) {
        let (Some(doc), Some(&current)) = (self.document.as_mut(), self.open.last()) else {
            log::trace!(target: "xml_reader::assembler", "attribute {key:?} outside any element");
            return;
        };
        if let Some(attributes) = doc.attributes_mut(current) {
            attributes.insert(key, "");
        }
        self.pending_attribute = Some(key.to_owned());
    }

    fn attribute_value(&mut self, value: &str) {
        let (Some(doc), Some(&current), Some(key)) = (
            self.document.as_mut(),
            self.open.last(),
            self.pending_attribute.as_deref(),
        ) else {
            log::trace!(target: "xml_reader::assembler", "attribute value {value:?} without a key");
            return;
        };
        if let Some(attributes) = doc.attributes_mut(current) {
            attributes.insert(key, value);
        }
    }

    fn text(&mut self, value: &str) {
        let (Some(doc), Some(&current)) = (self.document.as_mut(), self.open.last()) else {
            return;
        };
        // text is never sealed, so the parent-link policy does not reach it
        doc.append(current, NodeKind::Text(value.to_owned()), true);
    }

    fn close_element<F>(&mut self, name: &str, publish: &mut F)
    where
        F: FnMut(Notification<'_>),
    {
        let (Some(doc), Some(&current)) = (self.document.as_mut(), self.open.last()) else {
            return;
        };
        let open_name = doc.get(current).map(|node| node.name()).unwrap_or_default();
        if open_name != name {
            log::debug!(
                target: "xml_reader::assembler",
                "ignoring close tag </{name}> while <{open_name}> is open"
            );
            return;
        }

        // sealed: nothing is appended to `current` from here on
        self.open.pop();
        self.pending_attribute = None;
        let parent = self.open.last().copied();
        let root = doc.root().id();

        if !self.parent_nodes {
            doc.clear_parent(current);
        }

        let top_level = parent == Some(root);
        let detached = self.stream && top_level;
        if detached {
            for sibling in doc.take_children(root) {
                if sibling != current {
                    doc.release(sibling);
                }
            }
            doc.clear_parent(current);
            log::trace!(target: "xml_reader::assembler", "pruned root children at </{name}>");
        }

        if !self.top_level_only || top_level {
            publish(Notification::Element(NodeRef::new(doc, current)));
        }

        if detached {
            doc.release(current);
        }

        if parent.is_none() {
            publish(Notification::Document(doc.root()));
            self.phase = Phase::Done;
            self.completed = self.document.take();
        }
    }
}
