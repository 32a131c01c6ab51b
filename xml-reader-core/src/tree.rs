//! Tree representation for XML documents.
//!
//! The tree uses an index-based arena so that nodes can carry parent
//! back-references without reference cycles. Children are owned handles,
//! the parent is a plain non-owning handle.
//!
//! Released slots (subtrees discarded by streaming mode) go onto a free list
//! and are reused by the next allocation, so a streaming document never grows
//! beyond the size of its widest open path.
//!
//! # Example
//!
//! ```
//! use xml_reader_core::parse_sync;
//! use xml_reader_core::ReaderConfig;
//!
//! let doc = parse_sync("<list><item id=a>one</item></list>", ReaderConfig::default()).unwrap();
//! for item in doc.root().children() {
//!     println!("{} {:?} {}", item.name(), item.attr("id"), item.all_text());
//! }
//! ```

use std::fmt;

// ============================================================================
// Core Types
// ============================================================================

/// Index into the document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(index) => NodeId(index),
            Err(_) => panic!("node arena exceeded {} slots", u32::MAX),
        }
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether a node is an element or a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NodeType {
    Element,
    Text,
}

/// The payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Tagged element with its attribute map.
    Element { name: String, attributes: Attributes },

    /// Raw character content.
    Text(String),
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Element {
            name: String::new(),
            attributes: Attributes::new(),
        }
    }
}

/// Ordered attribute map.
///
/// Keys keep the position where they were first inserted; inserting an
/// existing key overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

static NO_ATTRIBUTES: Attributes = Attributes::new();

impl Attributes {
    pub const fn new() -> Self {
        Attributes { entries: Vec::new() }
    }

    /// Insert or overwrite `key`.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => {
                existing.clear();
                existing.push_str(value);
            }
            None => self.entries.push((key.to_owned(), value.to_owned())),
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// Internal node storage.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

#[derive(Debug, Clone)]
enum Slot {
    Occupied(NodeData),
    Vacant,
}

// ============================================================================
// Document
// ============================================================================

/// An XML document as an arena of nodes.
///
/// The root never has a parent. Documents built by the reader have an
/// element root; a copy made with [`NodeRef::to_document`] is rooted at
/// whatever node was copied.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl Document {
    /// Create a document holding a single root element.
    pub(crate) fn with_root(name: &str) -> Self {
        let root = NodeData {
            kind: NodeKind::Element {
                name: name.to_owned(),
                attributes: Attributes::new(),
            },
            ..NodeData::default()
        };
        Document {
            slots: vec![Slot::Occupied(root)],
            free: Vec::new(),
            root: NodeId::new(0),
        }
    }

    /// Get the root element.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef { doc: self, id: self.root }
    }

    /// Get a node by ID. Returns `None` for IDs that were never allocated
    /// or whose slot has been released.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(_)) => Some(NodeRef { doc: self, id }),
            _ => None,
        }
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of arena slots, live and released.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn node_data(&self, id: NodeId) -> &NodeData {
        match &self.slots[id.index()] {
            Slot::Occupied(data) => data,
            Slot::Vacant => unreachable!("node {:?} was released", id),
        }
    }

    fn node_data_mut(&mut self, id: NodeId) -> &mut NodeData {
        match &mut self.slots[id.index()] {
            Slot::Occupied(data) => data,
            Slot::Vacant => unreachable!("node {:?} was released", id),
        }
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Slot::Occupied(data);
                id
            }
            None => {
                let id = NodeId::new(self.slots.len());
                self.slots.push(Slot::Occupied(data));
                id
            }
        }
    }

    /// Append a new node as the last child of `parent`.
    pub(crate) fn append(&mut self, parent: NodeId, kind: NodeKind, link_parent: bool) -> NodeId {
        let id = self.alloc(NodeData {
            parent: link_parent.then_some(parent),
            children: Vec::new(),
            kind,
        });
        self.node_data_mut(parent).children.push(id);
        id
    }

    pub(crate) fn attributes_mut(&mut self, id: NodeId) -> Option<&mut Attributes> {
        match &mut self.node_data_mut(id).kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            NodeKind::Text(_) => None,
        }
    }

    pub(crate) fn clear_parent(&mut self, id: NodeId) {
        self.node_data_mut(id).parent = None;
    }

    /// Detach every child of `id`, returning their handles.
    pub(crate) fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        std::mem::take(&mut self.node_data_mut(id).children)
    }

    /// Release a detached subtree, returning its slots to the free list.
    pub(crate) fn release(&mut self, id: NodeId) {
        debug_assert_ne!(id, self.root, "the root cannot be released");
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Slot::Occupied(data) = std::mem::replace(&mut self.slots[next.index()], Slot::Vacant) {
                pending.extend(data.children);
                self.free.push(next);
            }
        }
    }
}

impl PartialEq for Document {
    /// Structural equality of the two trees; handles and parent links are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}

// ============================================================================
// NodeRef (navigation handle)
// ============================================================================

/// A read-only handle for navigating the document tree.
///
/// This is a lightweight reference that borrows from the document. Handlers
/// receive these during dispatch; call [`NodeRef::to_document`] to keep a
/// subtree beyond the callback.
#[derive(Clone, Copy)]
pub struct NodeRef<'d> {
    doc: &'d Document,
    id: NodeId,
}

impl<'d> NodeRef<'d> {
    pub(crate) fn new(doc: &'d Document, id: NodeId) -> Self {
        NodeRef { doc, id }
    }

    /// Get the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The document this node lives in.
    pub fn document(&self) -> &'d Document {
        self.doc
    }

    /// Get the node's payload.
    pub fn kind(&self) -> &'d NodeKind {
        &self.doc.node_data(self.id).kind
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind() {
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
        }
    }

    /// Element name; empty for text nodes.
    pub fn name(&self) -> &'d str {
        match self.kind() {
            NodeKind::Element { name, .. } => name,
            NodeKind::Text(_) => "",
        }
    }

    /// Text content; empty for element nodes.
    pub fn value(&self) -> &'d str {
        match self.kind() {
            NodeKind::Element { .. } => "",
            NodeKind::Text(text) => text,
        }
    }

    /// Attribute map; always empty for text nodes.
    pub fn attributes(&self) -> &'d Attributes {
        match self.kind() {
            NodeKind::Element { attributes, .. } => attributes,
            NodeKind::Text(_) => &NO_ATTRIBUTES,
        }
    }

    /// Get an attribute value by name.
    pub fn attr(&self, key: &str) -> Option<&'d str> {
        self.attributes().get(key)
    }

    /// Get the parent node, if a back-reference is kept.
    pub fn parent(&self) -> Option<NodeRef<'d>> {
        self.doc
            .node_data(self.id)
            .parent
            .map(|id| NodeRef { doc: self.doc, id })
    }

    /// Iterate over child nodes in document order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'d>> + 'd {
        let doc = self.doc;
        doc.node_data(self.id)
            .children
            .iter()
            .map(move |&id| NodeRef { doc, id })
    }

    pub fn child_count(&self) -> usize {
        self.doc.node_data(self.id).children.len()
    }

    /// Get the first child node.
    pub fn first_child(&self) -> Option<NodeRef<'d>> {
        self.doc
            .node_data(self.id)
            .children
            .first()
            .map(|&id| NodeRef { doc: self.doc, id })
    }

    /// Get the last child node.
    pub fn last_child(&self) -> Option<NodeRef<'d>> {
        self.doc
            .node_data(self.id)
            .children
            .last()
            .map(|&id| NodeRef { doc: self.doc, id })
    }

    /// Get the next sibling node. Requires a parent back-reference.
    pub fn next_sibling(&self) -> Option<NodeRef<'d>> {
        let siblings = &self.doc.node_data(self.parent()?.id).children;
        let pos = siblings.iter().position(|&id| id == self.id)?;
        siblings.get(pos + 1).map(|&id| NodeRef { doc: self.doc, id })
    }

    /// Get the previous sibling node. Requires a parent back-reference.
    pub fn prev_sibling(&self) -> Option<NodeRef<'d>> {
        let siblings = &self.doc.node_data(self.parent()?.id).children;
        let pos = siblings.iter().position(|&id| id == self.id)?;
        pos.checked_sub(1).map(|prev| NodeRef { doc: self.doc, id: siblings[prev] })
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind(), NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind(), NodeKind::Text(_))
    }

    /// Get text content if this is a text node.
    pub fn text_content(&self) -> Option<&'d str> {
        match self.kind() {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// Recursively collect all text content under this node.
    pub fn all_text(&self) -> String {
        let mut result = String::new();
        for node in self.descendants() {
            if let Some(text) = node.text_content() {
                result.push_str(text);
            }
        }
        result
    }

    /// Pre-order traversal of this node and everything below it.
    pub fn descendants(&self) -> Descendants<'d> {
        Descendants {
            doc: self.doc,
            stack: vec![self.id],
        }
    }

    /// Deep-copy this subtree into a standalone document.
    ///
    /// Parent links inside the copy mirror the source; the new root has none.
    pub fn to_document(&self) -> Document {
        let mut copy = Document::with_root("");
        let root = copy.root;
        copy.node_data_mut(root).kind = self.kind().clone();
        for child in self.children() {
            copy_subtree(child, &mut copy, root);
        }
        copy
    }
}

fn copy_subtree(src: NodeRef<'_>, dst: &mut Document, parent: NodeId) {
    let link_parent = src.doc.node_data(src.id).parent.is_some();
    let id = dst.append(parent, src.kind().clone(), link_parent);
    // the cloned kind carries no children; rebuild them with fresh handles
    for child in src.children() {
        copy_subtree(child, dst, id);
    }
}

impl PartialEq for NodeRef<'_> {
    /// Structural equality: name, kind, value, attributes and children.
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && self.child_count() == other.child_count()
            && self.children().zip(other.children()).all(|(a, b)| a == b)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", self.kind())
            .field("children", &self.child_count())
            .finish()
    }
}

/// Iterator returned by [`NodeRef::descendants`].
pub struct Descendants<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl<'d> Iterator for Descendants<'d> {
    type Item = NodeRef<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.node_data(id).children.iter().rev().copied());
        Some(NodeRef { doc: self.doc, id })
    }
}

// ============================================================================
// Serialization
// ============================================================================

#[cfg(feature = "serde")]
mod ser {
    use super::{Attributes, Document, NodeRef};
    use serde::ser::{Serialize, SerializeStruct, Serializer};

    impl Serialize for Attributes {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_map(self.iter())
        }
    }

    struct Children<'d>(NodeRef<'d>);

    impl Serialize for Children<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.0.children())
        }
    }

    impl Serialize for NodeRef<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut node = serializer.serialize_struct("Node", 5)?;
            node.serialize_field("name", self.name())?;
            node.serialize_field("type", &self.node_type())?;
            node.serialize_field("value", self.value())?;
            node.serialize_field("attributes", self.attributes())?;
            node.serialize_field("children", &Children(*self))?;
            node.end()
        }
    }

    impl Serialize for Document {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.root().serialize(serializer)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
