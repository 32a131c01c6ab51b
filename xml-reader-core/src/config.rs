//! Reader configuration.

/// Event name used for document completion unless configured otherwise.
pub const DEFAULT_DONE_EVENT: &str = "done";

/// Prefix applied to element-completion event names unless configured otherwise.
pub const DEFAULT_TAG_PREFIX: &str = "tag:";

/// Options recognized by [`crate::Reader`].
///
/// With the `serde` feature the struct deserializes from any self-describing
/// format; missing fields take their defaults and the camelCase spellings
/// (`parentNodes`, `doneEvent`, ...) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReaderConfig {
    /// Discard completed top-level subtrees to bound memory.
    pub stream: bool,

    /// Keep parent back-references on sealed nodes.
    #[cfg_attr(feature = "serde", serde(alias = "parentNodes"))]
    pub parent_nodes: bool,

    /// Event name for document completion.
    #[cfg_attr(feature = "serde", serde(alias = "doneEvent"))]
    pub done_event: String,

    /// Prefix for element-completion event names.
    #[cfg_attr(feature = "serde", serde(alias = "tagPrefix"))]
    pub tag_prefix: String,

    /// Publish element completions only for direct children of the root.
    #[cfg_attr(feature = "serde", serde(alias = "emitTopLevelOnly"))]
    pub emit_top_level_only: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            stream: false,
            parent_nodes: true,
            done_event: DEFAULT_DONE_EVENT.to_string(),
            tag_prefix: DEFAULT_TAG_PREFIX.to_string(),
            emit_top_level_only: false,
        }
    }
}

impl ReaderConfig {
    /// Enable streaming mode.
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    pub fn with_parent_nodes(mut self, parent_nodes: bool) -> Self {
        self.parent_nodes = parent_nodes;
        self
    }

    pub fn with_done_event(mut self, done_event: impl Into<String>) -> Self {
        self.done_event = done_event.into();
        self
    }

    pub fn with_tag_prefix(mut self, tag_prefix: impl Into<String>) -> Self {
        self.tag_prefix = tag_prefix.into();
        self
    }

    /// Only publish elements whose parent is the root.
    pub fn top_level_only(mut self) -> Self {
        self.emit_top_level_only = true;
        self
    }
}
