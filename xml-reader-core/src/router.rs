//! Event routing for completed elements and documents.
//!
//! The assembler publishes a typed [`Notification`]; the router maps it to a
//! string event name at the boundary (`tag_prefix + name` for elements, the
//! configured done event for the document) and calls the subscribed
//! handlers synchronously.
//!
//! Per notification the handlers run in this order:
//! 1. named handlers (`on`, `on_tag`, `on_done`) in registration order
//! 2. element handlers (`on_element`), element notifications only
//! 3. catch-all handlers (`on_notification`)

use std::collections::HashMap;
use std::fmt;

use crate::tree::NodeRef;

/// A completion published by the assembler.
#[derive(Debug, Clone, Copy)]
pub enum Notification<'d> {
    /// An element was sealed by its matching closing tag.
    Element(NodeRef<'d>),
    /// The root element was sealed; the document is complete.
    Document(NodeRef<'d>),
}

impl<'d> Notification<'d> {
    /// The node carried by the notification.
    pub fn node(&self) -> NodeRef<'d> {
        match *self {
            Notification::Element(node) | Notification::Document(node) => node,
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Notification::Document(_))
    }
}

/// Handle returned by every subscription, used with [`Router::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type NodeHandler<'h> = Box<dyn FnMut(NodeRef<'_>) + 'h>;
type ElementHandler<'h> = Box<dyn FnMut(&str, NodeRef<'_>) + 'h>;
type NotificationHandler<'h> = Box<dyn FnMut(&Notification<'_>) + 'h>;

/// Dispatcher from event names to handlers.
///
/// `'h` bounds what handlers may borrow.
pub struct Router<'h> {
    tag_prefix: String,
    done_event: String,
    next_id: u64,
    named: HashMap<String, Vec<(Subscription, NodeHandler<'h>)>>,
    elements: Vec<(Subscription, ElementHandler<'h>)>,
    catch_all: Vec<(Subscription, NotificationHandler<'h>)>,
    /// Reused buffer for building event names.
    key: String,
}

impl<'h> Router<'h> {
    pub fn new(tag_prefix: impl Into<String>, done_event: impl Into<String>) -> Self {
        Self {
            tag_prefix: tag_prefix.into(),
            done_event: done_event.into(),
            next_id: 0,
            named: HashMap::new(),
            elements: Vec::new(),
            catch_all: Vec::new(),
            key: String::new(),
        }
    }

    pub fn tag_prefix(&self) -> &str {
        &self.tag_prefix
    }

    pub fn done_event(&self) -> &str {
        &self.done_event
    }

    /// The string event name a notification is published under.
    pub fn event_name(&self, notification: &Notification<'_>) -> String {
        match notification {
            Notification::Element(node) => format!("{}{}", self.tag_prefix, node.name()),
            Notification::Document(_) => self.done_event.clone(),
        }
    }

    fn next_subscription(&mut self) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        id
    }

    /// Subscribe to a raw event name.
    pub fn on<F>(&mut self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: FnMut(NodeRef<'_>) + 'h,
    {
        let id = self.next_subscription();
        self.named
            .entry(event.into())
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Subscribe to completions of elements named `tag`.
    pub fn on_tag<F>(&mut self, tag: &str, handler: F) -> Subscription
    where
        F: FnMut(NodeRef<'_>) + 'h,
    {
        let event = format!("{}{}", self.tag_prefix, tag);
        self.on(event, handler)
    }

    /// Subscribe to document completion.
    pub fn on_done<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(NodeRef<'_>) + 'h,
    {
        let event = self.done_event.clone();
        self.on(event, handler)
    }

    /// Subscribe to every element completion; the handler gets the tag name.
    pub fn on_element<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&str, NodeRef<'_>) + 'h,
    {
        let id = self.next_subscription();
        self.elements.push((id, Box::new(handler)));
        id
    }

    /// Subscribe to every notification, element or document.
    pub fn on_notification<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&Notification<'_>) + 'h,
    {
        let id = self.next_subscription();
        self.catch_all.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn off(&mut self, subscription: Subscription) -> bool {
        let before = self.handler_count();
        for handlers in self.named.values_mut() {
            handlers.retain(|(id, _)| *id != subscription);
        }
        self.named.retain(|_, handlers| !handlers.is_empty());
        self.elements.retain(|(id, _)| *id != subscription);
        self.catch_all.retain(|(id, _)| *id != subscription);
        self.handler_count() != before
    }

    /// Total number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.named.values().map(Vec::len).sum::<usize>() + self.elements.len() + self.catch_all.len()
    }

    /// Deliver a notification to every matching handler.
    pub fn dispatch(&mut self, notification: &Notification<'_>) {
        let node = notification.node();
        self.key.clear();
        match notification {
            Notification::Element(_) => {
                self.key.push_str(&self.tag_prefix);
                self.key.push_str(node.name());
            }
            Notification::Document(_) => self.key.push_str(&self.done_event),
        }
        log::trace!(target: "xml_reader::router", "dispatch {:?}", self.key);

        if let Some(handlers) = self.named.get_mut(self.key.as_str()) {
            for (_, handler) in handlers.iter_mut() {
                handler(node);
            }
        }
        if let Notification::Element(_) = notification {
            for (_, handler) in self.elements.iter_mut() {
                handler(node.name(), node);
            }
        }
        for (_, handler) in self.catch_all.iter_mut() {
            handler(notification);
        }
    }
}

impl fmt::Debug for Router<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("tag_prefix", &self.tag_prefix)
            .field("done_event", &self.done_event)
            .field("handlers", &self.handler_count())
            .finish()
    }
}
