//! Collecting diagnostics.
//!
//! Features:
//! - Exact-duplicate suppression (the same message reached twice through
//!   different instantiation paths is reported once)
//! - Emission order is preserved
//! - `ErrorGuaranteed` proof that errors were emitted

use std::fmt;

use rustc_hash::FxHashSet;

use crate::Message;

/// Proof that at least one error was reported.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    /// `Some` only for a nonzero error count.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then_some(ErrorGuaranteed(()))
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("error(s) emitted")
    }
}

/// Ordered, deduplicating message sink.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    messages: Vec<Message>,
    seen: FxHashSet<Message>,
    error_count: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message. Returns `false` if an identical message was already present.
    pub fn push(&mut self, message: Message) -> bool {
        if self.seen.contains(&message) {
            return false;
        }
        if message.is_error() {
            self.error_count += 1;
        }
        self.seen.insert(message.clone());
        self.messages.push(message);
        true
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        for message in messages {
            self.push(message);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Proof of failure, if any error was reported.
    pub fn guarantee(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
