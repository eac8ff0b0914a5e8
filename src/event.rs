//! Error events.
//!
//! Failures of the full demosaic are reported to an [`EventSink`] owned by
//! the capture side, in addition to the empty image returned to the caller.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::{DevelopError, ErrorKind};

/// Event identifiers posted by this crate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EventCode {
    DemosaicError,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Event {
    pub code: EventCode,
    pub kind: ErrorKind,
    pub description: String,
}

impl Event {
    pub fn demosaic_error(err: &DevelopError) -> Self {
        Event {
            code: EventCode::DemosaicError,
            kind: err.kind(),
            description: err.to_string(),
        }
    }
}

/// Destination for error events. The crate only ever writes to it.
pub trait EventSink {
    fn post(&self, event: Event);
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardEvents;

impl EventSink for DiscardEvents {
    fn post(&self, _event: Event) {}
}

/// FIFO of posted events, drained by the owner.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Mutex<VecDeque<Event>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the oldest event with the given code.
    pub fn next_event(&self, code: EventCode) -> Option<Event> {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        let pos = events.iter().position(|e| e.code == code)?;
        events.remove(pos)
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for EventQueue {
    fn post(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn post(&self, event: Event) {
        (**self).post(event)
    }
}
