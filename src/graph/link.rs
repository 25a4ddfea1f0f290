//! Links: directed edges from one output pin to one input pin.
//!
//! Links are only ever created by `Graph::connect`; this module holds the
//! plain data and local traversal helpers.

use crate::graph::id::{ComponentId, LinkId, PinId};

/// Which end of a link is being addressed (used when re-pointing a link).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEnd {
    /// The output pin the value comes from.
    Source,
    /// The input pin the value flows into.
    Destination,
}

/// A directed edge carrying one output's value into one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    pub source: PinId,
    pub destination: PinId,
}

impl Link {
    pub fn source_component(&self) -> ComponentId {
        self.source.component()
    }

    pub fn destination_component(&self) -> ComponentId {
        self.destination.component()
    }

    pub fn endpoint(&self, end: LinkEnd) -> PinId {
        match end {
            LinkEnd::Source => self.source,
            LinkEnd::Destination => self.destination,
        }
    }

    /// Given one endpoint, return the other. `None` if `pin` is not an
    /// endpoint of this link.
    pub fn other_end(&self, pin: PinId) -> Option<PinId> {
        if pin == self.source {
            Some(self.destination)
        } else if pin == self.destination {
            Some(self.source)
        } else {
            None
        }
    }
}
