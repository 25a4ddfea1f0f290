//! Pins: the connection points on a component.
//!
//! Each component type declares its pins via a static `PinDescriptor` array.
//! The graph instantiates one `InputPin` (wrapped in a parameter) per input
//! descriptor and one `OutputPin` per output descriptor, and uses the
//! descriptors to validate link requests.

use crate::graph::id::LinkId;

/// Whether a pin consumes or produces a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinRole {
    Input,
    Output,
}

/// Static descriptor for a component's pin.
///
/// `default` is the initial parameter default for inputs and is ignored for
/// outputs.
#[derive(Debug, Clone)]
pub struct PinDescriptor {
    pub name: &'static str,
    pub role: PinRole,
    pub default: f64,
}

impl PinDescriptor {
    pub const fn input(name: &'static str, default: f64) -> Self {
        Self {
            name,
            role: PinRole::Input,
            default,
        }
    }

    pub const fn output(name: &'static str) -> Self {
        Self {
            name,
            role: PinRole::Output,
            default: 0.0,
        }
    }
}

/// Runtime state of an input pin.
///
/// At most one link may target an input. `pulled` holds the value most
/// recently read through that link and is meaningless while unconnected.
#[derive(Debug, Clone, Default)]
pub struct InputPin {
    pub(crate) link: Option<LinkId>,
    pub(crate) pulled: f64,
}

impl InputPin {
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    pub fn link(&self) -> Option<LinkId> {
        self.link
    }

    /// Last value pulled from the connected source.
    pub fn pulled(&self) -> f64 {
        self.pulled
    }
}

/// Runtime state of an output pin. Fan-out is unrestricted.
#[derive(Debug, Clone)]
pub struct OutputPin {
    pub(crate) name: &'static str,
    pub(crate) links: Vec<LinkId>,
    pub(crate) value: f64,
}

impl OutputPin {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            links: Vec::new(),
            value: 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_connected(&self) -> bool {
        !self.links.is_empty()
    }

    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    /// Last value published by the owning component.
    pub fn value(&self) -> f64 {
        self.value
    }
}
