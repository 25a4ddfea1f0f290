//! Component parameters: a named input with an editable default.
//!
//! The default and the driven value are tracked independently. Connecting a
//! link only changes which one `effective_value` reports; it never overwrites
//! the default, so disconnecting resumes from the last value the user set.

use crate::graph::pin::InputPin;

/// A named slot on a component, backed by exactly one input pin.
#[derive(Debug, Clone)]
pub struct ComponentParameter {
    name: &'static str,
    default: f64,
    pub(crate) pin: InputPin,
}

impl ComponentParameter {
    pub fn new(name: &'static str, default: f64) -> Self {
        Self {
            name,
            default,
            pin: InputPin::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The user-set default, regardless of whether the parameter is driven.
    pub fn default_value(&self) -> f64 {
        self.default
    }

    /// Always accepted, even while driven.
    pub fn set_default(&mut self, value: f64) {
        self.default = value;
    }

    /// True iff the backing input pin has an active link.
    pub fn is_driven(&self) -> bool {
        self.pin.is_connected()
    }

    /// The value the component reads this tick.
    pub fn effective_value(&self) -> f64 {
        if self.is_driven() {
            self.pin.pulled
        } else {
            self.default
        }
    }

    pub fn pin(&self) -> &InputPin {
        &self.pin
    }
}
