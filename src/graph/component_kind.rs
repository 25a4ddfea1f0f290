//! Component kind enumeration for factory creation and patch files.
//!
//! This module defines the built-in components that the editor can place and
//! that a patch description can name.

use crate::graph::component::{AnyComponent, BuiltinComponent};
use crate::graph::components::scope::DEFAULT_SCOPE_CAPACITY;
use crate::graph::components::{
    ConstantComponent, GainComponent, MixerComponent, OscillatorComponent, ScopeComponent,
    Waveform,
};
use serde::{Deserialize, Serialize};

/// Types of built-in components that can be instantiated dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    // Sources
    /// A hand-edited constant value.
    Constant,
    /// A tone generator with the given wave shape.
    Oscillator(Waveform),

    // Processors
    /// Four-channel summing mixer.
    Mixer,
    /// Signal multiplied by a gain parameter.
    Gain,

    // Sinks
    /// Records incoming values for inspection.
    Scope,
}

impl ComponentKind {
    /// Get the display name for this component kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentKind::Constant => "Constant",
            ComponentKind::Oscillator(Waveform::Sine) => "Sine Oscillator",
            ComponentKind::Oscillator(Waveform::Square) => "Square Oscillator",
            ComponentKind::Oscillator(Waveform::Saw) => "Saw Oscillator",
            ComponentKind::Oscillator(Waveform::Triangle) => "Triangle Oscillator",
            ComponentKind::Mixer => "Mixer",
            ComponentKind::Gain => "Gain",
            ComponentKind::Scope => "Scope",
        }
    }

    /// Get all available component kinds.
    pub fn all() -> &'static [ComponentKind] {
        &[
            ComponentKind::Constant,
            ComponentKind::Oscillator(Waveform::Sine),
            ComponentKind::Oscillator(Waveform::Square),
            ComponentKind::Oscillator(Waveform::Saw),
            ComponentKind::Oscillator(Waveform::Triangle),
            ComponentKind::Mixer,
            ComponentKind::Gain,
            ComponentKind::Scope,
        ]
    }

    /// Check if this kind is a sink (has no outputs).
    pub fn is_sink(&self) -> bool {
        matches!(self, ComponentKind::Scope)
    }

    /// Get a detailed description of what this component does.
    pub fn description(&self) -> &'static str {
        match self {
            ComponentKind::Constant =>
                "Outputs its value parameter.\n\
                 Edit the default to set a fixed control value.",

            ComponentKind::Oscillator(_) =>
                "Generates a periodic waveform.\n\
                 Frequency, amplitude and offset are parameters\n\
                 and can be driven by other components (FM/AM).",

            ComponentKind::Mixer =>
                "Sums four inputs and scales by level.\n\
                 Use it to merge several sources into one input.",

            ComponentKind::Gain =>
                "Multiplies the input by the gain parameter.",

            ComponentKind::Scope =>
                "Records incoming values.\n\
                 Keeps the most recent samples for display.",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Factory for creating built-in components by kind.
#[derive(Debug, Clone, Copy)]
pub struct ComponentFactory {
    scope_capacity: usize,
}

impl ComponentFactory {
    pub fn new(scope_capacity: usize) -> Self {
        Self { scope_capacity }
    }

    pub fn create(&self, kind: ComponentKind) -> AnyComponent {
        let builtin = match kind {
            ComponentKind::Constant => BuiltinComponent::Constant(ConstantComponent::new()),
            ComponentKind::Oscillator(waveform) => {
                BuiltinComponent::Oscillator(OscillatorComponent::new(waveform))
            }
            ComponentKind::Mixer => BuiltinComponent::Mixer(MixerComponent::new()),
            ComponentKind::Gain => BuiltinComponent::Gain(GainComponent::new()),
            ComponentKind::Scope => {
                BuiltinComponent::Scope(ScopeComponent::new(self.scope_capacity))
            }
        };
        AnyComponent::Builtin(builtin)
    }
}

impl Default for ComponentFactory {
    fn default() -> Self {
        Self::new(DEFAULT_SCOPE_CAPACITY)
    }
}
