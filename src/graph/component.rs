//! Component abstraction for the graph.
//!
//! Two-layer design:
//! - **`ComponentPlugin` trait**: for user-defined components.
//! - **`BuiltinComponent` enum**: for all built-in components. The compiler can
//!   inline match arms, eliminating dynamic dispatch on the tick path.
//!
//! `AnyComponent` wraps either variant so the graph can handle both uniformly.
//!
//! A component never sees the graph: `evaluate` gets its input values and its
//! own output slots through [`EvalContext`], so it cannot change topology.

use crate::graph::component_kind::ComponentKind;
use crate::graph::components::{
    ConstantComponent, GainComponent, MixerComponent, OscillatorComponent, ScopeComponent,
};
use crate::graph::error::EvalError;
use crate::graph::pin::PinDescriptor;

/// Context passed to a component's evaluation step each tick.
pub struct EvalContext<'a> {
    /// Effective parameter values, in input pin order.
    pub inputs: &'a [f64],
    /// Output slots, in output pin order. Pre-filled with last tick's values.
    pub outputs: &'a mut [f64],
    /// Graph sample rate in Hz.
    pub sample_rate: f64,
    /// Seconds since the graph started ticking.
    pub time: f64,
    /// Monotonic tick counter.
    pub tick: u64,
}

impl<'a> EvalContext<'a> {
    /// Effective value of input `index`, or 0.0 for an undeclared input.
    #[inline]
    pub fn input(&self, index: usize) -> f64 {
        self.inputs.get(index).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn set_output(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.outputs.get_mut(index) {
            *slot = value;
        }
    }

    /// Seconds per tick.
    #[inline]
    pub fn dt(&self) -> f64 {
        1.0 / self.sample_rate
    }
}

/// Trait for pluggable/user-defined components.
pub trait ComponentPlugin: Send {
    /// Human-readable name of this component.
    fn name(&self) -> &str;

    /// Pin descriptors. Must not change after the component is added.
    fn pins(&self) -> &[PinDescriptor];

    /// Compute new outputs from the current inputs.
    fn evaluate(&mut self, ctx: &mut EvalContext) -> Result<(), EvalError>;

    /// Clear any internal state (phase, history).
    fn reset(&mut self) {}
}

/// Enum dispatch for built-in components.
pub enum BuiltinComponent {
    Constant(ConstantComponent),
    Oscillator(OscillatorComponent),
    Mixer(MixerComponent),
    Gain(GainComponent),
    Scope(ScopeComponent),
}

impl BuiltinComponent {
    pub fn name(&self) -> &str {
        match self {
            BuiltinComponent::Constant(c) => c.name(),
            BuiltinComponent::Oscillator(c) => c.name(),
            BuiltinComponent::Mixer(c) => c.name(),
            BuiltinComponent::Gain(c) => c.name(),
            BuiltinComponent::Scope(c) => c.name(),
        }
    }

    pub fn pins(&self) -> &[PinDescriptor] {
        match self {
            BuiltinComponent::Constant(c) => c.pins(),
            BuiltinComponent::Oscillator(c) => c.pins(),
            BuiltinComponent::Mixer(c) => c.pins(),
            BuiltinComponent::Gain(c) => c.pins(),
            BuiltinComponent::Scope(c) => c.pins(),
        }
    }

    pub fn evaluate(&mut self, ctx: &mut EvalContext) -> Result<(), EvalError> {
        match self {
            BuiltinComponent::Constant(c) => c.evaluate(ctx),
            BuiltinComponent::Oscillator(c) => c.evaluate(ctx),
            BuiltinComponent::Mixer(c) => c.evaluate(ctx),
            BuiltinComponent::Gain(c) => c.evaluate(ctx),
            BuiltinComponent::Scope(c) => c.evaluate(ctx),
        }
    }

    pub fn reset(&mut self) {
        match self {
            BuiltinComponent::Constant(_) => {}
            BuiltinComponent::Oscillator(c) => c.reset(),
            BuiltinComponent::Mixer(_) => {}
            BuiltinComponent::Gain(_) => {}
            BuiltinComponent::Scope(c) => c.reset(),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            BuiltinComponent::Constant(_) => ComponentKind::Constant,
            BuiltinComponent::Oscillator(c) => ComponentKind::Oscillator(c.waveform()),
            BuiltinComponent::Mixer(_) => ComponentKind::Mixer,
            BuiltinComponent::Gain(_) => ComponentKind::Gain,
            BuiltinComponent::Scope(_) => ComponentKind::Scope,
        }
    }
}

/// Wrapper that holds either a built-in component or a plugin (trait object).
pub enum AnyComponent {
    Builtin(BuiltinComponent),
    Plugin(Box<dyn ComponentPlugin>),
}

impl AnyComponent {
    pub fn plugin(plugin: impl ComponentPlugin + 'static) -> Self {
        AnyComponent::Plugin(Box::new(plugin))
    }

    pub fn name(&self) -> &str {
        match self {
            AnyComponent::Builtin(c) => c.name(),
            AnyComponent::Plugin(c) => c.name(),
        }
    }

    pub fn pins(&self) -> &[PinDescriptor] {
        match self {
            AnyComponent::Builtin(c) => c.pins(),
            AnyComponent::Plugin(c) => c.pins(),
        }
    }

    pub fn evaluate(&mut self, ctx: &mut EvalContext) -> Result<(), EvalError> {
        match self {
            AnyComponent::Builtin(c) => c.evaluate(ctx),
            AnyComponent::Plugin(c) => c.evaluate(ctx),
        }
    }

    pub fn reset(&mut self) {
        match self {
            AnyComponent::Builtin(c) => c.reset(),
            AnyComponent::Plugin(c) => c.reset(),
        }
    }

    /// Factory kind for built-ins; `None` for plugins.
    pub fn kind(&self) -> Option<ComponentKind> {
        match self {
            AnyComponent::Builtin(c) => Some(c.kind()),
            AnyComponent::Plugin(_) => None,
        }
    }

    /// Convenience accessor for the scope sink's recorded history.
    pub fn as_scope(&self) -> Option<&ScopeComponent> {
        match self {
            AnyComponent::Builtin(BuiltinComponent::Scope(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<BuiltinComponent> for AnyComponent {
    fn from(component: BuiltinComponent) -> Self {
        AnyComponent::Builtin(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_out_of_range_access() {
        let inputs = [1.0, 2.0];
        let mut outputs = [0.0];
        let mut ctx = EvalContext {
            inputs: &inputs,
            outputs: &mut outputs,
            sample_rate: 48_000.0,
            time: 0.0,
            tick: 0,
        };

        assert_eq!(ctx.input(1), 2.0);
        assert_eq!(ctx.input(5), 0.0);
        ctx.set_output(0, 4.0);
        ctx.set_output(3, 9.0);
        assert_eq!(outputs, [4.0]);
    }

    #[test]
    fn test_builtin_reports_kind() {
        let any = AnyComponent::from(BuiltinComponent::Gain(GainComponent::new()));
        assert_eq!(any.kind(), Some(ComponentKind::Gain));
        assert_eq!(any.name(), "Gain");
        assert!(any.as_scope().is_none());
    }
}
