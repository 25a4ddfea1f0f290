//! GainComponent: multiplies a signal by a gain parameter.

use crate::graph::component::EvalContext;
use crate::graph::error::EvalError;
use crate::graph::pin::PinDescriptor;

static PINS: &[PinDescriptor] = &[
    PinDescriptor::input("in", 0.0),
    PinDescriptor::input("gain", 1.0),
    PinDescriptor::output("out"),
];

/// `out = in * gain`. Driving `gain` from an oscillator gives tremolo / AM.
#[derive(Debug, Default)]
pub struct GainComponent;

impl GainComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &str {
        "Gain"
    }

    pub fn pins(&self) -> &[PinDescriptor] {
        PINS
    }

    pub fn evaluate(&mut self, ctx: &mut EvalContext) -> Result<(), EvalError> {
        let out = ctx.input(0) * ctx.input(1);
        ctx.set_output(0, out);
        Ok(())
    }
}
