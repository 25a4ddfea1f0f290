//! MixerComponent: sums up to four inputs and scales by a master level.
//!
//! Inputs accept a single link each, so this is where fan-in happens:
//! route several sources into separate mixer channels.

use crate::graph::component::EvalContext;
use crate::graph::error::EvalError;
use crate::graph::pin::PinDescriptor;

/// Number of summed channels.
pub const MIXER_CHANNELS: usize = 4;

static PINS: &[PinDescriptor] = &[
    PinDescriptor::input("in1", 0.0),
    PinDescriptor::input("in2", 0.0),
    PinDescriptor::input("in3", 0.0),
    PinDescriptor::input("in4", 0.0),
    PinDescriptor::input("level", 1.0),
    PinDescriptor::output("out"),
];

#[derive(Debug, Default)]
pub struct MixerComponent;

impl MixerComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &str {
        "Mixer"
    }

    pub fn pins(&self) -> &[PinDescriptor] {
        PINS
    }

    pub fn evaluate(&mut self, ctx: &mut EvalContext) -> Result<(), EvalError> {
        let sum: f64 = (0..MIXER_CHANNELS).map(|i| ctx.input(i)).sum();
        let level = ctx.input(MIXER_CHANNELS);
        ctx.set_output(0, sum * level);
        Ok(())
    }
}
