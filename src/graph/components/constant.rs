//! ConstantComponent: publishes its `value` parameter unchanged.

use crate::graph::component::EvalContext;
use crate::graph::error::EvalError;
use crate::graph::pin::PinDescriptor;

static PINS: &[PinDescriptor] = &[
    PinDescriptor::input("value", 0.0),
    PinDescriptor::output("out"),
];

/// Constant source. Its single parameter is usually left undriven and edited
/// by hand, but it may also be driven, in which case it acts as a relay.
#[derive(Debug, Default)]
pub struct ConstantComponent;

impl ConstantComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &str {
        "Constant"
    }

    pub fn pins(&self) -> &[PinDescriptor] {
        PINS
    }

    pub fn evaluate(&mut self, ctx: &mut EvalContext) -> Result<(), EvalError> {
        let value = ctx.input(0);
        ctx.set_output(0, value);
        Ok(())
    }
}
