//! ScopeComponent: sink that records the most recent input values.
//!
//! Has no outputs. The headless renderer and tests read its history to see
//! what the graph produced.

use crate::graph::component::EvalContext;
use crate::graph::error::EvalError;
use crate::graph::pin::PinDescriptor;
use std::collections::VecDeque;

static PINS: &[PinDescriptor] = &[PinDescriptor::input("in", 0.0)];

/// Default number of retained samples.
pub const DEFAULT_SCOPE_CAPACITY: usize = 1024;

/// Ring buffer of the last `capacity` values seen on `in`.
#[derive(Debug)]
pub struct ScopeComponent {
    history: VecDeque<f64>,
    capacity: usize,
}

impl ScopeComponent {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn name(&self) -> &str {
        "Scope"
    }

    pub fn pins(&self) -> &[PinDescriptor] {
        PINS
    }

    pub fn evaluate(&mut self, ctx: &mut EvalContext) -> Result<(), EvalError> {
        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(ctx.input(0));
        Ok(())
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<f64> {
        self.history.back().copied()
    }

    /// Recorded values, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for ScopeComponent {
    fn default() -> Self {
        Self::new(DEFAULT_SCOPE_CAPACITY)
    }
}
