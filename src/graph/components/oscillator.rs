//! OscillatorComponent: phase-accumulator tone generator.
//!
//! The waveform math is intentionally naive (no band-limiting); the engine
//! only cares that the component honours the evaluation contract.

use crate::graph::component::EvalContext;
use crate::graph::error::EvalError;
use crate::graph::pin::PinDescriptor;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

static PINS: &[PinDescriptor] = &[
    PinDescriptor::input("frequency", 440.0),
    PinDescriptor::input("amplitude", 1.0),
    PinDescriptor::input("offset", 0.0),
    PinDescriptor::output("out"),
];

/// Oscillator wave shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Saw,
    Triangle,
}

impl Waveform {
    /// Sample the waveform at `phase` in `[0, 1)`. Output range is `[-1, 1]`.
    pub fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        }
    }
}

impl std::fmt::Display for Waveform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Waveform::Sine => write!(f, "Sine"),
            Waveform::Square => write!(f, "Square"),
            Waveform::Saw => write!(f, "Saw"),
            Waveform::Triangle => write!(f, "Triangle"),
        }
    }
}

/// `out = offset + amplitude * wave(phase)`, phase advancing by
/// `frequency / sample_rate` each tick.
#[derive(Debug)]
pub struct OscillatorComponent {
    waveform: Waveform,
    phase: f64,
}

impl OscillatorComponent {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        "Oscillator"
    }

    pub fn pins(&self) -> &[PinDescriptor] {
        PINS
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn evaluate(&mut self, ctx: &mut EvalContext) -> Result<(), EvalError> {
        let frequency = ctx.input(0);
        if !frequency.is_finite() {
            return Err(EvalError::Domain {
                input: "frequency",
                value: frequency,
            });
        }
        let amplitude = ctx.input(1);
        let offset = ctx.input(2);

        ctx.set_output(0, offset + amplitude * self.waveform.sample(self.phase));

        // rem_euclid keeps the phase in [0, 1) for negative frequencies too
        self.phase = (self.phase + frequency * ctx.dt()).rem_euclid(1.0);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

impl Default for OscillatorComponent {
    fn default() -> Self {
        Self::new(Waveform::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(osc: &mut OscillatorComponent, inputs: [f64; 3], sample_rate: f64) -> Result<f64, EvalError> {
        let mut outputs = [0.0];
        let mut ctx = EvalContext {
            inputs: &inputs,
            outputs: &mut outputs,
            sample_rate,
            time: 0.0,
            tick: 0,
        };
        osc.evaluate(&mut ctx)?;
        Ok(outputs[0])
    }

    #[test]
    fn test_square_wave_period() {
        let mut osc = OscillatorComponent::new(Waveform::Square);
        // 1 Hz at 4 Hz sample rate: +1, +1, -1, -1, then repeats
        let samples: Vec<f64> = (0..5)
            .map(|_| run(&mut osc, [1.0, 1.0, 0.0], 4.0).unwrap())
            .collect();
        assert_eq!(samples, vec![1.0, 1.0, -1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_amplitude_and_offset() {
        let mut osc = OscillatorComponent::new(Waveform::Saw);
        // phase 0 → saw = -1
        let out = run(&mut osc, [1.0, 0.5, 2.0], 48_000.0).unwrap();
        assert_eq!(out, 1.5);
    }

    #[test]
    fn test_non_finite_frequency_is_domain_error() {
        let mut osc = OscillatorComponent::new(Waveform::Sine);
        let err = run(&mut osc, [f64::NAN, 1.0, 0.0], 48_000.0).unwrap_err();
        assert!(matches!(err, EvalError::Domain { input: "frequency", .. }));
        // Phase must not be corrupted by the rejected tick
        assert_eq!(osc.phase(), 0.0);
    }

    #[test]
    fn test_negative_frequency_wraps_phase() {
        let mut osc = OscillatorComponent::new(Waveform::Sine);
        run(&mut osc, [-1.0, 1.0, 0.0], 4.0).unwrap();
        assert!((osc.phase() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_phase() {
        let mut osc = OscillatorComponent::new(Waveform::Triangle);
        run(&mut osc, [1.0, 1.0, 0.0], 8.0).unwrap();
        assert!(osc.phase() > 0.0);
        osc.reset();
        assert_eq!(osc.phase(), 0.0);
    }

    #[test]
    fn test_waveform_ranges() {
        for wave in [Waveform::Sine, Waveform::Square, Waveform::Saw, Waveform::Triangle] {
            for i in 0..100 {
                let v = wave.sample(i as f64 / 100.0);
                assert!((-1.0..=1.0).contains(&v), "{} out of range at {}", wave, i);
            }
        }
    }
}
