//! Built-in component implementations.

pub mod constant;
pub mod gain;
pub mod mixer;
pub mod oscillator;
pub mod scope;

pub use constant::ConstantComponent;
pub use gain::GainComponent;
pub use mixer::MixerComponent;
pub use oscillator::{OscillatorComponent, Waveform};
pub use scope::ScopeComponent;
