//! # soundgen-rs: dataflow graph engine for a node-based synth editor
//!
//! Components (oscillators, mixers, gains, scopes, user plugins) are wired
//! together by links from output pins to input pins. The engine validates
//! every edit, keeps the graph acyclic and evaluates it once per tick in
//! dependency order.
//!
//! ## Architecture
//!
//! - **Graph**: Components, pins, parameters, links and the evaluation pass
//! - **Bridge**: Crossbeam channels between an editor thread and the graph owner
//! - **Config**: `settings.toml` for engine/logging options, JSON patch files
//!
//! ## Configuration
//!
//! Settings are stored in the platform-appropriate data directory under
//! `dev.soundgen.soundgen-rs`:
//!
//! - **Linux**: `~/.local/share/dev.soundgen.soundgen-rs/`
//! - **macOS**: `~/Library/Application Support/dev.soundgen.soundgen-rs/`
//! - **Windows**: `%APPDATA%\dev.soundgen.soundgen-rs\`
//!
//! ## Example
//!
//! ```ignore
//! use soundgen_rs::graph::{ComponentKind, Graph, Waveform};
//!
//! let mut graph = Graph::default();
//! let osc = graph.add_builtin(ComponentKind::Oscillator(Waveform::Sine))?;
//! let scope = graph.add_builtin(ComponentKind::Scope)?;
//!
//! let out = graph.output_named(osc, "out").unwrap();
//! let input = graph.input_named(scope, "in").unwrap();
//! graph.connect(out, input)?;
//!
//! for _ in 0..480 {
//!     graph.tick();
//! }
//! ```

pub mod config;
pub mod error;
pub mod graph;

// Re-export commonly used types
pub use config::{AppConfig, EngineSettings, PatchFile, ReconnectPolicy};
pub use error::{Result, SoundGenError};
pub use graph::{ComponentId, ComponentKind, Graph, GraphError, LinkId, PinId};
