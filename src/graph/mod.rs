//! Dataflow graph for a node-based sound-synthesis editor.
//!
//! Components expose input pins (each backing a parameter with an editable
//! default) and output pins. Links carry an output's value into an input.
//! The graph keeps the topology acyclic, every input has at most one link,
//! and each tick evaluates components dependencies-first.
//!
//! # Architecture
//!
//! ```text
//! [Oscillator] ──► [Mixer.in1] ──► [Gain] ──► [Scope]
//! [Constant]   ──► [Mixer.in2]
//! ```
//!
//! # Design
//!
//! - **Index handles**: `ComponentId`, `PinId`, `LinkId` are plain integers;
//!   the `Graph` owns every component and link, nothing holds references.
//! - **Enum dispatch on hot path**: `BuiltinComponent` enum for built-ins,
//!   `ComponentPlugin` trait objects for everything else.
//! - **Lazy evaluation order**: topological sort cached behind a generation
//!   counter, recompiled only after topology changes.
//! - **All-or-nothing edits**: every rejected `connect`/`relink` leaves the
//!   graph exactly as it was.
//! - **Single owner**: cross-thread editing goes through `GraphBridge` /
//!   `GraphHost`, which apply commands between ticks.

pub mod bridge;
pub mod compiler;
pub mod component;
pub mod component_kind;
pub mod components;
pub mod engine;
pub mod error;
pub mod evaluation_plan;
pub mod id;
pub mod link;
pub mod parameter;
pub mod patch;
pub mod pin;

pub use bridge::{
    ComponentSnapshot, GraphBridge, GraphCommand, GraphHost, GraphMessage, LinkSnapshot,
    OutputSnapshot, ParameterSnapshot, TopologySnapshot,
};
pub use component::{AnyComponent, BuiltinComponent, ComponentPlugin, EvalContext};
pub use component_kind::{ComponentFactory, ComponentKind};
pub use components::Waveform;
pub use engine::{ComponentSlot, Graph, TickStats};
pub use error::{EvalError, GraphError, GraphResult};
pub use evaluation_plan::{EvaluationPlan, PlanStats};
pub use id::{ComponentId, LinkId, PinId};
pub use link::{Link, LinkEnd};
pub use parameter::ComponentParameter;
pub use patch::{ComponentEntry, LinkEntry, PatchDescription, PinAddress};
pub use pin::{InputPin, OutputPin, PinDescriptor, PinRole};
