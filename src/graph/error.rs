//! Graph-specific error types.
//!
//! Every connection error is a rejection: the requested mutation is refused
//! and the graph stays in its last valid state.

use crate::graph::id::{ComponentId, LinkId, PinId};
use crate::graph::pin::PinRole;
use thiserror::Error;

/// Errors returned by topology operations on a [`Graph`](crate::graph::Graph).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Cannot link {a:?} to {b:?}: both pins belong to the same component")]
    SameComponent { a: PinId, b: PinId },

    #[error("Cannot link {a:?} to {b:?}: a link needs exactly one output and one input")]
    RoleMismatch { a: PinId, b: PinId },

    #[error("Input {input:?} is already driven by link {existing:?}")]
    InputAlreadyBound { input: PinId, existing: LinkId },

    #[error("Linking {output:?} to {input:?} would create a dependency cycle")]
    CycleRejected { output: PinId, input: PinId },

    #[error("{output:?} is already linked to {input:?} by {existing:?}")]
    DuplicateLink {
        output: PinId,
        input: PinId,
        existing: LinkId,
    },

    #[error("Unknown component: {0:?}")]
    UnknownComponent(ComponentId),

    #[error("Unknown pin: {0:?}")]
    UnknownPin(PinId),

    #[error("Unknown link: {0:?}")]
    UnknownLink(LinkId),

    #[error("Link {link:?} refers to pin {pin:?} whose component no longer exists")]
    DanglingReference { link: LinkId, pin: PinId },

    #[error("Graph is full: at most {limit} components can be added")]
    ComponentLimit { limit: usize },

    #[error("Component declares {count} {role:?} pins, at most {limit} are addressable")]
    TooManyPins {
        role: PinRole,
        count: usize,
        limit: usize,
    },
}

impl GraphError {
    /// Whether this error is a refused connection (as opposed to a bad handle
    /// or a broken invariant).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            GraphError::SameComponent { .. }
                | GraphError::RoleMismatch { .. }
                | GraphError::InputAlreadyBound { .. }
                | GraphError::CycleRejected { .. }
                | GraphError::DuplicateLink { .. }
        )
    }
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Failure reported by a component's evaluation step.
///
/// Never escapes a tick: the graph substitutes the fallback value for the
/// failing component's outputs and carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Input '{input}' out of domain: {value}")]
    Domain { input: &'static str, value: f64 },

    #[error("Output {index} is not finite")]
    NonFinite { index: usize },

    #[error("{0}")]
    Other(String),
}
