//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use soundgen_rs::graph::{ComponentId, Graph, PinId};

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Input pin by parameter name, panicking with a readable message
pub fn input(graph: &Graph, component: ComponentId, name: &str) -> PinId {
    graph
        .input_named(component, name)
        .unwrap_or_else(|| panic!("{:?} has no input '{}'", component, name))
}

/// The `out` pin of a component
pub fn output(graph: &Graph, component: ComponentId) -> PinId {
    graph
        .output_named(component, "out")
        .unwrap_or_else(|| panic!("{:?} has no output 'out'", component))
}

/// Every link is acyclic-consistent: the plan schedules every live component
pub fn assert_fully_scheduled(graph: &mut Graph) {
    let count = graph.component_count();
    let plan = graph.plan();
    assert_eq!(plan.stats.unscheduled, 0, "plan left components unscheduled");
    assert_eq!(plan.order.len(), count);
}
