use crate::graph::id::ComponentId;

/// Compiled evaluation plan for a graph topology.
/// Contains every live component, dependencies first.
#[derive(Debug, Clone)]
pub struct EvaluationPlan {
    /// Live components in topological order (ties broken by insertion order)
    pub order: Vec<ComponentId>,

    /// Topology generation this plan was compiled from
    pub generation: u64,

    /// Compilation statistics
    pub stats: PlanStats,
}

/// Statistics about the compiled plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanStats {
    /// Number of live components
    pub total_components: usize,

    /// Number of live links
    pub total_links: usize,

    /// Components with no incoming links
    pub root_components: usize,

    /// Components with no outgoing links
    pub leaf_components: usize,

    /// Components left out of the order because they sit on a cycle.
    /// Always zero unless a graph invariant has been broken.
    pub unscheduled: usize,

    /// Compilation time in microseconds
    pub compile_time_us: u64,
}

impl EvaluationPlan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            generation: 0,
            stats: PlanStats::default(),
        }
    }

    /// Check if the plan schedules any component
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of `component` in the order, if scheduled
    pub fn position(&self, component: ComponentId) -> Option<usize> {
        self.order.iter().position(|&c| c == component)
    }
}

impl Default for EvaluationPlan {
    fn default() -> Self {
        Self::new()
    }
}
