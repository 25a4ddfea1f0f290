//! Test data builders for creating test graphs

use soundgen_rs::config::{EngineSettings, ReconnectPolicy};
use soundgen_rs::graph::{ComponentId, ComponentKind, Graph};
use std::collections::HashMap;

/// Builder for creating test graphs with named components
pub struct GraphBuilder {
    graph: Graph,
    names: HashMap<&'static str, ComponentId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            graph: Graph::new(settings),
            names: HashMap::new(),
        }
    }

    pub fn policy(policy: ReconnectPolicy) -> Self {
        Self::with_settings(EngineSettings::default().with_policy(policy))
    }

    pub fn component(mut self, name: &'static str, kind: ComponentKind) -> Self {
        let id = self.graph.add_builtin(kind).unwrap();
        self.names.insert(name, id);
        self
    }

    pub fn default_value(mut self, name: &'static str, param: &str, value: f64) -> Self {
        let pin = self.graph.input_named(self.names[name], param).unwrap();
        self.graph.set_default(pin, value).unwrap();
        self
    }

    /// Link `from.out` into `to.param`
    pub fn link(mut self, from: &'static str, to: &'static str, param: &str) -> Self {
        let output = self.graph.output_named(self.names[from], "out").unwrap();
        let input = self.graph.input_named(self.names[to], param).unwrap();
        self.graph.connect(output, input).unwrap();
        self
    }

    pub fn build(self) -> (Graph, HashMap<&'static str, ComponentId>) {
        (self.graph, self.names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_builder() {
        let (graph, ids) = GraphBuilder::new()
            .component("k", ComponentKind::Constant)
            .component("g", ComponentKind::Gain)
            .default_value("k", "value", 2.0)
            .link("k", "g", "in")
            .build();

        assert_eq!(graph.component_count(), 2);
        assert_eq!(graph.link_count(), 1);
        assert!(ids.contains_key("g"));
    }
}
