//! Patch descriptions: a serializable graph.
//!
//! A patch lists components by a patch-local id, their parameter defaults, and
//! the links between them. Loading creates the components in file order and
//! then replays every link through [`Graph::connect`], so the same rules apply
//! as for interactive editing and a patch that would form a cycle is refused.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::EngineSettings;
use crate::error::{Result, ResultExt, SoundGenError};
use crate::graph::component_kind::ComponentKind;
use crate::graph::engine::Graph;
use crate::graph::id::{ComponentId, PinId};
use crate::graph::pin::PinRole;

/// A pin addressed by patch-local component id and pin index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinAddress {
    pub component: u32,
    /// Output index for a link's `from`, input index for its `to`.
    pub pin: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub id: u32,
    pub kind: ComponentKind,
    /// Parameter defaults by input index. Missing entries keep the
    /// component's own default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaults: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub from: PinAddress,
    pub to: PinAddress,
}

/// Components and links of a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchDescription {
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

impl PatchDescription {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Graph {
    /// Build a graph from a patch.
    ///
    /// Returns the graph and the mapping from patch-local ids to the new
    /// `ComponentId`s. `settings` are validated first.
    pub fn from_patch(
        desc: &PatchDescription,
        settings: EngineSettings,
    ) -> Result<(Graph, HashMap<u32, ComponentId>)> {
        settings.validate().map_err(SoundGenError::Config)?;

        let mut graph = Graph::new(settings);
        let mut ids = HashMap::with_capacity(desc.components.len());

        for entry in &desc.components {
            if ids.contains_key(&entry.id) {
                return Err(SoundGenError::InvalidPatch(format!(
                    "duplicate component id {}",
                    entry.id
                )));
            }
            let id = graph.add_builtin(entry.kind)?;

            if entry.defaults.len() > PinId::MAX_PER_ROLE {
                return Err(SoundGenError::InvalidPatch(format!(
                    "component {} lists {} defaults, at most {} inputs are addressable",
                    entry.id,
                    entry.defaults.len(),
                    PinId::MAX_PER_ROLE
                )));
            }
            for (index, &value) in entry.defaults.iter().enumerate() {
                let pin = PinId::input(id, index as u16);
                graph.set_default(pin, value).with_context(|| {
                    format!("Component {} ({}) default #{}", entry.id, entry.kind, index)
                })?;
            }
            ids.insert(entry.id, id);
        }

        for (n, link) in desc.links.iter().enumerate() {
            let resolve = |address: &PinAddress, role: PinRole| {
                let component = ids.get(&address.component).copied().ok_or_else(|| {
                    SoundGenError::InvalidPatch(format!(
                        "link {} references unknown component {}",
                        n, address.component
                    ))
                })?;
                PinId::try_new(component, role, address.pin).ok_or_else(|| {
                    SoundGenError::InvalidPatch(format!(
                        "link {} uses {:?} pin {} of component {}, the largest index is {}",
                        n,
                        role,
                        address.pin,
                        address.component,
                        PinId::MAX_PER_ROLE - 1
                    ))
                })
            };
            let output = resolve(&link.from, PinRole::Output)?;
            let input = resolve(&link.to, PinRole::Input)?;

            graph
                .connect(output, input)
                .with_context(|| format!("Replaying link {}", n))?;
        }

        tracing::info!(
            "Loaded patch: {} components, {} links",
            graph.component_count(),
            graph.link_count()
        );
        Ok((graph, ids))
    }

    /// Describe the current graph as a patch. Patch ids are the current
    /// `ComponentId` values. Plugin components have no kind and are skipped
    /// along with their links.
    pub fn to_patch(&self) -> PatchDescription {
        let mut desc = PatchDescription::default();

        for (id, slot) in self.components() {
            let Some(kind) = slot.kind() else {
                tracing::warn!(
                    "Component {:?} '{}' is a plugin and cannot be saved",
                    id,
                    slot.name()
                );
                continue;
            };
            desc.components.push(ComponentEntry {
                id: id.0,
                kind,
                defaults: slot.parameters().iter().map(|p| p.default_value()).collect(),
            });
        }

        let saved = |id: ComponentId| self.slot(id).is_some_and(|s| s.kind().is_some());
        for link in self.links() {
            if !saved(link.source_component()) || !saved(link.destination_component()) {
                continue;
            }
            desc.links.push(LinkEntry {
                from: PinAddress {
                    component: link.source_component().0,
                    pin: link.source.index(),
                },
                to: PinAddress {
                    component: link.destination_component().0,
                    pin: link.destination.index(),
                },
            });
        }

        desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::components::Waveform;
    use crate::graph::error::GraphError;

    fn entry(id: u32, kind: ComponentKind) -> ComponentEntry {
        ComponentEntry {
            id,
            kind,
            defaults: Vec::new(),
        }
    }

    fn link(from: u32, out_pin: u16, to: u32, in_pin: u16) -> LinkEntry {
        LinkEntry {
            from: PinAddress {
                component: from,
                pin: out_pin,
            },
            to: PinAddress {
                component: to,
                pin: in_pin,
            },
        }
    }

    #[test]
    fn test_links_replay_regardless_of_component_order() {
        // Listed sink-first; links still resolve by id
        let desc = PatchDescription {
            components: vec![
                entry(30, ComponentKind::Scope),
                entry(20, ComponentKind::Gain),
                entry(10, ComponentKind::Oscillator(Waveform::Sine)),
            ],
            links: vec![link(20, 0, 30, 0), link(10, 0, 20, 0)],
        };
        let (mut graph, ids) = Graph::from_patch(&desc, EngineSettings::default()).unwrap();

        assert_eq!(graph.link_count(), 2);
        assert_eq!(graph.evaluation_order(), &[ids[&10], ids[&20], ids[&30]]);
    }

    #[test]
    fn test_defaults_applied() {
        let desc = PatchDescription {
            components: vec![ComponentEntry {
                id: 1,
                kind: ComponentKind::Gain,
                defaults: vec![0.25, 3.0],
            }],
            links: vec![],
        };
        let (graph, ids) = Graph::from_patch(&desc, EngineSettings::default()).unwrap();
        let gain = graph.input_named(ids[&1], "gain").unwrap();
        assert_eq!(graph.pin_value(gain).unwrap(), 3.0);
    }

    #[test]
    fn test_invalid_patches() {
        let duplicate = PatchDescription {
            components: vec![entry(1, ComponentKind::Gain), entry(1, ComponentKind::Mixer)],
            links: vec![],
        };
        assert!(matches!(
            Graph::from_patch(&duplicate, EngineSettings::default()),
            Err(SoundGenError::InvalidPatch(_))
        ));

        let dangling = PatchDescription {
            components: vec![entry(1, ComponentKind::Constant)],
            links: vec![link(1, 0, 9, 0)],
        };
        assert!(matches!(
            Graph::from_patch(&dangling, EngineSettings::default()),
            Err(SoundGenError::InvalidPatch(_))
        ));
    }

    #[test]
    fn test_pin_index_past_packing_limit_rejected() {
        // 2048 does not fit the 11-bit index and must not wrap to input 0
        let desc = PatchDescription {
            components: vec![entry(1, ComponentKind::Constant), entry(2, ComponentKind::Gain)],
            links: vec![link(1, 0, 2, 2048)],
        };
        let err = Graph::from_patch(&desc, EngineSettings::default()).unwrap_err();
        assert!(matches!(err, SoundGenError::InvalidPatch(_)), "{err}");

        let desc = PatchDescription {
            components: vec![entry(1, ComponentKind::Constant), entry(2, ComponentKind::Gain)],
            links: vec![link(1, u16::MAX, 2, 0)],
        };
        assert!(matches!(
            Graph::from_patch(&desc, EngineSettings::default()),
            Err(SoundGenError::InvalidPatch(_))
        ));

        // In range but past the component's pins: the graph reports it
        let desc = PatchDescription {
            components: vec![entry(1, ComponentKind::Constant), entry(2, ComponentKind::Gain)],
            links: vec![link(1, 0, 2, 2)],
        };
        let err = Graph::from_patch(&desc, EngineSettings::default()).unwrap_err();
        assert!(matches!(err.as_graph_error(), Some(GraphError::UnknownPin(_))));
    }

    #[test]
    fn test_too_many_defaults_rejected() {
        let desc = PatchDescription {
            components: vec![ComponentEntry {
                id: 1,
                kind: ComponentKind::Gain,
                defaults: vec![1.0; PinId::MAX_PER_ROLE + 1],
            }],
            links: vec![],
        };
        assert!(matches!(
            Graph::from_patch(&desc, EngineSettings::default()),
            Err(SoundGenError::InvalidPatch(_))
        ));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let desc = PatchDescription {
            components: vec![entry(1, ComponentKind::Oscillator(Waveform::Sine))],
            links: vec![],
        };
        let settings = EngineSettings {
            sample_rate: 0.0,
            ..EngineSettings::default()
        };
        assert!(matches!(
            Graph::from_patch(&desc, settings),
            Err(SoundGenError::Config(_))
        ));
    }

    #[test]
    fn test_cyclic_patch_rejected_with_graph_error() {
        let desc = PatchDescription {
            components: vec![entry(1, ComponentKind::Gain), entry(2, ComponentKind::Gain)],
            links: vec![link(1, 0, 2, 0), link(2, 0, 1, 0)],
        };
        let err = Graph::from_patch(&desc, EngineSettings::default()).unwrap_err();
        assert!(matches!(
            err.as_graph_error(),
            Some(GraphError::CycleRejected { .. })
        ));
    }

    #[test]
    fn test_export_then_reload_keeps_topology() {
        let mut graph = Graph::default();
        let osc = graph.add_builtin(ComponentKind::Oscillator(Waveform::Triangle)).unwrap();
        let mixer = graph.add_builtin(ComponentKind::Mixer).unwrap();
        let scope = graph.add_builtin(ComponentKind::Scope).unwrap();
        graph
            .connect(PinId::output(osc, 0), PinId::input(mixer, 2))
            .unwrap();
        graph
            .connect(PinId::output(mixer, 0), PinId::input(scope, 0))
            .unwrap();
        graph.set_default(PinId::input(mixer, 4), 0.5).unwrap();

        let desc = graph.to_patch();
        let (reloaded, ids) = Graph::from_patch(&desc, EngineSettings::default()).unwrap();

        assert_eq!(reloaded.to_patch(), desc);
        assert_eq!(
            reloaded.slot(ids[&osc.0]).unwrap().kind(),
            Some(ComponentKind::Oscillator(Waveform::Triangle))
        );
    }
}
