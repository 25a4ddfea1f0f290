//! Thread boundary between the graph owner (audio side) and the editor.
//!
//! The editor holds a [`GraphBridge`] and sends [`GraphCommand`]s. The
//! [`GraphHost`] owns the [`Graph`] and applies commands only between ticks,
//! in arrival order, replying with [`GraphMessage`]s. This is the single
//! serialization point for edits: nothing outside the host touches the graph.

use crate::graph::component_kind::ComponentKind;
use crate::graph::engine::Graph;
use crate::graph::error::GraphError;
use crate::graph::id::{ComponentId, LinkId, PinId};
use crate::graph::link::LinkEnd;
use crate::graph::patch::PatchDescription;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Snapshot of one parameter (input pin).
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSnapshot {
    pub pin: PinId,
    pub name: &'static str,
    pub default: f64,
    pub value: f64,
    /// When true the editor disables the default-value widget.
    pub driven: bool,
}

/// Snapshot of one output pin.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSnapshot {
    pub pin: PinId,
    pub name: &'static str,
    pub value: f64,
}

/// Snapshot of a single component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSnapshot {
    pub id: ComponentId,
    pub name: String,
    pub kind: Option<ComponentKind>,
    pub parameters: Vec<ParameterSnapshot>,
    pub outputs: Vec<OutputSnapshot>,
    /// Last evaluation error, if the component is currently failing.
    pub error: Option<String>,
}

/// Snapshot of a single link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSnapshot {
    pub id: LinkId,
    pub source: PinId,
    pub destination: PinId,
}

/// Complete topology snapshot of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologySnapshot {
    pub components: Vec<ComponentSnapshot>,
    pub links: Vec<LinkSnapshot>,
    pub generation: u64,
}

impl TopologySnapshot {
    pub fn component(&self, id: ComponentId) -> Option<&ComponentSnapshot> {
        self.components.iter().find(|c| c.id == id)
    }
}

impl Graph {
    /// Copy of everything an editor needs to draw the graph.
    pub fn topology(&self) -> TopologySnapshot {
        let components = self
            .components()
            .map(|(id, slot)| ComponentSnapshot {
                id,
                name: slot.name().to_string(),
                kind: slot.kind(),
                parameters: slot
                    .parameters()
                    .iter()
                    .enumerate()
                    .map(|(i, p)| ParameterSnapshot {
                        pin: PinId::input(id, i as u16),
                        name: p.name(),
                        default: p.default_value(),
                        value: p.effective_value(),
                        driven: p.is_driven(),
                    })
                    .collect(),
                outputs: slot
                    .outputs()
                    .iter()
                    .enumerate()
                    .map(|(i, o)| OutputSnapshot {
                        pin: PinId::output(id, i as u16),
                        name: o.name(),
                        value: o.value(),
                    })
                    .collect(),
                error: slot.last_error().map(|e| e.to_string()),
            })
            .collect();

        let links = self
            .links()
            .map(|l| LinkSnapshot {
                id: l.id,
                source: l.source,
                destination: l.destination,
            })
            .collect();

        TopologySnapshot {
            components,
            links,
            generation: self.generation(),
        }
    }
}

/// Commands sent from the editor to the graph host.
#[derive(Debug, Clone)]
pub enum GraphCommand {
    AddComponent(ComponentKind),
    RemoveComponent(ComponentId),
    /// Link two pins, given in either order.
    Connect { a: PinId, b: PinId },
    Disconnect(LinkId),
    DisconnectPin(PinId),
    /// Re-point one end of a link.
    Relink { link: LinkId, end: LinkEnd, pin: PinId },
    SetDefault { pin: PinId, value: f64 },
    /// Run this many ticks.
    Render { frames: usize },
    Reset,
    /// Replace the whole graph with a patch.
    LoadPatch(PatchDescription),
    RequestTopology,
    Shutdown,
}

impl GraphCommand {
    fn label(&self) -> &'static str {
        match self {
            GraphCommand::AddComponent(_) => "AddComponent",
            GraphCommand::RemoveComponent(_) => "RemoveComponent",
            GraphCommand::Connect { .. } => "Connect",
            GraphCommand::Disconnect(_) => "Disconnect",
            GraphCommand::DisconnectPin(_) => "DisconnectPin",
            GraphCommand::Relink { .. } => "Relink",
            GraphCommand::SetDefault { .. } => "SetDefault",
            GraphCommand::Render { .. } => "Render",
            GraphCommand::Reset => "Reset",
            GraphCommand::LoadPatch(_) => "LoadPatch",
            GraphCommand::RequestTopology => "RequestTopology",
            GraphCommand::Shutdown => "Shutdown",
        }
    }
}

/// Messages sent from the graph host back to the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphMessage {
    ComponentAdded { id: ComponentId, kind: ComponentKind },
    ComponentRemoved { id: ComponentId, links_removed: usize },
    Linked { link: LinkId, source: PinId, destination: PinId },
    Unlinked { count: usize },
    Relinked(LinkId),
    DefaultSet { pin: PinId, value: f64 },
    /// A command was refused; the graph is unchanged.
    Rejected { command: &'static str, error: GraphError },
    Rendered { frames: usize, failed: usize },
    ResetDone,
    /// Patch loaded; maps patch-local ids to component ids.
    PatchLoaded { ids: Vec<(u32, ComponentId)> },
    PatchError(String),
    Topology(TopologySnapshot),
    Shutdown,
}

/// Channel capacity for commands (editor → host).
const CMD_CHANNEL_CAPACITY: usize = 256;
/// Channel capacity for messages (host → editor).
const MSG_CHANNEL_CAPACITY: usize = 1024;

/// Editor-side handle for talking to the graph host.
pub struct GraphBridge {
    pub cmd_tx: Sender<GraphCommand>,
    pub msg_rx: Receiver<GraphMessage>,
}

impl GraphBridge {
    /// Drain all pending messages.
    pub fn drain(&self) -> Vec<GraphMessage> {
        self.msg_rx.try_iter().collect()
    }

    /// Try to receive a single message without blocking.
    pub fn try_recv(&self) -> Option<GraphMessage> {
        self.msg_rx.try_recv().ok()
    }

    /// Block until the next message, or `None` once the host is gone.
    pub fn recv(&self) -> Option<GraphMessage> {
        self.msg_rx.recv().ok()
    }

    pub fn send_command(&self, cmd: GraphCommand) -> bool {
        self.cmd_tx.send(cmd).is_ok()
    }

    pub fn add_component(&self, kind: ComponentKind) {
        let _ = self.cmd_tx.send(GraphCommand::AddComponent(kind));
    }

    pub fn remove_component(&self, id: ComponentId) {
        let _ = self.cmd_tx.send(GraphCommand::RemoveComponent(id));
    }

    pub fn connect(&self, a: PinId, b: PinId) {
        let _ = self.cmd_tx.send(GraphCommand::Connect { a, b });
    }

    pub fn disconnect(&self, link: LinkId) {
        let _ = self.cmd_tx.send(GraphCommand::Disconnect(link));
    }

    pub fn set_default(&self, pin: PinId, value: f64) {
        let _ = self.cmd_tx.send(GraphCommand::SetDefault { pin, value });
    }

    pub fn render(&self, frames: usize) {
        let _ = self.cmd_tx.send(GraphCommand::Render { frames });
    }

    pub fn request_topology(&self) {
        let _ = self.cmd_tx.send(GraphCommand::RequestTopology);
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(GraphCommand::Shutdown);
    }
}

/// Owner side: holds the graph and applies queued commands between ticks.
pub struct GraphHost {
    graph: Graph,
    cmd_rx: Receiver<GraphCommand>,
    msg_tx: Sender<GraphMessage>,
    running: bool,
}

impl GraphHost {
    /// Create a host for `graph` and the editor handle that talks to it.
    pub fn new(graph: Graph) -> (Self, GraphBridge) {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (msg_tx, msg_rx) = bounded(MSG_CHANNEL_CAPACITY);
        let host = Self {
            graph,
            cmd_rx,
            msg_tx,
            running: true,
        };
        (host, GraphBridge { cmd_tx, msg_rx })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Give the graph back, e.g. after shutdown.
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Apply every queued command without blocking. Returns the number applied.
    pub fn process_commands(&mut self) -> usize {
        let mut applied = 0;
        while self.running {
            let Ok(cmd) = self.cmd_rx.try_recv() else {
                break;
            };
            self.apply(cmd);
            applied += 1;
        }
        applied
    }

    /// Block on the command queue until `Shutdown` or until every bridge is dropped.
    pub fn run(&mut self) {
        tracing::info!("Graph host started");
        while self.running {
            match self.cmd_rx.recv() {
                Ok(cmd) => self.apply(cmd),
                Err(_) => {
                    tracing::debug!("Command channel closed");
                    self.running = false;
                }
            }
        }
        tracing::info!("Graph host exiting");
    }

    fn apply(&mut self, cmd: GraphCommand) {
        let label = cmd.label();
        let reply = match cmd {
            GraphCommand::AddComponent(kind) => self
                .graph
                .add_builtin(kind)
                .map(|id| GraphMessage::ComponentAdded { id, kind }),
            GraphCommand::RemoveComponent(id) => self
                .graph
                .remove_component(id)
                .map(|links_removed| GraphMessage::ComponentRemoved { id, links_removed }),
            GraphCommand::Connect { a, b } => self.graph.connect(a, b).map(|link| {
                let (source, destination) = self
                    .graph
                    .link(link)
                    .map(|l| (l.source, l.destination))
                    .unwrap_or((a, b));
                GraphMessage::Linked {
                    link,
                    source,
                    destination,
                }
            }),
            GraphCommand::Disconnect(link) => self
                .graph
                .disconnect(link)
                .map(|()| GraphMessage::Unlinked { count: 1 }),
            GraphCommand::DisconnectPin(pin) => self
                .graph
                .disconnect_pin(pin)
                .map(|count| GraphMessage::Unlinked { count }),
            GraphCommand::Relink { link, end, pin } => self
                .graph
                .relink(link, end, pin)
                .map(|()| GraphMessage::Relinked(link)),
            GraphCommand::SetDefault { pin, value } => self
                .graph
                .set_default(pin, value)
                .map(|()| GraphMessage::DefaultSet { pin, value }),
            GraphCommand::Render { frames } => {
                let failed = self.graph.run(frames);
                Ok(GraphMessage::Rendered { frames, failed })
            }
            GraphCommand::Reset => {
                self.graph.reset();
                Ok(GraphMessage::ResetDone)
            }
            GraphCommand::LoadPatch(desc) => Ok(self.load_patch(&desc)),
            GraphCommand::RequestTopology => Ok(GraphMessage::Topology(self.graph.topology())),
            GraphCommand::Shutdown => {
                self.running = false;
                Ok(GraphMessage::Shutdown)
            }
        };

        let message = reply.unwrap_or_else(|error| {
            tracing::debug!("{} rejected: {}", label, error);
            GraphMessage::Rejected {
                command: label,
                error,
            }
        });
        self.send(message);
    }

    fn load_patch(&mut self, desc: &PatchDescription) -> GraphMessage {
        match Graph::from_patch(desc, self.graph.settings().clone()) {
            Ok((graph, ids)) => {
                self.graph = graph;
                let mut ids: Vec<_> = ids.into_iter().collect();
                ids.sort_unstable();
                GraphMessage::PatchLoaded { ids }
            }
            Err(e) => {
                tracing::warn!("Failed to load patch: {}", e);
                GraphMessage::PatchError(e.to_string())
            }
        }
    }

    fn send(&self, message: GraphMessage) {
        match self.msg_tx.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Editor message queue full, dropping message");
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}
