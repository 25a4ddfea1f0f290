//! Integration tests for the editor/graph-host boundary
//!
//! The host runs on its own thread; the test plays the editor:
//! - Building a graph through commands
//! - Rejections coming back as typed errors
//! - Rendering and reading the topology snapshot

mod common;

use soundgen_rs::graph::{
    ComponentKind, Graph, GraphBridge, GraphCommand, GraphError, GraphHost, GraphMessage,
    PatchDescription, PinId, Waveform,
};
use std::thread;

fn spawn_host() -> (GraphBridge, thread::JoinHandle<Graph>) {
    let (mut host, bridge) = GraphHost::new(Graph::default());
    let handle = thread::spawn(move || {
        host.run();
        host.into_graph()
    });
    (bridge, handle)
}

fn next(bridge: &GraphBridge) -> GraphMessage {
    bridge.recv().expect("graph host hung up")
}

#[test]
fn test_edit_render_and_snapshot_over_bridge() {
    let (bridge, handle) = spawn_host();

    bridge.add_component(ComponentKind::Constant);
    bridge.add_component(ComponentKind::Gain);
    let (k, g) = match (next(&bridge), next(&bridge)) {
        (
            GraphMessage::ComponentAdded { id: k, .. },
            GraphMessage::ComponentAdded { id: g, .. },
        ) => (k, g),
        other => panic!("unexpected messages: {:?}", other),
    };

    bridge.set_default(PinId::input(k, 0), 0.5);
    bridge.set_default(PinId::input(g, 1), 4.0);
    bridge.connect(PinId::input(g, 0), PinId::output(k, 0));
    bridge.render(16);
    bridge.request_topology();

    assert!(matches!(next(&bridge), GraphMessage::DefaultSet { .. }));
    assert!(matches!(next(&bridge), GraphMessage::DefaultSet { .. }));
    match next(&bridge) {
        GraphMessage::Linked {
            source,
            destination,
            ..
        } => {
            assert_eq!(source, PinId::output(k, 0));
            assert_eq!(destination, PinId::input(g, 0));
        }
        other => panic!("expected Linked, got {:?}", other),
    }
    assert_eq!(
        next(&bridge),
        GraphMessage::Rendered {
            frames: 16,
            failed: 0
        }
    );
    let GraphMessage::Topology(snapshot) = next(&bridge) else {
        panic!("expected topology snapshot");
    };
    let gain = snapshot.component(g).unwrap();
    assert!(gain.parameters[0].driven);
    assert_eq!(gain.outputs[0].value, 2.0);

    bridge.shutdown();
    assert_eq!(next(&bridge), GraphMessage::Shutdown);
    let graph = handle.join().unwrap();
    assert_eq!(graph.tick_count(), 16);
}

#[test]
fn test_rejected_cycle_over_bridge_leaves_graph_unchanged() {
    let (bridge, handle) = spawn_host();

    bridge.add_component(ComponentKind::Gain);
    bridge.add_component(ComponentKind::Gain);
    let a = PinId::output(soundgen_rs::ComponentId(0), 0);
    let b_in = PinId::input(soundgen_rs::ComponentId(1), 0);
    let b_out = PinId::output(soundgen_rs::ComponentId(1), 0);
    let a_in = PinId::input(soundgen_rs::ComponentId(0), 0);
    bridge.connect(a, b_in);
    bridge.connect(b_out, a_in);
    bridge.shutdown();

    let messages: Vec<_> = std::iter::from_fn(|| bridge.recv()).collect();
    assert!(matches!(
        &messages[3],
        GraphMessage::Rejected {
            command: "Connect",
            error: GraphError::CycleRejected { .. }
        }
    ));

    let graph = handle.join().unwrap();
    assert_eq!(graph.link_count(), 1);
}

#[test]
fn test_load_patch_replaces_graph() {
    let (bridge, handle) = spawn_host();
    let desc: PatchDescription = serde_json::from_str(
        r#"{
            "components": [
                { "id": 7, "kind": { "Oscillator": "Square" } },
                { "id": 9, "kind": "Scope" }
            ],
            "links": [ { "from": { "component": 7, "pin": 0 }, "to": { "component": 9, "pin": 0 } } ]
        }"#,
    )
    .unwrap();

    bridge.add_component(ComponentKind::Mixer);
    bridge.send_command(GraphCommand::LoadPatch(desc));
    bridge.shutdown();

    let messages: Vec<_> = std::iter::from_fn(|| bridge.recv()).collect();
    let GraphMessage::PatchLoaded { ids } = &messages[1] else {
        panic!("expected PatchLoaded, got {:?}", messages[1]);
    };
    assert_eq!(ids.len(), 2);

    let graph = handle.join().unwrap();
    assert_eq!(graph.component_count(), 2);
    assert_eq!(graph.link_count(), 1);
    let osc = ids.iter().find(|(patch_id, _)| *patch_id == 7).unwrap().1;
    assert_eq!(
        graph.slot(osc).unwrap().kind(),
        Some(ComponentKind::Oscillator(Waveform::Square))
    );
}
