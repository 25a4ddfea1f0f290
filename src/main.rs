//! soundgen-rs - Headless Patch Renderer
//!
//! Loads a patch file, runs it for a number of frames on a graph host thread
//! and prints what every scope recorded.
//!
//! Usage: `soundgen-rs <patch.sgpatch> [frames]`

use anyhow::Context;
use soundgen_rs::{
    config::AppConfig,
    graph::{Graph, GraphHost, GraphMessage, TopologySnapshot},
    PatchFile,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Frames rendered when none are given (one second at 48 kHz)
const DEFAULT_FRAMES: usize = 48_000;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_or_default();

    // Initialize logging; the guard flushes the file writer on exit
    let (file_layer, _guard) = match &config.logging.file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .context("Log file path has no file name")?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    let mut args = std::env::args().skip(1);
    let patch_path = args
        .next()
        .context("Usage: soundgen-rs <patch.sgpatch> [frames]")?;
    let frames = match args.next() {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("Invalid frame count '{}'", arg))?,
        None => DEFAULT_FRAMES,
    };

    let file = PatchFile::load(&patch_path)
        .with_context(|| format!("Failed to load patch {}", patch_path))?;
    tracing::info!("Rendering '{}' for {} frames", file.name, frames);

    let (graph, _ids) = Graph::from_patch(&file.patch, config.engine.clone())
        .with_context(|| format!("Failed to build graph from {}", patch_path))?;

    let (mut host, bridge) = GraphHost::new(graph);
    let host_handle = std::thread::spawn(move || {
        host.run();
        host.into_graph()
    });

    bridge.render(frames);
    bridge.request_topology();
    bridge.shutdown();

    let mut topology: Option<TopologySnapshot> = None;
    while let Some(message) = bridge.recv() {
        match message {
            GraphMessage::Rendered { frames, failed } => {
                tracing::info!("Rendered {} frames ({} failed evaluations)", frames, failed);
            }
            GraphMessage::Topology(snapshot) => topology = Some(snapshot),
            GraphMessage::Shutdown => break,
            other => tracing::debug!("Unexpected message: {:?}", other),
        }
    }

    let graph = host_handle
        .join()
        .map_err(|_| anyhow::anyhow!("Graph host thread panicked"))?;

    if let Some(snapshot) = topology {
        for component in &snapshot.components {
            if let Some(error) = &component.error {
                println!("{:?} {}: failing ({})", component.id, component.name, error);
            }
        }
    }

    for (id, slot) in graph.components() {
        let Some(scope) = slot.component().as_scope() else {
            continue;
        };
        let samples: Vec<f64> = scope.samples().collect();
        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        println!(
            "{:?} {}: {} samples, last {:.6}, min {:.6}, max {:.6}",
            id,
            slot.name(),
            samples.len(),
            scope.latest().unwrap_or(0.0),
            min,
            max,
        );
    }

    Ok(())
}
