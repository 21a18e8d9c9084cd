//! # Verdant Walk
//!
//! Headless endless walk: streams terrain around a viewer moving in a
//! straight line and logs streaming stats.
//!
//! ```text
//! verdant_walk [config.toml] [steps]
//! ```
//!
//! Set `RUST_LOG=debug` to watch batches and evictions.

use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;
use verdant::{EngineConfig, EngineResult, StreamingController};

/// World units the viewer moves per tick.
const STEP: f64 = 0.5;
/// Default walk length in ticks.
const DEFAULT_STEPS: u32 = 4_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run() {
        tracing::error!("walk failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> EngineResult<()> {
    let args: Vec<String> = std::env::args().collect();

    let config = match args.get(1) {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let steps = args
        .get(2)
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_STEPS);

    let mut controller = StreamingController::with_defaults(&config)?;

    let start = Instant::now();
    let spawn = controller.start(0.0, 0.0);
    tracing::info!(%spawn, "viewer spawned");

    let mut x = 0.0;
    for step in 0..steps {
        x += STEP;
        controller.update(x, 0.0);

        if step % 500 == 0 {
            let stats = controller.stats();
            tracing::info!(
                x,
                ground = ?controller.try_closest_topmost_block(x, 0.0).ok(),
                cached = stats.cached,
                loaded = controller.cache().loaded_count(),
                load_queue = stats.load_queue,
                "walking"
            );
        }
        // Give the worker pool a moment, like a frame would
        std::thread::sleep(Duration::from_micros(200));
    }

    let stats = controller.stats();
    tracing::info!(
        elapsed = ?start.elapsed(),
        dispatched = stats.generation_dispatched,
        generated = stats.generated,
        loaded = stats.loaded,
        unloaded = stats.unloaded,
        evicted = stats.evicted,
        cached = stats.cached,
        objects = controller.factory().capacity(),
        "walk finished"
    );
    Ok(())
}
