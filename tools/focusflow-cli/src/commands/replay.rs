//! Replay a recorded landmark stream.

use std::path::PathBuf;

use tokio::sync::mpsc;

use focusflow_common::config::AppConfig;
use focusflow_focus_core::engine::{EngineConfig, FocusEngine};
use focusflow_focus_core::pipeline::FocusPipeline;
use focusflow_focus_core::source::ReplaySource;
use focusflow_focus_core::store::focus_store;

use super::report::{print_summary, spawn_reporter, SessionReporter};

pub async fn run(path: PathBuf, config: AppConfig, every: u64, json: bool) -> anyhow::Result<()> {
    let source = ReplaySource::from_path(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load landmark stream: {e}"))?;

    if !json {
        println!("Replaying: {}", path.display());
        println!(
            "  Frames: {} ({:.1}s recorded)",
            source.remaining(),
            source.span_secs()
        );
        if let Some(header) = source.header() {
            println!(
                "  Recorded: {} landmarks @ {}fps (schema {})",
                header.landmark_count, header.frame_rate_hz, header.schema_version
            );
            if header.landmark_count != config.detection.expected_landmarks {
                println!(
                    "  Warning: engine expects {} landmarks; faces will read as absent",
                    config.detection.expected_landmarks
                );
            }
        }
        println!("  Audio mode: {:?}", config.feedback.audio_mode);
        println!("  Absence policy: {:?}", config.detection.absence_policy);
        println!();
    }

    tracing::info!(path = %path.display(), frames = source.remaining(), "Starting replay");

    let (writer, handle) = focus_store();
    let engine = FocusEngine::new(EngineConfig::from(&config.detection), writer);
    let (tick_tx, tick_rx) = mpsc::unbounded_channel();
    let mut pipeline = FocusPipeline::new(source, engine)
        .with_max_tick_hz(config.detection.max_tick_hz)
        .with_tick_sink(tick_tx);

    let stop_flag = pipeline.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop_flag.stop();
        }
    });

    let reporter = spawn_reporter(
        tick_rx,
        SessionReporter::new(&config.feedback, every, json, std::io::stdout()),
    );

    let stats = pipeline.run().await?;
    // Closes the tick sink so the reporter drains and exits.
    drop(pipeline);
    reporter.await??;

    print_summary(&stats, &handle.snapshot(), json)
}
