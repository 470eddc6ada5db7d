//! Run a synthetic session through a channel-fed pipeline.

use std::sync::mpsc;

use tokio::sync::mpsc as tick_mpsc;

use focusflow_common::config::AppConfig;
use focusflow_face_model::keypoint::Keypoint;
use focusflow_face_model::synthetic::SyntheticFace;
use focusflow_focus_core::engine::{EngineConfig, FocusEngine};
use focusflow_focus_core::pipeline::FocusPipeline;
use focusflow_focus_core::source::ChannelSource;
use focusflow_focus_core::store::focus_store;

use super::report::{print_summary, spawn_reporter, SessionReporter};
use crate::Scenario;

/// Ticks per phase of the mixed scenario.
const MIXED_PHASE_TICKS: u64 = 60;

pub async fn run(
    scenario: Scenario,
    ticks: u64,
    config: AppConfig,
    every: u64,
) -> anyhow::Result<()> {
    println!("Simulating {scenario:?} session ({ticks} frames)");
    println!("  Audio mode: {:?}", config.feedback.audio_mode);
    println!();

    let expected = config.detection.expected_landmarks;
    let (tx, rx) = mpsc::channel();
    let producer = std::thread::spawn(move || {
        for tick in 0..ticks {
            let frame = frame_for(scenario, tick, expected);
            if tx.send(frame).is_err() {
                tracing::debug!(tick, "Pipeline gone, stopping frame producer");
                break;
            }
        }
    });

    let (writer, handle) = focus_store();
    let engine = FocusEngine::new(EngineConfig::from(&config.detection), writer);
    let (tick_tx, tick_rx) = tick_mpsc::unbounded_channel();
    let mut pipeline = FocusPipeline::new(ChannelSource::new(rx), engine)
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
        SessionReporter::new(&config.feedback, every, false, std::io::stdout()),
    );

    let stats = pipeline.run().await?;
    // Dropping the pipeline closes both channels: the reporter drains and
    // an interrupted producer can finish.
    drop(pipeline);
    reporter.await??;
    producer
        .join()
        .map_err(|_| anyhow::anyhow!("Frame producer panicked"))?;

    print_summary(&stats, &handle.snapshot(), false)
}

fn frame_for(scenario: Scenario, tick: u64, expected: usize) -> Option<Vec<Keypoint>> {
    let face = match scenario {
        Scenario::Focused => SyntheticFace::attentive(),
        Scenario::Drowsy => SyntheticFace::drowsy(),
        Scenario::Distracted => SyntheticFace::looking_away(),
        Scenario::Away => return None,
        Scenario::Mixed => match (tick / MIXED_PHASE_TICKS) % 4 {
            0 => SyntheticFace::attentive().with_smile(0.03),
            1 => SyntheticFace::drowsy(),
            2 => return None,
            _ => SyntheticFace::looking_away(),
        },
    };
    Some(face.landmarks(expected))
}
