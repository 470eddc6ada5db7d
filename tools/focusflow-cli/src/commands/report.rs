//! Per-tick session output shared by `replay` and `simulate`.

use std::io::Write;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use focusflow_common::config::FeedbackDefaults;
use focusflow_face_model::state::{EmotionState, FocusState};
use focusflow_feedback::{FeedbackFrame, FeedbackMapper, HudSummary};
use focusflow_focus_core::engine::TickOutcome;
use focusflow_focus_core::pipeline::PipelineStats;
use focusflow_focus_core::store::FocusSnapshot;

#[derive(Serialize)]
struct ReportLine<'a> {
    tick: u64,
    score: f64,
    focus_state: FocusState,
    emotion: EmotionState,
    hud: HudSummary,
    feedback: &'a FeedbackFrame,
}

/// Writes sampled ticks with the feedback they would produce.
///
/// Every tick goes through the mapper so transition timing always
/// compares against the previous tick; only output is sampled.
pub struct SessionReporter<W> {
    mapper: FeedbackMapper,
    every: u64,
    json: bool,
    tick: u64,
    emotion: EmotionState,
    out: W,
}

impl<W: Write> SessionReporter<W> {
    pub fn new(feedback: &FeedbackDefaults, every: u64, json: bool, out: W) -> Self {
        Self {
            mapper: FeedbackMapper::from(feedback),
            every: every.max(1),
            json,
            tick: 0,
            emotion: EmotionState::Neutral,
            out,
        }
    }

    /// Feed the next tick outcome.
    pub fn observe(&mut self, outcome: &TickOutcome) -> anyhow::Result<()> {
        self.tick += 1;
        if let Some(emotion) = outcome.emotion {
            self.emotion = emotion;
        }

        let frame = self.mapper.update(outcome.score);
        if self.tick % self.every != 0 {
            return Ok(());
        }

        let hud = HudSummary::new(outcome.score, outcome.focus_state, self.emotion);
        if self.json {
            let line = ReportLine {
                tick: self.tick,
                score: outcome.score,
                focus_state: outcome.focus_state,
                emotion: self.emotion,
                hud,
                feedback: &frame,
            };
            writeln!(self.out, "{}", serde_json::to_string(&line)?)?;
        } else {
            writeln!(
                self.out,
                "#{:<6} {:.3}  {:<28} {}  gains={:?}{}  {}ms",
                self.tick,
                outcome.score,
                hud.to_string(),
                frame.visual.params().css_filter(),
                frame.audio.target_gains,
                frame
                    .audio
                    .target_filter_hz
                    .map(|hz| format!(" lowpass={hz:.0}Hz"))
                    .unwrap_or_default(),
                frame.visual.transition_duration_ms,
            )?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Consume tick outcomes until the pipeline drops its sink.
pub fn spawn_reporter<W>(
    mut ticks: UnboundedReceiver<TickOutcome>,
    mut reporter: SessionReporter<W>,
) -> JoinHandle<anyhow::Result<W>>
where
    W: Write + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(outcome) = ticks.recv().await {
            reporter.observe(&outcome)?;
        }
        reporter.out.flush()?;
        Ok(reporter.into_inner())
    })
}

pub fn print_summary(
    stats: &PipelineStats,
    snapshot: &FocusSnapshot,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::json!({ "stats": stats, "final": snapshot })
        );
        return Ok(());
    }

    println!();
    println!("Session:");
    if let Some(started_at) = stats.started_at {
        println!("  Started: {}", started_at.to_rfc3339());
    }
    println!("  Duration: {}ms", stats.duration_ms);
    println!(
        "  Ticks: {} ({} face, {} absent)",
        stats.ticks, stats.face_ticks, stats.absent_ticks
    );
    println!("  Skipped (rate limit): {}", stats.skipped);
    println!("  Discarded after stop: {}", stats.discarded);
    println!("  Source errors: {}", stats.errors);
    println!();
    println!("Final state:");
    println!("  Score: {:.3}", snapshot.score);
    println!("  Focus: {}", snapshot.focus_state);
    println!("  Emotion: {}", snapshot.emotion);
    println!("  Baseline EAR: {:.3}", snapshot.calibration.baseline_ear);
    Ok(())
}
