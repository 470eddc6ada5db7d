//! Show the feedback mapping for a single score.

use serde::Serialize;

use focusflow_common::config::AppConfig;
use focusflow_face_model::state::{EmotionState, FocusState};
use focusflow_feedback::audio::{AudioMapper, AudioTargets};
use focusflow_feedback::visual::{visual_snapshot, TransitionTiming, VisualSnapshot};
use focusflow_feedback::HudSummary;

#[derive(Serialize)]
struct MapOutput {
    score: f64,
    previous: f64,
    visual: VisualSnapshot,
    css_filter: String,
    audio: AudioTargets,
    hud: HudSummary,
}

pub fn run(
    score: f64,
    previous: Option<f64>,
    config: &AppConfig,
    json: bool,
) -> anyhow::Result<()> {
    if !score.is_finite() {
        anyhow::bail!("Score must be a finite number, got {score}");
    }
    let previous = previous.unwrap_or(score);

    let timing = TransitionTiming::from(&config.feedback);
    let visual = visual_snapshot(score, previous, &timing);
    let audio = AudioMapper::from(&config.feedback).targets(score);
    let hud = HudSummary::new(score, FocusState::Focused, EmotionState::Neutral);

    if json {
        let output = MapOutput {
            score,
            previous,
            css_filter: visual.params().css_filter(),
            visual,
            audio,
            hud,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Score: {score:.3} (previous {previous:.3}, band {})", hud.band.as_str());
    println!();
    println!("Visual:");
    println!("  filter: {}", visual.params().css_filter());
    for (name, value) in visual.params().css_properties() {
        println!("  {name}: {value}");
    }
    println!("  transition: {}", visual.css_transition());
    println!();
    println!("Audio ({:?}):", config.feedback.audio_mode);
    println!("  Gains: {:?}", audio.target_gains);
    if let Some(hz) = audio.target_filter_hz {
        println!("  Lowpass: {hz:.0} Hz");
    }
    println!("  Ramp time constant: {}s", audio.ramp_seconds);

    Ok(())
}
