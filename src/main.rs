//! Skyfighter headless runner
//!
//! Plays sessions with the autopilot at a simulated 60 Hz frame rate and
//! reports the results. Useful for balance checks against a tuning file.
//!
//! Usage: `skyfighter [--seed N] [--seconds S] [--runs R] [--tuning FILE] [--json]`

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skyfighter::Tuning;
use skyfighter::sim::{FrameOutcome, GameEvent, GamePhase, Session, autopilot};

/// Host frame spacing (a 60 Hz display)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Layout width the headless runner pretends to measure
const PLAYFIELD_WIDTH: f32 = 480.0;

#[derive(Parser, Debug)]
#[command(name = "skyfighter")]
#[command(about = "Play headless Skyfighter sessions with the autopilot")]
struct Args {
    /// RNG seed for the session
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,
    /// Survival cap per run, in game seconds
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,
    /// Number of consecutive runs
    #[arg(long, default_value_t = 1)]
    runs: u32,
    /// JSON tuning file overriding the default balance
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    let tuning = Tuning::from_json(&json)
        .with_context(|| format!("failed to load tuning from {}", path.display()))?;
    Ok(tuning)
}

fn main() -> Result<()> {
    env_logger::init();

    let options = Args::parse();
    let tuning = load_tuning(options.tuning.as_ref())?;

    log::info!(
        "Skyfighter (headless) starting: seed {}, {} run(s), {}s cap",
        options.seed,
        options.runs,
        options.seconds
    );

    let mut session = Session::with_tuning(options.seed, tuning);
    session.set_playfield_width(PLAYFIELD_WIDTH);

    for run in 1..=options.runs {
        session.trigger_start();
        let summary = play(&mut session, options.seconds);
        let state = session.state();
        println!(
            "run {run}: score {} | level {} | health {} | survived {:.1}s | kills {} | hits taken {}{}",
            state.score,
            state.level,
            state.health.get(),
            state.elapsed_ms / 1000.0,
            summary.kills,
            summary.hits_taken,
            if session.phase() == GamePhase::GameOver {
                " | game over"
            } else {
                ""
            }
        );

        if run < options.runs {
            // Time cap reached without dying: end it so the next run starts fresh
            session.forfeit();
        }
    }

    println!("high score: {}", session.high_score());

    if options.json {
        let json = session
            .snapshot()
            .to_json()
            .context("failed to serialize snapshot")?;
        println!("{json}");
    }

    Ok(())
}

#[derive(Default)]
struct RunSummary {
    kills: u32,
    hits_taken: u32,
}

/// Drive one run until game over or the time cap
fn play(session: &mut Session, seconds: f64) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut now = 0.0;

    while session.phase() == GamePhase::Running && session.state().elapsed_ms < seconds * 1000.0 {
        now += FRAME_MS;
        let input = autopilot::steer(session.state());
        session.set_input(input);

        if let FrameOutcome::Ticked(events) = session.frame(now) {
            for event in events {
                match event {
                    GameEvent::ScoreDelta(_) => summary.kills += 1,
                    GameEvent::DamageApplied { .. } => summary.hits_taken += 1,
                    GameEvent::PowerUpCollected(kind) => log::debug!("Picked up {:?}", kind),
                    _ => {}
                }
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfighter::TuningError;

    #[test]
    fn test_no_tuning_path_uses_defaults() -> Result<()> {
        assert_eq!(load_tuning(None)?, Tuning::default());
        Ok(())
    }

    #[test]
    fn test_missing_tuning_file_names_path() {
        let path = PathBuf::from("does/not/exist/tuning.json");
        let err = load_tuning(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("tuning.json"));
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_invalid_tuning_keeps_error_chain() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("tuning.json");
        fs::write(&path, r#"{ "enemy_spawn_step_ms": -100.0 }"#)?;

        let err = load_tuning(Some(&path)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TuningError>(),
            Some(TuningError::Invalid {
                field: "enemy_spawn_step_ms",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn test_tuning_file_overrides_defaults() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("tuning.json");
        fs::write(&path, r#"{ "kill_score": 250 }"#)?;

        let tuning = load_tuning(Some(&path))?;
        assert_eq!(tuning.kill_score, 250);
        Ok(())
    }
}
