use engine::{Engine, InputAction, InputEvent, InputSnapshot, PixelCanvas};
use tracing::{debug, info};

use super::gameplay::{game_status, GameNode, GameStatus, SceneHandles};

const NO_EVENTS: [InputEvent; 0] = [];
/// How far below the gap center the actor may sink before the autopilot jumps.
const JUMP_SLACK: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HeadlessSummary {
    pub(crate) frames: u32,
    pub(crate) final_score: u32,
    pub(crate) best_score: u32,
    pub(crate) rounds: u32,
}

/// Drives the scene for `frames` fixed steps into an off-screen canvas, with
/// a simple autopilot standing in for the keyboard.
pub(crate) fn run_headless(
    engine: &mut Engine<GameNode>,
    handles: &SceneHandles,
    frames: u32,
    fps: u32,
    canvas_size: (u32, u32),
) -> HeadlessSummary {
    let dt = 1.0 / fps.max(1) as f32;
    let (width, height) = canvas_size;
    let mut buffer = vec![0u8; width as usize * height as usize * 4];
    let mut canvas = PixelCanvas::new(&mut buffer, width, height);
    let field_center = height as f32 * 0.5;

    let mut frames_run = 0;
    for frame in 0..frames {
        let status = game_status(engine, handles);
        let input = autopilot(&status, field_center);
        if !engine.step(dt, NO_EVENTS, &input, &mut canvas) {
            break;
        }
        frames_run += 1;
        if frame % 600 == 0 {
            debug!(
                frame,
                score = status.score,
                live_pairs = status.live_pairs,
                next_spawn_in = status.next_spawn_in,
                "headless_progress"
            );
        }
    }

    let status = game_status(engine, handles);
    let summary = HeadlessSummary {
        frames: frames_run,
        final_score: status.score,
        best_score: status.best_score.max(status.score),
        rounds: status.rounds,
    };
    info!(
        frames = summary.frames,
        final_score = summary.final_score,
        best_score = summary.best_score,
        rounds = summary.rounds,
        "headless_finished"
    );
    summary
}

/// Restart when the round is over; otherwise jump whenever the actor is
/// falling below the next gap, or below `field_center` with no gap ahead.
fn autopilot(status: &GameStatus, field_center: f32) -> InputSnapshot {
    if status.is_over {
        return InputSnapshot::empty().with_action_down(InputAction::Restart, true);
    }
    let Some(center) = status.actor_center else {
        return InputSnapshot::empty();
    };
    let target = status.next_gap.map_or(field_center, |gap| gap.y);
    let should_jump = center.y > target + JUMP_SLACK && status.actor_velocity_y >= 0.0;
    InputSnapshot::empty().with_action_down(InputAction::Jump, should_jump)
}

#[cfg(test)]
mod tests {
    use engine::Vec2;

    use super::*;
    use crate::app::config::GameConfig;
    use crate::app::gameplay::{build_scene, SceneImages};

    fn status(center_y: f32, velocity_y: f32, gap_y: Option<f32>) -> GameStatus {
        GameStatus {
            score: 0,
            best_score: 0,
            rounds: 1,
            is_over: false,
            live_pairs: 0,
            next_spawn_in: 2.0,
            actor_center: Some(Vec2::new(120.0, center_y)),
            actor_velocity_y: velocity_y,
            next_gap: gap_y.map(|y| Vec2::new(300.0, y)),
        }
    }

    #[test]
    fn autopilot_jumps_only_when_falling_below_target() {
        assert!(autopilot(&status(400.0, 10.0, Some(300.0)), 300.0).is_down(InputAction::Jump));
        assert!(!autopilot(&status(400.0, -50.0, Some(300.0)), 300.0).is_down(InputAction::Jump));
        assert!(!autopilot(&status(310.0, 10.0, Some(300.0)), 300.0).is_down(InputAction::Jump));
        assert!(autopilot(&status(320.0, 0.0, None), 300.0).is_down(InputAction::Jump));
    }

    #[test]
    fn autopilot_restarts_a_finished_round() {
        let over = GameStatus {
            is_over: true,
            ..status(300.0, 0.0, None)
        };
        let input = autopilot(&over, 300.0);
        assert!(input.is_down(InputAction::Restart));
        assert!(!input.is_down(InputAction::Jump));
    }

    #[test]
    fn runs_the_requested_number_of_frames() {
        let config = GameConfig {
            seed: Some(42),
            ..GameConfig::default()
        };
        let (mut engine, handles) = build_scene(&config, SceneImages::default());
        let summary = run_headless(&mut engine, &handles, 300, 60, (800, 600));

        assert_eq!(summary.frames, 300);
        assert!(summary.rounds >= 1);
        assert!(summary.best_score >= summary.final_score);
        assert!(engine.is_running());
    }
}
