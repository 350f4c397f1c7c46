use engine::{text_width, NodeId, Rgba, SceneGraph, Surface, Vec2};

use super::node::{obstacles, round, GameNode};

const SCORE_ORIGIN: Vec2 = Vec2 { x: 8.0, y: 28.0 };
const GAP_DEBUG_COLOR: Rgba = [255, 220, 0, 255];
const GAME_OVER_TEXT: &str = "GAME OVER - PRESS R";

/// Score line, game-over prompt, and the optional line from the actor to
/// the gap it is heading for.
#[derive(Debug)]
pub(crate) struct Hud {
    round: NodeId,
    text_color: Rgba,
    show_gap_debug: bool,
}

impl Hud {
    pub(crate) fn new(round: NodeId, text_color: Rgba, show_gap_debug: bool) -> Self {
        Self {
            round,
            text_color,
            show_gap_debug,
        }
    }

    pub(crate) fn draw(&self, graph: &SceneGraph<GameNode>, surface: &mut dyn Surface) {
        let Some(controller) = round(graph, self.round) else {
            return;
        };
        let score = obstacles(graph, controller.obstacles())
            .map(|manager| manager.score())
            .unwrap_or_default();
        surface.draw_text(
            SCORE_ORIGIN,
            &format!("SCORE {score}  BEST {}", controller.best_score().max(score)),
            self.text_color,
        );

        if self.show_gap_debug {
            self.draw_gap_line(graph, controller.actor(), controller.obstacles(), surface);
        }

        if controller.is_over() {
            let (width, height) = surface.size();
            let origin = Vec2::new(
                (width as f32 - text_width(GAME_OVER_TEXT)) * 0.5,
                height as f32 * 0.5,
            );
            surface.draw_text(origin, GAME_OVER_TEXT, self.text_color);
        }
    }

    fn draw_gap_line(
        &self,
        graph: &SceneGraph<GameNode>,
        actor: NodeId,
        obstacles_id: NodeId,
        surface: &mut dyn Surface,
    ) {
        let Some(center) = graph.shape(actor).map(|shape| shape.bounds().center()) else {
            return;
        };
        let Some(manager) = obstacles(graph, obstacles_id) else {
            return;
        };
        let offset = manager.settings().pipe_width;
        if let Some(gap) = manager.next_gap(graph, center.x, offset) {
            surface.draw_line(center, gap, GAP_DEBUG_COLOR);
        }
    }

    pub(crate) fn title(&self, graph: &SceneGraph<GameNode>) -> Option<String> {
        let controller = round(graph, self.round)?;
        let title = if controller.is_over() {
            format!(
                "Saila - round {} over, score {} (best {})",
                controller.rounds(),
                controller.last_score(),
                controller.best_score()
            )
        } else {
            let score = obstacles(graph, controller.obstacles())
                .map(|manager| manager.score())
                .unwrap_or_default();
            format!("Saila - round {} - score {score}", controller.rounds())
        };
        Some(title)
    }
}
