use std::sync::Arc;

use engine::{Bitmap, NodeBehavior, NodeId, Rect, Rgba, SceneGraph, SceneNode, Shape, Vec2};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use super::node::GameNode;
use crate::app::config::GAP_MARGIN;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ObstacleSettings {
    pub(crate) field_width: f32,
    pub(crate) field_height: f32,
    pub(crate) gap_height: f32,
    pub(crate) pipe_width: f32,
    pub(crate) spawn_interval: f32,
    pub(crate) pipe_speed: f32,
    pub(crate) scoring_x: f32,
    pub(crate) color: Rgba,
}

/// Upper and lower barrier around one gap. Both barriers are children of
/// the manager node; this record is the authoritative enumeration.
#[derive(Debug, Clone, Copy)]
struct ObstaclePair {
    upper: NodeId,
    lower: NodeId,
    scored: bool,
}

/// Spawns barrier pairs on a timer, scrolls them left, scores each pair once
/// as it passes `scoring_x`, and culls pairs that leave the field.
#[derive(Debug)]
pub(crate) struct ObstacleStreamManager {
    settings: ObstacleSettings,
    score: u32,
    spawn_timer: f32,
    pairs: Vec<ObstaclePair>,
    image: Option<Arc<Bitmap>>,
    mirrored_image: Option<Arc<Bitmap>>,
    rng: StdRng,
}

impl ObstacleStreamManager {
    pub(crate) fn new(settings: ObstacleSettings, rng: StdRng) -> Self {
        Self {
            settings,
            score: 0,
            spawn_timer: 0.0,
            pairs: Vec::new(),
            image: None,
            mirrored_image: None,
            rng,
        }
    }

    pub(crate) fn settings(&self) -> &ObstacleSettings {
        &self.settings
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub(crate) fn time_to_next_spawn(&self) -> f32 {
        (self.settings.spawn_interval - self.spawn_timer).max(0.0)
    }

    pub(crate) fn update(&mut self, id: NodeId, graph: &mut SceneGraph<GameNode>, dt: f32) {
        self.spawn_timer += dt;
        if self.spawn_timer >= self.settings.spawn_interval {
            self.spawn_timer -= self.settings.spawn_interval;
            let top_height = self.random_top_height();
            self.spawn_pair_at(id, graph, self.settings.field_width, top_height);
        }

        let dx = -self.settings.pipe_speed * dt;
        let scoring_x = self.settings.scoring_x;
        let score = &mut self.score;
        self.pairs.retain_mut(|pair| {
            for barrier in [pair.upper, pair.lower] {
                if let Some(node) = graph.get_mut(barrier) {
                    node.position.x += dx;
                }
                graph.refresh_bounds(barrier);
            }

            let Some(right) = graph.shape(pair.upper).map(|shape| shape.bounds().right()) else {
                return false;
            };
            if !pair.scored && right < scoring_x {
                pair.scored = true;
                *score += 1;
            }
            if right < 0.0 {
                graph.remove_subtree(pair.upper);
                graph.remove_subtree(pair.lower);
                debug!(score = *score, "pair_culled");
                return false;
            }
            true
        });
    }

    /// Adds a pair at local x `x` whose upper barrier is `top_height` tall.
    pub(crate) fn spawn_pair_at(
        &mut self,
        id: NodeId,
        graph: &mut SceneGraph<GameNode>,
        x: f32,
        top_height: f32,
    ) {
        let settings = self.settings;
        let lower_height = settings.field_height - settings.gap_height - top_height;
        let upper = Shape::new(settings.pipe_width, top_height, settings.color)
            .with_image(self.mirrored_image.clone());
        let lower = Shape::new(settings.pipe_width, lower_height, settings.color)
            .with_image(self.image.clone());

        let upper = graph.add_child(
            id,
            SceneNode::new(Vec2::new(x, 0.0), GameNode::Sprite(upper)),
        );
        let lower = graph.add_child(
            id,
            SceneNode::new(
                Vec2::new(x, top_height + settings.gap_height),
                GameNode::Sprite(lower),
            ),
        );
        graph.refresh_bounds(upper);
        graph.refresh_bounds(lower);
        self.pairs.push(ObstaclePair {
            upper,
            lower,
            scored: false,
        });
        debug!(x, top_height, pairs = self.pairs.len(), "pair_spawned");
    }

    /// Bounding boxes of every live barrier, upper before lower, in pair order.
    pub(crate) fn obstacle_rects(&self, graph: &SceneGraph<GameNode>) -> Vec<Rect> {
        self.pairs
            .iter()
            .flat_map(|pair| [pair.upper, pair.lower])
            .filter_map(|barrier| graph.shape(barrier).map(Shape::bounds))
            .collect()
    }

    /// Center of the first gap whose center is at or ahead of
    /// `player_x - offset`; falls back to the last gap when all are behind.
    pub(crate) fn next_gap(
        &self,
        graph: &SceneGraph<GameNode>,
        player_x: f32,
        offset: f32,
    ) -> Option<Vec2> {
        let threshold = player_x - offset;
        let mut last = None;
        for pair in &self.pairs {
            let Some(upper) = graph.shape(pair.upper).map(Shape::bounds) else {
                continue;
            };
            let gap = Vec2::new(
                upper.center().x,
                upper.bottom() + self.settings.gap_height * 0.5,
            );
            if gap.x >= threshold {
                return Some(gap);
            }
            last = Some(gap);
        }
        last
    }

    /// Drops every pair and zeroes the timer and score. Settings and the
    /// assigned image are kept.
    pub(crate) fn reset(&mut self, graph: &mut SceneGraph<GameNode>) {
        for pair in self.pairs.drain(..) {
            graph.remove_subtree(pair.upper);
            graph.remove_subtree(pair.lower);
        }
        self.spawn_timer = 0.0;
        self.score = 0;
    }

    /// Applies `image` to live pairs now and to every later spawn. Upper
    /// barriers get a vertically mirrored copy; `None` restores color fills.
    pub(crate) fn set_image(
        &mut self,
        graph: &mut SceneGraph<GameNode>,
        image: Option<Arc<Bitmap>>,
    ) {
        self.mirrored_image = image
            .as_deref()
            .map(|bitmap| Arc::new(bitmap.flipped_vertical()));
        self.image = image;

        for pair in &self.pairs {
            if let Some(shape) = graph.kind_mut(pair.upper).and_then(NodeBehavior::shape_mut) {
                shape.image = self.mirrored_image.clone();
            }
            if let Some(shape) = graph.kind_mut(pair.lower).and_then(NodeBehavior::shape_mut) {
                shape.image = self.image.clone();
            }
        }
    }

    fn random_top_height(&mut self) -> f32 {
        let min = GAP_MARGIN;
        let max = self.settings.field_height - self.settings.gap_height - GAP_MARGIN;
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}
