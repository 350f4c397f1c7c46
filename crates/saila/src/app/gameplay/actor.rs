use engine::{FrameContext, InputAction, NodeId, SceneGraph, Shape, Vec2};

use super::node::{obstacles, GameNode};
use super::round;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ActorSettings {
    pub(crate) spawn: Vec2,
    pub(crate) gravity: f32,
    pub(crate) jump_velocity: f32,
    pub(crate) field_height: f32,
}

/// Player: falls under constant gravity, jumps while the jump key is held,
/// stays inside the field vertically, and reports a loss on any barrier hit.
#[derive(Debug)]
pub(crate) struct Actor {
    shape: Shape,
    velocity_y: f32,
    settings: ActorSettings,
    obstacles: Option<NodeId>,
    loss_listener: Option<NodeId>,
}

impl Actor {
    pub(crate) fn new(shape: Shape, settings: ActorSettings) -> Self {
        Self {
            shape,
            velocity_y: 0.0,
            settings,
            obstacles: None,
            loss_listener: None,
        }
    }

    pub(crate) fn with_obstacles(mut self, obstacles: NodeId) -> Self {
        self.obstacles = Some(obstacles);
        self
    }

    pub(crate) fn set_loss_listener(&mut self, listener: NodeId) {
        self.loss_listener = Some(listener);
    }

    pub(crate) fn shape(&self) -> &Shape {
        &self.shape
    }

    pub(crate) fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    pub(crate) fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    pub(crate) fn update(
        &mut self,
        id: NodeId,
        graph: &mut SceneGraph<GameNode>,
        frame: &FrameContext<'_>,
    ) {
        let Some(position) = graph.abs_pos(id) else {
            return;
        };
        self.shape.refresh_bounds(position);

        if frame.input.is_down(InputAction::Jump) {
            self.velocity_y = self.settings.jump_velocity;
        }
        self.velocity_y += self.settings.gravity * frame.dt;

        let floor = (self.settings.field_height - self.shape.height).max(0.0);
        if let Some(node) = graph.get_mut(id) {
            let next_y = node.position.y + self.velocity_y * frame.dt;
            node.position.y = if next_y < 0.0 {
                self.velocity_y = 0.0;
                0.0
            } else if next_y > floor {
                self.velocity_y = 0.0;
                floor
            } else {
                next_y
            };
        }

        if self.hits_obstacle(graph) {
            if let Some(listener) = self.loss_listener {
                round::notify_loss(graph, listener);
            }
        }
    }

    /// Puts the actor back at its spawn point at rest.
    pub(crate) fn reset(&mut self, id: NodeId, graph: &mut SceneGraph<GameNode>) {
        self.velocity_y = 0.0;
        if let Some(node) = graph.get_mut(id) {
            node.position = self.settings.spawn;
        }
        if let Some(position) = graph.abs_pos(id) {
            self.shape.refresh_bounds(position);
        }
    }

    fn hits_obstacle(&self, graph: &SceneGraph<GameNode>) -> bool {
        let Some(manager) = self.obstacles.and_then(|id| obstacles(graph, id)) else {
            return false;
        };
        let rects = manager.obstacle_rects(graph);
        self.shape.bounds().collide_list(&rects).is_some()
    }
}

#[cfg(test)]
mod tests {
    use engine::{InputSnapshot, SceneNode};

    use super::*;

    const DT: f32 = 1.0 / 60.0;
    const GRAVITY: f32 = 800.0;
    const SIZE: f32 = 40.0;

    fn actor_graph(spawn_y: f32) -> (SceneGraph<GameNode>, NodeId) {
        let mut graph = SceneGraph::new();
        let settings = ActorSettings {
            spawn: Vec2::new(100.0, spawn_y),
            gravity: GRAVITY,
            jump_velocity: -300.0,
            field_height: 600.0,
        };
        let actor = Actor::new(Shape::new(SIZE, SIZE, [255, 0, 0, 255]), settings);
        let id = graph.insert(SceneNode::new(settings.spawn, GameNode::Actor(actor)));
        (graph, id)
    }

    fn step(graph: &mut SceneGraph<GameNode>, id: NodeId, input: &InputSnapshot) {
        graph.update_all(id, &FrameContext { dt: DT, input });
    }

    fn y_of(graph: &SceneGraph<GameNode>, id: NodeId) -> f32 {
        graph.get(id).expect("actor").position.y
    }

    fn velocity_of(graph: &SceneGraph<GameNode>, id: NodeId) -> f32 {
        graph
            .kind(id)
            .and_then(GameNode::as_actor)
            .expect("actor")
            .velocity_y()
    }

    #[test]
    fn free_fall_for_one_second() {
        let (mut graph, id) = actor_graph(100.0);
        let input = InputSnapshot::empty();
        for _ in 0..60 {
            step(&mut graph, id, &input);
        }

        assert!((velocity_of(&graph, id) - 800.0).abs() < 0.01);
        // Semi-implicit Euler: y = y0 + g * dt^2 * n(n + 1) / 2.
        let expected = 100.0 + GRAVITY * DT * DT * (60.0 * 61.0) / 2.0;
        assert!((y_of(&graph, id) - expected).abs() < 0.05);
    }

    #[test]
    fn lands_on_the_floor_near_the_analytic_time() {
        let (mut graph, id) = actor_graph(100.0);
        let input = InputSnapshot::empty();
        let floor = 600.0 - SIZE;
        let drop = floor - 100.0;
        let analytic = (2.0 * GRAVITY * drop).sqrt() / GRAVITY;

        let mut landed_at = None;
        for frame in 1..=120 {
            step(&mut graph, id, &input);
            if landed_at.is_none() && y_of(&graph, id) >= floor {
                landed_at = Some(frame as f32 * DT);
            }
        }

        let landed_at = landed_at.expect("actor should land");
        assert!((landed_at - analytic).abs() <= 2.0 * DT);
        assert_eq!(y_of(&graph, id), floor);
        assert_eq!(velocity_of(&graph, id), 0.0);
    }

    #[test]
    fn held_jump_sets_velocity_instead_of_accumulating() {
        let (mut graph, id) = actor_graph(300.0);
        let input = InputSnapshot::empty().with_action_down(InputAction::Jump, true);
        for _ in 0..3 {
            step(&mut graph, id, &input);
        }

        let expected = -300.0 + GRAVITY * DT;
        assert!((velocity_of(&graph, id) - expected).abs() < 1e-3);
        assert!(y_of(&graph, id) < 300.0);
    }

    #[test]
    fn ceiling_clamps_position_and_velocity() {
        let (mut graph, id) = actor_graph(1.0);
        let input = InputSnapshot::empty().with_action_down(InputAction::Jump, true);
        step(&mut graph, id, &input);

        assert_eq!(y_of(&graph, id), 0.0);
        assert_eq!(velocity_of(&graph, id), 0.0);
    }

    #[test]
    fn reset_restores_spawn_at_rest() {
        let (mut graph, id) = actor_graph(100.0);
        let input = InputSnapshot::empty();
        for _ in 0..30 {
            step(&mut graph, id, &input);
        }

        graph.with_kind_mut(id, |kind, graph| {
            if let GameNode::Actor(actor) = kind {
                actor.reset(id, graph);
            }
        });

        assert_eq!(y_of(&graph, id), 100.0);
        assert_eq!(velocity_of(&graph, id), 0.0);
        let bounds = graph.shape(id).expect("shape").bounds();
        assert_eq!(bounds.top_left(), Vec2::new(100.0, 100.0));
    }
}
