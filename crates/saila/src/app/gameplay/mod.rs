mod actor;
mod hud;
mod node;
mod obstacles;
mod round;

use std::sync::Arc;

use engine::{Bitmap, Engine, NodeId, SceneNode, Shape, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use self::actor::{Actor, ActorSettings};
use self::hud::Hud;
use self::obstacles::{ObstacleSettings, ObstacleStreamManager};
use self::round::RoundController;
use super::config::GameConfig;

pub(crate) use self::node::GameNode;

/// Images resolved at startup. Missing entries draw as flat color.
#[derive(Debug, Clone, Default)]
pub(crate) struct SceneImages {
    pub(crate) player: Option<Arc<Bitmap>>,
    pub(crate) pipe: Option<Arc<Bitmap>>,
}

/// Handles to the long-lived nodes of the game scene.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SceneHandles {
    pub(crate) round: NodeId,
    pub(crate) actor: NodeId,
    pub(crate) obstacles: NodeId,
}

/// Read-only view of the game state used by the headless runner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GameStatus {
    pub(crate) score: u32,
    pub(crate) best_score: u32,
    pub(crate) rounds: u32,
    pub(crate) is_over: bool,
    pub(crate) live_pairs: usize,
    pub(crate) next_spawn_in: f32,
    pub(crate) actor_center: Option<Vec2>,
    pub(crate) actor_velocity_y: f32,
    pub(crate) next_gap: Option<Vec2>,
}

/// Root
/// ├── RoundController
/// │   ├── Actor
/// │   └── ObstacleStreamManager
/// │       └── barrier pairs (spawned at runtime)
/// └── Hud
pub(crate) fn build_scene(
    config: &GameConfig,
    images: SceneImages,
) -> (Engine<GameNode>, SceneHandles) {
    let mut engine = Engine::new(GameNode::Group);
    engine.set_background(config.background_color);
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let graph = engine.graph_mut();
    let mut manager = ObstacleStreamManager::new(
        ObstacleSettings {
            field_width: config.field_width,
            field_height: config.field_height,
            gap_height: config.gap_height,
            pipe_width: config.pipe_width,
            spawn_interval: config.spawn_interval,
            pipe_speed: config.pipe_speed,
            scoring_x: config.scoring_x,
            color: config.pipe_color,
        },
        rng,
    );
    manager.set_image(graph, images.pipe);
    let obstacles = graph.insert(SceneNode::new(Vec2::ZERO, GameNode::Obstacles(manager)));

    let spawn = Vec2::from(config.player_spawn);
    let mut actor = Actor::new(
        Shape::new(config.player_size, config.player_size, config.player_color)
            .with_image(images.player),
        ActorSettings {
            spawn,
            gravity: config.gravity,
            jump_velocity: config.jump_velocity,
            field_height: config.field_height,
        },
    )
    .with_obstacles(obstacles);
    actor.shape_mut().refresh_bounds(spawn);
    let actor = graph.insert(SceneNode::new(spawn, GameNode::Actor(actor)));

    let round = graph.insert(SceneNode::new(
        Vec2::ZERO,
        GameNode::Round(RoundController::new(actor, obstacles)),
    ));
    node::with_actor(graph, actor, |actor, _| actor.set_loss_listener(round));

    let root = engine.root();
    let graph = engine.graph_mut();
    graph.attach(root, round);
    graph.attach(round, actor);
    graph.attach(round, obstacles);
    engine.add_object(SceneNode::new(
        Vec2::ZERO,
        GameNode::Hud(Hud::new(round, config.text_color, config.show_gap_debug)),
    ));

    info!(
        field_width = config.field_width,
        field_height = config.field_height,
        seed = ?config.seed,
        node_count = engine.graph().len(),
        "scene_built"
    );

    (
        engine,
        SceneHandles {
            round,
            actor,
            obstacles,
        },
    )
}

pub(crate) fn game_status(engine: &Engine<GameNode>, handles: &SceneHandles) -> GameStatus {
    let graph = engine.graph();
    let controller = node::round(graph, handles.round);
    let manager = node::obstacles(graph, handles.obstacles);
    let actor = node::actor(graph, handles.actor);
    let actor_center = actor.map(|actor| actor.shape().bounds().center());
    let next_gap = manager.zip(actor_center).and_then(|(manager, center)| {
        manager.next_gap(graph, center.x, manager.settings().pipe_width)
    });

    GameStatus {
        score: manager.map(|manager| manager.score()).unwrap_or_default(),
        best_score: controller
            .map(|controller| controller.best_score())
            .unwrap_or_default(),
        rounds: controller.map(|controller| controller.rounds()).unwrap_or_default(),
        is_over: controller.is_some_and(|controller| controller.is_over()),
        live_pairs: manager.map(|manager| manager.pair_count()).unwrap_or_default(),
        next_spawn_in: manager
            .map(|manager| manager.time_to_next_spawn())
            .unwrap_or_default(),
        actor_center,
        actor_velocity_y: actor.map(|actor| actor.velocity_y()).unwrap_or_default(),
        next_gap,
    }
}
