use engine::{FrameContext, NodeBehavior, NodeId, SceneGraph, Shape, Surface};

use super::actor::Actor;
use super::hud::Hud;
use super::obstacles::ObstacleStreamManager;
use super::round::RoundController;

/// Every kind of node the game puts in its scene tree.
#[derive(Debug)]
pub(crate) enum GameNode {
    Group,
    Sprite(Shape),
    Actor(Actor),
    Obstacles(ObstacleStreamManager),
    Round(RoundController),
    Hud(Hud),
}

impl NodeBehavior for GameNode {
    fn update(&mut self, id: NodeId, graph: &mut SceneGraph<Self>, frame: &FrameContext<'_>) {
        match self {
            GameNode::Group | GameNode::Hud(_) => {}
            GameNode::Sprite(shape) => {
                if let Some(position) = graph.abs_pos(id) {
                    shape.refresh_bounds(position);
                }
            }
            GameNode::Actor(actor) => actor.update(id, graph, frame),
            GameNode::Obstacles(obstacles) => obstacles.update(id, graph, frame.dt),
            GameNode::Round(round) => round.update(id, graph, frame.input),
        }
    }

    fn draw(&self, _id: NodeId, graph: &SceneGraph<Self>, surface: &mut dyn Surface) {
        match self {
            GameNode::Sprite(shape) => shape.draw(surface),
            GameNode::Actor(actor) => actor.shape().draw(surface),
            GameNode::Hud(hud) => hud.draw(graph, surface),
            GameNode::Group | GameNode::Obstacles(_) | GameNode::Round(_) => {}
        }
    }

    fn shape(&self) -> Option<&Shape> {
        match self {
            GameNode::Sprite(shape) => Some(shape),
            GameNode::Actor(actor) => Some(actor.shape()),
            _ => None,
        }
    }

    fn shape_mut(&mut self) -> Option<&mut Shape> {
        match self {
            GameNode::Sprite(shape) => Some(shape),
            GameNode::Actor(actor) => Some(actor.shape_mut()),
            _ => None,
        }
    }

    fn debug_title(&self, graph: &SceneGraph<Self>) -> Option<String> {
        match self {
            GameNode::Hud(hud) => hud.title(graph),
            _ => None,
        }
    }
}

impl GameNode {
    pub(crate) fn as_actor(&self) -> Option<&Actor> {
        match self {
            GameNode::Actor(actor) => Some(actor),
            _ => None,
        }
    }

    pub(crate) fn as_obstacles(&self) -> Option<&ObstacleStreamManager> {
        match self {
            GameNode::Obstacles(obstacles) => Some(obstacles),
            _ => None,
        }
    }

    pub(crate) fn as_round(&self) -> Option<&RoundController> {
        match self {
            GameNode::Round(round) => Some(round),
            _ => None,
        }
    }
}

pub(crate) fn actor(graph: &SceneGraph<GameNode>, id: NodeId) -> Option<&Actor> {
    graph.kind(id).and_then(GameNode::as_actor)
}

pub(crate) fn obstacles(
    graph: &SceneGraph<GameNode>,
    id: NodeId,
) -> Option<&ObstacleStreamManager> {
    graph.kind(id).and_then(GameNode::as_obstacles)
}

pub(crate) fn round(graph: &SceneGraph<GameNode>, id: NodeId) -> Option<&RoundController> {
    graph.kind(id).and_then(GameNode::as_round)
}

/// Runs `f` against the actor at `id` with the rest of the graph mutable.
pub(crate) fn with_actor<R>(
    graph: &mut SceneGraph<GameNode>,
    id: NodeId,
    f: impl FnOnce(&mut Actor, &mut SceneGraph<GameNode>) -> R,
) -> Option<R> {
    graph
        .with_kind_mut(id, |kind, graph| match kind {
            GameNode::Actor(actor) => Some(f(actor, graph)),
            _ => None,
        })
        .flatten()
}

pub(crate) fn with_obstacles<R>(
    graph: &mut SceneGraph<GameNode>,
    id: NodeId,
    f: impl FnOnce(&mut ObstacleStreamManager, &mut SceneGraph<GameNode>) -> R,
) -> Option<R> {
    graph
        .with_kind_mut(id, |kind, graph| match kind {
            GameNode::Obstacles(obstacles) => Some(f(obstacles, graph)),
            _ => None,
        })
        .flatten()
}
