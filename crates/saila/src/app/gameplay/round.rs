use engine::{InputAction, InputSnapshot, NodeId, SceneGraph};
use tracing::info;

use super::node::{obstacles, round, with_actor, with_obstacles, GameNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoundState {
    Active,
    GameOver,
}

/// Owns the actor and obstacle stream as direct children. A loss freezes
/// both; holding restart while frozen resets them and starts a new round.
#[derive(Debug)]
pub(crate) struct RoundController {
    state: RoundState,
    actor: NodeId,
    obstacles: NodeId,
    rounds: u32,
    last_score: u32,
    best_score: u32,
}

impl RoundController {
    pub(crate) fn new(actor: NodeId, obstacles: NodeId) -> Self {
        Self {
            state: RoundState::Active,
            actor,
            obstacles,
            rounds: 1,
            last_score: 0,
            best_score: 0,
        }
    }

    pub(crate) fn is_over(&self) -> bool {
        self.state == RoundState::GameOver
    }

    pub(crate) fn actor(&self) -> NodeId {
        self.actor
    }

    pub(crate) fn obstacles(&self) -> NodeId {
        self.obstacles
    }

    pub(crate) fn rounds(&self) -> u32 {
        self.rounds
    }

    pub(crate) fn last_score(&self) -> u32 {
        self.last_score
    }

    pub(crate) fn best_score(&self) -> u32 {
        self.best_score
    }

    pub(crate) fn update(
        &mut self,
        id: NodeId,
        graph: &mut SceneGraph<GameNode>,
        input: &InputSnapshot,
    ) {
        if self.state == RoundState::GameOver && input.is_down(InputAction::Restart) {
            self.restart(id, graph);
        }
    }

    fn restart(&mut self, id: NodeId, graph: &mut SceneGraph<GameNode>) {
        graph.set_enable_children(id, true);
        let actor = self.actor;
        with_actor(graph, actor, |actor_kind, graph| actor_kind.reset(actor, graph));
        with_obstacles(graph, self.obstacles, |manager, graph| manager.reset(graph));
        self.state = RoundState::Active;
        self.rounds += 1;
        info!(round = self.rounds, best_score = self.best_score, "round_restarted");
    }

    fn enter_game_over(&mut self, score: u32) {
        self.state = RoundState::GameOver;
        self.last_score = score;
        self.best_score = self.best_score.max(score);
    }
}

/// Loss signal raised by the actor. Freezes the controller's children; a
/// controller that is already over ignores it.
pub(crate) fn notify_loss(graph: &mut SceneGraph<GameNode>, controller: NodeId) {
    let Some(current) = round(graph, controller) else {
        return;
    };
    if current.is_over() {
        return;
    }
    let score = obstacles(graph, current.obstacles)
        .map(|manager| manager.score())
        .unwrap_or_default();

    let Some(GameNode::Round(controller_kind)) = graph.kind_mut(controller) else {
        return;
    };
    controller_kind.enter_game_over(score);
    let (round_number, best_score) = (controller_kind.rounds, controller_kind.best_score);

    graph.set_enable_children(controller, false);
    info!(score, best_score, round = round_number, "round_lost");
}
