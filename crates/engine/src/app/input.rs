#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Jump,
    Restart,
    Quit,
}

const ACTION_COUNT: usize = 3;

/// Discrete events drained once per frame, ahead of `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(InputAction),
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::Jump => 0,
            InputAction::Restart => 1,
            InputAction::Quit => 2,
        }
    }
}

/// Which actions are held at the moment the snapshot was taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(actions: ActionStates) -> Self {
        Self { actions }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_builder_sets_and_clears_actions() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::Jump, true)
            .with_action_down(InputAction::Restart, true)
            .with_action_down(InputAction::Restart, false);

        assert!(snapshot.is_down(InputAction::Jump));
        assert!(!snapshot.is_down(InputAction::Restart));
        assert!(!snapshot.is_down(InputAction::Quit));
    }
}
