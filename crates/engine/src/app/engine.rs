use tracing::info;

use super::geometry::{Rgba, Vec2};
use super::input::{InputAction, InputEvent, InputSnapshot};
use super::rendering::Surface;
use super::scene::{FrameContext, NodeBehavior, NodeId, SceneGraph, SceneNode};

pub const DEFAULT_BACKGROUND: Rgba = [0x11, 0x11, 0x11, 255];

/// Owns one scene tree and drives it a frame at a time:
/// events, then `update` over the whole tree, then `draw`.
pub struct Engine<B> {
    graph: SceneGraph<B>,
    root: NodeId,
    running: bool,
    background: Rgba,
}

impl<B: NodeBehavior> Engine<B> {
    pub fn new(root_kind: B) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.insert(SceneNode::new(Vec2::ZERO, root_kind));
        Self {
            graph,
            root,
            running: true,
            background: DEFAULT_BACKGROUND,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn graph(&self) -> &SceneGraph<B> {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph<B> {
        &mut self.graph
    }

    pub fn add_object(&mut self, node: SceneNode<B>) -> NodeId {
        self.graph.add_child(self.root, node)
    }

    pub fn set_background(&mut self, background: Rgba) {
        self.background = background;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn handle_events(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            let reason = match event {
                InputEvent::Quit => "window_close",
                InputEvent::KeyDown(InputAction::Quit) => "escape_key",
                InputEvent::KeyDown(_) => continue,
            };
            if self.running {
                info!(reason, "shutdown_requested");
            }
            self.running = false;
        }
    }

    /// Updates each top-level object in order. The root itself is a
    /// container and never receives `update`.
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) {
        let frame = FrameContext { dt, input };
        let mut index = 0;
        while let Some(&child) = self.graph.children(self.root).get(index) {
            self.graph.update_all(child, &frame);
            index += 1;
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.fill(self.background);
        self.graph.draw_all(self.root, surface);
    }

    /// One full frame without presenting. Returns whether the engine is
    /// still running; a quit event suppresses the update.
    pub fn step(
        &mut self,
        dt: f32,
        events: impl IntoIterator<Item = InputEvent>,
        input: &InputSnapshot,
        surface: &mut dyn Surface,
    ) -> bool {
        self.handle_events(events);
        if !self.running {
            return false;
        }
        self.update(dt, input);
        self.draw(surface);
        true
    }

    pub fn debug_title(&self) -> Option<String> {
        self.graph.debug_title(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rendering::PixelCanvas;

    const NO_EVENTS: [InputEvent; 0] = [];

    #[derive(Debug)]
    struct Ticker {
        elapsed: f32,
    }

    impl NodeBehavior for Ticker {
        fn update(&mut self, _id: NodeId, _graph: &mut SceneGraph<Self>, frame: &FrameContext<'_>) {
            self.elapsed += frame.dt;
        }

        fn debug_title(&self, _graph: &SceneGraph<Self>) -> Option<String> {
            (self.elapsed > 0.0).then(|| format!("elapsed {:.2}", self.elapsed))
        }
    }

    #[test]
    fn step_updates_then_draws_background() {
        let mut engine = Engine::new(Ticker { elapsed: 0.0 });
        let child = engine.add_object(SceneNode::new(Vec2::ZERO, Ticker { elapsed: 0.0 }));
        let mut buffer = vec![0u8; 2 * 2 * 4];
        let mut canvas = PixelCanvas::new(&mut buffer, 2, 2);

        let input = InputSnapshot::empty();
        assert!(engine.step(0.5, NO_EVENTS, &input, &mut canvas));
        assert!(engine.step(0.25, NO_EVENTS, &input, &mut canvas));

        let elapsed = engine.graph().kind(child).expect("child").elapsed;
        assert!((elapsed - 0.75).abs() < 1e-6);
        assert_eq!(engine.graph().kind(engine.root()).expect("root").elapsed, 0.0);
        assert_eq!(canvas.pixel(0, 0), Some(DEFAULT_BACKGROUND));
        assert_eq!(engine.debug_title().as_deref(), Some("elapsed 0.75"));
    }

    #[test]
    fn quit_and_escape_stop_the_engine_before_update() {
        let mut buffer = vec![0u8; 4];
        let mut canvas = PixelCanvas::new(&mut buffer, 1, 1);
        let input = InputSnapshot::empty();

        let mut engine = Engine::new(Ticker { elapsed: 0.0 });
        let child = engine.add_object(SceneNode::new(Vec2::ZERO, Ticker { elapsed: 0.0 }));
        assert!(!engine.step(1.0, [InputEvent::Quit], &input, &mut canvas));
        assert_eq!(engine.graph().kind(child).expect("child").elapsed, 0.0);

        let mut engine = Engine::new(Ticker { elapsed: 0.0 });
        engine.handle_events([InputEvent::KeyDown(InputAction::Jump)]);
        assert!(engine.is_running());
        engine.handle_events([InputEvent::KeyDown(InputAction::Quit)]);
        assert!(!engine.is_running());
    }

    #[test]
    fn set_background_changes_the_clear_color() {
        let mut engine = Engine::new(Ticker { elapsed: 0.0 });
        engine.set_background([10, 20, 30, 255]);
        let mut buffer = vec![0u8; 4];
        let mut canvas = PixelCanvas::new(&mut buffer, 1, 1);

        engine.draw(&mut canvas);
        assert_eq!(canvas.pixel(0, 0), Some([10, 20, 30, 255]));
    }
}
