//! Retained-mode 2D scene graph with a winit/pixels frame loop.
//!
//! A game defines one enum of node kinds, implements [`NodeBehavior`] for it,
//! builds a tree under [`Engine::root`], and hands the engine to [`run_app`]
//! (or steps it by hand with [`Engine::step`]).

pub mod app;

pub use app::{
    load_bitmap, run_app, text_width, AppError, AssetError, Bitmap, Engine, FrameClock,
    FrameContext, InputAction, InputEvent, InputSnapshot, LoopConfig, LoopMetricsSnapshot,
    MetricsAccumulator, NodeBehavior, NodeId, PixelCanvas, Rect, Renderer, Rgba, SceneGraph,
    SceneNode, Shape, Surface, Vec2, DEFAULT_BACKGROUND,
};
