mod clock;
mod engine;
mod geometry;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod shape;

pub use clock::FrameClock;
pub use engine::{Engine, DEFAULT_BACKGROUND};
pub use geometry::{Rect, Rgba, Vec2};
pub use input::{InputAction, InputEvent, InputSnapshot};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::{LoopMetricsSnapshot, MetricsAccumulator};
pub use rendering::{load_bitmap, text_width, AssetError, Bitmap, PixelCanvas, Renderer, Surface};
pub use scene::{FrameContext, NodeBehavior, NodeId, SceneGraph, SceneNode};
pub use shape::Shape;
