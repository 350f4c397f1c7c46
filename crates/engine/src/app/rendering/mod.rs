mod bitmap;
mod canvas;
mod renderer;
mod text;

pub use bitmap::{load_bitmap, AssetError, Bitmap};
pub use canvas::{PixelCanvas, Surface};
pub use renderer::Renderer;
pub use text::text_width;
