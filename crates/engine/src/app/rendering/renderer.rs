use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use winit::window::Window;

use super::PixelCanvas;

/// Fixed-size RGBA framebuffer presented to the window through `pixels`.
/// The buffer keeps the play-field size; window resizes only rescale it.
pub struct Renderer {
    pixels: Pixels<'static>,
    buffer_width: u32,
    buffer_height: u32,
}

impl Renderer {
    pub fn new(window: Arc<Window>, buffer_width: u32, buffer_height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(buffer_width, buffer_height, surface)?;
        Ok(Self {
            pixels,
            buffer_width,
            buffer_height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    /// Hands the frame buffer to `draw`, then presents it.
    pub fn render_with(&mut self, draw: impl FnOnce(&mut PixelCanvas<'_>)) -> Result<(), Error> {
        {
            let mut canvas =
                PixelCanvas::new(self.pixels.frame_mut(), self.buffer_width, self.buffer_height);
            draw(&mut canvas);
        }
        self.pixels.render()
    }
}
