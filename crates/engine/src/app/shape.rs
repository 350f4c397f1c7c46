use std::sync::Arc;

use super::geometry::{Rect, Rgba, Vec2};
use super::rendering::{Bitmap, Surface};

/// Sized, drawable payload shared by every rectangular node kind.
#[derive(Debug, Clone)]
pub struct Shape {
    pub width: f32,
    pub height: f32,
    pub color: Rgba,
    pub image: Option<Arc<Bitmap>>,
    bounds: Rect,
}

impl Shape {
    pub fn new(width: f32, height: f32, color: Rgba) -> Self {
        Self {
            width,
            height,
            color,
            image: None,
            bounds: Rect::new(0.0, 0.0, width, height),
        }
    }

    pub fn with_image(mut self, image: Option<Arc<Bitmap>>) -> Self {
        self.image = image;
        self
    }

    /// Bounding box as of the last [`Shape::refresh_bounds`].
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn refresh_bounds(&mut self, abs_pos: Vec2) {
        self.bounds = Rect::from_top_left(abs_pos, self.width, self.height);
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        match &self.image {
            Some(image) => surface.blit(image, self.bounds),
            None => surface.fill_rect(self.bounds, self.color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rendering::PixelCanvas;

    #[test]
    fn refresh_bounds_tracks_absolute_position() {
        let mut shape = Shape::new(20.0, 30.0, [255, 0, 0, 255]);
        shape.refresh_bounds(Vec2::new(4.0, 8.0));
        assert_eq!(shape.bounds(), Rect::new(4.0, 8.0, 20.0, 30.0));
    }

    #[test]
    fn bitmap_fill_takes_precedence_over_color() {
        let blue = [0, 0, 255, 255];
        let bitmap = Bitmap::from_rgba(1, 1, blue.to_vec()).expect("bitmap");
        let mut shape = Shape::new(2.0, 2.0, [255, 0, 0, 255]).with_image(Some(Arc::new(bitmap)));
        shape.refresh_bounds(Vec2::ZERO);

        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = PixelCanvas::new(&mut frame, 4, 4);
        shape.draw(&mut canvas);
        assert_eq!(canvas.pixel(1, 1), Some(blue));
        assert_eq!(canvas.pixel(2, 2), Some([0, 0, 0, 0]));

        shape.image = None;
        shape.draw(&mut canvas);
        assert_eq!(canvas.pixel(1, 1), Some([255, 0, 0, 255]));
    }
}
