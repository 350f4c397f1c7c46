use crate::app::geometry::{Rect, Rgba, Vec2};

use super::text::for_each_text_pixel;
use super::Bitmap;

/// Drawing target for scene nodes. Calls are fire-and-forget; anything
/// outside the surface is clipped.
pub trait Surface {
    fn size(&self) -> (u32, u32);
    fn fill(&mut self, color: Rgba);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    /// Draws `bitmap` stretched to `dest`. Fully transparent texels are skipped.
    fn blit(&mut self, bitmap: &Bitmap, dest: Rect);
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgba);
    fn draw_text(&mut self, origin: Vec2, text: &str, color: Rgba);
}

/// [`Surface`] over a row-major RGBA8 frame buffer.
pub struct PixelCanvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> PixelCanvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let offset = self.byte_offset(x as i32, y as i32)?;
        let mut pixel = [0u8; 4];
        pixel.copy_from_slice(&self.frame[offset..offset + 4]);
        Some(pixel)
    }

    fn byte_offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let pixel_offset = (y as usize).checked_mul(self.width as usize)?.checked_add(x as usize)?;
        let byte_offset = pixel_offset.checked_mul(4)?;
        (byte_offset + 4 <= self.frame.len()).then_some(byte_offset)
    }

    fn write_pixel_clipped(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(offset) = self.byte_offset(x, y) {
            self.frame[offset..offset + 4].copy_from_slice(&color);
        }
    }

    /// Pixel-space span of `rect` clipped to the canvas, as
    /// `(left, top, right, bottom)` with exclusive right/bottom.
    fn clipped_span(&self, rect: ScreenRect) -> Option<(i32, i32, i32, i32)> {
        let left = rect.left.max(0);
        let top = rect.top.max(0);
        let right = rect.right.min(self.width as i32);
        let bottom = rect.bottom.min(self.height as i32);
        (left < right && top < bottom).then_some((left, top, right, bottom))
    }
}

impl Surface for PixelCanvas<'_> {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill(&mut self, color: Rgba) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((left, top, right, bottom)) = self.clipped_span(ScreenRect::snapped(rect)) else {
            return;
        };
        for y in top..bottom {
            for x in left..right {
                self.write_pixel_clipped(x, y, color);
            }
        }
    }

    fn blit(&mut self, bitmap: &Bitmap, dest: Rect) {
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return;
        }
        let target = ScreenRect::snapped(dest);
        let dest_width = (target.right - target.left) as i64;
        let dest_height = (target.bottom - target.top) as i64;
        let Some((left, top, right, bottom)) = self.clipped_span(target) else {
            return;
        };

        for out_y in top..bottom {
            let src_y = ((out_y - target.top) as i64 * bitmap.height() as i64 / dest_height) as u32;
            for out_x in left..right {
                let src_x =
                    ((out_x - target.left) as i64 * bitmap.width() as i64 / dest_width) as u32;
                let Some(texel) = bitmap.pixel(src_x, src_y) else {
                    continue;
                };
                if texel[3] == 0 {
                    continue;
                }
                self.write_pixel_clipped(out_x, out_y, texel);
            }
        }
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        let (mut x0, mut y0) = (from.x.round() as i32, from.y.round() as i32);
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut error = dx + dy;

        loop {
            self.write_pixel_clipped(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                x0 += step_x;
            }
            if doubled <= dx {
                error += dx;
                y0 += step_y;
            }
        }
    }

    fn draw_text(&mut self, origin: Vec2, text: &str, color: Rgba) {
        let x = origin.x.round() as i32;
        let y = origin.y.round() as i32;
        for_each_text_pixel(x, y, text, |px, py| self.write_pixel_clipped(px, py, color));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenRect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl ScreenRect {
    fn snapped(rect: Rect) -> Self {
        Self {
            left: rect.x.round() as i32,
            top: rect.y.round() as i32,
            right: rect.right().round() as i32,
            bottom: rect.bottom().round() as i32,
        }
    }
}
