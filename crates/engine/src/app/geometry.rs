use std::ops::{Add, Sub};

pub type Rgba = [u8; 4];

/// World-space vector. Origin is the top-left of the play field and `y`
/// grows downward; one world unit is one framebuffer pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_top_left(top_left: Vec2, width: f32, height: f32) -> Self {
        Self::new(top_left.x, top_left.y, width, height)
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Index of the first rect in `others` that intersects this one.
    pub fn collide_list(&self, others: &[Rect]) -> Option<usize> {
        others.iter().position(|other| self.intersects(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn collide_list_reports_first_match_only() {
        let probe = Rect::new(5.0, 5.0, 10.0, 10.0);
        let others = [
            Rect::new(100.0, 100.0, 5.0, 5.0),
            Rect::new(0.0, 0.0, 6.0, 6.0),
            Rect::new(8.0, 8.0, 2.0, 2.0),
        ];
        assert_eq!(probe.collide_list(&others), Some(1));
        assert_eq!(probe.collide_list(&others[..1]), None);
        assert_eq!(probe.collide_list(&[]), None);
    }

    #[test]
    fn rect_edges_and_center() {
        let rect = Rect::from_top_left(Vec2::new(2.0, 4.0), 6.0, 10.0);
        assert_eq!(rect.right(), 8.0);
        assert_eq!(rect.bottom(), 14.0);
        assert_eq!(rect.center(), Vec2::new(5.0, 9.0));
    }
}
