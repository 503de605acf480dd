use std::ops::Sub;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Same size, origin shifted by `delta`.
    pub const fn translate(self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.w, self.h)
    }

    /// Same origin, size grown by `delta`. Neither axis drops below one pixel.
    pub fn grow(self, delta: Point) -> Self {
        Self::new(
            self.x,
            self.y,
            grow_axis(self.w, delta.x),
            grow_axis(self.h, delta.y),
        )
    }
}

fn grow_axis(size: u32, delta: i32) -> u32 {
    let grown = i64::from(size) + i64::from(delta);
    grown.clamp(1, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod geometry_tests {
    use super::*;

    #[test]
    fn test_point_difference() {
        assert_eq!(Point::new(70, 45) - Point::new(50, 50), Point::new(20, -5));
    }

    #[test]
    fn test_translate_keeps_size() {
        let rect = Rect::new(100, 100, 200, 150).translate(Point::new(-30, 7));
        assert_eq!(rect, Rect::new(70, 107, 200, 150));
    }

    #[test]
    fn test_grow_clamps_each_axis() {
        let rect = Rect::new(5, 5, 200, 150).grow(Point::new(-250, 10));
        assert_eq!(rect, Rect::new(5, 5, 1, 160));

        let rect = Rect::new(0, 0, 10, 10).grow(Point::new(-10, -9));
        assert_eq!(rect, Rect::new(0, 0, 1, 1));
    }
}
