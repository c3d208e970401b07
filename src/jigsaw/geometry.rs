use crate::jigsaw::prelude::*;

/// Screen-space point in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Constructs a new point.
    pub fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }
}

impl Add<Point> for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Self::Output {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub<Point> for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Self::Output {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Axis-aligned screen rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Constructs a new rectangle from its top-left corner and dimensions.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect { x, y, width, height }
    }

    /// Whether the point falls inside the rectangle. The right and bottom
    /// edges are exclusive, so side-by-side rectangles never share a point.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// Whether two rectangles overlap by at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// The center of the rectangle, rounded toward the top-left.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Fixed logical grid coordinate of a piece; assigned at creation and never
/// changed afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

impl GridCell {
    /// Constructs a new cell.
    pub fn new(col: i32, row: i32) -> GridCell {
        GridCell { col, row }
    }

    /// Whether the other cell sits immediately north, south, east, or west.
    pub fn orthogonal_to(&self, other: &GridCell) -> bool {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row) == 1
    }
}

// An edge typing, used for tab flags, snap strips, and cut regions alike.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Edge {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
}

impl Edge {
    /// Gets the edges in order.
    pub fn all() -> [Edge; 4] {
        [Edge::North, Edge::South, Edge::East, Edge::West]
    }

    /// The edge a neighbour presents back across this one.
    pub fn opposite(&self) -> Edge {
        match self {
            Edge::North => Edge::South,
            Edge::South => Edge::North,
            Edge::East  => Edge::West,
            Edge::West  => Edge::East
        }
    }

    /// Grid offset `(dcol, drow)` of the neighbour across this edge.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Edge::North => (0, -1),
            Edge::South => (0, 1),
            Edge::East  => (1, 0),
            Edge::West  => (-1, 0)
        }
    }
}

/// Integer linear interpolation from `start` toward `dest`, clamping at the
/// destination once `progress` reaches 1. At progress 0.5 each axis sits at
/// the arithmetic midpoint.
pub fn lerp(start: Point, dest: Point, progress: f64) -> Point {
    if progress >= 1.0 {
        return dest;
    }
    let x = start.x - ((start.x - dest.x) as f64 * progress) as i32;
    let y = start.y - ((start.y - dest.y) as f64 * progress) as i32;
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_exclusive_on_far_edges() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 0)));
        assert!(!r.contains(Point::new(0, 10)));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        let c = Rect::new(9, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
    }

    #[test]
    fn edges_pair_with_their_opposites() {
        for edge in Edge::all() {
            assert_eq!(edge.opposite().opposite(), edge);
            let (dc, dr) = edge.offset();
            let (oc, or) = edge.opposite().offset();
            assert_eq!((dc + oc, dr + or), (0, 0));
        }
    }

    #[test]
    fn lerp_hits_midpoint_and_clamps() {
        let start = Point::new(0, 10);
        let dest = Point::new(10, 30);
        assert_eq!(lerp(start, dest, 0.0), start);
        assert_eq!(lerp(start, dest, 0.5), Point::new(5, 20));
        assert_eq!(lerp(start, dest, 1.0), dest);
        assert_eq!(lerp(start, dest, 4.0), dest);
    }
}
