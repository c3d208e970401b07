use crate::jigsaw::prelude::*;

/// The jigsaw key of a piece: whether each edge carries a protruding (male)
/// tab. Fixed at construction; a female edge is simply a non-male one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TabSet {
    male: [bool; 4],
}

impl TabSet {
    pub fn male(&self, edge: Edge) -> bool {
        self.male[edge as usize]
    }

    pub fn set_male(&mut self, edge: Edge, male: bool) {
        self.male[edge as usize] = male;
    }
}

/// One image tile plus its cluster membership. A fused cluster is exactly
/// one surviving `Piece` owning a flat list of absorbed members; flattening
/// in `fuse` guarantees a child never has children of its own.
#[derive(Clone, Debug)]
pub struct Piece {
    /// Logical grid coordinate; never changes after creation.
    pub(crate) cell: GridCell,
    /// Current top-left of the unexpanded tile on screen.
    pub(crate) position: Point,
    /// Position recorded when the piece came to rest or was selected; the
    /// start point for scramble and cpu homing interpolation.
    pub(crate) anchor_position: Point,
    /// Randomly drawn cell the piece scrambles out to.
    pub(crate) start_cell: GridCell,
    pub(crate) tile_width: i32,
    pub(crate) tile_height: i32,
    pub(crate) extra_w: i32,
    pub(crate) extra_h: i32,
    pub(crate) tabs: TabSet,
    /// Fused members in fusion order; the order doubles as draw order.
    pub(crate) children: Vec<Piece>,
    /// Which child the user grabbed, if they grabbed inside a child; the
    /// anchor member for `reposition`.
    pub(crate) selected_child: Option<usize>,
    /// Cut geometry filled in during the board's Cutting phase.
    pub(crate) outline: Option<CutOutline>,
}

impl Piece {
    pub(crate) fn new(cell: GridCell, tile_width: i32, tile_height: i32, extra_w: i32, extra_h: i32, tabs: TabSet) -> Piece {
        Piece {
            cell,
            position: Point::default(),
            anchor_position: Point::default(),
            start_cell: cell,
            tile_width,
            tile_height,
            extra_w,
            extra_h,
            tabs,
            children: vec![],
            selected_child: None,
            outline: None,
        }
    }

    pub fn cell(&self) -> GridCell {
        self.cell
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn anchor_position(&self) -> Point {
        self.anchor_position
    }

    pub fn start_cell(&self) -> GridCell {
        self.start_cell
    }

    pub fn tabs(&self) -> TabSet {
        self.tabs
    }

    pub fn children(&self) -> &[Piece] {
        &self.children
    }

    pub fn outline(&self) -> Option<&CutOutline> {
        self.outline.as_ref()
    }

    pub fn tile_width(&self) -> i32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> i32 {
        self.tile_height
    }

    /// Full on-screen rectangle including the margin overhang; this is the
    /// draw rectangle and the basis for snap detection.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position.x - self.extra_w,
            self.position.y - self.extra_h,
            self.tile_width + 2 * self.extra_w,
            self.tile_height + 2 * self.extra_h,
        )
    }

    /// Where this piece's expanded rectangle sits in the source image.
    pub fn source_rect(&self) -> Rect {
        Rect::new(
            self.cell.col * self.tile_width - self.extra_w,
            self.cell.row * self.tile_height - self.extra_h,
            self.tile_width + 2 * self.extra_w,
            self.tile_height + 2 * self.extra_h,
        )
    }

    /// Whether the point lands on this piece or any of its children.
    pub fn contains_point(&self, p: Point) -> bool {
        self.rect().contains(p) || self.children.iter().any(|child| child.rect().contains(p))
    }

    /// Records which child, if any, the given grab point landed on. A grab
    /// on the owning piece itself leaves the selection empty.
    pub(crate) fn select_child_at(&mut self, p: Point) {
        self.selected_child = self.children.iter().position(|child| child.rect().contains(p));
    }

    pub(crate) fn clear_selected_child(&mut self) {
        self.selected_child = None;
    }

    /// The thin border strip on one edge of the expanded rectangle, sized by
    /// `EXTRA_RATIO`; two facing strips must overlap for a snap.
    fn edge_strip(&self, edge: Edge) -> Rect {
        let r = self.rect();
        let strip_h = (r.height as f64 * EXTRA_RATIO) as i32;
        let strip_w = (r.width as f64 * EXTRA_RATIO) as i32;
        match edge {
            Edge::North => Rect::new(r.x, r.y, r.width, strip_h),
            Edge::South => Rect::new(r.x, r.y + r.height - strip_h, r.width, strip_h),
            Edge::West  => Rect::new(r.x, r.y, strip_w, r.height),
            Edge::East  => Rect::new(r.x + r.width - strip_w, r.y, strip_w, r.height)
        }
    }

    /// Whether the facing edges of two logically adjacent pieces currently
    /// overlap closely enough to snap. Pieces that are not orthogonal grid
    /// neighbours never intersect, whatever their screen positions. The test
    /// deliberately ignores whether the two are already fused; callers
    /// remove absorbed pieces from the live list instead.
    pub fn intersects(&self, other: &Piece) -> bool {
        if !self.rect().intersects(&other.rect()) {
            return false;
        }

        let dc = other.cell.col - self.cell.col;
        let dr = other.cell.row - self.cell.row;
        let (near, facing) = match (dc, dr) {
            (0, -1) => (Edge::North, Edge::South),
            (0, 1)  => (Edge::South, Edge::North),
            (1, 0)  => (Edge::East, Edge::West),
            (-1, 0) => (Edge::West, Edge::East),
            _       => return false
        };

        self.edge_strip(near).intersects(&other.edge_strip(facing))
    }

    /// Extends `intersects` transitively across both clusters, so a
    /// multi-piece cluster can catch a match through any member edge.
    pub fn intersects_cluster(&self, other: &Piece) -> bool {
        if !self.children.is_empty() {
            for child in &self.children {
                if child.intersects(other) {
                    return true;
                }
                for theirs in &other.children {
                    if theirs.intersects(child) || theirs.intersects(self) {
                        return true;
                    }
                }
            }
            false
        } else {
            other.children.iter().any(|theirs| theirs.intersects(self))
        }
    }

    /// Fuses `other`'s entire cluster into this one: other's children are
    /// flattened in first, then other itself, and the grown cluster is
    /// re-anchored at `anchor`. The caller discards `other` from its live
    /// list afterwards.
    pub(crate) fn fuse(&mut self, mut other: Piece, anchor: Point) {
        other.selected_child = None;
        self.children.append(&mut other.children);
        self.children.push(other);
        self.reposition(anchor);
    }

    /// Moves the whole cluster so the grabbed member's tile lands exactly on
    /// `anchor`; every other member is offset from it by its grid delta
    /// times the tile size, preserving the rigid relative layout.
    pub(crate) fn reposition(&mut self, anchor: Point) {
        let base = self
            .selected_child
            .and_then(|i| self.children.get(i))
            .map_or(self.cell, |child| child.cell);

        let offset = |cell: GridCell| {
            Point::new(
                (cell.col - base.col) * self.tile_width,
                (cell.row - base.row) * self.tile_height,
            )
        };

        self.position = anchor + offset(self.cell);
        let (tw, th) = (self.tile_width, self.tile_height);
        for child in &mut self.children {
            child.position = anchor
                + Point::new((child.cell.col - base.col) * tw, (child.cell.row - base.row) * th);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(col: i32, row: i32) -> Piece {
        // 100x100 tiles with the standard 25 margin
        Piece::new(GridCell::new(col, row), 100, 100, 25, 25, TabSet::default())
    }

    fn at(col: i32, row: i32, pos: Point) -> Piece {
        let mut p = piece(col, row);
        p.position = pos;
        p
    }

    #[test]
    fn adjacent_pieces_at_destination_intersect() {
        let a = at(0, 0, Point::new(0, 0));
        let b = at(1, 0, Point::new(100, 0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn far_apart_neighbours_do_not_intersect() {
        let a = at(0, 0, Point::new(0, 0));
        let b = at(1, 0, Point::new(400, 0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn non_adjacent_pieces_never_intersect() {
        // diagonal neighbour dropped directly on top
        let a = at(0, 0, Point::new(0, 0));
        let b = at(1, 1, Point::new(0, 0));
        assert!(!a.intersects(&b));

        // two columns apart, screen rects overlapping
        let c = at(2, 0, Point::new(10, 0));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn fuse_flattens_and_children_never_nest() {
        let mut a = at(0, 0, Point::new(0, 0));
        let mut b = at(1, 0, Point::new(100, 0));
        let c = at(2, 0, Point::new(200, 0));

        b.fuse(c, b.position);
        a.fuse(b, a.position);

        assert_eq!(a.children.len(), 2);
        assert!(a.children.iter().all(|child| child.children.is_empty()));
    }

    #[test]
    fn fuse_anchors_grabbed_member_and_offsets_the_rest() {
        // 3x3 scenario: fuse (0,0) with (1,0), then drop the cluster at P
        let mut a = at(0, 0, Point::new(17, 23));
        let b = at(1, 0, Point::new(120, 20));

        let p = Point::new(500, 600);
        a.fuse(b, p);

        assert_eq!(a.children.len(), 1);
        assert_eq!(a.position, p);
        assert_eq!(a.children[0].position, Point::new(600, 600));
    }

    #[test]
    fn reposition_anchors_on_the_selected_child() {
        let mut a = at(0, 0, Point::new(0, 0));
        let b = at(0, 1, Point::new(0, 100));
        a.fuse(b, a.position);

        a.selected_child = Some(0);
        let p = Point::new(250, 250);
        a.reposition(p);

        assert_eq!(a.children[0].position, p);
        assert_eq!(a.position, Point::new(250, 150));
    }

    #[test]
    fn cluster_intersection_reaches_through_children() {
        let mut a = at(0, 0, Point::new(0, 0));
        let b = at(1, 0, Point::new(100, 0));
        a.fuse(b, a.position);

        // c is adjacent to the absorbed (1,0) member only
        let c = at(2, 0, Point::new(200, 0));
        assert!(!a.intersects(&c));
        assert!(a.intersects_cluster(&c));

        // and a bare piece can catch a match against the other side's child
        let mut d = at(3, 1, Point::new(900, 900));
        let e = at(3, 0, Point::new(900, 800));
        d.fuse(e, Point::new(300, 100)); // anchors d, which puts e at (300, 0)
        assert_eq!(d.children[0].position, Point::new(300, 0));
        assert!(c.intersects_cluster(&d));
    }
}
