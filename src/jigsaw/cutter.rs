//! Pure-geometry piece cutting.
//!
//! Derives, per piece, the set of regions to erase from its expanded
//! rectangle: the four margin corners are always erased, and each interior
//! edge gets either a blank scooped out of the body (female) or a tab
//! spared in the margin (male). Actually sampling pixels against the
//! resulting outline is the image collaborator's job.

use crate::jigsaw::prelude::*;
use itertools::iproduct;

/// Axis-aligned ellipse described by its bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ellipse {
    pub rect: Rect,
}

impl Ellipse {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Ellipse {
        Ellipse { rect: Rect::new(x, y, width, height) }
    }

    /// Point membership against the inscribed ellipse.
    pub fn contains(&self, p: Point) -> bool {
        let rx = self.rect.width as f64 / 2.0;
        let ry = self.rect.height as f64 / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let cx = self.rect.x as f64 + rx;
        let cy = self.rect.y as f64 + ry;
        let dx = (p.x as f64 + 0.5 - cx) / rx;
        let dy = (p.y as f64 + 0.5 - cy) / ry;
        dx * dx + dy * dy <= 1.0
    }
}

// How an ellipse modifies its margin rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EllipseOp {
    /// Carved out of the erase region: a male tab left standing in the margin.
    Subtract,
    /// Joined onto the erase region: a female blank cut into the piece body.
    Add,
}

/// One erase region: a margin rectangle, optionally modified by an ellipse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CutRegion {
    pub base: Rect,
    pub ellipse: Option<(EllipseOp, Ellipse)>,
}

impl CutRegion {
    fn plain(base: Rect) -> CutRegion {
        CutRegion { base, ellipse: None }
    }

    /// Whether this region erases the given local-coordinate point.
    pub fn erases(&self, p: Point) -> bool {
        match self.ellipse {
            Some((EllipseOp::Subtract, e)) => self.base.contains(p) && !e.contains(p),
            Some((EllipseOp::Add, e))      => self.base.contains(p) || e.contains(p),
            None                           => self.base.contains(p)
        }
    }
}

/// The full cut-out boundary of one piece, in local coordinates with the
/// origin at the top-left of the expanded rectangle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CutOutline {
    pub bounds: Rect,
    pub regions: Vec<CutRegion>,
}

impl CutOutline {
    /// Whether any region erases the given point.
    pub fn erases(&self, p: Point) -> bool {
        self.regions.iter().any(|region| region.erases(p))
    }

    /// Rasterizes the outline into a row-major boolean mask over the
    /// expanded rectangle; `true` marks a pixel the piece keeps.
    pub fn mask(&self) -> Vec<bool> {
        iproduct!(0..self.bounds.height, 0..self.bounds.width)
            .map(|(y, x)| !self.erases(Point::new(x, y)))
            .collect()
    }
}

/// Everything the cutter needs to know about the board's layout.
#[derive(Clone, Copy, Debug)]
pub struct CutSpec {
    pub rows: usize,
    pub cols: usize,
    pub tile_width: i32,
    pub tile_height: i32,
    pub extra_w: i32,
    pub extra_h: i32,
    pub style: CutStyle,
}

impl CutSpec {
    fn piece_width(&self) -> i32 {
        self.tile_width + 2 * self.extra_w
    }

    fn piece_height(&self) -> i32 {
        self.tile_height + 2 * self.extra_h
    }
}

/// Pixel-sampling collaborator. Called once per piece during the board's
/// Cutting phase with the piece's source rectangle and erase outline; the
/// implementation produces and retains the masked sub-image.
pub trait ImageSampler {
    fn sample(&mut self, cell: GridCell, source_rect: Rect, outline: &CutOutline);
}

/// Computes the cut-out boundary for the piece at `cell` with tab flags
/// `tabs`. Edges on the puzzle's outer boundary stay plain margin; interior
/// edges gain a tab or blank ellipse under the traditional style.
pub fn outline(spec: &CutSpec, cell: GridCell, tabs: TabSet) -> CutOutline {
    let (w, h) = (spec.piece_width(), spec.piece_height());
    let (ew, eh) = (spec.extra_w, spec.extra_h);

    let mut regions = vec![
        // the four corners never carry tabs
        CutRegion::plain(Rect::new(0, 0, ew, eh)),
        CutRegion::plain(Rect::new(w - ew, 0, ew, eh)),
        CutRegion::plain(Rect::new(0, h - eh, ew, eh)),
        CutRegion::plain(Rect::new(w - ew, h - eh, ew, eh)),
    ];

    let interior = |edge: Edge| match edge {
        Edge::North => cell.row > 0,
        Edge::South => cell.row < spec.rows as i32 - 1,
        Edge::West  => cell.col > 0,
        Edge::East  => cell.col < spec.cols as i32 - 1
    };

    for edge in Edge::all() {
        if !interior(edge) {
            continue;
        }

        let base = match edge {
            Edge::North => Rect::new(ew, 0, w - 2 * ew, eh),
            Edge::South => Rect::new(ew, h - eh, w - 2 * ew, eh),
            Edge::West  => Rect::new(0, eh, ew, h - 2 * eh),
            Edge::East  => Rect::new(w - ew, eh, ew, h - 2 * eh)
        };

        let ellipse = match spec.style {
            CutStyle::Plain => None,
            CutStyle::Traditional => {
                let male = tabs.male(edge);
                // male: spare the tab in the margin; female: scoop the
                // blank out of the body one margin-width further in
                let rect = match (edge, male) {
                    (Edge::North, true)  => Rect::new(w / 2 - ew / 2, 0, ew, eh),
                    (Edge::North, false) => Rect::new(w / 2 - ew / 2, eh, ew, eh),
                    (Edge::South, true)  => Rect::new(w / 2 - ew / 2, h - eh, ew, eh),
                    (Edge::South, false) => Rect::new(w / 2 - ew / 2, h - 2 * eh, ew, eh),
                    (Edge::West, true)   => Rect::new(0, h / 2 - eh / 2, ew, eh),
                    (Edge::West, false)  => Rect::new(ew, h / 2 - eh / 2, ew, eh),
                    (Edge::East, true)   => Rect::new(w - ew, h / 2 - eh / 2, ew, eh),
                    (Edge::East, false)  => Rect::new(w - 2 * ew, h / 2 - eh / 2, ew, eh)
                };
                let op = if male { EllipseOp::Subtract } else { EllipseOp::Add };
                Some((op, Ellipse { rect }))
            }
        };

        regions.push(CutRegion { base, ellipse });
    }

    CutOutline { bounds: Rect::new(0, 0, w, h), regions }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(style: CutStyle) -> CutSpec {
        CutSpec {
            rows: 2,
            cols: 2,
            tile_width: 100,
            tile_height: 100,
            extra_w: 25,
            extra_h: 25,
            style,
        }
    }

    #[test]
    fn corners_are_always_erased() {
        let out = outline(&spec(CutStyle::Traditional), GridCell::new(0, 0), TabSet::default());
        for p in [Point::new(5, 5), Point::new(145, 5), Point::new(5, 145), Point::new(145, 145)] {
            assert!(out.erases(p), "{p:?} should be erased");
        }
        assert!(!out.erases(Point::new(75, 75)), "body center stays");
    }

    #[test]
    fn boundary_edges_stay_plain_margin() {
        // (0,0) of a 2x2 grid: north and west are outer boundary
        let out = outline(&spec(CutStyle::Traditional), GridCell::new(0, 0), TabSet::default());
        let plain: Vec<_> = out.regions.iter().filter(|r| r.ellipse.is_none()).collect();
        // 4 corners + 2 boundary edges
        assert_eq!(plain.len(), 6);
        assert_eq!(out.regions.len(), 8);
    }

    #[test]
    fn male_edge_spares_the_tab_in_the_margin() {
        let mut tabs = TabSet::default();
        tabs.set_male(Edge::East, true);
        let out = outline(&spec(CutStyle::Traditional), GridCell::new(0, 0), tabs);

        // center of the east margin, inside the tab ellipse
        assert!(!out.erases(Point::new(137, 75)));
        // east margin away from the tab is still erased
        assert!(out.erases(Point::new(137, 30)));
    }

    #[test]
    fn female_edge_scoops_a_blank_out_of_the_body() {
        let out = outline(&spec(CutStyle::Traditional), GridCell::new(0, 0), TabSet::default());

        // center of the add-ellipse, one margin-width inside the body
        assert!(out.erases(Point::new(112, 75)));
        // the whole east margin is gone too
        assert!(out.erases(Point::new(137, 75)));
    }

    #[test]
    fn plain_style_has_no_ellipses() {
        let out = outline(&spec(CutStyle::Plain), GridCell::new(1, 1), TabSet::default());
        assert!(out.regions.iter().all(|r| r.ellipse.is_none()));
    }

    #[test]
    fn mask_covers_the_expanded_rectangle() {
        let out = outline(&spec(CutStyle::Traditional), GridCell::new(0, 0), TabSet::default());
        let mask = out.mask();
        assert_eq!(mask.len(), 150 * 150);
        // NW corner pixel erased, body pixel kept
        assert!(!mask[5 * 150 + 5]);
        assert!(mask[75 * 150 + 75]);
    }
}
