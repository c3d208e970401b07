/*
 *  The jigsaw assembly engine: pieces, tabs, cutting, and per-board play.
 */

pub(crate) mod board;
pub(crate) mod consts;
pub mod cutter;
pub mod geometry;
pub(crate) mod piece;
pub(crate) mod timer;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::{
        board::{Board, BoardConfig, ImageInfo, Phase, PointerState},
        consts::*,
        cutter::{self, CutOutline, CutRegion, CutSpec, Ellipse, EllipseOp, ImageSampler},
        geometry::{self, Edge, GridCell, Point, Rect},
        piece::{Piece, TabSet},
        timer::{Timer, TimerKey, TimerSet}
    };
}
