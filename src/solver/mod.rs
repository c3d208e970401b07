/*
 *  The computer player: picks a loose piece and walks it home on a
 *  difficulty-scaled clock, merging through the same sweep as human play.
 */

use crate::jigsaw::prelude::*;
use rand::{Rng, rngs::StdRng};

/// An autonomous agent driving one computer-controlled board. The solver
/// never fuses pieces directly; it only animates a piece to its destination
/// and lets the board's shared merge sweep do the matching, so human and
/// cpu play are bound by the identical snap rule.
pub struct Solver {
    /// Destination of the piece currently being placed.
    destination: Option<Point>,
    /// This player's per-piece placement delay, jittered once at creation
    /// so concurrent cpu boards desynchronize.
    delay: Duration,
    rng: StdRng,
}

impl Solver {
    /// Creates a solver for the given board and installs its jittered
    /// placement delay on the board's cpu-move timer.
    pub fn new(board: &mut Board, mut rng: StdRng) -> Solver {
        let base = board.difficulty().base_delay();
        let jitter = rng.gen_range(-(TIME_JITTER_MS as i64)..=TIME_JITTER_MS as i64);
        let delay = if jitter >= 0 {
            base + Duration::from_millis(jitter as u64)
        } else {
            base - Duration::from_millis(jitter.unsigned_abs())
        };

        board.timers_mut().get_mut(TimerKey::CpuMove).set_reset(delay);
        Solver { destination: None, delay, rng }
    }

    /// The jittered per-piece placement duration this player drew.
    pub fn placement_delay(&self) -> Duration {
        self.delay
    }

    /// Runs one tick of the placement loop: select a displaced piece if
    /// none is mid-placement, then interpolate it toward its destination by
    /// the cpu-move timer's progress, clamping on arrival.
    pub fn update(&mut self, board: &mut Board) {
        if board.phase() != Phase::Playing || board.is_game_over() {
            return;
        }

        if board.selected().is_none() && !self.pick_piece(board) {
            return;
        }

        let Some(dest) = self.destination else {
            return;
        };

        let progress = board.timers().get(TimerKey::CpuMove).progress();
        let arrived = match board.selected_piece_mut() {
            Some(piece) => {
                let next = geometry::lerp(piece.anchor_position(), dest, progress);
                piece.reposition(next);
                piece.position() == dest
            }
            None => {
                self.destination = None;
                return;
            }
        };

        if arrived {
            self.destination = None;
            board.clear_selection();
            board.merge_sweep();
        }
    }

    /// Samples uniformly random live pieces until one is displaced from its
    /// destination, then selects it and restarts the placement clock. The
    /// sampling is bounded: when every live piece already sits home (fusion
    /// merely pending), the solver stands down and leaves the sweep to
    /// collapse them.
    fn pick_piece(&mut self, board: &mut Board) -> bool {
        let count = board.pieces().len();
        for _ in 0..count * 8 {
            let index = self.rng.gen_range(0..count);
            let piece = &board.pieces()[index];
            let dest = board.destination(piece.cell());
            if piece.position() != dest {
                log::debug!("{}: cpu picked piece {:?}", board.name(), piece.cell());
                board.select(index);
                board.timers_mut().get_mut(TimerKey::CpuMove).restart();
                self.destination = Some(dest);
                return true;
            }
        }
        false
    }
}
