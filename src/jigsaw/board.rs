use crate::jigsaw::prelude::*;
use itertools::iproduct;
use rand::{Rng, rngs::StdRng, seq::SliceRandom};

/// Pointer input for one tick: current position plus edge-triggered flags,
/// consumed once per update.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerState {
    pub position: Point,
    pub dragged: bool,
    pub clicked: bool,
    pub released: bool,
}

// The board's lifecycle phase; transitions are strictly forward.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Cutting = 0,
    Scrambling = 1,
    Playing = 2,
    Solved = 3,
}

/// Dimensions of the decoded source image; pixels stay with the image
/// collaborator.
#[derive(Clone, Copy, Debug)]
pub struct ImageInfo {
    pub width: i32,
    pub height: i32,
}

/// Per-board game parameters, chosen externally before construction.
#[derive(Clone, Copy, Debug)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    pub game_type: GameType,
    pub difficulty: Difficulty,
    pub cut_style: CutStyle,
}

/// One puzzle instance: the live piece set, its confining screen rectangle,
/// and the Cutting → Scrambling → Playing → Solved phase machine.
pub struct Board {
    name: String,
    pub(crate) pieces: Vec<Piece>,
    rows: usize,
    cols: usize,
    puzzle_width: i32,
    puzzle_height: i32,
    tile_width: i32,
    tile_height: i32,
    extra_w: i32,
    extra_h: i32,
    screen: Rect,
    game_type: GameType,
    difficulty: Difficulty,
    cut_style: CutStyle,
    phase: Phase,
    cut_count: usize,
    selected: Option<usize>,
    game_over: bool,
    timed_out: bool,
    place: Option<u32>,
    connect_sound: bool,
    auto_solve: bool,
    timers: TimerSet,
    rng: StdRng,
    sampler: Option<Box<dyn ImageSampler>>,
}

impl Board {
    /// Builds a board and cuts nothing yet; call `update` once per tick to
    /// advance through cutting and scrambling into play. Construction fails
    /// fast on a malformed grid, a degenerate screen, or an image too small
    /// to carve into the requested grid.
    pub fn new(name: impl Into<String>, image: ImageInfo, screen: Rect, config: BoardConfig, mut rng: StdRng) -> Result<Board> {
        let name = name.into();
        let BoardConfig { rows, cols, game_type, difficulty, cut_style } = config;

        if rows == 0 || cols == 0 {
            return Err(anyhow!("board {name}: grid must have at least one row and column"));
        }
        if screen.width <= 0 || screen.height <= 0 {
            return Err(anyhow!("board {name}: degenerate screen rectangle {screen:?}"));
        }
        if image.width <= 0 || image.height <= 0 {
            return Err(anyhow!("board {name}: degenerate image {}x{}", image.width, image.height));
        }

        // an image bigger than the window plays at 75% of the smaller
        // screen dimension, square
        let (fit_w, fit_h) = if image.width >= screen.width || image.height >= screen.height {
            let dim = (screen.width.min(screen.height) as f64 * 0.75) as i32;
            (dim, dim)
        } else {
            (image.width, image.height)
        };

        let tile_width = fit_w / cols as i32;
        let tile_height = fit_h / rows as i32;
        if tile_width <= 0 || tile_height <= 0 {
            return Err(anyhow!("board {name}: image {fit_w}x{fit_h} too small for a {cols}x{rows} grid"));
        }

        let puzzle_width = tile_width * cols as i32;
        let puzzle_height = tile_height * rows as i32;
        let extra_w = (tile_width as f64 * EXTRA_RATIO) as i32;
        let extra_h = (tile_height as f64 * EXTRA_RATIO) as i32;

        let game_timer = match game_type {
            GameType::Race       => Timer::stopwatch(),
            GameType::TimeAttack => {
                Timer::countdown(difficulty.worst_case_delay() * (rows * cols) as u32)
            }
        };
        let timers = TimerSet::new(game_timer, Duration::from_millis(SCRAMBLE_MS));

        let mut pieces: Vec<Piece> = Vec::with_capacity(rows * cols);
        for (col, row) in iproduct!(0..cols as i32, 0..rows as i32) {
            let cell = GridCell::new(col, row);

            // complement any neighbour already keyed; coin-flip fresh
            // interior edges; outer-boundary edges stay flat
            let mut tabs = TabSet::default();
            for edge in Edge::all() {
                let (dc, dr) = edge.offset();
                let (nc, nr) = (col + dc, row + dr);
                if nc < 0 || nr < 0 || nc >= cols as i32 || nr >= rows as i32 {
                    continue;
                }
                let neighbour = pieces.iter().find(|p| p.cell == GridCell::new(nc, nr));
                let male = match neighbour {
                    Some(other) => !other.tabs.male(edge.opposite()),
                    None        => rng.gen_bool(0.5)
                };
                tabs.set_male(edge, male);
            }

            pieces.push(Piece::new(cell, tile_width, tile_height, extra_w, extra_h, tabs));
        }

        let mut board = Board {
            name,
            pieces,
            rows,
            cols,
            puzzle_width,
            puzzle_height,
            tile_width,
            tile_height,
            extra_w,
            extra_h,
            screen,
            game_type,
            difficulty,
            cut_style,
            phase: Phase::Cutting,
            cut_count: 0,
            selected: None,
            game_over: false,
            timed_out: false,
            place: None,
            connect_sound: false,
            auto_solve: false,
            timers,
            rng,
            sampler: None,
        };

        for i in 0..board.pieces.len() {
            let dest = board.destination(board.pieces[i].cell);
            board.pieces[i].position = dest;
            board.pieces[i].anchor_position = dest;
        }

        Ok(board)
    }

    /// Installs the pixel-sampling collaborator invoked once per piece
    /// while cutting.
    pub fn set_sampler(&mut self, sampler: Box<dyn ImageSampler>) {
        self.sampler = Some(sampler);
    }

    /// Marks this board as computer-controlled: pointer input is ignored
    /// and a `Solver` is expected to drive placements.
    pub fn set_auto_solve(&mut self, auto_solve: bool) {
        self.auto_solve = auto_solve;
    }

    pub fn auto_solve(&self) -> bool {
        self.auto_solve
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut TimerSet {
        &mut self.timers
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Whether the board was ended by the time-attack deadline rather than
    /// a completed picture; reporting may prefer "time's up" over a rank.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn place(&self) -> Option<u32> {
        self.place
    }

    pub fn set_place(&mut self, place: u32) {
        self.place = Some(place);
    }

    /// Polls and clears the "play connect sound" trigger.
    pub fn take_connect_sound(&mut self) -> bool {
        std::mem::take(&mut self.connect_sound)
    }

    /// Fraction of pieces cut so far, for progress display.
    pub fn cutting_progress(&self) -> f64 {
        self.cut_count as f64 / (self.rows * self.cols) as f64
    }

    /// Fraction of the puzzle assembled: 0 with every piece loose, 1 once a
    /// single cluster remains.
    pub fn solved_fraction(&self) -> f64 {
        let total = (self.rows * self.cols) as f64;
        let fused = total - (self.pieces.len() as f64 - 1.0);
        (fused / total).max(0.0)
    }

    /// A piece's logically-correct final position, derived from its fixed
    /// grid coordinates alone.
    pub fn destination(&self, cell: GridCell) -> Point {
        let origin = Point::new(
            self.screen.x + self.screen.width / 2 - self.puzzle_width / 2,
            self.screen.y + self.screen.height / 2 - self.puzzle_height / 2,
        );
        origin + Point::new(cell.col * self.tile_width, cell.row * self.tile_height)
    }

    /// Where a piece scrambles out to: its random start cell, laid out in a
    /// grid spaced by the expanded piece size so nothing overlaps.
    fn start_destination(&self, piece: &Piece) -> Point {
        let r = piece.rect();
        Point::new(
            self.screen.x + (self.screen.width as f64 * 0.4) as i32 - self.puzzle_width / 2
                + piece.start_cell.col * r.width,
            self.screen.y + (self.screen.height as f64 * 0.35) as i32 - self.puzzle_height / 2
                + piece.start_cell.row * r.height,
        )
    }

    /// Advances the board by one tick. While cutting, exactly one piece is
    /// cut per call; while scrambling, pieces animate toward their start
    /// cells; in play, pointer input (or a solver, for cpu boards) drives
    /// selection and fusion. Solved boards ignore everything.
    pub fn update(&mut self, pointer: &PointerState, dt: Duration) {
        match self.phase {
            Phase::Cutting    => self.step_cutting(),
            Phase::Scrambling => self.step_scramble(dt),
            Phase::Playing    => self.step_play(pointer, dt),
            Phase::Solved     => {}
        }
    }

    /// Cuts the next piece's outline; on the last one, stacks every piece
    /// at the screen center and deals out random start cells.
    fn step_cutting(&mut self) {
        let spec = CutSpec {
            rows: self.rows,
            cols: self.cols,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            extra_w: self.extra_w,
            extra_h: self.extra_h,
            style: self.cut_style,
        };

        let piece = &mut self.pieces[self.cut_count];
        let outline = cutter::outline(&spec, piece.cell, piece.tabs);
        if let Some(sampler) = self.sampler.as_deref_mut() {
            sampler.sample(piece.cell, piece.source_rect(), &outline);
        }
        piece.outline = Some(outline);
        self.cut_count += 1;

        if self.cut_count == self.pieces.len() {
            let center = self.screen.center();
            let mut cells: Vec<GridCell> = self.pieces.iter().map(|p| p.cell).collect();
            cells.shuffle(&mut self.rng);

            for (piece, start) in self.pieces.iter_mut().zip(cells) {
                let r = piece.rect();
                let stacked = Point::new(
                    center.x - r.width / 2 + piece.extra_w,
                    center.y - r.height / 2 + piece.extra_h,
                );
                piece.position = stacked;
                piece.anchor_position = stacked;
                piece.start_cell = start;
            }

            self.phase = Phase::Scrambling;
            log::info!("{}: cutting complete, scrambling {} pieces", self.name, self.pieces.len());
        }
    }

    /// One shared countdown interpolates every piece from the center stack
    /// to its start cell, so they all arrive at the same moment.
    fn step_scramble(&mut self, dt: Duration) {
        self.timers.update(TimerKey::Scramble, dt);
        let progress = self.timers.get(TimerKey::Scramble).progress();
        let targets: Vec<Point> = self.pieces.iter().map(|p| self.start_destination(p)).collect();

        if progress < 1.0 {
            for (piece, target) in self.pieces.iter_mut().zip(targets) {
                piece.position = geometry::lerp(piece.anchor_position, target, progress);
            }
        } else {
            for (piece, target) in self.pieces.iter_mut().zip(targets) {
                piece.position = target;
                piece.anchor_position = target;
            }
            self.phase = Phase::Playing;
            log::info!("{}: scramble complete, now playing", self.name);
        }
    }

    fn step_play(&mut self, pointer: &PointerState, dt: Duration) {
        if self.check_game_over() {
            return;
        }

        self.timers.update_all(dt);

        // the time-attack deadline is hard: clamp the clock and end the
        // board even with pieces still loose
        if self.game_type == GameType::TimeAttack && self.timers.get(TimerKey::Game).expired() {
            self.timers.get_mut(TimerKey::Game).expire();
            self.timed_out = true;
            self.game_over = true;
            self.phase = Phase::Solved;
            log::info!("{}: time's up with {} pieces loose", self.name, self.pieces.len());
            return;
        }

        if !self.auto_solve {
            self.handle_pointer(pointer);
        }

        // the passive sweep; skipped while a cluster is held so the drag
        // selection stays valid, and rerun on release/arrival by the
        // respective paths
        if self.selected.is_none() {
            self.merge_sweep();
        }
    }

    fn handle_pointer(&mut self, pointer: &PointerState) {
        match self.selected {
            None => {
                if pointer.dragged || pointer.clicked {
                    self.select_at(pointer.position);
                }
            }
            Some(index) => {
                let piece = &self.pieces[index];
                let anchor = pointer.position
                    - Point::new(piece.tile_width / 2, piece.tile_height / 2);

                if pointer.dragged {
                    self.pieces[index].reposition(anchor);
                }
                if pointer.released {
                    self.check_match(anchor);
                    self.clear_selection();
                    self.check_game_over();
                }
            }
        }
    }

    /// Picks the topmost live piece (or cluster member) under the pointer,
    /// scanning from the end of the list since later pieces draw on top.
    fn select_at(&mut self, p: Point) {
        for i in (0..self.pieces.len()).rev() {
            if self.pieces[i].contains_point(p) {
                self.pieces[i].select_child_at(p);
                self.pieces[i].anchor_position = self.pieces[i].position;
                self.selected = Some(i);
                log::debug!("{}: selected piece {:?}", self.name, self.pieces[i].cell);
                break;
            }
        }
    }

    /// Selects a piece on behalf of a solver and re-anchors it for homing
    /// interpolation. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.pieces.len() {
            self.pieces[index].clear_selected_child();
            self.pieces[index].anchor_position = self.pieces[index].position;
            self.selected = Some(index);
        }
    }

    pub fn clear_selection(&mut self) {
        if let Some(index) = self.selected {
            self.pieces[index].clear_selected_child();
        }
        self.selected = None;
    }

    pub fn selected_piece(&self) -> Option<&Piece> {
        self.selected.map(|i| &self.pieces[i])
    }

    pub fn selected_piece_mut(&mut self) -> Option<&mut Piece> {
        self.selected.map(|i| &mut self.pieces[i])
    }

    /// Tests the released cluster against every other live piece and fuses
    /// on the first match, anchored at the drop point.
    fn check_match(&mut self, anchor: Point) {
        let Some(selected) = self.selected else {
            return;
        };

        let matched = (0..self.pieces.len()).find(|&i| {
            i != selected
                && (self.pieces[selected].intersects(&self.pieces[i])
                    || self.pieces[selected].intersects_cluster(&self.pieces[i]))
        });

        if let Some(index) = matched {
            let other = self.pieces.remove(index);
            let selected = if index < selected { selected - 1 } else { selected };
            log::debug!("{}: {:?} snapped onto {:?}", self.name, other.cell, self.pieces[selected].cell);
            self.pieces[selected].fuse(other, anchor);
            self.selected = Some(selected);
            self.connect_sound = true;
        }
    }

    /// Scans all live pieces pairwise and fuses the first intersecting pair,
    /// restarting until no pair matches; chain reactions between clusters
    /// that merely touch resolve here. Shared by human release and solver
    /// arrival. Callers must not hold a selection.
    pub fn merge_sweep(&mut self) {
        'scan: loop {
            for i in 0..self.pieces.len() {
                for j in 0..self.pieces.len() {
                    if i == j {
                        continue;
                    }
                    if self.pieces[i].intersects(&self.pieces[j])
                        || self.pieces[i].intersects_cluster(&self.pieces[j])
                    {
                        let other = self.pieces.remove(j);
                        let i = if j < i { i - 1 } else { i };
                        let anchor = self.pieces[i].position;
                        self.pieces[i].clear_selected_child();
                        log::debug!("{}: sweep fused {:?} into {:?}", self.name, other.cell, self.pieces[i].cell);
                        self.pieces[i].fuse(other, anchor);
                        self.connect_sound = true;
                        continue 'scan;
                    }
                }
            }
            break;
        }
        self.check_game_over();
    }

    /// Lazy, sticky game-over: the puzzle is solved exactly when one live
    /// piece remains.
    pub fn check_game_over(&mut self) -> bool {
        if !self.game_over && self.pieces.len() == 1 {
            self.game_over = true;
            self.phase = Phase::Solved;
            log::info!(
                "{}: solved in {:.1}s",
                self.name,
                self.timers.get(TimerKey::Game).elapsed().as_secs_f64()
            );
        }
        self.game_over
    }

    /// Runs cutting and scrambling to completion so tests and tools can
    /// start directly in the Playing phase.
    pub(crate) fn skip_setup(&mut self) {
        let idle = PointerState::default();
        while self.phase == Phase::Cutting {
            self.update(&idle, Duration::ZERO);
        }
        self.update(&idle, Duration::from_millis(SCRAMBLE_MS));
    }
}
