/*
 *  Session orchestration: one board per participant, finishing ranks, and
 *  the countdown into the next round.
 */

use crate::jigsaw::prelude::*;
use crate::solver::Solver;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Participant setup for one session; chosen externally before play.
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Total participants, each with their own board.
    pub players: usize,
    /// Whether the first participant is a human; everyone else is a cpu.
    pub human: bool,
    pub board: BoardConfig,
}

/// Final report line for one participant.
#[derive(Clone, Debug)]
pub struct Standing {
    pub name: String,
    pub place: Option<u32>,
    pub timed_out: bool,
    pub elapsed: Duration,
}

/// Owns one board per participant, updates them in lockstep, assigns
/// finishing ranks in scan order, and regenerates a fresh round once the
/// post-round countdown expires.
pub struct Session {
    boards: Vec<Board>,
    solvers: Vec<Option<Solver>>,
    config: SessionConfig,
    image: ImageInfo,
    screen: Rect,
    next_place: u32,
    reset_timer: Option<Timer>,
    round: u32,
    rounds_completed: u32,
    rng: StdRng,
}

impl Session {
    pub fn new(image: ImageInfo, screen: Rect, config: SessionConfig, seed: u64) -> Result<Session> {
        if config.players == 0 {
            return Err(anyhow!("a session needs at least one participant"));
        }

        let mut session = Session {
            boards: vec![],
            solvers: vec![],
            config,
            image,
            screen,
            next_place: 1,
            reset_timer: None,
            round: 1,
            rounds_completed: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        session.spawn_boards()?;
        Ok(session)
    }

    /// Builds one board (and a solver for each cpu) per participant, each
    /// seeded independently from the session's source of randomness.
    fn spawn_boards(&mut self) -> Result<()> {
        let windows = self.windows();
        let mut boards = Vec::with_capacity(self.config.players);
        let mut solvers = Vec::with_capacity(self.config.players);

        for (i, window) in windows.into_iter().enumerate() {
            let is_human = self.config.human && i == 0;
            let name = if is_human {
                "human".to_string()
            } else {
                format!("cpu-{}", i + if self.config.human { 0 } else { 1 })
            };

            let mut board = Board::new(
                name,
                self.image,
                window,
                self.config.board,
                StdRng::from_seed(self.rng.r#gen()),
            )?;

            let solver = if is_human {
                None
            } else {
                board.set_auto_solve(true);
                Some(Solver::new(&mut board, StdRng::from_seed(self.rng.r#gen())))
            };

            boards.push(board);
            solvers.push(solver);
        }

        self.boards = boards;
        self.solvers = solvers;
        Ok(())
    }

    /// Screen rectangles for the participants: a lone player takes the
    /// whole screen; with a human present, the human plays the left half
    /// and the cpus share a grid on the right; an all-cpu field splits the
    /// whole screen into a grid.
    fn windows(&self) -> Vec<Rect> {
        if self.config.players == 1 {
            return vec![self.screen];
        }

        if self.config.human {
            let left = Rect::new(self.screen.x, self.screen.y, self.screen.width / 2, self.screen.height);
            let right = Rect::new(
                self.screen.x + self.screen.width / 2,
                self.screen.y,
                self.screen.width / 2,
                self.screen.height,
            );
            let mut windows = vec![left];
            windows.extend(split_windows(right, self.config.players - 1));
            windows
        } else {
            split_windows(self.screen, self.config.players)
        }
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn boards_mut(&mut self) -> &mut [Board] {
        &mut self.boards
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// How many rounds have fully finished (every board game-over).
    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    /// Whether the session is in the countdown between rounds.
    pub fn round_over(&self) -> bool {
        self.reset_timer.is_some()
    }

    /// Swaps the source image used from the next round onward; image
    /// selection itself stays with the caller.
    pub fn set_image(&mut self, image: ImageInfo) {
        self.image = image;
    }

    /// Advances every board by one tick, runs each cpu's solver, hands out
    /// finishing ranks to newly finished boards in scan order, and drives
    /// the between-rounds countdown.
    pub fn update(&mut self, pointer: &PointerState, dt: Duration) -> Result<()> {
        for (board, solver) in self.boards.iter_mut().zip(self.solvers.iter_mut()) {
            board.update(pointer, dt);
            if let Some(solver) = solver {
                solver.update(board);
            }
        }

        for board in &mut self.boards {
            if board.is_game_over() && board.place().is_none() {
                board.set_place(self.next_place);
                log::info!("{}: finished in place {}", board.name(), self.next_place);
                self.next_place += 1;
            }
        }

        if self.boards.iter().all(|board| board.is_game_over()) {
            match &mut self.reset_timer {
                None => {
                    self.reset_timer = Some(Timer::countdown(Duration::from_millis(ROUND_RESET_MS)));
                    self.rounds_completed += 1;
                    log::info!("round {} complete", self.round);
                }
                Some(timer) => {
                    timer.update(dt);
                    if timer.expired() {
                        self.next_round()?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Final report for the current round, in board order.
    pub fn standings(&self) -> Vec<Standing> {
        self.boards
            .iter()
            .map(|board| Standing {
                name: board.name().to_string(),
                place: board.place(),
                timed_out: board.timed_out(),
                elapsed: board.timers().get(TimerKey::Game).elapsed(),
            })
            .collect()
    }

    /// Discards every board wholesale and rebuilds the field with the same
    /// configuration (and whatever image is currently installed).
    fn next_round(&mut self) -> Result<()> {
        self.round += 1;
        self.next_place = 1;
        self.reset_timer = None;
        self.spawn_boards()?;
        log::info!("starting round {}", self.round);
        Ok(())
    }
}

/// Splits a rectangle into a near-square grid of `count` windows.
pub fn split_windows(screen: Rect, count: usize) -> Vec<Rect> {
    if count <= 1 {
        return vec![screen];
    }

    let rows = ((count as f64).sqrt().floor() as usize).max(1);
    let cols = count.div_ceil(rows);
    let w = screen.width / cols as i32;
    let h = screen.height / rows as i32;

    (0..count)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            Rect::new(screen.x + col as i32 * w, screen.y + row as i32 * h, w, h)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(players: usize, human: bool) -> SessionConfig {
        SessionConfig {
            players,
            human,
            board: BoardConfig {
                rows: 2,
                cols: 2,
                game_type: GameType::Race,
                difficulty: Difficulty::Hard,
                cut_style: CutStyle::Traditional,
            },
        }
    }

    fn session(players: usize, human: bool, seed: u64) -> Session {
        Session::new(
            ImageInfo { width: 300, height: 300 },
            Rect::new(0, 0, 1920, 1080),
            config(players, human),
            seed,
        )
        .unwrap()
    }

    #[test]
    fn rejects_an_empty_field() {
        assert!(
            Session::new(
                ImageInfo { width: 300, height: 300 },
                Rect::new(0, 0, 1920, 1080),
                config(0, false),
                1,
            )
            .is_err()
        );
    }

    #[test]
    fn split_windows_tiles_the_screen() {
        for count in PLAYER_COUNT_CHOICES {
            let windows = split_windows(Rect::new(0, 0, 1200, 900), count);
            assert_eq!(windows.len(), count);
        }
    }

    #[test]
    fn the_human_keeps_the_left_half() {
        let s = session(4, true, 2);
        assert_eq!(s.boards()[0].name(), "human");
        assert!(!s.boards()[0].auto_solve());
        assert_eq!(s.boards()[0].screen(), Rect::new(0, 0, 960, 1080));
        assert!(s.boards()[1..].iter().all(|b| b.auto_solve()));
    }

    #[test]
    fn cpu_race_assigns_sequential_ranks() {
        let mut s = session(3, false, 11);
        let idle = PointerState::default();
        let tick = Duration::from_millis(50);

        for _ in 0..20_000 {
            s.update(&idle, tick).unwrap();
            if s.rounds_completed() >= 1 {
                break;
            }
        }

        assert_eq!(s.rounds_completed(), 1);
        let mut places: Vec<u32> = s.standings().iter().map(|st| st.place.unwrap()).collect();
        places.sort_unstable();
        assert_eq!(places, vec![1, 2, 3]);
    }

    #[test]
    fn the_next_round_regenerates_fresh_boards() {
        let mut s = session(2, false, 13);
        let idle = PointerState::default();
        let tick = Duration::from_millis(50);

        for _ in 0..40_000 {
            s.update(&idle, tick).unwrap();
            if s.round() == 2 {
                break;
            }
        }

        assert_eq!(s.round(), 2);
        assert!(!s.round_over());
        for board in s.boards() {
            assert_eq!(board.phase(), Phase::Cutting);
            assert!(board.place().is_none());
            assert_eq!(board.pieces().len(), 4);
        }
    }
}
