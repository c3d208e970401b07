mod options;

use itertools::Itertools;
pub use options::SimOptions;

use crate::prelude::*;

/// Fixed timestep for the headless loop, matching a 20 Hz update rate.
const TICK_MS: u64 = 50;

/// Gives up on a round after this many ticks in case a board stalls.
const MAX_TICKS_PER_ROUND: u64 = 1_000_000;

/// Headless runner: drives an all-cpu session at a fixed timestep and
/// reports the standings after each round.
pub struct Sim {
    session: Session,
    config: SimOptions,
}

impl Sim {
    /// Produces a new simulation from the parsed command line.
    pub fn new(options: SimOptions) -> Result<Sim> {
        let config = options.session_config()?;
        let screen = options.screen();
        let seed = options.seed();

        log::info!(
            "simulating {} boards of {} pieces each (seed {seed})",
            config.players,
            config.board.rows * config.board.cols
        );

        let image = ImageInfo { width: screen.width, height: screen.height };
        let session = Session::new(image, screen, config, seed)?;

        Ok(Sim { session, config: options })
    }

    /// Plays the requested number of rounds to completion.
    pub fn run(&mut self) -> Result<()> {
        let idle = PointerState::default();
        let tick = Duration::from_millis(TICK_MS);

        for round in 1..=self.config.rounds {
            let mut ticks = 0u64;

            while self.session.rounds_completed() < round {
                self.session.update(&idle, tick)?;
                ticks += 1;
                if ticks > MAX_TICKS_PER_ROUND {
                    return Err(anyhow!("round {round} failed to finish"));
                }
            }

            self.report(round);

            // Burn through the between-rounds countdown so the next round's
            // boards exist before the loop resumes.
            while self.session.round_over() {
                self.session.update(&idle, tick)?;
            }
        }

        Ok(())
    }

    /// Prints the standings for a finished round, winner first.
    fn report(&self, round: u32) {
        println!("round {round}");

        let lines = self
            .session
            .standings()
            .iter()
            .sorted_by_key(|s| s.place.unwrap_or(u32::MAX))
            .map(|s| {
                let place = s.place.map_or_else(|| "-".to_string(), |p| p.to_string());
                let flag = if s.timed_out { " (timed out)" } else { "" };
                format!("  {place}. {} in {:.1}s{flag}", s.name, s.elapsed.as_secs_f64())
            })
            .join("\n");

        println!("{lines}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn a_small_race_runs_to_completion() {
        let options = SimOptions::parse_from([
            "snaprace", "-p", "2", "--pieces", "4", "-d", "hard", "-s", "7",
        ]);
        let mut sim = Sim::new(options).unwrap();
        sim.run().unwrap();
        assert_eq!(sim.session.rounds_completed(), 1);
    }
}
