use clap::Parser;
use crate::prelude::*;

#[derive(Clone, Debug, Parser)]
pub struct SimOptions {
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// How many boards race each other.
    #[arg(short, long, default_value_t = 4)]
    pub players: usize,

    /// Total pieces per board; must be a perfect square.
    #[arg(long, default_value_t = 16)]
    pub pieces: usize,

    /// Cpu skill: easy, medium or hard.
    #[arg(short, long, default_value = "medium")]
    pub difficulty: String,

    /// Round format: race or timeattack.
    #[arg(short, long, default_value = "race")]
    pub game_type: String,

    /// Piece shape: traditional or plain.
    #[arg(long, default_value = "traditional")]
    pub cut: String,

    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Rounds to play before reporting.
    #[arg(short, long, default_value_t = 1)]
    pub rounds: u32,

    #[arg(long, default_value_t = 1920)]
    pub screen_width: i32,

    #[arg(long, default_value_t = 1080)]
    pub screen_height: i32,
}

impl SimOptions {
    pub fn session_config(&self) -> Result<SessionConfig> {
        let side = (self.pieces as f64).sqrt() as usize;
        if side * side != self.pieces || self.pieces == 0 {
            return Err(anyhow!("piece count {} is not a perfect square", self.pieces));
        }

        Ok(SessionConfig {
            players: self.players,
            human: false,
            board: BoardConfig {
                rows: side,
                cols: side,
                game_type: self.game_type.parse()?,
                difficulty: self.difficulty.parse()?,
                cut_style: self.cut.parse()?,
            },
        })
    }

    pub fn screen(&self) -> Rect {
        Rect::new(0, 0, self.screen_width, self.screen_height)
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(args: &[&str]) -> SimOptions {
        SimOptions::parse_from(std::iter::once("snaprace").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_form_a_valid_session() {
        let config = options(&[]).session_config().unwrap();
        assert_eq!(config.players, 4);
        assert_eq!(config.board.rows, 4);
        assert_eq!(config.board.cols, 4);
        assert!(!config.human);
    }

    #[test]
    fn rejects_a_lopsided_piece_count() {
        assert!(options(&["--pieces", "15"]).session_config().is_err());
        assert!(options(&["--pieces", "0"]).session_config().is_err());
    }

    #[test]
    fn parses_round_settings() {
        let opts = options(&["-d", "hard", "-g", "timeattack", "--cut", "plain"]);
        let config = opts.session_config().unwrap();
        assert_eq!(config.board.difficulty, Difficulty::Hard);
        assert_eq!(config.board.game_type, GameType::TimeAttack);
        assert_eq!(config.board.cut_style, CutStyle::Plain);
    }
}
