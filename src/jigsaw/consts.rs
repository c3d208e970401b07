use crate::utils::prelude::*;

/// Margin overhang beyond a piece's logical tile, as a fraction of the tile
/// size. The same ratio sizes the thin edge strips used for snap detection.
pub const EXTRA_RATIO: f64 = 0.25;

/// How long the synchronized scramble animation runs.
pub const SCRAMBLE_MS: u64 = 1000;

/// Countdown between a finished round and the next one.
pub const ROUND_RESET_MS: u64 = 6000;

/// Base per-piece placement delays for the cpu player.
pub const TIME_EASY_MS: u64 = 5500;
pub const TIME_MEDIUM_MS: u64 = 3500;
pub const TIME_HARD_MS: u64 = 2750;

/// Symmetric jitter applied to a cpu player's placement delay so that
/// concurrent cpu boards desynchronize.
pub const TIME_JITTER_MS: u64 = 250;

/// Piece counts offered by the menu; all perfect squares.
pub const PIECE_COUNT_CHOICES: [usize; 7] = [9, 16, 25, 36, 64, 100, 225];

/// Participant counts offered by the menu.
pub const PLAYER_COUNT_CHOICES: [usize; 6] = [1, 2, 4, 6, 9, 12];

// A cpu skill typing.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difficulty {
    Easy = 0,
    Medium = 1,
    Hard = 2,
}

impl Difficulty {
    /// Gets the difficulties in order.
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    /// The base delay a cpu player spends placing one piece.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(match self {
            Difficulty::Easy   => TIME_EASY_MS,
            Difficulty::Medium => TIME_MEDIUM_MS,
            Difficulty::Hard   => TIME_HARD_MS
        })
    }

    /// The slowest delay a cpu player can draw once jitter is applied.
    /// Scaled by the piece count, this is the time-attack deadline.
    pub fn worst_case_delay(&self) -> Duration {
        self.base_delay() + Duration::from_millis(TIME_JITTER_MS)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy"   => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard"   => Ok(Difficulty::Hard),
            _        => Err(anyhow!("invalid notation {s} for Difficulty"))
        }
    }
}

// A game mode typing.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum GameType {
    /// First board to assemble its copy wins; the clock counts up.
    Race = 0,
    /// Every board runs against a hard deadline; the clock counts down.
    TimeAttack = 1,
}

impl std::str::FromStr for GameType {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "race"                      => Ok(GameType::Race),
            "timeattack" | "time-attack" => Ok(GameType::TimeAttack),
            _                           => Err(anyhow!("invalid notation {s} for GameType"))
        }
    }
}

// A cut style typing.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CutStyle {
    /// Interlocking tab-and-blank edges.
    Traditional = 0,
    /// Straight edges; the margin is erased outright.
    Plain = 1,
}

impl std::str::FromStr for CutStyle {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "traditional" => Ok(CutStyle::Traditional),
            "plain"       => Ok(CutStyle::Plain),
            _             => Err(anyhow!("invalid notation {s} for CutStyle"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_delays_are_ordered() {
        assert!(Difficulty::Easy.base_delay() > Difficulty::Medium.base_delay());
        assert!(Difficulty::Medium.base_delay() > Difficulty::Hard.base_delay());
        for d in Difficulty::all() {
            assert_eq!(d.worst_case_delay() - d.base_delay(), Duration::from_millis(TIME_JITTER_MS));
        }
    }

    #[test]
    fn enums_parse_from_menu_notation() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("time-attack".parse::<GameType>().unwrap(), GameType::TimeAttack);
        assert_eq!("plain".parse::<CutStyle>().unwrap(), CutStyle::Plain);
        assert!("expert".parse::<Difficulty>().is_err());
    }
}
