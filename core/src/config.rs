use std::time::Duration;

use crate::storage::{Storage, StorageError};

pub const SIZE_KEY: &str = "size";
pub const THEME_KEY: &str = "theme";
pub const SPEED_KEY: &str = "speed";

const MISS_DELAY_OFFSET_MS: u64 = 250;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("a {0}x{0} board has an odd number of cells")]
    OddGeometry(usize),
    #[error("a board needs at least one pair, got side {0}")]
    EmptyBoard(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoardSize {
    #[default]
    Four,
    Six,
    Eight,
}

impl BoardSize {
    pub const ALL: [BoardSize; 3] = [BoardSize::Four, BoardSize::Six, BoardSize::Eight];

    pub fn side(self) -> usize {
        match self {
            BoardSize::Four => 4,
            BoardSize::Six => 6,
            BoardSize::Eight => 8,
        }
    }

    pub fn cells(self) -> usize {
        self.side() * self.side()
    }

    pub fn pairs(self) -> usize {
        self.cells() / 2
    }

    pub fn from_side(side: usize) -> Option<Self> {
        match side {
            4 => Some(BoardSize::Four),
            6 => Some(BoardSize::Six),
            8 => Some(BoardSize::Eight),
            _ => None,
        }
    }

    /// Reads a stored `size` value; anything but 4, 6 or 8 falls back to 4.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<usize>().ok())
            .and_then(Self::from_side)
            .unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Animals,
    Fruits,
    Symbols,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Animals => "animals",
            Theme::Fruits => "fruits",
            Theme::Symbols => "symbols",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "animals" => Some(Theme::Animals),
            "fruits" => Some(Theme::Fruits),
            "symbols" => Some(Theme::Symbols),
            _ => None,
        }
    }

    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(Self::from_code).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Speed {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl Speed {
    pub fn as_str(self) -> &'static str {
        match self {
            Speed::Fast => "fast",
            Speed::Normal => "normal",
            Speed::Slow => "slow",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fast" => Some(Speed::Fast),
            "normal" => Some(Speed::Normal),
            "slow" => Some(Speed::Slow),
            _ => None,
        }
    }

    /// Unrecognised speeds play at normal pace.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(Self::from_code).unwrap_or_default()
    }

    pub fn base_delay(self) -> Duration {
        Duration::from_millis(match self {
            Speed::Fast => 200,
            Speed::Normal => 350,
            Speed::Slow => 900,
        })
    }

    pub fn match_delay(self) -> Duration {
        self.base_delay() / 2
    }

    pub fn miss_delay(self) -> Duration {
        self.base_delay() + Duration::from_millis(MISS_DELAY_OFFSET_MS)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Config {
    pub board_size: BoardSize,
    pub theme: Theme,
    pub speed: Speed,
}

impl Config {
    pub fn load(storage: &dyn Storage) -> Self {
        let size_raw = storage.get(SIZE_KEY);
        let theme_raw = storage.get(THEME_KEY);
        let speed_raw = storage.get(SPEED_KEY);

        let config = Config {
            board_size: BoardSize::parse_or_default(size_raw.as_deref()),
            theme: Theme::parse_or_default(theme_raw.as_deref()),
            speed: Speed::parse_or_default(speed_raw.as_deref()),
        };
        tracing::info!(
            size = config.board_size.side(),
            theme = config.theme.as_str(),
            speed = config.speed.as_str(),
            "configuration loaded"
        );
        config
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        storage.set(SIZE_KEY, &self.board_size.side().to_string())?;
        storage.set(THEME_KEY, self.theme.as_str())?;
        storage.set(SPEED_KEY, self.speed.as_str())?;
        Ok(())
    }
}
