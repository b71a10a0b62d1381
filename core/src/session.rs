use std::rc::Rc;

use rand::Rng;

use crate::board::{Board, BoardError, CardSurface};
use crate::config::{Config, ConfigError};
use crate::deck;
use crate::game::{Game, GameError};
use crate::presenter::{Navigator, Presenter};
use crate::scheduler::Scheduler;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("board setup failed: {0}")]
    Board(#[from] BoardError),
    #[error("game setup failed: {0}")]
    Game(#[from] GameError),
}

/// Collaborators a session is wired with.
pub struct SessionParts {
    pub surface: Box<dyn CardSurface>,
    pub presenter: Rc<dyn Presenter>,
    pub navigator: Rc<dyn Navigator>,
    pub scheduler: Rc<dyn Scheduler>,
}

/// Builds a shuffled deck for `config`, renders it and starts the game.
/// Nothing is kept when any step fails.
pub fn start_session<R: Rng + ?Sized>(
    config: &Config,
    parts: SessionParts,
    rng: &mut R,
) -> Result<Game, SetupError> {
    let side = config.board_size.side();
    let pairs = deck::pair_count(side)?;
    let images = deck::image_paths(config.theme, pairs);
    let cards = deck::build_deck(&images, rng);

    let mut board = Board::new(parts.surface, side, cards)?;
    board.render()?;

    let game = Game::builder(parts.scheduler)
        .board(board)
        .presenter(parts.presenter)
        .navigator(parts.navigator)
        .config(*config)
        .build()?;
    game.start();
    tracing::info!(
        size = side,
        pairs,
        theme = config.theme.as_str(),
        speed = config.speed.as_str(),
        "session started"
    );
    Ok(game)
}
