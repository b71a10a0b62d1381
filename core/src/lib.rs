//! Rules of the Memorama pair-matching game, free of any UI toolkit.
//!
//! The toolkit side plugs in through a handful of seams: [`CardSurface`]
//! draws cells, [`Presenter`] shows counters and the win notice,
//! [`Navigator`] opens the results view and [`Scheduler`] owns time.

pub mod board;
pub mod config;
pub mod deck;
pub mod game;
pub mod preload;
pub mod presenter;
pub mod results;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod timer;

pub use board::{ActivateFn, Board, BoardError, Card, CardRef, CardState, CardSurface, SelectionHandler};
pub use config::{BoardSize, Config, ConfigError, Speed, Theme};
pub use deck::{build_deck, image_paths, pair_count};
pub use game::{Game, GameBuilder, GameError, GamePhase, Outcome, ResetOptions};
pub use presenter::{CompletionPayload, Navigator, NoNavigator, NoPresenter, Presenter};
pub use results::{ResultsParams, ResultsSink, ResultsSummary};
pub use preload::{DEFAULT_PRELOAD_TIMEOUT, ImageCache, PreloadOutcome, PreloadStatus, settle_preload};
pub use scheduler::{ManualScheduler, OnceTask, RepeatingTask, Scheduler, TaskId};
pub use session::{SessionParts, SetupError, start_session};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use timer::{Timer, format_seconds};
