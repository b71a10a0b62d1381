//! Selection state machine: picks, resolution delays, scoring counters,
//! win detection and reset.

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use crate::board::{Board, CardRef, CardState, SelectionHandler};
use crate::config::{Config, Speed, Theme};
use crate::presenter::{CompletionPayload, Navigator, NoNavigator, NoPresenter, Presenter};
use crate::scheduler::{Scheduler, TaskId};
use crate::timer::{Timer, format_seconds};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("a game cannot be created without a board")]
    MissingBoard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Match,
    Miss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    OneSelected { first: CardRef },
    /// Input is locked until the resolution delay elapses.
    Resolving {
        first: CardRef,
        second: CardRef,
        outcome: Outcome,
    },
    Won,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetOptions {
    pub reshuffle: bool,
}

impl Default for ResetOptions {
    fn default() -> Self {
        ResetOptions { reshuffle: true }
    }
}

struct Session {
    board: Board,
    presenter: Rc<dyn Presenter>,
    navigator: Rc<dyn Navigator>,
    scheduler: Rc<dyn Scheduler>,
    timer: Timer,
    phase: GamePhase,
    moves: u32,
    misses: u32,
    matches: u32,
    total_pairs: u32,
    size: usize,
    theme: Theme,
    speed: Speed,
    epoch: u64,
    pending: Option<TaskId>,
}

impl Session {
    fn payload(&self) -> CompletionPayload {
        let seconds = self.timer.elapsed();
        CompletionPayload {
            formatted_time: format_seconds(seconds),
            seconds,
            moves: self.moves,
            misses: self.misses,
            board_size: self.size,
            theme: self.theme.as_str().to_string(),
            speed: self.speed.as_str().to_string(),
        }
    }
}

pub struct GameBuilder {
    scheduler: Rc<dyn Scheduler>,
    board: Option<Board>,
    presenter: Option<Rc<dyn Presenter>>,
    navigator: Option<Rc<dyn Navigator>>,
    config: Config,
}

impl GameBuilder {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        GameBuilder {
            scheduler,
            board: None,
            presenter: None,
            navigator: None,
            config: Config::default(),
        }
    }

    pub fn board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    pub fn presenter(mut self, presenter: Rc<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn navigator(mut self, navigator: Rc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        let board = self.board.ok_or(GameError::MissingBoard)?;
        let presenter = self.presenter.unwrap_or_else(|| {
            tracing::debug!("no presenter supplied, counters will not be shown");
            Rc::new(NoPresenter)
        });
        let navigator = self.navigator.unwrap_or_else(|| Rc::new(NoNavigator));

        let tick_presenter = presenter.clone();
        let timer = Timer::new(self.scheduler.clone(), move |secs| {
            tick_presenter.update_time(&format_seconds(secs));
        });

        let size = board.size();
        let total_pairs = (size * size / 2) as u32;
        let session = Session {
            board,
            presenter,
            navigator,
            scheduler: self.scheduler,
            timer,
            phase: GamePhase::Idle,
            moves: 0,
            misses: 0,
            matches: 0,
            total_pairs,
            size,
            theme: self.config.theme,
            speed: self.config.speed,
            epoch: 0,
            pending: None,
        };
        Ok(Game {
            inner: Rc::new(RefCell::new(session)),
        })
    }
}

/// Shared handle to one game session.
#[derive(Clone)]
pub struct Game {
    inner: Rc<RefCell<Session>>,
}

impl Game {
    pub fn builder(scheduler: Rc<dyn Scheduler>) -> GameBuilder {
        GameBuilder::new(scheduler)
    }

    fn from_weak(weak: &Weak<RefCell<Session>>) -> Option<Self> {
        weak.upgrade().map(|inner| Game { inner })
    }

    fn selection_handler(&self) -> SelectionHandler {
        let weak = Rc::downgrade(&self.inner);
        Rc::new(move |card: CardRef| {
            if let Some(game) = Game::from_weak(&weak) {
                game.select(card);
            }
        })
    }

    /// Wires the board's clicks to this game and shows the starting counters.
    pub fn start(&self) {
        let handler = self.selection_handler();
        let (presenter, moves, misses, matches) = {
            let mut s = self.inner.borrow_mut();
            s.board.attach_selection_handler(handler);
            (s.presenter.clone(), s.moves, s.misses, s.matches)
        };
        presenter.update_moves(moves);
        presenter.update_misses(misses);
        presenter.update_matches(matches);
        tracing::info!("game started");
    }

    pub fn select(&self, card: CardRef) {
        let mut s = self.inner.borrow_mut();

        if matches!(s.phase, GamePhase::Resolving { .. } | GamePhase::Won) {
            tracing::trace!(index = card.index(), "selection ignored while locked");
            return;
        }
        if s.board.state_of(card) != Some(CardState::Hidden) {
            return;
        }

        let phase = s.phase;
        match phase {
            GamePhase::Idle => {
                if s.moves == 0 && s.matches == 0 && !s.timer.is_running() {
                    s.timer.start();
                }
                s.board.reveal(card);
                s.phase = GamePhase::OneSelected { first: card };
                tracing::debug!(index = card.index(), "first card selected");
            }
            GamePhase::OneSelected { first } => {
                if first == card {
                    return;
                }
                s.board.reveal(card);
                s.moves += 1;

                let outcome = match (s.board.image_of(first), s.board.image_of(card)) {
                    (Some(a), Some(b)) if a == b => Outcome::Match,
                    _ => Outcome::Miss,
                };
                s.phase = GamePhase::Resolving {
                    first,
                    second: card,
                    outcome,
                };
                let delay = match outcome {
                    Outcome::Match => s.speed.match_delay(),
                    Outcome::Miss => s.speed.miss_delay(),
                };
                tracing::debug!(
                    first = first.index(),
                    second = card.index(),
                    ?outcome,
                    delay_ms = delay.as_millis() as u64,
                    "second card selected"
                );

                let epoch = s.epoch;
                let weak = Rc::downgrade(&self.inner);
                let task = s.scheduler.schedule_once(
                    delay,
                    Box::new(move || {
                        if let Some(game) = Game::from_weak(&weak) {
                            game.resolve(epoch);
                        }
                    }),
                );
                s.pending = Some(task);

                let (presenter, moves) = (s.presenter.clone(), s.moves);
                drop(s);
                presenter.update_moves(moves);
            }
            GamePhase::Resolving { .. } | GamePhase::Won => {}
        }
    }

    fn resolve(&self, epoch: u64) {
        let mut s = self.inner.borrow_mut();
        if s.epoch != epoch {
            return;
        }
        s.pending = None;
        let phase = s.phase;
        let GamePhase::Resolving {
            first,
            second,
            outcome,
        } = phase
        else {
            return;
        };

        match outcome {
            Outcome::Match => {
                s.board.mark_matched(first);
                s.board.mark_matched(second);
                s.matches += 1;
                let (presenter, matches) = (s.presenter.clone(), s.matches);
                tracing::debug!(matches, total = s.total_pairs, "pair matched");

                if s.matches == s.total_pairs {
                    s.phase = GamePhase::Won;
                    s.timer.stop();
                    let payload = s.payload();
                    let navigator = s.navigator.clone();
                    drop(s);
                    tracing::info!(
                        time = %payload.formatted_time,
                        moves = payload.moves,
                        misses = payload.misses,
                        "board cleared"
                    );
                    presenter.update_matches(matches);
                    presenter.show_win_message(&payload, navigator.as_ref());
                } else {
                    s.phase = GamePhase::Idle;
                    drop(s);
                    presenter.update_matches(matches);
                }
            }
            Outcome::Miss => {
                s.board.conceal(first);
                s.board.conceal(second);
                s.misses += 1;
                s.phase = GamePhase::Idle;
                let (presenter, misses) = (s.presenter.clone(), s.misses);
                drop(s);
                tracing::debug!(misses, "pair missed");
                presenter.update_misses(misses);
            }
        }
    }

    pub fn reset(&self, options: ResetOptions) {
        let handler = self.selection_handler();
        let presenter = {
            let mut s = self.inner.borrow_mut();
            // The presenter learns about the zeroed clock after the borrow ends.
            s.timer.rewind();
            if let Some(task) = s.pending.take() {
                s.scheduler.cancel(task);
            }
            s.epoch = s.epoch.wrapping_add(1);
            s.phase = GamePhase::Idle;
            s.moves = 0;
            s.misses = 0;
            s.matches = 0;
            s.total_pairs = (s.size * s.size / 2) as u32;

            let rebuilt = if options.reshuffle {
                s.board.reset()
            } else {
                s.board.render()
            };
            if let Err(err) = rebuilt {
                tracing::error!(error = %err, "board could not be rebuilt");
            }
            s.board.attach_selection_handler(handler);
            s.presenter.clone()
        };

        presenter.update_moves(0);
        presenter.update_misses(0);
        presenter.update_matches(0);
        presenter.update_time(&format_seconds(0));
        tracing::info!(reshuffle = options.reshuffle, "game reset");
    }

    /// Shows a transient notice through the presenter.
    pub fn notify(&self, text: &str) {
        let presenter = self.inner.borrow().presenter.clone();
        presenter.show_message(text);
    }

    pub fn phase(&self) -> GamePhase {
        self.inner.borrow().phase
    }

    pub fn is_input_locked(&self) -> bool {
        matches!(self.phase(), GamePhase::Resolving { .. })
    }

    pub fn is_won(&self) -> bool {
        self.phase() == GamePhase::Won
    }

    pub fn moves(&self) -> u32 {
        self.inner.borrow().moves
    }

    pub fn misses(&self) -> u32 {
        self.inner.borrow().misses
    }

    pub fn matches(&self) -> u32 {
        self.inner.borrow().matches
    }

    pub fn total_pairs(&self) -> u32 {
        self.inner.borrow().total_pairs
    }

    pub fn elapsed(&self) -> u32 {
        self.inner.borrow().timer.elapsed()
    }

    pub fn is_timer_running(&self) -> bool {
        self.inner.borrow().timer.is_running()
    }

    pub fn card_ref(&self, index: usize) -> Option<CardRef> {
        self.inner.borrow().board.card_ref(index)
    }

    pub fn board(&self) -> Ref<'_, Board> {
        Ref::map(self.inner.borrow(), |s| &s.board)
    }
}
