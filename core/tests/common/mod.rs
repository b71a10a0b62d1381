//! Recording doubles for driving a game without a toolkit.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use memorama_core::{
    ActivateFn, Board, CardState, CardSurface, CompletionPayload, Config, Game, ManualScheduler,
    Navigator, Presenter, Speed,
};

#[derive(Default)]
pub struct SurfaceLog {
    pub clears: usize,
    pub sizes: Vec<usize>,
    pub images: Vec<String>,
    pub states: Vec<CardState>,
    pub activators: Vec<ActivateFn>,
}

pub struct RecordingSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
    pub available: bool,
}

impl CardSurface for RecordingSurface {
    fn is_available(&self) -> bool {
        self.available
    }

    fn clear(&self, size: usize) {
        let mut log = self.log.borrow_mut();
        log.clears += 1;
        log.sizes.push(size);
        log.images.clear();
        log.states.clear();
        log.activators.clear();
    }

    fn add_cell(&self, _index: usize, image: &str, on_activate: ActivateFn) {
        let mut log = self.log.borrow_mut();
        log.images.push(image.to_string());
        log.states.push(CardState::Hidden);
        log.activators.push(on_activate);
    }

    fn set_state(&self, index: usize, state: CardState) {
        self.log.borrow_mut().states[index] = state;
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub moves: RefCell<Vec<u32>>,
    pub misses: RefCell<Vec<u32>>,
    pub matches: RefCell<Vec<u32>>,
    pub times: RefCell<Vec<String>>,
    pub messages: RefCell<Vec<String>>,
    pub wins: RefCell<Vec<CompletionPayload>>,
}

impl Presenter for RecordingPresenter {
    fn update_moves(&self, moves: u32) {
        self.moves.borrow_mut().push(moves);
    }

    fn update_misses(&self, misses: u32) {
        self.misses.borrow_mut().push(misses);
    }

    fn update_matches(&self, matches: u32) {
        self.matches.borrow_mut().push(matches);
    }

    fn update_time(&self, text: &str) {
        self.times.borrow_mut().push(text.to_string());
    }

    fn show_message(&self, text: &str) {
        self.messages.borrow_mut().push(text.to_string());
    }

    fn show_win_message(&self, payload: &CompletionPayload, _navigator: &dyn Navigator) {
        self.wins.borrow_mut().push(payload.clone());
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub opened: RefCell<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn open_results(&self, query: &str) {
        self.opened.borrow_mut().push(query.to_string());
    }
}

pub fn recording_surface() -> (RecordingSurface, Rc<RefCell<SurfaceLog>>) {
    let log = Rc::new(RefCell::new(SurfaceLog::default()));
    (
        RecordingSurface {
            log: log.clone(),
            available: true,
        },
        log,
    )
}

pub struct Harness {
    pub game: Game,
    pub scheduler: Rc<ManualScheduler>,
    pub surface: Rc<RefCell<SurfaceLog>>,
    pub presenter: Rc<RecordingPresenter>,
    pub navigator: Rc<RecordingNavigator>,
}

impl Harness {
    /// A started game over `deck` laid out on a square board.
    pub fn new(deck: &[&str], speed: Speed) -> Self {
        Self::build(deck, speed, true)
    }

    /// Same as [`Harness::new`] but the game falls back to its built-in
    /// presenter.
    pub fn without_presenter(deck: &[&str], speed: Speed) -> Self {
        Self::build(deck, speed, false)
    }

    fn build(deck: &[&str], speed: Speed, with_presenter: bool) -> Self {
        let size = (deck.len() as f64).sqrt() as usize;
        let (surface, log) = recording_surface();
        let mut board = Board::new(
            Box::new(surface),
            size,
            deck.iter().map(|id| id.to_string()).collect(),
        )
        .expect("valid board");
        board.render().expect("surface available");

        let scheduler = Rc::new(ManualScheduler::new());
        let presenter = Rc::new(RecordingPresenter::default());
        let navigator = Rc::new(RecordingNavigator::default());
        let config = Config {
            speed,
            ..Config::default()
        };

        let mut builder = Game::builder(scheduler.clone())
            .board(board)
            .navigator(navigator.clone())
            .config(config);
        if with_presenter {
            builder = builder.presenter(presenter.clone());
        }
        let game = builder.build().expect("board supplied");
        game.start();

        Harness {
            game,
            scheduler,
            surface: log,
            presenter,
            navigator,
        }
    }

    pub fn click(&self, index: usize) {
        let activate = self.surface.borrow().activators[index].clone();
        activate();
    }

    pub fn state(&self, index: usize) -> CardState {
        self.surface.borrow().states[index]
    }

    pub fn advance_ms(&self, ms: u64) {
        self.scheduler.advance_ms(ms);
    }

    /// Indices of the cards currently showing `image`.
    pub fn positions_of(&self, image: &str) -> Vec<usize> {
        self.surface
            .borrow()
            .images
            .iter()
            .enumerate()
            .filter(|(_, id)| id.as_str() == image)
            .map(|(idx, _)| idx)
            .collect()
    }
}
