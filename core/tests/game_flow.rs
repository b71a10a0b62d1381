mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::Harness;
use memorama_core::{
    Board, CardState, Game, GameError, GamePhase, ManualScheduler, Outcome, Presenter,
    ResetOptions, Speed,
};

const SMALL: [&str; 4] = ["a", "b", "a", "b"];

const FULL: [&str; 16] = [
    "a", "b", "c", "d", "e", "f", "g", "h", "a", "b", "c", "d", "e", "f", "g", "h",
];

#[test]
fn first_pick_reveals_and_starts_the_clock() {
    let h = Harness::new(&SMALL, Speed::Normal);
    assert!(!h.game.is_timer_running());

    h.click(0);
    assert_eq!(h.state(0), CardState::Revealed);
    assert!(h.game.is_timer_running());
    assert_eq!(h.game.moves(), 0);
    assert!(matches!(h.game.phase(), GamePhase::OneSelected { .. }));

    h.advance_ms(2000);
    assert_eq!(h.game.elapsed(), 2);
    assert_eq!(h.presenter.times.borrow().last().map(String::as_str), Some("00:02"));
}

#[test]
fn start_shows_zero_counters() {
    let h = Harness::new(&SMALL, Speed::Normal);
    assert_eq!(*h.presenter.moves.borrow(), vec![0]);
    assert_eq!(*h.presenter.misses.borrow(), vec![0]);
    assert_eq!(*h.presenter.matches.borrow(), vec![0]);
}

#[test]
fn picking_the_same_card_twice_is_ignored() {
    let h = Harness::new(&SMALL, Speed::Normal);
    h.click(1);
    h.click(1);
    assert_eq!(h.game.moves(), 0);
    assert_eq!(h.state(1), CardState::Revealed);
    assert!(!h.game.is_input_locked());
}

#[test]
fn a_miss_locks_input_until_the_cards_turn_back() {
    let h = Harness::new(&SMALL, Speed::Normal);
    h.click(0);
    h.click(1);
    assert_eq!(h.game.moves(), 1);
    assert_eq!(*h.presenter.moves.borrow(), vec![0, 1]);
    assert!(h.game.is_input_locked());
    assert!(matches!(
        h.game.phase(),
        GamePhase::Resolving {
            outcome: Outcome::Miss,
            ..
        }
    ));

    h.click(2);
    assert_eq!(h.state(2), CardState::Hidden);
    assert_eq!(h.game.moves(), 1);

    h.advance_ms(599);
    assert!(h.game.is_input_locked());
    assert_eq!(h.state(0), CardState::Revealed);

    h.advance_ms(1);
    assert!(!h.game.is_input_locked());
    assert_eq!(h.state(0), CardState::Hidden);
    assert_eq!(h.state(1), CardState::Hidden);
    assert_eq!(h.game.misses(), 1);
    assert_eq!(*h.presenter.misses.borrow(), vec![0, 1]);
}

#[test]
fn a_match_stays_face_up_and_cannot_be_picked_again() {
    let h = Harness::new(&FULL, Speed::Normal);
    h.click(0);
    h.click(8);
    assert!(matches!(
        h.game.phase(),
        GamePhase::Resolving {
            outcome: Outcome::Match,
            ..
        }
    ));

    h.advance_ms(175);
    assert_eq!(h.state(0), CardState::Matched);
    assert_eq!(h.state(8), CardState::Matched);
    assert_eq!(h.game.matches(), 1);
    assert_eq!(h.game.phase(), GamePhase::Idle);

    h.click(0);
    assert_eq!(h.game.phase(), GamePhase::Idle);
    assert_eq!(h.game.moves(), 1);
}

#[test]
fn fast_speed_shortens_both_delays() {
    let h = Harness::new(&FULL, Speed::Fast);
    h.click(0);
    h.click(8);
    h.advance_ms(99);
    assert!(h.game.is_input_locked());
    h.advance_ms(1);
    assert_eq!(h.game.matches(), 1);

    h.click(1);
    h.click(2);
    h.advance_ms(449);
    assert!(h.game.is_input_locked());
    h.advance_ms(1);
    assert_eq!(h.game.misses(), 1);
}

#[test]
fn slow_speed_waits_longer_on_a_match() {
    let h = Harness::new(&FULL, Speed::Slow);
    h.click(3);
    h.click(11);
    h.advance_ms(449);
    assert_eq!(h.game.matches(), 0);
    h.advance_ms(1);
    assert_eq!(h.game.matches(), 1);
}

#[test]
fn clearing_the_board_reports_exactly_once() {
    let h = Harness::new(&SMALL, Speed::Normal);
    h.click(0);
    h.click(1);
    h.advance_ms(600);

    h.click(0);
    h.click(2);
    h.advance_ms(175);
    h.click(1);
    h.click(3);
    h.advance_ms(175);

    assert!(h.game.is_won());
    assert!(!h.game.is_timer_running());
    let wins = h.presenter.wins.borrow();
    assert_eq!(wins.len(), 1);
    let win = &wins[0];
    assert_eq!(win.moves, 3);
    assert_eq!(win.misses, 1);
    assert_eq!(win.board_size, 2);
    assert_eq!(win.seconds, 0);
    assert_eq!(win.formatted_time, "00:00");
    assert_eq!(win.theme, "animals");
    assert_eq!(win.speed, "normal");
    drop(wins);

    h.advance_ms(5000);
    assert_eq!(h.game.elapsed(), 0);
    assert_eq!(h.presenter.wins.borrow().len(), 1);
}

#[test]
fn selections_after_the_win_are_ignored() {
    let h = Harness::new(&SMALL, Speed::Normal);
    for (a, b) in [(0, 2), (1, 3)] {
        h.click(a);
        h.click(b);
        h.advance_ms(175);
    }
    assert!(h.game.is_won());
    h.click(0);
    assert!(h.game.is_won());
    assert_eq!(h.game.moves(), 2);
}

#[test]
fn without_a_presenter_the_win_opens_results() {
    let h = Harness::without_presenter(&SMALL, Speed::Fast);
    h.click(0);
    h.advance_ms(3000);
    h.click(2);
    h.advance_ms(100);
    h.click(1);
    h.click(3);
    h.advance_ms(100);

    assert_eq!(
        *h.navigator.opened.borrow(),
        vec!["size=2&theme=animals&speed=fast&moves=2&misses=0&time=3"]
    );
}

#[test]
fn reset_clears_counters_and_turns_every_card_down() {
    let h = Harness::new(&FULL, Speed::Normal);
    h.click(0);
    h.click(8);
    h.advance_ms(1175);
    h.click(1);
    h.click(2);
    h.advance_ms(600);
    assert_eq!(h.game.matches(), 1);
    assert_eq!(h.game.misses(), 1);

    h.game.reset(ResetOptions::default());

    assert_eq!(h.game.moves(), 0);
    assert_eq!(h.game.misses(), 0);
    assert_eq!(h.game.matches(), 0);
    assert_eq!(h.game.elapsed(), 0);
    assert_eq!(h.game.total_pairs(), 8);
    assert!(!h.game.is_timer_running());
    assert_eq!(h.game.phase(), GamePhase::Idle);
    assert_eq!(h.surface.borrow().clears, 2);
    assert!(
        h.surface
            .borrow()
            .states
            .iter()
            .all(|state| *state == CardState::Hidden)
    );
    assert_eq!(h.presenter.moves.borrow().last(), Some(&0));
    assert_eq!(h.presenter.misses.borrow().last(), Some(&0));
    assert_eq!(h.presenter.matches.borrow().last(), Some(&0));
    assert_eq!(h.presenter.times.borrow().last().map(String::as_str), Some("00:00"));

    let mut images = h.surface.borrow().images.clone();
    images.sort();
    let mut expected: Vec<String> = FULL.iter().map(|id| id.to_string()).collect();
    expected.sort();
    assert_eq!(images, expected);
}

#[test]
fn the_reshuffled_board_is_playable() {
    let h = Harness::new(&SMALL, Speed::Normal);
    h.click(0);
    h.game.reset(ResetOptions::default());

    let a = h.positions_of("a");
    h.click(a[0]);
    h.click(a[1]);
    assert_eq!(h.game.moves(), 1);
    h.advance_ms(175);
    assert_eq!(h.game.matches(), 1);
    assert!(h.game.is_timer_running());
}

#[test]
fn reset_without_reshuffle_keeps_the_layout() {
    let h = Harness::new(&FULL, Speed::Normal);
    h.click(0);
    h.game.reset(ResetOptions { reshuffle: false });
    assert_eq!(h.surface.borrow().clears, 2);
    assert_eq!(h.state(0), CardState::Hidden);
    assert_eq!(h.surface.borrow().images, FULL.map(String::from).to_vec());
    assert_eq!(h.game.moves(), 0);
    assert_eq!(h.game.phase(), GamePhase::Idle);
}

#[test]
fn a_resolution_pending_at_reset_is_dropped() {
    let h = Harness::new(&FULL, Speed::Normal);
    h.click(0);
    h.click(8);
    assert!(h.game.is_input_locked());

    h.game.reset(ResetOptions { reshuffle: false });
    assert!(!h.game.is_input_locked());
    h.advance_ms(1000);
    assert_eq!(h.game.matches(), 0);
    assert_eq!(h.scheduler.pending(), 0);

    h.click(3);
    h.click(11);
    h.advance_ms(175);
    assert_eq!(h.game.matches(), 1);
    assert_eq!(h.game.moves(), 1);
}

#[test]
fn notices_reach_the_presenter() {
    let h = Harness::new(&SMALL, Speed::Normal);
    h.game.notify("Shuffled!");
    assert_eq!(*h.presenter.messages.borrow(), vec!["Shuffled!"]);
}

#[test]
fn a_game_needs_a_board() {
    let scheduler = Rc::new(ManualScheduler::new());
    let err = Game::builder(scheduler).build().err();
    assert_eq!(err, Some(GameError::MissingBoard));
}

#[test]
fn dropping_the_game_stops_the_clock() {
    let (surface, _log) = common::recording_surface();
    let mut board = Board::new(
        Box::new(surface),
        2,
        SMALL.iter().map(|id| id.to_string()).collect(),
    )
    .unwrap();
    board.render().unwrap();
    let scheduler = Rc::new(ManualScheduler::new());
    let game = Game::builder(scheduler.clone()).board(board).build().unwrap();
    game.start();
    let first = game.card_ref(0).unwrap();
    game.select(first);
    assert_eq!(scheduler.pending(), 1);

    drop(game);
    assert_eq!(scheduler.pending(), 0);
}

/// Reads the game back from inside every presenter callback.
#[derive(Default)]
struct ReadingPresenter {
    game: RefCell<Option<Game>>,
    seen: RefCell<Vec<(u32, u32, bool)>>,
}

impl ReadingPresenter {
    fn read_back(&self) {
        if let Some(game) = self.game.borrow().as_ref() {
            self.seen
                .borrow_mut()
                .push((game.moves(), game.elapsed(), game.is_timer_running()));
        }
    }
}

impl Presenter for ReadingPresenter {
    fn update_moves(&self, _moves: u32) {
        self.read_back();
    }

    fn update_time(&self, _text: &str) {
        self.read_back();
    }
}

#[test]
fn presenter_callbacks_may_read_the_game() {
    let (surface, log) = common::recording_surface();
    let mut board = Board::new(
        Box::new(surface),
        2,
        SMALL.iter().map(|id| id.to_string()).collect(),
    )
    .unwrap();
    board.render().unwrap();
    let scheduler = Rc::new(ManualScheduler::new());
    let presenter = Rc::new(ReadingPresenter::default());
    let game = Game::builder(scheduler.clone())
        .board(board)
        .presenter(presenter.clone())
        .build()
        .unwrap();
    *presenter.game.borrow_mut() = Some(game.clone());
    game.start();

    let activate = log.borrow().activators[0].clone();
    activate();
    scheduler.advance_ms(2000);
    game.reset(ResetOptions::default());

    let seen = presenter.seen.borrow().clone();
    assert_eq!(seen.last(), Some(&(0, 0, false)));
    assert!(seen.contains(&(0, 2, true)));
    presenter.game.borrow_mut().take();
}
