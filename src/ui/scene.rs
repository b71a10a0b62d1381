use std::cell::RefCell;
use std::rc::Rc;

use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use memorama_core::{Navigator, ResetOptions, ResultsParams, ResultsSink};

use super::state::AppState;

/// Reshuffles the current board and zeroes every counter.
pub(super) fn restart_game(state: &Rc<RefCell<AppState>>) {
    let game = state.borrow().game.clone();
    match game {
        Some(game) => {
            game.reset(ResetOptions::default());
            game.notify(&gettext("Cards shuffled"));
        }
        None => tracing::debug!("restart requested before a game was started"),
    }
}

pub(super) fn show_game(state: &Rc<RefCell<AppState>>) {
    restart_game(state);
    let st = state.borrow();
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(gtk::StackTransitionType::SlideRight);
        stack.set_visible_child_name("game");
    }
}

/// Labels of the results page.
pub struct ResultsView {
    time: gtk::Label,
    score: gtk::Label,
    moves: gtk::Label,
    misses: gtk::Label,
    accuracy: gtk::Label,
}

impl ResultsSink for ResultsView {
    fn set_time(&self, text: &str) {
        self.time.set_text(text);
    }

    fn set_score(&self, score: u32) {
        self.score.set_text(&score.to_string());
    }

    fn set_moves(&self, moves: u32) {
        self.moves.set_text(&moves.to_string());
    }

    fn set_misses(&self, misses: u32) {
        self.misses.set_text(&misses.to_string());
    }

    fn set_accuracy(&self, text: &str) {
        self.accuracy.set_text(text);
    }
}

pub(super) fn build_results_view(state: &Rc<RefCell<AppState>>) -> (gtk::Box, Rc<ResultsView>) {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("results-root");

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let card_shell = gtk::Box::new(gtk::Orientation::Vertical, 14);
    card_shell.set_halign(gtk::Align::Center);
    card_shell.set_valign(gtk::Align::Center);
    card_shell.add_css_class("results-card");
    card_shell.set_margin_top(28);
    card_shell.set_margin_bottom(28);
    card_shell.set_margin_start(28);
    card_shell.set_margin_end(28);

    let title = gtk::Label::new(Some(gettext("Results").as_str()));
    title.add_css_class("title-1");

    let score = gtk::Label::new(Some("0"));
    score.add_css_class("results-score");
    score.add_css_class("numeric");

    let stats = gtk::Grid::new();
    stats.set_row_spacing(6);
    stats.set_column_spacing(24);
    stats.set_halign(gtk::Align::Center);

    let view = Rc::new(ResultsView {
        time: gtk::Label::new(Some("00:00")),
        score: score.clone(),
        moves: gtk::Label::new(Some("0")),
        misses: gtk::Label::new(Some("0")),
        accuracy: gtk::Label::new(Some("0%")),
    });
    for (row, (caption, value)) in [
        (gettext("Time"), &view.time),
        (gettext("Moves"), &view.moves),
        (gettext("Misses"), &view.misses),
        (gettext("Accuracy"), &view.accuracy),
    ]
    .into_iter()
    .enumerate()
    {
        let caption = gtk::Label::new(Some(caption.as_str()));
        caption.set_halign(gtk::Align::Start);
        caption.add_css_class("dim-label");
        value.set_halign(gtk::Align::End);
        value.add_css_class("numeric");
        stats.attach(&caption, 0, row as i32, 1, 1);
        stats.attach(value, 1, row as i32, 1, 1);
    }

    let again_btn = gtk::Button::with_label(&gettext("Play Again"));
    again_btn.add_css_class("suggested-action");
    again_btn.add_css_class("pill");
    again_btn.set_halign(gtk::Align::Center);
    again_btn.connect_clicked({
        let state = Rc::downgrade(state);
        move |_| {
            if let Some(state) = state.upgrade() {
                show_game(&state);
            }
        }
    });

    card_shell.append(&title);
    card_shell.append(&score);
    card_shell.append(&stats);
    card_shell.append(&again_btn);
    center.set_center_widget(Some(&card_shell));
    root.append(&center);

    (root, view)
}

/// Opens the results page of the view stack for a completion query.
pub struct StackNavigator {
    stack: glib::WeakRef<gtk::Stack>,
    view: Rc<ResultsView>,
}

impl StackNavigator {
    pub fn new(stack: &gtk::Stack, view: Rc<ResultsView>) -> Self {
        StackNavigator {
            stack: stack.downgrade(),
            view,
        }
    }
}

impl Navigator for StackNavigator {
    fn open_results(&self, query: &str) {
        let params = ResultsParams::from_query(query);
        let summary = params.summary();
        tracing::info!(
            size = params.size,
            theme = %params.theme,
            speed = %params.speed,
            accuracy = summary.accuracy_pct,
            score = summary.score,
            time = %summary.formatted_time,
            "results computed"
        );
        summary.render_to(self.view.as_ref());

        let Some(stack) = self.stack.upgrade() else {
            tracing::warn!("view stack is gone, results not shown");
            return;
        };
        stack.set_transition_type(gtk::StackTransitionType::SlideLeft);
        stack.set_visible_child_name("results");
    }
}
