use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use memorama_core::{CompletionPayload, Navigator, Presenter};

use super::scene::restart_game;
use super::state::AppState;

const NOTICE_DURATION: Duration = Duration::from_millis(1500);
const EMPTY_TIME: &str = "--:--";

pub struct HudLabels {
    pub moves: gtk::Label,
    pub misses: gtk::Label,
    pub matches: gtk::Label,
    pub time: gtk::Label,
}

fn stat_chip(title: &str, value: &gtk::Label) -> gtk::Box {
    let chip = gtk::Box::new(gtk::Orientation::Vertical, 2);
    chip.add_css_class("memorama-stat");
    let caption = gtk::Label::builder()
        .label(title)
        .css_classes(vec!["caption", "dim-label"])
        .build();
    value.add_css_class("memorama-stat-value");
    value.add_css_class("numeric");
    chip.append(&caption);
    chip.append(value);
    chip
}

/// The counter strip shown above the board.
pub fn build_hud_bar() -> (gtk::Box, HudLabels) {
    let bar = gtk::Box::new(gtk::Orientation::Horizontal, 18);
    bar.set_halign(gtk::Align::Center);
    bar.add_css_class("memorama-hud");

    let labels = HudLabels {
        moves: gtk::Label::new(Some("0")),
        misses: gtk::Label::new(Some("0")),
        matches: gtk::Label::new(Some("0")),
        time: gtk::Label::new(Some("00:00")),
    };
    bar.append(&stat_chip(&gettext("Moves"), &labels.moves));
    bar.append(&stat_chip(&gettext("Misses"), &labels.misses));
    bar.append(&stat_chip(&gettext("Pairs"), &labels.matches));
    bar.append(&stat_chip(&gettext("Time"), &labels.time));
    (bar, labels)
}

/// Completion dialog, built once and presented on every win.
pub struct WinDialog {
    dialog: adw::AlertDialog,
    final_time: gtk::Label,
    final_moves: gtk::Label,
    final_misses: gtk::Label,
    query: Rc<RefCell<String>>,
}

impl WinDialog {
    pub fn new(state: Weak<RefCell<AppState>>, navigator: Rc<dyn Navigator>) -> Self {
        let dialog = adw::AlertDialog::new(Some(gettext("Board Cleared!").as_str()), None);
        dialog.add_response("results", &gettext("See Results"));
        dialog.add_response("again", &gettext("Play Again"));
        dialog.set_response_appearance("again", adw::ResponseAppearance::Suggested);
        dialog.set_default_response(Some("again"));
        dialog.set_close_response("results");

        let grid = gtk::Grid::new();
        grid.set_row_spacing(6);
        grid.set_column_spacing(18);
        grid.set_halign(gtk::Align::Center);
        let final_time = gtk::Label::new(Some(EMPTY_TIME));
        let final_moves = gtk::Label::new(Some("0"));
        let final_misses = gtk::Label::new(Some("0"));
        for (row, (title, value)) in [
            (gettext("Time"), &final_time),
            (gettext("Moves"), &final_moves),
            (gettext("Misses"), &final_misses),
        ]
        .into_iter()
        .enumerate()
        {
            let caption = gtk::Label::new(Some(title.as_str()));
            caption.set_halign(gtk::Align::Start);
            caption.add_css_class("dim-label");
            value.set_halign(gtk::Align::End);
            value.add_css_class("numeric");
            grid.attach(&caption, 0, row as i32, 1, 1);
            grid.attach(value, 1, row as i32, 1, 1);
        }
        dialog.set_extra_child(Some(&grid));

        let query = Rc::new(RefCell::new(String::new()));
        dialog.connect_response(None, {
            let query = query.clone();
            move |_, response| match response {
                "again" => {
                    if let Some(state) = state.upgrade() {
                        restart_game(&state);
                    }
                }
                "results" => {
                    let query = query.borrow().clone();
                    navigator.open_results(&query);
                }
                _ => {}
            }
        });

        WinDialog {
            dialog,
            final_time,
            final_moves,
            final_misses,
            query,
        }
    }

    fn fill(&self, payload: &CompletionPayload) {
        let time = if payload.formatted_time.is_empty() {
            EMPTY_TIME
        } else {
            payload.formatted_time.as_str()
        };
        self.final_time.set_text(time);
        self.final_moves.set_text(&payload.moves.to_string());
        self.final_misses.set_text(&payload.misses.to_string());
        self.query.replace(payload.to_query());
    }
}

/// GTK presenter. Every target is optional; unbound ones are skipped.
#[derive(Default)]
pub struct Hud {
    pub labels: Option<HudLabels>,
    pub win_dialog: Option<WinDialog>,
    pub window: Option<gtk::Window>,
    pub overlay: Option<gtk::Overlay>,
    pub(crate) notice: RefCell<Option<gtk::Label>>,
    pub(crate) notice_source: Rc<RefCell<Option<glib::SourceId>>>,
}

impl Hud {
    fn notice_label(&self, overlay: &gtk::Overlay) -> gtk::Label {
        self.notice
            .borrow_mut()
            .get_or_insert_with(|| {
                let label = gtk::Label::builder()
                    .css_classes(vec!["memorama-notice", "osd"])
                    .halign(gtk::Align::Center)
                    .valign(gtk::Align::End)
                    .margin_bottom(24)
                    .build();
                label.set_can_target(false);
                overlay.add_overlay(&label);
                label
            })
            .clone()
    }
}

impl Presenter for Hud {
    fn update_moves(&self, moves: u32) {
        if let Some(labels) = &self.labels {
            labels.moves.set_text(&moves.to_string());
        }
    }

    fn update_misses(&self, misses: u32) {
        if let Some(labels) = &self.labels {
            labels.misses.set_text(&misses.to_string());
        }
    }

    fn update_matches(&self, matches: u32) {
        if let Some(labels) = &self.labels {
            labels.matches.set_text(&matches.to_string());
        }
    }

    fn update_time(&self, text: &str) {
        if let Some(labels) = &self.labels {
            labels.time.set_text(text);
        }
    }

    fn show_message(&self, text: &str) {
        let Some(overlay) = &self.overlay else {
            tracing::debug!(text, "no overlay for notice");
            return;
        };
        let label = self.notice_label(overlay);
        label.set_text(text);
        label.remove_css_class("dismissed");

        if let Some(source) = self.notice_source.borrow_mut().take() {
            source.remove();
        }
        let slot = Rc::downgrade(&self.notice_source);
        let weak_label = label.downgrade();
        let source = glib::timeout_add_local_once(NOTICE_DURATION, move || {
            if let Some(slot) = slot.upgrade() {
                slot.borrow_mut().take();
            }
            if let Some(label) = weak_label.upgrade() {
                label.add_css_class("dismissed");
            }
        });
        *self.notice_source.borrow_mut() = Some(source);
    }

    fn show_win_message(&self, payload: &CompletionPayload, navigator: &dyn Navigator) {
        match (&self.win_dialog, &self.window) {
            (Some(win_dialog), Some(window)) => {
                win_dialog.fill(payload);
                win_dialog.dialog.present(Some(window));
            }
            _ => {
                tracing::debug!("no completion dialog, opening results");
                navigator.open_results(&payload.to_query());
            }
        }
    }
}
