use gettextrs::gettext;
use gtk4 as gtk;
use libadwaita as adw;
use memorama_core::Config;

use adw::prelude::*;

/// Rules followed by the settings the current board was dealt with.
fn instructions_body(config: &Config) -> String {
    let side = config.board_size.side();
    let rules = gettext(
        "Turn over two cards at a time to find matching pairs. \
A matched pair stays face up and a miss turns both cards back down. \
The clock starts with your first card.",
    );
    format!(
        "{rules}\n\n{board}: {side}×{side} ({pairs} {pairs_label})\n{theme}: {theme_name}\n{speed}: {speed_name}, {miss_ms} ms {miss_label}",
        board = gettext("Board"),
        pairs = config.board_size.pairs(),
        pairs_label = gettext("pairs"),
        theme = gettext("Theme"),
        theme_name = config.theme.as_str(),
        speed = gettext("Speed"),
        speed_name = config.speed.as_str(),
        miss_ms = config.speed.miss_delay().as_millis(),
        miss_label = gettext("before a miss turns back"),
    )
}

pub fn show_instructions_dialog(parent: Option<&gtk::Window>, config: &Config) {
    let dialog = adw::AlertDialog::builder()
        .heading(gettext("How to Play"))
        .body(instructions_body(config))
        .build();
    dialog.add_response("close", &gettext("Play"));
    dialog.set_response_appearance("close", adw::ResponseAppearance::Suggested);
    dialog.set_close_response("close");
    dialog.present(parent);
}

pub fn show_about_dialog(parent: Option<&gtk::Window>) {
    let dialog = adw::AboutDialog::builder()
        .application_name("Memorama")
        .developer_name(gettext("The Memorama developers"))
        .version(env!("CARGO_PKG_VERSION"))
        .comments(gettext("Find every pair in as few moves as you can."))
        .license_type(gtk::License::MitX11)
        .build();
    dialog.present(parent);
}
