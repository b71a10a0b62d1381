use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use gettextrs::gettext;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::gdk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use memorama_core::{
    Config, DEFAULT_PRELOAD_TIMEOUT, FileStorage, Navigator, Presenter, SessionParts, image_paths,
    pair_count, start_session,
};

use super::board::{CONTENT_MARGIN, GtkCardSurface};
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::hud::{Hud, HudLabels, WinDialog, build_hud_bar};
use super::preload::{TextureCache, preload_textures};
use super::scene::{StackNavigator, build_results_view, restart_game};
use super::scheduler::GlibScheduler;
use super::state::AppState;

const APP_ID: &str = "io.github.memorama.Memorama";
const ASSET_DIR_ENV: &str = "MEMORAMA_ASSET_DIR";
const STYLE_CSS: &str = include_str!("../../data/style.css");

pub fn run() -> glib::ExitCode {
    glib::set_prgname(Some("memorama"));
    let app = adw::Application::builder().application_id(APP_ID).build();
    app.connect_activate(build_ui);
    app.run()
}

fn asset_root() -> PathBuf {
    match std::env::var_os(ASSET_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn load_config() -> Config {
    let mut storage = FileStorage::in_dir(&glib::user_config_dir().join("memorama"));
    let config = Config::load(&storage);
    // Normalises unknown values so the file always names valid choices.
    if let Err(err) = config.save(&mut storage) {
        tracing::warn!(path = %storage.path().display(), error = %err, "could not write settings");
    }
    config
}

fn build_ui(app: &adw::Application) {
    load_css();

    let state = Rc::new(RefCell::new(AppState::new(load_config(), asset_root())));

    let instructions_action = SimpleAction::new("instructions", None);
    instructions_action.connect_activate({
        let app = app.clone();
        let state = Rc::downgrade(&state);
        move |_, _| {
            let Some(state) = state.upgrade() else {
                return;
            };
            let config = state.borrow().config;
            show_instructions_dialog(app.active_window().as_ref(), &config);
        }
    });
    app.add_action(&instructions_action);

    let about_action = SimpleAction::new("about", None);
    about_action.connect_activate({
        let app = app.clone();
        move |_, _| {
            show_about_dialog(app.active_window().as_ref());
        }
    });
    app.add_action(&about_action);

    let restart_action = SimpleAction::new("restart", None);
    restart_action.connect_activate({
        let state = Rc::downgrade(&state);
        move |_, _| {
            if let Some(state) = state.upgrade() {
                restart_game(&state);
            }
        }
    });
    app.add_action(&restart_action);
    app.set_accels_for_action("app.restart", &["<primary>r"]);

    let quit_action = SimpleAction::new("quit", None);
    quit_action.connect_activate({
        let app = app.clone();
        move |_, _| app.quit()
    });
    app.add_action(&quit_action);
    app.set_accels_for_action("app.quit", &["<primary>q"]);

    let dynamic_css_provider = gtk::CssProvider::new();
    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &dynamic_css_provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }

    let title = gtk::Label::new(None);
    title.set_markup("<b>Memorama</b>");
    title.set_halign(gtk::Align::Center);

    let header = adw::HeaderBar::builder().title_widget(&title).build();
    header.add_css_class("flat");

    let restart_button = gtk::Button::builder()
        .icon_name("view-refresh-symbolic")
        .action_name("app.restart")
        .build();
    restart_button.set_tooltip_text(Some(gettext("New Game").as_str()));

    let menu_model = gio::Menu::new();
    menu_model.append(Some(gettext("Instructions").as_str()), Some("app.instructions"));
    menu_model.append(Some(gettext("About Memorama").as_str()), Some("app.about"));
    menu_model.append(Some(gettext("Quit").as_str()), Some("app.quit"));
    let menu_button = gtk::MenuButton::builder()
        .icon_name("open-menu-symbolic")
        .menu_model(&menu_model)
        .build();

    let end_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
    end_box.append(&restart_button);
    end_box.append(&menu_button);
    header.pack_end(&end_box);

    let view_stack = gtk::Stack::new();
    view_stack.set_hexpand(true);
    view_stack.set_vexpand(true);
    view_stack.set_hhomogeneous(false);
    view_stack.set_vhomogeneous(false);
    view_stack.set_interpolate_size(false);
    view_stack.set_transition_duration(300);

    let game_view = build_game_view();
    view_stack.add_named(&game_view.overlay, Some("game"));

    let (results_view, results) = build_results_view(&state);
    view_stack.add_named(&results_view, Some("results"));
    view_stack.set_visible_child_name("game");

    let toolbar = adw::ToolbarView::new();
    toolbar.set_hexpand(true);
    toolbar.set_vexpand(true);
    toolbar.add_top_bar(&header);
    toolbar.set_content(Some(&view_stack));

    let win = adw::ApplicationWindow::builder()
        .application(app)
        .title("Memorama")
        .default_width(720)
        .default_height(820)
        .content(&toolbar)
        .build();
    win.set_size_request(360, 520);
    win.add_css_class("memorama-window");

    // The navigator is shared by the game and the win dialog.
    let navigator: Rc<dyn Navigator> = Rc::new(StackNavigator::new(&view_stack, results));
    let hud = Hud {
        labels: Some(game_view.labels),
        win_dialog: Some(WinDialog::new(Rc::downgrade(&state), navigator.clone())),
        window: Some(win.clone().upcast()),
        overlay: Some(game_view.overlay),
        ..Default::default()
    };

    {
        let mut st = state.borrow_mut();
        st.view_stack = Some(view_stack);
        st.board_container = Some(game_view.board_container);
        st.dynamic_css_provider = Some(dynamic_css_provider);
    }

    win.present();
    begin_session(&state, Rc::new(hud), navigator);
}

/// Decodes the card textures off the main loop, then deals the board.
fn begin_session(
    state: &Rc<RefCell<AppState>>,
    presenter: Rc<dyn Presenter>,
    navigator: Rc<dyn Navigator>,
) {
    let (config, asset_root) = {
        let st = state.borrow();
        (st.config, st.asset_root.clone())
    };
    let pairs = match pair_count(config.board_size.side()) {
        Ok(pairs) => pairs,
        Err(err) => {
            tracing::error!(error = %err, "invalid board configuration");
            return;
        }
    };
    let paths: Vec<PathBuf> = image_paths(config.theme, pairs)
        .iter()
        .map(|image| asset_root.join(image))
        .collect();

    let state = state.clone();
    glib::spawn_future_local(async move {
        let textures = preload_textures(paths, DEFAULT_PRELOAD_TIMEOUT).await;
        start_game(&state, textures, presenter, navigator);
    });
}

fn start_game(
    state: &Rc<RefCell<AppState>>,
    textures: TextureCache,
    presenter: Rc<dyn Presenter>,
    navigator: Rc<dyn Navigator>,
) {
    let (container, asset_root, css_provider, config) = {
        let st = state.borrow();
        (
            st.board_container.clone(),
            st.asset_root.clone(),
            st.dynamic_css_provider.clone(),
            st.config,
        )
    };
    let Some(container) = container else {
        tracing::error!("board container missing, game not started");
        return;
    };

    let parts = SessionParts {
        surface: Box::new(GtkCardSurface::new(
            &container,
            asset_root,
            textures,
            css_provider.unwrap_or_else(gtk::CssProvider::new),
        )),
        presenter,
        navigator,
        scheduler: Rc::new(GlibScheduler::new()),
    };
    match start_session(&config, parts, &mut rand::rng()) {
        Ok(game) => state.borrow_mut().game = Some(game),
        Err(err) => tracing::error!(error = %err, "could not start the game"),
    }
}

fn load_css() {
    let Some(display) = gdk::Display::default() else {
        return;
    };
    let provider = gtk::CssProvider::new();
    provider.load_from_data(STYLE_CSS);
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

struct GameView {
    overlay: gtk::Overlay,
    board_container: gtk::Box,
    labels: HudLabels,
}

fn build_game_view() -> GameView {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_hexpand(true);
    content.set_vexpand(true);
    content.set_halign(gtk::Align::Fill);
    content.set_valign(gtk::Align::Fill);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let (hud_bar, labels) = build_hud_bar();
    content.append(&hud_bar);

    let board_frame = gtk::AspectFrame::new(0.5, 0.5, 1.0, false);
    board_frame.set_halign(gtk::Align::Fill);
    board_frame.set_valign(gtk::Align::Fill);
    board_frame.set_hexpand(true);
    board_frame.set_vexpand(true);

    let board_container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_container.set_halign(gtk::Align::Fill);
    board_container.set_valign(gtk::Align::Fill);
    board_container.set_hexpand(true);
    board_container.set_vexpand(true);
    board_container.add_css_class("memorama-card-container");

    board_container.connect_closure(
        "notify::width",
        false,
        glib::closure_local!(move |card: gtk::Box, _: glib::ParamSpec| {
            if card.width() < 500 {
                card.add_css_class("compact");
            } else {
                card.remove_css_class("compact");
            }
        }),
    );

    let loading = adw::Spinner::new();
    loading.set_halign(gtk::Align::Center);
    loading.set_valign(gtk::Align::Center);
    loading.set_vexpand(true);
    board_container.append(&loading);

    board_frame.set_child(Some(&board_container));
    content.append(&board_frame);
    root.append(&content);

    let overlay = gtk::Overlay::new();
    overlay.set_child(Some(&root));

    GameView {
        overlay,
        board_container,
        labels,
    }
}
