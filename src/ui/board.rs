use std::cell::{Cell, RefCell};
use std::path::PathBuf;

use gtk4 as gtk;
use gtk4::gdk;
use gtk4::glib;
use gtk4::pango;
use gtk4::prelude::*;
use memorama_core::{ActivateFn, CardState, CardSurface};

use super::preload::TextureCache;

pub const CONTENT_MARGIN: i32 = 12;
pub const TILE_GAP: i32 = 6;

const BACK_GLYPH: &str = "?";
const MISSING_GLYPH: &str = "❓";

struct CardCell {
    button: gtk::Button,
    faces: gtk::Stack,
}

/// Card cells as buttons in a grid inside the game view's board container.
pub struct GtkCardSurface {
    container: glib::WeakRef<gtk::Box>,
    asset_root: PathBuf,
    textures: RefCell<TextureCache>,
    dynamic_css: gtk::CssProvider,
    grid: RefCell<Option<gtk::Grid>>,
    side: Cell<i32>,
    cells: RefCell<Vec<CardCell>>,
}

impl GtkCardSurface {
    pub fn new(
        container: &gtk::Box,
        asset_root: PathBuf,
        textures: TextureCache,
        dynamic_css: gtk::CssProvider,
    ) -> Self {
        GtkCardSurface {
            container: container.downgrade(),
            asset_root,
            textures: RefCell::new(textures),
            dynamic_css,
            grid: RefCell::new(None),
            side: Cell::new(0),
            cells: RefCell::new(Vec::new()),
        }
    }

    fn build_grid(&self, side: i32) -> gtk::Grid {
        let grid = gtk::Grid::new();
        grid.add_css_class("memorama-board");
        grid.set_row_spacing(TILE_GAP as u32);
        grid.set_column_spacing(TILE_GAP as u32);
        grid.set_halign(gtk::Align::Fill);
        grid.set_valign(gtk::Align::Fill);
        grid.set_hexpand(true);
        grid.set_vexpand(true);
        grid.set_row_homogeneous(true);
        grid.set_column_homogeneous(true);

        let update_styles = {
            let provider = self.dynamic_css.clone();
            move |grid: &gtk::Grid| {
                let width = grid.width();
                let height = grid.height();
                if width > 0 && height > 0 && side > 0 {
                    let cell_width = (width - (side - 1) * TILE_GAP) / side;
                    let cell_height = (height - (side - 1) * TILE_GAP) / side;
                    let min_dim = cell_width.min(cell_height);

                    let card_radius = (min_dim as f64 * 0.15) as i32;
                    let container_radius = (min_dim as f64 * 0.25) as i32;
                    provider.load_from_data(&format!(
                        ".memorama-card {{ border-radius: {card_radius}px; }} \
                         .memorama-card-container {{ border-radius: {container_radius}px; }}"
                    ));
                }
            }
        };

        let update_width = update_styles.clone();
        grid.connect_closure(
            "notify::width",
            false,
            glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
                update_width(&grid);
            }),
        );
        grid.connect_closure(
            "notify::height",
            false,
            glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
                update_styles(&grid);
            }),
        );

        grid
    }

    /// Preloaded textures are reused; a miss decodes once and is remembered.
    fn texture_for(&self, path: PathBuf) -> Result<gdk::Texture, glib::Error> {
        if let Some(texture) = self.textures.borrow().get(&path) {
            return Ok(texture.clone());
        }
        let texture = gdk::Texture::from_filename(&path)?;
        tracing::debug!(path = %path.display(), "card image decoded outside the preload");
        self.textures.borrow_mut().insert(path, texture.clone());
        Ok(texture)
    }

    fn front_face(&self, image: &str) -> gtk::Widget {
        let path = self.asset_root.join(image);
        match self.texture_for(path.clone()) {
            Ok(texture) => {
                let picture = gtk::Picture::for_paintable(&texture);
                picture.set_can_shrink(true);
                picture.add_css_class("memorama-card-image");
                picture.upcast()
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "card image unavailable");
                let area = glyph_area(MISSING_GLYPH, false);
                area.add_css_class("no-image");
                area.upcast()
            }
        }
    }
}

fn glyph_area(text: &'static str, is_back: bool) -> gtk::DrawingArea {
    let drawing_area = gtk::DrawingArea::builder()
        .hexpand(true)
        .vexpand(true)
        .build();
    drawing_area.add_css_class("memorama-card-label");

    drawing_area.set_draw_func(move |area, cr, width, height| {
        let min_dim = width.min(height) as f64;
        let font_size = if is_back { min_dim * 0.34 } else { min_dim * 0.40 };

        cr.set_antialias(gtk::cairo::Antialias::Best);

        let layout = pangocairo::functions::create_layout(cr);
        let mut font_desc = pango::FontDescription::new();
        if is_back {
            font_desc.set_family("Cantarell, Noto Sans, sans");
            font_desc.set_weight(pango::Weight::Bold);
        } else {
            font_desc.set_family("Noto Color Emoji, Apple Color Emoji, Segoe UI Emoji, sans");
        }
        font_desc.set_size((font_size * pango::SCALE as f64) as i32);
        layout.set_font_description(Some(&font_desc));
        layout.set_text(text);

        let fg = area.style_context().color();
        cr.set_source_rgba(
            fg.red() as f64,
            fg.green() as f64,
            fg.blue() as f64,
            fg.alpha() as f64,
        );

        let (text_width, text_height) = layout.pixel_size();
        cr.move_to(
            (width as f64 - text_width as f64) / 2.0,
            (height as f64 - text_height as f64) / 2.0,
        );

        pangocairo::functions::show_layout(cr, &layout);
    });

    drawing_area
}

impl CardSurface for GtkCardSurface {
    fn is_available(&self) -> bool {
        self.container.upgrade().is_some()
    }

    fn clear(&self, size: usize) {
        self.cells.borrow_mut().clear();
        self.grid.replace(None);
        let Some(container) = self.container.upgrade() else {
            return;
        };
        while let Some(child) = container.first_child() {
            container.remove(&child);
        }

        let side = size as i32;
        self.side.set(side);
        let grid = self.build_grid(side);
        let grid_frame = gtk::AspectFrame::new(0.5, 0.5, 1.0, false);
        grid_frame.set_halign(gtk::Align::Fill);
        grid_frame.set_valign(gtk::Align::Fill);
        grid_frame.set_hexpand(true);
        grid_frame.set_vexpand(true);
        grid_frame.set_child(Some(&grid));
        container.append(&grid_frame);
        self.grid.replace(Some(grid));
    }

    fn add_cell(&self, index: usize, image: &str, on_activate: ActivateFn) {
        let grid = self.grid.borrow().clone();
        let Some(grid) = grid else {
            tracing::warn!(index, "cell added before the board was cleared");
            return;
        };

        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(1.0)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let button = gtk::Button::builder()
            .css_classes(vec!["memorama-card"])
            .build();
        button.set_hexpand(true);
        button.set_vexpand(true);

        let faces = gtk::Stack::new();
        faces.set_transition_type(gtk::StackTransitionType::Crossfade);
        faces.set_transition_duration(160);
        faces.add_named(&glyph_area(BACK_GLYPH, true), Some("back"));
        faces.add_named(&self.front_face(image), Some("front"));
        faces.set_visible_child_name("back");
        button.set_child(Some(&faces));

        button.connect_clicked(move |_| {
            on_activate();
        });

        aspect_frame.set_child(Some(&button));
        let side = self.side.get().max(1);
        let column = index as i32 % side;
        let row = index as i32 / side;
        grid.attach(&aspect_frame, column, row, 1, 1);

        self.cells.borrow_mut().push(CardCell { button, faces });
    }

    fn set_state(&self, index: usize, state: CardState) {
        let cells = self.cells.borrow();
        let Some(cell) = cells.get(index) else {
            return;
        };
        cell.button.remove_css_class("revealed");
        cell.button.remove_css_class("matched");
        match state {
            CardState::Hidden => {
                cell.faces.set_visible_child_name("back");
                cell.button.set_sensitive(true);
            }
            CardState::Revealed => {
                cell.button.add_css_class("revealed");
                cell.faces.set_visible_child_name("front");
            }
            CardState::Matched => {
                cell.button.add_css_class("matched");
                cell.faces.set_visible_child_name("front");
                cell.button.set_sensitive(false);
            }
        }
    }
}
