pub mod app;
mod board;
mod dialogs;
mod hud;
mod preload;
mod scene;
mod scheduler;
mod state;
