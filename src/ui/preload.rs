use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use gtk4::gdk;
use gtk4::glib;
use memorama_core::{ImageCache, settle_preload};

pub type TextureCache = ImageCache<gdk::Texture>;

/// Decodes every card texture on the blocking pool while the main loop
/// keeps running. Gives up on the whole batch after `timeout`.
pub async fn preload_textures(paths: Vec<PathBuf>, timeout: Duration) -> TextureCache {
    race_decodes(paths, timeout, |path: &Path| gdk::Texture::from_filename(path)).await
}

async fn race_decodes<T, E, F>(paths: Vec<PathBuf>, timeout: Duration, decode: F) -> ImageCache<T>
where
    T: Send + 'static,
    E: Display + Send + 'static,
    F: Fn(&Path) -> Result<T, E> + Send + Sync + 'static,
{
    let total = paths.len();
    let decode = Arc::new(decode);
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let decode = decode.clone();
            let worker_path = path.clone();
            let handle = gio::spawn_blocking(move || {
                decode(&worker_path).map_err(|err| err.to_string())
            });
            (path, handle)
        })
        .collect();

    let joined = glib::future_with_timeout(timeout, async move {
        let mut finished = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            let decoded = match handle.await {
                Ok(decoded) => decoded,
                Err(_) => Err("decode worker panicked".to_string()),
            };
            finished.push((path, decoded));
        }
        finished
    })
    .await;

    settle_preload(total, timeout, joined.ok())
}
