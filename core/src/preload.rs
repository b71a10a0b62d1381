//! Card images decoded ahead of the first deal.

use std::collections::HashMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PRELOAD_TIMEOUT: Duration = Duration::from_millis(1800);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreloadStatus {
    Ok,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreloadOutcome {
    pub path: PathBuf,
    pub status: PreloadStatus,
}

/// Decoded images keyed by their full path, plus one outcome per attempt.
#[derive(Debug)]
pub struct ImageCache<T> {
    images: HashMap<PathBuf, T>,
    outcomes: Vec<PreloadOutcome>,
}

impl<T> Default for ImageCache<T> {
    fn default() -> Self {
        ImageCache {
            images: HashMap::new(),
            outcomes: Vec::new(),
        }
    }
}

impl<T> ImageCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the image on success; a failure only leaves an outcome behind.
    pub fn record<E: Display>(&mut self, path: PathBuf, decoded: Result<T, E>) {
        let status = match decoded {
            Ok(image) => {
                self.images.insert(path.clone(), image);
                PreloadStatus::Ok
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "card image failed to decode");
                PreloadStatus::Error
            }
        };
        self.outcomes.push(PreloadOutcome { path, status });
    }

    /// Stores an image decoded after the warm-up.
    pub fn insert(&mut self, path: PathBuf, image: T) {
        self.images.insert(path, image);
    }

    pub fn get(&self, path: &Path) -> Option<&T> {
        self.images.get(path)
    }

    pub fn outcomes(&self) -> &[PreloadOutcome] {
        &self.outcomes
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == PreloadStatus::Error)
            .count()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Builds the cache once the decode race is over. `finished` is `None` when
/// the deadline passed first, in which case partial results are dropped.
pub fn settle_preload<T, E: Display>(
    total: usize,
    timeout: Duration,
    finished: Option<Vec<(PathBuf, Result<T, E>)>>,
) -> ImageCache<T> {
    let mut cache = ImageCache::new();
    let Some(finished) = finished else {
        tracing::warn!(
            total,
            timeout_ms = timeout.as_millis() as u64,
            "image preload timed out"
        );
        return cache;
    };
    for (path, decoded) in finished {
        cache.record(path, decoded);
    }
    tracing::info!(total, failed = cache.failed(), "images preloaded");
    cache
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(n: usize, broken: usize) -> Vec<(PathBuf, Result<u32, String>)> {
        (0..n)
            .map(|i| {
                let path = PathBuf::from(format!("img/{i}.png"));
                let result = if i == broken {
                    Err("truncated file".to_string())
                } else {
                    Ok(i as u32)
                };
                (path, result)
            })
            .collect()
    }

    #[test]
    fn keeps_decoded_images_and_reports_failures() {
        let cache = settle_preload(4, DEFAULT_PRELOAD_TIMEOUT, Some(decoded(4, 2)));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.failed(), 1);
        assert_eq!(cache.get(Path::new("img/3.png")), Some(&3));
        assert_eq!(cache.get(Path::new("img/2.png")), None);
        assert_eq!(cache.outcomes()[2].status, PreloadStatus::Error);
        assert_eq!(cache.outcomes()[0].path, PathBuf::from("img/0.png"));
    }

    #[test]
    fn a_timeout_discards_everything() {
        let cache = settle_preload::<u32, String>(2, Duration::from_millis(20), None);
        assert!(cache.is_empty());
        assert!(cache.outcomes().is_empty());
    }

    #[test]
    fn late_decodes_can_be_added() {
        let mut cache = settle_preload::<u32, String>(0, DEFAULT_PRELOAD_TIMEOUT, Some(Vec::new()));
        cache.insert(PathBuf::from("img/7.png"), 7);
        assert_eq!(cache.get(Path::new("img/7.png")), Some(&7));
        assert!(cache.outcomes().is_empty());
    }
}
