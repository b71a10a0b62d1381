//! Score statistics for a finished board, computed from the results query.

use url::form_urlencoded;

use crate::timer::format_seconds;

const DEFAULT_SIZE: u32 = 4;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultsParams {
    pub size: u32,
    pub moves: u32,
    pub misses: u32,
    pub seconds: u32,
    pub theme: String,
    pub speed: String,
}

fn parse_count(value: &str) -> u32 {
    value.trim().parse::<u32>().unwrap_or(0)
}

impl ResultsParams {
    /// Missing or non-numeric counters read as 0; a missing size reads as 4.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = ResultsParams::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "size" => params.size = parse_count(&value),
                "moves" => params.moves = parse_count(&value),
                "misses" => params.misses = parse_count(&value),
                "time" => params.seconds = parse_count(&value),
                "theme" => params.theme = value.into_owned(),
                "speed" => params.speed = value.into_owned(),
                _ => {}
            }
        }
        if params.size == 0 {
            params.size = DEFAULT_SIZE;
        }
        params
    }

    pub fn summary(&self) -> ResultsSummary {
        ResultsSummary::compute(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsSummary {
    pub total_pairs: u64,
    pub accuracy_pct: u32,
    pub score: u32,
    pub formatted_time: String,
    pub moves: u32,
    pub misses: u32,
    pub seconds: u32,
}

/// Halves round towards positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Negative values clip to 0 and values past `u32::MAX` saturate.
fn clamp_count(value: f64) -> u32 {
    value.clamp(0.0, f64::from(u32::MAX)) as u32
}

impl ResultsSummary {
    pub fn compute(params: &ResultsParams) -> Self {
        // u32 * u32 always fits in u64.
        let total_pairs = u64::from(params.size) * u64::from(params.size) / 2;
        let accuracy_pct = if params.moves > 0 {
            clamp_count(round_half_up(
                100.0 * total_pairs as f64 / f64::from(params.moves),
            ))
        } else {
            0
        };
        let raw = f64::from(accuracy_pct) * 10.0
            - f64::from(params.seconds) * 0.5
            - f64::from(params.misses) * 5.0;
        let score = clamp_count(round_half_up(raw));

        ResultsSummary {
            total_pairs,
            accuracy_pct,
            score,
            formatted_time: format_seconds(params.seconds),
            moves: params.moves,
            misses: params.misses,
            seconds: params.seconds,
        }
    }

    pub fn accuracy_label(&self) -> String {
        format!("{}%", self.accuracy_pct)
    }

    pub fn render_to(&self, sink: &dyn ResultsSink) {
        sink.set_time(&self.formatted_time);
        sink.set_score(self.score);
        sink.set_moves(self.moves);
        sink.set_misses(self.misses);
        sink.set_accuracy(&self.accuracy_label());
    }
}

/// Display targets of the results view; absent targets keep the defaults.
pub trait ResultsSink {
    fn set_time(&self, _text: &str) {}
    fn set_score(&self, _score: u32) {}
    fn set_moves(&self, _moves: u32) {}
    fn set_misses(&self, _misses: u32) {}
    fn set_accuracy(&self, _text: &str) {}
}
