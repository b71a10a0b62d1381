use url::form_urlencoded;

/// What the player achieved, handed over once the last pair is found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionPayload {
    pub formatted_time: String,
    pub seconds: u32,
    pub moves: u32,
    pub misses: u32,
    pub board_size: usize,
    pub theme: String,
    pub speed: String,
}

impl CompletionPayload {
    /// Query string understood by [`crate::ResultsParams::from_query`].
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("size", &self.board_size.to_string())
            .append_pair("theme", &self.theme)
            .append_pair("speed", &self.speed)
            .append_pair("moves", &self.moves.to_string())
            .append_pair("misses", &self.misses.to_string())
            .append_pair("time", &self.seconds.to_string())
            .finish()
    }
}

pub trait Navigator {
    fn open_results(&self, query: &str);
}

pub struct NoNavigator;

impl Navigator for NoNavigator {
    fn open_results(&self, query: &str) {
        tracing::warn!(query, "no results view to navigate to");
    }
}

/// Everything the game shows to the player. Each method has a usable
/// default so implementors only override what they can display.
pub trait Presenter {
    fn update_moves(&self, _moves: u32) {}
    fn update_misses(&self, _misses: u32) {}
    fn update_matches(&self, _matches: u32) {}
    fn update_time(&self, _text: &str) {}
    fn show_message(&self, _text: &str) {}

    /// Without a completion dialog the results view is opened directly.
    fn show_win_message(&self, payload: &CompletionPayload, navigator: &dyn Navigator) {
        navigator.open_results(&payload.to_query());
    }
}

pub struct NoPresenter;

impl Presenter for NoPresenter {}
