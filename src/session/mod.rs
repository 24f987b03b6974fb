mod session_tests;

use std::{
    collections::{
        HashMap,
        HashSet,
    },
    sync::Arc,
    time::{
        Duration,
        Instant,
    },
};

use crate::{
    catalog::{
        api::CatalogApi,
        types::{
            Character,
            FavoriteCharacter,
        },
    },
    core::tasks::{
        TaskManager,
        TaskResult,
    },
};

pub const NO_DATA_NOTICE: &str = "No data found.";

/// Which way a global favorite toggle went, so the caller can word its
/// feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    Added,
    Removed,
}

/// Transient user-facing message plus a visibility flag. Dismissing hides it
/// without clearing the text.
#[derive(Debug, Clone, Default)]
pub struct Notice {
    message: String,
    visible: bool,
}

impl Notice {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn show(&mut self, message: String) {
        self.message = message;
        self.visible = true;
    }

    fn dismiss(&mut self) {
        self.visible = false;
    }
}

/// State holder for one catalog browsing session: the page cursor, search
/// mode, the accumulated character list and the volatile favorites set.
///
/// Every field mutates on the owning thread only. Fetches go out through the
/// task layer and their completions are applied in [`BrowsingSession::pump`],
/// which the owning loop calls once per tick. In-flight fetches are never
/// cancelled, so a completion may land after the state that requested it has
/// moved on.
pub struct BrowsingSession {
    api: Arc<dyn CatalogApi>,
    tasks: TaskManager,
    characters: Vec<FavoriteCharacter>,
    favorites: HashMap<u32, Character>,
    search_text: String,
    current_page: u32,
    can_load_more: bool,
    notice: Notice,
    search_debounce: Option<Duration>,
    pending_search: Option<(String, Instant)>,
}

impl BrowsingSession {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self::with_debounce(api, None)
    }

    /// `search_debounce` holds each search until typing pauses that long;
    /// `None` dispatches one request per keystroke.
    pub fn with_debounce(api: Arc<dyn CatalogApi>, search_debounce: Option<Duration>) -> Self {
        Self {
            api,
            tasks: TaskManager::new(),
            characters: Vec::new(),
            favorites: HashMap::new(),
            search_text: String::new(),
            current_page: 1,
            can_load_more: true,
            notice: Notice::default(),
            search_debounce,
            pending_search: None,
        }
    }

    /// Resets the browsing state and kicks off the first unfiltered page
    /// load. Favorites survive a restart of the browse list.
    pub fn start(&mut self) {
        self.characters.clear();
        self.search_text.clear();
        self.current_page = 1;
        self.can_load_more = true;
        self.notice = Notice::default();
        self.pending_search = None;
        self.load_more();
    }

    /// Requests the next page in the active mode. No-op once the catalog ran
    /// dry.
    pub fn load_more(&mut self) {
        if !self.can_load_more {
            return;
        }

        if self.search_text.is_empty() {
            self.tasks.fetch_page(self.api.clone(), self.current_page);
        } else {
            self.tasks.search_page(self.api.clone(), self.search_text.clone(), self.current_page);
        }
    }

    /// Takes the search field's current text. Wired to every keystroke and to
    /// explicit submit; both land here.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();

        match self.search_debounce {
            Some(delay) => self.pending_search = Some((text, Instant::now() + delay)),
            None => self.apply_search_text(text),
        }
    }

    fn apply_search_text(&mut self, text: String) {
        self.search_text = text;
        self.current_page = 1;
        self.can_load_more = true;

        if self.search_text.is_empty() {
            // Leaving search mode starts the unfiltered list over from a cold
            // cache.
            self.api.clear_cache();
            self.characters.clear();
        }

        self.load_more();
    }

    /// Flips the list-scoped favorite flag on the matching row, by id. Absent
    /// ids are a no-op.
    pub fn toggle_list_favorite(&mut self, record: &FavoriteCharacter) {
        if let Some(entry) = self.characters.iter_mut().find(|c| c.id() == record.id()) {
            entry.is_favorite = !entry.is_favorite;
        }
    }

    /// Adds or removes the character in the global favorites set, reporting
    /// which one happened.
    pub fn toggle_favorite(&mut self, character: &Character) -> FavoriteAction {
        if self.favorites.remove(&character.id).is_some() {
            FavoriteAction::Removed
        } else {
            self.favorites.insert(character.id, character.clone());
            FavoriteAction::Added
        }
    }

    pub fn is_favorite(&self, character: &Character) -> bool {
        self.favorites.contains_key(&character.id)
    }

    /// True iff `record` is the final element of the accumulated list. The
    /// presentation surface uses this as its scrolled-to-bottom probe.
    pub fn is_last_in_list(&self, record: &FavoriteCharacter) -> bool {
        self.characters.last().map(|last| last.id() == record.id()).unwrap_or(false)
    }

    /// Applies every completed fetch (and any due debounced search) to the
    /// session state. Must run on the owning thread.
    pub fn pump(&mut self) {
        if let Some((text, due)) = self.pending_search.take() {
            if Instant::now() >= due {
                self.apply_search_text(text);
            } else {
                self.pending_search = Some((text, due));
            }
        }

        for result in self.tasks.poll_results() {
            tracing::debug!("applying {} fetch result", result.task_type());
            self.apply_result(result);
        }
    }

    fn apply_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Page { result: Ok(new_characters), .. } => {
                // Unfiltered pages append as-is, repeated ids included.
                let reached_end = new_characters.is_empty();
                self.characters.extend(new_characters.into_iter().map(FavoriteCharacter::new));

                if reached_end {
                    self.can_load_more = false;
                } else {
                    self.current_page += 1;
                }
            }
            TaskResult::Page { result: Err(cause), .. } => {
                tracing::warn!("character page fetch failed: {cause}");
                self.notice.show(format!("An error occurred: {cause}"));
            }
            TaskResult::Search { page, result, .. } => {
                match result {
                    Ok(new_characters) => {
                        let no_matches = new_characters.is_empty();
                        let wrapped: Vec<FavoriteCharacter> =
                            new_characters.into_iter().map(FavoriteCharacter::new).collect();

                        if page == 1 {
                            self.characters = wrapped;
                        } else {
                            let present: HashSet<u32> =
                                self.characters.iter().map(|c| c.id()).collect();
                            self.characters
                                .extend(wrapped.into_iter().filter(|c| !present.contains(&c.id())));
                        }

                        if no_matches {
                            self.can_load_more = false;
                            self.notice.show(NO_DATA_NOTICE.to_string());
                        }
                    }
                    Err(cause) => {
                        tracing::warn!("character search failed: {cause}");
                        self.notice
                            .show(format!("No characters found for '{}'.", self.search_text));
                    }
                }

                // The search path moves the cursor after every outcome, errors
                // included.
                self.current_page += 1;
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice.dismiss();
    }

    pub fn characters(&self) -> &[FavoriteCharacter] {
        &self.characters
    }

    pub fn favorites(&self) -> impl Iterator<Item = &Character> + '_ {
        self.favorites.values()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn can_load_more(&self) -> bool {
        self.can_load_more
    }

    pub fn notice(&self) -> &Notice {
        &self.notice
    }
}
