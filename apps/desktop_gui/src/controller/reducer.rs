//! Reducer-like state for the two panes and the root view that links them.
//!
//! Every fetch a pane issues is stamped with a generation from that pane's
//! [`RequestGeneration`]. Results are applied only when their generation is
//! still the latest one, so a slow response for an older page or episode can
//! never overwrite what the user navigated to afterwards.

use shared::{
    domain::{Character, CharacterPage, Episode, EpisodeId, EpisodePage, PageInfo, PageRef},
    paging::{pagination_items, validate_page, PageItem},
};

use crate::controller::events::UiError;

#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: u64,
}

impl RequestGeneration {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRequest {
    pub generation: u64,
    pub page: u32,
    pub page_ref: Option<PageRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRequest {
    pub generation: u64,
    pub episode_id: EpisodeId,
    pub page: u32,
}

#[derive(Debug)]
pub struct EpisodeListState {
    episodes: Vec<Episode>,
    page_info: PageInfo,
    current_page: u32,
    loading: bool,
    error: Option<String>,
    default_selection_pending: bool,
    last_request: Option<(u32, Option<PageRef>)>,
    requests: RequestGeneration,
}

impl Default for EpisodeListState {
    fn default() -> Self {
        Self {
            episodes: Vec::new(),
            page_info: PageInfo::default(),
            current_page: 1,
            loading: false,
            error: None,
            default_selection_pending: false,
            last_request: None,
            requests: RequestGeneration::default(),
        }
    }
}

impl EpisodeListState {
    /// Starts a fresh load sequence at the first page.
    pub fn mount(&mut self) -> EpisodeRequest {
        self.default_selection_pending = true;
        self.request(1, None)
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<EpisodeRequest> {
        let page = validate_page(page, self.page_info.total_pages).ok()?;
        if page == self.current_page && self.error.is_none() {
            return None;
        }
        Some(self.request(page, Some(PageRef::Number(page))))
    }

    pub fn next_page(&mut self) -> Option<EpisodeRequest> {
        if !self.next_enabled() {
            return None;
        }
        let link = self.page_info.next.clone()?;
        let page = link.page_number().unwrap_or(self.current_page + 1);
        Some(self.request(page, Some(link)))
    }

    pub fn prev_page(&mut self) -> Option<EpisodeRequest> {
        if !self.prev_enabled() {
            return None;
        }
        let link = self.page_info.prev.clone()?;
        let page = link
            .page_number()
            .unwrap_or(self.current_page.saturating_sub(1).max(1));
        Some(self.request(page, Some(link)))
    }

    /// Re-issues the most recent request after a failure.
    pub fn retry(&mut self) -> Option<EpisodeRequest> {
        let (page, page_ref) = self.last_request.clone()?;
        Some(self.request(page, page_ref))
    }

    fn request(&mut self, page: u32, page_ref: Option<PageRef>) -> EpisodeRequest {
        self.loading = true;
        self.last_request = Some((page, page_ref.clone()));
        EpisodeRequest {
            generation: self.requests.issue(),
            page,
            page_ref,
        }
    }

    /// Applies a finished episode fetch. Returns the episode to select by
    /// default when this is the first page of a load sequence and nothing is
    /// selected yet.
    pub fn apply_loaded(
        &mut self,
        generation: u64,
        page: u32,
        result: Result<EpisodePage, UiError>,
        has_selection: bool,
    ) -> Option<EpisodeId> {
        if !self.requests.is_current(generation) {
            tracing::debug!(generation, page, "discarding stale episode page");
            return None;
        }
        self.loading = false;

        match result {
            Ok(loaded) => {
                self.episodes = loaded.results;
                self.page_info = loaded.page_info;
                self.current_page = page;
                self.error = None;

                let default_selection = if self.default_selection_pending && !has_selection {
                    self.episodes.first().map(|episode| episode.id)
                } else {
                    None
                };
                self.default_selection_pending = false;
                default_selection
            }
            Err(err) => {
                tracing::warn!(page, "episode page failed: {}", err.message());
                self.error = Some(err.summary());
                None
            }
        }
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.page_info.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn prev_enabled(&self) -> bool {
        self.current_page > 1 && self.page_info.has_prev()
    }

    pub fn next_enabled(&self) -> bool {
        self.current_page < self.page_info.total_pages && self.page_info.has_next()
    }

    /// The episode list is short enough to list every page.
    pub fn page_items(&self) -> Vec<PageItem> {
        (1..=self.page_info.total_pages)
            .map(|number| PageItem::Page {
                number,
                active: number == self.current_page,
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct CharacterGridState {
    episode_id: Option<EpisodeId>,
    characters: Vec<Character>,
    page_info: PageInfo,
    current_page: u32,
    loading: bool,
    error: Option<String>,
    requests: RequestGeneration,
}

impl Default for CharacterGridState {
    fn default() -> Self {
        Self {
            episode_id: None,
            characters: Vec::new(),
            page_info: PageInfo::default(),
            current_page: 1,
            loading: false,
            error: None,
            requests: RequestGeneration::default(),
        }
    }
}

impl CharacterGridState {
    /// Switches to `episode_id`, always starting over at page 1.
    pub fn show_episode(&mut self, episode_id: EpisodeId) -> CharacterRequest {
        self.episode_id = Some(episode_id);
        self.characters.clear();
        self.page_info = PageInfo::default();
        self.current_page = 1;
        self.request(episode_id)
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<CharacterRequest> {
        let episode_id = self.episode_id?;
        let page = validate_page(page, self.page_info.total_pages).ok()?;
        if page == self.current_page && self.error.is_none() {
            return None;
        }
        self.current_page = page;
        Some(self.request(episode_id))
    }

    pub fn next_page(&mut self) -> Option<CharacterRequest> {
        if !self.next_enabled() {
            return None;
        }
        self.go_to_page(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> Option<CharacterRequest> {
        if !self.prev_enabled() {
            return None;
        }
        self.go_to_page(self.current_page - 1)
    }

    pub fn retry(&mut self) -> Option<CharacterRequest> {
        let episode_id = self.episode_id?;
        Some(self.request(episode_id))
    }

    fn request(&mut self, episode_id: EpisodeId) -> CharacterRequest {
        self.loading = true;
        self.error = None;
        CharacterRequest {
            generation: self.requests.issue(),
            episode_id,
            page: self.current_page,
        }
    }

    /// Applies a finished character batch; returns whether it was current.
    pub fn apply_loaded(
        &mut self,
        generation: u64,
        result: Result<CharacterPage, UiError>,
    ) -> bool {
        if !self.requests.is_current(generation) {
            tracing::debug!(generation, "discarding stale character page");
            return false;
        }
        self.loading = false;

        match result {
            Ok(loaded) => {
                self.current_page = loaded.page;
                self.characters = loaded.characters;
                self.page_info = loaded.page_info;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(
                    episode_id = ?self.episode_id,
                    page = self.current_page,
                    "character page failed: {}",
                    err.message()
                );
                self.characters.clear();
                self.error = Some(err.summary());
            }
        }
        true
    }

    pub fn episode_id(&self) -> Option<EpisodeId> {
        self.episode_id
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.page_info.total_pages
    }

    pub fn total_count(&self) -> u32 {
        self.page_info.total_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn prev_enabled(&self) -> bool {
        self.current_page > 1
    }

    pub fn next_enabled(&self) -> bool {
        self.current_page < self.page_info.total_pages
    }

    pub fn page_items(&self) -> Vec<PageItem> {
        pagination_items(self.current_page, self.page_info.total_pages)
    }
}

/// Root view state: owns the selected episode and forwards selection from
/// the episode list to the character grid.
#[derive(Debug, Default)]
pub struct ViewerState {
    selected_episode: Option<EpisodeId>,
    pub episodes: EpisodeListState,
    pub characters: CharacterGridState,
}

impl ViewerState {
    pub fn mount(&mut self) -> EpisodeRequest {
        self.episodes.mount()
    }

    pub fn selected_episode(&self) -> Option<EpisodeId> {
        self.selected_episode
    }

    /// Selecting the episode that is already selected does nothing, unless
    /// its character page failed; then the page is fetched again.
    pub fn select_episode(&mut self, episode_id: EpisodeId) -> Option<CharacterRequest> {
        if self.selected_episode == Some(episode_id) {
            if self.characters.error().is_some() {
                tracing::info!(episode_id = episode_id.0, "reselected failed episode");
                return self.characters.retry();
            }
            return None;
        }
        tracing::info!(episode_id = episode_id.0, "episode selected");
        self.selected_episode = Some(episode_id);
        Some(self.characters.show_episode(episode_id))
    }

    pub fn apply_episodes(
        &mut self,
        generation: u64,
        page: u32,
        result: Result<EpisodePage, UiError>,
    ) -> Option<CharacterRequest> {
        let has_selection = self.selected_episode.is_some();
        let default_selection =
            self.episodes
                .apply_loaded(generation, page, result, has_selection)?;
        self.select_episode(default_selection)
    }

    pub fn apply_characters(
        &mut self,
        generation: u64,
        result: Result<CharacterPage, UiError>,
    ) -> bool {
        self.characters.apply_loaded(generation, result)
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
