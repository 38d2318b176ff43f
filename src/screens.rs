//! View models for the saved-movies list and the movie detail screen.
//!
//! These hold no rendering code; a UI layer (or the command-line driver)
//! turns the returned rows and views into output.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{format_money, MovieDetail, PosterSize};
use crate::saved::SavedMovies;
use crate::tmdb::CatalogApi;

const NOT_AVAILABLE: &str = "N/A";

pub fn detail_route(id: i64) -> String {
    format!("/movies/{id}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedRow {
    pub id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    /// `"YYYY • N/10"`
    pub subtitle: String,
    pub route: String,
}

pub struct SavedScreen {
    saved: Arc<SavedMovies>,
    rows: Vec<SavedRow>,
}

impl SavedScreen {
    pub const EMPTY_MESSAGE: &'static str = "No saved movies yet";

    pub fn new(saved: Arc<SavedMovies>) -> Self {
        Self {
            saved,
            rows: Vec::new(),
        }
    }

    /// Reloads the list. Called every time the screen becomes visible.
    pub async fn on_focus(&mut self) -> &[SavedRow] {
        self.rows = self
            .saved
            .list()
            .await
            .into_iter()
            .map(|m| SavedRow {
                id: m.id,
                subtitle: format!(
                    "{} • {}",
                    m.release_year().unwrap_or_default(),
                    m.rating_label()
                ),
                poster_url: m.poster_url(PosterSize::W200),
                route: detail_route(m.id),
                title: m.title,
            })
            .collect();
        debug!(count = self.rows.len(), "Saved screen refreshed");
        &self.rows
    }

    pub fn rows(&self) -> &[SavedRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(MovieDetail),
    Failed { message: String, not_found: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub year: Option<String>,
    pub runtime: Option<String>,
    pub rating: String,
    pub votes: String,
    pub poster_url: Option<String>,
    pub is_saved: bool,
    pub info: Vec<InfoRow>,
}

/// Dropping the screen does not cancel an in-flight fetch; this flag
/// makes the late result get thrown away instead.
#[derive(Debug, Clone, Default)]
pub struct UnmountHandle(Arc<AtomicBool>);

impl UnmountHandle {
    pub fn unmount(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn is_unmounted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct DetailScreen {
    catalog: Arc<dyn CatalogApi>,
    saved: Arc<SavedMovies>,
    id: String,
    state: DetailState,
    is_saved: bool,
    unmounted: UnmountHandle,
}

impl DetailScreen {
    pub fn new(catalog: Arc<dyn CatalogApi>, saved: Arc<SavedMovies>, id: impl Into<String>) -> Self {
        Self {
            catalog,
            saved,
            id: id.into(),
            state: DetailState::Loading,
            is_saved: false,
            unmounted: UnmountHandle::default(),
        }
    }

    pub fn unmount_handle(&self) -> UnmountHandle {
        self.unmounted.clone()
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_saved(&self) -> bool {
        self.is_saved
    }

    /// Fetches the detail and, when it differs from what is shown,
    /// re-reads the saved flag. Returns `false` if the result was
    /// discarded because the screen went away meanwhile.
    pub async fn load(&mut self) -> bool {
        let result = self.catalog.fetch_movie_details(&self.id).await;
        if self.unmounted.is_unmounted() {
            debug!("Detail screen for {} unmounted, discarding fetch result", self.id);
            return false;
        }
        match result {
            Ok(detail) => {
                let changed = !matches!(&self.state, DetailState::Loaded(prev) if *prev == detail);
                if changed {
                    self.is_saved = self.saved.contains(detail.id()).await;
                }
                self.state = DetailState::Loaded(detail);
            }
            Err(e) => {
                warn!("Failed to load movie {}: {}", self.id, e);
                self.state = DetailState::Failed {
                    not_found: e.is_not_found(),
                    message: e.to_string(),
                };
            }
        }
        true
    }

    /// Saves or unsaves the shown movie. `None` while nothing is loaded.
    pub async fn toggle_saved(&mut self) -> Option<bool> {
        let DetailState::Loaded(detail) = &self.state else {
            return None;
        };
        self.is_saved = self.saved.toggle(detail.summary()).await;
        Some(self.is_saved)
    }

    /// Saves the shown movie unless it already is. Returns whether the
    /// saved list changed; `None` while nothing is loaded.
    pub async fn save(&mut self) -> Option<bool> {
        if !matches!(self.state, DetailState::Loaded(_)) {
            return None;
        }
        if self.is_saved {
            return Some(false);
        }
        self.toggle_saved().await
    }

    /// Counterpart of [`DetailScreen::save`].
    pub async fn unsave(&mut self) -> Option<bool> {
        if !matches!(self.state, DetailState::Loaded(_)) {
            return None;
        }
        if !self.is_saved {
            return Some(false);
        }
        self.toggle_saved().await.map(|now_saved| !now_saved)
    }

    pub fn view(&self) -> Option<DetailView> {
        let DetailState::Loaded(detail) = &self.state else {
            return None;
        };
        let summary = &detail.summary;
        let info = vec![
            info_row("Overview", Some(detail.overview.clone())),
            info_row("Genres", join_names(detail.genre_names())),
            info_row("Budget", format_money(detail.budget)),
            info_row("Revenue", format_money(detail.revenue)),
            info_row("Production Companies", join_names(detail.company_names())),
        ];
        Some(DetailView {
            title: summary.title.clone(),
            year: summary.release_year(),
            runtime: detail.runtime.filter(|r| *r > 0).map(|r| format!("{r}m")),
            rating: summary.rating_label(),
            votes: format!("({} votes)", detail.vote_count),
            poster_url: summary.poster_url(PosterSize::W500),
            is_saved: self.is_saved,
            info,
        })
    }
}

fn join_names(names: Vec<String>) -> Option<String> {
    if names.is_empty() {
        None
    } else {
        Some(names.join(" • "))
    }
}

fn info_row(label: &'static str, value: Option<String>) -> InfoRow {
    InfoRow {
        label,
        value: value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}
