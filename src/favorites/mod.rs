//! Favorite keywords and the recommendations derived from them
//!
//! [`FavoritesController`] owns the displayed triple
//! `(favorites, top faculty, top universities)` and moves it between states
//! in response to [`FavoritesEvent`]s. The relational store is the source
//! of truth; every mutation writes there first, updates the cached
//! favorites, then recomputes both recommendation lists in full.
//!
//! Events that resolve to nothing (empty keyword, duplicate add, removal of
//! a keyword that is not a favorite) leave the triple untouched and issue no
//! recommendation queries.

pub mod recommend;

use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::store::{RecommendationEntry, RelationalStore, StoreError};
pub use recommend::{recompute, Recommendations};

/// Favorites errors
#[derive(Error, Debug)]
pub enum FavoritesError {
    /// The favorites write or read did not go through; state is unchanged
    #[error("Favorites store error: {0}")]
    Store(#[from] StoreError),
}

pub type FavoritesResult<T> = Result<T, FavoritesError>;

/// User actions on the favorites panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "keyword", rename_all = "snake_case")]
pub enum FavoritesEvent {
    /// Add-to-favorites button with the selected keyword
    Add(String),
    /// Row delete gesture carrying the deleted keyword
    Remove(String),
    /// The favorites table now shows exactly these keywords
    TableEdited(Vec<String>),
    /// Re-read favorites from the store and recompute
    Refresh,
}

/// Why an event left the state unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    EmptyKeyword,
    AlreadyFavorite,
    NotFavorite,
    NothingRemoved,
}

/// What an event did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionKind {
    Added { keyword: String },
    Removed { keyword: String },
    Refreshed,
    Unchanged { reason: NoOpReason },
}

/// The displayed favorites panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FavoritesSnapshot {
    pub favorites: Vec<String>,
    pub top_faculty: Vec<RecommendationEntry>,
    pub top_universities: Vec<RecommendationEntry>,
    /// True when the last recompute or refresh failed and the lists may be
    /// empty for that reason rather than for lack of data
    pub degraded: bool,
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub change: TransitionKind,
    pub snapshot: FavoritesSnapshot,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        matches!(self.change, TransitionKind::Unchanged { .. })
    }
}

/// Single-writer state machine over the favorites panel
pub struct FavoritesController {
    store: Arc<dyn RelationalStore>,
    favorites: IndexSet<String>,
    top_faculty: Vec<RecommendationEntry>,
    top_universities: Vec<RecommendationEntry>,
    degraded: bool,
    /// The cached favorites were not confirmed by the last store read
    stale: bool,
}

impl FavoritesController {
    /// Controller with an empty cache; call [`Self::load`] to seed from the store
    pub fn new(store: Arc<dyn RelationalStore>) -> Self {
        Self {
            store,
            favorites: IndexSet::new(),
            top_faculty: Vec::new(),
            top_universities: Vec::new(),
            degraded: false,
            stale: true,
        }
    }

    /// Controller seeded from the store.
    ///
    /// A store that cannot be read yields an empty, degraded panel rather
    /// than an error so the dashboard still starts. The next event retries
    /// the read before acting on the cache.
    pub async fn load(store: Arc<dyn RelationalStore>) -> Self {
        let mut controller = Self::new(store);
        if let Err(e) = controller.refresh().await {
            warn!("Could not load favorites: {}", e);
            controller.degraded = true;
        }
        controller
    }

    pub fn favorites(&self) -> &IndexSet<String> {
        &self.favorites
    }

    pub fn snapshot(&self) -> FavoritesSnapshot {
        FavoritesSnapshot {
            favorites: self.favorites.iter().cloned().collect(),
            top_faculty: self.top_faculty.clone(),
            top_universities: self.top_universities.clone(),
            degraded: self.degraded,
        }
    }

    /// Apply one event to completion.
    ///
    /// On `Err` the store write did not happen (or its outcome is unknown)
    /// and the cached state is exactly what it was before the call.
    pub async fn apply(&mut self, event: FavoritesEvent) -> FavoritesResult<Transition> {
        debug!("favorites event: {:?}", event);
        if self.stale && event != FavoritesEvent::Refresh {
            if let Err(e) = self.refresh().await {
                warn!("Favorites still unreadable, acting on cached set: {}", e);
            }
        }

        let change = match event {
            FavoritesEvent::Add(keyword) => self.add(&keyword).await?,
            FavoritesEvent::Remove(keyword) => self.remove(&keyword).await?,
            FavoritesEvent::TableEdited(observed) => match self.removed_row(&observed) {
                Some(keyword) => self.remove(&keyword).await?,
                None => TransitionKind::Unchanged {
                    reason: NoOpReason::NothingRemoved,
                },
            },
            FavoritesEvent::Refresh => {
                self.refresh().await?;
                TransitionKind::Refreshed
            }
        };
        Ok(Transition {
            change,
            snapshot: self.snapshot(),
        })
    }

    async fn add(&mut self, keyword: &str) -> FavoritesResult<TransitionKind> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(TransitionKind::Unchanged {
                reason: NoOpReason::EmptyKeyword,
            });
        }
        if self.favorites.contains(keyword) {
            return Ok(TransitionKind::Unchanged {
                reason: NoOpReason::AlreadyFavorite,
            });
        }

        self.store.add_favorite(keyword).await.map_err(|e| {
            error!("Failed to add favorite {:?}: {}", keyword, e);
            e
        })?;
        info!("Added favorite keyword {:?}", keyword);

        self.sync_after_write(|favorites| {
            favorites.insert(keyword.to_string());
        })
        .await;
        Ok(TransitionKind::Added {
            keyword: keyword.to_string(),
        })
    }

    async fn remove(&mut self, keyword: &str) -> FavoritesResult<TransitionKind> {
        if !self.favorites.contains(keyword) {
            return Ok(TransitionKind::Unchanged {
                reason: NoOpReason::NotFavorite,
            });
        }

        self.store.remove_favorite(keyword).await.map_err(|e| {
            error!("Failed to remove favorite {:?}: {}", keyword, e);
            e
        })?;
        info!("Removed favorite keyword {:?}", keyword);

        self.sync_after_write(|favorites| {
            favorites.shift_remove(keyword);
        })
        .await;
        Ok(TransitionKind::Removed {
            keyword: keyword.to_string(),
        })
    }

    async fn refresh(&mut self) -> FavoritesResult<()> {
        let listed = self.store.list_favorites().await?;
        self.favorites = listed.into_iter().collect();
        self.stale = false;
        self.recompute().await;
        Ok(())
    }

    /// Re-read the favorites after a committed write and recompute.
    ///
    /// If the read fails the committed change is applied to the cache with
    /// `fallback` and the panel is marked degraded.
    async fn sync_after_write<F>(&mut self, fallback: F)
    where
        F: FnOnce(&mut IndexSet<String>),
    {
        match self.store.list_favorites().await {
            Ok(listed) => {
                self.favorites = listed.into_iter().collect();
                self.stale = false;
            }
            Err(e) => {
                warn!("Could not re-read favorites after write: {}", e);
                fallback(&mut self.favorites);
                self.stale = true;
            }
        }
        self.recompute().await;
    }

    /// First cached favorite missing from `observed`. Only one row is
    /// resolved per event; further missing rows are left for later events.
    fn removed_row(&self, observed: &[String]) -> Option<String> {
        let observed: std::collections::HashSet<&str> =
            observed.iter().map(String::as_str).collect();
        let mut missing = self
            .favorites
            .iter()
            .filter(|k| !observed.contains(k.as_str()));
        let first = missing.next().cloned();
        let ignored = missing.count();
        if ignored > 0 {
            warn!(
                "Favorites table lost {} rows in one edit; removing {:?} only",
                ignored + 1,
                first
            );
        }
        first
    }

    async fn recompute(&mut self) {
        let recs = recompute(self.store.as_ref()).await;
        self.degraded = recs.is_degraded() || self.stale;
        self.top_faculty = recs.top_faculty.into_rows();
        self.top_universities = recs.top_universities.into_rows();
    }
}
