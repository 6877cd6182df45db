//! Travel-mode resolution against the provider's catalog.
//!
//! The catalog is fetched lazily on first use and then kept in an owned
//! [`TravelModeCache`]. It is never refreshed on its own; long-lived
//! processes call [`TravelModeResolver::invalidate`] or
//! [`TravelModeResolver::refresh`] when the provider's modes may have
//! changed.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::RoutingError;
use crate::model::TravelProfile;
use crate::traits::RouteProvider;

/// A travel mode as described by the provider.
///
/// Only `name` is interpreted; every other field is kept verbatim so the
/// mode can be sent back exactly as the provider described it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelMode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl TravelMode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            attributes: Map::new(),
        }
    }
}

/// Provider mode names acceptable for a profile, most preferred first.
pub fn candidate_mode_names(profile: TravelProfile) -> &'static [&'static str] {
    match profile {
        TravelProfile::Car => &["Driving Time", "Driving Distance"],
        TravelProfile::Bicycle => &["Biking Time", "Biking Distance", "Walking Time"],
        TravelProfile::Pedestrian => &["Walking Time", "Walking Distance"],
    }
}

/// Pick the catalog entry for `profile`.
///
/// Candidates are tried in priority order. When none is present the first
/// catalog entry is used; an empty catalog yields `None`.
pub fn select_travel_mode(catalog: &[TravelMode], profile: TravelProfile) -> Option<&TravelMode> {
    for candidate in candidate_mode_names(profile) {
        if let Some(mode) = catalog
            .iter()
            .find(|mode| mode.name.trim().eq_ignore_ascii_case(candidate))
        {
            return Some(mode);
        }
    }

    let fallback = catalog.first();
    if let Some(mode) = fallback {
        warn!(
            profile = %profile,
            mode = %mode.name,
            "no matching travel mode in catalog, using first entry"
        );
    }
    fallback
}

/// Process-lifetime cache of the provider's travel-mode catalog.
#[derive(Debug, Default)]
pub struct TravelModeCache {
    catalog: RwLock<Option<Arc<Vec<TravelMode>>>>,
}

impl TravelModeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<Vec<TravelMode>>> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the cached catalog. Concurrent writers race; the last one wins.
    pub fn store(&self, modes: Vec<TravelMode>) -> Arc<Vec<TravelMode>> {
        let modes = Arc::new(modes);
        *self
            .catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&modes));
        modes
    }

    pub fn invalidate(&self) {
        self.catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    pub fn is_populated(&self) -> bool {
        self.get().is_some()
    }
}

/// Maps travel profiles to provider travel modes.
#[derive(Debug, Default)]
pub struct TravelModeResolver {
    cache: TravelModeCache,
}

impl TravelModeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: TravelModeCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &TravelModeCache {
        &self.cache
    }

    /// The cached catalog, fetching it on first use.
    ///
    /// A failed fetch leaves the cache empty so the next call tries again.
    pub fn catalog<P>(&self, provider: &P) -> Result<Arc<Vec<TravelMode>>, RoutingError>
    where
        P: RouteProvider + ?Sized,
    {
        if let Some(catalog) = self.cache.get() {
            return Ok(catalog);
        }
        self.refresh(provider)
    }

    /// Fetch the catalog again and replace the cached copy.
    pub fn refresh<P>(&self, provider: &P) -> Result<Arc<Vec<TravelMode>>, RoutingError>
    where
        P: RouteProvider + ?Sized,
    {
        let modes = provider.fetch_travel_modes()?;
        debug!(count = modes.len(), "cached travel mode catalog");
        Ok(self.cache.store(modes))
    }

    pub fn invalidate(&self) {
        debug!("travel mode catalog invalidated");
        self.cache.invalidate();
    }

    pub fn resolve<P>(
        &self,
        provider: &P,
        profile: TravelProfile,
    ) -> Result<Option<TravelMode>, RoutingError>
    where
        P: RouteProvider + ?Sized,
    {
        let catalog = self.catalog(provider)?;
        Ok(select_travel_mode(&catalog, profile).cloned())
    }
}
