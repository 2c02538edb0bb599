use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::share;

use super::catalog::{Catalog, ResolvedService};

#[derive(Debug, Error)]
pub enum NavError {
    #[error("Unknown service: {0}")]
    UnknownService(String),
}

/// The session's mutable state: which service is active, the search query
/// and the per-group collapse flags. The catalog itself never changes
/// after startup; everything the UI can mutate funnels through here.
///
/// Invariant: at most one service is active, and activating one clears the
/// search query so the new active service is always visible.
pub struct Navigator {
    catalog: Catalog,
    collapsed: Vec<bool>,
    active: Option<String>,
    query: String,
    page_url: Url,
}

impl Navigator {
    pub fn new(catalog: Catalog, page_url: Url) -> Navigator {
        let collapsed = vec![false; catalog.groups.len()];
        Navigator {
            catalog,
            collapsed,
            active: None,
            query: String::new(),
            page_url,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The page URL carrying the shareable state. Reloading this URL
    /// restores the same active service.
    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    pub fn active(&self) -> Option<&ResolvedService> {
        self.active.as_deref().and_then(|id| self.catalog.get(id))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Restores the active service from the page URL: a known recorded id
    /// wins, anything else falls back to the first service. An empty
    /// catalog stays in the "none selected" state.
    pub fn restore(&mut self) {
        if let Some(id) = share::active_service(&self.page_url) {
            if self.catalog.get(&id).is_some() {
                self.activate_known(&id);
                return;
            }
            warn!(service = %id, "Unknown service in page state, falling back to first");
        }

        let first = self.catalog.services().next().map(|s| s.id.clone());
        if let Some(first) = first {
            self.activate_known(&first);
        }
    }

    /// Makes `id` the single active service: clears the search query,
    /// expands its group if collapsed and records the id in the page URL.
    pub fn activate(&mut self, id: &str) -> Result<(), NavError> {
        if self.catalog.get(id).is_none() {
            return Err(NavError::UnknownService(id.to_string()));
        }
        self.activate_known(id);
        Ok(())
    }

    /// Activates the next navigable service, wrapping past the end.
    pub fn next(&mut self) {
        self.step(1);
    }

    /// Activates the previous navigable service, wrapping past the start.
    pub fn previous(&mut self) {
        self.step(-1);
    }

    /// Updates the search filter. Never changes which service is active.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn toggle_group(&mut self, index: usize) {
        if let Some(flag) = self.collapsed.get_mut(index) {
            *flag = !*flag;
        }
    }

    pub fn is_collapsed(&self, index: usize) -> bool {
        self.collapsed.get(index).copied().unwrap_or(false)
    }

    /// Search-filter visibility of a single service.
    pub fn matches_query(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.query.to_lowercase())
    }

    /// A group is visible while at least one of its services matches the
    /// search filter.
    pub fn is_group_visible(&self, index: usize) -> bool {
        self.catalog
            .groups
            .get(index)
            .map(|group| group.services.iter().any(|s| self.matches_query(&s.name)))
            .unwrap_or(false)
    }

    // Keyboard navigation walks the services that are actually on screen:
    // matching the search filter, inside an expanded group.
    fn navigable_ids(&self) -> Vec<String> {
        self.catalog
            .groups
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.is_collapsed(*index))
            .flat_map(|(_, group)| group.services.iter())
            .filter(|service| self.matches_query(&service.name))
            .map(|service| service.id.clone())
            .collect()
    }

    fn step(&mut self, delta: isize) {
        let visible = self.navigable_ids();
        if visible.is_empty() {
            return;
        }

        let position = self
            .active
            .as_ref()
            .and_then(|id| visible.iter().position(|candidate| candidate == id));

        // With nothing active (or the active service filtered out), both
        // directions land on the first visible entry.
        let target = match position {
            Some(pos) => {
                let len = visible.len() as isize;
                let index = (pos as isize + delta).rem_euclid(len) as usize;
                visible[index].clone()
            }
            None => visible[0].clone(),
        };

        self.activate_known(&target);
    }

    // The id must exist in the catalog. The whole transition happens in one
    // call so callers never observe a half-switched state.
    fn activate_known(&mut self, id: &str) {
        if let Some(group_index) = self.group_index_of(id) {
            self.collapsed[group_index] = false;
        }
        self.query.clear();
        self.active = Some(id.to_string());
        share::set_active_service(&mut self.page_url, id);
        debug!(service = %id, "Service activated");
    }

    fn group_index_of(&self, id: &str) -> Option<usize> {
        self.catalog
            .groups
            .iter()
            .position(|group| group.services.iter().any(|service| service.id == id))
    }
}
