//! Ordered tab list
//!
//! Insertion order is display order. Entries are unique.

use std::sync::Arc;

use crate::error::TabGroupError;
use crate::tab::TabEntry;
use crate::Result;

/// A tab to activate, either by position or by entry
#[derive(Debug, Clone)]
pub enum TabSelector {
    Index(i64),
    Tab(Arc<TabEntry>),
}

impl TabSelector {
    pub fn refers_to(&self, tab: &TabEntry) -> bool {
        matches!(self, TabSelector::Tab(t) if **t == *tab)
    }
}

impl From<usize> for TabSelector {
    fn from(index: usize) -> Self {
        TabSelector::Index(index as i64)
    }
}

impl From<i64> for TabSelector {
    fn from(index: i64) -> Self {
        TabSelector::Index(index)
    }
}

impl From<i32> for TabSelector {
    fn from(index: i32) -> Self {
        TabSelector::Index(index.into())
    }
}

impl From<Arc<TabEntry>> for TabSelector {
    fn from(tab: Arc<TabEntry>) -> Self {
        TabSelector::Tab(tab)
    }
}

impl From<&Arc<TabEntry>> for TabSelector {
    fn from(tab: &Arc<TabEntry>) -> Self {
        TabSelector::Tab(Arc::clone(tab))
    }
}

#[derive(Debug, Default)]
pub(crate) struct TabList {
    tabs: Vec<Arc<TabEntry>>,
}

impl TabList {
    /// Append a tab. Returns false if it is already present.
    pub fn push(&mut self, tab: Arc<TabEntry>) -> bool {
        if self.contains(&tab) {
            return false;
        }
        self.tabs.push(tab);
        true
    }

    /// Remove a tab, returning the index it had
    pub fn remove(&mut self, tab: &TabEntry) -> Option<usize> {
        let index = self.index_of(tab)?;
        self.tabs.remove(index);
        Some(index)
    }

    pub fn index_of(&self, tab: &TabEntry) -> Option<usize> {
        self.tabs.iter().position(|t| **t == *tab)
    }

    pub fn contains(&self, tab: &TabEntry) -> bool {
        self.index_of(tab).is_some()
    }

    pub fn get(&self, index: i64) -> Option<Arc<TabEntry>> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.tabs.get(i))
            .cloned()
    }

    pub fn first(&self) -> Option<Arc<TabEntry>> {
        self.tabs.first().cloned()
    }

    /// Resolve a selector to a member of this list
    pub fn resolve(&self, selector: &TabSelector) -> Result<Arc<TabEntry>> {
        match selector {
            TabSelector::Index(index) => self
                .get(*index)
                .ok_or(TabGroupError::InvalidTabIndex(*index)),
            TabSelector::Tab(tab) if self.contains(tab) => Ok(Arc::clone(tab)),
            TabSelector::Tab(tab) => Err(TabGroupError::ForeignTab(tab.id())),
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Copy of the list, safe to iterate while the list changes
    pub fn snapshot(&self) -> Vec<Arc<TabEntry>> {
        self.tabs.clone()
    }
}
