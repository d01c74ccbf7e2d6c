//! An explicit cache for the set list.
//!
//! The full set list changes a handful of times a year. Instead of refetching
//! it per lookup, callers hold an [`EditionCache`] and refresh it only when
//! the source reports newer data than the cache was built from.

use std::time::SystemTime;

use crate::client::Set;
use crate::error::Result;

/// A point-in-time copy of the set list.
#[derive(Debug, Clone)]
pub struct EditionCache {
    sets: Vec<Set>,
    fetched_at: SystemTime,
}

impl EditionCache {
    /// Build a cache from a freshly fetched set list.
    pub fn new(sets: Vec<Set>, fetched_at: SystemTime) -> Self {
        Self { sets, fetched_at }
    }

    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    pub fn fetched_at(&self) -> SystemTime {
        self.fetched_at
    }

    /// Look up a set by code.
    pub fn find(&self, code: &str) -> Option<&Set> {
        let code = code.to_lowercase();
        self.sets.iter().find(|s| s.code == code)
    }

    /// True when the source has published data newer than this cache.
    pub fn is_stale(&self, source_last_modified: SystemTime) -> bool {
        source_last_modified > self.fetched_at
    }

    /// Refresh through `fetch` when the source is newer than the cache.
    /// Returns whether a refresh happened.
    pub fn refresh_if_stale<F>(
        &mut self,
        now: SystemTime,
        source_last_modified: SystemTime,
        fetch: F,
    ) -> Result<bool>
    where
        F: FnOnce() -> Result<Vec<Set>>,
    {
        if !self.is_stale(source_last_modified) {
            return Ok(false);
        }
        self.sets = fetch()?;
        self.fetched_at = now;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::Error;

    fn set(code: &str) -> Set {
        Set {
            code: code.to_string(),
            name: format!("Set {code}"),
            released_at: None,
        }
    }

    #[test]
    fn fresh_source_leaves_the_cache_alone() {
        let fetched = SystemTime::UNIX_EPOCH + Duration::from_secs(1000);
        let mut cache = EditionCache::new(vec![set("m20")], fetched);

        let refreshed = cache
            .refresh_if_stale(fetched + Duration::from_secs(60), fetched, || {
                panic!("fetch must not run")
            })
            .unwrap();

        assert!(!refreshed);
        assert_eq!(cache.sets().len(), 1);
    }

    #[test]
    fn newer_source_triggers_a_refresh() {
        let fetched = SystemTime::UNIX_EPOCH + Duration::from_secs(1000);
        let modified = fetched + Duration::from_secs(30);
        let now = fetched + Duration::from_secs(60);
        let mut cache = EditionCache::new(vec![set("m20")], fetched);

        let refreshed = cache
            .refresh_if_stale(now, modified, || Ok(vec![set("m20"), set("m21")]))
            .unwrap();

        assert!(refreshed);
        assert_eq!(cache.sets().len(), 2);
        assert_eq!(cache.fetched_at(), now);
    }

    #[test]
    fn failed_refresh_keeps_the_old_data() {
        let fetched = SystemTime::UNIX_EPOCH + Duration::from_secs(1000);
        let modified = fetched + Duration::from_secs(30);
        let mut cache = EditionCache::new(vec![set("m20")], fetched);

        let err = cache
            .refresh_if_stale(modified, modified, || Err(Error::ConnectionRefused))
            .unwrap_err();

        assert!(matches!(err, Error::ConnectionRefused));
        assert_eq!(cache.sets().len(), 1);
        assert_eq!(cache.fetched_at(), fetched);
    }

    #[test]
    fn find_is_case_insensitive() {
        let cache = EditionCache::new(vec![set("m20")], SystemTime::UNIX_EPOCH);
        assert!(cache.find("M20").is_some());
        assert!(cache.find("xyz").is_none());
    }
}
