//! Reloadable calendar snapshot.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::calendar::CalendarStore;
use crate::error::OpexResult;
use crate::source::load_calendar;
use crate::tier::TierDefinitions;

/// The calendar currently being served.
///
/// Readers get an `Arc` to an immutable store. A reload builds a complete new
/// store first and only swaps it in once it has validated, so a failed reload
/// keeps the last good calendar active.
#[derive(Debug)]
pub struct SharedCalendar {
    current: RwLock<Arc<CalendarStore>>,
}

impl SharedCalendar {
    pub fn new(store: CalendarStore) -> Self {
        SharedCalendar {
            current: RwLock::new(Arc::new(store)),
        }
    }

    pub fn load(path: &Path, tiers: TierDefinitions) -> OpexResult<Self> {
        Ok(Self::new(load_calendar(path, tiers)?))
    }

    pub fn current(&self) -> Arc<CalendarStore> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the snapshot with the calendar at `path`. Returns the new event count.
    pub fn reload(&self, path: &Path, tiers: TierDefinitions) -> OpexResult<usize> {
        let store = match load_calendar(path, tiers) {
            Ok(store) => store,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Calendar reload failed; keeping previous snapshot");
                return Err(e);
            }
        };

        let count = store.len();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(store);

        info!(path = %path.display(), events = count, "Calendar reloaded");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_calendar(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reload_swaps_in_new_calendar() {
        let first = write_calendar(
            r#"{ "events": { "standard_expirations": [ { "date": "2026-01-16" } ] } }"#,
        );
        let shared = SharedCalendar::load(first.path(), TierDefinitions::default()).unwrap();
        assert_eq!(shared.current().len(), 1);

        let second = write_calendar(
            r#"{ "events": { "standard_expirations": [ { "date": "2026-01-16" }, { "date": "2026-02-20" } ] } }"#,
        );
        let count = shared.reload(second.path(), TierDefinitions::default()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(shared.current().len(), 2);
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let good = write_calendar(
            r#"{ "events": { "standard_expirations": [ { "date": "2026-01-16" } ] } }"#,
        );
        let shared = SharedCalendar::load(good.path(), TierDefinitions::default()).unwrap();
        let before = shared.current();

        let bad = write_calendar(
            r#"{ "events": { "standard_expirations": [ { "date": "2026-02-20" }, { "date": "next week" } ] } }"#,
        );
        let err = shared.reload(bad.path(), TierDefinitions::default()).unwrap_err();
        assert!(err.is_malformed_calendar());

        let after = shared.current();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.events()[0].date.to_string(), "2026-01-16");
    }

    #[test]
    fn readers_keep_their_snapshot_across_reload() {
        let first = write_calendar(
            r#"{ "events": { "standard_expirations": [ { "date": "2026-01-16" } ] } }"#,
        );
        let shared = SharedCalendar::load(first.path(), TierDefinitions::default()).unwrap();
        let held = shared.current();

        let second = write_calendar(r#"{ "events": {} }"#);
        shared.reload(second.path(), TierDefinitions::default()).unwrap();

        assert_eq!(held.len(), 1);
        assert!(shared.current().is_empty());
    }
}
