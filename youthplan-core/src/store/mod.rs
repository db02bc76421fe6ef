//! Local datastore: one directory per event under the data directory.
//!
//! ```text
//! ~/youthplan/
//!   2025-여름-수련회/
//!     event.json
//! ```

mod record;

pub use record::EventRecord;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::PlannerConfig;
use crate::error::{PlannerError, PlannerResult};
use crate::event::Event;
use crate::utils::slugify;

const RECORD_FILE: &str = "event.json";
const MAX_SLUG_SUFFIX: u32 = 100;

#[derive(Debug, Clone)]
pub struct EventStore {
    root: PathBuf,
}

impl EventStore {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        EventStore { root: root.into() }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::open(config.data_path())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, slug: &str) -> PathBuf {
        self.root.join(slug).join(RECORD_FILE)
    }

    /// All events, ordered by date then name.
    pub fn events(&self) -> PlannerResult<Vec<EventRecord>> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Ok(Vec::new());
        };

        let mut records: Vec<EventRecord> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir() && path.join(RECORD_FILE).exists())
            .filter_map(|path| {
                let slug = path.file_name()?.to_str()?.to_string();
                match self.load(&slug) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        debug!(slug = %slug, error = %e, "Skipping unreadable event");
                        None
                    }
                }
            })
            .collect();

        records.sort_by(|a, b| {
            a.event
                .date
                .cmp(&b.event.date)
                .then_with(|| a.event.name.cmp(&b.event.name))
        });
        Ok(records)
    }

    pub fn load(&self, slug: &str) -> PlannerResult<EventRecord> {
        let path = self.record_path(slug);
        if !path.exists() {
            return Err(PlannerError::EventNotFound(slug.to_string()));
        }

        let content = std::fs::read_to_string(&path)?;
        let mut record: EventRecord = serde_json::from_str(&content).map_err(|e| {
            PlannerError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        record.slug = slug.to_string();
        Ok(record)
    }

    /// Look an event up by slug, id, or id prefix.
    pub fn find(&self, key: &str) -> PlannerResult<EventRecord> {
        if self.record_path(key).exists() {
            return self.load(key);
        }

        let mut matches: Vec<EventRecord> = self
            .events()?
            .into_iter()
            .filter(|r| r.event.id == key || (!key.is_empty() && r.event.id.starts_with(key)))
            .collect();

        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(PlannerError::EventNotFound(key.to_string())),
            n => Err(PlannerError::InvalidInput(format!(
                "Event '{}' is ambiguous ({} matches)",
                key, n
            ))),
        }
    }

    pub fn create_event(&self, event: Event) -> PlannerResult<EventRecord> {
        let slug = self.unique_slug_for(&event)?;
        let record = EventRecord::new(slug, event);
        self.save(&record)?;
        Ok(record)
    }

    pub fn save(&self, record: &EventRecord) -> PlannerResult<()> {
        let path = self.record_path(&record.slug);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, content)?;
        debug!(slug = %record.slug, "Saved event");
        Ok(())
    }

    pub fn delete_event(&self, slug: &str) -> PlannerResult<()> {
        let dir = self.root.join(slug);
        if !dir.join(RECORD_FILE).exists() {
            return Err(PlannerError::EventNotFound(slug.to_string()));
        }
        std::fs::remove_dir_all(dir)?;
        Ok(())
    }

    /// `<date>-<name>` slug; on collision tries `-2`, `-3`, ...
    fn unique_slug_for(&self, event: &Event) -> PlannerResult<String> {
        let name = slugify(&event.name);
        let base = if name.is_empty() {
            event.date.format("%Y-%m-%d").to_string()
        } else {
            format!("{}-{}", event.date.format("%Y-%m-%d"), name)
        };

        if !self.root.join(&base).exists() {
            return Ok(base);
        }

        for n in 2..=MAX_SLUG_SUFFIX {
            let suffixed = format!("{}-{}", base, n);
            if !self.root.join(&suffixed).exists() {
                return Ok(suffixed);
            }
        }

        Err(PlannerError::Config(format!(
            "Too many event name collisions for '{}'",
            base
        )))
    }
}
