pub mod checklist;
pub mod config;
pub mod event;
pub mod game;
pub mod memo;
pub mod program;
pub mod schedule;

use anyhow::Result;
use youthplan_core::config::PlannerConfig;
use youthplan_core::store::{EventRecord, EventStore};

use crate::openai::OpenAiClient;

/// Loaded configuration plus the store it points at.
pub struct Context {
    pub config: PlannerConfig,
    pub store: EventStore,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = PlannerConfig::load()?;
        let store = EventStore::from_config(&config);
        Ok(Context { config, store })
    }

    /// Find an event by slug or id, with a hint when there are none at all.
    pub fn event(&self, key: &str) -> Result<EventRecord> {
        match self.store.find(key) {
            Ok(record) => Ok(record),
            Err(e) => {
                if self.store.events()?.is_empty() {
                    anyhow::bail!(
                        "No events found.\n\n\
                        Create your first event with:\n  \
                        youthplan event new <name> --date <YYYY-MM-DD>"
                    );
                }
                Err(e.into())
            }
        }
    }

    pub fn completion_client(&self) -> Result<OpenAiClient> {
        Ok(OpenAiClient::from_config(&self.config)?)
    }
}
