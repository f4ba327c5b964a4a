use std::fmt;

use serde::{Deserialize, Serialize};

use necsim_core::{event::Event, reporter::Reporter};
use necsim_core_bond::NonNegativeF64;

pub mod recorder;
pub mod replay;

#[derive(Serialize, Deserialize, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct EventLogHeader {
    min_generation: NonNegativeF64,
    max_generation: NonNegativeF64,

    length: usize,
}

impl fmt::Debug for EventLogHeader {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("EventLogHeader")
            .field("min_generation", &self.min_generation)
            .field("max_generation", &self.max_generation)
            .field("length", &self.length)
            .finish()
    }
}

impl EventLogHeader {
    #[must_use]
    pub fn new(min_generation: NonNegativeF64, max_generation: NonNegativeF64, length: usize) -> Self {
        Self {
            min_generation,
            max_generation,
            length,
        }
    }

    /// Summarises a non-empty run of consecutive events
    #[must_use]
    #[debug_requires(!events.is_empty(), "segments are never empty")]
    pub fn of(events: &[Event]) -> Self {
        Self::new(
            events[0].generation(),
            events[events.len() - 1].generation(),
            events.len(),
        )
    }

    #[must_use]
    pub fn min_generation(&self) -> NonNegativeF64 {
        self.min_generation
    }

    #[must_use]
    pub fn max_generation(&self) -> NonNegativeF64 {
        self.max_generation
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }
}

/// In-memory event log, mostly useful for comparing runs
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Serialises the log with the same encoding as the on-disk segments
    ///
    /// # Errors
    ///
    /// Fails if an event cannot be encoded.
    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bincode::serialize(&self.events)?)
    }

    /// Feeds the logged events, in order, into `reporter`
    pub fn replay_into<R: Reporter>(&self, reporter: &mut R) {
        for event in &self.events {
            reporter.report_event(event);
        }
    }
}

impl Reporter for EventLog {
    fn report_event(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}
