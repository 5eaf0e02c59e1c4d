#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! One-shot scripted boss events keyed by absolute level time.

use std::time::Duration;

use survivor_core::{ScriptedEvent, ScriptedEventId};

/// Ordered timeline of scripted events, each firing at most once.
#[derive(Debug)]
pub struct ScriptedEventTimeline {
    events: Vec<ScriptedEvent>,
    fired: Vec<bool>,
}

impl ScriptedEventTimeline {
    /// Creates a timeline from events in authoring order.
    #[must_use]
    pub fn new(events: Vec<ScriptedEvent>) -> Self {
        let fired = vec![false; events.len()];
        Self { events, fired }
    }

    /// Marks every unfired event whose trigger time `elapsed` strictly exceeds and
    /// appends its identifier to `out` in authoring order.
    pub fn fire_due(&mut self, elapsed: Duration, out: &mut Vec<ScriptedEventId>) {
        for (event, fired) in self.events.iter().zip(self.fired.iter_mut()) {
            if *fired || elapsed <= event.trigger {
                continue;
            }
            *fired = true;
            out.push(event.id);
        }
    }

    /// Looks up an event by identifier.
    #[must_use]
    pub fn event(&self, id: ScriptedEventId) -> Option<&ScriptedEvent> {
        self.events.get(id.get() as usize)
    }

    /// Number of events that have not fired yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.fired.iter().filter(|fired| !**fired).count()
    }
}
