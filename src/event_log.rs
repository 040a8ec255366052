//! An append-only trace of everything that happened during a run.

use serde::{Deserialize, Serialize};

/// Sentinel server index for "outside the system": the source of external
/// arrivals and the destination of departures.
pub const EXTERNAL: usize = usize::MAX;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// An external arrival entered the network at server 0.
    Arrival,
    /// A job left the network from a server.
    Departure,
    /// A completed job moved from one server to another.
    Route,
    /// A job was dropped at a full buffer, either on external arrival or
    /// mid-network.
    Rejection,
}

/// The event trace, stored as five aligned columns so downstream
/// consumers (plots, animations) can scan each column in bulk.
///
/// `times` is nondecreasing. `from`/`to` are server indices with
/// [`EXTERNAL`] marking the outside world, and `states` records the
/// network population immediately after each event.
#[derive(Clone, Debug, Default, Serialize)]
pub struct EventLog {
    times: Vec<f64>,
    kinds: Vec<EventKind>,
    from: Vec<usize>,
    to: Vec<usize>,
    states: Vec<usize>,
}

/// One row of the log, materialized for convenience iteration.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
    pub from: usize,
    pub to: usize,
    pub state_after: usize,
}

impl EventLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            kinds: Vec::with_capacity(capacity),
            from: Vec::with_capacity(capacity),
            to: Vec::with_capacity(capacity),
            states: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(
        &mut self,
        time: f64,
        kind: EventKind,
        from: usize,
        to: usize,
        state_after: usize,
    ) {
        debug_assert!(self.times.last().map_or(true, |&last| time >= last));
        self.times.push(time);
        self.kinds.push(kind);
        self.from.push(from);
        self.to.push(to);
        self.states.push(state_after);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn kinds(&self) -> &[EventKind] {
        &self.kinds
    }

    pub fn from_servers(&self) -> &[usize] {
        &self.from
    }

    pub fn to_servers(&self) -> &[usize] {
        &self.to
    }

    pub fn states(&self) -> &[usize] {
        &self.states
    }

    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        (0..self.len()).map(move |i| Event {
            time: self.times[i],
            kind: self.kinds[i],
            from: self.from[i],
            to: self.to[i],
            state_after: self.states[i],
        })
    }
}
