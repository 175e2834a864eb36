pub use crate::enums::*;
use crate::time::DayTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Objects that have an identifier implement this trait
///
/// Those identifiers are technical and should not be shown to travellers
pub trait Id {
    /// Identifier of the object
    fn id(&self) -> &str;
}

/// Stable handle of a [StopEvent] in the snapshot's event arena.
///
/// A stop event is reachable from both its [Trip] and its [Station]; both
/// containers hold this handle rather than a copy of the record.
pub type StopEventId = id_arena::Id<StopEvent>;

/// A bus line of the network. See the `lines` table.
///
/// A single real-world line may carry several identifiers when the feed
/// spans overlapping seasons; the snapshot keeps one [Line] per identifier
/// and groups them by number.
#[derive(Debug, Serialize, Clone)]
pub struct Line {
    /// Unique technical identifier of this line entry
    pub id: String,
    /// Public number of the line ("7", "800", "13A"…); not unique across ids
    pub number: String,
    /// Free text describing the line, typically its terminals
    pub description: String,
    /// Visual category, decoded from the line's color
    pub category: BusCategory,
}

impl Id for Line {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} : {}", self.category, self.number, self.description)
    }
}

/// Geographic position of a station
#[derive(Debug, Serialize, Copy, Clone, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// A physical stop location. See the `stations` table.
#[derive(Debug, Serialize, Clone)]
pub struct Station {
    /// Unique technical identifier of the station
    pub id: String,
    /// Name of the location
    pub name: String,
    /// Description of the location
    pub description: String,
    /// Geographic position
    pub coordinates: Coordinates,
    /// Stop events at this station, keyed by arrival time. Multimap
    /// semantics: several events can share a time.
    #[serde(skip)]
    stop_events: BTreeMap<DayTime, Vec<StopEventId>>,
}

impl Station {
    pub(crate) fn new(
        id: String,
        name: String,
        description: String,
        coordinates: Coordinates,
    ) -> Station {
        Station {
            id,
            name,
            description,
            coordinates,
            stop_events: BTreeMap::new(),
        }
    }

    pub(crate) fn add_stop_event(&mut self, arrival: DayTime, event: StopEventId) {
        self.stop_events.entry(arrival).or_default().push(event);
    }

    pub(crate) fn has_stop_events(&self) -> bool {
        !self.stop_events.is_empty()
    }

    /// Number of stop events at this station
    pub fn stop_event_count(&self) -> usize {
        self.stop_events.values().map(Vec::len).sum()
    }

    /// All stop events at this station, in arrival-time order regardless of
    /// the order the feed listed them in
    pub fn stop_events(&self) -> impl Iterator<Item = StopEventId> + '_ {
        self.stop_events.values().flatten().copied()
    }

    /// Stop events whose arrival time falls in `[from, to)`; an empty or
    /// reversed sub-window yields no events
    pub fn stop_events_between(
        &self,
        from: DayTime,
        to: DayTime,
    ) -> impl Iterator<Item = StopEventId> + '_ {
        // BTreeMap::range panics on a reversed range
        let range = if from < to { from..to } else { from..from };
        self.stop_events
            .range(range)
            .flat_map(|(_, events)| events.iter().copied())
    }
}

impl Id for Station {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One scheduled run of a line. See the `trips` table.
///
/// Only trips whose service is active on the snapshot date are retained, and
/// after attachment every retained trip has at least one stop event in the
/// snapshot window.
#[derive(Debug, Serialize, Clone)]
pub struct Trip {
    /// Unique technical identifier of the trip
    pub id: String,
    /// Identifier of the [Line] this trip runs on
    pub line_id: String,
    /// Identifier of the service calendar entry this trip belongs to
    pub service_id: String,
    /// Destination text shown to riders
    pub headsign: String,
    /// Stop events of this trip, keyed by sequence number
    #[serde(skip)]
    stop_events: BTreeMap<u32, Vec<StopEventId>>,
}

impl Trip {
    pub(crate) fn new(id: String, line_id: String, service_id: String, headsign: String) -> Trip {
        Trip {
            id,
            line_id,
            service_id,
            headsign,
            stop_events: BTreeMap::new(),
        }
    }

    pub(crate) fn add_stop_event(&mut self, sequence: u32, event: StopEventId) {
        self.stop_events.entry(sequence).or_default().push(event);
    }

    pub(crate) fn has_stop_events(&self) -> bool {
        !self.stop_events.is_empty()
    }

    /// Number of stop events of this trip
    pub fn stop_event_count(&self) -> usize {
        self.stop_events.values().map(Vec::len).sum()
    }

    /// Stop events of this trip, in sequence order
    pub fn stop_events(&self) -> impl Iterator<Item = StopEventId> + '_ {
        self.stop_events.values().flatten().copied()
    }
}

impl Id for Trip {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} : {}", self.id, self.headsign)
    }
}

/// One scheduled visit of a trip to a station. See the `stop events` table.
///
/// Immutable once created. The record lives in the snapshot's arena; the
/// owning [Trip] and [Station] both hold its [StopEventId].
#[derive(Debug, Serialize, Clone)]
pub struct StopEvent {
    /// Identifier of the [Station] the vehicle stops at
    pub station_id: String,
    /// Identifier of the [Trip] this event belongs to
    pub trip_id: String,
    /// Scheduled departure time
    pub departure: DayTime,
    /// Scheduled arrival time
    pub arrival: DayTime,
    /// Order of this event along its trip
    pub sequence: u32,
}

/// A minimum-time connection between two stations. See the `transfers` table.
///
/// Retained only when both endpoint stations survived pruning.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Station the transfer starts from
    pub from_station_id: String,
    /// Station the transfer leads to
    pub to_station_id: String,
    /// Minimum time needed for the connection, in seconds
    pub min_transfer_time: u32,
}
