use crate::objects::*;
use crate::time::DayTime;
use crate::Error;
use chrono::NaiveDate;
use id_arena::Arena;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeMap, BTreeSet};

/// The assembled in-memory model: every table of the feed, cross-referenced
/// and restricted to one calendar date and one half-open time window
/// `[window_start, window_end)`.
///
/// A snapshot is produced by [crate::SnapshotBuilder]; once built it is
/// read-only. After the stop-event stage, every retained [Trip] and every
/// retained [Station] holds at least one stop event inside the window, and
/// every [Transfer] references stations that survived pruning.
pub struct Snapshot {
    pub(crate) date: NaiveDate,
    pub(crate) window_start: DayTime,
    pub(crate) window_end: DayTime,
    /// All lines by line id
    pub(crate) lines: FxHashMap<String, Line>,
    /// Line ids grouped by public line number; one number can map to several
    /// ids when the feed spans overlapping seasons
    pub(crate) lines_by_number: BTreeMap<String, Vec<String>>,
    /// All stations by station id; pruned after attachment
    pub(crate) stations: BTreeMap<String, Station>,
    /// Service ids whose validity interval strictly contains the date
    pub(crate) services: FxHashSet<String>,
    /// All trips by trip id; pruned after attachment
    pub(crate) trips: BTreeMap<String, Trip>,
    /// Arena of stop-event records, shared by reference between trips and
    /// stations
    pub(crate) events: Arena<StopEvent>,
    /// Retained station-to-station transfers
    pub(crate) transfers: Vec<Transfer>,
    /// Every station id appearing as a transfer origin
    pub(crate) transfer_stations: BTreeSet<String>,
    /// Set once the stop-event stage (attachment + both pruning passes) has
    /// completed; the transfer loader refuses to run without it
    pub(crate) events_attached: bool,
}

impl Snapshot {
    pub(crate) fn new(date: NaiveDate, window_start: DayTime, window_end: DayTime) -> Snapshot {
        Snapshot {
            date,
            window_start,
            window_end,
            lines: FxHashMap::default(),
            lines_by_number: BTreeMap::new(),
            stations: BTreeMap::new(),
            services: FxHashSet::default(),
            trips: BTreeMap::new(),
            events: Arena::new(),
            transfers: Vec::new(),
            transfer_stations: BTreeSet::new(),
            events_attached: false,
        }
    }

    /// The calendar date this snapshot is restricted to
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Start of the time window (inclusive)
    pub fn window_start(&self) -> DayTime {
        self.window_start
    }

    /// End of the time window (exclusive)
    pub fn window_end(&self) -> DayTime {
        self.window_end
    }

    /// All lines, keyed by line id
    pub fn lines(&self) -> &FxHashMap<String, Line> {
        &self.lines
    }

    /// All line entries sharing a public line number
    pub fn lines_with_number<'a>(&'a self, number: &str) -> impl Iterator<Item = &'a Line> {
        self.lines_by_number
            .get(number)
            .into_iter()
            .flatten()
            .filter_map(|id| self.lines.get(id))
    }

    /// All retained stations, keyed by station id
    pub fn stations(&self) -> &BTreeMap<String, Station> {
        &self.stations
    }

    /// All retained trips, keyed by trip id
    pub fn trips(&self) -> &BTreeMap<String, Trip> {
        &self.trips
    }

    /// All retained transfers
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Station ids appearing as a transfer origin
    pub fn transfer_stations(&self) -> &BTreeSet<String> {
        &self.transfer_stations
    }

    /// Resolves a stop-event handle obtained from a [Trip] or a [Station]
    pub fn event(&self, id: StopEventId) -> &StopEvent {
        &self.events[id]
    }

    /// Number of loaded lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of retained stations
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Number of services active on the snapshot date
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Number of retained trips
    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    /// Number of retained transfers
    pub fn transfer_count(&self) -> usize {
        self.transfers.len()
    }

    /// Number of distinct transfer-origin stations
    pub fn transfer_station_count(&self) -> usize {
        self.transfer_stations.len()
    }

    /// Total number of stop events attached to the snapshot
    pub fn stop_event_count(&self) -> usize {
        self.events.len()
    }

    /// Gets a [Line] by its line id
    pub fn get_line<'a>(&'a self, id: &str) -> Result<&'a Line, Error> {
        self.lines
            .get(id)
            .ok_or_else(|| Error::ReferenceError(id.to_owned()))
    }

    /// Gets a [Station] by its station id
    pub fn get_station<'a>(&'a self, id: &str) -> Result<&'a Station, Error> {
        self.stations
            .get(id)
            .ok_or_else(|| Error::ReferenceError(id.to_owned()))
    }

    /// Gets a [Trip] by its trip id
    pub fn get_trip<'a>(&'a self, id: &str) -> Result<&'a Trip, Error> {
        self.trips
            .get(id)
            .ok_or_else(|| Error::ReferenceError(id.to_owned()))
    }

    /// The [Line] a trip runs on.
    ///
    /// The trip loader does not validate line ids, so a miss here means the
    /// lines table did not carry the id — a broken pipeline precondition
    /// surfaced as [Error::ReferenceError] rather than a silent skip.
    pub fn line_of<'a>(&'a self, trip: &Trip) -> Result<&'a Line, Error> {
        self.get_line(&trip.line_id)
    }

    /// The [Station] a stop event occurs at
    pub fn station_of<'a>(&'a self, event: &StopEvent) -> Result<&'a Station, Error> {
        self.get_station(&event.station_id)
    }

    /// The [Trip] a stop event belongs to
    pub fn trip_of<'a>(&'a self, event: &StopEvent) -> Result<&'a Trip, Error> {
        self.get_trip(&event.trip_id)
    }

    /// Prints on stdout some basic statistics about the snapshot (numbers of
    /// elements for each object). Mostly to be sure that everything was read
    pub fn print_stats(&self) {
        println!("Snapshot of {} [{}, {}):", self.date, self.window_start, self.window_end);
        println!("  Lines: {}", self.line_count());
        println!("  Stations: {}", self.station_count());
        println!("  Services: {}", self.service_count());
        println!("  Trips: {}", self.trip_count());
        println!("  Stop events: {}", self.stop_event_count());
        println!("  Transfers: {}", self.transfer_count());
        println!("  Transfer stations: {}", self.transfer_station_count());
    }
}
