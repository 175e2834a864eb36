//! Staged construction of a [Snapshot].
//!
//! The pipeline is a strict sequence: lines, stations, services, trips, stop
//! events (which also prunes), transfers. Each stage consumes the previous
//! stage's context and returns the next one, so running stages out of order
//! is a compile error rather than a runtime surprise.
//!
//! ```no_run
//! use gtfs_window::{DayTime, SnapshotBuilder};
//! use chrono::NaiveDate;
//!
//! let snapshot = SnapshotBuilder::new(
//!     NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
//!     DayTime::new(12, 0, 0),
//!     DayTime::new(18, 0, 0),
//! )
//! .lines("feed/routes.txt")?
//! .stations("feed/stops.txt")?
//! .services("feed/calendar.txt")?
//! .trips("feed/trips.txt")?
//! .stop_events("feed/stop_times.txt")?
//! .transfers("feed/transfers.txt")?;
//! snapshot.print_stats();
//! # Ok::<(), gtfs_window::Error>(())
//! ```

use crate::load;
use crate::snapshot::Snapshot;
use crate::time::DayTime;
use crate::Error;
use chrono::NaiveDate;
use std::path::Path;

/// Entry point of the pipeline: fixes the target date and the half-open
/// time window `[window_start, window_end)` for the lifetime of the snapshot
pub struct SnapshotBuilder {
    inner: Snapshot,
}

impl SnapshotBuilder {
    /// Starts a snapshot restricted to `date` and `[window_start, window_end)`
    pub fn new(date: NaiveDate, window_start: DayTime, window_end: DayTime) -> SnapshotBuilder {
        SnapshotBuilder {
            inner: Snapshot::new(date, window_start, window_end),
        }
    }

    /// Loads the lines table
    pub fn lines<P: AsRef<Path>>(mut self, path: P) -> Result<LinesLoaded, Error> {
        load::load_lines(&mut self.inner, path.as_ref())?;
        Ok(LinesLoaded { inner: self.inner })
    }
}

/// Pipeline context after the lines table has been loaded
pub struct LinesLoaded {
    inner: Snapshot,
}

impl LinesLoaded {
    /// Loads the stations table
    pub fn stations<P: AsRef<Path>>(mut self, path: P) -> Result<StationsLoaded, Error> {
        load::load_stations(&mut self.inner, path.as_ref())?;
        Ok(StationsLoaded { inner: self.inner })
    }
}

/// Pipeline context after the station registry has been populated
pub struct StationsLoaded {
    inner: Snapshot,
}

impl StationsLoaded {
    /// Loads the service calendar, keeping the services active on the date
    pub fn services<P: AsRef<Path>>(mut self, path: P) -> Result<ServicesLoaded, Error> {
        load::load_services(&mut self.inner, path.as_ref())?;
        Ok(ServicesLoaded { inner: self.inner })
    }
}

/// Pipeline context after the service calendar has been built
pub struct ServicesLoaded {
    inner: Snapshot,
}

impl ServicesLoaded {
    /// Loads the trips table, keeping the trips of an active service
    pub fn trips<P: AsRef<Path>>(mut self, path: P) -> Result<TripsLoaded, Error> {
        load::load_trips(&mut self.inner, path.as_ref())?;
        Ok(TripsLoaded { inner: self.inner })
    }
}

/// Pipeline context after the trip table has been populated
pub struct TripsLoaded {
    inner: Snapshot,
}

impl TripsLoaded {
    /// Attaches the stop events inside the window to their trips and
    /// stations, then prunes empty trips and empty stations
    pub fn stop_events<P: AsRef<Path>>(mut self, path: P) -> Result<StopEventsAttached, Error> {
        load::attach_stop_events(&mut self.inner, path.as_ref())?;
        Ok(StopEventsAttached { inner: self.inner })
    }
}

/// Pipeline context after attachment and pruning; the station registry is
/// now final, so transfers can be resolved against it
pub struct StopEventsAttached {
    inner: Snapshot,
}

impl StopEventsAttached {
    /// Loads the transfers table and finishes the snapshot
    pub fn transfers<P: AsRef<Path>>(mut self, path: P) -> Result<Snapshot, Error> {
        load::load_transfers(&mut self.inner, path.as_ref())?;
        Ok(self.inner)
    }

    /// Finishes the snapshot without a transfers table
    pub fn finish(self) -> Snapshot {
        self.inner
    }
}
