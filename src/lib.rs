/*! Assembles an in-memory, cross-referenced snapshot of a GTFS-style transit
feed, restricted to one calendar date and one half-open time window
`[start, end)`.

The feed is a set of delimiter-separated tables (lines, stations, service
calendar, trips, stop events, transfers). The snapshot guarantees that every
stored trip, station and stop event is reachable and relevant to the
requested window: trips of inactive services are dropped at load time, stop
events outside the window are never attached, and trips or stations left
without any event are pruned before transfers are resolved.

To get started, see [SnapshotBuilder].

## Design decisions

### Staged pipeline

Each table depends on invariants established by the previous ones (lines
before trips, stations before transfers, services before trips, trips before
stop events). [SnapshotBuilder] encodes the ordering in the type of each
stage's return value, so a mis-sequenced pipeline does not compile.

### Shared stop events

A stop event is reachable from both its [Trip] and its [Station]. The record
lives once, in an arena owned by the [Snapshot]; both containers hold a
[StopEventId] and resolve it through [Snapshot::event].

### Times past midnight

[DayTime] follows the GTFS convention for trips crossing midnight: 25:30:00
is a valid time and sorts after 23:59:00, it never wraps at 24h.
*/
#![warn(missing_docs)]

mod builder;
mod enums;
pub mod error;
mod load;
mod objects;
mod snapshot;
mod time;

#[cfg(test)]
mod tests;

pub use builder::{
    LinesLoaded, ServicesLoaded, SnapshotBuilder, StationsLoaded, StopEventsAttached, TripsLoaded,
};
pub use error::Error;
pub use objects::*;
pub use snapshot::Snapshot;
pub use time::DayTime;
