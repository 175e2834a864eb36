//! The ingestion pipeline: one loader per feed table.
//!
//! Each loader fully consumes its file before returning and mutates the
//! shared [Snapshot]. Stage ordering matters (lines before trips, stations
//! before transfers, services before trips, trips before stop events) and is
//! enforced at compile time by [crate::SnapshotBuilder]; the functions here
//! are the internals that the builder stages call.
//!
//! Error policy, per table:
//! - any file that cannot be opened or read as CSV aborts its loader call;
//! - lines, trips, stop events and transfers skip malformed or dangling rows
//!   with a warning;
//! - stations and services treat malformed rows as fatal (coordinates and
//!   calendar dates are load-bearing, a silent skip would corrupt later
//!   cross-references).

use crate::objects::{BusCategory, Coordinates, Line, Station, StopEvent, Transfer, Trip};
use crate::snapshot::Snapshot;
use crate::time::DayTime;
use crate::Error;
use chrono::NaiveDate;
use csv::StringRecord;
use log::warn;
use std::fs::File;
use std::path::Path;

fn open_reader(path: &Path, has_headers: bool) -> Result<(csv::Reader<File>, String), Error> {
    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("invalid_file_name")
        .to_string();
    let file = File::open(path).map_err(|e| Error::NamedFileIO {
        file_name: file_name.clone(),
        source: Box::new(e),
    })?;
    let reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    Ok((reader, file_name))
}

fn next_record(
    reader: &mut csv::Reader<File>,
    rec: &mut StringRecord,
    file_name: &str,
) -> Result<bool, Error> {
    reader.read_record(rec).map_err(|e| Error::Csv {
        file_name: file_name.to_owned(),
        source: e,
    })
}

fn record_line(rec: &StringRecord) -> u64 {
    rec.position().map(|p| p.line()).unwrap_or(0)
}

/// Builds a time from feed hour/minute fields. Values large enough to
/// overflow the seconds representation count as malformed, like any other
/// unparseable field.
fn checked_day_time(hours: u32, minutes: u32) -> Option<DayTime> {
    let seconds = hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?;
    Some(DayTime(seconds))
}

/// Parses `Y<delim>M<delim>D` where the delimiter is any single non-digit
/// character (the feed does not fix one)
fn parse_service_date(s: &str) -> Result<NaiveDate, Error> {
    let delim = s
        .chars()
        .find(|c| !c.is_ascii_digit())
        .ok_or_else(|| Error::InvalidDate(s.to_owned()))?;
    let mut parts = s.split(delim);
    let mut component = || {
        parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| Error::InvalidDate(s.to_owned()))
    };
    let year = component()?;
    let month = component()?;
    let day = component()?;
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| Error::InvalidDate(s.to_owned()))
}

/// Loads the lines table (header skipped): id, number, description, color.
///
/// A row whose color maps to no category is skipped with a warning; one
/// public number can legitimately gather several line ids.
pub(crate) fn load_lines(snapshot: &mut Snapshot, path: &Path) -> Result<(), Error> {
    let (mut reader, file_name) = open_reader(path, true)?;
    let mut rec = StringRecord::new();
    while next_record(&mut reader, &mut rec, &file_name)? {
        if rec.len() < 4 {
            warn!(
                "{}: skipping line {}: expected 4 fields, got {}",
                file_name,
                record_line(&rec),
                rec.len()
            );
            continue;
        }
        let category = match BusCategory::from_color(&rec[3]) {
            Ok(category) => category,
            Err(e) => {
                warn!("{}: skipping line {}: {}", file_name, record_line(&rec), e);
                continue;
            }
        };
        let line = Line {
            id: rec[0].to_owned(),
            number: rec[1].to_owned(),
            description: rec[2].to_owned(),
            category,
        };
        let ids = snapshot
            .lines_by_number
            .entry(line.number.clone())
            .or_default();
        if !ids.contains(&line.id) {
            ids.push(line.id.clone());
        }
        snapshot.lines.insert(line.id.clone(), line);
    }
    Ok(())
}

/// Loads the stations table (header skipped): id, name, description,
/// latitude, longitude.
///
/// A later row with an already-seen id overwrites the earlier one. Malformed
/// rows are fatal: coordinates are mandatory, and a silently dropped station
/// would turn valid later references into dangling ones.
pub(crate) fn load_stations(snapshot: &mut Snapshot, path: &Path) -> Result<(), Error> {
    let (mut reader, file_name) = open_reader(path, true)?;
    let mut rec = StringRecord::new();
    while next_record(&mut reader, &mut rec, &file_name)? {
        if rec.len() < 5 {
            return Err(Error::MissingFields {
                file_name,
                line: record_line(&rec),
                expected: 5,
                got: rec.len(),
            });
        }
        let parse_coord = |value: &str| -> Result<f64, Error> {
            value.parse().map_err(|_| Error::InvalidField {
                file_name: file_name.clone(),
                line: record_line(&rec),
                value: value.to_owned(),
            })
        };
        let coordinates = Coordinates {
            latitude: parse_coord(&rec[3])?,
            longitude: parse_coord(&rec[4])?,
        };
        let station = Station::new(
            rec[0].to_owned(),
            rec[1].to_owned(),
            rec[2].to_owned(),
            coordinates,
        );
        snapshot.stations.insert(station.id.clone(), station);
    }
    Ok(())
}

/// Loads the service calendar (no header): service id, start date, end date.
///
/// A service is retained iff its interval strictly contains the snapshot
/// date; a service starting or ending exactly on the date is excluded. This
/// table is held to a stricter format policy than the others: a row with
/// fewer than 3 fields aborts the whole load.
pub(crate) fn load_services(snapshot: &mut Snapshot, path: &Path) -> Result<(), Error> {
    let (mut reader, file_name) = open_reader(path, false)?;
    let mut rec = StringRecord::new();
    while next_record(&mut reader, &mut rec, &file_name)? {
        if rec.len() < 3 {
            return Err(Error::MissingFields {
                file_name,
                line: record_line(&rec),
                expected: 3,
                got: rec.len(),
            });
        }
        let start = parse_service_date(&rec[1])?;
        let end = parse_service_date(&rec[2])?;
        if start < snapshot.date && end > snapshot.date {
            snapshot.services.insert(rec[0].to_owned());
        }
    }
    Ok(())
}

/// Loads the trips table (header skipped): trip id, line id, service id,
/// destination.
///
/// Must run after [load_services]: a row becomes a trip only if its service
/// is active on the snapshot date. Line ids are not validated here; the
/// check is deferred to [Snapshot::line_of].
pub(crate) fn load_trips(snapshot: &mut Snapshot, path: &Path) -> Result<(), Error> {
    let (mut reader, file_name) = open_reader(path, true)?;
    let mut rec = StringRecord::new();
    while next_record(&mut reader, &mut rec, &file_name)? {
        if rec.len() < 4 {
            warn!(
                "{}: skipping line {}: expected 4 fields, got {}",
                file_name,
                record_line(&rec),
                rec.len()
            );
            continue;
        }
        if !snapshot.services.contains(&rec[2]) {
            continue;
        }
        let trip = Trip::new(
            rec[0].to_owned(),
            rec[1].to_owned(),
            rec[2].to_owned(),
            rec[3].to_owned(),
        );
        snapshot.trips.insert(trip.id.clone(), trip);
    }
    Ok(())
}

/// Loads the stop-events table (no header) and attaches each kept event to
/// both its trip and its station: station id, (unused), departure hour,
/// departure minute, arrival hour, arrival minute, sequence, trip id.
///
/// An event is kept iff `departure >= window_start && arrival < window_end`.
/// An event whose trip was filtered out at the trip stage is dropped and
/// does not resurrect the trip. After the whole file is consumed, trips left
/// without any event are removed, then stations left without any event; only
/// then is the snapshot's completion flag set.
pub(crate) fn attach_stop_events(snapshot: &mut Snapshot, path: &Path) -> Result<(), Error> {
    let (mut reader, file_name) = open_reader(path, false)?;
    let mut rec = StringRecord::new();
    while next_record(&mut reader, &mut rec, &file_name)? {
        if rec.len() < 8 {
            warn!(
                "{}: skipping line {}: expected 8 fields, got {}",
                file_name,
                record_line(&rec),
                rec.len()
            );
            continue;
        }
        let numbers = match (2..=6)
            .map(|i| rec[i].parse())
            .collect::<Result<Vec<u32>, _>>()
        {
            Ok(numbers) => numbers,
            Err(_) => {
                warn!(
                    "{}: skipping line {}: non-numeric time or sequence field",
                    file_name,
                    record_line(&rec)
                );
                continue;
            }
        };
        let (departure, arrival) = match (
            checked_day_time(numbers[0], numbers[1]),
            checked_day_time(numbers[2], numbers[3]),
        ) {
            (Some(departure), Some(arrival)) => (departure, arrival),
            _ => {
                warn!(
                    "{}: skipping line {}: time field out of range",
                    file_name,
                    record_line(&rec)
                );
                continue;
            }
        };
        let sequence = numbers[4];
        if !(departure >= snapshot.window_start && arrival < snapshot.window_end) {
            continue;
        }
        let station_id = rec[0].to_owned();
        let trip_id = rec[7].to_owned();
        // filtered out at the trip stage, or an unknown id
        if !snapshot.trips.contains_key(&trip_id) {
            continue;
        }
        if !snapshot.stations.contains_key(&station_id) {
            warn!(
                "{}: skipping line {}: unknown station id '{}'",
                file_name,
                record_line(&rec),
                station_id
            );
            continue;
        }
        let event_id = snapshot.events.alloc(StopEvent {
            station_id: station_id.clone(),
            trip_id: trip_id.clone(),
            departure,
            arrival,
            sequence,
        });
        if let Some(trip) = snapshot.trips.get_mut(&trip_id) {
            trip.add_stop_event(sequence, event_id);
        }
        if let Some(station) = snapshot.stations.get_mut(&station_id) {
            station.add_stop_event(arrival, event_id);
        }
    }

    snapshot.trips.retain(|_, trip| trip.has_stop_events());
    snapshot
        .stations
        .retain(|_, station| station.has_stop_events());
    snapshot.events_attached = true;
    Ok(())
}

/// Loads the transfers table (header skipped): from station id, to station
/// id, minimum transfer seconds.
///
/// Refuses to run before [attach_stop_events] has completed, since only the
/// pruned station registry decides which transfers survive. A row is kept
/// iff both stations exist; the from-id of every kept row feeds the derived
/// transfer-station set.
pub(crate) fn load_transfers(snapshot: &mut Snapshot, path: &Path) -> Result<(), Error> {
    if !snapshot.events_attached {
        return Err(Error::AttachmentIncomplete);
    }
    let (mut reader, file_name) = open_reader(path, true)?;
    let mut rec = StringRecord::new();
    while next_record(&mut reader, &mut rec, &file_name)? {
        if rec.len() < 3 {
            warn!(
                "{}: skipping line {}: expected 3 fields, got {}",
                file_name,
                record_line(&rec),
                rec.len()
            );
            continue;
        }
        let min_transfer_time: u32 = match rec[2].parse() {
            Ok(seconds) => seconds,
            Err(_) => {
                warn!(
                    "{}: skipping line {}: non-numeric transfer time '{}'",
                    file_name,
                    record_line(&rec),
                    &rec[2]
                );
                continue;
            }
        };
        let from_station_id = rec[0].to_owned();
        let to_station_id = rec[1].to_owned();
        if snapshot.stations.contains_key(&from_station_id)
            && snapshot.stations.contains_key(&to_station_id)
        {
            snapshot.transfer_stations.insert(from_station_id.clone());
            snapshot.transfers.push(Transfer {
                from_station_id,
                to_station_id,
                min_transfer_time,
            });
        }
    }
    Ok(())
}
