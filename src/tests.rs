use crate::load;
use crate::objects::*;
use crate::snapshot::Snapshot;
use crate::time::DayTime;
use crate::{Error, SnapshotBuilder};
use chrono::NaiveDate;
use std::path::Path;

fn target_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
}

fn build() -> Snapshot {
    SnapshotBuilder::new(target_date(), DayTime::new(12, 0, 0), DayTime::new(18, 0, 0))
        .lines("fixtures/basic/routes.txt")
        .expect("impossible to read lines")
        .stations("fixtures/basic/stops.txt")
        .expect("impossible to read stations")
        .services("fixtures/basic/calendar.txt")
        .expect("impossible to read services")
        .trips("fixtures/basic/trips.txt")
        .expect("impossible to read trips")
        .stop_events("fixtures/basic/stop_times.txt")
        .expect("impossible to read stop events")
        .transfers("fixtures/basic/transfers.txt")
        .expect("impossible to read transfers")
}

fn empty_snapshot() -> Snapshot {
    Snapshot::new(target_date(), DayTime::new(12, 0, 0), DayTime::new(18, 0, 0))
}

#[test]
fn read_lines() {
    let snapshot = build();
    // LX has an unrecognized color and is skipped
    assert_eq!(5, snapshot.line_count());
    let l1 = snapshot.get_line("L1").unwrap();
    assert_eq!(BusCategory::Express, l1.category);
    assert_eq!("express", l1.category.label());
    assert_eq!("42", l1.number);
    assert!(snapshot.get_line("LX").is_err());
}

#[test]
fn one_number_can_carry_several_line_ids() {
    let snapshot = build();
    let ids: Vec<&str> = snapshot
        .lines_with_number("800")
        .map(|line| line.id.as_str())
        .collect();
    assert_eq!(vec!["L2", "L2B"], ids);
    assert_eq!(1, snapshot.lines_with_number("42").count());
    assert_eq!(0, snapshot.lines_with_number("999").count());
}

#[test]
fn service_interval_is_strict_on_both_sides() {
    // SVC2 starts on the target date, SVC3 ends on it, SVC4 is long over:
    // only SVC1 strictly contains the date
    let snapshot = build();
    assert_eq!(1, snapshot.service_count());
}

#[test]
fn trips_of_inactive_services_are_dropped() {
    let snapshot = build();
    // T3 runs on SVC4, which is not active on the target date
    assert!(snapshot.get_trip("T3").is_err());
    assert!(snapshot.get_trip("T1").is_ok());
    assert!(snapshot.get_trip("T2").is_ok());
}

#[test]
fn window_is_closed_at_start_and_open_at_end() {
    let snapshot = build();
    // kept: T1 at 12:05 and 12:15, T2 at 13:05
    // dropped: departure 11:55 < start, arrival 18:00 == end,
    //          arrival 12:00 == start with departure 11:50 < start,
    //          and the row whose hour field overflows the time representation
    assert_eq!(3, snapshot.stop_event_count());
    for trip in snapshot.trips().values() {
        for id in trip.stop_events() {
            let event = snapshot.event(id);
            assert!(event.departure >= snapshot.window_start());
            assert!(event.arrival < snapshot.window_end());
        }
    }
}

#[test]
fn empty_trips_and_stations_are_pruned() {
    let snapshot = build();
    // T4's only event ends past the window; S3 and S4 end up with no events
    assert!(snapshot.get_trip("T4").is_err());
    assert!(snapshot.get_station("S3").is_err());
    assert!(snapshot.get_station("S4").is_err());
    assert_eq!(2, snapshot.trip_count());
    assert_eq!(2, snapshot.station_count());
    for trip in snapshot.trips().values() {
        assert!(trip.stop_event_count() >= 1);
    }
    for station in snapshot.stations().values() {
        assert!(station.stop_event_count() >= 1);
    }
}

#[test]
fn unknown_trip_id_does_not_resurrect_anything() {
    let snapshot = build();
    // the 12:35 event references T9, which was never loaded
    assert!(snapshot.get_trip("T9").is_err());
    let s2 = snapshot.get_station("S2").unwrap();
    for id in s2.stop_events() {
        assert_ne!("T9", snapshot.event(id).trip_id);
    }
}

#[test]
fn station_events_iterate_in_time_order() {
    let snapshot = build();
    let s1 = snapshot.get_station("S1").unwrap();
    let arrivals: Vec<DayTime> = s1
        .stop_events()
        .map(|id| snapshot.event(id).arrival)
        .collect();
    assert_eq!(vec![DayTime::new(12, 5, 0), DayTime::new(13, 5, 0)], arrivals);

    let afternoon: Vec<&str> = s1
        .stop_events_between(DayTime::new(13, 0, 0), DayTime::new(18, 0, 0))
        .map(|id| snapshot.event(id).trip_id.as_str())
        .collect();
    assert_eq!(vec!["T2"], afternoon);
}

#[test]
fn degenerate_sub_window_yields_no_events() {
    let snapshot = build();
    let s1 = snapshot.get_station("S1").unwrap();
    // reversed or empty bounds must produce an empty iterator, not a panic
    assert_eq!(
        0,
        s1.stop_events_between(DayTime::new(14, 0, 0), DayTime::new(13, 0, 0))
            .count()
    );
    assert_eq!(
        0,
        s1.stop_events_between(DayTime::new(13, 0, 0), DayTime::new(13, 0, 0))
            .count()
    );
}

#[test]
fn transfers_reference_only_surviving_stations() {
    let snapshot = build();
    // S1->S3 and S4->S1 involve pruned stations and are dropped
    assert_eq!(2, snapshot.transfer_count());
    for transfer in snapshot.transfers() {
        assert!(snapshot.get_station(&transfer.from_station_id).is_ok());
        assert!(snapshot.get_station(&transfer.to_station_id).is_ok());
    }
    assert_eq!(2, snapshot.transfer_station_count());
    for station_id in snapshot.transfer_stations() {
        assert!(snapshot
            .transfers()
            .iter()
            .any(|t| &t.from_station_id == station_id));
    }
    assert_eq!(
        Some(&Transfer {
            from_station_id: "S1".to_owned(),
            to_station_id: "S2".to_owned(),
            min_transfer_time: 180,
        }),
        snapshot.transfers().first()
    );
}

#[test]
fn cross_references_resolve() {
    let snapshot = build();
    let t1 = snapshot.get_trip("T1").unwrap();
    assert_eq!("42", snapshot.line_of(t1).unwrap().number);
    let first = t1.stop_events().next().unwrap();
    let event = snapshot.event(first);
    assert_eq!("Central", snapshot.station_of(event).unwrap().name);
    assert_eq!("T1", snapshot.trip_of(event).unwrap().id);
}

#[test]
fn broken_reference_fails_loudly() {
    let snapshot = build();
    let orphan = Trip::new(
        "TX".to_owned(),
        "no-such-line".to_owned(),
        "SVC1".to_owned(),
        "Nowhere".to_owned(),
    );
    assert!(matches!(
        snapshot.line_of(&orphan),
        Err(Error::ReferenceError(id)) if id == "no-such-line"
    ));
}

#[test]
fn keyed_loaders_are_idempotent() {
    let mut snapshot = empty_snapshot();
    let routes = Path::new("fixtures/basic/routes.txt");
    let stops = Path::new("fixtures/basic/stops.txt");
    load::load_lines(&mut snapshot, routes).unwrap();
    load::load_stations(&mut snapshot, stops).unwrap();
    let (lines, by_number, stations) = (
        snapshot.line_count(),
        snapshot.lines_with_number("800").count(),
        snapshot.station_count(),
    );
    load::load_lines(&mut snapshot, routes).unwrap();
    load::load_stations(&mut snapshot, stops).unwrap();
    assert_eq!(lines, snapshot.line_count());
    assert_eq!(by_number, snapshot.lines_with_number("800").count());
    assert_eq!(stations, snapshot.station_count());
}

#[test]
fn transfers_require_completed_attachment() {
    let mut snapshot = empty_snapshot();
    load::load_stations(&mut snapshot, Path::new("fixtures/basic/stops.txt")).unwrap();
    assert!(matches!(
        load::load_transfers(&mut snapshot, Path::new("fixtures/basic/transfers.txt")),
        Err(Error::AttachmentIncomplete)
    ));
}

#[test]
fn missing_file_is_fatal() {
    let result = SnapshotBuilder::new(target_date(), DayTime::new(12, 0, 0), DayTime::new(18, 0, 0))
        .lines("fixtures/basic/no_such_file.txt");
    assert!(matches!(
        result.map(|_| ()),
        Err(Error::NamedFileIO { file_name, .. }) if file_name == "no_such_file.txt"
    ));
}

#[test]
fn short_service_row_aborts_the_load() {
    let mut snapshot = empty_snapshot();
    assert!(matches!(
        load::load_services(&mut snapshot, Path::new("fixtures/invalid/calendar_short.txt")),
        Err(Error::MissingFields { expected: 3, got: 2, .. })
    ));
}

#[test]
fn serialization() {
    let snapshot = build();
    let lines: Vec<&Line> = snapshot.lines().values().collect();
    let json = serde_json::to_string(&lines).unwrap();
    assert!(json.contains("\"category\":\"Express\""));
    let json = serde_json::to_string(snapshot.transfers()).unwrap();
    assert!(json.contains("\"min_transfer_time\":180"));
    let event_json =
        serde_json::to_string(snapshot.event(snapshot.trips()["T1"].stop_events().next().unwrap()))
            .unwrap();
    assert!(event_json.contains("\"departure\":\"12:00:00\""));
}
