use crate::Error;
use serde::ser::Serializer;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A scheduled time of day, in seconds since local midnight.
///
/// Per the GTFS convention for trips crossing midnight, values of 24:00:00
/// and beyond are valid (25:30:00 is "1:30 the next morning, on this service
/// day"). The ordering is the plain ordering of the raw seconds and never
/// wraps at 24h.
#[derive(PartialOrd, PartialEq, Ord, Eq, Copy, Clone, Hash, Debug)]
pub struct DayTime(pub u32);

impl DayTime {
    /// Builds a time from hours (which may exceed 24), minutes and seconds
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> DayTime {
        DayTime(hours * 3600 + minutes * 60 + seconds)
    }

    /// Total number of seconds since local midnight
    pub fn seconds(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0 / 3600,
            self.0 % 3600 / 60,
            self.0 % 60
        )
    }
}

impl FromStr for DayTime {
    type Err = Error;

    /// Parses `H:MM:SS` or `HH:MM:SS`; hours beyond 24 are accepted
    fn from_str(s: &str) -> Result<Self, Error> {
        let len = s.len();
        // the byte-index slicing below is only sound on ascii input
        if !(7..=8).contains(&len) || !s.is_ascii() {
            return Err(Error::InvalidTime(s.to_owned()));
        }
        let sec = &s[len - 2..];
        let min = &s[len - 5..len - 3];
        let hour = &s[..len - 6];
        parse_time_impl(hour, min, sec)
            .map(DayTime)
            .map_err(|_| Error::InvalidTime(s.to_owned()))
    }
}

fn parse_time_impl(h: &str, m: &str, s: &str) -> Result<u32, std::num::ParseIntError> {
    let hours: u32 = h.parse()?;
    let minutes: u32 = m.parse()?;
    let seconds: u32 = s.parse()?;
    Ok(hours * 3600 + minutes * 60 + seconds)
}

impl Serialize for DayTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
