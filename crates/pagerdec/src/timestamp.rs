//! Embedded timestamp extraction
//!
//! Paging gateways often stamp messages with the time they were
//! sent, like `04 June 2017 08:15:30` or `2017-06-04 08:15:30`.
//! When such a stamp is present it is a better estimate of the
//! message time than the time we decoded it.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;

/// Time zone used to interpret embedded timestamps
///
/// Embedded stamps carry no zone information. Most paging
/// gateways use the local time of the transmitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeBase {
    /// Interpret as local time of this machine
    #[default]
    Local,

    /// Interpret as UTC
    Utc,
}

/// A searchable, parseable timestamp layout
#[derive(Clone, Debug)]
pub struct TimestampFormat {
    /// Locates a candidate substring
    pub pattern: Regex,

    /// `chrono` format string which parses the located substring
    pub layout: &'static str,
}

/// A timestamp found in some text
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extracted {
    /// UNIX timestamp of the match, in seconds
    pub epoch_seconds: i64,

    /// The exact substring which matched
    pub matched: String,

    /// The input text with the first occurrence of `matched` removed
    pub residual: String,
}

lazy_static! {
    static ref DEFAULT_FORMATS: [TimestampFormat; 2] = [
        TimestampFormat {
            pattern: Regex::new(r"\d{2} \w+ \d{4} \d{2}:\d{2}:\d{2}").expect("bad timestamp regexp"),
            layout: "%d %B %Y %H:%M:%S",
        },
        TimestampFormat {
            pattern: Regex::new(r"\d+-\d+-\d+ \d{2}:\d{2}:\d{2}").expect("bad timestamp regexp"),
            layout: "%Y-%m-%d %H:%M:%S",
        },
    ];
}

/// Known timestamp layouts, in order of preference
///
/// 1. `DD MonthName YYYY HH:mm:ss`
/// 2. `YYYY-MM-DD HH:mm:ss`
pub fn default_formats() -> &'static [TimestampFormat] {
    DEFAULT_FORMATS.as_slice()
}

/// Find and parse an embedded timestamp
///
/// Each of the `formats` is tried in order. The first one which
/// both locates a substring and parses it wins. Returns `None`
/// when nothing usable is found; this is the common case and not
/// an error.
///
/// ```
/// use pagerdec::timestamp::{default_formats, extract, TimeBase};
///
/// let found = extract(
///     "ALERT 04 June 2017 08:15:30 FLOODING",
///     default_formats(),
///     TimeBase::Utc,
/// )
/// .expect("timestamp");
/// assert_eq!(1496564130, found.epoch_seconds);
/// assert_eq!("ALERT  FLOODING", found.residual);
/// ```
pub fn extract(text: &str, formats: &[TimestampFormat], zone: TimeBase) -> Option<Extracted> {
    formats.iter().find_map(|fmt| {
        let mtc = fmt.pattern.find(text)?;
        let naive = NaiveDateTime::parse_from_str(mtc.as_str(), fmt.layout).ok()?;
        let epoch_seconds = to_epoch(&naive, zone)?;
        Some(Extracted {
            epoch_seconds,
            matched: mtc.as_str().to_owned(),
            residual: text.replacen(mtc.as_str(), "", 1),
        })
    })
}

// Convert a zone-less datetime to UNIX seconds
//
// Local times which fall in a DST gap cannot be represented and
// yield `None`. Ambiguous local times resolve to the earlier instant.
fn to_epoch(naive: &NaiveDateTime, zone: TimeBase) -> Option<i64> {
    match zone {
        TimeBase::Utc => Some(Utc.from_utc_datetime(naive).timestamp()),
        TimeBase::Local => Local
            .from_local_datetime(naive)
            .earliest()
            .map(|dt: DateTime<Local>| dt.timestamp()),
    }
}
