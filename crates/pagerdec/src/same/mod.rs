//! SAME/EAS header decoding
//!
//! A [`SameDecoder`] turns one demodulator line into a
//! [`SameRecord`], or refuses it. The built-in
//! [`HeaderDecoder`] validates the header text, applies the event
//! and location filters, and composes a readable summary.

mod codes;
mod header;

use chrono::{DateTime, Utc};
use log::debug;

pub use codes::{describe_event, EventDescription, Originator, SignificanceLevel};
pub use header::{InvalidDateErr, SameHeader, SameHeaderErr};

/// A decoded and accepted SAME header
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SameRecord {
    /// Complete header text, beginning with `ZCZC-`
    pub header: String,

    /// Originator code, like `WXR`
    pub originator: String,

    /// Event code, like `RWT`
    pub event: String,

    /// Affected `PSSCCC` location codes, in message order
    pub locations: Vec<String>,

    /// Purge time field, `TTTT`
    pub purge: String,

    /// Issue time field, `JJJHHMM`
    pub issued: String,

    /// Sending station, the `LLLL-ORG` field
    pub sender: String,

    /// Significance code of the event, like `W`
    pub alert_type: String,

    /// Human-readable description of the alert
    pub message: String,
}

/// Decodes SAME headers from demodulator lines
///
/// Returns `None` if the `line` holds no valid header or if the
/// header is filtered out. Headers whose event code appears in
/// `exclude_events` are refused. If `include_fips` is non-empty,
/// at least one location must appear in it.
pub trait SameDecoder {
    /// Decode one line
    fn decode(
        &self,
        line: &str,
        received: &DateTime<Utc>,
        exclude_events: &[String],
        include_fips: &[String],
    ) -> Option<SameRecord>;
}

/// The built-in SAME header decoder
///
/// National activations (location `000000`) always pass the
/// `include_fips` filter.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use pagerdec::{HeaderDecoder, SameDecoder};
///
/// let received = Utc.with_ymd_and_hms(2021, 2, 1, 12, 0, 0).unwrap();
/// let rec = HeaderDecoder
///     .decode(
///         "EAS: ZCZC-WXR-RWT-012345+0015-0321115-KLOX/NWS-",
///         &received,
///         &[],
///         &[],
///     )
///     .expect("valid header");
/// assert_eq!("KLOX/NWS", rec.sender);
/// assert_eq!("T", rec.alert_type);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderDecoder;

impl SameDecoder for HeaderDecoder {
    fn decode(
        &self,
        line: &str,
        received: &DateTime<Utc>,
        exclude_events: &[String],
        include_fips: &[String],
    ) -> Option<SameRecord> {
        let hdr = match SameHeader::find(line) {
            Ok(hdr) => hdr,
            Err(err) => {
                debug!("no SAME header: {}", err);
                return None;
            }
        };

        if exclude_events.iter().any(|evt| evt == hdr.event_str()) {
            debug!("SAME event {} is excluded", hdr.event_str());
            return None;
        }

        if !include_fips.is_empty()
            && !hdr.is_national()
            && !hdr
                .location_str_iter()
                .any(|loc| include_fips.iter().any(|fips| fips == loc))
        {
            debug!("SAME header {} has no included locations", hdr);
            return None;
        }

        let event = hdr.event();
        Some(SameRecord {
            header: hdr.as_str().to_owned(),
            originator: hdr.originator_str().to_owned(),
            event: hdr.event_str().to_owned(),
            locations: hdr.location_str_iter().map(str::to_owned).collect(),
            purge: hdr.valid_duration_str().to_owned(),
            issued: hdr.issue_daytime_str().to_owned(),
            sender: hdr.callsign().to_owned(),
            alert_type: event.significance.as_code_str().to_owned(),
            message: summarize(&hdr, &event, received),
        })
    }
}

// Human-readable alert summary, like
//
// "National Weather Service has issued a Required Weekly Test for
// 012345; beginning at 11:15 UTC Feb 01 and ending at 11:30 UTC
// Feb 01. (KLOX/NWS)"
fn summarize(hdr: &SameHeader, event: &EventDescription, received: &DateTime<Utc>) -> String {
    let locations: Vec<&str> = hdr.location_str_iter().collect();
    let mut out = format!(
        "{} has issued a {} for {}",
        hdr.originator(),
        event.name,
        locations.join(", ")
    );

    if let Ok(issued) = hdr.issue_datetime(received) {
        let purge = issued + hdr.valid_duration();
        out.push_str(&format!(
            "; beginning at {} and ending at {}",
            issued.format(SUMMARY_TIME_FORMAT),
            purge.format(SUMMARY_TIME_FORMAT)
        ));
    }

    out.push_str(&format!(". ({})", hdr.callsign()));
    out
}

const SUMMARY_TIME_FORMAT: &str = "%H:%M UTC %b %d";
