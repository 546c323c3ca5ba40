//! SAME header text parsing

use std::fmt;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::codes::{describe_event, EventDescription, Originator};

/// Error decoding a [`SameHeader`]
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SameHeaderErr {
    /// No `ZCZC-` start-of-message prefix in the input
    #[error("invalid SAME header: no start-of-message prefix")]
    UnrecognizedPrefix,

    /// Header contains non-ASCII characters
    #[error("invalid SAME header: message contains non-ASCII characters")]
    NotAscii,

    /// Header is shorter than the minimum length for a valid message
    #[error("invalid SAME header: decoded message too short")]
    TooShort,

    /// Header does not match general format
    #[error("invalid SAME header: message text does not match required pattern")]
    Malformed,
}

/// An invalid issuance time
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
#[error("message issuance time not valid for its receive time")]
pub struct InvalidDateErr {}

/// Event, area, time, and originator fields of a SAME header
///
/// A header, as printed by a demodulator, looks like
///
/// ```txt
/// ZCZC-WXR-RWT-012345-567890-888990+0015-0321115-KLOX/NWS-
/// ```
///
/// Only the general shape of the header is validated. Field
/// accessors slice into the validated text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SameHeader {
    // header text, including the leading `ZCZC-`
    message: String,

    // where does the time field begin?
    // includes the leading plus character (`+`)
    offset_time: usize,
}

impl SameHeader {
    /// Parse a SAME header out of a demodulator line
    ///
    /// The header may be preceded by arbitrary text, such as
    /// the `EAS: ` tag, and followed by trailing garbage, which
    /// is discarded.
    pub fn find(line: &str) -> Result<Self, SameHeaderErr> {
        let start = line
            .find(PREFIX_MESSAGE_START)
            .ok_or(SameHeaderErr::UnrecognizedPrefix)?;
        Self::new(&line[start..])
    }

    /// Try to construct a SAME header from text beginning with `ZCZC-`
    pub fn new<S>(message: S) -> Result<Self, SameHeaderErr>
    where
        S: Into<String>,
    {
        let mut message: String = message.into();
        if !message.starts_with(PREFIX_MESSAGE_START) {
            return Err(SameHeaderErr::UnrecognizedPrefix);
        }

        let (offset_time, hdr_length) = check_header(&message)?;
        message.truncate(hdr_length);
        if !message.is_ascii() {
            return Err(SameHeaderErr::NotAscii);
        }

        Ok(Self {
            message,
            offset_time,
        })
    }

    /// Header text
    pub fn as_str(&self) -> &str {
        &self.message
    }

    /// Originator code
    pub fn originator(&self) -> Originator {
        Originator::from(self.originator_str())
    }

    /// Originator code, like `WXR`
    pub fn originator_str(&self) -> &str {
        &self.message[Self::OFFSET_ORG..Self::OFFSET_ORG + 3]
    }

    /// Event code, like `RWT`
    pub fn event_str(&self) -> &str {
        &self.message[Self::OFFSET_EVT..Self::OFFSET_EVT + 3]
    }

    /// Human-readable event and its significance
    pub fn event(&self) -> EventDescription {
        describe_event(self.event_str())
    }

    /// Iterator over six-digit `PSSCCC` location codes
    pub fn location_str_iter(&self) -> std::str::Split<'_, char> {
        self.message[Self::OFFSET_AREA_START..self.offset_time].split('-')
    }

    /// True if any location code is the national code `000000`
    pub fn is_national(&self) -> bool {
        self.location_str_iter().any(|loc| loc == NATIONAL_LOCATION)
    }

    /// Purge time field, `TTTT`
    pub fn valid_duration_str(&self) -> &str {
        let start = self.offset_time + Self::OFFSET_FROMPLUS_VALIDTIME;
        &self.message[start..start + 4]
    }

    /// Message validity duration
    pub fn valid_duration(&self) -> Duration {
        let (hrs, mins) = self.valid_duration_fields();
        Duration::hours(hrs as i64) + Duration::minutes(mins as i64)
    }

    /// Message validity duration as (`hours`, `minutes`)
    pub fn valid_duration_fields(&self) -> (u8, u8) {
        let dur_str = self.valid_duration_str();
        (
            dur_str[0..2].parse().unwrap_or(0),
            dur_str[2..4].parse().unwrap_or(0),
        )
    }

    /// Issue time field, `JJJHHMM`
    pub fn issue_daytime_str(&self) -> &str {
        let start = self.offset_time + Self::OFFSET_FROMPLUS_ISSUETIME;
        &self.message[start..start + 7]
    }

    /// Issue ordinal day, hour, and minute
    pub fn issue_daytime_fields(&self) -> (u16, u8, u8) {
        let issue = self.issue_daytime_str();
        (
            issue[0..3].parse().unwrap_or(0),
            issue[3..5].parse().unwrap_or(0),
            issue[5..7].parse().unwrap_or(0),
        )
    }

    /// Estimated issuance datetime (UTC)
    ///
    /// SAME headers carry no year. The year is taken from the
    /// `received` time, which must be within about ±90 days of
    /// true UTC.
    pub fn issue_datetime(
        &self,
        received: &DateTime<Utc>,
    ) -> Result<DateTime<Utc>, InvalidDateErr> {
        calculate_issue_time(
            self.issue_daytime_fields(),
            (received.year(), received.ordinal()),
        )
    }

    /// Sending station, the `LLLLLLLL` field
    ///
    /// Minus signs in the callsign are sent as slashes, like
    /// `KLOX/NWS`.
    pub fn callsign(&self) -> &str {
        let end = self.message.len();
        &self.message[self.offset_time + Self::OFFSET_FROMPLUS_CALLSIGN
            ..end - Self::OFFSET_FROMEND_CALLSIGN_END]
    }

    const OFFSET_ORG: usize = 5;
    const OFFSET_EVT: usize = 9;
    const OFFSET_AREA_START: usize = 13;
    const OFFSET_FROMPLUS_VALIDTIME: usize = 1;
    const OFFSET_FROMPLUS_ISSUETIME: usize = 6;
    const OFFSET_FROMPLUS_CALLSIGN: usize = 14;
    const OFFSET_FROMEND_CALLSIGN_END: usize = 1;
}

impl fmt::Display for SameHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl AsRef<str> for SameHeader {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

const PREFIX_MESSAGE_START: &str = "ZCZC-";
const NATIONAL_LOCATION: &str = "000000";

// Check header for basic format compliance
//
// Returns the position of the `+` which begins the purge time
// field and the total length of the header.
fn check_header(hdr: &str) -> Result<(usize, usize), SameHeaderErr> {
    lazy_static! {
        static ref RE: Regex =
            Regex::new(r"^ZCZC-[A-Z]{3}-[A-Z]{3}(-[0-9]{6})+(\+[0-9]{4}-[0-9]{7}-[^-]{3,8}-)")
                .expect("bad SAME regexp");
    }

    if hdr.len() < 42 {
        return Err(SameHeaderErr::TooShort);
    }

    let mtc = RE
        .captures(hdr)
        .ok_or(SameHeaderErr::Malformed)?
        .get(2)
        .ok_or(SameHeaderErr::Malformed)?;

    Ok((mtc.start(), mtc.end()))
}

// Calculate Utc datetime of issuance from the header fields and
// the (year, ordinal day) the message was received
fn calculate_issue_time(
    message: (u16, u8, u8),
    received: (i32, u32),
) -> Result<DateTime<Utc>, InvalidDateErr> {
    let (day_of_year, hour, minute) = message;
    let (rx_year, rx_day_of_year) = received;

    let daydiff = rx_day_of_year as i32 - day_of_year as i32;
    let msg_year = if daydiff >= 180 {
        // new UTC year has arrived; message is from next year
        rx_year.saturating_add(1)
    } else if daydiff <= -180 {
        // message from last UTC year
        rx_year.saturating_sub(1)
    } else {
        rx_year
    };

    let date = chrono::NaiveDate::from_yo_opt(msg_year, day_of_year as u32)
        .ok_or(InvalidDateErr {})?
        .and_hms_opt(hour as u32, minute as u32, 0)
        .ok_or(InvalidDateErr {})?;
    Ok(Utc.from_utc_datetime(&date))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::SignificanceLevel;

    #[test]
    fn test_check_header() {
        const INVALID_SHORT: &str = "ZCZC-ORG-EEE-+0000-0001122-NOCALL00-";
        const VALID_ONE: &str = "ZCZC-ORG-EEE-012345+0000-0001122-NOCALL00-";
        const VALID_TWO: &str = "ZCZC-ORG-EEE-012345-567890+0000-0001122-NOCALL00-garbage";

        assert_eq!(Err(SameHeaderErr::TooShort), check_header(INVALID_SHORT));

        assert_eq!(Ok((19, 42)), check_header(VALID_ONE));
        assert_eq!(VALID_ONE.as_bytes()[19], b'+');

        assert_eq!(Ok((26, 49)), check_header(VALID_TWO));
        assert_eq!(VALID_TWO.as_bytes()[26], b'+');

        assert_eq!(
            Err(SameHeaderErr::Malformed),
            check_header("ZCZC-WXR-RWT-01234X+0015-0321115-KLOX/NWS-")
        );
    }

    #[test]
    fn test_calculate_issue_time() {
        let d = calculate_issue_time((83, 2, 53), (2021, 1)).unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2021, 3, 24, 2, 53, 0).unwrap());

        // bumps to next year
        let d = calculate_issue_time((1, 10, 0), (2021, 200)).unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2022, 1, 1, 10, 0, 0).unwrap());

        // reverts to previous year, with leap year support
        let d = calculate_issue_time((366, 10, 0), (2021, 1)).unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2020, 12, 31, 10, 0, 0).unwrap());

        calculate_issue_time((366, 10, 0), (1971, 364)).expect_err("not a leap year");
        calculate_issue_time((0, 10, 0), (1971, 364)).expect_err("no day zero");
        calculate_issue_time((84, 25, 59), (2021, 84)).expect_err("bad hour");
    }

    #[test]
    fn test_same_header() {
        const LINE: &str = "EAS:  ZCZC-WXR-TOR-012345-567890-888990+0351-3662322-KLOX/NWS-@@@";

        let hdr = SameHeader::find(LINE).expect("bad header");
        assert_eq!(
            hdr.as_str(),
            "ZCZC-WXR-TOR-012345-567890-888990+0351-3662322-KLOX/NWS-"
        );
        assert_eq!(hdr.originator(), Originator::WeatherService);
        assert_eq!(hdr.event_str(), "TOR");
        assert_eq!(hdr.event().significance, SignificanceLevel::Warning);
        assert_eq!(hdr.valid_duration_fields(), (3, 51));
        assert_eq!(hdr.valid_duration(), Duration::minutes(231));
        assert_eq!(hdr.issue_daytime_fields(), (366, 23, 22));
        assert_eq!(hdr.callsign(), "KLOX/NWS");
        assert!(!hdr.is_national());

        let loc: Vec<&str> = hdr.location_str_iter().collect();
        assert_eq!(loc.as_slice(), &["012345", "567890", "888990"]);

        assert_eq!(
            Utc.with_ymd_and_hms(2020, 12, 31, 23, 22, 0).unwrap(),
            hdr.issue_datetime(&Utc.with_ymd_and_hms(2020, 12, 31, 11, 30, 34).unwrap())
                .unwrap()
        );
    }

    #[test]
    fn test_not_a_header() {
        assert_eq!(
            SameHeader::find("EAS: NNNN"),
            Err(SameHeaderErr::UnrecognizedPrefix)
        );
        assert_eq!(SameHeader::find("ZCZC-"), Err(SameHeaderErr::TooShort));
        assert_eq!(
            SameHeader::new("ZCZC-WXR-RWT-012345+0015-0321115-KLÖX/NWS-"),
            Err(SameHeaderErr::NotAscii)
        );
    }
}
