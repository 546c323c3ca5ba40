//! SAME/EAS originator, significance, and event code tables

use std::fmt;
use std::str::FromStr;

use phf::phf_map;
use strum::EnumMessage;

/// SAME message originator code
///
/// Originator codes may be converted `from()` their three-character
/// SAME representation. Unknown codes are accepted and map to
/// [`Originator::Unknown`].
///
/// ```
/// use pagerdec::Originator;
///
/// assert_eq!(Originator::CivilAuthority, Originator::from("CIV"));
/// assert_eq!("Civil authorities", Originator::from("CIV").as_display_str());
/// assert_eq!(Originator::Unknown, Originator::from("HUH"));
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::EnumMessage, strum_macros::EnumString,
)]
pub enum Originator {
    /// An unknown (and probably invalid) originator code
    #[strum(serialize = "OOO", detailed_message = "Unknown Originator")]
    Unknown,

    /// Primary Entry Point station for national activations
    #[strum(serialize = "PEP", detailed_message = "Primary Entry Point System")]
    PrimaryEntryPoint,

    /// Civil authorities
    #[strum(serialize = "CIV", detailed_message = "Civil authorities")]
    CivilAuthority,

    /// National Weather Service or Environment Canada
    #[strum(serialize = "WXR", detailed_message = "National Weather Service")]
    WeatherService,

    /// EAS participant (usu. broadcast station)
    #[strum(
        serialize = "EAS",
        detailed_message = "Broadcast station or cable system"
    )]
    BroadcastStation,
}

impl Originator {
    /// Human-readable string representation
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().unwrap_or("Unknown Originator")
    }

    /// Three-character SAME code
    pub fn as_str(&self) -> &'static str {
        self.get_serializations()[0]
    }
}

impl From<&str> for Originator {
    fn from(s: &str) -> Originator {
        Originator::from_str(s).unwrap_or(Originator::Unknown)
    }
}

impl fmt::Display for Originator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_display_str().fmt(f)
    }
}

/// SAME event significance level
///
/// Three-letter SAME codes often, but not always, use their last
/// letter to indicate significance. Levels are `Ord` in increasing
/// order of urgency.
///
/// ```
/// use pagerdec::SignificanceLevel;
///
/// assert_eq!(SignificanceLevel::Watch, SignificanceLevel::from("A"));
/// assert_eq!("W", SignificanceLevel::Warning.as_code_str());
/// assert!(SignificanceLevel::Test < SignificanceLevel::Warning);
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum_macros::EnumMessage,
    strum_macros::EnumString,
)]
#[repr(u8)]
pub enum SignificanceLevel {
    /// Test
    #[strum(serialize = "T", detailed_message = "Test")]
    Test,

    /// Non-emergency message
    #[strum(serialize = "M", detailed_message = "Message")]
    Message,

    /// Follow-up information to a warning, watch, or emergency
    #[strum(serialize = "S", detailed_message = "Statement")]
    Statement,

    /// Indirect hazard
    #[strum(serialize = "E", detailed_message = "Emergency")]
    Emergency,

    /// Onset, probability, or location is uncertain
    #[strum(serialize = "A", detailed_message = "Watch")]
    Watch,

    /// Significant threat to public safety and/or property
    #[strum(serialize = "W", detailed_message = "Warning")]
    Warning,

    /// No significance level could be determined
    ///
    /// Treat these as a [`SignificanceLevel::Warning`].
    #[strum(serialize = "", detailed_message = "Warning")]
    Unknown,
}

impl std::default::Default for SignificanceLevel {
    fn default() -> Self {
        SignificanceLevel::Unknown
    }
}

impl SignificanceLevel {
    /// Parse from a one-character code like "`T`"
    ///
    /// Unrecognized input yields [`SignificanceLevel::Unknown`].
    pub fn from<S>(code: S) -> Self
    where
        S: AsRef<str>,
    {
        str::parse(code.as_ref()).unwrap_or_default()
    }

    /// Human-readable string representation
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().unwrap_or("Warning")
    }

    /// One-character SAME code
    pub fn as_code_str(&self) -> &'static str {
        self.get_serializations()[0]
    }
}

impl fmt::Display for SignificanceLevel {
    /// The alternate form prints the one-character code
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.as_code_str().fmt(f)
        } else {
            self.as_display_str().fmt(f)
        }
    }
}

/// A described SAME event
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventDescription {
    /// Human-readable event name, like "`Tornado Warning`"
    pub name: String,

    /// Significance of the event
    pub significance: SignificanceLevel,
}

/// Describe a three-character SAME event code
///
/// Full codes like `RWT` are looked up first. Failing that, the
/// first two characters are matched as a phenomenon and the last as
/// a significance level. Anything else is an unrecognized event at
/// whatever significance its last character implies.
///
/// ```
/// use pagerdec::{describe_event, SignificanceLevel};
///
/// let evt = describe_event("TOA");
/// assert_eq!("Tornado Watch", evt.name);
/// assert_eq!(SignificanceLevel::Watch, evt.significance);
/// ```
pub fn describe_event(code: &str) -> EventDescription {
    if let Some((name, significance)) = code.get(0..3).and_then(|c| CODEBOOK3.get(c)) {
        return EventDescription {
            name: (*name).to_owned(),
            significance: *significance,
        };
    }

    let significance = code
        .get(2..3)
        .map(SignificanceLevel::from)
        .unwrap_or_default();

    match code.get(0..2).and_then(|c| CODEBOOK2.get(c)) {
        Some(phenom) if significance != SignificanceLevel::Unknown => EventDescription {
            name: format!("{} {}", phenom, significance),
            significance,
        },
        _ => EventDescription {
            name: "Unrecognized Event".to_owned(),
            significance,
        },
    }
}

/// Three-character SAME event codes with fixed significance
static CODEBOOK3: phf::Map<&'static str, (&'static str, SignificanceLevel)> = phf_map! {
    // national activations
    "EAN" => ("Emergency Action Notification", SignificanceLevel::Warning),
    "NIC" => ("National Information Center", SignificanceLevel::Statement),

    // tests
    "DMO" => ("Practice/Demo Warning", SignificanceLevel::Warning),
    "NAT" => ("National Audible Test", SignificanceLevel::Test),
    "NPT" => ("National Periodic Test", SignificanceLevel::Test),
    "NST" => ("National Silent Test", SignificanceLevel::Test),
    "RMT" => ("Required Monthly Test", SignificanceLevel::Test),
    "RWT" => ("Required Weekly Test", SignificanceLevel::Test),

    // civil authority codes
    "ADR" => ("Administrative Message", SignificanceLevel::Statement),
    "BLU" => ("Blue Alert", SignificanceLevel::Warning),
    "CAE" => ("Child Abduction Emergency", SignificanceLevel::Emergency),
    "CDW" => ("Civil Danger Warning", SignificanceLevel::Warning),
    "CEM" => ("Civil Emergency Message", SignificanceLevel::Warning),
    "EQW" => ("Earthquake Warning", SignificanceLevel::Warning),
    "EVI" => ("Evacuation Immediate", SignificanceLevel::Warning),
    "FRW" => ("Fire Warning", SignificanceLevel::Warning),
    "HMW" => ("Hazardous Materials Warning", SignificanceLevel::Warning),
    "LAE" => ("Local Area Emergency", SignificanceLevel::Emergency),
    "LEW" => ("Law Enforcement Warning", SignificanceLevel::Warning),
    "NMN" => ("Network Message Notification", SignificanceLevel::Statement),
    "NUW" => ("Nuclear Power Plant Warning", SignificanceLevel::Warning),
    "RHW" => ("Radiological Hazard Warning", SignificanceLevel::Warning),
    "SPW" => ("Shelter In-Place Warning", SignificanceLevel::Warning),
    "TOE" => ("911 Telephone Outage Emergency", SignificanceLevel::Emergency),
    "VOW" => ("Volcano Warning", SignificanceLevel::Warning),

    // weather codes
    "FSW" => ("Flash Freeze Warning", SignificanceLevel::Warning),
    "HLS" => ("Hurricane Local Statement", SignificanceLevel::Statement),
    "SPS" => ("Special Weather Statement", SignificanceLevel::Statement),
    "SVR" => ("Severe Thunderstorm Warning", SignificanceLevel::Warning),
    "SVS" => ("Severe Weather Statement", SignificanceLevel::Statement),
    "TOR" => ("Tornado Warning", SignificanceLevel::Warning),
};

/// Two-character phenomenon codes; the third character is the significance
static CODEBOOK2: phf::Map<&'static str, &'static str> = phf_map! {
    "AV" => "Avalanche",
    "BZ" => "Blizzard",
    "CF" => "Coastal Flood",
    "DS" => "Dust Storm",
    "EW" => "Extreme Wind",
    "FF" => "Flash Flood",
    "FL" => "Flood",
    "FZ" => "Freeze",
    "HU" => "Hurricane",
    "HW" => "High Wind",
    "SM" => "Special Marine",
    "SQ" => "Snow Squall",
    "SS" => "Storm Surge",
    "SV" => "Severe Thunderstorm",
    "TO" => "Tornado",
    "TR" => "Tropical Storm",
    "TS" => "Tsunami",
    "WS" => "Winter Storm",
};
