//! Protocol detection

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

/// Pager protocol of a demodulator line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolKind {
    /// POCSAG alphanumeric or numeric page
    Pocsag,

    /// FLEX page, possibly one fragment of several
    Flex,

    /// SAME/EAS emergency alert header
    Eas,

    /// Anything else; usually demodulator noise
    Unrecognized,
}

impl ProtocolKind {
    /// Classify a line by its protocol signature
    ///
    /// Signatures are checked in priority order: POCSAG
    /// (`Address:` at the start of the line, optionally after a
    /// `POCSAG<baud>: ` prefix), then FLEX (`FLEX:` or `FLEX|`),
    /// then SAME/EAS (`EAS:`, `EAS|`, or `ZCZC-`). Message text is
    /// never mistaken for a POCSAG header.
    ///
    /// ```
    /// use pagerdec::ProtocolKind;
    ///
    /// assert_eq!(
    ///     ProtocolKind::Pocsag,
    ///     ProtocolKind::detect("POCSAG1200: Address: 1234567  Function: 0  Alpha:   HI")
    /// );
    /// assert_eq!(ProtocolKind::Eas, ProtocolKind::detect("EAS: NNNN"));
    /// assert_eq!(ProtocolKind::Unrecognized, ProtocolKind::detect("FLEX"));
    /// ```
    pub fn detect(line: &str) -> Self {
        lazy_static! {
            static ref POCSAG: Regex =
                Regex::new(r"^(?:POCSAG\d+: )?Address:").expect("bad POCSAG regexp");
            static ref FLEX: Regex = Regex::new(r"FLEX[:|]").expect("bad FLEX regexp");
            static ref EAS: Regex = Regex::new(r"EAS[:|]|ZCZC-").expect("bad EAS regexp");
        }

        if POCSAG.is_match(line) {
            ProtocolKind::Pocsag
        } else if FLEX.is_match(line) {
            ProtocolKind::Flex
        } else if EAS.is_match(line) {
            ProtocolKind::Eas
        } else {
            ProtocolKind::Unrecognized
        }
    }

    /// Protocol name
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolKind::Pocsag => "POCSAG",
            ProtocolKind::Flex => "FLEX",
            ProtocolKind::Eas => "EAS",
            ProtocolKind::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(
            ProtocolKind::detect("POCSAG512: Address:  123456  Function: 3 "),
            ProtocolKind::Pocsag
        );
        assert_eq!(
            ProtocolKind::detect("FLEX: 2017-06-04 08:15:30 1600/2/K/A 10.120 [001234567] ALN HI"),
            ProtocolKind::Flex
        );
        assert_eq!(
            ProtocolKind::detect("FLEX|2017-06-04 08:15:30|1600/2/K/A|10.120|001234567|ALN|HI"),
            ProtocolKind::Flex
        );
        assert_eq!(
            ProtocolKind::detect("EAS|ZCZC-WXR-RWT-012345+0015-0321115-KLOX/NWS-"),
            ProtocolKind::Eas
        );
        assert_eq!(
            ProtocolKind::detect("ZCZC-WXR-RWT-012345+0015-0321115-KLOX/NWS-"),
            ProtocolKind::Eas
        );

        assert_eq!(
            ProtocolKind::detect("Address: 123456 Function: 2 Alpha: HELLO WORLD"),
            ProtocolKind::Pocsag
        );

        // "Address:" inside message text is not a POCSAG header
        assert_eq!(
            ProtocolKind::detect("FLEX: Address: 1 Function: 0"),
            ProtocolKind::Flex
        );
        assert_eq!(
            ProtocolKind::detect(
                "FLEX|2017-06-04 08:15:30|1600/2/K/A|10.120|001234567|ALN|FIRE Address: 5 MAIN ST"
            ),
            ProtocolKind::Flex
        );
        assert_eq!(
            ProtocolKind::detect("EAS: Address: ZCZC-WXR-RWT-012345+0015-0321115-KLOX/NWS-"),
            ProtocolKind::Eas
        );
    }

    #[test]
    fn test_detect_noise() {
        for line in [
            "",
            "multimon-ng 1.1.9",
            "Enabled demodulators: POCSAG512 POCSAG1200 FLEX",
            "POCSAG1200: Alpha: no address",
            "flex: lowercase",
            "EAS NNNN",
            "noise Address: 1234567  Function: 0  Alpha: HI",
        ] {
            assert_eq!(ProtocolKind::detect(line), ProtocolKind::Unrecognized, "{}", line);
        }
    }
}
