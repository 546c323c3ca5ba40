//! Decoded pager messages

use std::fmt;

use crate::protocol::ProtocolKind;
use crate::same::SameRecord;

/// Width that short addresses are zero-padded to
pub const ADDRESS_WIDTH: usize = 7;

/// Addresses this short or shorter are demodulator noise
pub const MIN_ADDRESS_LEN: usize = 2;

/// Protocol-specific raw content of a message
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Payload {
    /// POCSAG or FLEX text, before cleanup
    Text(String),

    /// Accepted SAME/EAS header
    Same(SameRecord),
}

/// A normalized message decoded from one or more lines
///
/// Not every `DecodedMessage` is worth relaying: see
/// [`is_emittable()`](DecodedMessage::is_emittable).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DecodedMessage {
    /// Protocol which produced this message
    pub protocol: ProtocolKind,

    /// Pager or station address, unpadded
    pub address: String,

    /// Message text, cleaned up for display
    pub text: String,

    /// UNIX timestamp of the message, in seconds
    pub timestamp: i64,

    /// Raw payload, or `None` if the line carried no message
    pub payload: Option<Payload>,
}

impl DecodedMessage {
    /// True if this message should be relayed
    ///
    /// The address must be longer than [`MIN_ADDRESS_LEN`]
    /// characters and a payload must be present. Anything else is
    /// treated as noise.
    pub fn is_emittable(&self) -> bool {
        self.address.chars().count() > MIN_ADDRESS_LEN && self.payload.is_some()
    }

    /// Address, zero-padded to [`ADDRESS_WIDTH`]
    pub fn padded_address(&self) -> String {
        pad_address(&self.address, ADDRESS_WIDTH)
    }
}

impl fmt::Display for DecodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.padded_address(), self.text)
    }
}

/// Left-pad `address` with zeros to `width` characters
///
/// Addresses which are already `width` characters or longer are
/// returned unchanged.
///
/// ```
/// use pagerdec::pad_address;
///
/// assert_eq!("0000042", pad_address("42", 7));
/// assert_eq!("12345678", pad_address("12345678", 7));
/// ```
pub fn pad_address(address: &str, width: usize) -> String {
    format!("{:0>width$}", address, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(address: &str, payload: Option<Payload>) -> DecodedMessage {
        DecodedMessage {
            protocol: ProtocolKind::Pocsag,
            address: address.to_owned(),
            text: "TEXT".to_owned(),
            timestamp: 0,
            payload,
        }
    }

    #[test]
    fn test_pad_address() {
        assert_eq!(pad_address("42", 7), "0000042");
        assert_eq!(pad_address("1234567", 7), "1234567");
        assert_eq!(pad_address("KLOX/NWS-W", 7), "KLOX/NWS-W");
        assert_eq!(pad_address("", 3), "000");
    }

    #[test]
    fn test_is_emittable() {
        let text = || Some(Payload::Text("TEXT".to_owned()));
        assert!(message("123", text()).is_emittable());
        assert!(!message("12", text()).is_emittable());
        assert!(!message("", text()).is_emittable());
        assert!(!message("123456", None).is_emittable());
    }

    #[test]
    fn test_display() {
        let msg = message("123456", Some(Payload::Text("TEXT".to_owned())));
        assert_eq!(format!("{}", msg), "0123456: TEXT");
    }
}
