//! SAME/EAS message adapter

use chrono::{DateTime, Utc};

use crate::message::{DecodedMessage, Payload};
use crate::protocol::ProtocolKind;
use crate::same::{SameDecoder, SameRecord};

/// SAME/EAS decoding options
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EasOptions {
    /// Event codes, like `RWT`, to ignore
    pub exclude_events: Vec<String>,

    /// `PSSCCC` location codes to accept; empty accepts all
    pub include_fips: Vec<String>,

    /// Append `-<alert type>` to the sender address
    pub address_add_type: bool,
}

impl Default for EasOptions {
    fn default() -> Self {
        Self {
            exclude_events: Vec::new(),
            include_fips: Vec::new(),
            address_add_type: true,
        }
    }
}

/// Decode a SAME/EAS line
///
/// Returns `None` if the `decoder` refuses the line. The message
/// is stamped with the `received` time: SAME headers have no
/// complete timestamp of their own.
pub fn decode_eas<D>(
    line: &str,
    decoder: &D,
    options: &EasOptions,
    received: &DateTime<Utc>,
) -> Option<DecodedMessage>
where
    D: SameDecoder + ?Sized,
{
    let record = decoder.decode(
        line,
        received,
        &options.exclude_events,
        &options.include_fips,
    )?;
    Some(adapt(record, options, received.timestamp()))
}

/// Convert an accepted SAME record into a message
///
/// The sending station is the address, optionally suffixed with
/// the alert type.
pub fn adapt(record: SameRecord, options: &EasOptions, timestamp: i64) -> DecodedMessage {
    let address = if options.address_add_type {
        format!("{}-{}", record.sender, record.alert_type)
    } else {
        record.sender.clone()
    };

    DecodedMessage {
        protocol: ProtocolKind::Eas,
        address,
        text: record.message.clone(),
        timestamp,
        payload: Some(Payload::Same(record)),
    }
}
