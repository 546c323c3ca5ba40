//! # pagerdec: Pager Demodulator Output Decoder
//!
//! This crate decodes the text output of a radio pager
//! demodulator, such as
//! [multimon-ng](https://github.com/EliasOenal/multimon-ng),
//! into normalized messages. Three protocols are understood:
//!
//! * **POCSAG** alphanumeric and numeric pages
//! * **FLEX** pages, including messages fragmented over
//!   several lines
//! * **SAME/EAS** emergency alert headers
//!
//! Each protocol has its own text grammar. Demodulators also
//! print a great deal of noise, which is quietly ignored.
//!
//! ## Example
//!
//! Feed lines to a [`Decoder`] in the order they arrive. The
//! decoder holds FLEX fragments between lines, so use one decoder
//! per input stream.
//!
//! ```
//! use chrono::Utc;
//! use pagerdec::{DecodeOptions, Decoder, ProtocolKind};
//!
//! let mut decoder = Decoder::new(DecodeOptions::default());
//!
//! let lines = [
//!     "POCSAG1200: Address: 1234567  Function: 3  Alpha:   ÄSTN 1Ü FIRE CALL<ETX>",
//!     "FLEX|2017-06-04 08:15:30|1600/2/F/A|10.120|002000123|ALN|STRUCTURE FI",
//!     "FLEX|2017-06-04 08:15:31|1600/2/C/A|10.120|002000123|ALN|RE AT 5 MAIN ST",
//!     "EAS:  ZCZC-WXR-RWT-012345+0015-0321115-KLOX/NWS-",
//!     "some demodulator noise",
//! ];
//!
//! let messages: Vec<_> = lines
//!     .iter()
//!     .filter_map(|line| decoder.decode(line, Utc::now()))
//!     .filter(|msg| msg.is_emittable())
//!     .collect();
//!
//! assert_eq!(3, messages.len());
//!
//! assert_eq!(ProtocolKind::Pocsag, messages[0].protocol);
//! assert_eq!("1234567", messages[0].address);
//! assert_eq!("[STN 1] FIRE CALL", messages[0].text);
//!
//! assert_eq!(ProtocolKind::Flex, messages[1].protocol);
//! assert_eq!("STRUCTURE FIRE AT 5 MAIN ST", messages[1].text);
//!
//! assert_eq!(ProtocolKind::Eas, messages[2].protocol);
//! assert_eq!("KLOX/NWS-T", messages[2].address);
//! ```
//!
//! ## Timestamps
//!
//! Many paging gateways embed the send time in the message text.
//! When [`DecodeOptions::use_timestamp`] is set, recognized
//! timestamps become the message time and are removed from the
//! text. See [`timestamp`].
//!
//! ## SAME/EAS
//!
//! SAME headers are decoded by a [`SameDecoder`]. The built-in
//! [`HeaderDecoder`] validates the header, filters by event and
//! location, and writes a readable summary of the alert. Supply
//! your own with [`Decoder::with_same_decoder()`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod eas;
mod flex;
mod fragments;
mod message;
mod pocsag;
mod protocol;
mod same;
pub mod timestamp;

pub use decoder::{decode_line, DecodeOptions, Decoder};
pub use eas::{adapt, decode_eas, EasOptions};
pub use fragments::FragmentStore;
pub use message::{pad_address, DecodedMessage, Payload, ADDRESS_WIDTH, MIN_ADDRESS_LEN};
pub use pocsag::clean_message;
pub use protocol::ProtocolKind;
pub use same::{
    describe_event, EventDescription, HeaderDecoder, InvalidDateErr, Originator, SameDecoder,
    SameHeader, SameHeaderErr, SameRecord, SignificanceLevel,
};
pub use timestamp::TimeBase;
