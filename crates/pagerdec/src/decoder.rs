//! Line decoder
//!
//! One line of demodulator output goes in; at most one
//! [`DecodedMessage`] comes out. FLEX fragments are held in a
//! [`FragmentStore`] between lines.

use chrono::{DateTime, Utc};
use log::{debug, trace};

use crate::eas::{decode_eas, EasOptions};
use crate::flex::{self, FragmentFlag};
use crate::fragments::FragmentStore;
use crate::message::{DecodedMessage, Payload};
use crate::pocsag::{self, clean_message};
use crate::protocol::ProtocolKind;
use crate::same::{HeaderDecoder, SameDecoder};
use crate::timestamp::{self, default_formats, TimeBase};

/// Decoding options
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Append the POCSAG function code to the address
    pub send_function_code: bool,

    /// Use timestamps embedded in POCSAG and FLEX message text
    pub use_timestamp: bool,

    /// Time zone of embedded timestamps
    pub time_base: TimeBase,

    /// SAME/EAS options
    pub eas: EasOptions,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            send_function_code: false,
            use_timestamp: true,
            time_base: TimeBase::default(),
            eas: EasOptions::default(),
        }
    }
}

/// Stateful line decoder
///
/// Owns the FLEX [`FragmentStore`]. Lines must be fed in the order
/// they were received.
///
/// ```
/// use chrono::Utc;
/// use pagerdec::{DecodeOptions, Decoder};
///
/// let mut dec = Decoder::new(DecodeOptions::default());
/// let msg = dec
///     .decode("POCSAG1200: Address: 1234567  Function: 0  Alpha:   TEST", Utc::now())
///     .expect("decoded");
/// assert!(msg.is_emittable());
/// assert_eq!("TEST", msg.text);
///
/// assert!(dec.decode("some noise", Utc::now()).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Decoder<S = HeaderDecoder> {
    options: DecodeOptions,
    fragments: FragmentStore,
    same: S,
}

impl Decoder<HeaderDecoder> {
    /// Create a decoder with the built-in SAME header decoder
    pub fn new(options: DecodeOptions) -> Self {
        Self::with_same_decoder(options, HeaderDecoder)
    }
}

impl<S> Decoder<S>
where
    S: SameDecoder,
{
    /// Create a decoder with a custom SAME decoder
    pub fn with_same_decoder(options: DecodeOptions, same: S) -> Self {
        Self {
            options,
            fragments: FragmentStore::new(),
            same,
        }
    }

    /// Decode one line
    ///
    /// `received` is the time the line was read. It stamps any
    /// message without a usable embedded timestamp.
    ///
    /// Returns `None` for noise and for FLEX fragments which are
    /// still awaiting completion. A returned message may still be
    /// unfit to relay; check
    /// [`is_emittable()`](DecodedMessage::is_emittable).
    pub fn decode(&mut self, line: &str, received: DateTime<Utc>) -> Option<DecodedMessage> {
        decode_line(
            line,
            &mut self.fragments,
            &self.options,
            &self.same,
            &received,
        )
    }

    /// Decoding options
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Pending FLEX fragments
    pub fn fragments(&self) -> &FragmentStore {
        &self.fragments
    }
}

/// Decode one line against an explicit fragment store
///
/// See [`Decoder::decode()`].
pub fn decode_line<D>(
    line: &str,
    fragments: &mut FragmentStore,
    options: &DecodeOptions,
    same: &D,
    received: &DateTime<Utc>,
) -> Option<DecodedMessage>
where
    D: SameDecoder + ?Sized,
{
    match ProtocolKind::detect(line) {
        ProtocolKind::Pocsag => decode_pocsag(line, options, received),
        ProtocolKind::Flex => decode_flex(line, fragments, options, received),
        ProtocolKind::Eas => decode_eas(line, same, &options.eas, received),
        ProtocolKind::Unrecognized => {
            trace!("unrecognized line: {}", line);
            None
        }
    }
}

fn decode_pocsag(
    line: &str,
    options: &DecodeOptions,
    received: &DateTime<Utc>,
) -> Option<DecodedMessage> {
    let fields = pocsag::parse(line, options.send_function_code)?;
    let mut timestamp = received.timestamp();

    let (text, payload) = match fields.message {
        Some(mut message) => {
            if options.use_timestamp {
                if let Some(found) =
                    timestamp::extract(&message, default_formats(), options.time_base)
                {
                    timestamp = found.epoch_seconds;
                    message = found.residual;
                }
            }
            let text = clean_message(&message);
            (text, non_empty(message))
        }
        None => (String::new(), None),
    };

    Some(DecodedMessage {
        protocol: ProtocolKind::Pocsag,
        address: fields.address,
        text,
        timestamp,
        payload,
    })
}

fn decode_flex(
    line: &str,
    fragments: &mut FragmentStore,
    options: &DecodeOptions,
    received: &DateTime<Utc>,
) -> Option<DecodedMessage> {
    let fields = flex::parse(line)?;
    let mut timestamp = received.timestamp();

    let mut message = match fields.message {
        Some(message) => message,
        None => {
            return Some(DecodedMessage {
                protocol: ProtocolKind::Flex,
                address: fields.address,
                text: String::new(),
                timestamp,
                payload: None,
            })
        }
    };

    match fields.flag {
        FragmentFlag::Start => {
            debug!("holding FLEX fragment for {}", fields.address);
            fragments.insert(fields.address, message);
            return None;
        }
        FragmentFlag::Completion => {
            let mut whole = fragments.take(&fields.address).unwrap_or_default();
            whole.push_str(&message);
            message = whole;
        }
        FragmentFlag::Complete => {}
    }

    if options.use_timestamp {
        let found = timestamp::extract(&message, default_formats(), options.time_base)
            .or_else(|| timestamp::extract(line, default_formats(), options.time_base));
        if let Some(found) = found {
            timestamp = found.epoch_seconds;
            message = message.replacen(&found.matched, "", 1);
        }
    }

    let text = message.trim().to_owned();
    Some(DecodedMessage {
        protocol: ProtocolKind::Flex,
        address: fields.address,
        payload: non_empty(text.clone()),
        text,
        timestamp,
    })
}

fn non_empty(message: String) -> Option<Payload> {
    if message.trim().is_empty() {
        None
    } else {
        Some(Payload::Text(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    fn received() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 2, 1, 12, 0, 0).unwrap()
    }

    fn options() -> DecodeOptions {
        DecodeOptions {
            time_base: TimeBase::Utc,
            ..DecodeOptions::default()
        }
    }

    fn decode(dec: &mut Decoder, line: &str) -> Option<DecodedMessage> {
        dec.decode(line, received())
    }

    #[test]
    fn test_unrecognized() {
        let mut dec = Decoder::new(options());
        for line in ["", "garbage 1234", "POCSAG1200: Alpha: HI", "EAS: NNNN", "FLEX: ???"] {
            assert_eq!(decode(&mut dec, line), None, "{}", line);
        }
        assert!(dec.fragments().is_empty());
    }

    #[test]
    fn test_pocsag_address() {
        let line = "Address: 123456 Function: 2 Alpha: HELLO WORLD";

        let mut dec = Decoder::new(options());
        let msg = decode(&mut dec, line).expect("decoded");
        assert_eq!(msg.protocol, ProtocolKind::Pocsag);
        assert_eq!(msg.address, "123456");
        assert_eq!(msg.padded_address(), "0123456");
        assert_eq!(msg.text, "HELLO WORLD");
        assert_eq!(msg.timestamp, received().timestamp());
        assert!(msg.is_emittable());

        let mut dec = Decoder::new(DecodeOptions {
            send_function_code: true,
            ..options()
        });
        let msg = decode(&mut dec, line).expect("decoded");
        assert_eq!(msg.address, "1234562");
    }

    #[test]
    fn test_pocsag_cleanup() {
        let mut dec = Decoder::new(options());
        let msg = decode(
            &mut dec,
            "POCSAG1200: Address: 1234567  Function: 3  Alpha:   ÄBRIGADEÜ STRUCTURE FIRE<ETX><EOT>",
        )
        .expect("decoded");
        assert_eq!(msg.text, "[BRIGADE] STRUCTURE FIRE");
        assert_eq!(
            msg.payload,
            Some(Payload::Text("ÄBRIGADEÜ STRUCTURE FIRE<ETX><EOT>".to_owned()))
        );
    }

    #[test]
    fn test_pocsag_numeric() {
        let mut dec = Decoder::new(options());
        let msg = decode(
            &mut dec,
            "POCSAG512: Address:   12345  Function: 0  Numeric: 555-1234",
        )
        .expect("decoded");
        assert_eq!(msg.text, "555-1234");
        assert_eq!(msg.padded_address(), "0012345");
        assert!(msg.is_emittable());
    }

    #[test]
    fn test_pocsag_no_payload() {
        let mut dec = Decoder::new(options());
        let msg = decode(&mut dec, "POCSAG1200: Address: 1234567  Function: 1").expect("decoded");
        assert_eq!(msg.text, "");
        assert_eq!(msg.payload, None);
        assert!(!msg.is_emittable());

        let msg = decode(&mut dec, "POCSAG1200: Address: 1234567  Function: 1  Alpha:    ")
            .expect("decoded");
        assert!(!msg.is_emittable());
    }

    #[test]
    fn test_pocsag_short_address() {
        let mut dec = Decoder::new(options());
        let msg = decode(&mut dec, "POCSAG1200: Address: 12  Function: 0  Alpha: HI")
            .expect("decoded");
        assert!(!msg.is_emittable());
    }

    #[test]
    fn test_pocsag_timestamp() {
        let line = "POCSAG1200: Address: 1234567  Function: 0  Alpha: ALERT 04 June 2017 08:15:30 FLOODING";
        let expect = Utc.with_ymd_and_hms(2017, 6, 4, 8, 15, 30).unwrap().timestamp();

        let mut dec = Decoder::new(options());
        let msg = decode(&mut dec, line).expect("decoded");
        assert_eq!(msg.timestamp, expect);
        assert_eq!(msg.text, "ALERT  FLOODING");
        assert!(!msg.text.contains("2017"));

        let mut dec = Decoder::new(DecodeOptions {
            use_timestamp: false,
            ..options()
        });
        let msg = decode(&mut dec, line).expect("decoded");
        assert_eq!(msg.timestamp, received().timestamp());
        assert_eq!(msg.text, "ALERT 04 June 2017 08:15:30 FLOODING");
    }

    #[test]
    fn test_flex_complete() {
        let mut dec = Decoder::new(options());
        let msg = decode(
            &mut dec,
            "FLEX: 2017-06-04 08:15:30 1600/2/K/A 10.120 [001234567] ALN STRUCTURE FIRE",
        )
        .expect("decoded");
        assert_eq!(msg.protocol, ProtocolKind::Flex);
        assert_eq!(msg.address, "001234567");
        assert_eq!(msg.text, "STRUCTURE FIRE");
        assert_eq!(
            msg.timestamp,
            Utc.with_ymd_and_hms(2017, 6, 4, 8, 15, 30).unwrap().timestamp()
        );
        assert!(msg.is_emittable());
    }

    #[test]
    fn test_flex_address_in_text() {
        let mut dec = Decoder::new(options());
        let msg = decode(
            &mut dec,
            "FLEX|2017-06-04 08:15:30|1600/2/K/A|10.120|001234567|ALN|STRUCTURE FIRE Address: 5 MAIN ST",
        )
        .expect("decoded");
        assert_eq!(msg.protocol, ProtocolKind::Flex);
        assert_eq!(msg.address, "001234567");
        assert_eq!(msg.text, "STRUCTURE FIRE Address: 5 MAIN ST");
        assert!(msg.is_emittable());
    }

    #[test]
    fn test_flex_message_timestamp() {
        let expect = Utc.with_ymd_and_hms(2017, 6, 4, 8, 15, 30).unwrap().timestamp();

        // the date in the text wins over the header and is removed
        let mut dec = Decoder::new(options());
        let msg = decode(
            &mut dec,
            "FLEX|2017-06-04 09:00:00|1600/2/K/A|10.120|001234567|ALN|ALERT 04 June 2017 08:15:30 FLOODING",
        )
        .expect("decoded");
        assert_eq!(msg.timestamp, expect);
        assert_eq!(msg.text, "ALERT  FLOODING");
        assert_eq!(msg.payload, Some(Payload::Text("ALERT  FLOODING".to_owned())));

        // a date split across fragments is found after reassembly
        let mut dec = Decoder::new(options());
        assert_eq!(
            decode(&mut dec, "FLEX|2017-06-04 09:00:00|1600/2/F/A|10.120|100|ALN|ALERT 04 June 20"),
            None
        );
        let msg = decode(
            &mut dec,
            "FLEX|2017-06-04 09:00:01|1600/2/C/A|10.120|100|ALN|17 08:15:30 FLOODING",
        )
        .expect("decoded");
        assert_eq!(msg.timestamp, expect);
        assert_eq!(msg.text, "ALERT  FLOODING");
        assert!(dec.fragments().is_empty());

        // disabled: the header time is not used either
        let mut dec = Decoder::new(DecodeOptions {
            use_timestamp: false,
            ..options()
        });
        let msg = decode(
            &mut dec,
            "FLEX|2017-06-04 09:00:00|1600/2/K/A|10.120|001234567|ALN|ALERT 04 June 2017 08:15:30 FLOODING",
        )
        .expect("decoded");
        assert_eq!(msg.timestamp, received().timestamp());
        assert_eq!(msg.text, "ALERT 04 June 2017 08:15:30 FLOODING");
    }

    #[test]
    fn test_flex_fragments() {
        let mut dec = Decoder::new(options());
        assert_eq!(
            decode(&mut dec, "FLEX|2017-06-04 08:15:30|1600/2/F/A|10.120|100|ALN|ABC"),
            None
        );
        assert_eq!(dec.fragments().get("100"), Some("ABC"));

        let msg = decode(&mut dec, "FLEX|2017-06-04 08:15:31|1600/2/C/A|10.120|100|ALN|DEF")
            .expect("decoded");
        assert_eq!(msg.address, "100");
        assert_eq!(msg.text, "ABCDEF");
        assert!(msg.is_emittable());
        assert!(!dec.fragments().contains("100"));
    }

    #[test]
    fn test_flex_dangling_fragment() {
        let mut dec = Decoder::new(options());
        assert_eq!(
            decode(&mut dec, "FLEX: 2017-06-04 08:15:30 1600/2/F/A 10.120 [100] ALN ABC"),
            None
        );

        // other traffic does not disturb it
        let msg = decode(&mut dec, "FLEX: 2017-06-04 08:15:31 1600/2/K/A 10.120 [200] ALN XYZ")
            .expect("decoded");
        assert_eq!(msg.text, "XYZ");
        assert_eq!(dec.fragments().get("100"), Some("ABC"));

        // superseded by a newer fragment
        assert_eq!(
            decode(&mut dec, "FLEX: 2017-06-04 08:15:32 1600/2/F/A 10.120 [100] ALN QRS"),
            None
        );
        assert_eq!(dec.fragments().get("100"), Some("QRS"));
        assert_eq!(dec.fragments().len(), 1);
    }

    #[test]
    fn test_flex_orphan_completion() {
        let mut dec = Decoder::new(options());
        let msg = decode(&mut dec, "FLEX: 2017-06-04 08:15:30 1600/2/C/A 10.120 [100] ALN DEF")
            .expect("decoded");
        assert_eq!(msg.text, "DEF");
    }

    #[test]
    fn test_flex_no_payload() {
        let mut dec = Decoder::new(options());
        let msg = decode(&mut dec, "FLEX: 2017-06-04 08:15:30 1600/2/K/A 10.120 [001234567] TON")
            .expect("decoded");
        assert!(!msg.is_emittable());
    }

    #[test]
    fn test_eas() {
        let mut dec = Decoder::new(options());
        let msg = decode(&mut dec, "EAS:  ZCZC-WXR-RWT-012345+0015-0321115-KLOX/NWS-")
            .expect("decoded");
        assert_eq!(msg.protocol, ProtocolKind::Eas);
        assert_eq!(msg.address, "KLOX/NWS-T");
        assert_eq!(msg.timestamp, received().timestamp());
        assert!(msg.text.starts_with("National Weather Service has issued a Required Weekly Test"));
        assert!(matches!(msg.payload, Some(Payload::Same(_))));
        assert!(msg.is_emittable());

        let mut dec = Decoder::new(DecodeOptions {
            eas: EasOptions {
                exclude_events: vec!["RWT".to_owned()],
                ..EasOptions::default()
            },
            ..options()
        });
        assert_eq!(
            decode(&mut dec, "EAS:  ZCZC-WXR-RWT-012345+0015-0321115-KLOX/NWS-"),
            None
        );
    }

    #[test]
    fn test_idempotent() {
        let lines = [
            "POCSAG1200: Address: 1234567  Function: 3  Alpha:   ALERT 04 June 2017 08:15:30 X",
            "FLEX: 2017-06-04 08:15:30 1600/2/K/A 10.120 [001234567] ALN STRUCTURE FIRE",
            "EAS:  ZCZC-WXR-RWT-012345+0015-0321115-KLOX/NWS-",
            "noise",
        ];

        for line in lines {
            let mut first = Decoder::new(options());
            let mut second = Decoder::new(options());
            assert_eq!(decode(&mut first, line), decode(&mut second, line), "{}", line);
        }
    }

    #[test]
    fn test_decode_line_explicit_store() {
        let mut store = FragmentStore::new();
        let opts = options();
        let line = "FLEX: 2017-06-04 08:15:30 1600/2/F/A 10.120 [100] ALN ABC";
        assert_eq!(
            decode_line(line, &mut store, &opts, &HeaderDecoder, &received()),
            None
        );
        assert_eq!(store.get("100"), Some("ABC"));
    }
}
