//! POCSAG line parsing
//!
//! multimon-ng prints POCSAG pages as
//!
//! ```txt
//! POCSAG1200: Address: 1234567  Function: 3  Alpha:   FIRE CALL<EOT>
//! POCSAG512: Address:  123456  Function: 0  Numeric: 555-1234
//! POCSAG1200: Address: 1234567  Function: 1
//! ```

use lazy_static::lazy_static;
use regex::Regex;

/// Fields of a POCSAG line
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PocsagFields {
    pub address: String,
    pub message: Option<String>,
}

/// Parse a POCSAG line
///
/// Returns `None` if no address can be located. If
/// `send_function_code` is set, the function code digit is
/// appended to the address. The message is trimmed but not yet
/// cleaned; see [`clean_message()`].
pub(crate) fn parse(line: &str, send_function_code: bool) -> Option<PocsagFields> {
    lazy_static! {
        static ref ADDRESS: Regex =
            Regex::new(r"Address:(.*?)Function").expect("bad POCSAG address regexp");
        static ref FUNCTION: Regex =
            Regex::new(r"Address:.*?Function: (\d)").expect("bad POCSAG function regexp");
    }

    let mut address = ADDRESS.captures(line)?.get(1)?.as_str().trim().to_owned();
    if send_function_code {
        if let Some(func) = FUNCTION.captures(line).and_then(|c| c.get(1)) {
            address.push_str(func.as_str());
        }
    }

    let message = trailing(line, MARKER_ALPHA)
        .or_else(|| trailing(line, MARKER_NUMERIC))
        .map(|msg| msg.trim().to_owned());

    Some(PocsagFields { address, message })
}

/// Remove control codes and undo 7-bit character substitution
///
/// Control characters are printed by the demodulator as
/// three-letter codes like `<ETX>`, which are removed. Square
/// brackets arrive as the German characters `Ä` and `Ü`, which
/// are mapped back to `[` and `]`.
///
/// ```
/// use pagerdec::clean_message;
///
/// assert_eq!("[1] FIRE", clean_message("Ä1Ü FIRE<ETX><EOT>"));
/// ```
pub fn clean_message(text: &str) -> String {
    lazy_static! {
        static ref CONTROL: Regex = Regex::new(r"<[A-Za-z]{3}>").expect("bad control regexp");
    }

    CONTROL
        .replace_all(text, "")
        .replace('Ä', "[")
        .replace('Ü', "]")
        .trim()
        .to_owned()
}

// Text after the first `marker`, if the marker is present
fn trailing<'l>(line: &'l str, marker: &str) -> Option<&'l str> {
    line.find(marker).map(|pos| &line[pos + marker.len()..])
}

const MARKER_ALPHA: &str = "Alpha:";
const MARKER_NUMERIC: &str = "Numeric:";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alpha() {
        let fields = parse(
            "POCSAG1200: Address: 1234567  Function: 3  Alpha:   FIRE CALL<EOT>",
            false,
        )
        .expect("no address");
        assert_eq!(fields.address, "1234567");
        assert_eq!(fields.message.as_deref(), Some("FIRE CALL<EOT>"));

        let fields = parse(
            "POCSAG1200: Address: 1234567  Function: 3  Alpha:   FIRE CALL<EOT>",
            true,
        )
        .expect("no address");
        assert_eq!(fields.address, "12345673");
    }

    #[test]
    fn test_parse_numeric() {
        let fields = parse("POCSAG512: Address:  123456  Function: 0  Numeric: 555-1234 ", false)
            .expect("no address");
        assert_eq!(fields.address, "123456");
        assert_eq!(fields.message.as_deref(), Some("555-1234"));
    }

    #[test]
    fn test_parse_tone_only() {
        let fields =
            parse("POCSAG1200: Address: 1234567  Function: 1", false).expect("no address");
        assert_eq!(fields.address, "1234567");
        assert_eq!(fields.message, None);
    }

    #[test]
    fn test_parse_no_function() {
        assert_eq!(parse("POCSAG1200: Address: 1234567  Alpha: HI", false), None);
    }

    #[test]
    fn test_clean_message() {
        assert_eq!(clean_message("<STX>HELLO<ETX>"), "HELLO");
        assert_eq!(clean_message("ÄUNIT 5Ü RESPOND"), "[UNIT 5] RESPOND");
        assert_eq!(clean_message("keep <AB> and <ABCD>"), "keep <AB> and <ABCD>");
        assert_eq!(clean_message("   "), "");
    }
}
