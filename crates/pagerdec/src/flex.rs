//! FLEX line parsing
//!
//! multimon-ng prints FLEX pages in one of two layouts:
//!
//! ```txt
//! FLEX: 2017-06-04 08:15:30 1600/2/K/A 10.120 [001234567] ALN FIRE CALL
//! FLEX|2017-06-04 08:15:30|1600/2/K/A|10.120|001234567|ALN|FIRE CALL
//! ```
//!
//! The `1600/2/K/A` token carries the fragment flag. Long
//! messages are split across lines which are flagged `F`
//! (fragment follows) and finally `C` (completion).

use lazy_static::lazy_static;
use regex::Regex;

/// Fragmentation state of a FLEX line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum FragmentFlag {
    /// `F`: more fragments follow
    Start,

    /// `C`: completes a previously held fragment
    Completion,

    /// `K`, or any unknown flag: the line is a whole message
    Complete,
}

/// Fields of a FLEX line
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FlexFields {
    pub address: String,
    pub message: Option<String>,
    pub flag: FragmentFlag,
}

/// Parse a FLEX line
///
/// Returns `None` if no address can be located. The message is
/// `None` unless the line has an `ALN`, `GPN`, or `NUM` payload.
pub(crate) fn parse(line: &str) -> Option<FlexFields> {
    lazy_static! {
        static ref ADDRESS: Regex =
            Regex::new(r"FLEX[:|] ?.*?[\[|](\d*?)[\]| ]").expect("bad FLEX address regexp");
        static ref TYPE: Regex =
            Regex::new(r"[ |](?:ALN|GPN|NUM)[ |]").expect("bad FLEX type regexp");
        static ref MESSAGE: Regex =
            Regex::new(r"FLEX[:|].*[|\[][0-9 ]*[|\]] ?...[ |](.+)").expect("bad FLEX message regexp");
    }

    let address = ADDRESS.captures(line)?.get(1)?.as_str().trim().to_owned();
    if address.is_empty() {
        return None;
    }

    let message = if TYPE.is_match(line) {
        MESSAGE
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_owned())
    } else {
        None
    };

    Some(FlexFields {
        address,
        message,
        flag: fragment_flag(line),
    })
}

// Find the fragment flag in the `NNNN/D/X/c` token
fn fragment_flag(line: &str) -> FragmentFlag {
    lazy_static! {
        static ref FLAG: Regex =
            Regex::new(r"[ |][0-9]{4}/[0-9]/(.)/.[ |]").expect("bad FLEX flag regexp");
    }

    let flags: Vec<&str> = FLAG
        .captures_iter(line)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();

    if flags.contains(&"F") {
        FragmentFlag::Start
    } else if flags.contains(&"C") {
        FragmentFlag::Completion
    } else {
        FragmentFlag::Complete
    }
}
