//! Pipeline driver
//!
//! Reads demodulator output one line at a time, decodes it, and
//! hands every complete message to the [`Sender`]. Lines are echoed
//! to stdout as they are processed:
//!
//! ```txt
//! 2017-06-04 08:15:30: 1234567: [STN 1] FIRE CALL
//! ```
//!
//! Lines which carry no message are echoed verbatim after the
//! timestamp. The echo is suppressed with `--quiet`.
//!
//! Input which is not valid UTF-8 is decoded lossily. The driver
//! runs until the input closes, and it never waits on a delivery.
//! The end of input is logged at `warn` level, so `--quiet`
//! hides it along with everything else.

use std::future::Future;

use chrono::{Local, Utc};
use log::{error, info, warn};
use pagerdec::Decoder;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::sender::{OutboundForm, Sender};
use crate::transport::Transport;

/// Echo timestamp format
const ECHO_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Driver settings
#[derive(Clone, Debug)]
pub struct RunConfig<'a> {
    /// Source identifier for every outbound message
    pub source: &'a str,

    /// Do not echo lines to stdout
    pub quiet: bool,
}

/// What the driver saw
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines read
    pub lines: u64,

    /// Messages handed to the sender
    pub messages: u64,
}

/// Run the pipeline until `input` closes
///
/// Deliveries are spawned on `sender` and continue in the
/// background. Returns an error only if `input` fails.
pub async fn run<R, T>(
    cfg: &RunConfig<'_>,
    decoder: &mut Decoder,
    sender: &Sender<T>,
    mut input: R,
) -> std::io::Result<RunSummary>
where
    R: AsyncBufRead + Unpin,
    T: Transport + 'static,
{
    let mut summary = RunSummary::default();
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        summary.lines += 1;

        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(|c| c == '\r' || c == '\n');

        let echo_time = Local::now().format(ECHO_TIME_FORMAT);
        match decoder.decode(line, Utc::now()) {
            Some(msg) if msg.is_emittable() => {
                if !cfg.quiet {
                    println!("{}: {}", echo_time, msg);
                }
                sender.send(OutboundForm::new(&msg, cfg.source), 0);
                summary.messages += 1;
            }
            _ => {
                if !cfg.quiet {
                    println!("{}: {}", echo_time, line);
                }
            }
        }
    }

    warn!(
        "input closed after {} lines; {} messages relayed",
        summary.lines, summary.messages
    );
    Ok(summary)
}

/// Resolves when `signal` fires
///
/// If `signal` fails, as when a Ctrl+C handler cannot be
/// installed, the error is logged and this never resolves.
/// Pending deliveries then run to completion.
pub async fn on_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        error!("unable to listen for Ctrl+C: {}", err);
        std::future::pending::<()>().await;
    }
}

/// Wait for pending deliveries, or abandon them on `interrupt`
pub async fn finish<T, F>(sender: &Sender<T>, interrupt: F)
where
    T: Transport + 'static,
    F: Future<Output = ()>,
{
    let pending = sender.in_flight();
    if pending > 0 {
        info!("waiting for {} pending deliveries", pending);
    }

    tokio::select! {
        () = sender.wait() => {}
        () = interrupt => {
            warn!("interrupted: abandoning {} pending deliveries", sender.in_flight());
            sender.cancel();
            sender.wait().await;
        }
    }
}
