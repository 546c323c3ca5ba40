//! Reliable message delivery
//!
//! Each message is delivered by its own task. A failed attempt is
//! retried after an exponentially-growing delay: one second, then
//! two, then four, and so on. After ten retries the message is
//! abandoned. Deliveries are independent of one another, so a slow
//! or failing message never holds up the messages behind it.
//!
//! A [`Sender`] tracks every delivery task it spawns. Call
//! [`Sender::wait()`] to let pending deliveries finish, or
//! [`Sender::cancel()`] to abandon them at their next back-off.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use pagerdec::DecodedMessage;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::transport::Transport;

/// Form body submitted to the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutboundForm {
    /// Zero-padded address
    pub address: String,

    /// Message text
    pub message: String,

    /// Message time, seconds since the UNIX epoch
    pub datetime: i64,

    /// Configured source identifier
    pub source: String,
}

impl OutboundForm {
    /// Form for a decoded message, from the given `source`
    pub fn new(msg: &DecodedMessage, source: &str) -> Self {
        Self {
            address: msg.padded_address(),
            message: msg.text.clone(),
            datetime: msg.timestamp,
            source: source.to_owned(),
        }
    }
}

/// Exponential back-off between delivery attempts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries permitted after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry_count` (counting from zero)
    ///
    /// Returns `None` once the retries are used up.
    pub fn delay_for(&self, retry_count: u32) -> Option<Duration> {
        if retry_count >= self.max_retries {
            return None;
        }

        Some(
            2u32.checked_pow(retry_count)
                .and_then(|factor| self.base_delay.checked_mul(factor))
                .unwrap_or(Duration::MAX),
        )
    }
}

/// How a delivery ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The server accepted the message
    Delivered { attempts: u32 },

    /// Every retry failed
    Abandoned { attempts: u32 },

    /// Shutdown was requested while waiting to retry
    Cancelled,
}

/// Deliver `form`, retrying until success or the policy gives up
///
/// `retry_count` is the number of retries already spent. Cancelling
/// `shutdown` interrupts the back-off sleep but never an attempt
/// which is already in flight.
pub async fn deliver<T>(
    transport: &T,
    form: &OutboundForm,
    retry_count: u32,
    policy: &RetryPolicy,
    shutdown: &CancellationToken,
) -> DeliveryOutcome
where
    T: Transport + ?Sized,
{
    let mut retries = retry_count;
    loop {
        let attempts = retries - retry_count + 1;
        let err = match transport.submit(form).await {
            Ok(()) => {
                debug!("delivered message for {}", form.address);
                return DeliveryOutcome::Delivered { attempts };
            }
            Err(err) => err,
        };

        warn!("message for {} failed to deliver: {}", form.address, err);
        let delay = match policy.delay_for(retries) {
            Some(delay) => delay,
            None => {
                error!(
                    "message for {} failed to deliver after {} retries, giving up",
                    form.address, retries
                );
                return DeliveryOutcome::Abandoned { attempts };
            }
        };

        info!(
            "retrying message for {} in {} ms",
            form.address,
            delay.as_millis()
        );
        tokio::select! {
            () = sleep(delay) => {}
            () = shutdown.cancelled() => {
                warn!("message for {} abandoned at shutdown", form.address);
                return DeliveryOutcome::Cancelled;
            }
        }

        retries += 1;
    }
}

/// Spawns and tracks delivery tasks
#[derive(Debug)]
pub struct Sender<T> {
    transport: Arc<T>,
    policy: RetryPolicy,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl<T> Sender<T>
where
    T: Transport + 'static,
{
    /// New sender over the given `transport`
    pub fn new(transport: Arc<T>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Start delivering `form` in the background
    ///
    /// `retry_count` is the number of retries already spent; new
    /// messages start at zero. Returns immediately. The handle
    /// resolves to the outcome, but it need not be awaited.
    pub fn send(&self, form: OutboundForm, retry_count: u32) -> JoinHandle<DeliveryOutcome> {
        let transport = Arc::clone(&self.transport);
        let policy = self.policy;
        let shutdown = self.shutdown.clone();
        self.tracker
            .spawn(async move { deliver(&*transport, &form, retry_count, &policy, &shutdown).await })
    }

    /// Number of deliveries still running
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Abandon pending deliveries at their next back-off
    pub fn cancel(&self) {
        self.shutdown.cancel();
    }

    /// Accept no more messages and wait for every delivery to end
    pub async fn wait(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
