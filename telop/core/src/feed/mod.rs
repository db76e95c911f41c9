//! Feed Connection
//!
//! Owns the single streaming connection to the quake feed: connect, read
//! frames, classify them into [`FeedEvent`]s, and emit them into a
//! channel. On disconnect the [`ConnectionSupervisor`] decides between a
//! fixed-delay retry and giving up; exhausting the retry budget is the
//! one terminal condition, surfaced as [`FeedError::ReconnectExhausted`].

pub mod reconnect;
pub mod wire;

use futures::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};

use crate::events::FeedEvent;

pub use reconnect::{ConnectionState, ConnectionSupervisor, Decision, ReconnectPolicy};
pub use wire::{classify, CODE_EARLY_WARNING, CODE_EARTHQUAKE_INFO};

/// Default feed endpoint.
pub const DEFAULT_FEED_URL: &str = "wss://api-realtime-sandbox.p2pquake.net/v2/ws";

/// Errors from the feed driver.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The bounded reconnect budget ran out; no further attempt is made.
    #[error("Feed reconnect attempts exhausted after {attempts} tries")]
    ReconnectExhausted {
        /// Consecutive failed attempts at the time of giving up.
        attempts: u32,
    },
}

/// The live WebSocket driver for the quake feed.
pub struct FeedConnection {
    url: String,
    supervisor: ConnectionSupervisor,
}

impl FeedConnection {
    /// Create a driver for the given endpoint and retry policy.
    #[must_use]
    pub fn new(url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self {
            url: url.into(),
            supervisor: ConnectionSupervisor::new(policy),
        }
    }

    /// Run the connection loop until the receiver is dropped or the
    /// reconnect budget is exhausted.
    ///
    /// Every successful (re)connect emits [`FeedEvent::Opened`] before
    /// any frames. Classified frames are sent in arrival order; frames
    /// that fail classification are dropped inside [`classify`].
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::ReconnectExhausted`] when the supervisor
    /// gives up. A dropped receiver ends the loop with `Ok(())`.
    pub async fn run(mut self, tx: mpsc::Sender<FeedEvent>) -> Result<(), FeedError> {
        loop {
            self.supervisor.on_connecting();
            match connect_async(&self.url).await {
                Ok((mut socket, _response)) => {
                    info!(url = %self.url, "Connected to quake feed");
                    self.supervisor.on_open();
                    if tx.send(FeedEvent::Opened).await.is_err() {
                        info!("Feed receiver dropped; stopping feed driver");
                        return Ok(());
                    }

                    while let Some(next) = socket.next().await {
                        let text = match next {
                            Ok(Message::Text(text)) => text,
                            Ok(Message::Close(_)) => break,
                            Ok(_) => continue,
                            Err(err) => {
                                warn!(error = %err, "Feed read error");
                                break;
                            }
                        };
                        let Some(event) = classify(&text) else {
                            continue;
                        };
                        if tx.send(event).await.is_err() {
                            info!("Feed receiver dropped; stopping feed driver");
                            return Ok(());
                        }
                    }
                    warn!("Feed disconnected");
                }
                Err(err) => {
                    warn!(error = %err, url = %self.url, "Failed connecting to quake feed");
                }
            }

            match self.supervisor.on_closed() {
                Decision::RetryAfter(delay) => {
                    info!(
                        attempt = self.supervisor.attempts(),
                        delay_secs = delay.as_secs(),
                        "Retrying feed connection"
                    );
                    sleep(delay).await;
                }
                Decision::GiveUp => {
                    let attempts = self.supervisor.attempts();
                    error!(attempts, "Feed reconnect attempts exhausted, giving up");
                    return Err(FeedError::ReconnectExhausted { attempts });
                }
            }
        }
    }
}
