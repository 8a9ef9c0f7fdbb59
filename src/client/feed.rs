//! Streaming feed connection: one WebSocket per viewer identifier.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::timeout,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::error::FeedError;

/// Append the viewer identifier to the configured feed URL.
pub fn feed_url_for(base: &str, viewer_id: &str) -> Result<Url, FeedError> {
    let mut url = Url::parse(base).map_err(|source| FeedError::InvalidUrl {
        url: base.to_string(),
        source: Box::new(source),
    })?;
    url.query_pairs_mut().append_pair("viewerId", viewer_id);
    Ok(url)
}

/// Open feed connection. Text frames arrive on the receiver returned by [`FeedSubscription::open`].
pub struct FeedSubscription {
    id: Uuid,
    shutdown: Option<oneshot::Sender<()>>,
    reader: JoinHandle<()>,
}

impl FeedSubscription {
    /// Connect to the feed for `viewer_id` and start forwarding text frames.
    ///
    /// The TCP connect and the WebSocket handshake together must finish within
    /// `connect_timeout`.
    pub async fn open(
        feed_url: &str,
        viewer_id: &str,
        capacity: usize,
        connect_timeout: Duration,
    ) -> Result<(Self, mpsc::Receiver<String>), FeedError> {
        let url = feed_url_for(feed_url, viewer_id)?;
        let (socket, _response) = match timeout(connect_timeout, connect_async(url.as_str())).await
        {
            Ok(connected) => connected.map_err(|source| FeedError::Connect {
                url: url.to_string(),
                source,
            })?,
            Err(_) => {
                return Err(FeedError::Timeout {
                    url: url.to_string(),
                    after: connect_timeout,
                });
            }
        };

        let id = Uuid::new_v4();
        info!(%id, viewer_id, "feed connected");

        let (frames_tx, frames_rx) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let reader = tokio::spawn(pump(id, socket, frames_tx, shutdown_rx));

        Ok((
            Self {
                id,
                shutdown: Some(shutdown_tx),
                reader,
            },
            frames_rx,
        ))
    }

    /// Connection identifier used in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the reader is still running.
    pub fn is_active(&self) -> bool {
        !self.reader.is_finished()
    }

    /// Send a close frame and wait for the reader to stop.
    pub async fn close(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(err) = (&mut self.reader).await {
            warn!(id = %self.id, error = %err, "feed reader did not stop cleanly");
        }
        debug!(id = %self.id, "feed closed");
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        if self.shutdown.is_some() {
            self.reader.abort();
        }
    }
}

async fn pump<S>(
    id: Uuid,
    mut socket: S,
    frames: mpsc::Sender<String>,
    mut shutdown: oneshot::Receiver<()>,
) where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
        + futures::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
        + Unpin,
{
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                if let Err(err) = socket.send(Message::Close(None)).await {
                    debug!(%id, error = %err, "failed to send close frame");
                }
                break;
            }
            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if frames.send(text.as_str().to_owned()).await.is_err() {
                        debug!(%id, "merge loop gone; stopping feed reader");
                        break;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    info!(%id, ?frame, "feed closed by server");
                    break;
                }
                // ping/pong are answered by tungstenite; binary frames carry nothing we read
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(%id, error = %err, "feed errored; not reconnecting");
                    break;
                }
                None => {
                    warn!(%id, "feed ended; not reconnecting");
                    break;
                }
            }
        }
    }
}
