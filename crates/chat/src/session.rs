//! Interactive session establishment.
//!
//! Chat services like WhatsApp Web authenticate a new device by showing a
//! pairing code (usually rendered as a QR code) that the operator scans with
//! their phone. The [`Connector`] emits every challenge it receives on a
//! channel; [`establish`] relays them to the caller until the session is
//! ready, then returns the authenticated [`ChatHandle`].

use crate::ChatHandle;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

/// A login code the operator must confirm on another device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginChallenge {
    pub code: String,
}

/// Something that can open an authenticated chat session.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect, sending every login challenge to `challenges`, and resolve
    /// once the session is ready for history calls.
    ///
    /// Challenges may be re-issued (pairing codes expire), so more than one
    /// can be sent before the session becomes ready.
    async fn connect(&self, challenges: UnboundedSender<LoginChallenge>) -> Result<ChatHandle>;
}

/// Run the login phase, calling `on_challenge` for each challenge received.
///
/// Challenges are delivered in order and all of them are delivered before
/// this returns, even ones sent right before the session became ready.
pub async fn establish<F>(connector: &dyn Connector, mut on_challenge: F) -> Result<ChatHandle>
where
    F: FnMut(&LoginChallenge) + Send,
{
    let (tx, mut rx) = unbounded_channel();
    let connect = connector.connect(tx);
    tokio::pin!(connect);

    let result = loop {
        tokio::select! {
            biased;
            Some(challenge) = rx.recv() => on_challenge(&challenge),
            result = &mut connect => break result,
        }
    };
    while let Ok(challenge) = rx.try_recv() {
        on_challenge(&challenge);
    }

    match result {
        Ok(handle) => {
            tracing::info!("Chat session ready");
            Ok(handle)
        },
        Err(err) => {
            tracing::error!(error = %err, "Unable to establish chat session");
            Err(err.raise(ErrorKind::Authentication("session could not be established".to_string())))
        },
    }
}
