// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The sliding-door controller.
//!
//! [`SlidingDoor`] is the surface the host platform talks to: one configured
//! device, one shared HTTP client, one reconciler. Commands are fire and
//! forget; completion of the HTTP call only means the actuator accepted the
//! command, and the final position is confirmed by a later [`SlidingDoor::refresh`].

use std::time::Duration;

use parking_lot::Mutex;

use crate::client::{DeviceClient, EndpointConfig};
use crate::error::{Error, ProtocolError};
use crate::reconciler::{CommandKind, DoorState, StatusReconciler};

/// A configured IntelliDrive sliding door.
///
/// Commands and polls may run concurrently; reconciler updates are
/// serialized behind a mutex that is never held across an await, so an
/// in-flight poll cannot interleave with intent recording.
///
/// # Examples
///
/// ```no_run
/// use slidedrive::SlidingDoor;
///
/// #[tokio::main]
/// async fn main() -> slidedrive::Result<()> {
///     let door = SlidingDoor::builder("device.local")
///         .with_token("secret")
///         .connect()
///         .await?;
///
///     door.open().await?;
///     let state = door.refresh().await;
///     println!("door is {state}");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct SlidingDoor {
    client: DeviceClient,
    reconciler: Mutex<StatusReconciler>,
}

impl SlidingDoor {
    /// Creates a builder for the specified host.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> SlidingDoorBuilder {
        SlidingDoorBuilder::new(host)
    }

    fn new(client: DeviceClient, reconciler: StatusReconciler) -> Self {
        Self {
            client,
            reconciler: Mutex::new(reconciler),
        }
    }

    /// Returns the underlying device client.
    #[must_use]
    pub fn client(&self) -> &DeviceClient {
        &self.client
    }

    /// Issues a command: records the intent first, then dispatches. The
    /// intent must land before the HTTP call completes so a concurrent poll
    /// is interpreted against it.
    async fn issue(&self, kind: CommandKind) -> Result<(), Error> {
        self.reconciler.lock().note_command_issued(kind);
        match kind {
            CommandKind::Open => self.client.open().await,
            CommandKind::Close => self.client.close().await,
            CommandKind::Stop => self.client.stop().await,
        }
    }

    /// Starts opening the door.
    ///
    /// # Errors
    ///
    /// Returns error if communication fails after retries.
    pub async fn open(&self) -> Result<(), Error> {
        self.issue(CommandKind::Open).await
    }

    /// Starts closing the door.
    ///
    /// # Errors
    ///
    /// Returns error if communication fails after retries.
    pub async fn close(&self) -> Result<(), Error> {
        self.issue(CommandKind::Close).await
    }

    /// Halts door motion. Clears the pending intent; the stopped position is
    /// unknown until the next poll reports a terminal position.
    ///
    /// # Errors
    ///
    /// Returns error if communication fails after retries.
    pub async fn stop(&self) -> Result<(), Error> {
        self.issue(CommandKind::Stop).await
    }

    /// Polls the device and reconciles the reported status.
    ///
    /// A failed poll (transport error or no usable data) is logged and
    /// leaves the state untouched; one bad cycle never resets the door to
    /// `Unknown`.
    pub async fn refresh(&self) -> DoorState {
        match self.client.query_status().await {
            Ok(Some(raw)) => self.reconciler.lock().apply(&raw),
            Ok(None) => {
                tracing::debug!("no status data this cycle, keeping last known state");
                self.state()
            }
            Err(err) => {
                tracing::warn!(error = %err, "status poll failed, keeping last known state");
                self.state()
            }
        }
    }

    /// Returns the current logical door state.
    #[must_use]
    pub fn state(&self) -> DoorState {
        self.reconciler.lock().state()
    }

    /// Returns `true` if the door is fully closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state() == DoorState::Closed
    }

    /// Returns `true` if the door is opening.
    #[must_use]
    pub fn is_opening(&self) -> bool {
        self.state() == DoorState::Opening
    }

    /// Returns `true` if the door is closing.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.state() == DoorState::Closing
    }

    /// Returns the device serial, once a poll has reported it.
    #[must_use]
    pub fn serial(&self) -> Option<String> {
        self.reconciler.lock().serial().map(str::to_string)
    }

    /// Returns the display name derived from the device serial.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.serial().map(|serial| format!("Sliding Door {serial}"))
    }
}

/// Builder for creating a [`SlidingDoor`].
#[derive(Debug)]
pub struct SlidingDoorBuilder {
    config: EndpointConfig,
    intent_grace: Duration,
}

impl SlidingDoorBuilder {
    fn new(host: impl Into<String>) -> Self {
        Self {
            config: EndpointConfig::new(host),
            intent_grace: StatusReconciler::DEFAULT_INTENT_GRACE,
        }
    }

    /// Sets the auth token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.config = self.config.with_token(token);
        self
    }

    /// Sets the per-attempt request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Sets how many additional attempts follow a transient failure.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.config = self.config.with_retries(retries);
        self
    }

    /// Sets how long an issued command biases poll interpretation.
    #[must_use]
    pub fn with_intent_grace(mut self, grace: Duration) -> Self {
        self.intent_grace = grace;
        self
    }

    /// Builds the door and verifies connectivity with the authentication
    /// probe. Setup fails closed: an unverified device is never returned.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::AuthenticationFailed`] if the probe does not
    /// succeed, or a client construction error.
    pub async fn connect(self) -> Result<SlidingDoor, Error> {
        let door = self.build_unverified()?;
        if !door.client.authenticate().await {
            return Err(Error::Protocol(ProtocolError::AuthenticationFailed));
        }
        Ok(door)
    }

    /// Builds the door without the connectivity probe.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn build_unverified(self) -> Result<SlidingDoor, Error> {
        let client = self.config.into_client().map_err(Error::Protocol)?;
        let reconciler = StatusReconciler::with_intent_grace(self.intent_grace);
        Ok(SlidingDoor::new(client, reconciler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_carries_endpoint_options() {
        let door = SlidingDoor::builder("device.local")
            .with_token("secret")
            .with_timeout(Duration::from_secs(3))
            .with_retries(1)
            .build_unverified()
            .unwrap();

        assert_eq!(door.client().base_url(), "http://device.local");
    }

    #[test]
    fn fresh_door_has_no_identity_or_position() {
        let door = SlidingDoor::builder("device.local")
            .build_unverified()
            .unwrap();

        assert_eq!(door.state(), DoorState::Unknown);
        assert!(door.serial().is_none());
        assert!(door.display_name().is_none());
        assert!(!door.is_closed());
        assert!(!door.is_opening());
        assert!(!door.is_closing());
    }

    #[test]
    fn builder_rejects_empty_host() {
        let result = SlidingDoor::builder("").build_unverified();
        assert!(result.is_err());
    }
}
