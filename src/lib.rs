// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `SlideDrive` - A Rust client library for IntelliDrive sliding-door
//! actuators.
//!
//! The actuator exposes a minimal JSON-over-HTTP command interface. This
//! library provides the command client with its retry and timeout policy,
//! and reconciles the actuator's asynchronous physical state into a stable
//! door state (`Open`, `Closed`, `Opening`, `Closing`, `Unknown`) a host
//! automation platform can observe.
//!
//! # Design
//!
//! The firmware does not report reliable motion-direction telemetry, so the
//! transitional states are derived from the most recently issued command
//! (the pending intent) instead of device-reported flags. Polls that land
//! between command dispatch and the door reaching its target are interpreted
//! against that intent, which suppresses spurious state flips.
//!
//! # Quick Start
//!
//! ```no_run
//! use slidedrive::SlidingDoor;
//!
//! #[tokio::main]
//! async fn main() -> slidedrive::Result<()> {
//!     // The builder probes connectivity; setup fails closed when the
//!     // device cannot be authenticated.
//!     let door = SlidingDoor::builder("192.168.1.40")
//!         .with_token("secret")
//!         .connect()
//!         .await?;
//!
//!     door.open().await?;
//!
//!     // The host scheduler polls on a fixed interval; each refresh
//!     // reconciles the reported status into the stable door state.
//!     let state = door.refresh().await;
//!     println!("door is {state}, closed: {}", door.is_closed());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error policy
//!
//! Transient transport failures are retried immediately up to a bound and
//! only then surfaced. Non-2xx responses and malformed bodies are logged and
//! treated as "no data this cycle": the door state holds its last known
//! value rather than resetting. Command calls propagate unrecovered errors
//! so the host can surface them; polls swallow them into "no update".

pub mod client;
pub mod command;
pub mod door;
pub mod error;
pub mod reconciler;
pub mod status;

pub use client::{CommandResult, DeviceClient, EndpointConfig};
pub use command::DoorCommand;
pub use door::{SlidingDoor, SlidingDoorBuilder};
pub use error::{Error, ParseError, ProtocolError, Result};
pub use reconciler::{CommandKind, DoorState, StatusReconciler};
pub use status::RawStatus;
