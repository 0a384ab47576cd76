// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door state reconciliation.
//!
//! The actuator firmware reports position but no reliable motion-direction
//! telemetry, and a poll may land anywhere between command dispatch and the
//! door actually reaching its target. The [`StatusReconciler`] therefore
//! derives the transitional states (`Opening`/`Closing`) from the most
//! recently issued command rather than from device-reported flags, and
//! suppresses the stale terminal reports that arrive right after a command
//! was dispatched.

use std::fmt;
use std::time::{Duration, Instant};

use crate::status::RawStatus;

/// The logical, stable door state exposed to the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorState {
    /// Door is at its fully open position.
    Open,
    /// Door is at its fully closed position.
    Closed,
    /// Door is moving towards its open position.
    Opening,
    /// Door is moving towards its closed position.
    Closing,
    /// No poll has confirmed a position yet, or motion with unknown cause.
    Unknown,
}

impl DoorState {
    /// Returns `true` for `Opening` or `Closing`.
    #[must_use]
    pub fn is_transitional(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }

    /// Returns `true` for `Open` or `Closed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Open | Self::Closed)
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Closing => "closing",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// The kind of command a controller has dispatched to the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// An open command.
    Open,
    /// A close command.
    Close,
    /// A stop command.
    Stop,
}

/// Direction of a pending open/close intent. `Stop` never becomes an intent;
/// it only clears one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntentKind {
    Open,
    Close,
}

/// Record of the most recently issued open/close command.
#[derive(Debug, Clone, Copy)]
struct PendingIntent {
    kind: IntentKind,
    issued_at: Instant,
}

/// Reconciles raw status polls into a stable [`DoorState`].
///
/// # Examples
///
/// ```
/// use slidedrive::reconciler::{CommandKind, DoorState, StatusReconciler};
/// use slidedrive::status::RawStatus;
///
/// let mut reconciler = StatusReconciler::new();
/// assert_eq!(reconciler.state(), DoorState::Unknown);
///
/// reconciler.note_command_issued(CommandKind::Open);
/// let raw: RawStatus =
///     serde_json::from_str(r#"{"serial":"SD-1","open":false,"moving":true}"#).unwrap();
/// assert_eq!(reconciler.apply(&raw), DoorState::Opening);
/// ```
#[derive(Debug)]
pub struct StatusReconciler {
    state: DoorState,
    pending: Option<PendingIntent>,
    grace: Duration,
    serial: Option<String>,
}

impl StatusReconciler {
    /// How long a pending intent biases poll interpretation before it is
    /// considered stale.
    pub const DEFAULT_INTENT_GRACE: Duration = Duration::from_secs(30);

    /// Creates a new reconciler in the `Unknown` state.
    #[must_use]
    pub fn new() -> Self {
        Self::with_intent_grace(Self::DEFAULT_INTENT_GRACE)
    }

    /// Creates a new reconciler with a custom intent grace period.
    #[must_use]
    pub fn with_intent_grace(grace: Duration) -> Self {
        Self {
            state: DoorState::Unknown,
            pending: None,
            grace,
            serial: None,
        }
    }

    /// Returns the current logical door state.
    #[must_use]
    pub fn state(&self) -> DoorState {
        self.state
    }

    /// Returns the serial reported by the most recent applied poll.
    #[must_use]
    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    /// Records that a command has been dispatched.
    ///
    /// Must be called before the HTTP call completes, so a poll landing
    /// between dispatch and completion is interpreted against the intent.
    /// A `Stop` clears any pending intent without asserting a new terminal
    /// state; the stopped position is unknown until the next terminal poll.
    /// A later command simply overwrites the intent (last intent wins).
    pub fn note_command_issued(&mut self, kind: CommandKind) {
        let now = Instant::now();
        self.pending = match kind {
            CommandKind::Open => Some(PendingIntent {
                kind: IntentKind::Open,
                issued_at: now,
            }),
            CommandKind::Close => Some(PendingIntent {
                kind: IntentKind::Close,
                issued_at: now,
            }),
            CommandKind::Stop => None,
        };
    }

    /// Applies a raw status snapshot and returns the resulting state.
    ///
    /// While an unexpired intent is outstanding, a terminal report matching
    /// the intent's target confirms it and clears the intent; anything else
    /// (the stale pre-command position, or an in-motion report) yields the
    /// transitional state the intent implies. Without an intent, terminal
    /// reports are trusted directly and an in-motion report keeps an already
    /// established transitional state or resolves to `Unknown`.
    pub fn apply(&mut self, raw: &RawStatus) -> DoorState {
        if self.serial.as_deref() != Some(raw.serial.as_str()) {
            self.serial = Some(raw.serial.clone());
        }

        if self
            .pending
            .is_some_and(|intent| intent.issued_at.elapsed() >= self.grace)
        {
            tracing::debug!(state = %self.state, "pending intent expired without confirmation");
            self.pending = None;
        }

        let moving = raw.is_moving();
        let next = match self.pending.map(|intent| intent.kind) {
            Some(IntentKind::Open) => {
                if !moving && raw.open {
                    self.pending = None;
                    DoorState::Open
                } else {
                    DoorState::Opening
                }
            }
            Some(IntentKind::Close) => {
                if !moving && raw.is_closed() {
                    self.pending = None;
                    DoorState::Closed
                } else {
                    DoorState::Closing
                }
            }
            None if moving => {
                if self.state.is_transitional() {
                    self.state
                } else {
                    DoorState::Unknown
                }
            }
            None => {
                if raw.open {
                    DoorState::Open
                } else {
                    DoorState::Closed
                }
            }
        };

        if next != self.state {
            tracing::debug!(from = %self.state, to = %next, "door state changed");
        }
        self.state = next;
        next
    }
}

impl Default for StatusReconciler {
    fn default() -> Self {
        Self::new()
    }
}
