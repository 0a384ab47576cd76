// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw status snapshots reported by the actuator.

use serde::Deserialize;

/// A decoded `door/state` snapshot.
///
/// One snapshot is produced per poll. The firmware reports the device serial
/// and whether the door is at its fully open position; richer telemetry is
/// carried as optional fields so the transition logic can gain fidelity once
/// the firmware starts reporting it.
///
/// # Examples
///
/// ```
/// use slidedrive::status::RawStatus;
///
/// let raw: RawStatus = serde_json::from_str(r#"{"serial":"SD-1","open":true}"#).unwrap();
/// assert_eq!(raw.serial, "SD-1");
/// assert!(!raw.is_closed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawStatus {
    /// Device serial identifier.
    pub serial: String,
    /// Whether the door is at its fully open position.
    pub open: bool,
    /// Whether the door is currently in motion, if reported.
    #[serde(default)]
    pub moving: Option<bool>,
    /// Whether the door is opening. Not reported by current firmware.
    #[serde(default)]
    pub opening: Option<bool>,
    /// Whether the door is closing. Not reported by current firmware.
    #[serde(default)]
    pub closing: Option<bool>,
}

impl RawStatus {
    /// Returns `true` if the door is at its fully closed position.
    ///
    /// Derived as the negation of the reported open signal; the firmware has
    /// no separate closed sensor.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.open
    }

    /// Returns `true` if the snapshot carries any in-motion signal.
    ///
    /// The direction flags count as a motion signal here, but the direction
    /// itself is not trusted for state transitions.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving.unwrap_or(false)
            || self.opening.unwrap_or(false)
            || self.closing.unwrap_or(false)
    }
}
