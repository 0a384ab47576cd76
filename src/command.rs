// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IntelliDrive command definitions.
//!
//! The actuator exposes a small, fixed set of GET endpoints. Commands are a
//! closed set; there is no payload and no negotiation beyond these paths.
//!
//! | Command | Path | Purpose |
//! |---------|------|---------|
//! | [`DoorCommand::Open`] | `door/open` | start opening the door |
//! | [`DoorCommand::Close`] | `door/close` | start closing the door |
//! | [`DoorCommand::Stop`] | `door/stop` | halt motion immediately |
//! | [`DoorCommand::State`] | `door/state` | poll the current status |
//! | [`DoorCommand::Authenticate`] | `system/authenticate` | connectivity/credential probe |

use std::fmt;

/// A command understood by the IntelliDrive actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorCommand {
    /// Start opening the door.
    Open,
    /// Start closing the door.
    Close,
    /// Halt door motion.
    Stop,
    /// Query the current door status.
    State,
    /// Probe connectivity and credentials.
    Authenticate,
}

impl DoorCommand {
    /// Returns the URL path for this command, relative to the device base URL.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Open => "door/open",
            Self::Close => "door/close",
            Self::Stop => "door/stop",
            Self::State => "door/state",
            Self::Authenticate => "system/authenticate",
        }
    }
}

impl fmt::Display for DoorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_paths() {
        assert_eq!(DoorCommand::Open.path(), "door/open");
        assert_eq!(DoorCommand::Close.path(), "door/close");
        assert_eq!(DoorCommand::Stop.path(), "door/stop");
        assert_eq!(DoorCommand::State.path(), "door/state");
        assert_eq!(DoorCommand::Authenticate.path(), "system/authenticate");
    }

    #[test]
    fn display_matches_path() {
        assert_eq!(DoorCommand::Open.to_string(), "door/open");
        assert_eq!(DoorCommand::Authenticate.to_string(), "system/authenticate");
    }
}
