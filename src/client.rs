// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for IntelliDrive actuators.
//!
//! Each command is an independent GET request against a fixed path. The
//! client enforces a per-attempt timeout and retries transient transport
//! failures immediately, a bounded number of times, with the same command.
//! Non-2xx responses and malformed bodies are logical failures: they are
//! logged and reported as [`CommandResult::NoData`], never retried and never
//! raised, so one bad poll cycle costs nothing but that cycle's update.

use std::time::Duration;

use reqwest::Client;

use crate::command::DoorCommand;
use crate::error::{Error, ParseError, ProtocolError};
use crate::status::RawStatus;

/// Configuration for one actuator endpoint.
///
/// Immutable once turned into a [`DeviceClient`]: host address, auth token,
/// per-attempt timeout and retry bound.
///
/// # Examples
///
/// ```
/// use slidedrive::client::EndpointConfig;
/// use std::time::Duration;
///
/// let config = EndpointConfig::new("device.local")
///     .with_token("secret")
///     .with_timeout(Duration::from_secs(5))
///     .with_retries(2);
/// assert_eq!(config.base_url(), "http://device.local");
/// ```
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    host: String,
    token: Option<String>,
    timeout: Duration,
    retries: u32,
}

impl EndpointConfig {
    /// Default per-attempt request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default number of additional attempts after a transient failure.
    pub const DEFAULT_RETRIES: u32 = 2;

    /// Creates a new configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - Hostname, IP address, or full `http(s)://` base URL
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: None,
            timeout: Self::DEFAULT_TIMEOUT,
            retries: Self::DEFAULT_RETRIES,
        }
    }

    /// Sets the auth token, sent as a bearer `Authorization` header.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the per-attempt request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many additional attempts follow a transient failure.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Returns the configured host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry bound.
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Builds the base URL from this configuration.
    ///
    /// A bare host is normalized to `http://host`.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            self.host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", self.host)
        }
    }

    /// Creates a [`DeviceClient`] from this configuration.
    ///
    /// The underlying connection pool is created here and released when the
    /// client (and its clones) are dropped.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be
    /// created.
    pub fn into_client(self) -> Result<DeviceClient, ProtocolError> {
        if self.host.is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }

        let base_url = self.base_url();
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::ClientBuild)?;

        Ok(DeviceClient {
            base_url,
            client,
            token: self.token,
            timeout: self.timeout,
            retries: self.retries,
        })
    }
}

/// Result of one command exchange.
#[derive(Debug, Clone)]
pub enum CommandResult {
    /// 2xx response with a decoded JSON body.
    Success(serde_json::Value),
    /// The device answered, but not with usable data (non-2xx status or a
    /// malformed body). The caller skips its update for this cycle.
    NoData,
}

impl CommandResult {
    /// Returns `true` if the exchange produced a payload.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the JSON payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Success(value) => Some(value),
            Self::NoData => None,
        }
    }

    /// Decodes the payload into a specific type.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NoPayload`] for `NoData`, or a JSON error if
    /// the payload does not decode into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, ParseError> {
        match self {
            Self::Success(value) => serde_json::from_value(value.clone()).map_err(Into::into),
            Self::NoData => Err(ParseError::NoPayload),
        }
    }
}

/// What a single attempt produced, once transport succeeded.
enum Attempt {
    Body(String),
    Rejected(reqwest::StatusCode),
}

/// HTTP client for one IntelliDrive actuator.
///
/// Cloning is cheap and shares the underlying connection pool.
///
/// # Examples
///
/// ```no_run
/// use slidedrive::client::EndpointConfig;
///
/// # async fn example() -> slidedrive::Result<()> {
/// let client = EndpointConfig::new("device.local")
///     .with_token("secret")
///     .into_client()?;
/// client.open().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeviceClient {
    base_url: String,
    client: Client,
    token: Option<String>,
    timeout: Duration,
    retries: u32,
}

impl DeviceClient {
    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for a command.
    fn build_url(&self, command: DoorCommand) -> String {
        format!("{}/{}", self.base_url, command.path())
    }

    /// Executes a command against the actuator.
    ///
    /// Transient transport failures (timeout, connection-level errors) are
    /// retried immediately with the same command, up to the configured
    /// bound. The timeout applies per attempt, so a fully retried operation
    /// may take up to `timeout * (1 + retries)` wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns error only when retries are exhausted; logical failures come
    /// back as `Ok(CommandResult::NoData)`.
    pub async fn execute(&self, command: DoorCommand) -> Result<CommandResult, Error> {
        let url = self.build_url(command);
        let max_attempts = self.retries.saturating_add(1);
        let mut attempt = 0_u32;

        loop {
            attempt += 1;
            tracing::debug!(url = %url, attempt, "sending command");

            match self.attempt(&url).await {
                Ok(Attempt::Body(body)) => {
                    tracing::debug!(%command, body = %body, "received response");
                    // The device does not always declare a JSON content
                    // type; the body is parsed as JSON regardless.
                    return match serde_json::from_str::<serde_json::Value>(&body) {
                        Ok(value) => Ok(CommandResult::Success(value)),
                        Err(err) => {
                            tracing::warn!(%command, error = %err, "malformed response body");
                            Ok(CommandResult::NoData)
                        }
                    };
                }
                Ok(Attempt::Rejected(status)) => {
                    tracing::warn!(%command, status = status.as_u16(), "device rejected command");
                    return Ok(CommandResult::NoData);
                }
                Err(err) if attempt < max_attempts => {
                    tracing::debug!(%command, attempt, error = %err, "transient failure, retrying");
                }
                Err(err) => {
                    tracing::error!(%command, attempts = attempt, error = %err, "communication failed");
                    return Err(Error::Protocol(if err.is_timeout() {
                        ProtocolError::Timeout {
                            attempts: attempt,
                            timeout: self.timeout,
                        }
                    } else {
                        ProtocolError::Http {
                            attempts: attempt,
                            source: err,
                        }
                    }));
                }
            }
        }
    }

    /// Performs one request attempt. Any `reqwest` error here (including a
    /// timeout, or a connection dropped while reading the body) counts as
    /// transient.
    async fn attempt(&self, url: &str) -> Result<Attempt, reqwest::Error> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Attempt::Rejected(status));
        }

        let body = response.text().await?;
        Ok(Attempt::Body(body))
    }

    /// Sends the open command. The response payload is ignored beyond the
    /// success check.
    ///
    /// # Errors
    ///
    /// Returns error if retries are exhausted.
    pub async fn open(&self) -> Result<(), Error> {
        self.execute(DoorCommand::Open).await.map(drop)
    }

    /// Sends the close command.
    ///
    /// # Errors
    ///
    /// Returns error if retries are exhausted.
    pub async fn close(&self) -> Result<(), Error> {
        self.execute(DoorCommand::Close).await.map(drop)
    }

    /// Sends the stop command.
    ///
    /// # Errors
    ///
    /// Returns error if retries are exhausted.
    pub async fn stop(&self) -> Result<(), Error> {
        self.execute(DoorCommand::Stop).await.map(drop)
    }

    /// Polls the current door status.
    ///
    /// Returns `Ok(None)` when the device answered without usable data (a
    /// logical failure, or a snapshot that does not decode); the caller
    /// keeps its last known state for that cycle.
    ///
    /// # Errors
    ///
    /// Returns error if retries are exhausted.
    pub async fn query_status(&self) -> Result<Option<RawStatus>, Error> {
        let result = self.execute(DoorCommand::State).await?;
        match result.parse::<RawStatus>() {
            Ok(raw) => Ok(Some(raw)),
            Err(ParseError::NoPayload) => Ok(None),
            Err(err) => {
                tracing::warn!(error = %err, "status snapshot did not decode");
                Ok(None)
            }
        }
    }

    /// Probes connectivity and credentials.
    ///
    /// Issues the authenticate command and reports whether the exchange
    /// succeeded with a truthy payload. Used as the config-time probe:
    /// setup must not proceed when this returns `false`.
    pub async fn authenticate(&self) -> bool {
        match self.execute(DoorCommand::Authenticate).await {
            Ok(CommandResult::Success(value)) => is_truthy(&value),
            Ok(CommandResult::NoData) => false,
            Err(err) => {
                tracing::error!(error = %err, "authentication probe failed");
                false
            }
        }
    }
}

/// JSON truthiness for the authenticate response: anything but `false`,
/// `null`, `0` or an empty string counts as success.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64() != Some(0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = EndpointConfig::new("device.local");
        assert_eq!(config.host(), "device.local");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.retries(), 2);
    }

    #[test]
    fn base_url_normalizes_bare_host() {
        let config = EndpointConfig::new("192.168.1.50");
        assert_eq!(config.base_url(), "http://192.168.1.50");
    }

    #[test]
    fn base_url_keeps_explicit_scheme() {
        let config = EndpointConfig::new("https://device.local");
        assert_eq!(config.base_url(), "https://device.local");
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let config = EndpointConfig::new("http://device.local/");
        assert_eq!(config.base_url(), "http://device.local");
    }

    #[test]
    fn into_client_rejects_empty_host() {
        let result = EndpointConfig::new("").into_client();
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn build_url_joins_command_path() {
        let client = EndpointConfig::new("device.local").into_client().unwrap();
        assert_eq!(
            client.build_url(DoorCommand::Open),
            "http://device.local/door/open"
        );
        assert_eq!(
            client.build_url(DoorCommand::Authenticate),
            "http://device.local/system/authenticate"
        );
    }

    #[test]
    fn command_result_payload() {
        let result = CommandResult::Success(serde_json::json!({"status": "ok"}));
        assert!(result.is_success());
        assert_eq!(result.payload().unwrap()["status"], "ok");

        assert!(CommandResult::NoData.payload().is_none());
    }

    #[test]
    fn command_result_parse() {
        let result = CommandResult::Success(serde_json::json!({
            "serial": "SD-1",
            "open": true
        }));
        let raw: RawStatus = result.parse().unwrap();
        assert_eq!(raw.serial, "SD-1");

        assert!(matches!(
            CommandResult::NoData.parse::<RawStatus>(),
            Err(ParseError::NoPayload)
        ));
    }

    #[test]
    fn truthiness_of_authenticate_payloads() {
        assert!(is_truthy(&serde_json::json!(true)));
        assert!(is_truthy(&serde_json::json!({"authenticated": true})));
        assert!(is_truthy(&serde_json::json!("ok")));
        assert!(!is_truthy(&serde_json::json!(false)));
        assert!(!is_truthy(&serde_json::json!(null)));
        assert!(!is_truthy(&serde_json::json!(0)));
        assert!(!is_truthy(&serde_json::json!("")));
    }
}
