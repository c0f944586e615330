//! WiFi station-mode adapter.
//!
//! Brings the station up so the HTTP command layer is reachable.  The
//! actuators do not depend on it: a failed association is logged and the
//! node keeps running with whatever commands it already holds.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: credential validation only.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl std::error::Error for ConnectivityError {}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct WifiCredentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut creds = Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        };
        creds.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        creds.password.push_str(password).map_err(|_| ConnectivityError::InvalidPassword)?;
        Ok(creds)
    }

    /// Credentials baked in at build time (`WIFI_SSID`, `WIFI_PASSWORD`).
    pub fn from_build_env() -> Result<Self, ConnectivityError> {
        Self::new(
            option_env!("WIFI_SSID").unwrap_or(""),
            option_env!("WIFI_PASSWORD").unwrap_or(""),
        )
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ───────────────────────────────────────────────────────────────
// Station bring-up
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use station::connect;

#[cfg(target_os = "espidf")]
mod station {
    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{info, warn};

    use super::{ConnectivityError, WifiCredentials};

    /// Associate with the AP, polling up to `attempts` times with
    /// `retry_delay_ms` between tries.
    pub fn connect(
        wifi: &mut BlockingWifi<EspWifi<'static>>,
        creds: &WifiCredentials,
        attempts: u32,
        retry_delay_ms: u32,
    ) -> anyhow::Result<()> {
        let config = Configuration::Client(ClientConfiguration {
            ssid: creds
                .ssid()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidSsid)?,
            password: creds
                .password()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method: if creds.is_open() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        });
        wifi.set_configuration(&config)?;
        wifi.start()?;

        info!("WiFi: connecting to '{}'", creds.ssid());
        let mut connected = false;
        for attempt in 1..=attempts.max(1) {
            match wifi.connect() {
                Ok(()) => {
                    connected = true;
                    break;
                }
                Err(e) => {
                    warn!("WiFi: attempt {}/{} failed ({})", attempt, attempts, e);
                    FreeRtos::delay_ms(retry_delay_ms);
                }
            }
        }
        if !connected {
            return Err(ConnectivityError::ConnectionFailed.into());
        }

        wifi.wait_netif_up()?;
        let ip = wifi.wifi().sta_netif().get_ip_info()?.ip;
        info!("WiFi: connected, IP address {}", ip);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
