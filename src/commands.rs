use crate::adapter::Error;
use atat::atat_derive::{AtatCmd, AtatResp};
use atat::heapless::String;
use core::fmt::Write;
use core::str::FromStr;
use embedded_nal::Ipv4Addr;

/// Commands which gets just responded by OK.
///
/// Responses are never parsed by atat, as they are read and classified as raw text. Exists just for satisfying
/// the [AtatCmd] derive.
#[derive(Clone, AtatResp)]
pub struct NoResponse;

/// Liveness probe (plain `AT`)
#[derive(Clone, AtatCmd)]
#[at_cmd("", NoResponse, timeout_ms = 500)]
pub struct AliveCommand;

/// Restores the factory default settings of the module
#[derive(Clone, AtatCmd)]
#[at_cmd("+RESTORE", NoResponse, timeout_ms = 1_000)]
pub struct RestoreCommand;

/// Restarts the module
#[derive(Clone, AtatCmd)]
#[at_cmd("+RST", NoResponse, timeout_ms = 1_000)]
pub struct RestartCommand;

/// Sets the WIFI mode
#[derive(Clone, Default, AtatCmd)]
#[at_cmd("+CWMODE", NoResponse, timeout_ms = 1_000)]
pub struct WifiModeCommand {
    /// WIFI mode:
    ///     0: Null mode. Wi-Fi RF will be disabled.
    ///     1: Station mode.
    ///     2: SoftAP mode.
    ///     3: SoftAP+Station mode.
    #[at_arg(position = 0)]
    mode: usize,
}

impl WifiModeCommand {
    pub fn station_mode() -> Self {
        Self { mode: 1 }
    }
}

/// Command for setting the target WIFI access point parameters
#[derive(Clone, Default, AtatCmd)]
#[at_cmd("+CWJAP", NoResponse, timeout_ms = 5_000)]
pub struct AccessPointConnectCommand {
    /// The SSID of the target access point
    #[at_arg(position = 0)]
    ssid: String<32>,

    /// The password/key of the target access point
    #[at_arg(position = 1)]
    password: String<64>,
}

impl AccessPointConnectCommand {
    pub fn new(ssid: &str, password: &str) -> Result<Self, Error> {
        if ssid.len() > 32 {
            return Err(Error::InvalidSSIDLength);
        }

        if password.len() > 63 {
            return Err(Error::InvalidPasswordLength);
        }

        Ok(Self {
            ssid: String::from_str(ssid).map_err(|_| Error::InvalidSSIDLength)?,
            password: String::from_str(password).map_err(|_| Error::InvalidPasswordLength)?,
        })
    }
}

/// Assigns a static IPv4 address to the station interface
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTA", NoResponse, timeout_ms = 1_000)]
pub struct StaticAddressCommand {
    #[at_arg(position = 0)]
    address: String<15>,
}

impl StaticAddressCommand {
    pub fn new(address: Ipv4Addr) -> Self {
        let mut encoded = String::new();
        // Dotted quad has max. 15 chars, so this can not overflow
        let _ = write!(encoded, "{}", address);
        Self { address: encoded }
    }
}

/// Establish TCP Connection (single connection mode)
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTART", NoResponse, timeout_ms = 5_000, attempts = 1)]
pub struct ConnectCommand {
    /// Connection type, always TCP
    #[at_arg(position = 0)]
    connection_type: String<5>,

    /// Remote IP address or domain name
    #[at_arg(position = 1)]
    remote_host: String<64>,

    /// Remote port
    #[at_arg(position = 2)]
    port: u16,
}

impl ConnectCommand {
    /// Connects to a host given as IP or domain name
    pub fn tcp(remote_host: &str, port: u16) -> Result<Self, Error> {
        Ok(Self {
            connection_type: String::from_str("TCP").unwrap_or_default(),
            remote_host: String::from_str(remote_host).map_err(|_| Error::InvalidHostLength)?,
            port,
        })
    }
}

/// Closes the TCP connection
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPCLOSE", NoResponse, timeout_ms = 1_000)]
pub struct CloseSocketCommand;

/// Announces the length of the following payload
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSEND", NoResponse, timeout_ms = 1_000)]
pub struct TransmissionPrepareCommand {
    /// Length of the payload in bytes
    #[at_arg(position = 0)]
    length: usize,
}

impl TransmissionPrepareCommand {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}
