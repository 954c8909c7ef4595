//! # Handshakes
//!
//! Multi-command protocols for bringing up the module, joining a WIFI network and opening TCP connections.
//!
//! Liveness probes are retried according to the configured [RetryPolicy](crate::config::RetryPolicy). Joining and
//! connecting are single attempts: a rejected or unanswered command is returned to the caller, who decides whether
//! to call again.
use crate::adapter::{Adapter, Error};
use crate::classifier::{classify, Response};
use crate::commands::{
    AccessPointConnectCommand, AliveCommand, CloseSocketCommand, ConnectCommand, RestartCommand, RestoreCommand,
    StaticAddressCommand, TransmissionPrepareCommand, WifiModeCommand,
};
use crate::indicator::{Feedback, Indicator};
use crate::session::{ConnectionStatus, MAX_HOST_LENGTH};
use atat::AtatCmd;
use core::fmt::Write as _;
use embedded_io::{Read, ReadReady, Write};
use embedded_nal::{Ipv4Addr, SocketAddr};
use fugit_timer::Timer;
use heapless::String;

/// Result of a WIFI join
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoinState {
    /// Response to the join command
    pub joined: Response,

    /// Response to the static IP command. None if the join was not successful.
    pub static_ip: Option<Response>,
}

impl<S, T, I, const TIMER_HZ: u32, const TX_SIZE: usize, const RX_SIZE: usize> Adapter<S, T, I, TIMER_HZ, TX_SIZE, RX_SIZE>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    I: Indicator,
{
    /// Blocks until the module responds, then restores the factory settings, restarts the module and switches to
    /// station mode.
    ///
    /// With the default unbounded retry policy this never returns if the module stays silent.
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.poll_until_ready(Feedback::ModuleAlive, Feedback::ModuleNotResponding)?;
        self.reset_module()
    }

    /// Restores factory settings, restarts the module, waits until it's responding again and switches to
    /// station mode.
    pub fn reset_module(&mut self) -> Result<(), Error> {
        self.channel.send(&RestoreCommand, self.config.restore_idle_ms)?;
        self.channel.send(&RestartCommand, self.config.reset_idle_ms)?;
        self.poll_until_ready(Feedback::ResetConfirmed, Feedback::ResetPending)?;

        // Response is not required
        self.channel.send(&WifiModeCommand::station_mode(), 0)?;

        self.session.set_status(ConnectionStatus::ModuleReady);
        Ok(())
    }

    /// Joins the WIFI network and assigns the static IP on success. Single attempt, no retry.
    pub fn join(&mut self, ssid: &str, password: &str, static_ip: Ipv4Addr) -> Result<JoinState, Error> {
        let command = AccessPointConnectCommand::new(ssid, password)?;
        let joined = self.exchange(&command, self.config.join_idle_ms)?;

        match joined {
            Response::Success => {
                self.session.set_status(ConnectionStatus::WifiAssociated);
                self.show_and_hold(Feedback::WifiJoined, self.config.wifi_hold_ms)?;

                let assigned = self.exchange(&StaticAddressCommand::new(static_ip), 0)?;
                let feedback = if assigned.is_success() {
                    Feedback::StaticIpAssigned
                } else {
                    log::warn!("Static IP {} not confirmed: {:?}", static_ip, assigned);
                    Feedback::StaticIpRejected
                };
                self.show_and_hold(feedback, self.config.feedback_hold_ms)?;

                Ok(JoinState {
                    joined,
                    static_ip: Some(assigned),
                })
            }
            Response::Failure => {
                log::warn!("Joining WIFI network {} rejected", ssid);
                self.session.set_status(ConnectionStatus::WifiFailed);
                self.show_and_hold(Feedback::WifiRejected, self.config.feedback_hold_ms)?;

                Ok(JoinState { joined, static_ip: None })
            }
            Response::Pending => {
                log::warn!("Joining WIFI network {} not confirmed yet", ssid);
                Ok(JoinState { joined, static_ip: None })
            }
        }
    }

    /// Opens a TCP connection and sends the identification message on success. Single attempt, no retry.
    ///
    /// Returns [Error::NotAssociated] without sending anything if the module was not initialized or the WIFI join
    /// was rejected. An unconfirmed join does not block.
    pub fn connect_tcp(&mut self, host: &str, port: u16) -> Result<Response, Error> {
        let command = ConnectCommand::tcp(host, port)?;

        if !self.session.may_open_tcp() {
            return Err(Error::NotAssociated);
        }

        self.session.set_endpoint(host, port)?;
        let response = self.exchange(&command, self.config.connect_idle_ms)?;

        match response {
            Response::Success => {
                self.session.set_status(ConnectionStatus::TcpOpen);
                self.indicator.show(Feedback::TcpConnected);

                let identification = self.config.identification;
                self.send_data(identification.as_bytes(), self.config.identify_idle_ms)?;
            }
            Response::Failure => {
                log::warn!("TCP connect to {}:{} rejected", host, port);
                self.session.set_status(ConnectionStatus::TcpFailed);
                self.indicator.show(Feedback::TcpRejected);
            }
            Response::Pending => log::warn!("TCP connect to {}:{} not confirmed yet", host, port),
        }

        Ok(response)
    }

    /// Opens a TCP connection to the given socket address, s. [Adapter::connect_tcp]
    pub fn connect_tcp_addr(&mut self, remote: SocketAddr) -> Result<Response, Error> {
        let mut host: String<MAX_HOST_LENGTH> = String::new();
        write!(host, "{}", remote.ip()).map_err(|_| Error::InvalidHostLength)?;

        self.connect_tcp(host.as_str(), remote.port())
    }

    /// Closes the TCP connection. The response is not evaluated.
    pub fn close_tcp(&mut self) -> Result<(), Error> {
        self.channel.send(&CloseSocketCommand, self.config.close_idle_ms)?;
        self.session.set_status(ConnectionStatus::TcpClosed);
        Ok(())
    }

    /// Closes the TCP connection and connects again to the endpoint of the last [Adapter::connect_tcp] call
    pub fn reconnect(&mut self) -> Result<Response, Error> {
        let endpoint = self.session.endpoint().cloned().ok_or(Error::NoEndpoint)?;

        self.close_tcp()?;
        self.indicator.show(Feedback::Reconnecting);
        self.connect_tcp(endpoint.host.as_str(), endpoint.port)
    }

    /// Sends data over the open TCP connection: length announcement followed by the data itself. Neither response
    /// is evaluated.
    pub fn send_data(&mut self, data: &[u8], idle_ms: u32) -> Result<(), Error> {
        self.channel
            .send(&TransmissionPrepareCommand::new(data.len()), self.config.frame_idle_ms)?;
        self.channel.send_raw(data, idle_ms)
    }

    /// Sends liveness probes until the module responds with success. Returns the number of probes sent.
    fn poll_until_ready(&mut self, ready: Feedback, not_ready: Feedback) -> Result<u32, Error> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let response = self.exchange(&AliveCommand, self.config.probe_idle_ms)?;
            if response.is_success() {
                self.show_and_hold(ready, self.config.feedback_hold_ms)?;
                return Ok(attempts);
            }

            self.indicator.show(not_ready);

            if self.config.retry.is_exhausted(attempts) {
                log::warn!("Module not responding after {} liveness probes", attempts);
                return Err(Error::TimedOut);
            }

            self.channel.pause(self.config.retry.backoff.delay_ms(attempts))?;
        }
    }

    /// Sends the command and classifies the response received within the idle time. Previously buffered input
    /// gets dropped.
    fn exchange<Cmd: AtatCmd>(&mut self, command: &Cmd, idle_ms: u32) -> Result<Response, Error> {
        self.channel.discard_input()?;
        self.channel.send(command, idle_ms)?;

        let response = classify(self.channel.read_available()?);
        log::debug!("Response classified as {:?}", response);
        Ok(response)
    }
}
