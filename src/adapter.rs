//! # ESP-AT adapter
//!
//! Central driver owning the serial link, the timer, the feedback indicator and the session state. All commands
//! are sent through this single object, so only one command is in flight at any time.
//!
//! ## Example
//!
//! ````
//! # use esp_at_link::example::{ExampleSerial, ExampleTimer};
//! use esp_at_link::adapter::Adapter;
//! use esp_at_link::classifier::Response;
//! use esp_at_link::config::Config;
//! use esp_at_link::indicator::NoIndicator;
//! use esp_at_link::session::ConnectionStatus;
//! use embedded_nal::Ipv4Addr;
//!
//! let mut adapter: Adapter<_, _, _, 1_000_000, 256, 256> =
//!     Adapter::new(ExampleSerial::default(), ExampleTimer::default(), NoIndicator, Config::default());
//!
//! // Blocks until the module responds, then resets it to station mode
//! adapter.initialize().unwrap();
//!
//! let state = adapter.join("test_wifi", "secret", Ipv4Addr::new(192, 168, 1, 30)).unwrap();
//! assert_eq!(Response::Success, state.joined);
//!
//! assert_eq!(Response::Success, adapter.connect_tcp("10.0.0.1", 8080).unwrap());
//! assert_eq!(ConnectionStatus::TcpOpen, adapter.status());
//! ````
use crate::channel::CommandChannel;
use crate::config::Config;
use crate::indicator::{Feedback, Indicator};
use crate::session::{ConnectionStatus, Session};
use embedded_io::{ErrorKind, Read, ReadReady, Write};
use fugit_timer::Timer;

/// Driver errors. Rejected or unanswered commands are no errors, but are reported as
/// [Response](crate::classifier::Response).
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Reading or writing the serial link failed
    Transport(ErrorKind),

    /// Upstream timer error
    TimerError,

    /// Encoded command exceeds the TX buffer size
    CommandTooLong,

    /// Formatted payload exceeds the payload buffer
    PayloadTooLong,

    /// Given SSD is longer then the max. size of 32 chars
    InvalidSSIDLength,

    /// Given password is longer then the max. size of 63 chars
    InvalidPasswordLength,

    /// Given host is longer then the max. size of 64 chars
    InvalidHostLength,

    /// Module did not respond within the configured number of liveness probes
    TimedOut,

    /// TCP connect requires an initialized module and a WIFI join which was not rejected
    NotAssociated,

    /// Reconnect requested, but no TCP connect was issued before
    NoEndpoint,

    /// No more event bindings available
    BindingsFull,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Transport(_) => defmt::write!(f, "Error::Transport"),
            Error::TimerError => defmt::write!(f, "Error::TimerError"),
            Error::CommandTooLong => defmt::write!(f, "Error::CommandTooLong"),
            Error::PayloadTooLong => defmt::write!(f, "Error::PayloadTooLong"),
            Error::InvalidSSIDLength => defmt::write!(f, "Error::InvalidSSIDLength"),
            Error::InvalidPasswordLength => defmt::write!(f, "Error::InvalidPasswordLength"),
            Error::InvalidHostLength => defmt::write!(f, "Error::InvalidHostLength"),
            Error::TimedOut => defmt::write!(f, "Error::TimedOut"),
            Error::NotAssociated => defmt::write!(f, "Error::NotAssociated"),
            Error::NoEndpoint => defmt::write!(f, "Error::NoEndpoint"),
            Error::BindingsFull => defmt::write!(f, "Error::BindingsFull"),
        }
    }
}

/// Central client for the ESP-AT modem
///
/// TX_SIZE: Max. encoded command length in bytes. Needs to hold the longest command, which is the TCP connect
/// command with a 64 char host.
///
/// RX_SIZE: Max. response length read at once.
pub struct Adapter<S, T: Timer<TIMER_HZ>, I, const TIMER_HZ: u32, const TX_SIZE: usize, const RX_SIZE: usize> {
    /// Serial link + timer
    pub(crate) channel: CommandChannel<S, T, TIMER_HZ, TX_SIZE, RX_SIZE>,

    /// Feedback output
    pub(crate) indicator: I,

    /// Endpoint and connection status
    pub(crate) session: Session,

    /// Timings and protocol parameters
    pub(crate) config: Config,
}

impl<S, T, I, const TIMER_HZ: u32, const TX_SIZE: usize, const RX_SIZE: usize> Adapter<S, T, I, TIMER_HZ, TX_SIZE, RX_SIZE>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    I: Indicator,
{
    /// Creates a new adapter. No command is sent until [Adapter::initialize] or another handshake is called.
    pub fn new(serial: S, timer: T, indicator: I, config: Config) -> Self {
        Self {
            channel: CommandChannel::new(serial, timer),
            indicator,
            session: Session::default(),
            config,
        }
    }

    /// Returns the current connection status
    pub fn status(&self) -> ConnectionStatus {
        self.session.status()
    }

    /// Returns the session state
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Direct access to the command channel, e.g. for sending custom commands
    pub fn channel(&mut self) -> &mut CommandChannel<S, T, TIMER_HZ, TX_SIZE, RX_SIZE> {
        &mut self.channel
    }

    /// Releases serial link, timer and indicator
    pub fn release(self) -> (S, T, I) {
        (self.channel.serial, self.channel.timer, self.indicator)
    }

    /// Shows the feedback and keeps it for the given time
    pub(crate) fn show_and_hold(&mut self, feedback: Feedback, hold_ms: u32) -> Result<(), Error> {
        self.indicator.show(feedback);
        self.channel.pause(hold_ms)
    }
}
