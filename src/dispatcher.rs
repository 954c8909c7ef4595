//! # Inbound commands
//!
//! Text received over the TCP connection (e.g. `+IPD,9:activate`) is scanned for known tokens, s.
//! [Tokens](crate::config::Tokens). Received data is split at each `+IPD` header and every frame triggers at most one
//! action, in arrival order. Unknown text is ignored.
//!
//! ## Example
//!
//! ````
//! # use esp_at_link::example::{ExampleSerial, ExampleTimer};
//! use esp_at_link::adapter::Adapter;
//! use esp_at_link::config::Config;
//! use esp_at_link::dispatcher::InboundToken;
//! use esp_at_link::indicator::NoIndicator;
//!
//! let mut serial = ExampleSerial::default();
//! serial.inject(b"+IPD,8:activate\r\n");
//!
//! let mut adapter: Adapter<_, _, _, 1_000_000, 256, 256> =
//!     Adapter::new(serial, ExampleTimer::default(), NoIndicator, Config::default());
//!
//! assert_eq!(&[InboundToken::Activate], adapter.poll_commands().unwrap().as_slice());
//! assert!(adapter.poll_commands().unwrap().is_empty());
//! ````
use crate::adapter::{Adapter, Error};
use crate::classifier::{contains, find};
use crate::config::Tokens;
use crate::indicator::{Feedback, Indicator};
use core::convert::Infallible;
use embedded_io::{Read, ReadReady, Write};
use fugit_timer::Timer;
use heapless::Vec;

/// Maximum number of dispatched tokens reported by a single poll
pub const MAX_TOKENS_PER_POLL: usize = 8;

/// Header of data received over the TCP connection
const DATA_HEADER: &[u8] = b"+IPD";

/// Recognized inbound commands
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InboundToken {
    /// Shows the activated state on the indicator
    Activate,
    /// Clears the indicator
    Deactivate,
    /// Closes the TCP connection and connects again to the last endpoint
    Disconnect,
}

impl InboundToken {
    /// Matches the received text against the given tokens. Returns None if no token is contained.
    ///
    /// Deactivate is checked before activate, so a deactivate token containing the activate token (like the
    /// defaults do) is matched correctly.
    pub fn parse(text: &[u8], tokens: &Tokens) -> Option<Self> {
        if text.is_empty() {
            return None;
        }

        if matches_token(text, tokens.deactivate) {
            return Some(Self::Deactivate);
        }

        if matches_token(text, tokens.activate) {
            return Some(Self::Activate);
        }

        if matches_token(text, tokens.disconnect) {
            return Some(Self::Disconnect);
        }

        None
    }
}

/// Empty tokens never match
fn matches_token(text: &[u8], token: &str) -> bool {
    !token.is_empty() && contains(text, token.as_bytes())
}

/// Splits received text at each data header. Text in front of the first header is yielded as a frame of its own.
pub(crate) struct Frames<'a> {
    rest: &'a [u8],
}

impl<'a> Frames<'a> {
    pub(crate) fn new(text: &'a [u8]) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        // Skipping the first byte, so a header at the start stays within the current frame
        let end = find(&self.rest[1..], DATA_HEADER).map_or(self.rest.len(), |position| position + 1);
        let (frame, rest) = self.rest.split_at(end);
        self.rest = rest;

        Some(frame)
    }
}

impl<S, T, I, const TIMER_HZ: u32, const TX_SIZE: usize, const RX_SIZE: usize> Adapter<S, T, I, TIMER_HZ, TX_SIZE, RX_SIZE>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    I: Indicator,
{
    /// Reads the available input once and dispatches the token of each received frame in arrival order.
    /// Returns the dispatched tokens. All tokens are dispatched, but only the first [MAX_TOKENS_PER_POLL] are
    /// returned.
    pub fn poll_commands(&mut self) -> Result<Vec<InboundToken, MAX_TOKENS_PER_POLL>, Error> {
        let received = self.channel.read_available()?;
        let mut dispatched = Vec::new();

        for frame in Frames::new(&received) {
            if let Some(token) = InboundToken::parse(frame, &self.config.tokens) {
                self.dispatch(token)?;

                if dispatched.push(token).is_err() {
                    log::debug!("Dispatched more than {} tokens in a single poll", MAX_TOKENS_PER_POLL);
                }
            }
        }

        Ok(dispatched)
    }

    /// Polls for inbound commands forever, pausing [Config::listen_interval_ms](crate::config::Config) between
    /// polls. Returns only on transport or timer errors.
    pub fn listen_commands(&mut self) -> Result<Infallible, Error> {
        loop {
            self.poll_commands()?;
            self.channel.pause(self.config.listen_interval_ms)?;
        }
    }

    /// Executes the action of the given token
    pub(crate) fn dispatch(&mut self, token: InboundToken) -> Result<(), Error> {
        log::info!("Inbound command {:?}", token);

        match token {
            InboundToken::Activate => {
                self.indicator.clear();
                self.indicator.show(Feedback::Activated);
            }
            InboundToken::Deactivate => self.indicator.clear(),
            InboundToken::Disconnect => match self.reconnect() {
                Ok(_) => {}
                Err(Error::NoEndpoint) => log::warn!("Ignoring disconnect, no TCP connection was opened before"),
                Err(error) => return Err(error),
            },
        }

        Ok(())
    }
}
