//! # Driver configuration
//!
//! All timings are given in milliseconds. The defaults match the timing behavior of the ESP8266 AT firmware on a
//! 115200 baud link.
//!
//! ````
//! use esp_at_link::config::{Backoff, Config, RetryPolicy};
//!
//! let config = Config::default()
//!     .connect_idle_ms(8_000)
//!     .retry(RetryPolicy::bounded(10, Backoff::Exponential { base_ms: 250, max_ms: 4_000 }));
//!
//! assert_eq!(8_000, config.connect_idle_ms);
//! assert_eq!(Some(10), config.retry.max_attempts);
//! ````

/// Default identification message sent after each successful TCP connect
pub const DEFAULT_IDENTIFICATION: &str = "IDENTIFY: Microbit\n";

/// Delay strategy between two failed liveness probes
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Backoff {
    /// Constant delay in ms
    Fixed(u32),

    /// Delay doubling on each attempt, starting at `base_ms` and capped at `max_ms`
    Exponential { base_ms: u32, max_ms: u32 },
}

impl Backoff {
    /// Returns the delay in ms after the given failed attempt (1-based)
    pub fn delay_ms(&self, attempt: u32) -> u32 {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base_ms, max_ms } => {
                let shift = attempt.saturating_sub(1).min(31);
                base_ms.saturating_mul(1 << shift).min(max_ms)
            }
        }
    }
}

/// Retry policy of the liveness polls
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Max. number of probes. None => Retries until the module responds
    pub max_attempts: Option<u32>,

    /// Delay between failed probes
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Retries forever with the given backoff
    pub const fn unbounded(backoff: Backoff) -> Self {
        Self {
            max_attempts: None,
            backoff,
        }
    }

    /// Gives up after `max_attempts` failed probes
    pub const fn bounded(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            backoff,
        }
    }

    /// Returns true if no further attempt is allowed after the given attempt count
    pub(crate) fn is_exhausted(&self, attempts: u32) -> bool {
        match self.max_attempts {
            None => false,
            Some(max) => attempts >= max,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(Backoff::Fixed(2_000))
    }
}

/// Text tokens recognized in inbound data
///
/// The defaults are `activate`, `deactivate` and `disconnect`. Servers sending the French commands
/// `allumer_led`, `eteindre_led` and `fermer` are covered by [Tokens::led_server].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tokens {
    /// Turns the indicator on
    pub activate: &'static str,

    /// Clears the indicator
    pub deactivate: &'static str,

    /// Closes and reopens the TCP connection
    pub disconnect: &'static str,
}

impl Tokens {
    /// Tokens of the LED control server: `allumer_led`, `eteindre_led` and `fermer`
    pub const fn led_server() -> Self {
        Self {
            activate: "allumer_led",
            deactivate: "eteindre_led",
            disconnect: "fermer",
        }
    }
}

impl Default for Tokens {
    fn default() -> Self {
        Self {
            activate: "activate",
            deactivate: "deactivate",
            disconnect: "disconnect",
        }
    }
}

/// Timings and protocol parameters
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Wait time after the liveness probe (`AT`)
    pub probe_idle_ms: u32,

    /// Wait time after restoring factory settings
    pub restore_idle_ms: u32,

    /// Wait time after restarting the module
    pub reset_idle_ms: u32,

    /// Wait time after the join command before reading the response
    pub join_idle_ms: u32,

    /// Wait time after the TCP connect command before reading the response
    pub connect_idle_ms: u32,

    /// Wait time after closing the TCP connection
    pub close_idle_ms: u32,

    /// Wait time after the `AT+CIPSEND` length announcement
    pub frame_idle_ms: u32,

    /// Wait time after sending the identification payload
    pub identify_idle_ms: u32,

    /// Time a positive feedback is shown before continuing
    pub feedback_hold_ms: u32,

    /// Time the WIFI joined feedback is shown before assigning the static IP
    pub wifi_hold_ms: u32,

    /// Pause between two polls of the inbound command listener
    pub listen_interval_ms: u32,

    /// Retry policy of the liveness polls
    pub retry: RetryPolicy,

    /// Message sent after each successful TCP connect
    pub identification: &'static str,

    /// Recognized inbound tokens
    pub tokens: Tokens,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_idle_ms: 500,
            restore_idle_ms: 1_000,
            reset_idle_ms: 1_000,
            join_idle_ms: 0,
            connect_idle_ms: 5_000,
            close_idle_ms: 1_000,
            frame_idle_ms: 100,
            identify_idle_ms: 100,
            feedback_hold_ms: 2_000,
            wifi_hold_ms: 3_000,
            listen_interval_ms: 100,
            retry: RetryPolicy::default(),
            identification: DEFAULT_IDENTIFICATION,
            tokens: Tokens::default(),
        }
    }
}

impl Config {
    /// Sets the wait time after the liveness probe
    #[must_use]
    pub const fn probe_idle_ms(mut self, idle: u32) -> Self {
        self.probe_idle_ms = idle;
        self
    }

    /// Sets the wait time after the join command. The ESP-AT needs some seconds until the join is confirmed.
    #[must_use]
    pub const fn join_idle_ms(mut self, idle: u32) -> Self {
        self.join_idle_ms = idle;
        self
    }

    /// Sets the wait time after the TCP connect command
    #[must_use]
    pub const fn connect_idle_ms(mut self, idle: u32) -> Self {
        self.connect_idle_ms = idle;
        self
    }

    /// Sets the time positive feedback gets shown
    #[must_use]
    pub const fn feedback_hold_ms(mut self, hold: u32) -> Self {
        self.feedback_hold_ms = hold;
        self
    }

    /// Sets the pause between two listener polls
    #[must_use]
    pub const fn listen_interval_ms(mut self, interval: u32) -> Self {
        self.listen_interval_ms = interval;
        self
    }

    /// Sets the retry policy of the liveness polls
    #[must_use]
    pub const fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the message sent after each TCP connect
    #[must_use]
    pub const fn identification(mut self, identification: &'static str) -> Self {
        self.identification = identification;
        self
    }

    /// Sets the recognized inbound tokens
    #[must_use]
    pub const fn tokens(mut self, tokens: Tokens) -> Self {
        self.tokens = tokens;
        self
    }
}
