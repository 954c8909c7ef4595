//! # ESP-AT link
//!
//! Driver for ESP8266 modems running the AT firmware, connected by a serial link implementing the
//! [embedded_io] traits.
//!
//! * [adapter]: Central client owning serial link, timer, indicator and session state
//! * [handshake]: Module bring-up, WIFI join and TCP connect/close/reconnect
//! * [dispatcher]: Listener for inbound commands received over TCP
//! * [events]: Payloads sent on external events like button presses
//! * [telemetry]: Fixed-format sensor payloads
#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod adapter;
pub mod channel;
pub mod classifier;
pub(crate) mod commands;
pub mod config;
pub mod dispatcher;
pub mod events;
pub mod handshake;
pub mod indicator;
pub mod session;
pub mod telemetry;

#[cfg(feature = "examples")]
pub mod example;

#[cfg(test)]
mod tests;
