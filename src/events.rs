//! # Event triggered sends
//!
//! External events (e.g. button presses handled in interrupt context) must not write to the serial link while
//! another command is in flight. Instead they enqueue a [Trigger] into a [TriggerQueue]. The listener loop owning
//! the [Adapter] drains the queue and sends the bound payloads.
//!
//! ## Example
//!
//! ````
//! # use esp_at_link::example::{ExampleSerial, ExampleTimer};
//! use esp_at_link::adapter::Adapter;
//! use esp_at_link::config::Config;
//! use esp_at_link::events::{EventBindings, Trigger, TriggerQueue};
//! use esp_at_link::indicator::NoIndicator;
//!
//! static TRIGGERS: TriggerQueue<4> = TriggerQueue::new();
//! const BUTTON_A: Trigger = Trigger(0);
//!
//! let mut bindings = EventBindings::new(&TRIGGERS);
//! bindings.bind(BUTTON_A, "Hello, World !").unwrap();
//!
//! // Called by the button handler
//! TRIGGERS.try_send(BUTTON_A).unwrap();
//!
//! let mut adapter: Adapter<_, _, _, 1_000_000, 256, 256> =
//!     Adapter::new(ExampleSerial::default(), ExampleTimer::default(), NoIndicator, Config::default());
//! assert_eq!(1, adapter.poll_events(&mut bindings).unwrap());
//! ````
use crate::adapter::{Adapter, Error};
use crate::indicator::Indicator;
use core::convert::Infallible;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_io::{Read, ReadReady, Write};
use fugit_timer::Timer;
use heapless::{LinearMap, String};

/// Max. number of bound events
pub const MAX_BINDINGS: usize = 8;

/// Max. payload length of a bound event including the line terminator
pub const MAX_EVENT_PAYLOAD: usize = 64;

/// Identifier of an external event source, e.g. a button
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Trigger(pub u8);

/// Queue of pending triggers, safe to use from interrupt context
pub type TriggerQueue<const N: usize> = Channel<CriticalSectionRawMutex, Trigger, N>;

/// Payloads bound to triggers
pub struct EventBindings<'q, const N: usize> {
    /// Pending triggers
    queue: &'q TriggerQueue<N>,

    /// Payload per trigger, including line terminator
    payloads: LinearMap<Trigger, String<MAX_EVENT_PAYLOAD>, MAX_BINDINGS>,
}

impl<'q, const N: usize> EventBindings<'q, N> {
    pub fn new(queue: &'q TriggerQueue<N>) -> Self {
        Self {
            queue,
            payloads: LinearMap::new(),
        }
    }

    /// Binds the payload to the trigger. A newline gets appended to the payload. Replaces an existing binding of
    /// the same trigger.
    pub fn bind(&mut self, trigger: Trigger, payload: &str) -> Result<(), Error> {
        let mut line = String::new();
        line.push_str(payload).map_err(|_| Error::PayloadTooLong)?;
        line.push('\n').map_err(|_| Error::PayloadTooLong)?;

        self.payloads.insert(trigger, line).map_err(|_| Error::BindingsFull)?;
        Ok(())
    }

    /// Removes the binding of the given trigger
    pub fn unbind(&mut self, trigger: Trigger) {
        self.payloads.remove(&trigger);
    }

    /// Returns the payload of the next pending trigger. Unbound triggers are skipped.
    pub(crate) fn next_payload(&mut self) -> Option<String<MAX_EVENT_PAYLOAD>> {
        while let Ok(trigger) = self.queue.try_receive() {
            match self.payloads.get(&trigger) {
                Some(payload) => return Some(payload.clone()),
                None => log::debug!("Ignoring unbound trigger {:?}", trigger),
            }
        }

        None
    }
}

impl<S, T, I, const TIMER_HZ: u32, const TX_SIZE: usize, const RX_SIZE: usize> Adapter<S, T, I, TIMER_HZ, TX_SIZE, RX_SIZE>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    I: Indicator,
{
    /// Sends the payloads of all pending triggers. Returns the number of payloads sent.
    pub fn poll_events<const N: usize>(&mut self, bindings: &mut EventBindings<'_, N>) -> Result<usize, Error> {
        let mut sent = 0;

        while let Some(payload) = bindings.next_payload() {
            self.send_data(payload.as_bytes(), 0)?;
            sent += 1;
        }

        Ok(sent)
    }

    /// Like [Adapter::listen_commands], but sends the payloads of pending triggers before each poll
    pub fn listen_commands_with_events<const N: usize>(
        &mut self,
        bindings: &mut EventBindings<'_, N>,
    ) -> Result<Infallible, Error> {
        loop {
            self.poll_events(bindings)?;
            self.poll_commands()?;
            self.channel.pause(self.config.listen_interval_ms)?;
        }
    }
}
