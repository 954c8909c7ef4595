//! # Command channel
//!
//! Single owner of the serial link and the timer. Commands are written as a whole, followed by an optional idle
//! time. Reading the response is a separate step, so the caller decides when to poll.
use crate::adapter::Error;
use atat::AtatCmd;
use embedded_io::{Read, ReadReady, Write};
use fugit::TimerDurationU32;
use fugit_timer::Timer;
use heapless::Vec;

/// Chunk size used when draining the serial receive buffer
const READ_CHUNK_SIZE: usize = 32;

/// Serial command/response channel
///
/// TX_SIZE: Max. encoded length in bytes of a single command.
///
/// RX_SIZE: Max. response length in bytes returned by a single [CommandChannel::read_available] call. Remaining data
/// stays buffered for the next call.
pub struct CommandChannel<S, T: Timer<TIMER_HZ>, const TIMER_HZ: u32, const TX_SIZE: usize, const RX_SIZE: usize> {
    /// Serial link to the ESP-AT
    pub(crate) serial: S,

    /// Timer used for idle times
    pub(crate) timer: T,
}

impl<S, T, const TIMER_HZ: u32, const TX_SIZE: usize, const RX_SIZE: usize> CommandChannel<S, T, TIMER_HZ, TX_SIZE, RX_SIZE>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
{
    pub fn new(serial: S, timer: T) -> Self {
        Self { serial, timer }
    }

    /// Encodes and sends the command, then waits the given idle time. An idle time of zero returns immediately.
    pub fn send<Cmd: AtatCmd>(&mut self, command: &Cmd, idle_ms: u32) -> Result<(), Error> {
        if Cmd::MAX_LEN > TX_SIZE {
            return Err(Error::CommandTooLong);
        }

        let mut buffer = [0x0; TX_SIZE];
        let length = command.write(&mut buffer);

        log::debug!("Sending command {:?}", printable(&buffer[..length]));
        self.write(&buffer[..length])?;
        self.pause(idle_ms)
    }

    /// Sends the data as it is (without any terminator), then waits the given idle time
    pub fn send_raw(&mut self, data: &[u8], idle_ms: u32) -> Result<(), Error> {
        log::debug!("Sending {} bytes of data", data.len());
        self.write(data)?;
        self.pause(idle_ms)
    }

    /// Returns the currently buffered response data without blocking. Returns an empty buffer if nothing was
    /// received yet.
    pub fn read_available(&mut self) -> Result<Vec<u8, RX_SIZE>, Error> {
        let mut response = Vec::new();
        let mut chunk = [0x0; READ_CHUNK_SIZE];

        while response.len() < RX_SIZE && self.serial.read_ready().map_err(transport_error)? {
            let space = (RX_SIZE - response.len()).min(READ_CHUNK_SIZE);
            let length = self.serial.read(&mut chunk[..space]).map_err(transport_error)?;

            if length == 0 {
                break;
            }

            // Can not fail, as length is limited to remaining space
            let _ = response.extend_from_slice(&chunk[..length]);
        }

        if !response.is_empty() {
            log::debug!("Received {:?}", printable(&response));
        }

        Ok(response)
    }

    /// Drops all buffered input, e.g. responses of previous fire-and-forget commands. Returns the dropped byte count.
    pub fn discard_input(&mut self) -> Result<usize, Error> {
        let mut discarded = 0;

        loop {
            let length = self.read_available()?.len();
            if length == 0 {
                return Ok(discarded);
            }

            discarded += length;
        }
    }

    /// Blocks for the given duration. Zero returns immediately without touching the timer.
    pub fn pause(&mut self, duration_ms: u32) -> Result<(), Error> {
        if duration_ms == 0 {
            return Ok(());
        }

        self.timer
            .start(TimerDurationU32::millis(duration_ms))
            .map_err(|_| Error::TimerError)?;
        nb::block!(self.timer.wait()).map_err(|_| Error::TimerError)
    }

    /// Writes all data and flushes the serial link
    fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        self.serial.write_all(data).map_err(transport_error)?;
        self.serial.flush().map_err(transport_error)
    }
}

/// Maps errors of the serial link
fn transport_error<E: embedded_io::Error>(error: E) -> Error {
    Error::Transport(error.kind())
}

/// Text representation of raw data for logging
fn printable(data: &[u8]) -> &str {
    core::str::from_utf8(data).unwrap_or("<binary>").trim_end()
}
