//! Mocks for doc examples
use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};
use fugit::{TimerDurationU32, TimerInstantU32};
use fugit_timer::Timer;
use heapless::Vec;

/// Serial link mock of a well-behaving ESP-AT: every command line is answered by OK.
#[derive(Default)]
pub struct ExampleSerial {
    /// Pending data to be read
    rx: Vec<u8, 256>,
}

impl ExampleSerial {
    /// Simulates inbound data, e.g. received over TCP
    pub fn inject(&mut self, data: &[u8]) {
        let _ = self.rx.extend_from_slice(data);
    }
}

impl ErrorType for ExampleSerial {
    type Error = ErrorKind;
}

impl Write for ExampleSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        // Payload data (without terminator) is not answered
        if buf.ends_with(b"\r\n") {
            self.inject(b"\r\nOK\r\n");
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Read for ExampleSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let length = buf.len().min(self.rx.len());
        buf[..length].copy_from_slice(&self.rx[..length]);

        let remaining = Vec::from_slice(&self.rx[length..]).unwrap_or_default();
        self.rx = remaining;
        Ok(length)
    }
}

impl ReadReady for ExampleSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.rx.is_empty())
    }
}

/// Timer mock, expiring immediately
#[derive(Default)]
pub struct ExampleTimer {}

impl Timer<1_000_000> for ExampleTimer {
    type Error = u32;

    fn now(&mut self) -> TimerInstantU32<1000000> {
        unimplemented!()
    }

    fn start(&mut self, _duration: TimerDurationU32<1000000>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Self::Error> {
        unimplemented!()
    }

    fn wait(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}
