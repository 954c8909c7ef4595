//! Example that runs on Linux using a serial-USB-adapter.
//!
//! Brings up the module, joins the WIFI network, connects to the given TCP server and listens for inbound
//! commands. Pressing enter on the console simulates a button press, sending `Hello, World !`.
use std::{
    env, io,
    io::BufRead,
    thread,
    time::Duration,
};

use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};
use embedded_nal::Ipv4Addr;
use esp_at_link::{
    adapter::Adapter,
    config::Config,
    events::{EventBindings, Trigger, TriggerQueue},
    indicator::{Feedback, Indicator},
};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

// Max. encoded command length in bytes
const TX_SIZE: usize = 256;
// Max. response length in bytes read at once
const RX_SIZE: usize = 1024;

// Timer frequency in Hz
const TIMER_HZ: u32 = 1000;

const BUTTON: Trigger = Trigger(0);

static TRIGGERS: TriggerQueue<4> = TriggerQueue::new();

fn main() {
    env_logger::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    if args.len() != 8 {
        println!(
            "Usage: {} <path-to-serial> <baudrate> <ssid> <psk> <static-ip> <host> <port>",
            args[0]
        );
        println!(
            "Example: {} /dev/ttyUSB0 115200 mywifi hellopasswd123 192.168.1.30 192.168.1.10 8080",
            args[0]
        );
        println!("\nNote: To run the example with debug logging, run it like this:");
        println!("\n  RUST_LOG=debug cargo run --example linux -- /dev/ttyUSB0 115200 mywifi hellopasswd123 192.168.1.30 192.168.1.10 8080");
        std::process::exit(1);
    }
    let dev = &args[1];
    let baud_rate: u32 = args[2].parse().unwrap();
    let ssid = &args[3];
    let psk = &args[4];
    let static_ip: Ipv4Addr = args[5].parse().expect("Invalid static IP");
    let host = &args[6];
    let port: u16 = args[7].parse().expect("Invalid port");

    println!("Starting (dev={}, baud={:?})...", dev, baud_rate);

    // Open serial port
    let mut port_handle = serialport::new(dev, baud_rate)
        .data_bits(DataBits::Eight)
        .flow_control(FlowControl::None)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(Duration::from_millis(500))
        .open()
        .expect("Could not open serial port");

    // Flush serial RX buffer, to ensure that there isn't any remaining left
    // form previous sessions.
    flush_serial(&mut port_handle);

    // Simulated button, triggered by pressing enter
    thread::Builder::new()
        .name("button".to_string())
        .spawn(|| {
            for _ in io::stdin().lock().lines() {
                if TRIGGERS.try_send(BUTTON).is_err() {
                    log::warn!("Trigger queue full, dropping button press");
                }
            }
        })
        .unwrap();

    let serial = Serial { port: port_handle };
    let mut adapter: Adapter<_, _, _, TIMER_HZ, TX_SIZE, RX_SIZE> =
        Adapter::new(serial, timer::SysTimer::new(), ConsoleIndicator, Config::default().join_idle_ms(7_000));

    println!("Waiting for module...");
    adapter.initialize().expect("Module bring-up failed");

    println!("Join WiFi \"{}\"...", ssid);
    let state = adapter.join(ssid, psk, static_ip).expect("Join failed");
    assert!(state.joined.is_success(), "WIFI join not confirmed: {:?}", state);

    println!("Connecting to {}:{}...", host, port);
    let response = adapter.connect_tcp(host, port).expect("Connect failed");
    assert!(response.is_success(), "TCP connect not confirmed: {:?}", response);
    println!("Connected! Press enter to send a message.");

    let mut bindings = EventBindings::new(&TRIGGERS);
    bindings.bind(BUTTON, "Hello, World !").unwrap();

    let error = adapter.listen_commands_with_events(&mut bindings).unwrap_err();
    panic!("Listener stopped: {:?}", error);
}

/// Prints feedback to the console
struct ConsoleIndicator;

impl Indicator for ConsoleIndicator {
    fn show(&mut self, feedback: Feedback) {
        println!("[indicator] {:?}", feedback);
    }

    fn clear(&mut self) {
        println!("[indicator] cleared");
    }
}

/// Serial port exposed by the embedded-io traits
struct Serial {
    port: Box<dyn SerialPort>,
}

impl ErrorType for Serial {
    type Error = ErrorKind;
}

impl Read for Serial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match io::Read::read(&mut self.port, buf) {
            Ok(length) => Ok(length),
            Err(e) if e.kind() == io::ErrorKind::TimedOut || e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) => {
                log::error!("Serial read error: {}", e);
                Err(ErrorKind::Other)
            }
        }
    }
}

impl ReadReady for Serial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        match self.port.bytes_to_read() {
            Ok(count) => Ok(count > 0),
            Err(e) => {
                log::error!("Serial status error: {}", e);
                Err(ErrorKind::Other)
            }
        }
    }
}

impl Write for Serial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        io::Write::write(&mut self.port, buf).map_err(|e| {
            log::error!("Serial write error: {}", e);
            ErrorKind::Other
        })
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        io::Write::flush(&mut self.port).map_err(|_| ErrorKind::Other)
    }
}

/// Flush the serial port receive buffer.
fn flush_serial(serial_rx: &mut Box<dyn SerialPort>) {
    let mut buf = [0; 32];
    loop {
        match serial_rx.bytes_to_read() {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => panic!("Error while flushing serial: {}", e),
        }

        match io::Read::read(serial_rx, &mut buf[..]) {
            Ok(0) => break,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut => break,
            Ok(_) => continue,
            Err(e) => panic!("Error while flushing serial: {}", e),
        }
    }
}

mod timer {
    use std::{convert::TryInto, time::Instant as StdInstant};

    use fugit::Instant;
    use fugit_timer::Timer;

    /// A timer with millisecond precision.
    pub struct SysTimer {
        start: StdInstant,
        duration_ms: u32,
        started: bool,
    }

    impl SysTimer {
        pub fn new() -> SysTimer {
            SysTimer {
                start: StdInstant::now(),
                duration_ms: 0,
                started: false,
            }
        }
    }

    impl Timer<1000> for SysTimer {
        type Error = &'static str;

        /// Return current time `Instant`
        fn now(&mut self) -> fugit::TimerInstantU32<1000> {
            let milliseconds = (StdInstant::now() - self.start).as_millis();
            let ticks: u32 = milliseconds.try_into().expect("u32 timer overflow");
            Instant::<u32, 1, 1000>::from_ticks(ticks)
        }

        /// Start timer with a `duration`
        fn start(&mut self, duration: fugit::TimerDurationU32<1000>) -> Result<(), Self::Error> {
            self.start = StdInstant::now();
            self.duration_ms = duration.ticks();
            self.started = true;

            Ok(())
        }

        /// Tries to stop this timer. Fails if the timer was never started or already canceled.
        fn cancel(&mut self) -> Result<(), Self::Error> {
            if !self.started {
                Err("cannot cancel stopped timer")
            } else {
                self.started = false;
                Ok(())
            }
        }

        /// Returns `nb::Error::WouldBlock` until the started duration has expired
        fn wait(&mut self) -> nb::Result<(), Self::Error> {
            let now = StdInstant::now();
            if (now - self.start).as_millis() >= self.duration_ms.into() {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_delay() {
            let mut timer = SysTimer::new();

            // Wait 500 ms
            let before = StdInstant::now();
            timer.start(fugit::Duration::<u32, 1, 1000>::from_ticks(500)).unwrap();
            nb::block!(timer.wait()).unwrap();
            let after = StdInstant::now();

            let duration_ms = (after - before).as_millis();
            assert!(duration_ms >= 500);
            assert!(duration_ms < 1000);
        }
    }
}
