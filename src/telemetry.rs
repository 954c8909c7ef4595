//! # Sensor telemetry
//!
//! Fixed-format text lines sent over the open TCP connection:
//!
//! | Sender                  | Payload                                  |
//! |-------------------------|------------------------------------------|
//! | `send_acceleration()`   | `ACCEL:<x>,<y>,<z>\n`                    |
//! | `send_temperature()`    | `TEMP:<t>\n`                             |
//! | `send_light_level()`    | `LIGHT:<l>\n`                            |
//! | `send_compass()`        | `COMPASS:<h>\n`                          |
//! | `send_control()`        | `CONTROL ROBOT: x:<x>, y:<y>, Direction:<d>\n` |
use crate::adapter::{Adapter, Error};
use crate::indicator::Indicator;
use core::fmt::Write as _;
use embedded_io::{Read, ReadReady, Write};
use fugit_timer::Timer;
use heapless::String;

/// Max. length of a telemetry line
pub const MAX_TELEMETRY_LENGTH: usize = 64;

/// Accelerometer axis
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Sensor readings source
pub trait Sensors {
    /// Acceleration of the given axis in milli-g
    fn acceleration(&mut self, axis: Axis) -> i32;

    /// Temperature in °C
    fn temperature(&mut self) -> i32;

    /// Ambient light level
    fn light_level(&mut self) -> i32;

    /// Compass heading in degrees
    fn compass_heading(&mut self) -> i32;
}

/// Maps the tilt given by the X/Y acceleration to one of twelve 30° sectors, sector 3 pointing in X direction.
///
/// The angle is rounded half up to whole degrees before shifting and dividing, so the result matches the
/// receiving side bit by bit.
pub fn direction(x: i32, y: i32) -> i32 {
    let radians = libm::atan2(y as f64, x as f64);
    let angle = libm::floor(radians * (180.0 / core::f64::consts::PI) + 0.5) as i32;
    let needle = angle + 90 + 15;

    needle.div_euclid(30)
}

pub fn acceleration_payload(x: i32, y: i32, z: i32) -> Result<String<MAX_TELEMETRY_LENGTH>, Error> {
    format(format_args!("ACCEL:{},{},{}\n", x, y, z))
}

pub fn temperature_payload(temperature: i32) -> Result<String<MAX_TELEMETRY_LENGTH>, Error> {
    format(format_args!("TEMP:{}\n", temperature))
}

pub fn light_level_payload(level: i32) -> Result<String<MAX_TELEMETRY_LENGTH>, Error> {
    format(format_args!("LIGHT:{}\n", level))
}

pub fn compass_payload(heading: i32) -> Result<String<MAX_TELEMETRY_LENGTH>, Error> {
    format(format_args!("COMPASS:{}\n", heading))
}

/// Control packet containing the raw X/Y acceleration and the derived [direction]
pub fn control_payload(x: i32, y: i32) -> Result<String<MAX_TELEMETRY_LENGTH>, Error> {
    format(format_args!(
        "CONTROL ROBOT: x:{}, y:{}, Direction:{}\n",
        x,
        y,
        direction(x, y)
    ))
}

fn format(arguments: core::fmt::Arguments<'_>) -> Result<String<MAX_TELEMETRY_LENGTH>, Error> {
    let mut payload = String::new();
    payload.write_fmt(arguments).map_err(|_| Error::PayloadTooLong)?;
    Ok(payload)
}

impl<S, T, I, const TIMER_HZ: u32, const TX_SIZE: usize, const RX_SIZE: usize> Adapter<S, T, I, TIMER_HZ, TX_SIZE, RX_SIZE>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    I: Indicator,
{
    pub fn send_acceleration<R: Sensors>(&mut self, sensors: &mut R) -> Result<(), Error> {
        let x = sensors.acceleration(Axis::X);
        let y = sensors.acceleration(Axis::Y);
        let z = sensors.acceleration(Axis::Z);

        self.send_telemetry(acceleration_payload(x, y, z)?)
    }

    pub fn send_temperature<R: Sensors>(&mut self, sensors: &mut R) -> Result<(), Error> {
        self.send_telemetry(temperature_payload(sensors.temperature())?)
    }

    pub fn send_light_level<R: Sensors>(&mut self, sensors: &mut R) -> Result<(), Error> {
        self.send_telemetry(light_level_payload(sensors.light_level())?)
    }

    pub fn send_compass<R: Sensors>(&mut self, sensors: &mut R) -> Result<(), Error> {
        self.send_telemetry(compass_payload(sensors.compass_heading())?)
    }

    /// Sends the control packet derived from the current tilt
    pub fn send_control<R: Sensors>(&mut self, sensors: &mut R) -> Result<(), Error> {
        let x = sensors.acceleration(Axis::X);
        let y = sensors.acceleration(Axis::Y);

        self.send_telemetry(control_payload(x, y)?)
    }

    fn send_telemetry(&mut self, payload: String<MAX_TELEMETRY_LENGTH>) -> Result<(), Error> {
        self.send_data(payload.as_bytes(), 0)
    }
}
