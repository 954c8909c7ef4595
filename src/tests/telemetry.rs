use crate::adapter::Adapter;
use crate::config::Config;
use crate::telemetry::{
    acceleration_payload, compass_payload, control_payload, direction, light_level_payload, temperature_payload, Axis,
};
use crate::tests::mock::{MockSensors, MockSerial, MockTimer, MockedCommand, RecordingIndicator};
use mockall::predicate::eq;

type AdapterType = Adapter<MockSerial, MockTimer, RecordingIndicator, 1_000_000, 256, 256>;

fn new_adapter(serial: MockSerial) -> AdapterType {
    Adapter::new(serial, MockTimer::expiring(), RecordingIndicator::default(), Config::default())
}

#[test]
fn test_direction_axes() {
    assert_eq!(3, direction(1, 0));
    assert_eq!(6, direction(0, 1));
    assert_eq!(9, direction(-1, 0));
    assert_eq!(0, direction(0, -1));
}

#[test]
fn test_direction_diagonals() {
    assert_eq!(5, direction(1, 1));
    assert_eq!(8, direction(-1, 1));
    assert_eq!(2, direction(1, -1));
    assert_eq!(-1, direction(-1, -1));
}

#[test]
fn test_direction_no_tilt() {
    assert_eq!(3, direction(0, 0));
}

#[test]
fn test_direction_sector_boundaries() {
    // 15° => 120 / 30
    assert_eq!(4, direction(1000, 268));

    // 14° => 119 / 30
    assert_eq!(3, direction(1000, 249));
}

#[test]
fn test_payload_formats() {
    assert_eq!("ACCEL:12,-5,1024\n", acceleration_payload(12, -5, 1024).unwrap().as_str());
    assert_eq!("TEMP:21\n", temperature_payload(21).unwrap().as_str());
    assert_eq!("LIGHT:0\n", light_level_payload(0).unwrap().as_str());
    assert_eq!("COMPASS:359\n", compass_payload(359).unwrap().as_str());
    assert_eq!(
        "CONTROL ROBOT: x:0, y:1, Direction:6\n",
        control_payload(0, 1).unwrap().as_str()
    );
}

#[test]
fn test_control_payload_extreme_values() {
    let payload = control_payload(i32::MIN, i32::MIN).unwrap();

    assert!(payload.starts_with("CONTROL ROBOT: x:-2147483648, y:-2147483648, Direction:"));
    assert!(payload.ends_with('\n'));
}

#[test]
fn test_send_acceleration() {
    let mut sensors = MockSensors::new();
    sensors.expect_acceleration().with(eq(Axis::X)).times(1).return_const(12);
    sensors.expect_acceleration().with(eq(Axis::Y)).times(1).return_const(-5);
    sensors.expect_acceleration().with(eq(Axis::Z)).times(1).return_const(1024);

    let mut serial = MockSerial::new();
    serial.add_response(MockedCommand::silent(Some(b"AT+CIPSEND=17\r\n")));
    serial.add_response(MockedCommand::silent(Some(b"ACCEL:12,-5,1024\n")));

    let mut adapter = new_adapter(serial);
    adapter.send_acceleration(&mut sensors).unwrap();

    adapter.channel.serial.assert_all_cmds_sent();
}

#[test]
fn test_send_temperature() {
    let mut sensors = MockSensors::new();
    sensors.expect_temperature().times(1).return_const(-3);

    let mut serial = MockSerial::new();
    serial.add_response(MockedCommand::silent(Some(b"AT+CIPSEND=8\r\n")));
    serial.add_response(MockedCommand::silent(Some(b"TEMP:-3\n")));

    let mut adapter = new_adapter(serial);
    adapter.send_temperature(&mut sensors).unwrap();

    adapter.channel.serial.assert_all_cmds_sent();
}

#[test]
fn test_send_light_level() {
    let mut sensors = MockSensors::new();
    sensors.expect_light_level().times(1).return_const(255);

    let mut serial = MockSerial::new();
    serial.add_response(MockedCommand::silent(Some(b"AT+CIPSEND=10\r\n")));
    serial.add_response(MockedCommand::silent(Some(b"LIGHT:255\n")));

    let mut adapter = new_adapter(serial);
    adapter.send_light_level(&mut sensors).unwrap();

    adapter.channel.serial.assert_all_cmds_sent();
}

#[test]
fn test_send_compass() {
    let mut sensors = MockSensors::new();
    sensors.expect_compass_heading().times(1).return_const(90);

    let mut serial = MockSerial::new();
    serial.add_response(MockedCommand::silent(Some(b"AT+CIPSEND=11\r\n")));
    serial.add_response(MockedCommand::silent(Some(b"COMPASS:90\n")));

    let mut adapter = new_adapter(serial);
    adapter.send_compass(&mut sensors).unwrap();

    adapter.channel.serial.assert_all_cmds_sent();
}

#[test]
fn test_send_control() {
    let mut sensors = MockSensors::new();
    sensors.expect_acceleration().with(eq(Axis::X)).times(1).return_const(-1);
    sensors.expect_acceleration().with(eq(Axis::Y)).times(1).return_const(0);

    let mut serial = MockSerial::new();
    serial.add_response(MockedCommand::silent(Some(b"AT+CIPSEND=38\r\n")));
    serial.add_response(MockedCommand::silent(Some(b"CONTROL ROBOT: x:-1, y:0, Direction:9\n")));

    let mut adapter = new_adapter(serial);
    adapter.send_control(&mut sensors).unwrap();

    adapter.channel.serial.assert_all_cmds_sent();
}
