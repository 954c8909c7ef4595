use crate::adapter::Error;
use crate::channel::CommandChannel;
use crate::commands::{AliveCommand, ConnectCommand, WifiModeCommand};
use crate::tests::mock::{MockSerial, MockTimer, MockedCommand};
use embedded_io::ErrorKind;
use std::sync::{Arc, Mutex};

type ChannelType = CommandChannel<MockSerial, MockTimer, 1_000_000, 256, 16>;

#[test]
fn test_send_encodes_command() {
    let mut channel: ChannelType = CommandChannel::new(MockSerial::new(), MockTimer::new());
    channel.send(&WifiModeCommand::station_mode(), 0).unwrap();

    let commands = channel.serial.get_commands_as_strings();
    assert_eq!(1, commands.len());
    assert_eq!("AT+CWMODE=1\r\n", commands[0]);
}

#[test]
fn test_send_zero_idle_time_does_not_touch_timer() {
    // Mock timer without expectations panics on any call
    let mut channel: ChannelType = CommandChannel::new(MockSerial::new(), MockTimer::new());
    channel.send(&AliveCommand, 0).unwrap();

    assert_eq!(vec!["AT\r\n"], channel.serial.get_commands_as_strings());
}

#[test]
fn test_send_waits_idle_time() {
    let mut timer = MockTimer::new();
    timer
        .expect_start()
        .times(1)
        .withf(|duration| *duration == MockTimer::duration_ms(500))
        .returning(|_| Ok(()));
    timer.expect_wait().times(1).returning(|| Ok(()));

    let mut channel: ChannelType = CommandChannel::new(MockSerial::new(), timer);
    channel.send(&AliveCommand, 500).unwrap();
}

#[test]
fn test_pause_blocks_until_timer_expired() {
    let mut timer = MockTimer::new();
    timer.expect_start().times(1).returning(|_| Ok(()));

    let mut calls = 0;
    timer.expect_wait().times(3).returning(move || {
        calls += 1;
        if calls < 3 {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    });

    let mut channel: ChannelType = CommandChannel::new(MockSerial::new(), timer);
    channel.pause(100).unwrap();
}

#[test]
fn test_pause_timer_start_error() {
    let mut timer = MockTimer::new();
    timer.expect_start().times(1).returning(|_| Err(1));

    let mut channel: ChannelType = CommandChannel::new(MockSerial::new(), timer);
    assert_eq!(Error::TimerError, channel.pause(100).unwrap_err());
}

#[test]
fn test_pause_timer_wait_error() {
    let mut timer = MockTimer::new();
    timer.expect_start().times(1).returning(|_| Ok(()));
    timer.expect_wait().times(1).returning(|| Err(nb::Error::Other(1)));

    let mut channel: ChannelType = CommandChannel::new(MockSerial::new(), timer);
    assert_eq!(Error::TimerError, channel.pause(100).unwrap_err());
}

#[test]
fn test_send_command_too_long() {
    let mut channel: CommandChannel<MockSerial, MockTimer, 1_000_000, 16, 16> =
        CommandChannel::new(MockSerial::new(), MockTimer::new());

    let command = ConnectCommand::tcp("10.0.0.5", 8080).unwrap();
    assert_eq!(Error::CommandTooLong, channel.send(&command, 0).unwrap_err());
    assert!(channel.serial.get_commands_as_strings().is_empty());
}

#[test]
fn test_send_write_error() {
    let mut serial = MockSerial::new();
    serial.fail_write_at(0);

    let mut channel: ChannelType = CommandChannel::new(serial, MockTimer::new());
    let error = channel.send(&AliveCommand, 0).unwrap_err();

    assert_eq!(Error::Transport(ErrorKind::Other), error);
}

#[test]
fn test_send_raw_without_terminator() {
    let durations = Arc::new(Mutex::new(vec![]));
    let mut channel: ChannelType = CommandChannel::new(MockSerial::new(), MockTimer::recording(durations.clone()));

    channel.send_raw(b"Hello, World !\n", 100).unwrap();

    assert_eq!(vec!["Hello, World !\n"], channel.serial.get_commands_as_strings());
    assert_eq!(vec![100], *durations.lock().unwrap());
}

#[test]
fn test_read_available_nothing_received() {
    let mut channel: ChannelType = CommandChannel::new(MockSerial::new(), MockTimer::new());
    assert!(channel.read_available().unwrap().is_empty());
}

#[test]
fn test_read_available_returns_response() {
    let mut serial = MockSerial::new();
    serial.add_response(MockedCommand::ok(Some(b"AT\r\n")));

    let mut channel: ChannelType = CommandChannel::new(serial, MockTimer::new());
    channel.send(&AliveCommand, 0).unwrap();

    assert_eq!(b"\r\nOK\r\n", channel.read_available().unwrap().as_slice());
    assert!(channel.read_available().unwrap().is_empty());
}

#[test]
fn test_read_available_limited_to_buffer_size() {
    let mut serial = MockSerial::new();
    serial.inject(&[b'x'; 40]);

    let mut channel: ChannelType = CommandChannel::new(serial, MockTimer::new());

    assert_eq!(16, channel.read_available().unwrap().len());
    assert_eq!(16, channel.read_available().unwrap().len());
    assert_eq!(8, channel.read_available().unwrap().len());
    assert_eq!(0, channel.read_available().unwrap().len());
}

#[test]
fn test_read_available_transport_error() {
    let mut serial = MockSerial::new();
    serial.fail_read_ready_after(0);

    let mut channel: ChannelType = CommandChannel::new(serial, MockTimer::new());
    assert_eq!(Error::Transport(ErrorKind::Other), channel.read_available().unwrap_err());
}

#[test]
fn test_discard_input() {
    let mut serial = MockSerial::new();
    serial.inject(&[b'x'; 40]);

    let mut channel: ChannelType = CommandChannel::new(serial, MockTimer::new());

    assert_eq!(40, channel.discard_input().unwrap());
    assert_eq!(0, channel.serial.pending_rx());
    assert_eq!(0, channel.discard_input().unwrap());
}
