use super::*;
use crate::config::BaudRate;
use crate::core::{class, msg};
use crate::protocol::navigation::FixType;
use crate::protocol::transport::encoder::encode_frame;
use core::cell::Cell;
use embassy_time::Instant;

//==================================================================================DOUBLES
/// Port replaying queued input bytes; optionally fails the next read.
struct QueuePort {
    input: [u8; 512],
    head: usize,
    tail: usize,
    fail_read: bool,
    rates: usize,
}

impl QueuePort {
    fn new() -> Self {
        Self {
            input: [0; 512],
            head: 0,
            tail: 0,
            fail_read: false,
            rates: 0,
        }
    }

    fn push(&mut self, bytes: &[u8]) {
        self.input[self.tail..self.tail + bytes.len()].copy_from_slice(bytes);
        self.tail += bytes.len();
    }
}

impl SerialPort for QueuePort {
    type Error = &'static str;

    fn bytes_waiting(&self) -> usize {
        if self.fail_read {
            1
        } else {
            self.tail - self.head
        }
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        if self.fail_read {
            return Err("overrun");
        }
        let byte = self.input[self.head];
        self.head += 1;
        Ok(byte)
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn is_tx_empty(&self) -> bool {
        true
    }

    fn set_baud_rate(&mut self, _baud_rate: BaudRate) -> Result<(), Self::Error> {
        self.rates += 1;
        Ok(())
    }
}

struct StepClock<'a>(&'a Cell<u64>);

impl UbxClock for StepClock<'_> {
    fn now(&self) -> Instant {
        Instant::from_millis(self.0.get())
    }
}

fn manual_config() -> DriverConfig {
    DriverConfig::new()
        .with_baud_rate(BaudRate::B38400)
        .with_auto_baud(false)
        .with_auto_config(false)
}

fn put_i32(payload: &mut [u8], offset: usize, value: i32) {
    payload[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// NAV-PVT frame: 3D fix, 9 satellites, valid date and time.
fn pvt_frame(lon: i32, out: &mut [u8; 128]) -> usize {
    let mut payload = [0u8; 92];
    payload[4..6].copy_from_slice(&2024u16.to_le_bytes());
    payload[6] = 5;
    payload[7] = 17;
    payload[11] = 0x03;
    payload[20] = 3;
    payload[21] = 0x01;
    payload[23] = 9;
    put_i32(&mut payload, 24, lon);
    put_i32(&mut payload, 28, 500_000_000);
    put_i32(&mut payload, 36, 100_000);
    put_i32(&mut payload, 40, 200);
    encode_frame(class::NAV, msg::nav::PVT, &payload, out).unwrap()
}

//==================================================================================TESTS
#[test]
fn test_manual_link_runs_on_first_tick() {
    let time = Cell::new(0);
    let mut driver = UbxDriver::new(QueuePort::new(), StepClock(&time), manual_config());
    assert_eq!(driver.phase(), LinkPhase::Baud);

    assert_eq!(driver.poll(), LinkStatus::Running);
    assert_eq!(driver.port().rates, 1);
    assert!(driver.solution().is_none());
}

#[test]
fn test_epoch_is_published_once() {
    let time = Cell::new(0);
    let mut driver = UbxDriver::new(QueuePort::new(), StepClock(&time), manual_config());
    driver.poll();

    let mut frame = [0u8; 128];
    let n = pvt_frame(1_000_000_000, &mut frame);
    driver.port_mut().push(&frame[..n]);

    time.set(20);
    assert_eq!(driver.poll(), LinkStatus::Running);
    let solution = driver.solution().copied().unwrap();
    assert_eq!(solution.fix_type, FixType::Fix3D);
    assert_eq!(solution.lon, 1_000_000_000);
    assert_eq!(solution.num_sat, 9);
    assert_eq!(driver.stats().epochs, 1);
    assert_eq!(driver.stats().packets, 1);

    time.set(40);
    driver.poll();
    assert_eq!(driver.stats().epochs, 1);
}

#[test]
/// Two epochs decoded in one tick publish only the latest one.
fn test_signal_keeps_latest_epoch() {
    let time = Cell::new(0);
    let mut driver = UbxDriver::new(QueuePort::new(), StepClock(&time), manual_config());
    driver.poll();

    let mut frame = [0u8; 128];
    let n = pvt_frame(1, &mut frame);
    driver.port_mut().push(&frame[..n]);
    let n = pvt_frame(2, &mut frame);
    driver.port_mut().push(&frame[..n]);

    driver.poll();
    assert_eq!(driver.stats().epochs, 1);
    assert_eq!(driver.solution().map(|s| s.lon), Some(2));
}

#[test]
fn test_silent_module_trips_the_watchdog() {
    let time = Cell::new(0);
    let mut driver = UbxDriver::new(QueuePort::new(), StepClock(&time), manual_config());
    assert_eq!(driver.poll(), LinkStatus::Running);

    time.set(1_000);
    assert_eq!(driver.poll(), LinkStatus::Running);
    time.set(1_001);
    assert_eq!(driver.poll(), LinkStatus::CommunicationLost);
    assert_eq!(driver.stats().restarts, 1);
    assert_eq!(driver.phase(), LinkPhase::Baud);

    // The next tick starts a fresh session.
    assert_eq!(driver.poll(), LinkStatus::Running);
    assert_eq!(driver.port().rates, 2);
}

#[test]
/// The first phase ceiling starts on the first tick, not at construction.
fn test_late_first_poll_is_not_a_timeout() {
    let time = Cell::new(0);
    let mut driver = UbxDriver::new(QueuePort::new(), StepClock(&time), DriverConfig::new());

    time.set(2_000);
    assert_eq!(driver.poll(), LinkStatus::Negotiating);
    assert_eq!(driver.stats().restarts, 0);
    assert_eq!(driver.phase(), LinkPhase::Baud);

    // Auto-baud ceiling counted from the first tick.
    time.set(2_900);
    assert_ne!(driver.poll(), LinkStatus::CommunicationLost);
}

#[test]
fn test_epochs_refresh_the_watchdog() {
    let time = Cell::new(0);
    let mut driver = UbxDriver::new(QueuePort::new(), StepClock(&time), manual_config());
    driver.poll();

    let mut frame = [0u8; 128];
    let n = pvt_frame(7, &mut frame);
    time.set(900);
    driver.port_mut().push(&frame[..n]);
    driver.poll();

    time.set(1_800);
    assert_eq!(driver.poll(), LinkStatus::Running);
}

#[test]
fn test_read_error_restarts_session() {
    let time = Cell::new(0);
    let mut driver = UbxDriver::new(QueuePort::new(), StepClock(&time), manual_config());
    driver.poll();

    let mut frame = [0u8; 128];
    let n = pvt_frame(7, &mut frame);
    driver.port_mut().push(&frame[..n]);
    driver.poll();

    driver.port_mut().fail_read = true;
    assert_eq!(driver.poll(), LinkStatus::CommunicationLost);
    let stats = driver.stats();
    assert_eq!(stats.restarts, 1);
    // Counters of the retired session are kept.
    assert_eq!(stats.packets, 1);
    // The consumer view keeps the last solution.
    assert_eq!(driver.solution().map(|s| s.lon), Some(7));
}
