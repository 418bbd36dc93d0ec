//! # Quickstart Example
//!
//! Minimal example demonstrating the basics of ublox-nav:
//! - Frame a UBX command and decode it back
//! - Run the driver over an in-memory serial port
//! - Read the published navigation solution
//!
//! This example uses `std` for a quick trial run.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use std::collections::VecDeque;
use std::convert::Infallible;

use ublox_nav::config::BaudRate;
use ublox_nav::core::{class, msg, MAX_COMMAND_FRAME};
use ublox_nav::protocol::messages::{CfgRate, UbxMessage};
use ublox_nav::protocol::transport::decoder::{DecodeResult, FrameDecoder};
use ublox_nav::protocol::transport::encoder::{encode_command, encode_frame};
use ublox_nav::protocol::transport::traits::serial_port::SerialPort;
use ublox_nav::protocol::transport::traits::ubx_clock::UbxClock;
use ublox_nav::{DriverConfig, LinkStatus, UbxDriver};

/// Serial port looping canned module output into the driver.
#[derive(Default)]
struct LoopbackPort {
    rx: VecDeque<u8>,
    tx: usize,
}

impl SerialPort for LoopbackPort {
    type Error = Infallible;

    fn bytes_waiting(&self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Result<u8, Infallible> {
        Ok(self.rx.pop_front().unwrap_or(0))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Infallible> {
        self.tx += bytes.len();
        Ok(())
    }

    fn is_tx_empty(&self) -> bool {
        true
    }

    fn set_baud_rate(&mut self, baud_rate: BaudRate) -> Result<(), Infallible> {
        println!("   Line speed set to {} bps", baud_rate.bps());
        Ok(())
    }
}

/// Wall clock anchored at program start.
struct StdClock(std::time::Instant);

impl UbxClock for StdClock {
    fn now(&self) -> embassy_time::Instant {
        embassy_time::Instant::from_millis(self.0.elapsed().as_millis() as u64)
    }
}

/// NAV-PVT payload with a 3D fix over Brest.
fn pvt_payload() -> [u8; 92] {
    let mut payload = [0u8; 92];
    payload[4..6].copy_from_slice(&2024u16.to_le_bytes());
    payload[6] = 6; // month
    payload[7] = 21; // day
    payload[8] = 12; // hour
    payload[11] = 0x03; // validDate | validTime
    payload[20] = 0x03; // 3D
    payload[21] = 0x01; // gnssFixOk
    payload[23] = 11; // numSV
    payload[24..28].copy_from_slice(&(-44_860_000i32).to_le_bytes());
    payload[28..32].copy_from_slice(&483_900_000i32.to_le_bytes());
    payload[32..36].copy_from_slice(&62_000i32.to_le_bytes());
    payload[36..40].copy_from_slice(&12_000i32.to_le_bytes());
    payload[40..44].copy_from_slice(&1_500u32.to_le_bytes());
    payload[44..48].copy_from_slice(&2_500u32.to_le_bytes());
    payload[76..78].copy_from_slice(&120u16.to_le_bytes());
    payload
}

fn main() {
    println!("=== ublox-nav Quickstart ===\n");

    // ======================================================================
    // 1. Frame a command and decode it back
    // ======================================================================
    println!("1. Framing CFG-RATE (5 Hz)");

    let mut frame = [0u8; MAX_COMMAND_FRAME];
    let len = match encode_command(&CfgRate::new(200), &mut frame) {
        Ok(len) => len,
        Err(err) => {
            println!("   Encoding failed: {}", err);
            return;
        }
    };
    println!("   Bytes: {:02X?}", &frame[..len]);

    let mut decoder = FrameDecoder::new();
    for &byte in &frame[..len] {
        if let DecodeResult::Frame(decoded) = decoder.feed(byte) {
            println!(
                "   Decoded {:#04x}/{:#04x}, {} payload bytes\n",
                decoded.class,
                decoded.id,
                decoded.payload.len()
            );
        }
    }

    // ======================================================================
    // 2. Drive the link over a loopback port
    // ======================================================================
    println!("2. Running the driver without negotiation");

    let config = DriverConfig::new()
        .with_auto_baud(false)
        .with_auto_config(false);
    let mut driver = UbxDriver::new(
        LoopbackPort::default(),
        StdClock(std::time::Instant::now()),
        config,
    );
    println!("   First tick: {:?}", driver.poll());

    let payload = pvt_payload();
    let mut wire = [0u8; 128];
    let len = match encode_frame(class::NAV, msg::nav::PVT, &payload, &mut wire) {
        Ok(len) => len,
        Err(err) => {
            println!("   Encoding failed: {}", err);
            return;
        }
    };
    driver.port_mut().rx.extend(&wire[..len]);

    match UbxMessage::parse(class::NAV, msg::nav::PVT, &payload) {
        Ok(UbxMessage::NavPvt(pvt)) => println!("   Injected PVT with {} satellites", pvt.num_sv),
        other => println!("   Unexpected parse result: {:?}", other),
    }

    if driver.poll() == LinkStatus::Running {
        if let Some(solution) = driver.solution() {
            println!("   Fix: {:?}", solution.fix_type);
            println!(
                "   Position: {:.5}°N, {:.5}°W, {} cm MSL",
                solution.lat as f64 * 1e-7,
                -(solution.lon as f64) * 1e-7,
                solution.alt
            );
            println!("   Horizontal accuracy: {} cm", solution.eph);
        }
    }

    let stats = driver.stats();
    println!(
        "\n   Stats: {} packets, {} errors, {} epochs, {} restarts",
        stats.packets, stats.errors, stats.epochs, stats.restarts
    );
}
