//! Test doubles shared by the integration tests: an in-memory serial port,
//! a manual clock and a u-blox module simulator answering the driver.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use ublox_nav::config::BaudRate;
use ublox_nav::protocol::driver::{LinkStatus, UbxDriver};
use ublox_nav::DriverConfig;
use ublox_nav::core::{class, msg};
use ublox_nav::core::SYNC_CHAR_1;
use ublox_nav::protocol::transport::decoder::{DecodeResult, DecodeStep, FrameDecoder};
use ublox_nav::protocol::transport::encoder::encode_frame;
use ublox_nav::protocol::transport::traits::driver_timer::DriverTimer;
use ublox_nav::protocol::transport::traits::serial_port::SerialPort;
use ublox_nav::protocol::transport::traits::ubx_clock::UbxClock;

//==================================================================================SERIAL_PORT
#[derive(Default)]
pub struct PortState {
    /// Bytes the driver has yet to read.
    pub rx: VecDeque<u8>,
    /// Bytes written by the driver, not yet consumed by the simulator.
    pub tx: Vec<u8>,
    /// Every `set_baud_rate` call, in order.
    pub baud_history: Vec<BaudRate>,
    /// Make the next read fail.
    pub fail_read: bool,
}

/// In-memory serial port. Clones share the same line, so a test keeps one
/// handle while the driver owns another.
#[derive(Clone, Default)]
pub struct MockSerialPort {
    state: Rc<RefCell<PortState>>,
}

impl MockSerialPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if received from the module.
    pub fn inject(&self, bytes: &[u8]) {
        self.state.borrow_mut().rx.extend(bytes.iter().copied());
    }

    /// Take everything the driver wrote since the last call.
    pub fn take_written(&self) -> Vec<u8> {
        std::mem::take(&mut self.state.borrow_mut().tx)
    }

    pub fn baud_history(&self) -> Vec<BaudRate> {
        self.state.borrow().baud_history.clone()
    }

    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_read = true;
    }
}

impl SerialPort for MockSerialPort {
    type Error = &'static str;

    fn bytes_waiting(&self) -> usize {
        let state = self.state.borrow();
        if state.fail_read {
            1
        } else {
            state.rx.len()
        }
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_read {
            state.fail_read = false;
            return Err("rx overrun");
        }
        state.rx.pop_front().ok_or("rx empty")
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.state.borrow_mut().tx.extend_from_slice(bytes);
        Ok(())
    }

    fn is_tx_empty(&self) -> bool {
        true
    }

    fn set_baud_rate(&mut self, baud_rate: BaudRate) -> Result<(), Self::Error> {
        self.state.borrow_mut().baud_history.push(baud_rate);
        Ok(())
    }
}

//==================================================================================CLOCK
/// Manually advanced monotonic clock.
#[derive(Clone, Default)]
pub struct MockClock {
    millis: Rc<Cell<u64>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, millis: u64) {
        self.millis.set(self.millis.get() + millis);
    }

    pub fn millis(&self) -> u64 {
        self.millis.get()
    }
}

impl UbxClock for MockClock {
    fn now(&self) -> embassy_time::Instant {
        embassy_time::Instant::from_millis(self.millis.get())
    }
}

/// Timer based on `tokio::time::sleep` to pace the async runner.
pub struct TokioTimer;

impl DriverTimer for TokioTimer {
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a {
        tokio::time::sleep(std::time::Duration::from_millis(millis as u64))
    }
}

//==================================================================================FRAMES
/// Complete UBX frame around `payload`.
pub fn ubx_frame(class: u8, id: u8, payload: &[u8]) -> Vec<u8> {
    let mut buffer = vec![0u8; payload.len() + 8];
    let len = encode_frame(class, id, payload, &mut buffer).expect("frame fits");
    buffer.truncate(len);
    buffer
}

/// MON-VER payload: software version, hardware version, extension slots.
pub fn mon_ver_payload(sw_version: &str, hw_version: &str, extensions: &[&str]) -> Vec<u8> {
    let mut payload = vec![0u8; 40 + 30 * extensions.len()];
    payload[..sw_version.len()].copy_from_slice(sw_version.as_bytes());
    payload[30..30 + hw_version.len()].copy_from_slice(hw_version.as_bytes());
    for (i, extension) in extensions.iter().enumerate() {
        let start = 40 + 30 * i;
        payload[start..start + extension.len()].copy_from_slice(extension.as_bytes());
    }
    payload
}

/// Fields of a NAV-PVT report used by the tests.
#[derive(Clone, Copy)]
pub struct PvtFields {
    pub lon: i32,
    pub lat: i32,
    pub height_mm: i32,
    pub h_msl_mm: i32,
    pub h_acc_mm: u32,
    pub v_acc_mm: u32,
    pub fix_ok: bool,
    pub fix_type: u8,
    pub num_sv: u8,
    pub valid: u8,
    pub g_speed_mm_s: i32,
}

impl Default for PvtFields {
    fn default() -> Self {
        Self {
            lon: 1_000_000_000,
            lat: 500_000_000,
            height_mm: 130_000,
            h_msl_mm: 100_000,
            h_acc_mm: 200,
            v_acc_mm: 300,
            fix_ok: true,
            fix_type: 3,
            num_sv: 9,
            valid: 0x03,
            g_speed_mm_s: 0,
        }
    }
}

/// 92-byte NAV-PVT payload.
pub fn pvt_payload(fields: &PvtFields) -> Vec<u8> {
    let mut payload = vec![0u8; 92];
    payload[4..6].copy_from_slice(&2024u16.to_le_bytes());
    payload[6] = 6;
    payload[7] = 1;
    payload[8] = 12;
    payload[9] = 30;
    payload[10] = 15;
    payload[11] = fields.valid;
    payload[16..20].copy_from_slice(&250_000_000i32.to_le_bytes());
    payload[20] = fields.fix_type;
    payload[21] = fields.fix_ok as u8;
    payload[23] = fields.num_sv;
    payload[24..28].copy_from_slice(&fields.lon.to_le_bytes());
    payload[28..32].copy_from_slice(&fields.lat.to_le_bytes());
    payload[32..36].copy_from_slice(&fields.height_mm.to_le_bytes());
    payload[36..40].copy_from_slice(&fields.h_msl_mm.to_le_bytes());
    payload[40..44].copy_from_slice(&fields.h_acc_mm.to_le_bytes());
    payload[44..48].copy_from_slice(&fields.v_acc_mm.to_le_bytes());
    payload[60..64].copy_from_slice(&fields.g_speed_mm_s.to_le_bytes());
    payload
}

pub fn pvt_frame(fields: &PvtFields) -> Vec<u8> {
    ubx_frame(class::NAV, msg::nav::PVT, &pvt_payload(fields))
}

//==================================================================================MODULE_SIMULATOR
/// Command received by the simulated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub class: u8,
    pub id: u8,
    pub payload: Vec<u8>,
}

impl Received {
    /// `(class, id)` addressed by a CFG-MSG command.
    pub fn msg_target(&self) -> Option<(u8, u8, u8)> {
        (self.class == class::CFG && self.id == msg::cfg::MSG)
            .then(|| (self.payload[0], self.payload[1], self.payload[2]))
    }
}

/// u-blox module answering MON-VER polls and acknowledging CFG commands.
pub struct ModuleSimulator {
    port: MockSerialPort,
    decoder: FrameDecoder,
    /// `None`: MON-VER polls stay unanswered.
    pub version: Option<Vec<u8>>,
    /// CFG-MSG targets answered with a NAK.
    pub nak_msg_targets: Vec<(u8, u8)>,
    /// CFG ids answered with a NAK.
    pub nak_cfg_ids: Vec<u8>,
    /// CFG ids left unanswered.
    pub silent_cfg_ids: Vec<u8>,
    pub received: Vec<Received>,
    /// Raw bytes that were not UBX frames (baud-change sentences).
    pub text: Vec<u8>,
}

impl ModuleSimulator {
    pub fn new(port: MockSerialPort) -> Self {
        Self {
            port,
            decoder: FrameDecoder::new(),
            version: None,
            nak_msg_targets: Vec::new(),
            nak_cfg_ids: Vec::new(),
            silent_cfg_ids: Vec::new(),
            received: Vec::new(),
            text: Vec::new(),
        }
    }

    /// Receiver with the given hardware version and firmware.
    pub fn with_version(mut self, sw_version: &str, hw_version: &str, extensions: &[&str]) -> Self {
        self.version = Some(mon_ver_payload(sw_version, hw_version, extensions));
        self
    }

    /// Consume what the driver wrote and queue the replies.
    pub fn service(&mut self) {
        let written = self.port.take_written();
        let mut frames = Vec::new();
        for byte in written {
            if self.decoder.step() == DecodeStep::SyncChar1 && byte != SYNC_CHAR_1 {
                self.text.push(byte);
            }
            if let DecodeResult::Frame(frame) = self.decoder.feed(byte) {
                frames.push(Received {
                    class: frame.class,
                    id: frame.id,
                    payload: frame.payload.to_vec(),
                });
            }
        }
        for frame in frames {
            self.reply(&frame);
            self.received.push(frame);
        }
    }

    fn reply(&self, frame: &Received) {
        match (frame.class, frame.id) {
            (class::MON, msg::mon::VER) => {
                if let Some(version) = &self.version {
                    self.port.inject(&ubx_frame(class::MON, msg::mon::VER, version));
                }
            }
            (class::CFG, id) => {
                if self.silent_cfg_ids.contains(&id) {
                    return;
                }
                let nak = self.nak_cfg_ids.contains(&id)
                    || frame
                        .msg_target()
                        .is_some_and(|(c, i, _)| self.nak_msg_targets.contains(&(c, i)));
                let reply_id = if nak { msg::ack::NAK } else { msg::ack::ACK };
                self.port.inject(&ubx_frame(class::ACK, reply_id, &[class::CFG, id]));
            }
            _ => {}
        }
    }

    /// Ids of the CFG commands received so far, in order.
    pub fn cfg_ids(&self) -> Vec<u8> {
        self.received
            .iter()
            .filter(|frame| frame.class == class::CFG)
            .map(|frame| frame.id)
            .collect()
    }

    pub fn last(&self, class: u8, id: u8) -> Option<&Received> {
        self.received
            .iter()
            .rev()
            .find(|frame| frame.class == class && frame.id == id)
    }
}

//==================================================================================BENCH
pub type TestDriver = UbxDriver<MockSerialPort, MockClock>;

/// Driver wired to a simulated module through a shared port and clock.
pub struct Bench {
    pub driver: TestDriver,
    pub module: ModuleSimulator,
    pub port: MockSerialPort,
    pub clock: MockClock,
}

impl Bench {
    pub fn new(config: DriverConfig, setup: impl FnOnce(ModuleSimulator) -> ModuleSimulator) -> Self {
        let port = MockSerialPort::new();
        let clock = MockClock::new();
        let module = setup(ModuleSimulator::new(port.clone()));
        let driver = UbxDriver::new(port.clone(), clock.clone(), config);
        Self {
            driver,
            module,
            port,
            clock,
        }
    }

    /// One driver tick, the module's reaction, then `step_ms` of time.
    pub fn tick(&mut self, step_ms: u64) -> LinkStatus {
        let status = self.driver.poll();
        self.module.service();
        self.clock.advance(step_ms);
        status
    }

    /// Tick until `done` holds; returns the statuses seen, `None` if
    /// `max_ticks` ran out first.
    pub fn run_until(
        &mut self,
        max_ticks: usize,
        step_ms: u64,
        mut done: impl FnMut(LinkStatus, &TestDriver) -> bool,
    ) -> Option<Vec<LinkStatus>> {
        let mut seen = Vec::new();
        for _ in 0..max_ticks {
            let status = self.tick(step_ms);
            seen.push(status);
            if done(status, &self.driver) {
                return Some(seen);
            }
        }
        None
    }
}
