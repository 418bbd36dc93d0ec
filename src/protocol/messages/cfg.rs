//! CFG class commands sent during negotiation. Each one writes its named
//! fields at fixed offsets into the transmit buffer.
use crate::config::{DynamicModel, FixMode, SbasMode};
use crate::core::{class, msg, MAX_GNSS_BLOCKS};
use crate::error::SerializationError;
use crate::infra::codec::bytes::ByteWriter;
use crate::infra::codec::traits::UbxCommand;

//==================================================================================NAV5
/// Factory navigation engine settings; only `dynModel` (offset 2) and
/// `fixMode` (offset 3) are patched.
const NAV5_TEMPLATE: [u8; 36] = [
    0xFF, 0xFF, 0x03, 0x03, 0x00, 0x00, 0x00, 0x00, 0x10, 0x27, 0x00, 0x00, 0x05, 0x00, 0xFA,
    0x00, 0xFA, 0x00, 0x64, 0x00, 0x2C, 0x01, 0x00, 0x3C, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];
const NAV5_DYN_MODEL_OFFSET: usize = 2;
const NAV5_FIX_MODE_OFFSET: usize = 3;

/// CFG-NAV5: dynamic platform model and fix mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgNav5 {
    pub dynamic_model: DynamicModel,
    pub fix_mode: FixMode,
}

impl UbxCommand for CfgNav5 {
    const CLASS: u8 = class::CFG;
    const ID: u8 = msg::cfg::NAV5;

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let mut payload = NAV5_TEMPLATE;
        payload[NAV5_DYN_MODEL_OFFSET] = self.dynamic_model.ubx_code();
        payload[NAV5_FIX_MODE_OFFSET] = self.fix_mode.ubx_code();
        let mut writer = ByteWriter::new(buffer);
        writer.write_slice(&payload)?;
        Ok(writer.position())
    }
}

//==================================================================================MSG
/// CFG-MSG: output rate of one message on the current port.
///
/// `rate` is the number of navigation epochs between two outputs; 0 disables
/// periodic output (the message stays pollable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgMsg {
    pub msg_class: u8,
    pub msg_id: u8,
    pub rate: u8,
}

impl UbxCommand for CfgMsg {
    const CLASS: u8 = class::CFG;
    const ID: u8 = msg::cfg::MSG;

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let mut writer = ByteWriter::new(buffer);
        writer.write_u8(self.msg_class)?;
        writer.write_u8(self.msg_id)?;
        writer.write_u8(self.rate)?;
        Ok(writer.position())
    }
}

//==================================================================================RATE
/// CFG-RATE: measurement period, one solution per measurement, GPS time
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgRate {
    pub meas_rate_ms: u16,
    pub nav_rate: u16,
    pub time_ref: u16,
}

impl CfgRate {
    pub const fn new(meas_rate_ms: u16) -> Self {
        Self {
            meas_rate_ms,
            nav_rate: 1,
            time_ref: 1,
        }
    }
}

impl UbxCommand for CfgRate {
    const CLASS: u8 = class::CFG;
    const ID: u8 = msg::cfg::RATE;

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let mut writer = ByteWriter::new(buffer);
        writer.write_u16(self.meas_rate_ms)?;
        writer.write_u16(self.nav_rate)?;
        writer.write_u16(self.time_ref)?;
        Ok(writer.position())
    }
}

//==================================================================================SBAS
const SBAS_MODE_ENABLED: u8 = 3;
const SBAS_MODE_DISABLED: u8 = 2;
/// Ranging, corrections and integrity.
const SBAS_USAGE: u8 = 3;
const SBAS_MAX_CHANNELS: u8 = 3;

/// CFG-SBAS: augmentation service selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgSbas {
    pub mode: SbasMode,
}

impl UbxCommand for CfgSbas {
    const CLASS: u8 = class::CFG;
    const ID: u8 = msg::cfg::SBAS;

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let mut writer = ByteWriter::new(buffer);
        writer.write_u8(if self.mode.is_enabled() {
            SBAS_MODE_ENABLED
        } else {
            SBAS_MODE_DISABLED
        })?;
        writer.write_u8(SBAS_USAGE)?;
        writer.write_u8(SBAS_MAX_CHANNELS)?;
        writer.write_u8(0)?; // scanmode2
        writer.write_u32(self.mode.scan_mode1())?;
        Ok(writer.position())
    }
}

//==================================================================================GNSS
pub const GNSS_ID_SBAS: u8 = 1;
pub const GNSS_ID_GALILEO: u8 = 2;
/// Tracking channels requested in the CFG-GNSS header.
const GNSS_USED_CHANNELS: u8 = 32;

/// One per-constellation descriptor of CFG-GNSS.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GnssBlock {
    pub gnss_id: u8,
    pub reserved_channels: u8,
    pub max_channels: u8,
    pub enabled: bool,
    pub sig_cfg_mask: u8,
}

impl GnssBlock {
    /// SBAS descriptor; enabled unless SBAS is switched off.
    pub const fn sbas(mode: SbasMode) -> Self {
        let enabled = mode.is_enabled();
        Self {
            gnss_id: GNSS_ID_SBAS,
            reserved_channels: if enabled { 1 } else { 0 },
            max_channels: 3,
            enabled,
            sig_cfg_mask: 1,
        }
    }

    /// Galileo descriptor; enabled only when Galileo usage is requested.
    pub const fn galileo(enabled: bool) -> Self {
        Self {
            gnss_id: GNSS_ID_GALILEO,
            reserved_channels: if enabled { 4 } else { 0 },
            max_channels: 8,
            enabled,
            sig_cfg_mask: 1,
        }
    }

    fn write(&self, writer: &mut ByteWriter<'_>) -> Result<(), SerializationError> {
        writer.write_u8(self.gnss_id)?;
        writer.write_u8(self.reserved_channels)?;
        writer.write_u8(self.max_channels)?;
        writer.write_u8(0)?;
        writer.write_u8(self.enabled as u8)?;
        writer.write_u8(0)?;
        writer.write_u8(self.sig_cfg_mask)?;
        writer.write_u8(0)?;
        Ok(())
    }
}

/// CFG-GNSS: constellation selection. Holds up to `MAX_GNSS_BLOCKS`
/// descriptors in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgGnss {
    blocks: [GnssBlock; MAX_GNSS_BLOCKS],
    count: usize,
}

impl Default for CfgGnss {
    fn default() -> Self {
        Self::new()
    }
}

impl CfgGnss {
    pub const fn new() -> Self {
        Self {
            blocks: [GnssBlock {
                gnss_id: 0,
                reserved_channels: 0,
                max_channels: 0,
                enabled: false,
                sig_cfg_mask: 0,
            }; MAX_GNSS_BLOCKS],
            count: 0,
        }
    }

    /// Append a descriptor.
    pub fn push(&mut self, block: GnssBlock) -> Result<(), SerializationError> {
        let slot = self
            .blocks
            .get_mut(self.count)
            .ok_or(SerializationError::TooManyGnssBlocks {
                count: self.count + 1,
            })?;
        *slot = block;
        self.count += 1;
        Ok(())
    }

    pub fn blocks(&self) -> &[GnssBlock] {
        &self.blocks[..self.count]
    }
}

impl UbxCommand for CfgGnss {
    const CLASS: u8 = class::CFG;
    const ID: u8 = msg::cfg::GNSS;

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let mut writer = ByteWriter::new(buffer);
        writer.write_u8(0)?; // msgVer
        writer.write_u8(0)?; // numTrkChHw, read only
        writer.write_u8(GNSS_USED_CHANNELS)?;
        writer.write_u8(self.count as u8)?;
        for block in self.blocks() {
            block.write(&mut writer)?;
        }
        Ok(writer.position())
    }
}
