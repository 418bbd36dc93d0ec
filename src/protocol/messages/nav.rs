//! NAV class payloads. Fields keep their wire units; unit conversion and
//! clamping happen in the solution mapper.
use crate::core::{class, msg};
use crate::error::DeserializationError;
use crate::infra::codec::bytes::ByteReader;
use crate::infra::codec::traits::FromPayload;

/// `gpsFixOk` bit shared by the status, solution and PVT flags bytes.
pub const FIX_OK_FLAG: u8 = 0x01;
/// UTC date and time validity bits (`validDate | validTime`).
pub const VALID_DATE_TIME: u8 = 0x03;

//==================================================================================POSLLH
/// NAV-POSLLH: geodetic position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavPosLlh {
    pub itow: u32,
    /// 1e-7 deg.
    pub lon: i32,
    /// 1e-7 deg.
    pub lat: i32,
    /// Height above ellipsoid, mm.
    pub height: i32,
    /// Height above mean sea level, mm.
    pub h_msl: i32,
    /// mm.
    pub h_acc: u32,
    /// mm.
    pub v_acc: u32,
}

impl FromPayload<'_> for NavPosLlh {
    const CLASS: u8 = class::NAV;
    const ID: u8 = msg::nav::POSLLH;
    const MIN_LEN: usize = 28;

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        Self::check_len(payload)?;
        let mut reader = ByteReader::new(payload);
        Ok(Self {
            itow: reader.read_u32()?,
            lon: reader.read_i32()?,
            lat: reader.read_i32()?,
            height: reader.read_i32()?,
            h_msl: reader.read_i32()?,
            h_acc: reader.read_u32()?,
            v_acc: reader.read_u32()?,
        })
    }
}

//==================================================================================STATUS
/// NAV-STATUS: receiver fix status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavStatus {
    pub itow: u32,
    pub gps_fix: u8,
    pub flags: u8,
}

impl FromPayload<'_> for NavStatus {
    const CLASS: u8 = class::NAV;
    const ID: u8 = msg::nav::STATUS;
    const MIN_LEN: usize = 16;

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        Self::check_len(payload)?;
        let mut reader = ByteReader::new(payload);
        Ok(Self {
            itow: reader.read_u32()?,
            gps_fix: reader.read_u8()?,
            flags: reader.read_u8()?,
        })
    }
}

//==================================================================================SOL
/// NAV-SOL: navigation solution summary (fix, DOP, satellite count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavSol {
    pub itow: u32,
    pub gps_fix: u8,
    pub flags: u8,
    /// Position DOP, 0.01 units.
    pub p_dop: u16,
    pub num_sv: u8,
}

impl FromPayload<'_> for NavSol {
    const CLASS: u8 = class::NAV;
    const ID: u8 = msg::nav::SOL;
    const MIN_LEN: usize = 52;

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        Self::check_len(payload)?;
        let mut reader = ByteReader::new(payload);
        let itow = reader.read_u32()?;
        reader.seek(10)?;
        let gps_fix = reader.read_u8()?;
        let flags = reader.read_u8()?;
        reader.seek(44)?;
        let p_dop = reader.read_u16()?;
        reader.advance(1)?;
        let num_sv = reader.read_u8()?;
        Ok(Self {
            itow,
            gps_fix,
            flags,
            p_dop,
            num_sv,
        })
    }
}

//==================================================================================VELNED
/// NAV-VELNED: velocity in the local NED frame, cm/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavVelNed {
    pub itow: u32,
    pub vel_n: i32,
    pub vel_e: i32,
    pub vel_d: i32,
    /// 3-D speed.
    pub speed: u32,
    /// Ground speed.
    pub g_speed: u32,
    /// Heading of motion, 1e-5 deg.
    pub heading: i32,
    pub s_acc: u32,
    /// Heading accuracy, 1e-5 deg.
    pub c_acc: u32,
}

impl FromPayload<'_> for NavVelNed {
    const CLASS: u8 = class::NAV;
    const ID: u8 = msg::nav::VELNED;
    const MIN_LEN: usize = 36;

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        Self::check_len(payload)?;
        let mut reader = ByteReader::new(payload);
        Ok(Self {
            itow: reader.read_u32()?,
            vel_n: reader.read_i32()?,
            vel_e: reader.read_i32()?,
            vel_d: reader.read_i32()?,
            speed: reader.read_u32()?,
            g_speed: reader.read_u32()?,
            heading: reader.read_i32()?,
            s_acc: reader.read_u32()?,
            c_acc: reader.read_u32()?,
        })
    }
}

//==================================================================================UTC_TIME
/// Calendar date and time as transmitted by TIMEUTC and PVT.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtcDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub min: u8,
    pub sec: u8,
    /// Fraction of second, ns (may be negative).
    pub nano: i32,
    /// Validity bits.
    pub valid: u8,
}

impl UtcDateTime {
    /// Both the date and the time of day are flagged valid.
    pub fn is_valid(&self) -> bool {
        self.valid & VALID_DATE_TIME == VALID_DATE_TIME
    }
}

/// NAV-TIMEUTC: UTC time solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavTimeUtc {
    pub itow: u32,
    pub t_acc: u32,
    pub time: UtcDateTime,
}

impl FromPayload<'_> for NavTimeUtc {
    const CLASS: u8 = class::NAV;
    const ID: u8 = msg::nav::TIMEUTC;
    const MIN_LEN: usize = 20;

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        Self::check_len(payload)?;
        let mut reader = ByteReader::new(payload);
        let itow = reader.read_u32()?;
        let t_acc = reader.read_u32()?;
        let nano = reader.read_i32()?;
        Ok(Self {
            itow,
            t_acc,
            time: UtcDateTime {
                year: reader.read_u16()?,
                month: reader.read_u8()?,
                day: reader.read_u8()?,
                hour: reader.read_u8()?,
                min: reader.read_u8()?,
                sec: reader.read_u8()?,
                nano,
                valid: reader.read_u8()?,
            },
        })
    }
}

//==================================================================================PVT
/// NAV-PVT: position, velocity and time in a single epoch message.
///
/// Velocities and ground speed are in mm/s here, unlike NAV-VELNED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavPvt {
    pub itow: u32,
    pub time: UtcDateTime,
    pub t_acc: u32,
    pub fix_type: u8,
    pub flags: u8,
    pub flags2: u8,
    pub num_sv: u8,
    pub lon: i32,
    pub lat: i32,
    pub height: i32,
    pub h_msl: i32,
    pub h_acc: u32,
    pub v_acc: u32,
    pub vel_n: i32,
    pub vel_e: i32,
    pub vel_d: i32,
    pub g_speed: i32,
    /// Heading of motion, 1e-5 deg.
    pub head_mot: i32,
    /// mm/s.
    pub s_acc: u32,
    /// 1e-5 deg.
    pub head_acc: u32,
    pub p_dop: u16,
}

impl NavPvt {
    /// Payload length of the u-blox 8+ layout; older firmware sends 84 bytes.
    pub const MODERN_LEN: usize = 92;
}

impl FromPayload<'_> for NavPvt {
    const CLASS: u8 = class::NAV;
    const ID: u8 = msg::nav::PVT;
    const MIN_LEN: usize = 84;

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        Self::check_len(payload)?;
        let mut reader = ByteReader::new(payload);
        let itow = reader.read_u32()?;
        let year = reader.read_u16()?;
        let month = reader.read_u8()?;
        let day = reader.read_u8()?;
        let hour = reader.read_u8()?;
        let min = reader.read_u8()?;
        let sec = reader.read_u8()?;
        let valid = reader.read_u8()?;
        let t_acc = reader.read_u32()?;
        let nano = reader.read_i32()?;
        Ok(Self {
            itow,
            time: UtcDateTime {
                year,
                month,
                day,
                hour,
                min,
                sec,
                nano,
                valid,
            },
            t_acc,
            fix_type: reader.read_u8()?,
            flags: reader.read_u8()?,
            flags2: reader.read_u8()?,
            num_sv: reader.read_u8()?,
            lon: reader.read_i32()?,
            lat: reader.read_i32()?,
            height: reader.read_i32()?,
            h_msl: reader.read_i32()?,
            h_acc: reader.read_u32()?,
            v_acc: reader.read_u32()?,
            vel_n: reader.read_i32()?,
            vel_e: reader.read_i32()?,
            vel_d: reader.read_i32()?,
            g_speed: reader.read_i32()?,
            head_mot: reader.read_i32()?,
            s_acc: reader.read_u32()?,
            head_acc: reader.read_u32()?,
            p_dop: reader.read_u16()?,
        })
    }
}
