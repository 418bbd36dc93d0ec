//! Navigation solution record and the mapper that fills it from decoded
//! NAV messages.
//!
//! The mapper keeps a private working copy of the solution. A snapshot is
//! handed out only when both a position-bearing and a velocity-bearing
//! message were applied since the previous snapshot, so a consumer never
//! sees position and velocity from two different epochs.
use crate::protocol::messages::{
    nav::FIX_OK_FLAG, NavPosLlh, NavPvt, NavSol, NavStatus, NavVelNed, UbxMessage, UtcDateTime,
};

/// Upper bound of every accuracy estimate and of HDOP.
pub const MAX_ACCURACY: u16 = 9999;
const MAX_MILLIS: u16 = 999;

const RAW_FIX_2D: u8 = 0x02;
const RAW_FIX_3D: u8 = 0x03;

//==================================================================================Enums and Structs
/// Fix quality published to the consumer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FixType {
    #[default]
    None,
    DeadReckoning,
    Fix2D,
    Fix3D,
    GnssDeadReckoning,
    TimeOnly,
}

impl FixType {
    /// Fix type from the `gpsFixOk` flag and the raw `gpsFix` code. Only a
    /// valid 2D or 3D fix is trusted; everything else counts as no fix.
    pub fn from_raw(fix_ok: bool, raw: u8) -> Self {
        match (fix_ok, raw) {
            (true, RAW_FIX_2D) => FixType::Fix2D,
            (true, RAW_FIX_3D) => FixType::Fix3D,
            _ => FixType::None,
        }
    }
}

/// Which parts of the solution hold meaningful data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValidityFlags {
    /// Position accuracy estimates are valid.
    pub valid_epe: bool,
    /// North/east velocity is valid.
    pub valid_vel_ne: bool,
    /// Down velocity is valid.
    pub valid_vel_d: bool,
    pub valid_time: bool,
}

/// UTC timestamp of the solution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SolutionTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub millis: u16,
}

/// Navigation solution as published at epoch completion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavSolution {
    pub fix_type: FixType,
    pub num_sat: u8,
    /// Longitude, 1e-7 deg.
    pub lon: i32,
    /// Latitude, 1e-7 deg.
    pub lat: i32,
    /// Altitude above mean sea level, cm.
    pub alt: i32,
    /// Altitude above the ellipsoid, cm.
    pub alt_ellipsoid: i32,
    /// Ground speed, cm/s.
    pub ground_speed: u32,
    /// Heading of motion, deg * 10.
    pub ground_course: u16,
    /// North, east, down velocity, cm/s.
    pub vel_ned: [i32; 3],
    /// Horizontal position accuracy, cm.
    pub eph: u16,
    /// Vertical position accuracy, cm.
    pub epv: u16,
    /// Speed accuracy, cm/s.
    pub speed_acc: u16,
    /// Heading accuracy, deg * 10.
    pub heading_acc: u16,
    /// Horizontal dilution of precision, 0.01 units.
    pub hdop: u16,
    pub time: SolutionTime,
    pub flags: ValidityFlags,
}

/// Result of applying one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochStatus {
    Incomplete,
    /// Both halves of the epoch arrived; snapshot to publish.
    Complete(NavSolution),
}

/// "Position updated" and "velocity updated" for the current epoch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EpochLatch {
    position: bool,
    velocity: bool,
}

impl EpochLatch {
    pub fn mark_position(&mut self) {
        self.position = true;
    }

    pub fn mark_velocity(&mut self) {
        self.velocity = true;
    }

    /// Clear both latches and return `true` if both were set.
    pub fn take_complete(&mut self) -> bool {
        if self.position && self.velocity {
            *self = Self::default();
            true
        } else {
            false
        }
    }
}

//==================================================================================Conversions
fn clamp_accuracy(value: u32) -> u16 {
    value.min(MAX_ACCURACY as u32) as u16
}

/// Heading in 1e-5 deg to deg * 10.
fn course_from_heading(heading: i32) -> u16 {
    (heading / 10_000) as u16
}

fn millis_from_nano(nano: i32) -> u16 {
    (nano / 1_000_000).clamp(0, MAX_MILLIS as i32) as u16
}

//==================================================================================SolutionMapper
/// Applies decoded NAV messages to the working solution.
#[derive(Debug, Default, Clone)]
pub struct SolutionMapper {
    solution: NavSolution,
    /// Fix type from the last status/solution message, applied on the next
    /// position message.
    next_fix: FixType,
    latch: EpochLatch,
}

impl SolutionMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Working copy; may mix two epochs until the next completion.
    pub fn working(&self) -> &NavSolution {
        &self.solution
    }

    /// Apply one decoded message. Non-navigation messages leave the solution
    /// untouched; the epoch check runs after every message.
    pub fn apply(&mut self, message: &UbxMessage<'_>) -> EpochStatus {
        match message {
            UbxMessage::NavPosLlh(pos) => self.apply_position(pos),
            UbxMessage::NavStatus(status) => self.apply_status(status),
            UbxMessage::NavSol(sol) => self.apply_sol(sol),
            UbxMessage::NavVelNed(vel) => self.apply_velocity(vel),
            UbxMessage::NavTimeUtc(utc) => self.apply_time(&utc.time),
            UbxMessage::NavPvt(pvt) => self.apply_pvt(pvt),
            _ => {}
        }

        if self.latch.take_complete() {
            EpochStatus::Complete(self.solution)
        } else {
            EpochStatus::Incomplete
        }
    }

    fn apply_position(&mut self, pos: &NavPosLlh) {
        let solution = &mut self.solution;
        solution.lon = pos.lon;
        solution.lat = pos.lat;
        solution.alt = pos.h_msl / 10;
        solution.alt_ellipsoid = pos.height / 10;
        solution.eph = clamp_accuracy(pos.h_acc / 10);
        solution.epv = clamp_accuracy(pos.v_acc / 10);
        solution.flags.valid_epe = true;
        if self.next_fix != FixType::None {
            solution.fix_type = self.next_fix;
        }
        self.latch.mark_position();
    }

    /// Record the fix for the next position message. A "no fix" report
    /// overrides a stale fix type right away.
    fn update_fix(&mut self, fix_ok: bool, raw: u8) {
        self.next_fix = FixType::from_raw(fix_ok, raw);
        if self.next_fix == FixType::None {
            self.solution.fix_type = FixType::None;
        }
    }

    fn apply_status(&mut self, status: &NavStatus) {
        self.update_fix(status.flags & FIX_OK_FLAG != 0, status.gps_fix);
    }

    fn apply_sol(&mut self, sol: &NavSol) {
        self.update_fix(sol.flags & FIX_OK_FLAG != 0, sol.gps_fix);
        self.solution.num_sat = sol.num_sv;
        self.solution.hdop = clamp_accuracy(sol.p_dop as u32);
    }

    fn apply_velocity(&mut self, vel: &NavVelNed) {
        let solution = &mut self.solution;
        solution.ground_speed = vel.g_speed;
        solution.ground_course = course_from_heading(vel.heading);
        solution.vel_ned = [vel.vel_n, vel.vel_e, vel.vel_d];
        solution.speed_acc = clamp_accuracy(vel.s_acc);
        solution.heading_acc = clamp_accuracy(vel.c_acc / 10_000);
        solution.flags.valid_vel_ne = true;
        solution.flags.valid_vel_d = true;
        self.latch.mark_velocity();
    }

    /// Accept the timestamp only when both date and time are flagged valid.
    fn apply_time(&mut self, time: &UtcDateTime) {
        let solution = &mut self.solution;
        if time.is_valid() {
            solution.time = SolutionTime {
                year: time.year,
                month: time.month,
                day: time.day,
                hours: time.hour,
                minutes: time.min,
                seconds: time.sec,
                millis: millis_from_nano(time.nano),
            };
            solution.flags.valid_time = true;
        } else {
            solution.flags.valid_time = false;
        }
    }

    /// PVT velocities are mm/s; everything is brought to the VELNED units.
    fn apply_pvt(&mut self, pvt: &NavPvt) {
        self.next_fix = FixType::from_raw(pvt.flags & FIX_OK_FLAG != 0, pvt.fix_type);

        let solution = &mut self.solution;
        solution.fix_type = self.next_fix;
        solution.lon = pvt.lon;
        solution.lat = pvt.lat;
        solution.alt = pvt.h_msl / 10;
        solution.alt_ellipsoid = pvt.height / 10;
        solution.vel_ned = [pvt.vel_n / 10, pvt.vel_e / 10, pvt.vel_d / 10];
        solution.ground_speed = (pvt.g_speed / 10).max(0) as u32;
        solution.ground_course = course_from_heading(pvt.head_mot);
        solution.num_sat = pvt.num_sv;
        solution.eph = clamp_accuracy(pvt.h_acc / 10);
        solution.epv = clamp_accuracy(pvt.v_acc / 10);
        solution.speed_acc = clamp_accuracy(pvt.s_acc / 10);
        solution.heading_acc = clamp_accuracy(pvt.head_acc / 10_000);
        solution.hdop = clamp_accuracy(pvt.p_dop as u32);
        solution.flags.valid_vel_ne = true;
        solution.flags.valid_vel_d = true;
        solution.flags.valid_epe = true;

        self.apply_time(&pvt.time);
        self.latch.mark_position();
        self.latch.mark_velocity();
    }
}
