//! Driver settings: link speed, auto-baud/auto-config switches and the
//! navigation engine options pushed to the module during negotiation.

//==================================================================================BAUD_RATE
/// Serial speeds the module can be switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaudRate {
    B115200,
    B57600,
    B38400,
    B19200,
    B9600,
    B230400,
}

impl BaudRate {
    /// Probe order used by the auto-baud phase.
    pub const ALL: [BaudRate; 6] = [
        BaudRate::B115200,
        BaudRate::B57600,
        BaudRate::B38400,
        BaudRate::B19200,
        BaudRate::B9600,
        BaudRate::B230400,
    ];

    /// Line speed in bits per second.
    pub const fn bps(self) -> u32 {
        match self {
            BaudRate::B115200 => 115_200,
            BaudRate::B57600 => 57_600,
            BaudRate::B38400 => 38_400,
            BaudRate::B19200 => 19_200,
            BaudRate::B9600 => 9_600,
            BaudRate::B230400 => 230_400,
        }
    }

    /// `$PUBX,41` sentence switching UART1 to this speed (UBX+NMEA in, UBX out).
    pub const fn pubx_command(self) -> &'static str {
        match self {
            BaudRate::B115200 => "$PUBX,41,1,0003,0001,115200,0*1E\r\n",
            BaudRate::B57600 => "$PUBX,41,1,0003,0001,57600,0*2D\r\n",
            BaudRate::B38400 => "$PUBX,41,1,0003,0001,38400,0*26\r\n",
            BaudRate::B19200 => "$PUBX,41,1,0003,0001,19200,0*23\r\n",
            BaudRate::B9600 => "$PUBX,41,1,0003,0001,9600,0*16\r\n",
            BaudRate::B230400 => "$PUBX,41,1,0003,0001,230400,0*1C\r\n",
        }
    }
}

//==================================================================================DYNAMIC_MODEL
/// Navigation engine platform model (CFG-NAV5 `dynModel`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DynamicModel {
    Pedestrian,
    #[default]
    Airborne1g,
    Airborne4g,
}

impl DynamicModel {
    pub const fn ubx_code(self) -> u8 {
        match self {
            DynamicModel::Pedestrian => 3,
            DynamicModel::Airborne1g => 6,
            DynamicModel::Airborne4g => 8,
        }
    }
}

/// CFG-NAV5 `fixMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FixMode {
    Only2d,
    Only3d,
    #[default]
    Auto,
}

impl FixMode {
    pub const fn ubx_code(self) -> u8 {
        match self {
            FixMode::Only2d => 1,
            FixMode::Only3d => 2,
            FixMode::Auto => 3,
        }
    }
}

//==================================================================================SBAS
const SBAS_PRN_BASE: u8 = 120;

const fn prn_bit(prn: u8) -> u32 {
    1 << (prn - SBAS_PRN_BASE)
}

/// Regional augmentation service selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SbasMode {
    #[default]
    Auto,
    Egnos,
    Waas,
    Msas,
    Gagan,
    None,
}

impl SbasMode {
    /// CFG-SBAS `scanmode1` PRN mask (bit 0 = PRN 120). Zero lets the
    /// receiver scan every PRN.
    pub const fn scan_mode1(self) -> u32 {
        match self {
            SbasMode::Auto | SbasMode::None => 0,
            SbasMode::Egnos => prn_bit(123) | prn_bit(126) | prn_bit(136),
            SbasMode::Waas => prn_bit(131) | prn_bit(133) | prn_bit(138),
            SbasMode::Msas => prn_bit(129) | prn_bit(137),
            SbasMode::Gagan => prn_bit(127) | prn_bit(128),
        }
    }

    pub const fn is_enabled(self) -> bool {
        !matches!(self, SbasMode::None)
    }
}

//==================================================================================PROVIDER
/// Receiver flavour selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Provider {
    #[default]
    Ublox,
    /// u-blox 7 or newer, allowed to run the navigation engine at 10 Hz.
    Ublox7Plus,
}

//==================================================================================DRIVER_CONFIG
/// Settings applied by the driver on every link establishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverConfig {
    /// Speed the link must end up running at.
    pub baud_rate: BaudRate,
    /// Probe every candidate speed with a baud-change command before settling.
    pub auto_baud: bool,
    /// Detect the hardware and push the message/rate configuration.
    pub auto_config: bool,
    pub dynamic_model: DynamicModel,
    pub fix_mode: FixMode,
    pub sbas_mode: SbasMode,
    /// Enable Galileo tracking when the receiver advertises it.
    pub use_galileo: bool,
    pub provider: Provider,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverConfig {
    pub const fn new() -> Self {
        Self {
            baud_rate: BaudRate::B115200,
            auto_baud: true,
            auto_config: true,
            dynamic_model: DynamicModel::Airborne1g,
            fix_mode: FixMode::Auto,
            sbas_mode: SbasMode::Auto,
            use_galileo: false,
            provider: Provider::Ublox,
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: BaudRate) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_auto_baud(mut self, enabled: bool) -> Self {
        self.auto_baud = enabled;
        self
    }

    pub fn with_auto_config(mut self, enabled: bool) -> Self {
        self.auto_config = enabled;
        self
    }

    pub fn with_dynamic_model(mut self, model: DynamicModel) -> Self {
        self.dynamic_model = model;
        self
    }

    pub fn with_sbas_mode(mut self, mode: SbasMode) -> Self {
        self.sbas_mode = mode;
        self
    }

    pub fn with_galileo(mut self, enabled: bool) -> Self {
        self.use_galileo = enabled;
        self
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }
}
