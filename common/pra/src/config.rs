// Licensed under the Apache-2.0 license

//! The system clock/power configuration aggregate and its closed enumerations.
//!
//! Every layout here is `#[repr(C)]` without implicit padding so it can be read
//! out of shared memory with [`zerocopy::TryFromBytes`]; a byte pattern that is
//! not a valid enumeration member or `bool` is rejected at decode time.
//! Enumeration values follow the peripheral driver library numbering.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use zerocopy::{Immutable, IntoBytes, KnownLayout, TryFromBytes};

pub const NUM_CLK_PATHS: usize = 6;
pub const NUM_HF_CLOCKS: usize = 6;
/// PLL configuration slots. Slot 0 drives hardware PLL 1 on path 1, slot 1
/// drives PLL 2 on path 2.
pub const NUM_PLL_CONFIGS: usize = 2;

/// HSIOM selection required for the EXTCLK input pin.
pub const HSIOM_SEL_ACT_4: u32 = 20;

pub const IMO_FREQ_HZ: u32 = 8_000_000;
pub const ILO_FREQ_HZ: u32 = 32_000;
pub const PILO_FREQ_HZ: u32 = 32_768;
pub const WCO_FREQ_HZ: u32 = 32_768;

macro_rules! config_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident = $value:expr,)+ }) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Copy,
            Clone,
            Eq,
            PartialEq,
            IntoPrimitive,
            TryFromPrimitive,
            TryFromBytes,
            IntoBytes,
            Immutable,
        )]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u32)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }
    };
}

config_enum!(
    /// Input of a clock path multiplexer.
    ClkPathSource {
        Imo = 0,
        Ext = 1,
        Eco = 2,
        AltHf = 3,
        DsiMux = 4,
        Ilo = 0x110,
        Wco = 0x111,
        AltLf = 0x112,
        Pilo = 0x113,
    }
);

config_enum!(
    /// A clock path, used as the source of CLK_HF roots and CLK_PUMP.
    ClkPath {
        Path0 = 0,
        Path1 = 1,
        Path2 = 2,
        Path3 = 3,
        Path4 = 4,
        Path5 = 5,
    }
);

config_enum!(ClkHfDivider {
    NoDivide = 0,
    DivideBy2 = 1,
    DivideBy4 = 2,
    DivideBy8 = 3,
});

config_enum!(ClkLfSource {
    Ilo = 0,
    Wco = 1,
    AltLf = 2,
    Pilo = 3,
});

config_enum!(
    /// CLK_TIMER input; the HF0 variants carry a fixed pre-divider.
    ClkTimerSource {
        Imo = 0,
        Hf0NoDiv = 1,
        Hf0Div2 = 0x101,
        Hf0Div4 = 0x201,
        Hf0Div8 = 0x301,
    }
);

config_enum!(ClkPumpDivider {
    Div1 = 0,
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
    Div16 = 4,
});

config_enum!(ClkBakSource {
    Wco = 0,
    ClkLf = 1,
});

config_enum!(SysTickSource {
    ClkLf = 0,
    ClkImo = 1,
    ClkEco = 2,
    ClkTimer = 3,
});

config_enum!(LdoVoltage {
    V0_9 = 0,
    V1_1 = 1,
});

config_enum!(LdoMode {
    Disabled = 0,
    Normal = 1,
    Minimum = 2,
});

config_enum!(BuckVoltage {
    V0_9 = 2,
    V1_1 = 5,
});

config_enum!(FllCcoRange {
    Range0 = 0,
    Range1 = 1,
    Range2 = 2,
    Range3 = 3,
    Range4 = 4,
});

config_enum!(
    /// Output selection shared by the FLL and the PLLs.
    ClkOutputMode {
        Auto = 0,
        Auto2 = 1,
        Lock = 2,
        Output = 3,
    }
);

config_enum!(AltHfSysClkDiv {
    NoDiv = 0,
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
});

config_enum!(AltHfVoltageReg {
    Auto = 0,
    BlessLdo = 1,
    Bypass = 2,
});

impl ClkPath {
    pub fn index(self) -> usize {
        u32::from(self) as usize
    }
}

impl ClkHfDivider {
    /// Actual division ratio.
    pub fn ratio(self) -> u32 {
        1 << u32::from(self)
    }
}

impl ClkPumpDivider {
    pub fn shift(self) -> u32 {
        u32::from(self)
    }
}

impl ClkTimerSource {
    /// Pre-divider applied to HF0, or `None` when the timer runs from the IMO.
    pub fn hf0_divider(self) -> Option<u32> {
        match self {
            ClkTimerSource::Imo => None,
            ClkTimerSource::Hf0NoDiv => Some(1),
            ClkTimerSource::Hf0Div2 => Some(2),
            ClkTimerSource::Hf0Div4 => Some(4),
            ClkTimerSource::Hf0Div8 => Some(8),
        }
    }
}

/// One clock path multiplexer.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClkPathConfig {
    pub source: ClkPathSource,
    pub enable: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub _reserved: [u8; 3],
}

impl Default for ClkPathConfig {
    fn default() -> Self {
        ClkPathConfig {
            source: ClkPathSource::Imo,
            enable: false,
            _reserved: [0; 3],
        }
    }
}

/// Frequency-locked loop on path 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FllConfig {
    pub mult: u32,
    pub ref_div: u32,
    pub cco_range: FllCcoRange,
    pub lock_tolerance: u32,
    pub igain: u32,
    pub pgain: u32,
    pub settling_count: u32,
    pub output_mode: ClkOutputMode,
    pub cco_freq: u32,
    pub out_freq_hz: u32,
    pub enable: bool,
    pub enable_output_div: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub _reserved: [u8; 2],
}

impl Default for FllConfig {
    fn default() -> Self {
        FllConfig {
            mult: 0,
            ref_div: 0,
            cco_range: FllCcoRange::Range0,
            lock_tolerance: 0,
            igain: 0,
            pgain: 0,
            settling_count: 0,
            output_mode: ClkOutputMode::Auto,
            cco_freq: 0,
            out_freq_hz: 0,
            enable: false,
            enable_output_div: false,
            _reserved: [0; 2],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PllConfig {
    pub feedback_div: u32,
    pub reference_div: u32,
    pub output_div: u32,
    pub out_freq_hz: u32,
    pub output_mode: ClkOutputMode,
    pub lf_mode: bool,
    pub enable: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub _reserved: [u8; 2],
}

impl Default for PllConfig {
    fn default() -> Self {
        PllConfig {
            feedback_div: 0,
            reference_div: 0,
            output_div: 0,
            out_freq_hz: 0,
            output_mode: ClkOutputMode::Auto,
            lf_mode: false,
            enable: false,
            _reserved: [0; 2],
        }
    }
}

/// One CLK_HF root.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClkHfConfig {
    pub source: ClkPath,
    pub divider: ClkHfDivider,
    pub out_freq_mhz: u32,
    pub enable: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub _reserved: [u8; 3],
}

impl Default for ClkHfConfig {
    fn default() -> Self {
        ClkHfConfig {
            source: ClkPath::Path0,
            divider: ClkHfDivider::NoDivide,
            out_freq_mhz: 0,
            enable: false,
            _reserved: [0; 3],
        }
    }
}

/// Desired state of every clock and power domain managed by the secure core.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SystemConfig {
    // Power
    pub ldo_voltage: LdoVoltage,
    pub ldo_mode: LdoMode,
    pub buck_voltage: BuckVoltage,

    // ECO
    pub eco_freq_hz: u32,
    pub eco_load: u32,
    pub eco_esr: u32,
    pub eco_drive_level: u32,

    // EXTCLK
    pub ext_clk_freq_hz: u32,
    pub ext_clk_port: u32,
    pub ext_clk_pin_num: u32,
    pub ext_clk_hsiom: u32,

    // ALTHF (BLE ECO)
    pub alt_hf_freq_hz: u32,
    /// Load capacitance in femtofarads.
    pub alt_hf_cload_ff: u32,
    /// Crystal start-up time in units of 31.25 us.
    pub alt_hf_xtal_startup: u32,
    pub alt_hf_sys_clk_div: AltHfSysClkDiv,
    pub alt_hf_voltage_reg: AltHfVoltageReg,

    // WCO pins
    pub wco_in_port: u32,
    pub wco_in_pin_num: u32,
    pub wco_out_port: u32,
    pub wco_out_pin_num: u32,

    pub path: [ClkPathConfig; NUM_CLK_PATHS],
    pub fll: FllConfig,
    pub pll: [PllConfig; NUM_PLL_CONFIGS],
    pub hf: [ClkHfConfig; NUM_HF_CLOCKS],

    pub clk_lf_source: ClkLfSource,
    pub pump_source: ClkPath,
    pub pump_divider: ClkPumpDivider,
    pub clk_bak_source: ClkBakSource,
    pub clk_timer_source: ClkTimerSource,
    pub clk_src_alt_sys_tick: SysTickSource,

    pub power_enable: bool,
    pub ldo_enable: bool,
    pub pmic_enable: bool,
    pub vbackup_vddd_enable: bool,
    pub ulp_enable: bool,
    pub eco_enable: bool,
    pub ext_clk_enable: bool,
    pub clk_alt_hf_enable: bool,
    pub ilo_enable: bool,
    pub ilo_hibernate_on: bool,
    pub pilo_enable: bool,
    pub wco_enable: bool,
    pub bypass_enable: bool,
    pub clk_lf_enable: bool,
    pub clk_pump_enable: bool,
    pub clk_bak_enable: bool,
    pub clk_fast_enable: bool,
    pub clk_peri_enable: bool,
    pub clk_slow_enable: bool,
    pub clk_timer_enable: bool,
    pub clk_alt_sys_tick_enable: bool,

    /// Dividers below are stored as the actual ratio minus one.
    pub clk_fast_div: u8,
    pub clk_peri_div: u8,
    pub clk_slow_div: u8,
    pub clk_timer_divider: u8,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _reserved: [u8; 3],
}

impl Default for SystemConfig {
    /// The boot-safe clock tree: IMO drives path 0, path 0 drives CLK_HF0 at
    /// 8 MHz, FAST/PERI/SLOW run undivided and the ILO feeds CLK_LF.
    fn default() -> Self {
        let mut path = [ClkPathConfig::default(); NUM_CLK_PATHS];
        path[0].enable = true;
        let mut hf = [ClkHfConfig::default(); NUM_HF_CLOCKS];
        hf[0].enable = true;
        hf[0].out_freq_mhz = 8;

        SystemConfig {
            ldo_voltage: LdoVoltage::V1_1,
            ldo_mode: LdoMode::Normal,
            buck_voltage: BuckVoltage::V1_1,
            eco_freq_hz: 0,
            eco_load: 0,
            eco_esr: 0,
            eco_drive_level: 0,
            ext_clk_freq_hz: 0,
            ext_clk_port: 0,
            ext_clk_pin_num: 0,
            ext_clk_hsiom: 0,
            alt_hf_freq_hz: 0,
            alt_hf_cload_ff: 0,
            alt_hf_xtal_startup: 0,
            alt_hf_sys_clk_div: AltHfSysClkDiv::NoDiv,
            alt_hf_voltage_reg: AltHfVoltageReg::Auto,
            wco_in_port: 0,
            wco_in_pin_num: 0,
            wco_out_port: 0,
            wco_out_pin_num: 0,
            path,
            fll: FllConfig::default(),
            pll: [PllConfig::default(); NUM_PLL_CONFIGS],
            hf,
            clk_lf_source: ClkLfSource::Ilo,
            pump_source: ClkPath::Path0,
            pump_divider: ClkPumpDivider::Div1,
            clk_bak_source: ClkBakSource::Wco,
            clk_timer_source: ClkTimerSource::Imo,
            clk_src_alt_sys_tick: SysTickSource::ClkLf,
            power_enable: false,
            ldo_enable: false,
            pmic_enable: false,
            vbackup_vddd_enable: false,
            ulp_enable: false,
            eco_enable: false,
            ext_clk_enable: false,
            clk_alt_hf_enable: false,
            ilo_enable: true,
            ilo_hibernate_on: false,
            pilo_enable: false,
            wco_enable: false,
            bypass_enable: false,
            clk_lf_enable: true,
            clk_pump_enable: false,
            clk_bak_enable: false,
            clk_fast_enable: true,
            clk_peri_enable: true,
            clk_slow_enable: true,
            clk_timer_enable: false,
            clk_alt_sys_tick_enable: false,
            clk_fast_div: 0,
            clk_peri_div: 0,
            clk_slow_div: 0,
            clk_timer_divider: 0,
            _reserved: [0; 3],
        }
    }
}

impl SystemConfig {
    pub const SIZE: usize = core::mem::size_of::<Self>();

    /// True when the requested regulator setting puts the core in ultra-low-power mode.
    pub fn using_ulp(&self) -> bool {
        self.power_enable
            && ((self.ldo_enable && self.ldo_voltage == LdoVoltage::V0_9)
                || self.buck_voltage == BuckVoltage::V0_9)
    }

    pub fn hf0(&self) -> &ClkHfConfig {
        &self.hf[0]
    }
}
