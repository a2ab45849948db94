// Licensed under the Apache-2.0 license

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Number of slots in the register policy table. Slots past the last named
/// index are never populated.
pub const REG_POLICY_TABLE_SIZE: usize = 20;

/// Register slots addressable by `Reg32Get`, `Reg32Set` and `Reg32ClrSet`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum RegisterIndex {
    SrssPwrLvdCtl = 0,
    SrssIntr = 1,
    SrssIntrSet = 2,
    SrssIntrMask = 3,
    SrssIntrCfg = 4,
    SrssClkRootSelect1 = 5,
    SrssClkRootSelect2 = 6,
    SrssClkRootSelect3 = 7,
    SrssClkRootSelect4 = 8,
    SrssClkRootSelect5 = 9,
    SrssClkRootSelect6 = 10,
    FlashcFlashCmd = 11,
    CpussCm4PwrCtl = 12,
    SrssPwrCtl = 13,
    SrssPwrHibernate = 14,
}

impl RegisterIndex {
    /// Table slot for CLK_ROOT_SELECT[`root`], `root` in 1..=6.
    pub fn clk_root_select(root: u16) -> Option<Self> {
        match root {
            1..=6 => Self::try_from(Self::SrssClkRootSelect1 as u16 + root - 1).ok(),
            _ => None,
        }
    }
}

/// Functions reachable through `SecureOnly`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum SecureOnlyFunc {
    PmHibernate = 1,
    PmCm4DpFlagSet = 2,
    FlashRamDelay = 3,
}

/// Field-level edits reachable through `FuncPolicy`. Indices share one number
/// space with [`SecureOnlyFunc`]; index 0 is the whole-configuration function.
#[derive(Debug, Copy, Clone, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum PolicyFunc {
    PmLdoSetVoltage = 4,
    PmLdoSetMode = 5,
    PmBuckEnable = 6,
    EcoDisable = 7,
    FllDisable = 8,
    PllDisable = 9,
    IloEnable = 10,
    IloDisable = 11,
    IloHibernateOn = 12,
    PiloEnable = 13,
    PiloDisable = 14,
    PiloSetTrim = 15,
    WcoEnable = 16,
    WcoDisable = 17,
    WcoBypass = 18,
    HfEnable = 19,
    HfDisable = 20,
    HfSetSource = 21,
    HfSetDivider = 22,
    FastSetDivider = 23,
    PeriSetDivider = 24,
    LfSetSource = 25,
    TimerSetSource = 26,
    TimerSetDivider = 27,
    TimerEnable = 28,
    TimerDisable = 29,
    PumpSetSource = 30,
    PumpSetDivider = 31,
    PumpEnable = 32,
    PumpDisable = 33,
    BakSetSource = 34,
    EcoConfigure = 35,
    EcoEnable = 36,
    PathSetSource = 37,
    FllManConfig = 38,
    FllEnable = 39,
    PllManConfig = 40,
    PllEnable = 41,
    SlowSetDivider = 42,
}
