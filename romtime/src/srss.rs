// Licensed under the Apache-2.0 license

//! System Resources Sub-System (SRSS) registers touched by PRA.

use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

pub const PWR_CTL_OFFSET: u32 = 0x000;
pub const PWR_HIBERNATE_OFFSET: u32 = 0x008;
pub const PWR_LVD_CTL_OFFSET: u32 = 0x010;
pub const SRSS_INTR_OFFSET: u32 = 0x200;
pub const SRSS_INTR_SET_OFFSET: u32 = 0x204;
pub const SRSS_INTR_MASK_OFFSET: u32 = 0x208;
pub const SRSS_INTR_CFG_OFFSET: u32 = 0x210;
pub const CLK_DSI_SELECT_OFFSET: u32 = 0x220;
pub const CLK_PATH_SELECT_OFFSET: u32 = 0x340;
pub const CLK_ROOT_SELECT_OFFSET: u32 = 0x380;

pub const fn clk_root_select_offset(root: u32) -> u32 {
    CLK_ROOT_SELECT_OFFSET + 4 * root
}

pub const fn clk_path_select_offset(path: u32) -> u32 {
    CLK_PATH_SELECT_OFFSET + 4 * path
}

pub const fn clk_dsi_select_offset(path: u32) -> u32 {
    CLK_DSI_SELECT_OFFSET + 4 * path
}

register_structs! {
    pub SrssRegisters {
        (0x000 => pub pwr_ctl: ReadWrite<u32>),
        (0x004 => _reserved0),
        (0x008 => pub pwr_hibernate: ReadWrite<u32, PWR_HIBERNATE::Register>),
        (0x00c => _reserved1),
        (0x010 => pub pwr_lvd_ctl: ReadWrite<u32>),
        (0x014 => _reserved2),
        (0x200 => pub srss_intr: ReadWrite<u32>),
        (0x204 => pub srss_intr_set: ReadWrite<u32>),
        (0x208 => pub srss_intr_mask: ReadWrite<u32>),
        (0x20c => _reserved3),
        (0x210 => pub srss_intr_cfg: ReadWrite<u32>),
        (0x214 => _reserved4),
        (0x220 => pub clk_dsi_select: [ReadWrite<u32, CLK_DSI_SELECT::Register>; 16]),
        (0x260 => _reserved5),
        (0x340 => pub clk_path_select: [ReadWrite<u32, CLK_PATH_SELECT::Register>; 16]),
        (0x380 => pub clk_root_select: [ReadWrite<u32, CLK_ROOT_SELECT::Register>; 16]),
        (0x3c0 => @END),
    }
}

register_bitfields![u32,
    pub PWR_HIBERNATE [
        TOKEN OFFSET(0) NUMBITS(8) [],
        UNLOCK OFFSET(8) NUMBITS(8) [],
        FREEZE OFFSET(17) NUMBITS(1) [],
        MASK_HIBALARM OFFSET(18) NUMBITS(1) [],
        MASK_HIBWDT OFFSET(19) NUMBITS(1) [],
        POLARITY_HIBPIN OFFSET(20) NUMBITS(4) [],
        MASK_HIBPIN OFFSET(24) NUMBITS(4) [],
        HIBERNATE OFFSET(31) NUMBITS(1) []
    ],
    pub CLK_DSI_SELECT [
        DSI_MUX OFFSET(0) NUMBITS(5) [
            Ilo = 16,
            Wco = 17,
            AltLf = 18,
            Pilo = 19
        ]
    ],
    pub CLK_PATH_SELECT [
        PATH_MUX OFFSET(0) NUMBITS(3) [
            Imo = 0,
            ExtClk = 1,
            Eco = 2,
            AltHf = 3,
            DsiMux = 4
        ]
    ],
    pub CLK_ROOT_SELECT [
        ROOT_MUX OFFSET(0) NUMBITS(4) [],
        ROOT_DIV OFFSET(4) NUMBITS(2) [
            NoDivide = 0,
            DivideBy2 = 1,
            DivideBy4 = 2,
            DivideBy8 = 3
        ],
        ENABLE OFFSET(31) NUMBITS(1) []
    ],
];

// PWR_HIBERNATE masks used by the policy table and the hibernate sequence.
pub const PWR_HIBERNATE_TOKEN_MSK: u32 = 0x0000_00ff;
pub const PWR_HIBERNATE_UNLOCK_POS: u32 = 8;
pub const PWR_HIBERNATE_FREEZE_MSK: u32 = 1 << 17;
pub const PWR_HIBERNATE_MASK_HIBALARM_MSK: u32 = 1 << 18;
pub const PWR_HIBERNATE_MASK_HIBWDT_MSK: u32 = 1 << 19;
pub const PWR_HIBERNATE_POLARITY_HIBPIN_MSK: u32 = 0x00f0_0000;
pub const PWR_HIBERNATE_MASK_HIBPIN_MSK: u32 = 0x0f00_0000;
pub const PWR_HIBERNATE_HIBERNATE_MSK: u32 = 1 << 31;
