// Licensed under the Apache-2.0 license

//! Fixed-layout argument blocks for the multi-field policy functions. The
//! requester stores one in shared memory and passes its address in `data1`.
//! Fields are raw words; the secure side converts them to the closed
//! enumerations and rejects out-of-range values.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

#[repr(C)]
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct EcoConfigurePayload {
    pub freq: u32,
    pub csum: u32,
    pub esr: u32,
    pub drive_level: u32,
}

#[repr(C)]
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct FllManualConfigPayload {
    pub fll_mult: u32,
    pub ref_div: u32,
    pub cco_range: u32,
    pub enable_output_div: u32,
    pub lock_tolerance: u32,
    pub igain: u32,
    pub pgain: u32,
    pub settling_count: u32,
    pub output_mode: u32,
    pub cco_freq: u32,
}

#[repr(C)]
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct PllManualConfigPayload {
    /// 0 selects PLL0 (path 1); any other value selects PLL1 (path 2).
    pub clk_path: u32,
    pub feedback_div: u32,
    pub reference_div: u32,
    pub output_div: u32,
    pub lf_mode: u32,
    pub output_mode: u32,
}
