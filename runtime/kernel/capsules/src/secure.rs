// Licensed under the Apache-2.0 license

//! Privileged operations the requester may trigger but never perform itself.

use crate::Hardware;
use log::debug;
use pra_common::{PraError, PraResult, SecureOnlyFunc};
use pra_romtime::srss;

/// PWR_HIBERNATE bits that select and arm the wakeup sources.
const HIBERNATE_WAKEUP_MASK: u32 = srss::PWR_HIBERNATE_MASK_HIBALARM_MSK
    | srss::PWR_HIBERNATE_MASK_HIBWDT_MSK
    | srss::PWR_HIBERNATE_POLARITY_HIBPIN_MSK
    | srss::PWR_HIBERNATE_MASK_HIBPIN_MSK;

/// Bits preserved across an IO unfreeze.
const HIBERNATE_RETAIN_MASK: u32 = srss::PWR_HIBERNATE_TOKEN_MSK | HIBERNATE_WAKEUP_MASK;

const HIBERNATE_UNLOCK_VAL: u32 = 0x3a << srss::PWR_HIBERNATE_UNLOCK_POS;

const SET_HIBERNATE: u32 =
    HIBERNATE_UNLOCK_VAL | srss::PWR_HIBERNATE_FREEZE_MSK | srss::PWR_HIBERNATE_HIBERNATE_MSK;

/// Token left in PWR_HIBERNATE so the next boot can tell it woke from hibernate.
pub const HIBERNATE_TOKEN: u32 = 0x1b;

/// Hardware needs the hibernate request repeated before it takes effect.
const SET_HIBERNATE_REPEAT: usize = 3;

/// DDFT data word bit telling the debug logic the CM4 may deep-sleep.
pub const CM4_DP_FLAG: u32 = 1 << 28;

pub struct SecureOps<'a> {
    hw: Hardware<'a>,
    pwr_hibernate: u32,
}

impl<'a> SecureOps<'a> {
    /// `pwr_hibernate` is the absolute address of SRSS PWR_HIBERNATE.
    pub fn new(hw: Hardware<'a>, pwr_hibernate: u32) -> Self {
        SecureOps { hw, pwr_hibernate }
    }

    /// Runs the secure-only function `index`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` once any known function has run; none of them can fail.
    /// * `Err(PraError::ACCESS_DENIED)` if `index` names no secure-only function.
    pub fn run(&self, index: u16, arg: u32) -> PraResult<()> {
        let func = SecureOnlyFunc::try_from(index).map_err(|_| PraError::ACCESS_DENIED)?;
        debug!("PRA: secure-only {:?}({:#x})", func, arg);
        match func {
            SecureOnlyFunc::PmHibernate => self.hibernate(arg),
            SecureOnlyFunc::PmCm4DpFlagSet => self.set_cm4_dp_flag(),
            SecureOnlyFunc::FlashRamDelay => self.hw.sys.delay_us(arg),
        }
        Ok(())
    }

    /// With `func_proc == 0` arms hibernate; otherwise unfreezes the IOs after wakeup.
    fn hibernate(&self, func_proc: u32) {
        let regs = self.hw.regs;
        let addr = self.pwr_hibernate;
        if func_proc == 0 {
            regs.write32(
                addr,
                (regs.read32(addr) & HIBERNATE_WAKEUP_MASK) | HIBERNATE_TOKEN,
            );
            for _ in 0..SET_HIBERNATE_REPEAT {
                regs.write32(addr, regs.read32(addr) | SET_HIBERNATE);
            }
        } else {
            regs.write32(
                addr,
                (regs.read32(addr) & HIBERNATE_RETAIN_MASK) | HIBERNATE_UNLOCK_VAL,
            );
            regs.write32(addr, regs.read32(addr) & HIBERNATE_RETAIN_MASK);
        }
    }

    fn set_cm4_dp_flag(&self) {
        let ddft = self.hw.ddft;
        while !ddft.acquire() {
            core::hint::spin_loop();
        }
        ddft.write_data(ddft.read_data() | CM4_DP_FLAG);
        ddft.release();
    }
}
