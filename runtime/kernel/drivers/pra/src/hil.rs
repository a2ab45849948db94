// Licensed under the Apache-2.0 license

//! HIL interfaces for protected register access.
//!
//! The secure core owns the system resources (SRSS clock/power registers,
//! flash controller, CPU subsystem power control). The non-secure core
//! reaches them only through a single IPC channel. Everything the PRA
//! protocol needs from the platform is expressed here so the protocol and
//! the clock-tree engine can run against real hardware or the emulator.

use core::result::Result;
use kernel::ErrorCode;
use pra_common::{
    AltHfSysClkDiv, AltHfVoltageReg, BuckVoltage, ClkBakSource, ClkHfDivider, ClkLfSource,
    ClkPath, ClkPathSource, ClkPumpDivider, ClkTimerSource, FllConfig, LdoMode, LdoVoltage,
    PllConfig, SysTickSource,
};

/// GPIO drive mode: high impedance, input buffer on.
pub const GPIO_DM_HIGHZ: u32 = 0x08;
/// GPIO drive mode: analog (input buffer off).
pub const GPIO_DM_ANALOG: u32 = 0x00;
/// HSIOM selection for plain GPIO.
pub const HSIOM_SEL_GPIO: u32 = 0;

/// One IPC structure: a hardware lock, a data word and a notify trigger.
pub trait IpcStruct {
    /// Attempts to take the lock.
    ///
    /// # Returns
    ///
    /// * `true` if this caller now owns the lock.
    /// * `false` if another core holds it.
    fn acquire(&self) -> bool;

    /// Releases the lock without raising release events.
    fn release(&self);

    /// Raises the notify event on the interrupt structures selected by `intr_mask`.
    fn notify(&self, intr_mask: u32);

    /// Returns true while the lock is held by either core.
    fn is_lock_acquired(&self) -> bool;

    fn read_data(&self) -> u32;

    fn write_data(&self, data: u32);

    /// Acquires the structure, publishes `data` and notifies the peer.
    ///
    /// # Arguments
    ///
    /// * `notify_mask` - Interrupt structures to notify.
    /// * `data` - Word placed in the data register before notifying.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the message was published.
    /// * `Err(ErrorCode::BUSY)` if the lock is held; nothing was written.
    fn send_msg_word(&self, notify_mask: u32, data: u32) -> Result<(), ErrorCode> {
        if !self.acquire() {
            return Err(ErrorCode::BUSY);
        }
        self.write_data(data);
        self.notify(notify_mask);
        Ok(())
    }
}

/// An IPC interrupt structure, as seen by the core that services it.
pub trait IpcInterrupt {
    /// Selects which release and notify events raise the interrupt.
    fn set_interrupt_mask(&self, release_mask: u32, notify_mask: u32);

    /// Acknowledges the given events so the next edge can be detected.
    fn clear_interrupt(&self, release_mask: u32, notify_mask: u32);

    /// Enables delivery of the interrupt to the servicing core.
    fn enable_irq(&self);
}

/// Raw volatile access to 32-bit memory-mapped registers.
pub trait RegisterAccess {
    fn read32(&self, addr: u32) -> u32;
    fn write32(&self, addr: u32, value: u32);
}

/// Memory visible to both cores.
pub trait SharedMemory {
    /// Copies `buf.len()` bytes starting at `addr` into `buf`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` on success.
    /// * `Err(ErrorCode::INVAL)` if the range is not shared memory.
    fn load(&self, addr: u32, buf: &mut [u8]) -> Result<(), ErrorCode>;

    /// Copies `data` to shared memory starting at `addr`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` on success.
    /// * `Err(ErrorCode::INVAL)` if the range is not shared memory.
    fn store(&self, addr: u32, data: &[u8]) -> Result<(), ErrorCode>;
}

/// System clock primitives. Fallible operations report failure with an
/// `ErrorCode`; the clock-tree configurator maps it onto a per-domain status.
pub trait SysClk {
    fn hf_set_source(&self, hf: u32, source: ClkPath) -> Result<(), ErrorCode>;
    fn hf_get_source(&self, hf: u32) -> Option<ClkPath>;
    fn hf_set_divider(&self, hf: u32, divider: ClkHfDivider) -> Result<(), ErrorCode>;
    fn hf_enable(&self, hf: u32) -> Result<(), ErrorCode>;

    fn path_set_source(&self, path: u32, source: ClkPathSource) -> Result<(), ErrorCode>;
    fn path_get_source(&self, path: u32) -> Option<ClkPathSource>;

    /// Dividers take the ratio minus one.
    fn fast_set_divider(&self, divider: u8);
    fn peri_set_divider(&self, divider: u8);
    fn slow_set_divider(&self, divider: u8);

    fn fll_disable(&self) -> Result<(), ErrorCode>;
    fn fll_manual_configure(&self, config: &FllConfig) -> Result<(), ErrorCode>;

    /// Enables the FLL and waits up to `timeout_us` for lock.
    ///
    /// # Returns
    ///
    /// * `Ok(())` once locked.
    /// * `Err(ErrorCode::FAIL)` if lock was not reached in time.
    fn fll_enable(&self, timeout_us: u32) -> Result<(), ErrorCode>;

    /// `pll` uses hardware numbering; 1 is the first PLL.
    fn pll_disable(&self, pll: u32) -> Result<(), ErrorCode>;
    fn pll_manual_configure(&self, pll: u32, config: &PllConfig) -> Result<(), ErrorCode>;
    fn pll_enable(&self, pll: u32, timeout_us: u32) -> Result<(), ErrorCode>;

    fn ilo_enable(&self);
    fn ilo_disable(&self) -> Result<(), ErrorCode>;
    fn ilo_hibernate_on(&self, on: bool);

    fn pilo_enable(&self);
    /// Writes the PILO trim word.
    ///
    /// # Returns
    ///
    /// * `Err(ErrorCode::OFF)` if the PILO is not running.
    fn pilo_set_trim(&self, trim: u32) -> Result<(), ErrorCode>;

    fn wco_bypass(&self, bypass: bool);
    /// Enables the WCO and waits up to `timeout_us` for it to become ready.
    fn wco_enable(&self, timeout_us: u32) -> Result<(), ErrorCode>;

    fn lf_set_source(&self, source: ClkLfSource);
    fn ext_clk_set_frequency(&self, freq_hz: u32);

    /// Starts the BLE ECO.
    ///
    /// # Arguments
    ///
    /// * `freq_hz` - Crystal frequency.
    /// * `sys_clk_div` - Divider for the ALTHF output.
    /// * `cload_ff` - Load capacitance in femtofarads.
    /// * `xtal_startup` - Start-up time in units of 31.25 us.
    /// * `voltage_reg` - Regulator feeding the oscillator.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if started or already running.
    /// * `Err(ErrorCode)` if the oscillator could not be started with these parameters.
    fn alt_hf_configure(
        &self,
        freq_hz: u32,
        sys_clk_div: AltHfSysClkDiv,
        cload_ff: u32,
        xtal_startup: u32,
        voltage_reg: AltHfVoltageReg,
    ) -> Result<(), ErrorCode>;
    fn alt_hf_reset(&self);

    fn timer_disable(&self);
    fn timer_set_source(&self, source: ClkTimerSource);
    fn timer_set_divider(&self, divider: u8);
    fn timer_enable(&self);

    fn pump_disable(&self);
    fn pump_set_source(&self, source: ClkPath);
    fn pump_set_divider(&self, divider: ClkPumpDivider);
    fn pump_enable(&self);

    fn bak_set_source(&self, source: ClkBakSource);
    fn systick_set_source(&self, source: SysTickSource);

    /// Refreshes the cached core clock used by delay and timeout primitives.
    fn system_core_clock_update(&self);
}

/// Regulator primitives.
pub trait SysPm {
    fn ldo_set_voltage(&self, voltage: LdoVoltage) -> Result<(), ErrorCode>;
    fn ldo_set_mode(&self, mode: LdoMode) -> Result<(), ErrorCode>;
    fn buck_enable(&self, voltage: BuckVoltage) -> Result<(), ErrorCode>;
    fn pmic_unlock(&self);
    fn pmic_enable_output(&self);
    fn pmic_disable_output(&self);
}

/// Miscellaneous system services.
pub trait SysLib {
    /// Programs flash/SRAM wait states for the given power mode and core clock.
    fn set_wait_states(&self, ulp: bool, clk_hf_mhz: u32);
    /// Returns 0 after POR, XRES or brown-out.
    fn reset_reason(&self) -> u32;
    fn reset_backup_domain(&self) -> Result<(), ErrorCode>;
    fn delay_us(&self, microseconds: u32);
}

pub trait Gpio {
    /// Configures one pin's drive mode, output value and HSIOM routing.
    fn pin_fast_init(&self, port: u32, pin: u32, drive_mode: u32, out_val: u32, hsiom: u32);
}

/// Stops the calling core after an unrecoverable access violation.
pub trait Halt {
    fn halt(&self, status: u32) -> !;
}
