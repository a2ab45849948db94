// Licensed under the Apache-2.0 license

//! A recording fake of every collaborator the secure core drives.

use crate::Hardware;
use core::cell::{Cell, RefCell};
use kernel::ErrorCode;
use pra_comm::hil::{
    Gpio, IpcInterrupt, IpcStruct, RegisterAccess, SharedMemory, SysClk, SysLib, SysPm,
};
use pra_common::{
    AltHfSysClkDiv, AltHfVoltageReg, BuckVoltage, ClkBakSource, ClkHfDivider, ClkLfSource,
    ClkPath, ClkPathSource, ClkPumpDivider, ClkTimerSource, FllConfig, LdoMode, LdoVoltage,
    PllConfig, SysTickSource,
};
use std::collections::BTreeMap;

pub const SHM_BASE: u32 = 0x0804_7000;
const SHM_SIZE: usize = 0x1000;

pub struct MockPlatform {
    calls: RefCell<Vec<String>>,
    failing: RefCell<Vec<&'static str>>,
    failing_calls: RefCell<Vec<String>>,
    pub regs: RefCell<BTreeMap<u32, u32>>,
    shm: RefCell<Vec<u8>>,
    hf_src: RefCell<[ClkPath; 6]>,
    path_src: RefCell<[ClkPathSource; 6]>,
    pub pilo_running: Cell<bool>,
    pub reset_reason: Cell<u32>,
    pub ddft: MockDdft,
    pub irq_enabled: Cell<bool>,
    pub intr_mask: Cell<(u32, u32)>,
    pub intr_cleared: Cell<(u32, u32)>,
    pub pra_data: Cell<u32>,
    pub pra_locked: Cell<bool>,
}

impl MockPlatform {
    pub fn new() -> Self {
        let _ = simple_logger::SimpleLogger::new()
            .with_level(log::LevelFilter::Debug)
            .init();
        MockPlatform {
            calls: RefCell::new(Vec::new()),
            failing: RefCell::new(Vec::new()),
            failing_calls: RefCell::new(Vec::new()),
            regs: RefCell::new(BTreeMap::new()),
            shm: RefCell::new(vec![0; SHM_SIZE]),
            hf_src: RefCell::new([ClkPath::Path0; 6]),
            path_src: RefCell::new([ClkPathSource::Imo; 6]),
            pilo_running: Cell::new(false),
            reset_reason: Cell::new(1),
            ddft: MockDdft::default(),
            irq_enabled: Cell::new(false),
            intr_mask: Cell::new((0, 0)),
            intr_cleared: Cell::new((0, 0)),
            pra_data: Cell::new(0),
            pra_locked: Cell::new(false),
        }
    }

    pub fn hardware(&self) -> Hardware<'_> {
        Hardware {
            regs: self,
            shared_mem: self,
            clk: self,
            pm: self,
            sys: self,
            gpio: self,
            ddft: &self.ddft,
        }
    }

    /// Makes every later call to the named primitive fail.
    pub fn fail_on(&self, name: &'static str) {
        self.failing.borrow_mut().push(name);
    }

    /// Makes only calls recorded exactly as `entry` fail, e.g.
    /// `"hf_set_source(2, Path1)"`.
    pub fn fail_call(&self, entry: &str) {
        self.failing_calls.borrow_mut().push(entry.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn called(&self, entry: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == entry)
    }

    /// Index of the first call equal to `entry`.
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c == entry)
    }

    pub fn touched_hardware(&self) -> bool {
        !self.calls.borrow().is_empty()
    }

    pub fn put(&self, addr: u32, bytes: &[u8]) {
        let start = (addr - SHM_BASE) as usize;
        self.shm.borrow_mut()[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn hf_source(&self, hf: usize) -> ClkPath {
        self.hf_src.borrow()[hf]
    }

    pub fn set_path_source(&self, path: usize, source: ClkPathSource) {
        self.path_src.borrow_mut()[path] = source;
    }

    fn record(&self, name: &'static str, args: String) -> Result<(), ErrorCode> {
        let entry = format!("{}({})", name, args);
        let fails = self.failing.borrow().contains(&name)
            || self.failing_calls.borrow().contains(&entry);
        self.calls.borrow_mut().push(entry);
        if fails {
            Err(ErrorCode::FAIL)
        } else {
            Ok(())
        }
    }
}

/// The DDFT structure the CM4 debug flag lives behind.
#[derive(Default)]
pub struct MockDdft {
    pub data: Cell<u32>,
    /// Number of acquire attempts that report the lock as taken.
    pub busy_attempts: Cell<u32>,
    pub acquires: Cell<u32>,
    pub locked: Cell<bool>,
}

impl IpcStruct for MockDdft {
    fn acquire(&self) -> bool {
        self.acquires.set(self.acquires.get() + 1);
        if self.busy_attempts.get() > 0 {
            self.busy_attempts.set(self.busy_attempts.get() - 1);
            return false;
        }
        self.locked.set(true);
        true
    }

    fn release(&self) {
        self.locked.set(false);
    }

    fn notify(&self, _intr_mask: u32) {}

    fn is_lock_acquired(&self) -> bool {
        self.locked.get()
    }

    fn read_data(&self) -> u32 {
        self.data.get()
    }

    fn write_data(&self, data: u32) {
        self.data.set(data);
    }
}

/// The PRA channel as seen by the responder.
impl IpcStruct for MockPlatform {
    fn acquire(&self) -> bool {
        if self.pra_locked.get() {
            return false;
        }
        self.pra_locked.set(true);
        true
    }

    fn release(&self) {
        let _ = self.record("pra_release", String::new());
        self.pra_locked.set(false);
    }

    fn notify(&self, _intr_mask: u32) {}

    fn is_lock_acquired(&self) -> bool {
        self.pra_locked.get()
    }

    fn read_data(&self) -> u32 {
        self.pra_data.get()
    }

    fn write_data(&self, data: u32) {
        self.pra_data.set(data);
    }
}

impl IpcInterrupt for MockPlatform {
    fn set_interrupt_mask(&self, release_mask: u32, notify_mask: u32) {
        self.intr_mask.set((release_mask, notify_mask));
    }

    fn clear_interrupt(&self, release_mask: u32, notify_mask: u32) {
        let _ = self.record("clear_interrupt", format!("{}, {}", release_mask, notify_mask));
        self.intr_cleared.set((release_mask, notify_mask));
    }

    fn enable_irq(&self) {
        self.irq_enabled.set(true);
    }
}

impl RegisterAccess for MockPlatform {
    fn read32(&self, addr: u32) -> u32 {
        self.regs.borrow().get(&addr).copied().unwrap_or(0)
    }

    fn write32(&self, addr: u32, value: u32) {
        let _ = self.record("write32", format!("{:#x}, {:#x}", addr, value));
        self.regs.borrow_mut().insert(addr, value);
    }
}

impl SharedMemory for MockPlatform {
    fn load(&self, addr: u32, buf: &mut [u8]) -> Result<(), ErrorCode> {
        let start = addr.checked_sub(SHM_BASE).ok_or(ErrorCode::INVAL)? as usize;
        let shm = self.shm.borrow();
        let src = shm.get(start..start + buf.len()).ok_or(ErrorCode::INVAL)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn store(&self, addr: u32, data: &[u8]) -> Result<(), ErrorCode> {
        let start = addr.checked_sub(SHM_BASE).ok_or(ErrorCode::INVAL)? as usize;
        let mut shm = self.shm.borrow_mut();
        let dst = shm
            .get_mut(start..start + data.len())
            .ok_or(ErrorCode::INVAL)?;
        dst.copy_from_slice(data);
        Ok(())
    }
}

impl SysClk for MockPlatform {
    fn hf_set_source(&self, hf: u32, source: ClkPath) -> Result<(), ErrorCode> {
        self.record("hf_set_source", format!("{}, {:?}", hf, source))?;
        self.hf_src.borrow_mut()[hf as usize] = source;
        Ok(())
    }

    fn hf_get_source(&self, hf: u32) -> Option<ClkPath> {
        self.hf_src.borrow().get(hf as usize).copied()
    }

    fn hf_set_divider(&self, hf: u32, divider: ClkHfDivider) -> Result<(), ErrorCode> {
        self.record("hf_set_divider", format!("{}, {:?}", hf, divider))
    }

    fn hf_enable(&self, hf: u32) -> Result<(), ErrorCode> {
        self.record("hf_enable", format!("{}", hf))
    }

    fn path_set_source(&self, path: u32, source: ClkPathSource) -> Result<(), ErrorCode> {
        self.record("path_set_source", format!("{}, {:?}", path, source))?;
        self.path_src.borrow_mut()[path as usize] = source;
        Ok(())
    }

    fn path_get_source(&self, path: u32) -> Option<ClkPathSource> {
        self.path_src.borrow().get(path as usize).copied()
    }

    fn fast_set_divider(&self, divider: u8) {
        let _ = self.record("fast_set_divider", format!("{}", divider));
    }

    fn peri_set_divider(&self, divider: u8) {
        let _ = self.record("peri_set_divider", format!("{}", divider));
    }

    fn slow_set_divider(&self, divider: u8) {
        let _ = self.record("slow_set_divider", format!("{}", divider));
    }

    fn fll_disable(&self) -> Result<(), ErrorCode> {
        self.record("fll_disable", String::new())
    }

    fn fll_manual_configure(&self, config: &FllConfig) -> Result<(), ErrorCode> {
        self.record("fll_manual_configure", format!("{}", config.mult))
    }

    fn fll_enable(&self, timeout_us: u32) -> Result<(), ErrorCode> {
        self.record("fll_enable", format!("{}", timeout_us))
    }

    fn pll_disable(&self, pll: u32) -> Result<(), ErrorCode> {
        self.record("pll_disable", format!("{}", pll))
    }

    fn pll_manual_configure(&self, pll: u32, config: &PllConfig) -> Result<(), ErrorCode> {
        self.record(
            "pll_manual_configure",
            format!("{}, {}", pll, config.feedback_div),
        )
    }

    fn pll_enable(&self, pll: u32, timeout_us: u32) -> Result<(), ErrorCode> {
        self.record("pll_enable", format!("{}, {}", pll, timeout_us))
    }

    fn ilo_enable(&self) {
        let _ = self.record("ilo_enable", String::new());
    }

    fn ilo_disable(&self) -> Result<(), ErrorCode> {
        self.record("ilo_disable", String::new())
    }

    fn ilo_hibernate_on(&self, on: bool) {
        let _ = self.record("ilo_hibernate_on", format!("{}", on));
    }

    fn pilo_enable(&self) {
        let _ = self.record("pilo_enable", String::new());
        self.pilo_running.set(true);
    }

    fn pilo_set_trim(&self, trim: u32) -> Result<(), ErrorCode> {
        self.record("pilo_set_trim", format!("{}", trim))?;
        if self.pilo_running.get() {
            Ok(())
        } else {
            Err(ErrorCode::OFF)
        }
    }

    fn wco_bypass(&self, bypass: bool) {
        let _ = self.record("wco_bypass", format!("{}", bypass));
    }

    fn wco_enable(&self, timeout_us: u32) -> Result<(), ErrorCode> {
        self.record("wco_enable", format!("{}", timeout_us))
    }

    fn lf_set_source(&self, source: ClkLfSource) {
        let _ = self.record("lf_set_source", format!("{:?}", source));
    }

    fn ext_clk_set_frequency(&self, freq_hz: u32) {
        let _ = self.record("ext_clk_set_frequency", format!("{}", freq_hz));
    }

    fn alt_hf_configure(
        &self,
        freq_hz: u32,
        _sys_clk_div: AltHfSysClkDiv,
        _cload_ff: u32,
        _xtal_startup: u32,
        _voltage_reg: AltHfVoltageReg,
    ) -> Result<(), ErrorCode> {
        self.record("alt_hf_configure", format!("{}", freq_hz))
    }

    fn alt_hf_reset(&self) {
        let _ = self.record("alt_hf_reset", String::new());
    }

    fn timer_disable(&self) {
        let _ = self.record("timer_disable", String::new());
    }

    fn timer_set_source(&self, source: ClkTimerSource) {
        let _ = self.record("timer_set_source", format!("{:?}", source));
    }

    fn timer_set_divider(&self, divider: u8) {
        let _ = self.record("timer_set_divider", format!("{}", divider));
    }

    fn timer_enable(&self) {
        let _ = self.record("timer_enable", String::new());
    }

    fn pump_disable(&self) {
        let _ = self.record("pump_disable", String::new());
    }

    fn pump_set_source(&self, source: ClkPath) {
        let _ = self.record("pump_set_source", format!("{:?}", source));
    }

    fn pump_set_divider(&self, divider: ClkPumpDivider) {
        let _ = self.record("pump_set_divider", format!("{:?}", divider));
    }

    fn pump_enable(&self) {
        let _ = self.record("pump_enable", String::new());
    }

    fn bak_set_source(&self, source: ClkBakSource) {
        let _ = self.record("bak_set_source", format!("{:?}", source));
    }

    fn systick_set_source(&self, source: SysTickSource) {
        let _ = self.record("systick_set_source", format!("{:?}", source));
    }

    fn system_core_clock_update(&self) {
        let _ = self.record("system_core_clock_update", String::new());
    }
}

impl SysPm for MockPlatform {
    fn ldo_set_voltage(&self, voltage: LdoVoltage) -> Result<(), ErrorCode> {
        self.record("ldo_set_voltage", format!("{:?}", voltage))
    }

    fn ldo_set_mode(&self, mode: LdoMode) -> Result<(), ErrorCode> {
        self.record("ldo_set_mode", format!("{:?}", mode))
    }

    fn buck_enable(&self, voltage: BuckVoltage) -> Result<(), ErrorCode> {
        self.record("buck_enable", format!("{:?}", voltage))
    }

    fn pmic_unlock(&self) {
        let _ = self.record("pmic_unlock", String::new());
    }

    fn pmic_enable_output(&self) {
        let _ = self.record("pmic_enable_output", String::new());
    }

    fn pmic_disable_output(&self) {
        let _ = self.record("pmic_disable_output", String::new());
    }
}

impl SysLib for MockPlatform {
    fn set_wait_states(&self, ulp: bool, clk_hf_mhz: u32) {
        let _ = self.record("set_wait_states", format!("{}, {}", ulp, clk_hf_mhz));
    }

    fn reset_reason(&self) -> u32 {
        self.reset_reason.get()
    }

    fn reset_backup_domain(&self) -> Result<(), ErrorCode> {
        self.record("reset_backup_domain", String::new())
    }

    fn delay_us(&self, microseconds: u32) {
        let _ = self.record("delay_us", format!("{}", microseconds));
    }
}

impl Gpio for MockPlatform {
    fn pin_fast_init(&self, port: u32, pin: u32, drive_mode: u32, out_val: u32, hsiom: u32) {
        let _ = self.record(
            "pin_fast_init",
            format!("{}, {}, {}, {}, {}", port, pin, drive_mode, out_val, hsiom),
        );
    }
}
