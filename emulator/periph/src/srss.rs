// Licensed under the Apache-2.0 license

//! System resources emulation.
//!
//! A sparse 32-bit register file backs the SRSS, CPUSS and flash controller
//! windows. The clock primitives that have a register home (CLK_ROOT_SELECT,
//! CLK_PATH_SELECT and CLK_DSI_SELECT) are encoded into it so register reads
//! through the policy table observe what the clock engine programmed. Other
//! oscillator, divider and regulator state is kept in [`SystemState`].
//!
//! Any primitive can be made to fail by name with [`EmuSrss::inject_fault`].

use kernel::ErrorCode;
use log::{debug, trace};
use pra_comm::hil::{Gpio, RegisterAccess, SysClk, SysLib, SysPm};
use pra_common::{
    AltHfSysClkDiv, AltHfVoltageReg, BuckVoltage, ClkBakSource, ClkHfDivider, ClkLfSource,
    ClkPath, ClkPathSource, ClkPumpDivider, ClkTimerSource, FllConfig, LdoMode, LdoVoltage,
    PllConfig, SysTickSource,
};
use pra_config::DeviceConfig;
use pra_romtime::srss::{
    clk_dsi_select_offset, clk_path_select_offset, clk_root_select_offset, CLK_DSI_SELECT,
    CLK_PATH_SELECT, CLK_ROOT_SELECT,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::registers::InMemoryRegister;
use tock_registers::RegisterLongName;

/// Clock paths and CLK_HF roots with a select register.
const NUM_SELECT_REGS: u32 = 16;

/// Offset of DSI sources inside [`ClkPathSource`] raw values.
const DSI_SOURCE_FLAG: u32 = 0x100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinConfig {
    pub drive_mode: u32,
    pub out_val: u32,
    pub hsiom: u32,
}

/// Everything the primitives changed that has no register in the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemState {
    pub ldo_voltage: Option<LdoVoltage>,
    pub ldo_mode: Option<LdoMode>,
    pub buck_voltage: Option<BuckVoltage>,
    pub pmic_unlocked: bool,
    pub pmic_output: Option<bool>,

    pub ilo: bool,
    pub ilo_hibernate: bool,
    pub pilo: bool,
    pub pilo_trim: Option<u32>,
    pub wco: bool,
    pub wco_bypass: bool,
    pub alt_hf: bool,
    pub alt_hf_freq_hz: u32,
    pub ext_clk_freq_hz: u32,

    pub fll: Option<FllConfig>,
    pub fll_locked: bool,
    pub plls: BTreeMap<u32, PllConfig>,
    pub plls_locked: BTreeSet<u32>,

    pub fast_div: u8,
    pub peri_div: u8,
    pub slow_div: u8,
    pub lf_source: Option<ClkLfSource>,
    pub timer_source: Option<ClkTimerSource>,
    pub timer_divider: u8,
    pub timer_enabled: bool,
    pub pump_source: Option<ClkPath>,
    pub pump_divider: Option<ClkPumpDivider>,
    pub pump_enabled: bool,
    pub bak_source: Option<ClkBakSource>,
    pub systick_source: Option<SysTickSource>,

    /// Last `(ulp, clk_hf_mhz)` programmed.
    pub wait_states: Option<(bool, u32)>,
    pub core_clock_updates: u32,
    pub backup_domain_resets: u32,
    pub reset_reason: u32,
    /// Sum of all requested busy-wait delays.
    pub delayed_us: u64,
    pub pins: BTreeMap<(u32, u32), PinConfig>,
}

#[derive(Default)]
struct Inner {
    regs: BTreeMap<u32, u32>,
    state: SystemState,
    faults: BTreeSet<String>,
}

impl Inner {
    fn update<R: RegisterLongName>(
        &mut self,
        addr: u32,
        f: impl FnOnce(&InMemoryRegister<u32, R>),
    ) {
        let reg = InMemoryRegister::<u32, R>::new(self.regs.get(&addr).copied().unwrap_or(0));
        f(&reg);
        self.regs.insert(addr, reg.get());
    }

    fn view<R: RegisterLongName>(&self, addr: u32) -> InMemoryRegister<u32, R> {
        InMemoryRegister::new(self.regs.get(&addr).copied().unwrap_or(0))
    }
}

/// Register file and clock/power primitives of one emulated part.
#[derive(Clone)]
pub struct EmuSrss {
    inner: Arc<Mutex<Inner>>,
    srss_base: u32,
    device: DeviceConfig,
}

impl EmuSrss {
    pub fn new(srss_base: u32, device: DeviceConfig) -> Self {
        EmuSrss {
            inner: Arc::new(Mutex::new(Inner::default())),
            srss_base,
            device,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the state for primitive `name`, failing it if a fault was injected.
    fn primitive(&self, name: &str) -> Result<MutexGuard<'_, Inner>, ErrorCode> {
        let inner = self.lock();
        if inner.faults.contains(name) {
            debug!("SRSS: injected fault in {}", name);
            return Err(ErrorCode::FAIL);
        }
        trace!("SRSS: {}", name);
        Ok(inner)
    }

    /// Makes every later call of primitive `name` fail with `ErrorCode::FAIL`.
    pub fn inject_fault(&self, name: &str) {
        self.lock().faults.insert(name.to_string());
    }

    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    pub fn state(&self) -> SystemState {
        self.lock().state.clone()
    }

    pub fn set_reset_reason(&self, reason: u32) {
        self.lock().state.reset_reason = reason;
    }

    pub fn register(&self, addr: u32) -> u32 {
        self.lock().regs.get(&addr).copied().unwrap_or(0)
    }

    pub fn set_register(&self, addr: u32, value: u32) {
        self.lock().regs.insert(addr, value);
    }

    pub fn hf_enabled(&self, hf: u32) -> bool {
        self.lock()
            .view::<CLK_ROOT_SELECT::Register>(self.root_select(hf))
            .is_set(CLK_ROOT_SELECT::ENABLE)
    }

    fn root_select(&self, hf: u32) -> u32 {
        self.srss_base + clk_root_select_offset(hf)
    }

    fn path_select(&self, path: u32) -> u32 {
        self.srss_base + clk_path_select_offset(path)
    }

    fn dsi_select(&self, path: u32) -> u32 {
        self.srss_base + clk_dsi_select_offset(path)
    }

    fn check_hf(&self, hf: u32) -> Result<(), ErrorCode> {
        if self.device.has_hf_root(hf) {
            Ok(())
        } else {
            Err(ErrorCode::INVAL)
        }
    }

    fn check_pll(&self, pll: u32) -> Result<(), ErrorCode> {
        if self.device.has_pll(pll) {
            Ok(())
        } else {
            Err(ErrorCode::INVAL)
        }
    }
}

impl RegisterAccess for EmuSrss {
    fn read32(&self, addr: u32) -> u32 {
        self.register(addr)
    }

    fn write32(&self, addr: u32, value: u32) {
        trace!("SRSS: write {:#x} <- {:#x}", addr, value);
        self.set_register(addr, value);
    }
}

impl SysClk for EmuSrss {
    fn hf_set_source(&self, hf: u32, source: ClkPath) -> Result<(), ErrorCode> {
        self.check_hf(hf)?;
        let addr = self.root_select(hf);
        self.primitive("hf_set_source")?
            .update::<CLK_ROOT_SELECT::Register>(addr, |reg| {
                reg.modify(CLK_ROOT_SELECT::ROOT_MUX.val(source.into()))
            });
        Ok(())
    }

    fn hf_get_source(&self, hf: u32) -> Option<ClkPath> {
        if hf >= NUM_SELECT_REGS {
            return None;
        }
        let mux = self
            .lock()
            .view::<CLK_ROOT_SELECT::Register>(self.root_select(hf))
            .read(CLK_ROOT_SELECT::ROOT_MUX);
        ClkPath::try_from(mux).ok()
    }

    fn hf_set_divider(&self, hf: u32, divider: ClkHfDivider) -> Result<(), ErrorCode> {
        self.check_hf(hf)?;
        let addr = self.root_select(hf);
        self.primitive("hf_set_divider")?
            .update::<CLK_ROOT_SELECT::Register>(addr, |reg| {
                reg.modify(CLK_ROOT_SELECT::ROOT_DIV.val(divider.into()))
            });
        Ok(())
    }

    fn hf_enable(&self, hf: u32) -> Result<(), ErrorCode> {
        self.check_hf(hf)?;
        let addr = self.root_select(hf);
        self.primitive("hf_enable")?
            .update::<CLK_ROOT_SELECT::Register>(addr, |reg| {
                reg.modify(CLK_ROOT_SELECT::ENABLE::SET)
            });
        Ok(())
    }

    fn path_set_source(&self, path: u32, source: ClkPathSource) -> Result<(), ErrorCode> {
        if path >= NUM_SELECT_REGS {
            return Err(ErrorCode::INVAL);
        }
        let raw = u32::from(source);
        let (path_addr, dsi_addr) = (self.path_select(path), self.dsi_select(path));
        let mut inner = self.primitive("path_set_source")?;
        if raw & DSI_SOURCE_FLAG != 0 {
            inner.update::<CLK_DSI_SELECT::Register>(dsi_addr, |reg| {
                reg.modify(CLK_DSI_SELECT::DSI_MUX.val(raw & !DSI_SOURCE_FLAG))
            });
            inner.update::<CLK_PATH_SELECT::Register>(path_addr, |reg| {
                reg.modify(CLK_PATH_SELECT::PATH_MUX::DsiMux)
            });
        } else {
            inner.update::<CLK_PATH_SELECT::Register>(path_addr, |reg| {
                reg.modify(CLK_PATH_SELECT::PATH_MUX.val(raw))
            });
        }
        Ok(())
    }

    fn path_get_source(&self, path: u32) -> Option<ClkPathSource> {
        if path >= NUM_SELECT_REGS {
            return None;
        }
        let inner = self.lock();
        let path_sel = inner.view::<CLK_PATH_SELECT::Register>(self.path_select(path));
        let raw = if path_sel.matches_all(CLK_PATH_SELECT::PATH_MUX::DsiMux) {
            let dsi = inner
                .view::<CLK_DSI_SELECT::Register>(self.dsi_select(path))
                .read(CLK_DSI_SELECT::DSI_MUX);
            DSI_SOURCE_FLAG | dsi
        } else {
            path_sel.read(CLK_PATH_SELECT::PATH_MUX)
        };
        ClkPathSource::try_from(raw).ok()
    }

    fn fast_set_divider(&self, divider: u8) {
        self.lock().state.fast_div = divider;
    }

    fn peri_set_divider(&self, divider: u8) {
        self.lock().state.peri_div = divider;
    }

    fn slow_set_divider(&self, divider: u8) {
        self.lock().state.slow_div = divider;
    }

    fn fll_disable(&self) -> Result<(), ErrorCode> {
        self.primitive("fll_disable")?.state.fll_locked = false;
        Ok(())
    }

    fn fll_manual_configure(&self, config: &FllConfig) -> Result<(), ErrorCode> {
        let mut inner = self.primitive("fll_manual_configure")?;
        if inner.state.fll_locked {
            return Err(ErrorCode::BUSY);
        }
        inner.state.fll = Some(*config);
        Ok(())
    }

    fn fll_enable(&self, _timeout_us: u32) -> Result<(), ErrorCode> {
        let mut inner = self.primitive("fll_enable")?;
        if inner.state.fll.is_none() {
            return Err(ErrorCode::FAIL);
        }
        inner.state.fll_locked = true;
        Ok(())
    }

    fn pll_disable(&self, pll: u32) -> Result<(), ErrorCode> {
        self.check_pll(pll)?;
        self.primitive("pll_disable")?.state.plls_locked.remove(&pll);
        Ok(())
    }

    fn pll_manual_configure(&self, pll: u32, config: &PllConfig) -> Result<(), ErrorCode> {
        self.check_pll(pll)?;
        let mut inner = self.primitive("pll_manual_configure")?;
        if inner.state.plls_locked.contains(&pll) {
            return Err(ErrorCode::BUSY);
        }
        inner.state.plls.insert(pll, *config);
        Ok(())
    }

    fn pll_enable(&self, pll: u32, _timeout_us: u32) -> Result<(), ErrorCode> {
        self.check_pll(pll)?;
        let mut inner = self.primitive("pll_enable")?;
        if !inner.state.plls.contains_key(&pll) {
            return Err(ErrorCode::FAIL);
        }
        inner.state.plls_locked.insert(pll);
        Ok(())
    }

    fn ilo_enable(&self) {
        self.lock().state.ilo = true;
    }

    fn ilo_disable(&self) -> Result<(), ErrorCode> {
        self.primitive("ilo_disable")?.state.ilo = false;
        Ok(())
    }

    fn ilo_hibernate_on(&self, on: bool) {
        self.lock().state.ilo_hibernate = on;
    }

    fn pilo_enable(&self) {
        self.lock().state.pilo = true;
    }

    fn pilo_set_trim(&self, trim: u32) -> Result<(), ErrorCode> {
        let mut inner = self.primitive("pilo_set_trim")?;
        if !inner.state.pilo {
            return Err(ErrorCode::OFF);
        }
        inner.state.pilo_trim = Some(trim);
        Ok(())
    }

    fn wco_bypass(&self, bypass: bool) {
        self.lock().state.wco_bypass = bypass;
    }

    fn wco_enable(&self, _timeout_us: u32) -> Result<(), ErrorCode> {
        self.primitive("wco_enable")?.state.wco = true;
        Ok(())
    }

    fn lf_set_source(&self, source: ClkLfSource) {
        self.lock().state.lf_source = Some(source);
    }

    fn ext_clk_set_frequency(&self, freq_hz: u32) {
        self.lock().state.ext_clk_freq_hz = freq_hz;
    }

    fn alt_hf_configure(
        &self,
        freq_hz: u32,
        _sys_clk_div: AltHfSysClkDiv,
        _cload_ff: u32,
        _xtal_startup: u32,
        _voltage_reg: AltHfVoltageReg,
    ) -> Result<(), ErrorCode> {
        if !self.device.has_alt_hf {
            return Err(ErrorCode::NODEVICE);
        }
        let mut inner = self.primitive("alt_hf_configure")?;
        inner.state.alt_hf = true;
        inner.state.alt_hf_freq_hz = freq_hz;
        Ok(())
    }

    fn alt_hf_reset(&self) {
        self.lock().state.alt_hf = false;
    }

    fn timer_disable(&self) {
        self.lock().state.timer_enabled = false;
    }

    fn timer_set_source(&self, source: ClkTimerSource) {
        self.lock().state.timer_source = Some(source);
    }

    fn timer_set_divider(&self, divider: u8) {
        self.lock().state.timer_divider = divider;
    }

    fn timer_enable(&self) {
        self.lock().state.timer_enabled = true;
    }

    fn pump_disable(&self) {
        self.lock().state.pump_enabled = false;
    }

    fn pump_set_source(&self, source: ClkPath) {
        self.lock().state.pump_source = Some(source);
    }

    fn pump_set_divider(&self, divider: ClkPumpDivider) {
        self.lock().state.pump_divider = Some(divider);
    }

    fn pump_enable(&self) {
        self.lock().state.pump_enabled = true;
    }

    fn bak_set_source(&self, source: ClkBakSource) {
        self.lock().state.bak_source = Some(source);
    }

    fn systick_set_source(&self, source: SysTickSource) {
        self.lock().state.systick_source = Some(source);
    }

    fn system_core_clock_update(&self) {
        self.lock().state.core_clock_updates += 1;
    }
}

impl SysPm for EmuSrss {
    fn ldo_set_voltage(&self, voltage: LdoVoltage) -> Result<(), ErrorCode> {
        self.primitive("ldo_set_voltage")?.state.ldo_voltage = Some(voltage);
        Ok(())
    }

    fn ldo_set_mode(&self, mode: LdoMode) -> Result<(), ErrorCode> {
        self.primitive("ldo_set_mode")?.state.ldo_mode = Some(mode);
        Ok(())
    }

    fn buck_enable(&self, voltage: BuckVoltage) -> Result<(), ErrorCode> {
        self.primitive("buck_enable")?.state.buck_voltage = Some(voltage);
        Ok(())
    }

    fn pmic_unlock(&self) {
        self.lock().state.pmic_unlocked = true;
    }

    fn pmic_enable_output(&self) {
        self.lock().state.pmic_output = Some(true);
    }

    fn pmic_disable_output(&self) {
        self.lock().state.pmic_output = Some(false);
    }
}

impl SysLib for EmuSrss {
    fn set_wait_states(&self, ulp: bool, clk_hf_mhz: u32) {
        self.lock().state.wait_states = Some((ulp, clk_hf_mhz));
    }

    fn reset_reason(&self) -> u32 {
        self.lock().state.reset_reason
    }

    fn reset_backup_domain(&self) -> Result<(), ErrorCode> {
        self.primitive("reset_backup_domain")?
            .state
            .backup_domain_resets += 1;
        Ok(())
    }

    fn delay_us(&self, microseconds: u32) {
        self.lock().state.delayed_us += u64::from(microseconds);
    }
}

impl Gpio for EmuSrss {
    fn pin_fast_init(&self, port: u32, pin: u32, drive_mode: u32, out_val: u32, hsiom: u32) {
        self.lock().state.pins.insert(
            (port, pin),
            PinConfig {
                drive_mode,
                out_val,
                hsiom,
            },
        );
    }
}
