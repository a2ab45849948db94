// Licensed under the Apache-2.0 license

//! Serves one PRA request: checks it against the policy table or the
//! function catalogues and writes exactly one status back.

use crate::configure::ClockTreeConfigurator;
use crate::policy::{RegPolicy, RegPolicyTable};
use crate::secure::SecureOps;
use crate::store::ConfigStore;
use crate::Hardware;
use log::{debug, warn};
use pra_common::{
    status_word, ClkHfDivider, ClkOutputMode, EcoConfigurePayload, FllCcoRange,
    FllManualConfigPayload, PllManualConfigPayload, PolicyFunc, PraCommand, PraError, PraMessage,
    PraResult, SystemConfig, NUM_CLK_PATHS, NUM_HF_CLOCKS,
};
use pra_config::{DeviceConfig, PraMemoryMap};
use pra_romtime::srss;
use zerocopy::{FromBytes, IntoBytes, TryFromBytes};

/// Converts a raw message word into one of the closed configuration enumerations.
fn enum_field<T: TryFrom<u32>>(raw: u32, err: PraError) -> PraResult<T> {
    T::try_from(raw).map_err(|_| err)
}

fn divider_field(raw: u32, err: PraError) -> PraResult<u8> {
    u8::try_from(raw).map_err(|_| err)
}

fn hf_number(raw: u32) -> PraResult<usize> {
    let hf = raw as usize;
    if hf < NUM_HF_CLOCKS {
        Ok(hf)
    } else {
        Err(PraError::ACCESS_DENIED)
    }
}

fn path_number(raw: u32) -> PraResult<usize> {
    let path = raw as usize;
    if path < NUM_CLK_PATHS {
        Ok(path)
    } else {
        Err(PraError::ACCESS_DENIED)
    }
}

/// `0` selects the first PLL slot, anything else the second.
fn pll_slot(raw: u32) -> usize {
    if raw == 0 {
        0
    } else {
        1
    }
}

pub struct Dispatcher<'a> {
    hw: Hardware<'a>,
    table: RegPolicyTable,
    store: ConfigStore,
    clocks: ClockTreeConfigurator<'a>,
    secure: SecureOps<'a>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(hw: Hardware<'a>, map: &PraMemoryMap, device: DeviceConfig) -> Self {
        Dispatcher {
            hw,
            table: RegPolicyTable::new(map, &device),
            store: ConfigStore::new(),
            clocks: ClockTreeConfigurator::new(&hw, device),
            secure: SecureOps::new(hw, map.srss_offset + srss::PWR_HIBERNATE_OFFSET),
        }
    }

    pub fn hardware(&self) -> Hardware<'a> {
        self.hw
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn table(&self) -> &RegPolicyTable {
        &self.table
    }

    /// Executes `msg` and fills in its status (and `data1` for `Reg32Get`).
    pub fn dispatch(&self, msg: &mut PraMessage) {
        debug!(
            "PRA: command {:#x} index {} data {:#x} {:#x}",
            msg.command, msg.index, msg.data1, msg.data2
        );
        let result = match msg.command() {
            Some(PraCommand::Reg32Get) => self.reg32_get(msg),
            Some(PraCommand::Reg32ClrSet) => self.reg32_clr_set(msg.index, msg.data1, msg.data2),
            Some(PraCommand::Reg32Set) => self.reg32_set(msg.index, msg.data1),
            Some(PraCommand::Cm0Wakeup) => Ok(()),
            Some(PraCommand::SysCfgFunc) => self.sys_cfg_func(msg.data1),
            Some(PraCommand::SecureOnly) => self.secure.run(msg.index, msg.data1),
            Some(PraCommand::FuncPolicy) => self.func_policy(msg.index, msg.data1, msg.data2),
            None => Err(PraError::ACCESS_DENIED),
        };
        if result == Err(PraError::ACCESS_DENIED) {
            warn!("PRA: denied command {:#x} index {}", msg.command, msg.index);
        }
        msg.status = status_word(result);
    }

    fn policy(&self, index: u16) -> PraResult<RegPolicy> {
        self.table.lookup(index).ok_or(PraError::ACCESS_DENIED)
    }

    fn reg32_get(&self, msg: &mut PraMessage) -> PraResult<()> {
        let policy = self.policy(msg.index)?;
        msg.data1 = self.hw.regs.read32(policy.addr);
        Ok(())
    }

    fn reg32_set(&self, index: u16, value: u32) -> PraResult<()> {
        let policy = self.policy(index)?;
        if !policy.allows(value) {
            return Err(PraError::ACCESS_DENIED);
        }
        self.hw.regs.write32(policy.addr, value);
        Ok(())
    }

    /// Protected bits are always carried over from the current value.
    fn reg32_clr_set(&self, index: u16, clear_mask: u32, set_mask: u32) -> PraResult<()> {
        let policy = self.policy(index)?;
        if !policy.allows(set_mask) {
            return Err(PraError::ACCESS_DENIED);
        }
        let regs = self.hw.regs;
        let value = (regs.read32(policy.addr) & (clear_mask | policy.write_mask)) | set_mask;
        regs.write32(policy.addr, value);
        Ok(())
    }

    fn sys_cfg_func(&self, addr: u32) -> PraResult<()> {
        let mut buf = [0u8; SystemConfig::SIZE];
        self.hw
            .shared_mem
            .load(addr, &mut buf)
            .map_err(|_| PraError::ACCESS_DENIED)?;
        let cfg = SystemConfig::try_read_from_bytes(&buf[..]).map_err(|_| {
            warn!("PRA: malformed system configuration at {:#x}", addr);
            PraError::INVALID_PARAM
        })?;
        self.store.apply_whole(cfg, &self.clocks)
    }

    fn load_payload<T: FromBytes + IntoBytes>(&self, addr: u32) -> PraResult<T> {
        let mut payload = T::new_zeroed();
        self.hw
            .shared_mem
            .load(addr, payload.as_mut_bytes())
            .map_err(|_| PraError::ACCESS_DENIED)?;
        Ok(payload)
    }

    fn func_policy(&self, index: u16, data1: u32, data2: u32) -> PraResult<()> {
        let func = PolicyFunc::try_from(index).map_err(|_| PraError::ACCESS_DENIED)?;
        debug!("PRA: policy {:?}({:#x}, {:#x})", func, data1, data2);
        match func {
            PolicyFunc::PiloSetTrim => self.pilo_set_trim(data1),
            _ => self
                .store
                .apply_field(&self.clocks, |cfg| self.edit(func, data1, data2, cfg)),
        }
    }

    fn pilo_set_trim(&self, trim: u32) -> PraResult<()> {
        if !self.store.is_initialized() {
            return Err(PraError::ACCESS_DENIED);
        }
        if !self.store.config().pilo_enable {
            return Err(PraError::INVALID_PARAM_PILO);
        }
        self.hw
            .clk
            .pilo_set_trim(trim)
            .map_err(|_| PraError::ERROR_PROCESSING_PILO)
    }

    fn edit(
        &self,
        func: PolicyFunc,
        data1: u32,
        data2: u32,
        cfg: &mut SystemConfig,
    ) -> PraResult<()> {
        match func {
            PolicyFunc::PmLdoSetVoltage => {
                cfg.ldo_voltage = enum_field(data1, PraError::INVALID_PARAM)?;
                cfg.power_enable = true;
                cfg.ldo_enable = true;
            }
            PolicyFunc::PmLdoSetMode => {
                cfg.ldo_mode = enum_field(data1, PraError::INVALID_PARAM)?;
                cfg.power_enable = true;
                cfg.ldo_enable = true;
            }
            PolicyFunc::PmBuckEnable => {
                cfg.buck_voltage = enum_field(data1, PraError::INVALID_PARAM)?;
                cfg.power_enable = true;
                cfg.ldo_enable = false;
            }
            PolicyFunc::EcoDisable => cfg.eco_enable = false,
            PolicyFunc::EcoEnable => cfg.eco_enable = true,
            PolicyFunc::EcoConfigure => {
                let eco: EcoConfigurePayload = self.load_payload(data1)?;
                cfg.eco_freq_hz = eco.freq;
                cfg.eco_load = eco.csum;
                cfg.eco_esr = eco.esr;
                cfg.eco_drive_level = eco.drive_level;
            }
            PolicyFunc::FllDisable => cfg.fll.enable = false,
            PolicyFunc::FllEnable => cfg.fll.enable = true,
            PolicyFunc::FllManConfig => {
                let fll: FllManualConfigPayload = self.load_payload(data1)?;
                let err = PraError::INVALID_PARAM_FLL0;
                let cco_range: FllCcoRange = enum_field(fll.cco_range, err)?;
                let output_mode: ClkOutputMode = enum_field(fll.output_mode, err)?;
                cfg.fll.mult = fll.fll_mult;
                cfg.fll.ref_div = fll.ref_div;
                cfg.fll.cco_range = cco_range;
                cfg.fll.enable_output_div = fll.enable_output_div != 0;
                cfg.fll.lock_tolerance = fll.lock_tolerance;
                cfg.fll.igain = fll.igain;
                cfg.fll.pgain = fll.pgain;
                cfg.fll.settling_count = fll.settling_count;
                cfg.fll.output_mode = output_mode;
                cfg.fll.cco_freq = fll.cco_freq;
            }
            PolicyFunc::PllDisable => cfg.pll[pll_slot(data1)].enable = false,
            PolicyFunc::PllEnable => cfg.pll[pll_slot(data1)].enable = true,
            PolicyFunc::PllManConfig => {
                let pll: PllManualConfigPayload = self.load_payload(data1)?;
                let slot = pll_slot(pll.clk_path);
                let output_mode: ClkOutputMode =
                    enum_field(pll.output_mode, PraError::invalid_param_pll(slot))?;
                let target = &mut cfg.pll[slot];
                target.feedback_div = pll.feedback_div;
                target.reference_div = pll.reference_div;
                target.output_div = pll.output_div;
                target.lf_mode = pll.lf_mode != 0;
                target.output_mode = output_mode;
            }
            PolicyFunc::IloEnable => cfg.ilo_enable = true,
            PolicyFunc::IloDisable => cfg.ilo_enable = false,
            PolicyFunc::IloHibernateOn => cfg.ilo_hibernate_on = data1 != 0,
            PolicyFunc::PiloEnable => cfg.pilo_enable = true,
            PolicyFunc::PiloDisable => cfg.pilo_enable = false,
            // Trim goes straight to the oscillator and never reaches the store.
            PolicyFunc::PiloSetTrim => {}
            PolicyFunc::WcoEnable => cfg.wco_enable = true,
            PolicyFunc::WcoDisable => cfg.wco_enable = false,
            PolicyFunc::WcoBypass => cfg.bypass_enable = data1 != 0,
            PolicyFunc::HfEnable => cfg.hf[hf_number(data1)?].enable = true,
            PolicyFunc::HfDisable => cfg.hf[hf_number(data1)?].enable = false,
            PolicyFunc::HfSetSource => {
                let hf = hf_number(data1)?;
                cfg.hf[hf].source = enum_field(data2, PraError::invalid_param_clkhf(hf))?;
            }
            PolicyFunc::HfSetDivider => {
                let hf = hf_number(data1)?;
                let divider: ClkHfDivider = enum_field(data2, PraError::invalid_param_clkhf(hf))?;
                cfg.hf[hf].divider = divider;
            }
            PolicyFunc::FastSetDivider => {
                cfg.clk_fast_div = divider_field(data1, PraError::INVALID_PARAM_CLKFAST)?
            }
            PolicyFunc::PeriSetDivider => {
                cfg.clk_peri_div = divider_field(data1, PraError::INVALID_PARAM_CLKPERI)?
            }
            PolicyFunc::SlowSetDivider => {
                cfg.clk_slow_div = divider_field(data1, PraError::INVALID_PARAM_CLKSLOW)?
            }
            PolicyFunc::LfSetSource => {
                cfg.clk_lf_source = enum_field(data1, PraError::INVALID_PARAM_CLKLF)?
            }
            PolicyFunc::TimerSetSource => {
                cfg.clk_timer_source = enum_field(data1, PraError::INVALID_PARAM_CLKTIMER)?
            }
            PolicyFunc::TimerSetDivider => {
                cfg.clk_timer_divider = divider_field(data1, PraError::INVALID_PARAM_CLKTIMER)?
            }
            PolicyFunc::TimerEnable => cfg.clk_timer_enable = true,
            PolicyFunc::TimerDisable => cfg.clk_timer_enable = false,
            PolicyFunc::PumpSetSource => {
                cfg.pump_source = enum_field(data1, PraError::INVALID_PARAM_CLKPUMP)?
            }
            PolicyFunc::PumpSetDivider => {
                cfg.pump_divider = enum_field(data1, PraError::INVALID_PARAM_CLKPUMP)?
            }
            PolicyFunc::PumpEnable => cfg.clk_pump_enable = true,
            PolicyFunc::PumpDisable => cfg.clk_pump_enable = false,
            PolicyFunc::BakSetSource => {
                cfg.clk_bak_source = enum_field(data1, PraError::INVALID_PARAM_CLKBAK)?
            }
            PolicyFunc::PathSetSource => {
                let path = path_number(data1)?;
                cfg.path[path].source = enum_field(data2, PraError::invalid_param_pathmux(path))?;
            }
        }
        Ok(())
    }
}
