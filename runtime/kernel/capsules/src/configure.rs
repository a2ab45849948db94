// Licensed under the Apache-2.0 license

//! Drives the hardware from its current state to a validated clock tree.
//!
//! The sequence first parks every consumer on the IMO so no root is ever fed
//! by a source that is being reconfigured, then brings the sources up, then
//! reconnects the paths and roots. Each hardware primitive failure is mapped
//! onto the processing-error code of the domain that was being touched and
//! aborts the sequence.

use crate::validate::validate;
use crate::Hardware;
use kernel::ErrorCode;
use log::{debug, error};
use pra_comm::hil::{Gpio, SysClk, SysLib, SysPm, GPIO_DM_HIGHZ, HSIOM_SEL_GPIO};
use pra_common::{
    ClkHfDivider, ClkLfSource, ClkPath, ClkPathSource, PraError, PraResult, SystemConfig,
    NUM_HF_CLOCKS, NUM_PLL_CONFIGS,
};
use pra_config::DeviceConfig;

/// Wait states programmed before touching the tree, sized for the fastest
/// CLK_HF0 any configuration can produce.
const SAFE_WAIT_STATE_MHZ: u32 = 150;
const WCO_TIMEOUT_US: u32 = 1_000_000;
const FLL_TIMEOUT_US: u32 = 200_000;
const PLL_TIMEOUT_US: u32 = 10_000;
const EXT_CLK_MIN_FREQ_HZ: u32 = 1_000_000;
const EXT_CLK_MAX_FREQ_HZ: u32 = 100_000_000;
// CLK_PERI is parked at half of CLK_HF0.
const PARK_PERI_DIVIDER: u8 = 1;

trait OrStatus<T> {
    fn or_status(self, status: PraError) -> PraResult<T>;
}

impl<T> OrStatus<T> for Result<T, ErrorCode> {
    fn or_status(self, status: PraError) -> PraResult<T> {
        self.map_err(|code| {
            error!("PRA: clock primitive failed ({:?}), status {:#x}", code, u32::from(status));
            status
        })
    }
}

pub struct ClockTreeConfigurator<'a> {
    clk: &'a dyn SysClk,
    pm: &'a dyn SysPm,
    sys: &'a dyn SysLib,
    gpio: &'a dyn Gpio,
    device: DeviceConfig,
}

impl<'a> ClockTreeConfigurator<'a> {
    pub fn new(hw: &Hardware<'a>, device: DeviceConfig) -> Self {
        ClockTreeConfigurator {
            clk: hw.clk,
            pm: hw.pm,
            sys: hw.sys,
            gpio: hw.gpio,
            device,
        }
    }

    pub fn device(&self) -> &DeviceConfig {
        &self.device
    }

    /// Validates `cfg` and, only if it is legal, applies it.
    pub fn apply(&self, cfg: &SystemConfig) -> PraResult<()> {
        validate(cfg, &self.device)?;
        self.configure(cfg)
    }

    /// Applies `cfg` to the hardware. The caller is expected to have validated it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the whole tree is in place.
    /// * `Err(PraError)` with the processing-error code of the first domain
    ///   whose primitive failed. Earlier steps are not rolled back.
    pub fn configure(&self, cfg: &SystemConfig) -> PraResult<()> {
        debug!("PRA: configuring clock tree");
        self.sys.set_wait_states(false, SAFE_WAIT_STATE_MHZ);

        if cfg.power_enable {
            self.power_init(cfg)?;
        }

        self.park()?;
        self.start_sources(cfg)?;
        self.set_bus_dividers(cfg);
        self.connect_paths(cfg)?;
        self.start_fll(cfg)?;
        self.connect_hf0(cfg)?;
        self.start_plls(cfg)?;
        self.connect_hf_roots(cfg)?;
        self.configure_misc_clocks(cfg);
        self.configure_ilo(cfg)?;

        if cfg.power_enable && cfg.hf0().enable {
            self.sys
                .set_wait_states(cfg.ulp_enable, cfg.hf0().out_freq_mhz);
        }
        self.clk.system_core_clock_update();
        debug!("PRA: clock tree configured");
        Ok(())
    }

    fn power_init(&self, cfg: &SystemConfig) -> PraResult<()> {
        // The backup domain is only reset after a cold reset, and only when it
        // is powered from VDDD and the ILO has to run through hibernate.
        if cfg.vbackup_vddd_enable && cfg.ilo_enable && self.sys.reset_reason() == 0 {
            self.sys
                .reset_backup_domain()
                .or_status(PraError::ERROR_PROCESSING_PWR)?;
            self.clk
                .ilo_disable()
                .or_status(PraError::ERROR_PROCESSING_ILO)?;
            self.clk.ilo_enable();
            self.clk.ilo_hibernate_on(cfg.ilo_hibernate_on);
        }

        if cfg.ldo_enable {
            self.pm
                .ldo_set_voltage(cfg.ldo_voltage)
                .or_status(PraError::ERROR_PROCESSING_PWR)?;
            self.pm
                .ldo_set_mode(cfg.ldo_mode)
                .or_status(PraError::ERROR_PROCESSING_PWR)?;
        } else {
            self.pm
                .buck_enable(cfg.buck_voltage)
                .or_status(PraError::ERROR_PROCESSING_PWR)?;
        }

        self.pm.pmic_unlock();
        if cfg.pmic_enable {
            self.pm.pmic_enable_output();
        } else {
            self.pm.pmic_disable_output();
        }
        Ok(())
    }

    /// Moves CLK_HF0 onto the IMO through path 0 and stops every loop.
    fn park(&self) -> PraResult<()> {
        self.clk
            .hf_set_divider(0, ClkHfDivider::NoDivide)
            .or_status(PraError::ERROR_PROCESSING_CLKHF0)?;
        self.clk.fast_set_divider(0);
        self.clk.peri_set_divider(PARK_PERI_DIVIDER);
        self.clk.slow_set_divider(0);

        // Any PLL that fails to stop here is reported against PLL0.
        for pll in (1..=self.device.num_plls).rev() {
            self.clk
                .pll_disable(pll)
                .or_status(PraError::ERROR_PROCESSING_PLL0)?;
        }

        self.clk
            .path_set_source(1, ClkPathSource::Imo)
            .or_status(PraError::ERROR_PROCESSING_PATHMUX1)?;

        // The WCO is too slow to run the core; borrow path 1 while path 0 moves.
        if self.clk.hf_get_source(0) == Some(ClkPath::Path0)
            && self.clk.path_get_source(0) == Some(ClkPathSource::Wco)
        {
            self.clk
                .hf_set_source(0, ClkPath::Path1)
                .or_status(PraError::ERROR_PROCESSING_CLKHF0)?;
        }

        self.clk
            .fll_disable()
            .or_status(PraError::ERROR_PROCESSING_FLL0)?;
        self.clk
            .path_set_source(0, ClkPathSource::Imo)
            .or_status(PraError::ERROR_PROCESSING_PATHMUX0)?;
        self.clk
            .hf_set_source(0, ClkPath::Path0)
            .or_status(PraError::ERROR_PROCESSING_CLKHF0)?;

        if self.device.has_alt_hf {
            self.clk.alt_hf_reset();
        }
        Ok(())
    }

    fn start_sources(&self, cfg: &SystemConfig) -> PraResult<()> {
        if cfg.pilo_enable {
            self.clk.pilo_enable();
        }

        if cfg.wco_enable {
            self.gpio
                .pin_fast_init(cfg.wco_in_port, cfg.wco_in_pin_num, 0, 0, HSIOM_SEL_GPIO);
            self.gpio
                .pin_fast_init(cfg.wco_out_port, cfg.wco_out_pin_num, 0, 0, HSIOM_SEL_GPIO);
            if cfg.bypass_enable {
                self.clk.wco_bypass(true);
            }
            self.clk
                .wco_enable(WCO_TIMEOUT_US)
                .or_status(PraError::ERROR_PROCESSING_WCO)?;
        }

        if cfg.clk_lf_enable {
            if cfg.clk_lf_source == ClkLfSource::AltLf {
                error!("PRA: ALTLF cannot source CLK_LF");
                return Err(PraError::ERROR_PROCESSING_CLKLF);
            }
            self.clk.lf_set_source(cfg.clk_lf_source);
        }

        if cfg.clk_alt_hf_enable {
            self.clk
                .alt_hf_configure(
                    cfg.alt_hf_freq_hz,
                    cfg.alt_hf_sys_clk_div,
                    cfg.alt_hf_cload_ff,
                    cfg.alt_hf_xtal_startup,
                    cfg.alt_hf_voltage_reg,
                )
                .or_status(PraError::ERROR_PROCESSING_ALTHF)?;
        }

        // Starting the main crystal oscillator is not supported.
        if cfg.eco_enable {
            error!("PRA: ECO start requested");
            return Err(PraError::ERROR_PROCESSING_ECO);
        }

        if cfg.ext_clk_enable {
            if !(EXT_CLK_MIN_FREQ_HZ..=EXT_CLK_MAX_FREQ_HZ).contains(&cfg.ext_clk_freq_hz) {
                error!("PRA: EXTCLK frequency {} out of range", cfg.ext_clk_freq_hz);
                return Err(PraError::ERROR_PROCESSING_EXTCLK);
            }
            self.gpio.pin_fast_init(
                cfg.ext_clk_port,
                cfg.ext_clk_pin_num,
                GPIO_DM_HIGHZ,
                0,
                cfg.ext_clk_hsiom,
            );
            self.clk.ext_clk_set_frequency(cfg.ext_clk_freq_hz);
        }
        Ok(())
    }

    fn set_bus_dividers(&self, cfg: &SystemConfig) {
        if cfg.clk_fast_enable {
            self.clk.fast_set_divider(cfg.clk_fast_div);
        }
        if cfg.clk_peri_enable {
            self.clk.peri_set_divider(cfg.clk_peri_div);
        }
        if cfg.clk_slow_enable {
            self.clk.slow_set_divider(cfg.clk_slow_div);
        }
    }

    /// True when the requested tree runs CLK_HF0 straight off the WCO.
    fn hf0_on_wco(cfg: &SystemConfig) -> bool {
        cfg.path[0].source == ClkPathSource::Wco && cfg.hf0().source == ClkPath::Path0
    }

    fn connect_paths(&self, cfg: &SystemConfig) -> PraResult<()> {
        if Self::hf0_on_wco(cfg) {
            // Keep the core on the IMO through path 1 while the FLL comes up.
            self.clk
                .path_set_source(1, ClkPathSource::Imo)
                .or_status(PraError::ERROR_PROCESSING_PATHMUX1)?;
            self.clk
                .hf_set_source(0, ClkPath::Path1)
                .or_status(PraError::ERROR_PROCESSING_CLKHF0)?;
        } else {
            self.clk
                .path_set_source(1, cfg.path[1].source)
                .or_status(PraError::ERROR_PROCESSING_PATHMUX1)?;
        }

        for ((path, path_cfg), hw_path) in cfg.path.iter().enumerate().zip(0u32..) {
            if path == 1 || !path_cfg.enable {
                continue;
            }
            self.clk
                .path_set_source(hw_path, path_cfg.source)
                .or_status(PraError::error_processing_pathmux(path))?;
        }
        Ok(())
    }

    fn start_fll(&self, cfg: &SystemConfig) -> PraResult<()> {
        if cfg.fll.enable {
            self.clk
                .fll_manual_configure(&cfg.fll)
                .or_status(PraError::ERROR_PROCESSING_FLL0)?;
            self.clk
                .fll_enable(FLL_TIMEOUT_US)
                .or_status(PraError::ERROR_PROCESSING_FLL0)?;
        }
        Ok(())
    }

    fn connect_hf0(&self, cfg: &SystemConfig) -> PraResult<()> {
        let hf0 = cfg.hf0();
        self.clk
            .hf_set_source(0, hf0.source)
            .or_status(PraError::ERROR_PROCESSING_CLKHF0)?;
        self.clk
            .hf_set_divider(0, hf0.divider)
            .or_status(PraError::ERROR_PROCESSING_CLKHF0)?;

        // Path 1 was borrowed for the WCO hand-over; give it back.
        if Self::hf0_on_wco(cfg) {
            if !cfg.path[1].enable {
                error!("PRA: path 1 borrowed for the WCO hand-over is not enabled");
                return Err(PraError::ERROR_PROCESSING_PATHMUX1);
            }
            self.clk
                .path_set_source(1, cfg.path[1].source)
                .or_status(PraError::ERROR_PROCESSING_PATHMUX1)?;
        }
        Ok(())
    }

    fn start_plls(&self, cfg: &SystemConfig) -> PraResult<()> {
        for slot in 0..NUM_PLL_CONFIGS {
            let pll = &cfg.pll[slot];
            if !pll.enable {
                continue;
            }
            let hw_pll = slot as u32 + 1;
            self.clk
                .pll_manual_configure(hw_pll, pll)
                .or_status(PraError::error_processing_pll(slot))?;
            self.clk
                .pll_enable(hw_pll, PLL_TIMEOUT_US)
                .or_status(PraError::error_processing_pll(slot))?;
        }
        Ok(())
    }

    fn connect_hf_roots(&self, cfg: &SystemConfig) -> PraResult<()> {
        for root in 1..NUM_HF_CLOCKS {
            let hf = &cfg.hf[root];
            if !hf.enable {
                continue;
            }
            let status = PraError::error_processing_clkhf(root);
            let hw_root = root as u32;
            self.clk.hf_set_source(hw_root, hf.source).or_status(status)?;
            self.clk
                .hf_set_divider(hw_root, hf.divider)
                .or_status(status)?;
            self.clk.hf_enable(hw_root).or_status(status)?;
        }
        Ok(())
    }

    fn configure_misc_clocks(&self, cfg: &SystemConfig) {
        if cfg.clk_timer_enable {
            self.clk.timer_disable();
            self.clk.timer_set_source(cfg.clk_timer_source);
            self.clk.timer_set_divider(cfg.clk_timer_divider);
            self.clk.timer_enable();
        }
        if cfg.clk_alt_sys_tick_enable {
            self.clk.systick_set_source(cfg.clk_src_alt_sys_tick);
        }
        if cfg.clk_pump_enable {
            self.clk.pump_disable();
            self.clk.pump_set_source(cfg.pump_source);
            self.clk.pump_set_divider(cfg.pump_divider);
            self.clk.pump_enable();
        }
        if cfg.clk_bak_enable {
            self.clk.bak_set_source(cfg.clk_bak_source);
        }
    }

    fn configure_ilo(&self, cfg: &SystemConfig) -> PraResult<()> {
        if cfg.ilo_enable {
            self.clk.ilo_enable();
            self.clk.ilo_hibernate_on(cfg.ilo_hibernate_on);
        } else {
            self.clk
                .ilo_disable()
                .or_status(PraError::ERROR_PROCESSING_ILO)?;
            self.clk.ilo_hibernate_on(false);
        }
        Ok(())
    }
}
