// Licensed under the Apache-2.0 license

//! Legality rules for a proposed clock tree.
//!
//! Checks run in a fixed order and stop at the first failing domain. Nothing
//! here touches hardware; the only inputs are the configuration and the
//! silicon capabilities.

use crate::freq;
use log::warn;
use pra_common::{
    ClkLfSource, ClkPath, ClkPathSource, ClkTimerSource, PraError, PraResult, SysTickSource,
    SystemConfig, HSIOM_SEL_ACT_4, IMO_FREQ_HZ, NUM_HF_CLOCKS, NUM_PLL_CONFIGS,
};
use pra_config::DeviceConfig;

const ULP_MAX_FREQ_HZ: u64 = 50_000_000;
const EXT_CLK_MAX_FREQ_HZ: u64 = 100_000_000;
const ALT_HF_MIN_FREQ_HZ: u32 = 2_000_000;
const ALT_HF_MAX_FREQ_HZ: u32 = 32_000_000;
// Start-up window in units of 10 ns (400 us to 4593.75 us); one
// xtal_startup step is 31.25 us.
const ALT_HF_STARTUP_STEP: u64 = 3125;
const ALT_HF_MIN_STARTUP: u64 = 40_000;
const ALT_HF_MAX_STARTUP: u64 = 459_375;
const ALT_HF_MIN_CLOAD_FF: u32 = 7_500;
const ALT_HF_MAX_CLOAD_FF: u32 = 26_325;
const FLL_MIN_INPUT_HZ: u32 = 1_000;
const FLL_MAX_INPUT_HZ: u32 = 100_000_000;
const FLL_MAX_MULT: u32 = 262_143;
const FLL_MAX_REF_DIV: u32 = 8_191;
const FLL_MAX_LOCK_TOLERANCE: u32 = 511;
const FLL_MAX_GAIN: u32 = 15;
const FLL_MAX_SETTLING_COUNT: u32 = 8_191;
const FLL_MAX_CCO_FREQ: u32 = 511;
const PLL_MIN_INPUT_HZ: u32 = 4_000_000;
const PLL_MAX_INPUT_HZ: u32 = 64_000_000;
const CLK_LF_MAX_FREQ_HZ: u32 = 100_000;
const CLK_BAK_MAX_FREQ_HZ: u32 = 100_000;
const HF0_MIN_INPUT_HZ: u32 = 200_000;
const HF_MAX_OUT_FREQ_MHZ: u32 = 400;
const DERIVED_MAX_FREQ_HZ: u64 = 400_000_000;
const PERI_ULP_MAX_FREQ_HZ: u64 = 25_000_000;
const PERI_MAX_FREQ_HZ: u64 = 100_000_000;

/// Checks `cfg` against every legality rule.
///
/// # Returns
///
/// * `Ok(())` if the tree can be applied.
/// * `Err(PraError)` holding the invalid-parameter code of the first failing domain.
pub fn validate(cfg: &SystemConfig, dev: &DeviceConfig) -> PraResult<()> {
    let result = validate_all(cfg, dev);
    if let Err(err) = result {
        warn!("PRA: configuration rejected with {:#x}", u32::from(err));
    }
    result
}

fn validate_all(cfg: &SystemConfig, dev: &DeviceConfig) -> PraResult<()> {
    let ulp = cfg.using_ulp();
    let out_max = if ulp {
        ULP_MAX_FREQ_HZ
    } else {
        dev.hf_clk_max_freq_hz as u64
    };

    // The main crystal is never started here, so the ECO settings impose nothing.
    validate_ext_clk(cfg, dev, ulp)?;
    validate_alt_hf(cfg, dev)?;
    validate_path_muxes(cfg)?;
    validate_fll(cfg, out_max)?;
    validate_plls(cfg, dev, out_max)?;
    validate_clk_lf(cfg)?;
    validate_clk_hfs(cfg, dev)?;
    validate_clk_pump(cfg)?;
    validate_clk_bak(cfg)?;
    validate_clk_fast(cfg)?;
    validate_clk_peri(cfg, dev, ulp)?;
    validate_clk_timer(cfg)?;
    validate_clk_slow(cfg, dev)?;
    validate_alt_sys_tick(cfg)
}

fn check(cond: bool, err: PraError) -> PraResult<()> {
    if cond {
        Ok(())
    } else {
        Err(err)
    }
}

fn validate_ext_clk(cfg: &SystemConfig, dev: &DeviceConfig, ulp: bool) -> PraResult<()> {
    if !cfg.ext_clk_enable {
        return Ok(());
    }
    let max = if ulp {
        ULP_MAX_FREQ_HZ
    } else {
        EXT_CLK_MAX_FREQ_HZ.min(dev.hf_clk_max_freq_hz as u64)
    };
    let err = PraError::INVALID_PARAM_EXTCLK;
    check(cfg.ext_clk_freq_hz as u64 <= max, err)?;
    check(dev.has_gpio_port(cfg.ext_clk_port), err)?;
    check(cfg.ext_clk_hsiom == HSIOM_SEL_ACT_4, err)
}

fn validate_alt_hf(cfg: &SystemConfig, dev: &DeviceConfig) -> PraResult<()> {
    if !cfg.clk_alt_hf_enable {
        return Ok(());
    }
    let err = PraError::INVALID_PARAM_ALTHF;
    check(dev.has_alt_hf, err)?;
    check(
        (ALT_HF_MIN_FREQ_HZ..=ALT_HF_MAX_FREQ_HZ).contains(&cfg.alt_hf_freq_hz),
        err,
    )?;
    let startup = cfg.alt_hf_xtal_startup as u64 * ALT_HF_STARTUP_STEP;
    check(
        (ALT_HF_MIN_STARTUP..=ALT_HF_MAX_STARTUP).contains(&startup),
        err,
    )?;
    check(
        (ALT_HF_MIN_CLOAD_FF..=ALT_HF_MAX_CLOAD_FF).contains(&cfg.alt_hf_cload_ff),
        err,
    )
}

/// True if `source` may feed a path multiplexer under `cfg`.
fn path_mux_source_ok(cfg: &SystemConfig, source: ClkPathSource) -> bool {
    match source {
        ClkPathSource::Imo => true,
        ClkPathSource::Ext => cfg.ext_clk_enable,
        ClkPathSource::Eco => cfg.eco_enable,
        ClkPathSource::AltHf => cfg.clk_alt_hf_enable,
        ClkPathSource::Ilo => cfg.ilo_enable,
        ClkPathSource::Wco => cfg.wco_enable,
        ClkPathSource::Pilo => cfg.pilo_enable,
        ClkPathSource::DsiMux | ClkPathSource::AltLf => false,
    }
}

/// True if `path` is enabled and its mux selects a legal, running source.
fn clk_path_ok(cfg: &SystemConfig, path: ClkPath) -> bool {
    let mux = cfg.path[path.index()];
    mux.enable && path_mux_source_ok(cfg, mux.source)
}

fn validate_path_muxes(cfg: &SystemConfig) -> PraResult<()> {
    for (n, mux) in cfg.path.iter().enumerate() {
        if mux.enable && !path_mux_source_ok(cfg, mux.source) {
            return Err(PraError::invalid_param_pathmux(n));
        }
    }
    Ok(())
}

fn validate_fll(cfg: &SystemConfig, out_max: u64) -> PraResult<()> {
    let fll = &cfg.fll;
    if !fll.enable {
        return Ok(());
    }
    let err = PraError::INVALID_PARAM_FLL0;
    check(cfg.path[0].enable, err)?;
    let input = freq::path_mux_input_freq(cfg, cfg.path[0].source).ok_or(err)?;
    check((FLL_MIN_INPUT_HZ..=FLL_MAX_INPUT_HZ).contains(&input), err)?;
    check(
        fll.out_freq_hz != 0 && fll.out_freq_hz as u64 <= out_max,
        err,
    )?;
    check((1..=FLL_MAX_MULT).contains(&fll.mult), err)?;
    check((1..=FLL_MAX_REF_DIV).contains(&fll.ref_div), err)?;
    check(fll.lock_tolerance <= FLL_MAX_LOCK_TOLERANCE, err)?;
    check(fll.igain <= FLL_MAX_GAIN, err)?;
    check(fll.pgain <= FLL_MAX_GAIN, err)?;
    check(fll.settling_count <= FLL_MAX_SETTLING_COUNT, err)?;
    check(fll.cco_freq <= FLL_MAX_CCO_FREQ, err)
}

fn validate_plls(cfg: &SystemConfig, dev: &DeviceConfig, out_max: u64) -> PraResult<()> {
    for slot in 0..NUM_PLL_CONFIGS {
        let pll = &cfg.pll[slot];
        if !pll.enable {
            continue;
        }
        let err = PraError::invalid_param_pll(slot);
        // Slot n sits on path n + 1 and drives hardware PLL n + 1.
        let mux = cfg.path[slot + 1];
        check(dev.has_pll(slot as u32 + 1), err)?;
        check(mux.enable, err)?;
        let input = freq::path_mux_input_freq(cfg, mux.source).ok_or(err)?;
        check((PLL_MIN_INPUT_HZ..=PLL_MAX_INPUT_HZ).contains(&input), err)?;
        check(
            pll.out_freq_hz != 0 && pll.out_freq_hz as u64 <= out_max,
            err,
        )?;
    }
    Ok(())
}

fn validate_clk_lf(cfg: &SystemConfig) -> PraResult<()> {
    if !cfg.clk_lf_enable {
        return Ok(());
    }
    let err = PraError::INVALID_PARAM_CLKLF;
    check(cfg.clk_lf_source != ClkLfSource::AltLf, err)?;
    let freq = freq::clk_lf_freq(cfg).ok_or(err)?;
    check(freq <= CLK_LF_MAX_FREQ_HZ, err)
}

fn validate_clk_hfs(cfg: &SystemConfig, dev: &DeviceConfig) -> PraResult<()> {
    let hf0 = cfg.hf0();
    let err = PraError::INVALID_PARAM_CLKHF0;
    check(hf0.enable, err)?;
    check(clk_path_ok(cfg, hf0.source), err)?;
    // The root of CLK_HF0 must be the IMO, whatever loop sits on the path.
    check(
        freq::path_source(cfg, hf0.source) == Some(ClkPathSource::Imo),
        err,
    )?;
    let input = freq::path_freq(cfg, hf0.source).ok_or(err)?;
    check(input >= HF0_MIN_INPUT_HZ, err)?;
    check(hf0.out_freq_mhz <= HF_MAX_OUT_FREQ_MHZ, err)?;

    for n in 1..NUM_HF_CLOCKS {
        let hf = &cfg.hf[n];
        if !hf.enable {
            continue;
        }
        let err = PraError::invalid_param_clkhf(n);
        check(dev.has_hf_root(n as u32), err)?;
        check(clk_path_ok(cfg, hf.source), err)?;
        check(hf.out_freq_mhz <= HF_MAX_OUT_FREQ_MHZ, err)?;
    }
    Ok(())
}

fn validate_clk_pump(cfg: &SystemConfig) -> PraResult<()> {
    if !cfg.clk_pump_enable {
        return Ok(());
    }
    let err = PraError::INVALID_PARAM_CLKPUMP;
    check(clk_path_ok(cfg, cfg.pump_source), err)?;
    let input = freq::path_freq(cfg, cfg.pump_source).ok_or(err)?;
    check(
        (input as u64 >> cfg.pump_divider.shift()) <= DERIVED_MAX_FREQ_HZ,
        err,
    )
}

fn validate_clk_bak(cfg: &SystemConfig) -> PraResult<()> {
    if !cfg.clk_bak_enable {
        return Ok(());
    }
    let err = PraError::INVALID_PARAM_CLKBAK;
    let freq = freq::clk_bak_freq(cfg).ok_or(err)?;
    check(freq <= CLK_BAK_MAX_FREQ_HZ, err)
}

fn validate_clk_fast(cfg: &SystemConfig) -> PraResult<()> {
    if !cfg.clk_fast_enable {
        return Ok(());
    }
    let err = PraError::INVALID_PARAM_CLKFAST;
    check(cfg.hf0().enable, err)?;
    let freq = freq::hf0_freq(cfg) / (cfg.clk_fast_div as u64 + 1);
    check(freq <= DERIVED_MAX_FREQ_HZ, err)
}

fn validate_clk_peri(cfg: &SystemConfig, dev: &DeviceConfig, ulp: bool) -> PraResult<()> {
    let err = PraError::INVALID_PARAM_CLKPERI;
    check(cfg.clk_peri_enable, err)?;
    check(cfg.hf0().enable, err)?;
    let input = freq::hf0_freq(cfg);
    check(input <= dev.hf_clk_max_freq_hz as u64, err)?;
    let max = if ulp {
        PERI_ULP_MAX_FREQ_HZ
    } else {
        PERI_MAX_FREQ_HZ
    };
    check(input / (cfg.clk_peri_div as u64 + 1) <= max, err)
}

fn validate_clk_timer(cfg: &SystemConfig) -> PraResult<()> {
    if !cfg.clk_timer_enable {
        return Ok(());
    }
    let err = PraError::INVALID_PARAM_CLKTIMER;
    if cfg.clk_timer_source != ClkTimerSource::Imo {
        check(cfg.hf0().enable, err)?;
    }
    let freq = freq::clk_timer_freq(cfg).ok_or(err)?;
    check(freq <= DERIVED_MAX_FREQ_HZ, err)
}

fn validate_clk_slow(cfg: &SystemConfig, dev: &DeviceConfig) -> PraResult<()> {
    let err = PraError::INVALID_PARAM_CLKSLOW;
    check(cfg.clk_slow_enable, err)?;
    check(cfg.clk_peri_enable, err)?;
    let input = freq::hf0_freq(cfg);
    // An out-of-range CLK_HF0 is a PERI fault even when seen from SLOW.
    check(
        input <= dev.hf_clk_max_freq_hz as u64,
        PraError::INVALID_PARAM_CLKPERI,
    )?;
    let freq = input / (cfg.clk_peri_div as u64 + 1) / (cfg.clk_slow_div as u64 + 1);
    check(freq <= DERIVED_MAX_FREQ_HZ, err)
}

fn validate_alt_sys_tick(cfg: &SystemConfig) -> PraResult<()> {
    if !cfg.clk_alt_sys_tick_enable {
        return Ok(());
    }
    let err = PraError::INVALID_PARAM_SYSTICK;
    let freq = match cfg.clk_src_alt_sys_tick {
        SysTickSource::ClkLf => {
            check(cfg.clk_lf_enable, err)?;
            freq::clk_lf_freq(cfg).map(u64::from)
        }
        SysTickSource::ClkImo => Some(IMO_FREQ_HZ as u64),
        SysTickSource::ClkEco => None,
        SysTickSource::ClkTimer => {
            check(cfg.clk_timer_enable, err)?;
            freq::clk_timer_freq(cfg)
        }
    };
    check(freq.ok_or(err)? <= DERIVED_MAX_FREQ_HZ, err)
}
