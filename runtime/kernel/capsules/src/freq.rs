// Licensed under the Apache-2.0 license

//! Frequency resolution over a proposed configuration.
//!
//! `None` stands for "indeterminate": a disabled path, a source that is never
//! started on the secure core (ECO) or a source with no fixed rate.

use pra_common::{
    ClkBakSource, ClkLfSource, ClkPath, ClkPathSource, ClkTimerSource, SystemConfig, IMO_FREQ_HZ,
    ILO_FREQ_HZ, PILO_FREQ_HZ, WCO_FREQ_HZ,
};

/// Frequency presented by `source` at the input of a path multiplexer.
pub fn path_mux_input_freq(cfg: &SystemConfig, source: ClkPathSource) -> Option<u32> {
    match source {
        ClkPathSource::Imo => Some(IMO_FREQ_HZ),
        ClkPathSource::Ext => Some(cfg.ext_clk_freq_hz),
        ClkPathSource::Eco => None,
        ClkPathSource::AltHf => Some(cfg.alt_hf_freq_hz),
        ClkPathSource::Ilo => Some(ILO_FREQ_HZ),
        ClkPathSource::Wco => cfg.wco_enable.then_some(WCO_FREQ_HZ),
        ClkPathSource::Pilo => Some(PILO_FREQ_HZ),
        ClkPathSource::DsiMux | ClkPathSource::AltLf => None,
    }
}

/// Frequency at the output of `path`: the FLL (path 0) or PLL (paths 1 and 2)
/// output when that loop is enabled, otherwise the mux input.
pub fn path_freq(cfg: &SystemConfig, path: ClkPath) -> Option<u32> {
    let mux = cfg.path[path.index()];
    if !mux.enable {
        return None;
    }
    match path {
        ClkPath::Path0 if cfg.fll.enable => Some(cfg.fll.out_freq_hz),
        ClkPath::Path1 if cfg.pll[0].enable => Some(cfg.pll[0].out_freq_hz),
        ClkPath::Path2 if cfg.pll[1].enable => Some(cfg.pll[1].out_freq_hz),
        _ => path_mux_input_freq(cfg, mux.source),
    }
}

/// Mux source of `path`, or `None` when the path is disabled.
pub fn path_source(cfg: &SystemConfig, path: ClkPath) -> Option<ClkPathSource> {
    let mux = cfg.path[path.index()];
    mux.enable.then_some(mux.source)
}

pub fn clk_lf_freq(cfg: &SystemConfig) -> Option<u32> {
    if !cfg.clk_lf_enable {
        return None;
    }
    match cfg.clk_lf_source {
        ClkLfSource::Ilo => cfg.ilo_enable.then_some(ILO_FREQ_HZ),
        ClkLfSource::Wco => cfg.wco_enable.then_some(WCO_FREQ_HZ),
        ClkLfSource::Pilo => cfg.pilo_enable.then_some(PILO_FREQ_HZ),
        ClkLfSource::AltLf => None,
    }
}

pub fn clk_bak_freq(cfg: &SystemConfig) -> Option<u32> {
    if !cfg.clk_bak_enable {
        return None;
    }
    match cfg.clk_bak_source {
        ClkBakSource::Wco => cfg.wco_enable.then_some(WCO_FREQ_HZ),
        ClkBakSource::ClkLf => clk_lf_freq(cfg),
    }
}

/// CLK_HF0 output in Hz as declared by the configuration.
pub fn hf0_freq(cfg: &SystemConfig) -> u64 {
    cfg.hf0().out_freq_mhz as u64 * 1_000_000
}

pub fn clk_timer_freq(cfg: &SystemConfig) -> Option<u64> {
    if !cfg.clk_timer_enable {
        return None;
    }
    let (input, pre_div) = match cfg.clk_timer_source {
        ClkTimerSource::Imo => (IMO_FREQ_HZ as u64, 1),
        source => {
            if !cfg.hf0().enable {
                return None;
            }
            (hf0_freq(cfg), source.hf0_divider()? as u64)
        }
    };
    Some(input / (cfg.clk_timer_divider as u64 + 1) / pre_div)
}
