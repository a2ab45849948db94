/*++

Licensed under the Apache-2.0 license.

File Name:

    emulator.rs

Abstract:

    Command line front end: applies a configuration through the PRA channel
    and reports what the requester observed.

--*/

use crate::config::load_config;
use crate::soc::{with_requester, Soc};
use anyhow::anyhow;
use clap::Parser;
use clap_num::maybe_hex;
use pra_common::{status_word, RegisterIndex, SystemConfig};
use pra_emulator_periph::EmuPlatform;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, name = "PRA Emulator")]
pub struct EmulatorArgs {
    /// JSON system configuration handed to the secure core. The boot-safe
    /// clock tree is used when absent.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Register policy indices read back once the configuration is applied.
    #[arg(short, long, value_delimiter = ',')]
    pub read: Vec<u16>,

    /// Ask the secure core to let the CM4 enter deep sleep.
    #[arg(long, default_value_t = false)]
    pub cm4_dp_flag: bool,

    /// Reset reason reported by the emulated SRSS. Zero is a power-on reset.
    #[arg(long, value_parser=maybe_hex::<u32>, default_value_t = 0)]
    pub reset_reason: u32,

    #[arg(long, value_parser = parse_log_level, default_value = "info")]
    pub log_level: log::LevelFilter,
}

fn parse_log_level(s: &str) -> Result<log::LevelFilter, String> {
    s.parse().map_err(|_| format!("unknown log level '{}'", s))
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RegisterReading {
    pub index: u16,
    pub name: String,
    pub value: u32,
}

/// What the non-secure core saw during one emulator run.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Report {
    /// Status of the whole-configuration request.
    pub config_status: u32,
    pub registers: Vec<RegisterReading>,
    /// Status of the CM4 deep-sleep request, if one was made.
    pub cm4_dp_flag_status: Option<u32>,
}

pub fn run(args: &EmulatorArgs) -> anyhow::Result<Report> {
    let cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => SystemConfig::default(),
    };
    let indices = args
        .read
        .iter()
        .map(|&index| {
            RegisterIndex::try_from(index)
                .map_err(|_| anyhow!("{} is not a register policy index", index))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let soc = Soc::new(EmuPlatform::default());
    soc.platform().srss().set_reset_reason(args.reset_reason);

    let report = soc.run(|platform| {
        with_requester(platform, |client| {
            let config_status = status_word(client.system_config(&cfg));
            let registers = indices
                .iter()
                .map(|&index| RegisterReading {
                    index: index.into(),
                    name: format!("{:?}", index),
                    value: client.reg32_get(index),
                })
                .collect();
            let cm4_dp_flag_status = args
                .cm4_dp_flag
                .then(|| status_word(client.cm4_dp_flag_set()));
            Report {
                config_status,
                registers,
                cm4_dp_flag_status,
            }
        })
    })??;
    Ok(report)
}
