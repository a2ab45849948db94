// Licensed under the Apache-2.0 license

use crate::test::init_logging;
use pra_common::{PraError, STATUS_SUCCESS};
use pra_emulator::{run, EmulatorArgs};
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn args(config: &NamedTempFile, extra: &[&str]) -> EmulatorArgs {
    let mut argv = vec![
        "pra-emulator".to_string(),
        "--config".to_string(),
        config.path().display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    clap::Parser::parse_from(argv)
}

#[test]
fn test_json_configuration_applies() {
    init_logging();
    let file = config_file(
        r#"{
            "path": [
                { "source": "Imo", "enable": true },
                { "source": "Imo", "enable": true },
                {}, {}, {}, {}
            ],
            "hf": [
                { "source": "Path0", "divider": "NoDivide", "out_freq_mhz": 100, "enable": true },
                { "source": "Path1", "divider": "DivideBy2", "out_freq_mhz": 4, "enable": true },
                {}, {}, {}, {}
            ]
        }"#,
    );

    let report = run(&args(&file, &["--read", "5"])).unwrap();
    assert_eq!(report.config_status, STATUS_SUCCESS);
    assert_eq!(report.registers[0].value, 0x8000_0011);
    assert_eq!(report.cm4_dp_flag_status, None);
}

#[test]
fn test_invalid_configuration_reports_status() {
    init_logging();
    let file = config_file(r#"{ "clk_peri_enable": false }"#);
    let report = run(&args(&file, &[])).unwrap();
    assert_eq!(report.config_status, u32::from(PraError::INVALID_PARAM_CLKPERI));
}

#[test]
fn test_malformed_file_is_an_error() {
    init_logging();
    let file = config_file("{ not json");
    assert!(run(&args(&file, &[])).is_err());
}
