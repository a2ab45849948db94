/*++

Licensed under the Apache-2.0 license.

File Name:

    main.rs

Abstract:

    File contains main entrypoint for the PRA Emulator.

--*/

use clap::Parser;
use pra_emulator::{run, EmulatorArgs};
use simple_logger::SimpleLogger;

fn main() -> anyhow::Result<()> {
    let cli = EmulatorArgs::parse();
    SimpleLogger::new().with_level(cli.log_level).init()?;

    let report = run(&cli)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
