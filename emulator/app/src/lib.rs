/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Library interface for the PRA Emulator.

--*/

pub mod config;
pub mod emulator;
pub mod soc;

pub use config::load_config;
pub use emulator::{run, EmulatorArgs, Report};
pub use soc::{run_secure_core, shared_slots, with_requester, Soc};
