// Licensed under the Apache-2.0 license

use log::error;
use pra_comm::hil::Halt;

/// Stops an emulated core by unwinding the thread it runs on.
pub struct PanicHalt;

impl Halt for PanicHalt {
    fn halt(&self, status: u32) -> ! {
        error!("core halted with {:#x}", status);
        panic!("core halted with {:#x}", status);
    }
}
