// Licensed under the Apache-2.0 license

use core::sync::atomic::{AtomicU32, Ordering};
use pra_comm::hil::Halt;

/// Last status passed to `SpinHalt::halt`, left for a debugger to inspect.
pub static HALT_STATUS: AtomicU32 = AtomicU32::new(0);

/// Parks the core forever.
pub struct SpinHalt;

impl Halt for SpinHalt {
    fn halt(&self, status: u32) -> ! {
        HALT_STATUS.store(status, Ordering::SeqCst);
        loop {
            core::hint::spin_loop();
        }
    }
}
