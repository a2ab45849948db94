// Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised by the emulated peripherals when they are wired up or inspected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmulatorError {
    #[error("IPC channel {0} does not exist")]
    NoSuchChannel(u32),
    #[error("IPC interrupt structure {0} does not exist")]
    NoSuchInterrupt(u32),
    #[error("shared SRAM access at 0x{addr:x} (+{len} bytes) is outside the window")]
    OutsideSharedSram { addr: u32, len: usize },
}
