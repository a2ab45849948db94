// Licensed under the Apache-2.0 license

//! Register-level access for the PRA secure and non-secure cores.

#![cfg_attr(target_arch = "arm", no_std)]

mod halt;
pub mod ipc;
mod mmio;
pub mod srss;
mod static_ref;

pub use halt::*;
pub use ipc::{Ipc, IpcIntr};
pub use mmio::*;
pub use static_ref::*;

/// CPU subsystem registers.
pub mod cpuss {
    pub const CM4_PWR_CTL_OFFSET: u32 = 0x080;
}

/// Flash controller registers.
pub mod flashc {
    pub const FLASH_CMD_OFFSET: u32 = 0x008;
}

use ipc::{IpcIntrStructRegisters, IpcStructRegisters, NvicRegisters, NVIC_ISER_ADDR};
use pra_config::PraMemoryMap;

/// Builds the IPC structure for `channel`.
///
/// # Safety
///
/// The IPC block described by `map` must be mapped on this core.
pub unsafe fn ipc_struct(map: &PraMemoryMap, channel: u32) -> Ipc {
    Ipc::new(StaticRef::new(
        map.ipc_struct_addr(channel) as usize as *const IpcStructRegisters,
    ))
}

/// Builds the IPC interrupt structure `intr`, delivered on NVIC line `irq`.
///
/// # Safety
///
/// The IPC block described by `map` and the NVIC must be mapped on this core.
pub unsafe fn ipc_intr(map: &PraMemoryMap, intr: u32, irq: u32) -> IpcIntr {
    IpcIntr::new(
        StaticRef::new(map.ipc_intr_struct_addr(intr) as usize as *const IpcIntrStructRegisters),
        StaticRef::new(NVIC_ISER_ADDR as *const NvicRegisters),
        irq,
    )
}
