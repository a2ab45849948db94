// Licensed under the Apache-2.0 license

//! Host emulation of the peripherals the PRA channel runs over: the IPC
//! block, the shared SRAM window and the system resources sub-system.

mod error;
mod halt;
pub mod ipc;
mod sram;
pub mod srss;

pub use error::EmulatorError;
pub use halt::PanicHalt;
pub use ipc::{ChannelStats, EmuIpc, EmuIpcIntr, EmuIpcStruct};
pub use sram::SharedSram;
pub use srss::{EmuSrss, PinConfig, SystemState};

use pra_config::{DeviceConfig, PraMemoryMap};

/// The peripherals of one emulated part, shared by both cores.
pub struct EmuPlatform {
    map: PraMemoryMap,
    device: DeviceConfig,
    ipc: EmuIpc,
    sram: SharedSram,
    srss: EmuSrss,
}

impl Default for EmuPlatform {
    fn default() -> Self {
        Self::new(PraMemoryMap::default(), DeviceConfig::default())
    }
}

impl EmuPlatform {
    pub fn new(map: PraMemoryMap, device: DeviceConfig) -> Self {
        EmuPlatform {
            ipc: EmuIpc::new(),
            sram: SharedSram::new(map.shared_sram_offset, map.shared_sram_size),
            srss: EmuSrss::new(map.srss_offset, device),
            map,
            device,
        }
    }

    pub fn map(&self) -> &PraMemoryMap {
        &self.map
    }

    pub fn device(&self) -> DeviceConfig {
        self.device
    }

    pub fn ipc(&self) -> &EmuIpc {
        &self.ipc
    }

    pub fn sram(&self) -> &SharedSram {
        &self.sram
    }

    pub fn srss(&self) -> &EmuSrss {
        &self.srss
    }

    pub fn pra_channel(&self) -> Result<EmuIpcStruct, EmulatorError> {
        self.ipc.channel(self.map.pra_ipc_channel)
    }

    pub fn pra_interrupt(&self) -> Result<EmuIpcIntr, EmulatorError> {
        self.ipc.interrupt(self.map.pra_ipc_intr)
    }

    pub fn ddft_channel(&self) -> Result<EmuIpcStruct, EmulatorError> {
        self.ipc.channel(self.map.ddft_ipc_channel)
    }
}
