// Licensed under the Apache-2.0 license

use kernel::ErrorCode;
use pra_comm::hil::{RegisterAccess, SharedMemory};
use pra_config::PraMemoryMap;

/// Direct volatile access to the physical address space.
pub struct MmioRegisters {
    _private: (),
}

impl MmioRegisters {
    /// # Safety
    ///
    /// Every address later passed to `read32`/`write32` must be a mapped,
    /// word-aligned register.
    pub const unsafe fn new() -> Self {
        MmioRegisters { _private: () }
    }
}

impl RegisterAccess for MmioRegisters {
    fn read32(&self, addr: u32) -> u32 {
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    fn write32(&self, addr: u32, value: u32) {
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, value) }
    }
}

/// The SRAM window both cores map at the same address.
pub struct DirectSharedMemory {
    map: PraMemoryMap,
}

impl DirectSharedMemory {
    /// # Safety
    ///
    /// The shared SRAM window described by `map` must be mapped on this core.
    pub const unsafe fn new(map: PraMemoryMap) -> Self {
        DirectSharedMemory { map }
    }
}

impl SharedMemory for DirectSharedMemory {
    fn load(&self, addr: u32, buf: &mut [u8]) -> Result<(), ErrorCode> {
        if !self.map.in_shared_sram(addr, buf.len()) {
            return Err(ErrorCode::INVAL);
        }
        for (i, b) in buf.iter_mut().enumerate() {
            *b = unsafe { core::ptr::read_volatile((addr as usize + i) as *const u8) };
        }
        Ok(())
    }

    fn store(&self, addr: u32, data: &[u8]) -> Result<(), ErrorCode> {
        if !self.map.in_shared_sram(addr, data.len()) {
            return Err(ErrorCode::INVAL);
        }
        for (i, b) in data.iter().enumerate() {
            unsafe { core::ptr::write_volatile((addr as usize + i) as *mut u8, *b) };
        }
        Ok(())
    }
}
