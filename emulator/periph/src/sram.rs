// Licensed under the Apache-2.0 license

use crate::EmulatorError;
use kernel::ErrorCode;
use log::warn;
use pra_comm::hil::SharedMemory;
use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError};

/// SRAM window visible to both cores.
#[derive(Clone)]
pub struct SharedSram {
    base: u32,
    mem: Arc<Mutex<Vec<u8>>>,
}

impl SharedSram {
    pub fn new(base: u32, size: u32) -> Self {
        SharedSram {
            base,
            mem: Arc::new(Mutex::new(vec![0; size as usize])),
        }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    fn range(&self, addr: u32, len: usize, size: usize) -> Result<Range<usize>, EmulatorError> {
        let start = addr
            .checked_sub(self.base)
            .map(|offset| offset as usize)
            .filter(|start| start.checked_add(len).is_some_and(|end| end <= size))
            .ok_or(EmulatorError::OutsideSharedSram { addr, len })?;
        Ok(start..start + len)
    }

    pub fn read(&self, addr: u32, buf: &mut [u8]) -> Result<(), EmulatorError> {
        let mem = self.mem.lock().unwrap_or_else(PoisonError::into_inner);
        let range = self.range(addr, buf.len(), mem.len())?;
        buf.copy_from_slice(&mem[range]);
        Ok(())
    }

    pub fn write(&self, addr: u32, data: &[u8]) -> Result<(), EmulatorError> {
        let mut mem = self.mem.lock().unwrap_or_else(PoisonError::into_inner);
        let range = self.range(addr, data.len(), mem.len())?;
        mem[range].copy_from_slice(data);
        Ok(())
    }
}

impl SharedMemory for SharedSram {
    fn load(&self, addr: u32, buf: &mut [u8]) -> Result<(), ErrorCode> {
        self.read(addr, buf).map_err(|err| {
            warn!("{}", err);
            ErrorCode::INVAL
        })
    }

    fn store(&self, addr: u32, data: &[u8]) -> Result<(), ErrorCode> {
        self.write(addr, data).map_err(|err| {
            warn!("{}", err);
            ErrorCode::INVAL
        })
    }
}
