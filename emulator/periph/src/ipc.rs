// Licensed under the Apache-2.0 license

//! IPC block emulation.
//!
//! Every IPC structure is a lock bit plus a data word. Notifying raises the
//! channel's bit in the notify field of each selected interrupt structure;
//! the interrupt is pending while a raised bit is also unmasked and the IRQ
//! is enabled. Both cores share one [`EmuIpc`] and run on separate threads.

use crate::EmulatorError;
use log::trace;
use pra_comm::hil::{IpcInterrupt, IpcStruct};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const NUM_IPC_CHANNELS: u32 = 16;
pub const NUM_IPC_INTERRUPTS: u32 = 16;

/// Traffic seen on one IPC structure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Successful lock acquisitions.
    pub acquisitions: u64,
    /// Acquire attempts that found the lock already held.
    pub contended: u64,
    pub notifications: u64,
}

#[derive(Default)]
struct Channel {
    locked: bool,
    data: u32,
    stats: ChannelStats,
}

#[derive(Default)]
struct Interrupt {
    release_mask: u32,
    notify_mask: u32,
    notify: u32,
    irq_enabled: bool,
}

struct IpcBlock {
    channels: Vec<Channel>,
    intrs: Vec<Interrupt>,
}

fn lock(block: &Mutex<IpcBlock>) -> MutexGuard<'_, IpcBlock> {
    block.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone)]
pub struct EmuIpc {
    block: Arc<Mutex<IpcBlock>>,
}

impl Default for EmuIpc {
    fn default() -> Self {
        Self::new()
    }
}

impl EmuIpc {
    pub fn new() -> Self {
        let block = IpcBlock {
            channels: (0..NUM_IPC_CHANNELS).map(|_| Channel::default()).collect(),
            intrs: (0..NUM_IPC_INTERRUPTS).map(|_| Interrupt::default()).collect(),
        };
        EmuIpc {
            block: Arc::new(Mutex::new(block)),
        }
    }

    pub fn channel(&self, channel: u32) -> Result<EmuIpcStruct, EmulatorError> {
        if channel >= NUM_IPC_CHANNELS {
            return Err(EmulatorError::NoSuchChannel(channel));
        }
        Ok(EmuIpcStruct {
            block: self.block.clone(),
            channel: channel as usize,
        })
    }

    pub fn interrupt(&self, intr: u32) -> Result<EmuIpcIntr, EmulatorError> {
        if intr >= NUM_IPC_INTERRUPTS {
            return Err(EmulatorError::NoSuchInterrupt(intr));
        }
        Ok(EmuIpcIntr {
            block: self.block.clone(),
            intr: intr as usize,
        })
    }

    pub fn stats(&self, channel: u32) -> Result<ChannelStats, EmulatorError> {
        lock(&self.block)
            .channels
            .get(channel as usize)
            .map(|c| c.stats)
            .ok_or(EmulatorError::NoSuchChannel(channel))
    }
}

/// One IPC structure as seen by either core.
pub struct EmuIpcStruct {
    block: Arc<Mutex<IpcBlock>>,
    channel: usize,
}

impl IpcStruct for EmuIpcStruct {
    fn acquire(&self) -> bool {
        let mut block = lock(&self.block);
        let channel = &mut block.channels[self.channel];
        if channel.locked {
            channel.stats.contended += 1;
            false
        } else {
            channel.locked = true;
            channel.stats.acquisitions += 1;
            true
        }
    }

    fn release(&self) {
        lock(&self.block).channels[self.channel].locked = false;
    }

    fn notify(&self, intr_mask: u32) {
        let mut block = lock(&self.block);
        block.channels[self.channel].stats.notifications += 1;
        let bit = 1 << self.channel;
        for (n, intr) in block.intrs.iter_mut().enumerate() {
            if intr_mask & (1 << n) != 0 {
                intr.notify |= bit;
            }
        }
        trace!("IPC: channel {} notified {:#x}", self.channel, intr_mask);
    }

    fn is_lock_acquired(&self) -> bool {
        lock(&self.block).channels[self.channel].locked
    }

    fn read_data(&self) -> u32 {
        lock(&self.block).channels[self.channel].data
    }

    fn write_data(&self, data: u32) {
        lock(&self.block).channels[self.channel].data = data;
    }
}

/// One IPC interrupt structure, owned by the core that services it.
pub struct EmuIpcIntr {
    block: Arc<Mutex<IpcBlock>>,
    intr: usize,
}

impl EmuIpcIntr {
    /// Returns true while an unmasked notify event is raised and the IRQ is enabled.
    pub fn is_pending(&self) -> bool {
        let block = lock(&self.block);
        let intr = &block.intrs[self.intr];
        intr.irq_enabled && intr.notify & intr.notify_mask != 0
    }

    /// Release and notify masks, in that order.
    pub fn masks(&self) -> (u32, u32) {
        let block = lock(&self.block);
        let intr = &block.intrs[self.intr];
        (intr.release_mask, intr.notify_mask)
    }
}

impl IpcInterrupt for EmuIpcIntr {
    fn set_interrupt_mask(&self, release_mask: u32, notify_mask: u32) {
        let mut block = lock(&self.block);
        let intr = &mut block.intrs[self.intr];
        intr.release_mask = release_mask & 0xffff;
        intr.notify_mask = notify_mask & 0xffff;
    }

    fn clear_interrupt(&self, _release_mask: u32, notify_mask: u32) {
        lock(&self.block).intrs[self.intr].notify &= !notify_mask;
    }

    fn enable_irq(&self) {
        lock(&self.block).intrs[self.intr].irq_enabled = true;
    }
}
