// Licensed under the Apache-2.0 license

//! Secure-core end of the PRA IPC channel.

use crate::dispatch::Dispatcher;
use log::{debug, error};
use pra_comm::hil::{IpcInterrupt, IpcStruct};
use pra_common::PraMessage;
use zerocopy::IntoBytes;

pub struct PraResponder<'a> {
    dispatcher: Dispatcher<'a>,
    ipc: &'a dyn IpcStruct,
    intr: &'a dyn IpcInterrupt,
    channel_mask: u32,
}

impl<'a> PraResponder<'a> {
    pub fn new(
        dispatcher: Dispatcher<'a>,
        ipc: &'a dyn IpcStruct,
        intr: &'a dyn IpcInterrupt,
        channel_mask: u32,
    ) -> Self {
        PraResponder {
            dispatcher,
            ipc,
            intr,
            channel_mask,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<'a> {
        &self.dispatcher
    }

    /// Unmasks the PRA channel's notify event and enables the interrupt.
    ///
    /// The notify mask is indexed by IPC channel, so this is the channel's own
    /// bit (`1 << 14` for channel 14), not the requester's notify-structure
    /// mask.
    pub fn init(&self) {
        self.intr.set_interrupt_mask(0, self.channel_mask);
        self.intr.enable_irq();
        debug!("PRA: responder ready");
    }

    /// Serves the request whose shared-memory address sits in the IPC data
    /// register, then acknowledges the interrupt and releases the channel.
    ///
    /// The reply is fully written before the lock is released; the requester
    /// reads it only after observing the release.
    pub fn handle_interrupt(&self) {
        let addr = self.ipc.read_data();
        let shared_mem = self.dispatcher.hardware().shared_mem;

        let mut msg = PraMessage::default();
        match shared_mem.load(addr, msg.as_mut_bytes()) {
            Ok(()) => {
                self.dispatcher.dispatch(&mut msg);
                if shared_mem.store(addr, msg.as_bytes()).is_err() {
                    error!("PRA: reply to {:#x} could not be written", addr);
                }
            }
            Err(_) => error!("PRA: message address {:#x} is not shared memory", addr),
        }

        self.intr.clear_interrupt(0, self.channel_mask);
        self.ipc.release();
    }
}
