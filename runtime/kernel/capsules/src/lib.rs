// Licensed under the Apache-2.0 license

//! Secure-core side of protected register access: the register policy
//! table, the clock-tree engine and the command dispatcher.

#![cfg_attr(target_arch = "arm", no_std)]
#![forbid(unsafe_code)]

#[cfg(test)]
mod test;

pub mod configure;
pub mod dispatch;
pub mod freq;
pub mod policy;
pub mod responder;
pub mod secure;
pub mod store;
pub mod validate;

use pra_comm::hil::{Gpio, IpcStruct, RegisterAccess, SharedMemory, SysClk, SysLib, SysPm};

/// Platform services the secure core drives on behalf of the requester.
#[derive(Clone, Copy)]
pub struct Hardware<'a> {
    pub regs: &'a dyn RegisterAccess,
    pub shared_mem: &'a dyn SharedMemory,
    pub clk: &'a dyn SysClk,
    pub pm: &'a dyn SysPm,
    pub sys: &'a dyn SysLib,
    pub gpio: &'a dyn Gpio,
    /// IPC structure shared with the DDFT logic; carries the CM4 deep-sleep flag.
    pub ddft: &'a dyn IpcStruct,
}
