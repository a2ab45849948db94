// Licensed under the Apache-2.0 license

//! Non-secure side of protected register access.
//!
//! Every request goes through [`PraClient::send`], which holds a critical
//! section for the whole request/reply exchange, so a requester never has
//! more than one request in flight.

#![cfg_attr(target_arch = "arm", no_std)]

use core::hint::spin_loop;
use log::error;
use pra_comm::hil::{Halt, IpcStruct, SharedMemory};
use pra_common::{
    EcoConfigurePayload, FllManualConfigPayload, PllManualConfigPayload, PolicyFunc, PraCommand,
    PraError, PraMessage, PraResult, RegisterIndex, SecureOnlyFunc, SystemConfig,
};
use zerocopy::{FromBytes, Immutable, IntoBytes};

/// Where the client keeps its message and argument blocks in shared memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SharedSlots {
    pub msg_addr: u32,
    /// Holds a [`SystemConfig`] or one of the policy payloads.
    pub payload_addr: u32,
}

pub struct PraClient<'a> {
    ipc: &'a dyn IpcStruct,
    shared_mem: &'a dyn SharedMemory,
    halt: &'a dyn Halt,
    notify_mask: u32,
    slots: SharedSlots,
}

impl<'a> PraClient<'a> {
    pub fn new(
        ipc: &'a dyn IpcStruct,
        shared_mem: &'a dyn SharedMemory,
        halt: &'a dyn Halt,
        notify_mask: u32,
        slots: SharedSlots,
    ) -> Self {
        PraClient {
            ipc,
            shared_mem,
            halt,
            notify_mask,
            slots,
        }
    }

    /// Sends one request and blocks until the secure core has released the channel.
    ///
    /// # Returns
    ///
    /// The value read for [`PraCommand::Reg32Get`], the status word otherwise.
    /// An `ACCESS_DENIED` status never returns: the core is halted.
    pub fn send(&self, command: PraCommand, index: u16, data1: u32, data2: u32) -> u32 {
        let reply = critical_section::with(|_| self.exchange(command, index, data1, data2));
        self.finish(command, index, reply)
    }

    fn finish(&self, command: PraCommand, index: u16, reply: PraMessage) -> u32 {
        if reply.status == u32::from(PraError::ACCESS_DENIED) {
            error!("PRA: access denied for command {:?} index {}", command, index);
            self.halt.halt(reply.status);
        }
        if command == PraCommand::Reg32Get {
            reply.data1
        } else {
            reply.status
        }
    }

    fn exchange(&self, command: PraCommand, index: u16, data1: u32, data2: u32) -> PraMessage {
        let addr = self.slots.msg_addr;
        let mut msg = PraMessage::request(command, index, data1, data2);
        if self.shared_mem.store(addr, msg.as_bytes()).is_err() {
            msg.status = PraError::INVALID_PARAM.into();
            return msg;
        }

        while self.ipc.send_msg_word(self.notify_mask, addr).is_err() {
            spin_loop();
        }
        while self.ipc.is_lock_acquired() {
            spin_loop();
        }

        if self.shared_mem.load(addr, msg.as_mut_bytes()).is_err() {
            msg.status = PraError::INVALID_PARAM.into();
        }
        msg
    }

    fn send_status(
        &self,
        command: PraCommand,
        index: u16,
        data1: u32,
        data2: u32,
    ) -> PraResult<()> {
        PraError::from_status(self.send(command, index, data1, data2))
    }

    fn send_with_payload<T: IntoBytes + Immutable>(
        &self,
        command: PraCommand,
        index: u16,
        payload: &T,
    ) -> PraResult<()> {
        let addr = self.slots.payload_addr;
        // The payload slot is shared by every requester on this core.
        let reply = critical_section::with(|_| -> PraResult<PraMessage> {
            self.shared_mem
                .store(addr, payload.as_bytes())
                .map_err(|_| PraError::INVALID_PARAM)?;
            Ok(self.exchange(command, index, addr, 0))
        })?;
        PraError::from_status(self.finish(command, index, reply))
    }

    pub fn reg32_get(&self, index: RegisterIndex) -> u32 {
        self.send(PraCommand::Reg32Get, index.into(), 0, 0)
    }

    pub fn reg32_set(&self, index: RegisterIndex, value: u32) -> PraResult<()> {
        self.send_status(PraCommand::Reg32Set, index.into(), value, 0)
    }

    /// Keeps the bits of `clear_mask` (and any protected bits) and ORs in `set_mask`.
    pub fn reg32_clr_set(
        &self,
        index: RegisterIndex,
        clear_mask: u32,
        set_mask: u32,
    ) -> PraResult<()> {
        self.send_status(PraCommand::Reg32ClrSet, index.into(), clear_mask, set_mask)
    }

    pub fn wakeup(&self) -> PraResult<()> {
        self.send_status(PraCommand::Cm0Wakeup, 0, 0, 0)
    }

    /// Hands a whole clock/power configuration to the secure core.
    pub fn system_config(&self, cfg: &SystemConfig) -> PraResult<()> {
        self.send_with_payload(PraCommand::SysCfgFunc, 0, cfg)
    }

    pub fn secure_only(&self, func: SecureOnlyFunc, arg: u32) -> PraResult<()> {
        self.send_status(PraCommand::SecureOnly, func.into(), arg, 0)
    }

    /// `func_proc == 0` enters hibernate; any other value unfreezes the IOs.
    pub fn hibernate(&self, func_proc: u32) -> PraResult<()> {
        self.secure_only(SecureOnlyFunc::PmHibernate, func_proc)
    }

    pub fn cm4_dp_flag_set(&self) -> PraResult<()> {
        self.secure_only(SecureOnlyFunc::PmCm4DpFlagSet, 0)
    }

    pub fn flash_ram_delay(&self, microseconds: u32) -> PraResult<()> {
        self.secure_only(SecureOnlyFunc::FlashRamDelay, microseconds)
    }

    /// Runs a field-level edit. Two-field edits take the domain number in
    /// `data1` and the value in `data2`.
    pub fn policy(&self, func: PolicyFunc, data1: u32, data2: u32) -> PraResult<()> {
        self.send_status(PraCommand::FuncPolicy, func.into(), data1, data2)
    }

    pub fn eco_configure(&self, payload: &EcoConfigurePayload) -> PraResult<()> {
        self.send_with_payload(PraCommand::FuncPolicy, PolicyFunc::EcoConfigure.into(), payload)
    }

    pub fn fll_manual_config(&self, payload: &FllManualConfigPayload) -> PraResult<()> {
        self.send_with_payload(PraCommand::FuncPolicy, PolicyFunc::FllManConfig.into(), payload)
    }

    pub fn pll_manual_config(&self, payload: &PllManualConfigPayload) -> PraResult<()> {
        self.send_with_payload(PraCommand::FuncPolicy, PolicyFunc::PllManConfig.into(), payload)
    }

    /// Reads a block back from the payload slot.
    pub fn read_payload<T: FromBytes + IntoBytes>(&self) -> PraResult<T> {
        let mut payload = T::new_zeroed();
        self.shared_mem
            .load(self.slots.payload_addr, payload.as_mut_bytes())
            .map_err(|_| PraError::INVALID_PARAM)?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use kernel::ErrorCode;
    use pra_common::STATUS_SUCCESS;

    const BASE: u32 = 0x0804_7000;
    const SLOTS: SharedSlots = SharedSlots {
        msg_addr: BASE,
        payload_addr: BASE + 0x100,
    };

    /// A secure core that answers inside `notify`.
    struct LoopbackPeer {
        mem: RefCell<Vec<u8>>,
        locked: Cell<bool>,
        data: Cell<u32>,
        reply_status: Cell<u32>,
        reply_data1: Cell<u32>,
        seen: RefCell<Vec<PraMessage>>,
        busy_attempts: Cell<u32>,
    }

    impl LoopbackPeer {
        fn new() -> Self {
            LoopbackPeer {
                mem: RefCell::new(vec![0; 0x1000]),
                locked: Cell::new(false),
                data: Cell::new(0),
                reply_status: Cell::new(STATUS_SUCCESS),
                reply_data1: Cell::new(0),
                seen: RefCell::new(Vec::new()),
                busy_attempts: Cell::new(0),
            }
        }
    }

    impl SharedMemory for LoopbackPeer {
        fn load(&self, addr: u32, buf: &mut [u8]) -> Result<(), ErrorCode> {
            let start = addr.checked_sub(BASE).ok_or(ErrorCode::INVAL)? as usize;
            let mem = self.mem.borrow();
            buf.copy_from_slice(mem.get(start..start + buf.len()).ok_or(ErrorCode::INVAL)?);
            Ok(())
        }

        fn store(&self, addr: u32, data: &[u8]) -> Result<(), ErrorCode> {
            let start = addr.checked_sub(BASE).ok_or(ErrorCode::INVAL)? as usize;
            let mut mem = self.mem.borrow_mut();
            mem.get_mut(start..start + data.len())
                .ok_or(ErrorCode::INVAL)?
                .copy_from_slice(data);
            Ok(())
        }
    }

    impl IpcStruct for LoopbackPeer {
        fn acquire(&self) -> bool {
            if self.busy_attempts.get() > 0 {
                self.busy_attempts.set(self.busy_attempts.get() - 1);
                return false;
            }
            !self.locked.replace(true)
        }

        fn release(&self) {
            self.locked.set(false);
        }

        fn notify(&self, _intr_mask: u32) {
            let addr = self.data.get();
            let mut msg = PraMessage::default();
            self.load(addr, msg.as_mut_bytes()).unwrap();
            self.seen.borrow_mut().push(msg);
            msg.status = self.reply_status.get();
            msg.data1 = self.reply_data1.get();
            self.store(addr, msg.as_bytes()).unwrap();
            self.release();
        }

        fn is_lock_acquired(&self) -> bool {
            self.locked.get()
        }

        fn read_data(&self) -> u32 {
            self.data.get()
        }

        fn write_data(&self, data: u32) {
            self.data.set(data);
        }
    }

    struct PanicHalt;

    impl Halt for PanicHalt {
        fn halt(&self, status: u32) -> ! {
            panic!("halted with {:#x}", status);
        }
    }

    fn client(peer: &LoopbackPeer) -> PraClient<'_> {
        PraClient::new(peer, peer, &PanicHalt, 1 << 1, SLOTS)
    }

    #[test]
    fn test_get_returns_value() {
        let peer = LoopbackPeer::new();
        peer.reply_data1.set(0xfeed);
        assert_eq!(client(&peer).reg32_get(RegisterIndex::SrssIntr), 0xfeed);

        let seen = peer.seen.borrow();
        assert_eq!(seen[0].command, u16::from(PraCommand::Reg32Get));
        assert_eq!(seen[0].index, u16::from(RegisterIndex::SrssIntr));
        assert_eq!(seen[0].status, pra_common::STATUS_REQUEST_SENT);
        assert!(!peer.locked.get());
    }

    #[test]
    fn test_status_is_returned() {
        let peer = LoopbackPeer::new();
        peer.reply_status.set(PraError::INVALID_PARAM_CLKHF0.into());
        assert_eq!(
            client(&peer).policy(PolicyFunc::HfDisable, 0, 0),
            Err(PraError::INVALID_PARAM_CLKHF0)
        );
    }

    #[test]
    fn test_waits_for_channel() {
        let peer = LoopbackPeer::new();
        peer.busy_attempts.set(5);
        assert_eq!(client(&peer).wakeup(), Ok(()));
        assert_eq!(peer.seen.borrow().len(), 1);
    }

    #[test]
    fn test_config_travels_by_address() {
        let peer = LoopbackPeer::new();
        let cfg = SystemConfig::default();
        assert_eq!(client(&peer).system_config(&cfg), Ok(()));

        let seen = peer.seen.borrow();
        assert_eq!(seen[0].data1, SLOTS.payload_addr);
        let start = (SLOTS.payload_addr - BASE) as usize;
        assert_eq!(
            &peer.mem.borrow()[start..start + SystemConfig::SIZE],
            cfg.as_bytes()
        );
    }

    #[test]
    fn test_payload_round_trip_through_slot() {
        let peer = LoopbackPeer::new();
        let client = client(&peer);
        let pll = PllManualConfigPayload {
            clk_path: 1,
            feedback_div: 30,
            ..Default::default()
        };
        assert_eq!(client.pll_manual_config(&pll), Ok(()));
        assert_eq!(client.read_payload::<PllManualConfigPayload>(), Ok(pll));
        assert_eq!(
            peer.seen.borrow()[0].index,
            u16::from(PolicyFunc::PllManConfig)
        );
    }

    #[test]
    #[should_panic(expected = "halted with 0xffffffff")]
    fn test_access_denied_halts() {
        let peer = LoopbackPeer::new();
        peer.reply_status.set(PraError::ACCESS_DENIED.into());
        let _ = client(&peer).reg32_set(RegisterIndex::SrssPwrHibernate, 1 << 31);
    }
}
