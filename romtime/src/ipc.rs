// Licensed under the Apache-2.0 license

//! Inter-processor communication structures and their interrupt structures.

use crate::static_ref::StaticRef;
use pra_comm::hil::{IpcInterrupt, IpcStruct};
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub IpcStructRegisters {
        (0x00 => pub acquire: ReadOnly<u32, ACQUIRE::Register>),
        (0x04 => pub release: WriteOnly<u32, RELEASE::Register>),
        (0x08 => pub notify: WriteOnly<u32, NOTIFY::Register>),
        (0x0c => pub data: ReadWrite<u32>),
        (0x10 => pub lock_status: ReadOnly<u32, LOCK_STATUS::Register>),
        (0x14 => _reserved0),
        (0x20 => @END),
    },
    pub IpcIntrStructRegisters {
        (0x00 => pub intr: ReadWrite<u32, INTR::Register>),
        (0x04 => pub intr_set: ReadWrite<u32, INTR::Register>),
        (0x08 => pub intr_mask: ReadWrite<u32, INTR::Register>),
        (0x0c => pub intr_masked: ReadOnly<u32, INTR::Register>),
        (0x10 => _reserved0),
        (0x20 => @END),
    },
    pub NvicRegisters {
        (0x00 => pub iser: [ReadWrite<u32>; 16]),
        (0x40 => @END),
    }
}

register_bitfields![u32,
    pub ACQUIRE [
        SUCCESS OFFSET(31) NUMBITS(1) []
    ],
    pub RELEASE [
        INTR_RELEASE OFFSET(0) NUMBITS(16) []
    ],
    pub NOTIFY [
        INTR_NOTIFY OFFSET(0) NUMBITS(16) []
    ],
    pub LOCK_STATUS [
        ACQUIRED OFFSET(31) NUMBITS(1) []
    ],
    pub INTR [
        RELEASE OFFSET(0) NUMBITS(16) [],
        NOTIFY OFFSET(16) NUMBITS(16) []
    ],
];

pub const NVIC_ISER_ADDR: usize = 0xe000_e100;

pub struct Ipc {
    registers: StaticRef<IpcStructRegisters>,
}

impl Ipc {
    pub const fn new(registers: StaticRef<IpcStructRegisters>) -> Self {
        Ipc { registers }
    }
}

impl IpcStruct for Ipc {
    fn acquire(&self) -> bool {
        // Reading ACQUIRE takes the lock when it is free.
        self.registers.acquire.is_set(ACQUIRE::SUCCESS)
    }

    fn release(&self) {
        self.registers.release.write(RELEASE::INTR_RELEASE.val(0));
    }

    fn notify(&self, intr_mask: u32) {
        self.registers
            .notify
            .write(NOTIFY::INTR_NOTIFY.val(intr_mask & 0xffff));
    }

    fn is_lock_acquired(&self) -> bool {
        self.registers.lock_status.is_set(LOCK_STATUS::ACQUIRED)
    }

    fn read_data(&self) -> u32 {
        self.registers.data.get()
    }

    fn write_data(&self, data: u32) {
        self.registers.data.set(data);
    }
}

/// An IPC interrupt structure routed to one NVIC line of the servicing core.
pub struct IpcIntr {
    registers: StaticRef<IpcIntrStructRegisters>,
    nvic: StaticRef<NvicRegisters>,
    irq: u32,
}

impl IpcIntr {
    pub const fn new(
        registers: StaticRef<IpcIntrStructRegisters>,
        nvic: StaticRef<NvicRegisters>,
        irq: u32,
    ) -> Self {
        IpcIntr {
            registers,
            nvic,
            irq,
        }
    }
}

impl IpcInterrupt for IpcIntr {
    fn set_interrupt_mask(&self, release_mask: u32, notify_mask: u32) {
        self.registers.intr_mask.write(
            INTR::RELEASE.val(release_mask & 0xffff) + INTR::NOTIFY.val(notify_mask & 0xffff),
        );
    }

    fn clear_interrupt(&self, release_mask: u32, notify_mask: u32) {
        self.registers.intr.write(
            INTR::RELEASE.val(release_mask & 0xffff) + INTR::NOTIFY.val(notify_mask & 0xffff),
        );
        // Read back so the clear lands before the handler returns.
        let _ = self.registers.intr.get();
    }

    fn enable_irq(&self) {
        let word = (self.irq / 32) as usize;
        if let Some(iser) = self.nvic.iser.get(word) {
            iser.set(1 << (self.irq % 32));
        }
    }
}
