// Licensed under the Apache-2.0 license

use num_enum::{IntoPrimitive, TryFromPrimitive};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

pub const STATUS_SUCCESS: u32 = 0;
/// Placed in `status` by the requester before the message is published.
pub const STATUS_REQUEST_SENT: u32 = 0xFFFF_FFFC;

/// Command kinds carried in [`PraMessage::command`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum PraCommand {
    Reg32Get = 1,
    Reg32ClrSet = 2,
    Reg32Set = 3,
    Cm0Wakeup = 4,
    SysCfgFunc = 5,
    SecureOnly = 6,
    FuncPolicy = 7,
}

/// The fixed-size message exchanged through shared memory.
///
/// Field meaning depends on the command:
/// - `Reg32Get`: `data1` receives the register value.
/// - `Reg32ClrSet`: `data1` is the clear mask, `data2` the set mask.
/// - `Reg32Set`: `data1` is the new value.
/// - `SysCfgFunc`: `data1` is the shared-memory address of a [`crate::SystemConfig`].
/// - `SecureOnly` / `FuncPolicy`: `index` selects the function, `data1`/`data2` are its arguments.
#[repr(C)]
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct PraMessage {
    pub command: u16,
    pub index: u16,
    pub status: u32,
    pub data1: u32,
    pub data2: u32,
}

impl PraMessage {
    pub const SIZE: usize = core::mem::size_of::<Self>();

    /// Builds a request with its status marked as pending.
    pub fn request(command: PraCommand, index: u16, data1: u32, data2: u32) -> Self {
        PraMessage {
            command: command.into(),
            index,
            status: STATUS_REQUEST_SENT,
            data1,
            data2,
        }
    }

    pub fn command(&self) -> Option<PraCommand> {
        PraCommand::try_from(self.command).ok()
    }
}
