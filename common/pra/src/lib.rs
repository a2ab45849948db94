// Licensed under the Apache-2.0 license

//! Types shared by both sides of the protected register access (PRA) channel.

#![cfg_attr(target_arch = "arm", no_std)]

pub mod config;
pub mod error;
pub mod index;
pub mod message;
pub mod payload;

pub use config::*;
pub use error::{status_word, PraError, PraResult};
pub use index::{PolicyFunc, RegisterIndex, SecureOnlyFunc, REG_POLICY_TABLE_SIZE};
pub use message::{PraCommand, PraMessage, STATUS_REQUEST_SENT, STATUS_SUCCESS};
pub use payload::{EcoConfigurePayload, FllManualConfigPayload, PllManualConfigPayload};
