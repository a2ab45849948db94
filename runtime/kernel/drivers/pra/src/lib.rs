// Licensed under the Apache-2.0 license

#![cfg_attr(target_arch = "arm", no_std)]

pub mod hil;
