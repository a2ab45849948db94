/*++

Licensed under the Apache-2.0 license.

File Name:

    soc.rs

Abstract:

    Runs the PRA secure core and its non-secure requesters on host threads.

--*/

use anyhow::anyhow;
use log::info;
use pra_capsules::dispatch::Dispatcher;
use pra_capsules::responder::PraResponder;
use pra_capsules::Hardware;
use pra_config::PraMemoryMap;
use pra_emulator_periph::{EmuPlatform, EmulatorError, PanicHalt};
use pra_lib::{PraClient, SharedSlots};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Offset of the requester's argument block from the start of shared SRAM.
const PAYLOAD_SLOT_OFFSET: u32 = 0x40;

/// Message and argument blocks used by emulated requesters.
pub fn shared_slots(map: &PraMemoryMap) -> SharedSlots {
    SharedSlots {
        msg_addr: map.shared_sram_offset,
        payload_addr: map.shared_sram_offset + PAYLOAD_SLOT_OFFSET,
    }
}

/// Serves PRA requests on the calling thread until `stop` is set.
///
/// # Returns
///
/// The number of requests served.
pub fn run_secure_core(platform: &EmuPlatform, stop: &AtomicBool) -> Result<u64, EmulatorError> {
    let channel = platform.pra_channel()?;
    let intr = platform.pra_interrupt()?;
    let ddft = platform.ddft_channel()?;
    let srss = platform.srss();

    let hw = Hardware {
        regs: srss,
        shared_mem: platform.sram(),
        clk: srss,
        pm: srss,
        sys: srss,
        gpio: srss,
        ddft: &ddft,
    };
    let dispatcher = Dispatcher::new(hw, platform.map(), platform.device());
    let responder = PraResponder::new(
        dispatcher,
        &channel,
        &intr,
        platform.map().pra_channel_mask(),
    );
    responder.init();

    let mut served = 0;
    while !stop.load(Ordering::Acquire) {
        if intr.is_pending() {
            responder.handle_interrupt();
            served += 1;
        } else {
            thread::yield_now();
        }
    }
    info!("secure core stopped after {} requests", served);
    Ok(served)
}

/// Runs `f` with a requester on the PRA channel of `platform`.
///
/// An `ACCESS_DENIED` reply halts the requester by panicking its thread.
pub fn with_requester<R>(
    platform: &EmuPlatform,
    f: impl FnOnce(&PraClient<'_>) -> R,
) -> Result<R, EmulatorError> {
    let channel = platform.pra_channel()?;
    let client = PraClient::new(
        &channel,
        platform.sram(),
        &PanicHalt,
        platform.map().pra_notify_mask(),
        shared_slots(platform.map()),
    );
    Ok(f(&client))
}

struct StopOnDrop<'a>(&'a AtomicBool);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// A two-core part: the secure core runs on its own thread while the caller
/// plays the non-secure core.
pub struct Soc {
    platform: EmuPlatform,
}

impl Soc {
    pub fn new(platform: EmuPlatform) -> Self {
        Soc { platform }
    }

    pub fn platform(&self) -> &EmuPlatform {
        &self.platform
    }

    /// Starts the secure core, runs `f` on the calling thread and stops the
    /// secure core once `f` returns or unwinds.
    pub fn run<R>(&self, f: impl FnOnce(&EmuPlatform) -> R) -> anyhow::Result<R> {
        let stop = AtomicBool::new(false);
        thread::scope(|s| {
            let secure = s.spawn(|| run_secure_core(&self.platform, &stop));
            let result = {
                let _stop = StopOnDrop(&stop);
                f(&self.platform)
            };
            secure
                .join()
                .map_err(|_| anyhow!("secure core panicked"))??;
            Ok(result)
        })
    }
}
