// Licensed under the Apache-2.0 license

use crate::test::{in_requester_thread, init_logging};
use pra_capsules::secure::{CM4_DP_FLAG, HIBERNATE_TOKEN};
use pra_comm::hil::IpcStruct;
use pra_common::{PraCommand, RegisterIndex};
use pra_emulator::{with_requester, Soc};
use pra_emulator_periph::EmuPlatform;
use pra_romtime::srss;

const WAKEUP_BITS: u32 = srss::PWR_HIBERNATE_MASK_HIBALARM_MSK | 0x0300_0000;

#[test]
fn test_hibernate_then_unfreeze() {
    init_logging();
    let soc = Soc::new(EmuPlatform::default());
    let pwr_hibernate = soc.platform().map().srss_offset + srss::PWR_HIBERNATE_OFFSET;
    soc.platform()
        .srss()
        .set_register(pwr_hibernate, WAKEUP_BITS | 0x55);

    let (armed, unfrozen) = soc
        .run(|platform| {
            with_requester(platform, |client| {
                assert_eq!(client.hibernate(0), Ok(()));
                let armed = client.reg32_get(RegisterIndex::SrssPwrHibernate);
                assert_eq!(client.hibernate(1), Ok(()));
                (armed, client.reg32_get(RegisterIndex::SrssPwrHibernate))
            })
        })
        .unwrap()
        .unwrap();

    assert_eq!(armed & srss::PWR_HIBERNATE_TOKEN_MSK, HIBERNATE_TOKEN);
    assert_eq!(armed & WAKEUP_BITS, WAKEUP_BITS);
    assert_ne!(armed & srss::PWR_HIBERNATE_FREEZE_MSK, 0);
    assert_ne!(armed & srss::PWR_HIBERNATE_HIBERNATE_MSK, 0);

    assert_eq!(unfrozen, HIBERNATE_TOKEN | WAKEUP_BITS);
}

#[test]
fn test_cm4_deep_sleep_flag() {
    init_logging();
    let soc = Soc::new(EmuPlatform::default());
    let ddft = soc.platform().ddft_channel().unwrap();
    ddft.write_data(0x5);

    let status = soc
        .run(|platform| with_requester(platform, |client| client.cm4_dp_flag_set()))
        .unwrap()
        .unwrap();

    assert_eq!(status, Ok(()));
    assert_eq!(ddft.read_data(), 0x5 | CM4_DP_FLAG);
    assert!(!ddft.is_lock_acquired());
    let stats = soc
        .platform()
        .ipc()
        .stats(soc.platform().map().ddft_ipc_channel)
        .unwrap();
    assert_eq!(stats.acquisitions, 1);
}

#[test]
fn test_delay_and_wakeup() {
    init_logging();
    let soc = Soc::new(EmuPlatform::default());
    soc.run(|platform| {
        with_requester(platform, |client| {
            assert_eq!(client.flash_ram_delay(25), Ok(()));
            assert_eq!(client.wakeup(), Ok(()));
        })
    })
    .unwrap()
    .unwrap();
    assert_eq!(soc.platform().srss().state().delayed_us, 25);
}

#[test]
fn test_unknown_secure_function_halts() {
    init_logging();
    let soc = Soc::new(EmuPlatform::default());
    soc.run(|platform| {
        let outcome = in_requester_thread(platform, |client| {
            client.send(PraCommand::SecureOnly, 9, 0, 0)
        });
        assert!(outcome.is_err());
    })
    .unwrap();
    assert_eq!(soc.platform().srss().state().delayed_us, 0);
}
