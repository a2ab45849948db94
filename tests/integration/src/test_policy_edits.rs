// Licensed under the Apache-2.0 license

use crate::test::{in_requester_thread, init_logging};
use pra_comm::hil::SysClk;
use pra_common::{ClkPath, PolicyFunc, PraError, RegisterIndex, SystemConfig};
use pra_emulator::{with_requester, Soc};
use pra_emulator_periph::EmuPlatform;
use pra_romtime::srss;

#[test]
fn test_rejected_edit_leaves_hardware_untouched() {
    init_logging();
    let soc = Soc::new(EmuPlatform::default());
    let srss = soc.platform().srss();

    soc.run(|platform| {
        with_requester(platform, |client| {
            assert_eq!(client.system_config(&SystemConfig::default()), Ok(()));
            let before = (srss.state(), srss.hf_get_source(0), srss.hf_enabled(0));

            assert_eq!(
                client.policy(PolicyFunc::HfDisable, 0, 0),
                Err(PraError::INVALID_PARAM_CLKHF0)
            );
            assert_eq!(
                (srss.state(), srss.hf_get_source(0), srss.hf_enabled(0)),
                before
            );

            // The rejected edit is still the configuration on record, so
            // undoing it is an edit like any other.
            assert_eq!(
                client.policy(PolicyFunc::FastSetDivider, 1, 0),
                Err(PraError::INVALID_PARAM_CLKHF0)
            );
            assert_eq!(client.policy(PolicyFunc::HfEnable, 0, 0), Ok(()));
        })
    })
    .unwrap()
    .unwrap();

    assert_eq!(srss.state().fast_div, 1);
}

#[test]
fn test_primitive_failure_is_reported() {
    init_logging();
    let soc = Soc::new(EmuPlatform::default());
    soc.platform().srss().inject_fault("wco_enable");

    let mut cfg = SystemConfig::default();
    cfg.wco_enable = true;
    let status = soc
        .run(|platform| with_requester(platform, |client| client.system_config(&cfg)))
        .unwrap()
        .unwrap();

    assert_eq!(status, Err(PraError::ERROR_PROCESSING_WCO));
    assert!(!soc.platform().srss().state().wco);
}

#[test]
fn test_pilo_trim_needs_enabled_pilo() {
    init_logging();
    let soc = Soc::new(EmuPlatform::default());
    soc.run(|platform| {
        with_requester(platform, |client| {
            assert_eq!(client.system_config(&SystemConfig::default()), Ok(()));
            assert_eq!(
                client.policy(PolicyFunc::PiloSetTrim, 0x55, 0),
                Err(PraError::INVALID_PARAM_PILO)
            );
            assert_eq!(client.policy(PolicyFunc::PiloEnable, 0, 0), Ok(()));
            assert_eq!(client.policy(PolicyFunc::PiloSetTrim, 0x55, 0), Ok(()));
        })
    })
    .unwrap()
    .unwrap();
    assert_eq!(soc.platform().srss().state().pilo_trim, Some(0x55));
}

#[test]
fn test_hf_source_edit_moves_root() {
    init_logging();
    let soc = Soc::new(EmuPlatform::default());
    let mut cfg = SystemConfig::default();
    cfg.path[1].enable = true;

    let root2 = soc
        .run(|platform| {
            with_requester(platform, |client| {
                assert_eq!(client.system_config(&cfg), Ok(()));
                assert_eq!(
                    client.policy(PolicyFunc::HfSetSource, 2, ClkPath::Path1.into()),
                    Ok(())
                );
                assert_eq!(client.policy(PolicyFunc::HfEnable, 2, 0), Ok(()));
                client.reg32_get(RegisterIndex::SrssClkRootSelect2)
            })
        })
        .unwrap()
        .unwrap();

    assert_eq!(root2, 0x8000_0001);
    assert_eq!(soc.platform().srss().hf_get_source(2), Some(ClkPath::Path1));
}

#[test]
fn test_masked_write_halts_and_keeps_register() {
    init_logging();
    let soc = Soc::new(EmuPlatform::default());
    let pwr_hibernate = soc.platform().map().srss_offset + srss::PWR_HIBERNATE_OFFSET;
    soc.platform().srss().set_register(pwr_hibernate, 0x1b);

    soc.run(|platform| {
        let outcome = in_requester_thread(platform, |client| {
            client.reg32_set(
                RegisterIndex::SrssPwrHibernate,
                srss::PWR_HIBERNATE_HIBERNATE_MSK,
            )
        });
        assert!(outcome.is_err());

        let allowed = in_requester_thread(platform, |client| {
            client.reg32_clr_set(
                RegisterIndex::SrssPwrHibernate,
                0,
                srss::PWR_HIBERNATE_MASK_HIBPIN_MSK,
            )
        });
        assert_eq!(allowed.unwrap(), Ok(()));
    })
    .unwrap();

    assert_eq!(
        soc.platform().srss().register(pwr_hibernate),
        srss::PWR_HIBERNATE_MASK_HIBPIN_MSK
    );
}
