// Licensed under the Apache-2.0 license

use crate::test::{in_requester_thread, init_logging};
use pra_capsules::validate::validate;
use pra_comm::hil::{IpcStruct, SysClk};
use pra_common::{
    ClkPath, ClkPathSource, PolicyFunc, PraCommand, PraError, PraMessage, RegisterIndex,
    SystemConfig,
};
use pra_config::DeviceConfig;
use pra_emulator::{shared_slots, with_requester, Soc};
use pra_emulator_periph::{EmuPlatform, SystemState};
use pra_romtime::srss::clk_root_select_offset;
use std::thread;
use zerocopy::FromBytes;

const ROOT_MUX_MASK: u32 = 0xf;
const ROOT_ENABLE: u32 = 1 << 31;

fn hf0_at_100mhz() -> SystemConfig {
    let mut cfg = SystemConfig::default();
    cfg.path[0].source = ClkPathSource::Imo;
    cfg.path[0].enable = true;
    cfg.hf[0].source = ClkPath::Path0;
    cfg.hf[0].out_freq_mhz = 100;
    cfg.hf[0].enable = true;
    cfg
}

#[test]
fn test_imo_path0_drives_hf0() {
    init_logging();
    let cfg = hf0_at_100mhz();
    assert_eq!(validate(&cfg, &DeviceConfig::default()), Ok(()));

    let soc = Soc::new(EmuPlatform::default());
    let (status, root1) = soc
        .run(|platform| {
            with_requester(platform, |client| {
                let status = client.system_config(&cfg);
                // CLK_HF1 is left on its reset path so its root register is readable.
                assert_eq!(client.policy(PolicyFunc::HfEnable, 1, 0), Ok(()));
                (status, client.reg32_get(RegisterIndex::SrssClkRootSelect1))
            })
        })
        .unwrap()
        .unwrap();

    assert_eq!(status, Ok(()));
    assert_eq!(root1 & ROOT_MUX_MASK, u32::from(ClkPath::Path0));
    assert_eq!(root1 & ROOT_ENABLE, ROOT_ENABLE);

    let srss = soc.platform().srss();
    assert_eq!(srss.hf_get_source(0), Some(ClkPath::Path0));
    assert!(srss.hf_enabled(0));
    assert_eq!(srss.path_get_source(0), Some(ClkPathSource::Imo));
    let root0 = srss.register(soc.platform().map().srss_offset + clk_root_select_offset(0));
    assert_eq!(root0 & ROOT_MUX_MASK, 0);
    assert!(srss.state().core_clock_updates > 0);
}

#[test]
fn test_hf0_over_ceiling_touches_nothing() {
    init_logging();
    let mut cfg = hf0_at_100mhz();
    cfg.hf[0].out_freq_mhz = 500;
    assert_eq!(
        validate(&cfg, &DeviceConfig::default()),
        Err(PraError::INVALID_PARAM_CLKHF0)
    );

    let soc = Soc::new(EmuPlatform::default());
    let status = soc
        .run(|platform| with_requester(platform, |client| client.system_config(&cfg)))
        .unwrap()
        .unwrap();

    assert_eq!(status, Err(PraError::INVALID_PARAM_CLKHF0));
    let srss = soc.platform().srss();
    assert_eq!(srss.state(), SystemState::default());
    assert!(!srss.hf_enabled(0));
}

#[test]
fn test_policy_before_first_configuration_halts_requester() {
    init_logging();
    let soc = Soc::new(EmuPlatform::default());
    soc.run(|platform| {
        let outcome = in_requester_thread(platform, |client| {
            client.policy(PolicyFunc::PllEnable, 0, 0)
        });
        assert!(outcome.is_err());

        let mut bytes = [0u8; 16];
        platform
            .sram()
            .read(shared_slots(platform.map()).msg_addr, &mut bytes)
            .unwrap();
        let reply = PraMessage::read_from_bytes(&bytes[..]).unwrap();
        assert_eq!(reply.command, u16::from(PraCommand::FuncPolicy));
        assert_eq!(reply.status, u32::from(PraError::ACCESS_DENIED));
        assert!(!platform.pra_channel().unwrap().is_lock_acquired());
    })
    .unwrap();

    let state = soc.platform().srss().state();
    assert!(state.plls.is_empty());
    assert!(state.plls_locked.is_empty());
}

#[test]
fn test_concurrent_requesters_serialise() {
    init_logging();
    const ROUNDS: u32 = 200;
    let soc = Soc::new(EmuPlatform::default());

    soc.run(|platform| {
        thread::scope(|s| {
            let requesters = [RegisterIndex::SrssIntrMask, RegisterIndex::SrssIntrCfg].map(
                |index| {
                    s.spawn(move || {
                        with_requester(platform, |client| {
                            for round in 0..ROUNDS {
                                let value = (u32::from(u16::from(index)) << 16) | round;
                                assert_eq!(client.reg32_set(index, value), Ok(()));
                                assert_eq!(client.reg32_get(index), value);
                            }
                        })
                    })
                },
            );
            for requester in requesters {
                requester.join().unwrap().unwrap();
            }
        });
    })
    .unwrap();

    let stats = soc
        .platform()
        .ipc()
        .stats(soc.platform().map().pra_ipc_channel)
        .unwrap();
    assert_eq!(stats.acquisitions, u64::from(4 * ROUNDS));
    assert_eq!(stats.notifications, u64::from(4 * ROUNDS));
    assert_eq!(stats.contended, 0);
}
