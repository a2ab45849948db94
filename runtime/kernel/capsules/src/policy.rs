// Licensed under the Apache-2.0 license

//! The register policy table: which registers the non-secure core may touch
//! and which bits of them stay reserved for the secure core.

use pra_common::{RegisterIndex, REG_POLICY_TABLE_SIZE};
use pra_config::{DeviceConfig, PraMemoryMap};
use pra_romtime::{cpuss, flashc, srss};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegPolicy {
    pub addr: u32,
    /// Bits the requester may not set.
    pub write_mask: u32,
}

impl RegPolicy {
    /// True if writing `bits` leaves every protected bit clear.
    pub fn allows(&self, bits: u32) -> bool {
        bits & self.write_mask == 0
    }
}

pub struct RegPolicyTable {
    entries: [RegPolicy; REG_POLICY_TABLE_SIZE],
}

impl RegPolicyTable {
    pub fn new(map: &PraMemoryMap, device: &DeviceConfig) -> Self {
        let mut table = RegPolicyTable {
            entries: [RegPolicy::default(); REG_POLICY_TABLE_SIZE],
        };
        let srss_reg = |offset: u32| map.srss_offset + offset;

        table.set(RegisterIndex::SrssPwrLvdCtl, srss_reg(srss::PWR_LVD_CTL_OFFSET), 0);
        table.set(RegisterIndex::SrssIntr, srss_reg(srss::SRSS_INTR_OFFSET), 0);
        table.set(RegisterIndex::SrssIntrSet, srss_reg(srss::SRSS_INTR_SET_OFFSET), 0);
        table.set(RegisterIndex::SrssIntrMask, srss_reg(srss::SRSS_INTR_MASK_OFFSET), 0);
        table.set(RegisterIndex::SrssIntrCfg, srss_reg(srss::SRSS_INTR_CFG_OFFSET), 0);
        for root in 1..=6u16 {
            let present = match root {
                5 => device.num_hf_roots > 4,
                6 => device.num_hf_roots > 5,
                _ => true,
            };
            if let (true, Some(index)) = (present, RegisterIndex::clk_root_select(root)) {
                table.set(
                    index,
                    srss_reg(srss::clk_root_select_offset(root as u32)),
                    0,
                );
            }
        }
        table.set(
            RegisterIndex::FlashcFlashCmd,
            map.flashc_offset + flashc::FLASH_CMD_OFFSET,
            0,
        );
        table.set(
            RegisterIndex::CpussCm4PwrCtl,
            map.cpuss_offset + cpuss::CM4_PWR_CTL_OFFSET,
            0,
        );
        table.set(RegisterIndex::SrssPwrCtl, srss_reg(srss::PWR_CTL_OFFSET), 0);
        table.set(
            RegisterIndex::SrssPwrHibernate,
            srss_reg(srss::PWR_HIBERNATE_OFFSET),
            !(srss::PWR_HIBERNATE_TOKEN_MSK
                | srss::PWR_HIBERNATE_POLARITY_HIBPIN_MSK
                | srss::PWR_HIBERNATE_MASK_HIBPIN_MSK),
        );
        table
    }

    fn set(&mut self, index: RegisterIndex, addr: u32, write_mask: u32) {
        self.entries[u16::from(index) as usize] = RegPolicy { addr, write_mask };
    }

    /// Returns the policy for `index`, or `None` if the index is out of range
    /// or the register does not exist on this device.
    pub fn lookup(&self, index: u16) -> Option<RegPolicy> {
        self.entries
            .get(index as usize)
            .copied()
            .filter(|entry| entry.addr != 0)
    }
}
