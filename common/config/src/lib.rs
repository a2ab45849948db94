// Licensed under the Apache-2.0 license

#![cfg_attr(target_arch = "arm", no_std)]

/// Capabilities of the silicon variant the secure core runs on.
/// These are fixed per part number and are consulted by the clock-tree validator
/// and when the register policy table is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Number of CLK_HF roots implemented (CLK_HF0 included).
    pub num_hf_roots: u32,
    /// Number of PLLs implemented. PLL numbering starts at 1 in hardware.
    pub num_plls: u32,
    /// Maximum legal CLK_HF frequency in Hz.
    pub hf_clk_max_freq_hz: u32,
    /// Whether the BLE ECO (ALTHF) oscillator is present.
    pub has_alt_hf: bool,
    /// Number of GPIO ports; an external clock pin must sit on one of them.
    pub num_gpio_ports: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            num_hf_roots: 5,
            num_plls: 2,
            hf_clk_max_freq_hz: 150_000_000,
            has_alt_hf: true,
            num_gpio_ports: 15,
        }
    }
}

impl DeviceConfig {
    pub fn has_hf_root(&self, root: u32) -> bool {
        root < self.num_hf_roots
    }

    /// `pll` uses hardware numbering (1-based).
    pub fn has_pll(&self, pll: u32) -> bool {
        pll >= 1 && pll <= self.num_plls
    }

    pub fn has_gpio_port(&self, port: u32) -> bool {
        port < self.num_gpio_ports
    }
}

/// Configures the memory map shared by the secure and non-secure cores.
/// These are the defaults that can be overridden for other parts.
#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PraMemoryMap {
    pub srss_offset: u32,
    pub srss_size: u32,
    pub cpuss_offset: u32,
    pub flashc_offset: u32,
    pub ipc_offset: u32,
    pub ipc_intr_offset: u32,
    pub shared_sram_offset: u32,
    pub shared_sram_size: u32,
    pub pra_ipc_channel: u32,
    pub pra_ipc_intr: u32,
    pub ddft_ipc_channel: u32,
}

impl Default for PraMemoryMap {
    fn default() -> Self {
        PraMemoryMap {
            srss_offset: 0x4026_0000,
            srss_size: 0x1_0000,
            cpuss_offset: 0x4021_0000,
            flashc_offset: 0x4024_0000,
            ipc_offset: 0x4023_0000,
            ipc_intr_offset: 0x4023_1000,
            shared_sram_offset: 0x0804_7000,
            shared_sram_size: 0x1000,
            pra_ipc_channel: 14,
            pra_ipc_intr: 1,
            ddft_ipc_channel: 5,
        }
    }
}

/// Byte stride between consecutive IPC structures and IPC interrupt structures.
pub const IPC_STRUCT_STRIDE: u32 = 0x20;

impl PraMemoryMap {
    /// Notify mask raised on the PRA interrupt structure.
    pub const fn pra_notify_mask(&self) -> u32 {
        1 << self.pra_ipc_intr
    }

    /// Channel bit the secure core unmasks and acknowledges in its interrupt structure.
    pub const fn pra_channel_mask(&self) -> u32 {
        1 << self.pra_ipc_channel
    }

    pub const fn ipc_struct_addr(&self, channel: u32) -> u32 {
        self.ipc_offset + channel * IPC_STRUCT_STRIDE
    }

    pub const fn ipc_intr_struct_addr(&self, intr: u32) -> u32 {
        self.ipc_intr_offset + intr * IPC_STRUCT_STRIDE
    }

    /// Returns true if `len` bytes starting at `addr` lie inside the shared SRAM window.
    pub fn in_shared_sram(&self, addr: u32, len: usize) -> bool {
        let start = addr as u64;
        let end = start + len as u64;
        let window_end = self.shared_sram_offset as u64 + self.shared_sram_size as u64;
        start >= self.shared_sram_offset as u64 && end <= window_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_window_bounds() {
        let map = PraMemoryMap::default();
        assert!(map.in_shared_sram(map.shared_sram_offset, 16));
        assert!(map.in_shared_sram(
            map.shared_sram_offset + map.shared_sram_size - 16,
            16
        ));
        assert!(!map.in_shared_sram(
            map.shared_sram_offset + map.shared_sram_size - 8,
            16
        ));
        assert!(!map.in_shared_sram(map.shared_sram_offset - 4, 8));
        assert!(!map.in_shared_sram(u32::MAX, 16));
    }

    #[test]
    fn test_channel_addresses() {
        let map = PraMemoryMap::default();
        assert_eq!(map.pra_notify_mask(), 0x2);
        assert_eq!(map.pra_channel_mask(), 0x4000);
        assert_eq!(map.ipc_struct_addr(14), 0x4023_01c0);
        assert_eq!(map.ipc_intr_struct_addr(1), 0x4023_1020);
    }

    #[test]
    fn test_device_capabilities() {
        let dev = DeviceConfig::default();
        assert!(dev.has_hf_root(4));
        assert!(!dev.has_hf_root(5));
        assert!(!dev.has_pll(0));
        assert!(dev.has_pll(2));
        assert!(!dev.has_pll(3));
        assert!(dev.has_gpio_port(14));
        assert!(!dev.has_gpio_port(15));
    }
}
