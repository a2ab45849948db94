// Licensed under the Apache-2.0 license

//! The secure core's record of the clock tree it has been asked to run.

use crate::configure::ClockTreeConfigurator;
use core::cell::Cell;
use log::{debug, warn};
use pra_common::{PraError, PraResult, SystemConfig};

/// Holds the last whole configuration and every field edit applied since.
///
/// Field edits are refused until a whole configuration has been accepted;
/// an edit operates on the stored copy and re-applies the whole tree.
pub struct ConfigStore {
    config: Cell<SystemConfig>,
    initialized: Cell<bool>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        ConfigStore {
            config: Cell::new(SystemConfig::default()),
            initialized: Cell::new(false),
        }
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> SystemConfig {
        self.config.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Records `cfg` and applies it.
    ///
    /// The record is replaced even if validation or configuration fails; the
    /// store only becomes initialized once a whole configuration applies
    /// cleanly.
    pub fn apply_whole(
        &self,
        cfg: SystemConfig,
        clocks: &ClockTreeConfigurator<'_>,
    ) -> PraResult<()> {
        self.config.set(cfg);
        clocks.apply(&cfg)?;
        if !self.initialized.replace(true) {
            debug!("PRA: configuration store initialized");
        }
        Ok(())
    }

    /// Edits one or more fields of the stored configuration and re-applies it.
    ///
    /// # Arguments
    ///
    /// * `clocks` - Configurator the edited tree is applied with.
    /// * `edit` - Mutates a copy of the stored configuration. An error here
    ///   leaves the store untouched.
    ///
    /// # Returns
    ///
    /// * `Err(PraError::ACCESS_DENIED)` if no whole configuration has been applied.
    /// * The edit's error, or the result of validating and applying the edited tree.
    ///   A tree that fails validation or configuration is still kept.
    pub fn apply_field<F>(&self, clocks: &ClockTreeConfigurator<'_>, edit: F) -> PraResult<()>
    where
        F: FnOnce(&mut SystemConfig) -> PraResult<()>,
    {
        if !self.initialized.get() {
            warn!("PRA: field edit before whole configuration");
            return Err(PraError::ACCESS_DENIED);
        }
        let mut cfg = self.config.get();
        edit(&mut cfg)?;
        self.config.set(cfg);
        clocks.apply(&cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::MockPlatform;
    use pra_config::DeviceConfig;

    #[test]
    fn test_edit_refused_until_initialized() {
        let platform = MockPlatform::new();
        let clocks = ClockTreeConfigurator::new(&platform.hardware(), DeviceConfig::default());
        let store = ConfigStore::new();

        let result = store.apply_field(&clocks, |cfg| {
            cfg.clk_fast_div = 1;
            Ok(())
        });
        assert_eq!(result, Err(PraError::ACCESS_DENIED));
        assert!(!platform.touched_hardware());
        assert_eq!(store.config(), SystemConfig::default());
    }

    #[test]
    fn test_whole_then_edit() {
        let platform = MockPlatform::new();
        let clocks = ClockTreeConfigurator::new(&platform.hardware(), DeviceConfig::default());
        let store = ConfigStore::new();

        assert_eq!(store.apply_whole(SystemConfig::default(), &clocks), Ok(()));
        assert!(store.is_initialized());

        platform.clear_calls();
        let result = store.apply_field(&clocks, |cfg| {
            cfg.clk_fast_div = 1;
            Ok(())
        });
        assert_eq!(result, Ok(()));
        assert_eq!(store.config().clk_fast_div, 1);
        assert!(platform.called("fast_set_divider(1)"));
    }

    #[test]
    fn test_failed_whole_keeps_record_but_not_initialized() {
        let platform = MockPlatform::new();
        let clocks = ClockTreeConfigurator::new(&platform.hardware(), DeviceConfig::default());
        let store = ConfigStore::new();

        let mut cfg = SystemConfig::default();
        cfg.hf[0].out_freq_mhz = 500;
        assert_eq!(
            store.apply_whole(cfg, &clocks),
            Err(PraError::INVALID_PARAM_CLKHF0)
        );
        assert_eq!(store.config(), cfg);
        assert!(!store.is_initialized());
    }

    #[test]
    fn test_edit_error_leaves_store_unchanged() {
        let platform = MockPlatform::new();
        let clocks = ClockTreeConfigurator::new(&platform.hardware(), DeviceConfig::default());
        let store = ConfigStore::new();
        assert_eq!(store.apply_whole(SystemConfig::default(), &clocks), Ok(()));

        platform.clear_calls();
        let result = store.apply_field(&clocks, |cfg| {
            cfg.clk_fast_div = 7;
            Err(PraError::INVALID_PARAM_CLKFAST)
        });
        assert_eq!(result, Err(PraError::INVALID_PARAM_CLKFAST));
        assert_eq!(store.config().clk_fast_div, 0);
        assert!(!platform.touched_hardware());
    }

    #[test]
    fn test_rejected_edit_is_kept() {
        let platform = MockPlatform::new();
        let clocks = ClockTreeConfigurator::new(&platform.hardware(), DeviceConfig::default());
        let store = ConfigStore::new();
        assert_eq!(store.apply_whole(SystemConfig::default(), &clocks), Ok(()));

        let result = store.apply_field(&clocks, |cfg| {
            cfg.hf[0].enable = false;
            Ok(())
        });
        assert_eq!(result, Err(PraError::INVALID_PARAM_CLKHF0));
        assert!(!store.config().hf[0].enable);
        assert!(store.is_initialized());
    }
}
