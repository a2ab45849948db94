// Licensed under the Apache-2.0 license

use core::num::NonZeroU32;

/// A non-success PRA status word.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PraError(pub NonZeroU32);
pub type PraResult<T> = Result<T, PraError>;

impl PraError {
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("PraError cannot be 0"),
        }
    }

    pub const ACCESS_DENIED: PraError = Self::new_const(0xFFFF_FFFF);
    pub const INVALID_PARAM: PraError = Self::new_const(0xFFFF_FFFE);
    pub const ERROR_PROCESSING: PraError = Self::new_const(0xFFFF_FFFD);

    // Invalid parameter, per clock domain
    pub const INVALID_PARAM_ECO: PraError = Self::new_const(0xFFFF_FFEF);
    pub const INVALID_PARAM_EXTCLK: PraError = Self::new_const(0xFFFF_FFEE);
    pub const INVALID_PARAM_ALTHF: PraError = Self::new_const(0xFFFF_FFED);
    pub const INVALID_PARAM_ILO: PraError = Self::new_const(0xFFFF_FFEC);
    pub const INVALID_PARAM_PILO: PraError = Self::new_const(0xFFFF_FFEB);
    pub const INVALID_PARAM_WCO: PraError = Self::new_const(0xFFFF_FFEA);
    pub const INVALID_PARAM_PATHMUX0: PraError = Self::new_const(0xFFFF_FFDF);
    pub const INVALID_PARAM_PATHMUX1: PraError = Self::new_const(0xFFFF_FFDE);
    pub const INVALID_PARAM_PATHMUX2: PraError = Self::new_const(0xFFFF_FFDD);
    pub const INVALID_PARAM_PATHMUX3: PraError = Self::new_const(0xFFFF_FFDC);
    pub const INVALID_PARAM_PATHMUX4: PraError = Self::new_const(0xFFFF_FFDB);
    pub const INVALID_PARAM_PATHMUX5: PraError = Self::new_const(0xFFFF_FFDA);
    pub const INVALID_PARAM_FLL0: PraError = Self::new_const(0xFFFF_FFCF);
    pub const INVALID_PARAM_PLL0: PraError = Self::new_const(0xFFFF_FFBF);
    pub const INVALID_PARAM_PLL1: PraError = Self::new_const(0xFFFF_FFBE);
    pub const INVALID_PARAM_CLKLF: PraError = Self::new_const(0xFFFF_FFAF);
    pub const INVALID_PARAM_CLKHF0: PraError = Self::new_const(0xFFFF_FF9F);
    pub const INVALID_PARAM_CLKHF1: PraError = Self::new_const(0xFFFF_FF9E);
    pub const INVALID_PARAM_CLKHF2: PraError = Self::new_const(0xFFFF_FF9D);
    pub const INVALID_PARAM_CLKHF3: PraError = Self::new_const(0xFFFF_FF9C);
    pub const INVALID_PARAM_CLKHF4: PraError = Self::new_const(0xFFFF_FF9B);
    pub const INVALID_PARAM_CLKHF5: PraError = Self::new_const(0xFFFF_FF9A);
    pub const INVALID_PARAM_CLKPUMP: PraError = Self::new_const(0xFFFF_FF8F);
    pub const INVALID_PARAM_CLKBAK: PraError = Self::new_const(0xFFFF_FF8E);
    pub const INVALID_PARAM_CLKFAST: PraError = Self::new_const(0xFFFF_FF8D);
    pub const INVALID_PARAM_CLKPERI: PraError = Self::new_const(0xFFFF_FF8C);
    pub const INVALID_PARAM_CLKSLOW: PraError = Self::new_const(0xFFFF_FF8B);
    pub const INVALID_PARAM_SYSTICK: PraError = Self::new_const(0xFFFF_FF8A);
    pub const INVALID_PARAM_CLKTIMER: PraError = Self::new_const(0xFFFF_FF89);

    // Error while applying, per clock domain
    pub const ERROR_PROCESSING_PWR: PraError = Self::new_const(0xFFFF_FF6F);
    pub const ERROR_PROCESSING_ECO: PraError = Self::new_const(0xFFFF_FF5F);
    pub const ERROR_PROCESSING_EXTCLK: PraError = Self::new_const(0xFFFF_FF5E);
    pub const ERROR_PROCESSING_ALTHF: PraError = Self::new_const(0xFFFF_FF5D);
    pub const ERROR_PROCESSING_ILO: PraError = Self::new_const(0xFFFF_FF5C);
    pub const ERROR_PROCESSING_PILO: PraError = Self::new_const(0xFFFF_FF5B);
    pub const ERROR_PROCESSING_WCO: PraError = Self::new_const(0xFFFF_FF5A);
    pub const ERROR_PROCESSING_PATHMUX0: PraError = Self::new_const(0xFFFF_FF4F);
    pub const ERROR_PROCESSING_PATHMUX1: PraError = Self::new_const(0xFFFF_FF4E);
    pub const ERROR_PROCESSING_PATHMUX2: PraError = Self::new_const(0xFFFF_FF4D);
    pub const ERROR_PROCESSING_PATHMUX3: PraError = Self::new_const(0xFFFF_FF4C);
    pub const ERROR_PROCESSING_PATHMUX4: PraError = Self::new_const(0xFFFF_FF4B);
    pub const ERROR_PROCESSING_PATHMUX5: PraError = Self::new_const(0xFFFF_FF4A);
    pub const ERROR_PROCESSING_FLL0: PraError = Self::new_const(0xFFFF_FF3F);
    pub const ERROR_PROCESSING_PLL0: PraError = Self::new_const(0xFFFF_FF2F);
    pub const ERROR_PROCESSING_PLL1: PraError = Self::new_const(0xFFFF_FF2E);
    pub const ERROR_PROCESSING_CLKLF: PraError = Self::new_const(0xFFFF_FF1F);
    pub const ERROR_PROCESSING_CLKHF0: PraError = Self::new_const(0xFFFF_FF0F);
    pub const ERROR_PROCESSING_CLKHF1: PraError = Self::new_const(0xFFFF_FF0E);
    pub const ERROR_PROCESSING_CLKHF2: PraError = Self::new_const(0xFFFF_FF0D);
    pub const ERROR_PROCESSING_CLKHF3: PraError = Self::new_const(0xFFFF_FF0C);
    pub const ERROR_PROCESSING_CLKHF4: PraError = Self::new_const(0xFFFF_FF0B);
    pub const ERROR_PROCESSING_CLKHF5: PraError = Self::new_const(0xFFFF_FF0A);
    pub const ERROR_PROCESSING_CLKPUMP: PraError = Self::new_const(0xFFFF_FEFF);
    pub const ERROR_PROCESSING_CLKBAK: PraError = Self::new_const(0xFFFF_FEFE);
    pub const ERROR_PROCESSING_CLKFAST: PraError = Self::new_const(0xFFFF_FEFD);
    pub const ERROR_PROCESSING_CLKPERI: PraError = Self::new_const(0xFFFF_FEFC);
    pub const ERROR_PROCESSING_CLKSLOW: PraError = Self::new_const(0xFFFF_FEFB);
    pub const ERROR_PROCESSING_SYSTICK: PraError = Self::new_const(0xFFFF_FEFA);
    pub const ERROR_PROCESSING_CLKTIMER: PraError = Self::new_const(0xFFFF_FEF9);

    const INVALID_PARAM_PATHMUX: [PraError; 6] = [
        Self::INVALID_PARAM_PATHMUX0,
        Self::INVALID_PARAM_PATHMUX1,
        Self::INVALID_PARAM_PATHMUX2,
        Self::INVALID_PARAM_PATHMUX3,
        Self::INVALID_PARAM_PATHMUX4,
        Self::INVALID_PARAM_PATHMUX5,
    ];
    const INVALID_PARAM_CLKHF: [PraError; 6] = [
        Self::INVALID_PARAM_CLKHF0,
        Self::INVALID_PARAM_CLKHF1,
        Self::INVALID_PARAM_CLKHF2,
        Self::INVALID_PARAM_CLKHF3,
        Self::INVALID_PARAM_CLKHF4,
        Self::INVALID_PARAM_CLKHF5,
    ];
    const ERROR_PROCESSING_PATHMUX: [PraError; 6] = [
        Self::ERROR_PROCESSING_PATHMUX0,
        Self::ERROR_PROCESSING_PATHMUX1,
        Self::ERROR_PROCESSING_PATHMUX2,
        Self::ERROR_PROCESSING_PATHMUX3,
        Self::ERROR_PROCESSING_PATHMUX4,
        Self::ERROR_PROCESSING_PATHMUX5,
    ];
    const ERROR_PROCESSING_CLKHF: [PraError; 6] = [
        Self::ERROR_PROCESSING_CLKHF0,
        Self::ERROR_PROCESSING_CLKHF1,
        Self::ERROR_PROCESSING_CLKHF2,
        Self::ERROR_PROCESSING_CLKHF3,
        Self::ERROR_PROCESSING_CLKHF4,
        Self::ERROR_PROCESSING_CLKHF5,
    ];

    /// Invalid-parameter code for path mux `path`. Out-of-range paths map to
    /// the generic code.
    pub fn invalid_param_pathmux(path: usize) -> PraError {
        Self::INVALID_PARAM_PATHMUX
            .get(path)
            .copied()
            .unwrap_or(Self::INVALID_PARAM)
    }

    pub fn invalid_param_clkhf(hf: usize) -> PraError {
        Self::INVALID_PARAM_CLKHF
            .get(hf)
            .copied()
            .unwrap_or(Self::INVALID_PARAM)
    }

    pub fn error_processing_pathmux(path: usize) -> PraError {
        Self::ERROR_PROCESSING_PATHMUX
            .get(path)
            .copied()
            .unwrap_or(Self::ERROR_PROCESSING)
    }

    pub fn error_processing_clkhf(hf: usize) -> PraError {
        Self::ERROR_PROCESSING_CLKHF
            .get(hf)
            .copied()
            .unwrap_or(Self::ERROR_PROCESSING)
    }

    /// `pll` is the configuration slot (0 or 1), not the hardware PLL number.
    pub fn invalid_param_pll(pll: usize) -> PraError {
        if pll == 0 {
            Self::INVALID_PARAM_PLL0
        } else {
            Self::INVALID_PARAM_PLL1
        }
    }

    pub fn error_processing_pll(pll: usize) -> PraError {
        if pll == 0 {
            Self::ERROR_PROCESSING_PLL0
        } else {
            Self::ERROR_PROCESSING_PLL1
        }
    }

    /// Splits a raw status word into success or an error.
    pub fn from_status(status: u32) -> PraResult<()> {
        match NonZeroU32::new(status) {
            None => Ok(()),
            Some(err) => Err(PraError(err)),
        }
    }

    pub fn is_invalid_param(&self) -> bool {
        let v = self.0.get();
        v == Self::INVALID_PARAM.0.get() || (0xFFFF_FF80..=0xFFFF_FFEF).contains(&v)
    }

    pub fn is_error_processing(&self) -> bool {
        let v = self.0.get();
        v == Self::ERROR_PROCESSING.0.get() || (0xFFFF_FEF0..=0xFFFF_FF6F).contains(&v)
    }
}

impl From<PraError> for u32 {
    fn from(err: PraError) -> Self {
        err.0.get()
    }
}

/// Flattens a result into the status word carried on the wire.
pub fn status_word(result: PraResult<()>) -> u32 {
    match result {
        Ok(()) => crate::message::STATUS_SUCCESS,
        Err(err) => err.into(),
    }
}
