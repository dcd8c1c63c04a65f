use log::error;
use thiserror::Error;

use crate::def::*;

/* retq stands for Rust Essential Transform and Quantization */

/*****************************************************************************
 * return values and error codes
 *****************************************************************************/
#[derive(Debug, Error, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy)]
pub enum TqError {
    /* generic error */
    #[error("generic error")]
    TQ_ERR = -1,
    #[error("invalid argument")]
    TQ_ERR_INVALID_ARGUMENT = -101,
    #[error("unsupported feature or parameter")]
    TQ_ERR_UNSUPPORTED = -104,
    #[error("unsupported transform block size")]
    TQ_ERR_UNSUPPORTED_SIZE = -106,
    /* unknown error */
    #[error("unknown error")]
    TQ_ERR_UNKNOWN = -32767,
}

pub const MIN_BIT_DEPTH: usize = 8;
pub const MAX_BIT_DEPTH: usize = 16;
pub const MIN_TR_DYNAMIC_RANGE: i32 = 15;
pub const MAX_TR_DYNAMIC_RANGE: i32 = 20;

/*****************************************************************************
 * coding tool configuration, fixed for the lifetime of a TrQuant instance
 *****************************************************************************/
#[derive(Debug, Clone)]
pub struct TqConfig {
    /* internal bit depth, per channel type (luma, chroma) */
    pub bit_depth: [usize; N_CH],
    /* log2 of the coefficient dynamic range, per channel type */
    pub max_log2_tr_dynamic_range: [i32; N_CH],
    /* largest block side the full transform path accepts */
    pub max_tr_size: usize,
    /* extended precision processing: clamps the non-transform path shift
     * instead of treating a negative shift as fatal */
    pub extended_precision: bool,
    /* apply the sqrt(2) weighting for odd log2 areas on the
     * non-transform path as well */
    pub legacy_size_scale: bool,
    /* multiple transform selection for intra / inter luma blocks */
    pub use_intra_mts: bool,
    pub use_inter_mts: bool,
    pub mts_convention: MtsConvention,
    /* rotate residual of 4x4 intra non-transformed blocks */
    pub transform_skip_rotation: bool,
}

impl Default for TqConfig {
    fn default() -> Self {
        TqConfig {
            bit_depth: [8, 8],
            max_log2_tr_dynamic_range: [15, 15],
            max_tr_size: MAX_TR_SIZE,
            extended_precision: false,
            legacy_size_scale: false,
            use_intra_mts: false,
            use_inter_mts: false,
            mts_convention: MtsConvention::Aligned,
            transform_skip_rotation: false,
        }
    }
}

impl TqConfig {
    pub fn validate(&self) -> Result<(), TqError> {
        for ch in 0..N_CH {
            if self.bit_depth[ch] < MIN_BIT_DEPTH || self.bit_depth[ch] > MAX_BIT_DEPTH {
                error!(
                    "invalid bit depth {} for channel type {}",
                    self.bit_depth[ch], ch
                );
                return Err(TqError::TQ_ERR_INVALID_ARGUMENT);
            }
            let max_dr = self.max_log2_tr_dynamic_range[ch];
            if max_dr < MIN_TR_DYNAMIC_RANGE || max_dr > MAX_TR_DYNAMIC_RANGE {
                error!(
                    "invalid coefficient dynamic range {} for channel type {}",
                    max_dr, ch
                );
                return Err(TqError::TQ_ERR_INVALID_ARGUMENT);
            }
            if max_dr > MIN_TR_DYNAMIC_RANGE && !self.extended_precision {
                error!("dynamic range beyond 15 bits needs extended precision");
                return Err(TqError::TQ_ERR_UNSUPPORTED);
            }
        }
        if !self.max_tr_size.is_power_of_two()
            || self.max_tr_size < MIN_TR_SIZE
            || self.max_tr_size > MAX_TR_SIZE
        {
            error!("invalid max transform size {}", self.max_tr_size);
            return Err(TqError::TQ_ERR_INVALID_ARGUMENT);
        }
        Ok(())
    }
}
