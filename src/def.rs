use crate::api::*;

/*****************************************************************************
 * types
 *****************************************************************************/
/* residual/reconstruction sample */
pub type pel = i16;
/* transform coefficient (wide range) */
pub type TCoeff = i32;

#[inline]
pub(crate) fn tq_assert_rv(x: bool, r: TqError) -> Result<(), TqError> {
    if !x {
        assert!(x);
        return Err(r);
    }
    Ok(())
}

pub const Y_C: usize = 0; /* Y luma */
pub const U_C: usize = 1; /* Cb Chroma */
pub const V_C: usize = 2; /* Cr Chroma */
pub const N_C: usize = 3; /* number of color component */

pub const CH_L: usize = 0; /* luma channel type */
pub const CH_C: usize = 1; /* chroma channel type */
pub const N_CH: usize = 2;

pub const MAX_TR_LOG2: usize = 6; /* 64x64 */
pub const MIN_TR_LOG2: usize = 1; /* 2x2 */
pub const MAX_TR_SIZE: usize = (1 << MAX_TR_LOG2);
pub const MIN_TR_SIZE: usize = (1 << MIN_TR_LOG2);
pub const MAX_TR_DIM: usize = (1 << (MAX_TR_LOG2 + MAX_TR_LOG2));
pub const MIN_TR_DIM: usize = (1 << (MIN_TR_LOG2 + MIN_TR_LOG2));

/* matrix shift per 1D transform stage */
pub(crate) const TR_MATRIX_SHIFT: i32 = 6;
/* extra matrix precision carried by the kernel tables */
pub(crate) const TR_PREC: i32 = 2;
/* high-frequency coefficients beyond this count per axis are forced to zero */
pub(crate) const ZERO_OUT_TH: usize = 32;

pub(crate) const ADJ_QUANT_SHIFT: i32 = 7;
pub(crate) const ADJ_DEQUANT_SHIFT: i32 = ADJ_QUANT_SHIFT + 1;

#[inline]
pub(crate) fn TQ_CLIP3<T: Ord>(min_val: T, max_val: T, val: T) -> T {
    if val < min_val {
        min_val
    } else if val > max_val {
        max_val
    } else {
        val
    }
}

#[inline]
pub(crate) fn tq_log2(v: usize) -> usize {
    debug_assert!(v.is_power_of_two());
    v.trailing_zeros() as usize
}

/* transform shift between sample domain and coefficient domain */
#[inline]
pub(crate) fn tr_shift(bit_depth: usize, log2w: usize, log2h: usize, max_dr: i32) -> i32 {
    max_dr - bit_depth as i32 - ((log2w + log2h) >> 1) as i32
}

/*****************************************************************************
 * enumerations
 *****************************************************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum TxType {
    DCT2 = 0,
    DCT8 = 1,
    DST7 = 2,
}

pub(crate) const NUM_TX_TYPES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum RdpcmMode {
    RDPCM_OFF = 0,
    RDPCM_VER = 1,
    RDPCM_HOR = 2,
}

pub(crate) const NUM_RDPCM_MODES: usize = 3;

impl Default for RdpcmMode {
    fn default() -> Self {
        RdpcmMode::RDPCM_OFF
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredMode {
    MODE_INTRA,
    MODE_INTER,
}

/* final intra prediction direction, reduced to what the transform core
 * needs to know about it */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntraDir {
    IPD_VER,
    IPD_HOR,
    IPD_OTHER,
}

/* bit-assignment conventions for the 2-bit multi-transform index */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtsConvention {
    /* same DST7/DCT8 assignment for intra and inter */
    Aligned,
    /* DST7/DCT8 assignment swapped for inter blocks */
    LegacySwapped,
}

/*****************************************************************************
 * transform block descriptor
 *****************************************************************************/
#[derive(Debug, Clone)]
pub struct TuBlock {
    pub width: usize,
    pub height: usize,
    pub comp: usize, /* Y_C / U_C / V_C */
    pub pred_mode: PredMode,
    pub intra_dir: IntraDir,
    /* CU-level transform/quantization bypass */
    pub lossless: bool,
    /* per-component transform skip flag */
    pub transform_skip: bool,
    /* CU-level residual DPCM enable */
    pub rdpcm_enabled: bool,
    pub mts_flag: bool,
    pub mts_idx: u8,
    /* persistent per-component coding decisions */
    pub rdpcm_mode: RdpcmMode,
    pub cbf: bool,
}

impl TuBlock {
    pub fn new(width: usize, height: usize, comp: usize) -> Self {
        assert!(width.is_power_of_two() && height.is_power_of_two());
        assert!(width >= MIN_TR_SIZE && height >= MIN_TR_SIZE);
        assert!(width <= MAX_TR_SIZE && height <= MAX_TR_SIZE);
        assert!(comp < N_C);
        TuBlock {
            width,
            height,
            comp,
            pred_mode: PredMode::MODE_INTER,
            intra_dir: IntraDir::IPD_OTHER,
            lossless: false,
            transform_skip: false,
            rdpcm_enabled: false,
            mts_flag: false,
            mts_idx: 0,
            rdpcm_mode: RdpcmMode::RDPCM_OFF,
            cbf: false,
        }
    }

    #[inline]
    pub(crate) fn ch_type(&self) -> usize {
        if self.comp > 0 {
            CH_C
        } else {
            CH_L
        }
    }

    #[inline]
    pub(crate) fn is_intra(&self) -> bool {
        self.pred_mode == PredMode::MODE_INTRA
    }

    #[inline]
    pub(crate) fn log2w(&self) -> usize {
        tq_log2(self.width)
    }

    #[inline]
    pub(crate) fn log2h(&self) -> usize {
        tq_log2(self.height)
    }

    #[inline]
    pub(crate) fn area(&self) -> usize {
        self.width * self.height
    }

    /* 180 degree residual rotation convention for non-transformed
     * 4x4 intra blocks */
    #[inline]
    pub(crate) fn rotate_residual(&self, cfg: &TqConfig) -> bool {
        cfg.transform_skip_rotation && self.width == 4 && self.height == 4 && self.is_intra()
    }

    /* odd log2 block area carries the sqrt(2) size-class weighting */
    #[inline]
    pub(crate) fn needs_size_scale(&self, cfg: &TqConfig) -> bool {
        cfg.legacy_size_scale && ((self.log2w() + self.log2h()) & 1) != 0
    }
}
