use crate::api::*;
use crate::def::*;
use crate::plane::*;

pub(crate) const QUANT_SHIFT: i32 = 14;
pub(crate) const QUANT_IQUANT_SHIFT: i32 = 20;
pub(crate) const IQUANT_SHIFT: i32 = QUANT_IQUANT_SHIFT - QUANT_SHIFT;

/* forward scale per qp remainder, 2^14 at the unity step size */
static tbl_quant_scale: [i32; 6] = [26214, 23302, 20560, 18396, 16384, 14564];
/* inverse scale per qp remainder, 2^6 at the unity step size */
static tbl_dequant_scale: [i32; 6] = [40, 45, 51, 57, 64, 72];

/* levels are clipped to the range the entropy stage can represent */
const LEVEL_MIN: TCoeff = -32768;
const LEVEL_MAX: TCoeff = 32767;

/* dead-zone rounding offsets in units of 2^-9 of the step size */
const DEADZONE_INTRA: i64 = 171;
const DEADZONE_INTER: i64 = 85;
const DEADZONE_HALF: i64 = 256;

#[derive(Debug, Clone, Copy)]
pub struct QpParam {
    pub qp: i32,
}

impl QpParam {
    pub fn new(qp: i32) -> Self {
        assert!(qp >= 0);
        QpParam { qp }
    }

    #[inline]
    pub(crate) fn per(&self) -> i32 {
        self.qp / 6
    }

    #[inline]
    pub(crate) fn rem(&self) -> usize {
        (self.qp % 6) as usize
    }
}

/* Scalar quantization service behind the transform stages. The block
 * entry points consume a whole coefficient plane, the one-sample entry
 * points serve the residual DPCM walk where each delta is quantized and
 * reconstructed before the next sample is predicted. */
pub trait QuantService {
    /* quantize src (contiguous, width*height) into the coefficient
     * plane, returns the sum of absolute levels */
    fn quant(
        &mut self,
        tu: &TuBlock,
        cfg: &TqConfig,
        src: &[TCoeff],
        dst: &mut CoeffViewMut<'_>,
        qp: &QpParam,
    ) -> TCoeff;

    /* dequantize the coefficient plane into src's domain (contiguous) */
    fn dequant(
        &mut self,
        tu: &TuBlock,
        cfg: &TqConfig,
        src: &CoeffView<'_>,
        dst: &mut [TCoeff],
        qp: &QpParam,
    );

    fn tr_skip_quant_one_sample(
        &mut self,
        tu: &TuBlock,
        cfg: &TqConfig,
        resi_diff: TCoeff,
        pos: usize,
        qp: &QpParam,
        use_half_rounding: bool,
    ) -> TCoeff;

    fn inv_tr_skip_dequant_one_sample(
        &mut self,
        tu: &TuBlock,
        cfg: &TqConfig,
        level: TCoeff,
        pos: usize,
        qp: &QpParam,
    ) -> TCoeff;
}

/* rate-distortion agnostic uniform quantizer with a fixed dead zone */
#[derive(Debug, Default)]
pub struct UniformQuant {}

impl QuantService for UniformQuant {
    fn quant(
        &mut self,
        tu: &TuBlock,
        cfg: &TqConfig,
        src: &[TCoeff],
        dst: &mut CoeffViewMut<'_>,
        qp: &QpParam,
    ) -> TCoeff {
        let ch = tu.ch_type();
        let t_shift = tr_shift(
            cfg.bit_depth[ch],
            tu.log2w(),
            tu.log2h(),
            cfg.max_log2_tr_dynamic_range[ch],
        );
        let (ns_shift, ns_scale): (i32, i64) = if tu.needs_size_scale(cfg) {
            (ADJ_QUANT_SHIFT, 181)
        } else {
            (0, 1)
        };
        let q_bits = QUANT_SHIFT + qp.per() + t_shift + ns_shift;

        let scale = tbl_quant_scale[qp.rem()] as i64;
        let deadzone = if tu.is_intra() {
            DEADZONE_INTRA
        } else {
            DEADZONE_INTER
        };
        /* the dead zone is 2^-9 of the step, very high bit depths can
         * push q_bits below that */
        let offset: i64 = if q_bits >= 9 {
            deadzone << (q_bits - 9)
        } else {
            deadzone >> (9 - q_bits)
        };

        let mut abs_sum: TCoeff = 0;
        for y in 0..tu.height {
            for x in 0..tu.width {
                let c = src[y * tu.width + x] as i64;
                let lev = ((c.abs() * scale * ns_scale + offset) >> q_bits) as TCoeff;
                let lev = TQ_CLIP3(LEVEL_MIN, LEVEL_MAX, lev);
                abs_sum += lev;
                *dst.at_mut(x, y) = if c < 0 { -lev } else { lev };
            }
        }
        abs_sum
    }

    fn dequant(
        &mut self,
        tu: &TuBlock,
        cfg: &TqConfig,
        src: &CoeffView<'_>,
        dst: &mut [TCoeff],
        qp: &QpParam,
    ) {
        let ch = tu.ch_type();
        let max_dr = cfg.max_log2_tr_dynamic_range[ch];
        let t_shift = tr_shift(cfg.bit_depth[ch], tu.log2w(), tu.log2h(), max_dr);
        let (ns_shift, ns_scale): (i32, i64) = if tu.needs_size_scale(cfg) {
            (ADJ_DEQUANT_SHIFT, 181)
        } else {
            (0, 1)
        };
        let shift = IQUANT_SHIFT - t_shift + ns_shift;
        let scale = ((tbl_dequant_scale[qp.rem()] as i64) << qp.per()) * ns_scale;

        let coef_min = -(1i64 << max_dr);
        let coef_max = (1i64 << max_dr) - 1;

        if shift >= 0 {
            let add: i64 = if shift == 0 { 0 } else { 1 << (shift - 1) };
            for y in 0..tu.height {
                for x in 0..tu.width {
                    let c = src.at(x, y) as i64;
                    dst[y * tu.width + x] =
                        TQ_CLIP3(coef_min, coef_max, (c * scale + add) >> shift) as TCoeff;
                }
            }
        } else {
            /* wide dynamic range pushed the scaling past the fixed
             * point, shift left instead */
            let shift = (-shift) as usize;
            for y in 0..tu.height {
                for x in 0..tu.width {
                    let c = src.at(x, y) as i64;
                    dst[y * tu.width + x] =
                        TQ_CLIP3(coef_min, coef_max, (c * scale) << shift) as TCoeff;
                }
            }
        }
    }

    fn tr_skip_quant_one_sample(
        &mut self,
        tu: &TuBlock,
        _cfg: &TqConfig,
        resi_diff: TCoeff,
        _pos: usize,
        qp: &QpParam,
        use_half_rounding: bool,
    ) -> TCoeff {
        /* spatial deltas carry no transform gain, so the block transform
         * shift does not participate here */
        let q_bits = QUANT_SHIFT + qp.per();
        let scale = tbl_quant_scale[qp.rem()] as i64;
        let deadzone = if use_half_rounding {
            DEADZONE_HALF
        } else if tu.is_intra() {
            DEADZONE_INTRA
        } else {
            DEADZONE_INTER
        };
        let offset: i64 = deadzone << (q_bits - 9);

        let d = resi_diff as i64;
        let lev = ((d.abs() * scale + offset) >> q_bits) as TCoeff;
        let lev = TQ_CLIP3(LEVEL_MIN, LEVEL_MAX, lev);
        if d < 0 {
            -lev
        } else {
            lev
        }
    }

    fn inv_tr_skip_dequant_one_sample(
        &mut self,
        _tu: &TuBlock,
        _cfg: &TqConfig,
        level: TCoeff,
        _pos: usize,
        qp: &QpParam,
    ) -> TCoeff {
        let scale = (tbl_dequant_scale[qp.rem()] as i64) << qp.per();
        let add: i64 = 1 << (IQUANT_SHIFT - 1);
        ((level as i64 * scale + add) >> IQUANT_SHIFT) as TCoeff
    }
}
