use crate::api::*;
use crate::def::*;
use crate::plane::*;
use crate::tbl::*;

/* separable 2D transforms, built from two 1D kernel passes over a
 * contiguous scratch layout */

pub(crate) struct TxKernel<'a> {
    pub size: usize,
    mat: &'a [i32],
}

/* kernel lookup by family and log2(size) - 1 */
pub(crate) fn tx_kernel(tx: TxType, log2_size_m1: usize) -> Option<TxKernel<'static>> {
    let tbl: &'static [[Option<Box<[i32]>>; MAX_TR_LOG2]; NUM_TX_TYPES] = &TX_MATRIX;
    tbl[tx as usize][log2_size_m1].as_ref().map(|m| TxKernel {
        size: 2 << log2_size_m1,
        mat: m,
    })
}

impl<'a> TxKernel<'a> {
    /* One forward pass over `line` input vectors of length `size`.
     * src holds the vectors contiguously, dst is written transposed so
     * the second stage reads its inputs contiguously again. The last
     * `skip_line` vectors and the last `skip_line2` output frequencies
     * are not computed and their slots are cleared instead. */
    pub(crate) fn forward(
        &self,
        src: &[TCoeff],
        dst: &mut [TCoeff],
        shift: usize,
        line: usize,
        skip_line: usize,
        skip_line2: usize,
    ) {
        let n = self.size;
        let add: i64 = if shift == 0 { 0 } else { 1 << (shift - 1) };
        let reduced_line = line - skip_line;
        let cutoff = n - skip_line2;

        for i in 0..reduced_line {
            for k in 0..cutoff {
                let mut sum = 0i64;
                for j in 0..n {
                    sum += self.mat[k * n + j] as i64 * src[i * n + j] as i64;
                }
                dst[k * line + i] = ((sum + add) >> shift) as TCoeff;
            }
            for k in cutoff..n {
                dst[k * line + i] = 0;
            }
        }
        if skip_line > 0 {
            for k in 0..n {
                for i in reduced_line..line {
                    dst[k * line + i] = 0;
                }
            }
        }
    }

    /* Inverse counterpart. Reads `line` coefficient vectors laid out
     * transposed, never touches the last `skip_line` vectors or the
     * last `skip_line2` input frequencies, clips every output. */
    pub(crate) fn inverse(
        &self,
        src: &[TCoeff],
        dst: &mut [TCoeff],
        shift: usize,
        line: usize,
        skip_line: usize,
        skip_line2: usize,
        clip_min: TCoeff,
        clip_max: TCoeff,
    ) {
        let n = self.size;
        let add: i64 = if shift == 0 { 0 } else { 1 << (shift - 1) };
        let reduced_line = line - skip_line;
        let cutoff = n - skip_line2;

        for i in 0..reduced_line {
            for j in 0..n {
                let mut sum = 0i64;
                for k in 0..cutoff {
                    sum += self.mat[k * n + j] as i64 * src[k * line + i] as i64;
                }
                dst[i * n + j] = TQ_CLIP3(
                    clip_min as i64,
                    clip_max as i64,
                    (sum + add) >> shift,
                ) as TCoeff;
            }
        }
        for v in &mut dst[reduced_line * n..line * n] {
            *v = 0;
        }
    }
}

/* horizontal/vertical kernel family selection for a block */
pub(crate) fn get_tr_types(cfg: &TqConfig, tu: &TuBlock) -> (TxType, TxType) {
    let mts_activated = if tu.is_intra() {
        cfg.use_intra_mts
    } else {
        cfg.use_inter_mts
    };
    let mut tr_hor = TxType::DCT2;
    let mut tr_ver = TxType::DCT2;

    if mts_activated && tu.comp == Y_C && tu.mts_flag {
        let ind_hor = (tu.mts_idx & 1) != 0;
        let ind_ver = (tu.mts_idx >> 1) != 0;
        let swapped = cfg.mts_convention == MtsConvention::LegacySwapped && !tu.is_intra();
        if swapped {
            tr_hor = if ind_hor { TxType::DST7 } else { TxType::DCT8 };
            tr_ver = if ind_ver { TxType::DST7 } else { TxType::DCT8 };
        } else {
            tr_hor = if ind_hor { TxType::DCT8 } else { TxType::DST7 };
            tr_ver = if ind_ver { TxType::DCT8 } else { TxType::DST7 };
        }
    }
    (tr_hor, tr_ver)
}

#[inline]
fn zero_out_skip(size: usize) -> usize {
    if size > ZERO_OUT_TH {
        size - ZERO_OUT_TH
    } else {
        0
    }
}

/* forward 2D transform: samples to coefficients, row-major output */
pub(crate) fn forward_transform(
    cfg: &TqConfig,
    tu: &TuBlock,
    resi: &PelView<'_>,
    dst: &mut [TCoeff],
    blk: &mut [TCoeff],
    tmp: &mut [TCoeff],
) {
    let width = tu.width;
    let height = tu.height;
    let ch = tu.ch_type();
    let bit_depth = cfg.bit_depth[ch] as i32;
    let max_dr = cfg.max_log2_tr_dynamic_range[ch];
    let log2w = tu.log2w();
    let log2h = tu.log2h();

    let shift_1st = log2w as i32 + bit_depth + TR_MATRIX_SHIFT - max_dr + TR_PREC;
    let shift_2nd = log2h as i32 + TR_MATRIX_SHIFT + TR_PREC;
    assert!(shift_1st >= 0 && shift_2nd >= 0);

    let skip_width = zero_out_skip(width);
    let skip_height = zero_out_skip(height);

    let (tr_hor, tr_ver) = get_tr_types(cfg, tu);
    let khor = tx_kernel(tr_hor, log2w - 1).expect("undefined horizontal transform kernel");
    let kver = tx_kernel(tr_ver, log2h - 1).expect("undefined vertical transform kernel");

    for y in 0..height {
        for x in 0..width {
            blk[y * width + x] = resi.at(x, y) as TCoeff;
        }
    }

    khor.forward(
        &blk[..width * height],
        tmp,
        shift_1st as usize,
        height,
        0,
        skip_width,
    );
    kver.forward(
        &tmp[..width * height],
        dst,
        shift_2nd as usize,
        width,
        skip_width,
        skip_height,
    );
}

/* inverse 2D transform: row-major coefficients back to samples */
pub(crate) fn inverse_transform(
    cfg: &TqConfig,
    tu: &TuBlock,
    coef: &[TCoeff],
    resi: &mut PelViewMut<'_>,
    blk: &mut [TCoeff],
    tmp: &mut [TCoeff],
) {
    let width = tu.width;
    let height = tu.height;
    let ch = tu.ch_type();
    let bit_depth = cfg.bit_depth[ch] as i32;
    let max_dr = cfg.max_log2_tr_dynamic_range[ch];
    let log2w = tu.log2w();
    let log2h = tu.log2h();

    let shift_1st = TR_MATRIX_SHIFT + 1 + TR_PREC;
    let shift_2nd = (TR_MATRIX_SHIFT + max_dr - 1) - bit_depth + TR_PREC;
    assert!(shift_1st >= 0 && shift_2nd >= 0);

    let clip_min = -(1 << max_dr) as TCoeff;
    let clip_max = ((1 << max_dr) - 1) as TCoeff;

    let skip_width = zero_out_skip(width);
    let skip_height = zero_out_skip(height);

    let (tr_hor, tr_ver) = get_tr_types(cfg, tu);
    let khor = tx_kernel(tr_hor, log2w - 1).expect("undefined horizontal transform kernel");
    let kver = tx_kernel(tr_ver, log2h - 1).expect("undefined vertical transform kernel");

    kver.inverse(
        coef,
        tmp,
        shift_1st as usize,
        width,
        skip_width,
        skip_height,
        clip_min,
        clip_max,
    );
    khor.inverse(
        &tmp[..width * height],
        blk,
        shift_2nd as usize,
        height,
        0,
        skip_width,
        clip_min,
        clip_max,
    );

    for y in 0..height {
        for x in 0..width {
            *resi.at_mut(x, y) = blk[y * width + x] as pel;
        }
    }
}

/* forward non-transform path: samples are rescaled into the coefficient
 * domain without any basis change */
pub(crate) fn transform_skip(
    cfg: &TqConfig,
    tu: &TuBlock,
    resi: &PelView<'_>,
    coef: &mut [TCoeff],
) {
    let width = tu.width;
    let height = tu.height;
    let ch = tu.ch_type();
    let mut shift = tr_shift(
        cfg.bit_depth[ch],
        tu.log2w(),
        tu.log2h(),
        cfg.max_log2_tr_dynamic_range[ch],
    );
    if cfg.extended_precision && shift < 0 {
        shift = 0;
    }

    let mut wh_scale: i64 = 1;
    if tu.needs_size_scale(cfg) {
        shift -= ADJ_DEQUANT_SHIFT;
        wh_scale = 181;
    }

    let rotate = tu.rotate_residual(cfg);
    let size_m1 = width * height - 1;

    if shift >= 0 {
        for y in 0..height {
            for x in 0..width {
                let pos = y * width + x;
                let dst = if rotate { size_m1 - pos } else { pos };
                coef[dst] = ((resi.at(x, y) as i64 * wh_scale) << shift) as TCoeff;
            }
        }
    } else {
        /* very high bit depth, the dynamic range is smaller than the
         * sample range */
        let shift = (-shift) as usize;
        let offset: i64 = 1 << (shift - 1);
        for y in 0..height {
            for x in 0..width {
                let pos = y * width + x;
                let dst = if rotate { size_m1 - pos } else { pos };
                coef[dst] = ((resi.at(x, y) as i64 * wh_scale + offset) >> shift) as TCoeff;
            }
        }
    }
}

/* inverse non-transform path */
pub(crate) fn inv_transform_skip(
    cfg: &TqConfig,
    tu: &TuBlock,
    coef: &[TCoeff],
    resi: &mut PelViewMut<'_>,
) {
    let width = tu.width;
    let height = tu.height;
    let ch = tu.ch_type();
    let mut shift = tr_shift(
        cfg.bit_depth[ch],
        tu.log2w(),
        tu.log2h(),
        cfg.max_log2_tr_dynamic_range[ch],
    );
    if cfg.extended_precision && shift < 0 {
        shift = 0;
    }

    let mut wh_scale: i64 = 1;
    if tu.needs_size_scale(cfg) {
        shift += ADJ_QUANT_SHIFT;
        wh_scale = 181;
    }

    let rotate = tu.rotate_residual(cfg);
    let size_m1 = width * height - 1;

    if shift >= 0 {
        let offset: i64 = if shift == 0 { 0 } else { 1 << (shift - 1) };
        for y in 0..height {
            for x in 0..width {
                let pos = y * width + x;
                let src = if rotate { size_m1 - pos } else { pos };
                *resi.at_mut(x, y) = ((coef[src] as i64 * wh_scale + offset) >> shift) as pel;
            }
        }
    } else {
        let shift = (-shift) as usize;
        for y in 0..height {
            for x in 0..width {
                let pos = y * width + x;
                let src = if rotate { size_m1 - pos } else { pos };
                *resi.at_mut(x, y) = ((coef[src] as i64 * wh_scale) << shift) as pel;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tu(width: usize, height: usize) -> TuBlock {
        TuBlock::new(width, height, Y_C)
    }

    #[test]
    fn kernel_1d_roundtrip_all_families() {
        /* forward with shift 0 then inverse with the full gain shift
         * recovers the input up to matrix rounding noise */
        for &tx in &[TxType::DCT2, TxType::DCT8, TxType::DST7] {
            for log2 in 2..=3 {
                let n = 1usize << log2;
                let k = tx_kernel(tx, log2 - 1).unwrap();
                let src: Vec<TCoeff> = (0..n).map(|i| (i as TCoeff * 7) % 65 - 32).collect();
                let mut freq = vec![0; n];
                let mut rec = vec![0; n];
                k.forward(&src, &mut freq, 0, 1, 0, 0);
                k.inverse(&freq, &mut rec, 16 + log2, 1, 0, 0, -(1 << 22), (1 << 22) - 1);
                for j in 0..n {
                    assert!(
                        (rec[j] - src[j]).abs() <= 8,
                        "{:?} n={} j={} {} vs {}",
                        tx,
                        n,
                        j,
                        rec[j],
                        src[j]
                    );
                }
            }
        }
    }

    #[test]
    fn dct2_constant_block_collapses_to_dc() {
        let cfg = TqConfig::default();
        let tu = tu(8, 8);
        let resi = vec![5 as pel; 64];
        let view = PelView::new(&resi, 8, 8, 8);
        let mut dst = vec![-1; 64];
        let mut blk = vec![0; 64];
        let mut tmp = vec![0; 64];
        forward_transform(&cfg, &tu, &view, &mut dst, &mut blk, &mut tmp);
        /* shift_1st = 3+8+6-15+2 = 4, shift_2nd = 3+6+2 = 11 */
        assert_eq!(dst[0], 640);
        for i in 1..64 {
            assert_eq!(dst[i], 0, "coefficient {}", i);
        }
    }

    #[test]
    fn dct2_constant_block_roundtrip() {
        let cfg = TqConfig::default();
        let tu = tu(8, 8);
        let mut coef = vec![0; 64];
        coef[0] = 640;
        let mut rec = vec![0 as pel; 64];
        let mut view = PelViewMut::new(&mut rec, 8, 8, 8);
        let mut blk = vec![0; 64];
        let mut tmp = vec![0; 64];
        inverse_transform(&cfg, &tu, &coef, &mut view, &mut blk, &mut tmp);
        for y in 0..8 {
            assert_eq!(view.row(y), &[5; 8]);
        }
    }

    #[test]
    fn forward_zero_out_clears_high_frequencies() {
        let cfg = TqConfig::default();
        let tu = tu(64, 64);
        let resi: Vec<pel> = (0..64 * 64).map(|i| ((i * 31) % 256) as pel - 128).collect();
        let view = PelView::new(&resi, 64, 64, 64);
        /* stale garbage in the destination must not survive */
        let mut dst = vec![0x7ead; 64 * 64];
        let mut blk = vec![0; 64 * 64];
        let mut tmp = vec![0x7ead; 64 * 64];
        forward_transform(&cfg, &tu, &view, &mut dst, &mut blk, &mut tmp);
        for y in 0..64 {
            for x in 0..64 {
                if x >= 32 || y >= 32 {
                    assert_eq!(dst[y * 64 + x], 0, "({},{})", x, y);
                }
            }
        }
    }

    #[test]
    fn inverse_ignores_zero_out_region() {
        let cfg = TqConfig::default();
        let tu = tu(64, 32);
        let mut coef = vec![0; 64 * 32];
        for y in 0..32 {
            for x in 0..32 {
                coef[y * 64 + x] = ((x * 3 + y * 7) % 33) as TCoeff - 16;
            }
        }
        let mut garbage = coef.clone();
        for y in 0..32 {
            for x in 32..64 {
                garbage[y * 64 + x] = 0x7fff;
            }
        }
        let mut rec_a = vec![0 as pel; 64 * 32];
        let mut rec_b = vec![0 as pel; 64 * 32];
        let mut blk = vec![0; 64 * 32];
        let mut tmp = vec![0; 64 * 32];
        {
            let mut v = PelViewMut::new(&mut rec_a, 64, 32, 64);
            inverse_transform(&cfg, &tu, &coef, &mut v, &mut blk, &mut tmp);
        }
        {
            let mut v = PelViewMut::new(&mut rec_b, 64, 32, 64);
            inverse_transform(&cfg, &tu, &garbage, &mut v, &mut blk, &mut tmp);
        }
        assert_eq!(rec_a, rec_b);
    }

    #[test]
    fn skip_path_scales_into_coefficient_domain() {
        let mut cfg = TqConfig::default();
        cfg.bit_depth = [10, 10];
        let mut tu = tu(4, 4);
        tu.transform_skip = true;
        let resi = vec![100 as pel; 16];
        let view = PelView::new(&resi, 4, 4, 4);
        let mut coef = vec![0; 16];
        transform_skip(&cfg, &tu, &view, &mut coef);
        /* shift = 15 - 10 - 2 = 3 */
        for &c in coef.iter() {
            assert_eq!(c, 800);
        }
    }

    #[test]
    fn skip_path_high_bit_depth_negative_shift() {
        let mut cfg = TqConfig::default();
        cfg.bit_depth = [16, 16];
        let mut tu = tu(4, 4);
        tu.transform_skip = true;
        /* shift = 15 - 16 - 2 = -3, samples are rounded down into the
         * narrower coefficient range */
        let resi = vec![100 as pel; 16];
        let view = PelView::new(&resi, 4, 4, 4);
        let mut coef = vec![0; 16];
        transform_skip(&cfg, &tu, &view, &mut coef);
        for &c in coef.iter() {
            assert_eq!(c, 13); /* (100 + 4) >> 3 */
        }
        let mut rec = vec![0 as pel; 16];
        let mut out = PelViewMut::new(&mut rec, 4, 4, 4);
        inv_transform_skip(&cfg, &tu, &coef, &mut out);
        for &r in rec.iter() {
            assert_eq!(r, 104); /* 13 << 3 */
        }
    }

    #[test]
    fn skip_path_roundtrip_exact() {
        let cfg = TqConfig::default();
        let tu = tu(8, 8);
        let resi: Vec<pel> = (0..64).map(|i| (i as pel) - 31).collect();
        let view = PelView::new(&resi, 8, 8, 8);
        let mut coef = vec![0; 64];
        transform_skip(&cfg, &tu, &view, &mut coef);
        let mut rec = vec![0 as pel; 64];
        let mut out = PelViewMut::new(&mut rec, 8, 8, 8);
        inv_transform_skip(&cfg, &tu, &coef, &mut out);
        assert_eq!(rec, resi);
    }

    #[test]
    fn skip_path_rotation_is_self_inverse() {
        let mut cfg = TqConfig::default();
        cfg.transform_skip_rotation = true;
        let mut tu = tu(4, 4);
        tu.pred_mode = PredMode::MODE_INTRA;
        tu.transform_skip = true;
        let resi: Vec<pel> = (0..16).map(|i| i as pel * 3 - 20).collect();
        let view = PelView::new(&resi, 4, 4, 4);
        let mut coef = vec![0; 16];
        transform_skip(&cfg, &tu, &view, &mut coef);
        /* shift = 15 - 8 - 2 = 5, rotated layout */
        assert_eq!(coef[15], ((resi[0] as TCoeff) << 5));
        assert_eq!(coef[0], ((resi[15] as TCoeff) << 5));
        let mut rec = vec![0 as pel; 16];
        let mut out = PelViewMut::new(&mut rec, 4, 4, 4);
        inv_transform_skip(&cfg, &tu, &coef, &mut out);
        assert_eq!(rec, resi);
    }

    #[test]
    fn mts_index_selects_kernels() {
        let mut cfg = TqConfig::default();
        cfg.use_intra_mts = true;
        cfg.use_inter_mts = true;
        let mut tu = tu(8, 8);

        /* mts disabled on the block keeps DCT2 */
        assert_eq!(get_tr_types(&cfg, &tu), (TxType::DCT2, TxType::DCT2));

        tu.mts_flag = true;
        tu.mts_idx = 0;
        assert_eq!(get_tr_types(&cfg, &tu), (TxType::DST7, TxType::DST7));
        tu.mts_idx = 1;
        assert_eq!(get_tr_types(&cfg, &tu), (TxType::DCT8, TxType::DST7));
        tu.mts_idx = 2;
        assert_eq!(get_tr_types(&cfg, &tu), (TxType::DST7, TxType::DCT8));
        tu.mts_idx = 3;
        assert_eq!(get_tr_types(&cfg, &tu), (TxType::DCT8, TxType::DCT8));

        /* chroma always DCT2 */
        tu.comp = U_C;
        assert_eq!(get_tr_types(&cfg, &tu), (TxType::DCT2, TxType::DCT2));
        tu.comp = Y_C;

        /* legacy convention swaps the assignment for inter blocks only */
        cfg.mts_convention = MtsConvention::LegacySwapped;
        tu.mts_idx = 1;
        assert_eq!(get_tr_types(&cfg, &tu), (TxType::DST7, TxType::DCT8));
        tu.pred_mode = PredMode::MODE_INTRA;
        assert_eq!(get_tr_types(&cfg, &tu), (TxType::DCT8, TxType::DST7));
    }

    #[test]
    fn mts_gated_per_prediction_mode() {
        let mut cfg = TqConfig::default();
        cfg.use_intra_mts = true;
        let mut tu = tu(8, 8);
        tu.mts_flag = true;
        tu.mts_idx = 3;
        /* inter block with only intra mts enabled falls back to DCT2 */
        assert_eq!(get_tr_types(&cfg, &tu), (TxType::DCT2, TxType::DCT2));
        tu.pred_mode = PredMode::MODE_INTRA;
        assert_eq!(get_tr_types(&cfg, &tu), (TxType::DCT8, TxType::DCT8));
    }

    #[test]
    fn mts_roundtrip_small_values() {
        let mut cfg = TqConfig::default();
        cfg.use_inter_mts = true;
        let mut tu = tu(4, 4);
        tu.mts_flag = true;
        tu.mts_idx = 1; /* DCT8 hor, DST7 ver */
        let resi: Vec<pel> = (0..16).map(|i| ((i * 5) % 17) as pel - 8).collect();
        let view = PelView::new(&resi, 4, 4, 4);
        let mut coef = vec![0; 16];
        let mut blk = vec![0; 16];
        let mut tmp = vec![0; 16];
        forward_transform(&cfg, &tu, &view, &mut coef, &mut blk, &mut tmp);
        let mut rec = vec![0 as pel; 16];
        let mut out = PelViewMut::new(&mut rec, 4, 4, 4);
        inverse_transform(&cfg, &tu, &coef, &mut out, &mut blk, &mut tmp);
        for i in 0..16 {
            assert!((rec[i] - resi[i]).abs() <= 2, "{} vs {}", rec[i], resi[i]);
        }
    }

    #[test]
    fn inverse_stage_clips_to_dynamic_range() {
        let k = tx_kernel(TxType::DCT2, 2).unwrap(); /* 8-point */
        let src = vec![(1 << 15) - 1 as TCoeff; 8];
        let mut dst = vec![0; 8];
        let clip_min = -(1 << 15);
        let clip_max = (1 << 15) - 1;
        /* shift 0 would overflow the range by far without the clip */
        k.inverse(&src, &mut dst, 0, 1, 0, 0, clip_min, clip_max);
        for &v in dst.iter() {
            assert!(v >= clip_min && v <= clip_max);
        }
        assert_eq!(dst[0], clip_max);
    }

    #[test]
    #[should_panic]
    fn negative_forward_shift_is_fatal() {
        let mut cfg = TqConfig::default();
        cfg.extended_precision = true;
        cfg.max_log2_tr_dynamic_range = [20, 20];
        let tu = tu(2, 2);
        let resi = vec![1 as pel; 4];
        let view = PelView::new(&resi, 2, 2, 2);
        let mut dst = vec![0; 4];
        let mut blk = vec![0; 4];
        let mut tmp = vec![0; 4];
        /* shift_1st = 1 + 8 + 6 - 20 + 2 = -3 */
        forward_transform(&cfg, &tu, &view, &mut dst, &mut blk, &mut tmp);
    }
}
