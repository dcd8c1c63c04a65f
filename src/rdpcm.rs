use num_traits::FromPrimitive;

use crate::api::*;
use crate::def::*;
use crate::plane::*;
use crate::quant::*;

/* Residual DPCM for non-transformed blocks. Samples are predicted from
 * the reconstructed neighbor along one axis and only the quantized
 * prediction deltas reach the coefficient buffer. */

#[inline]
fn intra_rdpcm_mode(tu: &TuBlock) -> RdpcmMode {
    match tu.intra_dir {
        IntraDir::IPD_VER => RdpcmMode::RDPCM_VER,
        IntraDir::IPD_HOR => RdpcmMode::RDPCM_HOR,
        IntraDir::IPD_OTHER => RdpcmMode::RDPCM_OFF,
    }
}

/* One forward DPCM pass in the given mode, writing levels (or raw
 * deltas when bypassing quantization) into a contiguous coefficient
 * buffer. Returns the sum of absolute output values. */
pub(crate) fn rdpcm_forward_transform<Q: QuantService>(
    quant: &mut Q,
    cfg: &TqConfig,
    tu: &TuBlock,
    resi: &PelView<'_>,
    coef: &mut [TCoeff],
    qp: &QpParam,
    mode: RdpcmMode,
) -> TCoeff {
    let width = tu.width;
    let height = tu.height;
    let rotate = tu.rotate_residual(cfg);
    let size_m1 = width * height - 1;
    let use_half_rounding = mode != RdpcmMode::RDPCM_OFF;

    /* the major axis walks across prediction chains, the minor axis
     * walks along one chain */
    let (major_limit, minor_limit) = if mode == RdpcmMode::RDPCM_VER {
        (width, height)
    } else {
        (height, width)
    };

    let mut abs_sum: TCoeff = 0;
    for major in 0..major_limit {
        let mut acc: TCoeff = 0;
        for minor in 0..minor_limit {
            let (x, y) = if mode == RdpcmMode::RDPCM_VER {
                (major, minor)
            } else {
                (minor, major)
            };
            let pos = y * width + x;
            let idx = if rotate { size_m1 - pos } else { pos };
            let delta = resi.at(x, y) as TCoeff - acc;

            let rec_delta;
            if tu.lossless {
                coef[idx] = delta;
                rec_delta = delta;
            } else {
                let lev = quant.tr_skip_quant_one_sample(tu, cfg, delta, idx, qp, use_half_rounding);
                coef[idx] = lev;
                rec_delta = quant.inv_tr_skip_dequant_one_sample(tu, cfg, lev, idx, qp);
            }
            abs_sum += coef[idx].abs();
            if mode != RdpcmMode::RDPCM_OFF {
                acc += rec_delta;
            }
        }
    }
    abs_sum
}

/* Forward DPCM decision for one block. Intra blocks inherit the mode
 * from the prediction direction, inter blocks search all modes with
 * isolated per-candidate state and keep the smallest absolute sum
 * (earlier candidate wins ties). Writes the chosen levels to the
 * coefficient plane and persists the mode on the block. */
pub(crate) fn rdpcm_nxn<Q: QuantService>(
    quant: &mut Q,
    cfg: &TqConfig,
    tu: &mut TuBlock,
    resi: &PelView<'_>,
    coef: &mut CoeffViewMut<'_>,
    qp: &QpParam,
    trial: &mut [TCoeff],
    best: &mut [TCoeff],
) -> (RdpcmMode, TCoeff) {
    let area = tu.area();
    let mut mode = RdpcmMode::RDPCM_OFF;
    let mut abs_sum: TCoeff = 0;

    if !tu.rdpcm_enabled || !(tu.transform_skip || tu.lossless) {
        tu.rdpcm_mode = mode;
        return (mode, 0);
    }

    if tu.is_intra() {
        mode = intra_rdpcm_mode(tu);
        if mode != RdpcmMode::RDPCM_OFF {
            abs_sum = rdpcm_forward_transform(quant, cfg, tu, resi, &mut trial[..area], qp, mode);
            copy_to_plane(&trial[..area], coef);
        }
    } else {
        let mut best_sum = TCoeff::max_value();
        for m in 0..NUM_RDPCM_MODES {
            let cand = RdpcmMode::from_usize(m).unwrap();
            let sum = rdpcm_forward_transform(quant, cfg, tu, resi, &mut trial[..area], qp, cand);
            if sum < best_sum {
                best_sum = sum;
                mode = cand;
                if cand != RdpcmMode::RDPCM_OFF {
                    best[..area].copy_from_slice(&trial[..area]);
                }
            }
        }
        if mode != RdpcmMode::RDPCM_OFF {
            abs_sum = best_sum;
            copy_to_plane(&best[..area], coef);
        }
    }

    tu.rdpcm_mode = mode;
    (mode, abs_sum)
}

fn copy_to_plane(src: &[TCoeff], dst: &mut CoeffViewMut<'_>) {
    for y in 0..dst.height {
        for x in 0..dst.width {
            *dst.at_mut(x, y) = src[y * dst.width + x];
        }
    }
}

/* Inverse DPCM over already dequantized and rescaled residual. Each
 * sample is restored from its reconstructed neighbor, saturating to the
 * sample range. */
pub(crate) fn inv_rdpcm_nxn(tu: &TuBlock, resi: &mut PelViewMut<'_>) {
    if !tu.rdpcm_enabled || !(tu.transform_skip || tu.lossless) {
        return;
    }
    let mode = if tu.is_intra() {
        intra_rdpcm_mode(tu)
    } else {
        tu.rdpcm_mode
    };

    let pel_min = pel::min_value() as TCoeff;
    let pel_max = pel::max_value() as TCoeff;
    match mode {
        RdpcmMode::RDPCM_OFF => {}
        RdpcmMode::RDPCM_VER => {
            for x in 0..tu.width {
                for y in 1..tu.height {
                    let v = resi.at(x, y) as TCoeff + resi.at(x, y - 1) as TCoeff;
                    *resi.at_mut(x, y) = TQ_CLIP3(pel_min, pel_max, v) as pel;
                }
            }
        }
        RdpcmMode::RDPCM_HOR => {
            for y in 0..tu.height {
                for x in 1..tu.width {
                    let v = resi.at(x, y) as TCoeff + resi.at(x - 1, y) as TCoeff;
                    *resi.at_mut(x, y) = TQ_CLIP3(pel_min, pel_max, v) as pel;
                }
            }
        }
    }
}
