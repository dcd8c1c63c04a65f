use std::f64::consts::PI;

use crate::def::*;

/* Integer kernel matrices for DCT-II, DCT-VIII and DST-VII.
 *
 * Row k of an NxN matrix holds basis function k sampled at the N input
 * positions, scaled by 64 * 2^TR_PREC * sqrt(N) and rounded to nearest.
 * The same matrix serves both directions, the inverse stages walk it
 * transposed. DCT-VIII and DST-VII are only defined for 4..32. */

pub(crate) const TR_MATRIX_GAIN: i32 = 64 << TR_PREC; /* 256 */

fn tx_basis(tx: TxType, n: usize, k: usize, j: usize) -> f64 {
    let nf = n as f64;
    let kf = k as f64;
    let jf = j as f64;
    match tx {
        TxType::DCT2 => {
            let ck = if k == 0 { 1.0 / 2f64.sqrt() } else { 1.0 };
            ck * (2.0 / nf).sqrt() * (PI * (2.0 * jf + 1.0) * kf / (2.0 * nf)).cos()
        }
        TxType::DCT8 => {
            (4.0 / (2.0 * nf + 1.0)).sqrt()
                * (PI * (2.0 * kf + 1.0) * (2.0 * jf + 1.0) / (4.0 * nf + 2.0)).cos()
        }
        TxType::DST7 => {
            (4.0 / (2.0 * nf + 1.0)).sqrt()
                * (PI * (2.0 * jf + 1.0) * (kf + 1.0) / (2.0 * nf + 1.0)).sin()
        }
    }
}

fn gen_tx_matrix(tx: TxType, n: usize) -> Box<[i32]> {
    let scale = TR_MATRIX_GAIN as f64 * (n as f64).sqrt();
    let mut m = vec![0i32; n * n];
    for k in 0..n {
        for j in 0..n {
            m[k * n + j] = (scale * tx_basis(tx, n, k, j)).round() as i32;
        }
    }
    m.into_boxed_slice()
}

/* DCT-II nests: the left half of even row 2m equals row m of the
 * half-size matrix at identical scale, odd rows are antisymmetric.
 * Building the matrix that way keeps both identities exact in the
 * rounded integers, like the hand-written tables in deployed codecs. */
fn gen_dct2_matrix(n: usize) -> Box<[i32]> {
    let scale = TR_MATRIX_GAIN as f64 * (n as f64).sqrt();
    let mut m = vec![0i32; n * n];
    let half = if n > 2 {
        Some(gen_dct2_matrix(n / 2))
    } else {
        None
    };
    for k in 0..n {
        match (&half, k & 1) {
            (Some(h), 0) => {
                for j in 0..n / 2 {
                    m[k * n + j] = h[(k / 2) * (n / 2) + j];
                }
            }
            _ => {
                for j in 0..n / 2 {
                    m[k * n + j] = (scale * tx_basis(TxType::DCT2, n, k, j)).round() as i32;
                }
            }
        }
        let sign = if k & 1 != 0 { -1 } else { 1 };
        for j in 0..n / 2 {
            m[k * n + (n - 1 - j)] = sign * m[k * n + j];
        }
    }
    m.into_boxed_slice()
}

lazy_static! {
    /* indexed by [tx type][log2(size) - 1], None where the family has no
     * kernel of that size */
    pub(crate) static ref TX_MATRIX: [[Option<Box<[i32]>>; MAX_TR_LOG2]; NUM_TX_TYPES] = {
        let mut tbl: [[Option<Box<[i32]>>; MAX_TR_LOG2]; NUM_TX_TYPES] = Default::default();
        for log2m1 in 0..MAX_TR_LOG2 {
            let n = 2usize << log2m1;
            tbl[TxType::DCT2 as usize][log2m1] = Some(gen_dct2_matrix(n));
            if n >= 4 && n <= 32 {
                tbl[TxType::DCT8 as usize][log2m1] = Some(gen_tx_matrix(TxType::DCT8, n));
                tbl[TxType::DST7 as usize][log2m1] = Some(gen_tx_matrix(TxType::DST7, n));
            }
        }
        tbl
    };
}
