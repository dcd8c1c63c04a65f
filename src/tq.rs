use crate::api::*;
use crate::def::*;
use crate::plane::*;
use crate::quant::*;
use crate::rdpcm::*;
use crate::tracer::*;
use crate::trans::*;

/* Transform and quantization front end. Owns its scratch buffers and a
 * pluggable quantization service, callers hand in residual and
 * coefficient views over their own planes. */
pub struct TrQuant<Q: QuantService> {
    quant: Q,
    cfg: TqConfig,
    tracer: Option<Tracer>,
    /* scratch, sized for the largest block */
    tmp_coef: Box<[TCoeff]>,
    tx_blk: Box<[TCoeff]>,
    tx_tmp: Box<[TCoeff]>,
    rdpcm_trial: Box<[TCoeff]>,
    rdpcm_best: Box<[TCoeff]>,
}

impl<Q: QuantService> TrQuant<Q> {
    pub fn new(quant: Q, cfg: TqConfig) -> Result<Self, TqError> {
        cfg.validate()?;
        Ok(TrQuant {
            quant,
            cfg,
            tracer: OPEN_TRACE(true),
            tmp_coef: vec![0; MAX_TR_DIM].into_boxed_slice(),
            tx_blk: vec![0; MAX_TR_DIM].into_boxed_slice(),
            tx_tmp: vec![0; MAX_TR_DIM].into_boxed_slice(),
            rdpcm_trial: vec![0; MAX_TR_DIM].into_boxed_slice(),
            rdpcm_best: vec![0; MAX_TR_DIM].into_boxed_slice(),
        })
    }

    pub fn config(&self) -> &TqConfig {
        &self.cfg
    }

    pub fn quant_service(&mut self) -> &mut Q {
        &mut self.quant
    }

    /* Residual to quantized coefficients for one block. Sets the coded
     * block flag on the block and returns the sum of absolute levels. */
    pub fn transform_nxn(
        &mut self,
        tu: &mut TuBlock,
        resi: &PelView<'_>,
        coef: &mut CoeffViewMut<'_>,
        qp: &QpParam,
    ) -> Result<TCoeff, TqError> {
        let width = tu.width;
        let height = tu.height;
        tq_assert_rv(
            resi.width == width && resi.height == height,
            TqError::TQ_ERR_INVALID_ARGUMENT,
        )?;
        tq_assert_rv(
            coef.width == width && coef.height == height,
            TqError::TQ_ERR_INVALID_ARGUMENT,
        )?;

        TRACE_RESI(&mut self.tracer, tu.comp, resi);

        let (rdpcm_mode, mut abs_sum) = rdpcm_nxn(
            &mut self.quant,
            &self.cfg,
            tu,
            resi,
            coef,
            qp,
            &mut self.rdpcm_trial,
            &mut self.rdpcm_best,
        );

        if rdpcm_mode == RdpcmMode::RDPCM_OFF {
            abs_sum = 0;
            if tu.lossless {
                let rotate = tu.rotate_residual(&self.cfg);
                for y in 0..height {
                    for x in 0..width {
                        let v = resi.at(x, y) as TCoeff;
                        let (dx, dy) = if rotate {
                            (width - 1 - x, height - 1 - y)
                        } else {
                            (x, y)
                        };
                        *coef.at_mut(dx, dy) = v;
                        abs_sum += v.abs();
                    }
                }
            } else {
                tq_assert_rv(
                    width <= self.cfg.max_tr_size && height <= self.cfg.max_tr_size,
                    TqError::TQ_ERR_UNSUPPORTED_SIZE,
                )?;
                if tu.transform_skip {
                    transform_skip(&self.cfg, tu, resi, &mut self.tmp_coef[..width * height]);
                } else {
                    forward_transform(
                        &self.cfg,
                        tu,
                        resi,
                        &mut self.tmp_coef,
                        &mut self.tx_blk,
                        &mut self.tx_tmp,
                    );
                }
                abs_sum = self
                    .quant
                    .quant(tu, &self.cfg, &self.tmp_coef[..width * height], coef, qp);
            }
        }

        TRACE_COEF(&mut self.tracer, tu.comp, &coef.as_view());
        tu.cbf = abs_sum > 0;
        Ok(abs_sum)
    }

    /* Quantized coefficients back to residual for one block. */
    pub fn inv_transform_nxn(
        &mut self,
        tu: &TuBlock,
        coef: &CoeffView<'_>,
        resi: &mut PelViewMut<'_>,
        qp: &QpParam,
    ) -> Result<(), TqError> {
        let width = tu.width;
        let height = tu.height;
        tq_assert_rv(
            resi.width == width && resi.height == height,
            TqError::TQ_ERR_INVALID_ARGUMENT,
        )?;
        tq_assert_rv(
            coef.width == width && coef.height == height,
            TqError::TQ_ERR_INVALID_ARGUMENT,
        )?;

        TRACE_COEF(&mut self.tracer, tu.comp, coef);

        if tu.lossless {
            let rotate = tu.rotate_residual(&self.cfg);
            for y in 0..height {
                for x in 0..width {
                    let (sx, sy) = if rotate {
                        (width - 1 - x, height - 1 - y)
                    } else {
                        (x, y)
                    };
                    *resi.at_mut(x, y) = coef.at(sx, sy) as pel;
                }
            }
        } else {
            tq_assert_rv(
                width <= self.cfg.max_tr_size && height <= self.cfg.max_tr_size,
                TqError::TQ_ERR_UNSUPPORTED_SIZE,
            )?;
            self.quant
                .dequant(tu, &self.cfg, coef, &mut self.tmp_coef[..width * height], qp);
            if tu.transform_skip {
                inv_transform_skip(&self.cfg, tu, &self.tmp_coef[..width * height], resi);
            } else {
                inverse_transform(
                    &self.cfg,
                    tu,
                    &self.tmp_coef,
                    resi,
                    &mut self.tx_blk,
                    &mut self.tx_tmp,
                );
            }
        }

        inv_rdpcm_nxn(tu, resi);

        TRACE_RESI(&mut self.tracer, tu.comp, &resi.as_view());
        Ok(())
    }
}
