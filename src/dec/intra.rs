use super::*;

impl VvcdCtx {
    /* intra and palette units, one channel type after the other */
    pub(super) fn recon_intra(
        &mut self,
        pic: &mut VvcPic,
        sh: &VvcSh,
        cu: &mut CodingUnit,
    ) -> Result<(), VvcError> {
        self.core.pred_reg_area = None;
        let num_ch = cu.chroma_sampling.num_channel_types();
        for ch in CH_L..num_ch {
            if !cu.blocks[ch].valid() {
                continue;
            }
            for t in 0..cu.tus.len() {
                if ch == CH_L {
                    self.recon_intra_blk(pic, sh, cu, t, Y_C)?;
                } else {
                    for comp in U_C..cu.num_valid_components() {
                        self.recon_intra_blk(pic, sh, cu, t, comp)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn recon_intra_blk(
        &mut self,
        pic: &mut VvcPic,
        sh: &VvcSh,
        cu: &mut CodingUnit,
        t: usize,
        comp: usize,
    ) -> Result<(), VvcError> {
        let area = cu.tus[t].blocks[comp];
        if !area.valid() {
            return Ok(());
        }
        let n = area.area();
        let ch = if comp == Y_C { CH_L } else { CH_C };
        let mode = match cu.pu.intra_dir[ch] {
            DM_CHROMA_IDX if ch == CH_C => cu.pu.intra_dir[CH_L],
            m => m,
        };

        /* reference samples */
        self.engines
            .intra
            .init_intra_pattern(pic, cu, comp, &area, t == 0);

        /* prediction */
        if comp != Y_C && vvc_is_lmc_mode(mode) {
            self.engines.intra.load_lm_luma_rec(pic, cu, &area);
            self.engines.intra.pred_intra_chroma_lm(
                comp,
                &mut self.core.pred[comp][..n],
                cu,
                &area,
                mode,
            );
        } else if vvc_is_mip(cu, ch) {
            self.engines.intra.init_intra_mip(cu, comp, &area);
            self.engines
                .intra
                .pred_intra_mip(comp, &mut self.core.pred[comp][..n], cu, &area);
        } else if vvc_is_pred_reg_diff_from_tb(cu, comp) {
            self.pred_from_region(cu, comp, &area);
        } else {
            self.engines
                .intra
                .pred_intra_ang(comp, &mut self.core.pred[comp][..n], cu, &area);
        }
        TRACE_PRED(&mut self.tracer, comp, &area, &self.core.pred[comp][..n]);

        /* chroma residual scale */
        let lmcs = sh.lmcs_enabled && (sh.is_intra() || self.engines.reshape.ctu_flag());
        let scaling = lmcs && sh.lmcs_chroma_residual_scale;
        if scaling && comp != Y_C && (cu.tus[t].cbf[U_C] || cu.tus[t].cbf[V_C]) {
            let area_y = if cu.tus[t].blocks[Y_C].valid() {
                cu.tus[t].blocks[Y_C]
            } else {
                self.luma_area(comp, &cu.tus[t].blocks[comp])
            };
            let cu_y = if cu.blocks[Y_C].valid() {
                cu.blocks[Y_C]
            } else {
                self.luma_area(comp, &cu.blocks[comp])
            };
            cu.tus[t].chroma_adj =
                self.engines
                    .reshape
                    .chroma_adj(pic, &cu_y, &area_y, self.sps.log2_ctu_size);
        }

        /* residual */
        self.decode_tu_resi(sh, &cu.tus[t], comp)?;
        if scaling {
            self.scale_tu_resi(&cu.tus[t], comp);
        }

        /* intra sub-partitions mark the whole luma block with the first one */
        if cu.isp_mode == IspMode::NOT_INTRA_SUBPARTITIONS || comp != Y_C {
            pic.set_decomp(comp, &area);
        } else if vvc_is_isp_first(cu, &area, comp) {
            pic.set_decomp(comp, &cu.blocks[comp]);
        }

        vvc_recon(
            &self.core.pred[comp][..n],
            Some(&self.core.tb_resi[comp][..n]),
            &area,
            &mut pic.frame.planes[comp],
            &self.sps.clp_rng(),
        );
        TRACE_RECO(&mut self.tracer, comp, &area, &pic.frame.planes[comp]);
        Ok(())
    }

    /// Prediction of a transform block narrower than the prediction region
    /// it belongs to. The region is predicted on its first block and the
    /// following blocks take their columns out of it.
    fn pred_from_region(&mut self, cu: &CodingUnit, comp: usize, area: &Area) {
        let fresh = match self.core.pred_reg_area {
            Some(reg) => !reg.contains(area.x, area.y),
            None => true,
        };
        if fresh || vvc_is_first_tb_in_pred_reg(cu, comp, area) {
            let reg = Area::new(
                area.x,
                area.y,
                area.width.max(PRED_REG_MIN_WIDTH),
                area.height,
            );
            self.engines
                .intra
                .pred_intra_ang(comp, &mut self.core.pred_reg[..reg.area()], cu, &reg);
            self.core.pred_reg_area = Some(reg);
        }

        if let Some(reg) = self.core.pred_reg_area {
            let off = area.x - reg.x;
            let w = area.width;
            for j in 0..area.height {
                let src = j * reg.width + off;
                self.core.pred[comp][j * w..(j + 1) * w]
                    .copy_from_slice(&self.core.pred_reg[src..src + w]);
            }
        }
    }
}
