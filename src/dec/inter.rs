use super::*;

impl VvcdCtx {
    /* inter units: whole unit prediction, then the residual of all its transform units */
    pub(super) fn recon_inter(
        &mut self,
        pic: &mut VvcPic,
        sh: &VvcSh,
        cu: &mut CodingUnit,
        geo: Option<GeoMergeCtx>,
    ) -> Result<(), VvcError> {
        if cu.is_ibc() {
            error!("intra block copy at ({}, {})", cu.blocks[Y_C].x, cu.blocks[Y_C].y);
            return Err(VvcError::VVC_ERR_UNSUPPORTED("no IBC support"));
        }
        let num_comp = cu.num_valid_components();
        let lmcs = sh.lmcs_enabled && self.engines.reshape.ctu_flag();

        if let Some(geo) = geo.as_ref() {
            self.engines
                .inter
                .motion_compensation_geo(cu, geo, &mut self.core.pred)?;
            vvc_span_geo_motion_info(&mut pic.mf, cu, geo)?;
        } else {
            self.engines
                .inter
                .motion_compensation(cu, &mut self.core.pred)?;

            if cu.blocks[Y_C].valid() && cu.is_hmvp_eligible() {
                let pu = &cu.pu;
                let mi = MotionInfo {
                    is_inter: true,
                    is_ibc: false,
                    inter_dir: pu.inter_dir,
                    use_alt_hpel_if: cu.imv == IMV_HPEL,
                    bcw_idx: if pu.inter_dir == 3 {
                        cu.bcw_idx
                    } else {
                        BCW_DEFAULT
                    },
                    ref_idx: pu.ref_idx,
                    mv: pu.mv,
                };
                self.hmvp.add(&mi);
            }

            if cu.pu.ciip {
                self.pred_ciip(pic, cu, lmcs);
            }
        }

        /* the CIIP blend already runs in the mapped domain */
        if lmcs && !cu.pu.ciip {
            let n = cu.blocks[Y_C].area();
            vvc_map_pred(&mut self.core.pred[Y_C][..n], self.engines.reshape.fwd_lut());
        }
        for comp in 0..num_comp {
            let area = cu.blocks[comp];
            TRACE_PRED(&mut self.tracer, comp, &area, &self.core.pred[comp][..area.area()]);
        }

        if cu.root_cbf {
            self.decode_cu_resi(pic, sh, cu, lmcs)?;
        }

        let clp = self.sps.clp_rng();
        for comp in 0..num_comp {
            let area = cu.blocks[comp];
            if !area.valid() {
                continue;
            }
            let n = area.area();
            let resi = if cu.root_cbf {
                Some(&self.core.resi[comp][..n])
            } else {
                None
            };
            vvc_recon(
                &self.core.pred[comp][..n],
                resi,
                &area,
                &mut pic.frame.planes[comp],
                &clp,
            );
            pic.set_decomp(comp, &area);
            TRACE_RECO(&mut self.tracer, comp, &area, &pic.frame.planes[comp]);
        }
        Ok(())
    }

    /// Blends a planar intra prediction into the inter prediction of a
    /// combined inter/intra unit.
    fn pred_ciip(&mut self, pic: &VvcPic, cu: &mut CodingUnit, lmcs: bool) {
        cu.pu.intra_dir = [PLANAR_IDX, PLANAR_IDX];

        let y = cu.blocks[Y_C];
        let n = y.area();
        self.engines.intra.init_intra_pattern(pic, cu, Y_C, &y, true);
        self.engines
            .intra
            .pred_intra_ang(Y_C, &mut self.core.pred_ciip[Y_C][..n], cu, &y);
        if lmcs {
            vvc_map_pred(&mut self.core.pred[Y_C][..n], self.engines.reshape.fwd_lut());
        }
        let num_intra = self.engines.intra.num_intra_ciip(pic, cu);
        vvc_weight_ciip(
            &mut self.core.pred[Y_C][..n],
            &self.core.pred_ciip[Y_C][..n],
            num_intra,
        );

        if cu.num_valid_components() > 1 && cu.blocks[U_C].width > 2 {
            for comp in U_C..=V_C {
                let c = cu.blocks[comp];
                let n = c.area();
                self.engines.intra.init_intra_pattern(pic, cu, comp, &c, true);
                self.engines
                    .intra
                    .pred_intra_ang(comp, &mut self.core.pred_ciip[comp][..n], cu, &c);
                vvc_weight_ciip(
                    &mut self.core.pred[comp][..n],
                    &self.core.pred_ciip[comp][..n],
                    num_intra,
                );
            }
        }
    }

    /* residual of every transform unit gathered into the unit sized buffers */
    fn decode_cu_resi(
        &mut self,
        pic: &VvcPic,
        sh: &VvcSh,
        cu: &mut CodingUnit,
        lmcs: bool,
    ) -> Result<(), VvcError> {
        let num_comp = cu.num_valid_components();
        let scaling = lmcs && sh.lmcs_chroma_residual_scale;
        for comp in 0..num_comp {
            let n = cu.blocks[comp].area();
            for r in self.core.resi[comp][..n].iter_mut() {
                *r = 0;
            }
        }

        for t in 0..cu.tus.len() {
            if scaling && (cu.tus[t].cbf[U_C] || cu.tus[t].cbf[V_C]) {
                let tu_y = cu.tus[t].blocks[Y_C];
                cu.tus[t].chroma_adj =
                    self.engines
                        .reshape
                        .chroma_adj(pic, &cu.blocks[Y_C], &tu_y, self.sps.log2_ctu_size);
            }

            /* Cb before Cr keeps a jointly coded Cr residual in place */
            for comp in 0..num_comp {
                let tb = cu.tus[t].blocks[comp];
                if !tb.valid() {
                    continue;
                }
                self.decode_tu_resi(sh, &cu.tus[t], comp)?;
                if scaling {
                    self.scale_tu_resi(&cu.tus[t], comp);
                }

                let cb = cu.blocks[comp];
                let (ox, oy) = (tb.x - cb.x, tb.y - cb.y);
                let w = tb.width;
                for j in 0..tb.height {
                    let dst = (oy + j) * cb.width + ox;
                    self.core.resi[comp][dst..dst + w]
                        .copy_from_slice(&self.core.tb_resi[comp][j * w..(j + 1) * w]);
                }
            }
        }
        Ok(())
    }
}
