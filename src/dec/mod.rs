use super::api::*;
use super::com::df::*;
use super::com::hmvp::HmvpTable;
use super::com::itdq::*;
use super::com::merge::*;
use super::com::recon::*;
use super::com::reshape::*;
use super::com::tracer::*;
use super::com::*;

mod derive;
mod inter;
mod intra;

use derive::vvcd_derive_cu_mv;

use log::*;

/* how a coding unit is turned back into samples */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReconStrategy {
    Intra,
    Inter,
    Palette,
}

impl ReconStrategy {
    fn of(cu: &CodingUnit) -> Result<Self, VvcError> {
        match cu.pred_mode() {
            Some(PredMode::MODE_INTRA) => Ok(ReconStrategy::Intra),
            Some(PredMode::MODE_INTER) | Some(PredMode::MODE_IBC) => Ok(ReconStrategy::Inter),
            Some(PredMode::MODE_PLT) => Ok(ReconStrategy::Palette),
            None => {
                error!("prediction mode {} is not defined", cu.pred_mode);
                Err(VvcError::VVC_ERR_INVALID_PRED_MODE(cu.pred_mode))
            }
        }
    }
}

/*****************************************************************************
 * CORE information used for reconstruction.
 *
 * Scratch buffers are sized for the largest unit and reused across units.
 *****************************************************************************/
pub(crate) struct VvcdCore {
    /* prediction of the current block per component */
    pred: [Vec<pel>; N_C],
    /* intra half of a CIIP blend */
    pred_ciip: [Vec<pel>; N_C],
    /* prediction shared by the transform blocks of one prediction region */
    pred_reg: Vec<pel>,
    pred_reg_area: Option<Area>,
    /* residual of the current transform block */
    tb_resi: [Vec<i32>; N_C],
    /* residual of the whole inter unit */
    resi: [Vec<i32>; N_C],
}

impl VvcdCore {
    fn new() -> Self {
        VvcdCore {
            pred: [vec![0; MAX_CU_DIM], vec![0; MAX_CU_DIM], vec![0; MAX_CU_DIM]],
            pred_ciip: [vec![0; MAX_CU_DIM], vec![0; MAX_CU_DIM], vec![0; MAX_CU_DIM]],
            pred_reg: vec![0; MAX_CU_DIM],
            pred_reg_area: None,
            tb_resi: [vec![0; MAX_TB_DIM], vec![0; MAX_TB_DIM], vec![0; MAX_TB_DIM]],
            resi: [vec![0; MAX_CU_DIM], vec![0; MAX_CU_DIM], vec![0; MAX_CU_DIM]],
        }
    }
}

/******************************************************************************
 * CONTEXT used for reconstruction.
 *
 * One instance per decode stream, units are handed over in coding order.
 *****************************************************************************/
pub(crate) struct VvcdCtx {
    pub(crate) sps: VvcSps,
    /* history-based motion vector predictor table of the current slice */
    pub(crate) hmvp: HmvpTable,
    pub(crate) engines: Engines,
    core: VvcdCore,
    tracer: Option<Tracer>,
}

impl VvcdCtx {
    pub(crate) fn new(sps: VvcSps, engines: Engines) -> Self {
        VvcdCtx {
            sps,
            hmvp: HmvpTable::new(),
            engines,
            core: VvcdCore::new(),
            tracer: OPEN_TRACE(),
        }
    }

    pub(crate) fn decompress_ctu(
        &mut self,
        pic: &mut VvcPic,
        sh: &VvcSh,
        col: Option<&ColPic>,
        cus: &mut [CodingUnit],
        ctu_area: &Area,
    ) -> Result<(), VvcError> {
        debug!(
            "CTU ({}, {}) {}x{} with {} units",
            ctu_area.x,
            ctu_area.y,
            ctu_area.width,
            ctu_area.height,
            cus.len()
        );

        let dual = self.sps.dual_tree
            && sh.is_intra()
            && self.sps.chroma_sampling != ChromaSampling::Cs400;
        let num_ch = if dual { 2 } else { 1 };

        for ch in 0..num_ch {
            self.engines.intra.reset();
            for cu in cus.iter_mut() {
                if dual && cu.ch_type() != ch {
                    continue;
                }
                self.decompress_cu(pic, sh, col, cu)?;
            }
        }
        Ok(())
    }

    fn decompress_cu(
        &mut self,
        pic: &mut VvcPic,
        sh: &VvcSh,
        col: Option<&ColPic>,
        cu: &mut CodingUnit,
    ) -> Result<(), VvcError> {
        TRACE_CU(&mut self.tracer, cu);
        let strategy = ReconStrategy::of(cu)?;
        let a = cu.blocks[cu.ch_type()];
        trace!(
            "{:?} unit at ({}, {}) {}x{}",
            strategy,
            a.x,
            a.y,
            a.width,
            a.height
        );

        let mut geo = None;
        if strategy == ReconStrategy::Inter {
            let nv = NeighborView {
                pic: &*pic,
                sps: &self.sps,
                sh,
                col,
                hmvp: &self.hmvp,
            };
            geo = vvcd_derive_cu_mv(&nv, cu)?;
            if !cu.geo {
                vvc_span_motion_info(&mut pic.mf, cu);
            }
            TRACE_MV(&mut self.tracer, cu);
        }

        match strategy {
            ReconStrategy::Intra | ReconStrategy::Palette => self.recon_intra(pic, sh, cu)?,
            ReconStrategy::Inter => self.recon_inter(pic, sh, cu, geo)?,
        }

        pic.register_cu(cu);
        vvc_set_cu_bs(&mut self.tracer, pic, sh, cu);
        Ok(())
    }

    /// Residual of component `comp` of transform unit `tu` into `tb_resi`.
    ///
    /// A jointly coded chroma pair is decoded entirely while handling Cb.
    fn decode_tu_resi(
        &mut self,
        sh: &VvcSh,
        tu: &TransformUnit,
        comp: usize,
    ) -> Result<(), VvcError> {
        let n = tu.blocks[comp].area();
        if comp != Y_C && tu.joint_cbcr != 0 {
            if comp == U_C {
                let coded = vvc_ict_coded_comp(tu.joint_cbcr);
                let qp = QpParam::new(tu, coded);
                let (lo, hi) = self.core.tb_resi.split_at_mut(V_C);
                let (cb, cr) = (&mut lo[U_C][..n], &mut hi[0][..n]);
                if coded == U_C {
                    self.engines.tr_quant.inv_transform_nxn(tu, U_C, cb, &qp)?;
                } else {
                    self.engines.tr_quant.inv_transform_nxn(tu, V_C, cr, &qp)?;
                }
                self.engines
                    .tr_quant
                    .inv_transform_ict(tu, cb, cr, sh.joint_cbcr_sign);
            }
        } else if tu.cbf[comp] {
            let qp = QpParam::new(tu, comp);
            self.engines
                .tr_quant
                .inv_transform_nxn(tu, comp, &mut self.core.tb_resi[comp][..n], &qp)?;
        } else {
            for r in self.core.tb_resi[comp][..n].iter_mut() {
                *r = 0;
            }
        }
        TRACE_RESI(
            &mut self.tracer,
            comp,
            &tu.blocks[comp],
            &self.core.tb_resi[comp][..n],
        );
        Ok(())
    }

    /* chroma residual scaling of a decoded transform block */
    fn scale_tu_resi(&mut self, tu: &TransformUnit, comp: usize) {
        let area = tu.blocks[comp];
        if comp != Y_C && (tu.cbf[comp] || tu.joint_cbcr != 0) && area.area() > 4 {
            vvc_scale_chroma_resi(
                &mut self.core.tb_resi[comp][..area.area()],
                tu.chroma_adj,
                self.sps.bit_depth,
            );
        }
    }

    /* luma area co-located with a block of component `comp` */
    fn luma_area(&self, comp: usize, area: &Area) -> Area {
        if comp == Y_C {
            return *area;
        }
        let (sx, sy) = self.sps.chroma_sampling.sampling_period();
        Area::new(area.x * sx, area.y * sy, area.width * sx, area.height * sy)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    /* DC of the reconstructed row above and column left, mid-grey without */
    struct DcIntra {
        dc: pel,
        bit_depth: u8,
    }

    impl DcIntra {
        fn fill(&self, pred: &mut [pel]) {
            for p in pred.iter_mut() {
                *p = self.dc;
            }
        }
    }

    impl IntraPredictor for DcIntra {
        fn reset(&mut self) {}

        fn init_intra_pattern(
            &mut self,
            pic: &VvcPic,
            _cu: &CodingUnit,
            comp: usize,
            area: &Area,
            _first_tb_in_cu: bool,
        ) {
            let plane = &pic.frame.planes[comp];
            let (xd, yd) = (plane.cfg.xdec, plane.cfg.ydec);
            let mut sum = 0u32;
            let mut num = 0u32;
            if area.y > 0 && pic.is_decomposed(comp, area.x << xd, (area.y - 1) << yd) {
                for i in 0..area.width {
                    sum += plane.p(area.x + i, area.y - 1) as u32;
                }
                num += area.width as u32;
            }
            if area.x > 0 && pic.is_decomposed(comp, (area.x - 1) << xd, area.y << yd) {
                for j in 0..area.height {
                    sum += plane.p(area.x - 1, area.y + j) as u32;
                }
                num += area.height as u32;
            }
            self.dc = if num == 0 {
                1 << (self.bit_depth - 1)
            } else {
                ((sum + num / 2) / num) as pel
            };
        }

        fn init_intra_mip(&mut self, _cu: &CodingUnit, _comp: usize, _area: &Area) {}

        fn pred_intra_mip(&mut self, _comp: usize, pred: &mut [pel], _cu: &CodingUnit, _area: &Area) {
            self.fill(pred);
        }

        fn pred_intra_ang(&mut self, _comp: usize, pred: &mut [pel], _cu: &CodingUnit, _area: &Area) {
            self.fill(pred);
        }

        fn load_lm_luma_rec(&mut self, _pic: &VvcPic, _cu: &CodingUnit, _area: &Area) {}

        fn pred_intra_chroma_lm(
            &mut self,
            _comp: usize,
            pred: &mut [pel],
            _cu: &CodingUnit,
            _area: &Area,
            _mode: u8,
        ) {
            self.fill(pred);
        }

        fn num_intra_ciip(&self, _pic: &VvcPic, _cu: &CodingUnit) -> i32 {
            0
        }
    }

    /* integer sample copy from a fixed reference, plus the fractional phase */
    #[derive(Clone)]
    struct CopyInter {
        refp: Frame<pel>,
    }

    impl CopyInter {
        fn new(sps: &VvcSps) -> Self {
            let mut refp = Frame::new(sps.width, sps.height, sps.chroma_sampling);
            for plane in refp.planes.iter_mut() {
                let w = plane.cfg.width;
                for (i, p) in plane.data.iter_mut().enumerate() {
                    *p = ((i % w) * 3 + (i / w) * 5) as pel % 1000;
                }
            }
            CopyInter { refp }
        }

        fn predict(&self, comp: usize, area: &Area, mv: Mv, pred: &mut [pel]) {
            let plane = &self.refp.planes[comp];
            let (xd, yd) = (plane.cfg.xdec as i32, plane.cfg.ydec as i32);
            let dx = mv.hor >> (4 + xd);
            let dy = mv.ver >> (4 + yd);
            let phase = ((mv.hor & 15) + (mv.ver & 15)) as pel;
            let (w, h) = (plane.cfg.width as i32, plane.cfg.height as i32);
            for j in 0..area.height {
                for i in 0..area.width {
                    let x = (area.x as i32 + i as i32 + dx).max(0).min(w - 1) as usize;
                    let y = (area.y as i32 + j as i32 + dy).max(0).min(h - 1) as usize;
                    pred[j * area.width + i] = plane.p(x, y) + phase;
                }
            }
        }
    }

    impl InterPredictor for CopyInter {
        fn motion_compensation(
            &mut self,
            cu: &CodingUnit,
            pred: &mut [Vec<pel>; N_C],
        ) -> Result<(), VvcError> {
            for comp in 0..cu.num_valid_components() {
                let list = if cu.pu.inter_dir & 1 != 0 { REFP_0 } else { REFP_1 };
                self.predict(comp, &cu.blocks[comp], cu.pu.mv[list], &mut pred[comp]);
            }
            Ok(())
        }

        fn motion_compensation_geo(
            &mut self,
            cu: &CodingUnit,
            geo: &GeoMergeCtx,
            pred: &mut [Vec<pel>; N_C],
        ) -> Result<(), VvcError> {
            let mi = geo.cands[cu.pu.geo_merge_idx[0] as usize];
            let list = if mi.uses_list(REFP_0) { REFP_0 } else { REFP_1 };
            for comp in 0..cu.num_valid_components() {
                self.predict(comp, &cu.blocks[comp], mi.mv[list], &mut pred[comp]);
            }
            Ok(())
        }
    }

    /* flat residual per component */
    struct FlatTrQuant {
        vals: [i32; N_C],
    }

    impl TrQuant for FlatTrQuant {
        fn inv_transform_nxn(
            &mut self,
            _tu: &TransformUnit,
            comp: usize,
            resi: &mut [i32],
            _qp: &QpParam,
        ) -> Result<(), VvcError> {
            for r in resi.iter_mut() {
                *r = self.vals[comp];
            }
            Ok(())
        }
    }

    fn sps() -> VvcSps {
        let mut sps = VvcSps {
            width: 128,
            height: 64,
            log2_ctu_size: 6,
            ..Default::default()
        };
        sps.validate().unwrap();
        sps
    }

    fn ctx(sps: &VvcSps, vals: [i32; N_C]) -> VvcdCtx {
        VvcdCtx::new(
            sps.clone(),
            Engines {
                intra: Box::new(DcIntra {
                    dc: 0,
                    bit_depth: sps.bit_depth,
                }),
                inter: Box::new(CopyInter::new(sps)),
                tr_quant: Box::new(FlatTrQuant { vals }),
                reshape: Box::new(Reshaper::disabled(sps.bit_depth)),
            },
        )
    }

    fn p_slice() -> VvcSh {
        VvcSh {
            slice_type: SliceType::VVC_ST_P,
            poc: 1,
            ref_poc: [vec![0], vec![]],
            ref_lt: [vec![false], vec![]],
            ..Default::default()
        }
    }

    fn intra_cu(area: Area) -> CodingUnit {
        let mut cu = CodingUnit::new(
            ChromaSampling::Cs420,
            area,
            TreeType::TREE_D,
            PredMode::MODE_INTRA,
        );
        cu.pu.intra_dir[CH_L] = DC_IDX;
        cu.add_tu(area);
        cu
    }

    fn inter_cu(area: Area) -> CodingUnit {
        let mut cu = CodingUnit::new(
            ChromaSampling::Cs420,
            area,
            TreeType::TREE_D,
            PredMode::MODE_INTER,
        );
        cu.add_tu(area);
        cu
    }

    /* an AMVP unit with vector (4, 4) followed by a merge unit on its right */
    fn amvp_then_merge() -> Vec<CodingUnit> {
        let mut a = inter_cu(Area::new(0, 0, 16, 16));
        a.pu.inter_dir = 1;
        a.pu.ref_idx = [0, REFI_INVALID];
        a.pu.mvd[REFP_0] = Mv::new(1, 1);
        let mut b = inter_cu(Area::new(16, 0, 16, 16));
        b.pu.merge_flag = true;
        b.pu.merge_idx = 0;
        vec![a, b]
    }

    fn block(plane: &Plane<pel>, area: &Area) -> Vec<pel> {
        let mut v = vec![0; area.area()];
        plane.copy_to(area, &mut v);
        v
    }

    #[test]
    fn intra_dc_without_references_is_mid_grey() {
        let sps = sps();
        let mut ctx = ctx(&sps, [0; N_C]);
        let mut pic = VvcPic::new(&sps, 0);
        let sh = VvcSh::default();
        let area = Area::new(0, 0, 64, 64);
        let mut cus = vec![intra_cu(area)];
        ctx.decompress_ctu(&mut pic, &sh, None, &mut cus, &area).unwrap();

        assert!(block(&pic.frame.planes[Y_C], &area).iter().all(|&v| v == 512));
        let chroma = Area::new(0, 0, 32, 32);
        assert!(block(&pic.frame.planes[U_C], &chroma).iter().all(|&v| v == 512));
        assert!(block(&pic.frame.planes[V_C], &chroma).iter().all(|&v| v == 512));
        assert!(pic.is_decomposed(Y_C, 60, 60));
        assert!(pic.is_decomposed(V_C, 60, 60));
        assert!(!pic.is_decomposed(Y_C, 64, 0));
    }

    #[test]
    fn intra_dc_averages_left_neighbour() {
        let sps = sps();
        let mut ctx = ctx(&sps, [0; N_C]);
        let mut pic = VvcPic::new(&sps, 0);
        pic.frame.planes[Y_C].fill(100);
        pic.set_decomp(Y_C, &Area::new(0, 0, 64, 64));
        let area = Area::new(64, 0, 64, 64);
        let mut cus = vec![intra_cu(area)];
        ctx.decompress_ctu(&mut pic, &VvcSh::default(), None, &mut cus, &area)
            .unwrap();
        assert!(block(&pic.frame.planes[Y_C], &area).iter().all(|&v| v == 100));
    }

    #[test]
    fn joint_chroma_residual_reconstructs_both_planes() {
        let sps = sps();
        let mut ctx = ctx(&sps, [3, 10, 77]);
        let mut pic = VvcPic::new(&sps, 0);
        let sh = VvcSh {
            joint_cbcr_sign: true,
            ..Default::default()
        };
        let area = Area::new(0, 0, 16, 16);
        let mut cu = intra_cu(area);
        cu.tus[0].cbf = [true, true, true];
        cu.tus[0].joint_cbcr = 3;
        let mut cus = vec![cu];
        ctx.decompress_ctu(&mut pic, &sh, None, &mut cus, &area).unwrap();

        let chroma = Area::new(0, 0, 8, 8);
        assert!(block(&pic.frame.planes[Y_C], &area).iter().all(|&v| v == 515));
        assert!(block(&pic.frame.planes[U_C], &chroma).iter().all(|&v| v == 522));
        assert!(block(&pic.frame.planes[V_C], &chroma).iter().all(|&v| v == 502));
    }

    #[test]
    fn merge_unit_copies_neighbour_prediction() {
        let sps = sps();
        let mut ctx = ctx(&sps, [0; N_C]);
        let mut pic = VvcPic::new(&sps, 1);
        let sh = p_slice();
        let mut cus = amvp_then_merge();
        let ctu = Area::new(0, 0, 64, 64);
        ctx.decompress_ctu(&mut pic, &sh, None, &mut cus, &ctu).unwrap();

        assert_eq!(cus[0].pu.mv[REFP_0], Mv::new(4, 4));
        assert_eq!(cus[1].pu.mv[REFP_0], Mv::new(4, 4));
        assert_eq!(cus[1].pu.ref_idx[REFP_0], 0);

        let stub = CopyInter::new(&sps);
        for comp in 0..N_C {
            let area = cus[1].blocks[comp];
            let mut expected = vec![0; area.area()];
            stub.predict(comp, &area, Mv::new(4, 4), &mut expected);
            assert_eq!(block(&pic.frame.planes[comp], &area), expected);
        }
        assert_eq!(ctx.hmvp.len(), 1);
    }

    #[test]
    fn reconstruction_is_deterministic() {
        let sps = sps();
        let sh = p_slice();
        let ctu = Area::new(0, 0, 64, 64);
        let run = || {
            let mut ctx = ctx(&sps, [2, -1, 1]);
            let mut pic = VvcPic::new(&sps, 1);
            let mut cus = amvp_then_merge();
            for cu in cus.iter_mut() {
                cu.root_cbf = true;
                cu.tus[0].cbf = [true, true, false];
            }
            ctx.decompress_ctu(&mut pic, &sh, None, &mut cus, &ctu).unwrap();
            (pic.frame.planes.clone(), ctx.hmvp.clone(), pic.mf.clone())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn ibc_reconstruction_is_unsupported() {
        let sps = sps();
        let mut ctx = ctx(&sps, [0; N_C]);
        let mut pic = VvcPic::new(&sps, 1);
        let mut cu = inter_cu(Area::new(0, 0, 16, 16));
        cu.pred_mode = PredMode::MODE_IBC as u8;
        cu.pu.merge_flag = true;
        let mut cus = vec![cu];
        let ctu = Area::new(0, 0, 64, 64);
        assert_eq!(
            ctx.decompress_ctu(&mut pic, &p_slice(), None, &mut cus, &ctu),
            Err(VvcError::VVC_ERR_UNSUPPORTED("no IBC support"))
        );
    }

    #[test]
    fn bad_mode_stops_the_ctu() {
        let sps = sps();
        let mut ctx = ctx(&sps, [0; N_C]);
        let mut pic = VvcPic::new(&sps, 0);
        let mut bad = intra_cu(Area::new(0, 0, 32, 32));
        bad.pred_mode = 7;
        let mut cus = vec![bad, intra_cu(Area::new(32, 0, 32, 32))];
        let ctu = Area::new(0, 0, 64, 64);
        assert_eq!(
            ctx.decompress_ctu(&mut pic, &VvcSh::default(), None, &mut cus, &ctu),
            Err(VvcError::VVC_ERR_INVALID_PRED_MODE(7))
        );
        assert!(pic.cu_at(40, 0).is_none());
        assert!(!pic.is_decomposed(Y_C, 40, 0));
    }

    #[test]
    fn ciip_with_mmvd_stops_the_ctu() {
        let sps = sps();
        let mut ctx = ctx(&sps, [0; N_C]);
        let mut pic = VvcPic::new(&sps, 1);
        let mut cu = inter_cu(Area::new(0, 0, 16, 16));
        cu.pu.merge_flag = true;
        cu.pu.mmvd_merge_flag = true;
        cu.pu.ciip = true;
        let mut cus = vec![cu];
        let ctu = Area::new(0, 0, 64, 64);
        assert_eq!(
            ctx.decompress_ctu(&mut pic, &p_slice(), None, &mut cus, &ctu),
            Err(VvcError::VVC_ERR_INVALID_COMBINATION("CIIP with MMVD"))
        );
    }
}
