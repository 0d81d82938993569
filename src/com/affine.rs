use super::tbl::*;
use super::tmvp::*;
use super::util::*;
use super::*;

/* affine motion is derived with 7 fractional bits per sample */
const AFFINE_SHIFT: i32 = MAX_CU_LOG2 as i32;
const AFFINE_MIN_BLOCK_SIZE: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct AffineMergeCand {
    pub inter_dir: u8,
    pub ref_idx: [i8; REFP_NUM],
    pub mv_affi: [[Mv; 3]; REFP_NUM],
    pub affine_type: AffineModel,
    pub bcw_idx: u8,
    pub merge_type: MergeType,
    /* motion of each 8x8 sub-block of a sub-block temporal candidate */
    pub sub_pu_mi: Vec<MotionInfo>,
}

impl Default for AffineMergeCand {
    fn default() -> Self {
        AffineMergeCand {
            inter_dir: 0,
            ref_idx: [REFI_INVALID; REFP_NUM],
            mv_affi: [[Mv::default(); 3]; REFP_NUM],
            affine_type: AffineModel::AFFINEMODEL_4PARAM,
            bcw_idx: BCW_DEFAULT,
            merge_type: MergeType::MRG_TYPE_DEFAULT_N,
            sub_pu_mi: Vec::new(),
        }
    }
}

/* sub-block merge candidate list */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AffineMergeCtx {
    pub cands: Vec<AffineMergeCand>,
}

/* affine AMVP predictors of one list: LT, RT, LB */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AffineAmvpInfo {
    pub cands: Vec<[Mv; 3]>,
}

/// Control point motion of `area` extrapolated from an affine neighbour.
fn vvc_inherited_affine_mv(
    nv: &NeighborView,
    area: &Area,
    nb: &CuRecord,
    list: usize,
    six_param: bool,
) -> [Mv; 3] {
    let nba = nb.area;
    let (nx, mut ny) = (nba.x as i32, nba.y as i32);
    let (nw, nh) = (nba.width, nba.height);
    let (cx, cy) = (area.x as i32, area.y as i32);
    let (cw, ch) = (area.width as i32, area.height as i32);

    let mut lt = nb.mv_affi[list][0];
    let mut rt = nb.mv_affi[list][1];
    let lb = nb.mv_affi[list][2];

    let mut top_ctu_boundary = false;
    if nba.bottom() % nv.ctu_size() == 0 && nba.bottom() == area.y {
        /* the neighbour lies in the CTU row above: use its bottom sub-block motion */
        lt = nv.pic.mf.at(nba.x, nba.bottom() - 1).mv[list];
        rt = nv.pic.mf.at(nba.right() - 1, nba.bottom() - 1).mv[list];
        ny += nh as i32;
        top_ctu_boundary = true;
    }

    let shift_w = AFFINE_SHIFT - CONV_LOG2(nw);
    let d_hor_x = (rt.hor - lt.hor) << shift_w;
    let d_hor_y = (rt.ver - lt.ver) << shift_w;
    let (d_ver_x, d_ver_y) =
        if nb.affine_type == AffineModel::AFFINEMODEL_6PARAM && !top_ctu_boundary {
            let shift_h = AFFINE_SHIFT - CONV_LOG2(nh);
            ((lb.hor - lt.hor) << shift_h, (lb.ver - lt.ver) << shift_h)
        } else {
            (-d_hor_y, d_hor_x)
        };

    let scale_hor = lt.hor << AFFINE_SHIFT;
    let scale_ver = lt.ver << AFFINE_SHIFT;
    let at = |px: i32, py: i32| {
        let h = scale_hor + d_hor_x * (px - nx) + d_ver_x * (py - ny);
        let v = scale_ver + d_hor_y * (px - nx) + d_ver_y * (py - ny);
        vvc_round_affine_mv(h, v, AFFINE_SHIFT).clipped()
    };

    let mut out = [Mv::default(); 3];
    out[0] = at(cx, cy);
    out[1] = at(cx + cw, cy);
    if six_param {
        out[2] = at(cx, cy + ch);
    }
    out
}

fn affine_neighbour<'a>(
    nv: &NeighborView<'a>,
    area: &Area,
    x: isize,
    y: isize,
    check_mer: bool,
) -> Option<&'a CuRecord> {
    let rec = nv.cu_at(x, y)?;
    if rec.pred_mode != PredMode::MODE_INTER
        || !rec.affine
        || rec.merge_type != MergeType::MRG_TYPE_DEFAULT_N
    {
        return None;
    }
    if check_mer && nv.merge_motion(area.x, area.y, x, y).is_none() {
        return None;
    }
    Some(rec)
}

/// Builds the sub-block merge list: sub-block temporal, inherited,
/// constructed and zero candidates.
pub fn vvc_get_affine_merge_cands(nv: &NeighborView, area: &Area) -> AffineMergeCtx {
    let max = nv.sps.max_num_affine_merge_cand;
    let sh = nv.sh;
    let nl = sh.num_lists();
    let mut ctx = AffineMergeCtx {
        cands: Vec::with_capacity(max),
    };
    let (x, y) = (area.x as isize, area.y as isize);
    let (w, h) = (area.width as isize, area.height as isize);

    if nv.sps.sbtmvp && sh.tmvp_enabled {
        let a1 = nv.merge_motion(area.x, area.y, x - 1, y + h - 1);
        if let Some((center, sub)) = vvc_get_sbtmvp_cand(nv, area, a1) {
            ctx.cands.push(AffineMergeCand {
                inter_dir: center.inter_dir,
                ref_idx: center.ref_idx,
                mv_affi: [[center.mv[REFP_0]; 3], [center.mv[REFP_1]; 3]],
                merge_type: MergeType::MRG_TYPE_SUBPU_ATMVP,
                sub_pu_mi: sub,
                ..Default::default()
            });
            if ctx.cands.len() == max {
                return ctx;
            }
        }
    }

    if nv.sps.affine {
        let mut nbs: Vec<&CuRecord> = Vec::with_capacity(2);
        for &(px, py) in [(x - 1, y + h), (x - 1, y + h - 1)].iter() {
            if let Some(r) = affine_neighbour(nv, area, px, py, true) {
                nbs.push(r);
                break;
            }
        }
        for &(px, py) in [(x + w, y - 1), (x + w - 1, y - 1), (x - 1, y - 1)].iter() {
            if let Some(r) = affine_neighbour(nv, area, px, py, true) {
                nbs.push(r);
                break;
            }
        }
        for nb in nbs {
            let six = nb.affine_type == AffineModel::AFFINEMODEL_6PARAM;
            let mut cand = AffineMergeCand {
                inter_dir: nb.inter_dir,
                affine_type: nb.affine_type,
                bcw_idx: nb.bcw_idx,
                ..Default::default()
            };
            for l in 0..nl {
                if nb.inter_dir & (1 << l) != 0 {
                    cand.mv_affi[l] = vvc_inherited_affine_mv(nv, area, nb, l, six);
                    cand.ref_idx[l] = nb.ref_idx[l];
                }
            }
            if nl == 1 {
                cand.inter_dir &= 1;
            }
            ctx.cands.push(cand);
            if ctx.cands.len() == max {
                return ctx;
            }
        }

        /* corners LT, RT, LB, RB */
        let mut corner: [Option<MotionInfo>; 4] = [None; 4];
        let mut corner_bcw = [BCW_DEFAULT; 2];
        let mer = |px: isize, py: isize| nv.merge_motion(area.x, area.y, px, py);
        for &(px, py) in [(x - 1, y - 1), (x, y - 1), (x - 1, y)].iter() {
            if let Some(mi) = mer(px, py) {
                corner[0] = Some(*mi);
                corner_bcw[0] = nv.cu_at(px, py).map_or(BCW_DEFAULT, |r| r.bcw_idx);
                break;
            }
        }
        for &(px, py) in [(x + w - 1, y - 1), (x + w, y - 1)].iter() {
            if let Some(mi) = mer(px, py) {
                corner[1] = Some(*mi);
                corner_bcw[1] = nv.cu_at(px, py).map_or(BCW_DEFAULT, |r| r.bcw_idx);
                break;
            }
        }
        for &(px, py) in [(x - 1, y + h - 1), (x - 1, y + h)].iter() {
            if let Some(mi) = mer(px, py) {
                corner[2] = Some(*mi);
                break;
            }
        }
        corner[3] = vvc_get_tmvp_corner(nv, area);

        let start = if nv.sps.affine_type { 0 } else { 4 };
        for model in start..vvc_tbl_affine_model.len() {
            let bcw = if model == 3 {
                corner_bcw[1]
            } else {
                corner_bcw[0]
            };
            if let Some(cand) = affine_control_point_cand(area, &corner, model, bcw, nl) {
                ctx.cands.push(cand);
                if ctx.cands.len() == max {
                    return ctx;
                }
            }
        }
    }

    while ctx.cands.len() < max {
        let mut zero = AffineMergeCand {
            inter_dir: 1,
            ref_idx: [0, REFI_INVALID],
            ..Default::default()
        };
        if sh.is_inter_b() {
            zero.inter_dir = 3;
            zero.ref_idx[REFP_1] = 0;
        }
        ctx.cands.push(zero);
    }
    ctx
}

/* one constructed candidate from the corners named by `model` */
fn affine_control_point_cand(
    area: &Area,
    corner: &[Option<MotionInfo>; 4],
    model: usize,
    bcw: u8,
    num_lists: usize,
) -> Option<AffineMergeCand> {
    let idx = vvc_tbl_affine_model[model];
    let mut mis = Vec::with_capacity(idx.len());
    for &i in idx {
        mis.push(corner[i]?);
    }

    let mut dir = 0u8;
    let mut ref_idx = [REFI_INVALID; REFP_NUM];
    for l in 0..num_lists {
        let r = mis[0].ref_idx[l];
        if mis.iter().all(|m| REFI_IS_VALID(m.ref_idx[l]) && m.ref_idx[l] == r) {
            dir |= 1 << l;
            ref_idx[l] = r;
        }
    }
    if dir == 0 {
        return None;
    }

    let shift_h_to_w = AFFINE_SHIFT + CONV_LOG2(area.width) - CONV_LOG2(area.height);
    let mut mv_affi = [[Mv::default(); 3]; REFP_NUM];
    for l in 0..num_lists {
        if dir & (1 << l) == 0 {
            continue;
        }
        let mut cp = [Mv::default(); 4];
        for (k, &i) in idx.iter().enumerate() {
            cp[i] = mis[k].mv[l];
        }
        match model {
            1 => cp[2] = (cp[3] + cp[0] - cp[1]).clipped(),
            2 => cp[1] = (cp[3] + cp[0] - cp[2]).clipped(),
            3 => cp[0] = (cp[1] + cp[2] - cp[3]).clipped(),
            5 => {
                let vx = (cp[0].hor << AFFINE_SHIFT) + ((cp[2].ver - cp[0].ver) << shift_h_to_w);
                let vy = (cp[0].ver << AFFINE_SHIFT) - ((cp[2].hor - cp[0].hor) << shift_h_to_w);
                cp[1] = vvc_round_affine_mv(vx, vy, AFFINE_SHIFT).clipped();
            }
            _ => {}
        }
        mv_affi[l] = [cp[0], cp[1], cp[2]];
    }

    Some(AffineMergeCand {
        inter_dir: dir,
        ref_idx,
        mv_affi,
        affine_type: if idx.len() == 2 {
            AffineModel::AFFINEMODEL_4PARAM
        } else {
            AffineModel::AFFINEMODEL_6PARAM
        },
        bcw_idx: if dir == 3 { bcw } else { BCW_DEFAULT },
        ..Default::default()
    })
}

/* translational corner predictor with the same reference picture */
fn corner_mvp(nv: &NeighborView, x: isize, y: isize, list: usize, ref_poc: i32) -> Option<Mv> {
    let mi = nv.inter_motion(x, y)?;
    for &l in [list, 1 - list].iter() {
        let r = mi.ref_idx[l];
        if REFI_IS_VALID(r) && nv.sh.ref_poc[l].get(r as usize) == Some(&ref_poc) {
            return Some(mi.mv[l]);
        }
    }
    None
}

/// Builds the two affine AMVP predictors of `list` for reference `ref_idx`.
pub fn vvc_get_affine_amvp_cands(
    nv: &NeighborView,
    cu: &CodingUnit,
    list: usize,
    ref_idx: i8,
) -> AffineAmvpInfo {
    let mut info = AffineAmvpInfo::default();
    let area = cu.blocks[Y_C];
    let ref_poc = match nv.sh.ref_poc[list].get(ref_idx as usize) {
        Some(p) => *p,
        None => return info,
    };
    let six = cu.affine_type == AffineModel::AFFINEMODEL_6PARAM;
    let round = |mut mv: Mv| {
        mv.round_affine_prec_internal2amvr(cu.imv);
        mv
    };
    let (x, y) = (area.x as isize, area.y as isize);
    let (w, h) = (area.width as isize, area.height as isize);

    let inherited = |px: isize, py: isize| -> Option<[Mv; 3]> {
        let nb = affine_neighbour(nv, &area, px, py, false)?;
        let mi = nv.pic.mf.at(px as usize, py as usize);
        for &l in [list, 1 - list].iter() {
            if nb.inter_dir & (1 << l) == 0 {
                continue;
            }
            if nv.sh.ref_poc[l].get(mi.ref_idx[l] as usize) != Some(&ref_poc) {
                continue;
            }
            let mut cp = vvc_inherited_affine_mv(nv, &area, nb, l, six);
            for mv in cp.iter_mut() {
                *mv = round(*mv);
            }
            if !six {
                cp[2] = Mv::default();
            }
            return Some(cp);
        }
        None
    };

    /* left: A0 then A1 */
    if let Some(c) = inherited(x - 1, y + h).or_else(|| inherited(x - 1, y + h - 1)) {
        info.cands.push(c);
    }
    /* above: B0, B1, B2 */
    if let Some(c) = inherited(x + w, y - 1)
        .or_else(|| inherited(x + w - 1, y - 1))
        .or_else(|| inherited(x - 1, y - 1))
    {
        info.cands.push(c);
    }
    if info.cands.len() >= AMVP_MAX_NUM_CANDS {
        info.cands.truncate(AMVP_MAX_NUM_CANDS);
        return info;
    }

    let lt = corner_mvp(nv, x - 1, y - 1, list, ref_poc)
        .or_else(|| corner_mvp(nv, x, y - 1, list, ref_poc))
        .or_else(|| corner_mvp(nv, x - 1, y, list, ref_poc));
    let rt = corner_mvp(nv, x + w - 1, y - 1, list, ref_poc)
        .or_else(|| corner_mvp(nv, x + w, y - 1, list, ref_poc));
    let lb = corner_mvp(nv, x - 1, y + h - 1, list, ref_poc)
        .or_else(|| corner_mvp(nv, x - 1, y + h, list, ref_poc));
    let corners = [lt.map(round), rt.map(round), lb.map(round)];
    let out = [
        corners[0].unwrap_or_default(),
        corners[1].unwrap_or_default(),
        corners[2].unwrap_or_default(),
    ];

    let all3 = corners.iter().all(|c| c.is_some());
    let first2 = corners[0].is_some() && corners[1].is_some();
    if all3 || (first2 && !six) {
        info.cands.push(out);
    }

    if info.cands.len() < 2 {
        for i in (0..3).rev() {
            if info.cands.len() >= AMVP_MAX_NUM_CANDS {
                break;
            }
            if let Some(mv) = corners[i] {
                info.cands.push([mv; 3]);
            }
        }
        if info.cands.len() < 2 {
            if let Some(mv) = vvc_get_tmvp_amvp(nv, &area, list, ref_idx) {
                info.cands.push([round(mv); 3]);
            }
        }
        while info.cands.len() < AMVP_MAX_NUM_CANDS {
            info.cands.push([Mv::default(); 3]);
        }
    }
    info
}

/* reference block of a sub-block exceeds the memory bandwidth bound */
fn vvc_is_subblock_vector_spread_over_limit(a: i32, b: i32, c: i32, d: i32, inter_dir: u8) -> bool {
    let s4 = 4 << 11;
    let tap = 6;
    if inter_dir == 3 {
        let w = (0.max(4 * a + s4).max((4 * c).max(4 * a + 4 * c + s4)))
            - (0.min(4 * a + s4).min((4 * c).min(4 * a + 4 * c + s4)));
        let h = (0.max(4 * b).max((4 * d + s4).max(4 * b + 4 * d + s4)))
            - (0.min(4 * b).min((4 * d + s4).min(4 * b + 4 * d + s4)));
        let w = (w >> 11) + tap + 3;
        let h = (h >> 11) + tap + 3;
        w * h > (tap + 9) * (tap + 9)
    } else {
        let w = ((4 * a + s4).max(0) - (4 * a + s4).min(0) >> 11) + tap + 3;
        let h = ((4 * b).max(0) - (4 * b).min(0) >> 11) + tap + 3;
        if w * h > (tap + 9) * (tap + 4) {
            return true;
        }
        let w = ((4 * c).max(0) - (4 * c).min(0) >> 11) + tap + 3;
        let h = ((4 * d + s4).max(0) - (4 * d + s4).min(0) >> 11) + tap + 3;
        w * h > (tap + 4) * (tap + 9)
    }
}

/// Stores the motion of every 4x4 sub-block of an affine unit for `list`.
pub fn vvc_set_all_affine_mv(mf: &mut MotionField, cu: &CodingUnit, list: usize) {
    let area = cu.blocks[Y_C];
    let [lt, rt, lb] = cu.pu.mv_affi[list];
    let (w, h) = (area.width, area.height);

    let d_hor_x = (rt.hor - lt.hor) << (AFFINE_SHIFT - CONV_LOG2(w));
    let d_hor_y = (rt.ver - lt.ver) << (AFFINE_SHIFT - CONV_LOG2(w));
    let (d_ver_x, d_ver_y) = if cu.affine_type == AffineModel::AFFINEMODEL_6PARAM {
        (
            (lb.hor - lt.hor) << (AFFINE_SHIFT - CONV_LOG2(h)),
            (lb.ver - lt.ver) << (AFFINE_SHIFT - CONV_LOG2(h)),
        )
    } else {
        (-d_hor_y, d_hor_x)
    };
    let scale_hor = lt.hor << AFFINE_SHIFT;
    let scale_ver = lt.ver << AFFINE_SHIFT;
    let spread =
        vvc_is_subblock_vector_spread_over_limit(d_hor_x, d_hor_y, d_ver_x, d_ver_y, cu.pu.inter_dir);
    let half = (AFFINE_MIN_BLOCK_SIZE >> 1) as i32;

    for j in (0..h).step_by(AFFINE_MIN_BLOCK_SIZE) {
        for i in (0..w).step_by(AFFINE_MIN_BLOCK_SIZE) {
            let (px, py) = if spread {
                ((w >> 1) as i32, (h >> 1) as i32)
            } else {
                (half + i as i32, half + j as i32)
            };
            let hor = scale_hor + d_hor_x * px + d_ver_x * py;
            let ver = scale_ver + d_hor_y * px + d_ver_y * py;
            let mv = vvc_round_affine_mv(hor, ver, AFFINE_SHIFT).clipped();
            mf.at_mut(area.x + i, area.y + j).mv[list] = mv;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::*;
    use crate::com::hmvp::HmvpTable;
    use pretty_assertions::assert_eq;

    fn setup() -> (VvcSps, VvcSh, VvcPic) {
        let mut sps = VvcSps {
            width: 128,
            height: 128,
            sbtmvp: false,
            ..Default::default()
        };
        sps.validate().unwrap();
        let sh = VvcSh {
            slice_type: SliceType::VVC_ST_P,
            poc: 8,
            ref_poc: [vec![4], vec![]],
            ref_lt: [vec![false], vec![]],
            ..Default::default()
        };
        let pic = VvcPic::new(&sps, 8);
        (sps, sh, pic)
    }

    fn affine_cu(area: Area, lt: Mv, rt: Mv) -> CodingUnit {
        let mut cu = CodingUnit::new(
            ChromaSampling::Cs420,
            area,
            TreeType::TREE_D,
            PredMode::MODE_INTER,
        );
        cu.affine = true;
        cu.pu.inter_dir = 1;
        cu.pu.ref_idx = [0, REFI_INVALID];
        cu.pu.mv_affi[0] = [lt, rt, Mv::default()];
        cu
    }

    #[test]
    fn translational_affine_spans_constant_motion() {
        let mut mf = MotionField::new(64, 64);
        let cu = affine_cu(Area::new(16, 16, 16, 16), Mv::new(20, -8), Mv::new(20, -8));
        vvc_set_all_affine_mv(&mut mf, &cu, 0);
        for y in (16..32).step_by(4) {
            for x in (16..32).step_by(4) {
                assert_eq!(mf.at(x, y).mv[0], Mv::new(20, -8));
            }
        }
    }

    #[test]
    fn zoom_model_grows_along_width() {
        let mut mf = MotionField::new(64, 64);
        /* 4-parameter model with horizontal gradient 64 over 16 samples */
        let cu = affine_cu(Area::new(0, 0, 16, 16), Mv::new(0, 0), Mv::new(64, 0));
        vvc_set_all_affine_mv(&mut mf, &cu, 0);
        assert_eq!(mf.at(0, 0).mv[0], Mv::new(8, 8));
        assert_eq!(mf.at(12, 0).mv[0], Mv::new(56, 8));
    }

    #[test]
    fn bi_predicted_small_zoom_keeps_per_subblock_motion() {
        let mut mf = MotionField::new(64, 64);
        let mut cu = affine_cu(Area::new(0, 0, 16, 16), Mv::new(0, 0), Mv::new(4, 0));
        cu.pu.inter_dir = 3;
        cu.pu.ref_idx = [0, 0];
        cu.pu.mv_affi[1] = cu.pu.mv_affi[0];
        assert!(!vvc_is_subblock_vector_spread_over_limit(32, 0, 0, 32, 3));
        for l in 0..REFP_NUM {
            vvc_set_all_affine_mv(&mut mf, &cu, l);
            assert_eq!(mf.at(0, 0).mv[l], Mv::new(0, 0));
            assert_eq!(mf.at(12, 0).mv[l], Mv::new(3, 0));
        }
    }

    #[test]
    fn bi_predicted_wide_spread_falls_back_to_centre() {
        let mut mf = MotionField::new(128, 128);
        let mut cu = affine_cu(Area::new(0, 0, 16, 16), Mv::new(0, 0), Mv::new(256, 0));
        cu.pu.inter_dir = 3;
        cu.pu.ref_idx = [0, 0];
        cu.pu.mv_affi[1] = cu.pu.mv_affi[0];
        vvc_set_all_affine_mv(&mut mf, &cu, REFP_1);
        assert_eq!(mf.at(0, 0).mv[REFP_1], mf.at(12, 12).mv[REFP_1]);
    }

    #[test]
    fn inherited_candidate_follows_neighbour_model() {
        let (sps, sh, mut pic) = setup();
        let mut nb = affine_cu(Area::new(0, 16, 16, 16), Mv::new(16, 0), Mv::new(16, 0));
        nb.affine_type = AffineModel::AFFINEMODEL_4PARAM;
        vvc_span_motion_info_for_test(&mut pic, &nb);
        let hmvp = HmvpTable::new();
        let nv = NeighborView {
            pic: &pic,
            sps: &sps,
            sh: &sh,
            col: None,
            hmvp: &hmvp,
        };
        let ctx = vvc_get_affine_merge_cands(&nv, &Area::new(16, 16, 16, 16));
        assert_eq!(ctx.cands.len(), sps.max_num_affine_merge_cand);
        assert_eq!(ctx.cands[0].mv_affi[0][0], Mv::new(16, 0));
        assert_eq!(ctx.cands[0].mv_affi[0][1], Mv::new(16, 0));
        assert_eq!(ctx.cands[0].ref_idx[0], 0);
        /* the last entries are zero padding */
        let last = ctx.cands.last().unwrap();
        assert_eq!(last.mv_affi[0], [Mv::default(); 3]);
        assert_eq!(last.affine_type, AffineModel::AFFINEMODEL_4PARAM);
    }

    #[test]
    fn constructed_model_from_translational_corners() {
        let (sps, sh, mut pic) = setup();
        let place = |pic: &mut VvcPic, area: Area, mv: Mv| {
            let mut cu = CodingUnit::new(
                ChromaSampling::Cs420,
                area,
                TreeType::TREE_D,
                PredMode::MODE_INTER,
            );
            cu.pu.inter_dir = 1;
            cu.pu.ref_idx = [0, REFI_INVALID];
            cu.pu.mv = [mv, Mv::default()];
            vvc_span_motion_info_for_test(pic, &cu);
        };
        place(&mut pic, Area::new(0, 0, 16, 16), Mv::new(4, 4));
        place(&mut pic, Area::new(16, 0, 16, 16), Mv::new(8, 4));
        place(&mut pic, Area::new(0, 16, 16, 16), Mv::new(4, 12));
        let hmvp = HmvpTable::new();
        let nv = NeighborView {
            pic: &pic,
            sps: &sps,
            sh: &sh,
            col: None,
            hmvp: &hmvp,
        };
        let ctx = vvc_get_affine_merge_cands(&nv, &Area::new(16, 16, 16, 16));
        let c = &ctx.cands[0];
        assert_eq!(c.affine_type, AffineModel::AFFINEMODEL_6PARAM);
        assert_eq!(c.mv_affi[0], [Mv::new(4, 4), Mv::new(8, 4), Mv::new(4, 12)]);
    }

    #[test]
    fn affine_amvp_pads_with_zero() {
        let (sps, sh, pic) = setup();
        let hmvp = HmvpTable::new();
        let nv = NeighborView {
            pic: &pic,
            sps: &sps,
            sh: &sh,
            col: None,
            hmvp: &hmvp,
        };
        let cu = affine_cu(Area::new(32, 32, 16, 16), Mv::default(), Mv::default());
        let info = vvc_get_affine_amvp_cands(&nv, &cu, 0, 0);
        assert_eq!(info.cands, vec![[Mv::default(); 3]; 2]);
    }

    fn vvc_span_motion_info_for_test(pic: &mut VvcPic, cu: &CodingUnit) {
        crate::com::merge::vvc_span_motion_info(&mut pic.mf, cu);
        pic.register_cu(cu);
    }
}
