use super::affine::*;
use super::tbl::*;
use super::tmvp::*;
use super::*;
use crate::api::*;

use log::*;

/* regular merge candidate list */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeCtx {
    pub cands: Vec<MotionInfo>,
}

/* uni-predicted candidates of geometric partitioning */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoMergeCtx {
    pub cands: Vec<MotionInfo>,
}

impl MergeCtx {
    #[inline]
    pub fn len(&self) -> usize {
        self.cands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cands.is_empty()
    }

    fn push(&mut self, mi: &MotionInfo, num_lists: usize) {
        let mut c = *mi;
        c.is_inter = true;
        c.is_ibc = false;
        if num_lists == 1 {
            c.inter_dir &= 1;
        }
        self.cands.push(c.canonical());
    }
}

fn same(a: Option<&MotionInfo>, b: &MotionInfo) -> bool {
    a.map_or(false, |a| a.has_same_motion(b))
}

/// Builds the regular merge list of a block covering `area`.
pub fn vvc_get_inter_merge_cands(nv: &NeighborView, area: &Area) -> MergeCtx {
    let max = nv.sps.max_num_merge_cand;
    let nl = nv.sh.num_lists();
    let mut ctx = MergeCtx {
        cands: Vec::with_capacity(max),
    };
    let (x, y) = (area.x as isize, area.y as isize);
    let (w, h) = (area.width as isize, area.height as isize);
    let nb = |nx: isize, ny: isize| nv.merge_motion(area.x, area.y, nx, ny);

    /* A1 */
    let a1 = nb(x - 1, y + h - 1);
    if let Some(mi) = a1 {
        ctx.push(mi, nl);
        if ctx.len() == max {
            return ctx;
        }
    }

    /* B1 */
    let b1 = nb(x + w - 1, y - 1);
    if let Some(mi) = b1 {
        if !same(a1, mi) {
            ctx.push(mi, nl);
            if ctx.len() == max {
                return ctx;
            }
        }
    }

    /* B0 */
    if let Some(mi) = nb(x + w, y - 1) {
        if !same(b1, mi) {
            ctx.push(mi, nl);
            if ctx.len() == max {
                return ctx;
            }
        }
    }

    /* A0 */
    if let Some(mi) = nb(x - 1, y + h) {
        if !same(a1, mi) {
            ctx.push(mi, nl);
            if ctx.len() == max {
                return ctx;
            }
        }
    }

    /* B2 */
    if ctx.len() < 4 {
        if let Some(mi) = nb(x - 1, y - 1) {
            if !same(a1, mi) && !same(b1, mi) {
                ctx.push(mi, nl);
                if ctx.len() == max {
                    return ctx;
                }
            }
        }
    }

    if let Some(mi) = vvc_get_tmvp_merge_cand(nv, area) {
        ctx.push(&mi, nl);
        if ctx.len() == max {
            return ctx;
        }
    }

    if ctx.len() != max - 1 {
        for (i, mi) in nv.hmvp.newest_first().enumerate() {
            if i >= 2 || (!same(a1, mi) && !same(b1, mi)) {
                let mut c = *mi;
                if c.inter_dir != 3 {
                    c.bcw_idx = BCW_DEFAULT;
                }
                ctx.push(&c, nl);
                if ctx.len() == max - 1 {
                    break;
                }
            }
        }
    }

    if ctx.len() > 1 && ctx.len() < max {
        let (c0, c1) = (ctx.cands[0], ctx.cands[1]);
        let mut avg = MotionInfo {
            is_inter: true,
            use_alt_hpel_if: if c0.use_alt_hpel_if == c1.use_alt_hpel_if {
                c0.use_alt_hpel_if
            } else {
                false
            },
            ..Default::default()
        };
        for l in 0..nl {
            let (ri, rj) = (c0.ref_idx[l], c1.ref_idx[l]);
            if !REFI_IS_VALID(ri) && !REFI_IS_VALID(rj) {
                continue;
            }
            avg.inter_dir |= 1 << l;
            if REFI_IS_VALID(ri) && REFI_IS_VALID(rj) {
                let sum = c0.mv[l] + c1.mv[l];
                avg.mv[l] = vvc_round_affine_mv(sum.hor, sum.ver, 1);
                avg.ref_idx[l] = ri;
            } else if REFI_IS_VALID(ri) {
                avg.mv[l] = c0.mv[l];
                avg.ref_idx[l] = ri;
            } else {
                avg.mv[l] = c1.mv[l];
                avg.ref_idx[l] = rj;
            }
        }
        if avg.inter_dir != 0 {
            ctx.push(&avg, nl);
        }
    }

    let num_ref_idx = if nv.sh.is_inter_b() {
        nv.sh.num_ref_idx(REFP_0).min(nv.sh.num_ref_idx(REFP_1))
    } else {
        nv.sh.num_ref_idx(REFP_0)
    };
    let (mut r, mut refcnt) = (0i8, 0usize);
    while ctx.len() < max {
        let mut z = MotionInfo {
            is_inter: true,
            inter_dir: 1,
            ..Default::default()
        };
        z.ref_idx[REFP_0] = r;
        if nv.sh.is_inter_b() {
            z.inter_dir = 3;
            z.ref_idx[REFP_1] = r;
        }
        ctx.push(&z, nl);
        if refcnt + 1 >= num_ref_idx {
            r = 0;
        } else {
            r += 1;
            refcnt += 1;
        }
    }

    ctx
}

/// Copies a merge candidate into the prediction unit.
pub fn vvc_set_merge_info(cu: &mut CodingUnit, cand: &MotionInfo) {
    cu.pu.inter_dir = cand.inter_dir;
    cu.bcw_idx = if cand.inter_dir == 3 {
        cand.bcw_idx
    } else {
        BCW_DEFAULT
    };
    cu.pu.merge_type = MergeType::MRG_TYPE_DEFAULT_N;
    cu.pu.ref_idx = cand.ref_idx;
    cu.pu.mv = cand.mv;
    cu.pu.mvd = [Mv::default(); REFP_NUM];
    cu.imv = if !cu.geo && cand.use_alt_hpel_if {
        IMV_HPEL
    } else {
        IMV_OFF
    };
}

/// The first two translational merge candidates serve as MMVD bases.
pub fn vvc_get_mmvd_base_cands(ctx: &MergeCtx) -> Vec<MotionInfo> {
    ctx.cands.iter().take(MMVD_BASE_MV_NUM).copied().collect()
}

/// Refines the MMVD base candidate selected by `mmvd_idx` and stores the
/// result in the prediction unit.
pub fn vvc_set_mmvd_merge_info(
    sh: &VvcSh,
    cu: &mut CodingUnit,
    bases: &[MotionInfo],
    mmvd_idx: usize,
) -> Result<(), VvcError> {
    let base_idx = mmvd_idx / MMVD_MAX_REFINE_NUM;
    let base = match bases.get(base_idx) {
        Some(b) => *b,
        None => {
            error!("mmvd base {} with {} bases", base_idx, bases.len());
            return Err(VvcError::VVC_ERR_MALFORMED(format!(
                "mmvd base index {} out of range",
                base_idx
            )));
        }
    };
    let offset = vvc_tbl_mmvd_offset[sh.dis_frac_mmvd as usize][mmvd_idx % MMVD_MAX_REFINE_NUM];

    let (r0, r1) = (base.ref_idx[REFP_0], base.ref_idx[REFP_1]);
    let mut mi = base;
    if REFI_IS_VALID(r0) && REFI_IS_VALID(r1) {
        let cur = sh.poc;
        let poc0 = sh.ref_poc(REFP_0, r0);
        let poc1 = sh.ref_poc(REFP_1, r1);
        let lt = sh.is_long_term(REFP_0, r0) || sh.is_long_term(REFP_1, r1);
        let same_side = (poc1 - cur) * (poc0 - cur) > 0;
        let mut tmp = [offset; REFP_NUM];
        if poc0 == poc1 {
            /* same offset on both lists */
        } else if (poc1 - cur).abs() > (poc0 - cur).abs() {
            tmp[REFP_0] = if lt {
                if same_side {
                    offset
                } else {
                    -offset
                }
            } else {
                match vvc_get_dist_scale_factor(cur, poc0, cur, poc1) {
                    Some(s) => offset.scale_mv(s),
                    None => offset,
                }
            };
        } else {
            tmp[REFP_1] = if lt {
                if same_side {
                    offset
                } else {
                    -offset
                }
            } else {
                match vvc_get_dist_scale_factor(cur, poc1, cur, poc0) {
                    Some(s) => offset.scale_mv(s),
                    None => offset,
                }
            };
        }
        mi.inter_dir = 3;
        mi.mv[REFP_0] = base.mv[REFP_0] + tmp[REFP_0];
        mi.mv[REFP_1] = base.mv[REFP_1] + tmp[REFP_1];
    } else if REFI_IS_VALID(r0) {
        mi.inter_dir = 1;
        mi.mv[REFP_0] = base.mv[REFP_0] + offset;
    } else if REFI_IS_VALID(r1) {
        mi.inter_dir = 2;
        mi.mv[REFP_1] = base.mv[REFP_1] + offset;
    }
    for mv in mi.mv.iter_mut() {
        mv.clip_to_storage_bit_depth();
    }

    vvc_set_merge_info(cu, &mi.canonical());
    cu.pu.merge_idx = base_idx as u8;
    cu.pu.mmvd_merge_flag = true;
    cu.pu.mmvd_merge_idx = mmvd_idx as u16;
    cu.bcw_idx = if mi.inter_dir == 3 {
        base.bcw_idx
    } else {
        BCW_DEFAULT
    };
    Ok(())
}

/// Derives the uni-predicted geometric candidates from the regular list.
pub fn vvc_get_geo_merge_cands(ctx: &MergeCtx) -> GeoMergeCtx {
    let mut geo = GeoMergeCtx::default();
    for (i, c) in ctx.cands.iter().enumerate() {
        let parity = i & 1;
        let list = if c.uses_list(parity) { parity } else { 1 - parity };
        let mut g = MotionInfo {
            is_inter: true,
            inter_dir: 1 << list,
            ..Default::default()
        };
        g.ref_idx[list] = c.ref_idx[list];
        g.mv[list] = c.mv[list];
        geo.cands.push(g);
    }
    geo
}

/* motion stored on 4x4 blocks crossed by the split line */
fn geo_bi_motion(a: &MotionInfo, b: &MotionInfo) -> MotionInfo {
    let mut bi = MotionInfo {
        is_inter: true,
        ..Default::default()
    };
    match (a.inter_dir, b.inter_dir) {
        (1, 2) => {
            bi.inter_dir = 3;
            bi.mv = [a.mv[REFP_0], b.mv[REFP_1]];
            bi.ref_idx = [a.ref_idx[REFP_0], b.ref_idx[REFP_1]];
        }
        (2, 1) => {
            bi.inter_dir = 3;
            bi.mv = [b.mv[REFP_0], a.mv[REFP_1]];
            bi.ref_idx = [b.ref_idx[REFP_0], a.ref_idx[REFP_1]];
        }
        _ => bi = *b,
    }
    bi
}

/// Writes the motion of a geometric block into the motion field.
pub fn vvc_span_geo_motion_info(
    mf: &mut MotionField,
    cu: &CodingUnit,
    geo: &GeoMergeCtx,
) -> Result<(), VvcError> {
    let split_dir = cu.pu.geo_split_dir as usize;
    let (i0, i1) = (
        cu.pu.geo_merge_idx[0] as usize,
        cu.pu.geo_merge_idx[1] as usize,
    );
    let (a, b) = match (geo.cands.get(i0), geo.cands.get(i1), vvc_tbl_geo_params.get(split_dir)) {
        (Some(a), Some(b), Some(_)) => (a, b),
        _ => {
            error!("geo split {} with candidates {}/{}", split_dir, i0, i1);
            return Err(VvcError::VVC_ERR_MALFORMED(
                "geo merge index out of range".to_owned(),
            ));
        }
    };
    let bi = geo_bi_motion(a, b);

    let area = cu.blocks[Y_C];
    let angle = vvc_tbl_geo_params[split_dir][0] as i32;
    let dist_idx = vvc_tbl_geo_params[split_dir][1] as i32;
    let is_flip = (13..=27).contains(&angle) as i32;
    let dist_x = angle as usize;
    let dist_y = ((angle + (GEO_NUM_ANGLES as i32 >> 2)) % GEO_NUM_ANGLES as i32) as usize;
    let (w, h) = (area.width as i32, area.height as i32);
    let mut off_x = (-w) >> 1;
    let mut off_y = (-h) >> 1;
    if dist_idx > 0 {
        if angle % 16 == 8 || (angle % 16 != 0 && h >= w) {
            let d = (dist_idx * h) >> 3;
            off_y += if angle < 16 { d } else { -d };
        } else {
            let d = (dist_idx * w) >> 3;
            off_x += if angle < 16 { d } else { -d };
        }
    }

    for y in 0..(area.height >> MIN_PU_LOG2) {
        let look_up_y = (((4 * y as i32 + off_y) << 1) + 5) * vvc_tbl_geo_dis[dist_y];
        for x in 0..(area.width >> MIN_PU_LOG2) {
            let motion_idx = (((4 * x as i32 + off_x) << 1) + 5) * vvc_tbl_geo_dis[dist_x] + look_up_y;
            let mask = if motion_idx.abs() < 32 {
                2
            } else if motion_idx <= 0 {
                1 - is_flip
            } else {
                is_flip
            };
            let mi = match mask {
                2 => &bi,
                0 => a,
                _ => b,
            };
            *mf.at_mut(area.x + (x << MIN_PU_LOG2), area.y + (y << MIN_PU_LOG2)) = *mi;
        }
    }
    Ok(())
}

/// Writes the final motion of a non-geometric inter unit into the motion field.
pub fn vvc_span_motion_info(mf: &mut MotionField, cu: &CodingUnit) {
    let area = cu.blocks[Y_C];
    let pu = &cu.pu;
    let mi = MotionInfo {
        is_inter: true,
        is_ibc: cu.is_ibc(),
        inter_dir: pu.inter_dir,
        use_alt_hpel_if: cu.imv == IMV_HPEL,
        bcw_idx: cu.bcw_idx,
        ref_idx: pu.ref_idx,
        mv: pu.mv,
    }
    .canonical();

    if pu.merge_flag && pu.merge_type == MergeType::MRG_TYPE_SUBPU_ATMVP {
        let sb = 1 << ATMVP_SUB_BLOCK_SIZE_LOG2;
        let per_row = (area.width / sb).max(1);
        for (i, smi) in pu.sub_pu_mi.iter().enumerate() {
            let sub = Area::new(area.x + (i % per_row) * sb, area.y + (i / per_row) * sb, sb, sb);
            mf.fill(&sub, smi);
        }
        return;
    }

    mf.fill(&area, &mi);
    if cu.affine {
        for l in 0..REFP_NUM {
            if mi.uses_list(l) {
                vvc_set_all_affine_mv(mf, cu, l);
            }
        }
    }
}
