use super::*;

/* temporal motion is read on an 8x8 grid */
const COL_GRID_LOG2: usize = 3;

#[inline]
fn col_compress(v: usize) -> usize {
    (v >> COL_GRID_LOG2) << COL_GRID_LOG2
}

/// Collocated motion vector for reference `ref_idx` of `list`, read at luma
/// position (x, y) of the collocated picture and scaled by POC distance.
pub(crate) fn vvc_get_col_mvp(
    nv: &NeighborView,
    x: usize,
    y: usize,
    list: usize,
    ref_idx: i8,
    sb_flag: bool,
) -> Option<Mv> {
    let col = nv.col?;
    let sh = nv.sh;
    let mi = col.mf.at(col_compress(x), col_compress(y));
    if !mi.is_inter || mi.is_ibc {
        return None;
    }

    let (col_list, col_ref_idx) = if sb_flag && !sh.check_ldc {
        /* sub-block motion of non low-delay slices stays on the queried list */
        let col_ref_idx = mi.ref_idx[list];
        if !REFI_IS_VALID(col_ref_idx) {
            return None;
        }
        (list, col_ref_idx)
    } else {
        let col_list = if sh.check_ldc {
            list
        } else {
            sh.col_from_l0 as usize
        };
        if REFI_IS_VALID(mi.ref_idx[col_list]) {
            (col_list, mi.ref_idx[col_list])
        } else if REFI_IS_VALID(mi.ref_idx[1 - col_list]) {
            (1 - col_list, mi.ref_idx[1 - col_list])
        } else {
            return None;
        }
    };

    if ref_idx as usize >= sh.num_ref_idx(list) {
        return None;
    }
    let is_lt_curr = sh.is_long_term(list, ref_idx);
    let is_lt_col = col.is_long_term(col_list, col_ref_idx);
    if is_lt_curr != is_lt_col {
        return None;
    }

    let col_mv = mi.mv[col_list];
    let col_ref_poc = col.ref_poc(col_list, col_ref_idx)?;
    if is_lt_col {
        return Some(col_mv);
    }
    let curr_ref_poc = *sh.ref_poc[list].get(ref_idx as usize)?;
    match vvc_get_dist_scale_factor(sh.poc, curr_ref_poc, col.poc, col_ref_poc) {
        Some(scale) => Some(col_mv.scale_mv(scale)),
        None => Some(col_mv),
    }
}

/* bottom-right position (x+w, y+h), kept only inside the picture and the current CTU row */
fn col_bottom_right(nv: &NeighborView, area: &Area) -> Option<(usize, usize)> {
    let (xr, yr) = (area.right(), area.bottom());
    let ctu_mask = nv.ctu_size() - 1;
    if xr < nv.pic.width && yr < nv.pic.height && ((yr - MIN_PU_SIZE) & ctu_mask) + MIN_PU_SIZE < nv.ctu_size()
    {
        Some((xr, yr))
    } else {
        None
    }
}

#[inline]
fn tmvp_allowed(nv: &NeighborView, area: &Area) -> bool {
    nv.sps.tmvp && nv.sh.tmvp_enabled && nv.col.is_some() && area.width + area.height > 12
}

fn col_mvp_br_or_center(nv: &NeighborView, area: &Area, list: usize, ref_idx: i8) -> Option<Mv> {
    if let Some((x, y)) = col_bottom_right(nv, area) {
        if let Some(mv) = vvc_get_col_mvp(nv, x, y, list, ref_idx, false) {
            return Some(mv);
        }
    }
    let (xc, yc) = (area.x + (area.width >> 1), area.y + (area.height >> 1));
    vvc_get_col_mvp(nv, xc, yc, list, ref_idx, false)
}

/// Temporal merge candidate, reference index 0 in each list.
pub(crate) fn vvc_get_tmvp_merge_cand(nv: &NeighborView, area: &Area) -> Option<MotionInfo> {
    if !tmvp_allowed(nv, area) {
        return None;
    }
    let mut mi = MotionInfo {
        is_inter: true,
        ..Default::default()
    };
    for list in 0..nv.sh.num_lists() {
        if nv.sh.num_ref_idx(list) == 0 {
            continue;
        }
        if let Some(mv) = col_mvp_br_or_center(nv, area, list, 0) {
            mi.inter_dir |= 1 << list;
            mi.ref_idx[list] = 0;
            mi.mv[list] = mv;
        }
    }
    if mi.inter_dir != 0 {
        Some(mi)
    } else {
        None
    }
}

/// Temporal AMVP predictor for one list.
pub(crate) fn vvc_get_tmvp_amvp(
    nv: &NeighborView,
    area: &Area,
    list: usize,
    ref_idx: i8,
) -> Option<Mv> {
    if !tmvp_allowed(nv, area) {
        return None;
    }
    col_mvp_br_or_center(nv, area, list, ref_idx)
}

/// Bottom-right collocated corner motion of a constructed affine candidate.
pub(crate) fn vvc_get_tmvp_corner(nv: &NeighborView, area: &Area) -> Option<MotionInfo> {
    if !nv.sh.tmvp_enabled || nv.col.is_none() {
        return None;
    }
    let (x, y) = col_bottom_right(nv, area)?;
    let mut mi = MotionInfo {
        is_inter: true,
        ..Default::default()
    };
    for list in 0..nv.sh.num_lists() {
        if nv.sh.num_ref_idx(list) == 0 {
            continue;
        }
        if let Some(mv) = vvc_get_col_mvp(nv, x, y, list, 0, false) {
            mi.inter_dir |= 1 << list;
            mi.ref_idx[list] = 0;
            mi.mv[list] = mv;
        }
    }
    if mi.inter_dir != 0 {
        Some(mi)
    } else {
        None
    }
}

/* clamps a collocated position to the current CTU plus a 4 sample margin on the right */
fn clip_col_pos(nv: &NeighborView, area: &Area, x: i32, y: i32) -> (usize, usize) {
    let ctu = nv.ctu_size() as i32;
    let ctu_x = (area.x as i32 / ctu) * ctu;
    let ctu_y = (area.y as i32 / ctu) * ctu;
    let hor_max = (nv.pic.width as i32 - 1).min(ctu_x + ctu + 3);
    let ver_max = (nv.pic.height as i32 - 1).min(ctu_y + ctu - 1);
    (
        x.max(ctu_x).min(hor_max) as usize,
        y.max(ctu_y).min(ver_max) as usize,
    )
}

/// Sub-block temporal candidate: the motion of the centre and of each 8x8
/// sub-block in raster order.
pub(crate) fn vvc_get_sbtmvp_cand(
    nv: &NeighborView,
    area: &Area,
    a1: Option<&MotionInfo>,
) -> Option<(MotionInfo, Vec<MotionInfo>)> {
    let sh = nv.sh;
    if !nv.sps.sbtmvp || !sh.tmvp_enabled || area.width < 8 || area.height < 8 {
        return None;
    }
    let col = nv.col?;

    let mut temp_mv = Mv::default();
    if let Some(a1) = a1 {
        for list in 0..sh.num_lists() {
            if a1.uses_list(list)
                && sh.ref_poc[list].get(a1.ref_idx[list] as usize) == Some(&col.poc)
            {
                temp_mv = a1.mv[list];
                break;
            }
        }
    }
    let tx = vvc_round_mv_comp(temp_mv.hor, MV_FRACTIONAL_BITS_INTERNAL);
    let ty = vvc_round_mv_comp(temp_mv.ver, MV_FRACTIONAL_BITS_INTERNAL);

    let (cx, cy) = clip_col_pos(
        nv,
        area,
        (area.x + (area.width >> 1)) as i32 + tx,
        (area.y + (area.height >> 1)) as i32 + ty,
    );
    let cmi = col.mf.at(col_compress(cx), col_compress(cy));
    if !cmi.is_inter || cmi.is_ibc {
        return None;
    }
    let mut center = MotionInfo {
        is_inter: true,
        ..Default::default()
    };
    for list in 0..sh.num_lists() {
        if let Some(mv) = vvc_get_col_mvp(nv, col_compress(cx), col_compress(cy), list, 0, true) {
            center.inter_dir |= 1 << list;
            center.ref_idx[list] = 0;
            center.mv[list] = mv;
        }
    }
    if center.inter_dir == 0 {
        return None;
    }

    let sb = 1 << ATMVP_SUB_BLOCK_SIZE_LOG2;
    let mut sub = Vec::with_capacity((area.width / sb) * (area.height / sb));
    for y in (area.y..area.bottom()).step_by(sb) {
        for x in (area.x..area.right()).step_by(sb) {
            let (px, py) = clip_col_pos(
                nv,
                area,
                (x + (sb >> 1)) as i32 + tx,
                (y + (sb >> 1)) as i32 + ty,
            );
            let (px, py) = (col_compress(px), col_compress(py));
            let colmi = col.mf.at(px, py);
            let mut mi = MotionInfo {
                is_inter: true,
                ..Default::default()
            };
            if colmi.is_inter && !colmi.is_ibc {
                for list in 0..sh.num_lists() {
                    if let Some(mv) = vvc_get_col_mvp(nv, px, py, list, 0, true) {
                        mi.inter_dir |= 1 << list;
                        mi.ref_idx[list] = 0;
                        mi.mv[list] = mv;
                    }
                }
            }
            if mi.inter_dir == 0 {
                mi = center;
            }
            sub.push(mi);
        }
    }
    Some((center, sub))
}
