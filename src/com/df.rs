use super::tracer::*;
use super::*;
use crate::api::*;

pub(crate) const EDGE_VER: usize = 0;
pub(crate) const EDGE_HOR: usize = 1;

/* half a luma sample at internal precision */
const BS_MV_THRESHOLD: i32 = 8;

#[inline]
fn mv_diff_over(a: Mv, b: Mv) -> bool {
    (a.hor - b.hor).abs() >= BS_MV_THRESHOLD || (a.ver - b.ver).abs() >= BS_MV_THRESHOLD
}

fn ref_pocs(sh: &VvcSh, mi: &MotionInfo) -> [Option<i32>; REFP_NUM] {
    let mut pocs = [None; REFP_NUM];
    for (l, p) in pocs.iter_mut().enumerate() {
        if mi.uses_list(l) {
            *p = sh.ref_poc[l].get(mi.ref_idx[l] as usize).copied();
        }
    }
    pocs
}

fn motion_bs(sh: &VvcSh, p: &MotionInfo, q: &MotionInfo) -> u8 {
    let num_p = p.uses_list(REFP_0) as u8 + p.uses_list(REFP_1) as u8;
    let num_q = q.uses_list(REFP_0) as u8 + q.uses_list(REFP_1) as u8;
    if num_p != num_q {
        return 1;
    }
    let rp = ref_pocs(sh, p);
    let rq = ref_pocs(sh, q);

    if num_p == 2 {
        let straight = rp[0] == rq[0] && rp[1] == rq[1];
        let crossed = rp[0] == rq[1] && rp[1] == rq[0];
        if !straight && !crossed {
            return 1;
        }
        let diff_straight = mv_diff_over(p.mv[0], q.mv[0]) || mv_diff_over(p.mv[1], q.mv[1]);
        let diff_crossed = mv_diff_over(p.mv[0], q.mv[1]) || mv_diff_over(p.mv[1], q.mv[0]);
        let strong = if rp[0] != rp[1] {
            if straight {
                diff_straight
            } else {
                diff_crossed
            }
        } else {
            diff_straight && diff_crossed
        };
        return strong as u8;
    }

    let lp = if p.uses_list(REFP_0) { REFP_0 } else { REFP_1 };
    let lq = if q.uses_list(REFP_0) { REFP_0 } else { REFP_1 };
    if rp[lp] != rq[lq] {
        return 1;
    }
    mv_diff_over(p.mv[lp], q.mv[lq]) as u8
}

/* strength of the edge between P at (xp, yp) and Q at (xq, yq) */
fn edge_bs(pic: &VvcPic, sh: &VvcSh, xp: usize, yp: usize, xq: usize, yq: usize, tu_edge: bool) -> u8 {
    let (cu_p, cu_q) = match (
        pic.cu_at(xp as isize, yp as isize),
        pic.cu_at(xq as isize, yq as isize),
    ) {
        (Some(p), Some(q)) => (p, q),
        _ => return 0,
    };
    if cu_p.pred_mode == PredMode::MODE_INTRA || cu_q.pred_mode == PredMode::MODE_INTRA {
        return 2;
    }
    if tu_edge && (pic.cbf_y_at(xp, yp) || pic.cbf_y_at(xq, yq)) {
        return 1;
    }
    let mp = pic.mf.at(xp, yp);
    let mq = pic.mf.at(xq, yq);
    if !mp.is_inter && !mp.is_ibc || !mq.is_inter && !mq.is_ibc {
        return 0;
    }
    motion_bs(sh, mp, mq)
}

/// Derives the boundary strengths of a registered unit: its left and top
/// edges plus the internal transform edges, on the 4 sample grid.
pub(crate) fn vvc_set_cu_bs(tracer: &mut Option<Tracer>, pic: &mut VvcPic, sh: &VvcSh, cu: &CodingUnit) {
    let area = cu.blocks[Y_C];
    if !area.valid() {
        return;
    }
    let right = area.right().min(pic.width);
    let bottom = area.bottom().min(pic.height);

    let mut ver_edges = vec![area.x];
    let mut hor_edges = vec![area.y];
    for tu in cu.tus.iter() {
        let b = tu.blocks[Y_C];
        if b.x > area.x && !ver_edges.contains(&b.x) {
            ver_edges.push(b.x);
        }
        if b.y > area.y && !hor_edges.contains(&b.y) {
            hor_edges.push(b.y);
        }
    }

    for &x in ver_edges.iter().filter(|&&x| x > 0 && x < right) {
        for y in (area.y..bottom).step_by(MIN_PU_SIZE) {
            let bs = edge_bs(pic, sh, x - 1, y, x, y, true);
            pic.set_bs(EDGE_VER, x, y, bs);
            TRACE_BS(tracer, EDGE_VER, x, y, bs);
        }
    }
    for &y in hor_edges.iter().filter(|&&y| y > 0 && y < bottom) {
        for x in (area.x..right).step_by(MIN_PU_SIZE) {
            let bs = edge_bs(pic, sh, x, y - 1, x, y, true);
            pic.set_bs(EDGE_HOR, x, y, bs);
            TRACE_BS(tracer, EDGE_HOR, x, y, bs);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn setup() -> (VvcSh, VvcPic) {
        let mut sps = VvcSps {
            width: 32,
            height: 16,
            ..Default::default()
        };
        sps.validate().unwrap();
        let sh = VvcSh {
            slice_type: SliceType::VVC_ST_B,
            poc: 4,
            ref_poc: [vec![0, 2], vec![8]],
            ref_lt: [vec![false, false], vec![false]],
            ..Default::default()
        };
        (sh, VvcPic::new(&sps, 4))
    }

    fn inter_cu(pic: &mut VvcPic, area: Area, ref_idx: i8, mv: Mv, cbf: bool) -> CodingUnit {
        let mut cu = CodingUnit::new(
            ChromaSampling::Cs420,
            area,
            TreeType::TREE_D,
            PredMode::MODE_INTER,
        );
        cu.tus.clear();
        cu.add_tu(area).cbf[Y_C] = cbf;
        let mut mi = MotionInfo {
            is_inter: true,
            inter_dir: 1,
            ..Default::default()
        };
        mi.ref_idx[0] = ref_idx;
        mi.mv[0] = mv;
        pic.mf.fill(&area, &mi);
        pic.register_cu(&cu);
        cu
    }

    #[test]
    fn intra_neighbour_is_strong() {
        let (sh, mut pic) = setup();
        let left = CodingUnit::new(
            ChromaSampling::Cs420,
            Area::new(0, 0, 16, 16),
            TreeType::TREE_D,
            PredMode::MODE_INTRA,
        );
        pic.register_cu(&left);
        let cu = inter_cu(&mut pic, Area::new(16, 0, 16, 16), 0, Mv::default(), false);
        vvc_set_cu_bs(&mut None, &mut pic, &sh, &cu);
        assert_eq!(pic.bs_at(EDGE_VER, 16, 0), 2);
        assert_eq!(pic.bs_at(EDGE_VER, 16, 12), 2);
    }

    #[test]
    fn motion_rules() {
        let (sh, mut pic) = setup();
        inter_cu(&mut pic, Area::new(0, 0, 8, 16), 0, Mv::new(0, 0), false);
        let cu = inter_cu(&mut pic, Area::new(8, 0, 8, 16), 0, Mv::new(7, -7), false);
        vvc_set_cu_bs(&mut None, &mut pic, &sh, &cu);
        assert_eq!(pic.bs_at(EDGE_VER, 8, 0), 0);

        let cu = inter_cu(&mut pic, Area::new(16, 0, 8, 16), 0, Mv::new(15, -7), false);
        vvc_set_cu_bs(&mut None, &mut pic, &sh, &cu);
        assert_eq!(pic.bs_at(EDGE_VER, 16, 4), 1);

        let cu = inter_cu(&mut pic, Area::new(24, 0, 8, 16), 1, Mv::new(15, -7), false);
        vvc_set_cu_bs(&mut None, &mut pic, &sh, &cu);
        assert_eq!(pic.bs_at(EDGE_VER, 24, 8), 1);
    }

    #[test]
    fn coded_residual_on_transform_edge() {
        let (sh, mut pic) = setup();
        inter_cu(&mut pic, Area::new(0, 0, 16, 16), 0, Mv::default(), true);
        let cu = inter_cu(&mut pic, Area::new(16, 0, 16, 16), 0, Mv::default(), false);
        vvc_set_cu_bs(&mut None, &mut pic, &sh, &cu);
        assert_eq!(pic.bs_at(EDGE_VER, 16, 0), 1);
        assert_eq!(pic.bs_at(EDGE_HOR, 16, 0), 0);
    }

    #[test]
    fn internal_transform_edges() {
        let (sh, mut pic) = setup();
        let area = Area::new(0, 0, 32, 16);
        let mut cu = CodingUnit::new(
            ChromaSampling::Cs420,
            area,
            TreeType::TREE_D,
            PredMode::MODE_INTRA,
        );
        cu.add_tu(Area::new(0, 0, 16, 16));
        cu.add_tu(Area::new(16, 0, 16, 16));
        pic.register_cu(&cu);
        vvc_set_cu_bs(&mut None, &mut pic, &sh, &cu);
        assert_eq!(pic.bs_at(EDGE_VER, 16, 8), 2);
        assert_eq!(pic.bs_at(EDGE_VER, 8, 8), 0);
    }

    #[test]
    fn bi_pairs_match_crossed() {
        let (sh, _) = setup();
        let mut p = MotionInfo {
            is_inter: true,
            inter_dir: 3,
            ..Default::default()
        };
        p.ref_idx = [0, 0];
        p.mv = [Mv::new(4, 0), Mv::new(-4, 0)];
        let mut q = p;
        assert_eq!(motion_bs(&sh, &p, &q), 0);
        q.mv[1] = Mv::new(4, 0);
        assert_eq!(motion_bs(&sh, &p, &q), 1);
        q.inter_dir = 1;
        q.ref_idx[1] = REFI_INVALID;
        assert_eq!(motion_bs(&sh, &p, &q), 1);
    }
}
