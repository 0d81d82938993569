use super::tmvp::*;
use super::*;

/* history entries consulted by AMVP */
const MAX_NUM_HMVP_AMVP_CANDS: usize = 4;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmvpInfo {
    pub cands: Vec<Mv>,
}

/* neighbour vector pointing at the same reference picture, target list first */
fn spatial_mvp(nv: &NeighborView, x: isize, y: isize, list: usize, ref_poc: i32) -> Option<Mv> {
    let mi = nv.inter_motion(x, y)?;
    for &l in [list, 1 - list].iter() {
        let r = mi.ref_idx[l];
        if REFI_IS_VALID(r) && nv.sh.ref_poc[l].get(r as usize) == Some(&ref_poc) {
            return Some(mi.mv[l]);
        }
    }
    None
}

/// Builds the two motion vector predictors of `list` for reference `ref_idx`,
/// rounded to the AMVR precision `imv`.
pub fn vvc_get_amvp_cands(
    nv: &NeighborView,
    area: &Area,
    list: usize,
    ref_idx: i8,
    imv: u8,
) -> AmvpInfo {
    let mut info = AmvpInfo {
        cands: Vec::with_capacity(AMVP_MAX_NUM_CANDS),
    };
    let ref_poc = match nv.sh.ref_poc[list].get(ref_idx as usize) {
        Some(p) if REFI_IS_VALID(ref_idx) => *p,
        _ => return info,
    };
    let round = |mut mv: Mv| {
        mv.round_trans_prec_internal2amvr(imv);
        mv
    };
    let (x, y) = (area.x as isize, area.y as isize);
    let (w, h) = (area.width as isize, area.height as isize);

    /* left: A0, A1 */
    if let Some(mv) = spatial_mvp(nv, x - 1, y + h, list, ref_poc)
        .or_else(|| spatial_mvp(nv, x - 1, y + h - 1, list, ref_poc))
    {
        info.cands.push(round(mv));
    }
    /* above: B0, B1, B2 */
    if let Some(mv) = spatial_mvp(nv, x + w, y - 1, list, ref_poc)
        .or_else(|| spatial_mvp(nv, x + w - 1, y - 1, list, ref_poc))
        .or_else(|| spatial_mvp(nv, x - 1, y - 1, list, ref_poc))
    {
        info.cands.push(round(mv));
    }
    if info.cands.len() == 2 && info.cands[0] == info.cands[1] {
        info.cands.pop();
    }

    if info.cands.len() < AMVP_MAX_NUM_CANDS {
        if let Some(mv) = vvc_get_tmvp_amvp(nv, area, list, ref_idx) {
            info.cands.push(round(mv));
        }
    }

    if info.cands.len() < AMVP_MAX_NUM_CANDS {
        'hmvp: for mi in nv.hmvp.newest_first().take(MAX_NUM_HMVP_AMVP_CANDS) {
            for &l in [list, 1 - list].iter() {
                let r = mi.ref_idx[l];
                if REFI_IS_VALID(r) && nv.sh.ref_poc[l].get(r as usize) == Some(&ref_poc) {
                    info.cands.push(round(mi.mv[l]));
                    if info.cands.len() >= AMVP_MAX_NUM_CANDS {
                        break 'hmvp;
                    }
                }
            }
        }
    }

    while info.cands.len() < AMVP_MAX_NUM_CANDS {
        info.cands.push(Mv::default());
    }
    info
}
