use crate::api::*;
use crate::com::affine::*;
use crate::com::amvp::*;
use crate::com::merge::*;
use crate::com::*;

use log::*;

fn malformed(msg: String) -> VvcError {
    error!("{}", msg);
    VvcError::VVC_ERR_MALFORMED(msg)
}

/// Resolves the final motion of an inter or IBC unit.
///
/// Geometric units return their candidate list, the motion field of those
/// units is written once the split is reconstructed.
pub(crate) fn vvcd_derive_cu_mv(
    nv: &NeighborView,
    cu: &mut CodingUnit,
) -> Result<Option<GeoMergeCtx>, VvcError> {
    let area = cu.blocks[Y_C];
    if !area.valid() {
        return Err(malformed("inter unit without a luma block".to_owned()));
    }

    if cu.pu.merge_flag {
        if cu.pu.mmvd_merge_flag || cu.mmvd_skip {
            if cu.pu.ciip {
                error!("CIIP signalled together with MMVD at ({}, {})", area.x, area.y);
                return Err(VvcError::VVC_ERR_INVALID_COMBINATION("CIIP with MMVD"));
            }
            let ctx = vvc_get_inter_merge_cands(nv, &area);
            let bases = vvc_get_mmvd_base_cands(&ctx);
            let mmvd_idx = cu.pu.mmvd_merge_idx as usize;
            vvc_set_mmvd_merge_info(nv.sh, cu, &bases, mmvd_idx)?;
        } else if cu.geo {
            let ctx = vvc_get_inter_merge_cands(nv, &area);
            return Ok(Some(vvc_get_geo_merge_cands(&ctx)));
        } else if cu.affine {
            let ctx = vvc_get_affine_merge_cands(nv, &area);
            let idx = cu.pu.merge_idx as usize;
            let cand = match ctx.cands.get(idx) {
                Some(c) => c.clone(),
                None => {
                    return Err(malformed(format!(
                        "affine merge index {} with {} candidates",
                        idx,
                        ctx.cands.len()
                    )))
                }
            };
            cu.pu.inter_dir = cand.inter_dir;
            cu.affine_type = cand.affine_type;
            cu.bcw_idx = cand.bcw_idx;
            cu.pu.merge_type = cand.merge_type;
            if cand.merge_type == MergeType::MRG_TYPE_SUBPU_ATMVP {
                cu.pu.ref_idx = cand.ref_idx;
                cu.pu.mv = [cand.mv_affi[REFP_0][0], cand.mv_affi[REFP_1][0]];
                cu.pu.sub_pu_mi = cand.sub_pu_mi;
            } else {
                for l in 0..REFP_NUM {
                    if nv.sh.num_ref_idx(l) == 0 {
                        continue;
                    }
                    cu.pu.mvp_idx[l] = 0;
                    cu.pu.mvp_num[l] = 0;
                    cu.pu.mvd[l] = Mv::default();
                    cu.pu.ref_idx[l] = cand.ref_idx[l];
                    cu.pu.mv_affi[l] = cand.mv_affi[l];
                    cu.pu.mv[l] = cand.mv_affi[l][0];
                }
            }
        } else {
            let ctx = vvc_get_inter_merge_cands(nv, &area);
            let idx = cu.pu.merge_idx as usize;
            let cand = match ctx.cands.get(idx) {
                Some(c) => *c,
                None => {
                    return Err(malformed(format!(
                        "merge index {} with {} candidates",
                        idx,
                        ctx.len()
                    )))
                }
            };
            vvc_set_merge_info(cu, &cand);
        }
        return Ok(None);
    }

    if cu.affine {
        let six = cu.affine_type == AffineModel::AFFINEMODEL_6PARAM;
        for l in 0..REFP_NUM {
            if nv.sh.num_ref_idx(l) == 0 || cu.pu.inter_dir & (1 << l) == 0 {
                continue;
            }
            let ref_idx = cu.pu.ref_idx[l];
            if !REFI_IS_VALID(ref_idx) {
                return Err(malformed(format!("negative reference index in list {}", l)));
            }
            let info = vvc_get_affine_amvp_cands(nv, cu, l, ref_idx);
            cu.pu.mvp_num[l] = info.cands.len() as u8;
            let mvp_idx = cu.pu.mvp_idx[l] as usize;
            let cand = match info.cands.get(mvp_idx) {
                Some(c) => *c,
                None => return Err(malformed(format!("affine mvp index {}", mvp_idx))),
            };

            let mut mvd = cu.pu.mvd_affi[l];
            mvd[0].change_affine_prec_amvr2internal(cu.imv);
            mvd[1].change_affine_prec_amvr2internal(cu.imv);
            if six {
                mvd[2].change_affine_prec_amvr2internal(cu.imv);
            }

            /* the RT and LB differences are coded relative to LT */
            let lt = cand[0] + mvd[0];
            let rt = cand[1] + mvd[1] + mvd[0];
            let lb = if six {
                cand[2] + mvd[2] + mvd[0]
            } else {
                Mv::default()
            };
            cu.pu.mv_affi[l] = [lt.clipped(), rt.clipped(), lb.clipped()];
            cu.pu.mv[l] = cu.pu.mv_affi[l][0];
        }
        return Ok(None);
    }

    let is_ibc = cu.is_ibc();
    for l in 0..REFP_NUM {
        if (nv.sh.num_ref_idx(l) == 0 && !(is_ibc && l == REFP_0)) || cu.pu.inter_dir & (1 << l) == 0
        {
            continue;
        }
        let ref_idx = cu.pu.ref_idx[l];
        if !is_ibc && !REFI_IS_VALID(ref_idx) {
            return Err(malformed(format!("negative reference index in list {}", l)));
        }
        let info = vvc_get_amvp_cands(nv, &area, l, ref_idx, cu.imv);
        cu.pu.mvp_num[l] = info.cands.len() as u8;
        let mvp_idx = cu.pu.mvp_idx[l] as usize;
        let mvp = match info.cands.get(mvp_idx) {
            Some(mv) => *mv,
            /* block vectors without a usable predictor start from zero */
            None if is_ibc => Mv::default(),
            None => return Err(malformed(format!("mvp index {}", mvp_idx))),
        };
        let mut mvd = cu.pu.mvd[l];
        mvd.change_trans_prec_amvr2internal(cu.imv);
        cu.pu.mv[l] = (mvp + mvd).clipped();
    }
    Ok(None)
}
