use super::*;
use crate::com::*;

use log::*;

// Sequence-level coding tools which change how a coding unit is reconstructed.
#[derive(Clone, Debug, PartialEq)]
pub struct VvcSps {
    // Picture size in luma samples.
    pub width: usize,
    pub height: usize,
    pub bit_depth: u8,
    pub chroma_sampling: ChromaSampling,
    pub log2_ctu_size: u8,
    // Separate luma and chroma coding trees in intra slices.
    pub dual_tree: bool,

    pub tmvp: bool,
    pub sbtmvp: bool,
    pub affine: bool,
    pub affine_type: bool, // 6-parameter model allowed
    pub prof: bool,
    pub amvr: bool,
    pub affine_amvr: bool,
    pub bcw: bool,
    pub mmvd: bool,
    pub ciip: bool,
    pub geo: bool,
    pub joint_cbcr: bool,
    pub lmcs: bool,
    pub mip: bool,
    pub isp: bool,

    pub max_num_merge_cand: usize,
    pub max_num_affine_merge_cand: usize,
    pub max_num_geo_cand: usize,
    pub log2_parallel_merge_level: u8,
}

impl Default for VvcSps {
    fn default() -> Self {
        VvcSps {
            width: 0,
            height: 0,
            bit_depth: 10,
            chroma_sampling: ChromaSampling::Cs420,
            log2_ctu_size: 7,
            dual_tree: false,
            tmvp: true,
            sbtmvp: true,
            affine: true,
            affine_type: true,
            prof: true,
            amvr: true,
            affine_amvr: true,
            bcw: true,
            mmvd: true,
            ciip: true,
            geo: true,
            joint_cbcr: true,
            lmcs: true,
            mip: true,
            isp: true,
            max_num_merge_cand: MRG_MAX_NUM_CANDS,
            max_num_affine_merge_cand: AFFINE_MRG_MAX_NUM_CANDS,
            max_num_geo_cand: GEO_MAX_NUM_UNI_CANDS,
            log2_parallel_merge_level: 2,
        }
    }
}

fn check(condition: bool, msg: &str) -> Result<(), VvcError> {
    if condition {
        error!("{}", msg);
        Err(VvcError::VVC_ERR_INVALID_ARGUMENT(msg.to_owned()))
    } else {
        Ok(())
    }
}

impl VvcSps {
    /// Clears tools whose prerequisites are off and rejects values outside
    /// the ranges the reconstruction tables are built for.
    pub fn validate(&mut self) -> Result<(), VvcError> {
        check(
            self.bit_depth < 8 || self.bit_depth > 16,
            "bit depth must be in the range 8 to 16",
        )?;
        check(
            self.log2_ctu_size < 5 || self.log2_ctu_size as usize > MAX_CU_LOG2,
            "CTU size must be 32, 64 or 128",
        )?;
        check(
            self.width == 0 || self.height == 0,
            "picture size must not be zero",
        )?;
        check(
            self.max_num_merge_cand < 1 || self.max_num_merge_cand > MRG_MAX_NUM_CANDS,
            "max merge candidates must be in the range 1 to 6",
        )?;
        check(
            self.max_num_affine_merge_cand > AFFINE_MRG_MAX_NUM_CANDS,
            "max affine merge candidates must be in the range 0 to 5",
        )?;
        check(
            self.log2_parallel_merge_level < 2
                || self.log2_parallel_merge_level > self.log2_ctu_size,
            "parallel merge level must be in the range 2 to log2 CTU size",
        )?;

        if !self.affine {
            self.affine_type = false;
            self.prof = false;
            self.affine_amvr = false;
        }
        if !self.amvr {
            self.affine_amvr = false;
        }
        if !self.tmvp {
            self.sbtmvp = false;
        }
        if self.chroma_sampling == ChromaSampling::Cs400 {
            self.joint_cbcr = false;
            self.dual_tree = false;
        }

        if !self.affine && !self.sbtmvp {
            self.max_num_affine_merge_cand = 0;
        } else if !self.affine && self.sbtmvp {
            self.max_num_affine_merge_cand = 1;
        } else {
            check(
                self.max_num_affine_merge_cand < 1,
                "max affine merge candidates must be at least 1 with affine enabled",
            )?;
        }

        if self.geo {
            check(
                self.max_num_merge_cand < 2,
                "geometric partitioning needs at least 2 merge candidates",
            )?;
            check(
                self.max_num_geo_cand < 2 || self.max_num_geo_cand > self.max_num_merge_cand,
                "max geo candidates must be in the range 2 to max merge candidates",
            )?;
        }

        Ok(())
    }

    #[inline]
    pub fn ctu_size(&self) -> usize {
        1 << self.log2_ctu_size
    }

    pub fn clp_rng(&self) -> ClpRng {
        ClpRng::new(self.bit_depth)
    }
}

// Slice and picture header fields read while reconstructing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VvcSh {
    pub slice_type: SliceType,
    pub poc: i32,
    // POC and long-term marking of each active reference, per list.
    pub ref_poc: [Vec<i32>; REFP_NUM],
    pub ref_lt: [Vec<bool>; REFP_NUM],
    pub tmvp_enabled: bool,
    pub col_from_l0: bool,
    pub col_ref_idx: usize,
    // No reference picture follows the current one in output order.
    pub check_ldc: bool,
    pub lmcs_enabled: bool,
    pub lmcs_chroma_residual_scale: bool,
    pub dis_frac_mmvd: bool,
    pub joint_cbcr_sign: bool,
}

impl VvcSh {
    #[inline]
    pub fn is_intra(&self) -> bool {
        self.slice_type == SliceType::VVC_ST_I
    }

    #[inline]
    pub fn is_inter_b(&self) -> bool {
        self.slice_type == SliceType::VVC_ST_B
    }

    #[inline]
    pub fn num_ref_idx(&self, list: usize) -> usize {
        self.ref_poc[list].len()
    }

    #[inline]
    pub fn ref_poc(&self, list: usize, ref_idx: i8) -> i32 {
        self.ref_poc[list][ref_idx as usize]
    }

    #[inline]
    pub fn is_long_term(&self, list: usize, ref_idx: i8) -> bool {
        self.ref_lt[list]
            .get(ref_idx as usize)
            .copied()
            .unwrap_or(false)
    }

    /// Number of reference lists usable in this slice.
    #[inline]
    pub fn num_lists(&self) -> usize {
        if self.is_inter_b() {
            2
        } else {
            1
        }
    }
}
