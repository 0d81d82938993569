use super::tbl::*;
use super::util::*;
use super::*;

use std::ops::{Add, AddAssign, Neg, Sub};

/* internal motion vector precision is 1/16 sample */
pub const MV_FRACTIONAL_BITS_INTERNAL: i32 = 4;
/* storage bit depth of one motion vector component */
pub const MV_BITS: i32 = 18;
pub const MV_MAX: i32 = (1 << (MV_BITS - 1)) - 1;
pub const MV_MIN: i32 = -(1 << (MV_BITS - 1));

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Mv {
    pub hor: i32,
    pub ver: i32,
}

impl Mv {
    #[inline]
    pub const fn new(hor: i32, ver: i32) -> Self {
        Mv { hor, ver }
    }

    #[inline]
    pub fn clip_to_storage_bit_depth(&mut self) {
        self.hor = VVC_CLIP3(MV_MIN, MV_MAX, self.hor);
        self.ver = VVC_CLIP3(MV_MIN, MV_MAX, self.ver);
    }

    #[inline]
    pub fn clipped(mut self) -> Self {
        self.clip_to_storage_bit_depth();
        self
    }

    /// Rescales a difference signalled at AMVR precision to internal precision.
    pub fn change_trans_prec_amvr2internal(&mut self, imv: u8) {
        let shift = vvc_tbl_amvr_shift_trans[imv as usize];
        self.hor <<= shift;
        self.ver <<= shift;
    }

    pub fn change_affine_prec_amvr2internal(&mut self, imv: u8) {
        let shift = vvc_tbl_amvr_shift_affine[imv as usize];
        self.hor <<= shift;
        self.ver <<= shift;
    }

    pub fn round_trans_prec_internal2amvr(&mut self, imv: u8) {
        let shift = vvc_tbl_amvr_shift_trans[imv as usize];
        self.round_to_shift(shift);
    }

    pub fn round_affine_prec_internal2amvr(&mut self, imv: u8) {
        let shift = vvc_tbl_amvr_shift_affine[imv as usize];
        self.round_to_shift(shift);
    }

    fn round_to_shift(&mut self, shift: i32) {
        if shift > 0 {
            self.hor = vvc_round_mv_comp(self.hor, shift) << shift;
            self.ver = vvc_round_mv_comp(self.ver, shift) << shift;
        }
    }

    /// Scales by a distance factor with 8 fractional bits.
    pub fn scale_mv(&self, scale: i32) -> Mv {
        let s = |v: i32| {
            let p = scale as i64 * v as i64;
            let mag = (p.abs() + 127) >> 8;
            let r = if p < 0 { -mag } else { mag };
            VVC_CLIP3(MV_MIN as i64, MV_MAX as i64, r) as i32
        };
        Mv::new(s(self.hor), s(self.ver))
    }
}

impl Add for Mv {
    type Output = Mv;
    #[inline]
    fn add(self, rhs: Mv) -> Mv {
        Mv::new(self.hor + rhs.hor, self.ver + rhs.ver)
    }
}

impl Sub for Mv {
    type Output = Mv;
    #[inline]
    fn sub(self, rhs: Mv) -> Mv {
        Mv::new(self.hor - rhs.hor, self.ver - rhs.ver)
    }
}

impl AddAssign for Mv {
    #[inline]
    fn add_assign(&mut self, rhs: Mv) {
        self.hor += rhs.hor;
        self.ver += rhs.ver;
    }
}

impl Neg for Mv {
    type Output = Mv;
    #[inline]
    fn neg(self) -> Mv {
        Mv::new(-self.hor, -self.ver)
    }
}

/* rounds half toward zero when dropping `shift` fractional bits */
#[inline]
pub fn vvc_round_mv_comp(v: i32, shift: i32) -> i32 {
    let offset = 1 << (shift - 1);
    (v + offset - (v >= 0) as i32) >> shift
}

#[inline]
pub fn vvc_round_affine_mv(hor: i32, ver: i32, shift: i32) -> Mv {
    Mv::new(vvc_round_mv_comp(hor, shift), vvc_round_mv_comp(ver, shift))
}

/// Distance scale factor between two POC distances, `None` when equal.
pub fn vvc_get_dist_scale_factor(
    curr_poc: i32,
    curr_ref_poc: i32,
    col_poc: i32,
    col_ref_poc: i32,
) -> Option<i32> {
    let diff_poc_d = col_poc - col_ref_poc;
    let diff_poc_b = curr_poc - curr_ref_poc;
    if diff_poc_d == diff_poc_b || diff_poc_d == 0 {
        return None;
    }
    let tdb = VVC_CLIP3(-128, 127, diff_poc_b);
    let tdd = VVC_CLIP3(-128, 127, diff_poc_d);
    let x = (0x4000 + (tdd / 2).abs()) / tdd;
    Some(VVC_CLIP3(-4096, 4095, (tdb * x + 32) >> 6))
}

/*****************************************************************************
 * motion info stored per 4x4 luma block
 *****************************************************************************/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionInfo {
    pub is_inter: bool,
    pub is_ibc: bool,
    /* 1: list 0, 2: list 1, 3: bi */
    pub inter_dir: u8,
    pub use_alt_hpel_if: bool,
    pub bcw_idx: u8,
    pub ref_idx: [i8; REFP_NUM],
    pub mv: [Mv; REFP_NUM],
}

impl Default for MotionInfo {
    fn default() -> Self {
        MotionInfo {
            is_inter: false,
            is_ibc: false,
            inter_dir: 0,
            use_alt_hpel_if: false,
            bcw_idx: BCW_DEFAULT,
            ref_idx: [REFI_INVALID; REFP_NUM],
            mv: [Mv::default(); REFP_NUM],
        }
    }
}

impl MotionInfo {
    #[inline]
    pub fn uses_list(&self, list: usize) -> bool {
        self.inter_dir & (1 << list) != 0
    }

    /// Same prediction direction, reference indices and vectors.
    pub fn has_same_motion(&self, other: &MotionInfo) -> bool {
        if self.inter_dir != other.inter_dir {
            return false;
        }
        for l in 0..REFP_NUM {
            if self.uses_list(l)
                && (self.ref_idx[l] != other.ref_idx[l] || self.mv[l] != other.mv[l])
            {
                return false;
            }
        }
        true
    }

    /// Clears the fields of unused lists so that equal motion compares equal.
    pub fn canonical(mut self) -> Self {
        for l in 0..REFP_NUM {
            if !self.uses_list(l) {
                self.ref_idx[l] = REFI_INVALID;
                self.mv[l] = Mv::default();
            }
        }
        if self.inter_dir != 3 {
            self.bcw_idx = BCW_DEFAULT;
        }
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionField {
    /* size in 4x4 units */
    pub w4: usize,
    pub h4: usize,
    mi: Vec<MotionInfo>,
}

impl MotionField {
    pub fn new(width: usize, height: usize) -> Self {
        let w4 = (width + MIN_PU_SIZE - 1) >> MIN_PU_LOG2;
        let h4 = (height + MIN_PU_SIZE - 1) >> MIN_PU_LOG2;
        MotionField {
            w4,
            h4,
            mi: vec![MotionInfo::default(); w4 * h4],
        }
    }

    /// Motion at luma sample position (x, y).
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> &MotionInfo {
        &self.mi[(y >> MIN_PU_LOG2) * self.w4 + (x >> MIN_PU_LOG2)]
    }

    #[inline]
    pub fn at_mut(&mut self, x: usize, y: usize) -> &mut MotionInfo {
        let w4 = self.w4;
        &mut self.mi[(y >> MIN_PU_LOG2) * w4 + (x >> MIN_PU_LOG2)]
    }

    pub fn fill(&mut self, area: &Area, mi: &MotionInfo) {
        for y in (area.y..area.bottom()).step_by(MIN_PU_SIZE) {
            for x in (area.x..area.right()).step_by(MIN_PU_SIZE) {
                *self.at_mut(x, y) = *mi;
            }
        }
    }

    pub fn clear(&mut self) {
        for mi in self.mi.iter_mut() {
            *mi = MotionInfo::default();
        }
    }
}
