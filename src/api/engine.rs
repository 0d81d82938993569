use super::*;
use crate::com::itdq::vvc_inv_transform_ict;
use crate::com::merge::GeoMergeCtx;
use crate::com::*;

/* Prediction and residual buffers handed to the engines are compact:
 * one block of `area.width * area.height` samples, row after row. */

/// Intra sample prediction kernels.
pub trait IntraPredictor {
    /// Forgets every reference pattern of the previous channel tree.
    fn reset(&mut self);

    /// Prepares the reference samples around `area` of component `comp`.
    /// `first_tb_in_cu` is set for the first transform block of the unit.
    fn init_intra_pattern(
        &mut self,
        pic: &VvcPic,
        cu: &CodingUnit,
        comp: usize,
        area: &Area,
        first_tb_in_cu: bool,
    );

    fn init_intra_mip(&mut self, cu: &CodingUnit, comp: usize, area: &Area);
    fn pred_intra_mip(&mut self, comp: usize, pred: &mut [pel], cu: &CodingUnit, area: &Area);

    /// Planar, DC and angular prediction.
    fn pred_intra_ang(&mut self, comp: usize, pred: &mut [pel], cu: &CodingUnit, area: &Area);

    fn load_lm_luma_rec(&mut self, pic: &VvcPic, cu: &CodingUnit, area: &Area);
    fn pred_intra_chroma_lm(
        &mut self,
        comp: usize,
        pred: &mut [pel],
        cu: &CodingUnit,
        area: &Area,
        mode: u8,
    );

    /// Number of intra coded neighbours (0 to 2) weighting a CIIP blend.
    fn num_intra_ciip(&self, pic: &VvcPic, cu: &CodingUnit) -> i32;
}

/// Motion compensated prediction of a whole unit, one buffer per component.
pub trait InterPredictor {
    fn motion_compensation(
        &mut self,
        cu: &CodingUnit,
        pred: &mut [Vec<pel>; N_C],
    ) -> Result<(), VvcError>;

    fn motion_compensation_geo(
        &mut self,
        cu: &CodingUnit,
        geo: &GeoMergeCtx,
        pred: &mut [Vec<pel>; N_C],
    ) -> Result<(), VvcError>;
}

/// Dequantization and inverse transform.
pub trait TrQuant {
    /// Writes the residual of component `comp` of `tu` into `resi`.
    fn inv_transform_nxn(
        &mut self,
        tu: &TransformUnit,
        comp: usize,
        resi: &mut [i32],
        qp: &QpParam,
    ) -> Result<(), VvcError>;

    /// Derives the second chroma residual of a jointly coded pair.
    fn inv_transform_ict(
        &mut self,
        tu: &TransformUnit,
        resi_cb: &mut [i32],
        resi_cr: &mut [i32],
        sign: bool,
    ) {
        vvc_inv_transform_ict(tu.joint_cbcr, sign, resi_cb, resi_cr);
    }
}

/// Luma mapping and chroma residual scaling data of the current slice.
pub trait ReshapeProvider {
    /// Mapping is enabled for the current CTU.
    fn ctu_flag(&self) -> bool;

    /// CTU-level switch, has no effect while the slice model is off.
    fn set_ctu_flag(&mut self, flag: bool);

    /// Drops the cached chroma scale, at the start of every picture.
    fn reset_chroma_scale(&mut self);

    /// Forward luma mapping indexed by the prediction sample value.
    fn fwd_lut(&self) -> &[pel];

    /// Chroma residual scale in 11-bit fixed point for the chroma block
    /// co-located with luma area `area_y` of the unit covering `cu_y`.
    fn chroma_adj(&mut self, pic: &VvcPic, cu_y: &Area, area_y: &Area, log2_ctu: u8) -> i32;
}
