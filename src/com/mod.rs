pub mod affine;
pub mod amvp;
pub(crate) mod df;
pub mod hmvp;
pub(crate) mod itdq;
pub mod merge;
pub mod mv;
pub mod picman;
pub(crate) mod recon;
pub mod reshape;
pub(crate) mod tbl;
pub mod tmvp;
pub(crate) mod tracer;
pub(crate) mod util;

pub use self::mv::*;
pub use self::picman::*;

use crate::api::*;

use num_traits::FromPrimitive;

/*****************************************************************************
 * types
 *****************************************************************************/
pub type pel = u16;

pub const Y_C: usize = 0; /* Y luma */
pub const U_C: usize = 1; /* Cb Chroma */
pub const V_C: usize = 2; /* Cr Chroma */
pub const N_C: usize = 3; /* number of color component */

pub const REFP_0: usize = 0;
pub const REFP_1: usize = 1;
pub const REFP_NUM: usize = 2;

/*****************************************************************************
 * reference index
 *****************************************************************************/
pub const REFI_INVALID: i8 = -1;

#[inline]
pub fn REFI_IS_VALID(refi: i8) -> bool {
    refi >= 0
}

pub const MAX_CU_LOG2: usize = 7;
pub const MIN_CU_LOG2: usize = 2;
pub const MAX_CU_SIZE: usize = 1 << MAX_CU_LOG2;
pub const MIN_CU_SIZE: usize = 1 << MIN_CU_LOG2;
pub const MAX_CU_DIM: usize = MAX_CU_SIZE * MAX_CU_SIZE;

pub const MAX_TB_LOG2: usize = 6;
pub const MAX_TB_SIZE: usize = 1 << MAX_TB_LOG2;
pub const MAX_TB_DIM: usize = MAX_TB_SIZE * MAX_TB_SIZE;

/* motion is stored on a 4x4 luma grid */
pub const MIN_PU_LOG2: usize = 2;
pub const MIN_PU_SIZE: usize = 1 << MIN_PU_LOG2;

/* virtual pipeline data unit, granularity of chroma residual scaling */
pub const VPDU_LOG2: usize = 6;
pub const VPDU_SIZE: usize = 1 << VPDU_LOG2;

/* candidate list sizes */
pub const MRG_MAX_NUM_CANDS: usize = 6;
pub const AFFINE_MRG_MAX_NUM_CANDS: usize = 5;
pub const GEO_MAX_NUM_UNI_CANDS: usize = 6;
pub const AMVP_MAX_NUM_CANDS: usize = 2;
pub const MAX_NUM_HMVP_CANDS: usize = 5;

/* merge with motion vector difference */
pub const MMVD_REFINE_STEP: usize = 8;
pub const MMVD_MAX_DIR: usize = 4;
pub const MMVD_MAX_REFINE_NUM: usize = MMVD_REFINE_STEP * MMVD_MAX_DIR;
pub const MMVD_BASE_MV_NUM: usize = 2;

/* bi-prediction with CU-level weights */
pub const BCW_DEFAULT: u8 = 2;
pub const BCW_NUM: u8 = 5;

/* adaptive motion vector resolution */
pub const IMV_OFF: u8 = 0;
pub const IMV_FPEL: u8 = 1;
pub const IMV_4PEL: u8 = 2;
pub const IMV_HPEL: u8 = 3;

/* luma mapping with chroma scaling */
pub const PIC_CODE_CW_BINS: usize = 16;
pub const FP_PREC: i32 = 11;
pub const CSCALE_FP_PREC: i32 = 11;
pub const CSCALE_IDENTITY: i32 = 1 << CSCALE_FP_PREC;

pub const ATMVP_SUB_BLOCK_SIZE_LOG2: usize = 3;
pub const PRED_REG_MIN_WIDTH: usize = 4;

pub const GEO_NUM_PARTITION_MODE: usize = 64;
pub const GEO_NUM_ANGLES: usize = 32;

/* intra chroma modes */
pub const PLANAR_IDX: u8 = 0;
pub const DC_IDX: u8 = 1;
pub const LM_CHROMA_IDX: u8 = 81;
pub const MDLM_L_IDX: u8 = 82;
pub const MDLM_T_IDX: u8 = 83;
pub const DM_CHROMA_IDX: u8 = 84;

pub const CH_L: usize = 0;
pub const CH_C: usize = 1;

/*****************************************************************************
 * prediction mode
 *****************************************************************************/
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum PredMode {
    MODE_INTER = 0,
    MODE_INTRA = 1,
    MODE_IBC = 2,
    MODE_PLT = 3,
}

impl Default for PredMode {
    fn default() -> Self {
        PredMode::MODE_INTRA
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeType {
    /* luma and chroma share the coding tree */
    TREE_D,
    TREE_L,
    TREE_C,
}

impl Default for TreeType {
    fn default() -> Self {
        TreeType::TREE_D
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeType {
    MRG_TYPE_DEFAULT_N,
    MRG_TYPE_SUBPU_ATMVP,
}

impl Default for MergeType {
    fn default() -> Self {
        MergeType::MRG_TYPE_DEFAULT_N
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AffineModel {
    AFFINEMODEL_4PARAM,
    AFFINEMODEL_6PARAM,
}

impl Default for AffineModel {
    fn default() -> Self {
        AffineModel::AFFINEMODEL_4PARAM
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IspMode {
    NOT_INTRA_SUBPARTITIONS,
    HOR_INTRA_SUBPARTITIONS,
    VER_INTRA_SUBPARTITIONS,
}

impl Default for IspMode {
    fn default() -> Self {
        IspMode::NOT_INTRA_SUBPARTITIONS
    }
}

/*****************************************************************************
 * block geometry
 *****************************************************************************/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Area {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Area {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Area {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn valid(&self) -> bool {
        self.width != 0 && self.height != 0
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Splits a luma area into the per-component blocks of a coding unit.
pub fn vvc_unit_blocks(cs: ChromaSampling, luma: Area, tree_type: TreeType) -> [Area; N_C] {
    let (sx, sy) = cs.sampling_period();
    let chroma = if cs == ChromaSampling::Cs400 {
        Area::default()
    } else {
        Area::new(luma.x / sx, luma.y / sy, luma.width / sx, luma.height / sy)
    };
    match tree_type {
        TreeType::TREE_D => [luma, chroma, chroma],
        TreeType::TREE_L => [luma, Area::default(), Area::default()],
        TreeType::TREE_C => [Area::default(), chroma, chroma],
    }
}

/*****************************************************************************
 * coding structures
 *****************************************************************************/
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PredictionUnit {
    pub merge_flag: bool,
    pub merge_idx: u8,
    pub merge_type: MergeType,
    pub mmvd_merge_flag: bool,
    pub mmvd_merge_idx: u16,

    /* 1: list 0, 2: list 1, 3: bi */
    pub inter_dir: u8,
    pub ref_idx: [i8; REFP_NUM],
    pub mv: [Mv; REFP_NUM],
    pub mvd: [Mv; REFP_NUM],
    pub mvp_idx: [u8; REFP_NUM],
    pub mvp_num: [u8; REFP_NUM],

    /* affine control points: LT, RT, LB */
    pub mv_affi: [[Mv; 3]; REFP_NUM],
    pub mvd_affi: [[Mv; 3]; REFP_NUM],

    pub geo_split_dir: u8,
    pub geo_merge_idx: [u8; 2],

    pub ciip: bool,

    /* intra direction of luma and chroma */
    pub intra_dir: [u8; 2],
    pub mip_transposed: bool,

    /* motion of the 8x8 sub-blocks of a sub-block temporal candidate */
    pub sub_pu_mi: Vec<MotionInfo>,
}

impl PredictionUnit {
    pub fn new() -> Self {
        PredictionUnit {
            ref_idx: [REFI_INVALID; REFP_NUM],
            intra_dir: [PLANAR_IDX, DM_CHROMA_IDX],
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformUnit {
    pub blocks: [Area; N_C],
    pub cbf: [bool; N_C],
    /* (cbf_cb << 1) | cbf_cr when the chroma residual is coded jointly */
    pub joint_cbcr: u8,
    /* chroma residual scale in 11-bit fixed point */
    pub chroma_adj: i32,
    pub qp: [i32; N_C],
    pub coeffs: [Vec<i32>; N_C],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CodingUnit {
    pub blocks: [Area; N_C],
    pub chroma_sampling: ChromaSampling,
    pub tree_type: TreeType,
    /* raw prediction mode syntax, see PredMode */
    pub pred_mode: u8,
    pub skip: bool,
    pub mmvd_skip: bool,
    pub affine: bool,
    pub affine_type: AffineModel,
    pub geo: bool,
    pub bcw_idx: u8,
    pub imv: u8,
    pub root_cbf: bool,
    pub isp_mode: IspMode,
    pub mip_flag: bool,
    pub pu: PredictionUnit,
    pub tus: Vec<TransformUnit>,
}

impl CodingUnit {
    pub fn new(
        cs: ChromaSampling,
        luma: Area,
        tree_type: TreeType,
        pred_mode: PredMode,
    ) -> Self {
        CodingUnit {
            blocks: vvc_unit_blocks(cs, luma, tree_type),
            chroma_sampling: cs,
            tree_type,
            pred_mode: pred_mode as u8,
            bcw_idx: BCW_DEFAULT,
            pu: PredictionUnit::new(),
            ..Default::default()
        }
    }

    /// Adds one transform unit covering `luma` in this unit's tree.
    pub fn add_tu(&mut self, luma: Area) -> &mut TransformUnit {
        let blocks = vvc_unit_blocks(self.chroma_sampling, luma, self.tree_type);
        self.tus.push(TransformUnit {
            blocks,
            chroma_adj: CSCALE_IDENTITY,
            ..Default::default()
        });
        let last = self.tus.len() - 1;
        &mut self.tus[last]
    }

    #[inline]
    pub fn pred_mode(&self) -> Option<PredMode> {
        PredMode::from_u8(self.pred_mode)
    }

    #[inline]
    pub fn is_inter(&self) -> bool {
        self.pred_mode == PredMode::MODE_INTER as u8
    }

    #[inline]
    pub fn is_ibc(&self) -> bool {
        self.pred_mode == PredMode::MODE_IBC as u8
    }

    #[inline]
    pub fn Y(&self) -> &Area {
        &self.blocks[Y_C]
    }

    pub fn ch_type(&self) -> usize {
        if self.tree_type == TreeType::TREE_C {
            CH_C
        } else {
            CH_L
        }
    }

    /// Whether the final motion of this unit enters the history table.
    #[inline]
    pub fn is_hmvp_eligible(&self) -> bool {
        !self.affine && !self.geo
    }

    pub fn num_valid_components(&self) -> usize {
        self.chroma_sampling.num_components()
    }
}

#[inline]
pub fn vvc_is_lmc_mode(mode: u8) -> bool {
    mode >= LM_CHROMA_IDX && mode <= MDLM_T_IDX
}

/// Matrix intra prediction applies to chroma only through DM in 4:4:4.
pub fn vvc_is_mip(cu: &CodingUnit, ch_type: usize) -> bool {
    if ch_type == CH_L {
        cu.mip_flag
    } else {
        cu.mip_flag
            && cu.pu.intra_dir[CH_C] == DM_CHROMA_IDX
            && cu.chroma_sampling == ChromaSampling::Cs444
    }
}

#[inline]
fn vvc_is_min_width_pred_enabled(w: usize, h: usize) -> bool {
    (w == 8 && h > 4) || w == 4
}

/// Vertical ISP splits narrower than the minimum prediction width share one
/// prediction region across several transform blocks.
pub fn vvc_is_pred_reg_diff_from_tb(cu: &CodingUnit, comp: usize) -> bool {
    comp == Y_C
        && cu.isp_mode == IspMode::VER_INTRA_SUBPARTITIONS
        && vvc_is_min_width_pred_enabled(cu.blocks[comp].width, cu.blocks[comp].height)
}

pub fn vvc_is_first_tb_in_pred_reg(cu: &CodingUnit, comp: usize, area: &Area) -> bool {
    comp == Y_C
        && cu.isp_mode != IspMode::NOT_INTRA_SUBPARTITIONS
        && (area.x - cu.blocks[Y_C].x) % PRED_REG_MIN_WIDTH == 0
}

pub fn vvc_is_isp_first(cu: &CodingUnit, area: &Area, comp: usize) -> bool {
    area.x == cu.blocks[comp].x && area.y == cu.blocks[comp].y
}

/*****************************************************************************
 * sample range
 *****************************************************************************/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClpRng {
    pub min: i32,
    pub max: i32,
    pub bd: u8,
}

impl ClpRng {
    pub fn new(bit_depth: u8) -> Self {
        ClpRng {
            min: 0,
            max: (1 << bit_depth) - 1,
            bd: bit_depth,
        }
    }
}

/* quantization parameter of one component, split into period and remainder */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QpParam {
    pub qp: i32,
    pub per: i32,
    pub rem: i32,
}

impl QpParam {
    pub fn new(tu: &TransformUnit, comp: usize) -> Self {
        let qp = tu.qp[comp].max(0);
        QpParam {
            qp,
            per: qp / 6,
            rem: qp % 6,
        }
    }
}
