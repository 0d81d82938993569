pub mod config;
pub mod engine;
pub mod frame;

pub use config::*;
pub use engine::*;
pub use frame::*;

use crate::com::hmvp::HmvpTable;
use crate::com::*;
use crate::dec::*;

use thiserror::Error;

use std::fmt;

/*****************************************************************************
 * error code
 *****************************************************************************/
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VvcError {
    #[error("unsupported feature: {0}")]
    VVC_ERR_UNSUPPORTED(&'static str),
    #[error("invalid combination of signalled flags: {0}")]
    VVC_ERR_INVALID_COMBINATION(&'static str),
    #[error("invalid prediction mode {0}")]
    VVC_ERR_INVALID_PRED_MODE(u8),
    #[error("malformed coding unit: {0}")]
    VVC_ERR_MALFORMED(String),
    #[error("invalid argument: {0}")]
    VVC_ERR_INVALID_ARGUMENT(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[repr(C)]
pub enum ChromaSampling {
    Cs400,
    Cs420,
    Cs422,
    Cs444,
}

impl Default for ChromaSampling {
    fn default() -> Self {
        ChromaSampling::Cs420
    }
}

impl From<u8> for ChromaSampling {
    fn from(val: u8) -> Self {
        use self::ChromaSampling::*;
        match val {
            0 => Cs400,
            1 => Cs420,
            2 => Cs422,
            _ => Cs444,
        }
    }
}

impl ChromaSampling {
    // Provides the sampling period in the horizontal and vertical axes.
    pub fn sampling_period(self) -> (usize, usize) {
        use self::ChromaSampling::*;
        match self {
            Cs420 => (2, 2),
            Cs422 => (2, 1),
            Cs444 => (1, 1),
            Cs400 => (2, 2),
        }
    }

    pub fn num_components(self) -> usize {
        if self == ChromaSampling::Cs400 {
            1
        } else {
            N_C
        }
    }

    pub fn num_channel_types(self) -> usize {
        if self == ChromaSampling::Cs400 {
            1
        } else {
            2
        }
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(C)]
pub enum SliceType {
    VVC_ST_B = 0,
    VVC_ST_P = 1,
    VVC_ST_I = 2,
}

impl Default for SliceType {
    fn default() -> Self {
        SliceType::VVC_ST_I
    }
}

impl fmt::Display for SliceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::SliceType::*;
        match self {
            VVC_ST_B => write!(f, "B"),
            VVC_ST_P => write!(f, "P"),
            VVC_ST_I => write!(f, "I"),
        }
    }
}

impl From<u8> for SliceType {
    fn from(val: u8) -> Self {
        use self::SliceType::*;
        match val {
            0 => VVC_ST_B,
            1 => VVC_ST_P,
            _ => VVC_ST_I,
        }
    }
}

/// The external engines one reconstruction stream calls into.
pub struct Engines {
    pub intra: Box<dyn IntraPredictor>,
    pub inter: Box<dyn InterPredictor>,
    pub tr_quant: Box<dyn TrQuant>,
    pub reshape: Box<dyn ReshapeProvider>,
}

/// Reconstruction state of one decode stream.
///
/// Coding tree units must be handed over in decoding order; the history
/// table carried between them is reset by the caller at slice, tile and
/// CTU-row boundaries with [`Context::reset_history`].
pub struct Context {
    vvcd_ctx: VvcdCtx,
    /* picture of the last reconstructed CTU */
    cur_poc: Option<i32>,
}

impl Context {
    pub fn new(sps: &VvcSps, engines: Engines) -> Result<Self, VvcError> {
        let mut sps = sps.clone();
        sps.validate()?;
        Ok(Context {
            vvcd_ctx: VvcdCtx::new(sps, engines),
            cur_poc: None,
        })
    }

    pub fn sps(&self) -> &VvcSps {
        &self.vvcd_ctx.sps
    }

    /// Reconstructs every coding unit of `cus` inside `ctu_area`.
    ///
    /// `cus` holds the units of the CTU in coding order. When the CTU uses
    /// separate luma and chroma trees the chroma units follow the luma ones.
    pub fn reconstruct_ctu(
        &mut self,
        pic: &mut VvcPic,
        sh: &VvcSh,
        col: Option<&ColPic>,
        cus: &mut [CodingUnit],
        ctu_area: &Area,
    ) -> Result<(), VvcError> {
        if self.cur_poc != Some(pic.poc) {
            self.begin_picture();
            self.cur_poc = Some(pic.poc);
        }
        self.vvcd_ctx.decompress_ctu(pic, sh, col, cus, ctu_area)
    }

    pub fn reset_history(&mut self) {
        self.vvcd_ctx.hmvp.reset();
    }

    pub fn history(&self) -> &HmvpTable {
        &self.vvcd_ctx.hmvp
    }

    /// Clears the per-picture state. Done on the first CTU of a picture
    /// with a new POC; callers decoding two pictures of the same POC in a
    /// row call it themselves.
    pub fn begin_picture(&mut self) {
        self.vvcd_ctx.engines.reshape.reset_chroma_scale();
    }

    /// Luma mapping switch of the next CTUs.
    pub fn set_ctu_lmcs(&mut self, flag: bool) {
        self.vvcd_ctx.engines.reshape.set_ctu_flag(flag);
    }

    /// Replaces the mapping model, for a slice carrying a new one.
    pub fn set_reshaper(&mut self, reshape: Box<dyn ReshapeProvider>) {
        self.vvcd_ctx.engines.reshape = reshape;
    }

    pub fn reshape(&self) -> &dyn ReshapeProvider {
        self.vvcd_ctx.engines.reshape.as_ref()
    }

    pub fn reshape_mut(&mut self) -> &mut dyn ReshapeProvider {
        self.vvcd_ctx.engines.reshape.as_mut()
    }
}
