use super::hmvp::HmvpTable;
use super::*;
use crate::api::*;

/* what later units need to know about an already reconstructed coding unit */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CuRecord {
    /* luma area */
    pub area: Area,
    pub pred_mode: PredMode,
    pub affine: bool,
    pub affine_type: AffineModel,
    pub merge_type: MergeType,
    pub inter_dir: u8,
    pub ref_idx: [i8; REFP_NUM],
    pub mv_affi: [[Mv; 3]; REFP_NUM],
    pub bcw_idx: u8,
}

impl CuRecord {
    fn from_cu(cu: &CodingUnit) -> Self {
        CuRecord {
            area: cu.blocks[Y_C],
            pred_mode: cu.pred_mode().unwrap_or_default(),
            affine: cu.affine,
            affine_type: cu.affine_type,
            merge_type: cu.pu.merge_type,
            inter_dir: cu.pu.inter_dir,
            ref_idx: cu.pu.ref_idx,
            mv_affi: cu.pu.mv_affi,
            bcw_idx: cu.bcw_idx,
        }
    }
}

/* per 4x4 luma block flags of reconstructed components */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecompMap {
    w4: usize,
    h4: usize,
    map: Vec<u8>,
}

impl DecompMap {
    fn new(width: usize, height: usize) -> Self {
        let w4 = (width + MIN_PU_SIZE - 1) >> MIN_PU_LOG2;
        let h4 = (height + MIN_PU_SIZE - 1) >> MIN_PU_LOG2;
        DecompMap {
            w4,
            h4,
            map: vec![0; w4 * h4],
        }
    }

    fn set(&mut self, comp: usize, luma: &Area) {
        let x0 = luma.x >> MIN_PU_LOG2;
        let y0 = luma.y >> MIN_PU_LOG2;
        let x1 = ((luma.right() + MIN_PU_SIZE - 1) >> MIN_PU_LOG2).min(self.w4);
        let y1 = ((luma.bottom() + MIN_PU_SIZE - 1) >> MIN_PU_LOG2).min(self.h4);
        for y in y0..y1 {
            for x in x0..x1 {
                self.map[y * self.w4 + x] |= 1 << comp;
            }
        }
    }

    fn get(&self, comp: usize, x: usize, y: usize) -> bool {
        let (x4, y4) = (x >> MIN_PU_LOG2, y >> MIN_PU_LOG2);
        x4 < self.w4 && y4 < self.h4 && self.map[y4 * self.w4 + x4] & (1 << comp) != 0
    }
}

/* picture being reconstructed */
#[derive(Clone, Debug, Default)]
pub struct VvcPic {
    pub frame: Frame<pel>,
    /* picture order count */
    pub poc: i32,
    pub mf: MotionField,
    pub(crate) width: usize,
    pub(crate) height: usize,
    cu_recs: Vec<CuRecord>,
    /* per 4x4 luma block: index into cu_recs plus one, 0 while not yet coded */
    cu_map: Vec<u32>,
    /* per 4x4 luma block: the covering transform unit has coded luma residual */
    cbf_y: Vec<bool>,
    decomp: DecompMap,
    /* boundary strength of the left (0) and top (1) edge of each 4x4 luma block */
    pub(crate) bs: [Vec<u8>; 2],
}

impl VvcPic {
    pub fn new(sps: &VvcSps, poc: i32) -> Self {
        let mf = MotionField::new(sps.width, sps.height);
        let n4 = mf.w4 * mf.h4;
        VvcPic {
            frame: Frame::new(sps.width, sps.height, sps.chroma_sampling),
            poc,
            width: sps.width,
            height: sps.height,
            cu_recs: Vec::new(),
            cu_map: vec![0; n4],
            cbf_y: vec![false; n4],
            decomp: DecompMap::new(sps.width, sps.height),
            bs: [vec![0; n4], vec![0; n4]],
            mf,
        }
    }

    #[inline]
    fn idx4(&self, x: usize, y: usize) -> usize {
        (y >> MIN_PU_LOG2) * self.mf.w4 + (x >> MIN_PU_LOG2)
    }

    #[inline]
    pub fn inside(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// The coded unit covering luma sample (x, y), if any.
    pub fn cu_at(&self, x: isize, y: isize) -> Option<&CuRecord> {
        if !self.inside(x, y) {
            return None;
        }
        match self.cu_map[self.idx4(x as usize, y as usize)] {
            0 => None,
            i => self.cu_recs.get(i as usize - 1),
        }
    }

    /// Records a reconstructed unit so that later units see it as a neighbour.
    pub(crate) fn register_cu(&mut self, cu: &CodingUnit) {
        let area = cu.blocks[Y_C];
        if !area.valid() {
            return;
        }
        self.cu_recs.push(CuRecord::from_cu(cu));
        let id = self.cu_recs.len() as u32;
        let w4 = self.mf.w4;
        for y in (area.y..area.bottom().min(self.height)).step_by(MIN_PU_SIZE) {
            for x in (area.x..area.right().min(self.width)).step_by(MIN_PU_SIZE) {
                self.cu_map[(y >> MIN_PU_LOG2) * w4 + (x >> MIN_PU_LOG2)] = id;
            }
        }
        for tu in cu.tus.iter() {
            let b = tu.blocks[Y_C];
            for y in (b.y..b.bottom().min(self.height)).step_by(MIN_PU_SIZE) {
                for x in (b.x..b.right().min(self.width)).step_by(MIN_PU_SIZE) {
                    self.cbf_y[(y >> MIN_PU_LOG2) * w4 + (x >> MIN_PU_LOG2)] = tu.cbf[Y_C];
                }
            }
        }
        if !cu.is_inter() && !cu.is_ibc() {
            self.mf.fill(&area, &MotionInfo::default());
        }
    }

    #[inline]
    pub(crate) fn cbf_y_at(&self, x: usize, y: usize) -> bool {
        self.cbf_y[self.idx4(x, y)]
    }

    /// Marks a component block as reconstructed.
    pub(crate) fn set_decomp(&mut self, comp: usize, area: &Area) {
        let luma = if comp == Y_C {
            *area
        } else {
            let (sx, sy) = self.frame.chroma_sampling.sampling_period();
            Area::new(area.x * sx, area.y * sy, area.width * sx, area.height * sy)
        };
        self.decomp.set(comp, &luma);
    }

    /// Whether the component sample covering luma position (x, y) is reconstructed.
    pub fn is_decomposed(&self, comp: usize, x: usize, y: usize) -> bool {
        self.decomp.get(comp, x, y)
    }

    /// Boundary strength of the vertical (dir 0) or horizontal (dir 1) edge
    /// at the left or top of the 4x4 luma block covering (x, y).
    pub fn bs_at(&self, dir: usize, x: usize, y: usize) -> u8 {
        self.bs[dir][self.idx4(x, y)]
    }

    pub(crate) fn set_bs(&mut self, dir: usize, x: usize, y: usize, bs: u8) {
        let i = self.idx4(x, y);
        self.bs[dir][i] = bs;
    }

    /// Snapshot of this picture's motion for use as a collocated picture.
    pub fn to_col(&self, sh: &VvcSh) -> ColPic {
        ColPic {
            poc: self.poc,
            mf: self.mf.clone(),
            ref_poc: sh.ref_poc.clone(),
            ref_lt: sh.ref_lt.clone(),
            check_ldc: sh.check_ldc,
        }
    }
}

/* motion of the collocated picture read by temporal candidates */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColPic {
    pub poc: i32,
    pub mf: MotionField,
    pub ref_poc: [Vec<i32>; REFP_NUM],
    pub ref_lt: [Vec<bool>; REFP_NUM],
    pub check_ldc: bool,
}

impl ColPic {
    #[inline]
    pub fn ref_poc(&self, list: usize, ref_idx: i8) -> Option<i32> {
        self.ref_poc[list].get(ref_idx as usize).copied()
    }

    #[inline]
    pub fn is_long_term(&self, list: usize, ref_idx: i8) -> bool {
        self.ref_lt[list]
            .get(ref_idx as usize)
            .copied()
            .unwrap_or(false)
    }
}

/// Read-only view of everything a candidate list is built from.
pub struct NeighborView<'a> {
    pub pic: &'a VvcPic,
    pub sps: &'a VvcSps,
    pub sh: &'a VvcSh,
    pub col: Option<&'a ColPic>,
    pub hmvp: &'a HmvpTable,
}

impl<'a> NeighborView<'a> {
    /// Motion of an already coded inter neighbour at (x, y).
    pub fn inter_motion(&self, x: isize, y: isize) -> Option<&'a MotionInfo> {
        self.pic.cu_at(x, y)?;
        let mi = self.pic.mf.at(x as usize, y as usize);
        if mi.is_inter && !mi.is_ibc {
            Some(mi)
        } else {
            None
        }
    }

    /// Like `inter_motion` but the neighbour must lie outside the parallel
    /// merge region of the current block at (cx, cy).
    pub fn merge_motion(&self, cx: usize, cy: usize, x: isize, y: isize) -> Option<&'a MotionInfo> {
        let lvl = self.sps.log2_parallel_merge_level as usize;
        if x >= 0
            && y >= 0
            && (x as usize) >> lvl == cx >> lvl
            && (y as usize) >> lvl == cy >> lvl
        {
            return None;
        }
        self.inter_motion(x, y)
    }

    pub fn cu_at(&self, x: isize, y: isize) -> Option<&'a CuRecord> {
        self.pic.cu_at(x, y)
    }

    pub fn ctu_size(&self) -> usize {
        self.sps.ctu_size()
    }
}
