use super::*;

/* shift from signalled AMVR precision to internal 1/16 precision, indexed by imv */
pub(crate) static vvc_tbl_amvr_shift_trans: [i32; 4] = [2, 4, 6, 3];
pub(crate) static vvc_tbl_amvr_shift_affine: [i32; 3] = [2, 0, 4];

/* MMVD distances in quarter samples */
pub(crate) static vvc_tbl_mmvd_dist: [i32; MMVD_REFINE_STEP] = [1, 2, 4, 8, 16, 32, 64, 128];

/* MMVD directions: +x, -x, +y, -y */
pub(crate) static vvc_tbl_mmvd_dir: [(i32, i32); MMVD_MAX_DIR] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

lazy_static! {
    /* offset at internal precision for each refine index, [full pel flag][refine] */
    pub(crate) static ref vvc_tbl_mmvd_offset: [[Mv; MMVD_MAX_REFINE_NUM]; 2] = {
        let mut tbl = [[Mv::default(); MMVD_MAX_REFINE_NUM]; 2];
        for (full_pel, row) in tbl.iter_mut().enumerate() {
            for (refine, off) in row.iter_mut().enumerate() {
                let step = refine / MMVD_MAX_DIR;
                let (dx, dy) = vvc_tbl_mmvd_dir[refine % MMVD_MAX_DIR];
                let dist = (vvc_tbl_mmvd_dist[step] << 2) << (2 * full_pel);
                *off = Mv::new(dx * dist, dy * dist);
            }
        }
        tbl
    };
}

/* (angle index, distance index) of each geometric split direction */
pub(crate) static vvc_tbl_geo_params: [[u8; 2]; GEO_NUM_PARTITION_MODE] = [
    [0, 1], [0, 3], [2, 0], [2, 1], [2, 2], [2, 3], [3, 0], [3, 1],
    [3, 2], [3, 3], [4, 0], [4, 1], [4, 2], [4, 3], [5, 0], [5, 1],
    [5, 2], [5, 3], [8, 1], [8, 3], [11, 0], [11, 1], [11, 2], [11, 3],
    [12, 0], [12, 1], [12, 2], [12, 3], [13, 0], [13, 1], [13, 2], [13, 3],
    [14, 0], [14, 1], [14, 2], [14, 3], [16, 1], [16, 3], [18, 1], [18, 2],
    [18, 3], [19, 1], [19, 2], [19, 3], [20, 1], [20, 2], [20, 3], [21, 1],
    [21, 2], [21, 3], [24, 1], [24, 3], [26, 1], [26, 2], [26, 3], [27, 1],
    [27, 2], [27, 3], [28, 1], [28, 2], [28, 3], [29, 1], [29, 2], [29, 3],
];

/* quantized cosine of each geometric angle */
pub(crate) static vvc_tbl_geo_dis: [i32; GEO_NUM_ANGLES] = [
    8, 8, 8, 8, 4, 4, 2, 1, 0, -1, -2, -4, -4, -8, -8, -8,
    -8, -8, -8, -8, -4, -4, -2, -1, 0, 1, 2, 4, 4, 8, 8, 8,
];

/* control point corners of the constructed affine merge models: LT=0 RT=1 LB=2 RB=3 */
pub(crate) static vvc_tbl_affine_model: [&[usize]; 6] = [
    &[0, 1, 2],
    &[0, 1, 3],
    &[0, 2, 3],
    &[1, 2, 3],
    &[0, 1],
    &[0, 2],
];
