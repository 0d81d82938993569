use super::util::*;
use super::*;
use crate::api::*;

use log::*;

/// Piecewise linear luma mapping with chroma residual scaling.
#[derive(Clone, Debug)]
pub struct Reshaper {
    bit_depth: u8,
    enabled: bool,
    ctu_flag: bool,
    min_bin: usize,
    max_bin: usize,
    init_cw: i32,
    bin_cw: [i32; PIC_CODE_CW_BINS],
    input_pivot: [i32; PIC_CODE_CW_BINS + 1],
    reshape_pivot: [i32; PIC_CODE_CW_BINS + 1],
    fwd_scale_coef: [i32; PIC_CODE_CW_BINS],
    inv_scale_coef: [i32; PIC_CODE_CW_BINS],
    chroma_adj_help: [i32; PIC_CODE_CW_BINS],
    fwd_lut: Vec<pel>,
    inv_lut: Vec<pel>,
    /* last VPDU window the chroma scale was derived for */
    vpdu: Option<(usize, usize)>,
    chroma_scale: i32,
}

impl Reshaper {
    /// Mapping switched off: identity LUTs and identity chroma scale.
    pub fn disabled(bit_depth: u8) -> Self {
        let size = 1usize << bit_depth;
        let init_cw = (size / PIC_CODE_CW_BINS) as i32;
        let mut input_pivot = [0; PIC_CODE_CW_BINS + 1];
        for (i, p) in input_pivot.iter_mut().enumerate() {
            *p = i as i32 * init_cw;
        }
        let identity: Vec<pel> = (0..size).map(|v| v as pel).collect();
        Reshaper {
            bit_depth,
            enabled: false,
            ctu_flag: false,
            min_bin: 0,
            max_bin: PIC_CODE_CW_BINS - 1,
            init_cw,
            bin_cw: [init_cw; PIC_CODE_CW_BINS],
            input_pivot,
            reshape_pivot: input_pivot,
            fwd_scale_coef: [1 << FP_PREC; PIC_CODE_CW_BINS],
            inv_scale_coef: [1 << FP_PREC; PIC_CODE_CW_BINS],
            chroma_adj_help: [CSCALE_IDENTITY; PIC_CODE_CW_BINS],
            fwd_lut: identity.clone(),
            inv_lut: identity,
            vpdu: None,
            chroma_scale: CSCALE_IDENTITY,
        }
    }

    /// Builds the mapping from the slice model: codewords of the bins in
    /// `min_bin..=max_bin` are `(1 << bit_depth) / 16 + delta_cw[bin]`, all
    /// other bins are empty.
    pub fn new(
        bit_depth: u8,
        min_bin: usize,
        max_bin: usize,
        delta_cw: &[i32; PIC_CODE_CW_BINS],
        delta_crs: i32,
    ) -> Result<Self, VvcError> {
        if min_bin > max_bin || max_bin >= PIC_CODE_CW_BINS {
            error!("invalid LMCS bin range {}..={}", min_bin, max_bin);
            return Err(VvcError::VVC_ERR_INVALID_ARGUMENT(format!(
                "LMCS bin range {}..={}",
                min_bin, max_bin
            )));
        }

        let mut rsp = Reshaper::disabled(bit_depth);
        rsp.enabled = true;
        rsp.ctu_flag = true;
        rsp.min_bin = min_bin;
        rsp.max_bin = max_bin;

        let init_cw = rsp.init_cw;
        let log2_cw = CONV_LOG2(init_cw as usize);
        let max_val = (1 << bit_depth) - 1;

        for i in 0..PIC_CODE_CW_BINS {
            rsp.bin_cw[i] = if i < min_bin || i > max_bin {
                0
            } else {
                init_cw + delta_cw[i]
            };
            if rsp.bin_cw[i] < 0 {
                error!("negative LMCS codeword in bin {}", i);
                return Err(VvcError::VVC_ERR_INVALID_ARGUMENT(format!(
                    "LMCS codeword of bin {}",
                    i
                )));
            }
        }

        for i in 0..PIC_CODE_CW_BINS {
            let cw = rsp.bin_cw[i];
            rsp.reshape_pivot[i + 1] = rsp.reshape_pivot[i] + cw;
            rsp.fwd_scale_coef[i] = ((cw << FP_PREC) + (1 << (log2_cw - 1))) >> log2_cw;
            if cw == 0 {
                rsp.inv_scale_coef[i] = 0;
                rsp.chroma_adj_help[i] = CSCALE_IDENTITY;
            } else {
                rsp.inv_scale_coef[i] = init_cw * (1 << FP_PREC) / cw;
                rsp.chroma_adj_help[i] = init_cw * (1 << CSCALE_FP_PREC) / (cw + delta_crs);
            }
        }
        if rsp.reshape_pivot[PIC_CODE_CW_BINS] > max_val + 1 {
            error!("LMCS codewords exceed the sample range");
            return Err(VvcError::VVC_ERR_INVALID_ARGUMENT(
                "LMCS codewords exceed the sample range".to_owned(),
            ));
        }

        for s in 0..=max_val {
            let idx = (s / init_cw) as usize;
            let fwd = rsp.reshape_pivot[idx]
                + ((rsp.fwd_scale_coef[idx] * (s - rsp.input_pivot[idx]) + (1 << (FP_PREC - 1)))
                    >> FP_PREC);
            rsp.fwd_lut[s as usize] = VVC_CLIP3(0, max_val, fwd) as pel;

            let idx_inv = rsp.pwl_idx_inv(s);
            let inv = rsp.input_pivot[idx_inv]
                + ((rsp.inv_scale_coef[idx_inv] * (s - rsp.reshape_pivot[idx_inv])
                    + (1 << (FP_PREC - 1)))
                    >> FP_PREC);
            rsp.inv_lut[s as usize] = VVC_CLIP3(0, max_val, inv) as pel;
        }

        Ok(rsp)
    }

    /* bin of a value in the mapped domain */
    fn pwl_idx_inv(&self, v: i32) -> usize {
        let mut idx = self.min_bin;
        while idx <= self.max_bin {
            if v < self.reshape_pivot[idx + 1] {
                break;
            }
            idx += 1;
        }
        idx.min(PIC_CODE_CW_BINS - 1)
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn inv_lut(&self) -> &[pel] {
        &self.inv_lut
    }

    /// Chroma scale of a mapped-domain average luma value.
    pub fn chroma_adj_of(&self, avg_luma: i32) -> i32 {
        if !self.enabled {
            return CSCALE_IDENTITY;
        }
        self.chroma_adj_help[self.pwl_idx_inv(avg_luma)]
    }
}

impl ReshapeProvider for Reshaper {
    fn ctu_flag(&self) -> bool {
        self.ctu_flag
    }

    fn set_ctu_flag(&mut self, flag: bool) {
        self.ctu_flag = flag && self.enabled;
    }

    fn reset_chroma_scale(&mut self) {
        self.vpdu = None;
        self.chroma_scale = CSCALE_IDENTITY;
    }

    fn fwd_lut(&self) -> &[pel] {
        &self.fwd_lut
    }

    fn chroma_adj(&mut self, pic: &VvcPic, cu_y: &Area, area_y: &Area, log2_ctu: u8) -> i32 {
        if !self.enabled {
            return CSCALE_IDENTITY;
        }
        let win = VPDU_SIZE.min(1 << log2_ctu);
        let xw = area_y.x / win * win;
        let yw = area_y.y / win * win;
        if self.vpdu == Some((xw, yw)) {
            return self.chroma_scale;
        }
        self.vpdu = Some((xw, yw));

        /* neighbours are taken around the unit covering the window corner */
        let (x0, y0) = if cu_y.contains(xw, yw) {
            (cu_y.x, cu_y.y)
        } else {
            pic.cu_at(xw as isize, yw as isize)
                .map(|r| (r.area.x, r.area.y))
                .unwrap_or((xw, yw))
        };

        let reco = &pic.frame.planes[Y_C];
        let (pw, ph) = (reco.cfg.width, reco.cfg.height);
        let mut sum = 0i32;
        let mut num = 0usize;
        /* rows and columns past the picture edge repeat the last one inside */
        if pic.cu_at(x0 as isize - 1, y0 as isize).is_some() {
            for k in 0..win {
                sum += reco.p(x0 - 1, (y0 + k).min(ph - 1)) as i32;
            }
            num += win;
        }
        if pic.cu_at(x0 as isize, y0 as isize - 1).is_some() {
            for k in 0..win {
                sum += reco.p((x0 + k).min(pw - 1), y0 - 1) as i32;
            }
            num += win;
        }
        let avg = if num == 0 {
            1 << (self.bit_depth - 1)
        } else {
            (sum + (num >> 1) as i32) >> CONV_LOG2(num)
        };

        self.chroma_scale = self.chroma_adj_of(avg);
        self.chroma_scale
    }
}

/// Applies a chroma scale to a decoded residual.
pub fn vvc_scale_chroma_resi(resi: &mut [i32], scale: i32, bit_depth: u8) {
    let max_abs = (1 << bit_depth) - 1;
    for r in resi.iter_mut() {
        let sign = if *r < 0 { -1 } else { 1 };
        let v = sign * (((*r).abs() * scale + (1 << (CSCALE_FP_PREC - 1))) >> CSCALE_FP_PREC);
        *r = VVC_CLIP3(-max_abs - 1, max_abs, v);
    }
}

/// Encoder-side chroma residual scaling undone by `vvc_scale_chroma_resi`.
pub fn vvc_scale_chroma_resi_fwd(resi: &mut [i32], scale: i32, bit_depth: u8) {
    let max_abs = (1 << bit_depth) - 1;
    for r in resi.iter_mut() {
        let sign = if *r < 0 { -1 } else { 1 };
        let v = sign * ((((*r).abs() << CSCALE_FP_PREC) + (scale >> 1)) / scale);
        *r = VVC_CLIP3(-max_abs, max_abs, v);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sps() -> VvcSps {
        let mut sps = VvcSps {
            width: 128,
            height: 128,
            log2_ctu_size: 6,
            ..Default::default()
        };
        sps.validate().unwrap();
        sps
    }

    fn coded(pic: &mut VvcPic, area: Area) {
        let cu = CodingUnit::new(
            ChromaSampling::Cs420,
            area,
            TreeType::TREE_D,
            PredMode::MODE_INTRA,
        );
        pic.register_cu(&cu);
    }

    /* 10-bit model with bin 4 widened and bin 5 narrowed by 32 codewords */
    fn model() -> Reshaper {
        let mut delta = [0; PIC_CODE_CW_BINS];
        delta[4] = 32;
        delta[5] = -32;
        Reshaper::new(10, 0, 15, &delta, 0).unwrap()
    }

    #[test]
    fn disabled_scale_is_identity() {
        let sps = VvcSps {
            bit_depth: 8,
            ..sps()
        };
        let mut pic = VvcPic::new(&sps, 0);
        pic.frame.planes[Y_C].fill(128);
        coded(&mut pic, Area::new(0, 0, 8, 8));
        let mut rsp = Reshaper::disabled(8);
        let blk = Area::new(8, 0, 8, 8);
        assert_eq!(rsp.chroma_adj(&pic, &blk, &blk, 6), CSCALE_IDENTITY);
        assert!(!rsp.ctu_flag());
        assert_eq!(rsp.fwd_lut()[128], 128);
    }

    #[test]
    fn flat_model_is_identity() {
        let rsp = Reshaper::new(10, 0, 15, &[0; PIC_CODE_CW_BINS], 0).unwrap();
        assert!((0..1024).all(|v| rsp.fwd_lut()[v] == v as pel));
        assert!((0..1024).all(|v| rsp.inv_lut()[v] == v as pel));
        assert_eq!(rsp.chroma_adj_of(512), CSCALE_IDENTITY);
    }

    #[test]
    fn lut_follows_pivots() {
        let rsp = model();
        assert_eq!(rsp.fwd_lut()[256], 256);
        assert_eq!(rsp.fwd_lut()[300], 322);
        assert_eq!(rsp.fwd_lut()[384], 384);
        assert_eq!(rsp.inv_lut()[352], 320);
    }

    #[test]
    fn scale_comes_from_neighbour_luma() {
        let sps = sps();
        let mut pic = VvcPic::new(&sps, 0);
        let mut rsp = model();
        let mapped = rsp.fwd_lut()[300];
        pic.frame.planes[Y_C].fill(mapped);
        coded(&mut pic, Area::new(0, 64, 64, 64));
        coded(&mut pic, Area::new(64, 0, 64, 64));

        let cu = Area::new(64, 64, 32, 32);
        let scale = rsp.chroma_adj(&pic, &cu, &cu, 6);
        assert_eq!(scale, 64 * 2048 / 96);

        /* same window, cached */
        pic.frame.planes[Y_C].fill(0);
        assert_eq!(rsp.chroma_adj(&pic, &cu, &Area::new(96, 96, 32, 32), 6), scale);
        rsp.reset_chroma_scale();
        assert_eq!(rsp.chroma_adj(&pic, &cu, &cu, 6), rsp.chroma_adj_of(0));
    }

    #[test]
    fn bottom_edge_repeats_last_luma_row() {
        let sps = VvcSps {
            height: 72,
            ..sps()
        };
        let mut pic = VvcPic::new(&sps, 0);
        let mut rsp = model();
        coded(&mut pic, Area::new(0, 64, 64, 8));
        for y in 64..71 {
            pic.frame.planes[Y_C][y][63] = 0;
        }
        pic.frame.planes[Y_C][71][63] = 330;

        /* 57 copies of 330 and 7 zeros over 64 samples average to 294 */
        let cu = Area::new(64, 64, 32, 8);
        assert_eq!(rsp.chroma_adj(&pic, &cu, &cu, 6), rsp.chroma_adj_of(294));
        assert_eq!(rsp.chroma_adj_of(294), 64 * 2048 / 96);
    }

    #[test]
    fn right_edge_repeats_last_luma_column() {
        let sps = VvcSps {
            width: 80,
            ..sps()
        };
        let mut pic = VvcPic::new(&sps, 0);
        let mut rsp = model();
        coded(&mut pic, Area::new(64, 0, 16, 64));
        pic.frame.planes[Y_C][63][64..80].copy_from_slice(&[0; 16]);
        pic.frame.planes[Y_C][63][79] = 350;

        /* 49 copies of 350 and 15 zeros average to 268 */
        let cu = Area::new(64, 64, 16, 16);
        assert_eq!(rsp.chroma_adj(&pic, &cu, &cu, 6), 64 * 2048 / 96);
    }

    #[test]
    fn scaled_residual_keeps_negative_extreme() {
        let mut resi = vec![-1024, 1024, -5];
        vvc_scale_chroma_resi(&mut resi, CSCALE_IDENTITY, 10);
        assert_eq!(resi, vec![-1024, 1023, -5]);
    }

    #[test]
    fn no_neighbours_uses_mid_grey() {
        let sps = sps();
        let pic = VvcPic::new(&sps, 0);
        let mut rsp = model();
        let cu = Area::new(0, 0, 16, 16);
        assert_eq!(rsp.chroma_adj(&pic, &cu, &cu, 6), rsp.chroma_adj_of(512));
    }

    #[test]
    fn residual_scaling_inverts_encoder_scaling() {
        let scale = model().chroma_adj_of(322);
        assert!(scale < CSCALE_IDENTITY);
        let orig: Vec<i32> = (-300..=300).collect();
        let mut resi = orig.clone();
        vvc_scale_chroma_resi_fwd(&mut resi, scale, 10);
        vvc_scale_chroma_resi(&mut resi, scale, 10);
        assert_eq!(resi, orig);
    }

    #[test]
    fn rejects_inverted_bin_range() {
        assert!(Reshaper::new(10, 9, 3, &[0; PIC_CODE_CW_BINS], 0).is_err());
    }
}
