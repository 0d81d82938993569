use super::util::*;
use super::*;
use crate::api::*;

/// Writes `pred + resi` clipped to the sample range into `area` of `rec`,
/// or the clipped prediction alone when there is no residual.
pub fn vvc_recon(
    pred: &[pel],
    resi: Option<&[i32]>,
    area: &Area,
    rec: &mut Plane<pel>,
    clp: &ClpRng,
) {
    let w = area.width;
    for j in 0..area.height {
        let p = &pred[j * w..(j + 1) * w];
        let dst = &mut rec[area.y + j][area.x..area.x + w];
        match resi {
            Some(r) => {
                let r = &r[j * w..(j + 1) * w];
                for i in 0..w {
                    dst[i] = VVC_CLIP3(clp.min, clp.max, p[i] as i32 + r[i]) as pel;
                }
            }
            None => {
                for i in 0..w {
                    dst[i] = VVC_CLIP3(clp.min, clp.max, p[i] as i32) as pel;
                }
            }
        }
    }
}

/* blend weight of the intra part grows with the number of intra neighbours */
pub fn vvc_weight_ciip(inter: &mut [pel], intra: &[pel], num_intra: i32) {
    let w_intra = num_intra + 1;
    let w_inter = 4 - w_intra;
    for (d, s) in inter.iter_mut().zip(intra.iter()) {
        *d = ((w_inter * *d as i32 + w_intra * *s as i32 + 2) >> 2) as pel;
    }
}

/// Maps prediction samples through a luma lookup table.
pub fn vvc_map_pred(pred: &mut [pel], lut: &[pel]) {
    for p in pred.iter_mut() {
        *p = lut[*p as usize];
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn recon_clips_to_bit_depth() {
        let mut rec = Plane::<pel>::new(4, 2, 0, 0);
        let pred = [1020, 5, 512, 0];
        let resi = [10, -10, 1, 0];
        vvc_recon(&pred, Some(&resi), &Area::new(1, 1, 2, 2), &mut rec, &ClpRng::new(10));
        assert_eq!(&rec[1][1..3], &[1023, 0]);
        assert_eq!(rec[0][1], 0);
    }

    #[test]
    fn copy_without_residual() {
        let mut rec = Plane::<pel>::new(2, 1, 0, 0);
        vvc_recon(&[300, 255], None, &Area::new(0, 0, 2, 1), &mut rec, &ClpRng::new(8));
        assert_eq!(&rec[0][..], &[255, 255]);
    }

    #[test]
    fn ciip_weights() {
        let intra = [400, 400, 400];
        let mut a = [0, 0, 0];
        vvc_weight_ciip(&mut a, &intra, 0);
        assert_eq!(a[0], 100);
        let mut b = [0, 0, 0];
        vvc_weight_ciip(&mut b, &intra, 1);
        assert_eq!(b[0], 200);
        let mut c = [0, 0, 0];
        vvc_weight_ciip(&mut c, &intra, 2);
        assert_eq!(c[0], 300);
    }

    #[test]
    fn lut_mapping() {
        let lut: Vec<pel> = (0..16).map(|v| 15 - v).collect();
        let mut p = [0, 3, 15];
        vvc_map_pred(&mut p, &lut);
        assert_eq!(p, [15, 12, 0]);
    }
}
