use super::*;

/// Rebuilds the chroma pair of a jointly coded residual.
///
/// `joint_cbcr` is `(cbf_cb << 1) | cbf_cr`; modes 2 and 3 carry the coded
/// signal in Cb, mode 1 carries it in Cr.
pub fn vvc_inv_transform_ict(
    joint_cbcr: u8,
    sign: bool,
    resi_cb: &mut [i32],
    resi_cr: &mut [i32],
) {
    let s = if sign { -1 } else { 1 };
    match joint_cbcr {
        3 => {
            for (cr, cb) in resi_cr.iter_mut().zip(resi_cb.iter()) {
                *cr = s * *cb;
            }
        }
        2 => {
            for (cr, cb) in resi_cr.iter_mut().zip(resi_cb.iter()) {
                *cr = (s * *cb) >> 1;
            }
        }
        1 => {
            for (cb, cr) in resi_cb.iter_mut().zip(resi_cr.iter()) {
                *cb = (s * *cr) >> 1;
            }
        }
        _ => {}
    }
}

/* component whose transform holds the joint residual */
#[inline]
pub(crate) fn vvc_ict_coded_comp(joint_cbcr: u8) -> usize {
    if joint_cbcr >> 1 != 0 {
        U_C
    } else {
        V_C
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use interpolate_name::interpolate_test;
    use pretty_assertions::assert_eq;

    fn run(mode: u8, sign: bool) -> (Vec<i32>, Vec<i32>) {
        let coded = vec![7, -7, 16, -1, 0, 3];
        let mut cb = vec![0; coded.len()];
        let mut cr = vec![0; coded.len()];
        if vvc_ict_coded_comp(mode) == U_C {
            cb.copy_from_slice(&coded);
        } else {
            cr.copy_from_slice(&coded);
        }
        vvc_inv_transform_ict(mode, sign, &mut cb, &mut cr);
        (cb, cr)
    }

    #[interpolate_test(positive, false)]
    #[interpolate_test(negative, true)]
    fn full_weight_mode_copies_cb(sign: bool) {
        let (cb, cr) = run(3, sign);
        let s = if sign { -1 } else { 1 };
        assert_eq!(cr, cb.iter().map(|v| s * v).collect::<Vec<_>>());
    }

    #[test]
    fn half_weight_cr_from_cb() {
        let (cb, cr) = run(2, false);
        assert_eq!(cb, vec![7, -7, 16, -1, 0, 3]);
        assert_eq!(cr, vec![3, -4, 8, -1, 0, 1]);
    }

    #[test]
    fn half_weight_cb_from_cr_with_sign() {
        let (cb, cr) = run(1, true);
        assert_eq!(cr, vec![7, -7, 16, -1, 0, 3]);
        assert_eq!(cb, vec![-4, 3, -8, 0, 0, -2]);
    }

    #[test]
    fn mode_zero_keeps_components_independent() {
        let mut cb = vec![5, 6];
        let mut cr = vec![-5, 9];
        vvc_inv_transform_ict(0, true, &mut cb, &mut cr);
        assert_eq!((cb, cr), (vec![5, 6], vec![-5, 9]));
    }
}
