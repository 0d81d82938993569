use super::*;
use crate::com::*;

use num_traits::*;

use std::fmt::Debug;
use std::ops::{Index, IndexMut};

pub trait Pixel:
    PrimInt + AsPrimitive<i32> + AsPrimitive<usize> + Default + Debug + Send + Sync + 'static
{
}

impl Pixel for u8 {}
impl Pixel for u16 {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaneConfig {
    pub stride: usize,
    pub width: usize,
    pub height: usize,
    /* decimator along the X axis, 1 for 4:2:0 chroma */
    pub xdec: usize,
    pub ydec: usize,
}

/// One sample plane of a picture, rows are `cfg.stride` apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plane<T: Pixel> {
    pub data: Vec<T>,
    pub cfg: PlaneConfig,
}

impl<T: Pixel> Plane<T> {
    pub fn new(width: usize, height: usize, xdec: usize, ydec: usize) -> Self {
        Plane {
            data: vec![T::zero(); width * height],
            cfg: PlaneConfig {
                stride: width,
                width,
                height,
                xdec,
                ydec,
            },
        }
    }

    #[inline]
    pub fn p(&self, x: usize, y: usize) -> T {
        self.data[y * self.cfg.stride + x]
    }

    pub fn fill(&mut self, v: T) {
        for p in self.data.iter_mut() {
            *p = v;
        }
    }

    /// Copies a compact `area`-sized block out of the plane.
    pub fn copy_to(&self, area: &Area, dst: &mut [T]) {
        for j in 0..area.height {
            let src = &self[area.y + j][area.x..area.x + area.width];
            dst[j * area.width..(j + 1) * area.width].copy_from_slice(src);
        }
    }
}

impl<T: Pixel> Index<usize> for Plane<T> {
    type Output = [T];

    #[inline]
    fn index(&self, y: usize) -> &Self::Output {
        let start = y * self.cfg.stride;
        &self.data[start..start + self.cfg.width]
    }
}

impl<T: Pixel> IndexMut<usize> for Plane<T> {
    #[inline]
    fn index_mut(&mut self, y: usize) -> &mut Self::Output {
        let start = y * self.cfg.stride;
        let width = self.cfg.width;
        &mut self.data[start..start + width]
    }
}

#[derive(Debug, Clone, Default)]
pub struct Frame<T: Pixel> {
    pub planes: [Plane<T>; N_C],
    pub chroma_sampling: ChromaSampling,
}

impl<T: Pixel> Frame<T> {
    pub fn new(width: usize, height: usize, chroma_sampling: ChromaSampling) -> Self {
        let (sx, sy) = chroma_sampling.sampling_period();
        let (cw, ch) = if chroma_sampling == ChromaSampling::Cs400 {
            (0, 0)
        } else {
            ((width + sx - 1) / sx, (height + sy - 1) / sy)
        };
        let (xdec, ydec) = (sx >> 1, sy >> 1);
        Frame {
            planes: [
                Plane::new(width, height, 0, 0),
                Plane::new(cw, ch, xdec, ydec),
                Plane::new(cw, ch, xdec, ydec),
            ],
            chroma_sampling,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frame_420_chroma_is_half_size() {
        let f = Frame::<u16>::new(66, 34, ChromaSampling::Cs420);
        assert_eq!(f.planes[U_C].cfg.width, 33);
        assert_eq!(f.planes[V_C].cfg.height, 17);
        assert_eq!(f.planes[U_C].cfg.xdec, 1);
    }

    #[test]
    fn frame_400_has_no_chroma() {
        let f = Frame::<u16>::new(64, 64, ChromaSampling::Cs400);
        assert!(f.planes[U_C].data.is_empty());
    }

    #[test]
    fn plane_rows_index_by_stride() {
        let mut p = Plane::<u16>::new(8, 4, 0, 0);
        p[2][3] = 77;
        assert_eq!(p.p(3, 2), 77);
        let mut blk = [0u16; 4];
        p.copy_to(&Area::new(2, 2, 2, 2), &mut blk);
        assert_eq!(blk, [0, 77, 0, 0]);
    }
}
