use std::cmp::*;

/* clipping within min and max */
#[inline]
pub(crate) fn VVC_CLIP3<T: Ord>(min_x: T, max_x: T, value: T) -> T {
    max(min_x, min(max_x, value))
}

/* log2 of a power-of-two block dimension */
#[inline]
pub(crate) fn CONV_LOG2(v: usize) -> i32 {
    debug_assert!(v.is_power_of_two());
    v.trailing_zeros() as i32
}
