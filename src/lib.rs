#![allow(warnings)]
#![allow(dead_code)]

#[macro_use]
extern crate num_derive;

#[macro_use]
extern crate lazy_static;

pub mod api;
pub mod com;
mod dec;

cfg_if::cfg_if! {
    if #[cfg(feature = "bench")] {
        pub mod bench {
            pub mod recon {
                pub use crate::com::itdq::vvc_inv_transform_ict;
                pub use crate::com::recon::*;
            }
        }
    }
}
