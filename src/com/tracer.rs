#![allow(unused_variables)]

use std::fmt::Display;
#[cfg(feature = "trace")]
use std::fs::OpenOptions;
use std::io::Write;

use super::*;
use crate::api::*;

pub(crate) type Tracer = (Box<dyn Write>, isize);

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(feature = "trace")]
pub(crate) fn OPEN_TRACE() -> Option<Tracer> {
    let fp_trace = OpenOptions::new()
        .append(true)
        .create(true)
        .open("dec_trace.txt");
    if let Ok(fp) = fp_trace {
        Some((Box::new(fp), 0))
    } else {
        None
    }
}

#[cfg(feature = "trace")]
pub(crate) fn VVC_TRACE_COUNTER(tracer: &mut Option<Tracer>) {
    if let Some((writer, counter)) = tracer {
        let _ = writer.write_fmt(format_args!("{} \t", *counter));
        *counter += 1;
    }
}

#[cfg(feature = "trace")]
pub(crate) fn VVC_TRACE<T: Display>(tracer: &mut Option<Tracer>, name: T) {
    if let Some((writer, _)) = tracer {
        let _ = writer.write_fmt(format_args!("{}", name));
    }
}

#[cfg(feature = "trace")]
fn VVC_TRACE_LIST<T: Display>(tracer: &mut Option<Tracer>, vals: impl Iterator<Item = T>) {
    for (i, v) in vals.enumerate() {
        if i != 0 {
            VVC_TRACE(tracer, " , ");
        }
        VVC_TRACE(tracer, v);
    }
    VVC_TRACE(tracer, " \n");
}

#[cfg(feature = "trace_cu")]
pub(crate) fn TRACE_CU(tracer: &mut Option<Tracer>, cu: &CodingUnit) {
    let a = cu.blocks[cu.ch_type()];
    VVC_TRACE_COUNTER(tracer);
    VVC_TRACE(tracer, "CU mode ");
    VVC_TRACE(tracer, cu.pred_mode);
    VVC_TRACE(tracer, " x ");
    VVC_TRACE(tracer, a.x);
    VVC_TRACE(tracer, " y ");
    VVC_TRACE(tracer, a.y);
    VVC_TRACE(tracer, " w ");
    VVC_TRACE(tracer, a.width);
    VVC_TRACE(tracer, " h ");
    VVC_TRACE(tracer, a.height);
    VVC_TRACE(tracer, " \n");
}

#[cfg(feature = "trace_mv")]
pub(crate) fn TRACE_MV(tracer: &mut Option<Tracer>, cu: &CodingUnit) {
    VVC_TRACE_COUNTER(tracer);
    VVC_TRACE(tracer, "MV dir ");
    VVC_TRACE(tracer, cu.pu.inter_dir);
    for l in 0..REFP_NUM {
        VVC_TRACE(tracer, " refi ");
        VVC_TRACE(tracer, cu.pu.ref_idx[l]);
        VVC_TRACE(tracer, " mv (");
        VVC_TRACE(tracer, cu.pu.mv[l].hor);
        VVC_TRACE(tracer, ", ");
        VVC_TRACE(tracer, cu.pu.mv[l].ver);
        VVC_TRACE(tracer, ")");
    }
    VVC_TRACE(tracer, " \n");
}

#[cfg(feature = "trace_pred")]
pub(crate) fn TRACE_PRED(tracer: &mut Option<Tracer>, comp: usize, area: &Area, pred: &[pel]) {
    VVC_TRACE_COUNTER(tracer);
    VVC_TRACE(tracer, "Pred for ");
    VVC_TRACE(tracer, comp);
    VVC_TRACE(tracer, " : ");
    VVC_TRACE_LIST(tracer, pred[..area.area()].iter());
}

#[cfg(feature = "trace_resi")]
pub(crate) fn TRACE_RESI(tracer: &mut Option<Tracer>, comp: usize, area: &Area, resi: &[i32]) {
    VVC_TRACE_COUNTER(tracer);
    VVC_TRACE(tracer, "Resi for ");
    VVC_TRACE(tracer, comp);
    VVC_TRACE(tracer, " : ");
    VVC_TRACE_LIST(tracer, resi[..area.area()].iter());
}

#[cfg(feature = "trace_reco")]
pub(crate) fn TRACE_RECO(tracer: &mut Option<Tracer>, comp: usize, area: &Area, reco: &Plane<pel>) {
    VVC_TRACE_COUNTER(tracer);
    VVC_TRACE(tracer, "Reco for ");
    VVC_TRACE(tracer, comp);
    VVC_TRACE(tracer, " : ");
    VVC_TRACE_LIST(
        tracer,
        (0..area.height).flat_map(|j| reco[area.y + j][area.x..area.right()].iter()),
    );
}

#[cfg(feature = "trace_dbf")]
pub(crate) fn TRACE_BS(tracer: &mut Option<Tracer>, dir: usize, x: usize, y: usize, bs: u8) {
    VVC_TRACE_COUNTER(tracer);
    VVC_TRACE(tracer, if dir == 0 { "BS ver x " } else { "BS hor x " });
    VVC_TRACE(tracer, x);
    VVC_TRACE(tracer, " y ");
    VVC_TRACE(tracer, y);
    VVC_TRACE(tracer, " bs ");
    VVC_TRACE(tracer, bs);
    VVC_TRACE(tracer, " \n");
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(not(feature = "trace"))]
pub(crate) fn OPEN_TRACE() -> Option<Tracer> {
    None
}

#[cfg(not(feature = "trace"))]
pub(crate) fn VVC_TRACE_COUNTER(tracer: &mut Option<Tracer>) {}

#[cfg(not(feature = "trace"))]
pub(crate) fn VVC_TRACE<T: Display>(tracer: &mut Option<Tracer>, name: T) {}

#[cfg(not(feature = "trace_cu"))]
pub(crate) fn TRACE_CU(tracer: &mut Option<Tracer>, cu: &CodingUnit) {}

#[cfg(not(feature = "trace_mv"))]
pub(crate) fn TRACE_MV(tracer: &mut Option<Tracer>, cu: &CodingUnit) {}

#[cfg(not(feature = "trace_pred"))]
pub(crate) fn TRACE_PRED(tracer: &mut Option<Tracer>, comp: usize, area: &Area, pred: &[pel]) {}

#[cfg(not(feature = "trace_resi"))]
pub(crate) fn TRACE_RESI(tracer: &mut Option<Tracer>, comp: usize, area: &Area, resi: &[i32]) {}

#[cfg(not(feature = "trace_reco"))]
pub(crate) fn TRACE_RECO(tracer: &mut Option<Tracer>, comp: usize, area: &Area, reco: &Plane<pel>) {
}

#[cfg(not(feature = "trace_dbf"))]
pub(crate) fn TRACE_BS(tracer: &mut Option<Tracer>, dir: usize, x: usize, y: usize, bs: u8) {}
