use criterion::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use rvvc::api::*;
use rvvc::bench::recon::*;
use rvvc::com::hmvp::HmvpTable;
use rvvc::com::reshape::*;
use rvvc::com::*;

criterion_group!(recon, bench_recon_64x64, bench_inv_transform_ict);
criterion_group!(lmcs, bench_map_pred, bench_scale_chroma_resi);
criterion_group!(hmvp, bench_hmvp_add);

fn random_pels(ra: &mut ChaChaRng, n: usize, bit_depth: u8) -> Vec<pel> {
    (0..n).map(|_| ra.gen_range(0, 1 << bit_depth) as pel).collect()
}

fn random_resi(ra: &mut ChaChaRng, n: usize) -> Vec<i32> {
    (0..n).map(|_| ra.gen_range(-256, 256)).collect()
}

fn bench_recon_64x64(c: &mut Criterion) {
    let mut ra = ChaChaRng::from_seed([0; 32]);
    let area = Area::new(64, 64, 64, 64);
    let pred = random_pels(&mut ra, area.area(), 10);
    let resi = random_resi(&mut ra, area.area());
    let mut rec = Plane::<pel>::new(256, 256, 0, 0);
    let clp = ClpRng::new(10);

    c.bench_function("recon_64x64", |b| {
        b.iter(|| {
            vvc_recon(&pred, Some(&resi), black_box(&area), &mut rec, &clp);
        })
    });
}

fn bench_inv_transform_ict(c: &mut Criterion) {
    let mut ra = ChaChaRng::from_seed([1; 32]);
    let mut cb = random_resi(&mut ra, 32 * 32);
    let mut cr = vec![0; 32 * 32];

    c.bench_function("inv_transform_ict_32x32", |b| {
        b.iter(|| {
            vvc_inv_transform_ict(black_box(2), true, &mut cb, &mut cr);
        })
    });
}

fn bench_map_pred(c: &mut Criterion) {
    let mut ra = ChaChaRng::from_seed([2; 32]);
    let mut delta = [0; PIC_CODE_CW_BINS];
    for d in delta.iter_mut() {
        *d = ra.gen_range(-8, 8);
    }
    let rsp = match Reshaper::new(10, 0, PIC_CODE_CW_BINS - 1, &delta, 0) {
        Ok(rsp) => rsp,
        Err(_) => return,
    };
    let mut pred = random_pels(&mut ra, 128 * 128, 10);

    c.bench_function("map_pred_128x128", |b| {
        b.iter(|| {
            vvc_map_pred(black_box(&mut pred), rsp.fwd_lut());
        })
    });
}

fn bench_scale_chroma_resi(c: &mut Criterion) {
    let mut ra = ChaChaRng::from_seed([3; 32]);
    let mut resi = random_resi(&mut ra, 32 * 32);

    c.bench_function("scale_chroma_resi_32x32", |b| {
        b.iter(|| {
            vvc_scale_chroma_resi(black_box(&mut resi), 1365, 10);
        })
    });
}

fn bench_hmvp_add(c: &mut Criterion) {
    let mut ra = ChaChaRng::from_seed([4; 32]);
    let mis: Vec<MotionInfo> = (0..64)
        .map(|_| MotionInfo {
            is_inter: true,
            inter_dir: 1,
            ref_idx: [ra.gen_range(0, 2), REFI_INVALID],
            mv: [Mv::new(ra.gen_range(-64, 64), ra.gen_range(-64, 64)), Mv::default()],
            ..Default::default()
        })
        .collect();
    let mut table = HmvpTable::new();

    c.bench_function("hmvp_add_64", |b| {
        b.iter(|| {
            for mi in mis.iter() {
                table.add(black_box(mi));
            }
        })
    });
}
