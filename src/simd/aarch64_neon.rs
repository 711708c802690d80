use std::arch::aarch64::*;

#[target_feature(enable = "neon")]
pub unsafe fn count_bases_neon(seq: &[u8]) -> (u64, u64, u64, u64, u64) {
    let mut a = 0u64;
    let mut c = 0u64;
    let mut g = 0u64;
    let mut t = 0u64;
    let mut n = 0u64;
    let mut i = 0usize;
    let len = seq.len();

    let upper_mask = vdupq_n_u8(0xDF);
    let va = vdupq_n_u8(b'A');
    let vc = vdupq_n_u8(b'C');
    let vg = vdupq_n_u8(b'G');
    let vt = vdupq_n_u8(b'T');
    let vn = vdupq_n_u8(b'N');
    let ones = vdupq_n_u8(1);

    while i + 16 <= len {
        let ptr = unsafe { seq.as_ptr().add(i) };
        let v = unsafe { vld1q_u8(ptr) };
        let v = vandq_u8(v, upper_mask);

        let ma = vceqq_u8(v, va);
        let mc = vceqq_u8(v, vc);
        let mg = vceqq_u8(v, vg);
        let mt = vceqq_u8(v, vt);
        let mn = vceqq_u8(v, vn);

        a += vaddvq_u8(vandq_u8(ma, ones)) as u64;
        c += vaddvq_u8(vandq_u8(mc, ones)) as u64;
        g += vaddvq_u8(vandq_u8(mg, ones)) as u64;
        t += vaddvq_u8(vandq_u8(mt, ones)) as u64;
        n += vaddvq_u8(vandq_u8(mn, ones)) as u64;

        i += 16;
    }

    for &b in &seq[i..] {
        match b & 0xDF {
            b'A' => a += 1,
            b'C' => c += 1,
            b'G' => g += 1,
            b'T' => t += 1,
            b'N' => n += 1,
            _ => {}
        }
    }

    (a, c, g, t, n)
}
