use std::arch::x86_64::*;

#[target_feature(enable = "avx2")]
pub unsafe fn count_bases_avx2(seq: &[u8]) -> (u64, u64, u64, u64, u64) {
    let mut a = 0u64;
    let mut c = 0u64;
    let mut g = 0u64;
    let mut t = 0u64;
    let mut n = 0u64;
    let mut i = 0usize;
    let len = seq.len();

    let upper_mask = _mm256_set1_epi8(0xDFu8 as i8);
    let va = _mm256_set1_epi8(b'A' as i8);
    let vc = _mm256_set1_epi8(b'C' as i8);
    let vg = _mm256_set1_epi8(b'G' as i8);
    let vt = _mm256_set1_epi8(b'T' as i8);
    let vn = _mm256_set1_epi8(b'N' as i8);

    while i + 32 <= len {
        let ptr = unsafe { seq.as_ptr().add(i) as *const __m256i };
        let mut v = unsafe { _mm256_loadu_si256(ptr) };
        v = _mm256_and_si256(v, upper_mask);
        let ma = _mm256_movemask_epi8(_mm256_cmpeq_epi8(v, va)) as u32;
        let mc = _mm256_movemask_epi8(_mm256_cmpeq_epi8(v, vc)) as u32;
        let mg = _mm256_movemask_epi8(_mm256_cmpeq_epi8(v, vg)) as u32;
        let mt = _mm256_movemask_epi8(_mm256_cmpeq_epi8(v, vt)) as u32;
        let mn = _mm256_movemask_epi8(_mm256_cmpeq_epi8(v, vn)) as u32;
        a += ma.count_ones() as u64;
        c += mc.count_ones() as u64;
        g += mg.count_ones() as u64;
        t += mt.count_ones() as u64;
        n += mn.count_ones() as u64;
        i += 32;
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
