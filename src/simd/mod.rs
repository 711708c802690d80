#[cfg(target_arch = "aarch64")]
mod aarch64_neon;
mod scalar;
#[cfg(target_arch = "x86_64")]
mod x86_avx2;

/// Case-insensitive (A, C, G, T, N) counts for one sequence. Totals are
/// u64 because whole chromosomes pass through here, not short reads.
pub fn count_bases(seq: &[u8]) -> (u64, u64, u64, u64, u64) {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            // SAFETY: avx2 availability checked above.
            return unsafe { x86_avx2::count_bases_avx2(seq) };
        }
        scalar::count_bases(seq)
    }
    #[cfg(target_arch = "aarch64")]
    {
        // SAFETY: neon is baseline on aarch64.
        unsafe { aarch64_neon::count_bases_neon(seq) }
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        scalar::count_bases(seq)
    }
}
