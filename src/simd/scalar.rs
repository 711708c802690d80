pub fn count_bases(seq: &[u8]) -> (u64, u64, u64, u64, u64) {
    let mut a = 0u64;
    let mut c = 0u64;
    let mut g = 0u64;
    let mut t = 0u64;
    let mut n = 0u64;
    for &b in seq {
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
