use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a hash of a string, used to turn seed strings into generator seeds.
pub fn fnv1a_64(input: &str) -> u64 {
    input.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME))
}

/// Generator seeded from a string.
///
/// `ChaCha8Rng` has a value-stable output stream, so the same `user_seed:facility_id`
/// pair yields the same draws on every run and platform.
pub fn seeded_rng(seed: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(fnv1a_64(seed))
}

/// First uniform draw in `[0, 1)` for a seed string.
pub fn unit_draw(seed: &str) -> f64 {
    seeded_rng(seed).random::<f64>()
}
