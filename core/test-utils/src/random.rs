use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn get_seedable_rng() -> StdRng {
    StdRng::seed_from_u64(0x0b51_d6e5)
}
