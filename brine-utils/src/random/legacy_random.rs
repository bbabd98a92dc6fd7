use crate::random::Random;

/// The 48 bit linear congruential generator of `java.util.Random`.
///
/// Kept bit-compatible so a seed always yields the same rotation sequence.
pub struct LegacyRandom {
    seed: i64,
}

impl LegacyRandom {
    /// Creates a generator with the given seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed: (seed as i64 ^ 0x5DEE_CE66D) & 0xFFFF_FFFF_FFFF,
        }
    }

    fn next(&mut self, bits: u64) -> i32 {
        let m = self.seed.wrapping_mul(0x5DEE_CE66D).wrapping_add(0xB) & 0xFFFF_FFFF_FFFF;
        self.seed = m;
        (m >> (48 - bits)) as i32
    }
}

impl Random for LegacyRandom {
    fn next_i32_bounded(&mut self, bound: i32) -> i32 {
        if bound & bound.wrapping_sub(1) == 0 {
            ((i64::from(bound)).wrapping_mul(i64::from(self.next(31))) >> 31) as i32
        } else {
            loop {
                let i = self.next(31);
                let j = i % bound;
                if i.wrapping_sub(j).wrapping_add(bound.wrapping_sub(1)) >= 0 {
                    return j;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::random::Random;

    use super::LegacyRandom;

    #[test]
    fn test_next_i32_bounded() {
        let mut rand = LegacyRandom::from_seed(0);

        let values = [0, 13, 4, 2, 5, 8, 11, 6, 9, 14];

        for value in values {
            assert_eq!(rand.next_i32_bounded(0xf), value);
        }

        let mut rand = LegacyRandom::from_seed(0);
        for _ in 0..10 {
            assert_eq!(rand.next_i32_bounded(1), 0);
        }

        let mut rand = LegacyRandom::from_seed(0);
        let values = [1, 1, 0, 1, 1, 0, 1, 0, 1, 1];
        for value in values {
            assert_eq!(rand.next_i32_bounded(2), value);
        }
    }

    #[test]
    fn test_power_of_two_bound_stays_in_range() {
        let mut rand = LegacyRandom::from_seed(42);
        for _ in 0..1000 {
            assert!((0..8).contains(&rand.next_i32_bounded(8)));
        }
    }
}
