//! Row-weight sampling for XOR combination.
//!
//! In XOR mode the parallel double-buffer strategy can let every destination
//! block pick its own number of neighbors instead of a fixed degree. The
//! degree of each row is binomially distributed, `B(n, p)` with
//! `p = 2 (ln n + c - 1) / n`, which makes the random XOR matrix over the
//! source half full rank with high probability.

use super::RandomStream;
use crate::error::Error;

/// Tuning constant `c` in the edge probability.
const ROW_WEIGHT_C: f64 = 2.0;

/// Draws binomially distributed row weights from a [`RandomStream`].
#[derive(Clone, Debug)]
pub(crate) struct RowWeights {
    n: u64,
    p: f64,
    /// `ln P(X = 0) = n ln(1 - p)`, cached for the inversion loop.
    ln_p0: f64,
}

impl RowWeights {
    pub(crate) fn new(n_rows: u64) -> Self {
        let n = n_rows.max(1);
        let nf = n as f64;
        let p = (2.0 * (nf.ln() + ROW_WEIGHT_C - 1.0) / nf).clamp(0.0, 1.0);
        let ln_p0 = nf * (-p).ln_1p();
        Self { n, p, ln_p0 }
    }

    /// Samples one row weight, never less than one.
    ///
    /// Uses CDF inversion: a uniform `u` is drawn once and the binomial
    /// probabilities are accumulated until they exceed it.
    pub(crate) fn sample(&self, stream: &mut RandomStream) -> Result<u64, Error> {
        if self.p >= 1.0 {
            return Ok(self.n);
        }

        // 53 random bits give a uniform double in [0, 1).
        let u = (stream.rand_u64()? >> 11) as f64 / (1u64 << 53) as f64;

        let ratio = self.p / (1.0 - self.p);
        let mut k = 0u64;
        let mut pmf = self.ln_p0.exp();
        let mut cdf = pmf;
        while u > cdf && k < self.n {
            pmf *= (self.n - k) as f64 / (k + 1) as f64 * ratio;
            k += 1;
            cdf += pmf;
        }

        Ok(k.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_stay_in_range() {
        let mut stream = RandomStream::with_seed(b"abcd").unwrap();
        let weights = RowWeights::new(100);
        for _ in 0..100 {
            let w = weights.sample(&mut stream).unwrap();
            assert!((1..=100).contains(&w));
        }
    }

    #[test]
    fn small_halves_saturate_probability() {
        let weights = RowWeights::new(2);
        let mut stream = RandomStream::with_seed(b"abcd").unwrap();
        assert_eq!(weights.sample(&mut stream).unwrap(), 2);
    }

    #[test]
    fn mean_is_near_expectation() {
        let mut stream = RandomStream::with_seed(b"mean").unwrap();
        let weights = RowWeights::new(4096);
        let expected = 4096.0 * weights.p;
        let total: u64 = (0..2000).map(|_| weights.sample(&mut stream).unwrap()).sum();
        let mean = total as f64 / 2000.0;
        assert!((mean - expected).abs() < expected * 0.2, "mean {mean}, expected {expected}");
    }
}
