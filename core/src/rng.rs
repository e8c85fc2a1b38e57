//! Deterministic random number generation for synthetic cohorts.
//!
//! RULE: nothing may call a platform RNG.
//! Every stream is derived from an explicit seed, so a cohort generated
//! twice from the same seed is identical row for row.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Stable stream assignments. A stream's seed is the draw at its index
/// from the master generator, so entries are append-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum Stream {
    Customers = 0,
    Visits    = 1,
    Lines     = 2,
}

impl Stream {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Visits    => "visits",
            Self::Lines     => "lines",
        }
    }

    pub fn rng(self, master_seed: u64) -> CohortRng {
        CohortRng::new(master_seed, self)
    }
}

/// One seeded stream of cohort draws.
pub struct CohortRng {
    stream: Stream,
    inner:  Pcg64Mcg,
}

impl CohortRng {
    pub fn new(master_seed: u64, stream: Stream) -> Self {
        let mut master = Pcg64Mcg::seed_from_u64(master_seed);
        let stream_seed = std::iter::repeat_with(|| master.gen::<u64>())
            .nth(stream as usize)
            .unwrap_or(master_seed);
        log::debug!("Cohort stream '{}' seeded from master seed {master_seed}", stream.name());
        Self { stream, inner: Pcg64Mcg::seed_from_u64(stream_seed) }
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }

    /// Uniform integer in `[0, n)`; zero when `n` is zero.
    pub fn below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.inner.gen_range(0..n)
    }

    /// True with probability `p`, clamped to `[0, 1]`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen::<f64>() < p.clamp(0.0, 1.0)
    }

    /// Pareto draw with scale `x_min` and shape `alpha`; never below `x_min`.
    pub fn pareto(&mut self, x_min: f64, alpha: f64) -> f64 {
        // 1 - U lies in (0, 1], so the power stays finite.
        let u = 1.0 - self.inner.gen::<f64>();
        x_min * u.powf(-1.0 / alpha)
    }
}
