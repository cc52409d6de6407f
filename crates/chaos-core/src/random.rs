// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Random Grids
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Monte-Carlo sampling grids.
//!
//! Seeded grids carry their generator state, so extending a grid continues
//! the stream: a grid grown from n to m points is bit-identical in its
//! first n rows to the un-extended grid, and bit-identical overall to a
//! grid drawn with m points from the same seed. To keep that property the
//! seeded path draws point-by-point (dimension-minor); the unseeded path
//! draws per-dimension blocks.

use chaos_types::error::{ChaosError, ChaosResult};
use chaos_types::parameter::RandomParameter;
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Beta, Distribution, StandardNormal};

use crate::grid::GridPoints;

/// Random sampling grid over the canonical domain.
#[derive(Debug, Clone)]
pub struct RandomGrid {
    params: Vec<RandomParameter>,
    points: GridPoints,
    rng: Option<ChaCha8Rng>,
    seed: Option<u64>,
}

fn draw_dim<R: Rng>(param: &RandomParameter, rng: &mut R) -> ChaosResult<f64> {
    match *param {
        RandomParameter::Beta {
            shape: (p, q), ..
        } => {
            let beta = Beta::new(p, q).map_err(|e| {
                ChaosError::ConfigError(format!("beta sampler for shape ({p}, {q}): {e}"))
            })?;
            // map the [0, 1] beta variate onto the canonical [-1, 1] domain
            Ok(2.0 * beta.sample(rng) - 1.0)
        }
        RandomParameter::Normal { .. } => Ok(StandardNormal.sample(rng)),
    }
}

impl RandomGrid {
    /// Draw an initial grid of `n_grid` points.
    pub fn new(
        params: &[RandomParameter],
        n_grid: usize,
        seed: Option<u64>,
    ) -> ChaosResult<Self> {
        for p in params {
            p.validate()?;
        }
        let mut grid = RandomGrid {
            params: params.to_vec(),
            points: GridPoints::from_norm(params, Array2::zeros((0, params.len())), None)?,
            rng: seed.map(ChaCha8Rng::seed_from_u64),
            seed,
        };
        grid.draw_append(n_grid)?;
        Ok(grid)
    }

    pub fn params(&self) -> &[RandomParameter] {
        &self.params
    }

    pub fn points(&self) -> &GridPoints {
        &self.points
    }

    pub fn n_grid(&self) -> usize {
        self.points.n_grid()
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// New grid grown to `n_total` points. The original is untouched; the
    /// returned grid keeps every existing row, id and (for seeded grids)
    /// generator stream position. Requests not larger than the current size
    /// add nothing; the returned count says how many points were appended.
    pub fn extended(&self, n_total: usize) -> ChaosResult<(RandomGrid, usize)> {
        let mut grown = self.clone();
        if n_total <= grown.n_grid() {
            return Ok((grown, 0));
        }
        let added = n_total - grown.n_grid();
        grown.draw_append(added)?;
        Ok((grown, added))
    }

    fn draw_append(&mut self, n_new: usize) -> ChaosResult<()> {
        if n_new == 0 {
            return Ok(());
        }
        let dim = self.params.len();
        let mut block = Array2::zeros((n_new, dim));
        match &mut self.rng {
            Some(rng) => {
                // point-major order: the stream position after n points does
                // not depend on how the draws were batched
                for i in 0..n_new {
                    for d in 0..dim {
                        block[[i, d]] = draw_dim(&self.params[d], rng)?;
                    }
                }
            }
            None => {
                let mut rng = ChaCha8Rng::from_entropy();
                for d in 0..dim {
                    for i in 0..n_new {
                        block[[i, d]] = draw_dim(&self.params[d], &mut rng)?;
                    }
                }
            }
        }
        self.points.append_norm(&self.params, block)
    }
}
