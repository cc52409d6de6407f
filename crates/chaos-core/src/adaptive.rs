// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Adaptive Refinement
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The adaptive gPC refinement loop as an explicit state machine.
//!
//! One `step()` call performs one named transition. The cursor walks the
//! expansion order outward and, within each order, the interaction orders
//! inward-out; each accepted basis extension is first refitted with the
//! samples already paid for ("try before you grow"), and the grid only
//! grows when the extension did not pay off on its own. Sampling stops on
//! the target error, on an improvement plateau, or when the order budget
//! runs out; the best snapshot seen is what the caller gets either way.

use chaos_math::multi_index::{interaction_order, new_indices_for_order, MultiIndex};
use chaos_types::config::{AdaptiveConfig, ErrorMetric};
use chaos_types::error::{ChaosError, ChaosResult};
use chaos_types::parameter::RandomParameter;
use ndarray::{concatenate, s, Array2, Axis};

use crate::basis::{Basis, DesignMatrix};
use crate::grid::GridPoints;
use crate::model::Evaluator;
use crate::random::RandomGrid;
use crate::solver::{MoorePenrose, Solver};
use crate::surrogate::Surrogate;
use crate::validate::{loocv, nrmsd, ValidationSet};

/// Loop states. Transitions run strictly in this cycle, with early exits
/// to `Done`:
/// `GrowBasis -> GrowSamples -> Fit -> Validate -> AcceptOrRollback`,
/// then back to `GrowBasis` or `GrowSamples`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    GrowBasis,
    GrowSamples,
    Fit,
    Validate,
    AcceptOrRollback,
    Done,
}

#[derive(Debug, Clone)]
struct Snapshot {
    basis: Basis,
    coeffs: Array2<f64>,
    error: f64,
}

/// Final state of a refinement run. The surrogate is the lowest-error
/// snapshot seen, which on a non-converged run is not necessarily the
/// last one fitted.
#[derive(Debug, Clone)]
pub struct AdaptiveResult {
    pub surrogate: Surrogate,
    pub grid: GridPoints,
    pub results: Array2<f64>,
    pub design: Array2<f64>,
    pub error: f64,
    pub error_history: Vec<f64>,
    pub converged: bool,
}

/// Driver for one adaptive refinement run.
pub struct AdaptiveRefinement<'a> {
    params: Vec<RandomParameter>,
    config: AdaptiveConfig,
    evaluator: &'a dyn Evaluator,
    solver: MoorePenrose,
    validation: Option<ValidationSet>,

    phase: Phase,
    order: usize,
    io_current: usize,
    pending: Vec<Vec<MultiIndex>>,
    basis: Basis,
    grid: RandomGrid,
    results: Array2<f64>,
    design: DesignMatrix,
    coeffs: Array2<f64>,

    error_history: Vec<f64>,
    eps: f64,
    eps_ref: f64,
    eps_before_extension: f64,
    delta_eps: f64,
    extended_basis: bool,
    awaiting_payoff: bool,
    first_iter: bool,
    best: Option<Snapshot>,
    converged: bool,
}

impl<'a> AdaptiveRefinement<'a> {
    /// Set up the loop: validate the configuration, build the initial
    /// basis and grid, and (in NRMSD mode without a supplied set) draw and
    /// evaluate the held-out validation grid.
    pub fn new(
        params: &[RandomParameter],
        config: AdaptiveConfig,
        evaluator: &'a dyn Evaluator,
        validation: Option<ValidationSet>,
    ) -> ChaosResult<Self> {
        let config = config.validate(params)?;
        let dim = params.len();
        let basis = Basis::new(
            dim,
            config.order_start,
            config.order_max_norm,
            config.interaction_order,
        );
        let n0 = initial_grid_size(&config, basis.n_basis());
        let grid = RandomGrid::new(params, n0, config.seed)?;

        let validation = match (config.error_metric, validation) {
            (ErrorMetric::Nrmsd, None) => Some(ValidationSet::generate(
                params,
                config.n_validation,
                config.seed.map(|s| s.wrapping_add(1)),
                evaluator,
            )?),
            (_, v) => v,
        };

        Ok(AdaptiveRefinement {
            params: params.to_vec(),
            solver: MoorePenrose::from_kind(&config.solver),
            order: config.order_start,
            config,
            evaluator,
            validation,
            phase: Phase::GrowSamples,
            io_current: 1,
            pending: Vec::new(),
            basis,
            grid,
            results: Array2::zeros((0, 0)),
            design: DesignMatrix::new(),
            coeffs: Array2::zeros((0, 0)),
            error_history: Vec::new(),
            eps: f64::INFINITY,
            eps_ref: f64::INFINITY,
            eps_before_extension: f64::INFINITY,
            delta_eps: f64::INFINITY,
            extended_basis: true,
            awaiting_payoff: false,
            first_iter: true,
            best: None,
            converged: false,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn error_history(&self) -> &[f64] {
        &self.error_history
    }

    /// Run one transition. Returns the phase the machine moved into.
    pub fn step(&mut self) -> ChaosResult<Phase> {
        match self.phase {
            Phase::GrowBasis => self.grow_basis()?,
            Phase::GrowSamples => self.grow_samples()?,
            Phase::Fit => self.fit()?,
            Phase::Validate => self.validate()?,
            Phase::AcceptOrRollback => self.accept_or_rollback(),
            Phase::Done => {}
        }
        Ok(self.phase)
    }

    /// Run to completion.
    pub fn run(mut self) -> ChaosResult<AdaptiveResult> {
        while self.phase != Phase::Done {
            self.step()?;
        }
        self.into_result()
    }

    fn grow_basis(&mut self) -> ChaosResult<()> {
        let dim = self.params.len();
        loop {
            let cap = self.config.interaction_order.min(self.order);
            if self.io_current <= cap {
                let batch = self
                    .pending
                    .get_mut(self.io_current - 1)
                    .map(std::mem::take)
                    .unwrap_or_default();
                self.io_current += 1;
                if batch.is_empty() {
                    // degenerate under the q-norm truncation, nothing to do
                    continue;
                }
                self.basis = self.basis.extended(batch)?;
                self.extended_basis = true;
                self.eps_before_extension = self.eps;
                self.delta_eps = f64::INFINITY;
                self.phase = Phase::GrowSamples;
                return Ok(());
            }

            self.order += 1;
            if self.order > self.config.order_end {
                self.converged = false;
                self.phase = Phase::Done;
                return Ok(());
            }
            let added = new_indices_for_order(
                dim,
                self.order,
                self.config.order_max_norm,
                self.basis.multi_indices(),
            );
            let cap = self.config.interaction_order.min(self.order);
            let mut pending: Vec<Vec<MultiIndex>> = vec![Vec::new(); cap];
            for idx in added {
                let io = interaction_order(&idx);
                if (1..=cap).contains(&io) {
                    pending[io - 1].push(idx);
                }
            }
            self.pending = pending;
            self.io_current = 1;
        }
    }

    fn grow_samples(&mut self) -> ChaosResult<()> {
        let n_basis = self.basis.n_basis();
        let n_grid = self.grid.n_grid();
        let target = if !self.config.adaptive_sampling {
            (self.config.matrix_ratio * n_basis as f64).ceil() as usize
        } else if self.extended_basis {
            // try before you grow: refit with the samples already paid for
            n_grid
        } else {
            n_grid + ((self.config.delta_samples * n_basis as f64).ceil() as usize).max(1)
        };
        // the regression must stay overdetermined
        let target = target.max(n_basis + 1).max(n_grid);

        if target > n_grid {
            let (grown, _) = self.grid.extended(target)?;
            self.grid = grown;
        }

        let evaluated = self.results.nrows();
        if evaluated < self.grid.n_grid() {
            let coords = self.grid.points().coords();
            let new_results = self
                .evaluator
                .evaluate(coords.slice(s![evaluated.., ..]))?;
            self.results = if evaluated == 0 {
                new_results
            } else {
                concatenate![Axis(0), self.results, new_results]
            };
        }

        self.phase = Phase::Fit;
        Ok(())
    }

    fn fit(&mut self) -> ChaosResult<()> {
        self.design
            .update(&self.basis, self.grid.points(), &self.params)?;
        self.coeffs = self
            .solver
            .fit(self.design.matrix().view(), self.results.view())?;
        self.phase = Phase::Validate;
        Ok(())
    }

    fn validate(&mut self) -> ChaosResult<()> {
        self.eps = match self.config.error_metric {
            ErrorMetric::Loocv => loocv(
                self.design.matrix().view(),
                self.results.view(),
                self.solver.sv_cutoff,
            )?,
            ErrorMetric::Nrmsd => {
                let validation = self.validation.as_ref().ok_or_else(|| {
                    ChaosError::Evaluation("nrmsd metric without a validation set".to_string())
                })?;
                let surrogate = Surrogate::new(
                    self.params.clone(),
                    self.basis.clone(),
                    self.coeffs.clone(),
                )?;
                let predicted = surrogate.predict_norm(validation.grid().coords_norm())?;
                nrmsd(predicted.view(), validation.results())?
            }
        };

        if self.extended_basis || self.first_iter {
            self.eps_ref = self.eps;
        } else if let Some(&prev) = self.error_history.last() {
            self.delta_eps = (self.eps - prev).abs() / self.eps_ref.max(f64::MIN_POSITIVE);
        }
        self.error_history.push(self.eps);

        if self.best.as_ref().map_or(true, |b| self.eps < b.error) {
            self.best = Some(Snapshot {
                basis: self.basis.clone(),
                coeffs: self.coeffs.clone(),
                error: self.eps,
            });
        }
        self.phase = Phase::AcceptOrRollback;
        Ok(())
    }

    fn accept_or_rollback(&mut self) {
        if self.eps <= self.config.eps {
            self.converged = true;
            self.phase = Phase::Done;
            return;
        }
        if !self.config.adaptive_sampling {
            // one fit per basis extension, no sampling loop
            self.first_iter = false;
            self.extended_basis = false;
            self.phase = Phase::GrowBasis;
            return;
        }
        if self.first_iter {
            self.first_iter = false;
            self.extended_basis = false;
            self.phase = Phase::GrowSamples;
            return;
        }
        if self.extended_basis {
            self.extended_basis = false;
            if self.eps < self.eps_before_extension {
                // the extension paid off immediately
                self.phase = Phase::GrowBasis;
            } else {
                self.awaiting_payoff = true;
                self.phase = Phase::GrowSamples;
            }
            return;
        }
        if self.awaiting_payoff && self.eps < self.eps_before_extension {
            self.awaiting_payoff = false;
            self.phase = Phase::GrowBasis;
            return;
        }
        if self.delta_eps <= self.config.delta_eps_target {
            // improvement per sample step has flattened out
            self.awaiting_payoff = false;
            self.phase = Phase::GrowBasis;
            return;
        }
        self.phase = Phase::GrowSamples;
    }

    fn into_result(self) -> ChaosResult<AdaptiveResult> {
        let best = self.best.ok_or_else(|| {
            ChaosError::Solver("refinement finished without a single fit".to_string())
        })?;
        let surrogate = Surrogate::new(self.params, best.basis, best.coeffs)?;
        Ok(AdaptiveResult {
            surrogate,
            grid: self.grid.points().clone(),
            results: self.results,
            design: self.design.matrix().clone(),
            error: best.error,
            error_history: self.error_history,
            converged: self.converged,
        })
    }
}

fn initial_grid_size(config: &AdaptiveConfig, n_basis: usize) -> usize {
    ((config.matrix_ratio * n_basis as f64).ceil() as usize).max(n_basis + 1)
}
