// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Expansion and grid configuration.
//!
//! All fatal checks live in `validate()` and run eagerly, before a single
//! model evaluation is dispatched. Numerical edge cases downstream are
//! tolerated; configuration mistakes are not.

use serde::{Deserialize, Serialize};

use crate::error::{ChaosError, ChaosResult};
use crate::parameter::RandomParameter;

/// 1-D quadrature family used to build deterministic grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridRule {
    Jacobi,
    Hermite,
    ClenshawCurtis,
    Fejer1,
    Fejer2,
    Patterson,
}

impl GridRule {
    /// Nested families without the first level at a single midpoint node
    /// start their level sequence at 1 instead of 0.
    pub fn starts_at_level_one(&self) -> bool {
        matches!(self, GridRule::Fejer2)
    }

    /// Compatibility of the rule with a parameter's distribution kind.
    pub fn check_parameter(&self, param: &RandomParameter) -> ChaosResult<()> {
        match self {
            GridRule::Jacobi if !param.is_bounded() => Err(ChaosError::ConfigError(
                "jacobi rule requires a bounded (beta) parameter".to_string(),
            )),
            GridRule::Hermite if param.is_bounded() => Err(ChaosError::ConfigError(
                "hermite rule requires an unbounded (normal) parameter".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Growth of the 1-D rule order with the sparse-grid level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSequence {
    /// order = level + 1
    Lin,
    /// order = 2^level + 1 (family-specific first-level overrides)
    Exp,
}

/// Coefficient solver selection. Settings are method-specific.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SolverKind {
    /// SVD pseudoinverse with singular-value cutoff.
    MoorePenrose {
        #[serde(default = "default_sv_cutoff")]
        sv_cutoff: f64,
    },
}

fn default_sv_cutoff() -> f64 {
    1e-10
}

impl Default for SolverKind {
    fn default() -> Self {
        SolverKind::MoorePenrose {
            sv_cutoff: default_sv_cutoff(),
        }
    }
}

/// Error estimate used to validate the expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMetric {
    /// Leave-one-out cross validation on the fitted design. No extra
    /// model evaluations.
    Loocv,
    /// Normalized RMS deviation against a held-out validation set.
    Nrmsd,
}

/// Tensor grid parameters: one rule and node count per dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorGridConfig {
    pub rules: Vec<GridRule>,
    pub n_nodes: Vec<usize>,
}

impl TensorGridConfig {
    pub fn validate(&self, params: &[RandomParameter]) -> ChaosResult<()> {
        if self.rules.len() != params.len() || self.n_nodes.len() != params.len() {
            return Err(ChaosError::ConfigError(format!(
                "tensor grid config covers {} dimensions, problem has {}",
                self.rules.len(),
                params.len()
            )));
        }
        for (rule, param) in self.rules.iter().zip(params) {
            rule.check_parameter(param)?;
        }
        if self.n_nodes.iter().any(|&n| n == 0) {
            return Err(ChaosError::ConfigError(
                "tensor grid requires at least one node per dimension".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sparse grid parameters (Smolyak combination technique).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparseGridConfig {
    pub rules: Vec<GridRule>,
    /// Per-dimension level cap.
    pub level: Vec<usize>,
    /// Global combined level maximum.
    pub level_max: usize,
    /// Max number of dimensions jointly active in one level combination.
    pub interaction_order: usize,
    pub order_sequence: OrderSequence,
}

impl SparseGridConfig {
    pub fn validate(&self, params: &[RandomParameter]) -> ChaosResult<()> {
        if self.rules.len() != params.len() || self.level.len() != params.len() {
            return Err(ChaosError::ConfigError(format!(
                "sparse grid config covers {} dimensions, problem has {}",
                self.rules.len(),
                params.len()
            )));
        }
        for (rule, param) in self.rules.iter().zip(params) {
            rule.check_parameter(param)?;
        }
        if self.interaction_order == 0 {
            return Err(ChaosError::ConfigError(
                "interaction_order must be at least 1".to_string(),
            ));
        }
        if self.rules.contains(&GridRule::Patterson)
            && self.order_sequence == OrderSequence::Lin
        {
            return Err(ChaosError::ConfigError(
                "patterson rules exist only for orders 1, 3, 7, 15, 31; \
                 use the exponential order sequence"
                    .to_string(),
            ));
        }
        let any_fejer2 = self.rules.contains(&GridRule::Fejer2);
        if any_fejer2 && self.rules.iter().any(|r| *r != GridRule::Fejer2) {
            return Err(ChaosError::ConfigError(
                "fejer2 shifts the level combinations and cannot be mixed \
                 with other rule families"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Adaptive regression options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    /// Initial global expansion order.
    #[serde(default)]
    pub order_start: usize,
    /// Upper bound for the global expansion order.
    #[serde(default = "default_order_end")]
    pub order_end: usize,
    /// Max number of dimensions jointly active in one basis term.
    /// 0 means "all interactions" (resolved to dim in validate()).
    #[serde(default)]
    pub interaction_order: usize,
    /// q-norm of the hyperbolic truncation; 1.0 is the plain total-degree
    /// simplex, values below 1 thin out interaction terms.
    #[serde(default = "default_order_max_norm")]
    pub order_max_norm: f64,
    /// Oversampling ratio n_grid / n_basis for the initial grid (and the
    /// target when adaptive sampling is disabled).
    #[serde(default = "default_matrix_ratio")]
    pub matrix_ratio: f64,
    /// Target error estimate.
    #[serde(default = "default_eps")]
    pub eps: f64,
    /// Plateau threshold of the relative error improvement per sample step.
    #[serde(default = "default_delta_eps_target")]
    pub delta_eps_target: f64,
    /// Fractional grid growth per sampling step, relative to n_basis.
    #[serde(default = "default_delta_samples")]
    pub delta_samples: f64,
    /// Grow the grid in small steps with try-before-you-grow retries.
    #[serde(default = "default_true")]
    pub adaptive_sampling: bool,
    /// Seed for reproducible random grids. None draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub solver: SolverKind,
    #[serde(default = "default_error_metric")]
    pub error_metric: ErrorMetric,
    /// Validation set size when error_metric = nrmsd and none is supplied.
    #[serde(default = "default_n_validation")]
    pub n_validation: usize,
}

fn default_order_end() -> usize {
    10
}
fn default_order_max_norm() -> f64 {
    1.0
}
fn default_matrix_ratio() -> f64 {
    2.0
}
fn default_eps() -> f64 {
    1e-3
}
fn default_delta_eps_target() -> f64 {
    1e-1
}
fn default_delta_samples() -> f64 {
    5e-2
}
fn default_true() -> bool {
    true
}
fn default_error_metric() -> ErrorMetric {
    ErrorMetric::Loocv
}
fn default_n_validation() -> usize {
    10_000
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        AdaptiveConfig {
            order_start: 0,
            order_end: default_order_end(),
            interaction_order: 0,
            order_max_norm: default_order_max_norm(),
            matrix_ratio: default_matrix_ratio(),
            eps: default_eps(),
            delta_eps_target: default_delta_eps_target(),
            delta_samples: default_delta_samples(),
            adaptive_sampling: true,
            seed: None,
            solver: SolverKind::default(),
            error_metric: default_error_metric(),
            n_validation: default_n_validation(),
        }
    }
}

impl AdaptiveConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> ChaosResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Eager fatal checks. Returns the config with interaction_order
    /// resolved against the problem dimension.
    pub fn validate(mut self, params: &[RandomParameter]) -> ChaosResult<Self> {
        if params.is_empty() {
            return Err(ChaosError::ConfigError(
                "problem has no random parameters".to_string(),
            ));
        }
        for p in params {
            p.validate()?;
        }
        if self.order_start > self.order_end {
            return Err(ChaosError::ConfigError(format!(
                "order_start ({}) exceeds order_end ({})",
                self.order_start, self.order_end
            )));
        }
        if !(self.order_max_norm > 0.0 && self.order_max_norm <= 1.0) {
            return Err(ChaosError::ConfigError(format!(
                "order_max_norm must lie in (0, 1], got {}",
                self.order_max_norm
            )));
        }
        if self.matrix_ratio <= 0.0 {
            return Err(ChaosError::ConfigError(
                "matrix_ratio must be positive".to_string(),
            ));
        }
        if self.eps <= 0.0 {
            return Err(ChaosError::ConfigError("eps must be positive".to_string()));
        }
        if self.interaction_order == 0 {
            self.interaction_order = params.len();
        }
        if self.interaction_order > params.len() {
            return Err(ChaosError::ConfigError(format!(
                "interaction_order ({}) exceeds problem dimension ({})",
                self.interaction_order,
                params.len()
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_dim_params() -> Vec<RandomParameter> {
        vec![
            RandomParameter::uniform(0.0, 1.0),
            RandomParameter::uniform(-1.0, 1.0),
        ]
    }

    #[test]
    fn test_defaults_pass_validation() {
        let cfg = AdaptiveConfig::default().validate(&two_dim_params()).unwrap();
        assert_eq!(cfg.interaction_order, 2);
        assert_eq!(cfg.order_end, 10);
    }

    #[test]
    fn test_order_range_checked() {
        let cfg = AdaptiveConfig {
            order_start: 5,
            order_end: 3,
            ..AdaptiveConfig::default()
        };
        assert!(cfg.validate(&two_dim_params()).is_err());
    }

    #[test]
    fn test_rule_parameter_pairing() {
        let params = two_dim_params();
        let cfg = TensorGridConfig {
            rules: vec![GridRule::Hermite, GridRule::Jacobi],
            n_nodes: vec![3, 3],
        };
        // hermite on a bounded parameter is a fatal config error
        assert!(cfg.validate(&params).is_err());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let cfg = AdaptiveConfig {
            order_end: 7,
            seed: Some(42),
            error_metric: ErrorMetric::Nrmsd,
            ..AdaptiveConfig::default()
        };
        let text = serde_json::to_string(&cfg).unwrap();
        let back: AdaptiveConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.order_end, 7);
        assert_eq!(back.seed, Some(42));
        assert_eq!(back.error_metric, ErrorMetric::Nrmsd);
    }

    #[test]
    fn test_unknown_grid_rule_name_rejected() {
        let parsed: Result<GridRule, _> = serde_json::from_str("\"newton_cotes\"");
        assert!(parsed.is_err());
    }
}
