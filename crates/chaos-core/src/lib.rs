// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Core Crate
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Adaptive generalized polynomial chaos surrogates.
//!
//! Grids (tensor, sparse, random), the growable polynomial basis and its
//! design matrix, coefficient solvers, error estimation, and the adaptive
//! refinement loop that ties them together around a black-box model.

pub mod adaptive;
pub mod basis;
pub mod grid;
pub mod model;
pub mod projection;
pub mod random;
pub mod solver;
pub mod sparse;
pub mod static_reg;
pub mod surrogate;
pub mod validate;

pub use adaptive::{AdaptiveRefinement, AdaptiveResult, Phase};
pub use basis::{Basis, DesignMatrix};
pub use grid::{tensor_grid, GridPoints};
pub use model::{Evaluator, FnEvaluator};
pub use random::RandomGrid;
pub use solver::{MoorePenrose, Solver};
pub use sparse::sparse_grid;
pub use static_reg::{static_regression, StaticFit};
pub use surrogate::Surrogate;
pub use validate::{loocv, nrmsd, ValidationSet};
