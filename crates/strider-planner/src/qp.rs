//! Dense quadratic-program wrapper.
//!
//! Wraps Clarabel (pure Rust interior-point solver) behind a tagged result
//! so that infeasibility and numerical failure are ordinary, testable
//! branches instead of panics or exceptions. The solve is synchronous and
//! iteration-bounded; it signals infeasibility rather than looping.
//!
//! Problem form: minimize `1/2 z' P z + q' z` subject to `A_eq z = b_eq`
//! and `A_ineq z <= b_ineq`.

use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus,
    SupportedConeT::{NonnegativeConeT, ZeroConeT},
};
use nalgebra::{DMatrix, DVector};

/// Outcome of a QP solve.
#[derive(Clone, Debug)]
pub enum QpOutcome {
    /// Optimal (or almost-optimal) primal solution.
    Solved(DVector<f64>),
    /// The constraint set is empty (or the problem is unbounded).
    Infeasible,
    /// The solver failed to make progress or produced non-finite values.
    NumericalError,
}

impl QpOutcome {
    pub fn solution(&self) -> Option<&DVector<f64>> {
        match self {
            Self::Solved(x) => Some(x),
            _ => None,
        }
    }

    pub const fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible)
    }
}

/// Solve a dense QP.
///
/// `p` is the full (symmetric) cost Hessian; only its upper triangle is
/// handed to the solver. Equality rows come first in the stacked constraint
/// matrix, matching Clarabel's cone ordering.
pub fn solve_dense_qp(
    p: &DMatrix<f64>,
    q: &DVector<f64>,
    a_eq: &DMatrix<f64>,
    b_eq: &DVector<f64>,
    a_ineq: &DMatrix<f64>,
    b_ineq: &DVector<f64>,
    max_iterations: u32,
) -> QpOutcome {
    let n = p.ncols();
    debug_assert_eq!(q.len(), n);
    debug_assert_eq!(a_eq.nrows(), b_eq.len());
    debug_assert_eq!(a_ineq.nrows(), b_ineq.len());

    let n_eq = a_eq.nrows();
    let n_ineq = a_ineq.nrows();

    let mut a_all = DMatrix::zeros(n_eq + n_ineq, n);
    a_all.rows_mut(0, n_eq).copy_from(a_eq);
    a_all.rows_mut(n_eq, n_ineq).copy_from(a_ineq);

    let mut b_all = Vec::with_capacity(n_eq + n_ineq);
    b_all.extend(b_eq.iter().copied());
    b_all.extend(b_ineq.iter().copied());

    let mut cones = Vec::new();
    if n_eq > 0 {
        cones.push(ZeroConeT(n_eq));
    }
    if n_ineq > 0 {
        cones.push(NonnegativeConeT(n_ineq));
    }

    let p_csc = dmatrix_to_csc_upper_tri(p);
    let a_csc = dmatrix_to_csc(&a_all);
    let q_slice: Vec<f64> = q.iter().copied().collect();

    let Ok(settings) = DefaultSettingsBuilder::default()
        .max_iter(max_iterations)
        .verbose(false)
        .tol_gap_abs(1e-8)
        .tol_gap_rel(1e-8)
        .tol_feas(1e-8)
        .build()
    else {
        return QpOutcome::NumericalError;
    };

    let mut solver = DefaultSolver::new(&p_csc, &q_slice, &a_csc, &b_all, &cones, settings);
    solver.solve();
    let solution = &solver.solution;
    match solution.status {
        SolverStatus::Solved | SolverStatus::AlmostSolved => {
            if solution.x.iter().take(n).all(|v| v.is_finite()) {
                QpOutcome::Solved(DVector::from_iterator(n, solution.x.iter().take(n).copied()))
            } else {
                QpOutcome::NumericalError
            }
        }
        SolverStatus::PrimalInfeasible
        | SolverStatus::DualInfeasible
        | SolverStatus::AlmostPrimalInfeasible
        | SolverStatus::AlmostDualInfeasible => QpOutcome::Infeasible,
        _ => QpOutcome::NumericalError,
    }
}

/// Convert a nalgebra `DMatrix<f64>` to a Clarabel `CscMatrix<f64>` (full matrix).
fn dmatrix_to_csc(m: &DMatrix<f64>) -> CscMatrix<f64> {
    let (nrows, ncols) = m.shape();
    let mut colptr = vec![0usize; ncols + 1];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();

    for j in 0..ncols {
        for i in 0..nrows {
            let v = m[(i, j)];
            if v.abs() > 1e-15 {
                rowval.push(i);
                nzval.push(v);
            }
        }
        colptr[j + 1] = rowval.len();
    }

    CscMatrix::new(nrows, ncols, colptr, rowval, nzval)
}

/// Convert a symmetric nalgebra `DMatrix<f64>` to upper-triangular `CscMatrix<f64>`.
fn dmatrix_to_csc_upper_tri(m: &DMatrix<f64>) -> CscMatrix<f64> {
    let (nrows, ncols) = m.shape();
    let mut colptr = vec![0usize; ncols + 1];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();

    for j in 0..ncols {
        for i in 0..=j.min(nrows.saturating_sub(1)) {
            let v = m[(i, j)];
            if v.abs() > 1e-15 {
                rowval.push(i);
                nzval.push(v);
            }
        }
        colptr[j + 1] = rowval.len();
    }

    CscMatrix::new(nrows, ncols, colptr, rowval, nzval)
}
