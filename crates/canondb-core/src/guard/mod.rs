//! Lifecycle guard: the resume gatekeeper.
//!
//! The guard evaluates twelve boolean gates over a loaded
//! [`CanonSnapshot`](crate::canon::CanonSnapshot) and the registry's
//! active set, and returns a complete [`Verdict`]. A failing predicate is
//! never an error; every evaluation runs all twelve gates and reports
//! every failure at once, so an operator sees the full repair list in one
//! pass. Orchestration must halt canon writes whenever
//! `allowed == false`.

mod gates;
mod verdict;

pub use gates::evaluate_resume_gates;
pub use verdict::Verdict;
