//! Resolution options.

/// Options for a layout resolution pass.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Absolute tolerance, in figure units, for the static and post-solve checks
    pub tolerance: f64,
    /// Verify containment, stacking, and aspect ratios after solving
    pub check_consistency: bool,
    /// Reject statically conflicting sizes before the solver runs
    pub local_checks: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            check_consistency: true,
            local_checks: true,
        }
    }
}
