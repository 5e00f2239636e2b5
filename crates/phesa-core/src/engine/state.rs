use nalgebra::Point3;

/// One Monte Carlo iteration of the refinement loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonteCarloStep {
    /// Index into the rotatable-bond table.
    pub bond: usize,
    /// Signed torsion kick in radians.
    pub angle: f64,
    /// Tanimoto score after re-optimizing the perturbed conformation.
    pub score: f64,
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    /// Best blended Tanimoto reached.
    pub score: f64,
    /// Tanimoto after the first local optimization, before Monte Carlo.
    pub initial_score: f64,
    /// Minimized force-field energy of the isolated fit molecule.
    pub strain_baseline: f64,
    /// Force-field energy of the returned conformation.
    pub final_energy: f64,
    pub relaxation_cycles: usize,
    pub monte_carlo: Vec<MonteCarloStep>,
    /// Coordinates of the best pose; also written back to the fit molecule.
    pub positions: Vec<Point3<f64>>,
}

impl AlignmentResult {
    pub fn accepted_steps(&self) -> usize {
        self.monte_carlo.iter().filter(|step| step.accepted).count()
    }
}
