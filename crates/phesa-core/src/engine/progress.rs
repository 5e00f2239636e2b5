/// Stages of a single alignment run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Preparation,
    Relaxation,
    LocalOptimization,
    MonteCarlo,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Preparation => "Preparation",
            Self::Relaxation => "Relaxation",
            Self::LocalOptimization => "Local Optimization",
            Self::MonteCarlo => "Monte Carlo",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart(Phase),
    PhaseFinish(Phase),

    /// One restrained minimization finished with the given strain over `e0`.
    RelaxationCycle { cycle: usize, strain: f64 },
    /// One Monte Carlo trial was scored; `step` counts from 1.
    TrialScored {
        step: usize,
        total: usize,
        score: f64,
        accepted: bool,
    },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards alignment events to an optional observer.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(observer) = &self.callback {
            observer(event);
        }
    }
}
