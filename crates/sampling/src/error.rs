/// Errors from invalid sampling parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplingError {
    #[error("max radius must be finite and positive, got {0}")]
    InvalidRadius(f64),

    #[error("linear step must be finite and positive, got {0}")]
    InvalidStep(f64),

    #[error("spatial grid with {nsteps} steps per side exceeds {max} lattice points")]
    GridTooLarge { nsteps: f64, max: usize },

    #[error("angular resolution must be finite and positive, got {0}")]
    InvalidAngularDelta(f64),
}
