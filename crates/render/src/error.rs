#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("contour level {0} is outside (0, 1]")]
    InvalidContour(f64),

    #[error("show scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    #[error("{opacities} opacities given for {contours} contours")]
    OpacityCountMismatch { contours: usize, opacities: usize },

    #[error("failed to write plot: {0}")]
    Io(#[from] std::io::Error),
}
