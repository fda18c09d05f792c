#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("tick step must be a finite number greater than zero, got {step}")]
    InvalidTickStep { step: f64 },
    #[error("a group of value {value} with tick step {step} needs more than {limit} ticks")]
    TooManyTicks { value: f64, step: f64, limit: usize },
    #[error("radii must be finite and non-negative, got inner={inner} outer={outer}")]
    InvalidRadius { inner: f64, outer: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
