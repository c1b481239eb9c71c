use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("buffer shape mismatch for {what}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid simulation parameter `{param}`: {message}")]
    InvalidParam { param: &'static str, message: String },
}
