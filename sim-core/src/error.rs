//! Error types for configuration validation and mesh skinning.

/// A tunable that failed validation.
///
/// Raised once when an engine or skinner is constructed, never from inside
/// the growth loop.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a finite, non-negative number (got {value})")]
    NegativeOrNonFinite { name: &'static str, value: f32 },

    #[error("{name} must be greater than zero (got {value})")]
    NotPositive { name: &'static str, value: f32 },

    #[error("max_children must allow at least one child per branch")]
    ZeroChildrenCap,

    #[error("slice_count must be at least 3 (got {0})")]
    TooFewSlices(usize),

    #[error("trunk offset range is inverted ({min} > {max})")]
    InvertedTrunkOffset { min: f32, max: f32 },
}

/// Failure while converting a branch tree into a mesh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkinError {
    #[error("invalid skin configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("mesh needs {0} vertices, more than a u32 index buffer can address")]
    TooManyVertices(usize),
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Skin(#[from] SkinError),
}

/// Checks that `value` is finite and `>= 0`.
pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeOrNonFinite { name, value })
    }
}

/// Checks that `value` is finite and `> 0`.
pub(crate) fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    non_negative(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}
