/// Convenience result type used across umbra.
pub type UmbraResult<T> = Result<T, UmbraError>;

/// Top-level error taxonomy used by the light pipeline and its backends.
#[derive(thiserror::Error, Debug)]
pub enum UmbraError {
    /// Missing mesh, material or shader reference. Fatal to the light for this frame.
    #[error("configuration error: {0}")]
    Config(String),

    /// Surface allocation failed (allocator exhausted or size not representable).
    #[error("resource exhausted: {0}")]
    Resource(String),

    /// Invalid user-provided data (scene files, authoring keys).
    #[error("validation error: {0}")]
    Validation(String),

    /// A backend rejected an operation (unknown handle, size mismatch, ...).
    #[error("backend error: {0}")]
    Backend(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UmbraError {
    /// Build a [`UmbraError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`UmbraError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`UmbraError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`UmbraError::Backend`] value.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Build a [`UmbraError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for allocator exhaustion, which callers may want to report differently.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Self::Resource(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
