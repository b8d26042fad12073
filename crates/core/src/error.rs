/// Domain-level error shared by the repository and HTTP layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a lookup by numeric id that found nothing.
    pub fn not_found_id(entity: &'static str, id: crate::types::DbId) -> Self {
        Self::NotFound {
            entity,
            key: format!("with id {id}"),
        }
    }

    /// Shorthand for a lookup by a natural key (slug, name) that found nothing.
    pub fn not_found_key(entity: &'static str, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: format!("'{key}'"),
        }
    }
}
