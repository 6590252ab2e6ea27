#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// One message per missing input, in the order they were checked.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}
