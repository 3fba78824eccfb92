use thiserror::Error;

/// Errors raised by percentage math.
///
/// Both variants indicate a caller bug: baselines are seeded before they
/// are compared, and reserve values stay far below the decimal range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("percentage baseline is zero")]
    ZeroBaseline,

    #[error("decimal overflow in percentage math")]
    Overflow,
}

/// Errors raised while handling alert batches.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertError {
    #[error("alert `{name}` has an empty alert id")]
    MissingAlertId { name: String },
}
