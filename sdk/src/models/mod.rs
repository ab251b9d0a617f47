//! Domain records returned by the Kaginawa server

pub mod report;
pub mod ssh_server;
pub(crate) mod wire;

pub use report::{Report, ReportBuilder, Trigger, UsbDevice};
pub use ssh_server::{SshServer, SshServerBuilder};

use crate::errors::ValidationError;

/// Accepts a string value only when it is non-empty.
pub(crate) fn require_text(
    field: &'static str,
    value: impl Into<String>,
) -> Result<String, ValidationError> {
    let value = value.into();
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(value)
}

/// Accepts a numeric value only when it lies within `min..=max`.
pub(crate) fn require_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<i64, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, value });
    }
    Ok(value)
}

pub(crate) fn require_non_negative(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    require_range(field, value, 0, i64::MAX)
}
