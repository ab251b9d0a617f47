//! Serde field helpers for decoding server JSON
//!
//! The server omits unset fields or sends `null` for them (nil slices in
//! particular), and both decode to the field's default. Present values still
//! have to respect the same invariants the builders enforce.

use std::fmt::Display;

use serde::de::{Deserialize, Deserializer, Error};

/// Decodes `null` as the type's default.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes a number that must not be negative; `null` decodes as zero.
pub(crate) fn non_negative<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default + PartialOrd + Display,
{
    let value: T = nullable(deserializer)?;
    if value < T::default() {
        return Err(D::Error::custom(format!("negative value: {}", value)));
    }
    Ok(value)
}
