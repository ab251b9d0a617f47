//! Utility functions

use serde::{Deserialize, Serialize};

/// Version information for the SDK
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Default `User-Agent` sent with every request
pub fn user_agent() -> String {
    let version = version_info();
    format!("{}-rs/{}", version.name, version.version)
}
