//! Kaginawa SDK
//!
//! Client library for the Kaginawa server: query node reports and histories,
//! execute commands on nodes, and look up SSH server credentials.
//!
//! ```no_run
//! # async fn run() -> Result<(), kaginawa::ClientError> {
//! let client = kaginawa::KaginawaClient::new("https://kaginawa.example.com", "admin-key")?;
//! for report in client.list_alive_nodes(5).await? {
//!     println!("{} {}", report.id(), report.custom_id());
//! }
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod settings;
pub mod utils;

pub use errors::{ClientError, ValidationError};
pub use http::{ClientOptions, KaginawaClient};
pub use models::{Report, ReportBuilder, SshServer, SshServerBuilder, Trigger, UsbDevice};
pub use settings::Settings;
