//! Device status report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::models::wire::{non_negative, nullable};
use crate::models::{require_non_negative, require_range, require_text};

/// Reason a report was generated, decoded from the raw trigger code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The agent just connected to its SSH server (negative code)
    SshConnected,
    /// The agent process just started (zero)
    ProcessStart,
    /// Periodic report, every `minutes` minutes (positive code)
    Interval { minutes: u32 },
}

impl From<i32> for Trigger {
    fn from(code: i32) -> Self {
        match code {
            c if c < 0 => Trigger::SshConnected,
            0 => Trigger::ProcessStart,
            c => Trigger::Interval { minutes: c.unsigned_abs() },
        }
    }
}

/// A USB device attached to a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsbDevice {
    #[serde(deserialize_with = "nullable")]
    pub name: String,

    #[serde(deserialize_with = "nullable")]
    pub vendor_id: String,

    #[serde(deserialize_with = "nullable")]
    pub product_id: String,

    #[serde(deserialize_with = "nullable")]
    pub location: String,
}

impl UsbDevice {
    pub fn new(
        name: impl Into<String>,
        vendor_id: impl Into<String>,
        product_id: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            vendor_id: vendor_id.into(),
            product_id: product_id.into(),
            location: location.into(),
        }
    }
}

/// One snapshot of a node, as reported by its agent and enriched by the
/// server (`server_time`, `ip_global`, `host_global`).
///
/// Reports are immutable. Build one with [`Report::builder`] or decode one
/// from server JSON; fields missing from the JSON keep their defaults
/// (empty string, zero, empty list).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "nullable")]
    id: String,

    #[serde(deserialize_with = "nullable")]
    trigger: i32,

    #[serde(deserialize_with = "nullable")]
    success: bool,

    #[serde(deserialize_with = "nullable")]
    runtime: String,

    #[serde(rename = "seq", deserialize_with = "non_negative")]
    sequence: i32,

    #[serde(deserialize_with = "non_negative")]
    device_time: i64,

    #[serde(deserialize_with = "non_negative")]
    boot_time: i64,

    #[serde(rename = "gen_ms", deserialize_with = "non_negative")]
    gen_millis: i64,

    #[serde(deserialize_with = "nullable")]
    agent_version: String,

    #[serde(deserialize_with = "nullable")]
    custom_id: String,

    #[serde(deserialize_with = "nullable")]
    ssh_server_host: String,

    #[serde(deserialize_with = "nullable")]
    ssh_remote_port: u16,

    #[serde(deserialize_with = "non_negative")]
    ssh_connect_time: i64,

    #[serde(deserialize_with = "nullable")]
    adapter: String,

    #[serde(rename = "ip4_local", deserialize_with = "nullable")]
    local_ip_v4: String,

    #[serde(rename = "ip6_local", deserialize_with = "nullable")]
    local_ip_v6: String,

    #[serde(deserialize_with = "nullable")]
    hostname: String,

    #[serde(rename = "rtt_ms", deserialize_with = "non_negative")]
    rtt_millis: i64,

    #[serde(rename = "upload_bps", deserialize_with = "non_negative")]
    upload_kbps: i64,

    #[serde(rename = "download_bps", deserialize_with = "non_negative")]
    download_kbps: i64,

    #[serde(deserialize_with = "non_negative")]
    disk_total_bytes: i64,

    #[serde(deserialize_with = "non_negative")]
    disk_used_bytes: i64,

    #[serde(deserialize_with = "nullable")]
    disk_label: String,

    #[serde(deserialize_with = "nullable")]
    disk_filesystem: String,

    #[serde(deserialize_with = "nullable")]
    disk_mount_point: String,

    #[serde(deserialize_with = "nullable")]
    disk_device: String,

    #[serde(deserialize_with = "nullable")]
    usb_devices: Vec<UsbDevice>,

    #[serde(deserialize_with = "nullable")]
    bd_local_devices: Vec<String>,

    #[serde(deserialize_with = "nullable")]
    kernel_version: String,

    #[serde(deserialize_with = "nullable")]
    errors: Vec<String>,

    #[serde(rename = "ip_global", deserialize_with = "nullable")]
    global_ip: String,

    #[serde(rename = "host_global", deserialize_with = "nullable")]
    global_host: String,

    #[serde(deserialize_with = "non_negative")]
    server_time: i64,
}

/// `None` when `secs` lies outside the range chrono can represent.
fn utc(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

impl Report {
    /// Start building a report
    pub fn builder() -> ReportBuilder {
        ReportBuilder::new()
    }

    /// Node ID, commonly the MAC address of the primary adapter
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw trigger code
    pub fn trigger(&self) -> i32 {
        self.trigger
    }

    pub fn trigger_kind(&self) -> Trigger {
        Trigger::from(self.trigger)
    }

    /// Whether the report was generated without errors
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Runtime of the agent, e.g. `linux arm`
    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    /// Per-process sequence number, starting at 1
    pub fn sequence(&self) -> i32 {
        self.sequence
    }

    /// Device-local report time in epoch seconds
    pub fn device_time(&self) -> i64 {
        self.device_time
    }

    pub fn device_time_utc(&self) -> Option<DateTime<Utc>> {
        utc(self.device_time)
    }

    /// Device boot time in epoch seconds
    pub fn boot_time(&self) -> i64 {
        self.boot_time
    }

    pub fn boot_time_utc(&self) -> Option<DateTime<Utc>> {
        utc(self.boot_time)
    }

    /// Time spent generating the report, in milliseconds
    pub fn gen_millis(&self) -> i64 {
        self.gen_millis
    }

    pub fn agent_version(&self) -> &str {
        &self.agent_version
    }

    /// Human-assigned label, empty when unset
    pub fn custom_id(&self) -> &str {
        &self.custom_id
    }

    pub fn ssh_server_host(&self) -> &str {
        &self.ssh_server_host
    }

    pub fn ssh_remote_port(&self) -> u16 {
        self.ssh_remote_port
    }

    /// SSH connection time in epoch seconds
    pub fn ssh_connect_time(&self) -> i64 {
        self.ssh_connect_time
    }

    pub fn ssh_connect_time_utc(&self) -> Option<DateTime<Utc>> {
        utc(self.ssh_connect_time)
    }

    /// Name of the primary network adapter
    pub fn adapter(&self) -> &str {
        &self.adapter
    }

    pub fn local_ip_v4(&self) -> &str {
        &self.local_ip_v4
    }

    pub fn local_ip_v6(&self) -> &str {
        &self.local_ip_v6
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Round trip time to the server, in milliseconds
    pub fn rtt_millis(&self) -> i64 {
        self.rtt_millis
    }

    pub fn upload_kbps(&self) -> i64 {
        self.upload_kbps
    }

    pub fn download_kbps(&self) -> i64 {
        self.download_kbps
    }

    pub fn disk_total_bytes(&self) -> i64 {
        self.disk_total_bytes
    }

    pub fn disk_used_bytes(&self) -> i64 {
        self.disk_used_bytes
    }

    /// Used disk space as a percentage of the total, 0 when the total is 0
    pub fn disk_utilization_percentage(&self) -> f64 {
        if self.disk_total_bytes == 0 {
            return 0.0;
        }
        self.disk_used_bytes as f64 / self.disk_total_bytes as f64 * 100.0
    }

    pub fn disk_label(&self) -> &str {
        &self.disk_label
    }

    pub fn disk_filesystem(&self) -> &str {
        &self.disk_filesystem
    }

    pub fn disk_mount_point(&self) -> &str {
        &self.disk_mount_point
    }

    pub fn disk_device(&self) -> &str {
        &self.disk_device
    }

    pub fn usb_devices(&self) -> &[UsbDevice] {
        &self.usb_devices
    }

    /// Bluetooth devices discovered near the node
    pub fn bd_local_devices(&self) -> &[String] {
        &self.bd_local_devices
    }

    pub fn kernel_version(&self) -> &str {
        &self.kernel_version
    }

    /// Errors raised while generating the report
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Public IP address as seen by the server
    pub fn global_ip(&self) -> &str {
        &self.global_ip
    }

    /// Reverse lookup of the public IP address
    pub fn global_host(&self) -> &str {
        &self.global_host
    }

    /// Time the server consumed the report, in epoch seconds
    pub fn server_time(&self) -> i64 {
        self.server_time
    }

    pub fn server_time_utc(&self) -> Option<DateTime<Utc>> {
        utc(self.server_time)
    }
}

/// Builds a [`Report`], validating each value as it is set.
///
/// String setters reject empty values, numeric setters reject values out of
/// range. [`ReportBuilder::build`] fails unless an ID was set.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    report: Report,
}

macro_rules! text_setter {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        pub fn $name(mut self, value: impl Into<String>) -> Result<Self, ValidationError> {
            self.report.$name = require_text($field, value)?;
            Ok(self)
        }
    };
}

macro_rules! count_setter {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        pub fn $name(mut self, value: i64) -> Result<Self, ValidationError> {
            self.report.$name = require_non_negative($field, value)?;
            Ok(self)
        }
    };
}

macro_rules! time_setter {
    ($name:ident, $at:ident, $field:literal) => {
        /// Sets the time in epoch seconds
        pub fn $name(mut self, secs: i64) -> Result<Self, ValidationError> {
            self.report.$name = require_non_negative($field, secs)?;
            Ok(self)
        }

        pub fn $at(self, time: DateTime<Utc>) -> Result<Self, ValidationError> {
            self.$name(time.timestamp())
        }
    };
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    text_setter!(
        /// Sets the node ID, commonly a MAC address
        id,
        "id"
    );

    /// Sets the trigger code; any value is accepted
    pub fn trigger(mut self, trigger: i32) -> Self {
        self.report.trigger = trigger;
        self
    }

    text_setter!(runtime, "runtime");

    /// Sets the sequence number, which starts at 1
    pub fn sequence(mut self, sequence: i32) -> Result<Self, ValidationError> {
        require_range("sequence", i64::from(sequence), 1, i64::from(i32::MAX))?;
        self.report.sequence = sequence;
        Ok(self)
    }

    time_setter!(device_time, device_time_at, "device time");
    time_setter!(boot_time, boot_time_at, "boot time");

    count_setter!(
        /// Sets the report generation time in milliseconds
        gen_millis,
        "generation time"
    );

    text_setter!(agent_version, "agent version");
    text_setter!(custom_id, "custom id");
    text_setter!(ssh_server_host, "ssh server host");

    pub fn ssh_remote_port(mut self, port: i32) -> Result<Self, ValidationError> {
        let port = require_range("ssh remote port", i64::from(port), 0, i64::from(u16::MAX))?;
        self.report.ssh_remote_port = port as u16;
        Ok(self)
    }

    time_setter!(ssh_connect_time, ssh_connect_time_at, "ssh connect time");

    text_setter!(adapter, "adapter");
    text_setter!(local_ip_v4, "local ip4");
    text_setter!(local_ip_v6, "local ip6");
    text_setter!(hostname, "hostname");

    count_setter!(rtt_millis, "round trip time");
    count_setter!(upload_kbps, "upload throughput");
    count_setter!(download_kbps, "download throughput");
    count_setter!(disk_total_bytes, "total disk space");
    count_setter!(disk_used_bytes, "used disk space");

    text_setter!(disk_label, "disk label");
    text_setter!(disk_filesystem, "disk filesystem");
    text_setter!(disk_mount_point, "disk mount point");
    text_setter!(disk_device, "disk device");

    pub fn usb_devices(mut self, devices: Vec<UsbDevice>) -> Self {
        self.report.usb_devices = devices;
        self
    }

    pub fn bd_local_devices(mut self, devices: Vec<String>) -> Self {
        self.report.bd_local_devices = devices;
        self
    }

    text_setter!(kernel_version, "kernel version");

    pub fn errors(mut self, errors: Vec<String>) -> Self {
        self.report.errors = errors;
        self
    }

    text_setter!(global_ip, "global ip");
    text_setter!(global_host, "global host");

    time_setter!(server_time, server_time_at, "server time");

    /// Finishes the report. `success` is derived here: true exactly when no
    /// errors were recorded.
    pub fn build(self) -> Result<Report, ValidationError> {
        if self.report.id.is_empty() {
            return Err(ValidationError::NotSet("id"));
        }
        let mut report = self.report;
        report.success = report.errors.is_empty();
        Ok(report)
    }
}
