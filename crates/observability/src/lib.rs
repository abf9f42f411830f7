//! Tracing/logging setup shared by the server and gateway binaries.

/// Subscriber configuration (filters, output format).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide tracing for the named service.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init(service: &'static str) {
    let format = self::tracing::format_from_env();
    self::tracing::init(format);
    ::tracing::info!(service, ?format, "tracing initialized");
}
