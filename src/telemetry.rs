//! Log output for the server binary.

use tracing_subscriber::EnvFilter;

/// fmt subscriber filtered by `RUST_LOG`, falling back to `student_records=info`.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("student_records=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
