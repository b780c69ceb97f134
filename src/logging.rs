use logforth::append;
use logforth::filter::EnvFilter;

/// Sends `log` records to stderr, filtered by `RUST_LOG` (default: this
/// crate at `info`, everything else at `warn`).
///
/// Panics if a global logger is already installed.
pub fn enable_logforth() {
    let filter = EnvFilter::from_default_env_or("om_sim=info,warn");
    logforth::builder()
        .dispatch(|d| d.filter(filter).append(append::Stderr::default()))
        .apply();
}
