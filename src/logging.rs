//! Logging setup.

/// Installs `env_logger` on stderr with a `warn` default filter.
///
/// `RUST_LOG` overrides the filter. Calling this more than once is harmless.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();
}
