//! Utilities for logging messages from the library.

use once_cell::sync::Lazy;

/// Prints a message if logging is enabled for the given [`Session`](crate::session::Session).
#[doc(hidden)]
#[macro_export]
macro_rules! render_log {
    (
        $session:expr,
        $($arg:tt)+
    ) => {
        if $session.log_enabled() {
            println!("{}", format_args!($($arg)+));
        }
    };
}

/// Name of the environment variable that turns on logging.
pub const LOG_ENV_VAR: &str = "SVG_RENDER_LOG";

/// Whether the process was started with `SVG_RENDER_LOG` set.
///
/// The environment is only inspected the first time this is called.
pub fn log_enabled() -> bool {
    static ENABLED: Lazy<bool> = Lazy::new(|| ::std::env::var_os(LOG_ENV_VAR).is_some());

    *ENABLED
}
