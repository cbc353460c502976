//! Debugging utilities

/// Dump a diagnostic message, if anyone is listening.
///
/// Goes out through `tracing` at debug level under the `whammo` target, so it costs next to
/// nothing unless a subscriber has asked for it.
macro_rules! spew (
    () => {};
    ($($arg:tt)*) => ({
        ::tracing::debug!(target: "whammo", $($arg)*);
    });
);
