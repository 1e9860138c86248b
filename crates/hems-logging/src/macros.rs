//! ---
//! hems_section: "03-logging"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Structured logging adapters and context helpers."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
//! Logging macros that stamp every event with the fields of a [`crate::LogContext`].

/// Shared expansion behind the level-specific macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __hems_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            $level,
            household = ctx.household.unwrap_or(""),
            device = ctx.device.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            mode = ctx.mode.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an informational log enriched with household context.
#[macro_export]
macro_rules! hems_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__hems_event!(tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__hems_event!(tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with household context.
#[macro_export]
macro_rules! hems_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__hems_event!(tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__hems_event!(tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with household context.
#[macro_export]
macro_rules! hems_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__hems_event!(tracing::Level::WARN, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__hems_event!(tracing::Level::WARN, $crate::LogContext::default(), $($arg)+)
    };
}
