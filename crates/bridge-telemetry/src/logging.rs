//! Structured log helpers.
//!
//! Frame-related events carry the same field names everywhere so log
//! pipelines can join them:
//! - `interface`: ingress interface (`can0`, `vcan1`, ...)
//! - `arbitration_id`: hex arbitration id
//! - `signature`: hex frame signature, when known

/// Log a frame-related event with standard fields.
///
/// ```rust,ignore
/// log_frame_event!(debug, "Frame forwarded", frame.interface, frame.id);
/// log_frame_event!(trace, "Duplicate dropped", frame.interface, frame.id, signature = %sig);
/// ```
#[macro_export]
macro_rules! log_frame_event {
    ($level:ident, $msg:expr, $interface:expr, $arbitration_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            interface = %$interface,
            arbitration_id = %$arbitration_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a detector lifecycle event (creation, reset, shutdown).
#[macro_export]
macro_rules! log_detector_event {
    ($level:ident, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = "frame-dedup",
            $($($field)*,)?
            $msg
        )
    };
}
