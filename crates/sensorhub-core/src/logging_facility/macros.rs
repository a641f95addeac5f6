//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use sensorhub_core::log_op_start;
/// log_op_start!("create_sensor");
/// log_op_start!("create_sensor", sensor_name = "s1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = sensorhub_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = sensorhub_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use sensorhub_core::log_op_end;
/// log_op_end!("create_sensor", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = sensorhub_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = sensorhub_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```
/// # use sensorhub_core::{log_op_error, errors::SensorHubError};
/// let err = SensorHubError::SensorNotFound { sensor_ref: "id:1".to_string() };
/// log_op_error!("get_sensor", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let err_ref = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = sensorhub_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?err_ref.kind(),
            err_code = err_ref.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let err_ref = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = sensorhub_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?err_ref.kind(),
            err_code = err_ref.code(),
            $($field)*
        );
    }};
}
