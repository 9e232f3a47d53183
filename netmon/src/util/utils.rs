//! Small helpers shared by the platform observers.

/// Macro to convert Result to Option with error logging.
/// Usage: `try_log!(result, "context message")`
#[macro_export]
macro_rules! try_log {
    ($result:expr, $context:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => {
                log::warn!("{}: {:?}", $context, e);
                return None;
            }
        }
    };
}
