pub use hatena_org_core::Error;

/// Classify a transport failure from reqwest.
///
/// Timeouts keep their own kind; anything else becomes `otherwise`, which
/// lets uploads report `Error::Upload` and submissions `Error::Protocol`.
pub fn request_error(err: reqwest::Error, context: &str, otherwise: fn(String) -> Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("{context}: {err}"))
    } else {
        otherwise(format!("{context}: {err}"))
    }
}
