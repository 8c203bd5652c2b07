use std::backtrace::Backtrace;
use std::num::ParseIntError;
use std::sync::Arc;

use super::exception::ErrorCodeBacktrace;
use super::ErrorCode;

impl From<anyhow::Error> for ErrorCode {
    fn from(error: anyhow::Error) -> Self {
        let display_text = match error.source() {
            Some(source) => format!("{}, source: {}", error, source),
            None => error.to_string(),
        };
        ErrorCode::create(
            ErrorCode::unknown_exception_code(),
            display_text,
            Some(error.into()),
            Some(ErrorCodeBacktrace::Origin(Arc::new(Backtrace::capture()))),
        )
    }
}

impl From<serde_json::Error> for ErrorCode {
    fn from(error: serde_json::Error) -> Self {
        ErrorCode::SerializationFailed(error.to_string())
    }
}

impl From<ParseIntError> for ErrorCode {
    fn from(error: ParseIntError) -> Self {
        ErrorCode::from_std_error(error).with_code(ErrorCode::illegal_argument_code())
    }
}

impl From<std::io::Error> for ErrorCode {
    fn from(error: std::io::Error) -> Self {
        ErrorCode::from_std_error(error).with_code(ErrorCode::transport_error_code())
    }
}

impl From<std::env::VarError> for ErrorCode {
    fn from(error: std::env::VarError) -> Self {
        ErrorCode::from_std_error(error).with_code(ErrorCode::illegal_argument_code())
    }
}
