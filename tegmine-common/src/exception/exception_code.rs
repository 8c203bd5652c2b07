#![allow(non_snake_case)]

use std::backtrace::Backtrace;
use std::sync::Arc;

use super::exception::{ErrorCode, ErrorCodeBacktrace};

macro_rules! build_exceptions {
    ($($body:ident($code:expr)),*$(,)*) => {
            impl ErrorCode {
                $(
                pub fn $body(display_text: impl Into<String>) -> ErrorCode {
                    let bt = Some(ErrorCodeBacktrace::Origin(Arc::new(Backtrace::capture())));
                    ErrorCode::create(
                        $code,
                        display_text.into(),
                        None,
                        bt,
                    )
                }
                paste::item! {
                    pub fn [< $body:snake _ code >] ()  -> u16{
                        $code
                    }

                    pub fn [< $body  Code >] ()  -> u16{
                        $code
                    }

                    pub fn [< is_ $body:snake >] (&self)  -> bool{
                        self.code() == $code
                    }
                }
                )*
            }
    }
}

// Client errors [1000, 2000].
build_exceptions! {
    IllegalArgument(1002),
    NotFound(1003),
    Conflict(1004),
    TransportError(1010),
    RemoteCallFailed(1011),
    SerializationFailed(1012),
    Timeout(1013),
    ChannelClosed(1014),
    EmptyTaskResult(1015),
    TaskUpdateFailed(1016),
    WorkerPanicked(1017),
    UnknownException(1999),
}
