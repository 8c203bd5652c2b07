mod properties;

pub use properties::{ClientProperties, WatchPolicy};
