mod concurrency;
mod env_utils;
mod shutdown;

pub use concurrency::Concurrency;
pub use env_utils::{EnvKey, EnvUtils};
pub use shutdown::Shutdown;
