mod properties;

pub use properties::WorkerProperties;
