// Each test crate uses a different subset of the fixtures
#[allow(dead_code)]
mod fixtures;
pub use fixtures::*;
