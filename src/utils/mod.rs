pub mod logging;
pub mod retry;

pub use logging::init_tracing;
pub use retry::{RetryAction, RetryPolicy};
