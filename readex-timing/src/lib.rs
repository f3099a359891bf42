pub mod timeout;
pub mod timer;

pub use timeout::{TimeoutHandle, TimeoutQueue};
pub use timer::{HighPrecisionTimer, Timer};
