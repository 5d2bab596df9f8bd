pub mod clock;
pub mod memo;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memo::MemoCache;
