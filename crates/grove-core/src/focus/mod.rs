mod countdown;
mod ticker;

pub use countdown::{format_clock, CountdownState, FocusCountdown};
pub use ticker::CountdownTicker;
