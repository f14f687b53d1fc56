mod engine;
mod events;
mod session;
mod state;
mod worker;

pub use engine::{
    TimerEngine, TimerEvents, DEFAULT_TICK_INTERVAL, MAX_TICK_INTERVAL, MIN_TICK_INTERVAL,
};
pub use events::{TimerCommand, TimerEvent, TimerSnapshot};
pub use session::TimerSession;
pub use state::{TimerMode, TimerStatus};
