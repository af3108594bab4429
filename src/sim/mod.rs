/// Session state and the controller that drives it.

pub mod event;
pub mod level;
pub mod session;
pub mod step;
