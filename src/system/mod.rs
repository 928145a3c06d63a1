pub mod bus;
pub mod scheduler;
