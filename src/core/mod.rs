pub mod face;
pub mod runner;
pub mod scheduler;
