pub mod retry;
pub mod telemetry;
pub mod time;
