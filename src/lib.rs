pub mod clock;
pub mod config;
pub mod dispatch;
pub mod elevator;
pub mod panel;
pub mod requests;
pub mod scenario;
pub mod shared;
