pub mod divider;

pub use divider::Clock;
pub use divider::TickDivider;
