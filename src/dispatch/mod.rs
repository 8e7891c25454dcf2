pub mod policy;

pub use policy::decide;
pub use policy::plan_from_idle;
pub use policy::plan_sweep;
pub use policy::preview_next_stop;
pub use policy::Sweep;
