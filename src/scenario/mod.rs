pub mod script;
pub mod script_tests;

pub use script::format_record;
pub use script::load_scenario;
pub use script::parse_scenario;
pub use script::run_scenario;
pub use script::EventKind;
pub use script::Scenario;
pub use script::ScenarioError;
pub use script::ScriptedEvent;
pub use script::TraceRecord;
