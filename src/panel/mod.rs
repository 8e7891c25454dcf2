pub mod console;
pub mod console_tests;

pub use console::ConsolePanel;
pub use console::PanelError;
pub use console::PanelEvent;
