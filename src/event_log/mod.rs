pub mod event_log;

pub use event_log::Event;
pub use event_log::EventLog;
pub use event_log::EventWriter;
