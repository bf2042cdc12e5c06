pub mod dispatch_queue;
pub mod fsm;
pub mod time_fixer;

pub use dispatch_queue::DispatchQueue;
pub use fsm::ElevatorError;
pub use fsm::ElevatorFSM;
