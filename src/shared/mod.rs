pub mod floor;
pub mod macros;
pub mod structs;

pub use floor::Floor;
pub use floor::FloorError;
pub use structs::Direction;
pub use structs::Passenger;
pub use structs::Request;
