pub mod parser;
pub mod reader;
pub mod reader_tests;

pub use reader::InputReader;
