pub mod api;
pub mod ast;
pub mod error;
pub mod grammar;
pub mod markup;
pub mod parser;
pub mod render;
pub mod resolver;
pub mod utils;
mod serialization;

pub use api::{process, process_with_options, InlineIdl};
pub use parser::parse;
pub use render::render;
