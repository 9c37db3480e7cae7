mod parser;

pub use parser::{LmfError, load_resource, parse_resource};
