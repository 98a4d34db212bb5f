//! ASCII DXF reading and writing

mod pair;
mod reader;
mod writer;

pub use pair::{DxfPair, format_double};
pub use reader::parse_dxf;
pub use writer::write_dxf;
