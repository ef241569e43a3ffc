pub mod parser;
pub mod reader;
pub mod types;

pub use parser::{parse_snapshot, SnapshotDoc, Value};
pub use reader::SnapshotReader;
pub use types::PlayerSnapshot;
