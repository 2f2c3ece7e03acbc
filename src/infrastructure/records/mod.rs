//! Record source adapter - decodes raw billing and flow objects
//!
//! Each reader tolerates stray shards: a file that matches the expected name
//! pattern but fails to parse is logged and skipped, never aborting the scan.
//! Only storage-level failures propagate.

mod cur;
mod flow;

pub use cur::CurReader;
pub use flow::{FlowReader, FlowScan};
