//! Service implementations
//!
//! Real implementations of the orchestrator's service traits, plus report output and shutdown requests.

pub mod descriptors;
pub mod report_file;
pub mod shutdown;
pub mod unit_spawner;

pub use descriptors::RandomDescriptorSource;
pub use report_file::write_report_json;
pub use shutdown::ShutdownSignal;
pub use unit_spawner::RealUnitSpawner;
