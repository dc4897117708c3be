pub mod facts;
pub mod network;
pub mod process;
pub mod record;
pub mod system;

pub use facts::{CpuFacts, DiskFacts, MemoryFacts, OsFacts};
pub use network::{Connection, ConnectionKind, NetworkSection, ProbeResult};
pub use process::{ProcessInfo, ProgramsSection, ServiceCounts};
pub use record::{Action, DiagnosticRecord, Metadata, Problem};
pub use system::{CpuInfo, DiskInfo, MemoryInfo, OsInfo, SystemSection};
