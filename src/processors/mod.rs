pub mod integrity_checker;
pub mod normalizer;
pub mod pipeline;

pub use integrity_checker::{IntegrityChecker, IntegrityReport, RecordViolation, ViolationType};
pub use normalizer::{normalize, Normalizer};
pub use pipeline::Pipeline;
