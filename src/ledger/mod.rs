pub mod storage;
pub mod types;

pub use storage::{get_ledger_path, load_ledger, save_ledger};
pub use types::{AssessmentLedger, AssessmentRecord};
