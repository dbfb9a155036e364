/*!
 * Banker Module
 * Banker's algorithm: safety verification and bounded resource requests
 */

pub mod request;
pub mod safety;
pub mod state;

// Re-export public API
pub use request::{request_resources, Banker, RequestDecision};
pub use safety::{check_safety, SafetyReport, SafetyStep};
pub use state::{BankerResult, BankersState};
