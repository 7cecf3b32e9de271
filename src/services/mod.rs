//! Service layer for business logic
//!
//! Shared by the HTTP handlers and the CLI. All three services read the same
//! ledger through one `UrlLedger`.

mod ledger;
mod metrics;
mod redirect;

pub use ledger::*;
pub use metrics::*;
pub use redirect::*;
