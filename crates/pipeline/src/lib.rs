//! # Pipeline
//!
//! Ordered, guarded provisioning steps.
//!
//! ## Core Concepts
//!
//! - **Step**: an optional presence guard, an install branch, and the labels
//!   reported when that branch ran
//! - **FailurePolicy**: whether a failing step stops the run or is logged and
//!   passed over
//! - **Plan**: steps in the exact order they will run
//! - **Executor**: walks the plan once, front to back, honoring `force`
//!
//! ## Example
//!
//! ```ignore
//! use pipeline::{execute, NoProgress, Plan, RunOptions};
//!
//! let mut plan = Plan::new();
//! plan.push(Box::new(AptPackage { name: "wget".into() }));
//! plan.push(Box::new(AptPackage { name: "curl".into() }));
//!
//! match execute(&plan, &host, RunOptions { force: false }, &mut NoProgress) {
//!     Ok(summary) => println!("installed: {:?}", summary.installed),
//!     Err(halt) => eprintln!("{halt}"),
//! }
//! ```
//!
//! Execution is single-threaded; no two steps ever run at once.

pub mod error;
pub mod executor;
pub mod plan;
pub mod progress;
pub mod step;
pub mod types;

pub use error::Halt;
pub use executor::execute;
pub use plan::Plan;
pub use progress::{NoProgress, Progress};
pub use step::{BoxedStep, Step};
pub use types::{FailurePolicy, RunOptions, RunSummary};
