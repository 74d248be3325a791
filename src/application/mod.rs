// Application layer: use cases that sit between the CLI and storage.
// The budget math itself lives in `domain` and is fed plain snapshots.

pub mod error;
pub mod live;
pub mod reporting;
mod service;

pub use error::*;
pub use live::*;
pub use reporting::*;
pub use service::*;
