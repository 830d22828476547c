//! Internal domain modules for the M-Hike core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod codec;
pub mod delete;
pub mod error;
pub mod filter;
pub mod hike;
pub mod logbook;
pub mod noop;
pub mod observation;
pub mod settings;
pub mod storage;

#[doc(inline)]
pub use delete::DeleteResult;
#[doc(inline)]
pub use error::{HikeLogError, Result};
#[doc(inline)]
pub use filter::{search_by_name, HikeFilter};
#[doc(inline)]
pub use hike::{Difficulty, Hike};
#[doc(inline)]
pub use logbook::Logbook;
#[doc(inline)]
pub use noop::NoopBackend;
#[doc(inline)]
pub use observation::Observation;
#[doc(inline)]
pub use settings::{LogbookSettings, MissingRowPolicy};
#[doc(inline)]
pub use storage::{RunResult, SqliteBackend, StorageBackend, StoredRow, WriteStatement};
