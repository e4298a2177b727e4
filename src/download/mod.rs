//! Size-bounded media transfer.
//!
//! This module streams one candidate URL to local storage while enforcing a
//! byte ceiling at every step.
//!
//! # Features
//!
//! - Best-effort HEAD pre-flight rejects declared oversize bodies before any byte is written
//! - Streaming writes in fixed increments, aborting the moment the ceiling would be crossed
//! - Final on-disk size check
//! - Unique `<kind>_<millis>_<seq>.<ext>` file names, safe across concurrent resolutions
//! - Partial files removed on every failure path, including cancellation
//!
//! # Example
//!
//! ```no_run
//! use pinfetch_core::download::{BoundedFetcher, SizeLimit};
//! use pinfetch_core::session::{SessionConfig, SessionManager};
//! use pinfetch_core::MediaKind;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sessions = SessionManager::new(SessionConfig::default());
//! let fetcher = BoundedFetcher::new(std::env::temp_dir().join("pinfetch"));
//! let fetched = fetcher
//!     .fetch(
//!         sessions.acquire()?,
//!         "https://i.pinimg.com/originals/aa/bb/cc.jpg",
//!         MediaKind::Image,
//!         SizeLimit::DEFAULT,
//!     )
//!     .await?;
//! println!("Saved {} bytes to {}", fetched.bytes, fetched.path.display());
//! sessions.release();
//! # Ok(())
//! # }
//! ```

mod error;
mod fetcher;
mod filename;
mod limit;

pub use error::FetchError;
pub use fetcher::{BoundedFetcher, FetchedFile, WRITE_CHUNK_SIZE};
pub use limit::{SizeLimit, human_bytes};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, FetchError>` explicitly in function signatures.
