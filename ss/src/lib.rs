//! SessionStore - file-backed slot store for client-side session state
//!
//! Persists small JSON documents in named slots, one file per slot. This is
//! the durable local key-value mechanism behind session state: callers pick
//! slot names, the store handles serialization and fail-soft reads (a slot
//! that cannot be read or parsed is treated as absent, never as fatal).
//!
//! # Architecture
//!
//! ```text
//! .sessionstore/
//! ├── formData.json
//! ├── blueprintResponse.json
//! └── theme.json
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sessionstore::SlotStore;
//!
//! let store = SlotStore::open(".sessionstore")?;
//! store.put("formData", &answers)?;
//! let answers: Option<Answers> = store.get("formData")?;
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::SlotStore;
