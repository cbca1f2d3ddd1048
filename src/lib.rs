//! Board sharing, project membership and local preference caches for the
//! whiteboard front-end.
//!
//! ARCHITECTURE
//! ============
//! Remote reads and writes go through the [`query::Backend`] trait so the
//! share flow and membership helpers never depend on a concrete database.
//! Local preferences go through the [`storage::KvStore`] trait, which stands
//! in for browser `localStorage`.

pub mod config;
pub mod db;
pub mod prefs;
pub mod query;
pub mod services;
pub mod storage;
pub mod util;
