//! Client-side preference caches.
//!
//! Both caches are synchronous and best-effort over an injected
//! [`KvStore`](crate::storage::KvStore): failures degrade to "nothing
//! cached" and are never surfaced.

pub mod camera;
pub mod colors;

pub use camera::{CameraPosition, CameraStorage};
pub use colors::{ColorPreferences, LastUsedColors};
