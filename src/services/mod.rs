//! Domain services over the query client.
//!
//! ARCHITECTURE
//! ============
//! Service functions take `&dyn Backend` and return plain values. Backend
//! failures are logged here and turned into user-facing outcomes or safe
//! defaults, so callers never handle query errors directly.

pub mod members;
pub mod share;
