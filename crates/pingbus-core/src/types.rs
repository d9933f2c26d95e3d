//! Type aliases for commonly used shared types.
//!
//! Components and tests hand the same state to the bus handlers they
//! register and to the code that later inspects it. These aliases name the
//! two shapes that show up in.

use parking_lot::Mutex;
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex`, so locking never returns a poison error.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A thread-safe vector, typically used to record what handlers received.
pub type ThreadSafeVec<T> = Arc<Mutex<Vec<T>>>;

/// Create a new thread-safe value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

/// Create a new empty thread-safe vector.
#[inline]
pub fn thread_safe_vec<T>() -> ThreadSafeVec<T> {
    Arc::new(Mutex::new(Vec::new()))
}
