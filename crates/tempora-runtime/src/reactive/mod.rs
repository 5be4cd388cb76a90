#![forbid(unsafe_code)]

//! Reactive base store.
//!
//! [`Store<T>`] is the get/commit/subscribe container the temporal history
//! middleware decorates. It is single-threaded (`Rc`-based) and notifies
//! subscribers synchronously before `set` returns.

pub mod store;

pub use store::{Store, Subscription};
