//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::BTreeMap;

/// SmallVec for declaration name lists (`var a, b = ...`, usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;

/// SmallVec for receiver/embedding chains (usually <2).
pub type SmallVec2<T> = SmallVec<[T; 2]>;
