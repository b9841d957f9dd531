//! Stable node identities via xxh3.

use xxhash_rust::xxh3::xxh3_64;

use crate::semantics::Symbol;

/// Identity of a symbol: xxh3-64 over `package_path \0 name \0 offset`.
///
/// The declaration offset is module-global, so same-named methods on
/// different receivers, or in different files, never coincide.
#[inline]
pub fn identity(symbol: &Symbol) -> u64 {
    let path = symbol.package_path.as_deref().unwrap_or("");
    let offset = symbol.offset.to_string();
    let mut key = Vec::with_capacity(path.len() + symbol.name.len() + offset.len() + 2);
    key.extend_from_slice(path.as_bytes());
    key.push(0);
    key.extend_from_slice(symbol.name.as_bytes());
    key.push(0);
    key.extend_from_slice(offset.as_bytes());
    xxh3_64(&key)
}
