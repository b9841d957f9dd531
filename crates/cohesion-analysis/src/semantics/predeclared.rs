//! The Go universe block.

const PREDECLARED: &[&str] = &[
    // types
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32",
    "float64", "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr",
    // constants and zero value
    "true", "false", "iota", "nil",
    // functions
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make",
    "max", "min", "new", "panic", "print", "println", "real", "recover",
];

/// Whether `name` is declared in the universe block.
pub fn is_predeclared(name: &str) -> bool {
    PREDECLARED.contains(&name)
}
