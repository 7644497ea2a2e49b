//! Default values shared across the crate

/// Strings accepted as `true` when converting to `bool` (exact match)
pub const TRUE_WORDS: &[&str] = &["true", "1"];

/// Strings accepted as `false` when converting to `bool` (exact match)
pub const FALSE_WORDS: &[&str] = &["false", "0"];

/// Whether property and function lookups fall through to base classes
pub const DEFAULT_INHERIT_MEMBERS: bool = true;

/// Whether class, enum and member names are validated on declaration
pub const DEFAULT_VALIDATE_NAMES: bool = true;
