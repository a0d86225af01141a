//! Member visibility and the key-shape classifier.
//!
//! Visibility is decided once, when a member is declared, and carried as
//! explicit metadata from then on (see [`crate::definition::Member`]). The
//! classifier itself is a pure function of the key:
//!
//! - `SOME_CONSTANT` (only `A-Z`, `0-9`, `_`) is a constant
//! - `__name` (two leading underscores, then alphanumeric) is private
//! - `_name` (one leading underscore, then alphanumeric) is protected
//! - anything else is public
//!
//! The checks run longest-pattern-first: the constant shape is tested before
//! the underscore shapes, and the private shape before the protected one,
//! since every private key also starts with a single underscore.

/// When a member is observable on an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Always observable.
    Public,
    /// Observable only inside a method of the owning class or a subclass.
    Protected,
    /// Observable only inside a method of the owning class.
    Private,
    /// Always observable; immutable in effect inside methods.
    Constant,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::Constant => "constant",
        }
    }
}

/// Classify a member key by its shape.
pub fn classify(key: &str) -> Visibility {
    let bytes = key.as_bytes();
    if !bytes.is_empty()
        && bytes
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || *b == b'_')
    {
        return Visibility::Constant;
    }
    if bytes.len() >= 3 && bytes[0] == b'_' && bytes[1] == b'_' && bytes[2].is_ascii_alphanumeric()
    {
        return Visibility::Private;
    }
    if bytes.len() >= 2 && bytes[0] == b'_' && bytes[1].is_ascii_alphanumeric() {
        return Visibility::Protected;
    }
    Visibility::Public
}
