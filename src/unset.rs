//! The presence sentinel.

use std::fmt;

/// Marks a field that was not transmitted on the incoming message.
///
/// `Unset` is a zero-sized type distinct from every domain value: a field
/// that was sent with `0`, `""` or `false` holds that value, a field that was
/// not sent at all holds `Unset`. It has length zero and is falsy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Unset;

/// The process-wide sentinel instance.
pub const UNSET: Unset = Unset;

impl Unset {
    pub const fn len(&self) -> usize {
        0
    }

    pub const fn is_empty(&self) -> bool {
        true
    }
}

impl fmt::Display for Unset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unset")
    }
}

impl From<Unset> for bool {
    fn from(_: Unset) -> bool {
        false
    }
}

impl std::ops::Not for Unset {
    type Output = bool;

    fn not(self) -> bool {
        true
    }
}
