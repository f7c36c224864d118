//! Structural type flags.
//!
//! Computed by one visitor pass and used to skip work: a type with no
//! `HAS_TYPE_PARAM` needs no substitution, finalization or occurs check.

use bitflags::bitflags;

bitflags! {
    /// Properties of a type and everything it contains.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u8 {
        /// Contains a type parameter.
        const HAS_TYPE_PARAM = 1 << 0;
        /// Contains `dyn`.
        const HAS_DYN = 1 << 1;
        /// Contains the error placeholder.
        const HAS_ERROR = 1 << 2;
    }
}

impl TypeFlags {
    /// No type parameter anywhere: the type is final as written.
    #[inline]
    pub fn is_resolved(self) -> bool {
        !self.contains(Self::HAS_TYPE_PARAM)
    }
}
