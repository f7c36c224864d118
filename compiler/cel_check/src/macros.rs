//! Reserved macro signatures.
//!
//! The parser expands these calls before the checker sees them, so a
//! function overload with the same name, call style and argument count
//! could never be called. Environments reject such overloads.

/// A macro as seen at a call site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Macro {
    pub name: &'static str,
    /// Arguments inside the parentheses; the receiver is not counted.
    pub arg_count: usize,
    pub receiver_style: bool,
}

const fn global(name: &'static str, arg_count: usize) -> Macro {
    Macro {
        name,
        arg_count,
        receiver_style: false,
    }
}

const fn receiver(name: &'static str, arg_count: usize) -> Macro {
    Macro {
        name,
        arg_count,
        receiver_style: true,
    }
}

pub const RESERVED_MACROS: &[Macro] = &[
    global("has", 1),
    receiver("all", 2),
    receiver("exists", 2),
    receiver("exists_one", 2),
    receiver("map", 2),
    receiver("map", 3),
    receiver("filter", 2),
    receiver("optMap", 2),
    receiver("optFlatMap", 2),
    receiver("all", 3),
    receiver("exists", 3),
    receiver("existsOne", 3),
    receiver("transformList", 3),
    receiver("transformList", 4),
    receiver("transformMap", 3),
    receiver("transformMap", 4),
];

/// The reserved macro matching a call shape, if any.
pub fn find_macro(name: &str, arg_count: usize, receiver_style: bool) -> Option<&'static Macro> {
    RESERVED_MACROS.iter().find(|m| {
        m.name == name && m.arg_count == arg_count && m.receiver_style == receiver_style
    })
}
