//! Assignability with type-parameter substitution.
//!
//! `is_assignable(sub, from, to)` decides whether a value of type `from`
//! may be used where `to` is expected, binding type parameters on either
//! side as it goes. Bindings go into a copy of `sub` that is returned only
//! on success, so a failed check never leaves partial bindings behind.
//!
//! # Rule order
//!
//! 1. Identical types are assignable.
//! 2. A type-parameter target is checked against its binding (widened to
//!    the most general of the two) or bound to `from` after the occurs
//!    check. A type-parameter source is handled symmetrically.
//! 3. Wildcards (`dyn`, `!error!`, `google.protobuf.Any`) accept anything.
//! 4. `null` goes to and from nullable kinds only.
//! 5. Different kinds are not assignable.
//! 6. `type(_)` values are mutually assignable.
//! 7. `list`, `map`, `optional_type` and opaque types compare names, then
//!    parameters pairwise.
//! 8. Anything else must be equal, so `int`, `uint` and `double` stay
//!    distinct.

use rustc_hash::FxHashMap;

use crate::{Kind, Type, TypeFolder};

/// Bindings from type-parameter name to type.
///
/// Grows monotonically: a binding is only ever replaced by a more general
/// type, and no binding may reach its own parameter through the chain.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Substitution {
    bindings: FxHashMap<String, Type>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(crate) fn insert(&mut self, name: &str, ty: Type) {
        tracing::trace!(param = name, %ty, "bind type parameter");
        self.bindings.insert(name.to_owned(), ty);
    }

    /// Replace every bound type parameter, transitively. Unbound ones stay.
    pub fn specialize(&self, ty: &Type) -> Type {
        self.substitute(ty, false)
    }

    /// Like [`Substitution::specialize`], but unbound parameters become `dyn`.
    pub fn finalize(&self, ty: &Type) -> Type {
        self.substitute(ty, true)
    }

    fn substitute(&self, ty: &Type, unbound_to_dyn: bool) -> Type {
        if ty.flags().is_resolved() {
            return ty.clone();
        }
        Substituter {
            sub: self,
            unbound_to_dyn,
        }
        .fold(ty)
    }
}

struct Substituter<'a> {
    sub: &'a Substitution,
    unbound_to_dyn: bool,
}

impl TypeFolder for Substituter<'_> {
    fn fold_type_param(&mut self, name: &str) -> Type {
        match self.sub.get(name) {
            Some(bound) => self.fold(bound),
            None if self.unbound_to_dyn => Type::Dyn,
            None => Type::param(name),
        }
    }
}

/// Check `from` against `to`, returning the extended substitution on success.
pub fn is_assignable(sub: &Substitution, from: &Type, to: &Type) -> Option<Substitution> {
    let mut next = sub.clone();
    assignable(&mut next, from, to).then_some(next)
}

/// Pairwise [`is_assignable`] over two equally long lists.
pub fn is_assignable_all(sub: &Substitution, from: &[Type], to: &[Type]) -> Option<Substitution> {
    let mut next = sub.clone();
    assignable_list(&mut next, from.iter(), to.iter(), from.len(), to.len()).then_some(next)
}

fn assignable(m: &mut Substitution, from: &Type, to: &Type) -> bool {
    if from == to {
        return true;
    }

    if let Type::TypeParam(name) = to {
        let (valid, has_binding) = valid_substitution(m, from, name);
        if valid {
            return true;
        }
        if has_binding {
            return false;
        }
    }
    if let Type::TypeParam(name) = from {
        return valid_substitution(m, to, name).0;
    }

    if from.is_wildcard() || to.is_wildcard() {
        return true;
    }

    if matches!(from, Type::Null) {
        return to.is_nullable();
    }
    if matches!(to, Type::Null) {
        return from.is_nullable();
    }

    if from.kind() != to.kind() {
        return false;
    }
    match from.kind() {
        Kind::Type => true,
        Kind::List | Kind::Map | Kind::Optional | Kind::Opaque => {
            let (from_params, to_params) = (from.params(), to.params());
            from.type_name() == to.type_name()
                && assignable_list(
                    m,
                    from_params.iter().copied(),
                    to_params.iter().copied(),
                    from_params.len(),
                    to_params.len(),
                )
        }
        _ => false,
    }
}

fn assignable_list<'t>(
    m: &mut Substitution,
    from: impl Iterator<Item = &'t Type>,
    to: impl Iterator<Item = &'t Type>,
    from_len: usize,
    to_len: usize,
) -> bool {
    if from_len != to_len {
        return false;
    }
    for (f, t) in from.zip(to) {
        if !assignable(m, f, t) {
            return false;
        }
    }
    true
}

/// Whether `ty` may stand for the parameter `param`.
///
/// Returns `(valid, has_binding)`. When `param` is already bound, `ty` must
/// be assignable to the binding and the binding is widened to the most
/// general of the two; otherwise `param` is bound to `ty` if the occurs
/// check passes.
fn valid_substitution(m: &mut Substitution, ty: &Type, param: &str) -> (bool, bool) {
    if matches!(ty, Type::TypeParam(name) if name == param) {
        return (true, true);
    }
    if let Some(bound) = m.get(param).cloned() {
        if *ty == bound {
            return (true, true);
        }
        if assignable(m, ty, &bound) {
            let widened = most_general(ty, &bound);
            if not_referenced_in(m, param, &widened) {
                m.insert(param, widened);
            }
            return (true, true);
        }
        return (false, true);
    }
    if not_referenced_in(m, param, ty) {
        m.insert(param, ty.clone());
        return (true, false);
    }
    (false, false)
}

/// Occurs check: `param` appears neither in `within` nor in any binding
/// reachable from it.
fn not_referenced_in(m: &Substitution, param: &str, within: &Type) -> bool {
    if within.flags().is_resolved() {
        return true;
    }
    occurs_free(m, param, within)
}

fn occurs_free(m: &Substitution, param: &str, within: &Type) -> bool {
    match within {
        Type::TypeParam(name) if name == param => false,
        Type::TypeParam(name) => m.get(name).map_or(true, |bound| occurs_free(m, param, bound)),
        _ => within.params().iter().all(|p| occurs_free(m, param, p)),
    }
}

/// The less specific of two types already known to unify.
pub fn most_general(a: &Type, b: &Type) -> Type {
    if is_equal_or_less_specific(a, b) {
        a.clone()
    } else {
        b.clone()
    }
}

/// Whether `a` is at most as specific as `b`: wildcards and type
/// parameters are least specific, parametric types compare parameters.
pub fn is_equal_or_less_specific(a: &Type, b: &Type) -> bool {
    if a.is_wildcard() || a.is_type_param() {
        return true;
    }
    if b.is_wildcard() || b.is_type_param() {
        return false;
    }
    if a.kind() != b.kind() {
        return false;
    }
    match a.kind() {
        Kind::Type => true,
        Kind::List | Kind::Map | Kind::Optional | Kind::Opaque => {
            let (a_params, b_params) = (a.params(), b.params());
            a.type_name() == b.type_name()
                && a_params.len() == b_params.len()
                && a_params
                    .iter()
                    .zip(b_params.iter())
                    .all(|(x, y)| is_equal_or_less_specific(x, y))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests;
