//! Inference context for one check.

use rustc_hash::FxHashMap;

use crate::{is_assignable, is_assignable_all, Substitution, Type, TypeFolder};

/// Fresh type variables and the committed substitution of one check.
///
/// `is_assignable` commits its bindings only on success, so callers can try
/// one overload after another without undoing anything.
#[derive(Clone, Debug, Default)]
pub struct InferenceContext {
    /// Next fresh variable number.
    counter: u32,
    substitution: Substitution,
}

impl InferenceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    /// Create a type parameter no declaration can spell.
    ///
    /// The name is `_` + `prefix` + a counter. A prefix ending in a digit
    /// gets an extra `_` so `key1` + `0` and `key` + `10` stay distinct.
    pub fn new_type_var(&mut self, prefix: &str) -> Type {
        let n = self.counter;
        self.counter += 1;
        let sep = if prefix.ends_with(|c: char| c.is_ascii_digit()) {
            "_"
        } else {
            ""
        };
        Type::TypeParam(format!("_{prefix}{sep}{n}"))
    }

    /// Fresh variables for each of `names`, keyed by the original name.
    pub fn fresh_vars(&mut self, names: &[String]) -> FxHashMap<String, Type> {
        names
            .iter()
            .map(|name| (name.clone(), self.new_type_var(name)))
            .collect()
    }

    /// Alpha-rename the listed parameters of `ty` to fresh variables.
    pub fn new_instance(&mut self, names: &[String], ty: &Type) -> Type {
        if names.is_empty() {
            return ty.clone();
        }
        let fresh = self.fresh_vars(names);
        instantiate(&fresh, ty)
    }

    /// Check `from` against `to`, committing new bindings on success.
    pub fn is_assignable(&mut self, from: &Type, to: &Type) -> bool {
        match is_assignable(&self.substitution, from, to) {
            Some(next) => {
                self.substitution = next;
                true
            }
            None => false,
        }
    }

    /// Pairwise [`InferenceContext::is_assignable`], all or nothing.
    pub fn is_assignable_all(&mut self, from: &[Type], to: &[Type]) -> bool {
        match is_assignable_all(&self.substitution, from, to) {
            Some(next) => {
                self.substitution = next;
                true
            }
            None => false,
        }
    }

    pub fn specialize(&self, ty: &Type) -> Type {
        self.substitution.specialize(ty)
    }

    /// Specialize and turn every unresolved parameter into `dyn`.
    pub fn finalize(&self, ty: &Type) -> Type {
        self.substitution.finalize(ty)
    }
}

/// Replace parameters named in `fresh`; others are kept.
pub fn instantiate(fresh: &FxHashMap<String, Type>, ty: &Type) -> Type {
    struct Renamer<'a>(&'a FxHashMap<String, Type>);

    impl TypeFolder for Renamer<'_> {
        fn fold_type_param(&mut self, name: &str) -> Type {
            self.0
                .get(name)
                .cloned()
                .unwrap_or_else(|| Type::param(name))
        }
    }

    if !ty.has_type_params() {
        return ty.clone();
    }
    Renamer(fresh).fold(ty)
}
