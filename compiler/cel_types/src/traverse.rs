//! Structural traversal over [`Type`].
//!
//! - [`TypeFolder`]: rebuild a type, overriding only the variants of interest
//! - [`TypeVisitor`]: inspect a type without rebuilding it
//!
//! Substitution, specialization and finalization are folders; flag and
//! free-parameter collection are visitors.

use crate::Type;

/// Transform types via structural recursion.
///
/// The default `fold` rebuilds parametric variants from folded parameters
/// and clones leaves. Override `fold_type_param` for substitution.
///
/// ```text
/// struct Finalizer;
///
/// impl TypeFolder for Finalizer {
///     fn fold_type_param(&mut self, _name: &str) -> Type {
///         Type::Dyn
///     }
/// }
/// ```
pub trait TypeFolder {
    fn fold(&mut self, ty: &Type) -> Type {
        match ty {
            Type::TypeParam(name) => self.fold_type_param(name),
            Type::List(elem) => Type::list(self.fold(elem)),
            Type::Map(key, value) => Type::map(self.fold(key), self.fold(value)),
            Type::Optional(inner) => Type::optional(self.fold(inner)),
            Type::TypeOf(inner) => Type::type_of(self.fold(inner)),
            Type::Opaque { name, params } => Type::Opaque {
                name: name.clone(),
                params: params.iter().map(|p| self.fold(p)).collect(),
            },
            _ => ty.clone(),
        }
    }

    /// Fold a type parameter. The default keeps it.
    fn fold_type_param(&mut self, name: &str) -> Type {
        Type::TypeParam(name.to_owned())
    }
}

/// Visit types via structural recursion.
pub trait TypeVisitor {
    fn visit(&mut self, ty: &Type) {
        match ty {
            Type::TypeParam(name) => self.visit_type_param(name),
            _ => self.walk(ty),
        }
    }

    /// Visit every parameter of `ty`.
    fn walk(&mut self, ty: &Type) {
        for param in ty.params() {
            self.visit(param);
        }
    }

    fn visit_type_param(&mut self, _name: &str) {}
}
