//! Symbol environment.
//!
//! A stack of scopes, root first. Identifier lookups search innermost to
//! outermost; function lookups merge the overloads of every scope that
//! declares the name, innermost first, deduplicated by erased signature.
//!
//! # Sharing
//!
//! Scopes sit behind `Arc` and are copied on write, so cloning an `Env`
//! for a check is cheap and clones never see each other's local scopes.
//! Identifiers resolved through the type provider are cached in a table
//! shared by all clones, behind a `parking_lot::RwLock`.

use std::sync::Arc;

use cel_diagnostic::Diagnostic;
use cel_ir::Constant;
use cel_types::{Type, TypeProvider};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::macros::find_macro;
use crate::stdlib::{self, StdlibFilter};
use crate::{CheckerOptions, Container, DeclError, FunctionDecl, IdentDecl, OverloadDecl};

#[derive(Clone, Debug, Default)]
struct Scope {
    idents: FxHashMap<String, IdentDecl>,
    functions: FxHashMap<String, FunctionDecl>,
}

/// Declarations visible to a check.
#[derive(Clone)]
pub struct Env {
    /// Never empty; `scopes[0]` is the root.
    scopes: Vec<Arc<Scope>>,
    provider: Arc<dyn TypeProvider>,
    /// Identifiers resolved through `provider`, shared by all clones.
    provider_cache: Arc<RwLock<FxHashMap<String, IdentDecl>>>,
    options: CheckerOptions,
    declaration_errors: Vec<Diagnostic>,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("scopes", &self.scopes.len())
            .field("options", &self.options)
            .field("declaration_errors", &self.declaration_errors.len())
            .finish_non_exhaustive()
    }
}

impl Env {
    /// An environment with one empty root scope.
    pub fn new(provider: Arc<dyn TypeProvider>, options: CheckerOptions) -> Self {
        Env {
            scopes: vec![Arc::new(Scope::default())],
            provider,
            provider_cache: Arc::new(RwLock::new(FxHashMap::default())),
            options,
            declaration_errors: Vec::new(),
        }
    }

    /// An environment whose root scope holds the standard declarations.
    pub fn standard(provider: Arc<dyn TypeProvider>, options: CheckerOptions) -> Self {
        Self::standard_filtered(provider, options, &StdlibFilter::default())
    }

    /// Like [`Env::standard`], keeping only what `filter` admits.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn standard_filtered(
        provider: Arc<dyn TypeProvider>,
        options: CheckerOptions,
        filter: &StdlibFilter,
    ) -> Self {
        let (idents, functions) = stdlib::declarations(&options, filter);
        let mut env = Self::new(provider, options);
        env.add_idents(idents);
        env.add_functions(functions);
        env
    }

    /// Builder form of [`Env::add_idents`] plus [`Env::add_functions`].
    #[must_use]
    pub fn with_declarations(
        mut self,
        idents: impl IntoIterator<Item = IdentDecl>,
        functions: impl IntoIterator<Item = FunctionDecl>,
    ) -> Self {
        self.add_idents(idents);
        self.add_functions(functions);
        self
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    pub fn provider(&self) -> &dyn TypeProvider {
        &*self.provider
    }

    /// Errors raised while declaring into this environment, in order.
    pub fn declaration_errors(&self) -> &[Diagnostic] {
        &self.declaration_errors
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    // ========================================
    // Scopes
    // ========================================

    pub fn enter_scope(&mut self) {
        self.scopes.push(Arc::new(Scope::default()));
    }

    /// Pop the innermost scope.
    ///
    /// # Panics
    ///
    /// Panics when only the root scope is left.
    pub fn exit_scope(&mut self) {
        assert!(self.scopes.len() > 1, "cannot exit the root scope");
        self.scopes.pop();
    }

    fn top_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        Arc::make_mut(&mut self.scopes[last])
    }

    fn top(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    // ========================================
    // Declaring
    // ========================================

    /// Declare into the current scope. A redeclaration with a different type
    /// is recorded as a declaration error and the first one is kept.
    pub fn add_ident(&mut self, decl: IdentDecl) {
        if let Err(err) = self.try_add_ident(decl) {
            self.record(&err);
        }
    }

    pub fn add_idents(&mut self, decls: impl IntoIterator<Item = IdentDecl>) {
        for decl in decls {
            self.add_ident(decl);
        }
    }

    pub fn try_add_ident(&mut self, decl: IdentDecl) -> Result<(), DeclError> {
        if let Some(existing) = self.top().idents.get(&decl.name) {
            if existing.ty == decl.ty {
                return Ok(());
            }
            return Err(DeclError::OverlappingIdent { name: decl.name });
        }
        self.top_mut().idents.insert(decl.name.clone(), decl);
        Ok(())
    }

    /// Declare a local variable, replacing any of the same name in the
    /// current scope.
    pub(crate) fn declare_local(&mut self, name: &str, ty: Type) {
        self.top_mut()
            .idents
            .insert(name.to_owned(), IdentDecl::new(name, ty));
    }

    /// Declare overloads into the current scope, merging with an existing
    /// function of the same name there. Each rejected overload is recorded
    /// as a declaration error; the others are still added.
    pub fn add_function(&mut self, decl: FunctionDecl) {
        for err in self.try_add_function(decl) {
            self.record(&err);
        }
    }

    pub fn add_functions(&mut self, decls: impl IntoIterator<Item = FunctionDecl>) {
        for decl in decls {
            self.add_function(decl);
        }
    }

    /// Like [`Env::add_function`], returning the rejections instead of
    /// recording them.
    pub fn try_add_function(&mut self, decl: FunctionDecl) -> Vec<DeclError> {
        let FunctionDecl { name, overloads } = decl;
        let mut errors = Vec::new();
        let mut merged = self
            .top()
            .functions
            .get(&name)
            .cloned()
            .unwrap_or_else(|| FunctionDecl::new(name.clone()));
        for overload in overloads {
            match check_overload(&merged, &overload) {
                Ok(true) => merged.overloads.push(overload),
                Ok(false) => {}
                Err(err) => errors.push(err),
            }
        }
        if !merged.overloads.is_empty() {
            self.top_mut().functions.insert(name, merged);
        }
        errors
    }

    fn record(&mut self, err: &DeclError) {
        tracing::debug!(code = %err.code(), "{err}");
        self.declaration_errors.push(err.to_diagnostic());
    }

    // ========================================
    // Lookup
    // ========================================

    /// Resolve `name` in `container`: the first candidate declared in any
    /// scope or known to the provider wins.
    pub fn lookup_ident(&self, container: &Container, name: &str) -> Option<IdentDecl> {
        container
            .candidates(name)
            .iter()
            .find_map(|candidate| self.find_ident(candidate))
    }

    /// Resolve `name` in `container` to the merged overload set of the first
    /// candidate declared in any scope.
    pub fn lookup_function(&self, container: &Container, name: &str) -> Option<FunctionDecl> {
        container
            .candidates(name)
            .iter()
            .find_map(|candidate| self.find_function(candidate))
    }

    /// Exact-name identifier lookup: scopes, then provider cache, then provider.
    pub fn find_ident(&self, name: &str) -> Option<IdentDecl> {
        if let Some(decl) = self.scopes.iter().rev().find_map(|s| s.idents.get(name)) {
            return Some(decl.clone());
        }
        if let Some(decl) = self.provider_cache.read().get(name) {
            return Some(decl.clone());
        }
        let decl = self.resolve_with_provider(name)?;
        tracing::trace!(name, ty = %decl.ty, "cache provider identifier");
        self.provider_cache
            .write()
            .entry(name.to_owned())
            .or_insert_with(|| decl.clone());
        Some(decl)
    }

    fn resolve_with_provider(&self, name: &str) -> Option<IdentDecl> {
        if let Some(descriptor) = self.provider.find_type(name) {
            return Some(IdentDecl::new(name, Type::type_of(descriptor.ty())));
        }
        let value = self.provider.find_enum_value(name)?;
        Some(IdentDecl::new(name, Type::Int).with_value(Constant::Int(value)))
    }

    /// Exact-name function lookup across all scopes.
    pub fn find_function(&self, name: &str) -> Option<FunctionDecl> {
        let mut found: Option<FunctionDecl> = None;
        for scope in self.scopes.iter().rev() {
            let Some(decl) = scope.functions.get(name) else {
                continue;
            };
            match &mut found {
                None => found = Some(decl.clone()),
                Some(merged) => {
                    for overload in &decl.overloads {
                        if !merged
                            .overloads
                            .iter()
                            .any(|o| o.erased_signature_eq(overload))
                        {
                            merged.overloads.push(overload.clone());
                        }
                    }
                }
            }
        }
        found
    }
}

/// Whether `overload` may join `function`: `Ok(true)` to add it,
/// `Ok(false)` when an identical overload is already there.
fn check_overload(function: &FunctionDecl, overload: &OverloadDecl) -> Result<bool, DeclError> {
    if let Some(m) = find_macro(&function.name, overload.arg_count(), overload.is_instance) {
        return Err(DeclError::OverlappingMacro {
            name: m.name.to_owned(),
            arg_count: m.arg_count,
        });
    }
    for existing in &function.overloads {
        if existing.id == overload.id && existing == overload {
            return Ok(false);
        }
        if existing.id == overload.id || existing.signature_overlaps(overload) {
            return Err(DeclError::OverlappingOverload {
                function: function.name.clone(),
                id: overload.id.clone(),
                signature: overload.signature(),
                existing_id: existing.id.clone(),
                existing_signature: existing.signature(),
            });
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests;
