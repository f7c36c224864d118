//! Checker configuration.

/// Feature switches for environment construction and checking.
///
/// ```text
/// let options = CheckerOptions::default()
///     .with_homogeneous_aggregate_literals(true)
///     .with_optional_syntax(false);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CheckerOptions {
    /// List and map literal elements must agree; a mismatch is reported
    /// instead of widening to `dyn`.
    pub homogeneous_aggregate_literals: bool,
    /// Report calls where two matching overloads disagree on the result type.
    pub compile_time_overload_resolution: bool,
    /// Rewrite identifiers, selects and namespaced calls to their fully
    /// qualified names, and try `a.b.f()` as the function `a.b.f`.
    pub namespaced_declarations: bool,
    /// Declare mixed `int`/`uint`/`double` ordering overloads.
    pub heterogeneous_numeric_comparisons: bool,
    /// Declare the optional-value library.
    pub optional_syntax: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            homogeneous_aggregate_literals: false,
            compile_time_overload_resolution: false,
            namespaced_declarations: true,
            heterogeneous_numeric_comparisons: true,
            optional_syntax: true,
        }
    }
}

impl CheckerOptions {
    #[must_use]
    pub fn with_homogeneous_aggregate_literals(mut self, enabled: bool) -> Self {
        self.homogeneous_aggregate_literals = enabled;
        self
    }

    #[must_use]
    pub fn with_compile_time_overload_resolution(mut self, enabled: bool) -> Self {
        self.compile_time_overload_resolution = enabled;
        self
    }

    #[must_use]
    pub fn with_namespaced_declarations(mut self, enabled: bool) -> Self {
        self.namespaced_declarations = enabled;
        self
    }

    #[must_use]
    pub fn with_heterogeneous_numeric_comparisons(mut self, enabled: bool) -> Self {
        self.heterogeneous_numeric_comparisons = enabled;
        self
    }

    #[must_use]
    pub fn with_optional_syntax(mut self, enabled: bool) -> Self {
        self.optional_syntax = enabled;
        self
    }
}
