//! Static type checker for CEL expressions.
//!
//! Build an [`Env`] (usually [`Env::standard`]), declare variables and
//! functions into it, then call [`typecheck`] with a [`Container`] and a
//! parsed expression. The result carries the (possibly rewritten) tree,
//! an id→type map, an id→reference map, and every diagnostic found.
//!
//! ```text
//! let mut env = Env::standard(Arc::new(EmptyProvider), CheckerOptions::default());
//! env.add_ident(IdentDecl::new("x", Type::Int));
//! let result = typecheck(&env, &Container::root(), &expr, &source);
//! assert!(result.ast.is_checked());
//! ```

mod checker;
mod container;
mod decl;
mod env;
mod macros;
mod options;
mod result;
pub mod stdlib;

use std::sync::Once;

use cel_ir::{Expr, SourceInfo};
use rayon::prelude::*;

pub use checker::typecheck;
pub use container::Container;
pub use decl::{DeclError, FunctionDecl, IdentDecl, OverloadDecl};
pub use env::Env;
pub use macros::{find_macro, Macro, RESERVED_MACROS};
pub use options::CheckerOptions;
pub use result::{AstState, CheckResult, CheckedAst, Reference};
pub use stdlib::StdlibFilter;

/// Check independent expressions in parallel.
///
/// Each expression gets its own clone of `env`; clones share declarations
/// and the provider cache, so this is cheap.
#[tracing::instrument(level = "debug", skip_all, fields(count = inputs.len()))]
pub fn check_many(
    env: &Env,
    container: &Container,
    inputs: &[(Expr, SourceInfo)],
) -> Vec<CheckResult> {
    inputs
        .par_iter()
        .map(|(expr, source)| typecheck(env, container, expr, source))
        .collect()
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=cel_check=debug` or
/// `RUST_LOG=cel_check=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
