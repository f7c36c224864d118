//! Standard declaration set.
//!
//! The built-in identifiers, operators and functions, kept as plain data
//! tables of type strings. Tables are parsed once per process; each
//! environment then copies what its options and [`StdlibFilter`] admit.
//!
//! # Tables
//!
//! - `CORE`: always declared
//! - `HETEROGENEOUS_ORDERING`: mixed `int`/`uint`/`double` ordering, when
//!   [`CheckerOptions::heterogeneous_numeric_comparisons`] is set
//! - `OPTIONAL`: the optional-value library, when
//!   [`CheckerOptions::optional_syntax`] is set
//!
//! Entries with the same function name are merged in table order, so the
//! overloads of `_<_` list the homogeneous signatures first.

use std::fmt;
use std::sync::{Arc, OnceLock};

use cel_types::Type;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{CheckerOptions, FunctionDecl, IdentDecl, OverloadDecl};

// ========================================
// Table shapes
// ========================================

/// One overload, with types in textual syntax.
struct Sig {
    id: &'static str,
    instance: bool,
    params: &'static [&'static str],
    result: &'static str,
}

/// `id(params) -> result`.
const fn g(id: &'static str, params: &'static [&'static str], result: &'static str) -> Sig {
    Sig {
        id,
        instance: false,
        params,
        result,
    }
}

/// `params[0].id(params[1..]) -> result`.
const fn m(id: &'static str, params: &'static [&'static str], result: &'static str) -> Sig {
    Sig {
        id,
        instance: true,
        params,
        result,
    }
}

struct FnEntry {
    name: &'static str,
    overloads: &'static [Sig],
}

const fn func(name: &'static str, overloads: &'static [Sig]) -> FnEntry {
    FnEntry { name, overloads }
}

const TS: &str = "google.protobuf.Timestamp";
const DUR: &str = "google.protobuf.Duration";

// ========================================
// Identifiers
// ========================================

const CORE_IDENTS: &[(&str, &str)] = &[
    ("int", "type(int)"),
    ("uint", "type(uint)"),
    ("double", "type(double)"),
    ("bool", "type(bool)"),
    ("string", "type(string)"),
    ("bytes", "type(bytes)"),
    ("list", "type(list(dyn))"),
    ("map", "type(map(dyn, dyn))"),
    ("null_type", "type(null_type)"),
    ("type", "type(type)"),
    ("dyn", "type(dyn)"),
    (DUR, "type(google.protobuf.Duration)"),
    (TS, "type(google.protobuf.Timestamp)"),
];

const OPTIONAL_IDENTS: &[(&str, &str)] = &[("optional_type", "type(optional_type(dyn))")];

// ========================================
// Functions
// ========================================

const CORE: &[FnEntry] = &[
    // Logic
    func("_?_:_", &[g("conditional", &["bool", "A", "A"], "A")]),
    func("_&&_", &[g("logical_and", &["bool", "bool"], "bool")]),
    func("_||_", &[g("logical_or", &["bool", "bool"], "bool")]),
    func("!_", &[g("logical_not", &["bool"], "bool")]),
    func(
        "@not_strictly_false",
        &[g("not_strictly_false", &["bool"], "bool")],
    ),
    func(
        "-_",
        &[
            g("negate_int64", &["int"], "int"),
            g("negate_double", &["double"], "double"),
        ],
    ),
    // Equality
    func("_==_", &[g("equals", &["A", "A"], "bool")]),
    func("_!=_", &[g("not_equals", &["A", "A"], "bool")]),
    // Arithmetic
    func(
        "_+_",
        &[
            g("add_int64", &["int", "int"], "int"),
            g("add_uint64", &["uint", "uint"], "uint"),
            g("add_double", &["double", "double"], "double"),
            g("add_string", &["string", "string"], "string"),
            g("add_bytes", &["bytes", "bytes"], "bytes"),
            g("add_list", &["list(A)", "list(A)"], "list(A)"),
            g("add_timestamp_duration", &[TS, DUR], TS),
            g("add_duration_timestamp", &[DUR, TS], TS),
            g("add_duration_duration", &[DUR, DUR], DUR),
        ],
    ),
    func(
        "_-_",
        &[
            g("subtract_int64", &["int", "int"], "int"),
            g("subtract_uint64", &["uint", "uint"], "uint"),
            g("subtract_double", &["double", "double"], "double"),
            g("subtract_timestamp_timestamp", &[TS, TS], DUR),
            g("subtract_timestamp_duration", &[TS, DUR], TS),
            g("subtract_duration_duration", &[DUR, DUR], DUR),
        ],
    ),
    func(
        "_*_",
        &[
            g("multiply_int64", &["int", "int"], "int"),
            g("multiply_uint64", &["uint", "uint"], "uint"),
            g("multiply_double", &["double", "double"], "double"),
        ],
    ),
    func(
        "_/_",
        &[
            g("divide_int64", &["int", "int"], "int"),
            g("divide_uint64", &["uint", "uint"], "uint"),
            g("divide_double", &["double", "double"], "double"),
        ],
    ),
    func(
        "_%_",
        &[
            g("modulo_int64", &["int", "int"], "int"),
            g("modulo_uint64", &["uint", "uint"], "uint"),
        ],
    ),
    // Ordering
    func(
        "_<_",
        &[
            g("less_bool", &["bool", "bool"], "bool"),
            g("less_int64", &["int", "int"], "bool"),
            g("less_uint64", &["uint", "uint"], "bool"),
            g("less_double", &["double", "double"], "bool"),
            g("less_string", &["string", "string"], "bool"),
            g("less_bytes", &["bytes", "bytes"], "bool"),
            g("less_timestamp", &[TS, TS], "bool"),
            g("less_duration", &[DUR, DUR], "bool"),
        ],
    ),
    func(
        "_<=_",
        &[
            g("less_equals_bool", &["bool", "bool"], "bool"),
            g("less_equals_int64", &["int", "int"], "bool"),
            g("less_equals_uint64", &["uint", "uint"], "bool"),
            g("less_equals_double", &["double", "double"], "bool"),
            g("less_equals_string", &["string", "string"], "bool"),
            g("less_equals_bytes", &["bytes", "bytes"], "bool"),
            g("less_equals_timestamp", &[TS, TS], "bool"),
            g("less_equals_duration", &[DUR, DUR], "bool"),
        ],
    ),
    func(
        "_>_",
        &[
            g("greater_bool", &["bool", "bool"], "bool"),
            g("greater_int64", &["int", "int"], "bool"),
            g("greater_uint64", &["uint", "uint"], "bool"),
            g("greater_double", &["double", "double"], "bool"),
            g("greater_string", &["string", "string"], "bool"),
            g("greater_bytes", &["bytes", "bytes"], "bool"),
            g("greater_timestamp", &[TS, TS], "bool"),
            g("greater_duration", &[DUR, DUR], "bool"),
        ],
    ),
    func(
        "_>=_",
        &[
            g("greater_equals_bool", &["bool", "bool"], "bool"),
            g("greater_equals_int64", &["int", "int"], "bool"),
            g("greater_equals_uint64", &["uint", "uint"], "bool"),
            g("greater_equals_double", &["double", "double"], "bool"),
            g("greater_equals_string", &["string", "string"], "bool"),
            g("greater_equals_bytes", &["bytes", "bytes"], "bool"),
            g("greater_equals_timestamp", &[TS, TS], "bool"),
            g("greater_equals_duration", &[DUR, DUR], "bool"),
        ],
    ),
    // Indexing and membership
    func(
        "_[_]",
        &[
            g("index_list", &["list(A)", "int"], "A"),
            g("index_map", &["map(K, V)", "K"], "V"),
        ],
    ),
    func(
        "@in",
        &[
            g("in_list", &["A", "list(A)"], "bool"),
            g("in_map", &["A", "map(A, B)"], "bool"),
        ],
    ),
    func(
        "size",
        &[
            g("size_string", &["string"], "int"),
            g("size_bytes", &["bytes"], "int"),
            g("size_list", &["list(A)"], "int"),
            g("size_map", &["map(A, B)"], "int"),
            m("string_size", &["string"], "int"),
            m("bytes_size", &["bytes"], "int"),
            m("list_size", &["list(A)"], "int"),
            m("map_size", &["map(A, B)"], "int"),
        ],
    ),
    // Conversions
    func(
        "int",
        &[
            g("int64_to_int64", &["int"], "int"),
            g("uint64_to_int64", &["uint"], "int"),
            g("double_to_int64", &["double"], "int"),
            g("string_to_int64", &["string"], "int"),
            g("timestamp_to_int64", &[TS], "int"),
        ],
    ),
    func(
        "uint",
        &[
            g("uint64_to_uint64", &["uint"], "uint"),
            g("int64_to_uint64", &["int"], "uint"),
            g("double_to_uint64", &["double"], "uint"),
            g("string_to_uint64", &["string"], "uint"),
        ],
    ),
    func(
        "double",
        &[
            g("double_to_double", &["double"], "double"),
            g("int64_to_double", &["int"], "double"),
            g("uint64_to_double", &["uint"], "double"),
            g("string_to_double", &["string"], "double"),
        ],
    ),
    func(
        "string",
        &[
            g("string_to_string", &["string"], "string"),
            g("int64_to_string", &["int"], "string"),
            g("uint64_to_string", &["uint"], "string"),
            g("double_to_string", &["double"], "string"),
            g("bytes_to_string", &["bytes"], "string"),
            g("bool_to_string", &["bool"], "string"),
            g("timestamp_to_string", &[TS], "string"),
            g("duration_to_string", &[DUR], "string"),
        ],
    ),
    func(
        "bytes",
        &[
            g("bytes_to_bytes", &["bytes"], "bytes"),
            g("string_to_bytes", &["string"], "bytes"),
        ],
    ),
    func(
        "bool",
        &[
            g("bool_to_bool", &["bool"], "bool"),
            g("string_to_bool", &["string"], "bool"),
        ],
    ),
    func(
        "duration",
        &[
            g("duration_to_duration", &[DUR], DUR),
            g("string_to_duration", &["string"], DUR),
        ],
    ),
    func(
        "timestamp",
        &[
            g("timestamp_to_timestamp", &[TS], TS),
            g("string_to_timestamp", &["string"], TS),
            g("int64_to_timestamp", &["int"], TS),
        ],
    ),
    func("type", &[g("type", &["A"], "type(A)")]),
    func("dyn", &[g("to_dyn", &["A"], "dyn")]),
    // Strings
    func(
        "contains",
        &[m("contains_string", &["string", "string"], "bool")],
    ),
    func(
        "startsWith",
        &[m("starts_with_string", &["string", "string"], "bool")],
    ),
    func(
        "endsWith",
        &[m("ends_with_string", &["string", "string"], "bool")],
    ),
    func(
        "matches",
        &[
            g("matches", &["string", "string"], "bool"),
            m("matches_string", &["string", "string"], "bool"),
        ],
    ),
    // Timestamps and durations
    func(
        "getFullYear",
        &[
            m("timestamp_to_year", &[TS], "int"),
            m("timestamp_to_year_with_tz", &[TS, "string"], "int"),
        ],
    ),
    func(
        "getMonth",
        &[
            m("timestamp_to_month", &[TS], "int"),
            m("timestamp_to_month_with_tz", &[TS, "string"], "int"),
        ],
    ),
    func(
        "getDayOfYear",
        &[
            m("timestamp_to_day_of_year", &[TS], "int"),
            m("timestamp_to_day_of_year_with_tz", &[TS, "string"], "int"),
        ],
    ),
    func(
        "getDayOfMonth",
        &[
            m("timestamp_to_day_of_month", &[TS], "int"),
            m("timestamp_to_day_of_month_with_tz", &[TS, "string"], "int"),
        ],
    ),
    func(
        "getDate",
        &[
            m("timestamp_to_day_of_month_1_based", &[TS], "int"),
            m(
                "timestamp_to_day_of_month_1_based_with_tz",
                &[TS, "string"],
                "int",
            ),
        ],
    ),
    func(
        "getDayOfWeek",
        &[
            m("timestamp_to_day_of_week", &[TS], "int"),
            m("timestamp_to_day_of_week_with_tz", &[TS, "string"], "int"),
        ],
    ),
    func(
        "getHours",
        &[
            m("timestamp_to_hours", &[TS], "int"),
            m("timestamp_to_hours_with_tz", &[TS, "string"], "int"),
            m("duration_to_hours", &[DUR], "int"),
        ],
    ),
    func(
        "getMinutes",
        &[
            m("timestamp_to_minutes", &[TS], "int"),
            m("timestamp_to_minutes_with_tz", &[TS, "string"], "int"),
            m("duration_to_minutes", &[DUR], "int"),
        ],
    ),
    func(
        "getSeconds",
        &[
            m("timestamp_to_seconds", &[TS], "int"),
            m("timestamp_to_seconds_with_tz", &[TS, "string"], "int"),
            m("duration_to_seconds", &[DUR], "int"),
        ],
    ),
    func(
        "getMilliseconds",
        &[
            m("timestamp_to_milliseconds", &[TS], "int"),
            m("timestamp_to_milliseconds_with_tz", &[TS, "string"], "int"),
            m("duration_to_milliseconds", &[DUR], "int"),
        ],
    ),
];

const HETEROGENEOUS_ORDERING: &[FnEntry] = &[
    func(
        "_<_",
        &[
            g("less_int64_uint64", &["int", "uint"], "bool"),
            g("less_int64_double", &["int", "double"], "bool"),
            g("less_uint64_int64", &["uint", "int"], "bool"),
            g("less_uint64_double", &["uint", "double"], "bool"),
            g("less_double_int64", &["double", "int"], "bool"),
            g("less_double_uint64", &["double", "uint"], "bool"),
        ],
    ),
    func(
        "_<=_",
        &[
            g("less_equals_int64_uint64", &["int", "uint"], "bool"),
            g("less_equals_int64_double", &["int", "double"], "bool"),
            g("less_equals_uint64_int64", &["uint", "int"], "bool"),
            g("less_equals_uint64_double", &["uint", "double"], "bool"),
            g("less_equals_double_int64", &["double", "int"], "bool"),
            g("less_equals_double_uint64", &["double", "uint"], "bool"),
        ],
    ),
    func(
        "_>_",
        &[
            g("greater_int64_uint64", &["int", "uint"], "bool"),
            g("greater_int64_double", &["int", "double"], "bool"),
            g("greater_uint64_int64", &["uint", "int"], "bool"),
            g("greater_uint64_double", &["uint", "double"], "bool"),
            g("greater_double_int64", &["double", "int"], "bool"),
            g("greater_double_uint64", &["double", "uint"], "bool"),
        ],
    ),
    func(
        "_>=_",
        &[
            g("greater_equals_int64_uint64", &["int", "uint"], "bool"),
            g("greater_equals_int64_double", &["int", "double"], "bool"),
            g("greater_equals_uint64_int64", &["uint", "int"], "bool"),
            g("greater_equals_uint64_double", &["uint", "double"], "bool"),
            g("greater_equals_double_int64", &["double", "int"], "bool"),
            g("greater_equals_double_uint64", &["double", "uint"], "bool"),
        ],
    ),
];

const OPTIONAL: &[FnEntry] = &[
    func(
        "optional.of",
        &[g("optional_of", &["V"], "optional_type(V)")],
    ),
    func(
        "optional.ofNonZeroValue",
        &[g("optional_ofNonZeroValue", &["V"], "optional_type(V)")],
    ),
    func(
        "optional.none",
        &[g("optional_none", &[], "optional_type(V)")],
    ),
    func(
        "value",
        &[m("optional_value", &["optional_type(V)"], "V")],
    ),
    func(
        "hasValue",
        &[m("optional_hasValue", &["optional_type(V)"], "bool")],
    ),
    func(
        "or",
        &[m(
            "optional_or_optional",
            &["optional_type(V)", "optional_type(V)"],
            "optional_type(V)",
        )],
    ),
    func(
        "orValue",
        &[m("optional_orValue_value", &["optional_type(V)", "V"], "V")],
    ),
    func(
        "_?._",
        &[g("select_optional_field", &["dyn", "string"], "optional_type(V)")],
    ),
    func(
        "_[?_]",
        &[
            g(
                "list_optindex_optional_int",
                &["list(V)", "int"],
                "optional_type(V)",
            ),
            g(
                "optional_list_optindex_optional_int",
                &["optional_type(list(V))", "int"],
                "optional_type(V)",
            ),
            g(
                "map_optindex_optional_value",
                &["map(K, V)", "K"],
                "optional_type(V)",
            ),
            g(
                "optional_map_optindex_optional_value",
                &["optional_type(map(K, V))", "K"],
                "optional_type(V)",
            ),
        ],
    ),
    func(
        "_[_]",
        &[
            g(
                "optional_list_index_int",
                &["optional_type(list(V))", "int"],
                "optional_type(V)",
            ),
            g(
                "optional_map_index_value",
                &["optional_type(map(K, V))", "K"],
                "optional_type(V)",
            ),
        ],
    ),
];

// ========================================
// Parsed tables
// ========================================

struct Parsed {
    core_idents: Vec<IdentDecl>,
    optional_idents: Vec<IdentDecl>,
    core: Vec<FunctionDecl>,
    heterogeneous_ordering: Vec<FunctionDecl>,
    optional: Vec<FunctionDecl>,
}

static PARSED: OnceLock<Parsed> = OnceLock::new();

fn parsed() -> &'static Parsed {
    PARSED.get_or_init(|| Parsed {
        core_idents: parse_idents(CORE_IDENTS),
        optional_idents: parse_idents(OPTIONAL_IDENTS),
        core: parse_functions(CORE),
        heterogeneous_ordering: parse_functions(HETEROGENEOUS_ORDERING),
        optional: parse_functions(OPTIONAL),
    })
}

fn parse_idents(table: &[(&str, &str)]) -> Vec<IdentDecl> {
    table
        .iter()
        .filter_map(|(name, ty)| match ty.parse::<Type>() {
            Ok(ty) => Some(IdentDecl::new(*name, ty)),
            Err(err) => {
                tracing::error!(name, %err, "invalid standard identifier type");
                None
            }
        })
        .collect()
}

fn parse_functions(table: &[FnEntry]) -> Vec<FunctionDecl> {
    table
        .iter()
        .map(|entry| {
            let mut decl = FunctionDecl::new(entry.name);
            for sig in entry.overloads {
                match parse_sig(sig) {
                    Ok(overload) => decl.overloads.push(overload),
                    Err(err) => {
                        tracing::error!(function = entry.name, overload = sig.id, %err,
                            "invalid standard signature");
                    }
                }
            }
            decl
        })
        .collect()
}

fn parse_sig(sig: &Sig) -> Result<OverloadDecl, cel_types::ParseTypeError> {
    let params = sig
        .params
        .iter()
        .map(|p| p.parse::<Type>())
        .collect::<Result<Vec<_>, _>>()?;
    let result = sig.result.parse::<Type>()?;
    Ok(if sig.instance {
        OverloadDecl::instance(sig.id, params, result)
    } else {
        OverloadDecl::global(sig.id, params, result)
    })
}

// ========================================
// Filtering
// ========================================

type OverloadPredicate = Arc<dyn Fn(&str, &OverloadDecl) -> bool + Send + Sync>;

/// Selects which standard declarations an environment receives.
///
/// Name filters apply to identifiers and functions alike. A function left
/// without overloads is dropped.
///
/// ```text
/// let filter = StdlibFilter::default()
///     .exclude_names(["matches"])
///     .exclude_overloads(["add_bytes"]);
/// ```
#[derive(Clone, Default)]
pub struct StdlibFilter {
    include_names: Option<FxHashSet<String>>,
    exclude_names: FxHashSet<String>,
    exclude_overloads: FxHashSet<String>,
    predicate: Option<OverloadPredicate>,
}

impl fmt::Debug for StdlibFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdlibFilter")
            .field("include_names", &self.include_names)
            .field("exclude_names", &self.exclude_names)
            .field("exclude_overloads", &self.exclude_overloads)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

impl StdlibFilter {
    /// Keep only these names. Repeated calls widen the set.
    #[must_use]
    pub fn include_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_names
            .get_or_insert_with(FxHashSet::default)
            .extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn exclude_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_names.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn exclude_overloads<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_overloads.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Keep only overloads for which `predicate(function_name, overload)`
    /// holds.
    #[must_use]
    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&str, &OverloadDecl) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn admits_name(&self, name: &str) -> bool {
        if self.exclude_names.contains(name) {
            return false;
        }
        self.include_names
            .as_ref()
            .map_or(true, |include| include.contains(name))
    }

    pub fn admits_overload(&self, function: &str, overload: &OverloadDecl) -> bool {
        if self.exclude_overloads.contains(&overload.id) {
            return false;
        }
        self.predicate
            .as_ref()
            .map_or(true, |predicate| predicate(function, overload))
    }
}

/// The standard identifiers and functions enabled by `options` and admitted
/// by `filter`. Functions come back merged by name, in table order.
pub fn declarations(
    options: &CheckerOptions,
    filter: &StdlibFilter,
) -> (Vec<IdentDecl>, Vec<FunctionDecl>) {
    let tables = parsed();

    let mut ident_tables = vec![&tables.core_idents];
    let mut function_tables = vec![&tables.core];
    if options.heterogeneous_numeric_comparisons {
        function_tables.push(&tables.heterogeneous_ordering);
    }
    if options.optional_syntax {
        ident_tables.push(&tables.optional_idents);
        function_tables.push(&tables.optional);
    }

    let idents: Vec<IdentDecl> = ident_tables
        .into_iter()
        .flatten()
        .filter(|decl| filter.admits_name(&decl.name))
        .cloned()
        .collect();

    let mut functions: Vec<FunctionDecl> = Vec::new();
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    for decl in function_tables.into_iter().flatten() {
        if !filter.admits_name(&decl.name) {
            continue;
        }
        let admitted = decl
            .overloads
            .iter()
            .filter(|o| filter.admits_overload(&decl.name, o))
            .cloned();
        match index.get(decl.name.as_str()) {
            Some(&i) => functions[i].overloads.extend(admitted),
            None => {
                index.insert(&decl.name, functions.len());
                functions.push(FunctionDecl {
                    name: decl.name.clone(),
                    overloads: admitted.collect(),
                });
            }
        }
    }
    functions.retain(|f| !f.overloads.is_empty());

    tracing::debug!(
        idents = idents.len(),
        functions = functions.len(),
        "standard declarations"
    );
    (idents, functions)
}
