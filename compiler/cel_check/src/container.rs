//! Namespace resolution for unqualified names.

use smallvec::SmallVec;

/// A dotted namespace (`google.expr.proto3`) against which names resolve.
///
/// A name resolves to the first hit among its candidates, most specific
/// first: in container `a.b.c` the name `R.s` tries `a.b.c.R.s`,
/// `a.b.R.s`, `a.R.s`, then `R.s`. A leading dot (`.R.s`) forces the
/// root namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Container {
    name: String,
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Container { name: name.into() }
    }

    /// The empty container.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified candidates for `name`, in lookup order.
    pub fn candidates(&self, name: &str) -> SmallVec<[String; 4]> {
        let mut out = SmallVec::new();
        if let Some(absolute) = name.strip_prefix('.') {
            out.push(absolute.to_owned());
            return out;
        }
        let mut prefix = self.name.as_str();
        while !prefix.is_empty() {
            out.push(format!("{prefix}.{name}"));
            prefix = match prefix.rfind('.') {
                Some(dot) => &prefix[..dot],
                None => "",
            };
        }
        out.push(name.to_owned());
        out
    }
}

#[cfg(test)]
mod tests;
