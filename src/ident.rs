use smol_str::SmolStr;

use crate::{
    UpdateExpr,
    expr::{AliasedExpr, Expression},
    value::IntoValue,
};

/// A possibly qualified identifier such as `schema.table.column`.
///
/// Each part is quoted on its own when rendered; a `*` part stays bare.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct IdentifierExpr {
    parts: Vec<SmolStr>,
}

impl IdentifierExpr {
    /// Splits `value` on `.` into qualifier parts.
    pub fn parse(value: &str) -> Self {
        Self {
            parts: value.split('.').map(SmolStr::new).collect(),
        }
    }

    /// Builds an identifier from parts taken verbatim, dots included.
    pub fn from_parts<I, T>(parts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SmolStr>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parts(&self) -> &[SmolStr] {
        &self.parts
    }

    /// Last part, the bare column or table name.
    pub fn name(&self) -> &str {
        self.parts.last().map(SmolStr::as_str).unwrap_or_default()
    }

    /// Qualifies `column` with this identifier, `users` becomes `users.column`.
    pub fn col(&self, column: &str) -> Self {
        let mut parts = self.parts.clone();
        parts.push(SmolStr::new(column));
        Self { parts }
    }

    /// `users.*`
    pub fn all(&self) -> Self {
        self.col("*")
    }

    /// Assignment used by `UPDATE ... SET`.
    pub fn set<V: IntoValue>(&self, value: V) -> UpdateExpr {
        UpdateExpr::new(self.clone(), value.into_value())
    }
}

/// Parses a column or table reference, honouring `"name as alias"`.
pub(crate) fn parse_reference(value: &str) -> Expression {
    match split_alias(value) {
        (name, Some(alias)) => Expression::Aliased(AliasedExpr::new(
            Expression::Identifier(IdentifierExpr::parse(name)),
            IdentifierExpr::from_parts([alias]),
        )),
        (name, None) => Expression::Identifier(IdentifierExpr::parse(name)),
    }
}

pub fn split_alias(s: &str) -> (&str, Option<&str>) {
    if let Some(idx) = find_as(s.as_bytes()) {
        let left = &s[..idx];
        let right = &s[idx + 4..];
        (left, Some(right))
    } else {
        (s, None)
    }
}

/// Return the index of " as " in bytes case insensitive with no allocations.
fn find_as(h: &[u8]) -> Option<usize> {
    if h.len() < 4 {
        return None;
    }
    for (i, w) in h.windows(4).enumerate() {
        if w[0] == b' ' && w[3] == b' ' && (w[1] | 0x20) == b'a' && (w[2] | 0x20) == b's' {
            return Some(i);
        }
    }
    None
}
