use smol_str::SmolStr;

use crate::{
    error::{Error, Result},
    value::{IntoValue, Value},
    writer::SqlWriter,
};

/// A verbatim sql fragment with optional `?` placeholders.
///
/// When arguments are present each placeholder outside of quoted text is
/// replaced by the literal encoding of the next argument. Without
/// arguments the fragment is written as is, so `?` operators survive.
#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub(crate) sql: SmolStr,
    pub(crate) args: Vec<Value>,
}

impl LiteralExpr {
    pub fn new<T>(sql: T) -> Self
    where
        T: Into<SmolStr>,
    {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    pub fn new_static(sql: &'static str) -> Self {
        Self {
            sql: SmolStr::new_static(sql),
            args: Vec::new(),
        }
    }

    pub fn with_args<T, I, V>(sql: T, args: I) -> Self
    where
        T: Into<SmolStr>,
        I: IntoIterator<Item = V>,
        V: IntoValue,
    {
        Self {
            sql: sql.into(),
            args: args.into_iter().map(IntoValue::into_value).collect(),
        }
    }

    pub fn sql(&self) -> &str {
        self.sql.as_str()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Writes the fragment, substituting placeholders with encoded arguments.
    pub fn write_to(&self, writer: &mut SqlWriter<'_>) -> Result<()> {
        let sql = self.sql.as_str();
        if self.args.is_empty() {
            return writer.write_str(sql);
        }

        enum State {
            Normal,
            Ident(char),
            Lit,
        }

        let mut state = State::Normal;
        let mut span_start = 0;
        let mut args = self.args.iter();

        let mut chars = sql.char_indices().peekable();
        while let Some((index, char)) = chars.next() {
            match state {
                State::Normal => match char {
                    '\'' => state = State::Lit,
                    '"' | '`' => state = State::Ident(char),
                    '?' => {
                        // `??`, `?|` and `?&` are operators, not placeholders
                        if matches!(chars.peek(), Some(&(_, '?' | '|' | '&'))) {
                            chars.next();
                            continue;
                        }
                        writer.write_str(&sql[span_start..index])?;
                        let Some(arg) = args.next() else {
                            return Err(Error::encoding(format!(
                                "literal {sql:?} has more placeholders than its {} arguments",
                                self.args.len()
                            )));
                        };
                        writer.literal(arg)?;
                        span_start = index + char.len_utf8();
                    }
                    _ => {}
                },
                // doubled quotes leave and re-enter the quoted state
                State::Lit => {
                    if char == '\'' {
                        state = State::Normal;
                    }
                }
                State::Ident(quote) => {
                    if char == quote {
                        state = State::Normal;
                    }
                }
            }
        }

        if span_start < sql.len() {
            writer.write_str(&sql[span_start..])?;
        }

        if args.next().is_some() {
            return Err(Error::encoding(format!(
                "literal {sql:?} has fewer placeholders than its {} arguments",
                self.args.len()
            )));
        }
        Ok(())
    }
}
