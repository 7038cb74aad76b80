use std::fmt::{self, Write};

use crate::{adapter::Adapter, error::Result};

/// Output buffer handed to every [`Adapter`] method.
///
/// It carries the adapter that owns the render so nested values and
/// expressions can be routed back through the literal encoder.
pub struct SqlWriter<'a> {
    pub(crate) buf: &'a mut String,
    pub(crate) adapter: &'a dyn Adapter,
}

impl<'a> SqlWriter<'a> {
    pub fn new(buf: &'a mut String, adapter: &'a dyn Adapter) -> Self {
        Self { buf, adapter }
    }

    pub fn adapter(&self) -> &'a dyn Adapter {
        self.adapter
    }

    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.buf.push_str(s);
        Ok(())
    }

    pub fn write_char(&mut self, c: char) -> Result<()> {
        self.buf.push(c);
        Ok(())
    }

    /// Writes `ident` between `quote`, doubling any embedded quote. `*` is left bare.
    pub fn write_quoted(&mut self, part: &str, quote: char) -> Result<()> {
        if part == "*" {
            return self.write_char('*');
        }

        self.buf.push(quote);
        let mut last = 0;
        for (index, char) in part.char_indices() {
            if char == quote {
                if index != last {
                    self.buf.push_str(&part[last..index]);
                }
                self.buf.push(quote);
                self.buf.push(quote);
                last = index + char.len_utf8();
            }
        }

        // write trailing slice
        if last < part.len() {
            self.buf.push_str(&part[last..]);
        }

        self.buf.push(quote);
        Ok(())
    }

    /// Writes `items` separated by `sep`, rendering each one with `f`.
    pub fn write_separated<T, F>(&mut self, items: &[T], sep: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self, &T) -> Result<()>,
    {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.buf.push_str(sep);
            }
            f(self, item)?;
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        self.buf.as_str()
    }
}

impl Write for SqlWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}
