// Minimal RFC-4180 CSV writing.
//
// The analysis stack reads these files as utf-8-sig, so writers emit a
// UTF-8 BOM: Chinese word labels then survive Excel round-trips intact.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

pub const UTF8_BOM: &str = "\u{feff}";

/// Quote a field when it contains a comma, quote, or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Buffered CSV writer that starts the file with a UTF-8 BOM.
pub struct CsvWriter {
    inner: BufWriter<File>,
}

impl CsvWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut inner = BufWriter::new(file);
        inner.write_all(UTF8_BOM.as_bytes())?;
        Ok(Self { inner })
    }

    pub fn write_row<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let row = fields
            .into_iter()
            .map(|f| escape_field(f.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.inner, "{row}")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(escape_field("animals"), "animals");
        assert_eq!(escape_field("蚂蚁"), "蚂蚁");
    }

    #[test]
    fn json_cells_are_quoted() {
        // Nested JSON cells contain commas and quotes.
        assert_eq!(
            escape_field(r#"[{"word":"cat"}]"#),
            r#""[{""word"":""cat""}]""#
        );
    }

    #[test]
    fn line_breaks_are_quoted() {
        assert_eq!(escape_field("a\nb"), "\"a\nb\"");
    }
}
