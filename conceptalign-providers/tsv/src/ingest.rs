//! Line-level parsing shared by the edge, article and title readers.
use std::io::BufRead;

use conceptalign_core::{ArticleId, Language};

use crate::errors::TsvProviderError;

/// Feeds every record line of `reader` to `on_record` with its 1-based line
/// number.
///
/// Blank lines and lines starting with `#` are skipped; trailing carriage
/// returns are stripped.
pub(crate) fn for_each_record<R, F>(reader: R, mut on_record: F) -> Result<(), TsvProviderError>
where
    R: BufRead,
    F: FnMut(usize, &str) -> Result<(), TsvProviderError>,
{
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let record = line.trim_end_matches('\r');
        let trimmed = record.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        on_record(index + 1, record)?;
    }
    Ok(())
}

/// Splits `record` into exactly `N` tab-separated fields.
pub(crate) fn split_fields<const N: usize>(
    line: usize,
    record: &str,
) -> Result<[&str; N], TsvProviderError> {
    let fields: Vec<&str> = record.split('\t').collect();
    let found = fields.len();
    <[&str; N]>::try_from(fields).map_err(|_| TsvProviderError::FieldCount {
        line,
        expected: N,
        found,
    })
}

/// Parses an article from separate language and local-id fields.
pub(crate) fn parse_article(
    line: usize,
    language: &str,
    local_id: &str,
) -> Result<ArticleId, TsvProviderError> {
    let language = Language::new(language)
        .map_err(|source| TsvProviderError::InvalidLanguage { line, source })?;
    let raw = local_id.trim();
    let local_id = raw
        .parse::<u32>()
        .map_err(|source| TsvProviderError::InvalidLocalId {
            line,
            raw: raw.to_owned(),
            source,
        })?;
    Ok(ArticleId::new(language, local_id))
}
