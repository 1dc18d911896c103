//! Title table used by diagnostic cluster dumps.
use std::collections::HashMap;
use std::io::BufRead;

use conceptalign_core::{ArticleId, TitleLookup};

use crate::errors::TsvProviderError;
use crate::ingest::{for_each_record, parse_article};

/// [`TitleLookup`] over `lang<TAB>id<TAB>title` records.
///
/// Titles may contain tabs; everything after the second tab is the title.
/// Later records for the same article replace earlier ones.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use conceptalign_core::{ArticleId, TitleLookup};
/// use conceptalign_providers_tsv::TsvTitleLookup;
///
/// let titles = TsvTitleLookup::try_from_reader(Cursor::new("en\t1\tTree\n"))?;
/// let en: ArticleId = "en:1".parse().expect("valid article");
/// assert_eq!(titles.title(en).as_deref(), Some("Tree"));
/// # Ok::<(), conceptalign_providers_tsv::TsvProviderError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct TsvTitleLookup {
    titles: HashMap<ArticleId, String>,
}

impl TsvTitleLookup {
    /// Reads title records from `reader`.
    ///
    /// # Errors
    /// Returns [`TsvProviderError`] on I/O failure, on records with fewer than
    /// three fields, and on blank titles.
    pub fn try_from_reader<R: BufRead>(reader: R) -> Result<Self, TsvProviderError> {
        let mut titles = HashMap::new();
        for_each_record(reader, |line, record| {
            let mut fields = record.splitn(3, '\t');
            let (Some(language), Some(local_id), Some(title)) =
                (fields.next(), fields.next(), fields.next())
            else {
                return Err(TsvProviderError::FieldCount {
                    line,
                    expected: 3,
                    found: record.split('\t').count(),
                });
            };
            let article = parse_article(line, language, local_id)?;
            let title = title.trim();
            if title.is_empty() {
                return Err(TsvProviderError::EmptyTitle { line });
            }
            titles.insert(article, title.to_owned());
            Ok(())
        })?;
        Ok(Self { titles })
    }

    /// Returns the number of known titles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Returns whether no titles are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl TitleLookup for TsvTitleLookup {
    fn title(&self, article: ArticleId) -> Option<String> {
        self.titles.get(&article).cloned()
    }
}
