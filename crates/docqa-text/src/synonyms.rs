//! Term-expansion table for transliterated and multilingual legal vocabulary.

use once_cell::sync::Lazy;

/// Built-in entries: canonical term followed by every spelling, script and
/// translation that should match it. Order matters for query expansion.
pub const LEGAL_TERMS: &[(&str, &[&str])] = &[
    ("qatal", &["qatal", "قتل", "killing", "murder"]),
    ("amad", &["amad", "amd", "عمد", "intentional"]),
    ("shibh", &["shibh", "شبه", "near", "manslaughter"]),
    ("diat", &["diat", "diyat", "دیت", "blood", "money"]),
];

pub static LEGAL_SYNONYMS: Lazy<SynonymTable> = Lazy::new(|| SynonymTable::from_entries(LEGAL_TERMS.iter().copied()));

#[derive(Debug, Clone)]
struct Entry {
    canonical: String,
    variants: Vec<String>,
}

/// Ordered mapping from canonical terms to their variants.
///
/// Variants are stored lower-cased since queries are matched lower-cased.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: Vec<Entry>,
}

impl SynonymTable {
    pub fn from_entries<'a, I, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: IntoIterator<Item = &'a &'a str>,
    {
        entries
            .into_iter()
            .fold(Self::default(), |table, (canonical, variants)| table.with_entry(canonical, variants.into_iter().copied()))
    }

    /// Append an entry after the existing ones.
    pub fn with_entry<'a>(mut self, canonical: &str, variants: impl IntoIterator<Item = &'a str>) -> Self {
        self.entries.push(Entry {
            canonical: canonical.to_lowercase(),
            variants: variants.into_iter().map(str::to_lowercase).collect(),
        });
        self
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn variants(&self, canonical: &str) -> Option<&[String]> {
        self.entries.iter().find(|e| e.canonical == canonical).map(|e| e.variants.as_slice())
    }

    /// Variant lists of every entry that lists `term` as a variant, in table order.
    pub fn expansions<'s>(&'s self, term: &'s str) -> impl Iterator<Item = &'s [String]> + 's {
        self.entries
            .iter()
            .filter(move |e| e.variants.iter().any(|v| v == term))
            .map(|e| e.variants.as_slice())
    }
}
