use std::collections::HashMap;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;

use crate::model::Category;

macro_rules! lang_file {
    ($file:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/lang/", $file))
    };
}

static KEYWORDS: Lazy<KeywordTable> = Lazy::new(|| {
    KeywordTable::from_json(lang_file!("keywords.json")).expect("invalid keyword table")
});

/// Per-category keyword lists covering every supported script.
///
/// Keywords are stored lower-cased and never empty. `other` carries no keywords.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    lists: [Vec<String>; Category::COUNT],
}

impl KeywordTable {
    /// The table embedded from `lang/keywords.json`, built on first use.
    pub fn global() -> &'static KeywordTable {
        &KEYWORDS
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, Vec<String>> =
            serde_json::from_str(raw).context("keyword table is not a JSON object of lists")?;

        let mut table = KeywordTable::default();
        for (name, words) in parsed {
            let category: Category = name.parse()?;
            table.extend(category, words);
        }
        Ok(table)
    }

    pub fn from_lists<I, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = (Category, Vec<S>)>,
        S: Into<String>,
    {
        let mut table = KeywordTable::default();
        for (category, words) in lists {
            table.extend(category, words.into_iter().map(Into::<String>::into));
        }
        table
    }

    fn extend(&mut self, category: Category, words: impl IntoIterator<Item = String>) {
        let list = &mut self.lists[category.index()];
        list.extend(
            words
                .into_iter()
                .filter(|w| !w.is_empty())
                .map(|w| w.to_lowercase()),
        );
    }

    pub fn keywords(&self, category: Category) -> &[String] {
        &self.lists[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> + '_ {
        Category::ALL
            .into_iter()
            .map(move |cat| (cat, self.keywords(cat)))
    }
}
