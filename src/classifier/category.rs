use std::ops::Index;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{ser::SerializeMap, Serialize, Serializer};
use tracing::debug;

use super::keywords::KeywordTable;
use crate::model::Category;

/// Co-occurrence hints applied on top of keyword counts.
static BOOSTS: Lazy<Vec<(Regex, Category, f64)>> = Lazy::new(|| {
    [
        ("smell|stink|dirty", Category::Garbage, 0.5),
        ("dark|night", Category::Streetlight, 0.3),
        ("water|pipe|leak", Category::WaterLeak, 0.3),
        ("road|pothole|traffic", Category::RoadDamage, 0.3),
        ("drain|sewage|overflow", Category::Drainage, 0.3),
    ]
    .into_iter()
    .map(|(pattern, cat, boost)| (Regex::new(pattern).expect("invalid boost pattern"), cat, boost))
    .collect()
});

/// One non-negative score per category. Every category is always present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreMap([f64; Category::COUNT]);

impl ScoreMap {
    pub fn get(&self, category: Category) -> f64 {
        self.0[category.index()]
    }

    fn add(&mut self, category: Category, amount: f64) {
        self.0[category.index()] += amount;
    }

    fn set(&mut self, category: Category, value: f64) {
        self.0[category.index()] = value;
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |cat| (cat, self.get(cat)))
    }

    /// Highest score, earliest category on ties.
    fn best(&self) -> (Category, f64) {
        let mut best = (Category::ALL[0], self.get(Category::ALL[0]));
        for (cat, score) in self.iter().skip(1) {
            if score > best.1 {
                best = (cat, score);
            }
        }
        best
    }
}

impl Index<Category> for ScoreMap {
    type Output = f64;

    fn index(&self, category: Category) -> &f64 {
        &self.0[category.index()]
    }
}

impl Serialize for ScoreMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::COUNT))?;
        for (cat, score) in self.iter() {
            map.serialize_entry(cat.as_str(), &score)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub category: Category,
    pub score_map: ScoreMap,
}

impl Classification {
    /// A single-category result, as reported by an external provider.
    pub fn single(category: Category, score: f64) -> Self {
        let mut score_map = ScoreMap::default();
        score_map.set(category, score.max(0.0));
        Self {
            category,
            score_map,
        }
    }

    /// Share of the total score held by the chosen category, clamped to `0..=1`.
    pub fn confidence(&self) -> f64 {
        let total = self.score_map.total();
        let total = if total == 0.0 { 1.0 } else { total };
        (self.score_map.get(self.category) / total).clamp(0.0, 1.0)
    }
}

/// Keyword scorer over a read-only keyword table.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    keywords: &'a KeywordTable,
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(KeywordTable::global())
    }
}

impl<'a> Classifier<'a> {
    pub fn new(keywords: &'a KeywordTable) -> Self {
        Self { keywords }
    }

    pub fn score(&self, text: &str) -> ScoreMap {
        let lower = text.to_lowercase();
        let mut scores = ScoreMap::default();

        // Overlapping keywords of one category (e.g. "water leak" and "leak")
        // both count.
        for (cat, words) in self.keywords.iter() {
            for word in words {
                let hits = lower.matches(word.as_str()).count();
                if hits > 0 {
                    scores.add(cat, hits as f64);
                }
            }
        }

        for (pattern, cat, boost) in BOOSTS.iter() {
            if pattern.is_match(&lower) {
                scores.add(*cat, *boost);
            }
        }

        scores
    }

    pub fn classify(&self, text: &str) -> Classification {
        let mut score_map = self.score(text);
        let (best, best_score) = score_map.best();

        if best_score <= 0.0 {
            score_map.set(Category::Other, 1.0);
            debug!(category = %Category::Other, "no keyword signal, falling back");
            return Classification {
                category: Category::Other,
                score_map,
            };
        }

        debug!(category = %best, score = best_score, "complaint classified");
        Classification {
            category: best,
            score_map,
        }
    }
}

/// Classify with the embedded keyword table.
pub fn classify_complaint(text: &str) -> Classification {
    Classifier::default().classify(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_text_falls_back_to_other() {
        let result = classify_complaint("");
        assert_eq!(result.category, Category::Other);
        for cat in Category::ALL {
            let expected = if cat == Category::Other { 1.0 } else { 0.0 };
            assert_eq!(result.score_map[cat], expected);
        }
        assert_eq!(result.confidence(), 1.0);
    }

    #[test]
    fn unrelated_text_falls_back_to_other() {
        let result = classify_complaint("The neighbours are very noisy");
        assert_eq!(result.category, Category::Other);
        assert_eq!(result.score_map.total(), 1.0);
    }

    #[test]
    fn garbage_with_stink_boost() {
        let result = classify_complaint("Garbage not collected in my street, it stinks");
        assert_eq!(result.category, Category::Garbage);
        assert!(result.score_map[Category::Garbage] >= 1.5);
        assert_close(result.score_map[Category::Garbage], 1.5);
    }

    #[test]
    fn pothole_on_the_road() {
        let result = classify_complaint("pothole on the road near my house");
        assert_eq!(result.category, Category::RoadDamage);
        assert!(result.score_map[Category::RoadDamage] >= 1.3 - EPS);
    }

    #[test]
    fn overlapping_keywords_double_count() {
        let scores = Classifier::default().score("water leak");
        // "water leak" + "leak" + boost
        assert_close(scores[Category::WaterLeak], 2.3);
    }

    #[test]
    fn repeated_keyword_counts_every_occurrence() {
        let scores = Classifier::default().score("trash, trash and more trash");
        assert_close(scores[Category::Garbage], 3.0);
    }

    #[test]
    fn boosts_alone_pick_a_category() {
        let result = classify_complaint("It is very dark at night here");
        assert_eq!(result.category, Category::Streetlight);
        assert_close(result.score_map[Category::Streetlight], 0.3);
        assert_close(result.confidence(), 1.0);
    }

    #[test]
    fn boosts_stack_across_categories() {
        let scores = Classifier::default().score("dirty water overflow");
        assert_close(scores[Category::Garbage], 0.5);
        assert_close(scores[Category::WaterLeak], 0.3);
        assert_close(scores[Category::Drainage], 0.3);
    }

    #[test]
    fn native_scripts_hit_shared_categories() {
        assert_eq!(classify_complaint("यहाँ कचरा पड़ा है").category, Category::Garbage);
        assert_eq!(classify_complaint("சாலை மோசமாக உள்ளது").category, Category::RoadDamage);
        assert_eq!(classify_complaint("नाली बंद है").category, Category::Drainage);
    }

    #[test]
    fn ties_resolve_in_enumeration_order() {
        let result = classify_complaint("broken lamp near the dustbin");
        assert_close(result.score_map[Category::Garbage], 1.0);
        assert_close(result.score_map[Category::Streetlight], 1.0);
        assert_eq!(result.category, Category::Garbage);

        let result = classify_complaint("bulb clogged");
        assert_eq!(result.category, Category::Streetlight);
    }

    #[test]
    fn score_map_always_has_every_category() {
        for text in ["", "garbage", "सड़क", "random words", "leak leak leak"] {
            let result = classify_complaint(text);
            assert_eq!(result.score_map.iter().count(), Category::COUNT);
            assert!(result.score_map.iter().all(|(_, s)| s >= 0.0));
            assert!(result.score_map[result.category] > 0.0);
        }
    }

    #[test]
    fn other_is_never_scored_by_keywords() {
        let scores = Classifier::default().score("garbage drain pothole lamp leak other");
        assert_eq!(scores[Category::Other], 0.0);
    }

    #[test]
    fn classification_is_repeatable() {
        let text = "Sewage overflow near the drain";
        assert_eq!(classify_complaint(text), classify_complaint(text));
    }

    #[test]
    fn injected_table_is_used() {
        let table = KeywordTable::from_lists([(Category::Drainage, vec!["Gutter"])]);
        let result = Classifier::new(&table).classify("The GUTTER is blocked");
        assert_eq!(result.category, Category::Drainage);
        assert_close(result.score_map[Category::Drainage], 1.0);
    }

    #[test]
    fn confidence_is_share_of_total() {
        let result = classify_complaint("garbage near the broken lamp");
        assert_eq!(result.category, Category::Garbage);
        assert_close(result.confidence(), 0.5);
    }

    #[test]
    fn score_map_serializes_with_wire_names() {
        let json = serde_json::to_value(classify_complaint("")).unwrap();
        assert_eq!(json["category"], "other");
        let map = json["scoreMap"].as_object().unwrap();
        assert_eq!(map.len(), 6);
        assert_eq!(map["water_leak"], 0.0);
        assert_eq!(map["other"], 1.0);
    }
}
