use itertools::Itertools;
use nucleo_matcher::{
    pattern::{CaseMatching, Normalization, Pattern},
    Matcher, Utf32Str,
};

pub trait Matchable {
    fn match_string(&self) -> &str;
}

/// Keeps the items matching `filter_text`, best match first.
///
/// An empty filter keeps every item in its original order.
pub fn fuzzy_match_completions<T: Matchable>(filter_text: &str, items: Vec<T>) -> Vec<T> {
    if filter_text.is_empty() {
        return items;
    }

    let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);
    let pattern = Pattern::parse(filter_text, CaseMatching::Smart, Normalization::Smart);
    let mut buf = Vec::new();

    items
        .into_iter()
        .filter_map(|item| {
            let score = pattern.score(Utf32Str::new(item.match_string(), &mut buf), &mut matcher)?;
            Some((score, item))
        })
        .sorted_by(|(a, _), (b, _)| Ord::cmp(b, a))
        .map(|(_, item)| item)
        .collect()
}
