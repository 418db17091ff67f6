use crate::normalize::normalize;
use shared_types::{Account, Category, Goal, ScheduledTransaction};

/// Anything the bot can look up by the name a user typed
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Goal {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for ScheduledTransaction {
    fn name(&self) -> &str {
        &self.description
    }
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

/// Finds the candidate named by the longest leading run of words in `text`.
///
/// Returns the candidate and the words left over, which callers treat as a
/// free-form description. `"renda extra bônus de maio"` matches a category
/// called `Renda Extra` with `"bônus de maio"` remaining.
pub fn best_prefix_match<'a, T: Named>(
    text: &str,
    candidates: &'a [T],
) -> Option<(&'a T, Option<String>)> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let keys: Vec<(String, &T)> = candidates
        .iter()
        .map(|c| (normalize(c.name()), c))
        .collect();

    for n in (1..=words.len()).rev() {
        let prefix = normalize(&words[..n].join(" "));
        if let Some((_, candidate)) = keys.iter().find(|(key, _)| *key == prefix) {
            let rest = words[n..].join(" ");
            let rest = if rest.is_empty() { None } else { Some(rest) };
            return Some((*candidate, rest));
        }
    }

    None
}

/// Finds the candidate whose whole name matches `name`.
///
/// Exact normalized matches win; otherwise a prefix of exactly one candidate
/// is accepted, so `pagar alug` finds `Aluguel`.
pub fn find_by_name<'a, T: Named>(name: &str, candidates: &'a [T]) -> Option<&'a T> {
    let wanted = normalize(name);
    if wanted.is_empty() {
        return None;
    }

    if let Some(exact) = candidates.iter().find(|c| normalize(c.name()) == wanted) {
        return Some(exact);
    }

    let prefixed: Vec<(String, &T)> = candidates
        .iter()
        .map(|c| (normalize(c.name()), c))
        .filter(|(key, _)| key.starts_with(&wanted))
        .collect();

    // several records may share one name (a recurring bill and its next
    // occurrence); only distinct names make a prefix ambiguous
    match prefixed.split_first() {
        Some(((first_key, first), rest)) if rest.iter().all(|(key, _)| key == first_key) => {
            Some(*first)
        }
        _ => None,
    }
}
