//! Column header text

/// Human-readable header for a field name
///
/// Splits camel case, acronyms and `_`/`-` separators into words and
/// capitalises each word: `CardSetId` → `Card Set Id`,
/// `HTTPStatus` → `HTTP Status`, `created_at` → `Created At`.
#[must_use]
pub fn header_text(field: &str) -> String {
    let mut words: Vec<String> = Vec::new();

    for token in field.split(['_', '-', ' ']).filter(|t| !t.is_empty()) {
        let chars: Vec<char> = token.chars().collect();
        let mut current = String::new();
        for (i, &c) in chars.iter().enumerate() {
            let boundary = i > 0 && c.is_uppercase() && {
                let prev = chars[i - 1];
                let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower)
            };
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
