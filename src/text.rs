use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Folds text for comparison: decomposes, drops diacritics, lowercases and trims.
///
/// "Événement " and "evenement" fold to the same string.
pub fn fold(input: &str) -> String {
    input
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Substring search on folded text. An empty needle matches everything.
pub fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    folded_needle.is_empty() || fold(haystack).contains(folded_needle)
}

/// Builds a URL slug from a display name ("Île de Gorée" -> "ile-de-goree").
pub fn slugify(input: &str) -> String {
    let folded = fold(input);
    let mut slug = String::with_capacity(folded.len());
    let mut pending_dash = false;

    for c in folded.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}
