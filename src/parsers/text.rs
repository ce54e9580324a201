/// Collapses every run of whitespace (spaces, tabs, newlines) into a single
/// space and trims both ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Joins the non-empty pieces with single spaces
pub fn join_non_empty<I, S>(pieces: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pieces
        .into_iter()
        .filter(|piece| !piece.as_ref().is_empty())
        .map(|piece| piece.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
