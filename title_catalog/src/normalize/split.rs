//! Splitting of delimited list cells.

/// Split a nullable list cell on `sep`, trimming each piece and dropping empty ones.
///
/// Order of first occurrence is preserved; repeated values are *not* removed here
/// (see [`super::junction`] for per-title de-duplication). An empty `sep` treats
/// the whole cell as one value.
///
/// ```
/// use title_catalog::normalize::split::split_delimited;
///
/// assert_eq!(split_delimited(Some(" France, Poland ,"), ", "), vec!["France", "Poland ,"]);
/// assert_eq!(split_delimited(Some("United States"), ", "), vec!["United States"]);
/// assert!(split_delimited(None, ", ").is_empty());
/// ```
pub fn split_delimited<'a>(raw: Option<&'a str>, sep: &str) -> Vec<&'a str> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if sep.is_empty() {
        let t = raw.trim();
        return if t.is_empty() { Vec::new() } else { vec![t] };
    }
    raw.split(sep)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Join atomic values back into a list cell.
pub fn rejoin<S: AsRef<str>>(parts: &[S], sep: &str) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(sep)
}
