/// Splits stimulus text into ordered presentation groups.
///
/// With no delimiter the text splits on Unicode whitespace, one word per
/// group. A non-empty delimiter splits on that literal string instead, which
/// lets a caller group several words into one unit (`"The cat/sat down"` with
/// `"/"`). The delimiter is consumed and empty groups from adjacent
/// delimiters are discarded. Pure and deterministic, so a trial with an
/// explicit side assignment reproduces exactly.
pub fn segment(text: &str, delimiter: Option<&str>) -> Vec<String> {
    match delimiter {
        Some(sep) if !sep.is_empty() => text
            .split(sep)
            .filter(|group| !group.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => text.split_whitespace().map(str::to_owned).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_by_default() {
        assert_eq!(
            segment("The cat sat", None),
            vec!["The".to_owned(), "cat".to_owned(), "sat".to_owned()]
        );
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        assert_eq!(segment("  a \t b\n\nc ", None), vec!["a", "b", "c"]);
    }

    #[test]
    fn non_ascii_words_are_ordinary_text() {
        assert_eq!(
            segment("él compró café", None),
            vec!["él", "compró", "café"]
        );
    }

    #[test]
    fn custom_delimiter_keeps_inner_spaces() {
        assert_eq!(
            segment("The cat/sat on/the mat", Some("/")),
            vec!["The cat", "sat on", "the mat"]
        );
    }

    #[test]
    fn adjacent_delimiters_produce_no_empty_groups() {
        assert_eq!(segment("a//b//", Some("/")), vec!["a", "b"]);
    }

    #[test]
    fn empty_delimiter_falls_back_to_whitespace() {
        assert_eq!(segment("a b", Some("")), vec!["a", "b"]);
    }

    #[test]
    fn rejoining_with_the_delimiter_round_trips() {
        let groups = segment("The cat sat on the mat", None);
        assert_eq!(segment(&groups.join(" "), None), groups);

        let grouped = segment("one two/three/four five", Some("/"));
        assert_eq!(segment(&grouped.join("/"), Some("/")), grouped);
    }
}
