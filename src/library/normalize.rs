/// Fold `text` into the form used for search matching.
///
/// Lower-cases, turns `_` and `-` into spaces, collapses whitespace runs into
/// a single space and trims both ends. Applying it twice changes nothing.
pub fn normalize(text: &str) -> String {
    let lowered: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();

    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_case_and_separators() {
        assert_eq!(normalize("My-Song_Title"), normalize("my song title"));
        assert_eq!(normalize("My-Song_Title"), "my song title");
    }

    #[test]
    fn normalize_collapses_and_trims_whitespace() {
        assert_eq!(normalize("  Blue \t\n  Monday  "), "blue monday");
        assert_eq!(normalize("a -- b __ c"), "a b c");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["My-Song_Title", "  ÄRGER  im_Büro ", "x-_-y", "/music/Live - 2019/01_intro.FLAC"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn normalize_lowercases_non_ascii() {
        assert_eq!(normalize("ÉCOLE"), "école");
    }
}
