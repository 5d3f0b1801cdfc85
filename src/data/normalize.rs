//! Ship-name normalization used as the lookup key for both stored display
//! names and user queries. The normalized form is only ever compared, never shown.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const RETROFIT: &str = "retrofit";
const RETROFIT_SUFFIX: &str = " (retrofit)";

/// Sequel ships are stored with roman-numeral suffixes.
const ROMAN_SUFFIXES: &[(&str, &str)] = &[(" 2", " ii"), (" 3", " iii"), (" 4", " iv"), (" 5", " v")];

/// ASCII words a user may type in place of a marker symbol used in display names.
/// Targets are folded like names, so MICRO SIGN and GREEK SMALL LETTER MU agree.
pub const DEFAULT_SUBSTITUTIONS: &[(&str, &str)] = &[("muse", "\u{3bc}")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameNormalizer {
    substitutions: Vec<(String, String)>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::with_substitutions(
            DEFAULT_SUBSTITUTIONS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string())),
        )
    }
}

impl NameNormalizer {
    /// Build a normalizer with an explicit substitution list. Source tokens and
    /// targets go through the same character folding as names.
    pub fn with_substitutions<I>(substitutions: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let substitutions = substitutions
            .into_iter()
            .map(|(from, to)| (fold_characters(from.trim()), fold_characters(to.trim())))
            .filter(|(from, _)| !from.is_empty())
            .collect();
        NameNormalizer { substitutions }
    }

    pub fn substitutions(&self) -> &[(String, String)] {
        &self.substitutions
    }

    pub fn normalize(&self, raw: &str) -> String {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let folded = fold_characters(&collapsed);
        let mut name = move_retrofit_to_suffix(&folded);
        for (from, to) in &self.substitutions {
            if name.contains(from.as_str()) {
                name = name.replace(from.as_str(), to);
            }
        }
        romanize_sequel_suffix(name)
    }
}

/// Lowercase, compatibility-decompose and drop combining marks. NFKD also maps
/// MICRO SIGN (U+00B5) onto GREEK SMALL LETTER MU (U+03BC).
fn fold_characters(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped: String = lowered
        .as_str()
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect();
    stripped.replace('ß', "ss")
}

/// Normalize with the default substitution table.
pub fn normalize(raw: &str) -> String {
    NameNormalizer::default().normalize(raw)
}

/// `laffey retrofit`, `retrofit laffey` and `laffey (retrofit)` all become
/// `laffey (retrofit)`.
fn move_retrofit_to_suffix(name: &str) -> String {
    if !name.contains(RETROFIT) {
        return name.to_string();
    }
    let unwrapped = name.replace("(retrofit)", " ");
    let base = unwrapped
        .split(RETROFIT)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{base}{RETROFIT_SUFFIX}")
}

fn romanize_sequel_suffix(name: String) -> String {
    for (digit, roman) in ROMAN_SUFFIXES {
        if let Some(base) = name.strip_suffix(*digit) {
            return format!("{base}{roman}");
        }
    }
    name
}
