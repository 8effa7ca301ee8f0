use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Spelled-out forms of the German umlauts and sharp s. Each umlaut is listed
/// twice: precomposed, and as base letter followed by U+0308 COMBINING
/// DIAERESIS.
const DIGRAPHS: [(&str, &str); 13] = [
    ("ß", "ss"),
    ("Ä", "Ae"),
    ("Ö", "Oe"),
    ("Ü", "Ue"),
    ("ä", "ae"),
    ("ö", "oe"),
    ("ü", "ue"),
    ("A\u{308}", "Ae"),
    ("O\u{308}", "Oe"),
    ("U\u{308}", "Ue"),
    ("a\u{308}", "ae"),
    ("o\u{308}", "oe"),
    ("u\u{308}", "ue"),
];

/// Characters that at least one common filesystem refuses in a name.
const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Device names that Windows, and some NAS systems, reserve.
const RESERVED_NAMES: [&str; 12] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3", "LOCK$",
];

pub const RESERVED_SUFFIX: &str = "_changed";

// Marks in between are part of the run; accent removal strips them later.
static COMMA_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(?:\p{Mn}*,)+").expect("Invalid regex pattern"));
static PERIOD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(?:\p{Mn}*\.){3,}").expect("Invalid regex pattern"));
static NONSPACING_MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Mn}+").expect("Invalid regex pattern"));
static INVISIBLE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Cc}\p{Cf}\p{Co}\p{Cn}]").expect("Invalid regex pattern")
});

/// Turns an arbitrary file or directory name into a portable one.
///
/// The result contains no umlauts or other diacritics, no characters that
/// common filesystems reject, no control or invisible characters, no trailing
/// spaces or periods and is never a reserved device name. Sanitizing an
/// already sanitized name returns it unchanged.
pub fn sanitize(name: &str) -> String {
    let name = substitute_literals(name);
    let name = remove_accents(&name);
    let name = replace_invisible_chars(&name);
    let name = trim_trailing(name);
    escape_reserved_name(name)
}

fn substitute_literals(name: &str) -> String {
    let mut substituted = String::with_capacity(name.len());
    let mut rest = name;

    'scan: while let Some(c) = rest.chars().next() {
        for (from, to) in DIGRAPHS {
            if let Some(tail) = rest.strip_prefix(from) {
                substituted.push_str(to);
                rest = tail;
                continue 'scan;
            }
        }
        match c {
            '…' => substituted.push_str("..."),
            c if ILLEGAL_CHARS.contains(&c) => substituted.push('-'),
            c => substituted.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }

    let collapsed = COMMA_RUN.replace_all(&substituted, ",");
    PERIOD_RUN.replace_all(&collapsed, ".").into_owned()
}

fn remove_accents(name: &str) -> String {
    let decomposed = name.nfd().collect::<String>();
    let stripped = NONSPACING_MARKS.replace_all(&decomposed, "");

    let mut remapped = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match ascii_replacement(c) {
            Some(replacement) => remapped.push_str(replacement),
            None => remapped.push(c),
        }
    }
    remapped.nfc().collect()
}

/// Replacements for characters that canonical decomposition leaves alone.
fn ascii_replacement(c: char) -> Option<&'static str> {
    let replacement = match c {
        'ł' => "l",
        'Ł' => "L",
        'đ' => "d",
        'Đ' => "D",
        'ø' => "o",
        'Ø' => "O",
        'ı' => "i",
        'ħ' => "h",
        'Ħ' => "H",
        'ŧ' => "t",
        'Ŧ' => "T",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        '%' | '!' | '$' => "_",
        '\u{2013}' | '\u{2014}' => "-",
        _ => return None,
    };
    Some(replacement)
}

fn replace_invisible_chars(name: &str) -> String {
    INVISIBLE_CHARS.replace_all(name, "-").into_owned()
}

/// Drops trailing spaces and periods. A name made of nothing else is kept.
fn trim_trailing(name: String) -> String {
    let trimmed = name.trim_end_matches([' ', '.']);
    if trimmed.is_empty() || trimmed.len() == name.len() {
        name
    } else {
        trimmed.to_string()
    }
}

fn escape_reserved_name(name: String) -> String {
    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(&name))
    {
        name + RESERVED_SUFFIX
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("foo bar", "foo bar")]
    #[case(".DS_Store", ".DS_Store")]
    #[case("@eaDir", "@eaDir")]
    #[case("@#,.-_()[]{}", "@#,.-_()[]{}")]
    #[case("Größe.mp3", "Groesse.mp3")]
    #[case("Ein Porträt über Torquemada", "Ein Portraet ueber Torquemada")]
    #[case("4-10 Ein Porträt über Torquemada.mp3", "4-10 Ein Portraet ueber Torquemada.mp3")]
    #[case("1-03 Urtümlicher Titan ....mp3", "1-03 Urtuemlicher Titan .mp3")]
    #[case("LPT3", "LPT3_changed")]
    #[case("Text.doc . ", "Text.doc")]
    #[case("…", "...")]
    #[case("… New.txt", "... New.txt")]
    #[case("\u{2013}\u{2014}", "--")]
    fn sanitizes_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[test]
    fn decomposed_umlauts_match_precomposed_ones() {
        let decomposed = "Lovecraft U\u{308}ber _Ein Porta\u{308}t Torquemadas_.mp3";
        let precomposed = "Lovecraft Über _Ein Porträt Torquemadas_.mp3";

        assert_eq!(
            sanitize(decomposed),
            "Lovecraft Ueber _Ein Portraet Torquemadas_.mp3"
        );
        assert_eq!(sanitize(decomposed), sanitize(precomposed));
    }

    #[test]
    fn removes_diacritics() {
        assert_eq!(
            sanitize("ạàąâåÅčćçÇČĆđĐęéèêîìłńóôộớšśŚŠùûůżźžŻŽ"),
            "aaaaaAcccCCCdDeeeeiilnoooossSSuuuzzzZZ"
        );
        assert_eq!(sanitize("Øresund Æble"), "Oresund AEble");
    }

    #[rstest]
    #[case("!")]
    #[case("%")]
    #[case("$")]
    fn replaces_specials_with_underscore(#[case] input: &str) {
        assert_eq!(sanitize(input), "_");
    }

    #[rstest]
    #[case("a<b>c", "a-b-c")]
    #[case("Title: Subtitle", "Title- Subtitle")]
    #[case("say \"hi\"", "say -hi-")]
    #[case("a\\b", "a-b")]
    #[case("why?", "why-")]
    #[case("a|b", "a-b")]
    #[case("*.mp3", "-.mp3")]
    fn replaces_illegal_chars_with_hyphen(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[rstest]
    #[case("a,,b", "a,b")]
    #[case("a,,,,,,b", "a,b")]
    #[case("a..b", "a..b")]
    #[case("a...b", "a...b")]
    #[case("a....b", "a.b")]
    #[case("a.........b", "a.b")]
    #[case("a…..b", "a.b")]
    fn collapses_punctuation_runs(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[rstest]
    #[case("Command & Conquer \u{200B} Documentary.mp4", "Command & Conquer - Documentary.mp4")]
    #[case("bell\u{7}.txt", "bell-.txt")]
    #[case("tab\tname", "tab-name")]
    #[case("private\u{E000}use", "private-use")]
    #[case("unassigned\u{378}", "unassigned-")]
    #[case("left\u{200E}mark", "left-mark")]
    fn replaces_invisible_chars_with_hyphen(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[rstest]
    #[case("name. . .", "name")]
    #[case("name   ", "name")]
    #[case(".hidden.", ".hidden")]
    #[case("...", "...")]
    #[case("..", "..")]
    #[case(".", ".")]
    fn trims_trailing_spaces_and_periods(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[rstest]
    #[case("CON", "CON_changed")]
    #[case("con", "con_changed")]
    #[case("Nul", "Nul_changed")]
    #[case("COM4", "COM4_changed")]
    #[case("AUX .", "AUX_changed")]
    #[case("COM5", "COM5")]
    #[case("CON.txt", "CON.txt")]
    #[case("LOCK$", "LOCK_")]
    fn escapes_reserved_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[rstest]
    #[case("Größe.mp3")]
    #[case("LPT3")]
    #[case("Text.doc . ")]
    #[case("…")]
    #[case("……")]
    #[case("……..")]
    #[case(". . .")]
    #[case("..\u{301}..")]
    #[case(",\u{301},")]
    #[case("a\u{200B}\u{308}")]
    #[case("A\u{308}\u{301}x")]
    #[case("Ǟ ǟ ß ẞ")]
    #[case("한국어 파일.txt")]
    #[case("CON .")]
    #[case("what?!|%$*")]
    #[case("\u{E000}\u{7}\u{200D}")]
    #[case("Ærøskøbing – ferry — log.csv")]
    fn sanitizing_is_idempotent(#[case] input: &str) {
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once, "input: {input:?}");
    }
}
