//! Character-set rules for the encoding detector and fixer.

use deunicode::deunicode_with_tofu;

/// Whether a character is acceptable in a cell: printable ASCII plus the
/// accented letters of Latin-1 and Latin Extended-A.
pub fn is_allowed(c: char) -> bool {
    matches!(c, ' '..='~')
        || (matches!(c, '\u{00C0}'..='\u{00FF}') && c != '\u{00D7}' && c != '\u{00F7}')
        || matches!(c, '\u{0100}'..='\u{017F}')
}

/// Whether a value contains any character that is not allowed.
pub fn has_disallowed(value: &str) -> bool {
    value.chars().any(|c| !is_allowed(c))
}

/// Fixed ASCII replacement for a disallowed punctuation, symbol or control
/// character. An empty replacement drops the character.
///
/// Letters are not listed here; [`clean`] romanizes them.
pub fn transliterate(c: char) -> Option<&'static str> {
    let replacement = match c {
        '\t' | '\n' | '\r' | '\u{00A0}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{3000}' => {
            " "
        }
        '\u{FFFD}' | '\u{FEFF}' | '\u{200B}'..='\u{200D}' | '\u{2060}' => "",
        c if c.is_control() => "",
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{00B4}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
        | '\u{00BB}' => "\"",
        '\u{2010}'..='\u{2015}' | '\u{2212}' => "-",
        '\u{2026}' => "...",
        '\u{2022}' | '\u{00B7}' => "*",
        '\u{00A9}' => "(c)",
        '\u{00AE}' => "(R)",
        '\u{2122}' => "(TM)",
        '\u{20AC}' => "EUR",
        '\u{00A3}' => "GBP",
        '\u{00A5}' => "JPY",
        '\u{00A2}' => "c",
        '\u{00D7}' => "x",
        '\u{00F7}' => "/",
        '\u{00BC}' => "1/4",
        '\u{00BD}' => "1/2",
        '\u{00BE}' => "3/4",
        '\u{00B2}' => "2",
        '\u{00B3}' => "3",
        '\u{00B9}' => "1",
        '\u{00B0}' => "deg",
        '\u{0218}' => "S",
        '\u{0219}' => "s",
        '\u{021A}' => "T",
        '\u{021B}' => "t",
        _ => return None,
    };
    Some(replacement)
}

/// Undo UTF-8 text that was decoded as Latin-1 (`cafÃ©` → `café`).
///
/// Only applies when every character fits in one byte and the bytes form
/// valid UTF-8 containing multi-byte sequences.
fn repair_mojibake(value: &str) -> Option<String> {
    if value.is_ascii() || value.chars().any(|c| c as u32 > 0xFF) {
        return None;
    }
    let bytes: Vec<u8> = value.chars().map(|c| c as u32 as u8).collect();
    String::from_utf8(bytes).ok().filter(|s| s != value)
}

/// Rewrite a value so that it contains only allowed characters.
///
/// Mis-decoded UTF-8 is repaired first. Characters with a fixed replacement
/// use it; runs of other characters are romanized (`Nguyễn` → `Nguyen`,
/// `Москва` → `Moskva`), and anything without a romanization is dropped.
pub fn clean(value: &str) -> String {
    let repaired = repair_mojibake(value);
    let source = repaired.as_deref().unwrap_or(value);

    let mut out = String::with_capacity(source.len());
    let mut run = String::new();
    for c in source.chars() {
        if is_allowed(c) {
            flush_run(&mut out, &mut run, Some(c));
            out.push(c);
        } else if let Some(ascii) = transliterate(c) {
            flush_run(&mut out, &mut run, Some(c));
            out.push_str(ascii);
        } else {
            run.push(c);
        }
    }
    flush_run(&mut out, &mut run, None);
    out
}

/// Romanize a run of characters with no fixed replacement.
///
/// Romanized syllables carry a trailing separator space; it is kept only
/// when a letter or digit follows.
fn flush_run(out: &mut String, run: &mut String, next: Option<char>) {
    if run.is_empty() {
        return;
    }
    let romanized = deunicode_with_tofu(run.as_str(), "");
    let romanized = if next.is_none_or(|c| !c.is_alphanumeric()) {
        romanized.trim_end()
    } else {
        romanized.as_str()
    };
    out.extend(romanized.chars().filter(|c| is_allowed(*c)));
    run.clear();
}
