//! Filesystem-safe filenames from arbitrary titles.
//!
//! Applies the strictest common rules (Windows) on every platform so a
//! library downloaded on one machine copies cleanly to another.

/// Characters no mainstream filesystem accepts in a file name.
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Device names Windows refuses as a file stem, regardless of extension.
const RESERVED_STEMS: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Longest name we produce, in bytes, leaving room for an extension.
const MAX_NAME_BYTES: usize = 200;

/// Name used when nothing survives sanitizing.
const FALLBACK_NAME: &str = "untitled";

/// Returns true if `c` may not appear in a file name.
#[must_use]
pub fn is_reserved_char(c: char) -> bool {
    c.is_control() || RESERVED_CHARS.contains(&c)
}

/// Map a title to a filesystem-safe file stem.
///
/// Reserved and control characters are dropped, the result is capped at
/// 200 bytes on a char boundary, trailing dots and spaces are trimmed,
/// an empty result becomes `untitled`, and Windows device names get a `_`
/// appended to their stem. The function is idempotent.
#[must_use]
pub fn sanitize_file_name(title: &str) -> String {
    let mut name: String = title.chars().filter(|c| !is_reserved_char(*c)).collect();

    truncate_bytes(&mut name, MAX_NAME_BYTES);
    trim_trailing(&mut name);

    if name.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    let stem_len = name.find('.').unwrap_or(name.len());
    if RESERVED_STEMS
        .iter()
        .any(|reserved| name[..stem_len].eq_ignore_ascii_case(reserved))
    {
        name.insert(stem_len, '_');
        if name.len() > MAX_NAME_BYTES {
            truncate_bytes(&mut name, MAX_NAME_BYTES);
            trim_trailing(&mut name);
        }
    }

    name
}

/// Cut `name` to at most `max` bytes without splitting a character.
fn truncate_bytes(name: &mut String, max: usize) {
    if name.len() > max {
        let mut cut = max;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        name.truncate(cut);
    }
}

/// Drop trailing dots and spaces, which Windows silently strips.
fn trim_trailing(name: &mut String) {
    let trimmed_len = name.trim_end_matches(['.', ' ']).len();
    name.truncate(trimmed_len);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_windows_forbidden_chars() {
        for c in RESERVED_CHARS {
            let input = format!("test{c}file");
            let result = sanitize_file_name(&input);
            assert_eq!(result, "testfile", "char '{c}' should be removed");
        }
    }

    #[test]
    fn keeps_ordinary_titles() {
        assert_eq!(
            sanitize_file_name("Artist - Song (Official Video)"),
            "Artist - Song (Official Video)"
        );
        assert_eq!(sanitize_file_name("Café 模型"), "Café 模型");
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(sanitize_file_name("line\none\ttab"), "lineonetab");
    }

    #[test]
    fn trims_trailing_dots_and_spaces() {
        assert_eq!(sanitize_file_name("What? ..."), "What");
    }

    #[test]
    fn empty_becomes_fallback() {
        assert_eq!(sanitize_file_name(""), "untitled");
        assert_eq!(sanitize_file_name("???"), "untitled");
        assert_eq!(sanitize_file_name(" . "), "untitled");
    }

    #[test]
    fn device_names_get_suffix() {
        assert_eq!(sanitize_file_name("con"), "con_");
        assert_eq!(sanitize_file_name("NUL.txt"), "NUL_.txt");
        assert_eq!(sanitize_file_name("Console"), "Console");
    }

    #[test]
    fn long_titles_are_capped_on_char_boundary() {
        let long_title = "é".repeat(150);
        let result = sanitize_file_name(&long_title);
        assert!(result.len() <= MAX_NAME_BYTES);
        assert!(result.chars().all(|c| c == 'é'));
    }

    #[test]
    fn sanitize_is_idempotent() {
        let long = "x".repeat(300);
        let reserved_long = format!("CON.{}", "a".repeat(196));
        let reserved_padded = format!("CON{}x", " ".repeat(197));
        let inputs: [&str; 11] = [
            "Video: \"Best of 2024\" <HD> | 1080p",
            "con",
            "trailing dots...",
            "",
            "a/b\\c",
            &long,
            "  spaced out  ",
            "LPT1. ",
            "NUL.txt",
            &reserved_long,
            &reserved_padded,
        ];
        for input in inputs {
            let once = sanitize_file_name(input);
            let twice = sanitize_file_name(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
            assert!(!once.chars().any(is_reserved_char));
        }
    }
}
