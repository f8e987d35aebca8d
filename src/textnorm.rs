//! Text post-processing for engines that emit space-separated CJK output.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches two CJK ideographs with whitespace between them.
    static ref CJK_GAP: Regex =
        Regex::new(r"([\x{4e00}-\x{9fa5}])\s+([\x{4e00}-\x{9fa5}])").unwrap();
}

/// Collapse whitespace sitting between adjacent CJK ideographs.
///
/// Repeats the substitution until a fixed point is reached: each pass
/// consumes the right-hand ideograph of a match, so runs like "一 二 三"
/// need a second pass for the remaining gap. Non-CJK text is untouched.
pub fn collapse_cjk_whitespace(text: &str) -> String {
    let mut text = text.to_string();
    while CJK_GAP.is_match(&text) {
        text = CJK_GAP.replace_all(&text, "${1}${2}").into_owned();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_single_gap() {
        assert_eq!(collapse_cjk_whitespace("你 好"), "你好");
        assert_eq!(collapse_cjk_whitespace("你\t\t好"), "你好");
    }

    #[test]
    fn collapses_run_of_gaps() {
        assert_eq!(collapse_cjk_whitespace("一 二 三 四"), "一二三四");
    }

    #[test]
    fn preserves_non_cjk_text() {
        assert_eq!(collapse_cjk_whitespace("hello world"), "hello world");
        assert_eq!(collapse_cjk_whitespace("abc 中 文 def"), "abc 中文 def");
    }

    #[test]
    fn preserves_leading_and_trailing_whitespace() {
        assert_eq!(collapse_cjk_whitespace(" 你 好 "), " 你好 ");
    }

    #[test]
    fn is_idempotent() {
        let once = collapse_cjk_whitespace("今 天 天 气 不 错");
        let twice = collapse_cjk_whitespace(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "今天天气不错");
    }

    #[test]
    fn handles_empty_input() {
        assert_eq!(collapse_cjk_whitespace(""), "");
    }
}
