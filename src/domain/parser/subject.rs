//! Subject extraction: `#tags` first, then the ordered subject vocabulary.

use super::normalize::normalize_digits;
use regex::Regex;
use std::sync::LazyLock;

/// A tag runs until whitespace, another `#`, a digit or sentence punctuation.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[#＃]([^\s#＃0-9、。,.!！?？]+)").expect("tag regex")
});

/// Separator used when several tags name the subject.
pub const TAG_SEPARATOR: &str = "・";

/// Subjects that ship with the bot when configuration supplies none.
pub const DEFAULT_SUBJECTS: &[&str] = &[
    "英語", "数学", "国語", "現代文", "古文", "漢文", "物理", "化学", "生物", "地学", "理科",
    "日本史", "世界史", "地理", "政治経済", "倫理", "社会", "情報", "プログラミング", "英単語",
    "リスニング", "読書", "復習", "予習", "宿題",
];

/// Ordered, read-only list of recognised subject names.
///
/// Order is the tie-break: the first entry found anywhere in the text wins,
/// regardless of where in the text it appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectVocabulary {
    subjects: Vec<String>,
}

impl SubjectVocabulary {
    /// Builds a vocabulary, digit-normalising entries and dropping blanks and duplicates.
    pub fn new<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for s in subjects {
            let s = normalize_digits(s.as_ref().trim());
            if !s.is_empty() && !out.contains(&s) {
                out.push(s);
            }
        }
        Self { subjects: out }
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.subjects.iter().map(String::as_str)
    }

    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.iter().find(|s| text.contains(*s))
    }
}

impl Default for SubjectVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SUBJECTS)
    }
}

/// All `#tag` tokens in text order.
pub fn extract_tags(text: &str) -> Vec<&str> {
    TAG_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

pub fn has_subject(text: &str, vocabulary: &SubjectVocabulary) -> bool {
    !extract_tags(text).is_empty() || vocabulary.first_match(text).is_some()
}

/// Tags joined with [`TAG_SEPARATOR`] when present, otherwise the first vocabulary hit.
pub fn extract_subject(text: &str, vocabulary: &SubjectVocabulary) -> Option<String> {
    let tags = extract_tags(text);
    if !tags.is_empty() {
        return Some(tags.join(TAG_SEPARATOR));
    }
    vocabulary.first_match(text).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_take_priority_and_join() {
        let vocab = SubjectVocabulary::default();
        assert_eq!(
            extract_subject("#数学 #復習 1時間", &vocab).as_deref(),
            Some("数学・復習")
        );
        assert_eq!(extract_subject("英語 #長文", &vocab).as_deref(), Some("長文"));
    }

    #[test]
    fn tag_stops_at_digits() {
        assert_eq!(extract_tags("#数学1時間"), vec!["数学"]);
        assert_eq!(extract_tags("＃英語、30分"), vec!["英語"]);
        assert!(extract_tags("# 1時間").is_empty());
    }

    #[test]
    fn vocabulary_order_breaks_ties() {
        let vocab = SubjectVocabulary::new(["数学", "英語"]);
        // 英語 appears first in the text, but 数学 comes first in the vocabulary.
        assert_eq!(vocab.first_match("英語と数学を30分"), Some("数学"));
    }

    #[test]
    fn blanks_and_duplicates_are_dropped() {
        let vocab = SubjectVocabulary::new(["", "  ", "英語", "英語"]);
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.first_match("こんにちは"), None);
    }

    #[test]
    fn empty_vocabulary_matches_nothing() {
        let vocab = SubjectVocabulary::new(Vec::<String>::new());
        assert!(vocab.is_empty());
        assert_eq!(extract_subject("英語30分", &vocab), None);
        assert!(!has_subject("英語30分", &vocab));
    }
}
