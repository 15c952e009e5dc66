use std::path::Path;

use crate::error::FilterError;

/// Built-in replacement table. Order matters: rules run top to bottom.
pub const BUILTIN_RULES: &[(&str, &str)] = &[
    ("ぴえん", "🥺"),
    ("うーん", "🤔"),
    ("まっする", "💪('ω'💪)"),
    ("マッスル", "💪('ω'💪)"),
    ("天使", "😇"),
    ("てんし", "😇"),
    ("寿司", "🍣"),
    ("すし", "🍣"),
    ("ばいばい", "👋"),
    ("ぐっど", "👍"),
    ("ばっど", "👎"),
    ("ぱちぱち", "👏"),
    ("ぴよ", "💫"),
    ("ようせい", "🧚‍♀️"),
    ("にんぎょ", "🧜‍♀️"),
    ("だまれ", "🤐"),
    ("よゆう", "🤥"),
    ("zzz", "😪"),
    ("コロナ", "😷"),
    ("は？", "😕"),
    ("なき", "😭"),
    ("はー", "😩"),
    ("ねむ", "🥱"),
    ("うんち", "💩"),
    ("国士無双", "🀇🀏🀐🀘🀙🀡🀀🀁🀂🀃🀆🀅🀄🀄"),
    ("字一色", "🀀🀀🀀🀁🀁🀁🀂🀂🀂🀅🀅🀅🀄🀄"),
    ("大三元", "🀆🀆🀆🀅🀅🀅🀄🀄🀄🀇🀇🀇🀈🀈"),
    ("緑一色　", "🀑🀒🀓🀑🀒🀓🀕🀕🀕🀗🀗🀗🀅🀅"),
    ("清老頭　", "🀇🀇🀇🀏🀏🀏🀐🀐🀐🀘🀘🀘🀙🀙"),
    ("九蓮宝燈", "🀇🀇🀇🀈🀉🀊🀋🀌🀍🀎🀏🀏🀏🀏"),
    ("四暗刻", "🀇🀇🀇🀐🀐🀐🀝🀝🀝🀀🀀🀀🀃🀃"),
    ("小四喜", "🀀🀀🀁🀁🀁🀂🀂🀂🀃🀃🀃🀒🀓🀔"),
    ("大四喜", "🀀🀀🀀🀁🀁🀁🀂🀂🀂🀃🀃🀃🀒🀒"),
];

/// Ordered literal substring replacement applied to posted text.
///
/// Matching is case-sensitive and every rule replaces all occurrences before
/// the next rule runs.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    rules: Vec<(String, String)>,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ContentFilter {
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES
                .iter()
                .map(|(pattern, replacement)| (pattern.to_string(), replacement.to_string()))
                .collect(),
        }
    }

    pub fn from_rules(rules: Vec<(String, String)>) -> Result<Self, FilterError> {
        if let Some(idx) = rules.iter().position(|(pattern, _)| pattern.is_empty()) {
            return Err(FilterError::EmptyPattern(idx));
        }
        Ok(Self { rules })
    }

    /// Load a table from a JSON array of `[pattern, replacement]` pairs.
    pub fn load(path: &Path) -> Result<Self, FilterError> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        let rules: Vec<(String, String)> = serde_json::from_str(raw)?;
        Self::from_rules(rules)
    }

    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, (pattern, replacement)| {
                if acc.contains(pattern.as_str()) {
                    acc.replace(pattern.as_str(), replacement)
                } else {
                    acc
                }
            })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
