// ==========================================
// 工包工时核算系统 - 任务号提取器
// ==========================================
// 职责: 按 SEQ 大类决定处理方式，并从标题中提取任务号
// 规则:
//   - BeforeParen: 取第一个 "(" 之前的部分（trim）
//   - BeforeSlash: 取第一个 "/" 之前的部分（trim）
//   - 分隔符不存在: 返回整个标题（trim）
//   - 未配置的 SEQ 大类: Skip（不可默认为处理）
// ==========================================

use crate::domain::types::{IdRule, SeqClass};
use std::collections::HashMap;

/// 从标题提取任务号
pub fn extract(title: &str, rule: IdRule) -> String {
    let delimiter = rule.delimiter();
    match title.find(delimiter) {
        Some(pos) => title[..pos].trim().to_string(),
        None => title.trim().to_string(),
    }
}

/// SEQ 大类（"4.39" → "4"）
pub fn major_segment(seq_no: &str) -> &str {
    seq_no.split('.').next().unwrap_or_default().trim()
}

// ==========================================
// SeqDecision - 单行的分类结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqDecision {
    pub class: SeqClass,
    pub rule: IdRule,
    pub mapped: bool, // false = SEQ 大类未配置
}

// ==========================================
// SeqRules - SEQ 大类 → 分类 + 提取规则
// ==========================================
// 配置加载时构建一次，按值传入各组件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeqRules {
    classes: HashMap<String, SeqClass>,
    rules: HashMap<String, IdRule>,
}

impl SeqRules {
    /// 未配置提取规则的大类使用该默认值
    pub const DEFAULT_RULE: IdRule = IdRule::BeforeSlash;

    pub fn new(classes: HashMap<String, SeqClass>, rules: HashMap<String, IdRule>) -> Self {
        let upper = |key: String| key.trim().to_ascii_uppercase();
        Self {
            classes: classes.into_iter().map(|(k, v)| (upper(k), v)).collect(),
            rules: rules.into_iter().map(|(k, v)| (upper(k), v)).collect(),
        }
    }

    pub fn decide(&self, seq_no: &str) -> SeqDecision {
        let major = major_segment(seq_no).to_ascii_uppercase();
        let rule = self.rule_for_major(&major);

        match self.classes.get(&major) {
            Some(class) => SeqDecision {
                class: *class,
                rule,
                mapped: true,
            },
            None => SeqDecision {
                class: SeqClass::Skip,
                rule,
                mapped: false,
            },
        }
    }

    /// 提取规则（工具控制等不依赖分类的场景也使用）
    pub fn rule_for(&self, seq_no: &str) -> IdRule {
        self.rule_for_major(&major_segment(seq_no).to_ascii_uppercase())
    }

    fn rule_for_major(&self, major: &str) -> IdRule {
        self.rules.get(major).copied().unwrap_or(Self::DEFAULT_RULE)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> SeqRules {
        SeqRules::new(
            HashMap::from([
                ("2".to_string(), SeqClass::CheckAgainstReference),
                ("3".to_string(), SeqClass::ProcessOnly),
                ("4".to_string(), SeqClass::Skip),
            ]),
            HashMap::from([
                ("2".to_string(), IdRule::BeforeParen),
                ("3".to_string(), IdRule::BeforeSlash),
            ]),
        )
    }

    #[test]
    fn test_extract_before_paren() {
        assert_eq!(extract("24-045-00 (00) - ITEM 1", IdRule::BeforeParen), "24-045-00");
    }

    #[test]
    fn test_extract_before_slash() {
        assert_eq!(extract("EO-2024-001 / CABIN AIR", IdRule::BeforeSlash), "EO-2024-001");
    }

    #[test]
    fn test_extract_without_delimiter_returns_trimmed_title() {
        assert_eq!(extract("NO-DELIMITER-HERE", IdRule::BeforeParen), "NO-DELIMITER-HERE");
        assert_eq!(extract("  NO-DELIMITER-HERE  ", IdRule::BeforeSlash), "NO-DELIMITER-HERE");
    }

    #[test]
    fn test_extract_uses_first_delimiter() {
        assert_eq!(extract("A/B/C", IdRule::BeforeSlash), "A");
        assert_eq!(extract("X (1) (2)", IdRule::BeforeParen), "X");
    }

    #[test]
    fn test_major_segment() {
        assert_eq!(major_segment("2.1"), "2");
        assert_eq!(major_segment("3.45"), "3");
        assert_eq!(major_segment("10"), "10");
        assert_eq!(major_segment(""), "");
    }

    #[test]
    fn test_decide_mapped_segments() {
        let rules = rules();
        let d = rules.decide("2.1");
        assert_eq!(d.class, SeqClass::CheckAgainstReference);
        assert_eq!(d.rule, IdRule::BeforeParen);
        assert!(d.mapped);

        assert_eq!(rules.decide("3.7").class, SeqClass::ProcessOnly);
        assert_eq!(rules.decide("4.1").class, SeqClass::Skip);
    }

    #[test]
    fn test_decide_unmapped_segment_is_skip() {
        let d = rules().decide("9.1");
        assert_eq!(d.class, SeqClass::Skip);
        assert!(!d.mapped);

        let blank = rules().decide("");
        assert_eq!(blank.class, SeqClass::Skip);
        assert!(!blank.mapped);
    }

    #[test]
    fn test_rule_defaults_to_before_slash() {
        assert_eq!(rules().rule_for("4.2"), IdRule::BeforeSlash);
        assert_eq!(rules().rule_for("9.9"), IdRule::BeforeSlash);
    }
}
