// ==========================================
// 工包工时核算系统 - 参考库核对
// ==========================================
// 职责: 找出参考库中不存在的任务号 / EO 号
// 规则:
//   - 只核对 CheckAgainstReference 行
//   - 以 EO 前缀开头的号核对 EO 集合，其余核对任务号集合
//   - 空任务号从不上报
//   - 输入为去重后的行，输出顺序 = 首次出现顺序
// ==========================================

use crate::domain::result::{NewIdentifier, ProcessedRow};
use crate::engine::lookup::ReferenceIds;
use tracing::debug;

pub struct ReferenceChecker<'a> {
    ids: &'a ReferenceIds,
    eo_prefix: &'a str,
}

impl<'a> ReferenceChecker<'a> {
    pub fn new(ids: &'a ReferenceIds, eo_prefix: &'a str) -> Self {
        Self { ids, eo_prefix }
    }

    pub fn is_eo(&self, task_id: &str) -> bool {
        !self.eo_prefix.is_empty() && task_id.starts_with(self.eo_prefix)
    }

    /// 任务号是否已收录
    pub fn is_known(&self, task_id: &str) -> bool {
        if self.is_eo(task_id) {
            self.ids.eo_ids.contains(task_id)
        } else {
            self.ids.task_ids.contains(task_id)
        }
    }

    /// 核对去重后的行，返回新任务号
    pub fn find_new<'r, I>(&self, unique_rows: I) -> Vec<NewIdentifier>
    where
        I: IntoIterator<Item = &'r ProcessedRow>,
    {
        let mut found = Vec::new();

        for row in unique_rows {
            if !row.class.should_check() {
                continue;
            }

            let task_id = row.task_id.trim();
            if task_id.is_empty() || self.is_known(task_id) {
                continue;
            }

            let is_eo = self.is_eo(task_id);
            debug!(seq_no = %row.seq_no, task_id = %task_id, is_eo, "参考库中未找到");
            found.push(NewIdentifier {
                seq_no: row.seq_no.clone(),
                task_id: task_id.to_string(),
                is_eo,
            });
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SeqClass;

    fn row(seq: &str, id: &str, class: SeqClass) -> ProcessedRow {
        ProcessedRow {
            row_number: 1,
            seq_no: seq.to_string(),
            title: String::new(),
            class,
            task_id: id.to_string(),
            base_hours: 0.0,
            check_group: None,
            function_group: None,
            special_code: None,
            coefficient: None,
            adjusted_hours: 0.0,
        }
    }

    fn ids() -> ReferenceIds {
        ReferenceIds::new(
            vec!["24-045-00".to_string()],
            vec!["EO-2024-001".to_string()],
        )
    }

    #[test]
    fn test_find_new_in_row_order() {
        let ids = ids();
        let checker = ReferenceChecker::new(&ids, "EO-");
        let rows = vec![
            row("2.1", "24-045-00", SeqClass::CheckAgainstReference),
            row("2.3", "24-099-00", SeqClass::CheckAgainstReference),
            row("2.2", "24-011-00", SeqClass::CheckAgainstReference),
        ];

        let found = checker.find_new(&rows);
        let pairs: Vec<(&str, &str)> = found
            .iter()
            .map(|n| (n.seq_no.as_str(), n.task_id.as_str()))
            .collect();
        assert_eq!(pairs, vec![("2.3", "24-099-00"), ("2.2", "24-011-00")]);
    }

    #[test]
    fn test_eo_prefix_routes_to_eo_set() {
        let ids = ids();
        let checker = ReferenceChecker::new(&ids, "EO-");
        let rows = vec![
            row("3.1", "EO-2024-001", SeqClass::CheckAgainstReference),
            row("3.2", "EO-2024-002", SeqClass::CheckAgainstReference),
        ];

        let found = checker.find_new(&rows);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].task_id, "EO-2024-002");
        assert!(found[0].is_eo);
    }

    #[test]
    fn test_task_id_in_eo_set_is_still_new() {
        let ids = ReferenceIds::new(Vec::new(), vec!["24-045-00".to_string()]);
        let checker = ReferenceChecker::new(&ids, "EO-");
        let found = checker.find_new(&[row("2.1", "24-045-00", SeqClass::CheckAgainstReference)]);
        assert_eq!(found.len(), 1);
        assert!(!found[0].is_eo);
    }

    #[test]
    fn test_process_only_and_empty_ids_not_reported() {
        let ids = ids();
        let checker = ReferenceChecker::new(&ids, "EO-");
        let rows = vec![
            row("3.1", "UNKNOWN-1", SeqClass::ProcessOnly),
            row("2.1", "   ", SeqClass::CheckAgainstReference),
            row("9.1", "UNKNOWN-2", SeqClass::Skip),
        ];
        assert!(checker.find_new(&rows).is_empty());
    }
}
