use crate::record::{Policy, PolicyDetail, RuleRecord};

/// Owned, single-run relational store for the policy/rule report.
///
/// Holds the two record sets and produces their inner join. Rows come out
/// in policy arrival order, then rule arrival order within each policy;
/// nothing is sorted.
#[derive(Debug, Default)]
pub struct ReportStore {
    policies: Vec<Policy>,
    rules: Vec<RuleRecord>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_policies(&mut self, batch: impl IntoIterator<Item = Policy>) {
        self.policies.extend(batch);
    }

    pub fn add_rule(&mut self, record: RuleRecord) {
        self.rules.push(record);
    }

    /// Flatten a rule-list response into one `RuleRecord` per rule.
    pub fn add_policy_detail(&mut self, detail: &PolicyDetail) {
        for rule in &detail.rules {
            self.rules.push(RuleRecord::from_detail(detail, rule));
        }
    }

    /// Descriptions of the loaded policies, in arrival order. These drive the
    /// per-policy rule fetches.
    pub fn policy_descriptions(&self) -> Vec<String> {
        self.policies.iter().map(|p| p.description()).collect()
    }

    pub fn policy_count(&self) -> usize {
        self.policies.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Inner join of policies onto rule records, keyed by policy description.
    ///
    /// Each row is the policy's fields followed by the rule's fields. A rule
    /// record whose `policyName` matches no loaded policy is dropped; a policy
    /// with no matching rule records contributes no rows.
    pub fn joined_rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        for policy in &self.policies {
            let key = policy.description();
            for rule in &self.rules {
                if rule.policy_name == key {
                    let mut row = policy.fields();
                    row.extend(rule.fields());
                    rows.push(row);
                }
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::REPORT_COLUMNS;
    use serde_json::json;

    fn policy(description: &str) -> Policy {
        serde_json::from_value(json!({
            "id": 1,
            "policy_description": description,
        }))
        .expect("policy parse failed")
    }

    fn detail(name: &str, rule_names: &[&str]) -> PolicyDetail {
        serde_json::from_value(json!({
            "policyName": name,
            "rules": rule_names.iter().map(|r| json!({"ruleName": r})).collect::<Vec<_>>(),
        }))
        .expect("detail parse failed")
    }

    #[test]
    fn test_row_count_is_sum_of_rule_counts() {
        let mut store = ReportStore::new();
        store.add_policies(vec![policy("A"), policy("B"), policy("C")]);
        store.add_policy_detail(&detail("A", &["a1", "a2"]));
        store.add_policy_detail(&detail("B", &["b1", "b2", "b3"]));
        store.add_policy_detail(&detail("C", &[]));

        assert_eq!(store.joined_rows().len(), 5);
    }

    #[test]
    fn test_unmatched_rule_is_dropped() {
        let mut store = ReportStore::new();
        store.add_policies(vec![policy("A")]);
        store.add_policy_detail(&detail("A", &["a1"]));
        store.add_policy_detail(&detail("Ghost", &["g1"]));

        let rows = store.joined_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], "A");
    }

    #[test]
    fn test_policy_without_rules_contributes_no_rows() {
        let mut store = ReportStore::new();
        store.add_policies(vec![policy("A"), policy("B")]);
        store.add_policy_detail(&detail("A", &["a1", "a2"]));

        let rows = store.joined_rows();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row[1], "A");
            assert_eq!(row.len(), REPORT_COLUMNS.len());
        }
    }

    #[test]
    fn test_row_order_is_stable() {
        let mut store = ReportStore::new();
        store.add_policies(vec![policy("B"), policy("A")]);
        store.add_policy_detail(&detail("A", &["a1", "a2"]));
        store.add_policy_detail(&detail("B", &["b1"]));

        // Policies in arrival order (B first), rules in arrival order within.
        let names: Vec<&str> = store
            .joined_rows()
            .iter()
            .map(|row| match row[16].as_str() {
                "b1" => "b1",
                "a1" => "a1",
                "a2" => "a2",
                other => panic!("unexpected rule {}", other),
            })
            .collect();
        assert_eq!(names, vec!["b1", "a1", "a2"]);
    }

    #[test]
    fn test_duplicate_descriptions_merge() {
        // Two policies sharing a description both match the same rule records
        let mut store = ReportStore::new();
        store.add_policies(vec![policy("A"), policy("A")]);
        store.add_policy_detail(&detail("A", &["a1"]));

        assert_eq!(store.joined_rows().len(), 2);
    }

    #[test]
    fn test_policy_descriptions_in_arrival_order() {
        let mut store = ReportStore::new();
        store.add_policies(vec![policy("Z"), policy("A"), policy("M")]);
        assert_eq!(store.policy_descriptions(), vec!["Z", "A", "M"]);
    }
}
