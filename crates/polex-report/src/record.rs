use serde::Deserialize;
use serde_json::Value;

/// Columns contributed by the policy-list endpoint, in report order.
pub const POLICY_COLUMNS: [&str; 9] = [
    "id",
    "policy_description",
    "policy_category",
    "policy_baseline",
    "log_flat",
    "rules_on_flat",
    "selective_audit_trail",
    "audit_pattern",
    "policy_level",
];

/// Columns contributed by the rule-list endpoint, in report order.
pub const RULE_COLUMNS: [&str; 15] = [
    "policyName",
    "policyType",
    "category",
    "installed",
    "logFlat",
    "rulesOnFlat",
    "auditPattern",
    "ruleName",
    "ruleType",
    "ruleLevel",
    "severity",
    "continueToNextRule",
    "parameters",
    "actions",
    "policyLevel",
];

/// Full report header: all policy columns followed by all rule columns.
pub const REPORT_COLUMNS: [&str; 24] = [
    "id",
    "policy_description",
    "policy_category",
    "policy_baseline",
    "log_flat",
    "rules_on_flat",
    "selective_audit_trail",
    "audit_pattern",
    "policy_level",
    "policyName",
    "policyType",
    "category",
    "installed",
    "logFlat",
    "rulesOnFlat",
    "auditPattern",
    "ruleName",
    "ruleType",
    "ruleLevel",
    "severity",
    "continueToNextRule",
    "parameters",
    "actions",
    "policyLevel",
];

/// Policy as returned by the policy-list endpoint.
///
/// The appliance is loose about field types (numbers, strings and booleans all
/// appear), so fields are kept as raw JSON values and rendered on export.
/// A field the appliance omits renders as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub id: Option<Value>,
    pub policy_description: Option<Value>,
    pub policy_category: Option<Value>,
    pub policy_baseline: Option<Value>,
    pub log_flat: Option<Value>,
    pub rules_on_flat: Option<Value>,
    pub selective_audit_trail: Option<Value>,
    pub audit_pattern: Option<Value>,
    pub policy_level: Option<Value>,
}

impl Policy {
    /// Join key: the rendered policy description.
    pub fn description(&self) -> String {
        render_value(self.policy_description.as_ref())
    }

    /// Rendered fields in `POLICY_COLUMNS` order.
    pub fn fields(&self) -> Vec<String> {
        vec![
            render_value(self.id.as_ref()),
            render_value(self.policy_description.as_ref()),
            render_value(self.policy_category.as_ref()),
            render_value(self.policy_baseline.as_ref()),
            render_value(self.log_flat.as_ref()),
            render_value(self.rules_on_flat.as_ref()),
            render_value(self.selective_audit_trail.as_ref()),
            render_value(self.audit_pattern.as_ref()),
            render_value(self.policy_level.as_ref()),
        ]
    }
}

/// Single policy object returned by the per-policy rule-list endpoint.
///
/// The endpoint repeats the policy header attributes and nests the rules
/// under `rules`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyDetail {
    pub policy_name: Option<Value>,
    pub policy_type: Option<Value>,
    pub category: Option<Value>,
    pub installed: Option<Value>,
    pub log_flat: Option<Value>,
    pub rules_on_flat: Option<Value>,
    pub audit_pattern: Option<Value>,
    pub policy_level: Option<Value>,
    pub rules: Vec<RuleInfo>,
}

/// One rule inside a `PolicyDetail`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleInfo {
    pub rule_name: Option<Value>,
    pub rule_type: Option<Value>,
    pub rule_level: Option<Value>,
    pub severity: Option<Value>,
    pub continue_to_next_rule: Option<Value>,
    pub parameters: Option<Value>,
    pub actions: Option<Value>,
}

/// Flattened rule-side record: one rule with its policy header attributes
/// already rendered to text. Keyed by `policy_name` for the join.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRecord {
    pub policy_name: String,
    pub policy_type: String,
    pub category: String,
    pub installed: String,
    pub log_flat: String,
    pub rules_on_flat: String,
    pub audit_pattern: String,
    pub rule_name: String,
    pub rule_type: String,
    pub rule_level: String,
    pub severity: String,
    pub continue_to_next_rule: String,
    pub parameters: String,
    pub actions: String,
    pub policy_level: String,
}

impl RuleRecord {
    /// Combine a policy header with one of its rules.
    pub fn from_detail(detail: &PolicyDetail, rule: &RuleInfo) -> Self {
        RuleRecord {
            policy_name: render_value(detail.policy_name.as_ref()),
            policy_type: render_value(detail.policy_type.as_ref()),
            category: render_value(detail.category.as_ref()),
            installed: render_value(detail.installed.as_ref()),
            log_flat: render_value(detail.log_flat.as_ref()),
            rules_on_flat: render_value(detail.rules_on_flat.as_ref()),
            audit_pattern: render_value(detail.audit_pattern.as_ref()),
            rule_name: render_value(rule.rule_name.as_ref()),
            rule_type: render_value(rule.rule_type.as_ref()),
            rule_level: render_value(rule.rule_level.as_ref()),
            severity: render_value(rule.severity.as_ref()),
            continue_to_next_rule: render_value(rule.continue_to_next_rule.as_ref()),
            parameters: render_structured(rule.parameters.as_ref()),
            actions: render_structured(rule.actions.as_ref()),
            policy_level: render_value(detail.policy_level.as_ref()),
        }
    }

    /// Rendered fields in `RULE_COLUMNS` order.
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.policy_name.clone(),
            self.policy_type.clone(),
            self.category.clone(),
            self.installed.clone(),
            self.log_flat.clone(),
            self.rules_on_flat.clone(),
            self.audit_pattern.clone(),
            self.rule_name.clone(),
            self.rule_type.clone(),
            self.rule_level.clone(),
            self.severity.clone(),
            self.continue_to_next_rule.clone(),
            self.parameters.clone(),
            self.actions.clone(),
            self.policy_level.clone(),
        ]
    }
}

/// Render a scalar field for CSV export.
///
/// Missing/null values render empty, booleans render as the literal strings
/// `true`/`false` (never a native boolean token), strings pass through
/// unquoted, anything else falls back to compact JSON.
pub fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(b)) => {
            if *b {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Render a structured field (`parameters`, `actions`) for CSV export.
///
/// Pretty-printed JSON; nested key order is preserved, not re-sorted
/// (serde_json `preserve_order`).
pub fn render_structured(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_scalar_values() {
        assert_eq!(render_value(None), "");
        assert_eq!(render_value(Some(&Value::Null)), "");
        assert_eq!(render_value(Some(&json!(true))), "true");
        assert_eq!(render_value(Some(&json!(false))), "false");
        assert_eq!(render_value(Some(&json!("LOG FULL DETAILS"))), "LOG FULL DETAILS");
        assert_eq!(render_value(Some(&json!(42))), "42");
    }

    #[test]
    fn test_render_structured_preserves_key_order() {
        let params = json!({"zeta": "1", "alpha": {"nested": true}});
        let rendered = render_structured(Some(&params));

        let zeta = rendered.find("zeta").expect("zeta missing");
        let alpha = rendered.find("alpha").expect("alpha missing");
        assert!(zeta < alpha, "insertion order not preserved: {}", rendered);
        assert_eq!(render_structured(None), "");
    }

    #[test]
    fn test_policy_parse_with_missing_fields() {
        let policy: Policy = serde_json::from_value(json!({
            "id": 3,
            "policy_description": "Default - Ignore Data Activity",
        }))
        .expect("parse failed");

        assert_eq!(policy.description(), "Default - Ignore Data Activity");
        let fields = policy.fields();
        assert_eq!(fields.len(), POLICY_COLUMNS.len());
        assert_eq!(fields[0], "3");
        assert_eq!(fields[2], "", "missing category should render empty");
    }

    #[test]
    fn test_rule_record_from_detail() {
        let detail: PolicyDetail = serde_json::from_value(json!({
            "policyName": "Audit Policy",
            "policyType": "DAM",
            "installed": true,
            "logFlat": false,
            "policyLevel": 2,
            "rules": [{
                "ruleName": "Block admin logins",
                "severity": "HIGH",
                "continueToNextRule": false,
                "parameters": [{"name": "DB_USER", "values": ["admin"]}],
            }]
        }))
        .expect("parse failed");

        let record = RuleRecord::from_detail(&detail, &detail.rules[0]);
        assert_eq!(record.policy_name, "Audit Policy");
        assert_eq!(record.installed, "true");
        assert_eq!(record.log_flat, "false");
        assert_eq!(record.continue_to_next_rule, "false");
        assert_eq!(record.policy_level, "2");
        assert_eq!(record.rule_type, "", "missing ruleType should render empty");
        assert!(record.parameters.contains("DB_USER"));
        assert_eq!(record.fields().len(), RULE_COLUMNS.len());
    }

    #[test]
    fn test_report_columns_are_policy_then_rule() {
        assert_eq!(REPORT_COLUMNS.len(), POLICY_COLUMNS.len() + RULE_COLUMNS.len());
        assert_eq!(&REPORT_COLUMNS[..POLICY_COLUMNS.len()], &POLICY_COLUMNS[..]);
        assert_eq!(&REPORT_COLUMNS[POLICY_COLUMNS.len()..], &RULE_COLUMNS[..]);
    }
}
