//! フォーム検証
//!
//! フィールド単位のルール（必須、メール、数値範囲、パスワード確認）を
//! フォーカスアウト時と送信時に評価する。

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

lazy_static::lazy_static! {
    // ローカル部 @ ドメイン . TLD（空白と@を含まない）
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// フィールド名 → 入力値
pub type FormValues = BTreeMap<String, String>;

/// 検証ルール
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// 前後の空白を除いて空でないこと
    Required,
    Email,
    /// 数値として解釈でき、境界が指定されていれば `[min, max]` に収まること
    Numeric { min: Option<f64>, max: Option<f64> },
    /// 指定フィールドの現在値と完全一致すること（パスワード確認）
    Matches(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(name: &str, rules: Vec<Rule>) -> Self {
        Self { name: name.to_string(), rules }
    }
}

/// フィールドの検証結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidationResult {
    pub valid: bool,
    pub message: Option<String>,
}

impl FieldValidationResult {
    pub fn ok() -> Self {
        Self { valid: true, message: None }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { valid: false, message: Some(message.into()) }
    }
}

/// フォームの送信方法
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    /// 通常のフォームPOST（ページ遷移あり）
    #[default]
    Navigational,
    /// 非同期POST（JSONレスポンス）
    Async,
}

/// 送信時の一括検証結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormReport {
    pub fields: BTreeMap<String, FieldValidationResult>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|r| r.valid)
    }

    /// 不合格のフィールド名とメッセージ
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .filter(|(_, r)| !r.valid)
            .map(|(name, r)| (name.as_str(), r.message.as_deref().unwrap_or("")))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    fields: Vec<FieldSpec>,
    mode: SubmitMode,
}

impl FormValidator {
    pub fn new(fields: Vec<FieldSpec>, mode: SubmitMode) -> Self {
        Self { fields, mode }
    }

    pub fn mode(&self) -> SubmitMode {
        self.mode
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// 入力のたびに再検証するフィールドか（他フィールドとの一致ルールを持つもの）
    pub fn rechecks_on_input(&self, name: &str) -> bool {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .is_some_and(|f| f.rules.iter().any(|r| matches!(r, Rule::Matches(_))))
    }

    /// 単一フィールドを検証する（フォーカスアウト、確認欄の入力ごと）
    pub fn validate_field(&self, name: &str, values: &FormValues) -> Result<FieldValidationResult> {
        let spec = self
            .fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;
        Ok(check_field(spec, values))
    }

    /// 全フィールドを再検証する（送信時）
    pub fn validate_all(&self, values: &FormValues) -> FormReport {
        let fields = self
            .fields
            .iter()
            .map(|spec| (spec.name.clone(), check_field(spec, values)))
            .collect();
        FormReport { fields }
    }
}

fn check_field(spec: &FieldSpec, values: &FormValues) -> FieldValidationResult {
    let value = values.get(&spec.name).map(String::as_str).unwrap_or("");
    for rule in &spec.rules {
        if let Some(message) = check_rule(rule, value, values) {
            return FieldValidationResult::fail(message);
        }
    }
    FieldValidationResult::ok()
}

/// ルール違反ならメッセージを返す。必須以外のルールは空欄を対象外とする
fn check_rule(rule: &Rule, value: &str, values: &FormValues) -> Option<String> {
    let trimmed = value.trim();
    match rule {
        Rule::Required => trimmed.is_empty().then(|| "This field is required".to_string()),
        Rule::Email => (!trimmed.is_empty() && !is_valid_email(trimmed))
            .then(|| "Please enter a valid email address".to_string()),
        Rule::Numeric { min, max } => {
            if trimmed.is_empty() {
                return None;
            }
            let number = match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => n,
                _ => return Some("Please enter a valid number".to_string()),
            };
            if let Some(min) = min {
                if number < *min {
                    return Some(format!("Value must be at least {}", min));
                }
            }
            if let Some(max) = max {
                if number > *max {
                    return Some(format!("Value must be at most {}", max));
                }
            }
            None
        }
        Rule::Matches(other) => {
            let expected = values.get(other).map(String::as_str).unwrap_or("");
            (value != expected).then(|| "Passwords do not match".to_string())
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn signup_form() -> FormValidator {
        FormValidator::new(
            vec![
                FieldSpec::new("email", vec![Rule::Required, Rule::Email]),
                FieldSpec::new("stock", vec![Rule::Numeric { min: Some(0.0), max: Some(500.0) }]),
                FieldSpec::new("password", vec![Rule::Required]),
                FieldSpec::new("confirm_password", vec![Rule::Matches("password".into())]),
            ],
            SubmitMode::Async,
        )
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("priya@example.in"));
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("priya@example"));
        assert!(!is_valid_email("priya example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@@b.com"));
    }

    #[test]
    fn test_required_trims() {
        let form = signup_form();
        let result = form.validate_field("email", &values(&[("email", "   ")])).unwrap();
        assert!(!result.valid);
        assert_eq!(result.message.as_deref(), Some("This field is required"));
    }

    #[test]
    fn test_numeric_bounds_inclusive() {
        let form = signup_form();
        for ok in ["0", "500", "42.5"] {
            assert!(form.validate_field("stock", &values(&[("stock", ok)])).unwrap().valid, "{}", ok);
        }
        let low = form.validate_field("stock", &values(&[("stock", "-1")])).unwrap();
        assert_eq!(low.message.as_deref(), Some("Value must be at least 0"));
        let high = form.validate_field("stock", &values(&[("stock", "501")])).unwrap();
        assert_eq!(high.message.as_deref(), Some("Value must be at most 500"));
        let nan = form.validate_field("stock", &values(&[("stock", "ten")])).unwrap();
        assert_eq!(nan.message.as_deref(), Some("Please enter a valid number"));
    }

    #[test]
    fn test_password_confirmation_exact_match() {
        let form = signup_form();
        let mismatch = values(&[("password", "secret1"), ("confirm_password", "secret")]);
        assert!(!form.validate_field("confirm_password", &mismatch).unwrap().valid);

        let padded = values(&[("password", "secret1"), ("confirm_password", "secret1 ")]);
        assert!(!form.validate_field("confirm_password", &padded).unwrap().valid);

        let matching = values(&[("password", "secret1"), ("confirm_password", "secret1")]);
        assert!(form.validate_field("confirm_password", &matching).unwrap().valid);
    }

    #[test]
    fn test_validate_all_reports_every_failure() {
        let form = signup_form();
        let report = form.validate_all(&values(&[
            ("email", "not-an-email"),
            ("stock", "12"),
            ("password", ""),
            ("confirm_password", "x"),
        ]));
        assert!(!report.is_valid());
        let failing: Vec<&str> = report.failures().into_iter().map(|(name, _)| name).collect();
        assert_eq!(failing, vec!["confirm_password", "email", "password"]);
    }

    #[test]
    fn test_valid_form() {
        let form = signup_form();
        let report = form.validate_all(&values(&[
            ("email", "priya@example.in"),
            ("password", "secret1"),
            ("confirm_password", "secret1"),
        ]));
        assert!(report.is_valid());
        assert!(report.failures().is_empty());
    }

    #[test]
    fn test_rechecks_on_input_only_for_confirmation() {
        let form = signup_form();
        assert!(form.rechecks_on_input("confirm_password"));
        assert!(!form.rechecks_on_input("password"));
        assert!(!form.rechecks_on_input("missing"));
    }

    #[test]
    fn test_unknown_field() {
        let form = signup_form();
        assert!(matches!(
            form.validate_field("phone", &FormValues::new()),
            Err(Error::UnknownField(_))
        ));
    }
}
