//! VEX statements: one status for one vulnerability over a set of products.

use super::product::Product;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Exploitability status of a product with respect to a vulnerability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NotAffected,
    Affected,
    Fixed,
    UnderInvestigation,
}

impl Status {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotAffected => "not_affected",
            Self::Affected => "affected",
            Self::Fixed => "fixed",
            Self::UnderInvestigation => "under_investigation",
        }
    }

    /// Statuses that cancel a finding for the vulnerability.
    #[must_use]
    pub const fn resolves_finding(&self) -> bool {
        matches!(self, Self::NotAffected | Self::Fixed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_affected" => Ok(Self::NotAffected),
            "affected" => Ok(Self::Affected),
            "fixed" => Ok(Self::Fixed),
            "under_investigation" => Ok(Self::UnderInvestigation),
            other => Err(format!("invalid VEX status '{other}'")),
        }
    }
}

/// Justification for a `not_affected` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justification {
    ComponentNotPresent,
    VulnerableCodeNotPresent,
    VulnerableCodeNotInExecutePath,
    VulnerableCodeCannotBeControlledByAdversary,
    InlineMitigationsAlreadyExist,
}

/// The vulnerability a statement is about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl Vulnerability {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True if `id` is the vulnerability name, its `@id` or one of its aliases.
    #[must_use]
    pub fn matches(&self, id: &str) -> bool {
        self.name == id
            || self.id.as_deref() == Some(id)
            || self.aliases.iter().any(|alias| alias == id)
    }
}

/// A single VEX statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub vulnerability: Vulnerability,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,

    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<Justification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_statement: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_statement: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_statement_timestamp: Option<DateTime<Utc>>,
}

impl Statement {
    /// Create a statement with no products and no timestamp.
    pub fn new(vulnerability: impl Into<String>, status: Status) -> Self {
        Self {
            id: None,
            vulnerability: Vulnerability::new(vulnerability),
            timestamp: None,
            last_updated: None,
            products: Vec::new(),
            status,
            supplier: None,
            status_notes: None,
            justification: None,
            impact_statement: None,
            action_statement: None,
            action_statement_timestamp: None,
        }
    }

    #[must_use]
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// True if any product's `@id` or identifier value equals `product_id`.
    #[must_use]
    pub fn matches_product(&self, product_id: &str) -> bool {
        self.products.iter().any(|p| p.matches(product_id))
    }

    /// Statement timestamp, falling back to the enclosing document's.
    #[must_use]
    pub fn effective_timestamp(
        &self,
        document_timestamp: Option<DateTime<Utc>>,
    ) -> Option<DateTime<Utc>> {
        self.timestamp.or(document_timestamp)
    }

    fn first_product_key(&self) -> &str {
        self.products
            .iter()
            .find_map(|p| p.primary_key())
            .unwrap_or("")
    }
}

/// Total order over statements: effective timestamp ascending (undated
/// first), then vulnerability name, status and first product key.
///
/// Statements equal on all of those are ordered by `@id` and finally by
/// their JSON form, so only identical statements compare equal.
#[must_use]
pub fn compare_statements(
    a: &Statement,
    b: &Statement,
    document_timestamp: Option<DateTime<Utc>>,
) -> Ordering {
    a.effective_timestamp(document_timestamp)
        .cmp(&b.effective_timestamp(document_timestamp))
        .then_with(|| a.vulnerability.name.cmp(&b.vulnerability.name))
        .then_with(|| a.status.cmp(&b.status))
        .then_with(|| a.first_product_key().cmp(b.first_product_key()))
        .then_with(|| a.id.cmp(&b.id))
        .then_with(|| canonical_json(a).cmp(&canonical_json(b)))
}

fn canonical_json(statement: &Statement) -> String {
    serde_json::to_string(statement).unwrap_or_default()
}

/// Sort statements in place so the most recent ones come last.
///
/// Only identical statements compare equal, so the result does not depend
/// on the input order.
pub fn sort_statements(statements: &mut [Statement], document_timestamp: Option<DateTime<Utc>>) {
    statements.sort_by(|a, b| compare_statements(a, b, document_timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0).single().expect("valid date")
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&Status::NotAffected).expect("serialize"),
            "\"not_affected\""
        );
        let parsed: Status = serde_json::from_str("\"under_investigation\"").expect("parse");
        assert_eq!(parsed, Status::UnderInvestigation);
        assert!(serde_json::from_str::<Status>("\"unknown\"").is_err());
        assert_eq!("fixed".parse::<Status>(), Ok(Status::Fixed));
    }

    #[test]
    fn test_resolves_finding() {
        assert!(Status::NotAffected.resolves_finding());
        assert!(Status::Fixed.resolves_finding());
        assert!(!Status::Affected.resolves_finding());
        assert!(!Status::UnderInvestigation.resolves_finding());
    }

    #[test]
    fn test_vulnerability_alias_match() {
        let mut vuln = Vulnerability::new("CVE-2021-44228");
        vuln.aliases.push("GHSA-jfh8-c2jp-5v3q".to_string());
        assert!(vuln.matches("CVE-2021-44228"));
        assert!(vuln.matches("GHSA-jfh8-c2jp-5v3q"));
        assert!(!vuln.matches("CVE-2021-45046"));
    }

    #[test]
    fn test_sort_by_timestamp_then_name() {
        let mut statements = vec![
            Statement::new("CVE-B", Status::Affected).with_timestamp(ts(3)),
            Statement::new("CVE-B", Status::Fixed).with_timestamp(ts(1)),
            Statement::new("CVE-A", Status::Affected).with_timestamp(ts(3)),
            Statement::new("CVE-C", Status::Affected),
        ];
        sort_statements(&mut statements, Some(ts(2)));

        let order: Vec<_> = statements
            .iter()
            .map(|s| (s.vulnerability.name.as_str(), s.status))
            .collect();
        assert_eq!(
            order,
            vec![
                ("CVE-B", Status::Fixed),
                ("CVE-C", Status::Affected),
                ("CVE-A", Status::Affected),
                ("CVE-B", Status::Affected),
            ]
        );
    }

    #[test]
    fn test_undated_statements_sort_first() {
        let mut statements = vec![
            Statement::new("CVE-1", Status::Affected).with_timestamp(ts(1)),
            Statement::new("CVE-2", Status::Affected),
        ];
        sort_statements(&mut statements, None);
        assert_eq!(statements[0].vulnerability.name, "CVE-2");
    }

    #[test]
    fn test_sort_breaks_ties_on_remaining_fields() {
        let mut component = Statement::new("CVE-1", Status::NotAffected).with_timestamp(ts(3));
        component.justification = Some(Justification::ComponentNotPresent);
        let mut mitigated = component.clone();
        mitigated.justification = Some(Justification::InlineMitigationsAlreadyExist);

        assert_ne!(compare_statements(&component, &mitigated, None), Ordering::Equal);
        assert_eq!(
            compare_statements(&component, &mitigated, None),
            compare_statements(&mitigated, &component, None).reverse()
        );

        let mut forward = vec![component.clone(), mitigated.clone()];
        let mut backward = vec![mitigated.clone(), component.clone()];
        sort_statements(&mut forward, None);
        sort_statements(&mut backward, None);
        assert_eq!(forward, backward);

        let mut first = component.clone();
        first.id = Some("https://example.com/stmt/1".to_string());
        let mut second = mitigated;
        second.id = Some("https://example.com/stmt/2".to_string());
        assert_eq!(compare_statements(&first, &second, None), Ordering::Less);
        assert_eq!(compare_statements(&component, &component.clone(), None), Ordering::Equal);
    }
}
