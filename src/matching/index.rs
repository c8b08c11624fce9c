//! Product index: the distinct products a document talks about.
//!
//! Walks every statement's products and flattens them into [`ProductRef`]s,
//! one per identifier string, carrying the hashes seen for it. When the same
//! identifier shows up more than once, the last occurrence in document order
//! decides its hashes. Output is sorted by name so callers get the same list
//! regardless of statement order.

use crate::error::{Result, VexError};
use crate::model::{Hashes, Product, VexDocument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A flattened product reference: one identifier and its known hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub name: String,
    #[serde(default)]
    pub hashes: Hashes,
}

impl ProductRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hashes: Hashes::new(),
        }
    }

    #[must_use]
    pub fn with_hashes(mut self, hashes: Hashes) -> Self {
        self.hashes = hashes;
        self
    }
}

/// List every distinct product referenced in `doc`, sorted by name.
///
/// Fails with [`VexError::MissingDocument`] when no document is given.
pub fn list_document_products(doc: Option<&VexDocument>) -> Result<Vec<ProductRef>> {
    let doc = doc.ok_or(VexError::MissingDocument)?;

    let mut inventory: BTreeMap<String, Hashes> = BTreeMap::new();
    for stmt in &doc.statements {
        for product in &stmt.products {
            for key in product_keys(product) {
                inventory.insert(key, product.hashes.clone());
            }
        }
    }

    Ok(inventory
        .into_iter()
        .map(|(name, hashes)| ProductRef { name, hashes })
        .collect())
}

/// Identifier strings a product is indexed under.
///
/// `@id` first; then the purl identifier; then every other identifier; and
/// only when nothing names the product, its hash values.
fn product_keys(product: &Product) -> Vec<String> {
    if let Some(id) = product.id.as_deref().filter(|id| !id.is_empty()) {
        return vec![id.to_string()];
    }
    if !product.identifiers.is_empty() {
        if let Some(purl) = product.purl() {
            return vec![purl.to_string()];
        }
        return product.identifiers.values().cloned().collect();
    }
    product.hashes.values().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, HashAlgorithm, IdentifierType, Statement, Status};

    fn doc_with(statements: Vec<Statement>) -> VexDocument {
        let mut doc = VexDocument::new();
        doc.statements = statements;
        doc
    }

    #[test]
    fn test_missing_document() {
        assert!(matches!(
            list_document_products(None),
            Err(VexError::MissingDocument)
        ));
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        let doc = doc_with(vec![
            Statement::new("CVE-1", Status::Fixed)
                .with_product(Product::with_id("pkg:npm/zeta@1.0.0"))
                .with_product(Product::with_id("pkg:npm/alpha@1.0.0")),
            Statement::new("CVE-2", Status::Affected)
                .with_product(Product::with_id("pkg:npm/alpha@1.0.0")),
        ]);

        let products = list_document_products(Some(&doc)).expect("list");
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["pkg:npm/alpha@1.0.0", "pkg:npm/zeta@1.0.0"]);
        assert!(products.iter().all(|p| p.hashes.is_empty()));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let doc = doc_with(vec![
            Statement::new("CVE-1", Status::Fixed).with_product(
                Product::with_id("app").hash(HashAlgorithm::Sha256, "first"),
            ),
            Statement::new("CVE-2", Status::Fixed).with_product(
                Product::with_id("app").hash(HashAlgorithm::Sha512, "second"),
            ),
        ]);

        let products = list_document_products(Some(&doc)).expect("list");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].hashes.len(), 1);
        assert_eq!(
            products[0].hashes.get(&HashAlgorithm::Sha512),
            Some(&"second".to_string())
        );
    }

    #[test]
    fn test_key_precedence() {
        let mut with_both = Component::with_purl("pkg:npm/leftpad@1.0.0");
        with_both
            .identifiers
            .insert(IdentifierType::Cpe23, "cpe:2.3:a:leftpad".to_string());

        let mut cpe_only = Component::default();
        cpe_only
            .identifiers
            .insert(IdentifierType::Cpe22, "cpe:/a:vendor:thing".to_string());
        cpe_only
            .identifiers
            .insert(IdentifierType::Cpe23, "cpe:2.3:a:vendor:thing".to_string());

        let hash_only = Component::default()
            .hash(HashAlgorithm::Sha256, "aaaa")
            .hash(HashAlgorithm::Sha1, "bbbb");

        let doc = doc_with(vec![Statement::new("CVE-1", Status::Affected)
            .with_product(Product::from(with_both))
            .with_product(Product::from(cpe_only))
            .with_product(Product::from(hash_only))]);

        let names: Vec<_> = list_document_products(Some(&doc))
            .expect("list")
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "aaaa",
                "bbbb",
                "cpe:/a:vendor:thing",
                "cpe:2.3:a:vendor:thing",
                "pkg:npm/leftpad@1.0.0",
            ]
        );
    }

    #[test]
    fn test_order_independent_of_statement_order() {
        let a = Statement::new("CVE-1", Status::Fixed).with_product(Product::with_id("b"));
        let b = Statement::new("CVE-2", Status::Fixed).with_product(Product::with_id("a"));

        let first = list_document_products(Some(&doc_with(vec![a.clone(), b.clone()])))
            .expect("list");
        let second = list_document_products(Some(&doc_with(vec![b, a]))).expect("list");
        assert_eq!(first, second);
    }
}
