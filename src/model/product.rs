//! Products and their identifiers.
//!
//! A product is the artifact a statement talks about. It can be named by a
//! plain `@id`, by typed identifiers (purl, CPE) and/or by content hashes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Hash algorithms recognized in OpenVEX product hashes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2s256,
    Blake2b256,
    Blake2b512,
    Other(String),
}

impl HashAlgorithm {
    /// The OpenVEX spelling of the algorithm, e.g. `sha-256`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha-256",
            Self::Sha384 => "sha-384",
            Self::Sha512 => "sha-512",
            Self::Sha3_224 => "sha3-224",
            Self::Sha3_256 => "sha3-256",
            Self::Sha3_384 => "sha3-384",
            Self::Sha3_512 => "sha3-512",
            Self::Blake2s256 => "blake2s-256",
            Self::Blake2b256 => "blake2b-256",
            Self::Blake2b512 => "blake2b-512",
            Self::Other(s) => s,
        }
    }

    /// The in-toto digest key for this algorithm (`sha256`, `sha3-512`, ...).
    ///
    /// in-toto subjects spell the SHA-2 family without the dash.
    #[must_use]
    pub fn digest_key(&self) -> String {
        match self {
            Self::Sha256 => "sha256".to_string(),
            Self::Sha384 => "sha384".to_string(),
            Self::Sha512 => "sha512".to_string(),
            other => other.as_str().to_string(),
        }
    }
}

impl From<String> for HashAlgorithm {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Self::Md5,
            "sha1" | "sha-1" => Self::Sha1,
            "sha-256" | "sha256" => Self::Sha256,
            "sha-384" | "sha384" => Self::Sha384,
            "sha-512" | "sha512" => Self::Sha512,
            "sha3-224" => Self::Sha3_224,
            "sha3-256" => Self::Sha3_256,
            "sha3-384" => Self::Sha3_384,
            "sha3-512" => Self::Sha3_512,
            "blake2s-256" => Self::Blake2s256,
            "blake2b-256" => Self::Blake2b256,
            "blake2b-512" => Self::Blake2b512,
            _ => Self::Other(s),
        }
    }
}

impl From<HashAlgorithm> for String {
    fn from(algo: HashAlgorithm) -> Self {
        algo.as_str().to_string()
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed product identifier keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IdentifierType {
    Purl,
    Cpe22,
    Cpe23,
    Other(String),
}

impl IdentifierType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Purl => "purl",
            Self::Cpe22 => "cpe22",
            Self::Cpe23 => "cpe23",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for IdentifierType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "purl" => Self::Purl,
            "cpe22" => Self::Cpe22,
            "cpe23" => Self::Cpe23,
            _ => Self::Other(s),
        }
    }
}

impl From<IdentifierType> for String {
    fn from(t: IdentifierType) -> Self {
        t.as_str().to_string()
    }
}

/// Map of hash algorithm to hex digest.
pub type Hashes = BTreeMap<HashAlgorithm, String>;

/// A software component: a product or one of its subcomponents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Plain identifier (IRI, purl, image reference...)
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Typed identifiers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub identifiers: BTreeMap<IdentifierType, String>,

    /// Content hashes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hashes: Hashes,
}

impl Component {
    /// Create a component named by a plain ID.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Create a component named by a package URL identifier.
    pub fn with_purl(purl: impl Into<String>) -> Self {
        let mut component = Self::default();
        component
            .identifiers
            .insert(IdentifierType::Purl, purl.into());
        component
    }

    /// Add a hash, replacing any previous value for the algorithm.
    #[must_use]
    pub fn hash(mut self, algorithm: HashAlgorithm, value: impl Into<String>) -> Self {
        self.hashes.insert(algorithm, value.into());
        self
    }

    /// The package URL identifier, if any.
    #[must_use]
    pub fn purl(&self) -> Option<&str> {
        self.identifiers
            .get(&IdentifierType::Purl)
            .map(String::as_str)
    }

    /// True if `identifier` equals the `@id` or any typed identifier value.
    ///
    /// Exact string comparison; normalization happens elsewhere.
    #[must_use]
    pub fn matches(&self, identifier: &str) -> bool {
        self.id.as_deref() == Some(identifier)
            || self.identifiers.values().any(|v| v == identifier)
    }

    /// First comparable key of the component, used for ordering ties.
    #[must_use]
    pub fn primary_key(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or_else(|| self.purl())
            .or_else(|| self.identifiers.values().next().map(String::as_str))
            .or_else(|| self.hashes.values().next().map(String::as_str))
    }
}

/// A product under assessment, optionally listing affected subcomponents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub component: Component,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcomponents: Vec<Component>,
}

impl Product {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self::from(Component::with_id(id))
    }

    pub fn with_purl(purl: impl Into<String>) -> Self {
        Self::from(Component::with_purl(purl))
    }

    #[must_use]
    pub fn hash(mut self, algorithm: HashAlgorithm, value: impl Into<String>) -> Self {
        self.component = self.component.hash(algorithm, value);
        self
    }
}

impl From<Component> for Product {
    fn from(component: Component) -> Self {
        Self {
            component,
            subcomponents: Vec::new(),
        }
    }
}

impl std::ops::Deref for Product {
    type Target = Component;

    fn deref(&self) -> &Self::Target {
        &self.component
    }
}
