//! Options controlling how documents are merged.

/// Options for [`merge`](super::merge).
///
/// Empty fields mean "no override" / "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// ID for the merged document. Derived from the inputs when `None`.
    pub document_id: Option<String>,
    /// Author of the merged document
    pub author: String,
    /// Role of the author
    pub author_role: String,
    /// Only keep statements about these products
    pub products: Vec<String>,
    /// Only keep statements about these vulnerabilities
    pub vulnerabilities: Vec<String>,
}

impl MergeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    #[must_use]
    pub fn author_role(mut self, role: impl Into<String>) -> Self {
        self.author_role = role.into();
        self
    }

    /// Restrict the merge to statements naming one of `products`.
    #[must_use]
    pub fn products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict the merge to statements about one of `vulnerabilities`.
    #[must_use]
    pub fn vulnerabilities<I, S>(mut self, vulnerabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vulnerabilities = vulnerabilities.into_iter().map(Into::into).collect();
        self
    }

    /// True if any product or vulnerability filter is set.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        !self.products.is_empty() || !self.vulnerabilities.is_empty()
    }
}
