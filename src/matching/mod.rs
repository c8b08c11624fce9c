//! Product identifiers: image references, purls and the product index.
//!
//! [`list_document_products`] flattens the products a document mentions into
//! [`ProductRef`]s, and [`normalize_products`] sorts those into container
//! images, hashed artifacts and references that cannot be attested.

mod image;
mod index;
mod purl;

pub use image::{is_image_reference, parse_image_reference};
pub use index::{list_document_products, ProductRef};
pub use purl::{normalize_products, oci_purl_to_reference, NormalizedProducts};
