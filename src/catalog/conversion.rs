use super::primitive::Catalog;
use crate::error::CatalogConversionError;

/// A trait for custom catalog payloads that can be converted into a `Catalog`.
///
/// Implement it on whatever structs your catalog service returns so the schema
/// builder can consume them without knowing their shape.
///
/// # Example
///
/// ```rust
/// use blockbot::catalog::{Catalog, IntoCatalog, Primitive};
/// use blockbot::error::CatalogConversionError;
///
/// struct Motion { label: String, id: String }
/// struct MyCatalog { motions: Vec<Motion> }
///
/// impl IntoCatalog for MyCatalog {
///     fn into_catalog(self) -> Result<Catalog, CatalogConversionError> {
///         Ok(Catalog {
///             actions: self
///                 .motions
///                 .into_iter()
///                 .map(|m| Primitive::new(m.label, m.id))
///                 .collect(),
///             ..Catalog::default()
///         })
///     }
/// }
/// ```
pub trait IntoCatalog {
    /// Consumes the object and converts it into the four primitive collections.
    fn into_catalog(self) -> Result<Catalog, CatalogConversionError>;
}

impl IntoCatalog for Catalog {
    fn into_catalog(self) -> Result<Catalog, CatalogConversionError> {
        Ok(self)
    }
}
