pub mod emit;
pub mod enumerate;
pub mod keys;
pub mod method;
pub mod records;
pub mod security;
pub mod shape;

use indexmap::IndexMap;

use crate::config::{CatalogConfig, DEFAULT_RESPONSE_CODES};
use crate::paging::PagingType;

pub use emit::emit_files;
pub use enumerate::{CatalogContext, build_catalog};
pub use keys::KeyMatching;
pub use method::HttpMethod;
pub use records::{CollisionRecord, OperationRecord, PagingRecord, ParameterRecord};

/// Options controlling catalog derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogOptions {
    pub key_matching: KeyMatching,
    /// Response codes scanned in order for the paging schema.
    pub response_codes: Vec<String>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            key_matching: KeyMatching::default(),
            response_codes: DEFAULT_RESPONSE_CODES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl From<&CatalogConfig> for CatalogOptions {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            key_matching: config.key_matching,
            response_codes: config.response_codes.clone(),
        }
    }
}

/// The derived catalog, every map keyed by catalog key in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub operations: IndexMap<String, OperationRecord>,
    pub paging: IndexMap<String, PagingRecord>,
    pub collisions: IndexMap<String, CollisionRecord>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of operations per paging type, in tag order, zero counts omitted.
    pub fn paging_histogram(&self) -> IndexMap<PagingType, usize> {
        let mut histogram: IndexMap<PagingType, usize> = PagingType::ALL
            .into_iter()
            .map(|t| (t, 0))
            .collect();
        for record in self.paging.values() {
            *histogram.entry(record.paging_type).or_default() += 1;
        }
        histogram.retain(|_, count| *count > 0);
        histogram
    }

    /// Number of paging records whose values came from the override registry.
    pub fn override_count(&self) -> usize {
        self.paging.values().filter(|p| p.override_applied).count()
    }
}
