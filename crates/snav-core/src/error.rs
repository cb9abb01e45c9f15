use snav_catalog::CatalogError;
use snav_catalog::CategoryId;
use snav_model::ModelError;
use thiserror::Error;

/// A failed build.
///
/// Only two things abort a build: reference data that cannot be stitched
/// into a tree, and the catalog backend going away. Enrolment, visibility
/// and permission outcomes are ordinary data and never surface here.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("category {category} has an unresolvable parent chain: {reason}")]
    Structure {
        category: CategoryId,
        reason: String,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
