use serde::Serialize;
use thiserror::Error;

use crate::key::NodeKey;

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
pub enum ModelError {
    #[error("duplicate sibling key '{key}'")]
    DuplicateKey { key: NodeKey },
}
