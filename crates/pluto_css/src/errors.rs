//! Error surface of the css crate. Parsing itself never fails; these show
//! up at the embedding seams (strict parse mode, resource plumbing).

use pluto_shared::byte_stream::Location;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error: {0} at {1:?}")]
    Parse(String, Location),

    #[error("css failure: {0}")]
    CssFailure(String),
}
