//! Built-in ingress steps.
//!
//! | Step | Name | Purpose |
//! |------|------|---------|
//! | [`BodyDecode`] | `body_decode` | Decode the body with the negotiated codec |
//! | [`QueryDecode`] | `query_decode` | Decode the query string with a decoder factory |
//! | [`ValidateStep`] | `validate` | Run a validator inside the chain |

mod body;
mod query;
mod validate;

pub use body::{BodyDecode, DEFAULT_MAX_BODY_BYTES};
pub use query::QueryDecode;
pub use validate::ValidateStep;
