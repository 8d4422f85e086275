//! Page signal module
//!
//! Turns server-delivered HTML and response headers into the discrete,
//! independently computable observations the scorers work from:
//! - Robots directives from meta tags and the `X-Robots-Tag` header
//! - Title, meta description, canonical link, H1, `lang`
//! - Structured data presence (JSON-LD or microdata)
//! - Text-to-markup ratio of the static HTML
//! - Soft-404, paywall and anti-bot hints, security headers
//!
//! Extraction does no I/O and never fails.

mod extract;
pub mod text;
mod types;

pub use extract::{extract, PageSignalExtractor};
pub use types::{
    FetchContext, PageSignals, SignalSet, META_DESCRIPTION_LENGTH_OK, TITLE_LENGTH_OK,
};
