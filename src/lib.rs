//! Conditional XML preprocessing.
//!
//! Elements carrying an `if` attribute in the [`preprocessor::NAMESPACE`] namespace are kept
//! or removed depending on a small expression language evaluated against [`RuntimeValues`]:
//!
//! ```
//! use xml_preprocessor::{RuntimeValues, XmlPreprocessor};
//!
//! let mut values = RuntimeValues::new();
//! values.add_version("version", "16.4.3528").unwrap();
//! values.add_str("market", "en-US").unwrap();
//!
//! let xpp = XmlPreprocessor::new(values);
//! assert!(xpp.test("version GTE 16.0 AND market =~ /^en-/").unwrap());
//! ```

pub mod config;
pub mod error;
pub mod expr;
pub mod parser;
pub mod preprocessor;
pub mod runtime;
pub mod scanner;
pub mod symbol;
pub mod token_type;
pub mod tree;
pub mod version;

pub use error::{XppError, XppResult};
pub use preprocessor::{ConditionalTree, XmlPreprocessor};
pub use runtime::{RuntimeValues, Value};
