//! `knotwork` is a decoder, encoder, and query engine for the [KDL Document
//! Language](https://kdl.dev) (KDL v2), a node-based, human-friendly
//! configuration and serialization format.
//!
//! Decoding produces a tree of typed, immutable nodes; encoding renders a
//! canonical form that parses back to the same document. Numbers are kept
//! at arbitrary precision: integers as big integers with their source
//! radix, floats as arbitrary-precision decimals, so `1.23e-1000` survives
//! a round trip untouched.
//!
//! ## Example
//!
//! ```rust
//! use knotwork::KdlDocument;
//!
//! let doc_str = r#"
//! hello 1 2 3
//!
//! // Comment
//! world prop=#true {
//!     child 1
//!     child 2
//!     child #inf
//! }
//! "#;
//!
//! let doc: KdlDocument = doc_str.parse().expect("failed to parse KDL");
//!
//! assert_eq!(
//!     doc.iter_args("hello").collect::<Vec<_>>(),
//!     vec![&1.into(), &2.into(), &3.into()]
//! );
//!
//! assert_eq!(
//!     doc.get("world").map(|node| &node["prop"]),
//!     Some(&true.into())
//! );
//! ```
//!
//! ## Decoding and encoding
//!
//! [`decode`] returns the document together with any unconsumed trailing
//! tokens; [`decode_strict`] (which also backs [`str::parse`]) treats a
//! non-empty tail as an error. [`encode`] renders canonical KDL v2 and
//! accepts [`EncodeOptions`] to force a radix on all integers;
//! `Display` on [`KdlDocument`] is the default-options rendering.
//!
//! ## Selecting nodes
//!
//! [`select`] walks the whole tree with a path of [`KdlSelector`]s:
//!
//! ```rust
//! use knotwork::{KdlDocument, KdlSelector};
//!
//! let doc: KdlDocument = "a {\n  b {\n    c 1\n  }\n}".parse().unwrap();
//! let found = doc.select(&["b".into(), "c".into()]);
//! assert_eq!(found[0].get(0), Some(&1.into()));
//! ```
//!
//! ## Error Reporting
//!
//! [`KdlParseFailure`] implements [`miette::Diagnostic`] and can be used to
//! display detailed, pretty-printed diagnostic messages when using
//! [`miette::Result`] and the `"fancy"` feature flag for `miette`:
//!
//! ```toml
//! # Cargo.toml
//! [dependencies]
//! miette = { version = "x.y.z", features = ["fancy"] }
//! ```
//!
//! ```no_run
//! fn main() -> miette::Result<()> {
//!     "foo 1.".parse::<knotwork::KdlDocument>()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Minimum Supported Rust Version
//!
//! You must be at least `1.70.0` tall to get on this ride.
//!
//! ## License
//!
//! The code in this repository is covered by [the Apache-2.0
//! License](LICENSE).

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]
#![doc(html_favicon_url = "https://kdl.dev/favicon.ico")]
#![doc(html_logo_url = "https://kdl.dev/logo.svg")]

pub use document::*;
pub use entry::*;
pub use error::*;
pub use fmt::{encode, encode_strict, EncodeOptions};
pub use node::*;
pub use parser::{decode, decode_strict};
pub use query::*;
pub use token::*;
pub use tokenizer::tokenize;
pub use value::*;

mod charset;
mod document;
mod entry;
mod error;
mod fmt;
mod node;
mod parser;
mod query;
mod token;
mod tokenizer;
mod value;
