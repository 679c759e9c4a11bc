//! `ideogen` draws **ideogram**s of human genes with [Ideogram.js](https://github.com/eweitz/ideogram).
//!
//! Given a list of gene symbols, `ideogen` looks up where the genes lie on the
//! GRCh38 primary assembly and renders either:
//!
//! 1. A JavaScript bootstrap script for a Jupyter notebook cell ([`jupyter`]).
//!
//!    The notebook prepares an empty container element, then displays the script,
//!    which loads Ideogram.js through RequireJS and draws the annotations into it.
//!
//! 1. A stand-alone HTML page ([`html`]).
//!
//! Gene coordinates come from NCBI `gene_info` and `gene2refseq`. They are downloaded
//! once into a local [`Store`] and reduced to a small gene table ([`refseq`]).
//!
//! ## Examples
//!
//! ```rust
//! use ideogen::{jupyter, Annotation};
//!
//! let annotations = vec![Annotation {
//!     ncbigene_id: "7157".to_string(),
//!     name: "TP53".to_string(),
//!     chr: "17".to_string(),
//!     start: 7661778,
//!     stop: 7687537,
//! }];
//! let script = jupyter::render(jupyter::DEFAULT_ID, &annotations)?;
//! assert!(script.contains("container: '#ideo-container'"));
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```

pub mod annotations;
#[cfg(feature = "cli")]
pub mod cli;
pub mod html;
pub mod jupyter;
pub mod refseq;
pub mod store;
pub mod utils;

#[doc(inline)]
pub use crate::annotations::Annotation;
#[cfg(feature = "cli")]
#[doc(inline)]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::store::Store;
