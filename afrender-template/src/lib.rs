//! # afrender-template
//!
//! Turns a fixed-layout control-script template into a per-identifier
//! control file by rewriting three directive lines (load, image, session).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use afrender_core::{DirectiveFormats, SlotLayout};
//! use afrender_template::{SlotValues, TemplateInstantiator};
//!
//! fn write_control() -> Result<(), afrender_template::TemplateError> {
//!     let inst = TemplateInstantiator::new(SlotLayout::default(), &DirectiveFormats::default())?;
//!     let values = SlotValues {
//!         structure: Path::new("out/P12345.pdb"),
//!         image: Path::new("out/P12345"),
//!         session: Path::new("out/P12345.pse"),
//!     };
//!     inst.instantiate(Path::new("pymol_script.pml"), &values, Path::new("out/P12345.pml"))
//! }
//! ```

pub mod directives;
pub mod error;
pub mod template;

pub use directives::Directives;
pub use error::TemplateError;
pub use template::{SlotValues, Template, TemplateInstantiator};
