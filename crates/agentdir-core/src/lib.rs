//! Agent Directory core library
//!
//! Record schemas for the four directory kinds, file classification under a
//! data root, per-file validation, and the cross-file category reference
//! and duplicate checks that make up a validation run.

pub mod classify;
pub mod duplicates;
pub mod error;
pub mod kind;
pub mod references;
pub mod run;
pub mod schema;
pub mod telemetry;
pub mod url_norm;
pub mod validator;

pub use classify::{classify, collect_files, is_record_file, is_yaml_file, CollectedFiles, KindFilter};
pub use duplicates::{check_duplicates, DuplicateGroup};
pub use error::{PathError, Result, SchemaViolation, ValidationError};
pub use kind::RecordKind;
pub use references::{check_category_references, load_category_ids, ReferenceError};
pub use run::{validate_data_root, Finding, ValidationOutcome};
pub use schema::{
    normalize_tag, validate_mapping, validate_value, AgentEntry, AgentType, BoilerplateCategory,
    BoilerplateEntry, BoilerplateType, Category, Pricing, Record, TechStackComponent,
};
pub use url_norm::{is_http_url, netloc_of, normalize_url, UrlParts, MAX_URL_LEN};
pub use validator::{
    load_yaml_file, parse_document, scalar_field, validate_file, validate_text, ValidatedEntry,
};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
