//! Load-time error types.

use thiserror::Error;

/// Allowed format for `modified` timestamps, shown in error messages.
pub const TIMESTAMP_FORMAT_HINT: &str = "yyyy-MM-ddTHH:mm:ssZ (for example 2016-01-02T12:34:56Z)";

/// Any reason a configuration cannot be loaded. Every variant is fatal to
/// the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The location is not a valid URI.
    #[error("Incorrect configuration: invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// The URI scheme is not one of http, https, file or resource.
    #[error("Incorrect configuration: unsupported scheme '{scheme}' in '{uri}' (use http, https, file or resource)")]
    UnsupportedScheme { scheme: String, uri: String },

    /// An HTTP fetch returned a non-2xx status.
    #[error("Incorrect configuration: fetching '{uri}' returned HTTP status {status}")]
    HttpStatus { uri: String, status: u16 },

    /// An HTTP fetch failed at the transport level.
    #[error("Incorrect configuration: cannot fetch '{uri}': {source}")]
    Http {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    /// A local file could not be read.
    #[error("Incorrect configuration: cannot read '{uri}': {source}")]
    Io {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    /// No bundled resource with this name exists.
    #[error("Incorrect configuration: bundled resource '{name}' does not exist")]
    MissingResource { name: String },

    /// The document is neither valid JSON nor valid XML.
    #[error("Incorrect configuration: cannot parse '{origin}': {message}")]
    Parse { origin: String, message: String },

    /// An include refers to a document that is already being expanded.
    #[error("Incorrect configuration: recursive include of '{uri}' (include chain: {chain})")]
    RecursiveInclude { uri: String, chain: String },

    /// A node combines an include with content it would replace.
    #[error("Incorrect configuration: include '{reference}' {reason}")]
    IncludeConflict { reference: String, reason: String },

    /// The expanded tree violates one or more invariants.
    #[error("Incorrect configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single invariant violation found while validating a tree.
///
/// `location` is the slash-joined path of the offending node, `/` for the root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("node under '{location}' has no match")]
    MissingMatch { location: String },

    #[error("node '{location}' has an invalid match: {reason}")]
    InvalidMatch { location: String, reason: String },

    #[error("node '{location}' has more than one child matching '{name}'")]
    DuplicateMatch { location: String, name: String },

    #[error("node '{location}' contains an unresolved include")]
    UnresolvedInclude { location: String },

    #[error("node '{location}' has a parameter without a key")]
    MissingKey { location: String },

    #[error("node '{location}' has parameter '{key}' without a value")]
    MissingValue { location: String, key: String },

    #[error("node '{location}' has modified '{value}', which is not of the form {}", TIMESTAMP_FORMAT_HINT)]
    InvalidModified { location: String, value: String },

    #[error("node '{location}' declares levels, which is only allowed on the root")]
    LevelsOnNonRoot { location: String },

    #[error("the root has child nodes but declares no levels")]
    MissingLevels,

    #[error("level name '{name}' {reason}")]
    InvalidLevel { name: String, reason: String },

    #[error("level '{name}' is declared more than once (level names are case-insensitive)")]
    DuplicateLevel { name: String },

    #[error("the tree is {depth} levels deep but only {declared} levels are declared")]
    TooFewLevels { depth: usize, declared: usize },
}
