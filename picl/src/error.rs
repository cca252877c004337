//! Error types and error handling utilities.

use arcstr::ArcStr;

/// A result type returning picl errors.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type for picl operations.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// A parameter was passed to a cell factory that does not declare it.
    #[error("`{factory}` got an unexpected parameter `{key}`; valid parameters are {valid:?}")]
    UnknownParam {
        /// The factory that rejected the parameter.
        factory: ArcStr,
        /// The offending parameter name.
        key: ArcStr,
        /// The parameter names the factory declares.
        valid: Vec<ArcStr>,
    },
    /// A port was added to a component that already has a port with the same name.
    #[error("component `{cell}` already has a port named `{name}`")]
    DuplicatePort {
        /// The duplicated port name.
        name: ArcStr,
        /// The component the port was added to.
        cell: ArcStr,
    },
}
