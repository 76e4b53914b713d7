use thiserror::Error;

/// Fatal construction errors raised while binding a setup result.
///
/// These abort `load` synchronously; no partial host update is applied.
#[derive(Debug, Error)]
pub enum BindingError {
    /// A leaf the host snapshot format cannot represent.
    #[error("unsupported binding at `{path}`: {type_name} values cannot be represented in host data")]
    Unsupported { path: String, type_name: String },

    /// Functions are host-invocable methods, valid only as top-level entries.
    #[error("function binding at `{path}`: functions are only supported at the top level of a setup result")]
    NestedFunction { path: String },
}
