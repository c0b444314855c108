pub mod config;
pub mod proof;
pub mod tree;

/// Turn an error chain into a JavaScript exception message.
pub(crate) fn to_napi_error(err: anyhow::Error) -> napi::Error {
    napi::Error::from_reason(format!("{err:#}"))
}
