/// Errors raised while computing a request signature.
///
/// None of these occur for well-formed inputs. When one does, the request is abandoned rather
/// than sent with a partial or empty signature.
#[derive(thiserror::Error, Debug)]
pub enum SigningError {
    /// A value the signature depends on was empty.
    #[error("missing signing input: {0}")]
    MissingInput(&'static str),

    /// The HMAC primitive refused a key.
    #[error("HMAC key was rejected")]
    InvalidKey,

    /// The captured instant could not be rendered in the protocol's date formats.
    #[error("could not format signing timestamp")]
    Timestamp(#[from] time::error::Format),
}
