/// The ways a spellchecker operation can fail.
///
/// Per-word operations never fail; only dictionary selection and the
/// operations a backend cannot perform report errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("bad argument: {0}")]
    BadArgument(String),
    #[error("dictionary not found for {0}")]
    DictionaryNotFound(String),
    #[error("malformed dictionary: {0}")]
    MalformedDictionary(String),
    #[error("{0} is not supported by this backend")]
    UnsupportedOperation(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Wrap a loading error from the affix engine, keeping its context chain.
    pub(crate) fn malformed(err: &anyhow::Error) -> Self {
        Error::MalformedDictionary(format!("{:#}", err))
    }
}
