use wrapp_lifecycle::{types::TypeInfo, RequireError};

/// Errors when trying to acquire a config
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GetConfigError {
    /// The required Config is not known
    #[error("The required Config type '{0}' is not known")]
    Missing(TypeInfo),
    /// The ConfigProvider could not be taken from the dependencies
    #[error(transparent)]
    Provider(#[from] RequireError),
}

/// Errors when trying to register a config
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterConfigError {
    /// The required Config is already registered
    #[error("The Config type '{0}' is already registered")]
    AlreadyRegistered(TypeInfo),
}
