use crate::error::NotestackError;

pub type NotestackResult<T> = Result<T, NotestackError>;
