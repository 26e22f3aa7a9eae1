/// unwrap a diesel result or log the error and return it as a `DataAccessError`
macro_rules! db_handle_error {
    ( $data:expr, $target:expr, $operation:expr) => {
        match $data {
            Ok(e) => e,
            Err(error) => {
                error!(target:$target, "Error {}. (error: {})", $operation, error);
                return Err(crate::errors::Error::DataAccessError {
                    operation: $operation.to_string(),
                    source: Box::new(error),
                });
            }
        }
    }
}

pub(crate) use db_handle_error;
