use snafu::Snafu;

pub type CustomResult<T> = Result<T, Error>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// the time string did not match `M:SS.CC`
    #[snafu(display("Invalid lap time '{input}', expected format M:SS.CC (e.g. 1:23.45)"))]
    InvalidFormatError { input: String },

    #[snafu(display("Participant {participant_id} already registered a time for race {race_id}"))]
    DuplicateSubmissionError { participant_id: i32, race_id: i32 },

    #[snafu(display("Data access failed while {operation}: {source}"))]
    DataAccessError {
        operation: String,
        source: BoxedSource,
    },

    #[snafu(display("{entity} not found: {key}"))]
    NotFoundError { entity: String, key: String },

    #[snafu(display("User {username} is not allowed to {action}"))]
    UnauthorizedError { username: String, action: String },

    #[snafu(display("Missing required field: {field}"))]
    MissingFieldError { field: String },

    #[snafu(display("Missing configuration value {key}"))]
    MissingConfigError { key: String },

    #[snafu(display("Invalid configuration value for {key}: {value}"))]
    InvalidConfigError { key: String, value: String },

    #[snafu(display("Authentication failed: {reason}"))]
    AuthenticationError { reason: String },
}

impl Error {
    /// # wrap a collaborator failure
    /// build a closure for `map_err` that turns any error into a `DataAccessError`
    ///
    /// ## Arguments
    /// * `operation` - what was being done when the failure happened
    pub fn data_access<E>(operation: &str) -> impl FnOnce(E) -> Error + '_
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |error| Error::DataAccessError {
            operation: operation.to_string(),
            source: Box::new(error),
        }
    }

    pub fn not_found(entity: &str, key: impl ToString) -> Error {
        Error::NotFoundError {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    /// true for failures the caller may recover from by re-running the scoring pass
    pub fn is_data_access(&self) -> bool {
        matches!(self, Error::DataAccessError { .. })
    }
}
