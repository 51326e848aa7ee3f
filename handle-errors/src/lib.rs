use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};
use warp::{Rejection, Reply, http::StatusCode, reject::Reject};

use tracing::{Level, event, instrument};

/// Extra fields merged into an error envelope.
pub type Payload = Map<String, Value>;

/// Application error codes. The numeric values are part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Undefined = -1,
    WrongId = 10,
    AnswerNotSet = 11,
    DatabaseError = 20,
    QuestionNotFound = 30,
}

impl ErrorCode {
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Symbolic name used in the `error.name` field of an envelope.
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::Undefined => "Undefined",
            ErrorCode::WrongId => "WrongId",
            ErrorCode::AnswerNotSet => "AnswerNotSet",
            ErrorCode::DatabaseError => "DatabaseError",
            ErrorCode::QuestionNotFound => "QuestionNotFound",
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.value())
    }
}

#[derive(Debug)]
pub enum Error {
    /// Client supplied input failed validation.
    InvalidUsage {
        message: String,
        code: ErrorCode,
        status: StatusCode,
        payload: Payload,
    },
    /// The storage call itself failed.
    DatabaseError {
        message: String,
        source: sqlx::Error,
        code: ErrorCode,
        status: StatusCode,
        payload: Payload,
    },
    /// The lookup ran but matched no rows.
    ResourceNotFound {
        message: String,
        code: ErrorCode,
        payload: Payload,
    },
}

impl Error {
    pub fn invalid_usage(message: impl Into<String>, code: ErrorCode) -> Self {
        Error::InvalidUsage {
            message: message.into(),
            code,
            status: StatusCode::BAD_REQUEST,
            payload: Payload::new(),
        }
    }

    pub fn database(message: impl Into<String>, source: sqlx::Error, code: ErrorCode) -> Self {
        Error::DatabaseError {
            message: message.into(),
            source,
            code,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            payload: Payload::new(),
        }
    }

    pub fn not_found(message: impl Into<String>, code: ErrorCode) -> Self {
        Error::ResourceNotFound {
            message: message.into(),
            code,
            payload: Payload::new(),
        }
    }

    /// Overrides the default HTTP status. `ResourceNotFound` always answers 404.
    pub fn with_status(mut self, new_status: StatusCode) -> Self {
        match &mut self {
            Error::InvalidUsage { status, .. } | Error::DatabaseError { status, .. } => {
                *status = new_status
            }
            Error::ResourceNotFound { .. } => {}
        }
        self
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        match &mut self {
            Error::InvalidUsage { payload, .. }
            | Error::DatabaseError { payload, .. }
            | Error::ResourceNotFound { payload, .. } => {
                payload.insert(key.into(), value.into());
            }
        }
        self
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Error::InvalidUsage { .. } => "InvalidUsage",
            Error::DatabaseError { .. } => "DatabaseError",
            Error::ResourceNotFound { .. } => "ResourceNotFound",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Error::InvalidUsage { message, .. }
            | Error::DatabaseError { message, .. }
            | Error::ResourceNotFound { message, .. } => message,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidUsage { code, .. }
            | Error::DatabaseError { code, .. }
            | Error::ResourceNotFound { code, .. } => *code,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidUsage { status, .. } | Error::DatabaseError { status, .. } => *status,
            Error::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn payload(&self) -> &Payload {
        match self {
            Error::InvalidUsage { payload, .. }
            | Error::DatabaseError { payload, .. }
            | Error::ResourceNotFound { payload, .. } => payload,
        }
    }

    /// Serializes the error into the failure envelope:
    /// `{success: false, message, error: {name, code}, ...extras}`.
    pub fn to_envelope(&self) -> Value {
        let mut envelope = Map::new();
        envelope.insert("success".to_string(), Value::Bool(false));
        envelope.insert("message".to_string(), Value::String(self.message().to_string()));
        envelope.insert(
            "error".to_string(),
            json!({
                "name": format!("{}: {}", self.variant_name(), self.code().name()),
                "code": self.code(),
            }),
        );
        if let Error::DatabaseError { source, .. } = self {
            envelope.insert(
                "databaseError".to_string(),
                Value::String(database_error_summary(source)),
            );
        }
        // extras never shadow the envelope's own keys
        for (key, value) in self.payload() {
            envelope.entry(key.clone()).or_insert_with(|| value.clone());
        }

        Value::Object(envelope)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::DatabaseError { message, source, .. } => {
                write!(f, "{}: {} ({})", self.variant_name(), message, database_error_summary(source))
            }
            _ => write!(f, "{}: {}", self.variant_name(), self.message()),
        }
    }
}

impl Reject for Error {}

/// Short `"<kind>: <message>"` description of a storage failure, safe to hand to clients.
pub fn database_error_summary(error: &sqlx::Error) -> String {
    let kind = match error {
        sqlx::Error::Configuration(_) => "Configuration",
        sqlx::Error::Database(_) => "Database",
        sqlx::Error::Io(_) => "Io",
        sqlx::Error::Tls(_) => "Tls",
        sqlx::Error::Protocol(_) => "Protocol",
        sqlx::Error::RowNotFound => "RowNotFound",
        sqlx::Error::TypeNotFound { .. } => "TypeNotFound",
        sqlx::Error::ColumnIndexOutOfBounds { .. } => "ColumnIndexOutOfBounds",
        sqlx::Error::ColumnNotFound(_) => "ColumnNotFound",
        sqlx::Error::ColumnDecode { .. } => "ColumnDecode",
        sqlx::Error::Decode(_) => "Decode",
        sqlx::Error::PoolTimedOut => "PoolTimedOut",
        sqlx::Error::PoolClosed => "PoolClosed",
        sqlx::Error::WorkerCrashed => "WorkerCrashed",
        _ => "Other",
    };
    let message = match error {
        sqlx::Error::Database(err) => err.message().to_string(),
        other => other.to_string(),
    };

    format!("{}: {}", kind, message)
}

/// Global translator for `warp::Filter::recover`.
///
/// Only errors of this crate are turned into envelopes. Every other rejection is
/// handed back to warp untouched so it is never masked as an application error.
#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        let status = error.status();
        if status.is_server_error() {
            event!(Level::ERROR, code = error.code().value(), "{}", error);
        } else {
            event!(Level::WARN, code = error.code().value(), "{}", error);
        }

        Ok(warp::reply::with_status(
            warp::reply::json(&error.to_envelope()),
            status,
        ))
    } else {
        Err(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_keep_their_wire_values() {
        assert_eq!(ErrorCode::Undefined.value(), -1);
        assert_eq!(ErrorCode::WrongId.value(), 10);
        assert_eq!(ErrorCode::AnswerNotSet.value(), 11);
        assert_eq!(ErrorCode::DatabaseError.value(), 20);
        assert_eq!(ErrorCode::QuestionNotFound.value(), 30);
    }

    #[test]
    fn invalid_usage_envelope() {
        let error = Error::invalid_usage("id must be an integer greater than 0", ErrorCode::WrongId);

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error.to_envelope(),
            json!({
                "success": false,
                "message": "id must be an integer greater than 0",
                "error": {"name": "InvalidUsage: WrongId", "code": 10},
            })
        );
    }

    #[test]
    fn success_key_comes_first() {
        let envelope = Error::not_found("Question not found", ErrorCode::QuestionNotFound).to_envelope();
        let keys: Vec<&String> = envelope.as_object().unwrap().keys().collect();

        assert_eq!(keys, ["success", "message", "error"]);
    }

    #[test]
    fn not_found_is_always_404() {
        let error = Error::not_found("Question not found", ErrorCode::QuestionNotFound)
            .with_status(StatusCode::GONE);

        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            error.to_envelope()["error"]["name"],
            "ResourceNotFound: QuestionNotFound"
        );
    }

    #[test]
    fn database_error_carries_summary() {
        let error = Error::database("Database error", sqlx::Error::PoolTimedOut, ErrorCode::DatabaseError);
        let envelope = error.to_envelope();

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope["error"]["name"], "DatabaseError: DatabaseError");
        assert_eq!(envelope["error"]["code"], 20);
        assert_eq!(
            envelope["databaseError"],
            "PoolTimedOut: pool timed out while waiting for an open connection"
        );
    }

    #[test]
    fn payload_is_merged_without_shadowing() {
        let envelope = Error::invalid_usage("answer not set", ErrorCode::AnswerNotSet)
            .with_status(StatusCode::UNPROCESSABLE_ENTITY)
            .with_payload("field", "answer")
            .with_payload("success", true)
            .to_envelope();

        assert_eq!(envelope["field"], "answer");
        assert_eq!(envelope["success"], false);
    }

    #[tokio::test]
    async fn recover_maps_error_to_status_and_body() {
        let rejection = warp::reject::custom(Error::invalid_usage("answer not set", ErrorCode::AnswerNotSet));
        let response = return_error(rejection).await.map(Reply::into_response);

        let response = match response {
            Ok(response) => response,
            Err(r) => panic!("rejection was not recovered: {:?}", r),
        };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn foreign_rejections_pass_through() {
        assert!(return_error(warp::reject::not_found()).await.is_err());
    }
}
