use actix_web::{
    error,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::{Display, Error};

#[derive(Debug, Display, Error, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum MyError {
    #[display(fmt = "internal error")]
    InternalError,

    #[display(fmt = "storage error")]
    StorageError,

    #[display(fmt = "bad request")]
    BadClientData,

    #[display(fmt = "already exists")]
    AlreadyExists,

    #[display(fmt = "student not found")]
    StudentNotFound,

    #[display(fmt = "event not found")]
    EventNotFound,

    #[display(fmt = "achievement not found")]
    AchievementNotFound,

    #[display(fmt = "unauthorized")]
    Unauthorized,

    #[display(fmt = "transport error")]
    TransportError,

    #[display(fmt = "configuration error")]
    ConfigError,
}

impl MyError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MyError::StudentNotFound | MyError::EventNotFound | MyError::AchievementNotFound
        )
    }
}

impl error::ResponseError for MyError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::html())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            MyError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            MyError::StorageError => StatusCode::INTERNAL_SERVER_ERROR,
            MyError::BadClientData => StatusCode::BAD_REQUEST,
            MyError::AlreadyExists => StatusCode::CONFLICT,
            MyError::StudentNotFound => StatusCode::NOT_FOUND,
            MyError::EventNotFound => StatusCode::NOT_FOUND,
            MyError::AchievementNotFound => StatusCode::NOT_FOUND,
            MyError::Unauthorized => StatusCode::UNAUTHORIZED,
            MyError::TransportError => StatusCode::BAD_GATEWAY,
            MyError::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn not_found_variants_map_to_404() {
        assert!(MyError::EventNotFound.is_not_found());
        assert!(!MyError::Unauthorized.is_not_found());
        assert_eq!(MyError::StudentNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(MyError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }
}
