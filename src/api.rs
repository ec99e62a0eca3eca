//! HTTP surface of the todo service
//!
//! | Method | Path         | Response                 |
//! |--------|--------------|--------------------------|
//! | GET    | /todos       | 200, JSON array of todos |
//! | POST   | /todos       | 201, created todo        |
//! | PUT    | /todos/{id}  | 204                      |
//! | DELETE | /todos/{id}  | 204                      |
//!
//! Any other method on these paths is answered with 405.

use actix_web::{web, HttpResponse, ResponseError};
use log::{debug, info};

use crate::app_state::AppState;
use crate::error::TodoError;
use crate::todo::{TodoId, TodoInput};

/// Register the todo routes on an `App` or scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default().error_handler(|err, _req| TodoError::bad_request(err.to_string()).into()),
    )
    .service(
        web::resource("/todos")
            .route(web::get().to(list_todos))
            .route(web::post().to(create_todo))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/todos/{id}")
            .route(web::put().to(update_todo))
            .route(web::delete().to(delete_todo))
            .default_service(web::to(method_not_allowed)),
    );
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .content_type("text/plain; charset=utf-8")
        .body("Method not allowed")
}

/// Decode a request body; the Content-Type header is not consulted.
///
/// Only the first JSON value is read and anything after it is ignored. A
/// top-level `null` decodes to an all-default todo.
fn decode_todo(body: &[u8]) -> Result<TodoInput, TodoError> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<TodoInput>>()
        .next()
    {
        Some(Ok(input)) => Ok(input.unwrap_or_default()),
        Some(Err(e)) => Err(TodoError::bad_request(format!("invalid todo body: {}", e))),
        None => Err(TodoError::bad_request("invalid todo body: empty body")),
    }
}

/// Run `op` for a single todo with its id in the `todo_id` MDC key. The key
/// stays set until the response, error responses included, has been built
/// and logged.
fn with_todo_id<F>(id: TodoId, action: &str, op: F) -> HttpResponse
where
    F: FnOnce() -> Result<(), TodoError>,
{
    log_mdc::insert("todo_id", id.to_string());
    let response = match op() {
        Ok(()) => {
            info!("{} todo", action);
            HttpResponse::NoContent().finish()
        }
        Err(e) => e.error_response(),
    };
    log_mdc::remove("todo_id");
    response
}

pub async fn list_todos(state: web::Data<AppState>) -> Result<HttpResponse, TodoError> {
    let todos = state.store.list()?;
    debug!("Listing {} todos", todos.len());
    Ok(HttpResponse::Ok().json(todos))
}

pub async fn create_todo(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, TodoError> {
    let input = decode_todo(&body)?;
    let todo = state.store.create(&input.text, input.completed)?;
    info!("Created todo {}", todo.id);
    Ok(HttpResponse::Created().json(todo))
}

pub async fn update_todo(state: web::Data<AppState>, path: web::Path<TodoId>, body: web::Bytes) -> HttpResponse {
    let id = path.into_inner();
    with_todo_id(id, "Updated", || {
        let input = decode_todo(&body)?;
        state.store.update(id, &input.text, input.completed)
    })
}

pub async fn delete_todo(state: web::Data<AppState>, path: web::Path<TodoId>) -> HttpResponse {
    let id = path.into_inner();
    with_todo_id(id, "Deleted", || state.store.delete(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use std::sync::Arc;

    use crate::store::mock_store::MockTodoStore;
    use crate::store::TodoStore;

    #[::core::prelude::v1::test]
    fn test_decode_todo() {
        assert_eq!(decode_todo(br#"{"text":"a","completed":true}"#).unwrap(), TodoInput::new("a", true));
        assert!(matches!(decode_todo(b"{not json"), Err(TodoError::BadRequest(_))));
        assert!(matches!(decode_todo(b""), Err(TodoError::BadRequest(_))));
        assert!(matches!(decode_todo(b"  \n"), Err(TodoError::BadRequest(_))));
    }

    #[::core::prelude::v1::test]
    fn test_decode_todo_null_and_trailing_data() {
        assert_eq!(decode_todo(b"null").unwrap(), TodoInput::default());
        assert_eq!(decode_todo(br#"{"text":"x","completed":null}"#).unwrap(), TodoInput::new("x", false));
        assert_eq!(decode_todo(br#"{"text":"a"}{"#).unwrap(), TodoInput::new("a", false));
    }

    #[actix_web::test]
    async fn test_null_forms_are_created() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new_for_testing()))
                .configure(configure),
        )
        .await;

        for (body, text) in [(r#"{"text":"x","completed":null}"#, "x"), ("null", ""), (r#"{"text":"a"}{"#, "a")] {
            let req = test::TestRequest::post().uri("/todos").set_payload(body).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED, "{}", body);
            let created: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(created["text"], text);
            assert_eq!(created["completed"], false);
        }
    }

    #[actix_web::test]
    async fn test_failure_is_logged_with_todo_id() {
        capture::install();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new_for_testing()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::put().uri("/todos/7").set_payload("{oops").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let logged = capture::records();
        assert!(
            logged
                .iter()
                .any(|(msg, todo_id)| msg.starts_with("Rejected request") && todo_id.as_deref() == Some("7")),
            "{:?}",
            logged
        );
        assert_eq!(log_mdc::get("todo_id", |v| v.map(str::to_string)), None);
    }

    mod capture {
        use log::{LevelFilter, Log, Metadata, Record};
        use std::sync::{Mutex, Once};

        static RECORDS: Mutex<Vec<(String, Option<String>)>> = Mutex::new(Vec::new());
        static INSTALL: Once = Once::new();

        struct CaptureLogger;

        impl Log for CaptureLogger {
            fn enabled(&self, _: &Metadata) -> bool {
                true
            }

            fn log(&self, record: &Record) {
                let todo_id = log_mdc::get("todo_id", |v| v.map(str::to_string));
                RECORDS.lock().unwrap().push((record.args().to_string(), todo_id));
            }

            fn flush(&self) {}
        }

        pub fn install() {
            INSTALL.call_once(|| {
                log::set_boxed_logger(Box::new(CaptureLogger)).unwrap();
                log::set_max_level(LevelFilter::Debug);
            });
        }

        pub fn records() -> Vec<(String, Option<String>)> {
            RECORDS.lock().unwrap().clone()
        }
    }

    #[actix_web::test]
    async fn test_malformed_json_does_not_touch_store() {
        let store = Arc::new(MockTodoStore::new());
        let existing = store.create("keep", false).unwrap();
        let state = AppState::with_store(store.clone());
        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

        let req = test::TestRequest::post().uri("/todos").set_payload("{\"text\":").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri(&format!("/todos/{}", existing.id))
            .set_payload(r#"{"completed":"yes"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        assert_eq!(store.list().unwrap(), vec![existing]);
    }

    #[actix_web::test]
    async fn test_non_integer_id_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new_for_testing()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::delete().uri("/todos/abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unsupported_methods() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new_for_testing()))
                .configure(configure),
        )
        .await;

        for req in [
            test::TestRequest::delete().uri("/todos").to_request(),
            test::TestRequest::patch().uri("/todos/1").to_request(),
            test::TestRequest::get().uri("/todos/1").to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
            let body = test::read_body(resp).await;
            assert_eq!(body, "Method not allowed");
        }
    }
}
