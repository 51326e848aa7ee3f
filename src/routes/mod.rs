use std::collections::HashMap;

use handle_errors::return_error;
use warp::{Filter, http::Method};

use crate::store::Store;

pub mod question;
pub mod tag;

/// Every route of the API, with CORS, tracing and the error translator attached.
pub fn routes(
    store: Store,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("Content-Type")
        .allow_methods(&[Method::GET]);

    let get_question = warp::get()
        .and(warp::path("question"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(store_filter.clone())
        .and_then(question::get_question)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "get_question request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }));

    // /question/<id>/answer
    let check_answer = warp::get()
        .and(warp::path("question"))
        .and(warp::path::param::<String>())
        .and(warp::path("answer"))
        .and(warp::path::end())
        .and(warp::query::<HashMap<String, String>>())
        .and(store_filter.clone())
        .and_then(question::check_answer);

    // /question/answer/<id>
    let check_answer_legacy = warp::get()
        .and(warp::path("question"))
        .and(warp::path("answer"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::query::<HashMap<String, String>>())
        .and(store_filter.clone())
        .and_then(question::check_answer);

    let check_answer = check_answer
        .or(check_answer_legacy)
        .unify()
        .with(warp::trace(|info| {
            tracing::info_span!(
                "check_answer request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }));

    let get_questions_by_tag = warp::get()
        .and(warp::path("tag"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::query::<HashMap<String, String>>())
        .and(store_filter)
        .and_then(tag::get_questions_by_tag)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "get_questions_by_tag request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }));

    get_question
        .or(check_answer)
        .or(get_questions_by_tag)
        .with(cors)
        .with(warp::trace::request())
        .recover(return_error)
}
