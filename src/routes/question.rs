use std::collections::HashMap;

use handle_errors::{Error, ErrorCode};
use tracing::{Level, event, instrument};

use crate::store::{self, Store};
use crate::types::answer::{check, extract_answer};
use crate::types::envelope::success;
use crate::types::question::{QuestionId, QuestionView};

fn question_not_found() -> warp::Rejection {
    warp::reject::custom(Error::not_found("Question not found", ErrorCode::QuestionNotFound))
}

#[instrument(skip(store))]
pub async fn get_question(id: String, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let id = QuestionId::parse(&id)?;
    event!(target: "quiz_api", Level::INFO, question_id = id.0, "querying question");

    let mut connection = store.acquire().await?;
    match store::get_question(&mut connection, id).await? {
        Some(question) => Ok(warp::reply::json(&success(QuestionView::from(question)))),
        None => Err(question_not_found()),
    }
}

#[instrument(skip(store, params))]
pub async fn check_answer(
    id: String,
    params: HashMap<String, String>,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    let id = QuestionId::parse(&id)?;
    // nothing touches the database until the answer is known to be non-empty
    let answer = extract_answer(&params)?;

    let mut connection = store.acquire().await?;
    match store::get_solution(&mut connection, id).await? {
        Some(solution) => {
            let result = check(&answer, solution.as_deref());
            event!(Level::INFO, question_id = id.0, correct = result.answer_correct);
            Ok(warp::reply::json(&success(result)))
        }
        None => Err(question_not_found()),
    }
}
