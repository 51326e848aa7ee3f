use serde::Serialize;
use std::collections::HashMap;

use handle_errors::{Error, ErrorCode};
use tracing::{Level, event, instrument};

use crate::store::{self, Store};
use crate::types::envelope::success;
use crate::types::question::Question;
use crate::types::segment::decode_segment;
use crate::types::tag::extract_tag_query;

#[derive(Serialize, Debug)]
struct TaggedQuestions {
    questions: Vec<Question>,
}

#[instrument(skip(store, params))]
pub async fn get_questions_by_tag(
    tag_name: String,
    params: HashMap<String, String>,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    let tag_name = decode_segment(&tag_name).ok_or_else(|| {
        Error::invalid_usage("tag_name must be valid UTF-8", ErrorCode::Undefined)
    })?;
    let query = extract_tag_query(&params)?;
    event!(target: "quiz_api", Level::INFO, tag = %tag_name, limit = ?query.limit, "querying questions by tag");

    let mut connection = store.acquire().await?;
    let questions = store::get_questions_by_tag(&mut connection, &tag_name, query.limit).await?;
    if questions.is_empty() {
        return Err(warp::reject::custom(Error::not_found(
            "Question not found",
            ErrorCode::QuestionNotFound,
        )));
    }

    Ok(warp::reply::json(&success(TaggedQuestions { questions })))
}
