use crate::logger::*;
use std::convert::Infallible;
use warp::http::{StatusCode, Uri};
use warp::{Rejection, reject};

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug)]
pub enum EdgeRejection {
    LoginRequired,
}

impl reject::Reject for EdgeRejection {}

pub async fn recover_error(err: Rejection) -> Result<Box<dyn warp::Reply>, Infallible> {
    if let Some(EdgeRejection::LoginRequired) = err.find::<EdgeRejection>() {
        return Ok(Box::new(warp::redirect::temporary(Uri::from_static(
            LOGIN_PATH,
        ))));
    }
    if err.is_not_found() {
        return Ok(Box::new(warp::reply::with_status(
            "Not Found",
            StatusCode::NOT_FOUND,
        )));
    }
    warn!(?err, "unhandled rejection");
    Ok(Box::new(warp::reply::with_status(
        "Internal Server Error",
        StatusCode::INTERNAL_SERVER_ERROR,
    )))
}
