use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use payloads::requests;

use crate::store::TeamStore;

use super::{APIError, get_student_id};

/// Join a team by its invitation code. The requested task must match the
/// one the team is working on.
#[tracing::instrument(skip(req, store), fields(student_id), ret)]
#[post("/teams")]
pub async fn join_team(
    req: HttpRequest,
    details: web::Json<requests::JoinTeam>,
    store: web::Data<TeamStore>,
) -> Result<HttpResponse, APIError> {
    let student_id = get_student_id(&req, &store)?;
    let team = store.join_team(&student_id, &details)?;
    Ok(HttpResponse::Ok().json(team))
}

#[tracing::instrument(skip(req, store), fields(student_id), ret)]
#[put("/teams")]
pub async fn leave_team(
    req: HttpRequest,
    store: web::Data<TeamStore>,
) -> Result<HttpResponse, APIError> {
    let student_id = get_student_id(&req, &store)?;
    let team = store.leave_team(&student_id)?;
    Ok(HttpResponse::Ok().json(team))
}

#[tracing::instrument(skip(req, store), fields(student_id), ret)]
#[get("/teams/current")]
pub async fn current_team(
    req: HttpRequest,
    store: web::Data<TeamStore>,
) -> Result<HttpResponse, APIError> {
    let student_id = get_student_id(&req, &store)?;
    let team = store.current_team(&student_id)?;
    Ok(HttpResponse::Ok().json(team))
}
