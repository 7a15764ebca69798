//! REST API over the tournament service. JSON in, JSON out.
//! Errors are `{"error": "..."}`: 404 for unknown ids, 400 for everything else.

use crate::models::{EventId, MatchId, NewEvent, StageId, TeamId, TournamentError};
use crate::service::{ServiceResult, TournamentService};
use crate::store::MemoryStore;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shared state: one service over the in-memory store.
pub type AppState = Data<TournamentService<MemoryStore>>;

pub fn new_state() -> AppState {
    Data::new(TournamentService::new(MemoryStore::new()))
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
}

#[derive(Deserialize)]
struct AssignTeamBody {
    stage_id: StageId,
}

#[derive(Deserialize)]
struct RecordResultBody {
    team_1_score: u32,
    team_2_score: u32,
}

#[derive(Deserialize)]
struct StandingsQuery {
    /// Comma separated stage ids; absent means the default scope.
    stages: Option<String>,
}

/// Path segment: event id (e.g. /api/events/{id})
#[derive(Deserialize)]
struct EventPath {
    id: EventId,
}

#[derive(Deserialize)]
struct EventTeamPath {
    id: EventId,
    team_id: TeamId,
}

#[derive(Deserialize)]
struct EventStagePath {
    id: EventId,
    stage_id: StageId,
}

#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::EventNotFound(_)
        | TournamentError::TeamNotFound(_)
        | TournamentError::StageNotFound(_)
        | TournamentError::MatchNotFound(_) => HttpResponse::NotFound().json(body),
        TournamentError::Storage(_) => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn respond<T: Serialize>(result: ServiceResult<T>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

fn parse_stage_ids(raw: Option<&str>) -> Result<Vec<StageId>, String> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Uuid::parse_str(s).map_err(|_| format!("Invalid stage id '{}'", s)))
        .collect()
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "sports-tournament-web",
    })
}

#[get("/api/events")]
async fn api_list_events(state: AppState) -> HttpResponse {
    respond(state.list_events())
}

#[post("/api/events")]
async fn api_create_event(state: AppState, body: Json<NewEvent>) -> HttpResponse {
    respond(state.create_event(body.into_inner()))
}

/// Event with teams, stages and matches.
#[get("/api/events/{id}")]
async fn api_get_event(state: AppState, path: Path<EventPath>) -> HttpResponse {
    respond(state.event_detail(path.id))
}

#[delete("/api/events/{id}")]
async fn api_delete_event(state: AppState, path: Path<EventPath>) -> HttpResponse {
    match state.delete_event(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[post("/api/events/{id}/teams")]
async fn api_add_team(
    state: AppState,
    path: Path<EventPath>,
    body: Json<AddTeamBody>,
) -> HttpResponse {
    respond(state.add_team(path.id, &body.name))
}

/// CSV body with a `name` header column.
#[post("/api/events/{id}/teams/import")]
async fn api_import_teams(state: AppState, path: Path<EventPath>, body: String) -> HttpResponse {
    respond(state.import_teams_csv(path.id, &body))
}

#[delete("/api/events/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<EventTeamPath>) -> HttpResponse {
    match state.remove_team(path.id, path.team_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[put("/api/events/{id}/teams/{team_id}/stage")]
async fn api_assign_team(
    state: AppState,
    path: Path<EventTeamPath>,
    body: Json<AssignTeamBody>,
) -> HttpResponse {
    respond(state.assign_team(path.id, path.team_id, body.stage_id))
}

#[post("/api/events/{id}/draw")]
async fn api_draw_pools(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let mut rng = rand::thread_rng();
    respond(state.draw_pools(path.id, &mut rng))
}

#[post("/api/events/{id}/stages")]
async fn api_generate_stages(state: AppState, path: Path<EventPath>) -> HttpResponse {
    respond(state.generate_stages(path.id))
}

#[post("/api/events/{id}/stages/{stage_id}/schedule")]
async fn api_schedule_stage(state: AppState, path: Path<EventStagePath>) -> HttpResponse {
    respond(state.schedule_stage(path.id, path.stage_id))
}

#[post("/api/events/{id}/stages/{stage_id}/advance")]
async fn api_advance(state: AppState, path: Path<EventStagePath>) -> HttpResponse {
    respond(state.check_advance(path.id, path.stage_id))
}

#[get("/api/events/{id}/standings")]
async fn api_standings(
    state: AppState,
    path: Path<EventPath>,
    query: Query<StandingsQuery>,
) -> HttpResponse {
    let stage_ids = match parse_stage_ids(query.stages.as_deref()) {
        Ok(ids) => ids,
        Err(msg) => return HttpResponse::BadRequest().json(serde_json::json!({ "error": msg })),
    };
    respond(state.get_standings(path.id, &stage_ids))
}

#[get("/api/events/{id}/progress")]
async fn api_progress(state: AppState, path: Path<EventPath>) -> HttpResponse {
    respond(state.progress(path.id))
}

#[get("/api/events/{id}/result")]
async fn api_final_result(state: AppState, path: Path<EventPath>) -> HttpResponse {
    respond(state.get_final_result(path.id))
}

#[put("/api/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    respond(state.record_result(path.match_id, body.team_1_score, body.team_2_score))
}

/// Register every route. The caller supplies the [`AppState`] with `app_data`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_list_events)
        .service(api_create_event)
        .service(api_get_event)
        .service(api_delete_event)
        .service(api_add_team)
        .service(api_import_teams)
        .service(api_remove_team)
        .service(api_assign_team)
        .service(api_draw_pools)
        .service(api_generate_stages)
        .service(api_schedule_stage)
        .service(api_advance)
        .service(api_standings)
        .service(api_progress)
        .service(api_final_result)
        .service(api_record_result);
}
