//! Single binary web server: players, matches and statistics via REST, leaderboard page at `/`.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Storage is chosen with TENNIS_PROFILE=csv|sqlite (see `tennis_stats_web::config`).

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::sync::Mutex;
use tennis_stats_web::logic::records::{self, MatchUpdate, NewMatch, NewPlayer, PlayerUpdate};
use tennis_stats_web::models::parse_date;
use tennis_stats_web::{AppConfig, DateRange, MatchId, RecordError, Store, ValidationError};

/// The active store. Handlers lock it for the duration of one request.
type AppState = Data<Mutex<Box<dyn Store>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    storage: &'static str,
}

/// Path segment: player name (e.g. /api/players/{name})
#[derive(Deserialize)]
struct PlayerPath {
    name: String,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[derive(Deserialize)]
struct MatchesQuery {
    player: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

#[derive(Deserialize)]
struct PlayerStatsQuery {
    #[serde(default)]
    name: String,
    from: Option<String>,
    to: Option<String>,
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    limit: Option<usize>,
    #[serde(default)]
    exclude_winless: bool,
}

/// Inclusive range from optional `YYYY-MM-DD` bounds; blank bounds are open.
fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange, ValidationError> {
    let bound = |value: Option<&str>| -> Result<_, ValidationError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => parse_date(v).map(Some),
            None => Ok(None),
        }
    };
    Ok(DateRange::new(bound(from)?, bound(to)?))
}

fn error_body(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

/// Map a record error to a status code with `{"error": "..."}` body.
fn error_response(e: RecordError) -> HttpResponse {
    match e {
        RecordError::Validation(_) | RecordError::Score(_) | RecordError::Stats(_) => {
            HttpResponse::BadRequest().json(error_body(e))
        }
        RecordError::PlayerNotFound(_) | RecordError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(error_body(e))
        }
        RecordError::DuplicatePlayer(_)
        | RecordError::DuplicateMatch
        | RecordError::PlayerHasMatches { .. } => HttpResponse::Conflict().json(error_body(e)),
        RecordError::Store(_) => {
            log::error!("Storage failure: {}", e);
            HttpResponse::InternalServerError().json(error_body("Storage operation failed"))
        }
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(error_body("lock error"))
}

#[get("/api/health")]
async fn api_health(state: AppState) -> HttpResponse {
    let g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tennis-stats-web",
        storage: g.backend(),
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[get("/api/players")]
async fn api_list_players(state: AppState) -> HttpResponse {
    let g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match records::list_players(&**g) {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => error_response(e),
    }
}

/// Look up one player by name (case-insensitive).
#[get("/api/players/{name}")]
async fn api_get_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match records::get_player(&**g, &path.name) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(e),
    }
}

#[post("/api/players")]
async fn api_create_player(state: AppState, body: Json<NewPlayer>) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match records::create_player(&mut **g, body.into_inner()) {
        Ok(player) => HttpResponse::Created().json(player),
        Err(e) => error_response(e),
    }
}

/// Update age and type; the name stays as registered.
#[put("/api/players/{name}")]
async fn api_update_player(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<PlayerUpdate>,
) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match records::update_player(&mut **g, &path.name, body.into_inner()) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(e),
    }
}

#[delete("/api/players/{name}")]
async fn api_delete_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match records::delete_player(&mut **g, &path.name) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

/// All matches, optionally filtered by `player`, `from` and `to` (inclusive).
#[get("/api/matches")]
async fn api_list_matches(state: AppState, query: Query<MatchesQuery>) -> HttpResponse {
    let range = match parse_range(query.from.as_deref(), query.to.as_deref()) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(error_body(e)),
    };
    let g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match records::list_matches(&**g, query.player.as_deref(), range) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(e),
    }
}

#[post("/api/matches")]
async fn api_create_match(state: AppState, body: Json<NewMatch>) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match records::create_match(&mut **g, body.into_inner()) {
        Ok(m) => HttpResponse::Created().json(m),
        Err(e) => error_response(e),
    }
}

/// Replace score and/or date of a match.
#[put("/api/matches/{id}")]
async fn api_update_match(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<MatchUpdate>,
) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match records::update_match(&mut **g, path.id, body.into_inner()) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(e),
    }
}

#[delete("/api/matches/{id}")]
async fn api_delete_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match records::delete_match(&mut **g, path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

/// Win/loss stats of one player, optionally within a date range.
#[get("/api/stats/player")]
async fn api_player_stats(state: AppState, query: Query<PlayerStatsQuery>) -> HttpResponse {
    let range = match parse_range(query.from.as_deref(), query.to.as_deref()) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(error_body(e)),
    };
    let g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match records::player_stats(&**g, &query.name, range) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => error_response(e),
    }
}

/// Ranked players. `limit` returns the top N (clamped to 1..=100);
/// `exclude_winless=true` drops players without a win.
#[get("/api/stats/leaderboard")]
async fn api_leaderboard(state: AppState, query: Query<LeaderboardQuery>) -> HttpResponse {
    let g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut board = match records::leaderboard(&**g) {
        Ok(b) => b,
        Err(e) => return error_response(e),
    };
    if query.exclude_winless {
        board = board.without_winless();
    }
    match query.limit {
        Some(n) => HttpResponse::Ok().json(board.top(n)),
        None => HttpResponse::Ok().json(board.rows()),
    }
}

/// Leaderboard as a `;`-delimited download.
#[get("/api/stats/export")]
async fn api_export_leaderboard(state: AppState) -> HttpResponse {
    let g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match records::leaderboard(&**g) {
        Ok(board) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=leaderboard.csv",
            ))
            .body(board.to_delimited_text()),
        Err(e) => error_response(e),
    }
}

async fn serve_index_async() -> impl Responder {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

/// Routes and extractor settings, shared by `main` and the tests.
fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(error_body(&err));
        actix_web::error::InternalError::from_response(err, response).into()
    });
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(error_body(&err));
        actix_web::error::InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .app_data(query_config)
        .route("/", web::get().to(serve_index_async))
        .service(api_health)
        .service(favicon)
        .service(api_list_players)
        .service(api_get_player)
        .service(api_create_player)
        .service(api_update_player)
        .service(api_delete_player)
        .service(api_list_matches)
        .service(api_create_match)
        .service(api_update_match)
        .service(api_delete_match)
        .service(api_player_stats)
        .service(api_leaderboard)
        .service(api_export_leaderboard)
        .service(Files::new("/static", "static"));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let store = config.open_store().map_err(|e| {
        log::error!("Could not open {:?} storage: {}", config.profile, e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    log::info!(
        "Starting server at http://{}:{} ({} storage)",
        config.host,
        config.port,
        store.backend()
    );

    let state: AppState = Data::new(Mutex::new(store));

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use tennis_stats_web::SqliteStore;

    /// Peter beat Novak, Roger beat Novak.
    fn state() -> AppState {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for name in ["Peter", "Novak", "Roger"] {
            let input = NewPlayer {
                name: name.to_string(),
                age: 30,
                player_type: "professional".to_string(),
            };
            records::create_player(&mut store, input).unwrap();
        }
        for (a, b, score, date) in [
            ("Peter", "Novak", "6:4,6:2,6:2", "2025-05-10"),
            ("Novak", "Roger", "6:7,6:7,6:7", "2025-05-05"),
        ] {
            let input = NewMatch {
                player_a: a.to_string(),
                player_b: b.to_string(),
                score: score.to_string(),
                date: date.to_string(),
            };
            records::create_match(&mut store, input).unwrap();
        }
        Data::new(Mutex::new(Box::new(store) as Box<dyn Store>))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn duplicate_player_is_conflict() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::post()
            .uri("/api/players")
            .set_json(serde_json::json!({ "name": "PETER", "age": 30, "type": "amateur" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn invalid_score_is_bad_request() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::post()
            .uri("/api/matches")
            .set_json(serde_json::json!({
                "player_a": "Peter", "player_b": "Roger", "score": "6:5", "date": "2025-06-01"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("6:5"));
    }

    #[actix_web::test]
    async fn player_stats_and_blank_name() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/api/stats/player?name=novak")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["matches"], 2);
        assert_eq!(body["wins"], 0);
        assert_eq!(body["losses"], 2);

        let req = test::TestRequest::get()
            .uri("/api/stats/player?name=%20")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn leaderboard_limit_and_export() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/api/stats/leaderboard?limit=1")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Peter");

        let req = test::TestRequest::get()
            .uri("/api/stats/leaderboard?exclude_winless=true")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 2);

        let req = test::TestRequest::get().uri("/api/stats/export").to_request();
        let text = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
        assert!(text.starts_with("Name;Matches;Wins;Losses;WinRate(%)\n"));
        assert!(text.contains("Novak;2;0;2;0.0\n"));
    }

    #[actix_web::test]
    async fn deleting_player_with_matches_is_refused() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::delete().uri("/api/players/roger").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
        let req = test::TestRequest::get().uri("/api/players/nobody").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
