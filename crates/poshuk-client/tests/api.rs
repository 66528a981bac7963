//! Integration tests driving [`ApiClient`] against an in-process stub
//! server. The stub records every request it sees so the tests can assert
//! not just what came back, but what was (and was not) put on the wire.

use std::{
  collections::HashMap,
  net::SocketAddr,
  sync::{Arc, Mutex},
};

use axum::{
  Json, Router,
  extract::Query,
  http::{HeaderMap, StatusCode, header},
  routing::{get, post},
};
use poshuk_client::{ApiClient, ApiConfig, CsrfToken, Error};
use poshuk_core::{
  account::{Account, Owner},
  filter::FilterCriteria,
  listing::Listing,
  record::{PersonType, Record, RecordDraft, Status, StatusScope},
};
use serde_json::json;

// ─── Stub plumbing ───────────────────────────────────────────────────────────

/// Append-only log of what reached the stub, one line per request.
#[derive(Clone, Default)]
struct RequestLog(Arc<Mutex<Vec<String>>>);

impl RequestLog {
  fn push(&self, entry: impl Into<String>) {
    self.0.lock().unwrap().push(entry.into());
  }

  fn entries(&self) -> Vec<String> {
    self.0.lock().unwrap().clone()
  }
}

async fn spawn(app: Router) -> SocketAddr {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  addr
}

fn client(addr: SocketAddr) -> ApiClient {
  ApiClient::new(ApiConfig {
    base_url: format!("http://{addr}"),
  })
  .unwrap()
}

fn csrf() -> CsrfToken {
  CsrfToken::new("tok123")
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn owner(id: i64) -> Owner {
  Owner {
    id,
    username: format!("user{id}"),
    email: format!("user{id}@example.com"),
  }
}

fn account(id: i64) -> Account {
  Account {
    id,
    username: format!("user{id}"),
    email: format!("user{id}@example.com"),
  }
}

fn record(id: i64, status: Status, owner_id: i64) -> Record {
  Record {
    id,
    name: Some(format!("Особа {id}")),
    picture: None,
    person_type: PersonType::Civilian,
    brigade: None,
    date_of_birth: None,
    status,
    region: Some("Харківська область".into()),
    settlement: None,
    circumstances: None,
    appearance: Some("чоловік, темне волосся".into()),
    last_update: None,
    owner: owner(owner_id),
  }
}

fn draft(status: Status) -> RecordDraft {
  RecordDraft::new(status, "чоловік, темне волосся")
}

/// `GET /captives/` handler over a fixed record set, filtering by the
/// backend's pipe-joined `status` query and logging the decoded scope.
fn captives_route(all: Vec<Record>, log: RequestLog) -> Router {
  Router::new().route(
    "/captives/",
    get({
      move |Query(params): Query<HashMap<String, String>>| {
        let all = all.clone();
        let log = log.clone();
        async move {
          let scope = params.get("status").cloned().unwrap_or_default();
          log.push(format!("GET /captives/ status={scope}"));
          let statuses: Vec<&str> = scope.split('|').collect();
          let matching: Vec<Record> = all
            .into_iter()
            .filter(|r| statuses.contains(&r.status.as_str()))
            .collect();
          Json(matching)
        }
      }
    }),
  )
}

// ─── Record store client ─────────────────────────────────────────────────────

#[tokio::test]
async fn status_scoped_fetch_requests_only_that_status() {
  let all = vec![
    record(1, Status::Searching, 1),
    record(2, Status::Informed, 1),
    record(3, Status::Informed, 1),
  ];
  let log = RequestLog::default();
  let addr = spawn(captives_route(all, log.clone())).await;

  let got = client(addr)
    .records_by_scope(StatusScope::One(Status::Informed))
    .await
    .unwrap();

  assert_eq!(got.len(), 2);
  assert!(got.iter().all(|r| r.status == Status::Informed));
  assert_eq!(log.entries(), vec!["GET /captives/ status=informed"]);
}

#[tokio::test]
async fn archive_scope_sends_the_pipe_joined_statuses() {
  let all = vec![
    record(1, Status::Searching, 1),
    record(2, Status::Deceased, 1),
    record(3, Status::Reunited, 1),
  ];
  let log = RequestLog::default();
  let addr = spawn(captives_route(all, log.clone())).await;

  let got = client(addr)
    .records_by_scope(StatusScope::Archive)
    .await
    .unwrap();

  assert_eq!(got.len(), 2);
  assert!(got.iter().all(|r| r.status.is_archived()));
  assert_eq!(log.entries(), vec!["GET /captives/ status=deceased|reunited"]);
}

#[tokio::test]
async fn missing_record_maps_to_not_found() {
  let app = Router::new().route(
    "/captives/{id}/",
    get(|| async { StatusCode::NOT_FOUND }),
  );
  let addr = spawn(app).await;

  let err = client(addr).record(404).await.unwrap_err();
  assert!(matches!(err, Error::NotFound));
  assert_eq!(err.user_message(), "Запис не знайдено");
}

#[tokio::test]
async fn records_by_owner_queries_user_id() {
  let log = RequestLog::default();
  let app = Router::new().route(
    "/captives/",
    get({
      let log = log.clone();
      move |Query(params): Query<HashMap<String, String>>| {
        let log = log.clone();
        async move {
          let user_id = params.get("user_id").cloned().unwrap_or_default();
          log.push(format!("GET /captives/ user_id={user_id}"));
          Json(vec![record(5, Status::Searching, 3)])
        }
      }
    }),
  );
  let addr = spawn(app).await;

  let got = client(addr).records_by_owner(3).await.unwrap();
  assert_eq!(got.len(), 1);
  assert_eq!(got[0].owner.id, 3);
  assert_eq!(log.entries(), vec!["GET /captives/ user_id=3"]);
}

// ─── Mutation gateway ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_with_empty_appearance_issues_no_request() {
  let log = RequestLog::default();
  let app = Router::new().fallback({
    let log = log.clone();
    move || {
      let log = log.clone();
      async move {
        log.push("unexpected request");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  });
  let addr = spawn(app).await;

  let err = client(addr)
    .create_record(&draft_with_appearance(""), &csrf())
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    Error::Validation(poshuk_core::Error::AppearanceRequired)
  ));
  assert!(log.entries().is_empty());
}

fn draft_with_appearance(appearance: &str) -> RecordDraft {
  RecordDraft::new(Status::Searching, appearance)
}

#[tokio::test]
async fn create_sends_the_anti_forgery_header() {
  let log = RequestLog::default();
  let app = Router::new().route(
    "/captives/",
    post({
      let log = log.clone();
      move |headers: HeaderMap| {
        let log = log.clone();
        async move {
          let token = headers
            .get("X-CSRFToken")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("<missing>")
            .to_owned();
          log.push(format!("POST /captives/ csrf={token}"));
          Json(record(10, Status::Searching, 1))
        }
      }
    }),
  );
  let addr = spawn(app).await;

  let created = client(addr)
    .create_record(&draft(Status::Searching), &csrf())
    .await
    .unwrap();

  assert_eq!(created.id, 10);
  assert_eq!(log.entries(), vec!["POST /captives/ csrf=tok123"]);
}

#[tokio::test]
async fn update_to_deceased_redirects_into_the_archive() {
  let log = RequestLog::default();
  let app = Router::new()
    .route(
      "/captives/{id}/",
      get({
        let log = log.clone();
        move || {
          let log = log.clone();
          async move {
            log.push("GET /captives/7/");
            Json(record(7, Status::Searching, 1))
          }
        }
      })
      .patch({
        let log = log.clone();
        move || {
          let log = log.clone();
          async move {
            log.push("PATCH /captives/7/");
            Json(record(7, Status::Deceased, 1))
          }
        }
      }),
    );
  let addr = spawn(app).await;

  let updated = client(addr)
    .update_record(Some(&account(1)), 7, &draft(Status::Deceased), &csrf())
    .await
    .unwrap();

  assert_eq!(updated.status, Status::Deceased);
  assert_eq!(updated.detail_path(), "/archive/7");
  assert_eq!(log.entries(), vec!["GET /captives/7/", "PATCH /captives/7/"]);
}

#[tokio::test]
async fn non_owner_delete_is_forbidden_and_never_dispatched() {
  let log = RequestLog::default();
  let app = Router::new().route(
    "/captives/{id}/",
    get({
      let log = log.clone();
      move || {
        let log = log.clone();
        async move {
          log.push("GET /captives/7/");
          Json(record(7, Status::Searching, 2))
        }
      }
    })
    .delete({
      let log = log.clone();
      move || {
        let log = log.clone();
        async move {
          log.push("DELETE /captives/7/");
          StatusCode::NO_CONTENT
        }
      }
    }),
  );
  let addr = spawn(app).await;

  let err = client(addr)
    .delete_record(Some(&account(1)), 7, &csrf())
    .await
    .unwrap_err();

  assert!(matches!(err, Error::Forbidden));
  assert_eq!(log.entries(), vec!["GET /captives/7/"]);
}

#[tokio::test]
async fn owner_delete_goes_through() {
  let app = Router::new().route(
    "/captives/{id}/",
    get(|| async { Json(record(7, Status::Searching, 1)) })
      .delete(|| async { StatusCode::NO_CONTENT }),
  );
  let addr = spawn(app).await;

  client(addr)
    .delete_record(Some(&account(1)), 7, &csrf())
    .await
    .unwrap();
}

// ─── Remote search ───────────────────────────────────────────────────────────

#[tokio::test]
async fn appearance_search_replaces_the_listing_until_reset() {
  let fetched = vec![
    record(1, Status::Informed, 1),
    record(2, Status::Informed, 1),
  ];
  let app = captives_route(fetched.clone(), RequestLog::default()).route(
    "/appearance_search/",
    post(|Json(body): Json<serde_json::Value>| async move {
      assert_eq!(body["appearance"], "чоловік, темне волосся");
      assert_eq!(body["status"], "informed");
      Json(vec![record(9, Status::Informed, 2)])
    }),
  );
  let addr = spawn(app).await;
  let api = client(addr);

  let baseline = api
    .records_by_scope(StatusScope::One(Status::Informed))
    .await
    .unwrap();
  let mut listing = Listing::new(baseline);

  let results = api
    .search_by_appearance(
      "чоловік, темне волосся",
      StatusScope::One(Status::Informed),
      &csrf(),
    )
    .await
    .unwrap();
  listing.apply_remote(results);

  let criteria = FilterCriteria::default();
  let visible = listing.visible(&criteria, "");
  assert_eq!(visible.len(), 1);
  assert_eq!(visible[0].id, 9);

  listing.reset();
  assert_eq!(listing.visible(&criteria, ""), fetched);
}

#[tokio::test]
async fn empty_appearance_query_is_rejected_client_side() {
  let addr = spawn(Router::new()).await;

  let err = client(addr)
    .search_by_appearance("  ", StatusScope::One(Status::Informed), &csrf())
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    Error::Validation(poshuk_core::Error::AppearanceRequired)
  ));
}

#[tokio::test]
async fn photo_search_posts_the_image_and_scope() {
  let app = Router::new().route(
    "/photo_search/",
    post(|headers: HeaderMap| async move {
      let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
      assert!(content_type.starts_with("multipart/form-data"));
      Json(vec![record(4, Status::Informed, 2)])
    }),
  );
  let addr = spawn(app).await;

  let photo = poshuk_core::record::PictureUpload {
    file_name:  "query.jpg".into(),
    media_type: "image/jpeg".into(),
    bytes:      vec![0xff, 0xd8, 0xff, 0xe0],
  };
  let got = client(addr)
    .search_by_photo(&photo, StatusScope::One(Status::Informed), &csrf())
    .await
    .unwrap();
  assert_eq!(got.len(), 1);
  assert_eq!(got[0].id, 4);
}

// ─── Session & accounts ──────────────────────────────────────────────────────

#[tokio::test]
async fn priming_reads_the_csrf_cookie_the_server_set() {
  let app = Router::new().route(
    "/",
    get(|| async {
      (
        [(header::SET_COOKIE, "csrftoken=abc123; Path=/")],
        "ok",
      )
    }),
  );
  let addr = spawn(app).await;
  let api = client(addr);

  assert!(api.csrf_token().is_none());
  let token = api.prime_csrf().await.unwrap();
  assert_eq!(token, Some(CsrfToken::new("abc123")));
}

#[tokio::test]
async fn anonymous_me_is_none_not_an_error() {
  let app = Router::new().route("/me/", get(|| async { StatusCode::FORBIDDEN }));
  let addr = spawn(app).await;

  let session = client(addr).session().await.unwrap();
  assert!(session.account.is_none());
  assert!(matches!(session.csrf(), Err(Error::MissingCsrf)));
}

#[tokio::test]
async fn login_failure_surfaces_the_server_detail() {
  let app = Router::new().route(
    "/login/",
    post(|| async {
      (
        StatusCode::BAD_REQUEST,
        Json(json!({ "detail": "Invalid username or password" })),
      )
    }),
  );
  let addr = spawn(app).await;

  let err = client(addr)
    .login("olena", "wrong", &csrf())
    .await
    .unwrap_err();
  match err {
    Error::Api { status, message } => {
      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert_eq!(message, "Invalid username or password");
    }
    other => panic!("expected Api error, got {other:?}"),
  }
}

#[tokio::test]
async fn login_refreshes_the_session_context() {
  let app = Router::new()
    .route(
      "/login/",
      post(|| async {
        (
          [(header::SET_COOKIE, "csrftoken=rotated; Path=/")],
          Json(json!({ "detail": "Logged in successfully." })),
        )
      }),
    )
    .route("/me/", get(|| async { Json(account(3)) }));
  let addr = spawn(app).await;

  let session = client(addr)
    .login("user3", "secret", &csrf())
    .await
    .unwrap();

  assert_eq!(session.account, Some(account(3)));
  assert_eq!(session.csrf().unwrap(), &CsrfToken::new("rotated"));
}
