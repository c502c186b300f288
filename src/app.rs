use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{calendar, groceries, meals};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(meals::router())
                .merge(calendar::router())
                .merge(groceries::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn send(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn tacos() -> Value {
        json!({
            "title": "Tacos",
            "day": "Tue",
            "mealType": "Dinner",
            "ingredients": ["tortillas", "beef"]
        })
    }

    #[tokio::test]
    async fn health() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(get("/api/v1/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_vote_and_list() {
        let app = build_app(AppState::fake());
        let (status, created) = call(&app, send("POST", "/api/v1/meals", tacos())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["upvotes"], 0);
        assert_eq!(created["isPicked"], false);
        assert!(created["placeholderColor"].is_string());
        let id = created["id"].as_str().unwrap().to_string();

        for _ in 0..3 {
            let (status, _) = call(
                &app,
                send("POST", &format!("/api/v1/meals/{id}/vote"), json!({"direction": "up"})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        let (_, meal) = call(&app, get(&format!("/api/v1/meals/{id}"))).await;
        assert_eq!(meal["upvotes"], 3);
        assert_eq!(meal["downvotes"], 0);
        assert_eq!(meal["netVotes"], 3);

        let (_, list) = call(&app, get("/api/v1/meals?sort=votes&meal_type=Dinner")).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        let (_, none) = call(&app, get("/api/v1/meals?day=Mon")).await;
        assert!(none.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let app = build_app(AppState::fake());
        let (status, _) = call(
            &app,
            send("POST", "/api/v1/meals", json!({"title": " ", "day": "Mon", "mealType": "Lunch"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn pick_requires_user_and_shows_on_calendar() {
        let app = build_app(AppState::fake());
        let (_, created) = call(&app, send("POST", "/api/v1/meals", tacos())).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = call(&app, send("POST", &format!("/api/v1/meals/{id}/pick"), json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let user = Uuid::new_v4();
        let pick = || {
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/meals/{id}/pick"))
                .header("x-user-id", user.to_string())
                .body(Body::empty())
                .unwrap()
        };
        let (status, picked) = call(&app, pick()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(picked["isPicked"], true);
        assert_eq!(picked["pickedByUserId"], user.to_string());
        assert!(picked["pickedAt"].is_string());

        // fake clock is Sunday 2026-10-18, next Tuesday is the 20th
        let (_, day) = call(&app, get("/api/v1/calendar/day?date=2026-10-20&meal_type=Dinner")).await;
        assert_eq!(day["day"], "Tue");
        assert_eq!(day["slots"][0]["meals"].as_array().unwrap().len(), 1);
        assert_eq!(day["slots"][0]["featured"]["id"], id.as_str());

        let (_, week) = call(&app, get("/api/v1/calendar/week")).await;
        assert_eq!(week["weekStart"], "2026-10-18");
        assert_eq!(week["days"][2]["slots"][2]["meals"].as_array().unwrap().len(), 1);

        let (_, unpicked) = call(&app, pick()).await;
        assert_eq!(unpicked["isPicked"], false);
        assert!(unpicked.get("pickedByUserId").is_none());
        let (_, day) = call(&app, get("/api/v1/calendar/day?date=2026-10-20&meal_type=Dinner")).await;
        assert!(day["slots"][0]["meals"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn month_view_and_bad_date() {
        let app = build_app(AppState::fake());
        let (status, month) = call(&app, get("/api/v1/calendar/month?date=2026-10-05")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(month["view"], "monthly");
        assert_eq!(month["weeks"].as_array().unwrap().len(), 5);

        let (status, _) = call(&app, get("/api/v1/calendar/week?date=yesterday")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn edit_and_delete_meal() {
        let app = build_app(AppState::fake());
        let (_, created) = call(&app, send("POST", "/api/v1/meals", tacos())).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, edited) = call(
            &app,
            send("PUT", &format!("/api/v1/meals/{id}"), json!({"title": "Fish tacos", "image": "fish.png"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["title"], "Fish tacos");
        assert_eq!(edited["image"], "fish.png");
        assert!(edited.get("placeholderColor").is_none());

        let (status, _) = call(&app, send("DELETE", &format!("/api/v1/meals/{id}"), json!(null))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, get(&format!("/api/v1/meals/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn grocery_flow() {
        let app = build_app(AppState::fake());
        let (_, created) = call(&app, send("POST", "/api/v1/meals", tacos())).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, added) = call(
            &app,
            send("POST", &format!("/api/v1/groceries/from-meal/{id}"), json!(null)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let added = added.as_array().unwrap().clone();
        assert_eq!(added.len(), 2);
        assert!(added.iter().all(|i| i["recipe"] == "Tacos" && i["checked"] == false));
        assert_ne!(added[0]["id"], added[1]["id"]);

        let first = added[0]["id"].as_str().unwrap();
        let (_, toggled) = call(
            &app,
            send("POST", &format!("/api/v1/groceries/{first}/toggle"), json!(null)),
        )
        .await;
        assert_eq!(toggled["checked"], true);

        let (_, removed) = call(
            &app,
            send("POST", "/api/v1/groceries/delete", json!({"ids": [first]})),
        )
        .await;
        assert_eq!(removed["removed"], 1);

        let (_, cleared) = call(&app, send("DELETE", "/api/v1/groceries", json!(null))).await;
        assert_eq!(cleared["removed"], 1);
        let (_, list) = call(&app, get("/api/v1/groceries")).await;
        assert!(list.as_array().unwrap().is_empty());

        let (status, _) = call(
            &app,
            send("POST", "/api/v1/groceries/from-meal/missing", json!(null)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
