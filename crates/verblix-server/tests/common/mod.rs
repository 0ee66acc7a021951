#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::{Body, to_bytes};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use futures::stream::{self, StreamExt};
use jiff::SignedDuration;
use serde_json::{Value, json};
use tower::ServiceExt;

use verblix_core::models::turn::Turn;
use verblix_model::error::ModelError;
use verblix_model::stream::{FragmentStream, ModelStream};
use verblix_server::state::AppState;

/// One scripted upstream step.
#[derive(Clone)]
pub enum Step {
    Fragment(&'static str),
    Fail(&'static str),
}

/// A model that replays a fixed script and records what it was asked.
#[derive(Clone, Default)]
pub struct ScriptedModel {
    script: Vec<Step>,
    pub calls: Arc<Mutex<Vec<(String, Vec<Turn>)>>>,
    pub polled: Arc<AtomicUsize>,
    pub dropped: Arc<AtomicBool>,
}

impl ScriptedModel {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl ModelStream for ScriptedModel {
    fn stream_reply(&self, prompt: String, history: Vec<Turn>) -> FragmentStream {
        self.calls.lock().unwrap().push((prompt, history));
        let polled = self.polled.clone();
        let flag = DropFlag(self.dropped.clone());
        let steps = self.script.clone().into_iter();

        stream::unfold((steps, flag), move |(mut steps, flag)| {
            let polled = polled.clone();
            async move {
                polled.fetch_add(1, Ordering::SeqCst);
                match steps.next()? {
                    Step::Fragment(text) => Some((Ok(text.to_string()), (steps, flag))),
                    Step::Fail(reason) => {
                        // Nothing follows a failure.
                        let rest = Vec::new().into_iter();
                        Some((Err(ModelError::Upstream(reason.to_string())), (rest, flag)))
                    }
                }
            }
        })
        .boxed()
    }
}

pub fn app(model: ScriptedModel) -> Router {
    let state = AppState::new(Arc::new(model), SignedDuration::from_hours(24), false);
    verblix_server::router(state)
}

pub fn json_request(method: &str, uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// `name=value` part of the response's `Set-Cookie` header.
pub fn session_cookie(response: &Response<Body>) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().to_string()
}

/// Register a user and return the session cookie to send back.
pub async fn register(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            &json!({"username": username, "password": "hunter2"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    session_cookie(&response)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
