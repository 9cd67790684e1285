//! Test harness: a fully built app over a throwaway database and upload dir,
//! driven in-process through `tower::ServiceExt::oneshot`.
#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use forum::config::AppCfg;
use forum::AppState;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "forum-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub cfg: AppCfg,
    dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let root = tempfile::tempdir().unwrap();
        let cfg = AppCfg {
            database_url: root
                .path()
                .join("instance")
                .join("forum.db")
                .to_string_lossy()
                .into_owned(),
            upload_dir: root.path().join("static").join("uploads"),
            ..AppCfg::default()
        };
        let state = AppState::build(&cfg).await.unwrap();
        let router = forum::router(state.clone());

        Self {
            router,
            state,
            cfg,
            dir: root,
        }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::get(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut req = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        self.send(req.body(Body::from(form_body(fields))).unwrap())
            .await
    }

    pub async fn register(&self, username: &str, password: &str) -> Response<Body> {
        self.post_form(
            "/register",
            &[("username", username), ("password", password)],
            None,
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Response<Body> {
        self.post_form(
            "/login",
            &[("username", username), ("password", password)],
            None,
        )
        .await
    }

    /// Registers and logs in, returning the `name=value` session cookie.
    pub async fn signed_in(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;
        let resp = self.login(username, password).await;
        session_cookie(&resp).expect("login sets a session cookie")
    }

    pub async fn create_post(
        &self,
        cookie: Option<&str>,
        title: &str,
        content: &str,
        image: Option<(&str, &[u8])>,
    ) -> Response<Body> {
        let mut req = Request::post("/create").header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        let body = multipart_body(&[("title", title), ("content", content)], image);
        self.send(req.body(Body::from(body)).unwrap()).await
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.cfg.upload_dir.clone()
    }

    pub fn count_users_named(&self, name: &str) -> i64 {
        use forum::schema::user;

        let mut conn = SqliteConnection::establish(&self.cfg.database_url).unwrap();
        user::table
            .filter(user::username.eq(name))
            .count()
            .get_result(&mut conn)
            .unwrap()
    }
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub fn set_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// The `name=value` part of the response's `Set-Cookie`, ready to send back.
pub fn session_cookie(resp: &Response<Body>) -> Option<String> {
    let raw = set_cookie(resp)?;
    raw.split(';').next().map(str::to_owned)
}

pub fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect()
}

pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
