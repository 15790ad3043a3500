//! Crate-level tests: use cases over the in-memory repository, and the
//! router end to end with `tower::ServiceExt::oneshot`.

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;

    use platform::password::ClearTextPassword;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::user::User;
    use crate::domain::value_object::{
        user_id::UserId, user_name::UserName, user_password::UserPassword, user_role::UserRole,
    };
    use crate::infra::memory::InMemoryAuthRepository;

    pub const PASSWORD: &str = "Hodl#Sats2025";

    pub fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig::development())
    }

    pub fn user(name: &str, role: UserRole) -> User {
        let hash = ClearTextPassword::new(PASSWORD.to_string())
            .unwrap()
            .hash(None)
            .unwrap();
        User {
            user_id: UserId::new(),
            user_name: UserName::new(name).unwrap(),
            user_role: role,
            password_hash: UserPassword::new(hash),
        }
    }

    /// Repository holding `satoshi` (member) and `vitalik` (student)
    pub fn seeded_repo() -> (InMemoryAuthRepository, User, User) {
        let repo = InMemoryAuthRepository::new();
        let member = user("satoshi", UserRole::Member);
        let student = user("vitalik", UserRole::Student);
        repo.insert_user(member.clone());
        repo.insert_user(student.clone());
        (repo, member, student)
    }
}

#[cfg(test)]
mod sign_in_tests {
    use std::sync::Arc;

    use platform::client::ClientInfo;

    use super::fixtures::*;
    use crate::application::{
        CheckSessionUseCase, SessionEvent, SessionEvents, SignInInput, SignInUseCase,
        SignOutUseCase,
    };
    use crate::domain::value_object::user_role::UserRole;
    use crate::error::{AuthError, INVALID_CREDENTIALS_MESSAGE};
    use crate::infra::memory::InMemoryAuthRepository;

    fn input(username: &str, password: &str) -> SignInInput {
        SignInInput {
            username: username.to_string(),
            password: password.to_string(),
            remember_me: false,
        }
    }

    #[tokio::test]
    async fn test_sign_in_session_belongs_to_matched_user() {
        let (repo, member, _) = seeded_repo();
        let repo = Arc::new(repo);
        let events = SessionEvents::default();
        let mut rx = events.subscribe();
        let use_case = SignInUseCase::new(repo.clone(), repo.clone(), config(), events);

        let output = use_case
            .execute(input("Satoshi", PASSWORD), ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(output.session.user_id, member.user_id);
        assert_eq!(repo.session_count(), 1);
        assert!(matches!(
            rx.recv().await.unwrap(),
            SessionEvent::SignedIn { user_id, .. } if user_id == member.user_id
        ));
    }

    #[tokio::test]
    async fn test_failed_sign_in_is_generic_and_creates_nothing() {
        let (repo, _, _) = seeded_repo();
        let repo = Arc::new(repo);
        let use_case = SignInUseCase::new(repo.clone(), repo.clone(), config(), SessionEvents::default());

        for (username, password) in [
            ("satoshi", "wrong-password"),
            ("nobody", PASSWORD),
            ("a b", PASSWORD),
            ("satoshi", ""),
        ] {
            let err = use_case
                .execute(input(username, password), ClientInfo::default())
                .await
                .err()
                .unwrap();
            assert!(matches!(err, AuthError::InvalidCredentials));
            assert_eq!(err.to_app_error().public_message(), INVALID_CREDENTIALS_MESSAGE);
        }

        assert_eq!(repo.session_count(), 0);
    }

    #[tokio::test]
    async fn test_single_letter_user_can_sign_in() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let short = user("u", UserRole::Member);
        repo.insert_user(short.clone());
        let use_case = SignInUseCase::new(repo.clone(), repo.clone(), config(), SessionEvents::default());

        let output = use_case
            .execute(input(" U ", PASSWORD), ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(output.session.user_id, short.user_id);
        assert_eq!(repo.session_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_out_invalidates_token() {
        let (repo, _, _) = seeded_repo();
        let repo = Arc::new(repo);
        let config = config();
        let events = SessionEvents::default();
        let sign_in = SignInUseCase::new(repo.clone(), repo.clone(), config.clone(), events.clone());
        let check = CheckSessionUseCase::new(repo.clone(), config.clone());
        let sign_out = SignOutUseCase::new(repo.clone(), config.clone(), events);

        let output = sign_in
            .execute(input("satoshi", PASSWORD), ClientInfo::default())
            .await
            .unwrap();
        assert!(check.execute(&output.session_token).await.is_ok());

        sign_out.execute(&output.session_token).await.unwrap();
        assert!(matches!(
            check.execute(&output.session_token).await,
            Err(AuthError::SessionInvalid)
        ));
    }

    #[tokio::test]
    async fn test_sign_out_all_keeps_current() {
        let (repo, _, _) = seeded_repo();
        let repo = Arc::new(repo);
        let config = config();
        let events = SessionEvents::default();
        let sign_in = SignInUseCase::new(repo.clone(), repo.clone(), config.clone(), events.clone());
        let check = CheckSessionUseCase::new(repo.clone(), config.clone());
        let sign_out = SignOutUseCase::new(repo.clone(), config.clone(), events);

        let first = sign_in
            .execute(input("satoshi", PASSWORD), ClientInfo::default())
            .await
            .unwrap();
        let second = sign_in
            .execute(input("satoshi", PASSWORD), ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(sign_out.execute_all(&second.session_token).await.unwrap(), 1);
        assert!(check.execute(&first.session_token).await.is_err());
        assert!(check.execute(&second.session_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_tampered_token_is_rejected() {
        let (repo, _, _) = seeded_repo();
        let repo = Arc::new(repo);
        let config = config();
        let sign_in =
            SignInUseCase::new(repo.clone(), repo.clone(), config.clone(), SessionEvents::default());
        let check = CheckSessionUseCase::new(repo.clone(), config);

        let output = sign_in
            .execute(input("satoshi", PASSWORD), ClientInfo::default())
            .await
            .unwrap();
        let mut tampered = output.session_token.clone();
        tampered.pop();
        tampered.push(if output.session_token.ends_with('A') { 'B' } else { 'A' });

        assert!(matches!(
            check.execute(&tampered).await,
            Err(AuthError::SessionInvalid)
        ));
    }
}

#[cfg(test)]
mod gate_tests {
    use std::sync::Arc;

    use platform::backoff::Backoff;
    use platform::client::ClientInfo;

    use super::fixtures::*;
    use crate::application::{AccessGate, SessionEvents, SessionRoleVerifier, SignInInput, SignInUseCase};
    use crate::domain::value_object::access::{AccessPolicy, AccessState, DenyReason};

    #[tokio::test]
    async fn test_session_gate_by_role() {
        let (repo, _, student) = seeded_repo();
        let repo = Arc::new(repo);
        let config = config();
        let sign_in =
            SignInUseCase::new(repo.clone(), repo.clone(), config.clone(), SessionEvents::default());
        let gate = AccessGate::new(
            Arc::new(SessionRoleVerifier::new(repo.clone(), config.clone())),
            Backoff::default(),
        );

        let member_token = sign_in
            .execute(
                SignInInput {
                    username: "satoshi".into(),
                    password: PASSWORD.into(),
                    remember_me: false,
                },
                ClientInfo::default(),
            )
            .await
            .unwrap()
            .session_token;
        let student_token = sign_in
            .execute(
                SignInInput {
                    username: "vitalik".into(),
                    password: PASSWORD.into(),
                    remember_me: true,
                },
                ClientInfo::default(),
            )
            .await
            .unwrap()
            .session_token;

        assert!(gate.resolve(Some(&member_token), AccessPolicy::Authenticated).await.is_granted());
        assert_eq!(
            gate.resolve(Some(&member_token), AccessPolicy::Entitled).await,
            AccessState::denied(DenyReason::NotEntitled)
        );

        match gate.resolve(Some(&student_token), AccessPolicy::Entitled).await {
            AccessState::Granted { principal } => assert_eq!(principal.user_id, student.user_id),
            other => panic!("expected grant, got {other:?}"),
        }

        assert_eq!(
            gate.resolve(Some("not-a-token"), AccessPolicy::Authenticated).await,
            AccessState::denied(DenyReason::Unauthenticated)
        );
    }
}

#[cfg(test)]
mod router_tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::Router;
    use axum::body::{Body, BodyDataStream, to_bytes};
    use axum::extract::ConnectInfo;
    use axum::http::{Request, StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::{Extension, Json};
    use futures::StreamExt;
    use kernel::error::app_error::GENERIC_SERVER_MESSAGE;
    use kernel::principal::Principal;
    use tower::ServiceExt;

    use super::fixtures::*;
    use crate::application::config::AuthConfig;
    use crate::domain::value_object::access::AccessPolicy;
    use crate::error::INVALID_CREDENTIALS_MESSAGE;
    use crate::infra::memory::InMemoryAuthRepository;
    use crate::presentation::{AuthAppState, GateState, auth_router, require_access};

    fn app() -> (Router, AuthAppState<InMemoryAuthRepository>) {
        app_with(AuthConfig::development())
    }

    fn app_with(config: AuthConfig) -> (Router, AuthAppState<InMemoryAuthRepository>) {
        let (repo, _, _) = seeded_repo();
        let state = AuthAppState::new(repo, config);

        let protected = Router::new()
            .route(
                "/premium",
                get(|Extension(p): Extension<Principal>| async move { Json(p) }),
            )
            .route_layer(from_fn_with_state(
                GateState::new(state.clone(), AccessPolicy::Entitled),
                require_access::<InMemoryAuthRepository>,
            ));

        let router = Router::new()
            .nest("/api/auth", auth_router(state.clone()))
            .merge(protected);
        (router, state)
    }

    fn sign_in_request(username: &str, password: &str) -> Request<Body> {
        Request::post("/api/auth/signin")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::from(
                serde_json::json!({
                    "username": username,
                    "password": password,
                    "rememberMe": true
                })
                .to_string(),
            ))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn token_for(router: &Router, username: &str) -> String {
        let response = router
            .clone()
            .oneshot(sign_in_request(username, PASSWORD))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_sign_in_sets_cookie_and_returns_user() {
        let (router, _) = app();
        let response = router.oneshot(sign_in_request("vitalik", PASSWORD)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with("akademi_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains(&format!("Max-Age={}", 7 * 24 * 3600)));

        let body = json_body(response).await;
        assert_eq!(body["user"]["username"], "vitalik");
        assert!(body["expiresAtMs"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_sign_in_failure_is_generic() {
        let (router, _) = app();
        let response = router.oneshot(sign_in_request("vitalik", "nope-nope")).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(json_body(response).await["detail"], INVALID_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn test_sign_in_rate_limited_per_ip() {
        let (router, _) = app();
        for _ in 0..10 {
            let response = router
                .clone()
                .oneshot(sign_in_request("satoshi", "wrong-password"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = router.oneshot(sign_in_request("satoshi", PASSWORD)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().get(header::RETRY_AFTER).is_some());
    }

    #[tokio::test]
    async fn test_verify_role_statuses() {
        let (router, _) = app();
        let member = token_for(&router, "satoshi").await;
        let student = token_for(&router, "vitalik").await;

        let verify = |token: Option<&str>, scope: &str| {
            let mut builder = Request::get(format!("/api/auth/verify-role?scope={scope}"));
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            builder.body(Body::empty()).unwrap()
        };

        let response = router.clone().oneshot(verify(None, "session")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = router.clone().oneshot(verify(Some(member.as_str()), "session")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.clone().oneshot(verify(Some(member.as_str()), "entitlement")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = router.oneshot(verify(Some(student.as_str()), "entitlement")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["username"], "vitalik");
        assert_eq!(body["entitled"], true);
    }

    #[tokio::test]
    async fn test_access_reports_state() {
        let (router, _) = app();
        let response = router
            .oneshot(Request::get("/api/auth/access?scope=entitlement").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "state": "denied", "reason": "unauthenticated" })
        );
    }

    #[tokio::test]
    async fn test_require_access_denials_and_grant() {
        let (router, _) = app();

        let response = router
            .clone()
            .oneshot(Request::get("/premium").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["x-auth-required"], "true");
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let response = router
            .clone()
            .oneshot(
                Request::get("/premium")
                    .header(header::COOKIE, "akademi_session=forged.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(
            response.headers()[header::SET_COOKIE]
                .to_str()
                .unwrap()
                .contains("Max-Age=0")
        );

        let member = token_for(&router, "satoshi").await;
        let response = router
            .clone()
            .oneshot(
                Request::get("/premium")
                    .header(header::AUTHORIZATION, format!("Bearer {member}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let student = token_for(&router, "vitalik").await;
        let response = router
            .oneshot(
                Request::get("/premium")
                    .header(header::COOKIE, format!("akademi_session={student}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["username"], "vitalik");
    }

    #[tokio::test]
    async fn test_sign_out_clears_cookie_and_session() {
        let (router, state) = app();
        let token = token_for(&router, "satoshi").await;
        assert_eq!(state.repo.session_count(), 1);

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/auth/signout")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(
            response.headers()[header::SET_COOKIE]
                .to_str()
                .unwrap()
                .contains("Max-Age=0")
        );
        assert_eq!(state.repo.session_count(), 0);

        let response = router
            .oneshot(
                Request::get("/api/auth/status")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_body(response).await["authenticated"], false);
    }

    fn from_peer(mut request: Request<Body>, peer: &str, forwarded_for: &str) -> Request<Body> {
        let addr: SocketAddr = format!("{peer}:40000").parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        request
            .headers_mut()
            .insert("x-forwarded-for", forwarded_for.parse().unwrap());
        request
    }

    #[tokio::test]
    async fn test_rotating_forwarded_for_shares_peer_bucket() {
        let (router, _) = app();

        for i in 0..10 {
            let request = from_peer(
                sign_in_request("satoshi", "wrong-password"),
                "198.51.100.20",
                &format!("198.51.100.{i}"),
            );
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let request = from_peer(
            sign_in_request("satoshi", "wrong-password"),
            "198.51.100.20",
            "198.51.100.99",
        );
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_forwarded_for_honoured_behind_trusted_proxy() {
        let (router, _) = app_with(AuthConfig {
            trusted_proxies: vec!["10.0.0.1".parse().unwrap()],
            ..AuthConfig::development()
        });

        for _ in 0..10 {
            let request = from_peer(
                sign_in_request("satoshi", "wrong-password"),
                "10.0.0.1",
                "203.0.113.1",
            );
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let limited = from_peer(sign_in_request("satoshi", PASSWORD), "10.0.0.1", "203.0.113.1");
        let response = router.clone().oneshot(limited).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let other = from_peer(sign_in_request("satoshi", PASSWORD), "10.0.0.1", "203.0.113.2");
        let response = router.oneshot(other).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sign_in_store_outage_is_generic_server_error() {
        let (router, state) = app();
        state.repo.set_unavailable(true);

        let response = router.oneshot(sign_in_request("satoshi", PASSWORD)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(json_body(response).await["detail"], GENERIC_SERVER_MESSAGE);

        state.repo.set_unavailable(false);
        assert_eq!(state.repo.session_count(), 0);
    }

    fn sse_field<'a>(frame: &'a str, name: &str) -> Option<&'a str> {
        frame
            .lines()
            .find_map(|l| l.strip_prefix(name))
            .map(str::trim_start)
    }

    /// Next `access` event's JSON payload from an SSE body
    async fn next_access_event(stream: &mut BodyDataStream, buf: &mut String) -> serde_json::Value {
        loop {
            if let Some(end) = buf.find("\n\n") {
                let frame: String = buf.drain(..end + 2).collect();
                let is_access = sse_field(&frame, "event:") == Some("access");
                let data = sse_field(&frame, "data:");
                if let (true, Some(data)) = (is_access, data) {
                    return serde_json::from_str(data).unwrap();
                }
                continue;
            }

            let chunk = tokio::time::timeout(Duration::from_secs(5), stream.next())
                .await
                .expect("no event within 5s")
                .expect("stream ended")
                .unwrap();
            buf.push_str(std::str::from_utf8(&chunk).unwrap());
        }
    }

    #[tokio::test]
    async fn test_events_report_sign_out_from_elsewhere() {
        let (router, _) = app();
        let token = token_for(&router, "satoshi").await;

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/auth/events?scope=session")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/event-stream")
        );

        let mut stream = response.into_body().into_data_stream();
        let mut buf = String::new();

        let event = next_access_event(&mut stream, &mut buf).await;
        assert_eq!(event["state"], "loading");
        let event = next_access_event(&mut stream, &mut buf).await;
        assert_eq!(event["state"], "granted");
        assert_eq!(event["principal"]["username"], "satoshi");

        let response = router
            .oneshot(
                Request::post("/api/auth/signout")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let event = next_access_event(&mut stream, &mut buf).await;
        assert_eq!(
            event,
            serde_json::json!({ "state": "denied", "reason": "unauthenticated" })
        );
    }
}
