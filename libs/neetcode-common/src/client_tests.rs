/// HTTP tests for ApiClient
///
/// Each test binds a throwaway axum server on 127.0.0.1:0 that answers like
/// the platform API, then points an ApiClient at it.

#[cfg(test)]
mod api_client_tests {
    use crate::client::{
        ApiClient, ExecutionBackend, HistoryQuery, ProblemBackend, ProblemQuery, SubmissionBackend,
    };
    use crate::config::ClientConfig;
    use crate::error::ClientError;
    use crate::types::{ExecutionRequest, NewSubmission, SubmissionKind, SubmissionStatus};
    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Authorization headers and bodies the fake server received
    #[derive(Default)]
    struct Seen {
        auth: Vec<Option<String>>,
        bodies: Vec<Value>,
        queries: Vec<HashMap<String, String>>,
    }

    type Shared = Arc<Mutex<Seen>>;

    fn record(seen: &Shared, headers: &HeaderMap, body: Option<Value>) {
        let mut seen = seen.lock().unwrap();
        seen.auth.push(
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        );
        if let Some(body) = body {
            seen.bodies.push(body);
        }
    }

    async fn execute(
        State(seen): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        record(&seen, &headers, Some(body));
        Json(json!({ "token": "tok-42" }))
    }

    async fn execution_status(Path(token): Path<String>) -> Json<Value> {
        Json(json!({
            "token": token,
            "status": { "id": 3, "description": "Accepted" },
            "stdout": "8\n",
            "stderr": null,
            "compile_output": null
        }))
    }

    async fn create_submission(
        State(seen): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        record(&seen, &headers, Some(body.clone()));
        if body["problemId"] == "missing" {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Problem not found" })));
        }
        (
            StatusCode::CREATED,
            Json(json!({
                "submission": {
                    "_id": "s1",
                    "problemId": body["problemId"],
                    "language": body["language"],
                    "status": "pending"
                }
            })),
        )
    }

    async fn my_submissions(
        State(seen): State<Shared>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        seen.lock().unwrap().queries.push(query);
        Json(json!({
            "submissions": [
                { "_id": "s2", "status": "accepted", "score": 100 },
                { "_id": "s1", "status": "wrong_answer", "testCasesPassed": 2, "totalTestCases": 5 }
            ],
            "pagination": { "total": 2, "offset": 0, "limit": 20 }
        }))
    }

    async fn get_submission(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
        match id.as_str() {
            "s1" => (
                StatusCode::OK,
                Json(json!({
                    "submission": {
                        "_id": "s1",
                        "status": "wrong_answer",
                        "testCasesPassed": 2,
                        "totalTestCases": 5,
                        "failureDetails": { "input": "1 2", "expected": "3", "output": "4" }
                    }
                })),
            ),
            "a?b" => (
                StatusCode::OK,
                Json(json!({ "submission": { "_id": "a?b", "status": "accepted" } })),
            ),
            "private" => (StatusCode::FORBIDDEN, Json(json!({ "error": "Access denied" }))),
            "garbled" => (StatusCode::OK, Json(json!({ "unexpected": true }))),
            _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "Submission not found" }))),
        }
    }

    async fn get_problem(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
        if id == "locked" {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "No token provided" })));
        }
        (
            StatusCode::OK,
            Json(json!({
                "problem": {
                    "_id": id,
                    "title": "Two Sum",
                    "description": "Add two numbers",
                    "type": "dsa",
                    "difficulty": "easy",
                    "tags": ["math"],
                    "timeLimit": 2000,
                    "memoryLimit": 256,
                    "languages": ["python", "java"]
                },
                "sampleTestCases": [
                    { "_id": "tc1", "input": "3 5", "expectedOutput": "8", "isSample": true }
                ]
            })),
        )
    }

    async fn list_problems(
        State(seen): State<Shared>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        seen.lock().unwrap().queries.push(query);
        Json(json!({
            "problems": [
                { "_id": "p1", "title": "Two Sum", "type": "dsa", "difficulty": "easy", "languages": ["python"] },
                { "_id": "p2", "title": "Valid Anagram", "type": "dsa", "difficulty": "easy" }
            ],
            "pagination": { "total": 42, "offset": 0, "limit": 2 }
        }))
    }

    async fn spawn_server() -> (String, Shared) {
        let seen = Shared::default();
        let app = Router::new()
            .route("/api/execute/execute", post(execute))
            .route("/api/execute/execute/:token/status", get(execution_status))
            .route("/api/submissions", post(create_submission))
            .route("/api/submissions/me", get(my_submissions))
            .route("/api/submissions/:id", get(get_submission))
            .route("/api/problems", get(list_problems))
            .route("/api/problems/:id", get(get_problem))
            .with_state(Arc::clone(&seen));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    fn client(base: &str, token: Option<&str>) -> ApiClient {
        let config = ClientConfig {
            api_base_url: base.to_string(),
            auth_token: token.map(str::to_string),
            ..ClientConfig::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_execute_returns_token_with_bearer() {
        let (base, seen) = spawn_server().await;
        let api = client(&base, Some("secret"));

        let token = api
            .execute(&ExecutionRequest {
                source_code: "print(8)".into(),
                language_id: 71,
                stdin: "3 5".into(),
            })
            .await
            .unwrap();
        assert_eq!(token, "tok-42");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.auth[0].as_deref(), Some("Bearer secret"));
        assert_eq!(seen.bodies[0]["language_id"], 71);
        assert_eq!(seen.bodies[0]["stdin"], "3 5");
        assert_eq!(seen.bodies[0]["source_code"], "print(8)");
    }

    #[tokio::test]
    async fn test_no_token_sends_no_auth_header() {
        let (base, seen) = spawn_server().await;
        let api = client(&base, None);

        api.execute(&ExecutionRequest {
            source_code: String::new(),
            language_id: 63,
            stdin: String::new(),
        })
        .await
        .unwrap();
        assert_eq!(seen.lock().unwrap().auth[0], None);
    }

    #[tokio::test]
    async fn test_execution_status_parses_judge_payload() {
        let (base, _) = spawn_server().await;
        let api = client(&base, None);

        let result = api.execution_status("tok-42").await.unwrap();
        assert_eq!(result.token.as_deref(), Some("tok-42"));
        assert!(result.is_terminal());
        assert_eq!(result.stdout.as_deref(), Some("8\n"));
    }

    #[tokio::test]
    async fn test_submit_unwraps_envelope() {
        let (base, seen) = spawn_server().await;
        let api = client(&base, Some("secret"));

        let created = api
            .submit_code(&NewSubmission {
                problem_id: "p1".into(),
                code: "print(1)".into(),
                language: "python".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, "s1");
        assert_eq!(created.status, SubmissionStatus::Pending);
        assert_eq!(created.problem_id.as_deref(), Some("p1"));
        assert_eq!(seen.lock().unwrap().bodies[0]["problemId"], "p1");
    }

    #[tokio::test]
    async fn test_error_body_becomes_message() {
        let (base, _) = spawn_server().await;
        let api = client(&base, None);

        let err = api
            .submit_code(&NewSubmission {
                problem_id: "missing".into(),
                code: String::new(),
                language: "python".into(),
            })
            .await
            .unwrap_err();
        match err {
            ClientError::Server { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Problem not found");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_submission_with_failure_details() {
        let (base, _) = spawn_server().await;
        let api = client(&base, None);

        let sub = api.get_submission("s1").await.unwrap();
        assert_eq!(sub.status, SubmissionStatus::WrongAnswer);
        assert_eq!(sub.test_cases_passed, Some(2));
        assert_eq!(sub.failure_details.unwrap().output, "4");
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let (base, _) = spawn_server().await;
        let api = client(&base, None);

        assert!(matches!(api.get_submission("private").await, Err(ClientError::Forbidden)));
        assert!(matches!(api.get_problem("locked").await, Err(ClientError::Unauthorized)));
        assert!(matches!(
            api.get_submission("nope").await,
            Err(ClientError::Server { status: 404, .. })
        ));
        assert!(matches!(api.get_submission("garbled").await, Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn test_get_problem_with_samples() {
        let (base, _) = spawn_server().await;
        let api = client(&base, None);

        let detail = api.get_problem("p1").await.unwrap();
        assert_eq!(detail.problem.title, "Two Sum");
        assert_eq!(detail.problem.time_limit, 2000);
        assert_eq!(detail.sample_test_cases.len(), 1);
        assert_eq!(detail.sample_test_cases[0].input, "3 5");
        assert_eq!(detail.sample_test_cases[0].expected_output, "8");
    }

    #[tokio::test]
    async fn test_history_sends_query() {
        let (base, seen) = spawn_server().await;
        let api = client(&base, Some("secret"));

        let page = api
            .my_submissions(&HistoryQuery {
                kind: Some(SubmissionKind::Dsa),
                limit: Some(20),
                offset: None,
            })
            .await
            .unwrap();
        assert_eq!(page.submissions.len(), 2);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.submissions[0].score, Some(100.0));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.queries[0].get("type").map(String::as_str), Some("dsa"));
        assert_eq!(seen.queries[0].get("limit").map(String::as_str), Some("20"));
        assert!(!seen.queries[0].contains_key("offset"));
    }

    #[tokio::test]
    async fn test_ids_are_path_segments() {
        let (base, _) = spawn_server().await;
        let api = client(&base, None);

        // Reaches the handler as one decoded segment, not "a" plus a query
        let sub = api.get_submission("a?b").await.unwrap();
        assert_eq!(sub.id, "a?b");
    }

    #[tokio::test]
    async fn test_list_problems_sends_filters() {
        let (base, seen) = spawn_server().await;
        let api = client(&base, None);

        let page = api
            .list_problems(&ProblemQuery {
                kind: Some("dsa".into()),
                difficulty: Some("easy".into()),
                search: Some("two sum".into()),
                limit: Some(2),
                offset: None,
            })
            .await
            .unwrap();
        assert_eq!(page.problems.len(), 2);
        assert_eq!(page.problems[0].title, "Two Sum");
        assert_eq!(page.pagination.total, 42);

        let seen = seen.lock().unwrap();
        let query = &seen.queries[0];
        assert_eq!(query.get("type").map(String::as_str), Some("dsa"));
        assert_eq!(query.get("difficulty").map(String::as_str), Some("easy"));
        assert_eq!(query.get("search").map(String::as_str), Some("two sum"));
        assert!(!query.contains_key("offset"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = client(&format!("http://{}", addr), None);
        let err = api.execution_status("tok").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
