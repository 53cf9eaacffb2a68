//! Router tests driven through `tower::ServiceExt::oneshot`.

mod test_utils;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use calamine::{Reader, open_workbook_auto_from_rs};
use castscript_core::BatchResultItem;
use castscript_export::export_items;
use castscript_server::{ServerConfig, router};
use serde_json::json;
use std::io::Cursor;
use test_utils::{
    ScriptedGenerator, app, body_bytes, body_json, echo, post_json, state_for, two_part_script,
};
use tower::ServiceExt;

#[tokio::test]
async fn test_health() {
    let response = app(ScriptedGenerator::responding(echo))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_gemini_returns_response() {
    let response = app(ScriptedGenerator::responding(echo))
        .oneshot(post_json("/api/gemini", json!({"prompt": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"response": "echo: Hello"}));
}

#[tokio::test]
async fn test_gemini_requires_prompt() {
    for body in [json!({}), json!({"prompt": ""}), json!({"prompt": "   "}), json!({"prompt": null})] {
        let generator = ScriptedGenerator::responding(echo);
        let response = app(generator.clone())
            .oneshot(post_json("/api/gemini", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Prompt is required"}));
        assert_eq!(generator.call_count(), 0);
    }
}

#[tokio::test]
async fn test_gemini_rejects_non_json_body() {
    let request = Request::post("/api/gemini")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("Hello"))
        .unwrap();

    let response = app(ScriptedGenerator::responding(echo))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Prompt is required"}));
}

#[tokio::test]
async fn test_gemini_upstream_failure_is_500() {
    let response = app(ScriptedGenerator::failing())
        .oneshot(post_json("/api/gemini", json!({"prompt": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Failed to process with Gemini API"})
    );
}

#[tokio::test]
async fn test_create_docx_attachment() {
    let response = app(ScriptedGenerator::responding(echo))
        .oneshot(post_json("/api/create-docx", json!({"data": "# Kịch bản\n\nNội dung"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"generated-report.docx\""
    );
    assert!(body_bytes(response).await.starts_with(b"PK"));
}

#[tokio::test]
async fn test_create_docx_requires_data() {
    for body in [json!({}), json!({"data": null}), json!({"data": ""})] {
        let response = app(ScriptedGenerator::responding(echo))
            .oneshot(post_json("/api/create-docx", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Data is required"}));
    }
}

#[tokio::test]
async fn test_process_runs_pipeline() {
    let response = app(ScriptedGenerator::responding(two_part_script))
        .oneshot(post_json("/api/process", json!({"transcript": "A documentary"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["firstSections"], json!("Paragraph one.\n\nParagraph two."));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_process_reports_pipeline_failure_in_body() {
    let response = app(ScriptedGenerator::failing())
        .oneshot(post_json("/api/process", json!({"transcript": "A documentary"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("HTTP 400"));
    assert!(body.get("outline").is_none());
}

#[tokio::test]
async fn test_process_validates_input() {
    let response = app(ScriptedGenerator::responding(two_part_script))
        .oneshot(post_json("/api/process", json!({"transcript": " "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Transcript is required"}));

    let response = app(ScriptedGenerator::responding(two_part_script))
        .oneshot(post_json(
            "/api/process",
            json!({"transcript": "text", "profile": "/etc/passwd"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Unknown profile: /etc/passwd"})
    );
}

#[tokio::test]
async fn test_batch_import_reads_workbook() -> anyhow::Result<()> {
    let workbook = export_items(&[BatchResultItem::pending("A"), BatchResultItem::pending("B")])?;
    let request = Request::post("/api/batch/import").body(Body::from(workbook))?;

    let response = app(ScriptedGenerator::responding(echo)).oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([
            {"transcript": "A", "processed": false},
            {"transcript": "B", "processed": false}
        ])
    );
    Ok(())
}

#[tokio::test]
async fn test_batch_import_rejects_garbage() -> anyhow::Result<()> {
    let request = Request::post("/api/batch/import").body(Body::from("not a workbook"))?;

    let response = app(ScriptedGenerator::responding(echo)).oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Error reading Excel file"));
    Ok(())
}

#[tokio::test]
async fn test_batch_run_processes_pending_items() {
    let generator = ScriptedGenerator::responding(two_part_script);
    let items = json!({
        "items": [
            {"transcript": "A", "processed": false},
            {"transcript": "B", "outline": "o", "firstSections": "f", "lastSections": "l", "processed": true}
        ]
    });

    let response = app(generator.clone())
        .oneshot(post_json("/api/batch/run", items))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["processed"], json!(true));
    assert_eq!(body[1]["outline"], json!("o"));
    assert_eq!(generator.call_count(), 6);
}

#[tokio::test]
async fn test_batch_run_rejects_malformed_items() {
    let response = app(ScriptedGenerator::responding(two_part_script))
        .oneshot(post_json("/api/batch/run", json!({"items": "nope"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_batch_export_xlsx() -> anyhow::Result<()> {
    let items = json!({"items": [
        {"transcript": "A", "outline": "**o**", "firstSections": "f", "lastSections": "l", "processed": true},
        {"transcript": "B", "processed": false, "error": "boom"}
    ]});

    let response = app(ScriptedGenerator::responding(echo))
        .oneshot(post_json("/api/batch/export/xlsx", items))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"processed_transcripts.xlsx\""
    );

    let bytes = body_bytes(response).await;
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook.worksheet_range("Processed Transcripts")?;
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][1], "o");
    assert_eq!(rows[1][5], "Yes");
    assert_eq!(rows[2][6], "boom");
    Ok(())
}

#[tokio::test]
async fn test_batch_export_requires_items() {
    for uri in ["/api/batch/export/xlsx", "/api/batch/export/docx"] {
        let response = app(ScriptedGenerator::responding(echo))
            .oneshot(post_json(uri, json!({"items": []})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "No results to export"}));
    }
}

#[tokio::test]
async fn test_batch_export_docx() {
    let items = json!({"items": [{"transcript": "A", "processed": false}]});

    let response = app(ScriptedGenerator::responding(echo))
        .oneshot(post_json("/api/batch/export/docx", items))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"processed_transcripts.docx\""
    );
    assert!(body_bytes(response).await.starts_with(b"PK"));
}

#[tokio::test]
async fn test_export_txt() {
    let sections = json!({"outline": "Plan", "firstSections": "Start", "lastSections": "End"});

    let response = app(ScriptedGenerator::responding(echo))
        .oneshot(post_json("/api/export/txt", sections))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"kich_ban_"));
    assert!(disposition.ends_with(".txt\""));

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(
        text,
        "ĐỀ CƯƠNG KỊCH BẢN:\n\nPlan\n\n\nKỊCH BẢN ĐẦY ĐỦ:\n\nStart\n\nEnd"
    );
}

#[tokio::test]
async fn test_body_limit_is_enforced() {
    let config = ServerConfig::default().with_body_limit_bytes(64usize);
    let generator = ScriptedGenerator::responding(echo);
    let app = router(state_for(generator.clone()), &config);

    let prompt = "x".repeat(1024);
    let response = app
        .oneshot(post_json("/api/gemini", json!({ "prompt": prompt })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(generator.call_count(), 0);
}
