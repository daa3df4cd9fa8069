mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{acme_request, create_consultation, get, send_message, setup_test_app, stored_documents};
use counsel_api::storage::{Document, DocumentId};
use serde_json::{json, Value};

#[actix_rt::test]
async fn test_send_message_returns_assistant_reply() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let consultation = create_consultation(&test_app.app, acme_request()).await;
    let id = consultation["id"].as_str().unwrap();

    let resp = send_message(&test_app.app, id, "How do I find my first customers?").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let reply: Value = test::read_body_json(resp).await;

    assert_eq!(reply["role"], "assistant");
    assert_eq!(reply["consultation_id"], id);
    assert!(!reply["id"].as_str().unwrap().is_empty());
    assert!(reply["created_at"].is_string());

    let content = reply["content"].as_str().unwrap();
    assert!(content.starts_with("Context\n- Industry: Retail\n- Stage: idea\n- Goal: grow sales\n"));
    assert!(content.contains("Your prompt\n- How do I find my first customers?\n"));
    assert!(content.contains("- Problem validation: Consider 1-2 experiments"));
    Ok(())
}

#[actix_rt::test]
async fn test_send_message_stores_user_then_assistant() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let consultation = create_consultation(&test_app.app, acme_request()).await;
    let id = consultation["id"].as_str().unwrap();

    let resp = send_message(&test_app.app, id, "first question").await;
    let first_reply: Value = test::read_body_json(resp).await;
    send_message(&test_app.app, id, "second question").await;

    assert_eq!(stored_documents(test_app.store.as_ref(), "message").await.len(), 4);

    let resp = get(&test_app.app, &format!("/api/consultations/{}/messages", id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let messages: Vec<Value> = test::read_body_json(resp).await;

    let roles: Vec<&str> = messages.iter().map(|m| m["role"].as_str().unwrap()).collect();
    assert_eq!(roles, vec!["user", "assistant", "user", "assistant"]);
    assert_eq!(messages[0]["content"], "first question");
    assert_eq!(messages[1], first_reply);
    assert_eq!(messages[2]["content"], "second question");
    Ok(())
}

#[actix_rt::test]
async fn test_reply_uses_consultation_stage() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let mut request = acme_request();
    request["stage"] = json!("Scale");
    let consultation = create_consultation(&test_app.app, request).await;

    let resp = send_message(&test_app.app, consultation["id"].as_str().unwrap(), "next?").await;
    let reply: Value = test::read_body_json(resp).await;
    let content = reply["content"].as_str().unwrap();

    assert!(content.contains("- Stage: scale\n"));
    assert!(content.contains("Internationalization"));
    assert!(!content.contains("Problem validation"));
    Ok(())
}

#[actix_rt::test]
async fn test_unknown_stage_replies_with_idea_topics() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let mut request = acme_request();
    request["stage"] = json!("pre-seed");
    let consultation = create_consultation(&test_app.app, request).await;

    let resp = send_message(&test_app.app, consultation["id"].as_str().unwrap(), "help").await;
    let reply: Value = test::read_body_json(resp).await;
    let content = reply["content"].as_str().unwrap();

    assert!(content.contains("- Stage: pre-seed\n"));
    assert!(content.contains("Customer discovery"));
    Ok(())
}

#[actix_rt::test]
async fn test_send_message_to_unknown_consultation_is_404() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let resp = send_message(&test_app.app, &DocumentId::new().to_string(), "hello").await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Consultation not found");
    assert!(stored_documents(test_app.store.as_ref(), "message").await.is_empty());
    Ok(())
}

#[actix_rt::test]
async fn test_send_message_with_malformed_id_is_404() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let resp = send_message(&test_app.app, "12345", "hello").await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid consultation id");
    assert!(stored_documents(test_app.store.as_ref(), "message").await.is_empty());
    Ok(())
}

#[actix_rt::test]
async fn test_content_over_4000_chars_is_rejected_without_writes() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let consultation = create_consultation(&test_app.app, acme_request()).await;
    let id = consultation["id"].as_str().unwrap();

    let resp = send_message(&test_app.app, id, &"x".repeat(4001)).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_request");
    assert!(stored_documents(test_app.store.as_ref(), "message").await.is_empty());
    Ok(())
}

#[actix_rt::test]
async fn test_content_of_exactly_4000_chars_is_accepted() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let consultation = create_consultation(&test_app.app, acme_request()).await;
    let id = consultation["id"].as_str().unwrap();

    let resp = send_message(&test_app.app, id, &"x".repeat(4000)).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(stored_documents(test_app.store.as_ref(), "message").await.len(), 2);
    Ok(())
}

#[actix_rt::test]
async fn test_empty_content_is_rejected() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let consultation = create_consultation(&test_app.app, acme_request()).await;

    let resp = send_message(&test_app.app, consultation["id"].as_str().unwrap(), "").await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(stored_documents(test_app.store.as_ref(), "message").await.is_empty());
    Ok(())
}

#[actix_rt::test]
async fn test_list_messages_for_malformed_or_unknown_id_is_404() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let resp = get(&test_app.app, "/api/consultations/bogus/messages").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let uri = format!("/api/consultations/{}/messages", DocumentId::new());
    let resp = get(&test_app.app, &uri).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[actix_rt::test]
async fn test_list_messages_is_scoped_to_consultation() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let first = create_consultation(&test_app.app, acme_request()).await;
    let second = create_consultation(&test_app.app, acme_request()).await;
    let first_id = first["id"].as_str().unwrap();
    let second_id = second["id"].as_str().unwrap();

    send_message(&test_app.app, first_id, "for first").await;

    let resp = get(&test_app.app, &format!("/api/consultations/{}/messages", second_id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let messages: Vec<Value> = test::read_body_json(resp).await;
    assert!(messages.is_empty());

    let resp = get(&test_app.app, &format!("/api/consultations/{}/messages", first_id)).await;
    let messages: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m["consultation_id"] == first_id));
    Ok(())
}

#[actix_rt::test]
async fn test_list_messages_is_capped_at_200() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let consultation = create_consultation(&test_app.app, acme_request()).await;
    let id = consultation["id"].as_str().unwrap();

    for i in 0..205 {
        let mut doc = Document::new();
        doc.insert("consultation_id".to_string(), id.into());
        doc.insert("role".to_string(), "user".into());
        doc.insert("content".to_string(), format!("message {i}").into());
        test_app.store.insert_one("message", doc).await?;
    }

    let resp = get(&test_app.app, &format!("/api/consultations/{}/messages", id)).await;
    let messages: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(messages.len(), 200);
    assert_eq!(messages[0]["content"], "message 0");
    Ok(())
}
