//! Anthropic adapter tests against a mock server

#[cfg(test)]
mod tests {
    use crate::common::fixtures::request;
    use acas_gateway::config::models::ProviderDescriptor;
    use acas_gateway::core::ProviderHub;
    use acas_gateway::core::health::ProbeSettings;
    use acas_gateway::core::providers::secrets::StaticSecretResolver;
    use acas_gateway::core::providers::{ErrorKind, ProviderError, ProviderKind};
    use acas_gateway::core::router::{DispatchOptions, RetryPolicy};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup(max_retries: u32) -> (MockServer, ProviderHub) {
        let server = MockServer::start().await;
        let hub = ProviderHub::with_settings(
            Arc::new(StaticSecretResolver::new().with_secret("env:ANTHROPIC_API_KEY", "sk-ant-test")),
            RetryPolicy::immediate(),
            DispatchOptions::new(Duration::from_secs(5), max_retries),
            ProbeSettings::default(),
        )
        .unwrap();
        hub.register(
            ProviderDescriptor::new("claude", ProviderKind::Anthropic)
                .with_endpoint(server.uri())
                .with_credential("env:ANTHROPIC_API_KEY")
                .with_model("claude-3-5-haiku-latest"),
        )
        .unwrap();
        (server, hub)
    }

    #[tokio::test]
    async fn test_messages_completion() {
        let (server, hub) = setup(0).await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "claude-3-5-haiku-latest",
                "max_tokens": 1024,
                "system": "Be terse",
                "messages": [{"role": "user", "content": "Summarize"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_1",
                "type": "message",
                "role": "assistant",
                "model": "claude-3-5-haiku-latest",
                "content": [{"type": "text", "text": "Done."}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 8, "output_tokens": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = hub
            .dispatch("claude", &request("Summarize").with_system_prompt("Be terse"))
            .await
            .unwrap();

        assert_eq!(response.content, "Done.");
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(10));
        assert_eq!(response.model.as_deref(), Some("claude-3-5-haiku-latest"));
    }

    #[tokio::test]
    async fn test_overloaded_is_rate_limited_and_retried() {
        let (server, hub) = setup(1).await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_json(json!({
                "type": "error",
                "error": {"type": "overloaded_error", "message": "Overloaded"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let err = hub.dispatch("claude", &request("hi")).await.unwrap_err();
        let ProviderError::ExhaustedRetries { attempts, last, .. } = err else {
            panic!("expected ExhaustedRetries");
        };
        assert_eq!(attempts, 2);
        assert_eq!(last.kind(), ErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn test_authentication_error_is_not_retried() {
        let (server, hub) = setup(2).await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "type": "error",
                "error": {"type": "authentication_error", "message": "invalid x-api-key"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = hub.dispatch("claude", &request("hi")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthError);
    }

    #[tokio::test]
    async fn test_response_without_text_is_malformed() {
        let (server, hub) = setup(0).await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "message",
                "content": []
            })))
            .mount(&server)
            .await;

        let err = hub.dispatch("claude", &request("hi")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_connectivity_probe() {
        let (server, hub) = setup(0).await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("x-api-key", "sk-ant-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let result = hub.test_provider("claude").await.unwrap();
        assert!(result.succeeded);
    }
}
