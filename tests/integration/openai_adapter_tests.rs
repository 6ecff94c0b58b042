//! OpenAI and LM Studio adapter tests against a mock server

#[cfg(test)]
mod tests {
    use crate::common::fixtures::request;
    use acas_gateway::config::models::ProviderDescriptor;
    use acas_gateway::core::ProviderHub;
    use acas_gateway::core::health::ProbeSettings;
    use acas_gateway::core::providers::secrets::{CredentialRef, StaticSecretResolver};
    use acas_gateway::core::providers::{ErrorKind, ProviderError, ProviderKind};
    use acas_gateway::core::router::{DispatchOptions, RetryPolicy};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hub(max_retries: u32) -> ProviderHub {
        let secrets = StaticSecretResolver::new()
            .with_secret("env:OPENAI_API_KEY", "sk-test")
            .with_secret("env:OPENAI_API_KEY_NEXT", "sk-next");
        ProviderHub::with_settings(
            Arc::new(secrets),
            RetryPolicy::immediate(),
            DispatchOptions::new(Duration::from_secs(5), max_retries),
            ProbeSettings::default(),
        )
        .unwrap()
    }

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "meta-llama-3.1-8b-instruct",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        })
    }

    fn lm_studio(server: &MockServer) -> ProviderDescriptor {
        ProviderDescriptor::new("leo", ProviderKind::LmStudio)
            .with_endpoint(server.uri())
            .with_model("meta-llama-3.1-8b-instruct")
    }

    fn openai(server: &MockServer) -> ProviderDescriptor {
        ProviderDescriptor::new("gpt", ProviderKind::OpenAI)
            .with_endpoint(server.uri())
            .with_credential("env:OPENAI_API_KEY")
            .with_model("gpt-4o-mini")
    }

    #[tokio::test]
    async fn test_lm_studio_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "model": "meta-llama-3.1-8b-instruct",
                "stream": false,
                "messages": [
                    {"role": "system", "content": "You are LEO"},
                    {"role": "user", "content": "Is this diff safe?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("APPROVE")))
            .expect(1)
            .mount(&server)
            .await;

        let hub = hub(0);
        hub.register(lm_studio(&server)).unwrap();

        let response = hub
            .dispatch("leo", &request("Is this diff safe?").with_system_prompt("You are LEO"))
            .await
            .unwrap();

        assert_eq!(response.content, "APPROVE");
        assert_eq!(response.provider_id, "leo");
        assert_eq!(response.model.as_deref(), Some("meta-llama-3.1-8b-instruct"));
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(15));
        assert_eq!(response.trace_id, "trace-test");
    }

    #[tokio::test]
    async fn test_openai_sends_bearer_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("hi")))
            .expect(1)
            .mount(&server)
            .await;

        let hub = hub(0);
        hub.register(openai(&server)).unwrap();

        let response = hub.dispatch("gpt", &request("hello")).await.unwrap();
        assert_eq!(response.content, "hi");
    }

    #[tokio::test]
    async fn test_openai_without_credential_fails_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("hi")))
            .expect(0)
            .mount(&server)
            .await;

        let hub = hub(2);
        hub.register(openai(&server).with_credential("env:UNSET_KEY"))
            .unwrap();

        let err = hub.dispatch("gpt", &request("hello")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthError);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let hub = hub(2);
        hub.register(openai(&server)).unwrap();

        let err = hub.dispatch("gpt", &request("hello")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthError);
        assert!(err.to_string().contains("Incorrect API key provided"));
    }

    #[tokio::test]
    async fn test_rate_limit_keeps_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "7")
                    .set_body_json(json!({"error": {"message": "Rate limit reached"}})),
            )
            .mount(&server)
            .await;

        let hub = hub(0);
        hub.register(openai(&server)).unwrap();

        let err = hub.dispatch("gpt", &request("hello")).await.unwrap_err();
        let ProviderError::ExhaustedRetries { last, .. } = err else {
            panic!("expected ExhaustedRetries");
        };
        assert_eq!(last.kind(), ErrorKind::RateLimited);
        assert_eq!(last.retry_after(), Some(7));
    }

    #[tokio::test]
    async fn test_server_error_is_retried_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ready")))
            .expect(1)
            .mount(&server)
            .await;

        let hub = hub(2);
        hub.register(lm_studio(&server)).unwrap();

        let response = hub.dispatch("leo", &request("hello")).await.unwrap();
        assert_eq!(response.content, "ready");
        assert_eq!(response.attempts, 3);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let hub = hub(2);
        hub.register(lm_studio(&server)).unwrap();

        let err = hub.dispatch("leo", &request("hello")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_empty_choices_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let hub = hub(0);
        hub.register(lm_studio(&server)).unwrap();

        let err = hub.dispatch("leo", &request("hello")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("late"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let hub = hub(0);
        hub.register(lm_studio(&server)).unwrap();
        let options = DispatchOptions::new(Duration::from_millis(200), 0);

        let err = hub
            .dispatch_with_options("leo", &request("hello"), &options)
            .await
            .unwrap_err();
        let ProviderError::ExhaustedRetries { last, .. } = err else {
            panic!("expected ExhaustedRetries");
        };
        assert_eq!(last.kind(), ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_connectivity_lists_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [{"id": "meta-llama-3.1-8b-instruct", "object": "model"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let hub = hub(0);
        hub.register(lm_studio(&server)).unwrap();

        let result = hub.test_provider("leo").await.unwrap();
        assert!(result.succeeded, "probe failed: {:?}", result.detail);
        assert_eq!(hub.get_stats(Some("leo")).unwrap()[0].total_requests, 0);
    }

    #[tokio::test]
    async fn test_unreachable_backend_probe_fails() {
        let hub = hub(0);
        hub.register(
            ProviderDescriptor::new("leo", ProviderKind::LmStudio)
                .with_endpoint("http://127.0.0.1:9")
                .with_timeout_secs(2),
        )
        .unwrap();

        let result = hub.test_provider("leo").await.unwrap();
        assert!(!result.succeeded);
        assert!(result.error_kind.is_some());
        assert_eq!(
            hub.get_stats(Some("leo")).unwrap()[0].last_known_healthy,
            Some(false)
        );
    }

    #[tokio::test]
    async fn test_rotated_credential_is_used() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-next"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("rotated")))
            .expect(1)
            .mount(&server)
            .await;

        let hub = hub(0);
        hub.register(openai(&server)).unwrap();
        hub.rotate_credential("gpt", Some(CredentialRef::new("env:OPENAI_API_KEY_NEXT")))
            .unwrap();

        let response = hub.dispatch("gpt", &request("hello")).await.unwrap();
        assert_eq!(response.content, "rotated");
    }
}
