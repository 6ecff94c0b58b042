//! Single-provider dispatch tests
//!
//! Retry counts, timeouts, cancellation and the error taxonomy seen by a
//! caller of `ProviderHub::dispatch`.

#[cfg(test)]
mod tests {
    use crate::common::assertions::StatsAssertions;
    use crate::common::fixtures::{hub, hub_with_options, register_fake, request};
    use crate::common::providers::FakeProvider;
    use acas_gateway::core::health::ProbeSettings;
    use acas_gateway::core::providers::{ErrorKind, ProviderError};
    use acas_gateway::core::router::DispatchOptions;
    use std::time::{Duration, Instant};
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_success_fills_envelope() {
        let hub = hub();
        let fake = register_fake(&hub, FakeProvider::replying("leo", "APPROVE"));

        let response = hub.dispatch("leo", &request("review")).await.unwrap();

        assert_eq!(response.content, "APPROVE");
        assert_eq!(response.provider_id, "leo");
        assert_eq!(response.attempts, 1);
        assert_eq!(response.trace_id, "trace-test");
        assert_eq!(fake.dispatches(), 1);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let hub = hub();
        let fake = register_fake(
            &hub,
            FakeProvider::flaky("leo", 2, ProviderError::backend("leo", "502"), "ok"),
        );

        let response = hub.dispatch("leo", &request("hi")).await.unwrap();

        assert_eq!(response.content, "ok");
        assert_eq!(response.attempts, 3);
        assert_eq!(fake.dispatches(), 3);
        hub.get_stats(Some("leo")).unwrap()[0].assert_counts(1, 0);
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let hub = hub();
        let fake = register_fake(
            &hub,
            FakeProvider::flaky("leo", 1, ProviderError::rate_limit("leo", Some(1)), "ok"),
        );

        let response = hub.dispatch("leo", &request("hi")).await.unwrap();
        assert_eq!(response.attempts, 2);
        assert_eq!(fake.dispatches(), 2);
    }

    #[tokio::test]
    async fn test_non_transient_failure_is_not_retried() {
        let hub = hub();
        let fake = register_fake(
            &hub,
            FakeProvider::failing("gpt", ProviderError::authentication("gpt", "bad key")),
        );

        let err = hub.dispatch("gpt", &request("hi")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AuthError);
        assert_eq!(fake.dispatches(), 1);
        hub.get_stats(Some("gpt")).unwrap()[0].assert_counts(1, 1);
    }

    #[tokio::test]
    async fn test_malformed_response_is_not_retried() {
        let hub = hub();
        let fake = register_fake(
            &hub,
            FakeProvider::failing("gpt", ProviderError::malformed("gpt", "no choices")),
        );

        let err = hub.dispatch("gpt", &request("hi")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert_eq!(fake.dispatches(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_wraps_last_error() {
        let hub = hub();
        let fake = register_fake(
            &hub,
            FakeProvider::failing("leo", ProviderError::backend("leo", "overloaded")),
        );

        let err = hub.dispatch("leo", &request("hi")).await.unwrap_err();

        match err {
            ProviderError::ExhaustedRetries {
                provider,
                attempts,
                last,
            } => {
                assert_eq!(provider, "leo");
                assert_eq!(attempts, 3);
                assert_eq!(last.kind(), ErrorKind::BackendError);
            }
            other => panic!("expected ExhaustedRetries, got {:?}", other),
        }
        assert_eq!(fake.dispatches(), 3);
        hub.get_stats(Some("leo")).unwrap()[0].assert_counts(1, 1);
    }

    #[tokio::test]
    async fn test_zero_retries_makes_one_attempt() {
        let hub = hub_with_options(
            DispatchOptions::new(Duration::from_millis(500), 0),
            ProbeSettings::default(),
        );
        let fake = register_fake(
            &hub,
            FakeProvider::failing("leo", ProviderError::timeout("leo", "slow")),
        );

        let err = hub.dispatch("leo", &request("hi")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ExhaustedRetries);
        assert_eq!(fake.dispatches(), 1);
    }

    #[tokio::test]
    async fn test_hanging_provider_times_out_per_attempt() {
        let hub = hub();
        let fake = register_fake(&hub, FakeProvider::hanging("leo"));
        let options = DispatchOptions::new(Duration::from_millis(50), 1);

        let started = Instant::now();
        let err = hub
            .dispatch_with_options("leo", &request("hi"), &options)
            .await
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(fake.dispatches(), 2);
        match err {
            ProviderError::ExhaustedRetries { attempts, last, .. } => {
                assert_eq!(attempts, 2);
                assert_eq!(last.kind(), ErrorKind::Timeout);
            }
            other => panic!("expected ExhaustedRetries, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_provider_is_not_found() {
        let hub = hub();
        let err = hub.dispatch("ghost", &request("hi")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(hub.stats().snapshot("ghost").is_none());
    }

    #[tokio::test]
    async fn test_disabled_provider_is_not_found() {
        let hub = hub();
        let fake = register_fake(&hub, FakeProvider::replying("leo", "x"));
        hub.set_enabled("leo", false).unwrap();

        let err = hub.dispatch("leo", &request("hi")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(fake.dispatches(), 0);
        hub.get_stats(Some("leo")).unwrap()[0].assert_untouched();
    }

    #[tokio::test]
    async fn test_cancellation_records_nothing() {
        let hub = hub();
        let fake = register_fake(&hub, FakeProvider::hanging("leo"));
        let token = CancellationToken::new();
        let options = DispatchOptions::new(Duration::from_secs(5), 2).with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let started = Instant::now();
        let err = hub
            .dispatch_with_options("leo", &request("hi"), &options)
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(fake.dispatches(), 1);
        hub.get_stats(Some("leo")).unwrap()[0].assert_untouched();
    }

    #[tokio::test]
    async fn test_response_reports_dispatcher_latency() {
        let hub = hub();
        register_fake(
            &hub,
            FakeProvider::replying("leo", "x").with_delay(Duration::from_millis(30)),
        );

        let response = hub.dispatch("leo", &request("hi")).await.unwrap();

        assert!(response.latency_ms >= 30);
        let stats = &hub.get_stats(Some("leo")).unwrap()[0];
        assert!(stats.total_latency_ms >= 30);
    }
}
