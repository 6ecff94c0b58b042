//! Statistics tests
//!
//! Counters must match the number of dispatch calls exactly, under
//! concurrency too.

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::common::assertions::StatsAssertions;
    use crate::common::fixtures::{hub, register_fake, request};
    use crate::common::providers::FakeProvider;
    use acas_gateway::core::providers::{ErrorKind, ProviderError};
    use futures::future::join_all;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_counts_match_successes_and_failures() {
        let hub = hub();
        register_fake(&hub, FakeProvider::replying("ok", "x"));
        register_fake(
            &hub,
            FakeProvider::failing("bad", ProviderError::authentication("bad", "nope")),
        );

        for _ in 0..5 {
            hub.dispatch("ok", &request("hi")).await.unwrap();
        }
        for _ in 0..3 {
            hub.dispatch("bad", &request("hi")).await.unwrap_err();
        }

        let ok = &hub.get_stats(Some("ok")).unwrap()[0];
        ok.assert_counts(5, 0);
        assert_approx_eq!(ok.success_rate, 1.0);
        assert_eq!(ok.last_known_healthy, Some(true));
        assert!(ok.last_used_at.is_some());

        let bad = &hub.get_stats(Some("bad")).unwrap()[0];
        bad.assert_counts(3, 3);
        assert_approx_eq!(bad.success_rate, 0.0);
        assert_eq!(bad.last_known_healthy, Some(false));
        assert_eq!(
            bad.last_error.as_ref().map(|e| e.kind),
            Some(ErrorKind::AuthError)
        );
    }

    #[tokio::test]
    async fn test_mixed_outcomes_give_success_rate() {
        let hub = hub();
        register_fake(
            &hub,
            FakeProvider::flaky("leo", 1, ProviderError::authentication("leo", "nope"), "x"),
        );

        hub.dispatch("leo", &request("hi")).await.unwrap_err();
        for _ in 0..3 {
            hub.dispatch("leo", &request("hi")).await.unwrap();
        }

        let stats = &hub.get_stats(Some("leo")).unwrap()[0];
        stats.assert_counts(4, 1);
        assert_approx_eq!(stats.success_rate, 0.75);
        assert_eq!(stats.last_known_healthy, Some(true));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_dispatches_are_all_counted() {
        let hub = Arc::new(hub());
        register_fake(
            &hub,
            FakeProvider::replying("leo", "x").with_delay(Duration::from_millis(5)),
        );

        let calls = (0..64).map(|i| {
            let hub = hub.clone();
            tokio::spawn(async move {
                hub.dispatch("leo", &request(&format!("prompt {}", i))).await
            })
        });
        let results = join_all(calls).await;

        assert!(results.into_iter().all(|r| matches!(r, Ok(Ok(_)))));
        hub.get_stats(Some("leo")).unwrap()[0].assert_counts(64, 0);
    }

    #[tokio::test]
    async fn test_unused_providers_report_zeroed_stats() {
        let hub = hub();
        register_fake(&hub, FakeProvider::replying("b", "x"));
        register_fake(&hub, FakeProvider::replying("a", "x"));

        let all = hub.get_stats(None).unwrap();

        let ids: Vec<&str> = all.iter().map(|s| s.provider_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        for stats in &all {
            stats.assert_untouched();
            assert_eq!(stats.last_known_healthy, None);
        }
    }

    #[tokio::test]
    async fn test_unknown_provider_stats_is_not_found() {
        let hub = hub();
        let err = hub.get_stats(Some("ghost")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_unregister_forgets_stats() {
        let hub = hub();
        register_fake(&hub, FakeProvider::replying("leo", "x"));
        hub.dispatch("leo", &request("hi")).await.unwrap();
        assert!(hub.stats().snapshot("leo").is_some());

        assert!(hub.unregister("leo"));

        assert!(hub.stats().snapshot("leo").is_none());
        assert!(hub.get_stats(None).unwrap().is_empty());
        assert!(!hub.unregister("leo"));
    }

    #[tokio::test]
    async fn test_average_latency_over_requests() {
        let hub = hub();
        register_fake(
            &hub,
            FakeProvider::replying("leo", "x").with_delay(Duration::from_millis(20)),
        );

        for _ in 0..2 {
            hub.dispatch("leo", &request("hi")).await.unwrap();
        }

        let stats = &hub.get_stats(Some("leo")).unwrap()[0];
        assert!(stats.average_latency_ms >= 20.0);
        assert_approx_eq!(
            stats.average_latency_ms,
            stats.total_latency_ms as f64 / 2.0
        );
    }
}
