//! Health probing tests

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{hub, hub_with_options, register_fake, register_fake_with};
    use crate::common::providers::{Behavior, FakeProvider};
    use acas_gateway::core::health::ProbeSettings;
    use acas_gateway::core::providers::{ErrorKind, ProviderError};
    use acas_gateway::core::router::DispatchOptions;
    use std::time::{Duration, Instant};
    use tokio_util::sync::CancellationToken;

    fn probing_hub(probe_timeout: Duration) -> acas_gateway::ProviderHub {
        hub_with_options(
            DispatchOptions::new(Duration::from_millis(500), 0),
            ProbeSettings {
                probe_timeout,
                max_concurrent: 8,
            },
        )
    }

    #[tokio::test]
    async fn test_all_returns_one_result_per_enabled_provider() {
        let hub = probing_hub(Duration::from_millis(100));
        register_fake(&hub, FakeProvider::replying("ok", "x"));
        register_fake(
            &hub,
            FakeProvider::failing("bad", ProviderError::authentication("bad", "revoked")),
        );
        register_fake(&hub, FakeProvider::hanging("stuck"));
        let off = register_fake_with(&hub, FakeProvider::replying("off", "x"), |d| {
            d.with_enabled(false)
        });

        let results = hub.test_all_providers().await;

        assert_eq!(results.len(), 3);
        assert!(results["ok"].succeeded);
        assert_eq!(results["bad"].error_kind, Some(ErrorKind::AuthError));
        assert_eq!(results["stuck"].error_kind, Some(ErrorKind::Timeout));
        assert!(!results.contains_key("off"));
        assert_eq!(off.probes(), 0);
    }

    #[tokio::test]
    async fn test_probes_run_concurrently() {
        let hub = probing_hub(Duration::from_millis(200));
        for id in ["a", "b", "c", "d"] {
            register_fake(&hub, FakeProvider::hanging(id));
        }

        let started = Instant::now();
        let results = hub.test_all_providers().await;

        assert_eq!(results.len(), 4);
        assert!(results.values().all(|r| !r.succeeded));
        // four sequential probes would need at least 800ms
        assert!(started.elapsed() < Duration::from_millis(700));
    }

    #[tokio::test]
    async fn test_probe_updates_health_but_not_request_counters() {
        let hub = hub();
        register_fake(
            &hub,
            FakeProvider::replying("leo", "x")
                .with_probe(Behavior::Fail(ProviderError::backend("leo", "refused"))),
        );

        hub.test_provider("leo").await.unwrap();

        let stats = &hub.get_stats(Some("leo")).unwrap()[0];
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.last_known_healthy, Some(false));
        assert!(stats.last_tested_at.is_some());
        assert_eq!(
            stats.last_error.as_ref().map(|e| e.kind),
            Some(ErrorKind::BackendError)
        );
    }

    #[tokio::test]
    async fn test_single_probe_works_on_disabled_provider() {
        let hub = hub();
        let fake = register_fake_with(&hub, FakeProvider::replying("off", "x"), |d| {
            d.with_enabled(false)
        });

        let result = hub.test_provider("off").await.unwrap();

        assert!(result.succeeded);
        assert_eq!(result.provider_id, "off");
        assert_eq!(fake.probes(), 1);
    }

    #[tokio::test]
    async fn test_single_probe_of_unknown_provider() {
        let hub = hub();
        let err = hub.test_provider("ghost").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_probe_does_not_dispatch() {
        let hub = hub();
        let fake = register_fake(&hub, FakeProvider::replying("leo", "x"));

        hub.test_all_providers().await;

        assert_eq!(fake.probes(), 1);
        assert_eq!(fake.dispatches(), 0);
    }

    #[tokio::test]
    async fn test_health_monitor_probes_until_shutdown() {
        let hub = hub();
        let fake = register_fake(&hub, FakeProvider::replying("leo", "x"));
        let shutdown = CancellationToken::new();

        let monitor = hub.spawn_health_monitor(Duration::from_millis(20), shutdown.clone());
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.cancel();
        monitor.await.unwrap();

        let probes = fake.probes();
        assert!(probes >= 1);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fake.probes(), probes);
        assert_eq!(
            hub.get_stats(Some("leo")).unwrap()[0].last_known_healthy,
            Some(true)
        );
    }
}
