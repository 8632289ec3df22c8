//! # Integration Tests: Rate-Limit Gate
//!
//! End-to-end scenarios for the admission gate: construction, admission
//! within and across epochs, admin-gated reconfiguration, persistence,
//! and the per-organization serialization guarantee.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::Rng;

    use rate_limit_manager::{
        Account, EnforcerSnapshot, PermissionAuthority, RateLimitApi, RateLimitError,
        RateLimitRegistry, RateLimitService, TimeSource,
    };

    const ORG: &str = "HAVEN1";
    const ADMIN: Account = [0xAD; 20];
    const ADDR1: Account = [0x11; 20];

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Permission directory fixture with a fixed admin set.
    struct StaticAuthority {
        admins: Vec<(String, Account)>,
    }

    impl StaticAuthority {
        fn with_admin(org_id: &str, account: Account) -> Arc<Self> {
            Arc::new(Self {
                admins: vec![(org_id.to_string(), account)],
            })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self { admins: vec![] })
        }
    }

    impl PermissionAuthority for StaticAuthority {
        fn is_org_admin(&self, org_id: &str, account: &Account) -> bool {
            self.admins
                .iter()
                .any(|(org, admin)| org == org_id && admin == account)
        }
    }

    /// Manually stepped clock fixture.
    struct StoppedClock(u64);

    impl TimeSource for StoppedClock {
        fn now(&self) -> u64 {
            self.0
        }
    }

    fn gate(threshold: u64, window: u64) -> RateLimitService {
        RateLimitService::new(
            ORG,
            StaticAuthority::with_admin(ORG, ADMIN),
            threshold,
            window,
            &StoppedClock(0),
        )
        .unwrap()
    }

    // =========================================================================
    // SCENARIOS: DEPLOYMENT
    // =========================================================================

    /// Scenario A: construction succeeds and limits read back exactly.
    #[test]
    fn test_construction_reports_configured_limits() {
        let gate = gate(100, 3600);

        assert_eq!(gate.org_id(), ORG);
        assert_eq!(gate.limits().threshold(), 100);
        assert_eq!(gate.limits().window(), 3600);
    }

    /// Scenario B: a zero window at construction yields no usable instance.
    #[test]
    fn test_construction_with_zero_window_fails() {
        let result = RateLimitService::new(
            ORG,
            StaticAuthority::with_admin(ORG, ADMIN),
            100,
            0,
            &StoppedClock(0),
        );

        assert!(matches!(result, Err(RateLimitError::InvalidWindow)));
    }

    // =========================================================================
    // SCENARIOS: UPDATE LIMITS
    // =========================================================================

    /// Scenario C: a non-admin cannot reconfigure, however valid the values.
    #[test]
    fn test_update_by_non_admin_leaves_config_unchanged() {
        let gate = gate(100, 3600);

        let err = gate.update_limits(&ADDR1, 1, 1).unwrap_err();
        assert!(matches!(err, RateLimitError::NotAuthorized { .. }));
        assert_eq!(gate.limits().threshold(), 100);
        assert_eq!(gate.limits().window(), 3600);
    }

    /// Scenario D: even an admin cannot set a zero window.
    #[test]
    fn test_update_with_zero_window_leaves_config_unchanged() {
        let gate = gate(100, 3600);

        let err = gate.update_limits(&ADMIN, 1, 0).unwrap_err();
        assert!(matches!(err, RateLimitError::InvalidWindow));
        assert_eq!(gate.limits().threshold(), 100);
        assert_eq!(gate.limits().window(), 3600);
    }

    #[test]
    fn test_update_by_admin_takes_effect() {
        let gate = gate(100, 3600);

        gate.update_limits(&ADMIN, 7, 900).unwrap();
        assert_eq!(gate.limits().threshold(), 7);
        assert_eq!(gate.limits().window(), 900);
    }

    #[test]
    fn test_admin_of_other_org_is_not_authorized() {
        // Admin rights are per organization, not global.
        let authority = StaticAuthority::with_admin("OTHER", ADMIN);
        let gate = RateLimitService::new(ORG, authority, 100, 3600, &StoppedClock(0)).unwrap();

        let err = gate.update_limits(&ADMIN, 1, 1).unwrap_err();
        assert!(matches!(err, RateLimitError::NotAuthorized { .. }));
    }

    // =========================================================================
    // SCENARIOS: ADMISSION
    // =========================================================================

    /// Scenario E: threshold=2, window=10; 0,1,2 → allow, allow, deny;
    /// 11 → allow after the epoch rolls.
    #[test]
    fn test_admission_across_epoch_boundary() {
        let gate = gate(2, 10);

        assert!(gate.check_and_record(0));
        assert!(gate.check_and_record(1));
        assert!(!gate.check_and_record(2));
        assert!(gate.check_and_record(11));
    }

    /// The (T+1)-th call within one epoch denies for arbitrary thresholds.
    #[test]
    fn test_admission_monotonicity_within_epoch() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let threshold = rng.gen_range(0..50);
            let gate = gate(threshold, 1_000_000);

            for i in 0..threshold {
                assert!(gate.check_and_record(i), "call {i} of {threshold} denied");
            }
            assert!(!gate.check_and_record(threshold));
        }
    }

    #[test]
    fn test_exhausted_epoch_recovers_after_roll() {
        let gate = gate(3, 10);

        for now in 0..3 {
            assert!(gate.check_and_record(now));
        }
        assert!(!gate.check_and_record(3));
        assert!(!gate.check_and_record(9));

        // First call of the new epoch allows again.
        assert!(gate.check_and_record(10));
    }

    #[test]
    fn test_reads_are_idempotent_and_side_effect_free() {
        let gate = gate(5, 60);

        for _ in 0..10 {
            assert_eq!(gate.limits().threshold(), 5);
            assert_eq!(gate.org_id(), ORG);
        }
        // Reads recorded nothing: the full budget is still available.
        for now in 0..5 {
            assert!(gate.check_and_record(now));
        }
        assert!(!gate.check_and_record(5));
    }

    // =========================================================================
    // SCENARIOS: PERSISTENCE
    // =========================================================================

    #[test]
    fn test_gate_survives_snapshot_restart() {
        let gate = gate(2, 100);
        assert!(gate.check_and_record(10));

        let json = serde_json::to_string(&gate.snapshot()).unwrap();
        let snapshot: EnforcerSnapshot = serde_json::from_str(&json).unwrap();
        let restored =
            RateLimitService::from_snapshot(snapshot, StaticAuthority::with_admin(ORG, ADMIN))
                .unwrap();

        // One admission left in the restored epoch.
        assert!(restored.check_and_record(11));
        assert!(!restored.check_and_record(12));
    }

    #[test]
    fn test_corrupt_snapshot_is_rejected() {
        let snapshot = EnforcerSnapshot {
            org_id: ORG.to_string(),
            threshold: 100,
            window: 0,
            epoch_start: 0,
            count: 0,
        };
        let result = RateLimitService::from_snapshot(snapshot, StaticAuthority::empty());
        assert!(matches!(result, Err(RateLimitError::InvalidWindow)));
    }

    // =========================================================================
    // SCENARIOS: MULTI-ORGANIZATION REGISTRY
    // =========================================================================

    #[test]
    fn test_registry_enforces_per_org_quotas_independently() {
        let authority = StaticAuthority::with_admin(ORG, ADMIN);
        let registry = RateLimitRegistry::new(authority, Arc::new(StoppedClock(0)));

        let small = registry.register("ORG-SMALL", 1, 60).unwrap();
        let large = registry.register("ORG-LARGE", 100, 60).unwrap();

        assert!(small.check_and_record(1));
        assert!(!small.check_and_record(2));
        for now in 0..100 {
            assert!(large.check_and_record(now % 60));
        }
        assert_eq!(registry.org_count(), 2);
    }

    #[test]
    fn test_registry_rejects_zero_window_registration() {
        let registry = RateLimitRegistry::new(StaticAuthority::empty(), Arc::new(StoppedClock(0)));
        assert!(matches!(
            registry.register(ORG, 10, 0),
            Err(RateLimitError::InvalidWindow)
        ));
        assert!(registry.get(ORG).is_none());
    }

    // =========================================================================
    // SCENARIOS: SERIALIZATION GUARANTEE
    // =========================================================================

    #[test]
    fn test_racing_checks_admit_exactly_threshold() {
        let gate = Arc::new(gate(64, 1_000_000));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = Arc::clone(&gate);
                std::thread::spawn(move || {
                    (0..100).filter(|&now| gate.check_and_record(now)).count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 64);
    }

    #[test]
    fn test_racing_update_and_checks_never_tear_config() {
        // Threshold and window start equal and every update keeps them
        // equal, so a torn read would show a mismatched pair.
        let gate = Arc::new(gate(1000, 1000));

        let updater = {
            let gate = Arc::clone(&gate);
            std::thread::spawn(move || {
                for i in 1..100u64 {
                    gate.update_limits(&ADMIN, i, i).unwrap();
                }
            })
        };
        let reader = {
            let gate = Arc::clone(&gate);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let limits = gate.limits();
                    // Both fields always come from the same update.
                    assert_eq!(limits.threshold(), limits.window());
                    assert!(limits.window() > 0);
                }
            })
        };
        let checker = {
            let gate = Arc::clone(&gate);
            std::thread::spawn(move || {
                // Admission checks racing the updates complete without
                // observing a half-applied pair; each is a plain decision.
                for now in 0..100u64 {
                    let _ = gate.check_and_record(now);
                }
            })
        };

        updater.join().unwrap();
        reader.join().unwrap();
        checker.join().unwrap();
    }
}
