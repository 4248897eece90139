//! Unit tests for bss-core primitives.

#[cfg(test)]
mod ids {
    use crate::{StationId, WarehouseId};

    #[test]
    fn ordering() {
        assert!(StationId(1) < StationId(2));
        assert!(WarehouseId(9) > WarehouseId(3));
    }

    #[test]
    fn display() {
        assert_eq!(StationId(7).to_string(), "StationId(7)");
        assert_eq!(WarehouseId(2).to_string(), "WarehouseId(2)");
    }

    #[test]
    fn json_is_transparent() {
        assert_eq!(serde_json::to_string(&StationId(393)).unwrap(), "393");
        let id: StationId = serde_json::from_str("14").unwrap();
        assert_eq!(id, StationId(14));
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(51.518117, -0.144228);
        assert_eq!(p.distance(p), 0.0);
    }

    #[test]
    fn pythagorean_distance() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn nan_coordinate_gives_nan_distance() {
        let a = GeoPoint::new(51.5, -0.1);
        let b = GeoPoint::new(f64::NAN, f64::NAN);
        assert!(!b.is_defined());
        assert!(a.distance(b).is_nan());
        assert!(b.distance(a).is_nan());
    }

    #[test]
    fn only_defined_points_survive_normalisation() {
        let a = GeoPoint::new(51.5, -0.1);
        assert_eq!(a.defined(), Some(a));
        assert_eq!(GeoPoint::new(f64::NAN, -0.1).defined(), None);
        assert_eq!(GeoPoint::new(51.5, f64::INFINITY).defined(), None);
    }

    #[test]
    fn missing_point_gives_nan_distance() {
        let a = Some(GeoPoint::new(51.5, -0.1));
        assert!(GeoPoint::distance_opt(a, None).is_nan());
        assert!(GeoPoint::distance_opt(None, a).is_nan());
    }

    #[test]
    fn nan_never_ranks_below_a_real_distance() {
        let real = 0.25_f64;
        let nan = f64::NAN;
        assert!(!(nan < real));
        assert!(!(real > nan));
    }
}

#[cfg(test)]
mod time {
    use crate::{IntervalKey, SimClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn interval_buckets() {
        assert_eq!(IntervalKey::containing(Tick(0), 20), IntervalKey(0));
        assert_eq!(IntervalKey::containing(Tick(19), 20), IntervalKey(0));
        assert_eq!(IntervalKey::containing(Tick(20), 20), IntervalKey(20));
        assert_eq!(IntervalKey::containing(Tick(487), 20), IntervalKey(480));
    }

    #[test]
    fn interval_wraps_each_day() {
        assert_eq!(IntervalKey::containing(Tick(1_440 + 25), 20), IntervalKey(20));
    }

    #[test]
    fn interval_display() {
        assert_eq!(IntervalKey(480).to_string(), "08:00");
        assert_eq!(IntervalKey(1_420).to_string(), "23:40");
    }

    #[test]
    fn clock_dhm() {
        let mut clock = SimClock::new();
        clock.advance(1_440 + 61);
        assert_eq!(clock.now(), Tick(1_501));
        assert_eq!(clock.elapsed_dhm(), (1, 1, 1));
    }
}

#[cfg(test)]
mod config {
    use crate::{SimConfig, Tick};

    #[test]
    fn default_is_one_day_by_minute() {
        let cfg = SimConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.end_tick(), Tick(1_440));
    }

    #[test]
    fn zero_sizes_rejected() {
        let cfg = SimConfig { interval_minutes: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = SimConfig { tick_minutes: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = SimConfig { num_threads: Some(0), ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn clone_continues_identically() {
        let mut r1 = SimRng::new(7);
        let _: u64 = r1.random();
        let mut r2 = r1.clone();
        assert_eq!(r1.random::<u64>(), r2.random::<u64>());
    }

    #[test]
    fn replica_seeds_differ() {
        let s0 = SimRng::replica_seed(1, 0);
        let s1 = SimRng::replica_seed(1, 1);
        assert_eq!(s0, 1);
        assert_ne!(s0, s1);
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u32; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[4]), Some(&4));
    }
}

#[cfg(test)]
mod compat {
    use tempfile::TempDir;

    use crate::{CoreError, ScenarioParams, Snapshot};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn params_file_compatibility() {
        let dir = tmp();
        let path = dir.path().join("last_used_params.json");
        let params = ScenarioParams::default();
        params.write_json(&path).unwrap();

        assert!(params.is_compatible_with_file(&path).unwrap());
        params.ensure_compatible(&path).unwrap();

        let newer = ScenarioParams { min_year: 2016, ..params };
        assert!(!newer.is_compatible_with_file(&path).unwrap());
        assert!(matches!(
            newer.ensure_compatible(&path),
            Err(CoreError::IncompatibleParams { .. })
        ));
    }

    #[test]
    fn snapshot_rejects_mismatched_descriptor() {
        let dir = tmp();
        let path = dir.path().join("snapshot.json");
        let params = ScenarioParams::default();
        Snapshot::new(params.clone(), vec![1u32, 2, 3]).save(&path).unwrap();

        let payload: Vec<u32> = Snapshot::load(&path, &params).unwrap();
        assert_eq!(payload, vec![1, 2, 3]);

        let other = ScenarioParams { minute_interval: 30, ..params };
        let err = Snapshot::<Vec<u32>>::load(&path, &other).unwrap_err();
        assert!(matches!(err, CoreError::IncompatibleParams { .. }));
    }

    /// Small payloads sit in the write buffer until the final flush; a
    /// device with no space must still surface as an error.
    #[cfg(target_os = "linux")]
    #[test]
    fn failed_final_flush_is_reported() {
        let full = std::path::Path::new("/dev/full");
        if !full.exists() {
            return;
        }
        let params = ScenarioParams::default();
        assert!(matches!(params.write_json(full), Err(CoreError::Io(_))));
        let err = Snapshot::new(params, vec![1u32, 2, 3]).save(full).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tmp();
        let err = ScenarioParams::default()
            .ensure_compatible(&dir.path().join("nope.json"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
