//! Tests for the replica manager.

use bss_core::{GeoPoint, IntervalKey, SimConfig, StationId, WarehouseId};
use bss_sim::{City, CityBuilder};
use bss_station::{GumbelParams, Station, StationParams, Warehouse};

use crate::SimulationManager;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Three busy stations, one of them warehoused.
fn base_city(seed: u64) -> City {
    let config = SimConfig { seed, progress_interval_ticks: 0, num_threads: Some(2), ..SimConfig::default() };
    let ids = [1u32, 2, 3];
    let mut builder = CityBuilder::new(config).warehouse(Warehouse::new(WarehouseId(1), 30, 15).unwrap());
    for (i, &id) in ids.iter().enumerate() {
        let mut params = StationParams::new();
        for interval in (0..1_440).step_by(20) {
            params.set_demand_rate(IntervalKey(interval), 0.2).unwrap();
            for &dest in ids.iter().filter(|&&d| d != id) {
                params.add_destination_volume(IntervalKey(interval), StationId(dest), 1 + dest);
            }
        }
        for &dest in &ids {
            params.set_duration_params(StationId(dest), GumbelParams::new(8.0, 2.0).unwrap());
        }
        let station = Station::new(StationId(id), 8, 4)
            .unwrap()
            .with_location(Some(GeoPoint::new(0.0, i as f64 * 0.01)))
            .with_params(params);
        builder = builder.station(station);
    }
    builder.link(StationId(2), WarehouseId(1)).build().unwrap()
}

#[cfg(test)]
mod manager_tests {
    use super::*;
    use crate::ReplicaError;

    #[test]
    fn rejects_bad_arguments() {
        assert!(matches!(SimulationManager::new(base_city(0), 0, "x"), Err(ReplicaError::Config(_))));
        assert!(matches!(SimulationManager::new(base_city(0), 1, ""), Err(ReplicaError::Config(_))));
        assert!(matches!(SimulationManager::new(base_city(0), 1, "a/b"), Err(ReplicaError::Config(_))));
        assert!(SimulationManager::new(base_city(0), 1, "TESTSIM").is_ok());
    }

    #[test]
    fn base_that_has_already_run_is_rejected() {
        let mut advanced = base_city(4);
        advanced.run_ticks(600, &mut bss_sim::NoopObserver).unwrap();
        assert!(!advanced.log().events().is_empty());
        assert!(matches!(SimulationManager::new(advanced, 1, "TESTSIM"), Err(ReplicaError::Config(_))));

        let mut failed_start = base_city(4);
        failed_start.station_mut(StationId(1)).unwrap().store_mut().set_docked(0).unwrap();
        assert!(!failed_start.generate_journey(StationId(1), StationId(2), 5).unwrap());
        assert!(matches!(SimulationManager::new(failed_start, 1, "TESTSIM"), Err(ReplicaError::Config(_))));
    }

    #[test]
    fn replicas_run_the_full_horizon_from_tick_zero() {
        let mut sm = SimulationManager::new(base_city(4), 1, "TESTSIM").unwrap();
        sm.run_simulations().unwrap();
        let series = sm.combined_time_series();
        assert_eq!(series.len(), 1_440);
        assert_eq!(series.first().unwrap().time, 0);
        assert_eq!(series.last().unwrap().time, 1_439);
        assert_eq!(sm.base().now(), bss_core::Tick::ZERO);
    }

    #[test]
    fn one_row_per_minute_per_replica() {
        let mut sm = SimulationManager::new(base_city(9), 2, "TESTSIM").unwrap();
        sm.run_simulations().unwrap();

        let series = sm.combined_time_series();
        assert_eq!(series.len(), 2 * 1_440);
        assert!(series[..1_440].iter().all(|r| r.sim_num == 0));
        assert!(series[1_440..].iter().all(|r| r.sim_num == 1));
        assert!(series.iter().all(|r| r.scenario_id == "TESTSIM"));
        assert_eq!(series[1_440].time, 0);

        assert!(!sm.combined_events().is_empty());
        assert!(sm.combined_events().windows(2).all(|w| w[0].sim_num <= w[1].sim_num));
        assert_eq!(sm.replica_totals().len(), 2);
    }

    #[test]
    fn combined_tables_agree_with_replica_totals() {
        let mut sm = SimulationManager::new(base_city(4), 3, "agree").unwrap();
        sm.run_simulations().unwrap();
        for (sim_num, totals) in sm.replica_totals().iter().enumerate() {
            let finished: u64 = sm
                .combined_time_series()
                .iter()
                .filter(|r| r.sim_num == sim_num)
                .map(|r| r.finished_journeys)
                .sum();
            let events = sm.combined_events().iter().filter(|e| e.sim_num == sim_num).count() as u64;
            assert_eq!(finished, totals.finished_journeys);
            assert_eq!(events, totals.total());
        }
    }

    #[test]
    fn identical_seeds_reproduce_counts() {
        let mut a = SimulationManager::new(base_city(21), 2, "a").unwrap();
        let mut b = SimulationManager::new(base_city(21), 2, "b").unwrap();
        a.run_simulations().unwrap();
        b.run_simulations().unwrap();
        assert_eq!(a.replica_totals(), b.replica_totals());
        assert_eq!(a.combined_events().len(), b.combined_events().len());
    }

    #[test]
    fn rerunning_replaces_tables() {
        let mut sm = SimulationManager::new(base_city(2), 2, "again").unwrap();
        sm.run_simulations().unwrap();
        let first = sm.combined_events().to_vec();
        sm.run_simulations().unwrap();
        assert_eq!(sm.combined_time_series().len(), 2 * 1_440);
        assert_eq!(sm.combined_events(), first.as_slice());
    }

    #[test]
    fn replicas_are_seeded_independently() {
        let mut sm = SimulationManager::new(base_city(5), 2, "indep").unwrap();
        sm.run_simulations().unwrap();
        let events_of = |n: usize| -> Vec<_> {
            sm.combined_events().iter().filter(|e| e.sim_num == n).map(|e| (e.time, e.event)).collect()
        };
        assert_ne!(events_of(0), events_of(1));
    }

    #[test]
    fn replica_worlds_share_no_stores() {
        let sm = SimulationManager::new(base_city(1), 2, "iso").unwrap();
        let mut w0 = sm.replica_world(0);
        let w1 = sm.replica_world(1);

        for (a, b) in w0.network().stations().iter().zip(w1.network().stations()) {
            assert!(!std::ptr::eq(a.store(), b.store()));
        }
        let base_station = sm.base().station(StationId(1)).unwrap();
        assert!(!std::ptr::eq(base_station, w0.station(StationId(1)).unwrap()));

        w0.station_mut(StationId(1)).unwrap().store_mut().set_docked(0).unwrap();
        w0.warehouse_mut(WarehouseId(1)).unwrap().store_mut().set_docked(0).unwrap();
        assert_eq!(w1.station(StationId(1)).unwrap().docked(), 4);
        assert_eq!(w1.warehouse(WarehouseId(1)).unwrap().store().docked(), 15);
        assert_eq!(sm.base().station(StationId(1)).unwrap().docked(), 4);
    }

    #[test]
    fn base_city_is_untouched_by_runs() {
        let mut sm = SimulationManager::new(base_city(3), 2, "base").unwrap();
        sm.run_simulations().unwrap();
        let base = sm.base();
        assert_eq!(base.now(), bss_core::Tick::ZERO);
        assert!(base.log().events().is_empty());
        assert!(base.network().stations().iter().all(|s| s.docked() == 4));
    }

    #[test]
    fn replica_seed_matches_manual_reseed() {
        let sm = SimulationManager::new(base_city(8), 1, "seed").unwrap();
        let mut manual = sm.base().clone();
        manual.reseed(bss_core::SimRng::replica_seed(8, 0));
        manual.run(&mut bss_sim::NoopObserver).unwrap();
        let outcome = sm.run_replica(0).unwrap();
        assert_eq!(outcome.totals, manual.log().totals());
    }
}

#[cfg(test)]
mod csv_tests {
    use super::*;

    #[test]
    fn writes_scenario_directory() {
        let root = tempfile::tempdir().unwrap();
        let mut sm = SimulationManager::new(base_city(6), 2, "TESTSIM").unwrap();
        sm.run_simulations().unwrap();
        let dir = sm.write_csv(root.path()).unwrap();
        assert_eq!(dir, root.path().join("TESTSIM"));

        let mut rdr = csv::Reader::from_path(dir.join("timeseries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 2 * 1_440);

        let mut rdr = csv::Reader::from_path(dir.join("events.csv")).unwrap();
        let events: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(events.len(), sm.combined_events().len());
        assert!(events.iter().all(|r| {
            matches!(&r[3], "finished_journeys" | "failed_starts" | "failed_ends")
        }));
    }
}
