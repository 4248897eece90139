//! small_city — smallest end-to-end run of the bike-share simulation.
//!
//! Six central-London docking stations, one of them buffered by a warehouse,
//! with synthetic weekday demand (morning and evening peaks).  Runs a handful
//! of 24-hour replicas and writes the combined tables to
//! `output/small_city/SMALL_CITY_BASE/`.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;

use bss_core::{IntervalKey, MINUTES_PER_DAY, ScenarioParams, SimConfig, StationId, WarehouseId};
use bss_replica::SimulationManager;
use bss_sim::{City, CityBuilder};
use bss_station::loader::{
    apply_demand_reader, apply_destinations_reader, apply_durations_reader,
    apply_warehouse_links_reader, load_stations_reader, load_warehouses_reader,
};
use bss_station::Network;

// ── Constants ─────────────────────────────────────────────────────────────────

const N_SIMULATIONS:    usize = 4;
const SEED:             u64   = 42;
const INTERVAL_MINUTES: u32   = 20;
const SCENARIO_ID:      &str  = "SMALL_CITY_BASE";
const OUTPUT_ROOT:      &str  = "output/small_city";

// ── Embedded tables ───────────────────────────────────────────────────────────

const STATIONS_CSV: &str = "\
station_id,capacity,common_name,latitude,longitude,docked_init\n\
6,18,\"Broadcasting House, Marylebone\",51.518117,-0.144228,9\n\
14,48,\"Belgrove Street , King's Cross\",51.529943,-0.123616,24\n\
98,21,\"Hampstead Road, Euston\",51.525864,-0.138070,10\n\
374,40,\"Waterloo Station 1, Waterloo\",51.504027,-0.113864,20\n\
393,20,\"Snow Hill, Farringdon\",51.517334,-0.104950,10\n\
154,36,\"Waterloo Station 3, Waterloo\",51.503791,-0.112824,18\n\
";

const WAREHOUSES_CSV: &str = "\
warehouse_id,capacity,docked_init\n\
1,60,30\n\
";

const WAREHOUSE_LINKS_CSV: &str = "\
station_id,warehouse_id\n\
374,1\n\
";

const DURATIONS_CSV: &str = "\
station_id,destination_id,location,scale\n\
6,14,14.2,3.1\n6,98,7.9,2.0\n6,374,21.5,4.2\n6,393,19.0,3.8\n6,154,21.0,4.0\n\
14,6,14.8,3.3\n14,98,9.6,2.4\n14,374,22.4,4.5\n14,393,12.1,2.9\n14,154,22.0,4.4\n\
98,6,8.2,2.1\n98,14,9.9,2.5\n98,374,20.7,4.1\n98,393,15.3,3.2\n98,154,20.2,4.0\n\
374,6,22.0,4.3\n374,14,23.1,4.6\n374,98,21.2,4.2\n374,393,13.5,3.0\n374,154,2.5,0.8\n\
393,6,19.4,3.9\n393,14,9.163,1.632\n393,98,15.8,3.3\n393,374,13.0,2.9\n393,154,13.3,2.9\n\
154,6,21.6,4.1\n154,14,22.6,4.5\n154,98,20.6,4.1\n154,374,2.6,0.8\n154,393,13.1,2.9\n\
";

/// Historical journey counts per destination, used for every interval.
const DESTINATION_WEIGHTS: &[(u32, &[(u32, u32)])] = &[
    (6,   &[(14, 30), (98, 55), (374, 12), (393, 9), (154, 10)]),
    (14,  &[(6, 25), (98, 20), (374, 18), (393, 60), (154, 15)]),
    (98,  &[(6, 50), (14, 22), (374, 8), (393, 14), (154, 7)]),
    (374, &[(6, 35), (14, 40), (98, 15), (393, 70), (154, 5)]),
    (393, &[(6, 10), (14, 45), (98, 12), (374, 30), (154, 28)]),
    (154, &[(6, 30), (14, 28), (98, 10), (374, 4), (393, 65)]),
];

/// Mean journeys per minute at `minute` of the day: quiet nights, weekday
/// peaks around 08:30 and 17:30.
fn demand_profile(station: u32, minute: u32) -> f64 {
    let hour = minute as f64 / 60.0;
    let peak = |centre: f64, width: f64| (-((hour - centre) / width).powi(2)).exp();
    let base = 0.01 + 0.12 * peak(8.5, 1.2) + 0.10 * peak(17.5, 1.5) + 0.03 * peak(13.0, 3.0);
    // The Waterloo stations carry commuter surges.
    if station == 374 || station == 154 { base * 1.8 } else { base }
}

fn demand_csv() -> String {
    let mut out = String::from("station_id,interval,rate\n");
    for &(station, _) in DESTINATION_WEIGHTS {
        for interval in (0..MINUTES_PER_DAY as u32).step_by(INTERVAL_MINUTES as usize) {
            let rate = demand_profile(station, interval + INTERVAL_MINUTES / 2);
            out.push_str(&format!("{station},{interval},{rate:.5}\n"));
        }
    }
    out
}

fn destinations_csv() -> String {
    let mut out = String::from("station_id,interval,destination_id,journeys\n");
    for &(station, weights) in DESTINATION_WEIGHTS {
        for interval in (0..MINUTES_PER_DAY as u32).step_by(INTERVAL_MINUTES as usize) {
            for &(destination, journeys) in weights {
                out.push_str(&format!("{station},{interval},{destination},{journeys}\n"));
            }
        }
    }
    out
}

// ── City assembly ─────────────────────────────────────────────────────────────

fn build_network() -> Result<Network> {
    let mut network = Network::new();
    for warehouse in load_warehouses_reader(Cursor::new(WAREHOUSES_CSV))? {
        network.add_warehouse(warehouse)?;
    }
    for station in load_stations_reader(Cursor::new(STATIONS_CSV))? {
        network.add_station(station)?;
    }
    apply_warehouse_links_reader(&mut network, Cursor::new(WAREHOUSE_LINKS_CSV))?;
    let demand = apply_demand_reader(&mut network, Cursor::new(demand_csv()))?;
    let destinations = apply_destinations_reader(&mut network, Cursor::new(destinations_csv()))?;
    let durations = apply_durations_reader(&mut network, Cursor::new(DURATIONS_CSV))?;
    info!(stations = network.len(), demand, destinations, durations, "parameter tables loaded");
    Ok(network)
}

fn build_city() -> Result<City> {
    let config = SimConfig {
        interval_minutes: INTERVAL_MINUTES,
        seed:             SEED,
        ..SimConfig::default()
    };
    let mut city = CityBuilder::new(config).network(build_network()?).build()?;

    // Scenario tweak: start the day with Snow Hill full.
    if let Some(station) = city.station_mut(StationId(393)) {
        let capacity = station.capacity();
        station.store_mut().set_docked(capacity)?;
    }
    Ok(city)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let city = build_city()?;
    println!("=== small_city — bike-share simulation ===");
    println!("{}", city.describe());
    println!();

    // Keep a snapshot of the initial world next to the results.
    let scenario_dir = Path::new(OUTPUT_ROOT).join(SCENARIO_ID);
    std::fs::create_dir_all(&scenario_dir)?;
    let params = ScenarioParams { minute_interval: INTERVAL_MINUTES, ..ScenarioParams::default() };
    city.save_snapshot(&scenario_dir.join("initial_city.json"), &params)?;

    let warehouse = city.warehouse(WarehouseId(1)).map(|w| w.store().docked()).unwrap_or(0);
    let morning = city
        .station(StationId(374))
        .map(|s| s.params().demand_rate(IntervalKey(480)))
        .unwrap_or(0.0);
    println!("Warehouse 1 holds {warehouse} bikes; Waterloo 08:00 demand {morning:.3}/min");

    let mut manager = SimulationManager::new(city, N_SIMULATIONS, SCENARIO_ID)?;
    let t0 = Instant::now();
    manager.run_simulations()?;
    let elapsed = t0.elapsed();
    let dir = manager.write_csv(Path::new(OUTPUT_ROOT))?;

    println!();
    println!("{N_SIMULATIONS} replicas complete in {:.3} s", elapsed.as_secs_f64());
    println!("{:<8} {:>10} {:>14} {:>12}", "sim_num", "finished", "failed_starts", "failed_ends");
    println!("{}", "-".repeat(47));
    for (sim_num, totals) in manager.replica_totals().iter().enumerate() {
        println!(
            "{:<8} {:>10} {:>14} {:>12}",
            sim_num, totals.finished_journeys, totals.failed_starts, totals.failed_ends
        );
    }
    println!();
    println!("Tables written to {}", dir.display());
    println!("{}", serde_json::to_string_pretty(&manager.replica_totals())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tables_load_completely() {
        let intervals = (MINUTES_PER_DAY as u32 / INTERVAL_MINUTES) as usize;
        let n_stations = DESTINATION_WEIGHTS.len();
        assert_eq!(demand_csv().lines().count(), 1 + n_stations * intervals);

        let network = build_network().unwrap();
        assert_eq!(network.len(), n_stations);
        let station = network.station(StationId(374)).unwrap();
        assert!(station.params().demand_rate(IntervalKey(8 * 60)) > station.params().demand_rate(IntervalKey(0)));
        assert_eq!(station.params().destination_weights(IntervalKey(0)).unwrap().len(), 5);
    }
}
