//! Synthetic live readings
//!
//! None of these touch storage; they shape noise around a time-of-day curve.

use chrono::{DateTime, Local, Timelike};
use rand::Rng;
use shared::{NetworkSnapshot, TrafficSnapshot, VitalsSnapshot};
use std::f64::consts::PI;

use super::{gaussian, round_to};

const BASE_FLOW: f64 = 1200.0;
const BASE_HEART_RATE: f64 = 72.0;

pub fn traffic_snapshot<R: Rng + ?Sized>(now: &DateTime<Local>, rng: &mut R) -> TrafficSnapshot {
    let hour_factor = ((now.hour() as f64 - 6.0) * PI / 12.0).sin() * 0.4 + 1.0;
    let vehicles = BASE_FLOW * hour_factor * (1.0 + gaussian(rng, 0.0, 0.1));
    let vehicle_count = vehicles as i64;
    let v = vehicle_count as f64;

    let avg_speed = (50.0 - (v - 1000.0) / 50.0 + gaussian(rng, 0.0, 5.0)).max(20.0);
    let wait_time = ((v - 800.0) / 200.0 + gaussian(rng, 0.0, 0.5)).max(1.0);
    let efficiency = (100.0 - (v - 800.0) / 20.0 + gaussian(rng, 0.0, 5.0)).max(60.0);

    let signal_status = if rng.gen_bool(0.9) { "operational" } else { "maintenance" };

    TrafficSnapshot {
        vehicle_count,
        avg_speed: round_to(avg_speed, 1),
        wait_time: round_to(wait_time, 1),
        efficiency: efficiency as i64,
        signal_status: signal_status.to_string(),
        timestamp: now.to_rfc3339(),
    }
}

pub fn vitals_snapshot<R: Rng + ?Sized>(now: &DateTime<Local>, rng: &mut R) -> VitalsSnapshot {
    let variation = (now.minute() as f64 * PI / 30.0).sin() * 5.0;
    let heart_rate = (BASE_HEART_RATE + variation + gaussian(rng, 0.0, 3.0)) as i64;

    VitalsSnapshot {
        heart_rate,
        body_temperature: round_to(36.5 + gaussian(rng, 0.0, 0.3), 1),
        spo2: ((98.0 + gaussian(rng, 0.0, 1.0)) as i64).max(95),
        daily_steps: (8000.0 + gaussian(rng, 0.0, 1000.0)) as i64,
        health_score: ((85.0 + gaussian(rng, 0.0, 5.0)) as i64).max(70),
        timestamp: now.to_rfc3339(),
    }
}

pub fn network_snapshot<R: Rng + ?Sized>(now: &DateTime<Local>, rng: &mut R) -> NetworkSnapshot {
    NetworkSnapshot {
        network_status: "normal".to_string(),
        current_block: rng.gen_range(18_000_000..19_000_000),
        gas_price: format!("{:.1} Gwei", rng.gen_range(20.0..50.0)),
        tps: rng.gen_range(10..25),
        total_transactions: rng.gen_range(1_000_000..2_000_000),
        network_hashrate: format!("{:.1} TH/s", rng.gen_range(200.0..400.0)),
        timestamp: now.to_rfc3339(),
    }
}
