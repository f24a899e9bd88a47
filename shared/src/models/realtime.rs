//! Synthetic live readings served by the realtime endpoints

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    pub vehicle_count: i64,
    pub avg_speed: f64,
    pub wait_time: f64,
    pub efficiency: i64,
    pub signal_status: String,
    pub timestamp: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    pub heart_rate: i64,
    pub body_temperature: f64,
    pub spo2: i64,
    pub daily_steps: i64,
    pub health_score: i64,
    pub timestamp: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub network_status: String,
    pub current_block: u64,
    pub gas_price: String,
    pub tps: u32,
    pub total_transactions: u64,
    pub network_hashrate: String,
    pub timestamp: String,
}
