//! Webserver state management
//!
//! Request handling is stateless apart from storage; this only tracks what
//! the liveness and index endpoints report.

use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug)]
pub struct WebServerState {
    pub bind_address: String,
    pub max_grid_size: u32,
    pub started_at: DateTime<Local>,
    pub server_start_time: Instant,
    request_count: AtomicU64,
    is_running: AtomicBool,
}

impl WebServerState {
    pub fn new(bind_address: impl Into<String>, max_grid_size: u32) -> Self {
        Self {
            bind_address: bind_address.into(),
            max_grid_size,
            started_at: Local::now(),
            server_start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            is_running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    pub fn set_running(&self, running: bool) {
        self.is_running.store(running, Ordering::Relaxed);
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.server_start_time.elapsed().as_secs()
    }

    /// Count one handled API request, returning the new total
    pub fn record_request(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webserver_state_creation() {
        let state = WebServerState::new("127.0.0.1:8000", 50);

        assert_eq!(state.bind_address, "127.0.0.1:8000");
        assert_eq!(state.max_grid_size, 50);
        assert!(!state.is_running());
        assert_eq!(state.get_request_count(), 0);
    }

    #[test]
    fn test_request_counting() {
        let state = WebServerState::new("127.0.0.1:8000", 100);

        assert_eq!(state.record_request(), 1);
        assert_eq!(state.record_request(), 2);
        assert_eq!(state.get_request_count(), 2);
    }

    #[test]
    fn test_running_flag() {
        let state = WebServerState::new("127.0.0.1:8000", 100);

        state.set_running(true);
        assert!(state.is_running());
        state.set_running(false);
        assert!(!state.is_running());
    }
}
