//! Clock service
//!
//! Reports the local wall-clock time and date as display strings.

use crate::VendorService;
use chrono::{Local, NaiveDateTime};

const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default)]
pub struct ClockService;

impl ClockService {
    pub fn new() -> Self {
        Self
    }

    /// Local time as `HH:MM:SS`
    pub fn get_time(&self) -> String {
        format_time(&Local::now().naive_local())
    }

    /// Local date as `YYYY-MM-DD`
    pub fn get_date(&self) -> String {
        format_date(&Local::now().naive_local())
    }
}

impl VendorService for ClockService {
    const DESCRIPTOR: &'static str = "android.vendor.test.IHello";
}

fn format_time(now: &NaiveDateTime) -> String {
    now.format(TIME_FORMAT).to_string()
}

fn format_date(now: &NaiveDateTime) -> String {
    now.format(DATE_FORMAT).to_string()
}
