use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::store::DataSource;

/// Source of "today" for date filters and default transaction dates.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// The server's local calendar day.
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DataSource>,
    pub clock: Clock,
    pub jwt_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            clock: Clock::System,
            jwt_secret: None,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_jwt_secret(mut self, secret: impl Into<Arc<str>>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
