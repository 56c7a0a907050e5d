use std::sync::{Mutex, MutexGuard, PoisonError};

use checkout_core::Navigator;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    /// Full navigation to another page, e.g. the payment provider.
    External(Url),
    Back,
}

/// Terminal stand-in for the browser: tracks the location and records when
/// the customer leaves the checkout screen.
pub struct ConsoleNavigator {
    location: Mutex<Url>,
    departure: Mutex<Option<Departure>>,
}

impl ConsoleNavigator {
    pub fn new(location: Url) -> Self {
        Self {
            location: Mutex::new(location),
            departure: Mutex::new(None),
        }
    }

    pub fn location(&self) -> Url {
        lock(&self.location).clone()
    }

    pub fn departure(&self) -> Option<Departure> {
        lock(&self.departure).clone()
    }

    fn depart(&self, departure: Departure) {
        // last navigation wins, like a browser superseding a pending one
        *lock(&self.departure) = Some(departure);
    }
}

impl Navigator for ConsoleNavigator {
    fn replace_location(&self, location: &Url) {
        debug!(location = %location, "page location replaced");
        *lock(&self.location) = location.clone();
    }

    fn assign(&self, url: &Url) {
        info!(url = %url, "navigating away from checkout");
        println!("→ Redirigiendo a {url}");
        self.depart(Departure::External(url.clone()));
    }

    fn back(&self) {
        self.depart(Departure::Back);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
