use chrono::{Duration, NaiveDateTime};
use crate::core::domain::Identifiable;

pub mod domain;
pub mod dto;
pub mod factory;
pub mod repository;

// Patron abstracts a library member and their standing.
pub trait Patron: Identifiable {
    fn library_id(&self) -> String;
    fn external_type(&self) -> Option<String>;
    fn fines(&self) -> f64;
    fn authorization_expires(&self) -> Option<NaiveDateTime>;
    fn block_reason(&self) -> Option<String>;
    fn blocked_until(&self) -> Option<NaiveDateTime>;
    fn last_external_sync(&self) -> Option<NaiveDateTime>;

    fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.authorization_expires().map(|expires| expires <= now).unwrap_or(false)
    }

    // a block without an end date lasts until a librarian lifts it
    fn is_blocked(&self, now: NaiveDateTime) -> bool {
        self.block_reason().is_some() && self.blocked_until().map(|until| until > now).unwrap_or(true)
    }

    fn has_borrowing_privileges(&self, now: NaiveDateTime) -> bool {
        !self.is_expired(now) && !self.is_blocked(now)
    }

    // patrons who cannot borrow are re-synced almost every time so that a
    // lifted block shows up right away
    fn needs_external_sync(&self, now: NaiveDateTime) -> bool {
        match self.last_external_sync() {
            None => true,
            Some(last) => {
                let max_age = if self.has_borrowing_privileges(now) {
                    Duration::hours(12)
                } else {
                    Duration::seconds(5)
                };
                now - last > max_age
            }
        }
    }
}
