//! Query predicates for operator dashboards: the free-text booking filter,
//! pagination windows, and the account-history query.

use serde::{Deserialize, Serialize};

use crate::booking::Booking;
use crate::types::TravelDate;

/// Free-text filter over an operator's bookings.
///
/// Matches bookings whose bus name, travel date, contact email, or contact
/// phone EXACTLY equals the search text. Equality, not substring — the
/// dashboard search is a lookup, not a fuzzy search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    #[serde(default)]
    pub search_text: Option<String>,
}

impl BookingFilter {
    /// Whether a booking matches this filter. An empty filter matches all.
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        let Some(text) = self.search_text.as_deref() else {
            return true;
        };
        booking.bus_snapshot.bus_name == text
            || booking.bus_snapshot.date.to_string() == text
            || booking.contact.email == text
            || booking.contact.phone == text
    }
}

/// A zero-based page window over an already-filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// Applies the window: skips `page × per_page` items, takes `per_page`.
    #[must_use]
    pub fn apply<T>(self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.page.saturating_mul(self.per_page))
            .take(self.per_page)
            .collect()
    }
}

/// Narrowing for the account-history view.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    /// When set, only buses with this publish flag are returned.
    #[serde(default)]
    pub availability: Option<bool>,
    /// Narrow to a single bus by name. The sentinel `"All"` means no
    /// narrowing (dashboard select-box convention).
    #[serde(default)]
    pub bus: Option<String>,
    #[serde(default)]
    pub from_date: Option<TravelDate>,
    #[serde(default)]
    pub to_date: Option<TravelDate>,
}

impl HistoryQuery {
    /// The bus-name narrowing, with the `"All"` sentinel mapped to none.
    #[must_use]
    pub fn bus_filter(&self) -> Option<&str> {
        self.bus.as_deref().filter(|name| *name != "All")
    }

    /// Whether either date bound was supplied. Bookings are only
    /// date-filtered when this holds.
    #[must_use]
    pub fn has_date_range(&self) -> bool {
        self.from_date.is_some() || self.to_date.is_some()
    }

    /// The inclusive date range, each missing bound defaulting to `today`.
    #[must_use]
    pub fn date_range(&self, today: TravelDate) -> (TravelDate, TravelDate) {
        (
            self.from_date.unwrap_or(today),
            self.to_date.unwrap_or(today),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BusSnapshot, ContactDetails, Passenger};
    use crate::types::{BusId, Fare, SeatNo};

    fn booking(bus_name: &str, date: &str, email: &str, phone: &str) -> Booking {
        let date = TravelDate::parse(date).unwrap();
        Booking {
            transaction_id: "txn".to_string(),
            bus_snapshot: BusSnapshot {
                bus_id: BusId::new("b1"),
                operator: "Greenline".to_string(),
                bus_name: bus_name.to_string(),
                route: vec![],
                from: "X".to_string(),
                to: "Y".to_string(),
                date,
                departure_time: "08:00".to_string(),
                cost: Fare(10.0),
            },
            persons: vec![Passenger {
                seat_no: SeatNo(1),
                name: "p".to_string(),
                gender: None,
                age: None,
            }],
            contact: ContactDetails {
                email: email.to_string(),
                phone: phone.to_string(),
            },
            date,
            created_at: 0,
        }
    }

    fn filter(text: &str) -> BookingFilter {
        BookingFilter {
            search_text: Some(text.to_string()),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let b = booking("Night Coach", "2024-07-15", "a@b.c", "111");
        assert!(BookingFilter::default().matches(&b));
    }

    #[test]
    fn filter_matches_each_field_exactly() {
        let b = booking("Night Coach", "2024-07-15", "a@b.c", "111");
        assert!(filter("Night Coach").matches(&b));
        assert!(filter("2024-07-15").matches(&b));
        assert!(filter("a@b.c").matches(&b));
        assert!(filter("111").matches(&b));
    }

    #[test]
    fn filter_is_equality_not_substring() {
        let b = booking("Night Coach", "2024-07-15", "a@b.c", "111");
        assert!(!filter("Night").matches(&b));
        assert!(!filter("2024-07").matches(&b));
        assert!(!filter("11").matches(&b));
    }

    #[test]
    fn page_request_windows_the_items() {
        let items: Vec<u32> = (0..10).collect();
        let page = PageRequest {
            page: 1,
            per_page: 4,
        };
        assert_eq!(page.apply(items), vec![4, 5, 6, 7]);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let items: Vec<u32> = (0..3).collect();
        let page = PageRequest {
            page: 5,
            per_page: 4,
        };
        assert!(page.apply(items).is_empty());
    }

    #[test]
    fn count_equals_sum_of_all_pages_for_any_page_size() {
        let items: Vec<u32> = (0..23).collect();
        for per_page in 1..=25 {
            let mut total = 0;
            let mut page = 0;
            loop {
                let chunk = PageRequest { page, per_page }.apply(items.clone());
                if chunk.is_empty() {
                    break;
                }
                total += chunk.len();
                page += 1;
            }
            assert_eq!(total, items.len(), "per_page={per_page}");
        }
    }

    #[test]
    fn history_date_range_defaults_each_missing_bound_to_today() {
        let today = TravelDate::parse("2024-07-15").unwrap();
        let from = TravelDate::parse("2024-07-01").unwrap();

        let q = HistoryQuery {
            from_date: Some(from),
            ..HistoryQuery::default()
        };
        assert_eq!(q.date_range(today), (from, today));

        let q = HistoryQuery::default();
        assert_eq!(q.date_range(today), (today, today));
        assert!(!q.has_date_range());
    }

    #[test]
    fn bus_filter_treats_all_as_no_narrowing() {
        let q = HistoryQuery {
            bus: Some("All".to_string()),
            ..HistoryQuery::default()
        };
        assert_eq!(q.bus_filter(), None);

        let q = HistoryQuery {
            bus: Some("Night Coach".to_string()),
            ..HistoryQuery::default()
        };
        assert_eq!(q.bus_filter(), Some("Night Coach"));
    }
}
