//! Booking documents: one immutable record per paid transaction.

use serde::{Deserialize, Serialize};

use crate::types::{BusId, Fare, SeatNo, TravelDate};

/// A passenger entry within a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub seat_no: SeatNo,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
}

/// Contact details used for lookup and free-text search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
}

/// Denormalized snapshot of the bus a booking was made against.
///
/// Captured at booking time so later catalog edits never retroactively
/// alter historical bookings. Not a reference to live bus state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusSnapshot {
    pub bus_id: BusId,
    pub operator: String,
    pub bus_name: String,
    pub route: Vec<String>,
    pub from: String,
    pub to: String,
    /// Travel date the booking is for.
    pub date: TravelDate,
    pub departure_time: String,
    pub cost: Fare,
}

/// One paid reservation. Created exactly once by the booking sequencer and
/// never updated or deleted afterwards.
///
/// `transaction_id` is the natural key: it is the token proving a completed
/// payment and must be unique across all bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
    #[serde(rename = "busData")]
    pub bus_snapshot: BusSnapshot,
    pub persons: Vec<Passenger>,
    #[serde(rename = "passengerDetails")]
    pub contact: ContactDetails,
    /// Travel date, distinct from the document's creation time.
    pub date: TravelDate,
    /// Creation time in epoch milliseconds. Assigned at insert.
    #[serde(default)]
    pub created_at: i64,
}

impl Booking {
    /// The seat numbers this booking claims.
    #[must_use]
    pub fn seat_numbers(&self) -> Vec<SeatNo> {
        self.persons.iter().map(|p| p.seat_no).collect()
    }

    /// Total fare for this booking: per-seat cost times passenger count.
    #[must_use]
    // Passenger counts are tiny; precision loss is not a concern here.
    #[allow(clippy::cast_precision_loss)]
    pub fn total_fare(&self) -> Fare {
        Fare(self.bus_snapshot.cost.0 * self.persons.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_booking(txn: &str, bus_id: &str, date: &str, seats: &[u32]) -> Booking {
        Booking {
            transaction_id: txn.to_string(),
            bus_snapshot: BusSnapshot {
                bus_id: BusId::new(bus_id),
                operator: "Greenline".to_string(),
                bus_name: "Night Coach".to_string(),
                route: vec!["X".to_string(), "Y".to_string()],
                from: "X".to_string(),
                to: "Y".to_string(),
                date: TravelDate::parse(date).unwrap(),
                departure_time: "22:30".to_string(),
                cost: Fare(12.5),
            },
            persons: seats
                .iter()
                .map(|s| Passenger {
                    seat_no: SeatNo(*s),
                    name: format!("passenger-{s}"),
                    gender: None,
                    age: None,
                })
                .collect(),
            contact: ContactDetails {
                email: "rider@example.com".to_string(),
                phone: "+8801700000000".to_string(),
            },
            date: TravelDate::parse(date).unwrap(),
            created_at: 0,
        }
    }

    #[test]
    fn seat_numbers_collects_all_passenger_seats() {
        let booking = sample_booking("txn-1", "b1", "2024-07-15", &[2, 5, 9]);
        assert_eq!(
            booking.seat_numbers(),
            vec![SeatNo(2), SeatNo(5), SeatNo(9)]
        );
    }

    #[test]
    fn total_fare_multiplies_by_passenger_count() {
        let booking = sample_booking("txn-1", "b1", "2024-07-15", &[1, 2]);
        assert!((booking.total_fare().0 - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn booking_wire_format_uses_source_field_names() {
        let booking = sample_booking("txn-1", "b1", "2024-07-15", &[1]);
        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["transactionID"], "txn-1");
        assert!(json["busData"].is_object());
        assert!(json["passengerDetails"].is_object());
        assert_eq!(json["busData"]["busId"], "b1");
    }

    #[test]
    fn booking_round_trips_through_json() {
        let booking = sample_booking("txn-9", "b2", "2024-12-01", &[3, 4]);
        let json = serde_json::to_string(&booking).unwrap();
        let back: Booking = serde_json::from_str(&json).unwrap();
        assert_eq!(back, booking);
    }
}
