//! Pre-rendered deep links for announcing a trip through an external messaging app. The link is
//! computed once when a trip is written and stored with the record.

use std::fmt::Write;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use time::macros::format_description;
use time::Date;

use crate::trip::{Driver, TripInput};

const SHARE_LINK_BASE: &str = "https://api.whatsapp.com/send";

/// Characters left unescaped in the message, the same set browsers keep in a URI component.
const MESSAGE_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const MESSAGE_HEADER: &str = "NEW SCHEDULED TRIP";
const MESSAGE_FOOTER: &str = "Trip scheduling log";

/// Separates the entries of a shared-van passenger roster.
pub const ROSTER_SEPARATOR: &str = " | ";

/// Separates a passenger's name from their document within a roster entry.
pub const ROSTER_FIELD_SEPARATOR: &str = " - ";

pub fn share_link(input: &TripInput) -> String {
    let message = share_message(input);
    let encoded = utf8_percent_encode(&message, MESSAGE_ESCAPE_SET);
    format!("{SHARE_LINK_BASE}?text={encoded}")
}

pub fn share_message(input: &TripInput) -> String {
    let driver = Driver::from(input.driver.as_str());
    let mut message = String::from(MESSAGE_HEADER);

    // Writing into a String is infallible
    let _ = write!(message, "\n\nDate: {}", localized_date(&input.date));
    let _ = write!(message, "\nTime: {}", input.time);
    let _ = write!(message, "\nDriver: {driver}");
    let _ = write!(message, "\nOrigin: {}", input.origin);
    let _ = write!(message, "\nDestination: {}", input.destination);

    let passenger = input.passenger.as_deref().map(str::trim).unwrap_or_default();
    if !passenger.is_empty() {
        match driver {
            Driver::SharedVan => {
                message.push_str("\n\nPASSENGERS:");
                for (idx, entry) in passenger.split(ROSTER_SEPARATOR).enumerate() {
                    let (name, document) = roster_entry(entry);
                    let _ = write!(message, "\n{}. {name} - {document}", idx + 1);
                }
            }
            Driver::RideHailing => {
                let _ = write!(message, "\nPassenger: {passenger}");
            }
            Driver::Named(_) => {}
        }
    }

    if let Some(notes) = input.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        let _ = write!(message, "\n\nNotes: {notes}");
    }

    let _ = write!(message, "\n\n---\n{MESSAGE_FOOTER}");

    message
}

fn roster_entry(entry: &str) -> (&str, &str) {
    let mut fields = entry.splitn(2, ROSTER_FIELD_SEPARATOR);

    let name = fields
        .next()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("N/A");
    let document = fields
        .next()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("no document");

    (name, document)
}

/// Renders an ISO calendar date as day/month/year. Values that don't parse are passed through
/// untouched rather than dropped from the message.
fn localized_date(raw: &str) -> String {
    let iso = format_description!("[year]-[month]-[day]");
    let local = format_description!("[day]/[month]/[year]");

    Date::parse(raw.trim(), iso)
        .ok()
        .and_then(|date| date.format(local).ok())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn van_trip(passenger: &str) -> TripInput {
        TripInput {
            date: "2024-03-15".to_string(),
            time: "08:30".to_string(),
            driver: "Van".to_string(),
            origin: "Plant".to_string(),
            destination: "Airport".to_string(),
            passenger: Some(passenger.to_string()),
            notes: None,
        }
    }

    fn decoded_text(link: &str) -> String {
        let parsed = url::Url::parse(link).unwrap();
        parsed
            .query_pairs()
            .find(|(key, _)| key == "text")
            .map(|(_, value)| value.into_owned())
            .unwrap()
    }

    #[test]
    fn test_van_roster_is_numbered() {
        let message = share_message(&van_trip("Ana - 111 | Bruno - 222"));

        assert!(message.contains("\n1. Ana - 111"));
        assert!(message.contains("\n2. Bruno - 222"));
        assert!(message.contains("PASSENGERS:"));
    }

    #[test]
    fn test_van_roster_fills_missing_parts() {
        let message = share_message(&van_trip("Ana |  - 333"));

        assert!(message.contains("\n1. Ana - no document"));
        assert!(message.contains("\n2. N/A - 333"));
    }

    #[test]
    fn test_single_passenger_line_for_other_drivers() {
        let mut input = van_trip("Carla");
        input.driver = "Uber".to_string();
        let message = share_message(&input);

        assert!(message.contains("\nPassenger: Carla"));
        assert!(!message.contains("PASSENGERS:"));
    }

    #[test]
    fn test_named_drivers_omit_passengers() {
        let mut input = van_trip("Carla");
        input.driver = "Carlos".to_string();
        let message = share_message(&input);

        assert!(message.contains("\nDriver: Carlos"));
        assert!(!message.contains("Carla"));
    }

    #[test]
    fn test_date_is_localized() {
        let message = share_message(&van_trip("Ana - 1"));
        assert!(message.contains("Date: 15/03/2024"));

        assert_eq!(localized_date("next tuesday"), "next tuesday");
    }

    #[test]
    fn test_notes_are_optional() {
        let mut input = van_trip("Ana - 1");
        assert!(!share_message(&input).contains("Notes:"));

        input.notes = Some("bring badge".to_string());
        assert!(share_message(&input).contains("\n\nNotes: bring badge"));
    }

    #[test]
    fn test_link_encodes_the_message() {
        let input = van_trip("Ana - 111 | Bruno - 222");
        let link = share_link(&input);

        assert!(link.starts_with("https://api.whatsapp.com/send?text="));
        assert!(!link.contains('\n'));
        assert_eq!(decoded_text(&link), share_message(&input));
    }

    #[test]
    fn test_link_escapes_like_a_uri_component() {
        let mut input = van_trip("Ana - 111");
        input.notes = Some("gate (north) + badge!".to_string());
        let link = share_link(&input);

        assert!(link.contains("NEW%20SCHEDULED%20TRIP"));
        assert!(link.contains("gate%20(north)%20%2B%20badge!"));
        assert!(link.contains("%0A%0ANotes"));
        assert_eq!(decoded_text(&link), share_message(&input));
    }

    #[test]
    fn test_link_is_deterministic() {
        let input = van_trip("Ana - 111");
        assert_eq!(share_link(&input), share_link(&input));
    }
}
