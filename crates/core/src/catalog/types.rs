//! Event catalog types.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status value the event service uses for events open to booking.
pub const ACTIVE_STATUS: &str = "ACTIVE";

/// Category reported for events without one.
pub const UNCATEGORIZED: &str = "Other";

/// An event as served by the event service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResource {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub event_date: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub max_attendees: Option<i64>,
    /// Current price field.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub base_price: Option<Decimal>,
    /// Legacy price field, still sent by older event records.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub ticket_price: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl EventResource {
    /// Ticket price: `basePrice` when present, otherwise `ticketPrice`.
    pub fn price(&self) -> Option<Decimal> {
        self.base_price.or(self.ticket_price)
    }

    /// Whether the event accepts bookings. Events without a status are treated as open.
    pub fn is_bookable(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case(ACTIVE_STATUS))
            .unwrap_or(true)
    }

    fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// Browse filter applied to the event listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Case-insensitive substring matched against title and description.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact category; `"all"` disables the filter.
    #[serde(default)]
    pub category: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, event: &EventResource) -> bool {
        self.matches_search(event) && self.matches_category(event)
    }

    /// Keep the events that pass the filter, preserving order.
    pub fn apply(&self, events: Vec<EventResource>) -> Vec<EventResource> {
        events.into_iter().filter(|e| self.matches(e)).collect()
    }

    fn matches_search(&self, event: &EventResource) -> bool {
        let query = match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return true,
        };
        event.title.to_lowercase().contains(&query)
            || event
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&query))
                .unwrap_or(false)
    }

    fn matches_category(&self, event: &EventResource) -> bool {
        match self.category.as_deref() {
            None | Some("") | Some("all") => true,
            Some(category) => event.category.as_deref() == Some(category),
        }
    }
}

/// Distinct categories across `events`, sorted. Events without a category
/// are grouped under [`UNCATEGORIZED`].
pub fn categories(events: &[EventResource]) -> Vec<String> {
    events
        .iter()
        .map(|e| e.category_or_default().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: i64, title: &str, category: Option<&str>) -> EventResource {
        EventResource {
            id,
            title: title.to_string(),
            description: None,
            event_date: "2026-09-12T20:00:00".to_string(),
            category: category.map(String::from),
            status: Some("ACTIVE".to_string()),
            max_attendees: None,
            base_price: None,
            ticket_price: None,
            image_url: None,
        }
    }

    #[test]
    fn test_base_price_wins_over_ticket_price() {
        let mut e = event(1, "Opera", None);
        e.ticket_price = Some(Decimal::from(30));
        assert_eq!(e.price(), Some(Decimal::from(30)));

        e.base_price = Some(Decimal::from(45));
        assert_eq!(e.price(), Some(Decimal::from(45)));

        e.base_price = Some(Decimal::ZERO);
        assert_eq!(e.price(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_deserialize_event_service_payload() {
        let json = r#"{
            "id": 12,
            "title": "Tech Summit",
            "description": "Talks and workshops",
            "eventDate": "2026-10-01T09:00:00",
            "category": "Conference",
            "status": "ACTIVE",
            "maxAttendees": 500,
            "basePrice": 149.99,
            "imageUrl": "/images/summit.jpg"
        }"#;
        let event: EventResource = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, 12);
        assert_eq!(event.max_attendees, Some(500));
        assert_eq!(event.price(), Some(Decimal::new(14999, 2)));
        assert!(event.ticket_price.is_none());
        assert!(event.is_bookable());
    }

    #[test]
    fn test_bookable_status() {
        let mut e = event(1, "Gala", None);
        assert!(e.is_bookable());
        e.status = None;
        assert!(e.is_bookable());
        e.status = Some("CANCELLED".to_string());
        assert!(!e.is_bookable());
    }

    #[test]
    fn test_filter_search_is_case_insensitive_on_title_and_description() {
        let mut with_desc = event(2, "Evening Show", Some("Theater"));
        with_desc.description = Some("A night of JAZZ standards".to_string());
        let events = vec![
            event(1, "Jazz Brunch", Some("Music")),
            with_desc,
            event(3, "Derby", Some("Sports")),
        ];

        let filter = EventFilter {
            search: Some("jazz".to_string()),
            category: None,
        };
        let ids: Vec<i64> = filter.apply(events).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_filter_category_all_disables_filter() {
        let events = vec![event(1, "A", Some("Music")), event(2, "B", Some("Sports"))];

        let all = EventFilter {
            search: None,
            category: Some("all".to_string()),
        };
        assert_eq!(all.apply(events.clone()).len(), 2);

        let sports = EventFilter {
            search: None,
            category: Some("Sports".to_string()),
        };
        let result = sports.apply(events);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
    }

    #[test]
    fn test_categories_are_distinct_and_sorted() {
        let events = vec![
            event(1, "A", Some("Sports")),
            event(2, "B", Some("Music")),
            event(3, "C", Some("Sports")),
            event(4, "D", None),
        ];
        assert_eq!(categories(&events), vec!["Music", "Other", "Sports"]);
    }
}
