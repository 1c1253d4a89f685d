//! Dashboard summary: catalogue stats and recent activity.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::display::time_ago_rfc3339;
use crate::models::{Branch, Category, Offer, Service};

const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_services: usize,
    pub active_services: usize,
    pub categories: usize,
    pub categories_with_services: usize,
    pub offers: usize,
    pub active_offers: usize,
    /// Sum of service prices, rounded to whole units
    pub total_value: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub action: String,
    pub item: String,
    pub kind: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_activity: Vec<ActivityItem>,
}

/// An offer counts as active when flagged active and not yet past its end date.
pub fn offer_is_live(offer: &Offer, today: NaiveDate) -> bool {
    offer.is_active
        && NaiveDate::parse_from_str(&offer.end_date, "%Y-%m-%d")
            .map(|end| end >= today)
            .unwrap_or(false)
}

pub fn build(
    services: &[Service],
    categories: &[Category],
    branches: &[Branch],
    offers: &[Offer],
    now: DateTime<Local>,
) -> Dashboard {
    // Same local day as the day-scoped routes.
    let today = now.date_naive();
    let now = now.with_timezone(&Utc);

    let stats = DashboardStats {
        total_services: services.len(),
        active_services: services.iter().filter(|s| s.is_active).count(),
        categories: categories.len(),
        categories_with_services: categories.iter().filter(|c| c.service_count > 0).count(),
        offers: offers.len(),
        active_offers: offers.iter().filter(|o| offer_is_live(o, today)).count(),
        total_value: services.iter().map(|s| s.price).sum::<f64>().round() as i64,
    };

    let activity = |action: &str, kind: &str, item: &str, created_at: &str| ActivityItem {
        action: action.to_string(),
        item: item.to_string(),
        kind: kind.to_string(),
        time: time_ago_rfc3339(created_at, now),
    };

    let recent_activity = services
        .iter()
        .take(2)
        .map(|s| activity("Service added", "service", &s.name, &s.created_at))
        .chain(
            categories
                .iter()
                .take(2)
                .map(|c| activity("Category added", "category", &c.name, &c.created_at)),
        )
        .chain(
            branches
                .iter()
                .take(1)
                .map(|b| activity("Branch added", "branch", &b.name, &b.created_at)),
        )
        .take(RECENT_ACTIVITY_LIMIT)
        .collect();

    Dashboard {
        stats,
        recent_activity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn service(name: &str, price: f64, active: bool, age: Duration) -> Service {
        Service {
            id: name.to_lowercase(),
            name: name.to_string(),
            category: "Hair".to_string(),
            price,
            is_active: active,
            created_at: (now() - age).to_rfc3339(),
        }
    }

    fn offer(active: bool, end: &str) -> Offer {
        Offer {
            id: "o".into(),
            name: "o".into(),
            description: "d".into(),
            discount: 10.0,
            usage_limit: 1,
            start_date: "2026-01-01".into(),
            end_date: end.into(),
            is_active: active,
            image: None,
            branches: vec![],
            services: vec![],
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_stats() {
        let services = vec![
            service("Cut", 80.4, true, Duration::minutes(3)),
            service("Colour", 250.3, false, Duration::hours(2)),
        ];
        let categories = vec![
            Category {
                id: "c1".into(),
                name: "Hair".into(),
                service_count: 2,
                created_at: String::new(),
            },
            Category {
                id: "c2".into(),
                name: "Nails".into(),
                service_count: 0,
                created_at: String::new(),
            },
        ];
        let offers = vec![
            offer(true, "2026-10-17"),
            offer(true, "2026-10-16"),
            offer(false, "2027-01-01"),
            offer(true, "whenever"),
        ];

        let d = build(&services, &categories, &[], &offers, now());
        assert_eq!(
            d.stats,
            DashboardStats {
                total_services: 2,
                active_services: 1,
                categories: 2,
                categories_with_services: 1,
                offers: 4,
                active_offers: 1,
                total_value: 331,
            }
        );
    }

    #[test]
    fn test_offer_ending_today_is_live_just_after_local_midnight() {
        let just_after_midnight = Local.with_ymd_and_hms(2026, 10, 17, 0, 30, 0).unwrap();
        let d = build(
            &[],
            &[],
            &[],
            &[offer(true, "2026-10-17"), offer(true, "2026-10-16")],
            just_after_midnight,
        );
        assert_eq!(d.stats.active_offers, 1);
    }

    #[test]
    fn test_recent_activity_mix_and_cap() {
        let services: Vec<Service> = (0..4)
            .map(|i| service(&format!("S{}", i), 10.0, true, Duration::minutes(5)))
            .collect();
        let categories: Vec<Category> = (0..3)
            .map(|i| Category {
                id: format!("c{}", i),
                name: format!("C{}", i),
                service_count: 0,
                created_at: "garbled".into(),
            })
            .collect();
        let branches = vec![Branch {
            id: "b".into(),
            name: "Marina".into(),
            created_at: (now() - Duration::days(3)).to_rfc3339(),
        }];

        let d = build(&services, &categories, &branches, &[], now());
        let items: Vec<(&str, &str)> = d
            .recent_activity
            .iter()
            .map(|a| (a.item.as_str(), a.time.as_str()))
            .collect();
        assert_eq!(
            items,
            vec![
                ("S0", "5m ago"),
                ("S1", "5m ago"),
                ("C0", "Recently"),
                ("C1", "Recently"),
                ("Marina", "3d ago"),
            ]
        );
    }
}
