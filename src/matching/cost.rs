//! Mission cost evaluation

use crate::types::{Amount, Mission, Pilot};

/// Inclusive mission length in days: `(end - start) + 1`, never below 1.
pub fn mission_days(mission: &Mission) -> u32 {
    let days = (mission.end_date - mission.start_date).num_days() + 1;
    u32::try_from(days.max(1)).unwrap_or(u32::MAX)
}

/// Cost of flying `mission` with `pilot`: days × daily rate.
pub fn mission_cost(mission: &Mission, pilot: &Pilot) -> Amount {
    Amount::from(mission_days(mission)).saturating_mul(pilot.daily_rate)
}

pub fn within_budget(mission: &Mission, pilot: &Pilot) -> bool {
    mission_cost(mission, pilot) <= mission.mission_budget
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Priority, Status, TagSet};
    use chrono::NaiveDate;

    fn mission(start: (i32, u32, u32), end: (i32, u32, u32), budget: Amount) -> Mission {
        Mission {
            project_id: "PRJ001".into(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            required_skill: "Mapping".into(),
            required_certification: "DGCA".into(),
            priority: Priority::Normal,
            weather_forecast: "Sunny".into(),
            mission_budget: budget,
            location: "Pune".into(),
        }
    }

    fn pilot(rate: Amount) -> Pilot {
        Pilot {
            name: "Neha".into(),
            status: Status::Available,
            skills: TagSet::default(),
            certifications: TagSet::default(),
            location: "Pune".into(),
            daily_rate: rate,
            current_assignment: None,
        }
    }

    #[test]
    fn test_single_day_mission_is_one_day() {
        let m = mission((2026, 3, 1), (2026, 3, 1), 0);
        assert_eq!(mission_days(&m), 1);
    }

    #[test]
    fn test_days_are_inclusive_across_month_boundary() {
        let m = mission((2026, 2, 27), (2026, 3, 2), 0);
        assert_eq!(mission_days(&m), 4);
    }

    #[test]
    fn test_inverted_dates_clamp_to_one_day() {
        let m = mission((2026, 3, 5), (2026, 3, 1), 0);
        assert_eq!(mission_days(&m), 1);
    }

    #[test]
    fn test_cost_is_days_times_rate() {
        let m = mission((2026, 2, 6), (2026, 2, 8), 50_000);
        assert_eq!(mission_cost(&m, &pilot(10_000)), 30_000);
        assert!(within_budget(&m, &pilot(10_000)));
    }

    #[test]
    fn test_cost_equal_to_budget_is_within() {
        let m = mission((2026, 2, 6), (2026, 2, 10), 60_000);
        assert_eq!(mission_cost(&m, &pilot(12_000)), 60_000);
        assert!(within_budget(&m, &pilot(12_000)));
    }

    #[test]
    fn test_over_budget() {
        let m = mission((2026, 2, 6), (2026, 2, 10), 50_000);
        assert!(!within_budget(&m, &pilot(12_000)));
    }

    #[test]
    fn test_cost_saturates() {
        let m = mission((2026, 1, 1), (2026, 1, 2), Amount::MAX);
        assert_eq!(mission_cost(&m, &pilot(Amount::MAX)), Amount::MAX);
    }
}
