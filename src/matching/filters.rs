//! Eligibility filters
//!
//! Pure verdicts over one candidate and one mission. Filters never emit
//! events; the matcher decides which rejections are worth a warning.

use super::MatchPolicy;
use crate::types::{Drone, Mission, Pilot};

/// Why a pilot was (or was not) accepted for a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PilotVerdict {
    Eligible,
    /// Status is not `Available`
    NotAvailable,
    /// Required skill missing; rejected without a warning
    MissingSkill,
    /// Skill present, required certification missing; rejected with a warning
    CertificationMismatch,
}

impl PilotVerdict {
    pub fn is_eligible(self) -> bool {
        self == PilotVerdict::Eligible
    }
}

/// Why a drone was (or was not) accepted for a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DroneVerdict {
    Eligible,
    NotAvailable,
    /// Rainy forecast and the drone is not rain-rated
    WeatherRisk,
}

impl DroneVerdict {
    pub fn is_eligible(self) -> bool {
        self == DroneVerdict::Eligible
    }
}

/// Checks run in a fixed order: status, skill, certification.
pub fn assess_pilot(pilot: &Pilot, mission: &Mission) -> PilotVerdict {
    if !pilot.status.is_available() {
        return PilotVerdict::NotAvailable;
    }
    if !pilot.skills.contains(&mission.required_skill) {
        return PilotVerdict::MissingSkill;
    }
    if !pilot.certifications.contains(&mission.required_certification) {
        return PilotVerdict::CertificationMismatch;
    }
    PilotVerdict::Eligible
}

pub fn is_eligible_pilot(pilot: &Pilot, mission: &Mission) -> bool {
    assess_pilot(pilot, mission).is_eligible()
}

/// Checks run in a fixed order: status, weather.
pub fn assess_drone(drone: &Drone, mission: &Mission, policy: &MatchPolicy) -> DroneVerdict {
    if !drone.status.is_available() {
        return DroneVerdict::NotAvailable;
    }
    if mission.weather_forecast.trim() == policy.rainy_forecast
        && !drone.weather_resistance.contains(&policy.rain_capability)
    {
        return DroneVerdict::WeatherRisk;
    }
    DroneVerdict::Eligible
}

pub fn is_eligible_drone(drone: &Drone, mission: &Mission, policy: &MatchPolicy) -> bool {
    assess_drone(drone, mission, policy).is_eligible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Priority, Status, TagSet};
    use chrono::NaiveDate;

    fn mission(forecast: &str) -> Mission {
        Mission {
            project_id: "PRJ001".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 2, 6).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 2, 8).unwrap(),
            required_skill: "Thermal".into(),
            required_certification: "Part107".into(),
            priority: Priority::Normal,
            weather_forecast: forecast.into(),
            mission_budget: 50_000,
            location: "Bangalore".into(),
        }
    }

    fn pilot(status: Status, skills: &str, certs: &str) -> Pilot {
        Pilot {
            name: "Arjun".into(),
            status,
            skills: TagSet::parse(skills),
            certifications: TagSet::parse(certs),
            location: "Bangalore".into(),
            daily_rate: 10_000,
            current_assignment: None,
        }
    }

    fn drone(status: Status, resistance: &str) -> Drone {
        Drone {
            drone_id: "D001".into(),
            status,
            weather_resistance: TagSet::parse(resistance),
            current_assignment: None,
        }
    }

    #[test]
    fn test_pilot_eligible() {
        let p = pilot(Status::Available, "Mapping, Thermal", "Part107");
        assert_eq!(assess_pilot(&p, &mission("Sunny")), PilotVerdict::Eligible);
        assert!(is_eligible_pilot(&p, &mission("Sunny")));
    }

    #[test]
    fn test_pilot_status_checked_before_skill() {
        let p = pilot(Status::Assigned, "Mapping", "");
        assert_eq!(assess_pilot(&p, &mission("Sunny")), PilotVerdict::NotAvailable);
        let p = pilot(Status::Other("On Leave".into()), "Thermal", "Part107");
        assert_eq!(assess_pilot(&p, &mission("Sunny")), PilotVerdict::NotAvailable);
    }

    #[test]
    fn test_missing_skill_beats_missing_cert() {
        let p = pilot(Status::Available, "Mapping", "");
        assert_eq!(assess_pilot(&p, &mission("Sunny")), PilotVerdict::MissingSkill);
    }

    #[test]
    fn test_cert_mismatch_when_skill_present() {
        let p = pilot(Status::Available, "Thermal", "DGCA");
        assert_eq!(
            assess_pilot(&p, &mission("Sunny")),
            PilotVerdict::CertificationMismatch
        );
    }

    #[test]
    fn test_drone_rain_rules() {
        let policy = MatchPolicy::default();
        let dry = drone(Status::Available, "None");
        let rated = drone(Status::Available, "IP43, Rain");
        assert_eq!(assess_drone(&dry, &mission("Rainy"), &policy), DroneVerdict::WeatherRisk);
        assert_eq!(assess_drone(&rated, &mission("Rainy"), &policy), DroneVerdict::Eligible);
        assert_eq!(assess_drone(&dry, &mission("Cloudy"), &policy), DroneVerdict::Eligible);
    }

    #[test]
    fn test_drone_status_checked_before_weather() {
        let policy = MatchPolicy::default();
        let busy = drone(Status::Assigned, "");
        assert_eq!(assess_drone(&busy, &mission("Rainy"), &policy), DroneVerdict::NotAvailable);
        assert!(!is_eligible_drone(&busy, &mission("Sunny"), &policy));
    }

    #[test]
    fn test_custom_rain_policy() {
        let policy = MatchPolicy {
            rainy_forecast: "Monsoon".into(),
            rain_capability: "IP67".into(),
            urgent_reassignment: true,
        };
        let d = drone(Status::Available, "Rain");
        assert_eq!(assess_drone(&d, &mission("Monsoon"), &policy), DroneVerdict::WeatherRisk);
        assert_eq!(assess_drone(&d, &mission("Rainy"), &policy), DroneVerdict::Eligible);
    }
}
