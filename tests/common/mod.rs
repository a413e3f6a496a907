//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use skyroster::{Drone, Mission, Pilot, Priority, Status, TagSet};
use std::fs;
use std::path::Path;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Three-day Thermal/Part107 mission in Bangalore with a 50,000 budget.
pub fn mission(id: &str) -> Mission {
    Mission {
        project_id: id.into(),
        start_date: date(2026, 2, 6),
        end_date: date(2026, 2, 8),
        required_skill: "Thermal".into(),
        required_certification: "Part107".into(),
        priority: Priority::Normal,
        weather_forecast: "Sunny".into(),
        mission_budget: 50_000,
        location: "Bangalore".into(),
    }
}

/// Available Thermal/Part107 pilot in Bangalore at 10,000 per day.
pub fn pilot(name: &str) -> Pilot {
    Pilot {
        name: name.into(),
        status: Status::Available,
        skills: TagSet::parse("Thermal"),
        certifications: TagSet::parse("Part107"),
        location: "Bangalore".into(),
        daily_rate: 10_000,
        current_assignment: None,
    }
}

/// Available drone rated for rain.
pub fn drone(id: &str) -> Drone {
    Drone {
        drone_id: id.into(),
        status: Status::Available,
        weather_resistance: TagSet::parse("IP43, Rain"),
        current_assignment: None,
    }
}

/// Write a small workbook: two pilots, two drones, three missions.
///
/// PRJ001 takes Arjun and D001. PRJ002 needs a rain drone and gets D002.
/// PRJ003 is over budget for anyone left.
pub fn seed_workbook(dir: &Path) {
    fs::write(
        dir.join("pilot_roster.csv"),
        "pilot_id,name,skills,certifications,location,status,daily_rate_inr,current_assignment\n\
         P001,Arjun,\"Mapping, Survey\",DGCA,Bangalore,Available,1500,\n\
         P002,Neha,\"Inspection, Thermal\",\"DGCA, Night Ops\",Mumbai,Available,3000,\n\
         P003,Rohit,Mapping,DGCA,Bangalore,Assigned,1500,PRJ000\n",
    )
    .unwrap();
    fs::write(
        dir.join("drone_fleet.csv"),
        "drone_id,model,status,weather_resistance,location,current_assignment\n\
         D001,DJI M300,Available,None (Clear Sky Only),Bangalore,\n\
         D002,DJI Mavic 3,Available,\"IP43, Rain\",Mumbai,\n\
         D003,Skydio X2,Maintenance,Rain,Pune,\n",
    )
    .unwrap();
    fs::write(
        dir.join("missions.csv"),
        "project_id,client,location,required_skills,required_certs,start_date,end_date,\
         priority,mission_budget_inr,weather_forecast\n\
         PRJ001,Client A,Bangalore,Mapping,DGCA,2026-02-06,2026-02-08,High,10500,Sunny\n\
         PRJ002,Client B,Mumbai,Thermal,DGCA,2026-02-07,2026-02-09,Standard,15000,Rainy\n\
         PRJ003,Client C,Bangalore,Mapping,DGCA,2026-02-10,2026-02-20,Urgent,5000,Cloudy\n",
    )
    .unwrap();
}
