//! The four portal datasets: schema definitions and dispatch.
//!
//! Each dataset is described once as a [`TableSchema`]: wire entity, table
//! columns with their width tiers, and the validated form fields. Commands
//! stay generic over the record type and pick a schema through
//! [`with_dataset!`].

use chrono::{Datelike, NaiveDate, Utc};
use clap::ValueEnum;
use dotport_core::{
    number_text, Bridge, FieldDef, RailroadAccident, SelectOption, StateDirectory, TransitAgency,
    VehicleFatality,
};
use dotport_sdk::{Align, Breakpoint, ColumnSpec, TableSchema};

/// Dataset selector used as a positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetKind {
    /// FRA railroad accident reports
    Railroad,
    /// National Bridge Inventory structures
    Bridges,
    /// National Transit Database agency profiles
    Transit,
    /// FARS vehicle fatality records
    Fatalities,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Railroad,
        DatasetKind::Bridges,
        DatasetKind::Transit,
        DatasetKind::Fatalities,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DatasetKind::Railroad => "Railroad Accidents",
            DatasetKind::Bridges => "Bridges",
            DatasetKind::Transit => "Transit Agencies",
            DatasetKind::Fatalities => "Vehicle Fatalities",
        }
    }
}

/// Run one generic expression with the schema of the selected dataset.
///
/// Expands to a four-arm match so the expression is monomorphized per
/// record type; every arm must produce the same result type.
macro_rules! with_dataset {
    ($kind:expr, $states:expr, |$schema:ident| $body:expr) => {
        match $kind {
            crate::datasets::DatasetKind::Railroad => {
                let $schema = crate::datasets::railroad_schema($states);
                $body
            }
            crate::datasets::DatasetKind::Bridges => {
                let $schema = crate::datasets::bridge_schema($states);
                $body
            }
            crate::datasets::DatasetKind::Transit => {
                let $schema = crate::datasets::transit_schema($states);
                $body
            }
            crate::datasets::DatasetKind::Fatalities => {
                let $schema = crate::datasets::fatality_schema($states);
                $body
            }
        }
    };
}

pub(crate) use with_dataset;

/// Railroad accident reports.
pub fn railroad_schema(states: &StateDirectory) -> TableSchema<RailroadAccident> {
    TableSchema::new("railroad-accidents", "RailroadAccident", "Railroad Accidents")
        .with_create_label("Add Accident Report")
        .with_empty_message("No railroad accidents found")
        .with_loading_message("Loading railroad accidents...")
        .with_order_by("AccidentDate desc")
        .with_columns(vec![
            ColumnSpec::new("Date", |r: &RailroadAccident, ctx| {
                ctx.date(Some(r.accident_date.as_str()))
            }),
            ColumnSpec::new("Railroad", |r: &RailroadAccident, _| {
                r.reporting_railroad_name.clone()
            }),
            ColumnSpec::new("State", |r: &RailroadAccident, ctx| {
                ctx.state_code(r.state_id).to_string()
            }),
            ColumnSpec::new("Type", |r: &RailroadAccident, _| r.accident_type.clone())
                .breakpoint(Breakpoint::Large),
            ColumnSpec::new("Speed", |r: &RailroadAccident, _| match r.train_speed {
                Some(speed) => format!("{} mph", number_text(speed)),
                None => "-".to_string(),
            })
            .align(Align::Right)
            .breakpoint(Breakpoint::ExtraLarge),
            ColumnSpec::new("Killed", |r: &RailroadAccident, _| r.total_killed.to_string())
                .align(Align::Right),
            ColumnSpec::new("Injured", |r: &RailroadAccident, _| {
                r.total_injured.to_string()
            })
            .align(Align::Right),
            ColumnSpec::new("Damage", |r: &RailroadAccident, ctx| {
                ctx.currency(r.total_damage)
            })
            .align(Align::Right)
            .breakpoint(Breakpoint::Medium),
        ])
        .with_fields(vec![
            FieldDef::text("ReportingRailroadName", "Reporting Railroad")
                .required()
                .with_max_length(200),
            FieldDef::date("AccidentDate", "Accident Date")
                .required()
                .with_max_date(today()),
            FieldDef::select("StateId", "State", states.options()).required(),
            FieldDef::select(
                "AccidentType",
                "Accident Type",
                options(&["Derailment", "Collision", "Crossing Incident", "Fire/Explosion", "Other"]),
            )
            .required(),
            FieldDef::number("TrainSpeed", "Train Speed (mph)")
                .with_min(0.0)
                .with_max(300.0),
            FieldDef::number("TotalKilled", "Total Killed")
                .with_min(0.0)
                .with_max(10_000.0),
            FieldDef::number("TotalInjured", "Total Injured")
                .with_min(0.0)
                .with_max(10_000.0),
            FieldDef::number("TotalDamage", "Total Damage ($)").with_min(0.0),
            FieldDef::number("HazmatCars", "Hazmat Cars")
                .with_min(0.0)
                .with_max(1_000.0),
        ])
}

/// National Bridge Inventory structures.
pub fn bridge_schema(states: &StateDirectory) -> TableSchema<Bridge> {
    TableSchema::new("bridges", "Bridge", "Bridges")
        .with_create_label("Add Bridge")
        .with_empty_message("No bridges found")
        .with_loading_message("Loading bridges...")
        .with_order_by("AverageDailyTraffic desc")
        .with_columns(vec![
            ColumnSpec::new("Structure #", |r: &Bridge, _| r.structure_number.clone()),
            ColumnSpec::new("State", |r: &Bridge, ctx| {
                ctx.state_code(r.state_id).to_string()
            }),
            ColumnSpec::new("Facility", |r: &Bridge, _| {
                r.facility_carried.clone().unwrap_or_else(|| "-".to_string())
            })
            .breakpoint(Breakpoint::Medium),
            ColumnSpec::new("Type", |r: &Bridge, _| {
                r.main_structure_type.clone().unwrap_or_else(|| "-".to_string())
            })
            .breakpoint(Breakpoint::Large),
            ColumnSpec::new("Year Built", |r: &Bridge, _| match r.year_built {
                Some(year) => year.to_string(),
                None => "-".to_string(),
            })
            .align(Align::Right)
            .breakpoint(Breakpoint::ExtraLarge),
            ColumnSpec::new("Daily Traffic", |r: &Bridge, ctx| {
                ctx.number(r.average_daily_traffic)
            })
            .align(Align::Right)
            .breakpoint(Breakpoint::Medium),
            ColumnSpec::new("Condition", |r: &Bridge, _| r.condition_label().to_string())
                .align(Align::Center),
        ])
        .with_fields(vec![
            FieldDef::text("StructureNumber", "Structure Number")
                .required()
                .with_max_length(50),
            FieldDef::select("StateId", "State", states.options()).required(),
            FieldDef::text("FacilityCarried", "Facility Carried").with_max_length(200),
            FieldDef::text("FeaturesIntersected", "Features Intersected").with_max_length(200),
            FieldDef::number("YearBuilt", "Year Built")
                .with_min(1800.0)
                .with_max(current_year()),
            FieldDef::select(
                "MainStructureType",
                "Structure Type",
                options(&["Steel", "Concrete", "Prestressed Concrete", "Wood", "Masonry", "Other"]),
            ),
            FieldDef::select("OverallCondition", "Overall Condition", options(&["Good", "Fair", "Poor"])),
            FieldDef::boolean("StructurallyDeficient", "Structurally Deficient"),
            FieldDef::number("AverageDailyTraffic", "Average Daily Traffic")
                .with_min(0.0)
                .with_max(1_000_000.0),
            FieldDef::number("AverageDailyTruckTraffic", "Average Daily Truck Traffic")
                .with_min(0.0)
                .with_max(500_000.0),
        ])
}

/// Transit agency annual reporting profiles.
pub fn transit_schema(states: &StateDirectory) -> TableSchema<TransitAgency> {
    TableSchema::new("transit-agencies", "TransitAgency", "Transit Agencies")
        .with_create_label("Add Agency")
        .with_empty_message("No transit agencies found")
        .with_loading_message("Loading transit agencies...")
        .with_order_by("UnlinkedPassengerTrips desc")
        .with_columns(vec![
            ColumnSpec::new("NTD ID", |r: &TransitAgency, _| r.ntd_id.clone())
                .breakpoint(Breakpoint::Large),
            ColumnSpec::new("Agency", |r: &TransitAgency, _| r.agency_name.clone()),
            ColumnSpec::new("City", |r: &TransitAgency, _| r.city.clone())
                .breakpoint(Breakpoint::Medium),
            ColumnSpec::new("State", |r: &TransitAgency, ctx| {
                ctx.state_code(r.state_id).to_string()
            }),
            ColumnSpec::new("Year", |r: &TransitAgency, _| r.report_year.to_string())
                .align(Align::Right)
                .breakpoint(Breakpoint::ExtraLarge),
            ColumnSpec::new("Ridership", |r: &TransitAgency, _| r.ridership_label())
                .align(Align::Right),
            ColumnSpec::new("Vehicles", |r: &TransitAgency, ctx| {
                ctx.number(r.vehicles_operated_max_service)
            })
            .align(Align::Right)
            .breakpoint(Breakpoint::Large),
            ColumnSpec::new("Expenses", |r: &TransitAgency, ctx| {
                ctx.currency(r.total_operating_expenses)
            })
            .align(Align::Right)
            .breakpoint(Breakpoint::Medium),
        ])
        .with_fields(vec![
            FieldDef::text("NtdId", "NTD ID").required().with_max_length(20),
            FieldDef::text("AgencyName", "Agency Name")
                .required()
                .with_max_length(200),
            FieldDef::text("City", "City").required().with_max_length(100),
            FieldDef::select("StateId", "State", states.options()).required(),
            FieldDef::number("ReportYear", "Report Year")
                .required()
                .with_min(1980.0)
                .with_max(current_year()),
            FieldDef::select(
                "OrganizationType",
                "Organization Type",
                options(&[
                    "Bus",
                    "Heavy Rail",
                    "Light Rail",
                    "Commuter Rail",
                    "Demand Response",
                    "Ferry",
                    "Other",
                ]),
            ),
            FieldDef::number("UnlinkedPassengerTrips", "Unlinked Passenger Trips").with_min(0.0),
            FieldDef::number("VehicleRevenueMiles", "Vehicle Revenue Miles").with_min(0.0),
            FieldDef::number("VehiclesOperatedMaxService", "Vehicles Operated in Maximum Service")
                .with_min(0.0)
                .with_max(50_000.0),
            FieldDef::number("TotalOperatingExpenses", "Total Operating Expenses ($)").with_min(0.0),
            FieldDef::number("FareRevenuesEarned", "Fare Revenues Earned ($)").with_min(0.0),
        ])
}

/// Vehicle fatality case records.
pub fn fatality_schema(states: &StateDirectory) -> TableSchema<VehicleFatality> {
    TableSchema::new("vehicle-fatalities", "VehicleFatality", "Vehicle Fatalities")
        .with_empty_message("No vehicle fatalities found")
        .with_loading_message("Loading vehicle fatalities...")
        .with_order_by("CrashDate desc")
        .with_columns(vec![
            ColumnSpec::new("Case #", |r: &VehicleFatality, _| r.case_number.clone())
                .breakpoint(Breakpoint::Large),
            ColumnSpec::new("Date", |r: &VehicleFatality, ctx| {
                ctx.date(Some(r.crash_date.as_str()))
            }),
            ColumnSpec::new("State", |r: &VehicleFatality, ctx| {
                ctx.state_code(r.state_id).to_string()
            }),
            ColumnSpec::new("Collision Type", |r: &VehicleFatality, _| {
                r.manner_of_collision.clone().unwrap_or_else(|| "-".to_string())
            })
            .breakpoint(Breakpoint::Medium),
            ColumnSpec::new("Area", |r: &VehicleFatality, _| {
                r.land_use.clone().unwrap_or_else(|| "Unknown".to_string())
            })
            .align(Align::Center)
            .breakpoint(Breakpoint::ExtraLarge),
            ColumnSpec::new("Vehicles", |r: &VehicleFatality, _| {
                r.number_of_vehicles.to_string()
            })
            .align(Align::Right)
            .breakpoint(Breakpoint::Large),
            ColumnSpec::new("Fatalities", |r: &VehicleFatality, _| {
                r.number_of_fatalities.to_string()
            })
            .align(Align::Right),
            ColumnSpec::new("Speed Related", |r: &VehicleFatality, _| {
                String::from(if r.involves_speed_related { "Yes" } else { "No" })
            })
            .align(Align::Center)
            .breakpoint(Breakpoint::Medium),
        ])
        .with_fields(vec![
            FieldDef::text("CaseNumber", "Case Number")
                .required()
                .with_max_length(50),
            FieldDef::date("CrashDate", "Crash Date")
                .required()
                .with_max_date(today()),
            FieldDef::select("StateId", "State", states.options()).required(),
            FieldDef::number("NumberOfFatalities", "Number of Fatalities")
                .required()
                .with_min(1.0)
                .with_max(500.0),
            FieldDef::number("NumberOfVehicles", "Number of Vehicles")
                .with_min(1.0)
                .with_max(100.0),
            FieldDef::select(
                "MannerOfCollision",
                "Manner of Collision",
                options(&[
                    "Front-to-Front",
                    "Front-to-Rear",
                    "Angle",
                    "Sideswipe",
                    "Rear-to-Side",
                    "Rear-to-Rear",
                    "Single Vehicle",
                    "Unknown",
                ]),
            ),
            FieldDef::select("LandUse", "Land Use", options(&["Urban", "Rural"])),
            FieldDef::select(
                "RoadwayFunctionClass",
                "Roadway Function Class",
                options(&[
                    "Interstate",
                    "Principal Arterial",
                    "Minor Arterial",
                    "Collector",
                    "Local",
                ]),
            ),
            FieldDef::boolean("InvolvesSpeedRelated", "Speed Related"),
            FieldDef::number("NumberOfDrunkDrivers", "Number of Drunk Drivers")
                .with_min(0.0)
                .with_max(50.0),
            FieldDef::select(
                "WeatherCondition",
                "Weather Condition",
                options(&["Clear", "Rain", "Snow", "Fog", "Cloudy", "Other"]),
            ),
        ])
}

/// Select options where the stored value is the label itself.
fn options(labels: &[&str]) -> Vec<SelectOption> {
    labels
        .iter()
        .map(|label| SelectOption::new(*label, *label))
        .collect()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn current_year() -> f64 {
    f64::from(Utc::now().year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotport_core::{FieldType, State};

    fn directory() -> StateDirectory {
        StateDirectory::new(vec![
            State {
                id: 6,
                code: "CA".into(),
                name: "California".into(),
                region: None,
            },
            State {
                id: 48,
                code: "TX".into(),
                name: "Texas".into(),
                region: None,
            },
        ])
    }

    #[test]
    fn test_dataset_titles() {
        assert_eq!(DatasetKind::Railroad.title(), "Railroad Accidents");
        assert_eq!(DatasetKind::Bridges.title(), "Bridges");
        assert_eq!(DatasetKind::Transit.title(), "Transit Agencies");
        assert_eq!(DatasetKind::Fatalities.title(), "Vehicle Fatalities");
    }

    #[test]
    fn test_railroad_schema_shape() {
        let schema = railroad_schema(&directory());
        assert_eq!(schema.entity, "RailroadAccident");
        assert_eq!(schema.dataset_key, "railroad-accidents");
        assert_eq!(schema.order_by.as_deref(), Some("AccidentDate desc"));
        assert_eq!(schema.columns.len(), 8);
        assert_eq!(schema.fields.len(), 9);
    }

    #[test]
    fn test_every_schema_has_a_required_state_select() {
        let directory = directory();

        let field_sets = [
            railroad_schema(&directory).fields,
            bridge_schema(&directory).fields,
            transit_schema(&directory).fields,
            fatality_schema(&directory).fields,
        ];

        for fields in &field_sets {
            let state = fields
                .iter()
                .find(|field| field.name == "StateId")
                .expect("schema without a StateId field");
            assert_eq!(state.field_type, FieldType::Select);
            assert!(state.required);
            assert_eq!(state.options.len(), 2, "options come from the directory");
        }
    }

    #[test]
    fn test_field_names_use_wire_casing() {
        let directory = directory();
        let field_sets = [
            railroad_schema(&directory).fields,
            bridge_schema(&directory).fields,
            transit_schema(&directory).fields,
            fatality_schema(&directory).fields,
        ];

        for fields in &field_sets {
            for field in fields {
                assert!(
                    field.name.chars().next().unwrap().is_ascii_uppercase(),
                    "{} is not PascalCase",
                    field.name
                );
                assert!(!field.name.contains('_'), "{} is not PascalCase", field.name);
            }
        }
    }

    #[test]
    fn test_dataset_keys_are_distinct() {
        let directory = directory();
        let keys = [
            railroad_schema(&directory).dataset_key,
            bridge_schema(&directory).dataset_key,
            transit_schema(&directory).dataset_key,
            fatality_schema(&directory).dataset_key,
        ];

        for (i, key) in keys.iter().enumerate() {
            for other in &keys[i + 1..] {
                assert_ne!(key, other);
            }
        }
    }

    #[test]
    fn test_dispatch_covers_every_dataset() {
        let directory = directory();
        for kind in DatasetKind::ALL {
            let title = with_dataset!(kind, &directory, |schema| schema.title.clone());
            assert_eq!(title, kind.title());
        }
    }

    #[test]
    fn test_date_bounds_reject_future_dates() {
        let schema = fatality_schema(&directory());
        let crash_date = schema
            .fields
            .iter()
            .find(|field| field.name == "CrashDate")
            .unwrap();
        assert_eq!(crash_date.rules.max_date, Some(today()));
    }
}
