use dotport_core::*;
use pretty_assertions::assert_eq;
use serde_json::json;

// ===== Wire Shapes =====

#[test]
fn test_bridge_round_trip() {
    let wire = json!({
        "Id": 204,
        "StructureNumber": "048-0223",
        "StateId": 48,
        "FacilityCarried": "I-35",
        "FeaturesIntersected": "Brazos River",
        "YearBuilt": 1971,
        "MainStructureType": "Prestressed Concrete",
        "OverallCondition": "Fair",
        "StructurallyDeficient": false,
        "AverageDailyTraffic": 102000.0,
        "AverageDailyTruckTraffic": 8000.0
    });

    let bridge: Bridge = serde_json::from_value(wire.clone()).unwrap();
    assert_eq!(bridge.structure_number, "048-0223");
    assert_eq!(bridge.year_built, Some(1971));

    let back = serde_json::to_value(&bridge).unwrap();
    assert_eq!(back, wire);
}

#[test]
fn test_transit_agency_handles_nulls() {
    let agency: TransitAgency = serde_json::from_value(json!({
        "Id": 9,
        "NtdId": "20008",
        "AgencyName": "MTA New York City Transit",
        "City": "New York",
        "StateId": 36,
        "ReportYear": 2023,
        "OrganizationType": "Heavy Rail",
        "UnlinkedPassengerTrips": 2_400_000_000.0,
        "VehicleRevenueMiles": null,
        "VehiclesOperatedMaxService": 6400.0,
        "TotalOperatingExpenses": null,
        "FareRevenuesEarned": null
    }))
    .unwrap();

    assert_eq!(agency.ntd_id, "20008");
    assert_eq!(agency.vehicle_revenue_miles, None);
    assert_eq!(agency.ridership_label(), "2400.0M");
}

#[test]
fn test_vehicle_fatality_flattens_booleans() {
    let fatality: VehicleFatality = serde_json::from_value(json!({
        "Id": 3301,
        "CaseNumber": "TX-2023-118",
        "CrashDate": "2023-11-02T00:00:00",
        "StateId": 48,
        "NumberOfFatalities": 2,
        "NumberOfVehicles": 3,
        "MannerOfCollision": "Angle",
        "LandUse": "Rural",
        "RoadwayFunctionClass": "Collector",
        "WeatherCondition": "Clear",
        "InvolvesSpeedRelated": true,
        "NumberOfDrunkDrivers": 1
    }))
    .unwrap();

    let values = fatality.to_field_values().unwrap();
    assert_eq!(values["InvolvesSpeedRelated"], FieldValue::Bool(true));
    assert_eq!(values["CaseNumber"], FieldValue::Text("TX-2023-118".into()));
    assert_eq!(values["NumberOfFatalities"], FieldValue::Number(2.0));
}

#[test]
fn test_state_wire_shape() {
    let state: State = serde_json::from_value(json!({
        "Id": 6,
        "Code": "CA",
        "Name": "California",
        "Region": "West"
    }))
    .unwrap();

    assert_eq!(state.code, "CA");
    assert_eq!(state.region.as_deref(), Some("West"));
}

// ===== Display Dates =====

#[test]
fn test_crash_date_renders_short_form() {
    assert_eq!(format_date_value("2023-11-02T00:00:00"), "Nov 2, 2023");
    assert_eq!(format_date_value("2023-11-02"), "Nov 2, 2023");
}
