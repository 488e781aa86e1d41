use serde::Deserialize;

/// One row of the airport's departure board, as returned by the FIDS endpoint.
///
/// Only the airline and flight number are required; the remaining fields
/// are shown on the confirmation panel when present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Departure {
    /// IATA carrier code, e.g. `CI`.
    #[serde(rename = "AirlineID")]
    pub airline_id: String,
    /// Flight number without the carrier prefix, e.g. `123`.
    pub flight_number: String,
    #[serde(default)]
    pub schedule_departure_time: Option<String>,
    #[serde(rename = "ArrivalAirportID", default)]
    pub arrival_airport_id: Option<String>,
    #[serde(default)]
    pub terminal: Option<String>,
    #[serde(default)]
    pub gate: Option<String>,
    #[serde(default)]
    pub departure_remark: Option<String>,
}

impl Departure {
    /// Carrier code and flight number joined without a separator (`CI` + `123` = `CI123`).
    pub fn flight_code(&self) -> String {
        format!("{}{}", self.airline_id, self.flight_number)
    }

    /// Returns `true` if this departure is the given flight.
    ///
    /// Exact, case-sensitive comparison; the submitted string is not normalised.
    pub fn is_flight(&self, flight: &str) -> bool {
        flight
            .strip_prefix(self.airline_id.as_str())
            .is_some_and(|rest| rest == self.flight_number)
    }
}

/// Returns the first departure whose flight code equals `flight`.
pub fn find_departure<'a>(departures: &'a [Departure], flight: &str) -> Option<&'a Departure> {
    departures.iter().find(|d| d.is_flight(flight))
}

/// Returns `true` if any departure's flight code equals `flight`.
pub fn flight_exists(departures: &[Departure], flight: &str) -> bool {
    find_departure(departures, flight).is_some()
}
