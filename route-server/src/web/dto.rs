//! Data transfer objects for web requests and responses.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::UserPreferences;
use crate::planner::PlanRequest;
use crate::providers::ProviderStatus;

/// Accepted `travel_date` formats, tried in order.
const TRAVEL_DATE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Request to plan routes.
#[derive(Debug, Deserialize)]
pub struct PlanRoutesRequest {
    /// Origin address
    pub origin: String,

    /// Destination address
    pub destination: String,

    /// Departure as `YYYY-MM-DDTHH:MM` or a bare date (midnight); omitted
    /// means now
    #[serde(default)]
    pub travel_date: Option<String>,

    #[serde(default)]
    pub preferences: Option<UserPreferences>,
}

impl PlanRoutesRequest {
    /// Convert into a planner request, parsing the travel date.
    pub fn into_plan_request(self) -> Result<PlanRequest, String> {
        let mut request = PlanRequest::new(self.origin, self.destination);

        if let Some(raw) = self.travel_date.as_deref().map(str::trim)
            && !raw.is_empty()
        {
            let date = parse_travel_date(raw)
                .ok_or_else(|| format!("Invalid travel_date: {raw} (expected YYYY-MM-DDTHH:MM)"))?;
            request = request.with_travel_date(date);
        }

        if let Some(prefs) = self.preferences {
            request = request.with_preferences(prefs);
        }

        Ok(request)
    }
}

fn parse_travel_date(s: &str) -> Option<NaiveDateTime> {
    TRAVEL_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Operational status counters.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Plans currently cached
    pub cache_entries: u64,

    /// Clients with requests inside the rate-limit window
    pub rate_limited_clients: usize,

    pub providers: Vec<ProviderStatus>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Machine-readable error kind
    pub code: &'static str,
}
