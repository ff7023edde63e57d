use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub empty_rooms: usize,
    pub total_tenants: usize,
    // None when the session may not see payments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unpaid_rooms: Option<Vec<UnpaidRoom>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnpaidRoom {
    pub room_index: usize,
    pub room_number: String,
    pub tenants: Vec<String>,
}
