use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouletteSpinRequest {
    pub ticket_cost: u32,
}

impl Default for RouletteSpinRequest {
    fn default() -> Self {
        RouletteSpinRequest { ticket_cost: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouletteResult {
    pub points: i64,
    pub tickets_used: u32,
    pub remaining_tickets: u32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyTickets {
    pub tickets: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyPoint {
    pub point: i64,
}

/// Points are sent as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTransferRequest {
    pub account: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTransferResult {
    /// Remaining account balance as reported by the bank.
    pub result: String,
}
