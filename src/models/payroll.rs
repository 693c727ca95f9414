use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Complete,
}

/// One payroll disbursement obligation, unique per
/// (employee_id, month, year). Never deleted in normal flow; transitions
/// from pending to complete exactly once.
#[derive(Serialize, Deserialize, Debug)]
pub struct PaymentRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub employee_id: String,
    #[serde(rename = "employeeName", default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(rename = "employeeEmail", default, skip_serializing_if = "Option::is_none")]
    pub employee_email: Option<String>,
    // Zero-padded two-digit month and four-digit year; normalized before
    // every store access so the composite key has one spelling.
    pub month: String,
    pub year: String,
    #[serde(rename = "payableSalary")]
    pub payable_salary: i64,
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
    pub status: PaymentStatus,
    #[serde(rename = "transactionId", default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&PaymentStatus::Pending).unwrap(), "\"Pending\"");
        assert_eq!(serde_json::to_string(&PaymentStatus::Complete).unwrap(), "\"Complete\"");
    }

    #[test]
    fn pending_request_has_no_transaction_id_field() {
        let request = PaymentRequest {
            id: None,
            employee_id: "E1".to_string(),
            employee_name: None,
            employee_email: None,
            month: "03".to_string(),
            year: "2024".to_string(),
            payable_salary: 1000,
            is_complete: false,
            status: PaymentStatus::Pending,
            transaction_id: None,
            timestamp: 0,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["payableSalary"], 1000);
        assert_eq!(value["isComplete"], false);
        assert!(value.get("transactionId").is_none());
    }
}
