use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Work-log entry. The owning employee is a weak reference by email; firing
/// an employee leaves their logged tasks behind.
#[derive(Serialize, Deserialize, Debug)]
pub struct Task {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "employeeEmail")]
    pub employee_email: String,
    #[serde(rename = "employeeName")]
    pub employee_name: String,
    pub task: String,
    #[serde(rename = "hoursWorked")]
    pub hours_worked: f64,
    // Stored in ISO form, so month/year filters are plain range comparisons.
    pub date: NaiveDate,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_round_trips_as_iso_string() {
        let task = Task {
            id: None,
            employee_email: "a@b.com".to_string(),
            employee_name: "A".to_string(),
            task: "Paperwork".to_string(),
            hours_worked: 4.5,
            date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            timestamp: 0,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["date"], "2024-03-07");
        assert_eq!(value["hoursWorked"], 4.5);
    }
}
