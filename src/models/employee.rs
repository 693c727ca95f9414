use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Hr,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Hr => "hr",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Employee => write!(f, "Employee"),
            Role::Hr => write!(f, "HR"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Employee {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account_no: Option<String>,
    pub role: Role,
    pub salary: i64,
    #[serde(rename = "isVerified", default)]
    pub is_verified: bool,
    #[serde(rename = "makeHR", default)]
    pub make_hr: bool,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Hr).unwrap(), "\"hr\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"employee\"").unwrap();
        assert_eq!(role, Role::Employee);
    }

    #[test]
    fn employee_wire_names_are_pinned() {
        let employee = Employee {
            id: None,
            email: "a@b.com".to_string(),
            name: "A".to_string(),
            designation: None,
            photo: None,
            bank_account_no: None,
            role: Role::Employee,
            salary: 1000,
            is_verified: false,
            make_hr: false,
            timestamp: 0,
        };
        let value = serde_json::to_value(&employee).unwrap();
        assert!(value.get("isVerified").is_some());
        assert!(value.get("makeHR").is_some());
        assert!(value.get("_id").is_none());
    }
}
