use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const REASON_FOR_COMPLIANCE: &str = "Reason For Compliance";
pub const REASON_FOR_NON_COMPLIANCE: &str = "Reason For Non Compliance";

/// An inspected object reported by a check body, with parallel key/value field lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ReportObject {
    pub object_type: String,
    pub object_fields_keys: Vec<String>,
    pub object_fields_values: Vec<String>,
}

impl ReportObject {
    /// New object carrying the (non-)compliance reason as its first field.
    pub fn new(reason: &str, object_type: &str, compliant: bool) -> Self {
        let key = if compliant {
            REASON_FOR_COMPLIANCE
        } else {
            REASON_FOR_NON_COMPLIANCE
        };
        Self {
            object_type: object_type.to_string(),
            ..Self::default()
        }
        .add_field(key, reason)
    }

    pub fn add_field(mut self, key: &str, value: &str) -> Self {
        self.object_fields_keys.push(key.to_string());
        self.object_fields_values.push(value.to_string());
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.object_fields_keys
            .iter()
            .position(|k| k == key)
            .and_then(|i| self.object_fields_values.get(i))
            .map(String::as_str)
    }
}

/// Serialized form of a check's findings, stored as `checkDetails`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ResultObjectsOut {
    pub compliant_objects_out: Vec<ReportObject>,
    pub non_compliant_objects_out: Vec<ReportObject>,
}

impl ResultObjectsOut {
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_object_records_reason_field() {
        let obj = ReportObject::new("runs as root", "Container", false)
            .add_field("Namespace", "tnf")
            .add_field("Pod Name", "web-0");

        assert_eq!(obj.field(REASON_FOR_NON_COMPLIANCE), Some("runs as root"));
        assert_eq!(obj.field("Pod Name"), Some("web-0"));
        assert_eq!(obj.field(REASON_FOR_COMPLIANCE), None);
    }

    #[test]
    fn serializes_with_pascal_case_keys() {
        let out = ResultObjectsOut {
            compliant_objects_out: vec![ReportObject::new("ok", "Pod", true)],
            non_compliant_objects_out: Vec::new(),
        };
        let text = out.to_json_string().expect("serialize");
        assert!(text.starts_with("{\"CompliantObjectsOut\":[{\"ObjectType\":\"Pod\""));
        assert!(text.contains("\"NonCompliantObjectsOut\":[]"));
    }
}
