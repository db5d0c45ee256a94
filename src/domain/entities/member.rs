use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MemberId(pub String);

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        MemberId(value.to_string())
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        MemberId(value)
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Missing,
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    /// Arrays and nested documents, kept as rendered text with their element count.
    Collection { text: String, len: usize },
    Other(String),
}

impl FieldValue {
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Missing | FieldValue::Null => false,
            FieldValue::Text(value) => !value.is_empty(),
            FieldValue::Integer(value) => *value != 0,
            FieldValue::Float(value) => *value != 0.0,
            FieldValue::Bool(value) => *value,
            FieldValue::Timestamp(_) => true,
            FieldValue::Collection { len, .. } => *len > 0,
            FieldValue::Other(value) => !value.is_empty(),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Missing | FieldValue::Null => String::new(),
            FieldValue::Text(value)
            | FieldValue::Collection { text: value, .. }
            | FieldValue::Other(value) => value.clone(),
            FieldValue::Integer(value) => value.to_string(),
            FieldValue::Float(value) => format_float(*value),
            FieldValue::Bool(value) => value.to_string(),
            FieldValue::Timestamp(value) => value.to_rfc3339(),
        }
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberRecord {
    pub id: MemberId,
    pub name: FieldValue,
    pub street: FieldValue,
    pub date_of_birth: FieldValue,
    pub blood_group: FieldValue,
    pub whatsapp_number: FieldValue,
    pub plan: FieldValue,
    pub photo: FieldValue,
    pub fees: FieldValue,
    pub is_paid: FieldValue,
    pub created_at: FieldValue,
    pub last_payment: FieldValue,
    pub updated_at: FieldValue,
}

impl MemberRecord {
    #[cfg(test)]
    pub fn new(id: impl Into<MemberId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Monthly,
    Quarterly,
    Yearly,
}

impl Plan {
    pub const CHOICES: [&'static str; 3] = ["monthly", "3month", "yearly"];

    pub fn parse(raw: &str) -> Option<Plan> {
        match raw.trim().to_lowercase().as_str() {
            "monthly" => Some(Plan::Monthly),
            "3month" | "3-month" => Some(Plan::Quarterly),
            "yearly" => Some(Plan::Yearly),
            _ => None,
        }
    }

    pub fn months(self) -> u32 {
        match self {
            Plan::Monthly => 1,
            Plan::Quarterly => 3,
            Plan::Yearly => 12,
        }
    }
}
