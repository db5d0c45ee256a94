use async_trait::async_trait;
use chrono::DateTime;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection, Cursor};
use tracing::info;

use crate::domain::entities::member::{FieldValue, MemberId, MemberRecord};
use crate::usecase::ports::source::{MemberCursor, MemberSource, SourceError};

pub struct MongoMemberSource {
    collection: Collection<Document>,
}

impl MongoMemberSource {
    pub async fn connect(uri: &str, db_name: &str, collection: &str) -> Result<Self, SourceError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|err| SourceError::Connect(err.to_string()))?;
        info!(db = db_name, collection, "connected to member store");
        Ok(Self {
            collection: client.database(db_name).collection(collection),
        })
    }
}

#[async_trait]
impl MemberSource for MongoMemberSource {
    async fn scan<'a>(&'a self) -> Result<Box<dyn MemberCursor + 'a>, SourceError> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|err| SourceError::Query(err.to_string()))?;
        Ok(Box::new(MongoMemberCursor { cursor }))
    }
}

struct MongoMemberCursor {
    cursor: Cursor<Document>,
}

#[async_trait]
impl MemberCursor for MongoMemberCursor {
    async fn next_record(&mut self) -> Result<Option<MemberRecord>, SourceError> {
        let has_next = self
            .cursor
            .advance()
            .await
            .map_err(|err| SourceError::Query(err.to_string()))?;
        if !has_next {
            return Ok(None);
        }
        let document = self
            .cursor
            .deserialize_current()
            .map_err(|err| SourceError::Query(err.to_string()))?;
        member_from_document(&document).map(Some)
    }
}

pub fn member_from_document(document: &Document) -> Result<MemberRecord, SourceError> {
    let id = document.get("_id").and_then(id_to_string).ok_or(SourceError::MissingId)?;
    let field = |key: &str| document.get(key).map(field_value).unwrap_or_default();

    Ok(MemberRecord {
        id: MemberId(id),
        name: field("name"),
        street: field("street"),
        date_of_birth: field("dateOfBirth"),
        blood_group: field("bloodGroup"),
        whatsapp_number: field("whatsappNumber"),
        plan: field("plan"),
        photo: field("photo"),
        fees: field("fees"),
        is_paid: field("isPaid"),
        created_at: field("createdAt"),
        last_payment: field("lastPayment"),
        updated_at: field("updatedAt"),
    })
}

fn id_to_string(value: &Bson) -> Option<String> {
    match value {
        Bson::ObjectId(oid) => Some(oid.to_hex()),
        Bson::String(s) => Some(s.clone()),
        Bson::Int32(n) => Some(n.to_string()),
        Bson::Int64(n) => Some(n.to_string()),
        Bson::Null | Bson::Undefined => None,
        other => Some(other.to_string()),
    }
}

pub fn field_value(value: &Bson) -> FieldValue {
    match value {
        Bson::Null | Bson::Undefined => FieldValue::Null,
        Bson::String(s) => FieldValue::Text(s.clone()),
        Bson::Int32(n) => FieldValue::Integer(i64::from(*n)),
        Bson::Int64(n) => FieldValue::Integer(*n),
        Bson::Double(n) => FieldValue::Float(*n),
        Bson::Boolean(b) => FieldValue::Bool(*b),
        Bson::DateTime(dt) => DateTime::from_timestamp_millis(dt.timestamp_millis())
            .map(FieldValue::Timestamp)
            .unwrap_or_else(|| FieldValue::Other(dt.to_string())),
        Bson::ObjectId(oid) => FieldValue::Text(oid.to_hex()),
        Bson::Array(items) => FieldValue::Collection {
            text: value.to_string(),
            len: items.len(),
        },
        Bson::Document(fields) => FieldValue::Collection {
            text: value.to_string(),
            len: fields.len(),
        },
        other => FieldValue::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn object_ids_become_hex_strings() {
        let oid = ObjectId::parse_str("65a4f0c2e13b7a0012345678").expect("valid object id");
        let document = doc! { "_id": oid, "name": "Ravi" };

        let record = member_from_document(&document).expect("document should convert");

        assert_eq!(record.id, MemberId::from("65a4f0c2e13b7a0012345678"));
        assert_eq!(record.name, FieldValue::Text("Ravi".to_string()));
    }

    #[test]
    fn missing_id_is_rejected() {
        let document = doc! { "name": "No Id" };

        assert!(matches!(
            member_from_document(&document),
            Err(SourceError::MissingId)
        ));
    }

    #[test]
    fn bson_dates_become_timestamps() {
        let paid = Utc
            .with_ymd_and_hms(2024, 1, 15, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let document = doc! {
            "_id": "abc123",
            "lastPayment": mongodb::bson::DateTime::from_millis(paid.timestamp_millis()),
            "plan": "Monthly",
        };

        let record = member_from_document(&document).expect("document should convert");

        assert_eq!(record.last_payment, FieldValue::Timestamp(paid));
        assert_eq!(record.plan, FieldValue::Text("Monthly".to_string()));
    }

    #[test]
    fn scalar_types_are_preserved() {
        let document = doc! {
            "_id": 42_i32,
            "whatsappNumber": 919876543210_i64,
            "fees": 499.5,
            "isPaid": true,
            "photo": Bson::Null,
        };

        let record = member_from_document(&document).expect("document should convert");

        assert_eq!(record.id, MemberId::from("42"));
        assert_eq!(record.whatsapp_number, FieldValue::Integer(919876543210));
        assert_eq!(record.fees, FieldValue::Float(499.5));
        assert_eq!(record.is_paid, FieldValue::Bool(true));
        assert_eq!(record.photo, FieldValue::Null);
        assert_eq!(record.street, FieldValue::Missing);
    }

    #[test]
    fn empty_collections_read_as_unpaid() {
        let document = doc! { "_id": "c1", "isPaid": [], "photo": {} };

        let record = member_from_document(&document).expect("document should convert");

        assert!(!record.is_paid.is_truthy());
        assert!(!record.photo.is_truthy());
        assert!(matches!(record.is_paid, FieldValue::Collection { len: 0, .. }));
    }
}
