//! Student and Address records, plus the field checks shared by create and patch.

use crate::document::Document;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub city: String,
    pub country: String,
}

/// A stored student. `id` is server-generated and never changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub address: Address,
}

/// Create payload. A client-supplied `id` is accepted on the wire and dropped.
#[derive(Clone, Debug, PartialEq, ToSchema)]
pub struct NewStudent {
    pub name: String,
    pub age: u32,
    pub address: Address,
}

/// Fields accepted by update under the strict patch policy. Every key is optional;
/// the permissive policy accepts arbitrary keys besides these.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct StudentPatch {
    name: Option<String>,
    age: Option<u32>,
    address: Option<Address>,
    #[schema(rename = "address.city")]
    address_city: Option<String>,
    #[schema(rename = "address.country")]
    address_country: Option<String>,
}

/// List projection: only `name` and `age` are returned.
#[derive(Serialize, ToSchema)]
pub struct StudentSummary {
    pub name: String,
    pub age: u32,
}

impl NewStudent {
    /// Checks the raw body field by field so errors name the offending path.
    pub fn from_value(body: &Value) -> Result<Self, AppError> {
        let obj = body
            .as_object()
            .ok_or_else(|| AppError::validation("student must be a JSON object"))?;
        let name = check_name("name", require(obj, "name", "name")?)?;
        let age = check_age("age", require(obj, "age", "age")?)?;
        let address = check_address("address", require(obj, "address", "address")?)?;
        Ok(NewStudent { name, age, address })
    }
}

impl Student {
    pub fn new(id: String, new: NewStudent) -> Self {
        Student {
            id,
            name: new.name,
            age: new.age,
            address: new.address,
        }
    }

    /// Document form as persisted in the store.
    pub fn to_document(&self) -> Document {
        let mut address = Document::new();
        address.insert("city".into(), Value::String(self.address.city.clone()));
        address.insert("country".into(), Value::String(self.address.country.clone()));

        let mut doc = Document::new();
        doc.insert("id".into(), Value::String(self.id.clone()));
        doc.insert("name".into(), Value::String(self.name.clone()));
        doc.insert("age".into(), Value::from(self.age));
        doc.insert("address".into(), Value::Object(address));
        doc
    }
}

fn require<'a>(obj: &'a Document, key: &str, path: &str) -> Result<&'a Value, AppError> {
    match obj.get(key) {
        Some(Value::Null) | None => Err(AppError::field(path, format!("{} is required", path))),
        Some(v) => Ok(v),
    }
}

pub(crate) fn check_name(path: &str, v: &Value) -> Result<String, AppError> {
    match v.as_str() {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(AppError::field(path, format!("{} must be a non-empty string", path))),
    }
}

pub(crate) fn check_age(path: &str, v: &Value) -> Result<u32, AppError> {
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| AppError::field(path, format!("{} must be a non-negative integer", path)))
}

pub(crate) fn check_text(path: &str, v: &Value) -> Result<String, AppError> {
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::field(path, format!("{} must be a string", path)))
}

pub(crate) fn check_address(path: &str, v: &Value) -> Result<Address, AppError> {
    let obj = v
        .as_object()
        .ok_or_else(|| AppError::field(path, format!("{} must be an object", path)))?;
    let city_path = format!("{}.city", path);
    let country_path = format!("{}.country", path);
    let city = check_text(&city_path, require(obj, "city", &city_path)?)?;
    let country = check_text(&country_path, require(obj, "country", &country_path)?)?;
    Ok(Address { city, country })
}
