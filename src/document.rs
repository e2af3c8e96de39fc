//! Schema-less documents and partial updates.
//!
//! A [`Patch`] maps field paths to values. Dotted paths (`address.city`) reach into
//! nested objects and create missing intermediate objects, the way a document store's
//! `$set` does. Every other key replaces the whole value.

use crate::error::AppError;
use crate::model::{check_address, check_age, check_name, check_text};
use serde_json::{Map, Value};
use std::str::FromStr;

/// One stored record.
pub type Document = Map<String, Value>;

/// Which patch keys are accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PatchPolicy {
    /// Only student fields, type-checked like create.
    #[default]
    Strict,
    /// Any key, passed through untouched.
    Permissive,
}

impl FromStr for PatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(PatchPolicy::Strict),
            "permissive" => Ok(PatchPolicy::Permissive),
            other => Err(format!("expected 'strict' or 'permissive', got '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch(Map<String, Value>);

impl Patch {
    /// Builds a patch from a request body and checks its keys against `policy`.
    pub fn parse(body: Value, policy: PatchPolicy) -> Result<Self, AppError> {
        let fields = match body {
            Value::Object(m) => m,
            _ => return Err(AppError::validation("update body must be a JSON object")),
        };
        let patch = Patch(fields);
        patch.check(policy)?;
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    fn check(&self, policy: PatchPolicy) -> Result<(), AppError> {
        for (path, value) in &self.0 {
            check_path_syntax(path)?;
            if path == "id" || path.starts_with("id.") {
                return Err(AppError::field(path.as_str(), "id cannot be changed"));
            }
            if policy == PatchPolicy::Strict {
                check_allowed(path, value)?;
            }
        }
        self.check_conflicts()
    }

    /// `address` and `address.city` in one patch would overwrite each other.
    fn check_conflicts(&self) -> Result<(), AppError> {
        for child in self.0.keys() {
            let dots = child.match_indices('.').map(|(i, _)| i);
            for end in dots {
                let parent = &child[..end];
                if self.0.contains_key(parent) {
                    return Err(AppError::field(
                        child.as_str(),
                        format!("updating {} conflicts with {}", child, parent),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Returns `doc` with the patch applied. `doc` itself is left untouched on error.
    pub fn merged(&self, doc: &Document) -> Result<Document, AppError> {
        let mut out = doc.clone();
        for (path, value) in &self.0 {
            set_path(&mut out, path, value.clone())?;
        }
        Ok(out)
    }
}

fn check_path_syntax(path: &str) -> Result<(), AppError> {
    if path.is_empty() || path.split('.').any(|seg| seg.is_empty()) {
        return Err(AppError::field(path, "field path must not contain empty segments"));
    }
    if path.split('.').any(|seg| seg.starts_with('$')) {
        return Err(AppError::field(path, "field path segments must not start with '$'"));
    }
    Ok(())
}

fn check_allowed(path: &str, value: &Value) -> Result<(), AppError> {
    match path {
        "name" => check_name(path, value).map(drop),
        "age" => check_age(path, value).map(drop),
        "address" => check_address(path, value).map(drop),
        "address.city" | "address.country" => check_text(path, value).map(drop),
        _ => Err(AppError::field(path, format!("{} is not an updatable field", path))),
    }
}

fn set_path(doc: &mut Document, path: &str, value: Value) -> Result<(), AppError> {
    let mut segments: Vec<&str> = path.split('.').collect();
    let last = segments.pop().unwrap_or(path);
    let mut current = doc;
    let mut walked = String::new();
    for seg in segments {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(seg);
        let slot = current
            .entry(seg.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match slot {
            Value::Object(m) => m,
            _ => {
                return Err(AppError::field(
                    path,
                    format!("cannot set {}: {} is not an object", path, walked),
                ))
            }
        };
    }
    current.insert(last.to_string(), value);
    Ok(())
}
