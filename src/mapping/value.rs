// dynamic instances for the reference executor
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::eq_ignore_case;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn member(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(name),
            _ => None,
        }
    }

    pub fn member_ignore_case(&self, name: &str) -> Option<(&str, &Value)> {
        match self {
            Value::Object(fields) => fields
                .iter()
                .find(|(k, _)| eq_ignore_case(k, name))
                .map(|(k, v)| (k.as_str(), v)),
            _ => None,
        }
    }
}
