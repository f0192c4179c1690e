//! Type schemas and options loaded from TOON (or JSON) documents.
//!
//! Type references are textual: `string`, `Order`, `Vec<Line>`, `Map<string, Line>`.
//! All named types are declared before any member is defined, so forward and self
//! references resolve.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::core::automap::AutoMapOptions;
use crate::core::error::{AutoMapError, Result};
use crate::core::registry::TypeRegistry;
use crate::core::types::{ConstructorInfo, ParamInfo, PropertyInfo, TypeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    Class,
    Struct,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default = "readable_by_default")]
    pub readable: bool,
}

fn readable_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorSchema {
    pub params: Vec<ParamSchema>,
    #[serde(default)]
    pub preferred: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSchema {
    pub name: String,
    pub kind: SchemaKind,
    #[serde(default)]
    pub properties: Vec<PropertySchema>,
    #[serde(default)]
    pub constructors: Vec<ConstructorSchema>,
    #[serde(default)]
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub options: AutoMapOptions,
    pub types: Vec<TypeSchema>,
}

//toon decodes to a json tree first, then into the typed document
fn decode_toon<T: DeserializeOwned>(text: &str) -> Result<T> {
    let tree: serde_json::Value =
        toon_format::decode_default(text).map_err(|e| AutoMapError::Schema(e.to_string()))?;
    serde_json::from_value(tree).map_err(|e| AutoMapError::Schema(e.to_string()))
}

impl SchemaDocument {
    pub fn from_toon(text: &str) -> Result<Self> {
        decode_toon(text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| AutoMapError::Schema(e.to_string()))
    }

    pub fn to_toon(&self) -> Result<String> {
        let tree = serde_json::to_value(self).map_err(|e| AutoMapError::Schema(e.to_string()))?;
        toon_format::encode_default(&tree).map_err(|e| AutoMapError::Schema(e.to_string()))
    }

    /// Build a registry with the platform scalars plus every type in the document.
    pub fn build(&self) -> Result<TypeRegistry> {
        let mut registry = TypeRegistry::new();

        let mut ids = Vec::with_capacity(self.types.len());
        for t in &self.types {
            let id = match t.kind {
                SchemaKind::Class => registry.declare_class(&t.name)?,
                SchemaKind::Struct => registry.declare_struct(&t.name)?,
                SchemaKind::Enum => registry.declare_enum(&t.name, t.variants.iter().cloned())?,
            };
            ids.push(id);
        }

        for (t, &owner) in self.types.iter().zip(&ids) {
            for p in &t.properties {
                let ty = resolve_type_ref(&mut registry, &p.ty)?;
                let property = PropertyInfo { name: p.name.clone(), ty, readable: p.readable };
                registry.define_property(owner, property)?;
            }
            for c in &t.constructors {
                let mut params = Vec::with_capacity(c.params.len());
                for p in &c.params {
                    let ty = resolve_type_ref(&mut registry, &p.ty)?;
                    params.push(ParamInfo { name: p.name.clone(), ty });
                }
                let ctor = ConstructorInfo { params, preferred: c.preferred };
                registry.define_constructor(owner, ctor)?;
            }
        }

        Ok(registry)
    }
}

impl AutoMapOptions {
    pub fn from_toon(text: &str) -> Result<Self> {
        decode_toon(text)
    }
}

/// Resolve `Name` or `Def<Arg, ...>`; generic instantiations are interned on the way.
pub fn resolve_type_ref(registry: &mut TypeRegistry, text: &str) -> Result<TypeId> {
    let text = text.trim();
    let invalid = || AutoMapError::InvalidTypeReference(text.to_string());

    let Some((definition, rest)) = text.split_once('<') else {
        return registry.lookup(text).map_err(|_| invalid());
    };
    let inner = rest.strip_suffix('>').ok_or_else(invalid)?;
    let definition = definition.trim();
    if definition.is_empty() {
        return Err(invalid());
    }

    let mut args = Vec::new();
    for arg in split_top_level(inner) {
        if arg.trim().is_empty() {
            return Err(invalid());
        }
        args.push(resolve_type_ref(registry, arg)?);
    }
    registry.generic(definition, &args)
}

//split on commas not nested inside <...>
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let (mut depth, mut start) = (0usize, 0usize);
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::automap::CyclePolicy;
    use crate::core::types::{TypeKind, TypePair};

    const EMPLOYEE_JSON: &str = r#"{
        "types": [
            { "name": "CompanyDetailsDto", "kind": "class",
              "properties": [ { "name": "Name", "type": "string" } ] },
            { "name": "CompanyDetails", "kind": "class",
              "properties": [ { "name": "Name", "type": "string" } ] },
            { "name": "EmployeeDto", "kind": "class",
              "properties": [
                { "name": "PositionName", "type": "string" },
                { "name": "CompanyDetailsProp", "type": "CompanyDetailsDto" },
                { "name": "History", "type": "Map<string, Vec<CompanyDetailsDto>>" }
              ] },
            { "name": "Employee", "kind": "class",
              "properties": [
                { "name": "Id", "type": "int" },
                { "name": "PositionName", "type": "string" },
                { "name": "CompanyDetailsProp", "type": "CompanyDetails" }
              ],
              "constructors": [
                { "params": [ { "name": "id", "type": "int" },
                              { "name": "positionName", "type": "string" },
                              { "name": "companyDetailsProp", "type": "CompanyDetails" } ] }
              ] },
            { "name": "Level", "kind": "enum", "variants": ["Junior", "Senior"] }
        ]
    }"#;

    #[test]
    fn builds_registry_from_json() {
        let doc = SchemaDocument::from_json(EMPLOYEE_JSON).unwrap();
        let r = doc.build().unwrap();

        let src = r.lookup("EmployeeDto").unwrap();
        let dst = r.lookup("Employee").unwrap();
        let missing = r.missing_parameters(src, dst).unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "id");

        let history = r.lookup("Map<string, Vec<CompanyDetailsDto>>").unwrap();
        assert!(matches!(r.get(history).unwrap().kind, TypeKind::Generic { .. }));
        assert!(r.is_enum(r.lookup("Level").unwrap()).unwrap());

        let pairs = r.complex_correspondences(TypePair::new(src, dst)).unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn schema_survives_toon_encoding() {
        let doc = SchemaDocument::from_json(EMPLOYEE_JSON).unwrap();
        let text = doc.to_toon().unwrap();
        assert_eq!(SchemaDocument::from_toon(&text).unwrap(), doc);
    }

    #[test]
    fn options_from_toon() {
        let options = AutoMapOptions::from_toon("cycle_policy: skip\nmax_depth: 8\n").unwrap();
        assert_eq!(options, AutoMapOptions { cycle_policy: CyclePolicy::Skip, max_depth: Some(8) });

        let unlimited = AutoMapOptions::from_toon("cycle_policy: fail\n").unwrap();
        assert_eq!(unlimited.max_depth, None);
    }

    #[test]
    fn malformed_type_references_are_rejected() {
        let mut r = TypeRegistry::new();
        for bad in ["Vec<string", "<string>", "Vec<>", "Nope"] {
            let err = resolve_type_ref(&mut r, bad).unwrap_err();
            assert_eq!(err, AutoMapError::InvalidTypeReference(bad.to_string()));
        }
    }

    #[test]
    fn unknown_member_type_fails_build() {
        let doc = SchemaDocument::from_json(
            r#"{ "types": [ { "name": "A", "kind": "class",
                 "properties": [ { "name": "B", "type": "Missing" } ] } ] }"#,
        )
        .unwrap();
        assert_eq!(doc.build().unwrap_err(), AutoMapError::InvalidTypeReference("Missing".into()));
    }
}
