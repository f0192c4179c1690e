//! Reference executor: runs a `MapperConfiguration` over dynamic values.
//!
//! Only as much of a mapping engine as is needed to check that configured maps (constructor
//! rules, nested auto maps) actually produce destination instances.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::trace;

use crate::core::error::AutoMapError;
use crate::core::registry::TypeRegistry;
use crate::core::types::{TypeId, TypeKind, TypePair, eq_ignore_case};
use crate::mapping::config::{MapperConfiguration, TypeMap};
use crate::mapping::value::Value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("missing type map configuration: {source_type} -> {destination_type}")]
    UnmappedPair { source_type: String, destination_type: String },

    #[error("no value for constructor parameter `{parameter}` of {destination_type}")]
    MissingConstructorArgument { destination_type: String, parameter: String },

    #[error("expected {expected} value for {type_name}")]
    ValueShapeMismatch { type_name: String, expected: &'static str },

    #[error(transparent)]
    Configuration(#[from] AutoMapError),
}

pub struct Mapper<'a> {
    registry: &'a TypeRegistry,
    config: &'a MapperConfiguration,
}

impl<'a> Mapper<'a> {
    pub fn new(registry: &'a TypeRegistry, config: &'a MapperConfiguration) -> Self {
        Self { registry, config }
    }

    pub fn map(
        &self,
        value: &Value,
        source: TypeId,
        destination: TypeId,
    ) -> Result<Value, MapError> {
        self.map_value(value, TypePair::new(source, destination))
    }

    fn map_value(&self, value: &Value, pair: TypePair) -> Result<Value, MapError> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        let destination = self.registry.get(pair.destination)?;
        match &destination.kind {
            TypeKind::Void => Ok(Value::Null),
            TypeKind::Opaque(_) | TypeKind::Enum { .. } => Ok(value.clone()),
            TypeKind::Generic { args: d_args, .. } => {
                let s_args = self.registry.get(pair.source)?.generic_args().unwrap_or_default();
                if s_args.len() != d_args.len() {
                    return Ok(value.clone());
                }
                self.map_container(value, s_args, d_args, &destination.name)
            }
            TypeKind::Class | TypeKind::Struct => {
                if pair.is_identity() {
                    return Ok(value.clone());
                }
                let map = self.config.type_map(pair).ok_or_else(|| MapError::UnmappedPair {
                    source_type: self.type_name(pair.source),
                    destination_type: destination.name.clone(),
                })?;
                self.construct(value, pair, map)
            }
        }
    }

    //one argument: list elements; two arguments: object values keyed by string
    fn map_container(
        &self,
        value: &Value,
        s_args: &[TypeId],
        d_args: &[TypeId],
        name: &str,
    ) -> Result<Value, MapError> {
        let mismatch = |expected: &'static str| MapError::ValueShapeMismatch {
            type_name: name.to_string(),
            expected,
        };
        match (value, s_args, d_args) {
            (Value::List(items), [s], [d]) => {
                let pair = TypePair::new(*s, *d);
                let mapped = items
                    .iter()
                    .map(|v| self.map_value(v, pair))
                    .collect::<Result<_, _>>()?;
                Ok(Value::List(mapped))
            }
            (Value::Object(entries), [_, s], [_, d]) => {
                let pair = TypePair::new(*s, *d);
                let mut mapped = BTreeMap::new();
                for (k, v) in entries {
                    mapped.insert(k.clone(), self.map_value(v, pair)?);
                }
                Ok(Value::Object(mapped))
            }
            (_, [_], [_]) => Err(mismatch("list")),
            (_, [_, _], [_, _]) => Err(mismatch("object")),
            _ => Ok(value.clone()),
        }
    }

    fn construct(&self, value: &Value, pair: TypePair, map: &TypeMap) -> Result<Value, MapError> {
        let source = self.registry.get(pair.source)?;
        let destination = self.registry.get(pair.destination)?;
        if !matches!(value, Value::Object(_)) {
            return Err(MapError::ValueShapeMismatch {
                type_name: source.name.clone(),
                expected: "object",
            });
        }

        let mut fields = BTreeMap::new();

        //constructor arguments: explicit rule, then same-named source property ignoring case
        if let Some(ctor) = self.registry.select_constructor(pair.destination)? {
            for param in &ctor.params {
                let arg = if let Some(rule) = map.ctor_param(&param.name) {
                    rule.resolve(value)
                } else if let Some(sp) = source
                    .properties
                    .iter()
                    .find(|p| p.readable && eq_ignore_case(&p.name, &param.name))
                {
                    let member = value.member(&sp.name).unwrap_or(&Value::Null);
                    self.map_value(member, TypePair::new(sp.ty, param.ty))?
                } else {
                    return Err(MapError::MissingConstructorArgument {
                        destination_type: destination.name.clone(),
                        parameter: param.name.clone(),
                    });
                };

                let target = destination
                    .properties
                    .iter()
                    .find(|p| eq_ignore_case(&p.name, &param.name));
                if let Some(dp) = target {
                    fields.insert(dp.name.clone(), arg);
                }
            }
        }

        //remaining properties: exact-name copy, else the type's default
        for dp in &destination.properties {
            if fields.contains_key(&dp.name) {
                continue;
            }
            let copied = match source.properties.iter().find(|p| p.readable && p.name == dp.name) {
                Some(sp) => {
                    let member = value.member(&sp.name).unwrap_or(&Value::Null);
                    self.map_value(member, TypePair::new(sp.ty, dp.ty))?
                }
                None => {
                    trace!(
                        destination = %destination.name,
                        property = %dp.name,
                        "no source member, defaulted"
                    );
                    self.registry.default_for(dp.ty)?
                }
            };
            fields.insert(dp.name.clone(), copied);
        }

        Ok(Value::Object(fields))
    }

    fn type_name(&self, id: TypeId) -> String {
        self.registry.name(id).map_or_else(|_| format!("#{id}"), str::to_string)
    }
}
