// default values + constructor-defaults cascade
use std::collections::HashSet;

use tracing::debug;

use crate::core::error::{AutoMapError, Result};
use crate::core::registry::TypeRegistry;
use crate::core::tree::MappingTree;
use crate::core::types::{ParamInfo, ScalarKind, TypeId, TypeKind, TypePair, fold_case};
use crate::mapping::host::{MapHandle, MappingHost};
use crate::mapping::value::Value;

impl TypeRegistry {
    /// Zero instance for value-shaped types, `Value::Null` for everything else.
    pub fn default_for(&self, ty: TypeId) -> Result<Value> {
        self.default_for_inner(ty, &mut Vec::new())
    }

    fn default_for_inner(&self, ty: TypeId, building: &mut Vec<TypeId>) -> Result<Value> {
        let descriptor = self.get(ty)?;
        let value = match &descriptor.kind {
            TypeKind::Opaque(ScalarKind::Bool) => Value::Bool(false),
            TypeKind::Opaque(ScalarKind::Int) => Value::Int(0),
            TypeKind::Opaque(ScalarKind::Float | ScalarKind::Decimal) => Value::Float(0.0),
            TypeKind::Enum { variants } => variants.first().map_or(Value::Int(0), Value::text),
            TypeKind::Struct => {
                //a struct holding itself by value has no zero instance
                if building.contains(&ty) {
                    return Err(AutoMapError::ReflectionResolution(format!(
                        "value type `{}` contains itself",
                        descriptor.name
                    )));
                }
                building.push(ty);
                let mut fields = Vec::with_capacity(descriptor.properties.len());
                for p in &descriptor.properties {
                    fields.push((p.name.clone(), self.default_for_inner(p.ty, building)?));
                }
                building.pop();
                Value::object(fields)
            }
            TypeKind::Opaque(ScalarKind::String | ScalarKind::Uri)
            | TypeKind::Void
            | TypeKind::Class
            | TypeKind::Generic { .. } => Value::Null,
        };
        Ok(value)
    }

    /// Selected constructor parameters of `destination` with no readable source property of
    /// the same name, ignoring case. Constructor order; repeated names only count once.
    pub fn missing_parameters(
        &self,
        source: TypeId,
        destination: TypeId,
    ) -> Result<Vec<ParamInfo>> {
        let Some(ctor) = self.select_constructor(destination)? else {
            return Ok(Vec::new());
        };

        let mut seen: HashSet<String> = self
            .get(source)?
            .properties
            .iter()
            .filter(|p| p.readable)
            .map(|p| fold_case(&p.name))
            .collect();

        Ok(ctor
            .params
            .iter()
            .filter(|p| seen.insert(fold_case(&p.name)))
            .cloned()
            .collect())
    }
}

/// Bind every missing constructor parameter of `pair` to its type's default value.
pub fn apply_defaults<H>(
    host: &mut H,
    registry: &TypeRegistry,
    handle: MapHandle,
    pair: TypePair,
) -> Result<MapHandle>
where
    H: MappingHost + ?Sized,
{
    for param in registry.missing_parameters(pair.source, pair.destination)? {
        let value = registry.default_for(param.ty)?;
        debug!(?pair, parameter = %param.name, ?value, "passing default for missing parameter");
        host.for_ctor_param(handle, &param.name, &mut |e| e.map_from_value(value.clone()))?;
    }
    Ok(handle)
}

/// `apply_defaults` on every node of an auto-generated tree, depth-first from the root.
pub fn apply_defaults_tree<H>(
    host: &mut H,
    registry: &TypeRegistry,
    tree: &MappingTree,
) -> Result<()>
where
    H: MappingHost + ?Sized,
{
    for index in tree.depth_first() {
        if let Some(node) = tree.node(index) {
            apply_defaults(host, registry, node.handle, node.pair)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ConstructorInfo, PropertyInfo};
    use crate::mapping::config::MapperConfiguration;

    //{id, positionName, companyDetailsProp} <- {positionName, companyDetailsProp}
    fn employee_pair(r: &mut TypeRegistry) -> TypePair {
        let int = r.scalar(ScalarKind::Int);
        let string = r.scalar(ScalarKind::String);
        let details = r.declare_class("CompanyDetails").unwrap();

        let src = r.declare_class("EmployeeDto").unwrap();
        r.define_properties(src, [("PositionName", string), ("CompanyDetailsProp", details)])
            .unwrap();

        let dst = r.declare_class("Employee").unwrap();
        r.define_properties(
            dst,
            [("Id", int), ("PositionName", string), ("CompanyDetailsProp", details)],
        )
        .unwrap();
        let ctor = ConstructorInfo::new([
            ("id", int),
            ("positionName", string),
            ("companyDetailsProp", details),
        ]);
        r.define_constructor(dst, ctor).unwrap();
        TypePair::new(src, dst)
    }

    #[test]
    fn defaults_by_shape() {
        let mut r = TypeRegistry::new();
        let status = r.declare_enum("Status", ["Draft", "Sent"]).unwrap();
        let money = r.declare_struct("Money").unwrap();
        let order = r.declare_class("Order").unwrap();
        let (int, string) = (r.scalar(ScalarKind::Int), r.scalar(ScalarKind::String));
        r.define_properties(money, [("Units", int), ("Currency", string)]).unwrap();

        assert_eq!(r.default_for(r.scalar(ScalarKind::Bool)).unwrap(), Value::Bool(false));
        assert_eq!(r.default_for(r.scalar(ScalarKind::Decimal)).unwrap(), Value::Float(0.0));
        assert_eq!(r.default_for(r.scalar(ScalarKind::String)).unwrap(), Value::Null);
        assert_eq!(r.default_for(status).unwrap(), Value::text("Draft"));
        assert_eq!(r.default_for(order).unwrap(), Value::Null);
        assert_eq!(
            r.default_for(money).unwrap(),
            Value::object([("Units", Value::Int(0)), ("Currency", Value::Null)])
        );
    }

    #[test]
    fn self_containing_struct_has_no_default() {
        let mut r = TypeRegistry::new();
        let s = r.declare_struct("Loop").unwrap();
        r.define_property(s, PropertyInfo::new("Inner", s)).unwrap();
        assert!(matches!(r.default_for(s), Err(AutoMapError::ReflectionResolution(_))));
    }

    #[test]
    fn missing_parameters_is_set_difference_ignoring_case() {
        let mut r = TypeRegistry::new();
        let pair = employee_pair(&mut r);

        let missing = r.missing_parameters(pair.source, pair.destination).unwrap();
        let names: Vec<&str> = missing.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id"]);
    }

    #[test]
    fn nothing_missing_when_source_covers_every_parameter() {
        let mut r = TypeRegistry::new();
        let pair = employee_pair(&mut r);
        r.define_property(pair.source, PropertyInfo::new("ID", r.scalar(ScalarKind::Int))).unwrap();

        assert!(r.missing_parameters(pair.source, pair.destination).unwrap().is_empty());
    }

    #[test]
    fn non_ascii_names_match_ignoring_case() {
        let mut r = TypeRegistry::new();
        let int = r.scalar(ScalarKind::Int);
        let src = r.declare_class("Src").unwrap();
        r.define_properties(src, [("éTAT", int)]).unwrap();
        let dst = r.declare_class("Dst").unwrap();
        r.define_properties(dst, [("État", int)]).unwrap();
        r.define_constructor(dst, ConstructorInfo::new([("état", int)])).unwrap();

        assert!(r.missing_parameters(src, dst).unwrap().is_empty());
    }

    #[test]
    fn write_only_source_properties_do_not_count() {
        let mut r = TypeRegistry::new();
        let pair = employee_pair(&mut r);
        r.define_property(pair.source, PropertyInfo::write_only("Id", r.scalar(ScalarKind::Int)))
            .unwrap();

        assert_eq!(r.missing_parameters(pair.source, pair.destination).unwrap().len(), 1);
    }

    #[test]
    fn apply_defaults_binds_zero_values() {
        let mut r = TypeRegistry::new();
        let pair = employee_pair(&mut r);
        let mut cfg = MapperConfiguration::new();
        let h = cfg.create_map(pair);

        apply_defaults(&mut cfg, &r, h, pair).unwrap();

        let map = cfg.type_map(pair).unwrap();
        assert_eq!(map.ctor_params.len(), 1);
        assert_eq!(map.ctor_param("id").unwrap().resolve(&Value::Null), Value::Int(0));
    }
}
