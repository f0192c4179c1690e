// fluent wrapper over a registered map
use crate::core::automap::{AutoMap, AutoMapOptions, auto_map};
use crate::core::ctor::{MemberSelector, bind_ctor_parameter};
use crate::core::defaults::{apply_defaults, apply_defaults_tree};
use crate::core::error::Result;
use crate::core::registry::TypeRegistry;
use crate::core::tree::MappingTree;
use crate::core::types::{TypeId, TypePair};
use crate::mapping::host::{CtorParamExpression, MapHandle, MappingHost};
use crate::mapping::value::Value;

/// A map under construction, for chaining constructor configuration.
///
/// Holds the auto-generated tree when it came from [`MappingExpression::auto_map`], so
/// defaults can cascade through every nested map.
pub struct MappingExpression<'a, H: MappingHost + ?Sized> {
    host: &'a mut H,
    registry: &'a TypeRegistry,
    handle: MapHandle,
    pair: TypePair,
    tree: Option<MappingTree>,
}

impl<'a, H: MappingHost + ?Sized> MappingExpression<'a, H> {
    /// Plain map, nothing nested is registered.
    pub fn create_map(
        host: &'a mut H,
        registry: &'a TypeRegistry,
        source: TypeId,
        destination: TypeId,
    ) -> Result<Self> {
        registry.get(source)?;
        registry.get(destination)?;
        let pair = TypePair::new(source, destination);
        let handle = host.create_map(pair);
        Ok(Self { host, registry, handle, pair, tree: None })
    }

    pub fn auto_map(
        host: &'a mut H,
        registry: &'a TypeRegistry,
        source: TypeId,
        destination: TypeId,
        options: &AutoMapOptions,
    ) -> Result<Self> {
        let AutoMap { handle, tree } = auto_map(host, registry, source, destination, options)?;
        let pair = TypePair::new(source, destination);
        Ok(Self { host, registry, handle, pair, tree: Some(tree) })
    }

    pub fn handle(&self) -> MapHandle {
        self.handle
    }

    pub fn pair(&self) -> TypePair {
        self.pair
    }

    pub fn tree(&self) -> Option<&MappingTree> {
        self.tree.as_ref()
    }

    pub fn into_tree(self) -> Option<MappingTree> {
        self.tree
    }

    pub fn ctor_map_parameter<F>(
        self,
        selector: impl Into<MemberSelector>,
        configure: F,
    ) -> Result<Self>
    where
        F: FnMut(&mut CtorParamExpression),
    {
        let selector = selector.into();
        let destination = self.pair.destination;
        bind_ctor_parameter(
            &mut *self.host,
            self.registry,
            self.handle,
            destination,
            &selector,
            configure,
        )?;
        Ok(self)
    }

    pub fn ctor_map_parameter_value(
        self,
        selector: impl Into<MemberSelector>,
        value: Value,
    ) -> Result<Self> {
        self.ctor_map_parameter(selector, move |e| e.map_from_value(value.clone()))
    }

    /// Default every unmatched constructor parameter; through the whole tree for auto maps.
    pub fn ctor_pass_defaults_for_missing_parameters(self) -> Result<Self> {
        match &self.tree {
            Some(tree) => apply_defaults_tree(&mut *self.host, self.registry, tree)?,
            None => {
                apply_defaults(&mut *self.host, self.registry, self.handle, self.pair)?;
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AutoMapError;
    use crate::core::types::{ConstructorInfo, ScalarKind};
    use crate::mapping::config::MapperConfiguration;

    fn position(r: &mut TypeRegistry) -> (TypeId, TypeId) {
        let int = r.scalar(ScalarKind::Int);
        let string = r.scalar(ScalarKind::String);
        let src = r.declare_class("PositionDto").unwrap();
        r.define_properties(src, [("Name", string)]).unwrap();
        let dst = r.declare_class("Position").unwrap();
        r.define_properties(dst, [("Id", int), ("Name", string), ("Grade", int)]).unwrap();
        let ctor = ConstructorInfo::new([("id", int), ("name", string), ("grade", int)]);
        r.define_constructor(dst, ctor).unwrap();
        (src, dst)
    }

    #[test]
    fn fixed_value_then_defaults_for_the_rest() {
        let mut r = TypeRegistry::new();
        let (src, dst) = position(&mut r);
        let mut cfg = MapperConfiguration::new();

        let handle = MappingExpression::create_map(&mut cfg, &r, src, dst)
            .unwrap()
            .ctor_map_parameter_value("d => d.Grade", Value::Int(7))
            .unwrap()
            .handle();
        let map = cfg.type_map_by_handle(handle).unwrap();
        assert_eq!(map.ctor_param("grade").unwrap().resolve(&Value::Null), Value::Int(7));

        //a later defaults pass overrides the fixed grade
        MappingExpression::create_map(&mut cfg, &r, src, dst)
            .unwrap()
            .ctor_pass_defaults_for_missing_parameters()
            .unwrap();
        let map = cfg.type_map_by_handle(handle).unwrap();
        assert_eq!(map.ctor_param("id").unwrap().resolve(&Value::Null), Value::Int(0));
        assert_eq!(map.ctor_param("grade").unwrap().resolve(&Value::Null), Value::Int(0));
        assert!(map.ctor_param("name").is_none());
    }

    #[test]
    fn selector_errors_propagate() {
        let mut r = TypeRegistry::new();
        let (src, dst) = position(&mut r);
        let mut cfg = MapperConfiguration::new();

        let err = MappingExpression::create_map(&mut cfg, &r, src, dst)
            .unwrap()
            .ctor_map_parameter_value("d => d.Rank", Value::Int(1))
            .err()
            .unwrap();
        assert_eq!(err, AutoMapError::ParameterNotFound("Rank".into()));
    }

    #[test]
    fn auto_map_keeps_tree() {
        let mut r = TypeRegistry::new();
        let (src, dst) = position(&mut r);
        let mut cfg = MapperConfiguration::new();

        let options = AutoMapOptions::default();
        let expr = MappingExpression::auto_map(&mut cfg, &r, src, dst, &options).unwrap();
        assert_eq!(expr.tree().map(MappingTree::len), Some(1));
        assert_eq!(expr.pair(), TypePair::new(src, dst));
    }
}
