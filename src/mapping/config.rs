// in-memory host: registration list + per-map constructor rules
use std::collections::HashMap;

use tracing::debug;

use crate::core::error::{AutoMapError, Result};
use crate::core::types::TypePair;
use crate::mapping::host::{CtorParamExpression, MapHandle, MappingHost, TypeMapConfig, ValueSource};

#[derive(Debug, Clone)]
pub struct TypeMap {
    pub pair: TypePair,
    /// Constructor parameter name -> rule, in configuration order.
    /// Re-configuring a name replaces it.
    pub ctor_params: Vec<(String, ValueSource)>,
}

impl TypeMap {
    fn new(pair: TypePair) -> Self {
        Self { pair, ctor_params: Vec::new() }
    }

    pub fn ctor_param(&self, name: &str) -> Option<&ValueSource> {
        self.ctor_params.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }
}

/// Reference `MappingHost`.
///
/// One `TypeMap` per pair; registering a pair twice hands back the first handle. The
/// registration list still records every call, duplicates included.
#[derive(Debug, Clone, Default)]
pub struct MapperConfiguration {
    maps: Vec<TypeMap>,
    by_pair: HashMap<TypePair, MapHandle>,
    type_map_configs: Vec<TypeMapConfig>,
}

impl MapperConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    fn map_for(&mut self, pair: TypePair) -> MapHandle {
        if let Some(&handle) = self.by_pair.get(&pair) {
            return handle;
        }
        let handle = MapHandle(self.maps.len());
        self.maps.push(TypeMap::new(pair));
        self.by_pair.insert(pair, handle);
        handle
    }

    pub fn type_map(&self, pair: TypePair) -> Option<&TypeMap> {
        self.by_pair.get(&pair).and_then(|h| self.maps.get(h.0))
    }

    pub fn type_map_by_handle(&self, handle: MapHandle) -> Option<&TypeMap> {
        self.maps.get(handle.0)
    }

    pub fn type_maps(&self) -> &[TypeMap] {
        &self.maps
    }

    pub fn type_map_configs(&self) -> &[TypeMapConfig] {
        &self.type_map_configs
    }
}

impl MappingHost for MapperConfiguration {
    fn create_map(&mut self, pair: TypePair) -> MapHandle {
        self.map_for(pair)
    }

    fn for_ctor_param(
        &mut self,
        handle: MapHandle,
        parameter: &str,
        configure: &mut dyn FnMut(&mut CtorParamExpression),
    ) -> Result<()> {
        let map = self
            .maps
            .get_mut(handle.0)
            .ok_or(AutoMapError::UnknownMapHandle(handle.0))?;

        let mut expression = CtorParamExpression::new();
        configure(&mut expression);
        let Some(source) = expression.into_source() else {
            return Ok(());
        };

        debug!(?handle, parameter, ?source, "constructor parameter rule");
        match map.ctor_params.iter_mut().find(|(n, _)| n == parameter) {
            Some(slot) => slot.1 = source,
            None => map.ctor_params.push((parameter.to_string(), source)),
        }
        Ok(())
    }

    fn register_type_map_config(&mut self, config: TypeMapConfig) -> MapHandle {
        self.type_map_configs.push(config);
        self.map_for(config.pair)
    }
}
