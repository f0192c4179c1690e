//! Contract of the mapping engine this crate configures.

use std::fmt;
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::tree::NodeIndex;
use crate::core::types::TypePair;
use crate::mapping::value::Value;

/// Fluent handle the host returns for a registered type map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapHandle(pub usize);

/// Configuration object appended to the host's pending type-map list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapConfig {
    pub pair: TypePair,
    pub parent_pair: TypePair,
    pub node: NodeIndex,
}

pub type ResolverFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Where a constructor argument comes from.
#[derive(Clone)]
pub enum ValueSource {
    Constant(Value),
    SourceMember(String),
    Resolver(ResolverFn),
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            ValueSource::SourceMember(m) => f.debug_tuple("SourceMember").field(m).finish(),
            ValueSource::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl ValueSource {
    pub fn resolve(&self, source: &Value) -> Value {
        match self {
            ValueSource::Constant(v) => v.clone(),
            ValueSource::SourceMember(m) => source.member(m).cloned().unwrap_or(Value::Null),
            ValueSource::Resolver(f) => f(source),
        }
    }
}

/// What a constructor-parameter configurator gets to fill in.
#[derive(Debug, Clone, Default)]
pub struct CtorParamExpression {
    source: Option<ValueSource>,
}

impl CtorParamExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map_from_value(&mut self, value: Value) {
        self.source = Some(ValueSource::Constant(value));
    }

    pub fn map_from_member(&mut self, member: impl Into<String>) {
        self.source = Some(ValueSource::SourceMember(member.into()));
    }

    pub fn map_from<F>(&mut self, resolver: F)
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.source = Some(ValueSource::Resolver(Arc::new(resolver)));
    }

    pub fn source(&self) -> Option<&ValueSource> {
        self.source.as_ref()
    }

    pub fn into_source(self) -> Option<ValueSource> {
        self.source
    }
}

/// Host mapping-configuration API.
///
/// Implementations are single-writer: everything here runs once, before the host compiles
/// its configuration.
pub trait MappingHost {
    /// Register a plain map for `pair`.
    fn create_map(&mut self, pair: TypePair) -> MapHandle;

    /// Register a value-resolution rule for one destination constructor parameter.
    fn for_ctor_param(
        &mut self,
        handle: MapHandle,
        parameter: &str,
        configure: &mut dyn FnMut(&mut CtorParamExpression),
    ) -> Result<()>;

    /// Append an auto-generated map to the pending type-map configurations.
    fn register_type_map_config(&mut self, config: TypeMapConfig) -> MapHandle;
}
