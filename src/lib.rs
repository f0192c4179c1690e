//! Auto-configuration for an object-to-object mapper.
//!
//! Walks a pair of runtime type descriptors, registers a mapping for every nested complex
//! property pair it discovers and fills unmatched destination constructor parameters with
//! default values.

pub mod core;
pub mod mapping;

pub use crate::core::automap::{AutoMap, AutoMapOptions, CyclePolicy, auto_map};
pub use crate::core::ctor::MemberSelector;
pub use crate::core::error::{AutoMapError, Result};
pub use crate::core::expression::MappingExpression;
pub use crate::core::registry::TypeRegistry;
pub use crate::core::tree::{MappingNode, MappingTree, NodeIndex};
pub use crate::core::types::{TypeId, TypeKind, TypePair};
pub use crate::mapping::config::MapperConfiguration;
pub use crate::mapping::execute::{MapError, Mapper};
pub use crate::mapping::host::{CtorParamExpression, MapHandle, MappingHost, TypeMapConfig};
pub use crate::mapping::value::Value;
