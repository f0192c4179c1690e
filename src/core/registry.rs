// type arena + name index
use std::collections::HashMap;

use crate::core::error::{AutoMapError, Result};
use crate::core::types::{
    ConstructorInfo, PropertyInfo, ScalarKind, TypeDescriptor, TypeId, TypeKind, VOID,
};

const SCALARS: [ScalarKind; 6] = [
    ScalarKind::Bool,
    ScalarKind::Int,
    ScalarKind::Float,
    ScalarKind::Decimal,
    ScalarKind::String,
    ScalarKind::Uri,
];

/// Owns every type descriptor the walker and the cascader may look at.
///
/// Ids are dense indices handed out in declaration order and never reused. Classes can be
/// declared before their members are defined so that self-referential and mutually
/// referential graphs can be described.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
    by_name: HashMap<String, TypeId>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// A registry holding `void` (id 0) and the platform scalars.
    pub fn new() -> Self {
        let mut registry = Self { types: Vec::new(), by_name: HashMap::new() };
        registry.insert(TypeDescriptor::new("void", TypeKind::Void));
        for scalar in SCALARS {
            registry.insert(TypeDescriptor::new(scalar.type_name(), TypeKind::Opaque(scalar)));
        }
        debug_assert_eq!(registry.by_name.get("void"), Some(&VOID));
        registry
    }

    fn insert(&mut self, descriptor: TypeDescriptor) -> TypeId {
        let id = self.types.len() as TypeId;
        self.by_name.insert(descriptor.name.clone(), id);
        self.types.push(descriptor);
        id
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, id: TypeId) -> Result<&TypeDescriptor> {
        self.types
            .get(id as usize)
            .ok_or_else(|| AutoMapError::unknown_type(id))
    }

    fn get_mut(&mut self, id: TypeId) -> Result<&mut TypeDescriptor> {
        self.types
            .get_mut(id as usize)
            .ok_or_else(|| AutoMapError::unknown_type(id))
    }

    pub fn lookup(&self, name: &str) -> Result<TypeId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AutoMapError::ReflectionResolution(format!("no type named `{name}`")))
    }

    pub fn name(&self, id: TypeId) -> Result<&str> {
        Ok(self.get(id)?.name.as_str())
    }

    pub fn scalar(&self, kind: ScalarKind) -> TypeId {
        //scalars are seeded right after void, in SCALARS order
        SCALARS.iter().position(|&s| s == kind).map_or(VOID, |i| i as TypeId + 1)
    }

    pub fn declare(&mut self, name: impl Into<String>, kind: TypeKind) -> Result<TypeId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(AutoMapError::DuplicateType(name));
        }
        if let TypeKind::Generic { args, .. } = &kind {
            for &arg in args {
                self.get(arg)?;
            }
        }
        Ok(self.insert(TypeDescriptor::new(name, kind)))
    }

    pub fn declare_class(&mut self, name: impl Into<String>) -> Result<TypeId> {
        self.declare(name, TypeKind::Class)
    }

    pub fn declare_struct(&mut self, name: impl Into<String>) -> Result<TypeId> {
        self.declare(name, TypeKind::Struct)
    }

    pub fn declare_enum<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        variants: impl IntoIterator<Item = S>,
    ) -> Result<TypeId> {
        let variants = variants.into_iter().map(Into::into).collect();
        self.declare(name, TypeKind::Enum { variants })
    }

    /// Interned closed generic, named `definition<arg, ...>`.
    pub fn generic(&mut self, definition: &str, args: &[TypeId]) -> Result<TypeId> {
        let mut arg_names = Vec::with_capacity(args.len());
        for &arg in args {
            arg_names.push(self.name(arg)?.to_string());
        }
        let name = format!("{definition}<{}>", arg_names.join(", "));
        if let Some(&id) = self.by_name.get(&name) {
            return Ok(id);
        }
        self.declare(
            name,
            TypeKind::Generic { definition: definition.to_string(), args: args.to_vec() },
        )
    }

    pub fn define_property(&mut self, owner: TypeId, property: PropertyInfo) -> Result<()> {
        self.get(property.ty)?;
        self.get_mut(owner)?.properties.push(property);
        Ok(())
    }

    pub fn define_properties(
        &mut self,
        owner: TypeId,
        properties: impl IntoIterator<Item = (&'static str, TypeId)>,
    ) -> Result<()> {
        for (name, ty) in properties {
            self.define_property(owner, PropertyInfo::new(name, ty))?;
        }
        Ok(())
    }

    pub fn define_constructor(&mut self, owner: TypeId, ctor: ConstructorInfo) -> Result<()> {
        for p in &ctor.params {
            self.get(p.ty)?;
        }
        self.get_mut(owner)?.constructors.push(ctor);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> + '_ {
        self.types.iter().enumerate().map(|(i, t)| (i as TypeId, t))
    }
}
