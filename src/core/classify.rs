// type classification: opaque / enum / complex
use crate::core::error::Result;
use crate::core::registry::TypeRegistry;
use crate::core::types::{TypeId, TypeKind};

impl TypeRegistry {
    //platform types (scalars, void) are never walked into
    pub fn is_opaque(&self, ty: TypeId) -> Result<bool> {
        Ok(matches!(self.get(ty)?.kind, TypeKind::Opaque(_) | TypeKind::Void))
    }

    pub fn is_enum(&self, ty: TypeId) -> Result<bool> {
        Ok(matches!(self.get(ty)?.kind, TypeKind::Enum { .. }))
    }

    /// Neither opaque nor an enum, so a candidate for nested auto-mapping.
    pub fn is_complex(&self, ty: TypeId) -> Result<bool> {
        Ok(!self.is_opaque(ty)? && !self.is_enum(ty)?)
    }

    pub fn is_generic(&self, ty: TypeId) -> Result<bool> {
        Ok(matches!(self.get(ty)?.kind, TypeKind::Generic { .. }))
    }

    //structs are complex but not classes; the walker does not descend into them
    pub fn is_class(&self, ty: TypeId) -> Result<bool> {
        Ok(matches!(self.get(ty)?.kind, TypeKind::Class))
    }

    /// Value-shaped types default to a zero instance, the rest to null.
    pub fn is_value_type(&self, ty: TypeId) -> Result<bool> {
        Ok(match &self.get(ty)?.kind {
            TypeKind::Opaque(scalar) => scalar.is_value_type(),
            TypeKind::Enum { .. } | TypeKind::Struct => true,
            TypeKind::Void | TypeKind::Class | TypeKind::Generic { .. } => false,
        })
    }
}
