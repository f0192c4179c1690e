// type-graph walker: which nested pairs of a pair need their own map
use tracing::trace;

use crate::core::error::{AutoMapError, Result};
use crate::core::registry::TypeRegistry;
use crate::core::types::{TypeId, TypePair};

impl TypeRegistry {
    /// Child pairs of `pair`, in source property order.
    ///
    /// For every complex source property with a complex destination property of exactly the
    /// same name:
    /// 1) both generic => pair their type arguments positionally, keeping the positions where
    ///    neither side is opaque or an enum. Differing argument counts are fatal.
    /// 2) both classes => pair the property types themselves.
    /// 3) anything else is left to the host engine.
    ///
    /// A pair that is generic on both sides (an argument pair of an outer container, such as
    /// `(Vec<A>, Vec<B>)` inside `Vec<Vec<_>>`) is walked through its own arguments instead.
    pub fn complex_correspondences(&self, pair: TypePair) -> Result<Vec<TypePair>> {
        let source = self.get(pair.source)?;
        let destination = self.get(pair.destination)?;
        let mut out = Vec::new();

        if self.is_generic(pair.source)? && self.is_generic(pair.destination)? {
            self.pair_generic_arguments(pair.source, pair.destination, &mut out)?;
            return Ok(out);
        }

        for sp in &source.properties {
            if !self.is_complex(sp.ty)? {
                continue;
            }

            let Some(dp) = self.matching_complex_property(pair.destination, &sp.name)? else {
                trace!(
                    source = %source.name,
                    destination = %destination.name,
                    property = %sp.name,
                    "no complex counterpart, skipped"
                );
                continue;
            };

            if self.is_generic(sp.ty)? && self.is_generic(dp)? {
                self.pair_generic_arguments(sp.ty, dp, &mut out)?;
            } else if self.is_class(sp.ty)? && self.is_class(dp)? {
                out.push(TypePair::new(sp.ty, dp));
            } else {
                trace!(property = %sp.name, "complex shapes differ, skipped");
            }
        }

        Ok(out)
    }

    //exact, case-sensitive name match
    fn matching_complex_property(&self, owner: TypeId, name: &str) -> Result<Option<TypeId>> {
        for p in &self.get(owner)?.properties {
            if p.name == name && self.is_complex(p.ty)? {
                return Ok(Some(p.ty));
            }
        }
        Ok(None)
    }

    fn pair_generic_arguments(
        &self,
        source_ty: TypeId,
        destination_ty: TypeId,
        out: &mut Vec<TypePair>,
    ) -> Result<()> {
        let source_args = self.get(source_ty)?.generic_args().unwrap_or_default();
        let destination_args = self.get(destination_ty)?.generic_args().unwrap_or_default();

        if source_args.len() != destination_args.len() {
            return Err(AutoMapError::GenericArityMismatch {
                source_type: self.name(source_ty)?.to_string(),
                source_args: self.names(source_args)?,
                destination_type: self.name(destination_ty)?.to_string(),
                destination_args: self.names(destination_args)?,
            });
        }

        for (&s, &d) in source_args.iter().zip(destination_args) {
            if self.is_complex(s)? && self.is_complex(d)? {
                out.push(TypePair::new(s, d));
            }
        }
        Ok(())
    }

    fn names(&self, ids: &[TypeId]) -> Result<Vec<String>> {
        ids.iter().map(|&id| self.name(id).map(str::to_string)).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::error::AutoMapError;
    use crate::core::registry::TypeRegistry;
    use crate::core::types::{PropertyInfo, ScalarKind, TypePair};

    #[test]
    fn pairs_class_properties_by_exact_name() {
        let mut r = TypeRegistry::new();
        let string = r.scalar(ScalarKind::String);
        let (src, dst) = (r.declare_class("Src").unwrap(), r.declare_class("Dst").unwrap());
        let (sa, da) = (r.declare_class("SrcA").unwrap(), r.declare_class("DstA").unwrap());
        r.define_properties(src, [("Name", string), ("PropA", sa)]).unwrap();
        r.define_properties(dst, [("Name", string), ("PropA", da)]).unwrap();

        let pairs = r.complex_correspondences(TypePair::new(src, dst)).unwrap();
        assert_eq!(pairs, vec![TypePair::new(sa, da)]);
    }

    #[test]
    fn name_match_is_case_sensitive() {
        let mut r = TypeRegistry::new();
        let (src, dst) = (r.declare_class("Src").unwrap(), r.declare_class("Dst").unwrap());
        let (sa, da) = (r.declare_class("SrcA").unwrap(), r.declare_class("DstA").unwrap());
        r.define_properties(src, [("PropA", sa)]).unwrap();
        r.define_properties(dst, [("propa", da)]).unwrap();

        assert!(r.complex_correspondences(TypePair::new(src, dst)).unwrap().is_empty());
    }

    #[test]
    fn generic_arguments_pair_positionally_skipping_opaque() {
        let mut r = TypeRegistry::new();
        let string = r.scalar(ScalarKind::String);
        let (src, dst) = (r.declare_class("Src").unwrap(), r.declare_class("Dst").unwrap());
        let (sa, da) = (r.declare_class("SrcA").unwrap(), r.declare_class("DstA").unwrap());
        let s_list = r.generic("Vec", &[sa]).unwrap();
        let d_list = r.generic("Vec", &[da]).unwrap();
        let s_map = r.generic("Map", &[string, sa]).unwrap();
        let d_map = r.generic("Map", &[string, da]).unwrap();
        let tags = r.generic("Vec", &[string]).unwrap();
        r.define_properties(src, [("Items", s_list), ("Index", s_map), ("Tags", tags)]).unwrap();
        r.define_properties(dst, [("Items", d_list), ("Index", d_map), ("Tags", tags)]).unwrap();

        let pairs = r.complex_correspondences(TypePair::new(src, dst)).unwrap();
        assert_eq!(pairs, vec![TypePair::new(sa, da), TypePair::new(sa, da)]);
    }

    #[test]
    fn nested_generic_pair_walks_its_own_arguments() {
        let mut r = TypeRegistry::new();
        let (sa, da) = (r.declare_class("SrcA").unwrap(), r.declare_class("DstA").unwrap());
        let s_inner = r.generic("Vec", &[sa]).unwrap();
        let d_inner = r.generic("Vec", &[da]).unwrap();
        let s_outer = r.generic("Vec", &[s_inner]).unwrap();
        let d_outer = r.generic("Vec", &[d_inner]).unwrap();

        let outer = r.complex_correspondences(TypePair::new(s_outer, d_outer)).unwrap();
        assert_eq!(outer, vec![TypePair::new(s_inner, d_inner)]);
        let inner = r.complex_correspondences(TypePair::new(s_inner, d_inner)).unwrap();
        assert_eq!(inner, vec![TypePair::new(sa, da)]);
    }

    #[test]
    fn generic_arity_mismatch_is_fatal() {
        let mut r = TypeRegistry::new();
        let string = r.scalar(ScalarKind::String);
        let (src, dst) = (r.declare_class("Src").unwrap(), r.declare_class("Dst").unwrap());
        let sa = r.declare_class("SrcA").unwrap();
        let s_list = r.generic("Vec", &[sa]).unwrap();
        let d_map = r.generic("Map", &[string, sa]).unwrap();
        r.define_property(src, PropertyInfo::new("Items", s_list)).unwrap();
        r.define_property(dst, PropertyInfo::new("Items", d_map)).unwrap();

        match r.complex_correspondences(TypePair::new(src, dst)).unwrap_err() {
            AutoMapError::GenericArityMismatch { source_args, destination_args, .. } => {
                assert_eq!(source_args, vec!["SrcA".to_string()]);
                assert_eq!(destination_args, vec!["string".to_string(), "SrcA".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn structs_and_mixed_shapes_are_left_alone() {
        let mut r = TypeRegistry::new();
        let (src, dst) = (r.declare_class("Src").unwrap(), r.declare_class("Dst").unwrap());
        let money = r.declare_struct("Money").unwrap();
        let cls = r.declare_class("Cls").unwrap();
        let list = r.generic("Vec", &[cls]).unwrap();
        r.define_properties(src, [("Amount", money), ("Mixed", cls)]).unwrap();
        r.define_properties(dst, [("Amount", money), ("Mixed", list)]).unwrap();

        assert!(r.complex_correspondences(TypePair::new(src, dst)).unwrap().is_empty());
    }
}
