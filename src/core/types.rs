// runtime type descriptors
pub type TypeId = u32;

//id 0 is always the `void` type, see TypeRegistry::new
pub const VOID: TypeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Decimal,
    String,
    Uri,
}

impl ScalarKind {
    pub fn is_value_type(self) -> bool {
        !matches!(self, ScalarKind::String | ScalarKind::Uri)
    }

    pub fn type_name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Decimal => "decimal",
            ScalarKind::String => "string",
            ScalarKind::Uri => "uri",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    /// Platform type the mapper copies as-is.
    Opaque(ScalarKind),
    Enum { variants: Vec<String> },
    /// Reference-shaped user type.
    Class,
    /// Value-shaped user type.
    Struct,
    /// Closed instantiation of a generic container, e.g. `Vec<Child>`.
    Generic { definition: String, args: Vec<TypeId> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    pub name: String,
    pub ty: TypeId,
    pub readable: bool,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self { name: name.into(), ty, readable: true }
    }

    pub fn write_only(name: impl Into<String>, ty: TypeId) -> Self {
        Self { name: name.into(), ty, readable: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamInfo {
    pub name: String,
    pub ty: TypeId,
}

/// A public constructor. Parameter position is the index into `params`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstructorInfo {
    pub params: Vec<ParamInfo>,
    /// Explicitly chosen for construction, overrides the "most parameters" rule.
    pub preferred: bool,
}

impl ConstructorInfo {
    pub fn new<S: Into<String>>(params: impl IntoIterator<Item = (S, TypeId)>) -> Self {
        Self {
            params: params
                .into_iter()
                .map(|(name, ty)| ParamInfo { name: name.into(), ty })
                .collect(),
            preferred: false,
        }
    }

    pub fn preferred(mut self) -> Self {
        self.preferred = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: String,
    pub kind: TypeKind,
    pub properties: Vec<PropertyInfo>,
    pub constructors: Vec<ConstructorInfo>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            properties: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn generic_args(&self) -> Option<&[TypeId]> {
        match &self.kind {
            TypeKind::Generic { args, .. } => Some(args),
            _ => None,
        }
    }
}

/// Case-folded form of a member name, the key for every case-insensitive name match.
///
/// Folds per character with full Unicode lowercasing, so `fold_case(a) == fold_case(b)`
/// exactly when `eq_ignore_case(a, b)`.
pub fn fold_case(name: &str) -> String {
    name.chars().flat_map(char::to_lowercase).collect()
}

pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}

/// (source, destination) identity, the unit of mapping configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypePair {
    pub source: TypeId,
    pub destination: TypeId,
}

impl TypePair {
    pub const NO_PARENT: TypePair = TypePair { source: VOID, destination: VOID };

    pub fn new(source: TypeId, destination: TypeId) -> Self {
        Self { source, destination }
    }

    pub fn is_identity(&self) -> bool {
        self.source == self.destination
    }

    pub fn is_no_parent(&self) -> bool {
        *self == Self::NO_PARENT
    }
}
