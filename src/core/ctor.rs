// constructor selection + constructor parameter binding
use tracing::debug;

use crate::core::error::{AutoMapError, Result};
use crate::core::registry::TypeRegistry;
use crate::core::types::{ConstructorInfo, ParamInfo, TypeId, eq_ignore_case};
use crate::mapping::host::{CtorParamExpression, MapHandle, MappingHost};

/// Shape of a destination member selector such as `d => d.id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSelector {
    /// Direct property or field access; holds the member name.
    Member(String),
    MethodCall(String),
    Computed(String),
}

impl MemberSelector {
    pub fn member(name: impl Into<String>) -> Self {
        MemberSelector::Member(name.into())
    }

    /// Classify a textual selector. Accepted member forms: `id`, `d.id`, `d => d.id`, `|d| d.id`.
    pub fn parse(text: &str) -> Self {
        let body = strip_lambda_head(text.trim());

        if body.ends_with(')') && body.contains('(') {
            return MemberSelector::MethodCall(body.to_string());
        }

        let segments: Vec<&str> = body.split('.').map(str::trim).collect();
        match segments.as_slice() {
            [member] | [_, member] if segments.iter().all(|s| is_identifier(s)) => {
                MemberSelector::Member((*member).to_string())
            }
            _ => MemberSelector::Computed(body.to_string()),
        }
    }

    /// Name of the selected member, or `NotAMemberExpression`.
    pub fn member_name(&self) -> Result<&str> {
        match self {
            MemberSelector::Member(name) => Ok(name),
            MemberSelector::MethodCall(text) | MemberSelector::Computed(text) => {
                Err(AutoMapError::NotAMemberExpression(text.clone()))
            }
        }
    }
}

impl From<&str> for MemberSelector {
    fn from(text: &str) -> Self {
        MemberSelector::parse(text)
    }
}

fn strip_lambda_head(text: &str) -> &str {
    if let Some((_, body)) = text.split_once("=>") {
        return body.trim();
    }
    if let Some(rest) = text.strip_prefix('|') {
        if let Some((_, body)) = rest.split_once('|') {
            return body.trim();
        }
    }
    text
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl TypeRegistry {
    /// The constructor used to build `destination`.
    ///
    /// A constructor marked preferred wins. Otherwise the one with the most parameters, ties
    /// going to the first declared. `None` when the type declares no constructor.
    pub fn select_constructor(&self, destination: TypeId) -> Result<Option<&ConstructorInfo>> {
        let ctors = &self.get(destination)?.constructors;
        if let Some(preferred) = ctors.iter().find(|c| c.preferred) {
            return Ok(Some(preferred));
        }
        //max_by_key keeps the last maximum, so scan backwards to keep the first
        Ok(ctors.iter().rev().max_by_key(|c| c.params.len()))
    }

    /// Case-insensitive lookup of `name` among the selected constructor's parameters.
    pub fn find_ctor_parameter(&self, destination: TypeId, name: &str) -> Result<&ParamInfo> {
        self.select_constructor(destination)?
            .and_then(|ctor| ctor.params.iter().find(|p| eq_ignore_case(&p.name, name)))
            .ok_or_else(|| AutoMapError::ParameterNotFound(name.to_string()))
    }
}

/// Bind the destination constructor parameter behind `selector` using `configure`.
///
/// `configure` is handed to the host untouched.
pub fn bind_ctor_parameter<H, F>(
    host: &mut H,
    registry: &TypeRegistry,
    handle: MapHandle,
    destination: TypeId,
    selector: &MemberSelector,
    mut configure: F,
) -> Result<MapHandle>
where
    H: MappingHost + ?Sized,
    F: FnMut(&mut CtorParamExpression),
{
    let member = selector.member_name()?;
    let param = registry.find_ctor_parameter(destination, member)?;

    let destination_name = registry.name(destination)?;
    debug!(
        destination = destination_name,
        member,
        parameter = %param.name,
        "binding constructor parameter"
    );
    host.for_ctor_param(handle, &param.name, &mut configure)?;
    Ok(handle)
}
