use super::class::{MethodInfo, MethodSignature};
use crate::error::{ApiError, ApiResult};
use std::fmt;
use std::str::FromStr;

/// Textual method selector: `a.b.Class#name(type1,type2)`.
///
/// Omitting the parameter list selects every overload of `name`. The class's
/// simple name (or `<init>`) selects constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSelector {
    pub class_fqn: String,
    pub name: String,
    pub signature: Option<MethodSignature>,
}

impl MethodSelector {
    pub fn simple_class_name(&self) -> &str {
        self.class_fqn.rsplit('.').next().unwrap_or(&self.class_fqn)
    }

    pub fn selects_constructor(&self) -> bool {
        self.name == "<init>" || self.name == self.simple_class_name()
    }

    pub fn matches(&self, method: &MethodInfo) -> bool {
        let name_matches = if method.is_constructor {
            self.selects_constructor()
        } else {
            method.name == self.name
        };
        name_matches
            && self
                .signature
                .as_ref()
                .is_none_or(|sig| *sig == method.signature)
    }
}

impl FromStr for MethodSelector {
    type Err = ApiError;

    fn from_str(s: &str) -> ApiResult<Self> {
        let s = s.trim();
        let (class_fqn, member) = s
            .rsplit_once('#')
            .ok_or_else(|| ApiError::InvalidArgument(format!("missing '#' in selector: {s}")))?;
        if class_fqn.is_empty() {
            return Err(ApiError::InvalidArgument(format!("missing class in selector: {s}")));
        }

        let (name, signature) = match member.find('(') {
            Some(open) => {
                let params = member[open + 1..].strip_suffix(')').ok_or_else(|| {
                    ApiError::InvalidArgument(format!("unterminated parameter list: {s}"))
                })?;
                (&member[..open], Some(parse_parameter_list(params)?))
            }
            None => (member, None),
        };
        if name.is_empty() {
            return Err(ApiError::InvalidArgument(format!("missing method name: {s}")));
        }

        Ok(Self {
            class_fqn: class_fqn.to_string(),
            name: name.to_string(),
            signature,
        })
    }
}

/// Splits on top-level commas so generic arguments stay intact.
fn parse_parameter_list(params: &str) -> ApiResult<MethodSignature> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in params.chars() {
        match ch {
            '<' => {
                depth += 1;
                current.push(ch);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => parts.push(std::mem::take(&mut current)),
            c if c.is_whitespace() => {}
            c => current.push(c),
        }
    }
    if !current.is_empty() || !parts.is_empty() {
        parts.push(current);
    }
    if parts.iter().any(String::is_empty) {
        return Err(ApiError::InvalidArgument(format!(
            "empty parameter type in ({params})"
        )));
    }
    Ok(MethodSignature::new(parts))
}

impl fmt::Display for MethodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.class_fqn, self.name)?;
        if let Some(sig) = &self.signature {
            write!(f, "{sig}")?;
        }
        Ok(())
    }
}
