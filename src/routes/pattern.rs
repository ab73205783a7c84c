use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use super::RouteError;

/// Characters escaped when a param value is written into a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Segment
///
/// One `/`-separated piece of a route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Static(String),
    /// `:name` binds any non-empty segment.
    Param(String),
    /// `:name(a|b|c)` binds only one of the listed values.
    Constrained { name: String, allowed: Vec<String> },
}

/// PathPattern
///
/// A compiled route path such as `/:division(champion|d1|d2)/matches/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compiles a route path. Only absolute paths are accepted.
    pub fn parse(source: &str) -> Result<Self, RouteError> {
        if !source.starts_with('/') {
            return Err(RouteError::InvalidPattern(source.to_string()));
        }

        let mut segments = Vec::new();
        for raw in split_segments(source) {
            segments.push(parse_segment(raw).ok_or_else(|| {
                RouteError::InvalidPattern(source.to_string())
            })?);
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of every dynamic segment, in path order.
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Static(_) => None,
                Segment::Param(name) | Segment::Constrained { name, .. } => Some(name.as_str()),
            })
            .collect()
    }

    /// Matches a request path (without query) and returns the bound params.
    ///
    /// Segments are percent-decoded first and compared ignoring ASCII case; bound params
    /// keep the case they were typed in.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let parts: Vec<String> = split_segments(path).map(decode_segment).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(expected) => {
                    if !expected.eq_ignore_ascii_case(&part) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), part);
                }
                Segment::Constrained { name, allowed } => {
                    if !allowed.iter().any(|value| value.eq_ignore_ascii_case(&part)) {
                        return None;
                    }
                    params.insert(name.clone(), part);
                }
            }
        }
        Some(params)
    }

    /// Substitutes `params` into the pattern. Extra params are ignored.
    pub fn build(&self, params: &BTreeMap<String, String>) -> Result<String, RouteError> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(value) => path.push_str(value),
                Segment::Param(name) => path.push_str(&encode_segment(lookup(
                    &self.source,
                    params,
                    name,
                )?)),
                Segment::Constrained { name, allowed } => {
                    let value = lookup(&self.source, params, name)?;
                    if !allowed
                        .iter()
                        .any(|candidate| candidate.eq_ignore_ascii_case(value))
                    {
                        return Err(RouteError::ParamOutOfRange {
                            pattern: self.source.clone(),
                            param: name.clone(),
                            value: value.to_string(),
                        });
                    }
                    path.push_str(&encode_segment(value));
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

/// Joins a child route path onto its parent layout path.
pub fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_string();
    }
    if child.is_empty() {
        return parent.to_string();
    }
    format!("{}/{}", parent.trim_end_matches('/'), child)
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

fn parse_segment(raw: &str) -> Option<Segment> {
    let Some(param) = raw.strip_prefix(':') else {
        return Some(Segment::Static(raw.to_string()));
    };

    match param.split_once('(') {
        None => is_ident(param).then(|| Segment::Param(param.to_string())),
        Some((name, rest)) => {
            let body = rest.strip_suffix(')')?;
            let allowed: Vec<String> = body.split('|').map(str::to_string).collect();
            if !is_ident(name) || allowed.iter().any(String::is_empty) {
                return None;
            }
            Some(Segment::Constrained {
                name: name.to_string(),
                allowed,
            })
        }
    }
}

fn is_ident(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn lookup<'a>(
    pattern: &str,
    params: &'a BTreeMap<String, String>,
    name: &str,
) -> Result<&'a str, RouteError> {
    match params.get(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(RouteError::MissingParam {
            pattern: pattern.to_string(),
            param: name.to_string(),
        }),
    }
}
