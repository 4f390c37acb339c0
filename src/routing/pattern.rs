//! Path pattern helpers.
//!
//! # Design Decisions
//! - Two patterns with the same literal segments and parameters in the same
//!   positions have the same *shape*, regardless of parameter names. The
//!   router cannot hold both, so shapes are what conflicts are checked on.
//! - The publish route uses a custom verb (`{streamName}:publish`) inside a
//!   single path segment. The router only accepts parameters that fill a
//!   whole segment, so the route is mounted as `/streams/{streamName}` and
//!   the suffix is split off here. Sharing the parameter name with the
//!   generated stream routes lets both live on one pattern.

/// Custom verb suffix of the publish route.
pub const PUBLISH_SUFFIX: &str = ":publish";

/// Route pattern the publish handler is mounted on.
pub const PUBLISH_ROUTE: &str = "/streams/{streamName}";

/// Replace every `{name}` / `{*name}` segment with a placeholder.
pub fn shape_of(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| {
            if segment.starts_with("{*") && segment.ends_with('}') {
                "{*}"
            } else if segment.starts_with('{') && segment.ends_with('}') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Check that the router will accept `pattern`.
///
/// Returns the reason for the first offending segment. Mirrors the rules
/// axum enforces with a panic at `Router::route` time.
pub fn check_pattern(pattern: &str) -> Result<(), String> {
    let Some(rest) = pattern.strip_prefix('/') else {
        return Err("pattern must start with `/`".into());
    };

    let segments: Vec<&str> = rest.split('/').collect();
    let mut names: Vec<&str> = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        let opens = segment.matches('{').count();
        let closes = segment.matches('}').count();

        if opens == 0 && closes == 0 {
            if segment.starts_with(':') || segment.starts_with('*') {
                return Err(format!(
                    "segment `{segment}` starts with `{}`; captures are written `{{name}}`",
                    &segment[..1]
                ));
            }
            continue;
        }

        if opens != 1 || closes != 1 || !segment.starts_with('{') || !segment.ends_with('}') {
            return Err(format!(
                "segment `{segment}` mixes a parameter with literal text;                  parameters must fill a whole segment"
            ));
        }

        let inner = &segment[1..segment.len() - 1];
        let (name, catch_all) = match inner.strip_prefix('*') {
            Some(name) => (name, true),
            None => (inner, false),
        };
        if name.is_empty() {
            return Err(format!("segment `{segment}` has an empty parameter name"));
        }
        if catch_all && i + 1 != segments.len() {
            return Err(format!("catch-all `{segment}` must be the last segment"));
        }
        if names.contains(&name) {
            return Err(format!("parameter `{name}` appears twice"));
        }
        names.push(name);
    }
    Ok(())
}

/// Outcome of splitting a `/streams/{streamName}` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishTarget<'a> {
    /// `name:publish` with a non-empty name.
    Stream(&'a str),
    /// `:publish` with nothing in front.
    MissingName,
    /// Any other verb or no verb at all.
    NotPublish,
}

pub fn parse_publish_segment(segment: &str) -> PublishTarget<'_> {
    match segment.strip_suffix(PUBLISH_SUFFIX) {
        Some("") => PublishTarget::MissingName,
        Some(name) => PublishTarget::Stream(name),
        None => PublishTarget::NotPublish,
    }
}
