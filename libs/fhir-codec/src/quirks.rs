//! Wire fixups for known encoder/decoder bugs
//!
//! Each entry compensates for one concrete bug observed on the wire, gated
//! narrowly on content so everything else passes through byte-identical.
//! Every fixup is a named pure function, testable on its own and retireable
//! once the bug it compensates disappears.

use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Pre-decode fixup applied to wire text before parsing.
pub(crate) struct DecodeFix {
    pub name: &'static str,
    pub applies: fn(&str) -> bool,
    pub apply: fn(&str) -> String,
}

/// Post-encode fixup applied to the encoded string, keyed by resource kind.
pub(crate) struct EncodeFix {
    pub name: &'static str,
    pub resource_type: &'static str,
    pub apply: fn(&str) -> String,
}

pub(crate) const DECODE_FIXES: &[DecodeFix] = &[DecodeFix {
    name: "searchset_rootless_task_refs",
    applies: is_unprofiled_searchset_with_task_refs,
    apply: root_task_references,
}];

pub(crate) const ENCODE_FIXES: &[EncodeFix] = &[EncodeFix {
    name: "communication_rooted_task_refs",
    resource_type: "Communication",
    apply: unroot_task_references,
}];

pub(crate) fn apply_decode_fixes(content: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(content);
    for fix in DECODE_FIXES {
        if (fix.applies)(&current) {
            tracing::debug!(fix = fix.name, "applying pre-decode fixup");
            current = Cow::Owned((fix.apply)(&current));
        }
    }
    current
}

pub(crate) fn apply_encode_fixes(resource: &Value, encoded: String) -> String {
    let Some(resource_type) = resource.get("resourceType").and_then(Value::as_str) else {
        return encoded;
    };

    let mut current = encoded;
    for fix in ENCODE_FIXES {
        if fix.resource_type == resource_type {
            tracing::debug!(fix = fix.name, resource_type, "applying post-encode fixup");
            current = (fix.apply)(&current);
        }
    }
    current
}

/// Search-result bundles arrive without a profile claim; their task entry
/// references are missing the leading slash the decoder expects. Gate on the
/// bundle type marker and the absence of any profile declaration.
fn is_unprofiled_searchset_with_task_refs(content: &str) -> bool {
    content.contains("searchset")
        && !content.contains("\"profile\"")
        && !content.contains("<profile")
        && rootless_task_ref_pattern().is_match(content)
}

fn root_task_references(content: &str) -> String {
    rootless_task_ref_pattern()
        .replace_all(content, "${prefix}/Task/")
        .into_owned()
}

/// The underlying encoder roots contained task references ("/Task/<id>");
/// strip the erroneous slash back off.
fn unroot_task_references(encoded: &str) -> String {
    encoded.replace("/Task/", "Task/")
}

/// A reference value opening with `Task/` in either wire format.
fn rootless_task_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?P<prefix>"reference"\s*:\s*"|<reference value=")Task/"#)
            .expect("rootless task ref pattern compiles")
    })
}
