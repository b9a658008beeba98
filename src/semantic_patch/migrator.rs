//! Type migration rules
//!
//! Whole-buffer substitutions that move the field from `T` to `Option<T>`.
//! The rules are independent of each other: the guarded-lookup rule accepts
//! both the original `!is_empty()` guard and the rewritten `is_some()` one,
//! so the presence rule may run before or after it.
//!
//! A rule that finds nothing is a no-op. Wording that differs from these
//! idioms keeps its unmigrated shape; the report is the only place that
//! shows it.

use crate::config::{FieldSpec, UsageSettings};

use super::patterns::{substitute, UsagePatterns};
use super::pipeline::{PatchReport, Rule};

pub fn migrate_types(
    content: &mut String,
    patterns: &UsagePatterns,
    field: &FieldSpec,
    usage: &UsageSettings,
    report: &mut PatchReport,
) {
    let wrapped = field.wrapped_type();
    let access = format!("{}.{}", usage.access_path, field.name);

    let n = substitute(content, &patterns.declared_type, |caps| {
        format!("pub {}: {}{}", field.name, wrapped, &caps["tail"])
    });
    report.record(Rule::DeclaredType, n);

    let n = substitute(content, &patterns.default_value, |_| {
        format!("{}: None", field.name)
    });
    report.record(Rule::DefaultValue, n);

    let binding = &usage.lookup_binding;
    let n = substitute(content, &patterns.guarded_lookup, |caps| {
        format!(
            "let {} = if let Some({}) = &{} {{{}{}.get({})",
            &caps["binding"], binding, access, &caps["ws"], &caps["map"], binding
        )
    });
    report.record(Rule::GuardedLookup, n);

    let n = substitute(content, &patterns.presence_check, |_| {
        format!("{}.is_some()", access)
    });
    report.record(Rule::PresenceCheck, n);

    let n = substitute(content, &patterns.value_assignment, |_| {
        format!("{} = Some({});", access, usage.assigned_ident)
    });
    report.record(Rule::ValueAssignment, n);

    let n = substitute(content, &patterns.string_assignment, |caps| {
        format!("{} = Some({}.to_string());", access, &caps["expr"])
    });
    report.record(Rule::StringAssignment, n);
}
