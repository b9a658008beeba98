//! Textual idioms recognized by the type migration
//!
//! Each pattern matches only the pre-migration shape of its idiom, so a
//! buffer that already went through a rewrite never matches again.

use regex::{Captures, Regex};

use crate::config::{FieldSpec, UsageSettings};
use crate::error::Result;

/// Compiled regexes for one field / access path combination
#[derive(Debug, Clone)]
pub struct UsagePatterns {
    /// `pub <field>: <bare>` followed by `,` or whitespace
    pub declared_type: Regex,
    /// `<field>: <empty_value>`
    pub default_value: Regex,
    /// `!<path>.<field>.is_empty()`
    pub presence_check: Regex,
    /// `let <b> = if <guard> {<ws><map>.get(&<path>.<field>)`
    pub guarded_lookup: Regex,
    /// `<path>.<field> = <assigned_ident>;`
    pub value_assignment: Regex,
    /// `<path>.<field> = <expr>.to_string();`
    pub string_assignment: Regex,
}

impl UsagePatterns {
    pub fn new(field: &FieldSpec, usage: &UsageSettings) -> Result<Self> {
        let name = regex::escape(&field.name);
        let bare = regex::escape(&field.bare_type);
        let empty = regex::escape(&field.empty_value);
        let access = format!(r"{}\.{}", regex::escape(&usage.access_path), name);
        let ident = regex::escape(&usage.assigned_ident);

        Ok(Self {
            declared_type: Regex::new(&format!(r"pub {name}: {bare}(?P<tail>[,\s])"))?,
            default_value: Regex::new(&format!(r"\b{name}: {empty}"))?,
            presence_check: Regex::new(&format!(r"!{access}\.is_empty\(\)"))?,
            guarded_lookup: Regex::new(&format!(
                r"let (?P<binding>\w+) = if (?:{access}\.is_some\(\)|!{access}\.is_empty\(\)) \{{(?P<ws>\s*)(?P<map>[\w.]+)\.get\(&{access}\)"
            ))?,
            value_assignment: Regex::new(&format!(r"{access} = {ident};"))?,
            string_assignment: Regex::new(&format!(
                r"{access} = (?P<expr>[\w.]+)\.to_string\(\);"
            ))?,
        })
    }
}

/// Compiled regex for the `fix-assignments` idiom:
/// `<receiver>.<field> = <ident>.clone().unwrap_or_else(|| { .. });`
pub fn fallback_assignment(field: &str, receiver: &str) -> Result<Regex> {
    let access = format!(r"{}\.{}", regex::escape(receiver), regex::escape(field));
    Ok(Regex::new(&format!(
        r"(?P<lhs>{access} = )(?P<rhs>\w+\.clone\(\)\.unwrap_or_else\(\|\| \{{[^}}]+\}}\));"
    ))?)
}

/// Replace every match of `re` in `content`, returning the match count.
/// The buffer is left untouched when nothing matches.
pub fn substitute<F>(content: &mut String, re: &Regex, rewrite: F) -> usize
where
    F: FnMut(&Captures) -> String,
{
    let count = re.find_iter(content).count();
    if count > 0 {
        *content = re.replace_all(content, rewrite).into_owned();
    }
    count
}
