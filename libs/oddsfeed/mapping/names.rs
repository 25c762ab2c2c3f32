//! Expansion of market and outcome name templates
//!
//! Supported placeholders, all resolved from the occurrence's specifiers:
//! `{x}` value, `{+x}` signed value, `{-x}` negated signed value,
//! `{!x}` English ordinal, `{x+N}` / `{x-N}` integer arithmetic.
//! Entity placeholders (`{$competitor1}`) and unknown specifiers are kept as-is.

use crate::domain::Specifiers;

/// Expand every placeholder of `template` that `specifiers` can satisfy
pub fn expand_name(template: &str, specifiers: &Specifiers) -> String {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        expanded.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            expanded.push_str(&rest[open..]);
            return expanded;
        };

        let token = &after[..close];
        match expand_placeholder(token, specifiers) {
            Some(value) => expanded.push_str(&value),
            None => {
                expanded.push('{');
                expanded.push_str(token);
                expanded.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    expanded.push_str(rest);
    expanded
}

fn expand_placeholder(token: &str, specifiers: &Specifiers) -> Option<String> {
    let token = token.trim();
    if token.starts_with('$') || token.is_empty() {
        return None;
    }

    if let Some(name) = token.strip_prefix('+') {
        return signed(specifiers.get(name)?, false);
    }
    if let Some(name) = token.strip_prefix('-') {
        return signed(specifiers.get(name)?, true);
    }
    if let Some(name) = token.strip_prefix('!') {
        let value: i64 = specifiers.get(name)?.trim().parse().ok()?;
        return Some(ordinal(value));
    }

    if let Some(position) = token.rfind(['+', '-']) {
        let (name, offset) = token.split_at(position);
        let offset: i64 = offset.parse().ok()?;
        let value: i64 = specifiers.get(name)?.trim().parse().ok()?;
        return Some(value.checked_add(offset)?.to_string());
    }

    specifiers.get(token).cloned()
}

/// `+1.5`, `-1.5` or `0`; negated first when `negate` is set
fn signed(raw: &str, negate: bool) -> Option<String> {
    let raw = raw.trim();
    let value: f64 = raw.parse().ok()?;
    let magnitude = raw.trim_start_matches(['+', '-']);
    let value = if negate { -value } else { value };

    Some(if value > 0.0 {
        format!("+{}", magnitude)
    } else if value < 0.0 {
        format!("-{}", magnitude)
    } else {
        "0".to_string()
    })
}

fn ordinal(value: i64) -> String {
    let suffix = match (value.rem_euclid(100), value.rem_euclid(10)) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{}{}", value, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_specifiers;

    fn specs(raw: &str) -> Specifiers {
        parse_specifiers(raw).unwrap()
    }

    #[test]
    fn test_plain_value() {
        assert_eq!(expand_name("Total {total}", &specs("total=2.5")), "Total 2.5");
    }

    #[test]
    fn test_signed_values() {
        let s = specs("hcp=1.5|neg=-0.25|zero=0");
        assert_eq!(expand_name("{$competitor1} ({+hcp})", &s), "{$competitor1} (+1.5)");
        assert_eq!(expand_name("{-hcp}", &s), "-1.5");
        assert_eq!(expand_name("{+neg} {-neg}", &s), "-0.25 +0.25");
        assert_eq!(expand_name("{+zero}", &s), "0");
    }

    #[test]
    fn test_ordinals() {
        let s = specs("a=1|b=2|c=3|d=11|e=22|f=113");
        assert_eq!(
            expand_name("{!a} {!b} {!c} {!d} {!e} {!f}", &s),
            "1st 2nd 3rd 11th 22nd 113th"
        );
    }

    #[test]
    fn test_arithmetic() {
        let s = specs("goalnr=2");
        assert_eq!(expand_name("Goal {goalnr+1}", &s), "Goal 3");
        assert_eq!(expand_name("Goal {goalnr-1}", &s), "Goal 1");
    }

    #[test]
    fn test_arithmetic_overflow_keeps_placeholder() {
        let max = specs("goalnr=9223372036854775807");
        assert_eq!(expand_name("Goal {goalnr+1}", &max), "Goal {goalnr+1}");
        assert_eq!(expand_name("Goal {goalnr-1}", &max), "Goal 9223372036854775806");

        let min = specs("goalnr=-9223372036854775808");
        assert_eq!(expand_name("Goal {goalnr-1}", &min), "Goal {goalnr-1}");
    }

    #[test]
    fn test_unknown_and_unterminated_are_kept() {
        let s = specs("total=2.5");
        assert_eq!(expand_name("{setnr} set", &s), "{setnr} set");
        assert_eq!(expand_name("Over {total", &s), "Over {total");
    }
}
