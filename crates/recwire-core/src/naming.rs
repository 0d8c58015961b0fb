//! Wire key resolution for record fields and plain mapping keys.
//!
//! Resolution order for a record field:
//!
//! 1. An explicit wire name on the descriptor, used verbatim.
//! 2. With the naming convention on, the identifier converted from
//!    `snake_case` to `camelCase`.
//! 3. The identifier itself.
//!
//! The decoder never converts `camelCase` back. It derives each field's wire
//! key the same way the encoder does and looks that key up, so both directions
//! agree by construction.

use std::borrow::Cow;

use crate::schema::FieldDescriptor;

/// Convert a `snake_case` identifier to `camelCase`.
///
/// Splits on `_`, keeps the first segment unchanged and upper-cases the first
/// character of every later segment. Empty segments (from leading, trailing
/// or doubled underscores) contribute nothing.
///
/// ```
/// use recwire_core::naming::snake_to_camel;
/// assert_eq!(snake_to_camel("user_name"), "userName");
/// assert_eq!(snake_to_camel("name"), "name");
/// ```
pub fn snake_to_camel(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, segment) in s.split('_').enumerate() {
        if i == 0 {
            out.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// The wire key a field is written under (and looked up by).
pub fn wire_key(field: &FieldDescriptor, use_convention: bool) -> Cow<'_, str> {
    if let Some(name) = field.wire_name_override() {
        return Cow::Borrowed(name);
    }
    if use_convention {
        Cow::Owned(snake_to_camel(field.name()))
    } else {
        Cow::Borrowed(field.name())
    }
}

/// The wire key for a plain mapping key (no descriptor, so no override).
pub fn map_key(key: &str, use_convention: bool) -> Cow<'_, str> {
    if use_convention {
        Cow::Owned(snake_to_camel(key))
    } else {
        Cow::Borrowed(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TypeDesc;

    #[test]
    fn converts_each_later_segment() {
        assert_eq!(snake_to_camel("created_at_utc"), "createdAtUtc");
        assert_eq!(snake_to_camel("a_b_c"), "aBC");
    }

    #[test]
    fn keeps_first_segment_and_rest_of_words() {
        assert_eq!(snake_to_camel("Already_camel"), "AlreadyCamel");
        assert_eq!(snake_to_camel("http_URL"), "httpURL");
        assert_eq!(snake_to_camel("userName"), "userName");
    }

    #[test]
    fn skips_empty_segments() {
        assert_eq!(snake_to_camel("_private"), "Private");
        assert_eq!(snake_to_camel("trailing_"), "trailing");
        assert_eq!(snake_to_camel("double__under"), "doubleUnder");
        assert_eq!(snake_to_camel(""), "");
    }

    #[test]
    fn override_ignores_convention() {
        let field = FieldDescriptor::new("user_name", TypeDesc::Str).wire_name("username");
        assert_eq!(wire_key(&field, false), "username");
        assert_eq!(wire_key(&field, true), "username");
    }

    #[test]
    fn convention_applies_without_override() {
        let field = FieldDescriptor::new("user_age", TypeDesc::Int);
        assert_eq!(wire_key(&field, false), "user_age");
        assert_eq!(wire_key(&field, true), "userAge");
    }
}
