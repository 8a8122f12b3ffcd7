//! Resource tags

use indexmap::IndexMap;

use crate::error::{CoreError, Result};

/// Key/value tags carried by every resource
///
/// Order is preserved for display only. Keys are unique.
pub type Tags = IndexMap<String, String>;

/// Parse a `key=value` pair
///
/// The value may be empty (`key=`) and may itself contain `=`.
pub fn parse_tag(input: &str) -> Result<(String, String)> {
    let (key, value) = input.split_once('=').ok_or_else(|| CoreError::InvalidTag {
        input: input.to_string(),
    })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(CoreError::InvalidTag {
            input: input.to_string(),
        });
    }

    Ok((key.to_string(), value.to_string()))
}

/// Parse a list of `key=value` pairs into tags, later keys overwrite earlier ones
pub fn parse_tags<I, S>(inputs: I) -> Result<Tags>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags = Tags::new();
    for input in inputs {
        let (key, value) = parse_tag(input.as_ref())?;
        tags.insert(key, value);
    }
    Ok(tags)
}

/// Merge `incoming` into `tags`, overwriting values of existing keys
pub fn merge_tags(tags: &mut Tags, incoming: &Tags) {
    for (key, value) in incoming {
        tags.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        assert_eq!(
            parse_tag("env=prod").unwrap(),
            ("env".to_string(), "prod".to_string())
        );
        assert_eq!(
            parse_tag("conn=a=b").unwrap(),
            ("conn".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_tag("empty=").unwrap().1, "");
    }

    #[test]
    fn test_parse_tag_invalid() {
        assert!(parse_tag("novalue").is_err());
        assert!(parse_tag("=value").is_err());
    }

    #[test]
    fn test_merge_same_tag_twice_keeps_one_entry() {
        let mut tags = Tags::new();
        let incoming = parse_tags(["env=prod"]).unwrap();

        merge_tags(&mut tags, &incoming);
        merge_tags(&mut tags, &incoming);

        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn test_merge_overwrites_existing_value() {
        let mut tags = parse_tags(["env=dev", "team=core"]).unwrap();
        merge_tags(&mut tags, &parse_tags(["env=prod"]).unwrap());

        assert_eq!(tags.get("env").map(String::as_str), Some("prod"));
        assert_eq!(tags.get("team").map(String::as_str), Some("core"));
    }
}
