//! The polymorphic `aud` claim.
//!
//! On the wire an audience is a bare string when it has one member and an
//! array otherwise; an empty audience is omitted by the enclosing claims.
//! In memory it is always an ordered list.

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// Ordered audience list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Audience(Vec<String>);

impl Audience {
    /// Build from any list of strings.
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(members.into_iter().map(Into::into).collect())
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the audience has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `member` is listed.
    #[must_use]
    pub fn contains(&self, member: &str) -> bool {
        self.0.iter().any(|m| m == member)
    }

    /// Whether the two audiences share at least one member.
    #[must_use]
    pub fn intersects(&self, other: &Audience) -> bool {
        other.0.iter().any(|m| self.contains(m))
    }

    /// Append a member.
    pub fn push(&mut self, member: impl Into<String>) {
        self.0.push(member.into());
    }

    /// Consume into the underlying list.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Audience {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Audience {
    fn from(member: &str) -> Self {
        Self(vec![member.to_owned()])
    }
}

impl From<String> for Audience {
    fn from(member: String) -> Self {
        Self(vec![member])
    }
}

impl From<Vec<String>> for Audience {
    fn from(members: Vec<String>) -> Self {
        Self(members)
    }
}

impl From<&[&str]> for Audience {
    fn from(members: &[&str]) -> Self {
        Self::new(members.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Audience {
    fn from(members: [&str; N]) -> Self {
        Self::new(members)
    }
}

impl FromIterator<String> for Audience {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Audience {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Audience {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [single] => serializer.serialize_str(single),
            members => members.serialize(serializer),
        }
    }
}

struct AudienceVisitor;

impl<'de> Visitor<'de> for AudienceVisitor {
    type Value = Audience;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or an array of strings")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Audience, E> {
        Ok(Audience::from(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Audience, E> {
        Ok(Audience::from(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Audience, E> {
        Ok(Audience::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Audience, E> {
        Ok(Audience::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Audience, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Audience, A::Error> {
        let mut members = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(16));
        while let Some(member) = seq.next_element::<String>()? {
            members.push(member);
        }
        Ok(Audience(members))
    }
}

impl<'de> Deserialize<'de> for Audience {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AudienceVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_follows_cardinality() {
        assert_eq!(serde_json::to_string(&Audience::default()).unwrap(), "[]");
        assert_eq!(serde_json::to_string(&Audience::from("a")).unwrap(), r#""a""#);
        assert_eq!(
            serde_json::to_string(&Audience::from(["a", "b"])).unwrap(),
            r#"["a","b"]"#
        );
    }

    #[test]
    fn decodes_every_wire_shape() {
        let single: Audience = serde_json::from_str(r#""a""#).unwrap();
        assert_eq!(&*single, ["a".to_owned()]);

        let many: Audience = serde_json::from_str(r#"["b","a"]"#).unwrap();
        assert_eq!(many.into_vec(), vec!["b".to_owned(), "a".to_owned()]);

        let null: Audience = serde_json::from_str("null").unwrap();
        assert!(null.is_empty());

        assert!(serde_json::from_str::<Audience>("42").is_err());
        assert!(serde_json::from_str::<Audience>(r#"["a",1]"#).is_err());
    }

    #[test]
    fn intersection_is_any_shared_member() {
        let token = Audience::from(["api", "web"]);
        assert!(token.intersects(&Audience::from("web")));
        assert!(!token.intersects(&Audience::from(["cli", "batch"])));
        assert!(!token.intersects(&Audience::default()));
    }
}
