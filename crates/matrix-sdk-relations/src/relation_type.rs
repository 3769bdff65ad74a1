// Copyright 2024 The Matrix.org Foundation C.I.C.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The kind of a relation, the `rel_type` field of `m.relates_to`.
///
/// This is an open enumeration: relation kinds this crate doesn't know about
/// are kept verbatim, use [`RelationType::as_str()`] to inspect them.
#[derive(Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RelationType {
    /// `m.annotation`, a reaction to an event. Carries an aggregation key.
    Annotation,

    /// `m.reference`, a generic reference to another event.
    Reference,

    /// `m.replace`, an edit of another event.
    Replacement,

    /// `m.thread`, the event is part of the thread rooted at the related
    /// event.
    Thread,

    #[doc(hidden)]
    _Custom(PrivOwnedStr),
}

impl RelationType {
    /// The string representation of this relation kind, as used on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            RelationType::Annotation => "m.annotation",
            RelationType::Reference => "m.reference",
            RelationType::Replacement => "m.replace",
            RelationType::Thread => "m.thread",
            RelationType::_Custom(s) => &s.0,
        }
    }

    /// Is this an `m.annotation` relation?
    pub fn is_annotation(&self) -> bool {
        matches!(self, RelationType::Annotation)
    }
}

impl From<&str> for RelationType {
    fn from(s: &str) -> Self {
        match s {
            "m.annotation" => RelationType::Annotation,
            "m.reference" => RelationType::Reference,
            "m.replace" => RelationType::Replacement,
            "m.thread" => RelationType::Thread,
            _ => RelationType::_Custom(PrivOwnedStr(s.into())),
        }
    }
}

impl From<String> for RelationType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl AsRef<str> for RelationType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for RelationType {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for RelationType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RelationType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RelationType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(String::deserialize(deserializer)?.into())
    }
}

// Wrapper around `Box<str>` that cannot be used in a meaningful way outside of
// this crate. Used for string enums because their `_Custom` variant can't be
// truly private (only `#[doc(hidden)]`).
#[doc(hidden)]
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrivOwnedStr(Box<str>);

impl fmt::Debug for PrivOwnedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
