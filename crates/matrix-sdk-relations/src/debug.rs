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

//! Helpers to log untrusted relation content without dumping all of it.

use std::fmt;

use ruma::serde::Raw;
use serde_json::Value;

/// A wrapper around `Raw` that implements `Debug` in a way that only prints
/// the relation fields: the relation type, the event ID and whether a reply
/// reference is present.
///
/// The aggregation key is never printed, it can contain user-generated text.
pub struct DebugRawRelation<'a, T>(pub &'a Raw<T>);

#[cfg(not(tarpaulin_include))]
impl<T> fmt::Debug for DebugRawRelation<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawRelation")
            .field("rel_type", &DebugField(self.0.get_field("rel_type")))
            .field("event_id", &DebugField(self.0.get_field("event_id")))
            .field("has_in_reply_to", &DebugPresence(self.0.get_field("m.in_reply_to")))
            .finish_non_exhaustive()
    }
}

struct DebugField(serde_json::Result<Option<Value>>);

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for DebugField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Ok(Some(Value::String(s))) => fmt::Debug::fmt(s, f),
            Ok(Some(other)) => f.debug_tuple("NotAString").field(&JsonKind(other)).finish(),
            Ok(None) => f.write_str("Missing"),
            Err(e) => f.debug_tuple("Invalid").field(&e).finish(),
        }
    }
}

struct DebugPresence(serde_json::Result<Option<Value>>);

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for DebugPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Ok(Some(_)) => f.write_str("true"),
            Ok(None) => f.write_str("false"),
            Err(e) => f.debug_tuple("Invalid").field(&e).finish(),
        }
    }
}

/// Prints only the kind of a JSON value, not its content.
pub(crate) struct JsonKind<'a>(pub &'a Value);

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for JsonKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.0 {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };

        f.write_str(kind)
    }
}
