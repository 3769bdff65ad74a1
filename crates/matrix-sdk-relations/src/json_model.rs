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

use ruma::serde::Raw;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::debug::{DebugRawRelation, JsonKind};

/// A model that can be decoded from untyped JSON, and encoded back to it.
///
/// Decoding is lenient by contract: a value that doesn't have the expected
/// shape is reported as `None`, never as an error or a panic. Content coming
/// from other homeservers is untrusted and malformed content is common.
pub trait JsonModel: Sized {
    /// Try to decode the model from the given JSON value.
    ///
    /// Returns `None` if the value is not a JSON object, or if it doesn't
    /// contain the fields the model requires.
    fn from_json(value: &Value) -> Option<Self>;

    /// Encode the model as a JSON value.
    fn to_json(&self) -> Value;

    /// Try to decode the model from a JSON string.
    ///
    /// Returns `None` if the string isn't valid JSON or if
    /// [`JsonModel::from_json()`] rejects the value.
    fn from_json_str(json: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::from_json(&value),
            Err(error) => {
                trace!(%error, "Can't decode a model, the input isn't valid JSON");
                None
            }
        }
    }

    /// Try to decode the model from a [`Raw`] JSON value.
    fn from_raw<T>(raw: &Raw<T>) -> Option<Self> {
        let decoded = match raw.deserialize_as_unchecked::<Value>() {
            Ok(value) => Self::from_json(&value),
            Err(error) => {
                trace!(%error, "Can't read a raw JSON value");
                None
            }
        };

        if decoded.is_none() {
            debug!(raw = ?DebugRawRelation(raw), "Can't decode a model from a raw JSON value");
        }

        decoded
    }

    /// Try to decode the model from the `field` of the given JSON object.
    ///
    /// Returns `None` if `object` isn't a JSON object, if it doesn't have the
    /// field or if the field can't be decoded.
    fn from_json_field(object: &Value, field: &str) -> Option<Self> {
        object.get(field).and_then(Self::from_json)
    }
}

/// Get the given field of a JSON object if it's a string.
///
/// The string is copied out, the returned value doesn't borrow from `object`.
pub(crate) fn string_field(object: &Map<String, Value>, field: &str) -> Option<String> {
    match object.get(field)? {
        Value::String(s) => Some(s.clone()),
        other => {
            trace!(field, kind = ?JsonKind(other), "Ignoring a field that isn't a string");
            None
        }
    }
}

/// Get the given field of a JSON object if it's a non-empty string.
pub(crate) fn non_empty_string_field(object: &Map<String, Value>, field: &str) -> Option<String> {
    string_field(object, field).filter(|s| !s.is_empty())
}
