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

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{
    error::{RelationError, Result},
    json_model::{JsonModel, non_empty_string_field},
};

const EVENT_ID: &str = "event_id";

/// A reference to the event being replied to, the `m.in_reply_to` object of a
/// rich reply.
///
/// Fields other than the `event_id` are kept as they are, so a decoded
/// reference is re-encoded without losing data.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct InReplyTo {
    event_id: String,
    other: BTreeMap<String, Value>,
}

impl InReplyTo {
    /// Create a reference to the event with the given ID.
    ///
    /// Fails if `event_id` is empty.
    pub fn new(event_id: impl Into<String>) -> Result<Self> {
        let event_id = event_id.into();

        if event_id.is_empty() {
            return Err(RelationError::EmptyField(EVENT_ID));
        }

        Ok(Self { event_id, other: BTreeMap::new() })
    }

    /// The ID of the event being replied to.
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// The fields of the reference this crate doesn't model.
    pub fn other(&self) -> &BTreeMap<String, Value> {
        &self.other
    }
}

impl JsonModel for InReplyTo {
    fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let event_id = non_empty_string_field(object, EVENT_ID)?;

        let other = object
            .iter()
            .filter(|(name, _)| name.as_str() != EVENT_ID)
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Some(Self { event_id, other })
    }

    fn to_json(&self) -> Value {
        let mut object: Map<String, Value> =
            self.other.iter().map(|(name, value)| (name.clone(), value.clone())).collect();
        object.insert(EVENT_ID.to_owned(), Value::String(self.event_id.clone()));

        Value::Object(object)
    }
}

impl TryFrom<Map<String, Value>> for InReplyTo {
    type Error = RelationError;

    fn try_from(object: Map<String, Value>) -> Result<Self> {
        Self::from_json(&Value::Object(object)).ok_or(RelationError::InvalidField(EVENT_ID))
    }
}

impl Serialize for InReplyTo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}
