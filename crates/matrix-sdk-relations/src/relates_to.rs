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

//! The `m.relates_to` descriptor of an event content.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{
    DecodingSettings, InReplyTo, JsonModel, LegacyReplyPolicy, RelationType,
    error::{RelationError, Result},
    json_model::{non_empty_string_field, string_field},
};

const REL_TYPE: &str = "rel_type";
const EVENT_ID: &str = "event_id";
const KEY: &str = "key";
const IN_REPLY_TO: &str = "m.in_reply_to";

/// The relation of an event to another event, the `m.relates_to` field of an
/// event content.
///
/// A relation has one of two shapes:
///
/// * a `rel_type`/`event_id` pair, with an optional aggregation `key` for
///   annotations (reactions),
/// * a legacy rich reply, which only nests an `m.in_reply_to` reference.
///
/// A `RelatesTo` is immutable. It is either decoded from untrusted JSON with
/// [`JsonModel::from_json()`] or [`DecodingSettings::decode()`], or built
/// with one of the constructors when composing an event.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct RelatesTo {
    shape: Shape,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Shape {
    Relation {
        relation_type: RelationType,
        event_id: String,
        key: Option<String>,
        /// Only set when built as a thread reply, or decoded with
        /// [`LegacyReplyPolicy::Keep`].
        in_reply_to: Option<InReplyTo>,
    },
    Reply(InReplyTo),
}

impl RelatesTo {
    /// Create a relation of the given type to the event with the given ID.
    ///
    /// Fails if the relation type or the event ID is empty.
    pub fn new(
        relation_type: impl Into<RelationType>,
        event_id: impl Into<String>,
    ) -> Result<Self> {
        Self::with_key(relation_type, event_id, None)
    }

    /// Create a relation of the given type to the event with the given ID,
    /// with an optional aggregation key.
    ///
    /// The key is only meaningful for [`RelationType::Annotation`] relations,
    /// but this is not enforced.
    ///
    /// Fails if the relation type or the event ID is empty.
    pub fn with_key(
        relation_type: impl Into<RelationType>,
        event_id: impl Into<String>,
        key: Option<String>,
    ) -> Result<Self> {
        let relation_type = relation_type.into();
        let event_id = event_id.into();

        if relation_type.as_str().is_empty() {
            return Err(RelationError::EmptyField(REL_TYPE));
        }

        if event_id.is_empty() {
            return Err(RelationError::EmptyField(EVENT_ID));
        }

        Ok(Self { shape: Shape::Relation { relation_type, event_id, key, in_reply_to: None } })
    }

    /// Create an `m.annotation` relation, a reaction with the given key to
    /// the event with the given ID.
    pub fn annotation(event_id: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        Self::with_key(RelationType::Annotation, event_id, Some(key.into()))
    }

    /// Create an `m.reference` relation to the event with the given ID.
    pub fn reference(event_id: impl Into<String>) -> Result<Self> {
        Self::new(RelationType::Reference, event_id)
    }

    /// Create an `m.replace` relation, an edit of the event with the given ID.
    pub fn replacement(event_id: impl Into<String>) -> Result<Self> {
        Self::new(RelationType::Replacement, event_id)
    }

    /// Create an `m.thread` relation to the thread root with the given ID.
    ///
    /// `in_reply_to` is the rich reply fallback for clients that don't
    /// support threads. It is only decoded back with
    /// [`LegacyReplyPolicy::Keep`].
    pub fn thread(event_id: impl Into<String>, in_reply_to: Option<InReplyTo>) -> Result<Self> {
        let event_id = event_id.into();

        if event_id.is_empty() {
            return Err(RelationError::EmptyField(EVENT_ID));
        }

        Ok(Self {
            shape: Shape::Relation {
                relation_type: RelationType::Thread,
                event_id,
                key: None,
                in_reply_to,
            },
        })
    }

    /// Create a legacy rich reply relation.
    pub fn reply(in_reply_to: InReplyTo) -> Self {
        Self { shape: Shape::Reply(in_reply_to) }
    }

    /// The type of the relation, `None` for a legacy rich reply.
    pub fn relation_type(&self) -> Option<&RelationType> {
        match &self.shape {
            Shape::Relation { relation_type, .. } => Some(relation_type),
            Shape::Reply(_) => None,
        }
    }

    /// The ID of the related event, `None` for a legacy rich reply.
    ///
    /// See [`RelatesTo::target_event_id()`] to get the related event for both
    /// shapes.
    pub fn event_id(&self) -> Option<&str> {
        match &self.shape {
            Shape::Relation { event_id, .. } => Some(event_id),
            Shape::Reply(_) => None,
        }
    }

    /// The aggregation key of the relation, if any.
    pub fn key(&self) -> Option<&str> {
        match &self.shape {
            Shape::Relation { key, .. } => key.as_deref(),
            Shape::Reply(_) => None,
        }
    }

    /// The reply reference of the relation, if any.
    pub fn in_reply_to(&self) -> Option<&InReplyTo> {
        match &self.shape {
            Shape::Relation { in_reply_to, .. } => in_reply_to.as_ref(),
            Shape::Reply(in_reply_to) => Some(in_reply_to),
        }
    }

    /// The ID of the event this relation points to.
    ///
    /// This is the `event_id` of a `rel_type`/`event_id` relation, or the
    /// event ID of the reply reference of a legacy rich reply.
    pub fn target_event_id(&self) -> &str {
        match &self.shape {
            Shape::Relation { event_id, .. } => event_id,
            Shape::Reply(in_reply_to) => in_reply_to.event_id(),
        }
    }

    /// Is this a rich reply, either a legacy one or a relation carrying a
    /// reply reference?
    pub fn is_reply(&self) -> bool {
        self.in_reply_to().is_some()
    }

    /// Is this an `m.annotation` relation?
    pub fn is_annotation(&self) -> bool {
        self.relation_type().is_some_and(RelationType::is_annotation)
    }

    /// Is this an `m.replace` relation?
    pub fn is_replacement(&self) -> bool {
        matches!(self.relation_type(), Some(RelationType::Replacement))
    }

    pub(crate) fn decode_object(
        object: &Map<String, Value>,
        settings: &DecodingSettings,
    ) -> Option<Self> {
        let relation_type = non_empty_string_field(object, REL_TYPE);
        let event_id = non_empty_string_field(object, EVENT_ID);

        if let (Some(relation_type), Some(event_id)) = (relation_type, event_id) {
            let key = string_field(object, KEY);

            let in_reply_to = match settings.legacy_reply {
                LegacyReplyPolicy::Keep => object.get(IN_REPLY_TO).and_then(InReplyTo::from_json),
                LegacyReplyPolicy::Drop => {
                    if object.contains_key(IN_REPLY_TO) {
                        debug!(
                            rel_type = relation_type.as_str(),
                            "Dropping the reply reference of a relation that has a `rel_type`"
                        );
                    }

                    None
                }
            };

            return Some(Self {
                shape: Shape::Relation {
                    relation_type: relation_type.into(),
                    event_id,
                    key,
                    in_reply_to,
                },
            });
        }

        match object.get(IN_REPLY_TO).and_then(InReplyTo::from_json) {
            Some(in_reply_to) => Some(Self::reply(in_reply_to)),
            None => {
                trace!("The content contains neither a `rel_type`/`event_id` pair nor a reply");
                None
            }
        }
    }

    /// The error to report for an object that [`RelatesTo::decode_object()`]
    /// rejected, naming the first unusable field when there is one.
    fn decoding_error(object: &Map<String, Value>) -> RelationError {
        if object.contains_key(REL_TYPE) || object.contains_key(EVENT_ID) {
            [REL_TYPE, EVENT_ID]
                .into_iter()
                .find(|field| non_empty_string_field(object, field).is_none())
                .map_or(RelationError::NoRelation, RelationError::InvalidField)
        } else if object.contains_key(IN_REPLY_TO) {
            RelationError::InvalidField(IN_REPLY_TO)
        } else {
            RelationError::NoRelation
        }
    }
}

/// Deserialize an optional `m.relates_to` field without failing on a
/// malformed relation.
///
/// Unlike the [`Deserialize`] implementation of [`RelatesTo`], an undecodable
/// relation becomes `None`, so the rest of the event content is still
/// usable. Use it with `#[serde(default, deserialize_with = "...")]`.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<RelatesTo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(RelatesTo::from_json))
}

impl From<InReplyTo> for RelatesTo {
    fn from(in_reply_to: InReplyTo) -> Self {
        Self::reply(in_reply_to)
    }
}

impl JsonModel for RelatesTo {
    fn from_json(value: &Value) -> Option<Self> {
        DecodingSettings::default().decode(value)
    }

    fn to_json(&self) -> Value {
        let mut object = Map::new();

        match &self.shape {
            Shape::Relation { relation_type, event_id, key, in_reply_to } => {
                object.insert(REL_TYPE.to_owned(), relation_type.as_str().into());
                object.insert(EVENT_ID.to_owned(), event_id.as_str().into());

                if let Some(key) = key {
                    object.insert(KEY.to_owned(), key.as_str().into());
                }

                if let Some(in_reply_to) = in_reply_to {
                    object.insert(IN_REPLY_TO.to_owned(), in_reply_to.to_json());
                }
            }
            Shape::Reply(in_reply_to) => {
                object.insert(IN_REPLY_TO.to_owned(), in_reply_to.to_json());
            }
        }

        Value::Object(object)
    }
}

impl TryFrom<Map<String, Value>> for RelatesTo {
    type Error = RelationError;

    fn try_from(object: Map<String, Value>) -> Result<Self> {
        Self::decode_object(&object, &DecodingSettings::default())
            .ok_or_else(|| Self::decoding_error(&object))
    }
}

impl Serialize for RelatesTo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}
