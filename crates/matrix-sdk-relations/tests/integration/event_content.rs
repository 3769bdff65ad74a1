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

//! Relations embedded in the content of whole events.

use assert_matches2::assert_let;
use matrix_sdk_relations::{
    InReplyTo, JsonModel, RelatesTo, RelationError, RelationType, deserialize_lenient,
};
use ruma::serde::Raw;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use similar_asserts::assert_eq;

const RELATES_TO: &str = "m.relates_to";

/// A minimal `m.reaction` event content.
#[derive(Debug, Deserialize, Serialize)]
struct ReactionEventContent {
    #[serde(rename = "m.relates_to")]
    relates_to: RelatesTo,
}

/// A minimal `m.room.message` event content, where the relation is optional.
#[derive(Debug, Deserialize, Serialize)]
struct MessageEventContent {
    msgtype: String,
    body: String,
    #[serde(
        default,
        rename = "m.relates_to",
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    relates_to: Option<RelatesTo>,
}

fn reaction_content() -> Value {
    json!({
        "m.relates_to": {
            "rel_type": "m.annotation",
            "event_id": "$event1",
            "key": "👍",
        },
    })
}

#[test]
fn test_reaction_content() {
    let content = reaction_content();

    let relates_to = RelatesTo::from_json_field(&content, RELATES_TO).unwrap();
    assert_eq!(relates_to, RelatesTo::annotation("$event1", "👍").unwrap());

    let reaction: ReactionEventContent = serde_json::from_value(content.clone()).unwrap();
    assert_eq!(reaction.relates_to, relates_to);
    assert_eq!(serde_json::to_value(&reaction).unwrap(), content);
}

#[test]
fn test_reply_message_content() {
    let content = json!({
        "msgtype": "m.text",
        "body": "> <@alice:example.org> hello\n\nhi!",
        "m.relates_to": {
            "m.in_reply_to": { "event_id": "$event2" },
        },
    });

    let message: MessageEventContent = serde_json::from_value(content.clone()).unwrap();
    assert_let!(Some(relates_to) = &message.relates_to);
    assert_eq!(relates_to.relation_type(), None);
    assert_eq!(relates_to.in_reply_to(), Some(&InReplyTo::new("$event2").unwrap()));

    assert_eq!(serde_json::to_value(&message).unwrap(), content);
}

#[test]
fn test_edit_message_content() {
    let content = json!({
        "msgtype": "m.text",
        "body": "* hi!",
        "m.new_content": { "msgtype": "m.text", "body": "hi!" },
        "m.relates_to": { "rel_type": "m.replace", "event_id": "$event3" },
    });

    let relates_to = RelatesTo::from_json_field(&content, RELATES_TO).unwrap();

    assert!(relates_to.is_replacement());
    assert_eq!(relates_to.target_event_id(), "$event3");
}

#[test]
fn test_message_without_relation() {
    let content = json!({ "msgtype": "m.text", "body": "hello" });

    assert_eq!(RelatesTo::from_json_field(&content, RELATES_TO), None);

    let message: MessageEventContent = serde_json::from_value(content.clone()).unwrap();
    assert!(message.relates_to.is_none());
    assert_eq!(serde_json::to_value(&message).unwrap(), content);
}

#[test]
fn test_malformed_relation_in_content() {
    let content = json!({
        "msgtype": "m.text",
        "body": "hello",
        "m.relates_to": { "rel_type": "m.annotation", "event_id": 42 },
    });

    assert_eq!(RelatesTo::from_json_field(&content, RELATES_TO), None);

    // The message is still usable, it just has no relation.
    let message: MessageEventContent = serde_json::from_value(content.clone()).unwrap();
    assert_eq!(message.body, "hello");
    assert!(message.relates_to.is_none());

    // A reaction can't exist without its relation.
    let reaction = json!({ "m.relates_to": content[RELATES_TO].clone() });
    let error = serde_json::from_value::<ReactionEventContent>(reaction).unwrap_err();
    assert!(error.to_string().contains(&RelationError::InvalidField("event_id").to_string()));
}

#[test]
fn test_from_raw() {
    let raw = Raw::new(&reaction_content()[RELATES_TO]).unwrap();
    let relates_to = RelatesTo::from_raw(&raw).unwrap();
    assert_eq!(relates_to.relation_type(), Some(&RelationType::Annotation));
    assert_eq!(relates_to.key(), Some("👍"));

    let raw = Raw::new(&json!({ "rel_type": "m.annotation" })).unwrap();
    assert_eq!(RelatesTo::from_raw(&raw), None);

    let raw = Raw::new(&json!("not an object")).unwrap();
    assert_eq!(RelatesTo::from_raw(&raw), None);
}

#[test]
fn test_from_json_str() {
    let relates_to =
        RelatesTo::from_json_str(r#"{ "rel_type": "m.future_kind", "event_id": "$xyz" }"#)
            .unwrap();
    assert_eq!(relates_to.relation_type().map(RelationType::as_str), Some("m.future_kind"));

    assert_eq!(RelatesTo::from_json_str("{ not json"), None);
    assert_eq!(RelatesTo::from_json_str(""), None);
}
