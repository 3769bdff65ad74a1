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

use serde_json::Value;
use tracing::trace;

use crate::{RelatesTo, debug::JsonKind};

/// What to do with a `m.in_reply_to` reference found next to a
/// `rel_type`/`event_id` pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LegacyReplyPolicy {
    /// The `rel_type`/`event_id` pair wins and the reply reference is dropped.
    ///
    /// This is the default value.
    #[default]
    Drop,

    /// The `rel_type`/`event_id` pair still wins, but a valid reply reference
    /// is also kept and exposed through [`RelatesTo::in_reply_to()`].
    ///
    /// Threaded replies use this shape, an `m.thread` relation carrying the
    /// `m.in_reply_to` fallback for clients that don't support threads.
    Keep,
}

/// Settings for decoding `m.relates_to` content.
#[derive(Clone, Debug, Default)]
pub struct DecodingSettings {
    pub(crate) legacy_reply: LegacyReplyPolicy,
}

impl DecodingSettings {
    /// Create new default decoding settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set what happens to a reply reference that is present alongside a
    /// `rel_type`/`event_id` pair.
    ///
    /// # Arguments
    ///
    /// * `policy` - The policy to apply, [`LegacyReplyPolicy::Drop`] by
    ///   default.
    #[must_use]
    pub fn legacy_reply(mut self, policy: LegacyReplyPolicy) -> Self {
        self.legacy_reply = policy;
        self
    }

    /// Decode a relation from the given JSON value using these settings.
    ///
    /// Returns `None` if `value` isn't a JSON object or if it contains
    /// neither a `rel_type`/`event_id` pair nor a valid `m.in_reply_to`
    /// reference.
    pub fn decode(&self, value: &Value) -> Option<RelatesTo> {
        match value {
            Value::Object(object) => RelatesTo::decode_object(object, self),
            other => {
                trace!(kind = ?JsonKind(other), "Relation content isn't a JSON object");
                None
            }
        }
    }
}
