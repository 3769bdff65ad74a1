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

//! Error conditions.

use thiserror::Error;

/// Result type of this crate.
pub type Result<T, E = RelationError> = std::result::Result<T, E>;

/// Errors that can happen while building a relation.
///
/// Decoding untrusted content never produces one of these to the caller, a
/// malformed relation is reported as `None` instead.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// A required field was given an empty value.
    #[error("the `{0}` field of a relation must not be empty")]
    EmptyField(&'static str),

    /// A required field is missing or doesn't have the expected JSON type.
    #[error("the `{0}` field of a relation is missing or invalid")]
    InvalidField(&'static str),

    /// The JSON object contains neither a `rel_type`/`event_id` pair nor a
    /// valid `m.in_reply_to` reference.
    #[error("the content doesn't contain a relation")]
    NoRelation,
}
