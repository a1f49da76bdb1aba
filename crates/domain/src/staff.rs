// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff identity normalization.
//!
//! Preferred staff references arrive either as a bare identifier string or
//! as a structured `{staffId, fullName}` object. Both shapes are resolved
//! here, once, into a canonical [`StaffId`]: trimmed and lower-cased.
//!
//! ## Invariants
//!
//! - Normalization is idempotent: `normalize(normalize(x)) == normalize(x)`
//! - Normalization is total: unrecognized shapes normalize to `None`
//! - Two references compare equal iff their normalized forms are equal

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// The canonical identity of a staff member.
///
/// Constructing a `StaffId` applies the same normalization as
/// [`normalize_staff_ref`], so ids from the reference lists and ids from
/// task records compare directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(String);

impl StaffId {
    /// Creates a canonical staff id.
    ///
    /// Returns `None` if the value is empty after trimming.
    #[must_use]
    pub fn new(value: &str) -> Option<Self> {
        let canonical: String = value.trim().to_lowercase();
        if canonical.is_empty() {
            None
        } else {
            Some(Self(canonical))
        }
    }

    /// Returns the canonical identity.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StaffId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A preferred staff reference as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StaffRef {
    /// A bare staff identifier.
    PlainId(String),
    /// A structured reference carrying an id and a display name.
    Structured {
        /// The staff identifier, if present.
        #[serde(rename = "staffId", default, skip_serializing_if = "Option::is_none")]
        staff_id: Option<String>,
        /// The staff member's full name, if present.
        #[serde(rename = "fullName", default, skip_serializing_if = "Option::is_none")]
        full_name: Option<String>,
    },
    /// Any other shape. Retained for diagnostics; normalizes to `None`.
    Unrecognized(serde_json::Value),
}

impl StaffRef {
    /// Creates a plain-id reference.
    #[must_use]
    pub fn plain(id: &str) -> Self {
        Self::PlainId(id.to_string())
    }

    /// Creates a structured reference.
    #[must_use]
    pub fn structured(staff_id: Option<&str>, full_name: Option<&str>) -> Self {
        Self::Structured {
            staff_id: staff_id.map(str::to_string),
            full_name: full_name.map(str::to_string),
        }
    }

    /// Returns the canonical identity of this reference.
    #[must_use]
    pub fn normalize(&self) -> Option<StaffId> {
        match self {
            Self::PlainId(id) => StaffId::new(id),
            Self::Structured {
                staff_id,
                full_name,
            } => staff_id
                .as_deref()
                .and_then(StaffId::new)
                .or_else(|| full_name.as_deref().and_then(StaffId::new)),
            Self::Unrecognized(_) => None,
        }
    }

    /// Returns whether this reference is present but cannot be resolved.
    ///
    /// A blank plain id is treated as "unassigned", not as unresolvable.
    #[must_use]
    pub fn is_unresolvable(&self) -> bool {
        match self {
            Self::PlainId(_) => false,
            Self::Structured { .. } => self.normalize().is_none(),
            Self::Unrecognized(_) => true,
        }
    }
}

// Hashes the raw shape. `serde_json::Value` has no `Hash`, so unrecognized
// shapes hash their serialized text, which is canonical for equal values.
impl Hash for StaffRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::PlainId(id) => id.hash(state),
            Self::Structured {
                staff_id,
                full_name,
            } => {
                staff_id.hash(state);
                full_name.hash(state);
            }
            Self::Unrecognized(value) => value.to_string().hash(state),
        }
    }
}

impl From<StaffId> for StaffRef {
    fn from(id: StaffId) -> Self {
        Self::PlainId(id.0)
    }
}

/// Normalizes an optional staff reference.
///
/// A missing reference, an empty identifier, and an unrecognized shape all
/// normalize to `None` (unassigned).
#[must_use]
pub fn normalize_staff_ref(staff_ref: Option<&StaffRef>) -> Option<StaffId> {
    staff_ref.and_then(StaffRef::normalize)
}

/// Compares two optional staff references by canonical identity.
#[must_use]
pub fn staff_refs_match(a: Option<&StaffRef>, b: Option<&StaffRef>) -> bool {
    normalize_staff_ref(a) == normalize_staff_ref(b)
}
