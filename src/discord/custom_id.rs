// SPDX-License-Identifier: MIT

//! Component/modal custom-id codec.
//!
//! Every custom id is decoded once at the gateway boundary into a tagged
//! variant; handlers dispatch on the variant and never split strings.

use std::fmt;

/// Which edit modal a button or submission refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSection {
    Schedule,
    Locations,
    Details,
}

impl EditSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditSection::Schedule => "schedule",
            EditSection::Locations => "locations",
            EditSection::Details => "details",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "schedule" => Some(EditSection::Schedule),
            "locations" => Some(EditSection::Locations),
            "details" => Some(EditSection::Details),
            _ => None,
        }
    }

    /// Human label for modal titles.
    pub fn label(&self) -> &'static str {
        match self {
            EditSection::Schedule => "Date/Time",
            EditSection::Locations => "Location",
            EditSection::Details => "Details",
        }
    }
}

/// Decoded action descriptor carried in a component or modal custom id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomId {
    /// Edit-panel button opening a section modal.
    EditButton { ride_id: String, section: EditSection },
    /// Edit-panel cancel button.
    EditCancel { ride_id: String },
    /// Submission of a section edit modal.
    EditModal { ride_id: String, section: EditSection },
    /// Submission of the create-ride free-text location modal; carries the
    /// draft-session key.
    LocationModal { session_key: String },
}

const EDIT_BUTTON: &str = "ride-edit";
const EDIT_CANCEL: &str = "ride-edit-cancel";
const EDIT_MODAL: &str = "ride-edit-modal";
const LOCATION_MODAL: &str = "ride-location-modal";

impl CustomId {
    /// Decode a raw custom id. Unknown ids return `None` and are ignored
    /// upstream.
    pub fn parse(raw: &str) -> Option<CustomId> {
        let (prefix, rest) = raw.split_once(':')?;
        match prefix {
            EDIT_BUTTON => {
                let (ride_id, section) = rest.split_once(':')?;
                Some(CustomId::EditButton {
                    ride_id: ride_id.to_string(),
                    section: EditSection::parse(section)?,
                })
            }
            EDIT_CANCEL => Some(CustomId::EditCancel {
                ride_id: rest.to_string(),
            }),
            EDIT_MODAL => {
                let (ride_id, section) = rest.split_once(':')?;
                Some(CustomId::EditModal {
                    ride_id: ride_id.to_string(),
                    section: EditSection::parse(section)?,
                })
            }
            LOCATION_MODAL => Some(CustomId::LocationModal {
                session_key: rest.to_string(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for CustomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomId::EditButton { ride_id, section } => {
                write!(f, "{EDIT_BUTTON}:{ride_id}:{}", section.as_str())
            }
            CustomId::EditCancel { ride_id } => write!(f, "{EDIT_CANCEL}:{ride_id}"),
            CustomId::EditModal { ride_id, section } => {
                write!(f, "{EDIT_MODAL}:{ride_id}:{}", section.as_str())
            }
            CustomId::LocationModal { session_key } => {
                write!(f, "{LOCATION_MODAL}:{session_key}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_round_trips() {
        let ids = [
            CustomId::EditButton {
                ride_id: "abc123".to_string(),
                section: EditSection::Schedule,
            },
            CustomId::EditButton {
                ride_id: "abc123".to_string(),
                section: EditSection::Locations,
            },
            CustomId::EditModal {
                ride_id: "abc123".to_string(),
                section: EditSection::Details,
            },
            CustomId::EditCancel {
                ride_id: "abc123".to_string(),
            },
            CustomId::LocationModal {
                session_key: "42:9000".to_string(),
            },
        ];

        for id in ids {
            let encoded = id.to_string();
            assert_eq!(CustomId::parse(&encoded), Some(id), "{encoded}");
        }
    }

    #[test]
    fn unknown_ids_are_ignored() {
        assert_eq!(CustomId::parse("something-else:1"), None);
        assert_eq!(CustomId::parse("ride-edit:noseparator"), None);
        assert_eq!(CustomId::parse("ride-edit:abc:teleport"), None);
        assert_eq!(CustomId::parse(""), None);
    }
}
