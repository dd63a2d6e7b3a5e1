use crate::records::*;
use serde::Serialize;

/// The assembled output of one parse: every section of the area file under
/// a stable key. Sections absent from the input stay `None` and are skipped
/// during serialization; a section tag appearing more than once merges its
/// records in append order. The document is built once per input file and
/// not mutated afterwards.
#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct AreaDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<Vec<Room>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects: Option<Vec<GameObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_objects: Option<Vec<LegacyGameObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobiles: Option<Vec<Mobile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_mobiles: Option<Vec<LegacyMobile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resets: Option<Vec<ResetCommand>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shops: Option<Vec<ShopEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub olimits: Option<Vec<OLimitEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practicers: Option<Vec<PractitionerEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specials: Option<Vec<SpecialEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omprogs: Option<Vec<ProgramEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helps: Option<Vec<HelpEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_reset_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_flag: Option<String>,
}

impl AreaDocument {
    /// Serializes the document into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the document into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
