use serde::Serialize;

// Every numeric field below is kept as its literal decimal text, sign
// preserved. The source format has no schema; downstream consumers decide
// what, if anything, to coerce.

/// The `#AREA` header. Exactly one per document.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct AreaHeader {
    pub file: String,
    pub name: String,
    pub low_range: String,
    pub high_range: String,
    pub writer: String,
    pub credits: String,
    pub min_vnum: String,
    pub max_vnum: String,
}

/// Keyword-triggered text attached to a room or an object.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ExtraDescription {
    pub keyword: String,
    pub description: String,
}

/// One directional exit of a room. `door` is the raw direction tag
/// (`D0`..`D9`) as it appeared in the source.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Exit {
    pub door: String,
    pub description: String,
    pub keyword: String,
    pub locks: String,
    pub key: String,
    pub destination: String,
}

/// One game location from the `#ROOMS` section.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Room {
    pub vnum: String,
    pub name: String,
    pub description: String,
    pub flags: String,
    pub sector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heal_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mana_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub extra_descriptions: Vec<ExtraDescription>,
    pub exits: Vec<Exit>,
}

/// Object stat modifier. The variants correspond to the `A` and `F`
/// sub-block markers; the legacy object format only ever carries `A`.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectAffect {
    Location {
        location: String,
        modifier: String,
    },
    Flag {
        r#where: String,
        location: String,
        modifier: String,
        bitvector: String,
    },
}

/// One item definition in the current `#OBJECTS` format.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct GameObject {
    pub vnum: String,
    pub name: String,
    pub short_description: String,
    pub description: String,
    pub material: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub extra_flags: String,
    pub wear_flags: String,
    pub values: String,
    pub level: String,
    pub weight: String,
    pub cost: String,
    pub condition: String,
    pub affects: Vec<ObjectAffect>,
    pub extra_descriptions: Vec<ExtraDescription>,
}

/// An item definition in the older `#OBJOLD` format. Structurally distinct
/// from [`GameObject`]: no material, level, or condition columns.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct LegacyGameObject {
    pub vnum: String,
    pub name: String,
    pub short_description: String,
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub extra_flags: String,
    pub wear_flags: String,
    pub values: String,
    pub weight: String,
    pub cost: String,
    pub affects: Vec<ObjectAffect>,
    pub extra_descriptions: Vec<ExtraDescription>,
}

/// A flag-word affect carried by a mobile (`F` sub-block).
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct MobileAffect {
    pub word: String,
    pub flag: String,
}

/// One NPC definition in the current `#MOBILES` format.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Mobile {
    pub vnum: String,
    pub name: String,
    pub short_description: String,
    pub long_description: String,
    pub description: String,
    pub race: String,
    pub act: String,
    pub affected_by: String,
    pub alignment: String,
    pub group: String,
    pub level: String,
    pub hitroll: String,
    pub hit_dice: String,
    pub mana_dice: String,
    pub dam_dice: String,
    pub dam_type: String,
    pub ac_pierce: String,
    pub ac_bash: String,
    pub ac_slash: String,
    pub ac_exotic: String,
    pub off_flags: String,
    pub imm_flags: String,
    pub res_flags: String,
    pub vuln_flags: String,
    pub start_pos: String,
    pub default_pos: String,
    pub sex: String,
    pub wealth: String,
    pub form: String,
    pub parts: String,
    pub size: String,
    pub material: String,
    pub affects: Vec<MobileAffect>,
}

/// An NPC definition in the older `#MOBOLD` format. The legacy rows carry
/// no dice, armor, or material columns, and several of the columns they do
/// carry are discarded on read.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct LegacyMobile {
    pub vnum: String,
    pub name: String,
    pub short_description: String,
    pub long_description: String,
    pub description: String,
    pub act: String,
    pub affected_by: String,
    pub alignment: String,
    pub level: String,
    pub wealth: String,
    pub start_pos: String,
    pub default_pos: String,
    pub sex: String,
}

/// One world-population instruction from `#RESETS`. The argument count
/// depends on the command letter: `G`/`R` take two, `O`/`E`/`D` three,
/// `P`/`M` four. The legacy repeat-count column is discarded on read.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ResetCommand {
    pub command: String,
    pub args: Vec<String>,
}

/// Vendor configuration from `#SHOPS`.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ShopEntry {
    pub keeper: String,
    pub buy_types: Vec<String>,
    pub profit_buy: String,
    pub profit_sell: String,
    pub open_hour: String,
    pub close_hour: String,
}

/// Per-object spawn cap from `#OLIMITS`.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct OLimitEntry {
    pub vnum: String,
    pub limit: String,
}

/// A mobile bound to a trainable skill group, from `#PRACTICERS`.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct PractitionerEntry {
    pub vnum: String,
    pub skill_group: String,
}

/// A mobile bound to a special function, from `#SPECIALS`.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SpecialEntry {
    pub vnum: String,
    pub function: String,
}

/// An object or mobile bound to a scripted trigger, from `#OMPROGS`.
/// `target` is `M` or `O`.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ProgramEntry {
    pub target: String,
    pub vnum: String,
    pub prog_type: String,
    pub prog_name: String,
}

/// One help article from `#HELPS`.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct HelpEntry {
    pub level: String,
    pub keyword: String,
    pub text: String,
}
