use crate::document::AreaDocument;
use crate::error::{AreaError, ParserError};
use crate::records::*;
use crate::scanner::{ScanError, ScanErrorKind, Scanner};
use miette::NamedSource;
use std::sync::Arc;

/// A recursive descent parser over one area file. Each `#SECTION` grammar
/// is its own method; [`Parser::parse_document`] is the dispatcher that
/// routes tags to them until the `#$` terminator.
///
/// All state lives in this struct. Nothing is shared between parses, so
/// independent files can be parsed concurrently with one `Parser` each.
pub struct Parser<'a> {
    source: Arc<NamedSource<String>>,
    scanner: Scanner<'a>,
    source_text: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Self {
        Self::new_with_name(source_text, "source.are".to_string())
    }

    pub fn new_with_name(source_text: &'a str, name: String) -> Self {
        let source = Arc::new(NamedSource::new(name, source_text.to_string()));
        Self {
            source,
            scanner: Scanner::new(source_text),
            source_text,
        }
    }

    // === Section Dispatcher ===

    /// Reads section tags and dispatches to the matching section parser
    /// until `#$`. Sections may appear in any order; a repeated list-type
    /// section appends to what earlier occurrences produced.
    pub fn parse_document(&mut self) -> Result<AreaDocument, AreaError> {
        let mut document = AreaDocument::default();
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() {
                return Err(self.err_missing_terminator("document", "#$"));
            }
            let tag_start = self.scanner.position();
            if self.scanner.eat("#$") {
                break;
            }
            if !self.scanner.eat("#") {
                return Err(self.err_unknown_tag(tag_start));
            }
            let tag = match self.scanner.read_flag_word("") {
                Ok(word) => word.to_string(),
                Err(_) => return Err(self.err_unknown_tag(tag_start)),
            };
            match tag.as_str() {
                "AREA" => document.area = Some(self.parse_area_header()?),
                "ROOMS" => {
                    let rooms = self.parse_rooms()?;
                    document.rooms.get_or_insert_with(Vec::new).extend(rooms);
                }
                "OBJECTS" => {
                    let objects = self.parse_objects()?;
                    document.objects.get_or_insert_with(Vec::new).extend(objects);
                }
                "OBJOLD" => {
                    let objects = self.parse_old_objects()?;
                    document
                        .old_objects
                        .get_or_insert_with(Vec::new)
                        .extend(objects);
                }
                "MOBILES" => {
                    let mobiles = self.parse_mobiles()?;
                    document.mobiles.get_or_insert_with(Vec::new).extend(mobiles);
                }
                "MOBOLD" => {
                    let mobiles = self.parse_old_mobiles()?;
                    document
                        .old_mobiles
                        .get_or_insert_with(Vec::new)
                        .extend(mobiles);
                }
                "RESETS" => {
                    let resets = self.parse_resets()?;
                    document.resets.get_or_insert_with(Vec::new).extend(resets);
                }
                "SHOPS" => {
                    let shops = self.parse_shops()?;
                    document.shops.get_or_insert_with(Vec::new).extend(shops);
                }
                "OLIMITS" => {
                    let olimits = self.parse_olimits()?;
                    document.olimits.get_or_insert_with(Vec::new).extend(olimits);
                }
                "PRACTICERS" => {
                    let practicers = self.parse_practicers()?;
                    document
                        .practicers
                        .get_or_insert_with(Vec::new)
                        .extend(practicers);
                }
                "SPECIALS" => {
                    let specials = self.parse_specials()?;
                    document
                        .specials
                        .get_or_insert_with(Vec::new)
                        .extend(specials);
                }
                "OMPROGS" => {
                    let omprogs = self.parse_omprogs()?;
                    document.omprogs.get_or_insert_with(Vec::new).extend(omprogs);
                }
                "HELPS" => {
                    let helps = self.parse_helps()?;
                    document.helps.get_or_insert_with(Vec::new).extend(helps);
                }
                "RESETMESSAGE" => {
                    document.area_reset_message = Some(self.tilde_string()?);
                }
                "FLAG" => {
                    document.area_flag = Some(self.flag_word("", "an area flag word")?);
                }
                _ => return Err(self.err_unknown_tag_named(tag_start, tag)),
            }
        }
        Ok(document)
    }

    // === Record Parsers ===

    /// `#AREA`: file, name, `{ low high }` vnum range, writer, credits,
    /// min/max vnum.
    fn parse_area_header(&mut self) -> Result<AreaHeader, AreaError> {
        let file = self.tilde_string()?;
        self.scanner.skip_rest_of_line();
        let name = self.tilde_string()?;
        self.scanner.skip_rest_of_line();
        self.expect_literal("{")?;
        let low_range = self.integer("the low end of the vnum range")?;
        let high_range = self.integer("the high end of the vnum range")?;
        self.expect_literal("}")?;
        let writer = self.flag_word("", "the writer's name")?;
        let credits = self.tilde_string()?;
        self.scanner.skip_rest_of_line();
        let min_vnum = self.integer("the minimum vnum")?;
        let max_vnum = self.integer("the maximum vnum")?;
        self.scanner.skip_rest_of_line();
        Ok(AreaHeader {
            file,
            name,
            low_range,
            high_range,
            writer,
            credits,
            min_vnum,
            max_vnum,
        })
    }

    fn parse_rooms(&mut self) -> Result<Vec<Room>, AreaError> {
        let mut rooms = Vec::new();
        while let Some(vnum) = self.record_vnum("ROOMS")? {
            let name = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let description = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            // Unused area-number column kept in the format for history.
            let _ = self.integer("the ignored room area column")?;
            let flags = self.flag_word("|-", "the room flag vector")?;
            let sector = self.integer("the sector type")?;
            self.scanner.skip_rest_of_line();
            let mut room = Room {
                vnum,
                name,
                description,
                flags,
                sector,
                heal_rate: None,
                mana_rate: None,
                owner: None,
                extra_descriptions: Vec::new(),
                exits: Vec::new(),
            };
            self.collect_room_blocks(&mut room)?;
            // The collector stops at the continuation marker; the record
            // parser owns consuming it.
            self.scanner.skip_whitespace();
            self.scanner.eat("S");
            rooms.push(room);
        }
        Ok(rooms)
    }

    /// Optional-block run for a room. Markers are dispatched in the order
    /// H, M, O, E, D<digit>; `S` ends the run and is left unconsumed.
    fn collect_room_blocks(&mut self, room: &mut Room) -> Result<(), AreaError> {
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() {
                return Err(self.err_missing_terminator("ROOMS", "S"));
            }
            let marker_start = self.scanner.position();
            match self.scanner.peek() {
                Some('H') => {
                    self.scanner.advance();
                    room.heal_rate = Some(self.integer("a heal rate")?);
                }
                Some('M') => {
                    self.scanner.advance();
                    room.mana_rate = Some(self.integer("a mana rate")?);
                }
                Some('O') => {
                    self.scanner.advance();
                    room.owner = Some(self.tilde_string()?);
                }
                Some('E') => {
                    self.scanner.advance();
                    room.extra_descriptions.push(self.parse_extra_description()?);
                }
                Some('D') => room.exits.push(self.parse_exit()?),
                Some('S') => return Ok(()),
                _ => {
                    return Err(
                        self.err_unexpected_marker(marker_start, "H, M, O, E, D<digit>, or S")
                    )
                }
            }
        }
    }

    fn parse_extra_description(&mut self) -> Result<ExtraDescription, AreaError> {
        let keyword = self.tilde_string()?;
        let description = self.tilde_string()?;
        Ok(ExtraDescription {
            keyword,
            description,
        })
    }

    fn parse_exit(&mut self) -> Result<Exit, AreaError> {
        self.scanner.advance(); // the 'D'
        let direction = self.integer("an exit direction digit")?;
        let description = self.tilde_string()?;
        let keyword = self.tilde_string()?;
        let locks = self.integer("the exit lock flags")?;
        let key = self.integer("the exit key vnum")?;
        let destination = self.integer("the exit destination vnum")?;
        Ok(Exit {
            door: format!("D{direction}"),
            description,
            keyword,
            locks,
            key,
            destination,
        })
    }

    fn parse_objects(&mut self) -> Result<Vec<GameObject>, AreaError> {
        let mut objects = Vec::new();
        while let Some(vnum) = self.record_vnum("OBJECTS")? {
            let name = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let short_description = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let description = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let material = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let item_type = self.flag_word("_-", "the object type")?;
            let extra_flags = self.flag_word("|", "the extra flag vector")?;
            let wear_flags = self.flag_word("|", "the wear flag vector")?;
            self.scanner.skip_rest_of_line();
            // The value columns form one whole-line token: spaces and
            // quoted skill names are part of the field.
            let values = self.flag_word(" '-", "the object value columns")?;
            let level = self.integer("the object level")?;
            let weight = self.integer("the object weight")?;
            let cost = self.integer("the object cost")?;
            let condition = self.flag_word("", "the object condition")?;
            self.scanner.skip_rest_of_line();
            let mut object = GameObject {
                vnum,
                name,
                short_description,
                description,
                material,
                item_type,
                extra_flags,
                wear_flags,
                values,
                level,
                weight,
                cost,
                condition,
                affects: Vec::new(),
                extra_descriptions: Vec::new(),
            };
            self.collect_object_blocks(
                &mut object.affects,
                &mut object.extra_descriptions,
                true,
                "OBJECTS",
            )?;
            objects.push(object);
        }
        Ok(objects)
    }

    fn parse_old_objects(&mut self) -> Result<Vec<LegacyGameObject>, AreaError> {
        let mut objects = Vec::new();
        while let Some(vnum) = self.record_vnum("OBJOLD")? {
            let name = self.tilde_string()?;
            let short_description = self.tilde_string()?;
            let description = self.tilde_string()?;
            let _ = self.tilde_string()?; // action description, discarded
            let item_type = self.flag_word("", "the object type")?;
            let extra_flags = self.flag_word("|", "the extra flag vector")?;
            let wear_flags = self.flag_word("|", "the wear flag vector")?;
            let values = self.flag_word(" '-", "the object value columns")?;
            let weight = self.integer("the object weight")?;
            let cost = self.integer("the object cost")?;
            let _ = self.integer("the ignored rent column")?;
            let mut affects = Vec::new();
            let mut extra_descriptions = Vec::new();
            // Legacy objects know only the A and E block kinds.
            self.collect_object_blocks(&mut affects, &mut extra_descriptions, false, "OBJOLD")?;
            objects.push(LegacyGameObject {
                vnum,
                name,
                short_description,
                description,
                item_type,
                extra_flags,
                wear_flags,
                values,
                weight,
                cost,
                affects,
                extra_descriptions,
            });
        }
        Ok(objects)
    }

    /// Optional-block run for an object record. Markers in priority order
    /// A, F, E (`F` only in the current format); the run ends at the `#`
    /// that opens the next record or the `#0` sentinel, left unconsumed.
    fn collect_object_blocks(
        &mut self,
        affects: &mut Vec<ObjectAffect>,
        extra_descriptions: &mut Vec<ExtraDescription>,
        allow_flag_affects: bool,
        section: &str,
    ) -> Result<(), AreaError> {
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() {
                return Err(self.err_missing_terminator(section, "#0"));
            }
            let marker_start = self.scanner.position();
            match self.scanner.peek() {
                Some('A') => {
                    self.scanner.advance();
                    let location = self.integer("an affect location")?;
                    let modifier = self.integer("an affect modifier")?;
                    affects.push(ObjectAffect::Location { location, modifier });
                }
                Some('F') if allow_flag_affects => {
                    self.scanner.advance();
                    let r#where = self.flag_word("", "an affect target word")?;
                    let location = self.integer("an affect location")?;
                    let modifier = self.integer("an affect modifier")?;
                    let bitvector = self.flag_word("", "an affect bitvector")?;
                    affects.push(ObjectAffect::Flag {
                        r#where,
                        location,
                        modifier,
                        bitvector,
                    });
                }
                Some('E') => {
                    self.scanner.advance();
                    extra_descriptions.push(self.parse_extra_description()?);
                }
                Some('#') => return Ok(()),
                _ => {
                    let expected = if allow_flag_affects {
                        "A, F, E, or the next '#' record"
                    } else {
                        "A, E, or the next '#' record"
                    };
                    return Err(self.err_unexpected_marker(marker_start, expected));
                }
            }
        }
    }

    fn parse_mobiles(&mut self) -> Result<Vec<Mobile>, AreaError> {
        let mut mobiles = Vec::new();
        while let Some(vnum) = self.record_vnum("MOBILES")? {
            let name = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let short_description = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let long_description = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let description = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let race = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let act = self.flag_word("|", "the act flag vector")?;
            let affected_by = self.flag_word("|", "the affected-by flag vector")?;
            let alignment = self.integer("the alignment")?;
            let group = self.integer("the mobile group")?;
            self.scanner.skip_rest_of_line();
            let level = self.integer("the mobile level")?;
            let hitroll = self.integer("the hitroll")?;
            let hit_dice = self.flag_word("+", "the hit dice expression")?;
            let mana_dice = self.flag_word("+", "the mana dice expression")?;
            let dam_dice = self.flag_word("+", "the damage dice expression")?;
            let dam_type = self.flag_word("", "the damage type")?;
            self.scanner.skip_rest_of_line();
            let ac_pierce = self.integer("the pierce armor class")?;
            let ac_bash = self.integer("the bash armor class")?;
            let ac_slash = self.integer("the slash armor class")?;
            let ac_exotic = self.integer("the exotic armor class")?;
            self.scanner.skip_rest_of_line();
            let off_flags = self.flag_word("", "the offensive flag word")?;
            let imm_flags = self.flag_word("", "the immunity flag word")?;
            let res_flags = self.flag_word("", "the resistance flag word")?;
            let vuln_flags = self.flag_word("", "the vulnerability flag word")?;
            self.scanner.skip_rest_of_line();
            let start_pos = self.flag_word("", "the starting position")?;
            let default_pos = self.flag_word("", "the default position")?;
            let sex = self.flag_word("", "the sex word")?;
            let wealth = self.integer("the wealth")?;
            self.scanner.skip_rest_of_line();
            let form = self.flag_word("", "the form flag word")?;
            let parts = self.flag_word("", "the parts flag word")?;
            let size = self.flag_word("", "the size word")?;
            let material = self.flag_word("", "the material word")?;
            self.scanner.skip_rest_of_line();
            let mut affects = Vec::new();
            self.collect_mobile_blocks(&mut affects)?;
            mobiles.push(Mobile {
                vnum,
                name,
                short_description,
                long_description,
                description,
                race,
                act,
                affected_by,
                alignment,
                group,
                level,
                hitroll,
                hit_dice,
                mana_dice,
                dam_dice,
                dam_type,
                ac_pierce,
                ac_bash,
                ac_slash,
                ac_exotic,
                off_flags,
                imm_flags,
                res_flags,
                vuln_flags,
                start_pos,
                default_pos,
                sex,
                wealth,
                form,
                parts,
                size,
                material,
                affects,
            });
        }
        Ok(mobiles)
    }

    /// Optional-block run for a mobile record: only `F` flag-affects; the
    /// next `#` ends the run.
    fn collect_mobile_blocks(&mut self, affects: &mut Vec<MobileAffect>) -> Result<(), AreaError> {
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() {
                return Err(self.err_missing_terminator("MOBILES", "#0"));
            }
            let marker_start = self.scanner.position();
            match self.scanner.peek() {
                Some('F') => {
                    self.scanner.advance();
                    let word = self.flag_word("", "an affect word")?;
                    let flag = self.flag_word("", "an affect flag")?;
                    affects.push(MobileAffect { word, flag });
                }
                Some('#') => return Ok(()),
                _ => {
                    return Err(self.err_unexpected_marker(marker_start, "F or the next '#' record"))
                }
            }
        }
    }

    fn parse_old_mobiles(&mut self) -> Result<Vec<LegacyMobile>, AreaError> {
        let mut mobiles = Vec::new();
        while let Some(vnum) = self.record_vnum("MOBOLD")? {
            let name = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let short_description = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let long_description = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let description = self.tilde_string()?;
            self.scanner.skip_rest_of_line();
            let act = self.flag_word("|", "the act flag vector")?;
            let affected_by = self.flag_word("|", "the affected-by flag vector")?;
            let alignment = self.integer("the alignment")?;
            let _ = self.flag_word("", "the ignored class column")?;
            self.scanner.skip_rest_of_line();
            let level = self.integer("the mobile level")?;
            let _ = self.integer("the ignored hitroll column")?;
            let _ = self.integer("the ignored armor column")?;
            let _ = self.flag_word("+", "the ignored hit dice column")?;
            let _ = self.flag_word("+", "the ignored damage dice column")?;
            self.scanner.skip_rest_of_line();
            let wealth = self.integer("the wealth")?;
            let _ = self.integer("the ignored experience column")?;
            self.scanner.skip_rest_of_line();
            let start_pos = self.integer("the starting position")?;
            let default_pos = self.integer("the default position")?;
            let sex = self.integer("the sex")?;
            self.scanner.skip_rest_of_line();
            mobiles.push(LegacyMobile {
                vnum,
                name,
                short_description,
                long_description,
                description,
                act,
                affected_by,
                alignment,
                level,
                wealth,
                start_pos,
                default_pos,
                sex,
            });
        }
        Ok(mobiles)
    }

    fn parse_resets(&mut self) -> Result<Vec<ResetCommand>, AreaError> {
        let mut resets = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() {
                return Err(self.err_missing_terminator("RESETS", "S"));
            }
            let marker_start = self.scanner.position();
            match self.scanner.peek() {
                Some('*') => self.scanner.skip_rest_of_line(),
                Some('S') => {
                    self.scanner.advance();
                    break;
                }
                Some(command @ ('G' | 'R' | 'O' | 'E' | 'D' | 'P' | 'M')) => {
                    self.scanner.advance();
                    // Legacy repeat-count column, discarded unconditionally.
                    let _ = self.integer("the unused reset repeat count")?;
                    let arity = match command {
                        'G' | 'R' => 2,
                        'O' | 'E' | 'D' => 3,
                        _ => 4,
                    };
                    let mut args = Vec::with_capacity(arity);
                    for _ in 0..arity {
                        args.push(self.integer("a reset argument")?);
                    }
                    self.scanner.skip_rest_of_line();
                    resets.push(ResetCommand {
                        command: command.to_string(),
                        args,
                    });
                }
                _ => {
                    return Err(
                        self.err_unexpected_marker(marker_start, "G, R, O, E, D, P, M, '*', or S")
                    )
                }
            }
        }
        Ok(resets)
    }

    fn parse_shops(&mut self) -> Result<Vec<ShopEntry>, AreaError> {
        let mut shops = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() {
                return Err(self.err_missing_terminator("SHOPS", "0"));
            }
            let keeper = self.integer("a shop keeper vnum or the '0' sentinel")?;
            if keeper == "0" {
                break;
            }
            let mut buy_types = Vec::with_capacity(5);
            for _ in 0..5 {
                buy_types.push(self.integer("a shop buy type")?);
            }
            let profit_buy = self.integer("the buy profit margin")?;
            let profit_sell = self.integer("the sell profit margin")?;
            let open_hour = self.integer("the opening hour")?;
            let close_hour = self.integer("the closing hour")?;
            self.scanner.skip_rest_of_line();
            shops.push(ShopEntry {
                keeper,
                buy_types,
                profit_buy,
                profit_sell,
                open_hour,
                close_hour,
            });
        }
        Ok(shops)
    }

    fn parse_olimits(&mut self) -> Result<Vec<OLimitEntry>, AreaError> {
        let mut olimits = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() {
                return Err(self.err_missing_terminator("OLIMITS", "S"));
            }
            let marker_start = self.scanner.position();
            match self.scanner.peek() {
                Some('S') => {
                    self.scanner.advance();
                    break;
                }
                Some('O') => {
                    self.scanner.advance();
                    let vnum = self.integer("an object vnum")?;
                    let limit = self.integer("a spawn limit")?;
                    self.scanner.skip_rest_of_line();
                    olimits.push(OLimitEntry { vnum, limit });
                }
                _ => return Err(self.err_unexpected_marker(marker_start, "O or S")),
            }
        }
        Ok(olimits)
    }

    fn parse_practicers(&mut self) -> Result<Vec<PractitionerEntry>, AreaError> {
        let mut practicers = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() {
                return Err(self.err_missing_terminator("PRACTICERS", "S"));
            }
            let marker_start = self.scanner.position();
            match self.scanner.peek() {
                Some('*') => self.scanner.skip_rest_of_line(),
                Some('S') => {
                    self.scanner.advance();
                    break;
                }
                Some('M') => {
                    self.scanner.advance();
                    let vnum = self.integer("a mobile vnum")?;
                    let skill_group = self.flag_word("_", "a skill group name")?;
                    self.scanner.skip_rest_of_line();
                    practicers.push(PractitionerEntry { vnum, skill_group });
                }
                _ => return Err(self.err_unexpected_marker(marker_start, "M, '*', or S")),
            }
        }
        Ok(practicers)
    }

    fn parse_specials(&mut self) -> Result<Vec<SpecialEntry>, AreaError> {
        let mut specials = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() {
                return Err(self.err_missing_terminator("SPECIALS", "S"));
            }
            let marker_start = self.scanner.position();
            match self.scanner.peek() {
                Some('*') => self.scanner.skip_rest_of_line(),
                Some('S') => {
                    self.scanner.advance();
                    break;
                }
                Some('M') => {
                    self.scanner.advance();
                    let vnum = self.integer("a mobile vnum")?;
                    let function = self.flag_word("_", "a special function name")?;
                    self.scanner.skip_rest_of_line();
                    specials.push(SpecialEntry { vnum, function });
                }
                _ => return Err(self.err_unexpected_marker(marker_start, "M, '*', or S")),
            }
        }
        Ok(specials)
    }

    fn parse_omprogs(&mut self) -> Result<Vec<ProgramEntry>, AreaError> {
        let mut omprogs = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() {
                return Err(self.err_missing_terminator("OMPROGS", "S"));
            }
            let marker_start = self.scanner.position();
            match self.scanner.peek() {
                Some('*') => self.scanner.skip_rest_of_line(),
                Some('S') => {
                    self.scanner.advance();
                    break;
                }
                Some(target @ ('M' | 'O')) => {
                    self.scanner.advance();
                    let vnum = self.integer("a target vnum")?;
                    let prog_type = self.flag_word("_", "a program type")?;
                    let prog_name = self.flag_word("_", "a program name")?;
                    self.scanner.skip_rest_of_line();
                    omprogs.push(ProgramEntry {
                        target: target.to_string(),
                        vnum,
                        prog_type,
                        prog_name,
                    });
                }
                _ => return Err(self.err_unexpected_marker(marker_start, "M, O, '*', or S")),
            }
        }
        Ok(omprogs)
    }

    /// `#HELPS` rows repeat until the sentinel row whose level is `0` and
    /// keyword is exactly `$`. The sentinel is consumed, never collected.
    fn parse_helps(&mut self) -> Result<Vec<HelpEntry>, AreaError> {
        let mut helps = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() || self.scanner.peek() == Some('#') {
                return Err(self.err_missing_terminator("HELPS", "0 $~"));
            }
            let level = self.integer("a help level")?;
            let keyword = self.tilde_string()?;
            if level == "0" && keyword == "$" {
                break;
            }
            let text = self.tilde_string()?;
            helps.push(HelpEntry {
                level,
                keyword,
                text,
            });
        }
        Ok(helps)
    }

    // === Scanner Wrappers ===

    /// Reads the `#<vnum>` line that opens a room, object, or mobile
    /// record. Returns `None` when the `#0` section sentinel is found
    /// instead; the sentinel is consumed.
    fn record_vnum(&mut self, section: &str) -> Result<Option<String>, AreaError> {
        self.scanner.skip_whitespace();
        if self.scanner.is_at_end() {
            return Err(self.err_missing_terminator(section, "#0"));
        }
        let start = self.scanner.position();
        if !self.scanner.eat("#") {
            return Err(self.err_unexpected_marker(start, "a '#'-prefixed record vnum or '#0'"));
        }
        let vnum = self.integer("a record vnum")?;
        if vnum == "0" {
            return Ok(None);
        }
        self.scanner.skip_rest_of_line();
        Ok(Some(vnum))
    }

    fn tilde_string(&mut self) -> Result<String, AreaError> {
        self.scanner
            .read_tilde_string()
            .map_err(|e| self.scan_error(e, "a '~'-terminated string"))
    }

    fn integer(&mut self, expected: &str) -> Result<String, AreaError> {
        self.scanner
            .read_integer()
            .map(str::to_string)
            .map_err(|e| self.scan_error(e, expected))
    }

    fn flag_word(&mut self, symbols: &str, expected: &str) -> Result<String, AreaError> {
        self.scanner
            .read_flag_word(symbols)
            .map(str::to_string)
            .map_err(|e| self.scan_error(e, expected))
    }

    fn expect_literal(&mut self, literal: &str) -> Result<(), AreaError> {
        self.scanner.skip_whitespace();
        let start = self.scanner.position();
        if self.scanner.eat(literal) {
            Ok(())
        } else {
            Err(ParserError::MalformedNumericToken {
                src: self.src(),
                span: (start, 1).into(),
                expected: format!("'{literal}'"),
            }
            .into())
        }
    }

    // === Error Builders ===

    fn src(&self) -> NamedSource<String> {
        (*self.source).clone()
    }

    fn scan_error(&self, e: ScanError, expected: &str) -> AreaError {
        match e.kind {
            ScanErrorKind::UnterminatedString => ParserError::UnterminatedString {
                src: self.src(),
                span: (e.pos_start, 0).into(),
            }
            .into(),
            ScanErrorKind::MalformedToken => ParserError::MalformedNumericToken {
                src: self.src(),
                span: (e.pos_start, e.pos_end - e.pos_start).into(),
                expected: expected.to_string(),
            }
            .into(),
        }
    }

    fn err_missing_terminator(&self, section: &str, terminator: &str) -> AreaError {
        let pos = self.source_text.len().saturating_sub(1);
        ParserError::MissingTerminator {
            src: self.src(),
            span: (pos, 0).into(),
            section: section.to_string(),
            terminator: terminator.to_string(),
        }
        .into()
    }

    fn err_unexpected_marker(&self, start: usize, expected: &str) -> AreaError {
        ParserError::UnexpectedBlockMarker {
            src: self.src(),
            span: (start, 1).into(),
            expected: expected.to_string(),
        }
        .into()
    }

    fn err_unknown_tag(&self, start: usize) -> AreaError {
        let end = self.scanner.position().max(start + 1);
        ParserError::UnknownSectionTag {
            src: self.src(),
            span: (start, end - start).into(),
            tag: String::new(),
        }
        .into()
    }

    fn err_unknown_tag_named(&self, start: usize, tag: String) -> AreaError {
        let end = self.scanner.position().max(start + 1);
        ParserError::UnknownSectionTag {
            src: self.src(),
            span: (start, end - start).into(),
            tag,
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AreaError, ParserError};
    use miette::Report;

    fn parse_ok(source: &str) -> AreaDocument {
        let mut parser = Parser::new_with_name(source, "test.are".to_string());
        match parser.parse_document() {
            Ok(document) => document,
            Err(err) => {
                let report = Report::from(err);
                panic!("{report:?}");
            }
        }
    }

    fn parse_err(source: &str) -> ParserError {
        let mut parser = Parser::new_with_name(source, "test.are".to_string());
        match parser.parse_document() {
            Ok(_) => panic!("expected a parse failure"),
            Err(AreaError::Parser(err)) => err,
        }
    }

    #[test]
    fn test_area_header() {
        let doc = parse_ok("#AREA\nmyfile~\nMy Area~\n{  1  100}writer~credits~\n1 100\n#$");
        let area = doc.area.expect("header should be present");
        assert_eq!(area.file, "myfile");
        assert_eq!(area.name, "My Area");
        assert_eq!(area.low_range, "1");
        assert_eq!(area.high_range, "100");
        assert_eq!(area.writer, "writer");
        assert_eq!(area.min_vnum, "1");
        assert_eq!(area.max_vnum, "100");
    }

    #[test]
    fn test_empty_rooms_section() {
        let doc = parse_ok("#ROOMS\n#0\n#$");
        assert_eq!(doc.rooms, Some(Vec::new()));
    }

    #[test]
    fn test_room_with_blocks() {
        let source = "#ROOMS\n\
            #3001\n\
            Temple Square~\n\
            You are standing in the temple square.\n\
            ~\n\
            0 0 1\n\
            E\n\
            fountain~\n\
            A marble fountain.\n\
            ~\n\
            E\n\
            statue~\n\
            A statue of Mota.\n\
            ~\n\
            D0\n\
            To the north.~\n\
            gate~\n\
            0 -1 3054\n\
            S\n\
            #0\n\
            #$";
        let doc = parse_ok(source);
        let rooms = doc.rooms.unwrap();
        assert_eq!(rooms.len(), 1);
        let room = &rooms[0];
        assert_eq!(room.vnum, "3001");
        assert_eq!(room.name, "Temple Square");
        assert_eq!(room.sector, "1");
        assert_eq!(room.extra_descriptions.len(), 2);
        assert_eq!(room.extra_descriptions[0].keyword, "fountain");
        assert_eq!(room.extra_descriptions[1].keyword, "statue");
        assert_eq!(room.exits.len(), 1);
        assert_eq!(room.exits[0].door, "D0");
        assert_eq!(room.exits[0].key, "-1");
        assert_eq!(room.exits[0].destination, "3054");
    }

    #[test]
    fn test_room_block_order_independence() {
        let forward = "#ROOMS\n#10\nCell~\ndesc~\n0 0 0\nH 110\nM 90\nO keeper~\nS\n#0\n#$";
        let reversed = "#ROOMS\n#10\nCell~\ndesc~\n0 0 0\nO keeper~\nM 90\nH 110\nS\n#0\n#$";
        let a = parse_ok(forward).rooms.unwrap();
        let b = parse_ok(reversed).rooms.unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].heal_rate.as_deref(), Some("110"));
        assert_eq!(a[0].mana_rate.as_deref(), Some("90"));
        assert_eq!(a[0].owner.as_deref(), Some("keeper"));
    }

    #[test]
    fn test_exit_order_preserved() {
        let source = "#ROOMS\n#10\nHall~\ndesc~\n0 0 0\n\
            D3\n~\n~\n0 0 11\n\
            D0\n~\n~\n0 0 12\n\
            S\n#0\n#$";
        let rooms = parse_ok(source).rooms.unwrap();
        assert_eq!(rooms[0].exits[0].door, "D3");
        assert_eq!(rooms[0].exits[1].door, "D0");
    }

    #[test]
    fn test_object_with_affects_and_extras() {
        let source = "#OBJECTS\n\
            #2000\n\
            sword long~\n\
            a long sword~\n\
            A long sword lies here.~\n\
            steel~\n\
            weapon AB|CD A\n\
            0 'sword' 1d8 slash 0\n\
            10 40 500 P\n\
            A 19 2\n\
            F A 18 1 C\n\
            E\n\
            sword~\n\
            It gleams.\n\
            ~\n\
            #0\n\
            #$";
        let objects = parse_ok(source).objects.unwrap();
        assert_eq!(objects.len(), 1);
        let object = &objects[0];
        assert_eq!(object.item_type, "weapon");
        assert_eq!(object.extra_flags, "AB|CD");
        assert_eq!(object.values, "0 'sword' 1d8 slash 0");
        assert_eq!(object.level, "10");
        assert_eq!(object.condition, "P");
        assert_eq!(object.affects.len(), 2);
        assert_eq!(
            object.affects[0],
            ObjectAffect::Location {
                location: "19".to_string(),
                modifier: "2".to_string()
            }
        );
        assert_eq!(
            object.affects[1],
            ObjectAffect::Flag {
                r#where: "A".to_string(),
                location: "18".to_string(),
                modifier: "1".to_string(),
                bitvector: "C".to_string()
            }
        );
        assert_eq!(object.extra_descriptions.len(), 1);
    }

    #[test]
    fn test_legacy_object_rejects_flag_affects() {
        let source = "#OBJOLD\n\
            #2000\n\
            lantern~brass lantern~A lantern.~~\n\
            light 0 A\n\
            0 0 255 0\n\
            5 50 0\n\
            F A 18 1 C\n\
            #0\n\
            #$";
        let err = parse_err(source);
        assert!(matches!(err, ParserError::UnexpectedBlockMarker { .. }));
    }

    #[test]
    fn test_legacy_object_parses_reduced_columns() {
        let source = "#OBJOLD\n\
            #2000\n\
            lantern~brass lantern~A lantern.~~\n\
            light 0 A\n\
            0 0 255 0\n\
            5 50 0\n\
            A 17 5\n\
            #0\n\
            #$";
        let objects = parse_ok(source).old_objects.unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].item_type, "light");
        assert_eq!(objects[0].weight, "5");
        assert_eq!(objects[0].cost, "50");
        assert_eq!(objects[0].affects.len(), 1);
    }

    #[test]
    fn test_mobile_full_record() {
        let source = "#MOBILES\n\
            #3000\n\
            guard city~\n\
            the city guard~\n\
            A city guard stands here.\n\
            ~\n\
            He looks bored.\n\
            ~\n\
            human~\n\
            AB|T 0 300 0\n\
            20 5 4d10+400 2d8+100 2d5+10 slash\n\
            -10 -10 -10 0\n\
            AK 0 0 0\n\
            stand stand male 600\n\
            0 0 medium 0\n\
            F res S\n\
            #0\n\
            #$";
        let mobiles = parse_ok(source).mobiles.unwrap();
        assert_eq!(mobiles.len(), 1);
        let mobile = &mobiles[0];
        assert_eq!(mobile.race, "human");
        assert_eq!(mobile.act, "AB|T");
        assert_eq!(mobile.alignment, "300");
        assert_eq!(mobile.hit_dice, "4d10+400");
        assert_eq!(mobile.ac_pierce, "-10");
        assert_eq!(mobile.sex, "male");
        assert_eq!(mobile.wealth, "600");
        assert_eq!(mobile.size, "medium");
        assert_eq!(
            mobile.affects,
            vec![MobileAffect {
                word: "res".to_string(),
                flag: "S".to_string()
            }]
        );
    }

    #[test]
    fn test_legacy_mobile_reduced_record() {
        let source = "#MOBOLD\n\
            #100\n\
            janitor~\n\
            the janitor~\n\
            A janitor sweeps the floor here.\n\
            ~\n\
            He is dusty.\n\
            ~\n\
            ACF 0 -50 S\n\
            10 0 0 0d0+0 0d0+0\n\
            100 0\n\
            8 8 1\n\
            #0\n\
            #$";
        let mobiles = parse_ok(source).old_mobiles.unwrap();
        assert_eq!(mobiles.len(), 1);
        let mobile = &mobiles[0];
        assert_eq!(mobile.act, "ACF");
        assert_eq!(mobile.alignment, "-50");
        assert_eq!(mobile.level, "10");
        assert_eq!(mobile.wealth, "100");
        assert_eq!(mobile.sex, "1");
    }

    #[test]
    fn test_resets_with_comment() {
        let source = "#RESETS\nG 0 5 0\n*comment\nR 0 10 1\nS\n#$";
        let resets = parse_ok(source).resets.unwrap();
        assert_eq!(resets.len(), 2);
        assert_eq!(resets[0].command, "G");
        assert_eq!(resets[0].args, vec!["5", "0"]);
        assert_eq!(resets[1].command, "R");
        assert_eq!(resets[1].args, vec!["10", "1"]);
    }

    #[test]
    fn test_reset_arity_by_command() {
        let source = "#RESETS\n\
            M 0 3000 1 3001 1 * the guard walks his beat\n\
            P 1 2000 0 2001 1\n\
            O 0 2000 0 3001\n\
            S\n#$";
        let resets = parse_ok(source).resets.unwrap();
        assert_eq!(resets[0].args.len(), 4);
        assert_eq!(resets[1].args.len(), 4);
        assert_eq!(resets[2].args.len(), 3);
    }

    #[test]
    fn test_comment_before_reset_terminator() {
        let source = "#RESETS\nG 0 5 0\n* trailing comment\nS\n#$";
        let resets = parse_ok(source).resets.unwrap();
        assert_eq!(resets.len(), 1);
    }

    #[test]
    fn test_helps_sentinel_not_collected() {
        let source = "#HELPS\n1 MURDER KILL~\nViolence is the answer.\n~\n0 $~\n#$";
        let helps = parse_ok(source).helps.unwrap();
        assert_eq!(helps.len(), 1);
        assert_eq!(helps[0].level, "1");
        assert_eq!(helps[0].keyword, "MURDER KILL");
    }

    #[test]
    fn test_negative_help_level() {
        let source = "#HELPS\n-1 IMMORTAL~\nHidden lore.\n~\n0 $~\n#$";
        let helps = parse_ok(source).helps.unwrap();
        assert_eq!(helps[0].level, "-1");
    }

    #[test]
    fn test_shops_and_olimits() {
        let source = "#SHOPS\n\
            3000 5 10 0 0 0 110 90 0 23\n\
            0\n\
            #OLIMITS\n\
            O 2000 3\n\
            S\n\
            #$";
        let doc = parse_ok(source);
        let shops = doc.shops.unwrap();
        assert_eq!(shops.len(), 1);
        assert_eq!(shops[0].keeper, "3000");
        assert_eq!(shops[0].buy_types, vec!["5", "10", "0", "0", "0"]);
        assert_eq!(shops[0].close_hour, "23");
        let olimits = doc.olimits.unwrap();
        assert_eq!(olimits[0].vnum, "2000");
        assert_eq!(olimits[0].limit, "3");
    }

    #[test]
    fn test_practicers_specials_omprogs() {
        let source = "#PRACTICERS\n\
            * teachers below\n\
            M 3000 mage_default\n\
            S\n\
            #SPECIALS\n\
            M 3001 spec_cast_adept\n\
            S\n\
            #OMPROGS\n\
            M 3002 greet greet_prog\n\
            O 2000 wear wear_prog\n\
            S\n\
            #$";
        let doc = parse_ok(source);
        assert_eq!(doc.practicers.unwrap()[0].skill_group, "mage_default");
        assert_eq!(doc.specials.unwrap()[0].function, "spec_cast_adept");
        let omprogs = doc.omprogs.unwrap();
        assert_eq!(omprogs.len(), 2);
        assert_eq!(omprogs[0].target, "M");
        assert_eq!(omprogs[1].target, "O");
        assert_eq!(omprogs[1].prog_name, "wear_prog");
    }

    #[test]
    fn test_reset_message_and_flag() {
        let source = "#RESETMESSAGE\nYou hear the distant toll of a bell.~\n#FLAG\nnochange\n#$";
        let doc = parse_ok(source);
        assert_eq!(
            doc.area_reset_message.as_deref(),
            Some("You hear the distant toll of a bell.")
        );
        assert_eq!(doc.area_flag.as_deref(), Some("nochange"));
    }

    #[test]
    fn test_repeated_section_appends() {
        let source = "#RESETS\nG 0 5 0\nS\n#RESETS\nR 0 10 1\nS\n#$";
        let resets = parse_ok(source).resets.unwrap();
        assert_eq!(resets.len(), 2);
        assert_eq!(resets[0].command, "G");
        assert_eq!(resets[1].command, "R");
    }

    #[test]
    fn test_unknown_section_tag() {
        let err = parse_err("#SOCIALS\n#$");
        assert!(matches!(err, ParserError::UnknownSectionTag { ref tag, .. } if tag == "SOCIALS"));
    }

    #[test]
    fn test_missing_document_terminator() {
        let err = parse_err("#ROOMS\n#0\n");
        assert!(matches!(err, ParserError::MissingTerminator { .. }));
    }

    #[test]
    fn test_missing_rooms_sentinel() {
        let err = parse_err("#ROOMS\n#10\nCell~\ndesc~\n0 0 0\nS\n");
        assert!(matches!(err, ParserError::MissingTerminator { .. }));
    }

    #[test]
    fn test_missing_helps_sentinel() {
        let err = parse_err("#HELPS\n1 TOPIC~\nbody~\n#$");
        assert!(
            matches!(err, ParserError::MissingTerminator { ref section, .. } if section == "HELPS")
        );
    }

    #[test]
    fn test_unexpected_room_block_marker() {
        let err = parse_err("#ROOMS\n#10\nCell~\ndesc~\n0 0 0\nX 5\nS\n#0\n#$");
        assert!(matches!(err, ParserError::UnexpectedBlockMarker { .. }));
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse_err("#AREA\nmyfile~\nMy Area");
        assert!(matches!(err, ParserError::UnterminatedString { .. }));
    }

    #[test]
    fn test_malformed_numeric_token() {
        let err = parse_err("#SHOPS\nkeeper 1 2 3 4 5 6 7 8 9\n0\n#$");
        assert!(matches!(err, ParserError::MalformedNumericToken { .. }));
    }
}
