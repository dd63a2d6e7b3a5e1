// Integration tests for are-core using a complete fixture area file.
use are_core::parse;
use std::fs;
use std::path::PathBuf;

fn get_fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn read_fixture(filename: &str) -> String {
    let path = get_fixture_path(filename);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read fixture: {:?}", path))
}

#[test]
fn test_sewers_parses_every_section() {
    let source = read_fixture("sewers.are");
    let document = parse(&source, "sewers.are").unwrap_or_else(|err| {
        panic!("{:?}", miette::Report::from(err));
    });

    let area = document.area.as_ref().expect("header present");
    assert_eq!(area.file, "sewers.are");
    assert_eq!(area.name, "The City Sewers");
    assert_eq!(area.low_range, "5");
    assert_eq!(area.high_range, "35");
    assert_eq!(area.writer, "Ozgur");
    assert_eq!(area.credits, "Rebuilt from the old Anatolia grid");
    assert_eq!(area.min_vnum, "7000");
    assert_eq!(area.max_vnum, "7099");

    assert_eq!(document.mobiles.as_ref().unwrap().len(), 2);
    assert_eq!(document.old_objects.as_ref().unwrap().len(), 1);
    assert_eq!(document.objects.as_ref().unwrap().len(), 1);
    assert_eq!(document.rooms.as_ref().unwrap().len(), 2);
    assert_eq!(document.resets.as_ref().unwrap().len(), 5);
    assert_eq!(document.shops.as_ref().unwrap().len(), 1);
    assert_eq!(document.olimits.as_ref().unwrap().len(), 1);
    assert_eq!(document.practicers.as_ref().unwrap().len(), 1);
    assert_eq!(document.specials.as_ref().unwrap().len(), 1);
    assert_eq!(document.omprogs.as_ref().unwrap().len(), 2);
    assert_eq!(document.helps.as_ref().unwrap().len(), 1);
    assert_eq!(
        document.area_reset_message.as_deref(),
        Some("Somewhere below, water gurgles through the grates.")
    );
    assert_eq!(document.area_flag.as_deref(), Some("nochange"));
}

#[test]
fn test_sewers_mobile_details() {
    let source = read_fixture("sewers.are");
    let document = parse(&source, "sewers.are").unwrap();
    let mobiles = document.mobiles.unwrap();

    let rat = &mobiles[0];
    assert_eq!(rat.vnum, "7000");
    assert_eq!(rat.race, "rodent");
    assert_eq!(rat.alignment, "-200");
    assert_eq!(rat.hit_dice, "2d8+40");
    assert_eq!(rat.dam_type, "bite");
    assert_eq!(rat.affects.len(), 1);
    assert_eq!(rat.affects[0].word, "imm");
    assert_eq!(rat.affects[0].flag, "C");

    let keeper = &mobiles[1];
    assert_eq!(keeper.vnum, "7001");
    assert_eq!(keeper.act, "AB|F");
    assert_eq!(keeper.ac_pierce, "-4");
    assert_eq!(keeper.wealth, "900");
    assert!(keeper.affects.is_empty());
}

#[test]
fn test_sewers_room_details() {
    let source = read_fixture("sewers.are");
    let document = parse(&source, "sewers.are").unwrap();
    let rooms = document.rooms.unwrap();

    let junction = &rooms[0];
    assert_eq!(junction.vnum, "7010");
    assert_eq!(junction.flags, "D");
    assert_eq!(junction.sector, "2");
    assert_eq!(junction.heal_rate.as_deref(), Some("105"));
    assert_eq!(junction.mana_rate.as_deref(), Some("95"));
    assert_eq!(junction.extra_descriptions.len(), 1);
    assert_eq!(junction.exits.len(), 2);
    assert_eq!(junction.exits[0].door, "D0");
    assert_eq!(junction.exits[0].key, "-1");
    assert_eq!(junction.exits[1].door, "D4");
    assert_eq!(junction.exits[1].locks, "1");
    assert_eq!(junction.exits[1].destination, "7012");

    let spur = &rooms[1];
    assert_eq!(spur.owner.as_deref(), Some("the grate keeper"));
    assert!(spur.exits.is_empty());
}

#[test]
fn test_sewers_legacy_and_current_objects_stay_distinct() {
    let source = read_fixture("sewers.are");
    let document = parse(&source, "sewers.are").unwrap();

    let old = &document.old_objects.unwrap()[0];
    assert_eq!(old.vnum, "7050");
    assert_eq!(old.item_type, "light");
    assert_eq!(old.weight, "3");
    assert_eq!(old.extra_descriptions.len(), 1);

    let new = &document.objects.unwrap()[0];
    assert_eq!(new.vnum, "7051");
    assert_eq!(new.material, "iron");
    assert_eq!(new.level, "12");
    assert_eq!(new.condition, "P");
    assert_eq!(new.affects.len(), 2);
}

#[test]
fn test_sewers_resets_skip_comments() {
    let source = read_fixture("sewers.are");
    let document = parse(&source, "sewers.are").unwrap();
    let resets = document.resets.unwrap();

    let commands: Vec<&str> = resets.iter().map(|r| r.command.as_str()).collect();
    assert_eq!(commands, vec!["M", "M", "G", "O", "E"]);
    assert_eq!(resets[0].args, vec!["7000", "3", "7010", "3"]);
    assert_eq!(resets[2].args, vec!["7051", "0"]);
    assert_eq!(resets[4].args, vec!["7051", "0", "16"]);
}

#[test]
fn test_sewers_parse_is_idempotent() {
    let source = read_fixture("sewers.are");
    let first = parse(&source, "sewers.are").unwrap();
    let second = parse(&source, "sewers.are").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_multiline_description_preserved() {
    let source = read_fixture("sewers.are");
    let document = parse(&source, "sewers.are").unwrap();
    let rat = &document.mobiles.unwrap()[0];
    assert_eq!(
        rat.description,
        "Matted fur clings to its flanks, and its eyes glow a dull red.\n"
    );
}
