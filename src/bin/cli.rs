use anyhow::{Result, anyhow};
use mlpt::report::{edl_frame, render_text_table, summarize_by};
use mlpt::{
    Aggregates, Ammo, AmmoItem, AppConfig, Equipment, EquipmentItem, Exercise, PhasingLocation,
    SqliteStore, Unit, UnitType, load_store_from_json, logging, save_edl_to_csv,
    save_store_to_json,
};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::info;

const HELP: &str = "Commands:
  help                                          Show this help
  ammo add <weight> <name...>                   Add an ammo type
  ammo list                                     List ammo types
  ammo update <id> <weight> <name...>           Change an ammo type
  ammo delete <id>                              Delete ammo (cascades to items and combat loads)
  item add <ammo_id> <G|N> <base> <assault> <sustain>
                                                Add an ammo allowance profile
  item update <id> <G|N> <base> <assault> <sustain>
                                                Change an ammo allowance profile
  item list                                     List ammo allowance profiles
  item delete <id>                              Delete an allowance profile (cascades)
  equip add <weight> <fuel_gal> <burn_gph> <name...>
                                                Add an equipment type
  equip update <id> <weight> <fuel_gal> <burn_gph> <name...>
                                                Change an equipment type
  equip list                                    List equipment types
  equip delete <id>                             Delete equipment (cascades)
  load add <equipment_id> <ammo_item_id>        Add an allowance to a combat load
  load list <equipment_id>                      Show the combat loads of an equipment type
  load remove <combat_load_id>                  Remove an allowance from a combat load
  eitem add <equipment_id> <AE|AFOE> <qty>      Add an equipment item
  eitem qty <id> <qty>                          Change an equipment item quantity
  eitem list                                    List equipment items
  eitem delete <id>                             Delete an equipment item (cascades)
  unit add <name...>                            Add a unit
  unit list                                     List units
  unit rename <id> <name...>                    Rename a unit
  unit delete <id>                              Delete a unit
  ex add <name...>                              Add an exercise
  ex list                                       List exercises
  ex rename <id> <name...>                      Rename an exercise
  ex delete <id>                                Delete an exercise
  ex unit <exercise_id> <unit_id>               Attach a unit to an exercise
  ex detach <exercise_id> <unit_id>             Detach a unit from an exercise
  ex units <exercise_id>                        List units attached to an exercise
  edl add <exercise_id> <unit_id> <eitem_id>    Place an equipment item in the exercise EDL
  edl remove <edl_id>                           Remove an EDL line
  edl show <exercise_id>                        Show the weighted EDL
  totals <exercise_id>                          Show exercise totals
  summary <exercise_id> <unit|phasing>          Summarize the EDL by unit or phasing location
  save json <path>                              Write a JSON snapshot
  load json <path>                              Restore a JSON snapshot into the empty store
  export csv <exercise_id> <path>               Write the weighted EDL as CSV
  quit|exit                                     Exit";

fn parse_arg<T: FromStr>(value: Option<&&str>, what: &str, usage: &str) -> Result<T> {
    let raw = value.ok_or_else(|| anyhow!("Usage: {usage}"))?;
    raw.parse::<T>()
        .map_err(|_| anyhow!("Invalid {what} '{raw}'"))
}

fn rest_text(args: &[&str], from: usize, usage: &str) -> Result<String> {
    if args.len() <= from {
        return Err(anyhow!("Usage: {usage}"));
    }
    Ok(args[from..].join(" "))
}

fn not_found(kind: &str, id: i64) -> anyhow::Error {
    anyhow!("{kind} {id} not found.")
}

fn ammo_command(store: &SqliteStore, args: &[&str]) -> Result<()> {
    match args.first().copied() {
        Some("add") => {
            let usage = "ammo add <weight> <name...>";
            let weight: i64 = parse_arg(args.get(1), "weight", usage)?;
            let name = rest_text(args, 2, usage)?;
            let ammo = store.create_ammo(&Ammo::new(name, weight))?;
            println!("Created ammo {}: {}", ammo.id, ammo);
        }
        Some("list") => {
            for ammo in store.list_ammo()? {
                println!("{:>4}  {:<50} weight={}", ammo.id, ammo.name, ammo.weight);
            }
        }
        Some("update") => {
            let usage = "ammo update <id> <weight> <name...>";
            let id: i64 = parse_arg(args.get(1), "id", usage)?;
            let weight: i64 = parse_arg(args.get(2), "weight", usage)?;
            let name = rest_text(args, 3, usage)?;
            let ammo = Ammo {
                id,
                ..Ammo::new(name, weight)
            };
            if !store.update_ammo(&ammo)? {
                return Err(not_found("Ammo", id));
            }
            println!("Updated ammo {id}: {ammo}");
        }
        Some("delete") => {
            let id: i64 = parse_arg(args.get(1), "id", "ammo delete <id>")?;
            if !store.delete_ammo(id)? {
                return Err(not_found("Ammo", id));
            }
            println!("Deleted ammo {id}.");
        }
        _ => return Err(anyhow!("Usage: ammo <add|list|update|delete> ...")),
    }
    Ok(())
}

fn item_command(store: &SqliteStore, args: &[&str]) -> Result<()> {
    match args.first().copied() {
        Some("add") => {
            let usage = "item add <ammo_id> <G|N> <base> <assault> <sustain>";
            let ammo_id: i64 = parse_arg(args.get(1), "ammo_id", usage)?;
            let unit_type: UnitType = parse_arg(args.get(2), "unit type", usage)?;
            let base: u32 = parse_arg(args.get(3), "base allocation", usage)?;
            let assault: u32 = parse_arg(args.get(4), "daily assault", usage)?;
            let sustain: u32 = parse_arg(args.get(5), "daily sustain", usage)?;
            let item = store.create_ammo_item(
                &AmmoItem::new(ammo_id, unit_type).with_allowances(base, assault, sustain),
            )?;
            println!("Created ammo item {} for ammo {}.", item.id, item.ammo_id);
        }
        Some("update") => {
            let usage = "item update <id> <G|N> <base> <assault> <sustain>";
            let id: i64 = parse_arg(args.get(1), "id", usage)?;
            let unit_type: UnitType = parse_arg(args.get(2), "unit type", usage)?;
            let base: u32 = parse_arg(args.get(3), "base allocation", usage)?;
            let assault: u32 = parse_arg(args.get(4), "daily assault", usage)?;
            let sustain: u32 = parse_arg(args.get(5), "daily sustain", usage)?;
            let current = store
                .get_ammo_item(id)?
                .ok_or_else(|| not_found("Ammo item", id))?;
            let item = AmmoItem {
                unit_type,
                ..current
            }
            .with_allowances(base, assault, sustain);
            store.update_ammo_item(&item)?;
            println!("Updated ammo item {id}.");
        }
        Some("delete") => {
            let id: i64 = parse_arg(args.get(1), "id", "item delete <id>")?;
            if !store.delete_ammo_item(id)? {
                return Err(not_found("Ammo item", id));
            }
            println!("Deleted ammo item {id}.");
        }
        Some("list") => {
            for item in store.list_ammo_items()? {
                println!(
                    "{:>4}  ammo={} type={} ({}) base={} assault={} sustain={}",
                    item.id,
                    item.ammo_id,
                    item.unit_type,
                    item.unit_type.label(),
                    item.base_allocation,
                    item.daily_assault,
                    item.daily_sustain
                );
            }
        }
        _ => return Err(anyhow!("Usage: item <add|update|list|delete> ...")),
    }
    Ok(())
}

fn equip_command(store: &SqliteStore, args: &[&str]) -> Result<()> {
    match args.first().copied() {
        Some("add") => {
            let usage = "equip add <weight> <fuel_gal> <burn_gph> <name...>";
            let weight: f64 = parse_arg(args.get(1), "weight", usage)?;
            let fuel: i64 = parse_arg(args.get(2), "fuel capacity", usage)?;
            let burn: f64 = parse_arg(args.get(3), "burn rate", usage)?;
            let name = rest_text(args, 4, usage)?;
            let equipment =
                store.create_equipment(&Equipment::new(name, weight).with_fuel(fuel, burn))?;
            println!("Created equipment {}: {}", equipment.id, equipment);
        }
        Some("list") => {
            for equipment in store.list_equipment()? {
                println!(
                    "{:>4}  {:<50} weight={} fuel={} burn={}",
                    equipment.id,
                    equipment.name,
                    equipment.weight,
                    equipment.fuel_capacity,
                    equipment.burn_rate
                );
            }
        }
        Some("update") => {
            let usage = "equip update <id> <weight> <fuel_gal> <burn_gph> <name...>";
            let id: i64 = parse_arg(args.get(1), "id", usage)?;
            let weight: f64 = parse_arg(args.get(2), "weight", usage)?;
            let fuel: i64 = parse_arg(args.get(3), "fuel capacity", usage)?;
            let burn: f64 = parse_arg(args.get(4), "burn rate", usage)?;
            let name = rest_text(args, 5, usage)?;
            let equipment = Equipment {
                id,
                ..Equipment::new(name, weight).with_fuel(fuel, burn)
            };
            if !store.update_equipment(&equipment)? {
                return Err(not_found("Equipment", id));
            }
            println!("Updated equipment {id}: {equipment}");
        }
        Some("delete") => {
            let id: i64 = parse_arg(args.get(1), "id", "equip delete <id>")?;
            if !store.delete_equipment(id)? {
                return Err(not_found("Equipment", id));
            }
            println!("Deleted equipment {id}.");
        }
        _ => return Err(anyhow!("Usage: equip <add|list|update|delete> ...")),
    }
    Ok(())
}

fn load_command(store: &SqliteStore, args: &[&str]) -> Result<()> {
    match args.first().copied() {
        Some("add") => {
            let usage = "load add <equipment_id> <ammo_item_id>";
            let equipment_id: i64 = parse_arg(args.get(1), "equipment_id", usage)?;
            let ammo_item_id: i64 = parse_arg(args.get(2), "ammo_item_id", usage)?;
            let load = store.add_combat_load(equipment_id, ammo_item_id)?;
            println!("Added combat load {}.", load.id);
        }
        Some("list") => {
            let equipment_id: i64 =
                parse_arg(args.get(1), "equipment_id", "load list <equipment_id>")?;
            let lines = store.combat_loads(equipment_id)?;
            if lines.is_empty() {
                println!("No combat loads for equipment {equipment_id}.");
            }
            for line in lines {
                println!(
                    "{:>4}  {:<30} type={} base={} assault={} sustain={}",
                    line.combat_load_id,
                    line.ammo_name,
                    line.ammo_item.unit_type,
                    line.ammo_item.base_allocation,
                    line.ammo_item.daily_assault,
                    line.ammo_item.daily_sustain
                );
            }
        }
        Some("remove") => {
            let id: i64 = parse_arg(args.get(1), "id", "load remove <combat_load_id>")?;
            if !store.remove_combat_load(id)? {
                return Err(not_found("Combat load", id));
            }
            println!("Removed combat load {id}.");
        }
        _ => return Err(anyhow!("Usage: load <add|list|remove> ...")),
    }
    Ok(())
}

fn eitem_command(store: &SqliteStore, args: &[&str]) -> Result<()> {
    match args.first().copied() {
        Some("add") => {
            let usage = "eitem add <equipment_id> <AE|AFOE> <qty>";
            let equipment_id: i64 = parse_arg(args.get(1), "equipment_id", usage)?;
            let phasing: PhasingLocation = parse_arg(args.get(2), "phasing location", usage)?;
            let quantity: u32 = parse_arg(args.get(3), "quantity", usage)?;
            let item =
                store.create_equipment_item(&EquipmentItem::new(equipment_id, phasing, quantity))?;
            println!("Created equipment item {}.", item.id);
        }
        Some("qty") => {
            let usage = "eitem qty <id> <qty>";
            let id: i64 = parse_arg(args.get(1), "id", usage)?;
            let quantity: u32 = parse_arg(args.get(2), "quantity", usage)?;
            let mut item = store
                .get_equipment_item(id)?
                .ok_or_else(|| not_found("Equipment item", id))?;
            item.quantity = quantity;
            store.update_equipment_item(&item)?;
            println!("Equipment item {id} quantity set to {quantity}.");
        }
        Some("list") => {
            for item in store.list_equipment_items()? {
                println!(
                    "{:>4}  equipment={} phasing={} ({}) qty={}",
                    item.id,
                    item.equipment_id,
                    item.phasing_location,
                    item.phasing_location.label(),
                    item.quantity
                );
            }
        }
        Some("delete") => {
            let id: i64 = parse_arg(args.get(1), "id", "eitem delete <id>")?;
            if !store.delete_equipment_item(id)? {
                return Err(not_found("Equipment item", id));
            }
            println!("Deleted equipment item {id}.");
        }
        _ => return Err(anyhow!("Usage: eitem <add|qty|list|delete> ...")),
    }
    Ok(())
}

fn unit_command(store: &SqliteStore, args: &[&str]) -> Result<()> {
    match args.first().copied() {
        Some("add") => {
            let name = rest_text(args, 1, "unit add <name...>")?;
            let unit = store.create_unit(&Unit::new(name))?;
            println!("Created unit {}: {}", unit.id, unit);
        }
        Some("list") => {
            for unit in store.list_units()? {
                println!("{:>4}  {}", unit.id, unit.name);
            }
        }
        Some("delete") => {
            let id: i64 = parse_arg(args.get(1), "id", "unit delete <id>")?;
            if !store.delete_unit(id)? {
                return Err(not_found("Unit", id));
            }
            println!("Deleted unit {id}.");
        }
        Some("rename") => {
            let usage = "unit rename <id> <name...>";
            let id: i64 = parse_arg(args.get(1), "id", usage)?;
            let unit = Unit {
                id,
                ..Unit::new(rest_text(args, 2, usage)?)
            };
            if !store.update_unit(&unit)? {
                return Err(not_found("Unit", id));
            }
            println!("Renamed unit {id} to {unit}.");
        }
        _ => return Err(anyhow!("Usage: unit <add|list|rename|delete> ...")),
    }
    Ok(())
}

fn exercise_command(store: &SqliteStore, args: &[&str]) -> Result<()> {
    match args.first().copied() {
        Some("add") => {
            let name = rest_text(args, 1, "ex add <name...>")?;
            let exercise = store.create_exercise(&Exercise::new(name))?;
            println!("Created exercise {}: {}", exercise.id, exercise);
        }
        Some("list") => {
            for exercise in store.list_exercises()? {
                println!("{:>4}  {}", exercise.id, exercise.name);
            }
        }
        Some("delete") => {
            let id: i64 = parse_arg(args.get(1), "id", "ex delete <id>")?;
            if !store.delete_exercise(id)? {
                return Err(not_found("Exercise", id));
            }
            println!("Deleted exercise {id}.");
        }
        Some("unit") => {
            let usage = "ex unit <exercise_id> <unit_id>";
            let exercise_id: i64 = parse_arg(args.get(1), "exercise_id", usage)?;
            let unit_id: i64 = parse_arg(args.get(2), "unit_id", usage)?;
            if store.add_exercise_unit(exercise_id, unit_id)? {
                println!("Unit {unit_id} attached to exercise {exercise_id}.");
            } else {
                println!("Unit {unit_id} already attached to exercise {exercise_id}.");
            }
        }
        Some("units") => {
            let exercise_id: i64 =
                parse_arg(args.get(1), "exercise_id", "ex units <exercise_id>")?;
            for unit in store.exercise_units(exercise_id)? {
                println!("{:>4}  {}", unit.id, unit.name);
            }
        }
        Some("rename") => {
            let usage = "ex rename <id> <name...>";
            let id: i64 = parse_arg(args.get(1), "id", usage)?;
            let exercise = Exercise {
                id,
                ..Exercise::new(rest_text(args, 2, usage)?)
            };
            if !store.update_exercise(&exercise)? {
                return Err(not_found("Exercise", id));
            }
            println!("Renamed exercise {id} to {exercise}.");
        }
        Some("detach") => {
            let usage = "ex detach <exercise_id> <unit_id>";
            let exercise_id: i64 = parse_arg(args.get(1), "exercise_id", usage)?;
            let unit_id: i64 = parse_arg(args.get(2), "unit_id", usage)?;
            if !store.remove_exercise_unit(exercise_id, unit_id)? {
                return Err(anyhow!(
                    "Unit {unit_id} is not attached to exercise {exercise_id}."
                ));
            }
            println!("Unit {unit_id} detached from exercise {exercise_id}.");
        }
        _ => {
            return Err(anyhow!(
                "Usage: ex <add|list|rename|delete|unit|detach|units> ..."
            ));
        }
    }
    Ok(())
}

fn edl_command(store: &SqliteStore, args: &[&str]) -> Result<()> {
    match args.first().copied() {
        Some("add") => {
            let usage = "edl add <exercise_id> <unit_id> <eitem_id>";
            let exercise_id: i64 = parse_arg(args.get(1), "exercise_id", usage)?;
            let unit_id: i64 = parse_arg(args.get(2), "unit_id", usage)?;
            let item_id: i64 = parse_arg(args.get(3), "eitem_id", usage)?;
            let entry = store.add_edl_entry(exercise_id, unit_id, item_id)?;
            println!("Added EDL line {}.", entry.id);
        }
        Some("remove") => {
            let id: i64 = parse_arg(args.get(1), "edl_id", "edl remove <edl_id>")?;
            if !store.remove_edl_entry(id)? {
                return Err(not_found("EDL line", id));
            }
            println!("Removed EDL line {id}.");
        }
        Some("show") => {
            let exercise_id: i64 =
                parse_arg(args.get(1), "exercise_id", "edl show <exercise_id>")?;
            for line in store.edl_lines(exercise_id)? {
                println!("{line}");
            }
            print!("{}", render_text_table(&edl_frame(store, exercise_id)?));
        }
        _ => return Err(anyhow!("Usage: edl <add|remove|show> ...")),
    }
    Ok(())
}

fn print_codes() {
    println!("Unit types:");
    for unit_type in UnitType::variants() {
        println!("  {:<4} {}", unit_type.code(), unit_type.label());
    }
    println!("Phasing locations:");
    for phasing in PhasingLocation::variants() {
        println!("  {:<4} {}", phasing.code(), phasing.label());
    }
}

/// Runs one input line. Returns false when the loop should stop.
fn dispatch(store: &SqliteStore, line: &str) -> Result<bool> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&cmd, args)) = parts.split_first() else {
        return Ok(true);
    };

    match cmd {
        "help" => {
            println!("{HELP}");
            print_codes();
        }
        "quit" | "exit" => return Ok(false),
        "ammo" => ammo_command(store, args)?,
        "item" => item_command(store, args)?,
        "equip" => equip_command(store, args)?,
        "load" if args.first() == Some(&"json") => {
            let path = args.get(1).ok_or_else(|| anyhow!("Usage: load json <path>"))?;
            load_store_from_json(store, path)?;
            println!("Snapshot loaded from {path}.");
        }
        "load" => load_command(store, args)?,
        "eitem" => eitem_command(store, args)?,
        "unit" => unit_command(store, args)?,
        "ex" => exercise_command(store, args)?,
        "edl" => edl_command(store, args)?,
        "totals" => {
            let exercise_id: i64 =
                parse_arg(args.first(), "exercise_id", "totals <exercise_id>")?;
            let totals = store.exercise_totals(exercise_id)?;
            println!("Totals ({})", totals.to_cli_summary());
        }
        "summary" => {
            let usage = "summary <exercise_id> <unit|phasing>";
            let exercise_id: i64 = parse_arg(args.first(), "exercise_id", usage)?;
            let key = match args.get(1).copied() {
                Some("unit") => "unit",
                Some("phasing") => "phasing_location",
                _ => return Err(anyhow!("Usage: {usage}")),
            };
            let frame = edl_frame(store, exercise_id)?;
            print!("{}", render_text_table(&summarize_by(&frame, key)?));
        }
        "save" => match (args.first().copied(), args.get(1)) {
            (Some("json"), Some(path)) => {
                save_store_to_json(store, path)?;
                println!("Snapshot saved to {path}.");
            }
            _ => return Err(anyhow!("Usage: save json <path>")),
        },
        "export" => match (args.first().copied(), args.get(1), args.get(2)) {
            (Some("csv"), Some(id), Some(path)) => {
                let exercise_id: i64 = id
                    .parse()
                    .map_err(|_| anyhow!("Invalid exercise_id '{id}'"))?;
                let rows = save_edl_to_csv(store, exercise_id, path)?;
                println!("Exported {rows} EDL lines to {path}.");
            }
            _ => return Err(anyhow!("Usage: export csv <exercise_id> <path>")),
        },
        other => println!("Unknown command '{other}'. Type 'help' for commands."),
    }
    Ok(true)
}

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    logging::init_tracing(&config.log_filter);
    let store = SqliteStore::open(&config.database)?;
    info!(database = ?config.database, "mlpt cli starting");

    println!("MLPT exercise planner (CLI) - type 'help' for commands");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match dispatch(&store, line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => println!("{err}"),
        }
    }
    Ok(())
}
