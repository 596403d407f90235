//! Command-line front end for weekly schedules.
//!
//! # Responsibility
//! - Translate arguments into `ScheduleService` commands.
//! - Render the committed collection as plain text.
//!
//! # Invariants
//! - Every queued snapshot is flushed before the process exits.

use clap::{Parser, Subcommand};
use log::warn;
use std::process::ExitCode;
use std::sync::Arc;
use weekslot_core::{
    day_name, init_logging, parse_weekday, CoreConfig, ScheduleCollection, ScheduleService,
    ScheduleServiceError, SqliteKeyValueStore, TimeSlot, Weekday,
};

/// Weekly participant schedules with overlap checking.
#[derive(Parser, Debug)]
#[command(name = "weekslot")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all schedules
    List,
    /// Add a schedule
    Add {
        /// Participant name
        #[arg(short, long)]
        participant: String,
        /// Slot as DAY=HH:MM-HH:MM (repeatable)
        #[arg(short, long = "slot", required = true)]
        slots: Vec<String>,
    },
    /// Edit a schedule; days named by --slot replace that day's slots
    Edit {
        /// Schedule id
        id: String,
        /// New participant name
        #[arg(short, long)]
        participant: Option<String>,
        /// Slot as DAY=HH:MM-HH:MM (repeatable)
        #[arg(short, long = "slot")]
        slots: Vec<String>,
    },
    /// Delete a schedule
    Delete {
        /// Schedule id
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Check whether slots can be staged together without saving
    Check {
        /// Slot as DAY=HH:MM-HH:MM (repeatable)
        #[arg(required = true)]
        slots: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = CoreConfig::from_env();

    if let Some(log_dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &CoreConfig) -> Result<(), String> {
    let store = SqliteKeyValueStore::open(&config.db_path)
        .map_err(|err| format!("cannot open {}: {err}", config.db_path.display()))?;
    let mut service = ScheduleService::open(Arc::new(store), config.storage_key.as_str())
        .await
        .map_err(|err| err.to_string())?;

    let result = execute(command, &mut service);
    service.flush().await;
    result
}

fn execute(command: Command, service: &mut ScheduleService) -> Result<(), String> {
    match command {
        Command::List => {
            print_collection(service.collection());
            Ok(())
        }
        Command::Add { participant, slots } => {
            service.set_participant(participant);
            stage_slots(service, &slots)?;
            let entry = service.commit_draft().map_err(|err| err.to_string())?;
            println!("added {}", entry.id());
            Ok(())
        }
        Command::Edit {
            id,
            participant,
            slots,
        } => {
            service.begin_edit(&id).map_err(|err| err.to_string())?;
            if let Some(participant) = participant {
                service.set_participant(participant);
            }
            let parsed = parse_slots(&slots)?;
            for day in unique_days(&parsed) {
                while service.remove_time_slot(day, 0).is_ok() {}
            }
            for (day, slot) in parsed {
                service
                    .add_time_slot(day, slot.start(), slot.end())
                    .map_err(|err| err.to_string())?;
            }
            let entry = service.commit_draft().map_err(|err| err.to_string())?;
            println!("updated {}", entry.id());
            Ok(())
        }
        Command::Delete { id, yes } => {
            if !yes {
                return Err(format!("refusing to delete {id} without --yes"));
            }
            if service.delete_schedule(&id) {
                println!("deleted {id}");
            } else {
                warn!("event=cli_delete module=cli status=noop id={id}");
                println!("no schedule {id}; nothing deleted");
            }
            Ok(())
        }
        Command::Check { slots } => {
            stage_slots(service, &slots)?;
            println!("ok: {} slot(s) fit together", slots.len());
            service.cancel_edit();
            Ok(())
        }
    }
}

fn stage_slots(service: &mut ScheduleService, raw: &[String]) -> Result<(), String> {
    for (day, slot) in parse_slots(raw)? {
        service
            .add_time_slot(day, slot.start(), slot.end())
            .map_err(|err| match err {
                ScheduleServiceError::Overlap { .. } => format!("rejected: {err}"),
                other => other.to_string(),
            })?;
    }
    Ok(())
}

fn parse_slots(raw: &[String]) -> Result<Vec<(Weekday, TimeSlot)>, String> {
    raw.iter().map(|value| parse_slot_arg(value)).collect()
}

fn parse_slot_arg(value: &str) -> Result<(Weekday, TimeSlot), String> {
    let (day, range) = value
        .split_once('=')
        .ok_or_else(|| format!("expected DAY=HH:MM-HH:MM, got `{value}`"))?;
    let day = parse_weekday(day).map_err(|err| err.to_string())?;
    let slot = range.parse::<TimeSlot>().map_err(|err| err.to_string())?;
    Ok((day, slot))
}

fn unique_days(parsed: &[(Weekday, TimeSlot)]) -> Vec<Weekday> {
    let mut days: Vec<Weekday> = parsed.iter().map(|(day, _)| *day).collect();
    days.sort_by_key(|day| day.num_days_from_monday());
    days.dedup();
    days
}

fn print_collection(collection: &ScheduleCollection) {
    if collection.is_empty() {
        println!("no schedules");
        return;
    }
    for entry in collection {
        println!("{}  {}", entry.id(), entry.participant());
        for day_slots in entry.time_slots() {
            let slots: Vec<String> = day_slots.slots().iter().map(ToString::to_string).collect();
            println!("    {:<9} {}", day_name(day_slots.day()), slots.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_slot_arg, unique_days, Args};
    use clap::Parser;
    use weekslot_core::Weekday;

    #[test]
    fn parses_day_and_range() {
        let (day, slot) = parse_slot_arg("mon=09:00-10:30").unwrap();
        assert_eq!(day, Weekday::Mon);
        assert_eq!(slot.to_string(), "09:00-10:30");
    }

    #[test]
    fn rejects_malformed_slot_args() {
        assert!(parse_slot_arg("09:00-10:00").is_err());
        assert!(parse_slot_arg("Moonday=09:00-10:00").is_err());
        assert!(parse_slot_arg("Mon=10:00-09:00").is_err());
    }

    #[test]
    fn unique_days_dedups_in_calendar_order() {
        let parsed = vec![
            parse_slot_arg("Fri=09:00-10:00").unwrap(),
            parse_slot_arg("Mon=09:00-10:00").unwrap(),
            parse_slot_arg("Fri=11:00-12:00").unwrap(),
        ];
        assert_eq!(unique_days(&parsed), vec![Weekday::Mon, Weekday::Fri]);
    }

    #[test]
    fn add_requires_at_least_one_slot() {
        assert!(Args::try_parse_from(["weekslot", "add", "-p", "Alice"]).is_err());
        assert!(
            Args::try_parse_from(["weekslot", "add", "-p", "Alice", "-s", "Mon=09:00-10:00"])
                .is_ok()
        );
    }
}
