//! Command-line entry points. Grounded on the teacher's `cli.rs`
//! `parse_command`/`run_with_args` shape: a small enum, a dispatcher, and one
//! `handle_*` function per sub-command returning a process exit code.

use std::env;

use crate::catalog::{self, Catalog};
use crate::config::AiSettings;
use crate::llm::NotConfiguredLlmClient;
use crate::model::{AllianceRole, Priorities, Profile, SpendingProfile};
use crate::repository::FileRepository;
use crate::{advisor, lineup_builder, orchestrator, server};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Recommend,
    Lineup,
    Ask,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("recommend") => Some(Command::Recommend),
        Some("lineup") => Some(Command::Lineup),
        Some("ask") => Some(Command::Ask),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Recommend) => handle_recommend(args),
        Some(Command::Lineup) => handle_lineup(args),
        Some(Command::Ask) => handle_ask(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("usage: stratadvisor <serve|recommend|lineup|ask|validate>");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("STRATADVISOR_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let data_dir = env::var("STRATADVISOR_DATA_DIR").unwrap_or_else(|_| server::DEFAULT_DATA_DIR.to_string());
    match server::run_server(&bind_addr, &data_dir) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn load_catalog() -> Result<std::sync::Arc<Catalog>, i32> {
    Catalog::load(catalog::DEFAULT_HERO_CATALOG_PATH, catalog::DEFAULT_LINEUP_TEMPLATES_PATH).map_err(|err| {
        eprintln!("failed to load catalog: {err}");
        1
    })
}

fn data_dir_from_env() -> String {
    env::var("STRATADVISOR_DATA_DIR").unwrap_or_else(|_| server::DEFAULT_DATA_DIR.to_string())
}

/// A minimal profile built from CLI flags, standing in for the profile a real
/// caller would already have on file. `recommend`/`lineup`/`ask` accept
/// `--user <id>` to load a real profile from the repository instead.
fn default_profile() -> Profile {
    Profile {
        server_age_days: 100,
        furnace_level: 15,
        furnace_fc_level: None,
        spending_profile: SpendingProfile::F2p,
        alliance_role: AllianceRole::Filler,
        priorities: Priorities { svs: 3, rally: 3, castle: 3, exploration: 3, gathering: 3 },
        is_farm_account: false,
        linked_main_profile_id: None,
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)).map(String::as_str)
}

fn handle_recommend(args: &[String]) -> i32 {
    let catalog = match load_catalog() {
        Ok(c) => c,
        Err(code) => return code,
    };
    let repository = FileRepository::new(data_dir_from_env());
    let limit = flag_value(args, "--limit").and_then(|v| v.parse::<usize>().ok()).unwrap_or(10);

    let (profile, owned, chief_gear) = match flag_value(args, "--user") {
        Some(user_id) => {
            use crate::repository::Repository;
            let profile = repository.get_profile(user_id).unwrap_or_else(|_| default_profile());
            let owned = repository.get_owned_heroes(user_id).unwrap_or_default();
            let chief_gear = repository.get_chief_gear(user_id).unwrap_or(None);
            (profile, owned, chief_gear)
        }
        None => (default_profile(), Vec::new(), None),
    };

    let recs = orchestrator::recommend(&catalog, &profile, &owned, chief_gear.as_ref(), limit);
    match serde_json::to_string_pretty(&recs) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize recommendations: {err}");
            1
        }
    }
}

fn handle_lineup(args: &[String]) -> i32 {
    let Some(mode) = args.get(2) else {
        eprintln!("usage: stratadvisor lineup <mode> [--user <id>]");
        return 2;
    };
    let catalog = match load_catalog() {
        Ok(c) => c,
        Err(code) => return code,
    };
    let repository = FileRepository::new(data_dir_from_env());

    let lineup = match flag_value(args, "--user") {
        Some(user_id) => {
            use crate::repository::Repository;
            let profile = repository.get_profile(user_id).unwrap_or_else(|_| default_profile());
            let owned = repository.get_owned_heroes(user_id).unwrap_or_default();
            let max_generation = crate::scorer::current_generation(profile.server_age_days);
            lineup_builder::build_lineup(&catalog, mode, &owned, max_generation)
        }
        None => lineup_builder::build_general_lineup(&catalog, mode, 99),
    };

    match serde_json::to_string_pretty(&lineup) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize lineup: {err}");
            1
        }
    }
}

fn handle_ask(args: &[String]) -> i32 {
    let Some(question) = args.get(2) else {
        eprintln!("usage: stratadvisor ask <question> [--user <id>] [--force-ai]");
        return 2;
    };
    let catalog = match load_catalog() {
        Ok(c) => c,
        Err(code) => return code,
    };
    let repository = FileRepository::new(data_dir_from_env());
    let llm = NotConfiguredLlmClient;
    let ai_settings = AiSettings::from_env();
    let force_ai = args.iter().any(|a| a == "--force-ai");
    let user_id = flag_value(args, "--user").unwrap_or("cli-user");

    use crate::repository::Repository;
    let profile = repository.get_profile(user_id).unwrap_or_else(|_| default_profile());
    let owned = repository.get_owned_heroes(user_id).unwrap_or_default();
    let chief_gear = repository.get_chief_gear(user_id).unwrap_or(None);

    let deps = advisor::AdvisorDeps { catalog: &catalog, repository: &repository, llm: &llm, ai_settings: &ai_settings };
    let thread_id = uuid::Uuid::new_v4().to_string();
    let answer = advisor::ask(&deps, user_id, &profile, &owned, chief_gear.as_ref(), question, force_ai, &thread_id, chrono::Utc::now());

    println!("{}", answer.answer);
    if answer.source == "error" {
        1
    } else {
        0
    }
}

/// Validates that the catalog JSON files on disk load and parse cleanly.
/// Grounded on the teacher's `handle_validate` shape (load, report issue
/// count, nonzero exit on failure) but scoped to this crate's one data
/// source: the hero/lineup catalog (profiles are per-user and validated
/// on read by [crate::repository::Repository], not up front).
fn handle_validate(args: &[String]) -> i32 {
    let hero_path = args.get(2).map(String::as_str).unwrap_or(catalog::DEFAULT_HERO_CATALOG_PATH);
    let template_path = args.get(3).map(String::as_str).unwrap_or(catalog::DEFAULT_LINEUP_TEMPLATES_PATH);

    match Catalog::load(hero_path, template_path) {
        Ok(catalog) => {
            println!("validation passed: {} heroes, {} lineup templates", catalog.hero_count(), catalog.template_count());
            0
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}
