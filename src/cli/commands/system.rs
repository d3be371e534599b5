use std::path::Path;

use crate::cli::commands::{usage_error, CommandDefinition};
use crate::cli::context::{CommandError, CommandResult, LoopControl, ShellContext};
use crate::cli::output;
use crate::ledger::parse_iso_date;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("help", "Show available commands", "help [command]", cmd_help),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "load",
            "Open a ledger snapshot file",
            "load <path> [user]",
            cmd_load,
        ),
        CommandDefinition::new(
            "today",
            "Show or pin the reporting date",
            "today [YYYY-MM-DD]",
            cmd_today,
        ),
        CommandDefinition::new("config", "Show the active configuration", "config", cmd_config),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let name = name.to_ascii_lowercase();
        return match context.registry.get(&name) {
            Some(definition) => {
                output::info(format!("{} - {}", definition.name, definition.description));
                output::info(format!("usage: {}", definition.usage));
                Ok(LoopControl::Continue)
            }
            None => Err(CommandError::UnknownCommand(name)),
        };
    }

    output::section("Commands");
    let width = context.registry.iter().map(|d| d.usage.len()).max().unwrap_or(0);
    for definition in context.registry.iter() {
        output::info(format!(
            "  {:<width$}  {}",
            definition.usage, definition.description
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::info(meta.summary());
    output::info(format!("rustc: {}", meta.rustc));
    Ok(LoopControl::Continue)
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (path, user) = match args {
        [path] => (*path, None),
        [path, user] => (*path, Some(*user)),
        _ => return Err(usage_error("load <path> [user]")),
    };
    let summary = context.load_file(Path::new(path), user)?;
    output::success(summary);
    Ok(LoopControl::Continue)
}

fn cmd_today(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {}
        [raw] => {
            let date = parse_iso_date(raw).ok_or_else(|| {
                CommandError::InvalidArguments(format!("`{raw}` is not a valid date"))
            })?;
            context.set_today(date);
        }
        _ => return Err(usage_error("today [YYYY-MM-DD]")),
    }
    output::info(format!("Today is {}", context.today()));
    Ok(LoopControl::Continue)
}

fn cmd_config(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    output::info(format!("locale:           {}", config.locale));
    output::info(format!("currency:         {}", config.currency));
    output::info(format!("top vendor limit: {}", config.top_vendor_limit));
    output::info(format!("recent limit:     {}", config.recent_limit));
    let data_file = config
        .data_file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(none)".into());
    output::info(format!("data file:        {data_file}"));
    Ok(LoopControl::Continue)
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info("Exiting shell.");
    Ok(LoopControl::Exit)
}
