use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use relo_app::{ConnectionEdit, ConnectionStatus, Engine, Message, RuleEdit};
use relo_runtime::Runtime;

use crate::cli::{Command, ConfigCommand, RulesCommand};
use crate::error::CliError;
use crate::render;

type AppEngine = Engine<Runtime>;

/// Load the config, run one command, then flush any pending save.
pub async fn run(command: Command, runtime: Runtime) -> Result<ExitCode, CliError> {
    tracing::debug!(config = %runtime.config_path().display(), "Starting");
    let mut engine = Engine::new(runtime);
    engine.load().await;

    let result = match command {
        Command::Test => test(&mut engine).await,
        Command::Trackers => trackers(&mut engine).await,
        Command::Scan { details } => scan(&mut engine, details).await,
        Command::Replace { yes, details } => replace(&mut engine, yes, details).await,
        Command::Rules { action } => rules(&mut engine, action).await,
        Command::Config { action } => config(&mut engine, action),
    };

    engine.shutdown().await;
    result
}

async fn test(engine: &mut AppEngine) -> Result<ExitCode, CliError> {
    connect(engine).await?;
    Ok(ExitCode::SUCCESS)
}

async fn connect(engine: &mut AppEngine) -> Result<(), CliError> {
    let status = engine.test_connection().await;
    let message = engine.session().status_message().to_string();
    if status == ConnectionStatus::Connected {
        println!("{}", render::status_line(status, &message));
        Ok(())
    } else {
        Err(CliError::Connection(message))
    }
}

async fn trackers(engine: &mut AppEngine) -> Result<ExitCode, CliError> {
    engine.fetch_trackers().await.map_err(CliError::Backend)?;
    println!("{}", render::catalog(&engine.session().catalog_items()));
    engine.dispatch(Message::ClosePicker);
    Ok(ExitCode::SUCCESS)
}

/// Test, then scan. Leaves the preview in the session.
async fn preview(engine: &mut AppEngine, details: bool) -> Result<(), CliError> {
    if engine.session().active_rule_count() == 0 {
        return Err(CliError::NoActiveRules);
    }
    connect(engine).await?;
    engine.scan().await;

    let session = engine.session();
    match session.scan_result() {
        Some(result) => {
            println!("{}", render::scan_summary(result, details));
            Ok(())
        }
        None => Err(CliError::Backend(
            session.last_failure().unwrap_or("scan failed").to_string(),
        )),
    }
}

async fn scan(engine: &mut AppEngine, details: bool) -> Result<ExitCode, CliError> {
    preview(engine, details).await?;
    Ok(ExitCode::SUCCESS)
}

async fn replace(engine: &mut AppEngine, yes: bool, details: bool) -> Result<ExitCode, CliError> {
    preview(engine, details).await?;
    if !engine.session().can_execute() {
        println!("Nothing to replace.");
        return Ok(ExitCode::SUCCESS);
    }
    if !yes && !confirm("Apply these replacements?").await? {
        return Err(CliError::Aborted);
    }

    match engine.execute().await {
        Some(Ok(results)) => {
            println!("{}", render::replace_results(&results));
            if results.iter().all(|r| r.success) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Some(Err(e)) => Err(CliError::Backend(e)),
        None => Err(CliError::Backend("execute was not permitted".into())),
    }
}

async fn confirm(prompt: &str) -> Result<bool, CliError> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{prompt} [y/N] ").as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Convert a 1-based rule number from the command line.
fn rule_index(engine: &AppEngine, number: usize) -> Result<usize, CliError> {
    let len = engine.session().rules().len();
    if number == 0 || number > len {
        return Err(CliError::RuleIndex { index: number, len });
    }
    Ok(number - 1)
}

async fn rules(engine: &mut AppEngine, action: RulesCommand) -> Result<ExitCode, CliError> {
    match action {
        RulesCommand::List => {}
        RulesCommand::Add { old, new } => {
            add_rule(engine, &old)?;
            if let Some(new) = new {
                let index = position_of(engine, &old);
                engine.dispatch(Message::RuleEdited {
                    index,
                    edit: RuleEdit::NewDomain(new),
                });
            }
        }
        RulesCommand::Remove { index } => {
            let index = rule_index(engine, index)?;
            if engine.session().rules().len() <= 1 {
                return Err(CliError::LastRule);
            }
            engine.dispatch(Message::RemoveRule(index));
        }
        RulesCommand::Set {
            index,
            old,
            new,
            enable,
            disable,
        } => {
            let index = rule_index(engine, index)?;
            let mut edits = Vec::new();
            if let Some(old) = old {
                edits.push(RuleEdit::OldDomain(old));
            }
            if let Some(new) = new {
                edits.push(RuleEdit::NewDomain(new));
            }
            if enable || disable {
                edits.push(RuleEdit::Enabled(enable));
            }
            if edits.is_empty() {
                return Err(CliError::NothingToChange);
            }
            for edit in edits {
                engine.dispatch(Message::RuleEdited { index, edit });
            }
        }
        RulesCommand::Pick { domain } => {
            engine.fetch_trackers().await.map_err(CliError::Backend)?;
            let in_use = engine
                .session()
                .catalog()
                .entries()
                .iter()
                .any(|e| e.domain == domain);
            if !in_use {
                engine.dispatch(Message::ClosePicker);
                return Err(CliError::UnknownDomain(domain));
            }
            add_rule(engine, &domain)?;
        }
    }

    println!("{}", render::rules(engine.session().rules()));
    Ok(ExitCode::SUCCESS)
}

/// Reuse the blank rule or append one for `domain`, refusing duplicates.
fn add_rule(engine: &mut AppEngine, domain: &str) -> Result<(), CliError> {
    if engine.session().rules().contains_old_domain(domain) {
        return Err(CliError::DuplicateRule(domain.to_string()));
    }
    engine.dispatch(Message::PickTracker(domain.to_string()));
    Ok(())
}

fn position_of(engine: &AppEngine, old_domain: &str) -> usize {
    let rules = engine.session().rules().as_slice();
    rules
        .iter()
        .position(|r| r.old_domain == old_domain)
        .unwrap_or(rules.len() - 1)
}

fn config(engine: &mut AppEngine, action: ConfigCommand) -> Result<ExitCode, CliError> {
    if let ConfigCommand::Set {
        client,
        host,
        port,
        username,
        password,
        https,
    } = action
    {
        // Client and scheme first: they reset the port, an explicit one wins.
        let edits: Vec<ConnectionEdit> = [
            client.map(ConnectionEdit::DownloaderType),
            https.map(ConnectionEdit::UseHttps),
            host.map(ConnectionEdit::Host),
            port.map(ConnectionEdit::Port),
            username.map(ConnectionEdit::Username),
            password.map(ConnectionEdit::Password),
        ]
        .into_iter()
        .flatten()
        .collect();
        if edits.is_empty() {
            return Err(CliError::NothingToChange);
        }
        for edit in edits {
            engine.dispatch(Message::ConnectionEdited(edit));
        }
    }

    println!("{}", render::connection(engine.session().connection()));
    Ok(ExitCode::SUCCESS)
}
