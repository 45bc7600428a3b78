// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use monday_cli::api::queries;
use monday_cli::{
    AppError, BoardId, BoardsCommand, ClientConfig, ColumnCodec, Command, CommandLineInput,
    ItemId, ItemsCommand, MondayClient, PageSize, Paginator,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::process::ExitCode;

/// Sets up logging configuration.
fn setup_logging(level: LevelFilter) -> anyhow::Result<()> {
    let log_file_path = std::env::temp_dir().join("monday_cli.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }

    let pattern = if level >= LevelFilter::Info {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // stdout carries command output, so console logs go to stderr.
    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)
        .with_context(|| format!("opening log file {}", log_file_path.display()))?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("console", Box::new(console_appender)),
        )
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(LevelFilter::Debug),
        )
        .context("building log configuration")?;

    log4rs::init_config(config).context("installing logger")?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Runs one command against the API and prints its result as JSON.
async fn execute_command(command: Command) -> Result<(), AppError> {
    if let Command::Version = command {
        println!("monday-cli {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = ClientConfig::from_env()?;
    let client = MondayClient::from_config(&config)?;

    match command {
        Command::Items(ItemsCommand::Get { item_id }) => {
            let item_id = ItemId::parse(&item_id)?;
            let mut variables = Map::new();
            variables.insert("itemIds".to_string(), Value::from(vec![item_id.as_str()]));
            let mut data = client.query(queries::GET_ITEM_BY_ID, variables).await?;
            let item = data
                .pointer_mut("/items/0")
                .map(Value::take)
                .ok_or_else(|| AppError::NotFound {
                    resource: "Item",
                    id: item_id.to_string(),
                })?;
            print_json(&item)
        }
        Command::Items(ItemsCommand::ListColumns { board_id }) => {
            let board_id = BoardId::parse(&board_id)?;
            let columns = ColumnCodec::new(&client).list_columns(&board_id).await?;
            print_json(&columns)
        }
        Command::Items(ItemsCommand::UpdateColumn {
            board_id,
            item_id,
            column_title,
            value,
        }) => {
            let board_id = BoardId::parse(&board_id)?;
            let item_id = ItemId::parse(&item_id)?;
            let updated = ColumnCodec::new(&client)
                .update(&board_id, &item_id, &column_title, &value)
                .await?;
            print_json(&updated)
        }
        Command::Items(ItemsCommand::ListStatuses { item_id }) => {
            let item_id = ItemId::parse(&item_id)?;
            let statuses = ColumnCodec::new(&client).status_columns(&item_id).await?;
            print_json(&statuses)
        }
        Command::Items(ItemsCommand::UpdateStatus {
            item_id,
            column_id,
            label,
        }) => {
            let item_id = ItemId::parse(&item_id)?;
            let updated = ColumnCodec::new(&client)
                .update_status(&item_id, &column_id, &label)
                .await?;
            print_json(&updated)
        }
        Command::Boards(BoardsCommand::Items {
            board_id,
            page_size,
            max_pages,
            cursor,
        }) => {
            let board_id = BoardId::parse(&board_id)?;
            let page_size = PageSize::new(page_size)?;
            let items = Paginator::new(&client)
                .fetch_all(&queries::board_items(&board_id), page_size, cursor, max_pages)
                .await?;
            print_json(&items)
        }
        Command::Complexity => {
            let complexity = client.complexity().await?;
            print_json(&complexity)
        }
        Command::Version => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{}", rendered);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLineInput::parse();

    if let Err(e) = setup_logging(cli.log_level()) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    match execute_command(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("Command failed: {:?}", err);
            eprintln!("Error: {}", err);
            if let Some(hint) = err.hint() {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::from(err.exit_code())
        }
    }
}
