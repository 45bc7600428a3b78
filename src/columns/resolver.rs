// src/columns/resolver.rs
//! Column lookup by human title, and the lookup-then-update sequence.

use super::codec::{self, ColumnValue};
use super::model::{Column, ColumnType, RawColumn, StatusOption};
use crate::api::{queries, GraphqlTransport, MondayClient};
use crate::error::{AppError, ClassifiedError, ColumnError};
use crate::types::{BoardId, ItemId};
use serde::Serialize;
use serde_json::{Map, Value};

/// The board an item lives on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemBoard {
    pub board_id: BoardId,
    pub board_name: String,
}

/// Labels of one status column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusColumn {
    pub column_id: String,
    pub column_title: String,
    pub statuses: Vec<StatusOption>,
}

/// Status columns available to an item, via its board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStatuses {
    pub board_id: BoardId,
    pub board_name: String,
    pub item_id: ItemId,
    pub status_columns: Vec<StatusColumn>,
}

/// Resolves columns on a board and reads or writes their values.
///
/// Column metadata is fetched fresh for every operation.
pub struct ColumnCodec<'a, T> {
    client: &'a MondayClient<T>,
}

impl<'a, T: GraphqlTransport> ColumnCodec<'a, T> {
    pub fn new(client: &'a MondayClient<T>) -> Self {
        Self { client }
    }

    /// All columns of `board_id`, in board order.
    pub async fn list_columns(&self, board_id: &BoardId) -> Result<Vec<Column>, AppError> {
        let mut variables = Map::new();
        variables.insert("boardIds".to_string(), Value::from(vec![board_id.as_str()]));
        let data = self
            .client
            .query(queries::GET_BOARD_COLUMNS, variables)
            .await?;

        let board = data
            .pointer("/boards/0")
            .ok_or_else(|| AppError::NotFound {
                resource: "Board",
                id: board_id.to_string(),
            })?;

        let raw_columns = board
            .get("columns")
            .cloned()
            .map(serde_json::from_value::<Vec<RawColumn>>)
            .transpose()
            .map_err(|e| ClassifiedError::Unknown {
                detail: format!("unreadable columns for board {}: {}", board_id, e),
            })?
            .unwrap_or_default();

        log::debug!("Board {} has {} column(s)", board_id, raw_columns.len());
        Ok(raw_columns.into_iter().map(Column::from).collect())
    }

    /// The column titled `title` (case-insensitive).
    pub async fn resolve(&self, board_id: &BoardId, title: &str) -> Result<Column, AppError> {
        let columns = self.list_columns(board_id).await?;
        Ok(select_by_title(board_id, columns, title)?)
    }

    /// The column whose ID is exactly `column_id`.
    pub async fn resolve_by_id(
        &self,
        board_id: &BoardId,
        column_id: &str,
    ) -> Result<Column, AppError> {
        let columns = self.list_columns(board_id).await?;
        Ok(select_by_id(board_id, columns, column_id)?)
    }

    /// Looks up the board that `item_id` belongs to.
    pub async fn board_of_item(&self, item_id: &ItemId) -> Result<ItemBoard, AppError> {
        let mut variables = Map::new();
        variables.insert("itemIds".to_string(), Value::from(vec![item_id.as_str()]));
        let data = self.client.query(queries::GET_ITEM_BY_ID, variables).await?;

        let item = data.pointer("/items/0").ok_or_else(|| AppError::NotFound {
            resource: "Item",
            id: item_id.to_string(),
        })?;

        let board_id = item
            .pointer("/board/id")
            .and_then(|id| match id {
                Value::String(s) => BoardId::parse(s).ok(),
                Value::Number(n) => BoardId::parse(&n.to_string()).ok(),
                _ => None,
            })
            .ok_or_else(|| ClassifiedError::Unknown {
                detail: format!("could not determine the board of item {}", item_id),
            })?;
        let board_name = item
            .pointer("/board/name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        log::debug!("Item {} is on board {}", item_id, board_id);
        Ok(ItemBoard {
            board_id,
            board_name,
        })
    }

    /// Status columns of the item's board with their labels in index order.
    ///
    /// Status columns without readable label settings are left out.
    pub async fn status_columns(&self, item_id: &ItemId) -> Result<ItemStatuses, AppError> {
        let board = self.board_of_item(item_id).await?;
        let status_columns = self
            .list_columns(&board.board_id)
            .await?
            .into_iter()
            .filter(|column| column.column_type == ColumnType::Status)
            .filter_map(|column| {
                column.options.map(|statuses| StatusColumn {
                    column_id: column.id,
                    column_title: column.title,
                    statuses,
                })
            })
            .collect::<Vec<_>>();

        if status_columns.is_empty() {
            log::warn!(
                "No status columns found on board '{}' ({})",
                board.board_name,
                board.board_id
            );
        }
        Ok(ItemStatuses {
            board_id: board.board_id,
            board_name: board.board_name,
            item_id: item_id.clone(),
            status_columns,
        })
    }

    /// Sets the status column `column_id` of an item to the label `label`
    /// (case-insensitive). The board is taken from the item itself.
    pub async fn update_status(
        &self,
        item_id: &ItemId,
        column_id: &str,
        label: &str,
    ) -> Result<Value, AppError> {
        let board = self.board_of_item(item_id).await?;
        let column = self.resolve_by_id(&board.board_id, column_id).await?;
        if column.column_type != ColumnType::Status {
            return Err(ColumnError::NotStatusColumn {
                column: column.id,
                column_type: column.column_type.to_string(),
            }
            .into());
        }
        let value = self.encode(&column, label)?;
        self.write(&board.board_id, item_id, &column, &value).await
    }

    pub fn encode(&self, column: &Column, input: &str) -> Result<ColumnValue, ColumnError> {
        codec::encode(column, input)
    }

    pub fn decode(&self, column: &Column, wire: &Value) -> Result<Option<String>, ColumnError> {
        codec::decode(column, wire)
    }

    /// Sets the column titled `column_title` on an item from human input.
    ///
    /// Nothing is written when the title does not resolve or the value does
    /// not validate. Returns the mutation's `change_column_value` object.
    pub async fn update(
        &self,
        board_id: &BoardId,
        item_id: &ItemId,
        column_title: &str,
        input: &str,
    ) -> Result<Value, AppError> {
        let column = self.resolve(board_id, column_title).await?;
        let value = self.encode(&column, input)?;
        self.write(board_id, item_id, &column, &value).await
    }

    async fn write(
        &self,
        board_id: &BoardId,
        item_id: &ItemId,
        column: &Column,
        value: &ColumnValue,
    ) -> Result<Value, AppError> {
        log::info!(
            "Setting column '{}' ({}) of item {} to {}",
            column.title,
            column.id,
            item_id,
            value.to_mutation_value()
        );

        let mut variables = Map::new();
        variables.insert("boardId".to_string(), Value::from(board_id.as_str()));
        variables.insert("itemId".to_string(), Value::from(item_id.as_str()));
        variables.insert("columnId".to_string(), Value::from(column.id.as_str()));
        variables.insert("value".to_string(), Value::from(value.to_mutation_value()));

        let mut data = self
            .client
            .mutate(queries::CHANGE_COLUMN_VALUE, variables)
            .await?;
        Ok(data
            .get_mut("change_column_value")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

/// Picks the single column whose title matches `title` ignoring case.
pub fn select_by_title(
    board_id: &BoardId,
    columns: Vec<Column>,
    title: &str,
) -> Result<Column, ColumnError> {
    let wanted = title.to_lowercase();
    let available = titles(&columns);
    let mut matches: Vec<Column> = columns
        .into_iter()
        .filter(|column| column.title.to_lowercase() == wanted)
        .collect();

    match matches.len() {
        0 => Err(ColumnError::ColumnNotFound {
            board_id: board_id.to_string(),
            title: title.to_string(),
            available,
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(ColumnError::AmbiguousColumn {
            board_id: board_id.to_string(),
            title: title.to_string(),
            column_ids: matches.into_iter().map(|column| column.id).collect(),
        }),
    }
}

/// Picks the column whose ID is exactly `column_id`.
pub fn select_by_id(
    board_id: &BoardId,
    columns: Vec<Column>,
    column_id: &str,
) -> Result<Column, ColumnError> {
    let available_ids = columns.iter().map(|column| column.id.clone()).collect();
    columns
        .into_iter()
        .find(|column| column.id == column_id)
        .ok_or_else(|| ColumnError::ColumnIdNotFound {
            board_id: board_id.to_string(),
            column_id: column_id.to_string(),
            available_ids,
        })
}

fn titles(columns: &[Column]) -> Vec<String> {
    columns.iter().map(|column| column.title.clone()).collect()
}
