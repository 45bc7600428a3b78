// src/api/queries.rs
//! GraphQL documents sent by the commands. The access layer treats them as
//! opaque payloads; only the variable names and the location of the
//! pagination envelope matter to it.

use super::pagination::PageTemplate;
use super::types::GraphqlRequest;
use crate::types::BoardId;

/// Item by ID with board, group and column values.
pub const GET_ITEM_BY_ID: &str = r#"
query GetItem($itemIds: [ID!]!) {
  items(ids: $itemIds) {
    id
    name
    state
    created_at
    updated_at
    creator_id
    board {
      id
      name
    }
    group {
      id
      title
    }
    column_values {
      id
      text
      value
      type
    }
  }
  complexity {
    before
    after
  }
}
"#;

/// Board columns with settings (status labels live in `settings_str`).
pub const GET_BOARD_COLUMNS: &str = r#"
query GetBoardColumns($boardIds: [ID!]!) {
  boards(ids: $boardIds) {
    id
    name
    columns {
      id
      title
      type
      settings_str
    }
  }
  complexity {
    before
    after
  }
}
"#;

/// First page of a board's items.
pub const GET_BOARD_ITEMS: &str = r#"
query GetBoardItems($boardIds: [ID!]!, $limit: Int, $cursor: String) {
  boards(ids: $boardIds) {
    id
    name
    items_page(limit: $limit, cursor: $cursor) {
      cursor
      items {
        id
        name
        state
        created_at
        updated_at
        group {
          id
          title
        }
        column_values {
          id
          text
          type
        }
      }
    }
  }
  complexity {
    before
    after
  }
}
"#;

/// Every page after the first, addressed by cursor alone.
pub const GET_NEXT_ITEMS_PAGE: &str = r#"
query GetNextItemsPage($cursor: String!, $limit: Int) {
  next_items_page(cursor: $cursor, limit: $limit) {
    cursor
    items {
      id
      name
      state
      created_at
      updated_at
      group {
        id
        title
      }
      column_values {
        id
        text
        type
      }
    }
  }
  complexity {
    before
    after
  }
}
"#;

/// Current complexity budget of the account.
pub const GET_COMPLEXITY: &str = r#"
query {
  complexity {
    before
    after
    query
    reset_in_x_seconds
  }
}
"#;

/// Sets one column of one item. `value` is the JSON-encoded column value.
pub const CHANGE_COLUMN_VALUE: &str = r#"
mutation ChangeColumnValue($boardId: ID!, $itemId: ID!, $columnId: String!, $value: JSON!) {
  change_column_value(
    board_id: $boardId
    item_id: $itemId
    column_id: $columnId
    value: $value
  ) {
    id
    name
  }
}
"#;

/// Pagination template walking every item of a board.
pub fn board_items(board_id: &BoardId) -> PageTemplate {
    let first = GraphqlRequest::new(GET_BOARD_ITEMS)
        .with_variable("boardIds", vec![board_id.as_str()]);
    PageTemplate::new(first, "/boards/0/items_page").with_continuation(
        GraphqlRequest::new(GET_NEXT_ITEMS_PAGE),
        "/next_items_page",
    )
}
