//! Borrowing commands
//!
//! Listing the borrowing board and applying batch status actions to it.

mod types;

use anyhow::{anyhow, bail, Context as _, Result};
use bookworm_core::workflow::is_permitted;
use bookworm_core::{
    BaseRef, BatchOutcome, BorrowingAction, BorrowingBoard, CatalogQuery, Role, Route,
};

use crate::commands::Context;
use crate::output::{
    print_error, print_heading, print_output, print_single, print_success, print_warning,
    OutputFormat,
};

pub use types::{BorrowingRow, BorrowingsAction, OutcomeRow};

pub async fn execute(ctx: &Context, action: BorrowingsAction) -> Result<()> {
    match action {
        BorrowingsAction::List {
            status,
            page,
            page_size,
        } => {
            let mut query = CatalogQuery::borrowings();
            if let Some(status) = status {
                query = query.with_status(status);
            }
            if let Some(page) = page {
                query = query.with_page(page);
            }
            if let Some(size) = page_size {
                query = query.with_page_size(size);
            }
            list_borrowings(ctx, &query).await
        }
        BorrowingsAction::Show { id } => show_borrowing(ctx, id).await,
        BorrowingsAction::Act { action, ids } => act_on_borrowings(ctx, action, ids).await,
        BorrowingsAction::Delete { id, force } => delete_borrowing(ctx, id, force).await,
    }
}

async fn list_borrowings(ctx: &Context, query: &CatalogQuery) -> Result<()> {
    let viewer = ctx.viewer(Route::Borrowings)?;

    let mut board = BorrowingBoard::new();
    ctx.client
        .refresh_board(&mut board, query)
        .await
        .context("Failed to load borrowings")?;

    print_output(&board_rows(&board, viewer.user_role), ctx.format)
}

fn board_rows(board: &BorrowingBoard, role: Role) -> Vec<BorrowingRow> {
    board
        .rows()
        .iter()
        .map(|row| BorrowingRow::from_board(row, role))
        .collect()
}

async fn show_borrowing(ctx: &Context, id: i64) -> Result<()> {
    let viewer = ctx.viewer(Route::Borrowings)?;
    let borrowing = ctx
        .client
        .borrowings()
        .get(id)
        .await
        .with_context(|| format!("Failed to load borrowing {}", id))?;
    print_single(&BorrowingRow::for_viewer(&borrowing, viewer.user_role), ctx.format)
}

/// Ids the viewer's current view offers `action` for, plus the refused ones
/// with a reason. Ids missing from the board go to the server as they are.
fn split_permitted(
    board: &BorrowingBoard,
    role: Role,
    action: BorrowingAction,
    ids: &[i64],
) -> (Vec<i64>, Vec<(i64, String)>) {
    let mut allowed = Vec::new();
    let mut refused = Vec::new();
    for &id in ids {
        match board.row(id) {
            Some(row) if !is_permitted(row.borrowing.status, role, action) => refused.push((
                id,
                format!("{} is not available for a {} borrowing", action, row.borrowing.status),
            )),
            _ => allowed.push(id),
        }
    }
    (allowed, refused)
}

async fn act_on_borrowings(ctx: &Context, action: BorrowingAction, ids: Vec<i64>) -> Result<()> {
    if action == BorrowingAction::Request {
        bail!("Use `bookworm books borrow <BOOK_ID>...` to request books");
    }
    let viewer = ctx.viewer(Route::Borrowings)?;

    let query = CatalogQuery::borrowings();
    let mut board = BorrowingBoard::new();
    ctx.client
        .refresh_board(&mut board, &query)
        .await
        .context("Failed to load borrowings")?;

    let (allowed, refused) = split_permitted(&board, viewer.user_role, action, &ids);
    for (id, reason) in &refused {
        print_warning(&format!("#{}: {}", id, reason), ctx.quiet);
    }
    if allowed.is_empty() {
        bail!("Nothing to {}", action.as_str().to_lowercase());
    }

    let outcome = ctx
        .client
        .act_on_board(&mut board, &query, action, &allowed)
        .await
        .with_context(|| format!("Failed to {} borrowings", action.as_str().to_lowercase()))?;

    let reported = report_outcome(ctx, &outcome, &format!("{}", action));

    // The board was reloaded after any success; JSON output stays one document.
    if outcome.succeeded() > 0 && ctx.format == OutputFormat::Table {
        print_heading("Borrowings", ctx.format, ctx.quiet);
        print_output(&board_rows(&board, viewer.user_role), ctx.format)?;
    }
    reported
}

/// Print per-item results. Fails only when nothing went through.
pub fn report_outcome(ctx: &Context, outcome: &BatchOutcome, what: &str) -> Result<()> {
    let rows: Vec<OutcomeRow> = outcome
        .items()
        .iter()
        .map(|(id, item)| OutcomeRow::from((*id, item)))
        .collect();
    print_output(&rows, ctx.format)?;

    let total = outcome.items().len();
    if outcome.succeeded() > 0 {
        print_success(
            &format!("{}: {} of {} succeeded", what, outcome.succeeded(), total),
            ctx.quiet,
        );
    }
    for (id, message) in outcome.failures() {
        print_error(&format!("#{}: {}", id, message));
    }
    if outcome.succeeded() == 0 && total > 0 {
        return Err(anyhow!("{} failed for every item", what));
    }
    Ok(())
}

async fn delete_borrowing(ctx: &Context, id: i64, force: bool) -> Result<()> {
    let viewer = ctx.admin(Route::Borrowings, "delete borrowings")?;
    let borrowing = ctx
        .client
        .borrowings()
        .get(id)
        .await
        .with_context(|| format!("Failed to load borrowing {}", id))?;

    if !force {
        print_single(&BorrowingRow::for_viewer(&borrowing, viewer.user_role), ctx.format)?;
        print_error("Use --force to confirm deletion");
        return Ok(());
    }

    ctx.client
        .borrowings()
        .delete(&BaseRef::new(borrowing.id, borrowing.time_stamp.clone()))
        .await
        .context("Failed to delete borrowing")?;
    print_success(&format!("Deleted borrowing #{}", id), ctx.quiet);
    Ok(())
}
