//! Book query commands

use anyhow::{Context as _, Result};
use bookworm_core::{book_actions, BookAction, CatalogQuery, FilterField, Genre, Route, SortField};

use crate::commands::Context;
use crate::output::{print_info, print_output, print_single, print_warning};
use super::types::{BookDetailRow, BookRow};

/// Catalog list parameters from the command line
pub struct ListArgs {
    pub search: Option<String>,
    pub genre: Option<Genre>,
    pub sort: SortField,
    pub desc: bool,
    pub page: Option<u32>,
    pub page_size: u32,
}

/// The API takes a single filter, so a genre replaces a title search.
pub fn build_query(args: &ListArgs) -> CatalogQuery {
    let mut query = CatalogQuery::books()
        .sorted_by(args.sort, !args.desc)
        .with_page_size(args.page_size);
    if let Some(search) = &args.search {
        query.set_filter(FilterField::Title, search.as_str());
    }
    if let Some(genre) = args.genre {
        query = query.with_genre(genre);
    }
    if let Some(page) = args.page {
        query = query.with_page(page);
    }
    query
}

pub async fn list_books(ctx: &Context, args: ListArgs) -> Result<()> {
    ctx.gate(Route::Catalog)?;
    if args.search.is_some() && args.genre.is_some() {
        print_warning("Genre filter replaces the title search", ctx.quiet);
    }

    let query = build_query(&args);
    let books = ctx
        .client
        .books()
        .list(&query)
        .await
        .context("Failed to load books")?;

    let rows: Vec<BookRow> = books.into_iter().map(BookRow::from).collect();
    print_output(&rows, ctx.format)
}

pub async fn show_book(ctx: &Context, id: i64) -> Result<()> {
    ctx.gate(Route::BookDetail)?;
    let book = ctx
        .client
        .books()
        .get(id)
        .await
        .with_context(|| format!("Failed to load book {}", id))?;

    print_single(&BookDetailRow::from(&book), ctx.format)?;

    for action in book_actions(&book) {
        match action {
            BookAction::Borrow if ctx.client.session().is_authenticated() => print_info(
                &format!("{}: bookworm books borrow {}", action.label(), book.id),
                ctx.quiet,
            ),
            BookAction::Borrow => print_info(bookworm_core::LOGIN_TO_BORROW, ctx.quiet),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ListArgs {
        ListArgs {
            search: None,
            genre: None,
            sort: SortField::Title,
            desc: false,
            page: None,
            page_size: 100,
        }
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_default_query() {
        let params = build_query(&args()).to_params();
        assert_eq!(param(&params, "sortBy"), Some("title"));
        assert_eq!(param(&params, "isAscending"), Some("true"));
        assert_eq!(param(&params, "pageSize"), Some("100"));
        assert_eq!(param(&params, "filterOn"), None);
    }

    #[test]
    fn test_search_becomes_title_filter() {
        let mut a = args();
        a.search = Some("dune".to_string());
        let params = build_query(&a).to_params();
        assert_eq!(param(&params, "filterOn"), Some("title"));
        assert_eq!(param(&params, "filterQuery"), Some("dune"));
    }

    #[test]
    fn test_genre_replaces_search() {
        let mut a = args();
        a.search = Some("dune".to_string());
        a.genre = Some(Genre::ScienceFiction);
        a.desc = true;
        let params = build_query(&a).to_params();
        assert_eq!(param(&params, "filterOn"), Some("bookGenre"));
        assert_eq!(param(&params, "filterQuery"), Some("ScienceFiction"));
        assert_eq!(param(&params, "isAscending"), Some("false"));
    }

    #[test]
    fn test_blank_search_sends_no_filter() {
        let mut a = args();
        a.search = Some("   ".to_string());
        assert!(build_query(&a).active_filter().is_none());
    }
}
