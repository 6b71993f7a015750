//! Projection of the record set into display cards.

use biblio_store::{BookRecord, Rating};
use maud::{html, Markup, Render};
use serde::Serialize;

pub const FILLED_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';
pub const EMPTY_SHELF: &str = "Aucun livre pour le moment. Ajoute ton premier livre ! 📚";

/// Five glyphs: one filled star per rating point, empty stars after.
pub fn stars(rating: Rating) -> String {
    let filled = usize::from(rating.get());
    std::iter::repeat(FILLED_STAR)
        .take(filled)
        .chain(std::iter::repeat(EMPTY_STAR).take(usize::from(Rating::MAX) - filled))
        .collect()
}

/// Escape the characters that are significant in markup, quotes included.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// User-supplied text, escaped with [`escape_html`] when spliced into markup.
pub struct Text<'a>(pub &'a str);

impl Render for Text<'_> {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&escape_html(self.0));
    }
}

/// One rendered book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCard {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub stars: String,
    pub summary: Option<String>,
    pub comment: String,
    pub date: String,
    pub cover_url: Option<String>,
}

impl From<&BookRecord> for BookCard {
    fn from(record: &BookRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            author: record.author.clone().filter(|a| !a.is_empty()),
            stars: stars(record.rating),
            summary: record.summary.clone().filter(|s| !s.is_empty()),
            comment: record.comment.clone(),
            date: record.date.clone(),
            cover_url: record.cover_url.clone().filter(|c| !c.is_empty()),
        }
    }
}

impl Render for BookCard {
    fn render(&self) -> Markup {
        html! {
            div.book-card data-id=(Text(&self.id)) {
                form.delete-form method="post" action={ "/books/" (Text(&self.id)) "/delete" }
                    onsubmit="return confirm('Es-tu sûre de vouloir supprimer ce livre ?');" {
                    button.btn-delete type="submit" title="Supprimer ce livre" { "✕" }
                }
                div.book-card-content {
                    @if let Some(cover_url) = &self.cover_url {
                        div.book-card-cover {
                            img src=(Text(cover_url)) alt={ "Couverture de " (Text(&self.title)) };
                        }
                    }
                    div.book-card-info {
                        h3 { (Text(&self.title)) }
                        @if let Some(author) = &self.author {
                            p.author { "par " (Text(author)) }
                        }
                        div.rating { (self.stars) }
                        @if let Some(summary) = &self.summary {
                            p.summary {
                                span.summary-label { "📖 Résumé :" } " " (Text(summary))
                            }
                        }
                        p.comment {
                            span.comment-label { "💭 Mon avis :" } " " (Text(&self.comment))
                        }
                        p.date { "Ajouté le " (Text(&self.date)) }
                    }
                }
            }
        }
    }
}

/// Everything the list area shows, derived from the full record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub count: usize,
    pub cards: Vec<BookCard>,
    pub placeholder: Option<&'static str>,
    /// Shown above the list when the records could not be loaded
    pub notice: Option<String>,
}

impl DisplayState {
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Heading counter, e.g. `(3)`.
    pub fn count_label(&self) -> String {
        format!("({})", self.count)
    }
}

/// Render the complete record set, preserving its order.
pub fn render(records: &[BookRecord]) -> DisplayState {
    let cards: Vec<BookCard> = records.iter().map(BookCard::from).collect();

    DisplayState {
        count: cards.len(),
        placeholder: cards.is_empty().then_some(EMPTY_SHELF),
        cards,
        notice: None,
    }
}

impl Render for DisplayState {
    fn render(&self) -> Markup {
        html! {
            @if let Some(notice) = &self.notice {
                p.error-message { (Text(notice)) }
            }
            @if let Some(placeholder) = self.placeholder {
                p.empty-message { (placeholder) }
            }
            @for card in &self.cards {
                (card)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblio_store::NewBook;
    use time::macros::datetime;

    fn record(id: &str, title: &str, rating: i64) -> BookRecord {
        BookRecord::from_draft(
            id,
            NewBook::new(title, "Très bon", Rating::new(rating).unwrap()),
            "12/03/2024",
            datetime!(2024-03-12 10:00 UTC),
        )
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("Les Misérables"), "Les Misérables");
    }

    #[test]
    fn stars_for_every_rating() {
        for r in 1..=5i64 {
            let s = stars(Rating::new(r).unwrap());
            assert_eq!(s.chars().count(), 5);
            assert_eq!(s.chars().filter(|c| *c == FILLED_STAR).count() as i64, r);
            assert!(s
                .chars()
                .skip(r as usize)
                .all(|c| c == EMPTY_STAR));
        }
        assert_eq!(stars(Rating::new(3).unwrap()), "★★★☆☆");
    }

    #[test]
    fn empty_render_shows_placeholder() {
        let state = render(&[]);
        assert_eq!(state.count, 0);
        assert_eq!(state.placeholder, Some(EMPTY_SHELF));
        assert_eq!(state.count_label(), "(0)");
        assert!(state.render().into_string().contains("empty-message"));
    }

    #[test]
    fn render_preserves_order_and_count() {
        let records = vec![record("c", "C", 1), record("b", "B", 2), record("a", "A", 3)];
        let state = render(&records);

        assert_eq!(state.count, 3);
        assert_eq!(state.placeholder, None);
        let ids: Vec<_> = state.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }

    #[test]
    fn render_is_idempotent() {
        let records = vec![record("a", "A", 4)];
        assert_eq!(render(&records), render(&records));
        assert_eq!(
            render(&records).render().into_string(),
            render(&records).render().into_string()
        );
    }

    #[test]
    fn free_text_is_escaped() {
        let hostile = r#"<script>alert("x")</script> & 'quotes'"#;
        let mut book = record("id1", hostile, 2);
        book.author = Some(hostile.to_string());
        book.summary = Some(hostile.to_string());
        book.comment = hostile.to_string();
        book.cover_url = Some(r#"https://img" onerror="alert(1)"#.to_string());

        let html = BookCard::from(&book).render().into_string();
        assert!(!html.contains("<script>"));
        assert!(!html.contains(r#"alert("x")"#));
        assert!(!html.contains(r#"" onerror=""#));
        assert!(!html.contains(" & "));
        assert!(!html.contains("'quotes'"));
        assert!(html.contains("&#39;quotes&#39;"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp;"));
    }

    #[test]
    fn cover_block_only_when_url_set() {
        let mut book = record("id1", "Dune", 5);
        let without = BookCard::from(&book).render().into_string();
        assert!(!without.contains("book-card-cover"));

        book.cover_url = Some("https://books.google.com/c.jpg".into());
        let with = BookCard::from(&book).render().into_string();
        assert!(with.contains("book-card-cover"));
        assert!(with.contains("Couverture de Dune"));
    }

    #[test]
    fn card_has_delete_action_for_its_id() {
        let html = BookCard::from(&record("abc", "Dune", 5)).render().into_string();
        assert!(html.contains(r#"action="/books/abc/delete""#));
        assert!(html.contains("Ajouté le 12/03/2024"));
    }
}
