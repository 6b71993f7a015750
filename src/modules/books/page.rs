//! The shelf page: a pure projection of [`PageState`].

use maud::{html, Markup, DOCTYPE};

use biblio_store::SUMMARY_MAX_CHARS;

use super::presenter::Text;
use super::session::{FlashKind, PageState};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #fdf6ec; color: #3b2f2f; margin: 0; }
main { max-width: 960px; margin: 0 auto; padding: 2rem 1rem; }
.panel { background: #fff; border-radius: 12px; padding: 1.5rem; box-shadow: 0 2px 8px rgba(0,0,0,.08); margin-bottom: 2rem; }
label { display: block; font-weight: 600; margin-top: 1rem; }
input[type=text], textarea { width: 100%; padding: .5rem; border: 1px solid #d6c7b0; border-radius: 6px; box-sizing: border-box; }
.rating-input label { display: inline; font-weight: normal; margin-right: .5rem; }
.search-status.success, .flash.success { color: #2e7d32; }
.search-status.error, .flash.error, .error-message { color: #c62828; }
#cover-preview img { max-height: 180px; margin-top: .5rem; }
#books-list { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 1rem; }
.book-card { background: #fff; border-radius: 12px; padding: 1rem; position: relative; box-shadow: 0 2px 8px rgba(0,0,0,.08); }
.book-card-content { display: flex; gap: 1rem; }
.book-card-cover img { width: 90px; border-radius: 4px; }
.delete-form { position: absolute; top: .5rem; right: .5rem; }
.btn-delete { border: none; background: transparent; cursor: pointer; font-size: 1.1rem; }
.rating { color: #f5a623; }
"#;

/// The textarea also accepts the ellipsis a lookup summary ends with.
const SUMMARY_LIMIT: usize = SUMMARY_MAX_CHARS + 3;

/// Render the whole document.
pub fn render(state: &PageState) -> Markup {
    let form = &state.form;

    html! {
        (DOCTYPE)
        html lang="fr" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Mes lectures 📚" }
                style { (maud::PreEscaped(STYLE)) }
            }
            body {
                main {
                    h1 { "📚 Mes lectures" }

                    @if let Some(flash) = &state.flash {
                        p.flash.success[flash.kind == FlashKind::Success]
                            .error[flash.kind == FlashKind::Error] {
                            (Text(&flash.message))
                        }
                    }

                    section.panel {
                        h2 { "Ajouter un livre" }
                        form #book-form method="post" action="/books" {
                            label for="title" { "Titre *" }
                            input #title type="text" name="title" value=(Text(&form.title)) required;

                            label for="author" { "Auteur" }
                            input #author type="text" name="author" value=(Text(&form.author));

                            button #btn-search type="submit" formaction="/lookup" formnovalidate {
                                "🔍 Rechercher le résumé"
                            }
                            p #search-status class=(state.status.css_class()) {
                                (state.status.message())
                            }

                            input #cover-url type="hidden" name="cover_url" value=(Text(&form.cover_url));
                            input #form-id type="hidden" name="form_id" value=(Text(&form.form_id));
                            @if form.cover_visible() {
                                div #cover-preview {
                                    img #book-cover src=(Text(&form.cover_url)) alt="Couverture";
                                }
                            }

                            label for="summary" { "Résumé" }
                            textarea #summary name="summary" rows="5" maxlength=(SUMMARY_LIMIT) { (Text(&form.summary)) }

                            label for="comment" { "Mon avis *" }
                            textarea #comment name="comment" rows="4" required { (Text(&form.comment)) }

                            label { "Note *" }
                            div.rating-input {
                                @for n in 1..=5u8 {
                                    label {
                                        input type="radio" name="rating" value=(n)
                                            checked[form.rating == Some(n)];
                                        " " (n) " ★"
                                    }
                                }
                            }

                            button.btn-submit type="submit" { "Ajouter à ma bibliothèque" }
                        }
                    }

                    section {
                        h2 {
                            "Ma bibliothèque "
                            span #book-count { (state.display.count_label()) }
                        }
                        div #books-list {
                            (state.display)
                        }
                    }
                }
            }
        }
    }
}
