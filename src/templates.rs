use maud::{DOCTYPE, Markup, html};

use crate::models::StoredTitle;

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn titles_page(titles: &[StoredTitle]) -> String {
    page(
        "Titles",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-6xl mx-auto px-6 py-10" {
                    h1 class="text-3xl font-bold text-gray-900" { "Titles" }
                    p class="mt-2 text-gray-600" { (titles.len()) " records in the catalog" }

                    @if titles.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No titles loaded yet. Run titles-load to import the catalog." }
                        }
                    } @else {
                        div class="mt-8 bg-white shadow rounded-lg overflow-x-auto" {
                            table class="min-w-full divide-y divide-gray-200 text-sm" {
                                thead class="bg-gray-100 text-left text-gray-700" {
                                    tr {
                                        th class="px-4 py-2" { "Title" }
                                        th class="px-4 py-2" { "Type" }
                                        th class="px-4 py-2 text-right" { "Duration (min)" }
                                        th class="px-4 py-2" { "Date added" }
                                        th class="px-4 py-2 text-right" { "Release year" }
                                        th class="px-4 py-2 text-right" { "Content age" }
                                    }
                                }
                                tbody class="divide-y divide-gray-100" {
                                    @for title in titles {
                                        (title_row(title))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: String) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn title_row(stored: &StoredTitle) -> Markup {
    let t = &stored.title;
    html! {
        tr class="text-gray-800" {
            td class="px-4 py-2 font-medium" { (t.title) }
            td class="px-4 py-2 text-gray-500" { (t.kind().unwrap_or("—")) }
            td class="px-4 py-2 text-right" { (t.duration) }
            td class="px-4 py-2" {
                @if let Some(date) = t.date_added {
                    (date.strftime("%Y-%m-%d").to_string())
                } @else {
                    span class="text-gray-400" { "—" }
                }
            }
            td class="px-4 py-2 text-right" { (t.release_year) }
            td class="px-4 py-2 text-right" { (t.content_age) }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::Title;

    fn stored(id: i32, title: &str) -> StoredTitle {
        StoredTitle {
            id,
            title: Title {
                title: title.to_string(),
                duration: 120,
                date_added: Some(jiff::civil::date(2021, 1, 1)),
                release_year: 2019,
                content_age: 7,
                fields: BTreeMap::from([("type".to_string(), "TV Show".to_string())]),
            },
        }
    }

    #[test]
    fn lists_every_title() {
        let html = titles_page(&[stored(1, "Show A"), stored(2, "Film B")]);
        assert!(html.contains("Show A"));
        assert!(html.contains("Film B"));
        assert!(html.contains("2021-01-01"));
        assert!(html.contains("TV Show"));
        assert!(html.contains("2 records"));
    }

    #[test]
    fn empty_catalog_has_hint() {
        let html = titles_page(&[]);
        assert!(html.contains("No titles loaded yet"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn titles_are_escaped() {
        let html = titles_page(&[stored(1, "<script>alert(1)</script>")]);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
