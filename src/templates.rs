use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

use crate::{forms::FieldErrors, models::Candidate, ranking::RankedMovie};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const INPUT_ERROR_CLASS: &str = "mt-2 w-full rounded-md border border-red-500 px-3 py-2 focus:border-red-500 focus:outline-none focus:ring-1 focus:ring-red-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

pub fn index_page(movies: &[RankedMovie], flash: Option<&str>) -> String {
    page(
        "My Top Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    div class="flex items-start justify-between gap-6" {
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { "My Top Movies" }
                            p class="mt-2 text-gray-600" { "These are my all-time favourite movies." }
                        }
                        a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add" { "Add Movie" }
                    }

                    @if let Some(message) = flash {
                        (flash_banner(message))
                    }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No movies yet. Add one to start your list." }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for ranked in movies {
                                (movie_card(ranked))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn add_page(title: &str, errors: &FieldErrors) -> String {
    page(
        "Add Movie",
        narrow(html! {
            h1 class="text-3xl font-bold text-gray-900" { "Add a Movie" }
            form class="mt-8 space-y-6" method="post" action="/add" novalidate {
                (text_field("new_title", "Movie Title", title, errors))
                button class=(BUTTON_CLASS) type="submit" { "Add Movie" }
            }
            a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/" { "Back to list" }
        }),
    )
}

pub fn select_page(query: &str, candidates: &[Candidate]) -> String {
    page(
        "Select Movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-3xl mx-auto px-6 py-12" {
                    h1 class="text-3xl font-bold text-gray-900" { "Select Movie" }
                    p class="mt-2 text-gray-600" { "Results for \u{201c}" (query) "\u{201d}" }

                    @if candidates.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No matching movies found." }
                        }
                    } @else {
                        ul class="mt-10 bg-white shadow rounded-lg divide-y divide-gray-200" {
                            @for candidate in candidates {
                                li class="p-4" {
                                    a class="text-lg text-blue-600 hover:text-blue-800" href=(format!("/edit?movie_api_id={}", candidate.id)) {
                                        (candidate.title)
                                        @if let Some(year) = candidate.year() {
                                            span class="ml-2 text-gray-500" { "(" (year) ")" }
                                        }
                                    }
                                    @if let Some(overview) = &candidate.overview {
                                        @if !overview.is_empty() {
                                            p class="mt-1 text-sm text-gray-600 line-clamp-2" { (overview) }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/add" { "Search again" }
                }
            }
        },
    )
}

pub fn edit_page(
    movie_id: i32,
    title: &str,
    rating: &str,
    review: &str,
    errors: &FieldErrors,
    flash: Option<&str>,
) -> String {
    page(
        "Edit Movie",
        narrow(html! {
            h1 class="text-3xl font-bold text-gray-900" { (title) }
            p class="mt-2 text-gray-600" { "Edit Movie Rating" }

            @if let Some(message) = flash {
                (flash_banner(message))
            }

            form class="mt-8 space-y-6" method="post" action="/edit" novalidate {
                input type="hidden" name="movie_id" value=(movie_id);
                (text_field("rating", "Your Rating Out of 10 e.g. 7.5", rating, errors))
                (text_field("review", "Your Review", review, errors))
                button class=(BUTTON_CLASS) type="submit" { "Done" }
            }
            a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/" { "Back to list" }
        }),
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" {
                            (status.canonical_reason().unwrap_or("Error"))
                        }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
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

fn narrow(inner: Markup) -> Markup {
    html! {
        div class="min-h-screen bg-gray-50" {
            div class="max-w-2xl mx-auto px-6 py-12" {
                div class="bg-white shadow rounded-lg p-8" { (inner) }
            }
        }
    }
}

fn flash_banner(message: &str) -> Markup {
    html! {
        div class="mt-6 rounded-md border border-blue-200 bg-blue-50 px-4 py-3 text-sm text-blue-800" role="status" {
            (message)
        }
    }
}

fn text_field(name: &str, label: &str, value: &str, errors: &FieldErrors) -> Markup {
    let error = errors.get(name);
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class=(if error.is_some() { INPUT_ERROR_CLASS } else { INPUT_CLASS })
                name=(name) id=(name) value=(value) required;
            @if let Some(message) = error {
                p class="mt-2 text-sm text-red-600" { (message) }
            }
        }
    }
}

fn movie_card(ranked: &RankedMovie) -> Markup {
    let movie = &ranked.movie;
    let edit_href =
        format!("/edit?id={}&title={}", movie.id, urlencoding::encode(&movie.title));
    let delete_href = format!("/delete?id={}", movie.id);

    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            @if movie.img_url.is_empty() {
                div class="w-24 h-36 flex-none rounded bg-gray-200 flex items-center justify-center text-xs text-gray-500" { "No poster" }
            } @else {
                img class="w-24 h-36 flex-none rounded object-cover" src=(movie.img_url) alt=(movie.title);
            }
            div class="flex-1" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        span class="mr-2 text-blue-600" { "#" (ranked.rank) }
                        (movie.title)
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                    }
                    @if let Some(rating) = movie.rating {
                        span class="text-lg font-bold text-gray-900" { (rating) "/10" }
                    } @else {
                        span class="text-sm text-gray-500" { "Not rated" }
                    }
                }
                p class="mt-2 text-sm text-gray-600" { (movie.description) }
                @if let Some(review) = &movie.review {
                    p class="mt-2 text-sm italic text-gray-700" { "\u{201c}" (review) "\u{201d}" }
                }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(edit_href) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(delete_href) { "Delete" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::movie;

    #[test]
    fn index_escapes_user_text() {
        let ranked = RankedMovie {
            rank: 1,
            movie: movie::Model {
                id: 1,
                title: "<script>".to_string(),
                year: 2000,
                description: String::new(),
                rating: Some(7.5),
                ranking: Some(1),
                review: Some("a & b".to_string()),
                img_url: String::new(),
            },
        };

        let html = index_page(&[ranked], None);

        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("7.5/10"));
        assert!(html.contains("No poster"));
    }

    #[test]
    fn edit_page_shows_field_errors() {
        let mut errors = FieldErrors::default();
        errors.add("rating", "Rating must be between 0 and 10.");

        let html = edit_page(3, "Heat", "11", "Tense", &errors, None);

        assert!(html.contains(r#"name="movie_id" value="3""#));
        assert!(html.contains("Rating must be between 0 and 10."));
        assert!(html.contains(r#"value="Tense""#));
    }
}
