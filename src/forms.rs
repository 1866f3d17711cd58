use serde::Deserialize;

use crate::models::Rating;

/// Per-field validation messages, in field order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub new_title: String,
}

impl AddForm {
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let title = self.new_title.trim();
        if title.is_empty() {
            let mut errors = FieldErrors::default();
            errors.add("new_title", "Movie title is required.");
            return Err(errors);
        }
        Ok(title.to_string())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub movie_id: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub review: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValidEdit {
    pub rating: Rating,
    pub review: String,
}

impl EditForm {
    /// The hidden movie id. `None` means the form was tampered with or truncated.
    pub fn movie_id(&self) -> Option<i32> {
        self.movie_id.trim().parse().ok()
    }

    pub fn validate(&self) -> Result<ValidEdit, FieldErrors> {
        let mut errors = FieldErrors::default();

        let rating = match self.rating.parse::<Rating>() {
            Ok(rating) => Some(rating),
            Err(err) => {
                errors.add("rating", err.to_string());
                None
            },
        };

        let review = self.review.trim();
        if review.is_empty() {
            errors.add("review", "Review is required.");
        }

        match rating {
            Some(rating) if errors.is_empty() => Ok(ValidEdit { rating, review: review.to_string() }),
            _ => Err(errors),
        }
    }
}
